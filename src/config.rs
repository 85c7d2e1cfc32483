// In: src/config.rs

//! Configuration for deltablock codecs and per-call encode options.
//!
//! `CodecConfig` is created once, when a codec is constructed, and is
//! read-only afterwards. Per-call knobs (block count, level, factor,
//! monotonicity hint) travel in `EncodeOptions` / `SequenceOptions`.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::traits::Granularity;

//==================================================================================
// I. Per-Call Enums
//==================================================================================

/// Defines the trade-off between finishing speed and final size.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CompressionLevel {
    /// Bytes are stored by the finisher without backend compression.
    None = 0,
    /// Fastest backend setting.
    #[default]
    Fastest = 1,
    /// The backend's best ratio at a reasonable speed.
    Optimal = 2,
}

impl CompressionLevel {
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Fastest),
            2 => Ok(Self::Optimal),
            other => Err(CodecError::FrameFormatError(format!(
                "Unknown compression level tag {}",
                other
            ))),
        }
    }
}

/// Caller-supplied hint about the ordering of a sequence. It only steers the
/// diff layout and never changes the decoded values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Monotonicity {
    #[default]
    None = 0,
    NonDecreasing = 1,
    NonIncreasing = 2,
}

impl Monotonicity {
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::NonDecreasing),
            2 => Ok(Self::NonIncreasing),
            other => Err(CodecError::FrameFormatError(format!(
                "Unknown monotonicity tag {}",
                other
            ))),
        }
    }
}

/// How the factor (granularity) of a block is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FactorMode<F> {
    /// Differences are never scaled.
    Absent,
    /// The factor is discovered per block.
    #[default]
    Auto,
    /// The caller's factor. Zero behaves like `Auto`, one like `Absent`.
    Explicit(F),
}

impl<F: Granularity> FactorMode<F> {
    /// Folds the explicit sentinels into the mode they stand for.
    pub fn normalized(self) -> Self {
        match self {
            FactorMode::Explicit(f) if f.is_auto_sentinel() => FactorMode::Auto,
            FactorMode::Explicit(f) if f.is_unit() => FactorMode::Absent,
            other => other,
        }
    }
}

//==================================================================================
// II. Per-Call Options
//==================================================================================

/// Options for one typed encode call.
#[derive(Debug, Clone)]
pub struct EncodeOptions<F> {
    pub block_count: usize,
    pub level: CompressionLevel,
    pub factor: FactorMode<F>,
    pub monotonicity: Monotonicity,
}

impl<F> Default for EncodeOptions<F> {
    fn default() -> Self {
        Self {
            block_count: 1,
            level: CompressionLevel::default(),
            factor: FactorMode::Auto,
            monotonicity: Monotonicity::None,
        }
    }
}

impl<F> EncodeOptions<F> {
    pub fn with_block_count(mut self, block_count: usize) -> Self {
        self.block_count = block_count;
        self
    }

    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_factor(mut self, factor: FactorMode<F>) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_monotonicity(mut self, monotonicity: Monotonicity) -> Self {
        self.monotonicity = monotonicity;
        self
    }
}

/// Options for the kind-dispatched (`Sequence`) API, where a typed explicit
/// factor cannot be expressed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SequenceOptions {
    #[serde(default = "default_block_count")]
    pub block_count: usize,
    #[serde(default)]
    pub level: CompressionLevel,
    #[serde(default = "default_true")]
    pub auto_factor: bool,
    #[serde(default)]
    pub monotonicity: Monotonicity,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            block_count: default_block_count(),
            level: CompressionLevel::default(),
            auto_factor: true,
            monotonicity: Monotonicity::None,
        }
    }
}

impl SequenceOptions {
    /// Lifts these options to a typed call.
    pub fn typed<F>(&self) -> EncodeOptions<F> {
        EncodeOptions {
            block_count: self.block_count,
            level: self.level,
            factor: if self.auto_factor {
                FactorMode::Auto
            } else {
                FactorMode::Absent
            },
            monotonicity: self.monotonicity,
        }
    }
}

//==================================================================================
// III. The Codec Configuration
//==================================================================================

/// Construction-time configuration of a codec.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Ceiling applied to every requested block count.
    #[serde(default = "default_max_parallel_blocks")]
    pub max_parallel_blocks: usize,

    /// Size of the codec's worker pool. `None` uses the machine's available
    /// parallelism. The pool never exceeds `max_parallel_blocks` threads.
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Log filter used by `observability::init_from_config`, e.g. "debug".
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_parallel_blocks: default_max_parallel_blocks(),
            worker_threads: None,
            log_level: None,
        }
    }
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.max_parallel_blocks == 0 {
            return Err(CodecError::InvalidArgument(
                "max_parallel_blocks must be at least 1".to_string(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(CodecError::InvalidArgument(
                "worker_threads must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// The number of threads the codec's worker pool is built with.
    pub fn pool_size(&self) -> usize {
        let available = self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        available.clamp(1, self.max_parallel_blocks.max(1))
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_block_count() -> usize {
    1
}

fn default_max_parallel_blocks() -> usize {
    64
}
