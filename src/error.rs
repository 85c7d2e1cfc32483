// In: src/error.rs

//! This module defines the single, unified error type for the entire deltablock library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::types::DataKind;

#[derive(Error, Debug)]
pub enum CodecError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The envelope was written by a different codec than the one decoding it.
    #[error("Envelope magic number mismatch: expected {expected:#010x}, found {found:#010x}")]
    FormatMismatch { expected: i32, found: i32 },

    #[error("Block holds {found} values but {expected} was requested")]
    KindMismatch { expected: DataKind, found: DataKind },

    #[error("Envelope or block serialization/deserialization failed: {0}")]
    FrameFormatError(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// A failure raised by a finisher backend (zstd, lz4, deflate, ...).
    #[error("{finisher} backend failed: {message}")]
    Backend {
        finisher: &'static str,
        message: String,
    },

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Worker pool could not be built: {0}")]
    ThreadPool(String),

    // =========================================================================
    // === Low-Level Block/Kernel Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {1}, got {0}")]
    BufferMismatch(usize, usize),

    #[error("LEB128 decoding error: {0}")]
    Leb128DecodeError(String),

    #[error("Block {index} failed: {source}")]
    Block {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wraps an error with the ordinal of the block that produced it.
    pub(crate) fn in_block(self, index: usize) -> Self {
        match self {
            // Already attributed; keep the innermost index.
            CodecError::Block { .. } => self,
            other => CodecError::Block {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, looking through block attribution.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Block { source, .. } => source.root(),
            other => other,
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<rayon::ThreadPoolBuildError> for CodecError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        CodecError::ThreadPool(err.to_string())
    }
}
