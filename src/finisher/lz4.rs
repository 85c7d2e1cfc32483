//! LZ4 finisher (block format, size-prepended) built on `lz4_flex`.

use super::{Finisher, FinisherId};
use crate::config::CompressionLevel;
use crate::error::CodecError;

/// LZ4 cannot expand data by more than this ratio.
const MAX_EXPANSION: usize = 255;

fn backend_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Backend {
        finisher: "lz4",
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Finisher;

impl Finisher for Lz4Finisher {
    fn id(&self) -> FinisherId {
        FinisherId::Lz4
    }

    /// LZ4 has a single speed setting; the level is ignored.
    fn compress(&self, input: &[u8], _level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_flex::block::compress_prepend_size(input))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (header, body) = input
            .split_first_chunk::<4>()
            .ok_or_else(|| backend_error("Input stream too short to contain size header."))?;
        let declared = u32::from_le_bytes(*header) as usize;
        if declared > body.len().saturating_mul(MAX_EXPANSION) {
            return Err(backend_error(format!(
                "Declared size {} is impossible for {} compressed bytes",
                declared,
                body.len()
            )));
        }
        lz4_flex::block::decompress_size_prepended(input).map_err(backend_error)
    }
}
