//! Zstandard finisher.
//!
//! A safe, panic-free wrapper around the `zstd` crate. Every frame is prefixed
//! with the uncompressed length as a little-endian u64 so decoding can size
//! its output buffer once and verify the result.

use std::io::Write;

use zstd::stream::Encoder;

use super::{Finisher, FinisherId};
use crate::config::CompressionLevel;
use crate::error::CodecError;

/// Upper bound on the capacity reserved from an untrusted length header.
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

fn backend_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Backend {
        finisher: "zstd",
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdFinisher;

impl ZstdFinisher {
    fn native_level(level: CompressionLevel) -> i32 {
        match level {
            CompressionLevel::None | CompressionLevel::Fastest => 1,
            CompressionLevel::Optimal => 9,
        }
    }
}

impl Finisher for ZstdFinisher {
    fn id(&self) -> FinisherId {
        FinisherId::Zstd
    }

    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        let mut output_buf = Vec::with_capacity(input.len() / 2 + 16);
        output_buf.extend_from_slice(&(input.len() as u64).to_le_bytes());

        let mut encoder =
            Encoder::new(&mut output_buf, Self::native_level(level)).map_err(backend_error)?;
        encoder.write_all(input).map_err(backend_error)?;
        // `finish` is essential to finalize the Zstd frame.
        encoder.finish().map_err(backend_error)?;

        Ok(output_buf)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (header, compressed) = input
            .split_first_chunk::<8>()
            .ok_or_else(|| backend_error("Input stream too short to contain size header."))?;
        let uncompressed_len = usize::try_from(u64::from_le_bytes(*header))
            .map_err(|_| backend_error("Size header does not fit this platform"))?;

        let mut decompressed = Vec::with_capacity(uncompressed_len.min(MAX_PREALLOCATION));
        zstd::stream::copy_decode(compressed, &mut decompressed).map_err(backend_error)?;

        if decompressed.len() != uncompressed_len {
            return Err(backend_error(format!(
                "Decompressed size does not match header. Expected {}, got {}.",
                uncompressed_len,
                decompressed.len()
            )));
        }
        Ok(decompressed)
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
