//! Deflate and zlib finishers built on `flate2`.
//!
//! Both share one engine; zlib adds its header and Adler-32 trailer, so a
//! corrupted payload is caught by the checksum rather than by the length
//! checks further up.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;

use super::{Finisher, FinisherId};
use crate::config::CompressionLevel;
use crate::error::CodecError;

fn native_level(level: CompressionLevel) -> Compression {
    match level {
        CompressionLevel::None | CompressionLevel::Fastest => Compression::fast(),
        CompressionLevel::Optimal => Compression::best(),
    }
}

fn backend_error(finisher: &'static str) -> impl Fn(std::io::Error) -> CodecError {
    move |e| CodecError::Backend {
        finisher,
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateFinisher;

impl Finisher for DeflateFinisher {
    fn id(&self) -> FinisherId {
        FinisherId::Deflate
    }

    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        let map_err = backend_error("deflate");
        let mut encoder = DeflateEncoder::new(Vec::new(), native_level(level));
        encoder.write_all(input).map_err(&map_err)?;
        encoder.finish().map_err(&map_err)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        DeflateDecoder::new(input)
            .read_to_end(&mut out)
            .map_err(backend_error("deflate"))?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibFinisher;

impl Finisher for ZlibFinisher {
    fn id(&self) -> FinisherId {
        FinisherId::Zlib
    }

    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        let map_err = backend_error("zlib");
        let mut encoder = ZlibEncoder::new(Vec::new(), native_level(level));
        encoder.write_all(input).map_err(&map_err)?;
        encoder.finish().map_err(&map_err)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        ZlibDecoder::new(input)
            .read_to_end(&mut out)
            .map_err(backend_error("zlib"))?;
        Ok(out)
    }
}
