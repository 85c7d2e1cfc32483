//! The finisher contract: the general-purpose byte compressor that runs after
//! a transform.
//!
//! Backends implement only `Finisher`. Everything typed (fixed-width records)
//! and the stored/compressed framing is layered once on top of it by
//! `FinisherExt`, which is available on every finisher including
//! `dyn Finisher`.

pub mod deflate;
pub mod lz4;
pub mod stored;
pub mod zstd;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::CompressionLevel;
use crate::error::CodecError;
use crate::types::{read_records, write_records, FixedWidth};

pub use self::deflate::{DeflateFinisher, ZlibFinisher};
pub use self::lz4::Lz4Finisher;
pub use self::stored::StoredFinisher;
pub use self::zstd::ZstdFinisher;

//==================================================================================
// 1. Identity
//==================================================================================

/// Stable identifier of a backend, written into every block header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FinisherId {
    Stored = 0,
    Zstd = 1,
    Lz4 = 2,
    Deflate = 3,
    Zlib = 4,
}

impl FinisherId {
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Stored),
            1 => Ok(Self::Zstd),
            2 => Ok(Self::Lz4),
            3 => Ok(Self::Deflate),
            4 => Ok(Self::Zlib),
            other => Err(CodecError::FrameFormatError(format!(
                "Unknown finisher tag {}",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
            Self::Deflate => "deflate",
            Self::Zlib => "zlib",
        }
    }
}

/// Builds the backend for an identifier.
pub fn finisher_for(id: FinisherId) -> Arc<dyn Finisher> {
    match id {
        FinisherId::Stored => Arc::new(StoredFinisher),
        FinisherId::Zstd => Arc::new(ZstdFinisher),
        FinisherId::Lz4 => Arc::new(Lz4Finisher),
        FinisherId::Deflate => Arc::new(DeflateFinisher),
        FinisherId::Zlib => Arc::new(ZlibFinisher),
    }
}

//==================================================================================
// 2. The Backend Contract
//==================================================================================

/// A byte compressor. Implementations are stateless and shared by every
/// worker of a codec.
pub trait Finisher: Send + Sync {
    fn id(&self) -> FinisherId;

    fn name(&self) -> &'static str {
        self.id().name()
    }

    fn compress(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError>;

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;
}

//==================================================================================
// 3. Framing & Typed Records
//==================================================================================

const MODE_STORED: u8 = 0;
const MODE_COMPRESSED: u8 = 1;

/// Framed and typed operations every finisher gets for free.
///
/// Framed output starts with one mode byte. `CompressionLevel::None` stores
/// the bytes verbatim; any other level runs the backend.
pub trait FinisherExt {
    fn encode_bytes(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError>;

    fn decode_bytes(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn encode_values<T: FixedWidth>(
        &self,
        values: &[T],
        level: CompressionLevel,
    ) -> Result<Vec<u8>, CodecError> {
        self.encode_bytes(&write_records(values)?, level)
    }

    fn decode_values<T: FixedWidth>(&self, input: &[u8]) -> Result<Vec<T>, CodecError> {
        read_records(&self.decode_bytes(input)?)
    }
}

impl<F: Finisher + ?Sized> FinisherExt for F {
    fn encode_bytes(&self, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        if level == CompressionLevel::None {
            let mut out = Vec::with_capacity(input.len() + 1);
            out.push(MODE_STORED);
            out.extend_from_slice(input);
            return Ok(out);
        }
        let compressed = self.compress(input, level)?;
        let mut out = Vec::with_capacity(compressed.len() + 1);
        out.push(MODE_COMPRESSED);
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    fn decode_bytes(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        match input.split_first() {
            Some((&MODE_STORED, rest)) => Ok(rest.to_vec()),
            Some((&MODE_COMPRESSED, rest)) => self.decompress(rest),
            Some((other, _)) => Err(CodecError::FrameFormatError(format!(
                "Unknown {} payload mode {}",
                self.name(),
                other
            ))),
            None => Err(CodecError::FrameFormatError(format!(
                "Empty {} payload",
                self.name()
            ))),
        }
    }
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_IDS: [FinisherId; 5] = [
        FinisherId::Stored,
        FinisherId::Zstd,
        FinisherId::Lz4,
        FinisherId::Deflate,
        FinisherId::Zlib,
    ];

    #[test]
    fn test_factory_matches_ids() {
        for id in ALL_IDS {
            let finisher = finisher_for(id);
            assert_eq!(finisher.id(), id);
            assert_eq!(FinisherId::from_tag(id as u8).unwrap(), id);
        }
        assert!(FinisherId::from_tag(99).is_err());
    }

    #[test]
    fn test_typed_roundtrip_through_every_backend() {
        let values: Vec<i64> = (0..500).map(|i| (i * i) % 97 - 40).collect();
        for id in ALL_IDS {
            let finisher = finisher_for(id);
            for level in [
                CompressionLevel::None,
                CompressionLevel::Fastest,
                CompressionLevel::Optimal,
            ] {
                let framed = finisher.encode_values(&values, level).unwrap();
                let decoded: Vec<i64> = finisher.decode_values(&framed).unwrap();
                assert_eq!(decoded, values, "{} at {:?}", finisher.name(), level);
            }
        }
    }

    #[test]
    fn test_level_none_stores_verbatim() {
        let framed = ZstdFinisher
            .encode_bytes(&[1, 2, 3], CompressionLevel::None)
            .unwrap();
        assert_eq!(framed, vec![MODE_STORED, 1, 2, 3]);
    }

    #[test]
    fn test_bad_mode_byte_is_rejected() {
        assert!(matches!(
            StoredFinisher.decode_bytes(&[7, 1, 2]),
            Err(CodecError::FrameFormatError(_))
        ));
        assert!(StoredFinisher.decode_bytes(&[]).is_err());
    }
}
