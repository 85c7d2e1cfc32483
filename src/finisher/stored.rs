//! The identity finisher: bytes are stored as-is.

use super::{Finisher, FinisherId};
use crate::config::CompressionLevel;
use crate::error::CodecError;

#[derive(Debug, Clone, Copy, Default)]
pub struct StoredFinisher;

impl Finisher for StoredFinisher {
    fn id(&self) -> FinisherId {
        FinisherId::Stored
    }

    fn compress(&self, input: &[u8], _level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(input.to_vec())
    }
}
