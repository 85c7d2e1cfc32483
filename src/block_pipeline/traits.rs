//! The outer codec contract.
//!
//! Every codec that emits the envelope format implements `SequenceCodec`, so
//! callers can swap a transform-based codec for a self-contained one without
//! changing how they call it.

use crate::config::SequenceOptions;
use crate::error::CodecError;
use crate::types::{DataKind, Sequence};

pub trait SequenceCodec: Send + Sync {
    /// Human-readable identity, e.g. `"delta+zstd"`.
    fn name(&self) -> String;

    /// The magic number this codec writes and requires.
    fn magic(&self) -> i32;

    fn supports(&self, kind: DataKind) -> bool;

    fn encode_sequence(
        &self,
        sequence: &Sequence,
        options: &SequenceOptions,
    ) -> Result<Vec<u8>, CodecError>;

    /// Decodes an envelope; the kind is read from the first block.
    fn decode_sequence(&self, bytes: &[u8]) -> Result<Sequence, CodecError>;
}
