// In: src/bridge/format.rs

//! Format identity and the public analysis structs.
//!
//! A codec's magic number is derived from its identity, the pair of its
//! transform and finisher names, so bytes written by one pairing are never
//! decoded by another.

use serde::{Deserialize, Serialize};

use crate::config::{CompressionLevel, Monotonicity};
use crate::finisher::FinisherId;
use crate::types::DataKind;

//==================================================================================
// I. Codec Identity
//==================================================================================

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// The magic number of the codec identified by `"<transform>+<finisher>"`.
pub fn codec_magic(transform: &str, finisher: &str) -> i32 {
    let identity = format!("{}+{}", transform, finisher);
    fnv1a_32(identity.as_bytes()) as i32
}

//==================================================================================
// II. Analysis Structs
//==================================================================================

/// Metadata of one block, as returned by `analyze`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockStats {
    pub index: usize,
    pub start: u64,
    pub len: u32,
    pub finisher: FinisherId,
    pub level: CompressionLevel,
    pub monotonicity: Monotonicity,
    pub has_factor: bool,
    /// Serialized size of the block, header included.
    pub encoded_size: usize,
    pub payload_size: usize,
}

/// The public-facing struct for compression analysis results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnvelopeStats {
    pub magic: i32,
    pub kind: DataKind,
    pub element_count: u64,
    pub total_size: usize,
    /// Size of the values in their fixed-width record layout.
    pub raw_size: usize,
    /// `raw_size / total_size`.
    pub compression_ratio: f64,
    pub blocks: Vec<BlockStats>,
}
