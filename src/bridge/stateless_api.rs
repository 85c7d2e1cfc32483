// In: src/bridge/stateless_api.rs

use std::sync::{Arc, OnceLock};

use crate::block_pipeline::artifact::peek_header;
use crate::block_pipeline::envelope;
use crate::block_pipeline::orchestrator::Codec;
use crate::bridge::format::{BlockStats, EnvelopeStats};
use crate::config::{CodecConfig, SequenceOptions};
use crate::error::CodecError;
use crate::finisher::ZstdFinisher;
use crate::transform::DeltaTransform;
use crate::types::Sequence;

/// The delta+zstd codec behind the stateless functions, built on first use.
pub fn default_codec() -> Result<&'static Codec<DeltaTransform>, CodecError> {
    static DEFAULT: OnceLock<Codec<DeltaTransform>> = OnceLock::new();
    if let Some(codec) = DEFAULT.get() {
        return Ok(codec);
    }
    let codec = Codec::new(DeltaTransform, Arc::new(ZstdFinisher), CodecConfig::default())?;
    // A concurrent first call may have stored its own codec; both are equivalent.
    Ok(DEFAULT.get_or_init(|| codec))
}

/// Encodes a sequence with the default delta+zstd codec.
pub fn encode(sequence: &Sequence, options: &SequenceOptions) -> Result<Vec<u8>, CodecError> {
    default_codec()?.encode_sequence(sequence, options)
}

/// Decodes an envelope written by `encode`.
pub fn decode(bytes: &[u8]) -> Result<Sequence, CodecError> {
    default_codec()?.decode_sequence(bytes)
}

/// Describes an envelope without decoding any payload.
///
/// Works on the output of any codec: the magic is reported, not checked.
pub fn analyze(bytes: &[u8]) -> Result<EnvelopeStats, CodecError> {
    // 1. Frame: split the envelope under its own magic.
    let magic = envelope::peek_magic(bytes)?;
    let blocks = envelope::read(bytes, magic)?;

    // 2. Headers: one peek per block.
    let mut kind = None;
    let mut element_count = 0u64;
    let mut block_stats = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let header = peek_header(block).map_err(|e| e.in_block(index))?;
        match kind {
            None => kind = Some(header.kind),
            Some(first) if first != header.kind => {
                return Err(CodecError::FrameFormatError(format!(
                    "Block {} holds {}, block 0 holds {}",
                    index, header.kind, first
                )));
            }
            Some(_) => {}
        }
        element_count += u64::from(header.len);
        block_stats.push(BlockStats {
            index,
            start: header.start,
            len: header.len,
            finisher: header.finisher,
            level: header.level,
            monotonicity: header.monotonicity,
            has_factor: header.has_factor,
            encoded_size: block.len(),
            payload_size: header.payload_len,
        });
    }
    let kind = kind.ok_or_else(|| {
        CodecError::InternalError("Envelope reader returned no blocks".to_string())
    })?;

    // 3. Totals.
    let raw_size = element_count as usize * kind.byte_width();
    Ok(EnvelopeStats {
        magic,
        kind,
        element_count,
        total_size: bytes.len(),
        raw_size,
        compression_ratio: raw_size as f64 / bytes.len() as f64,
        blocks: block_stats,
    })
}
