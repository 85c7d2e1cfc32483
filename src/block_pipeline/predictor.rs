//! A self-contained codec for floating-point sequences.
//!
//! Each value is predicted to equal its predecessor and only the XOR of the
//! two bit patterns is kept, which isolates the few bits that change in
//! slowly varying data. The residuals go straight to the finisher; no
//! transform is involved. Blocks and the envelope use the same layout as
//! `Codec`, so callers can swap one for the other through `SequenceCodec`.

use std::ops::BitXor;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::block_pipeline::artifact::{peek_header, Block};
use crate::block_pipeline::envelope;
use crate::block_pipeline::orchestrator::build_worker_pool;
use crate::block_pipeline::partition::{partition, BlockRange};
use crate::block_pipeline::traits::SequenceCodec;
use crate::bridge::format::codec_magic;
use crate::config::{CodecConfig, EncodeOptions, SequenceOptions};
use crate::error::CodecError;
use crate::finisher::{Finisher, FinisherExt};
use crate::kernels::{bitcast, xor_delta};
use crate::traits::FloatBits;
use crate::transform::Element;
use crate::types::{DataKind, NoFactor, Sequence};

/// A float kind the predictor can encode.
pub trait PredictedFloat: Element<Factor = NoFactor> + FloatBits
where
    Self::Bits: BitXor<Output = Self::Bits>,
{
}

impl PredictedFloat for f32 {}
impl PredictedFloat for f64 {}

pub struct PredictorCodec {
    finisher: Arc<dyn Finisher>,
    config: CodecConfig,
    magic: i32,
    pool: ThreadPool,
}

impl PredictorCodec {
    pub const NAME: &'static str = "predictor";

    pub fn new(finisher: Arc<dyn Finisher>, config: CodecConfig) -> Result<Self, CodecError> {
        let pool = build_worker_pool(&config)?;
        let magic = codec_magic(Self::NAME, finisher.name());
        Ok(Self {
            finisher,
            config,
            magic,
            pool,
        })
    }

    pub fn encode<F>(
        &self,
        values: &[F],
        options: &EncodeOptions<NoFactor>,
    ) -> Result<Vec<u8>, CodecError>
    where
        F: PredictedFloat,
        F::Bits: BitXor<Output = F::Bits>,
    {
        if values.is_empty() {
            return Err(CodecError::InvalidArgument(
                "Cannot encode an empty sequence".to_string(),
            ));
        }
        let ranges = partition(
            values.len(),
            options.block_count,
            self.config.max_parallel_blocks,
        );
        let blocks: Vec<Vec<u8>> = self.pool.install(|| {
            ranges
                .par_iter()
                .map(|r| {
                    self.encode_block(&values[r.range.clone()], r, options)
                        .map_err(|e| e.in_block(r.index))
                })
                .collect::<Result<_, _>>()
        })?;
        envelope::write(self.magic, &blocks)
    }

    fn encode_block<F>(
        &self,
        slice: &[F],
        range: &BlockRange,
        options: &EncodeOptions<NoFactor>,
    ) -> Result<Vec<u8>, CodecError>
    where
        F: PredictedFloat,
        F::Bits: BitXor<Output = F::Bits>,
    {
        let len = u32::try_from(slice.len()).map_err(|_| {
            CodecError::InvalidArgument(format!(
                "Block of {} elements exceeds the format limit; use more blocks",
                slice.len()
            ))
        })?;
        let residuals = xor_delta::encode(&bitcast::to_bits(slice));
        let block = Block::<F> {
            payload: self.finisher.encode_bytes(&residuals, options.level)?,
            ..Block::new(
                range.index,
                range.range.start as u64,
                len,
                options.level,
                self.finisher.id(),
            )
        };
        block.to_bytes()
    }

    pub fn decode<F>(&self, bytes: &[u8]) -> Result<Vec<F>, CodecError>
    where
        F: PredictedFloat,
        F::Bits: BitXor<Output = F::Bits>,
    {
        let blocks = envelope::read(bytes, self.magic)?;
        let found = peek_header(blocks[0])?.kind;
        if found != F::KIND {
            return Err(CodecError::KindMismatch {
                expected: F::KIND,
                found,
            });
        }
        self.decode_blocks(&blocks)
    }

    fn decode_blocks<F>(&self, blocks: &[&[u8]]) -> Result<Vec<F>, CodecError>
    where
        F: PredictedFloat,
        F::Bits: BitXor<Output = F::Bits>,
    {
        let decoded: Vec<(u64, Vec<F>)> = self.pool.install(|| {
            blocks
                .par_iter()
                .enumerate()
                .map(|(index, bytes)| {
                    self.decode_block::<F>(bytes, index)
                        .map_err(|e| e.in_block(index))
                })
                .collect::<Result<_, _>>()
        })?;

        let mut expected_start = 0u64;
        for (index, (start, values)) in decoded.iter().enumerate() {
            if *start != expected_start {
                return Err(CodecError::FrameFormatError(format!(
                    "Block {} starts at {}, expected {}",
                    index, start, expected_start
                ))
                .in_block(index));
            }
            expected_start += values.len() as u64;
        }
        Ok(decoded.into_iter().flat_map(|(_, values)| values).collect())
    }

    fn decode_block<F>(&self, bytes: &[u8], index: usize) -> Result<(u64, Vec<F>), CodecError>
    where
        F: PredictedFloat,
        F::Bits: BitXor<Output = F::Bits>,
    {
        let block = Block::<F>::from_bytes(bytes, index)?;
        let residuals = self.finisher.decode_bytes(&block.payload)?;
        let bits: Vec<F::Bits> = xor_delta::decode(&residuals)?;
        if bits.len() != block.len as usize {
            return Err(CodecError::FrameFormatError(format!(
                "Block decoded to {} values, header declares {}",
                bits.len(),
                block.len
            )));
        }
        Ok((block.start, bitcast::from_bits(&bits)))
    }
}

impl SequenceCodec for PredictorCodec {
    fn name(&self) -> String {
        format!("{}+{}", Self::NAME, self.finisher.name())
    }

    fn magic(&self) -> i32 {
        self.magic
    }

    fn supports(&self, kind: DataKind) -> bool {
        kind.is_float()
    }

    fn encode_sequence(
        &self,
        sequence: &Sequence,
        options: &SequenceOptions,
    ) -> Result<Vec<u8>, CodecError> {
        match sequence {
            Sequence::Float32(values) => self.encode(values, &options.typed()),
            Sequence::Float64(values) => self.encode(values, &options.typed()),
            other => Err(CodecError::UnsupportedType(format!(
                "The predictor codec only encodes floats, got {}",
                other.kind()
            ))),
        }
    }

    fn decode_sequence(&self, bytes: &[u8]) -> Result<Sequence, CodecError> {
        let blocks = envelope::read(bytes, self.magic)?;
        match peek_header(blocks[0])?.kind {
            DataKind::Float32 => Ok(Sequence::Float32(self.decode_blocks(&blocks)?)),
            DataKind::Float64 => Ok(Sequence::Float64(self.decode_blocks(&blocks)?)),
            other => Err(CodecError::UnsupportedType(format!(
                "The predictor codec only decodes floats, got {}",
                other
            ))),
        }
    }
}
