// In: src/block_pipeline/orchestrator/core.rs

//! The block codec: partitions a sequence, runs its transform and finisher
//! over every block on the codec's worker pool, and wraps the blocks in the
//! envelope.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rust_decimal::Decimal;

use crate::block_pipeline::artifact::{peek_header, Block};
use crate::block_pipeline::envelope;
use crate::block_pipeline::partition::{partition, BlockRange};
use crate::block_pipeline::traits::SequenceCodec;
use crate::bridge::format::codec_magic;
use crate::config::{CodecConfig, EncodeOptions, SequenceOptions};
use crate::error::CodecError;
use crate::finisher::Finisher;
use crate::transform::{Element, Transform};
use crate::types::{DataKind, Sequence};

//==================================================================================
// 1. The Dispatch Table
//==================================================================================

type EncodeFn<X> = fn(&Codec<X>, &Sequence, &SequenceOptions) -> Result<Vec<u8>, CodecError>;
type DecodeFn<X> = fn(&Codec<X>, &[&[u8]]) -> Result<Sequence, CodecError>;

/// The monomorphized entry points of one kind.
struct KindOps<X: Transform> {
    encode: EncodeFn<X>,
    decode: DecodeFn<X>,
}

fn encode_entry<X: Transform, T: Element>(
    codec: &Codec<X>,
    sequence: &Sequence,
    options: &SequenceOptions,
) -> Result<Vec<u8>, CodecError> {
    let values = T::from_sequence(sequence).ok_or_else(|| {
        CodecError::InternalError(format!(
            "{} entry dispatched for a {} sequence",
            T::KIND,
            sequence.kind()
        ))
    })?;
    codec.encode_blocks(values, &options.typed())
}

fn decode_entry<X: Transform, T: Element>(
    codec: &Codec<X>,
    blocks: &[&[u8]],
) -> Result<Sequence, CodecError> {
    Ok(T::into_sequence(codec.decode_blocks::<T>(blocks)?))
}

fn register<X: Transform, T: Element>(transform: &X, table: &mut HashMap<DataKind, KindOps<X>>) {
    if transform.supports(T::KIND) {
        table.insert(
            T::KIND,
            KindOps {
                encode: encode_entry::<X, T>,
                decode: decode_entry::<X, T>,
            },
        );
    }
}

fn build_dispatch_table<X: Transform>(transform: &X) -> HashMap<DataKind, KindOps<X>> {
    let mut table = HashMap::with_capacity(DataKind::ALL.len());
    register::<X, i8>(transform, &mut table);
    register::<X, i16>(transform, &mut table);
    register::<X, i32>(transform, &mut table);
    register::<X, i64>(transform, &mut table);
    register::<X, u8>(transform, &mut table);
    register::<X, u16>(transform, &mut table);
    register::<X, u32>(transform, &mut table);
    register::<X, u64>(transform, &mut table);
    register::<X, f32>(transform, &mut table);
    register::<X, f64>(transform, &mut table);
    register::<X, bool>(transform, &mut table);
    register::<X, Decimal>(transform, &mut table);
    register::<X, DateTime<Utc>>(transform, &mut table);
    register::<X, TimeDelta>(transform, &mut table);
    register::<X, DateTime<FixedOffset>>(transform, &mut table);
    table
}

//==================================================================================
// 2. The Codec
//==================================================================================

/// Builds the worker pool a codec runs its blocks on.
pub(crate) fn build_worker_pool(config: &CodecConfig) -> Result<ThreadPool, CodecError> {
    config.validate()?;
    Ok(ThreadPoolBuilder::new()
        .num_threads(config.pool_size())
        .thread_name(|i| format!("deltablock-worker-{}", i))
        .build()?)
}

/// A transform paired with a finisher, plus the worker pool that runs them.
pub struct Codec<X: Transform> {
    transform: X,
    finisher: Arc<dyn Finisher>,
    config: CodecConfig,
    magic: i32,
    pool: ThreadPool,
    dispatch: HashMap<DataKind, KindOps<X>>,
}

impl<X: Transform> Codec<X> {
    pub fn new(
        transform: X,
        finisher: Arc<dyn Finisher>,
        config: CodecConfig,
    ) -> Result<Self, CodecError> {
        let pool = build_worker_pool(&config)?;
        let magic = codec_magic(transform.name(), finisher.name());
        let dispatch = build_dispatch_table(&transform);
        debug!(
            "Built {}+{} codec: magic {:#010x}, {} kinds, {} workers",
            transform.name(),
            finisher.name(),
            magic,
            dispatch.len(),
            pool.current_num_threads()
        );
        Ok(Self {
            transform,
            finisher,
            config,
            magic,
            pool,
            dispatch,
        })
    }

    pub fn magic(&self) -> i32 {
        self.magic
    }

    pub fn transform(&self) -> &X {
        &self.transform
    }

    pub fn finisher(&self) -> &dyn Finisher {
        self.finisher.as_ref()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn supports(&self, kind: DataKind) -> bool {
        self.dispatch.contains_key(&kind)
    }

    fn ops(&self, kind: DataKind) -> Result<&KindOps<X>, CodecError> {
        self.dispatch.get(&kind).ok_or_else(|| {
            CodecError::UnsupportedType(format!(
                "{} is not supported by the {}+{} codec",
                kind,
                self.transform.name(),
                self.finisher.name()
            ))
        })
    }

    //------------------------------------------------------------------------------
    // Typed entry points
    //------------------------------------------------------------------------------

    pub fn encode<T: Element>(
        &self,
        values: &[T],
        options: &EncodeOptions<T::Factor>,
    ) -> Result<Vec<u8>, CodecError> {
        self.ops(T::KIND)?;
        self.encode_blocks(values, options)
    }

    pub fn decode<T: Element>(&self, bytes: &[u8]) -> Result<Vec<T>, CodecError> {
        self.ops(T::KIND)?;
        let blocks = envelope::read(bytes, self.magic)?;
        let found = peek_header(blocks[0])?.kind;
        if found != T::KIND {
            return Err(CodecError::KindMismatch {
                expected: T::KIND,
                found,
            });
        }
        self.decode_blocks(&blocks)
    }

    //------------------------------------------------------------------------------
    // Kind-dispatched entry points
    //------------------------------------------------------------------------------

    pub fn encode_sequence(
        &self,
        sequence: &Sequence,
        options: &SequenceOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let ops = self.ops(sequence.kind())?;
        (ops.encode)(self, sequence, options)
    }

    pub fn decode_sequence(&self, bytes: &[u8]) -> Result<Sequence, CodecError> {
        let blocks = envelope::read(bytes, self.magic)?;
        let kind = peek_header(blocks[0])?.kind;
        let ops = self.ops(kind)?;
        (ops.decode)(self, &blocks)
    }

    //------------------------------------------------------------------------------
    // Block fan-out
    //------------------------------------------------------------------------------

    fn encode_blocks<T: Element>(
        &self,
        values: &[T],
        options: &EncodeOptions<T::Factor>,
    ) -> Result<Vec<u8>, CodecError> {
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

        // Indexed collect: each block lands in its own slot, the first
        // failure fails the call.
        let blocks: Vec<Vec<u8>> = self.pool.install(|| {
            ranges
                .par_iter()
                .map(|r| {
                    self.encode_block(&values[r.range.clone()], r, options)
                        .map_err(|e| e.in_block(r.index))
                })
                .collect::<Result<_, _>>()
        })?;

        let bytes = envelope::write(self.magic, &blocks)?;
        log_metric!(
            "event" = "encode",
            "kind" = T::KIND,
            "blocks" = blocks.len(),
            "elements" = values.len(),
            "raw_bytes" = values.len() * T::KIND.byte_width(),
            "encoded_bytes" = bytes.len()
        );
        Ok(bytes)
    }

    fn encode_block<T: Element>(
        &self,
        slice: &[T],
        range: &BlockRange,
        options: &EncodeOptions<T::Factor>,
    ) -> Result<Vec<u8>, CodecError> {
        let len = u32::try_from(slice.len()).map_err(|_| {
            CodecError::InvalidArgument(format!(
                "Block of {} elements exceeds the format limit; use more blocks",
                slice.len()
            ))
        })?;
        let mut block = Block::new(
            range.index,
            range.range.start as u64,
            len,
            options.level,
            self.finisher.id(),
        );
        self.transform
            .encode(slice, &mut block, options, self.finisher.as_ref())?;
        debug!(
            "Encoded {} block {}: {} values, factor {:?}, {:?}, {} payload bytes",
            T::KIND,
            block.index,
            block.len,
            block.factor,
            block.monotonicity,
            block.payload.len()
        );
        block.to_bytes()
    }

    fn decode_blocks<T: Element>(&self, blocks: &[&[u8]]) -> Result<Vec<T>, CodecError> {
        let decoded: Vec<(u64, Vec<T>)> = self.pool.install(|| {
            blocks
                .par_iter()
                .enumerate()
                .map(|(index, bytes)| {
                    self.decode_block::<T>(bytes, index)
                        .map_err(|e| e.in_block(index))
                })
                .collect::<Result<_, _>>()
        })?;

        // Blocks must tile the sequence in order.
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

        let mut out = Vec::with_capacity(expected_start as usize);
        for (_, values) in decoded {
            out.extend(values);
        }
        log_metric!(
            "event" = "decode",
            "kind" = T::KIND,
            "blocks" = blocks.len(),
            "elements" = out.len()
        );
        Ok(out)
    }

    fn decode_block<T: Element>(
        &self,
        bytes: &[u8],
        index: usize,
    ) -> Result<(u64, Vec<T>), CodecError> {
        let block = Block::<T>::from_bytes(bytes, index)?;
        if block.finisher != self.finisher.id() {
            return Err(CodecError::FrameFormatError(format!(
                "Block was finished by {}, codec uses {}",
                block.finisher.name(),
                self.finisher.name()
            )));
        }
        let values = self.transform.decode(&block, self.finisher.as_ref())?;
        if values.len() != block.len as usize {
            return Err(CodecError::FrameFormatError(format!(
                "Block decoded to {} values, header declares {}",
                values.len(),
                block.len
            )));
        }
        Ok((block.start, values))
    }
}

impl<X: Transform> SequenceCodec for Codec<X> {
    fn name(&self) -> String {
        format!("{}+{}", self.transform.name(), self.finisher.name())
    }

    fn magic(&self) -> i32 {
        self.magic
    }

    fn supports(&self, kind: DataKind) -> bool {
        Codec::supports(self, kind)
    }

    fn encode_sequence(
        &self,
        sequence: &Sequence,
        options: &SequenceOptions,
    ) -> Result<Vec<u8>, CodecError> {
        Codec::encode_sequence(self, sequence, options)
    }

    fn decode_sequence(&self, bytes: &[u8]) -> Result<Sequence, CodecError> {
        Codec::decode_sequence(self, bytes)
    }
}
