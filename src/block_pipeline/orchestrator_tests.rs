use std::sync::{Arc, OnceLock};

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::block_pipeline::artifact::{peek_header, Block, BlockHeader};
use crate::block_pipeline::envelope;
use crate::block_pipeline::orchestrator::Codec;
use crate::config::{
    CodecConfig, CompressionLevel, EncodeOptions, FactorMode, Monotonicity, SequenceOptions,
};
use crate::error::CodecError;
use crate::finisher::{
    DeflateFinisher, Finisher, Lz4Finisher, StoredFinisher, ZlibFinisher, ZstdFinisher,
};
use crate::transform::{DeltaTransform, Element, NullTransform, Transform};
use crate::types::{DataKind, Sequence};

//==================================================================================
// Test Helpers
//==================================================================================

fn delta_zstd() -> &'static Codec<DeltaTransform> {
    static CODEC: OnceLock<Codec<DeltaTransform>> = OnceLock::new();
    CODEC.get_or_init(|| {
        Codec::new(DeltaTransform, Arc::new(ZstdFinisher), CodecConfig::default()).unwrap()
    })
}

fn headers(codec_magic: i32, bytes: &[u8]) -> Vec<BlockHeader> {
    envelope::read(bytes, codec_magic)
        .unwrap()
        .into_iter()
        .map(|b| peek_header(b).unwrap())
        .collect()
}

fn roundtrip<T: Element>(values: &[T], options: &EncodeOptions<T::Factor>) -> Vec<T> {
    let codec = delta_zstd();
    let bytes = codec.encode(values, options).unwrap();
    codec.decode::<T>(&bytes).unwrap()
}

fn utc(seconds: i64, nanos: u32) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, nanos).unwrap()
}

fn with_offset(seconds: i64, offset_seconds: i32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_seconds)
        .unwrap()
        .timestamp_opt(seconds, 0)
        .unwrap()
}

/// Offset of block `index`'s first byte within an envelope.
fn block_offset(bytes: &[u8], index: usize) -> usize {
    let mut offset = envelope::ENVELOPE_HEADER_SIZE;
    for _ in 0..index {
        let len = i32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());
        offset += 4 + len as usize;
    }
    offset + 4
}

/// A delta transform restricted to the integer kinds.
struct IntegerOnly;

impl Transform for IntegerOnly {
    fn name(&self) -> &'static str {
        "delta"
    }

    fn supports(&self, kind: DataKind) -> bool {
        kind.is_signed_int() || kind.is_unsigned_int()
    }

    fn encode<T: Element>(
        &self,
        values: &[T],
        block: &mut Block<T>,
        options: &EncodeOptions<T::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        DeltaTransform.encode(values, block, options, finisher)
    }

    fn decode<T: Element>(
        &self,
        block: &Block<T>,
        finisher: &dyn Finisher,
    ) -> Result<Vec<T>, CodecError> {
        DeltaTransform.decode(block, finisher)
    }
}

//==================================================================================
// Roundtrips
//==================================================================================

#[test]
fn test_every_kind_roundtrips_through_the_sequence_api() {
    let sequences = vec![
        Sequence::Int8(vec![-128, -3, 0, 7, 127, 127, -128]),
        Sequence::Int16(vec![i16::MIN, -1, 0, 1, i16::MAX]),
        Sequence::Int32(vec![100, 105, 110, 108, 108, 120]),
        Sequence::Int64(vec![i64::MIN, 0, i64::MAX, -5, 5]),
        Sequence::UInt8(vec![0, 255, 3, 3, 200]),
        Sequence::UInt16(vec![65535, 0, 1, 2]),
        Sequence::UInt32(vec![u32::MAX, 0, 7, 14, 21]),
        Sequence::UInt64(vec![0, u64::MAX, 1, u64::MAX - 1]),
        Sequence::Float32(vec![1.5, -0.0, f32::INFINITY, 3.25]),
        Sequence::Float64(vec![0.1, 0.2, 0.30000000000000004, -1e300]),
        Sequence::Boolean(vec![true, false, false, true, true]),
        Sequence::Decimal(vec![
            Decimal::new(12345, 2),
            Decimal::new(12350, 2),
            Decimal::new(-1, 4),
        ]),
        Sequence::Timestamp(vec![utc(1_700_000_000, 0), utc(1_700_000_060, 500), utc(0, 0)]),
        Sequence::Duration(vec![
            TimeDelta::seconds(30),
            TimeDelta::milliseconds(-250),
            TimeDelta::zero(),
        ]),
        Sequence::TimestampOffset(vec![
            with_offset(1_700_000_000, 3600),
            with_offset(1_700_000_900, 3600),
        ]),
    ];
    assert_eq!(sequences.len(), DataKind::ALL.len());

    let codec = delta_zstd();
    for sequence in sequences {
        for block_count in [1, 2, 5] {
            let options = SequenceOptions {
                block_count,
                ..Default::default()
            };
            let bytes = codec.encode_sequence(&sequence, &options).unwrap();
            let decoded = codec.decode_sequence(&bytes).unwrap();
            assert_eq!(decoded.kind(), sequence.kind());
            match (&sequence, &decoded) {
                // NaN-free floats compare by bits to catch -0.0.
                (Sequence::Float32(a), Sequence::Float32(b)) => {
                    let bits = |v: &Vec<f32>| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
                    assert_eq!(bits(a), bits(b));
                }
                (Sequence::Float64(a), Sequence::Float64(b)) => {
                    let bits = |v: &Vec<f64>| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
                    assert_eq!(bits(a), bits(b));
                }
                _ => assert_eq!(decoded, sequence),
            }
        }
    }
}

#[test]
fn test_every_finisher_and_level_roundtrips() {
    let values: Vec<i64> = (0..2_000).map(|i| 1_000_000 + i * 15 + (i % 7)).collect();
    let finishers: Vec<Arc<dyn Finisher>> = vec![
        Arc::new(StoredFinisher),
        Arc::new(ZstdFinisher),
        Arc::new(Lz4Finisher),
        Arc::new(DeflateFinisher),
        Arc::new(ZlibFinisher),
    ];
    for finisher in finishers {
        let codec = Codec::new(DeltaTransform, finisher, CodecConfig::default()).unwrap();
        for level in [
            CompressionLevel::None,
            CompressionLevel::Fastest,
            CompressionLevel::Optimal,
        ] {
            let options = EncodeOptions::default().with_level(level).with_block_count(4);
            let bytes = codec.encode(&values, &options).unwrap();
            assert_eq!(codec.decode::<i64>(&bytes).unwrap(), values);
        }
    }
}

#[test]
fn test_null_transform_roundtrips_every_kind() {
    let codec = Codec::new(NullTransform, Arc::new(Lz4Finisher), CodecConfig::default()).unwrap();
    for kind in DataKind::ALL {
        assert!(codec.supports(kind));
    }
    let sequence = Sequence::Decimal(vec![Decimal::new(1, 0), Decimal::new(-77, 3)]);
    let bytes = codec
        .encode_sequence(&sequence, &SequenceOptions::default())
        .unwrap();
    assert_eq!(codec.decode_sequence(&bytes).unwrap(), sequence);

    let header = headers(codec.magic(), &bytes)[0];
    assert!(!header.has_anchor);
    assert!(!header.has_factor);
}

//==================================================================================
// Delta Behaviour
//==================================================================================

#[test]
fn test_irregular_steps_record_no_factor() {
    let codec = delta_zstd();
    let values = [100i32, 105, 110, 108, 108, 120];
    let bytes = codec.encode(&values, &EncodeOptions::default()).unwrap();
    let header = headers(codec.magic(), &bytes)[0];
    assert!(header.has_anchor);
    assert!(!header.has_factor);
    assert_eq!(codec.decode::<i32>(&bytes).unwrap(), values);
}

#[test]
fn test_regular_steps_record_their_factor() {
    let codec = delta_zstd();
    let values: Vec<i32> = (1000..=1015).step_by(5).collect();
    assert_eq!(values, vec![1000, 1005, 1010, 1015]);
    let bytes = codec.encode(&values, &EncodeOptions::default()).unwrap();
    let blocks = envelope::read(&bytes, codec.magic()).unwrap();
    let block = Block::<i32>::from_bytes(blocks[0], 0).unwrap();
    assert_eq!(block.anchor, Some(1000));
    assert_eq!(block.factor, Some(5));
    assert_eq!(codec.decode::<i32>(&bytes).unwrap(), values);
}

#[test]
fn test_absent_factor_is_never_recorded() {
    let values: Vec<u16> = (0..100).map(|i| i * 4).collect();
    let codec = delta_zstd();
    let options = EncodeOptions::default().with_factor(FactorMode::Absent);
    let bytes = codec.encode(&values, &options).unwrap();
    assert!(!headers(codec.magic(), &bytes)[0].has_factor);
    assert_eq!(codec.decode::<u16>(&bytes).unwrap(), values);
}

#[test]
fn test_explicit_factor_that_does_not_divide_falls_back_to_unscaled() {
    let codec = delta_zstd();
    let values = [0i32, 6, 9, 21];

    let options = EncodeOptions::default().with_factor(FactorMode::Explicit(4));
    let bytes = codec.encode(&values, &options).unwrap();
    assert!(!headers(codec.magic(), &bytes)[0].has_factor);
    assert_eq!(codec.decode::<i32>(&bytes).unwrap(), values);

    let options = EncodeOptions::default().with_factor(FactorMode::Explicit(3));
    let bytes = codec.encode(&values, &options).unwrap();
    assert!(headers(codec.magic(), &bytes)[0].has_factor);
    assert_eq!(codec.decode::<i32>(&bytes).unwrap(), values);
}

#[test]
fn test_large_unsigned_factor_is_stored_unscaled() {
    let codec = delta_zstd();
    let values = [0u8, 200, 200];
    let options = EncodeOptions::default().with_factor(FactorMode::Explicit(200u8));
    let bytes = codec.encode(&values, &options).unwrap();
    assert!(!headers(codec.magic(), &bytes)[0].has_factor);
    assert_eq!(codec.decode::<u8>(&bytes).unwrap(), values);
}

#[test]
fn test_negative_explicit_factor_is_invalid() {
    let options = EncodeOptions::default().with_factor(FactorMode::Explicit(-2i64));
    let err = delta_zstd().encode(&[2i64, 4, 6], &options).unwrap_err();
    assert!(matches!(err, CodecError::Block { index: 0, .. }));
    assert!(matches!(err.root(), CodecError::InvalidArgument(_)));
}

#[test]
fn test_monotonicity_hint_is_verified_per_block() {
    let codec = delta_zstd();
    // First half rises, second half falls.
    let values: Vec<i64> = (0..50).chain((0..50).rev()).map(|i| i * 3).collect();
    let options = EncodeOptions::default()
        .with_block_count(2)
        .with_monotonicity(Monotonicity::NonDecreasing);
    let bytes = codec.encode(&values, &options).unwrap();
    let headers = headers(codec.magic(), &bytes);
    assert_eq!(headers[0].monotonicity, Monotonicity::NonDecreasing);
    assert_eq!(headers[1].monotonicity, Monotonicity::None);
    assert_eq!(codec.decode::<i64>(&bytes).unwrap(), values);
}

#[test]
fn test_booleans_pack_without_anchor() {
    let values = [
        true, false, true, true, false, false, false, true, true, true, false, true, false,
        false, true, true, false,
    ];
    assert_eq!(values.len(), 17);
    let codec = delta_zstd();
    let bytes = codec.encode(&values, &EncodeOptions::default()).unwrap();
    let header = headers(codec.magic(), &bytes)[0];
    assert!(!header.has_anchor);
    assert!(!header.has_factor);
    assert_eq!(header.len, 17);
    assert_eq!(codec.decode::<bool>(&bytes).unwrap(), values);
}

#[test]
fn test_floats_roundtrip_special_values_bit_exactly() {
    let values = [
        f64::NAN,
        -0.0,
        0.0,
        f64::NEG_INFINITY,
        f64::MIN_POSITIVE / 8.0,
        f64::MAX,
    ];
    let decoded = roundtrip(&values, &EncodeOptions::default().with_block_count(3));
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_decimal_roundtrip_keeps_values() {
    let values: Vec<Decimal> = (0..300).map(|i| Decimal::new(10_000 + i * 25, 2)).collect();
    assert_eq!(roundtrip(&values, &EncodeOptions::default().with_block_count(3)), values);

    let unscaled = EncodeOptions::default().with_factor(FactorMode::Absent);
    let decoded = roundtrip(&values, &unscaled);
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a.scale(), b.scale());
        assert_eq!(a, b);
    }
}

#[test]
fn test_decimal_scales_survive_when_they_shrink() {
    let values = vec![
        Decimal::new(100, 2),
        Decimal::new(2, 0),
        Decimal::new(35, 1),
        Decimal::new(-1_234_567, 6),
        Decimal::new(0, 0),
    ];
    for factor in [FactorMode::Absent, FactorMode::Auto] {
        let options = EncodeOptions::default().with_factor(factor).with_block_count(2);
        let decoded = roundtrip(&values, &options);
        assert_eq!(decoded, values);
        let scales: Vec<u32> = decoded.iter().map(Decimal::scale).collect();
        assert_eq!(scales, vec![2, 0, 1, 6, 0]);
    }
}

#[test]
fn test_timestamps_with_a_regular_period_use_a_duration_factor() {
    let values: Vec<DateTime<Utc>> = (0..500).map(|i| utc(1_600_000_000 + i * 60, 0)).collect();
    let codec = delta_zstd();
    let bytes = codec.encode(&values, &EncodeOptions::default()).unwrap();
    let blocks = envelope::read(&bytes, codec.magic()).unwrap();
    let block = Block::<DateTime<Utc>>::from_bytes(blocks[0], 0).unwrap();
    assert_eq!(block.factor, Some(TimeDelta::seconds(60)));
    assert_eq!(codec.decode::<DateTime<Utc>>(&bytes).unwrap(), values);
}

#[test]
fn test_durations_roundtrip_with_explicit_factor() {
    let values: Vec<TimeDelta> = (0..64).map(|i| TimeDelta::milliseconds(i * 250)).collect();
    let options =
        EncodeOptions::default().with_factor(FactorMode::Explicit(TimeDelta::milliseconds(250)));
    assert_eq!(roundtrip(&values, &options), values);
}

#[test]
fn test_offset_timestamps_with_a_shared_offset() {
    let values: Vec<DateTime<FixedOffset>> =
        (0..40).map(|i| with_offset(1_700_000_000 + i * 15, -5 * 3600)).collect();
    let decoded = roundtrip(&values, &EncodeOptions::default().with_block_count(2));
    assert_eq!(decoded, values);
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a.offset(), b.offset());
    }
}

#[test]
fn test_offset_timestamps_with_mixed_offsets() {
    let offsets = [0, 3600, -1800, 19_800, 3600];
    let values: Vec<DateTime<FixedOffset>> = (0..25)
        .map(|i| with_offset(1_700_000_000 + i as i64 * 7, offsets[i % offsets.len()]))
        .collect();
    let decoded = roundtrip(&values, &EncodeOptions::default().with_block_count(3));
    for (a, b) in values.iter().zip(&decoded) {
        assert_eq!(a, b);
        assert_eq!(a.offset(), b.offset());
    }
}

//==================================================================================
// Edge Cases
//==================================================================================

#[test]
fn test_single_element_and_constant_sequences() {
    assert_eq!(roundtrip(&[42i32], &EncodeOptions::default().with_block_count(8)), vec![42]);

    let constant = vec![-7i16; 1000];
    let codec = delta_zstd();
    let bytes = codec
        .encode(&constant, &EncodeOptions::default().with_block_count(4))
        .unwrap();
    for header in headers(codec.magic(), &bytes) {
        assert!(!header.has_factor);
    }
    assert_eq!(codec.decode::<i16>(&bytes).unwrap(), constant);
}

#[test]
fn test_block_count_never_changes_the_decoded_values() {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<i32> = (0..1_000).map(|_| rng.random_range(-50_000..50_000)).collect();
    let codec = delta_zstd();
    for requested in [1, 3, 64] {
        let bytes = codec
            .encode(&values, &EncodeOptions::default().with_block_count(requested))
            .unwrap();
        let headers = headers(codec.magic(), &bytes);
        assert_eq!(headers.len(), requested);
        let total: u64 = headers.iter().map(|h| u64::from(h.len)).sum();
        assert_eq!(total, values.len() as u64);
        assert_eq!(codec.decode::<i32>(&bytes).unwrap(), values);
    }
}

#[test]
fn test_block_count_is_clamped_to_the_configured_ceiling() {
    let config = CodecConfig {
        max_parallel_blocks: 4,
        ..Default::default()
    };
    let codec = Codec::new(DeltaTransform, Arc::new(ZstdFinisher), config).unwrap();
    let values: Vec<u32> = (0..100).collect();
    let bytes = codec
        .encode(&values, &EncodeOptions::default().with_block_count(50))
        .unwrap();
    assert_eq!(headers(codec.magic(), &bytes).len(), 4);

    let bytes = codec
        .encode(&values, &EncodeOptions::default().with_block_count(0))
        .unwrap();
    assert_eq!(headers(codec.magic(), &bytes).len(), 1);
}

#[test]
fn test_empty_input_is_rejected() {
    let codec = delta_zstd();
    let result = codec.encode::<i32>(&[], &EncodeOptions::default());
    assert!(matches!(result, Err(CodecError::InvalidArgument(_))));
    let result = codec.encode_sequence(&Sequence::Boolean(vec![]), &SequenceOptions::default());
    assert!(matches!(result, Err(CodecError::InvalidArgument(_))));
}

//==================================================================================
// Identity and Dispatch
//==================================================================================

#[test]
fn test_envelope_from_another_codec_is_a_format_mismatch() {
    let bytes = delta_zstd()
        .encode(&[1i32, 2, 3], &EncodeOptions::default())
        .unwrap();

    let null_zstd = Codec::new(NullTransform, Arc::new(ZstdFinisher), CodecConfig::default()).unwrap();
    assert!(matches!(
        null_zstd.decode::<i32>(&bytes),
        Err(CodecError::FormatMismatch { .. })
    ));

    let delta_lz4 = Codec::new(DeltaTransform, Arc::new(Lz4Finisher), CodecConfig::default()).unwrap();
    assert!(matches!(
        delta_lz4.decode_sequence(&bytes),
        Err(CodecError::FormatMismatch { .. })
    ));
    assert_ne!(delta_lz4.magic(), delta_zstd().magic());
}

#[test]
fn test_unsupported_kind_is_rejected_by_the_dispatch_table() {
    let codec = Codec::new(IntegerOnly, Arc::new(ZstdFinisher), CodecConfig::default()).unwrap();
    assert!(codec.supports(DataKind::UInt64));
    assert!(!codec.supports(DataKind::Float64));

    let floats = Sequence::Float64(vec![1.0, 2.0]);
    assert!(matches!(
        codec.encode_sequence(&floats, &SequenceOptions::default()),
        Err(CodecError::UnsupportedType(_))
    ));
    assert!(matches!(
        codec.encode(&[1.0f32], &EncodeOptions::default()),
        Err(CodecError::UnsupportedType(_))
    ));

    // Same identity as delta+zstd, so only the kind stops the decode.
    let bytes = delta_zstd()
        .encode_sequence(&floats, &SequenceOptions::default())
        .unwrap();
    assert!(matches!(
        codec.decode_sequence(&bytes),
        Err(CodecError::UnsupportedType(_))
    ));
    let ints = Sequence::Int16(vec![3, 1, 4]);
    let bytes = delta_zstd()
        .encode_sequence(&ints, &SequenceOptions::default())
        .unwrap();
    assert_eq!(codec.decode_sequence(&bytes).unwrap(), ints);
}

#[test]
fn test_typed_decode_of_the_wrong_kind() {
    let codec = delta_zstd();
    let bytes = codec.encode(&[1u8, 2, 3], &EncodeOptions::default()).unwrap();
    assert!(matches!(
        codec.decode::<i8>(&bytes),
        Err(CodecError::KindMismatch {
            expected: DataKind::Int8,
            found: DataKind::UInt8
        })
    ));
}

//==================================================================================
// Corruption
//==================================================================================

#[test]
fn test_corrupted_block_reports_its_index() {
    let codec = delta_zstd();
    let values: Vec<i32> = (0..100).collect();
    let mut bytes = codec
        .encode(&values, &EncodeOptions::default().with_block_count(3))
        .unwrap();
    let offset = block_offset(&bytes, 1);
    bytes[offset] = DataKind::Int64.tag();
    let err = codec.decode::<i32>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::Block { index: 1, .. }));
}

#[test]
fn test_blocks_out_of_order_are_rejected() {
    let codec = delta_zstd();
    let values: Vec<i32> = (0..90).map(|i| i * i).collect();
    let mut bytes = codec
        .encode(&values, &EncodeOptions::default().with_block_count(3))
        .unwrap();
    // `start` sits after the five one-byte header fields.
    let offset = block_offset(&bytes, 2) + 5;
    bytes[offset..offset + 8].copy_from_slice(&5u64.to_le_bytes());
    let err = codec.decode::<i32>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::Block { index: 2, .. }));
    assert!(matches!(err.root(), CodecError::FrameFormatError(_)));
}

#[test]
fn test_truncated_envelope_is_a_frame_error() {
    let codec = delta_zstd();
    let bytes = codec.encode(&[1i64, 2, 3], &EncodeOptions::default()).unwrap();
    let result = codec.decode::<i64>(&bytes[..bytes.len() - 3]);
    assert!(matches!(result, Err(CodecError::FrameFormatError(_))));
}

//==================================================================================
// Properties
//==================================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_i64_roundtrip(values in prop::collection::vec(any::<i64>(), 1..400), blocks in 1usize..12) {
        let options = EncodeOptions::default().with_block_count(blocks);
        prop_assert_eq!(roundtrip(&values, &options), values);
    }

    #[test]
    fn prop_options_never_change_the_values(
        mut values in prop::collection::vec(-1_000i32..1_000, 1..300),
        sorted in any::<bool>(),
        blocks in 1usize..8,
        level in prop::sample::select(vec![
            CompressionLevel::None,
            CompressionLevel::Fastest,
            CompressionLevel::Optimal,
        ]),
        factor in prop_oneof![
            Just(FactorMode::Absent),
            Just(FactorMode::Auto),
            (0i32..8).prop_map(FactorMode::Explicit),
        ],
        hint in prop::sample::select(vec![
            Monotonicity::None,
            Monotonicity::NonDecreasing,
            Monotonicity::NonIncreasing,
        ]),
    ) {
        if sorted {
            values.sort_unstable();
        }
        let options = EncodeOptions::default()
            .with_block_count(blocks)
            .with_level(level)
            .with_factor(factor)
            .with_monotonicity(hint);
        prop_assert_eq!(roundtrip(&values, &options), values);
    }

    #[test]
    fn prop_u8_scaled_roundtrip(base in any::<u8>(), steps in prop::collection::vec(0u8..4, 1..200)) {
        let values: Vec<u8> = steps
            .iter()
            .scan(base, |acc, s| {
                *acc = acc.wrapping_add(s * 2);
                Some(*acc)
            })
            .collect();
        prop_assert_eq!(roundtrip(&values, &EncodeOptions::default()), values);
    }

    #[test]
    fn prop_f32_roundtrip_is_bit_exact(bits in prop::collection::vec(any::<u32>(), 1..300), blocks in 1usize..6) {
        let values: Vec<f32> = bits.iter().map(|b| f32::from_bits(*b)).collect();
        let decoded = roundtrip(&values, &EncodeOptions::default().with_block_count(blocks));
        let decoded_bits: Vec<u32> = decoded.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(decoded_bits, bits);
    }

    #[test]
    fn prop_boolean_roundtrip(values in prop::collection::vec(any::<bool>(), 1..500), blocks in 1usize..9) {
        let options = EncodeOptions::default().with_block_count(blocks);
        prop_assert_eq!(roundtrip(&values, &options), values);
    }
}
