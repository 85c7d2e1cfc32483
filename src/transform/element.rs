//! The per-kind dispatch table, expressed as trait impls.
//!
//! Every supported Rust value type implements `Element`, binding it to its
//! `DataKind`, its factor type and the kernel that delta-encodes it. One
//! generic codec body then serves all fifteen kinds; the compiler
//! monomorphizes it once per impl.

use std::fmt::Debug;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::block_pipeline::artifact::Block;
use crate::config::{EncodeOptions, FactorMode, Monotonicity};
use crate::error::CodecError;
use crate::finisher::{Finisher, FinisherExt};
use crate::kernels::delta::{self, DeltaParts};
use crate::kernels::{bitcast, bitpack, decimal, temporal};
use crate::traits::Granularity;
use crate::types::{DataKind, FixedWidth, NoFactor, Sequence};

/// A value type the codec can encode.
pub trait Element: FixedWidth + Clone + PartialEq + Debug + Send + Sync + 'static {
    const KIND: DataKind;

    /// The granularity type; `NoFactor` for kinds that are never scaled.
    type Factor: FixedWidth + Granularity + Copy + PartialEq + Debug + Send + Sync + 'static;

    /// Fills the block's anchor, factor, effective monotonicity and payload.
    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError>;

    /// Rebuilds the block's `len` values.
    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher)
        -> Result<Vec<Self>, CodecError>;

    fn into_sequence(values: Vec<Self>) -> Sequence;

    /// Borrows the values of a sequence of this kind.
    fn from_sequence(sequence: &Sequence) -> Option<&[Self]>;
}

/// Copies a kernel result into a block, converting anchor and factor.
fn fill_block<T: Element, A>(
    block: &mut Block<T>,
    parts: DeltaParts<A>,
    anchor: impl FnOnce(A) -> Result<T, CodecError>,
    factor: impl FnOnce(A) -> Result<T::Factor, CodecError>,
) -> Result<(), CodecError> {
    block.anchor = Some(anchor(parts.anchor)?);
    block.factor = parts.factor.map(factor).transpose()?;
    block.monotonicity = parts.monotonicity;
    block.payload = parts.body;
    Ok(())
}

//==================================================================================
// 1. Integers
//==================================================================================

macro_rules! impl_integer_element {
    ($t:ty, $kind:ident) => {
        impl Element for $t {
            const KIND: DataKind = DataKind::$kind;
            type Factor = $t;

            fn delta_encode(
                values: &[Self],
                block: &mut Block<Self>,
                options: &EncodeOptions<Self::Factor>,
                finisher: &dyn Finisher,
            ) -> Result<(), CodecError> {
                let parts = delta::encode(
                    values,
                    options.factor,
                    options.monotonicity,
                    finisher,
                    options.level,
                )?;
                fill_block(block, parts, Ok, Ok)
            }

            fn delta_decode(
                block: &Block<Self>,
                finisher: &dyn Finisher,
            ) -> Result<Vec<Self>, CodecError> {
                delta::decode(
                    block.require_anchor()?,
                    block.factor,
                    block.monotonicity,
                    block.len as usize,
                    &block.payload,
                    finisher,
                )
            }

            fn into_sequence(values: Vec<Self>) -> Sequence {
                Sequence::$kind(values)
            }

            fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
                match sequence {
                    Sequence::$kind(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_integer_element!(i8, Int8);
impl_integer_element!(i16, Int16);
impl_integer_element!(i32, Int32);
impl_integer_element!(i64, Int64);
impl_integer_element!(u8, UInt8);
impl_integer_element!(u16, UInt16);
impl_integer_element!(u32, UInt32);
impl_integer_element!(u64, UInt64);

//==================================================================================
// 2. Floats (bit-pattern deltas, never scaled)
//==================================================================================

macro_rules! impl_float_element {
    ($t:ty, $kind:ident) => {
        impl Element for $t {
            const KIND: DataKind = DataKind::$kind;
            type Factor = NoFactor;

            fn delta_encode(
                values: &[Self],
                block: &mut Block<Self>,
                options: &EncodeOptions<Self::Factor>,
                finisher: &dyn Finisher,
            ) -> Result<(), CodecError> {
                let parts = delta::encode(
                    &bitcast::to_bits(values),
                    FactorMode::Absent,
                    options.monotonicity,
                    finisher,
                    options.level,
                )?;
                fill_block(block, parts, |a| Ok(<$t>::from_bits(a)), |_| Ok(NoFactor))
            }

            fn delta_decode(
                block: &Block<Self>,
                finisher: &dyn Finisher,
            ) -> Result<Vec<Self>, CodecError> {
                let bits = delta::decode(
                    block.require_anchor()?.to_bits(),
                    None,
                    block.monotonicity,
                    block.len as usize,
                    &block.payload,
                    finisher,
                )?;
                Ok(bitcast::from_bits::<$t>(&bits))
            }

            fn into_sequence(values: Vec<Self>) -> Sequence {
                Sequence::$kind(values)
            }

            fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
                match sequence {
                    Sequence::$kind(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_float_element!(f32, Float32);
impl_float_element!(f64, Float64);

//==================================================================================
// 3. Booleans (bit-packed, no anchor or factor)
//==================================================================================

impl Element for bool {
    const KIND: DataKind = DataKind::Boolean;
    type Factor = NoFactor;

    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        block.anchor = None;
        block.factor = None;
        block.monotonicity = Monotonicity::None;
        block.payload = finisher.encode_bytes(&bitpack::pack(values), options.level)?;
        Ok(())
    }

    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher) -> Result<Vec<Self>, CodecError> {
        bitpack::unpack(&finisher.decode_bytes(&block.payload)?, block.len as usize)
    }

    fn into_sequence(values: Vec<Self>) -> Sequence {
        Sequence::Boolean(values)
    }

    fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
        match sequence {
            Sequence::Boolean(values) => Some(values),
            _ => None,
        }
    }
}

//==================================================================================
// 4. Decimals
//==================================================================================

impl Element for Decimal {
    const KIND: DataKind = DataKind::Decimal;
    type Factor = Decimal;

    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        let parts = decimal::encode(values, options.factor, finisher, options.level)?;
        fill_block(block, parts, Ok, Ok)
    }

    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher) -> Result<Vec<Self>, CodecError> {
        decimal::decode(
            block.require_anchor()?,
            block.factor,
            block.len as usize,
            &block.payload,
            finisher,
        )
    }

    fn into_sequence(values: Vec<Self>) -> Sequence {
        Sequence::Decimal(values)
    }

    fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
        match sequence {
            Sequence::Decimal(values) => Some(values),
            _ => None,
        }
    }
}

//==================================================================================
// 5. Temporal Kinds (tick deltas)
//==================================================================================

fn factor_ticks(factor: Option<TimeDelta>) -> Result<Option<i64>, CodecError> {
    factor
        .map(|f| crate::types::record::duration_ticks(&f))
        .transpose()
}

fn ticks_to_step(ticks: i64) -> Result<TimeDelta, CodecError> {
    Ok(TimeDelta::nanoseconds(ticks))
}

impl Element for DateTime<Utc> {
    const KIND: DataKind = DataKind::Timestamp;
    type Factor = TimeDelta;

    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        let parts = delta::encode(
            &temporal::timestamp_ticks_of(values)?,
            temporal::tick_factor(options.factor)?,
            options.monotonicity,
            finisher,
            options.level,
        )?;
        fill_block(block, parts, |a| Ok(Utc.timestamp_nanos(a)), ticks_to_step)
    }

    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher) -> Result<Vec<Self>, CodecError> {
        let anchor = crate::types::record::timestamp_ticks(&block.require_anchor()?)?;
        let ticks = delta::decode(
            anchor,
            factor_ticks(block.factor)?,
            block.monotonicity,
            block.len as usize,
            &block.payload,
            finisher,
        )?;
        Ok(ticks.into_iter().map(|t| Utc.timestamp_nanos(t)).collect())
    }

    fn into_sequence(values: Vec<Self>) -> Sequence {
        Sequence::Timestamp(values)
    }

    fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
        match sequence {
            Sequence::Timestamp(values) => Some(values),
            _ => None,
        }
    }
}

impl Element for TimeDelta {
    const KIND: DataKind = DataKind::Duration;
    type Factor = TimeDelta;

    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        let parts = delta::encode(
            &temporal::duration_ticks_of(values)?,
            temporal::tick_factor(options.factor)?,
            options.monotonicity,
            finisher,
            options.level,
        )?;
        fill_block(block, parts, ticks_to_step, ticks_to_step)
    }

    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher) -> Result<Vec<Self>, CodecError> {
        let anchor = crate::types::record::duration_ticks(&block.require_anchor()?)?;
        let ticks = delta::decode(
            anchor,
            factor_ticks(block.factor)?,
            block.monotonicity,
            block.len as usize,
            &block.payload,
            finisher,
        )?;
        Ok(ticks.into_iter().map(TimeDelta::nanoseconds).collect())
    }

    fn into_sequence(values: Vec<Self>) -> Sequence {
        Sequence::Duration(values)
    }

    fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
        match sequence {
            Sequence::Duration(values) => Some(values),
            _ => None,
        }
    }
}

impl Element for DateTime<FixedOffset> {
    const KIND: DataKind = DataKind::TimestampOffset;
    type Factor = TimeDelta;

    fn delta_encode(
        values: &[Self],
        block: &mut Block<Self>,
        options: &EncodeOptions<Self::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        let first_offset = *values
            .first()
            .ok_or_else(|| {
                CodecError::InvalidArgument("Cannot delta-encode an empty sequence".to_string())
            })?
            .offset();
        let parts = temporal::encode_with_offsets(
            values,
            options.factor,
            options.monotonicity,
            finisher,
            options.level,
        )?;
        fill_block(
            block,
            parts,
            |a| Ok(first_offset.timestamp_nanos(a)),
            ticks_to_step,
        )
    }

    fn delta_decode(block: &Block<Self>, finisher: &dyn Finisher) -> Result<Vec<Self>, CodecError> {
        let anchor = crate::types::record::timestamp_ticks(&block.require_anchor()?)?;
        temporal::decode_with_offsets(
            anchor,
            factor_ticks(block.factor)?,
            block.monotonicity,
            block.len as usize,
            &block.payload,
            finisher,
        )
    }

    fn into_sequence(values: Vec<Self>) -> Sequence {
        Sequence::TimestampOffset(values)
    }

    fn from_sequence(sequence: &Sequence) -> Option<&[Self]> {
        match sequence {
            Sequence::TimestampOffset(values) => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionLevel;
    use crate::finisher::{DeflateFinisher, FinisherId};

    fn roundtrip<T: Element>(values: &[T], options: EncodeOptions<T::Factor>) -> Block<T> {
        let mut block = Block::new(0, 0, values.len() as u32, options.level, FinisherId::Deflate);
        T::delta_encode(values, &mut block, &options, &DeflateFinisher).unwrap();
        let decoded = T::delta_decode(&block, &DeflateFinisher).unwrap();
        assert_eq!(decoded, values);
        block
    }

    #[test]
    fn test_integer_element_records_factor() {
        let block = roundtrip(&[1000i32, 1005, 1010, 1015], EncodeOptions::default());
        assert_eq!(block.anchor, Some(1000));
        assert_eq!(block.factor, Some(5));
    }

    #[test]
    fn test_float_element_ignores_factor() {
        let values = [1.5f64, 1.75, f64::NAN, -0.0, 1.0e300];
        let mut block = Block::new(0, 0, 5, CompressionLevel::Fastest, FinisherId::Deflate);
        f64::delta_encode(&values, &mut block, &EncodeOptions::default(), &DeflateFinisher)
            .unwrap();
        assert_eq!(block.factor, None);
        let decoded = f64::delta_decode(&block, &DeflateFinisher).unwrap();
        for (a, b) in values.iter().zip(&decoded) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_boolean_element_has_no_anchor() {
        let values: Vec<bool> = (0..17).map(|i| i % 3 == 0).collect();
        let block = roundtrip(&values, EncodeOptions::default());
        assert_eq!(block.anchor, None);
        assert_eq!(block.factor, None);
    }

    #[test]
    fn test_timestamp_element_factor_is_a_duration() {
        let values: Vec<DateTime<Utc>> = (0..10)
            .map(|i| Utc.timestamp_nanos(1_600_000_000_000_000_000 + i * 60_000_000_000))
            .collect();
        let block = roundtrip(&values, EncodeOptions::default());
        assert_eq!(block.factor, Some(TimeDelta::minutes(1)));
        assert_eq!(block.anchor, Some(values[0]));
    }

    #[test]
    fn test_duration_element_with_explicit_step() {
        let values: Vec<TimeDelta> = [0, 250, 500, 250]
            .iter()
            .map(|ms| TimeDelta::milliseconds(*ms))
            .collect();
        let options = EncodeOptions::default()
            .with_factor(FactorMode::Explicit(TimeDelta::milliseconds(250)));
        let block = roundtrip(&values, options);
        assert_eq!(block.factor, Some(TimeDelta::milliseconds(250)));
    }

    #[test]
    fn test_timestamp_offset_anchor_keeps_offset() {
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        let values = vec![
            east.timestamp_nanos(1_000),
            west.timestamp_nanos(2_000),
            east.timestamp_nanos(3_000),
        ];
        let block = roundtrip(&values, EncodeOptions::default());
        assert_eq!(block.anchor.map(|a| *a.offset()), Some(east));
    }

    #[test]
    fn test_sequence_views() {
        let seq = i16::into_sequence(vec![1, 2]);
        assert_eq!(i16::from_sequence(&seq), Some(&[1i16, 2][..]));
        assert_eq!(u16::from_sequence(&seq), None);
        assert_eq!(seq.kind(), i16::KIND);
    }
}
