//! Fixed-width little-endian records for every kind.
//!
//! This is the byte layout the finishers write typed sequences in, and the
//! layout block headers use for anchors and factors. Temporal kinds are stored
//! as an i64 tick count (one tick is one nanosecond since the Unix epoch for
//! timestamps, one nanosecond of length for durations).

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::error::CodecError;

/// A value with a fixed-size little-endian serialization.
pub trait FixedWidth: Sized {
    const WIDTH: usize;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Reads one record. `bytes` must be exactly `WIDTH` long.
    fn read_le(bytes: &[u8]) -> Result<Self, CodecError>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes
        .try_into()
        .map_err(|_| CodecError::BufferMismatch(bytes.len(), N))
}

macro_rules! impl_fixed_width_numeric {
    ($($t:ty),*) => {
        $(
            impl FixedWidth for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
                    out.extend_from_slice(&self.to_le_bytes());
                    Ok(())
                }

                fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
                    Ok(<$t>::from_le_bytes(fixed(bytes)?))
                }
            }
        )*
    };
}

impl_fixed_width_numeric!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        out.push(*self as u8);
        Ok(())
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        match fixed::<1>(bytes)? {
            [0] => Ok(false),
            [1] => Ok(true),
            [other] => Err(CodecError::FrameFormatError(format!(
                "Invalid boolean record {}",
                other
            ))),
        }
    }
}

/// 4×32-bit layout: flags, lo, mid, hi.
impl FixedWidth for Decimal {
    const WIDTH: usize = 16;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        out.extend_from_slice(&self.serialize());
        Ok(())
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(Decimal::deserialize(fixed(bytes)?))
    }
}

/// Tick count of a UTC instant, failing for instants outside the i64 range.
pub(crate) fn timestamp_ticks<Tz: TimeZone>(value: &DateTime<Tz>) -> Result<i64, CodecError> {
    value.timestamp_nanos_opt().ok_or_else(|| {
        CodecError::InvalidArgument(format!(
            "Timestamp {:?} is outside the representable tick range",
            value.naive_utc()
        ))
    })
}

pub(crate) fn duration_ticks(value: &TimeDelta) -> Result<i64, CodecError> {
    value.num_nanoseconds().ok_or_else(|| {
        CodecError::InvalidArgument(format!(
            "Duration {} is outside the representable tick range",
            value
        ))
    })
}

/// Offset in whole minutes. Offsets with a seconds component cannot be stored.
pub(crate) fn offset_minutes(offset: &FixedOffset) -> Result<i16, CodecError> {
    let seconds = offset.local_minus_utc();
    if seconds % 60 != 0 {
        return Err(CodecError::InvalidArgument(format!(
            "Offset {} is not a whole number of minutes",
            offset
        )));
    }
    // |offset| < 24h, so minutes always fit an i16.
    Ok((seconds / 60) as i16)
}

pub(crate) fn offset_from_minutes(minutes: i16) -> Result<FixedOffset, CodecError> {
    FixedOffset::east_opt(i32::from(minutes) * 60).ok_or_else(|| {
        CodecError::FrameFormatError(format!("Offset of {} minutes is out of range", minutes))
    })
}

impl FixedWidth for DateTime<Utc> {
    const WIDTH: usize = 8;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        timestamp_ticks(self)?.write_le(out)
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(Utc.timestamp_nanos(i64::read_le(bytes)?))
    }
}

impl FixedWidth for TimeDelta {
    const WIDTH: usize = 8;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        duration_ticks(self)?.write_le(out)
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(TimeDelta::nanoseconds(i64::read_le(bytes)?))
    }
}

/// UTC tick count followed by the offset in minutes.
impl FixedWidth for DateTime<FixedOffset> {
    const WIDTH: usize = 10;

    fn write_le(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        timestamp_ticks(self)?.write_le(out)?;
        offset_minutes(self.offset())?.write_le(out)
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != Self::WIDTH {
            return Err(CodecError::BufferMismatch(bytes.len(), Self::WIDTH));
        }
        let ticks = i64::read_le(&bytes[..8])?;
        let offset = offset_from_minutes(i16::read_le(&bytes[8..])?)?;
        Ok(offset.timestamp_nanos(ticks))
    }
}

/// The factor type of kinds that are never scaled (floats, booleans).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFactor;

impl FixedWidth for NoFactor {
    const WIDTH: usize = 0;

    fn write_le(&self, _out: &mut Vec<u8>) -> Result<(), CodecError> {
        Ok(())
    }

    fn read_le(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.is_empty() {
            Ok(NoFactor)
        } else {
            Err(CodecError::BufferMismatch(bytes.len(), 0))
        }
    }
}

/// Serializes a whole slice of records.
pub fn write_records<T: FixedWidth>(values: &[T]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(values.len() * T::WIDTH);
    for value in values {
        value.write_le(&mut out)?;
    }
    Ok(out)
}

/// Parses a buffer of back-to-back records.
pub fn read_records<T: FixedWidth>(bytes: &[u8]) -> Result<Vec<T>, CodecError> {
    if T::WIDTH == 0 {
        return Err(CodecError::InternalError(
            "Cannot read a sequence of zero-width records".to_string(),
        ));
    }
    if bytes.len() % T::WIDTH != 0 {
        return Err(CodecError::BufferMismatch(bytes.len(), T::WIDTH));
    }
    bytes.chunks_exact(T::WIDTH).map(T::read_le).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_float_records_keep_bit_patterns() {
        let original = vec![f64::NAN, -0.0, f64::INFINITY, 1.0e-310];
        let bytes = write_records(&original).unwrap();
        let decoded: Vec<f64> = read_records(&bytes).unwrap();
        for (a, b) in original.iter().zip(&decoded) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_decimal_record_is_sixteen_bytes() {
        let value = Decimal::from_str("-12345.6789").unwrap();
        let bytes = write_records(&[value]).unwrap();
        assert_eq!(bytes.len(), 16);
        let decoded: Vec<Decimal> = read_records(&bytes).unwrap();
        assert_eq!(decoded[0], value);
        assert_eq!(decoded[0].scale(), 4);
    }

    #[test]
    fn test_timestamp_offset_record_layout() {
        let offset = FixedOffset::east_opt(-5 * 3600 - 30 * 60).unwrap();
        let value = offset.timestamp_nanos(1_700_000_000_123_456_789);
        let bytes = write_records(&[value]).unwrap();
        assert_eq!(bytes.len(), 10);
        assert_eq!(i16::read_le(&bytes[8..]).unwrap(), -330);

        let decoded: Vec<DateTime<FixedOffset>> = read_records(&bytes).unwrap();
        assert_eq!(decoded[0], value);
        assert_eq!(decoded[0].offset(), value.offset());
    }

    #[test]
    fn test_offset_with_seconds_is_rejected() {
        let offset = FixedOffset::east_opt(90).unwrap();
        let value = offset.timestamp_nanos(0);
        assert!(matches!(
            write_records(&[value]),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_misaligned_buffer_is_rejected() {
        let result = read_records::<u32>(&[1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(CodecError::BufferMismatch(5, 4))));
    }

    #[test]
    fn test_invalid_boolean_record() {
        assert!(matches!(
            read_records::<bool>(&[0, 1, 2]),
            Err(CodecError::FrameFormatError(_))
        ));
    }
}
