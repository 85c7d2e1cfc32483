//! LEB128 (Little-Endian Base 128) variable-length encoding of unsigned integers.
//!
//! The delta path uses it for blocks whose differences are known to share one
//! sign (a verified monotonicity hint): small magnitudes then take one byte
//! instead of a full fixed-width record. Fully panic-free.

use num_traits::{PrimInt, Unsigned};

use crate::error::CodecError;

//==================================================================================
// 1. Single-Value Operations
//==================================================================================

/// Appends one value to `buffer`.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<(), CodecError>
where
    T: PrimInt + Unsigned,
{
    let seven_bit_mask = T::from(0x7F).ok_or_else(|| {
        CodecError::Leb128DecodeError("Failed to create 7-bit mask for type".to_string())
    })?;

    let mut remaining = value;
    loop {
        let low = (remaining & seven_bit_mask).to_u8().ok_or_else(|| {
            CodecError::Leb128DecodeError("Failed to narrow 7-bit group to u8".to_string())
        })?;
        remaining = remaining >> 7;
        if remaining.is_zero() {
            buffer.push(low);
            return Ok(());
        }
        buffer.push(low | 0x80);
    }
}

/// Reads one value starting at `*pos`, advancing it past the value.
pub fn decode_one<T>(input: &[u8], pos: &mut usize) -> Result<T, CodecError>
where
    T: PrimInt + Unsigned,
{
    let total_bits = std::mem::size_of::<T>() * 8;
    let mut result = T::zero();
    let mut shift = 0usize;

    loop {
        let byte = *input
            .get(*pos)
            .ok_or_else(|| CodecError::Leb128DecodeError("Unexpected end of buffer".to_string()))?;
        *pos += 1;

        if shift >= total_bits {
            return Err(CodecError::Leb128DecodeError(
                "Integer overflow during decoding".to_string(),
            ));
        }
        let payload = byte & 0x7F;
        // Bits beyond the type's width must be zero on the final group.
        if shift + 7 > total_bits && (payload >> (total_bits - shift)) != 0 {
            return Err(CodecError::Leb128DecodeError(
                "Integer overflow during decoding".to_string(),
            ));
        }
        let group = T::from(payload).ok_or_else(|| {
            CodecError::Leb128DecodeError("Failed to widen 7-bit group".to_string())
        })?;
        result = result | (group << shift);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

//==================================================================================
// 2. Slice Operations
//==================================================================================

pub fn encode<T>(values: &[T]) -> Result<Vec<u8>, CodecError>
where
    T: PrimInt + Unsigned,
{
    let mut out = Vec::with_capacity(values.len());
    for &value in values {
        encode_one(value, &mut out)?;
    }
    Ok(out)
}

/// Decodes exactly `num_values` values; trailing bytes are an error.
pub fn decode<T>(input: &[u8], num_values: usize) -> Result<Vec<T>, CodecError>
where
    T: PrimInt + Unsigned,
{
    let mut pos = 0usize;
    let mut values = Vec::with_capacity(num_values.min(input.len()));
    for _ in 0..num_values {
        values.push(decode_one::<T>(input, &mut pos)?);
    }
    if pos != input.len() {
        return Err(CodecError::Leb128DecodeError(
            "Did not consume entire input buffer. Trailing bytes detected.".to_string(),
        ));
    }
    Ok(values)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leb128_roundtrip_u64() {
        let original: Vec<u64> = vec![0, 127, 128, 1000, u64::MAX];
        let encoded = encode(&original).unwrap();
        assert_eq!(decode::<u64>(&encoded, original.len()).unwrap(), original);
    }

    #[test]
    fn test_small_values_take_one_byte() {
        let encoded = encode(&[5u64, 0, 127]).unwrap();
        assert_eq!(encoded, vec![5, 0, 127]);
    }

    #[test]
    fn test_decode_truncated_buffer() {
        let mut encoded = Vec::new();
        encode_one(624_485u64, &mut encoded).unwrap();
        assert_eq!(encoded, vec![0xE5, 0x8E, 0x26]);

        let result = decode::<u64>(&encoded[..2], 1);
        assert!(matches!(result, Err(CodecError::Leb128DecodeError(_))));
    }

    #[test]
    fn test_decode_overflow_error() {
        // This represents a value larger than u64::MAX
        let encoded = vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        match decode::<u64>(&encoded, 1) {
            Err(CodecError::Leb128DecodeError(msg)) => assert!(msg.contains("overflow")),
            other => panic!("Expected overflow error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let encoded = encode(&[1u64, 2]).unwrap();
        assert!(decode::<u64>(&encoded, 1).is_err());
    }
}
