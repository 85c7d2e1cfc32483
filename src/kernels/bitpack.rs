//! Packs booleans one bit per value, least-significant bit first.
//!
//! The final byte is zero-padded; the value count lives in the block header,
//! so unpacking reads exactly that many bits back.

use bitvec::prelude::*;

use crate::error::CodecError;

pub fn pack(values: &[bool]) -> Vec<u8> {
    let bits: BitVec<u8, Lsb0> = values.iter().copied().collect();
    bits.into_vec()
}

pub fn unpack(bytes: &[u8], num_values: usize) -> Result<Vec<bool>, CodecError> {
    let expected_len = num_values.div_ceil(8);
    if bytes.len() != expected_len {
        return Err(CodecError::FrameFormatError(format!(
            "Packed boolean stream holds {} bytes, expected {} for {} values",
            bytes.len(),
            expected_len,
            num_values
        )));
    }
    let bits = BitSlice::<u8, Lsb0>::from_slice(bytes);
    Ok(bits.iter().by_vals().take(num_values).collect())
}
