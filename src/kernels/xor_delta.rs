//! This module contains the pure, stateless kernels for performing
//! XOR delta encoding and decoding.
//!
//! The predictor codec uses it on float bit patterns: each value is predicted
//! to equal its predecessor and only the XOR residual is kept, which isolates
//! the few bits that change in slowly varying data.

use std::ops::BitXor;

use crate::error::CodecError;
use crate::utils::{bytes_to_typed_vec, typed_slice_to_bytes};

/// Performs XOR delta encoding **in-place** on a mutable slice.
fn xor_delta_slice_inplace<T>(data: &mut [T])
where
    T: Copy + bytemuck::Pod + BitXor<Output = T>,
{
    if data.len() <= 1 {
        return;
    }
    // Iterate backwards for encoding to use original values for calculation.
    for i in (1..data.len()).rev() {
        data[i] = data[i] ^ data[i - 1];
    }
}

/// Reconstructs the original data from an XOR delta stream **in-place**.
fn xor_undelta_slice_inplace<T>(data: &mut [T])
where
    T: Copy + bytemuck::Pod + BitXor<Output = T>,
{
    // Iterate forwards to use the newly-decoded values for subsequent XORs.
    for i in 1..data.len() {
        data[i] = data[i] ^ data[i - 1];
    }
}

/// Returns the XOR residuals of `input_slice` as bytes.
pub fn encode<T>(input_slice: &[T]) -> Vec<u8>
where
    T: Copy + bytemuck::Pod + BitXor<Output = T>,
{
    let mut data_vec = input_slice.to_vec();
    xor_delta_slice_inplace(&mut data_vec);
    typed_slice_to_bytes(&data_vec)
}

/// Rebuilds the values from residual bytes produced by `encode`.
pub fn decode<T>(input_bytes: &[u8]) -> Result<Vec<T>, CodecError>
where
    T: Copy + bytemuck::Pod + BitXor<Output = T>,
{
    let mut data_vec: Vec<T> = bytes_to_typed_vec(input_bytes)?;
    xor_undelta_slice_inplace(&mut data_vec);
    Ok(data_vec)
}
