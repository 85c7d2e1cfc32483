//! This module contains the pure, stateless kernel for bit-casting floats.
//!
//! It reinterprets `f32`/`f64` slices as their `u32`/`u64` bit patterns and
//! back. The delta path differences these integers, which is exact: no
//! rounding is involved at any step, and NaN payloads, signed zeros and
//! subnormals survive unchanged.

use crate::traits::FloatBits;

/// Views every float as its integer bit pattern.
pub fn to_bits<F: FloatBits>(values: &[F]) -> Vec<F::Bits> {
    values.iter().map(|v| v.to_bit_pattern()).collect()
}

/// Rebuilds floats from their bit patterns.
pub fn from_bits<F: FloatBits>(bits: &[F::Bits]) -> Vec<F> {
    bits.iter().map(|b| F::from_bit_pattern(*b)).collect()
}

//==================================================================================
// Unit Tests
//==================================================================================
