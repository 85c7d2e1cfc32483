//! This module contains the pure, stateless kernels of deltablock.
//!
//! Kernels know nothing about blocks, envelopes or threads beyond the nested
//! fan-out inside a single call. The transforms in `crate::transform` compose
//! them per kind.

pub mod bitcast;
pub mod bitpack;
pub mod decimal;
pub mod delta;
pub mod factor;
pub mod leb128;
mod section;
pub mod temporal;
pub mod xor_delta;

pub use factor::{find_decimal_factor, find_factor, Precision};
