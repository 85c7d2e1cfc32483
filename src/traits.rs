//! This module defines shared numeric traits used across the kernels.
//!
//! `DeltaInteger` is the minimal arithmetic contract the generic delta kernel
//! needs: wrapping add/sub, division by a factor, zero/one and a record width.
//! Every integer is paired with the signed type of the same width so that
//! differences can be divided by a factor with sign-correct semantics.

use std::fmt::Debug;

use chrono::TimeDelta;
use num_traits::{NumCast, PrimInt, Signed, ToPrimitive, WrappingAdd, WrappingMul, WrappingSub};
use rust_decimal::Decimal;

use crate::types::{FixedWidth, NoFactor};

/// An integer kind the delta kernel can difference, scale and accumulate.
pub trait DeltaInteger:
    PrimInt + WrappingAdd + WrappingSub + FixedWidth + Debug + Send + Sync + 'static
{
    /// The signed integer of the same width.
    type Signed: PrimInt
        + Signed
        + NumCast
        + ToPrimitive
        + WrappingAdd
        + WrappingSub
        + WrappingMul
        + FixedWidth
        + Debug
        + Send
        + Sync
        + 'static;

    /// Bit-for-bit reinterpretation as the signed type.
    fn to_signed(self) -> Self::Signed;

    /// Bit-for-bit reinterpretation from the signed type.
    fn from_signed(value: Self::Signed) -> Self;
}

// Implement the trait for every primitive integer type, pairing it with the
// signed type of the same width.
macro_rules! impl_delta_integer_pair {
    ($S:ty, $U:ty) => {
        impl DeltaInteger for $S {
            type Signed = $S;

            #[inline]
            fn to_signed(self) -> $S {
                self
            }

            #[inline]
            fn from_signed(value: $S) -> Self {
                value
            }
        }

        impl DeltaInteger for $U {
            type Signed = $S;

            #[inline]
            fn to_signed(self) -> $S {
                self as $S
            }

            #[inline]
            fn from_signed(value: $S) -> Self {
                value as $U
            }
        }
    };
}

impl_delta_integer_pair!(i8, u8);
impl_delta_integer_pair!(i16, u16);
impl_delta_integer_pair!(i32, u32);
impl_delta_integer_pair!(i64, u64);

/// Maps a floating type to the unsigned integer holding its bit pattern.
pub trait FloatBits: Copy + Send + Sync + 'static {
    type Bits: DeltaInteger + bytemuck::Pod;

    fn to_bit_pattern(self) -> Self::Bits;
    fn from_bit_pattern(bits: Self::Bits) -> Self;
}

impl FloatBits for f32 {
    type Bits = u32;

    fn to_bit_pattern(self) -> u32 {
        self.to_bits()
    }

    fn from_bit_pattern(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

impl FloatBits for f64 {
    type Bits = u64;

    fn to_bit_pattern(self) -> u64 {
        self.to_bits()
    }

    fn from_bit_pattern(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// A factor (granularity) value. Zero is the "discover automatically"
/// sentinel and one means "no scaling".
pub trait Granularity {
    fn is_auto_sentinel(&self) -> bool;
    fn is_unit(&self) -> bool;
}

macro_rules! impl_integer_granularity {
    ($($t:ty),*) => {
        $(
            impl Granularity for $t {
                fn is_auto_sentinel(&self) -> bool {
                    *self == 0
                }

                fn is_unit(&self) -> bool {
                    *self == 1
                }
            }
        )*
    };
}

impl_integer_granularity!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Granularity for Decimal {
    fn is_auto_sentinel(&self) -> bool {
        self.is_zero()
    }

    fn is_unit(&self) -> bool {
        *self == Decimal::ONE
    }
}

/// Temporal factors are measured in ticks.
impl Granularity for TimeDelta {
    fn is_auto_sentinel(&self) -> bool {
        self.is_zero()
    }

    fn is_unit(&self) -> bool {
        *self == TimeDelta::nanoseconds(1)
    }
}

impl Granularity for NoFactor {
    fn is_auto_sentinel(&self) -> bool {
        false
    }

    fn is_unit(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_reinterpretation_is_bit_exact() {
        assert_eq!(u8::MAX.to_signed(), -1i8);
        assert_eq!(u32::from_signed(-1), u32::MAX);
        assert_eq!(u64::from_signed(i64::MIN), 1u64 << 63);
        assert_eq!(i16::MIN.to_signed(), i16::MIN);
    }

    #[test]
    fn test_float_bit_patterns() {
        let v = -2.5f32;
        assert_eq!(f32::from_bit_pattern(v.to_bit_pattern()), v);
        assert_eq!(f64::NAN.to_bit_pattern(), f64::NAN.to_bits());
    }

    #[test]
    fn test_granularity_sentinels() {
        assert!(0u16.is_auto_sentinel());
        assert!(1i64.is_unit());
        assert!(!5i32.is_unit());
        assert!(Decimal::ZERO.is_auto_sentinel());
        assert!(TimeDelta::nanoseconds(1).is_unit());
        assert!(NoFactor.is_unit());
    }
}
