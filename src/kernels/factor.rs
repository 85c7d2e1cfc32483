//! Factor (granularity) discovery and decimal-precision inference.
//!
//! A factor is the largest value that evenly divides every consecutive
//! difference of a block. Integer magnitudes are widened to `u128` before the
//! gcd is taken, so differences at the extremes of a signed range (for example
//! `i64::MIN`) never overflow.

use num_traits::{NumCast, ToPrimitive, WrappingSub};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::traits::DeltaInteger;

//==================================================================================
// 1. Integer Factors
//==================================================================================

pub(crate) fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn magnitude<S: ToPrimitive>(value: &S) -> u128 {
    // Every supported width fits an i128.
    value.to_i128().map_or(0, |v| v.unsigned_abs())
}

/// Greatest common divisor of the (signed-domain) differences, if it is
/// greater than one and representable as a positive `S`.
pub(crate) fn factor_of_differences<S>(diffs: &[S]) -> Option<S>
where
    S: ToPrimitive + NumCast + Send + Sync,
{
    let g = diffs
        .par_iter()
        .map(magnitude)
        .reduce(|| 0u128, gcd);
    if g <= 1 {
        return None;
    }
    // A gcd of 2^(n-1) (all differences equal to MIN) has no positive
    // representation in S; such blocks are left unscaled.
    <S as NumCast>::from(g)
}

/// Signed-domain consecutive differences, computed as a parallel fan-out.
pub(crate) fn signed_differences<T: DeltaInteger>(values: &[T]) -> Vec<T::Signed> {
    values
        .par_windows(2)
        .map(|w| w[1].to_signed().wrapping_sub(&w[0].to_signed()))
        .collect()
}

/// Finds the common scale of all consecutive differences of `values`.
///
/// Returns `1` when there is no factor greater than one (including sequences
/// with fewer than two elements or with all-equal values).
pub fn find_factor<T: DeltaInteger>(values: &[T]) -> T {
    if values.len() < 2 {
        return T::one();
    }
    factor_of_differences(&signed_differences(values))
        .map(T::from_signed)
        .unwrap_or_else(T::one)
}

//==================================================================================
// 2. Decimal Factors & Precision
//==================================================================================

/// Number of significant fractional digits of a value.
pub trait Precision {
    fn precision(&self) -> u32;
}

impl Precision for Decimal {
    fn precision(&self) -> u32 {
        self.normalize().scale()
    }
}

/// Common scale of a set of decimal differences, or `None` when no factor
/// greater than one exists or the rescaled mantissas overflow.
pub(crate) fn decimal_factor_of_differences(diffs: &[Decimal]) -> Option<Decimal> {
    let scale = diffs.iter().map(Precision::precision).max()?;
    let mut g = 0u128;
    for diff in diffs {
        let normalized = diff.normalize();
        let widen = 10i128.checked_pow(scale - normalized.scale())?;
        let mantissa = normalized.mantissa().checked_mul(widen)?;
        g = gcd(g, mantissa.unsigned_abs());
        if g == 1 {
            break;
        }
    }
    if g == 0 {
        return None;
    }
    let factor = Decimal::try_from_i128_with_scale(i128::try_from(g).ok()?, scale)
        .ok()?
        .normalize();
    if factor == Decimal::ONE {
        None
    } else {
        Some(factor)
    }
}

/// Finds the common decimal scale of all consecutive differences of `values`.
/// Returns `1` when there is none.
pub fn find_decimal_factor(values: &[Decimal]) -> Decimal {
    let diffs: Option<Vec<Decimal>> = values
        .windows(2)
        .map(|w| w[1].checked_sub(w[0]))
        .collect();
    diffs
        .and_then(|d| decimal_factor_of_differences(&d))
        .unwrap_or(Decimal::ONE)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
