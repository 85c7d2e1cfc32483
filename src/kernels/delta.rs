//! The generic anchor + differences + factor kernel for integer sequences.
//!
//! Differences are taken in the signed type of the same width with wrapping
//! arithmetic, so each one is exact modulo 2^n and accumulation on decode
//! reproduces the input bit for bit, extremes included. A factor divides every
//! difference exactly or it is not applied.
//!
//! Body layouts:
//! - fixed width: the finisher's framed records of the signed quotients;
//! - LEB128: when the monotonicity hint holds for every quotient, only the
//!   magnitudes are stored, as unsigned LEB128, and then finished as bytes.

use log::warn;
use num_traits::{Signed, ToPrimitive, WrappingAdd, WrappingMul, Zero};
use rayon::prelude::*;

use crate::config::{CompressionLevel, FactorMode, Monotonicity};
use crate::error::CodecError;
use crate::finisher::{Finisher, FinisherExt};
use crate::kernels::factor::{factor_of_differences, signed_differences};
use crate::kernels::leb128;
use crate::traits::{DeltaInteger, Granularity};

/// The output of one delta encoding: what the block header records plus the
/// finished body.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaParts<A> {
    pub anchor: A,
    /// `None` when the differences are stored unscaled.
    pub factor: Option<A>,
    /// The effective hint, `None` unless it was verified for the body.
    pub monotonicity: Monotonicity,
    pub body: Vec<u8>,
}

//==================================================================================
// 1. Factor & Hint Resolution
//==================================================================================

/// Resolves the factor the differences are divided by, in the signed domain.
fn resolve_factor<T: DeltaInteger + Granularity>(
    mode: FactorMode<T>,
    diffs: &[T::Signed],
) -> Result<Option<T::Signed>, CodecError> {
    match mode.normalized() {
        FactorMode::Absent => Ok(None),
        FactorMode::Auto => Ok(factor_of_differences(diffs)),
        FactorMode::Explicit(requested) => {
            if requested < T::zero() {
                return Err(CodecError::InvalidArgument(format!(
                    "Factor {:?} is negative",
                    requested
                )));
            }
            // Unsigned factors above the signed maximum cannot scale a
            // signed difference.
            let factor = requested.to_signed();
            if factor <= T::Signed::zero() {
                warn!(
                    "Factor {:?} exceeds the signed range of its type; block stored unscaled",
                    requested
                );
                return Ok(None);
            }
            if diffs.par_iter().all(|d| (*d % factor).is_zero()) {
                Ok(Some(factor))
            } else {
                warn!(
                    "Factor {:?} does not divide every difference; block stored unscaled",
                    requested
                );
                Ok(None)
            }
        }
    }
}

/// Returns the hint if every quotient agrees with it, `None` otherwise.
pub(crate) fn verify_hint<S>(hint: Monotonicity, quotients: &[S]) -> Monotonicity
where
    S: Signed + Copy + Send + Sync,
{
    let holds = match hint {
        Monotonicity::None => false,
        Monotonicity::NonDecreasing => quotients.par_iter().all(|q| !q.is_negative()),
        Monotonicity::NonIncreasing => quotients.par_iter().all(|q| !q.is_positive()),
    };
    if holds {
        hint
    } else {
        Monotonicity::None
    }
}

//==================================================================================
// 2. Encode
//==================================================================================

pub fn encode<T: DeltaInteger + Granularity>(
    values: &[T],
    factor: FactorMode<T>,
    hint: Monotonicity,
    finisher: &dyn Finisher,
    level: CompressionLevel,
) -> Result<DeltaParts<T>, CodecError> {
    let anchor = *values.first().ok_or_else(|| {
        CodecError::InvalidArgument("Cannot delta-encode an empty sequence".to_string())
    })?;

    let diffs = signed_differences(values);
    let factor = resolve_factor(factor, &diffs)?;
    let quotients: Vec<T::Signed> = match factor {
        Some(f) => diffs.par_iter().map(|d| *d / f).collect(),
        None => diffs,
    };

    let monotonicity = verify_hint(hint, &quotients);
    let body = match monotonicity {
        Monotonicity::None => finisher.encode_values(&quotients, level)?,
        Monotonicity::NonDecreasing | Monotonicity::NonIncreasing => {
            let magnitudes = quotients
                .iter()
                .map(|q| q.to_i64().map(i64::unsigned_abs))
                .collect::<Option<Vec<u64>>>()
                .ok_or_else(|| {
                    CodecError::InternalError("Quotient wider than 64 bits".to_string())
                })?;
            finisher.encode_bytes(&leb128::encode(&magnitudes)?, level)?
        }
    };

    Ok(DeltaParts {
        anchor,
        factor: factor.map(T::from_signed),
        monotonicity,
        body,
    })
}

//==================================================================================
// 3. Decode
//==================================================================================

fn read_quotients<S>(
    monotonicity: Monotonicity,
    expected: usize,
    body: &[u8],
    finisher: &dyn Finisher,
) -> Result<Vec<S>, CodecError>
where
    S: crate::types::FixedWidth + num_traits::NumCast,
{
    let quotients: Vec<S> = match monotonicity {
        Monotonicity::None => finisher.decode_values(body)?,
        Monotonicity::NonDecreasing | Monotonicity::NonIncreasing => {
            let negate = monotonicity == Monotonicity::NonIncreasing;
            leb128::decode::<u64>(&finisher.decode_bytes(body)?, expected)?
                .into_iter()
                .map(|m| {
                    let value = if negate { -i128::from(m) } else { i128::from(m) };
                    <S as num_traits::NumCast>::from(value).ok_or_else(|| {
                        CodecError::FrameFormatError(format!(
                            "Difference magnitude {} does not fit the block's type",
                            m
                        ))
                    })
                })
                .collect::<Result<_, _>>()?
        }
    };
    if quotients.len() != expected {
        return Err(CodecError::FrameFormatError(format!(
            "Block body holds {} differences, expected {}",
            quotients.len(),
            expected
        )));
    }
    Ok(quotients)
}

/// Rebuilds `len` values by accumulating the differences onto the anchor.
pub fn decode<T: DeltaInteger>(
    anchor: T,
    factor: Option<T>,
    monotonicity: Monotonicity,
    len: usize,
    body: &[u8],
    finisher: &dyn Finisher,
) -> Result<Vec<T>, CodecError> {
    if len == 0 {
        return Err(CodecError::FrameFormatError(
            "Block declares zero elements".to_string(),
        ));
    }
    let factor = match factor {
        Some(f) if f.to_signed() <= T::Signed::zero() => {
            return Err(CodecError::FrameFormatError(format!(
                "Stored factor {:?} is not positive",
                f
            )))
        }
        other => other.map(T::to_signed),
    };
    let quotients: Vec<T::Signed> = read_quotients(monotonicity, len - 1, body, finisher)?;

    let mut out = Vec::with_capacity(len);
    out.push(anchor);
    let mut current = anchor.to_signed();
    for q in quotients {
        let step = match factor {
            Some(f) => q.wrapping_mul(&f),
            None => q,
        };
        current = current.wrapping_add(&step);
        out.push(T::from_signed(current));
    }
    Ok(out)
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
