//! Delta encoding for `Decimal` sequences.
//!
//! Decimal arithmetic is checked: a difference or a reconstruction that leaves
//! the 96-bit mantissa range is an error rather than a silent wrap. Quotients
//! are whole numbers by construction and are stored as 16-byte decimal records.
//!
//! Decimal addition widens to the larger scale, so accumulation alone would
//! lose each value's own scale. The body therefore carries the scales too:
//!
//! ```text
//! [u32 quotient_body_len][quotient body][scale section]
//!
//! scale section, shared:   [u8 1][u8 scale]
//! scale section, mixed:    [u8 0][finished body of one u8 scale per value]
//! ```

use log::warn;
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::config::{CompressionLevel, FactorMode, Monotonicity};
use crate::error::CodecError;
use crate::finisher::{Finisher, FinisherExt};
use crate::kernels::delta::DeltaParts;
use crate::kernels::factor::decimal_factor_of_differences;
use crate::kernels::section::{push_prefixed, split_prefixed, truncated};

const SHARED_SCALE: u8 = 1;
const MIXED_SCALES: u8 = 0;
const MAX_SCALE: u8 = 28;

fn differences(values: &[Decimal]) -> Result<Vec<Decimal>, CodecError> {
    values
        .par_windows(2)
        .map(|w| {
            w[1].checked_sub(w[0]).ok_or_else(|| {
                CodecError::InvalidArgument(format!(
                    "Difference {} - {} overflows the decimal range",
                    w[1], w[0]
                ))
            })
        })
        .collect()
}

fn divides_all(factor: Decimal, diffs: &[Decimal]) -> bool {
    diffs
        .par_iter()
        .all(|d| d.checked_rem(factor).is_some_and(|r| r.is_zero()))
}

fn resolve_factor(
    mode: FactorMode<Decimal>,
    diffs: &[Decimal],
) -> Result<Option<Decimal>, CodecError> {
    match mode.normalized() {
        FactorMode::Absent => Ok(None),
        FactorMode::Auto => Ok(decimal_factor_of_differences(diffs)),
        FactorMode::Explicit(requested) => {
            if requested.is_sign_negative() {
                return Err(CodecError::InvalidArgument(format!(
                    "Factor {} is negative",
                    requested
                )));
            }
            if divides_all(requested, diffs) {
                Ok(Some(requested))
            } else {
                warn!(
                    "Factor {} does not divide every difference; block stored unscaled",
                    requested
                );
                Ok(None)
            }
        }
    }
}

pub fn encode(
    values: &[Decimal],
    factor: FactorMode<Decimal>,
    finisher: &dyn Finisher,
    level: CompressionLevel,
) -> Result<DeltaParts<Decimal>, CodecError> {
    let anchor = *values.first().ok_or_else(|| {
        CodecError::InvalidArgument("Cannot delta-encode an empty sequence".to_string())
    })?;
    let diffs = differences(values)?;
    let factor = resolve_factor(factor, &diffs)?;

    let quotients: Vec<Decimal> = match factor {
        Some(f) => diffs
            .par_iter()
            .map(|d| {
                d.checked_div(f).map(|q| q.normalize()).ok_or_else(|| {
                    CodecError::InternalError(format!("{} / {} is not representable", d, f))
                })
            })
            .collect::<Result<_, _>>()?,
        None => diffs,
    };

    let mut body = Vec::new();
    push_prefixed(&mut body, &finisher.encode_values(&quotients, level)?)?;
    encode_scales(values, finisher, level, &mut body)?;

    Ok(DeltaParts {
        anchor,
        factor,
        monotonicity: Monotonicity::None,
        body,
    })
}

pub fn decode(
    anchor: Decimal,
    factor: Option<Decimal>,
    len: usize,
    body: &[u8],
    finisher: &dyn Finisher,
) -> Result<Vec<Decimal>, CodecError> {
    if len == 0 {
        return Err(CodecError::FrameFormatError(
            "Block declares zero elements".to_string(),
        ));
    }
    let (quotient_body, scale_section) = split_prefixed(body, "decimal quotient body")?;
    let quotients: Vec<Decimal> = finisher.decode_values(quotient_body)?;
    if quotients.len() != len - 1 {
        return Err(CodecError::FrameFormatError(format!(
            "Block body holds {} differences, expected {}",
            quotients.len(),
            len - 1
        )));
    }

    let scales = decode_scales(scale_section, len, finisher)?;

    let overflow = || CodecError::FrameFormatError("Decimal reconstruction overflowed".to_string());
    let mut out = Vec::with_capacity(len);
    let mut current = anchor;
    out.push(current);
    for q in quotients {
        let step = match factor {
            Some(f) => q.checked_mul(f).ok_or_else(overflow)?,
            None => q,
        };
        current = current.checked_add(step).ok_or_else(overflow)?;
        out.push(current);
    }
    for (value, scale) in out.iter_mut().zip(scales) {
        value.rescale(u32::from(scale));
    }
    Ok(out)
}

//==================================================================================
// Scale Section
//==================================================================================

fn encode_scales(
    values: &[Decimal],
    finisher: &dyn Finisher,
    level: CompressionLevel,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    // Scales never exceed 28, so the narrowing is lossless.
    let scales: Vec<u8> = values.iter().map(|v| v.scale() as u8).collect();
    match scales.split_first() {
        Some((&first, rest)) if rest.iter().all(|s| *s == first) => {
            out.extend_from_slice(&[SHARED_SCALE, first]);
        }
        _ => {
            out.push(MIXED_SCALES);
            out.extend_from_slice(&finisher.encode_bytes(&scales, level)?);
        }
    }
    Ok(())
}

fn decode_scales(
    section: &[u8],
    len: usize,
    finisher: &dyn Finisher,
) -> Result<Vec<u8>, CodecError> {
    let (&tag, rest) = section
        .split_first()
        .ok_or_else(|| truncated("scale section"))?;
    let scales = match (tag, rest) {
        (SHARED_SCALE, [scale]) => vec![*scale; len],
        (SHARED_SCALE, _) => {
            return Err(CodecError::FrameFormatError(
                "Shared scale section must hold exactly one byte".to_string(),
            ))
        }
        (MIXED_SCALES, body) => finisher.decode_bytes(body)?,
        (other, _) => {
            return Err(CodecError::FrameFormatError(format!(
                "Unknown scale section tag {}",
                other
            )))
        }
    };
    if scales.len() != len {
        return Err(CodecError::FrameFormatError(format!(
            "Scale section holds {} scales, expected {}",
            scales.len(),
            len
        )));
    }
    if let Some(bad) = scales.iter().find(|s| **s > MAX_SCALE) {
        return Err(CodecError::FrameFormatError(format!(
            "Decimal scale {} exceeds {}",
            bad, MAX_SCALE
        )));
    }
    Ok(scales)
}
