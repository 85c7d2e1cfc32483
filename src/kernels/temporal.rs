//! Tick conversions and the composite layout for timestamps with offsets.
//!
//! Timestamps and durations are delta-encoded as i64 tick counts through the
//! integer kernel. A timestamp-with-offset block carries two components:
//!
//! ```text
//! [u32 tick_body_len][tick body][offset section]
//!
//! offset section, shared:   [u8 1][i16 minutes]
//! offset section, mixed:    [u8 0][i16 anchor][u32 body_len][nested delta body]
//! ```
//!
//! The nested body is an unscaled delta encoding of the i16 offsets.

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use rayon::prelude::*;

use crate::config::{CompressionLevel, FactorMode, Monotonicity};
use crate::error::CodecError;
use crate::finisher::Finisher;
use crate::kernels::delta::{self, DeltaParts};
use crate::kernels::section::{push_prefixed, split_prefixed, truncated};
use crate::types::record::{duration_ticks, offset_from_minutes, offset_minutes, timestamp_ticks};

const SHARED_OFFSET: u8 = 1;
const MIXED_OFFSETS: u8 = 0;

//==================================================================================
// 1. Tick Conversions
//==================================================================================

pub fn timestamp_ticks_of<Tz>(values: &[DateTime<Tz>]) -> Result<Vec<i64>, CodecError>
where
    Tz: TimeZone,
    DateTime<Tz>: Sync,
{
    values.par_iter().map(timestamp_ticks).collect()
}

pub fn duration_ticks_of(values: &[TimeDelta]) -> Result<Vec<i64>, CodecError> {
    values.par_iter().map(duration_ticks).collect()
}

/// Expresses a temporal factor as a tick count.
pub fn tick_factor(mode: FactorMode<TimeDelta>) -> Result<FactorMode<i64>, CodecError> {
    Ok(match mode {
        FactorMode::Absent => FactorMode::Absent,
        FactorMode::Auto => FactorMode::Auto,
        FactorMode::Explicit(step) => FactorMode::Explicit(duration_ticks(&step)?),
    })
}

//==================================================================================
// 2. Offset Section
//==================================================================================

fn encode_offsets(
    offsets: &[i16],
    finisher: &dyn Finisher,
    level: CompressionLevel,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let first = *offsets.first().ok_or_else(|| {
        CodecError::InvalidArgument("Cannot encode an empty offset column".to_string())
    })?;
    if offsets.iter().all(|o| *o == first) {
        out.push(SHARED_OFFSET);
        out.extend_from_slice(&first.to_le_bytes());
        return Ok(());
    }

    let nested = delta::encode(
        offsets,
        FactorMode::Absent,
        Monotonicity::None,
        finisher,
        level,
    )?;
    out.push(MIXED_OFFSETS);
    out.extend_from_slice(&nested.anchor.to_le_bytes());
    push_prefixed(out, &nested.body)
}

fn decode_offsets(
    section: &[u8],
    len: usize,
    finisher: &dyn Finisher,
) -> Result<Vec<i16>, CodecError> {
    let (&tag, rest) = section
        .split_first()
        .ok_or_else(|| truncated("offset section"))?;
    let (anchor, rest) = rest
        .split_first_chunk::<2>()
        .ok_or_else(|| truncated("offset anchor"))?;
    let anchor = i16::from_le_bytes(*anchor);

    match tag {
        SHARED_OFFSET if rest.is_empty() => Ok(vec![anchor; len]),
        SHARED_OFFSET => Err(CodecError::FrameFormatError(
            "Trailing bytes after shared offset".to_string(),
        )),
        MIXED_OFFSETS => {
            let (body, trailing) = split_prefixed(rest, "nested offset body")?;
            if !trailing.is_empty() {
                return Err(CodecError::FrameFormatError(
                    "Trailing bytes after nested offset body".to_string(),
                ));
            }
            delta::decode(anchor, None, Monotonicity::None, len, body, finisher)
        }
        other => Err(CodecError::FrameFormatError(format!(
            "Unknown offset section tag {}",
            other
        ))),
    }
}

//==================================================================================
// 3. Timestamps With Offsets
//==================================================================================

/// Encodes the tick component and the offset component of each value. The
/// returned anchor and factor are tick counts.
pub fn encode_with_offsets(
    values: &[DateTime<FixedOffset>],
    factor: FactorMode<TimeDelta>,
    hint: Monotonicity,
    finisher: &dyn Finisher,
    level: CompressionLevel,
) -> Result<DeltaParts<i64>, CodecError> {
    let ticks = timestamp_ticks_of(values)?;
    let offsets = values
        .iter()
        .map(|v| offset_minutes(v.offset()))
        .collect::<Result<Vec<i16>, _>>()?;

    let tick_parts = delta::encode(&ticks, tick_factor(factor)?, hint, finisher, level)?;

    let mut body = Vec::with_capacity(tick_parts.body.len() + 8);
    push_prefixed(&mut body, &tick_parts.body)?;
    encode_offsets(&offsets, finisher, level, &mut body)?;

    Ok(DeltaParts { body, ..tick_parts })
}

pub fn decode_with_offsets(
    anchor_ticks: i64,
    factor_ticks: Option<i64>,
    monotonicity: Monotonicity,
    len: usize,
    body: &[u8],
    finisher: &dyn Finisher,
) -> Result<Vec<DateTime<FixedOffset>>, CodecError> {
    let (tick_body, offset_section) = split_prefixed(body, "tick body")?;
    let ticks = delta::decode(anchor_ticks, factor_ticks, monotonicity, len, tick_body, finisher)?;
    let offsets = decode_offsets(offset_section, len, finisher)?;

    ticks
        .into_iter()
        .zip(offsets)
        .map(|(tick, minutes)| offset_from_minutes(minutes).map(|o| o.timestamp_nanos(tick)))
        .collect()
}
