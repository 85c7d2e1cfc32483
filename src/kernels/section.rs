//! Length-prefixed sections for composite block bodies.
//!
//! A composite body is a run of `[u32 len][len bytes]` sections followed by a
//! kind-specific tail. Lengths are little-endian.

use crate::error::CodecError;

pub(crate) fn truncated(what: &str) -> CodecError {
    CodecError::FrameFormatError(format!("Truncated {}", what))
}

pub(crate) fn length_prefix(len: usize) -> Result<[u8; 4], CodecError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| CodecError::InvalidArgument(format!("Section of {} bytes is too large", len)))
}

/// Appends `[u32 len][bytes]` to `out`.
pub(crate) fn push_prefixed(out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), CodecError> {
    out.extend_from_slice(&length_prefix(bytes.len())?);
    out.extend_from_slice(bytes);
    Ok(())
}

/// Splits `[u32 len][len bytes]` off the front of `bytes`.
pub(crate) fn split_prefixed<'a>(
    bytes: &'a [u8],
    what: &str,
) -> Result<(&'a [u8], &'a [u8]), CodecError> {
    let (len, rest) = bytes
        .split_first_chunk::<4>()
        .ok_or_else(|| truncated(what))?;
    let len = u32::from_le_bytes(*len) as usize;
    if rest.len() < len {
        return Err(truncated(what));
    }
    Ok(rest.split_at(len))
}
