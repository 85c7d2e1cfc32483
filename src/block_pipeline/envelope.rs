//! The outer envelope, the only persisted format:
//!
//! ```text
//! [i32 magic][i32 block_count]{ [i32 block_len][block_len bytes] } x block_count
//! ```
//!
//! All integers are little-endian. Block contents are opaque here.

use std::io::{Cursor, Read};

use crate::error::CodecError;

/// magic(4) + block_count(4)
pub const ENVELOPE_HEADER_SIZE: usize = 8;

fn to_i32(value: usize, what: &str) -> Result<i32, CodecError> {
    i32::try_from(value).map_err(|_| {
        CodecError::InvalidArgument(format!("{} {} exceeds the envelope limit", what, value))
    })
}

/// Assembles an envelope from serialized blocks in index order.
pub fn write(magic: i32, blocks: &[Vec<u8>]) -> Result<Vec<u8>, CodecError> {
    let total = ENVELOPE_HEADER_SIZE + blocks.iter().map(|b| 4 + b.len()).sum::<usize>();
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&magic.to_le_bytes());
    buf.extend_from_slice(&to_i32(blocks.len(), "Block count")?.to_le_bytes());
    for block in blocks {
        buf.extend_from_slice(&to_i32(block.len(), "Block length")?.to_le_bytes());
        buf.extend_from_slice(block);
    }
    Ok(buf)
}

/// Reads only the magic number.
pub fn peek_magic(bytes: &[u8]) -> Result<i32, CodecError> {
    let magic = bytes.first_chunk::<4>().ok_or_else(|| {
        CodecError::FrameFormatError(format!(
            "Envelope is too small to be valid. Minimum size: {}, got: {}",
            ENVELOPE_HEADER_SIZE,
            bytes.len()
        ))
    })?;
    Ok(i32::from_le_bytes(*magic))
}

/// Splits an envelope into its block byte ranges after checking the magic.
pub fn read(bytes: &[u8], expected_magic: i32) -> Result<Vec<&[u8]>, CodecError> {
    if bytes.len() < ENVELOPE_HEADER_SIZE {
        return Err(CodecError::FrameFormatError(format!(
            "Envelope is too small to be valid. Minimum size: {}, got: {}",
            ENVELOPE_HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(bytes);
    let map_err = |e: std::io::Error| CodecError::FrameFormatError(e.to_string());
    let mut i32_buf = [0u8; 4];

    cursor.read_exact(&mut i32_buf).map_err(map_err)?;
    let found = i32::from_le_bytes(i32_buf);
    if found != expected_magic {
        return Err(CodecError::FormatMismatch {
            expected: expected_magic,
            found,
        });
    }

    cursor.read_exact(&mut i32_buf).map_err(map_err)?;
    let block_count = i32::from_le_bytes(i32_buf);
    if block_count <= 0 {
        return Err(CodecError::FrameFormatError(format!(
            "Envelope declares {} blocks",
            block_count
        )));
    }
    let block_count = block_count as usize;

    // SECURITY: every block needs at least its length prefix.
    let remaining = bytes.len() - ENVELOPE_HEADER_SIZE;
    if block_count > remaining / 4 {
        return Err(CodecError::FrameFormatError(format!(
            "Envelope declares {} blocks but holds only {} bytes",
            block_count, remaining
        )));
    }

    let mut blocks = Vec::with_capacity(block_count);
    for index in 0..block_count {
        cursor.read_exact(&mut i32_buf).map_err(map_err)?;
        let len = i32::from_le_bytes(i32_buf);
        let start = cursor.position() as usize;
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                CodecError::FrameFormatError(format!(
                    "Block {} declares length {} past the end of the envelope",
                    index, len
                ))
            })?;
        blocks.push(&bytes[start..end]);
        cursor.set_position(end as u64);
    }

    if cursor.position() as usize != bytes.len() {
        return Err(CodecError::FrameFormatError(
            "Trailing bytes after the last block".to_string(),
        ));
    }
    Ok(blocks)
}
