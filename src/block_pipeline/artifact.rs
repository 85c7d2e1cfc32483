//! Defines the self-describing byte layout of a single block.
//! This module is the single source of truth for serialization, deserialization,
//! and metadata peeking of a block.
//!
//! ```text
//! [u8 kind][u8 finisher][u8 level][u8 monotonicity][u8 flags]
//! [u64 start][u32 len]
//! [anchor record]   if flags & HAS_ANCHOR
//! [factor record]   if flags & HAS_FACTOR
//! [u32 payload_len][payload]
//! ```
//!
//! All integers are little-endian; anchor and factor use the kind's
//! fixed-width record layout.

use std::io::{Cursor, Read};

use crate::config::{CompressionLevel, Monotonicity};
use crate::error::CodecError;
use crate::finisher::FinisherId;
use crate::transform::Element;
use crate::types::{DataKind, FixedWidth};

//==================================================================================
// Format Constants
//==================================================================================
/// kind(1) + finisher(1) + level(1) + monotonicity(1) + flags(1) + start(8) + len(4) + payload_len(4)
const MIN_BLOCK_SIZE: usize = 21;

const HAS_ANCHOR: u8 = 0b01;
const HAS_FACTOR: u8 = 0b10;

//==================================================================================
// Public Structs
//==================================================================================

/// The metadata of a serialized block, extracted by `peek_header` without
/// touching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub kind: DataKind,
    pub finisher: FinisherId,
    pub level: CompressionLevel,
    pub monotonicity: Monotonicity,
    pub has_anchor: bool,
    pub has_factor: bool,
    /// Offset of the block's first element in the whole sequence.
    pub start: u64,
    pub len: u32,
    /// Size of everything before the payload, in bytes.
    pub header_size: usize,
    pub payload_len: usize,
}

/// One block: a contiguous slice of the input plus what its transform
/// recorded about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T: Element> {
    /// Ordinal within the envelope. Not serialized; implied by position.
    pub index: usize,
    pub start: u64,
    pub len: u32,
    pub anchor: Option<T>,
    pub factor: Option<T::Factor>,
    /// Effective (verified) ordering of the differences.
    pub monotonicity: Monotonicity,
    pub level: CompressionLevel,
    pub finisher: FinisherId,
    pub payload: Vec<u8>,
}

//==================================================================================
// Core Implementation
//==================================================================================

impl<T: Element> Block<T> {
    /// An empty block awaiting its transform.
    pub fn new(
        index: usize,
        start: u64,
        len: u32,
        level: CompressionLevel,
        finisher: FinisherId,
    ) -> Self {
        Self {
            index,
            start,
            len,
            anchor: None,
            factor: None,
            monotonicity: Monotonicity::None,
            level,
            finisher,
            payload: Vec::new(),
        }
    }

    pub fn kind(&self) -> DataKind {
        T::KIND
    }

    /// The anchor, which delta-decoded kinds cannot do without.
    pub fn require_anchor(&self) -> Result<T, CodecError> {
        self.anchor.clone().ok_or_else(|| {
            CodecError::FrameFormatError(format!(
                "{} block {} has no anchor",
                T::KIND,
                self.index
            ))
        })
    }

    /// Serializes the block into its canonical byte layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let payload_len = u32::try_from(self.payload.len()).map_err(|_| {
            CodecError::InvalidArgument(format!(
                "Block payload of {} bytes exceeds the format limit",
                self.payload.len()
            ))
        })?;

        let mut flags = 0u8;
        if self.anchor.is_some() {
            flags |= HAS_ANCHOR;
        }
        if self.factor.is_some() {
            flags |= HAS_FACTOR;
        }

        let mut buf = Vec::with_capacity(
            MIN_BLOCK_SIZE + T::WIDTH + <T::Factor as FixedWidth>::WIDTH + self.payload.len(),
        );
        buf.extend_from_slice(&[
            T::KIND.tag(),
            self.finisher as u8,
            self.level as u8,
            self.monotonicity as u8,
            flags,
        ]);
        buf.extend_from_slice(&self.start.to_le_bytes());
        buf.extend_from_slice(&self.len.to_le_bytes());
        if let Some(anchor) = &self.anchor {
            anchor.write_le(&mut buf)?;
        }
        if let Some(factor) = &self.factor {
            factor.write_le(&mut buf)?;
        }
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }

    /// Parses a block of kind `T`. `bytes` must hold exactly one block.
    pub fn from_bytes(bytes: &[u8], index: usize) -> Result<Self, CodecError> {
        let header = peek_header(bytes)?;
        if header.kind != T::KIND {
            return Err(CodecError::KindMismatch {
                expected: T::KIND,
                found: header.kind,
            });
        }
        if header.header_size + header.payload_len != bytes.len() {
            return Err(CodecError::FrameFormatError(format!(
                "Block holds {} bytes, header declares {}",
                bytes.len(),
                header.header_size + header.payload_len
            )));
        }

        // Anchor and factor sit between the fixed fields and the payload length.
        let mut pos = MIN_BLOCK_SIZE - 4;
        let anchor = if header.has_anchor {
            let record = T::read_le(&bytes[pos..pos + T::WIDTH])?;
            pos += T::WIDTH;
            Some(record)
        } else {
            None
        };
        let factor = if header.has_factor {
            let width = <T::Factor as FixedWidth>::WIDTH;
            Some(<T::Factor as FixedWidth>::read_le(&bytes[pos..pos + width])?)
        } else {
            None
        };

        Ok(Self {
            index,
            start: header.start,
            len: header.len,
            anchor,
            factor,
            monotonicity: header.monotonicity,
            level: header.level,
            finisher: header.finisher,
            payload: bytes[header.header_size..].to_vec(),
        })
    }
}

/// Reads a block's metadata without parsing its anchor, factor or payload.
pub fn peek_header(bytes: &[u8]) -> Result<BlockHeader, CodecError> {
    if bytes.len() < MIN_BLOCK_SIZE {
        return Err(CodecError::FrameFormatError(format!(
            "Block is too small to be valid. Minimum size: {}, got: {}",
            MIN_BLOCK_SIZE,
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(bytes);
    let map_err = |e: std::io::Error| CodecError::FrameFormatError(e.to_string());

    let mut fixed = [0u8; 5];
    cursor.read_exact(&mut fixed).map_err(map_err)?;
    let [kind, finisher, level, monotonicity, flags] = fixed;
    let kind = DataKind::from_tag(kind)?;
    if flags & !(HAS_ANCHOR | HAS_FACTOR) != 0 {
        return Err(CodecError::FrameFormatError(format!(
            "Unknown block flags {:#04x}",
            flags
        )));
    }

    let mut u64_buf = [0u8; 8];
    cursor.read_exact(&mut u64_buf).map_err(map_err)?;
    let start = u64::from_le_bytes(u64_buf);

    let mut u32_buf = [0u8; 4];
    cursor.read_exact(&mut u32_buf).map_err(map_err)?;
    let len = u32::from_le_bytes(u32_buf);
    if len == 0 {
        return Err(CodecError::FrameFormatError(
            "Block declares zero elements".to_string(),
        ));
    }

    let has_anchor = flags & HAS_ANCHOR != 0;
    let has_factor = flags & HAS_FACTOR != 0;
    let mut skip = 0usize;
    if has_anchor {
        skip += kind.byte_width();
    }
    if has_factor {
        if kind.factor_width() == 0 {
            return Err(CodecError::FrameFormatError(format!(
                "{} blocks cannot carry a factor",
                kind
            )));
        }
        skip += kind.factor_width();
    }
    cursor.set_position(cursor.position() + skip as u64);

    cursor.read_exact(&mut u32_buf).map_err(map_err)?;
    let payload_len = u32::from_le_bytes(u32_buf) as usize;
    let header_size = cursor.position() as usize;

    // SECURITY: the declared payload must lie inside the buffer.
    if header_size.saturating_add(payload_len) > bytes.len() {
        return Err(CodecError::FrameFormatError(
            "Declared payload length exceeds buffer length.".into(),
        ));
    }

    Ok(BlockHeader {
        kind,
        finisher: FinisherId::from_tag(finisher)?,
        level: CompressionLevel::from_tag(level)?,
        monotonicity: Monotonicity::from_tag(monotonicity)?,
        has_anchor,
        has_factor,
        start,
        len,
        header_size,
        payload_len,
    })
}

//==================================================================================
// Unit Tests
//==================================================================================
