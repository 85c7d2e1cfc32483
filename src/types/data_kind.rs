//! This module defines the canonical, type-safe identifier of every primitive
//! kind a sequence can hold.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, internal identifier of a primitive kind.
///
/// The discriminants are part of the block header format and must never be
/// renumbered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DataKind {
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    UInt8 = 5,
    UInt16 = 6,
    UInt32 = 7,
    UInt64 = 8,
    Float32 = 9,
    Float64 = 10,
    Boolean = 11,
    Decimal = 12,
    Timestamp = 13,
    Duration = 14,
    TimestampOffset = 15,
}

impl DataKind {
    /// Every supported kind, in header-tag order.
    pub const ALL: [DataKind; 15] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Boolean,
        Self::Decimal,
        Self::Timestamp,
        Self::Duration,
        Self::TimestampOffset,
    ];

    /// Parses the one-byte tag stored in a block header.
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| *kind as u8 == tag)
            .ok_or_else(|| CodecError::UnsupportedType(format!("Unknown kind tag {}", tag)))
    }

    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// The width in bytes of one fixed-width record of this kind, as written
    /// by the finishers.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Boolean => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::Timestamp | Self::Duration => 8,
            Self::TimestampOffset => 10,
            Self::Decimal => 16,
        }
    }

    /// The number of information bits per value. Booleans count as one bit,
    /// which is what the delta path packs them to.
    pub fn bit_count(&self) -> usize {
        match self {
            Self::Boolean => 1,
            other => other.byte_width() * 8,
        }
    }

    /// Width of the factor record a block header carries for this kind. Kinds
    /// that are never scaled have none.
    pub fn factor_width(&self) -> usize {
        match self {
            Self::Float32 | Self::Float64 | Self::Boolean => 0,
            Self::Timestamp | Self::Duration | Self::TimestampOffset => 8,
            other => other.byte_width(),
        }
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` if the data type is an unsigned integer.
    pub fn is_unsigned_int(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Returns `true` for the kinds built on a tick count.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Timestamp | Self::Duration | Self::TimestampOffset
        )
    }
}

/// Provides the canonical string representation for a `DataKind`.
impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
