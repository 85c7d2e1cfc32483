//! The dynamically-typed sequence used by the kind-dispatched codec API.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::types::DataKind;

/// An ordered list of values of one primitive kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Sequence {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boolean(Vec<bool>),
    Decimal(Vec<Decimal>),
    Timestamp(Vec<DateTime<Utc>>),
    Duration(Vec<TimeDelta>),
    TimestampOffset(Vec<DateTime<FixedOffset>>),
}

macro_rules! for_each_variant {
    ($self:expr, $values:ident => $body:expr) => {
        match $self {
            Sequence::Int8($values) => $body,
            Sequence::Int16($values) => $body,
            Sequence::Int32($values) => $body,
            Sequence::Int64($values) => $body,
            Sequence::UInt8($values) => $body,
            Sequence::UInt16($values) => $body,
            Sequence::UInt32($values) => $body,
            Sequence::UInt64($values) => $body,
            Sequence::Float32($values) => $body,
            Sequence::Float64($values) => $body,
            Sequence::Boolean($values) => $body,
            Sequence::Decimal($values) => $body,
            Sequence::Timestamp($values) => $body,
            Sequence::Duration($values) => $body,
            Sequence::TimestampOffset($values) => $body,
        }
    };
}

impl Sequence {
    pub fn kind(&self) -> DataKind {
        match self {
            Sequence::Int8(_) => DataKind::Int8,
            Sequence::Int16(_) => DataKind::Int16,
            Sequence::Int32(_) => DataKind::Int32,
            Sequence::Int64(_) => DataKind::Int64,
            Sequence::UInt8(_) => DataKind::UInt8,
            Sequence::UInt16(_) => DataKind::UInt16,
            Sequence::UInt32(_) => DataKind::UInt32,
            Sequence::UInt64(_) => DataKind::UInt64,
            Sequence::Float32(_) => DataKind::Float32,
            Sequence::Float64(_) => DataKind::Float64,
            Sequence::Boolean(_) => DataKind::Boolean,
            Sequence::Decimal(_) => DataKind::Decimal,
            Sequence::Timestamp(_) => DataKind::Timestamp,
            Sequence::Duration(_) => DataKind::Duration,
            Sequence::TimestampOffset(_) => DataKind::TimestampOffset,
        }
    }

    pub fn len(&self) -> usize {
        for_each_variant!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The size of the sequence in its fixed-width record layout.
    pub fn raw_size(&self) -> usize {
        self.len() * self.kind().byte_width()
    }
}
