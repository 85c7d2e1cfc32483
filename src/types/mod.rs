//! This module defines the core, strongly-typed data representations used
//! throughout the deltablock pipeline.
//!
//! It includes the canonical `DataKind` enum, the fixed-width record layout of
//! every kind, and the dynamically-typed `Sequence`.

pub mod data_kind;
pub mod record;
pub mod sequence;

// Re-export the main type(s) for easier access.
pub use data_kind::DataKind;
pub use record::{read_records, write_records, FixedWidth, NoFactor};
pub use sequence::Sequence;
