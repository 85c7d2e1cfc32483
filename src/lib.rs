//! This file is the root of the `deltablock` Rust crate.
//!
//! deltablock compresses ordered sequences of primitive values: each sequence is
//! split into blocks, every block is delta-encoded against its first value
//! (optionally scaled by a common factor), and the result is handed to a
//! pluggable byte compressor. Blocks are processed in parallel and framed in a
//! self-describing envelope.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`block_pipeline`,
//!     `kernels`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod block_pipeline;
pub mod bridge;
pub mod config;
pub mod error;
pub mod finisher;
pub mod kernels;
pub mod traits;
pub mod transform;
pub mod types;

mod utils;

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 2. Public API
//==================================================================================
pub use block_pipeline::{Codec, PredictorCodec, SequenceCodec};
pub use config::{
    CodecConfig, CompressionLevel, EncodeOptions, FactorMode, Monotonicity, SequenceOptions,
};
pub use error::CodecError;
pub use finisher::{
    DeflateFinisher, Finisher, FinisherId, Lz4Finisher, StoredFinisher, ZlibFinisher,
    ZstdFinisher,
};
pub use transform::{DeltaTransform, Element, NullTransform, Transform};
pub use types::{DataKind, Sequence};
