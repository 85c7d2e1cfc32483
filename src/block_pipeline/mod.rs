//! This module holds the block-parallel engine: splitting a sequence into
//! blocks, running a codec over each one on a worker pool, and framing the
//! results in the envelope.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// The serialized block and its header.
pub mod artifact;

/// The `[magic][count]{[len][bytes]}` frame around the blocks.
pub mod envelope;

/// The "General Contractor": fans blocks out to the transform and finisher.
pub mod orchestrator;

/// Splits a sequence into contiguous block ranges.
pub mod partition;

pub mod predictor;
pub mod traits;

#[cfg(test)]
mod orchestrator_tests;

//==================================================================================
// 2. Public API
//==================================================================================

pub use self::artifact::{peek_header, Block, BlockHeader};
pub use self::orchestrator::Codec;
pub use self::predictor::{PredictedFloat, PredictorCodec};
pub use self::traits::SequenceCodec;
