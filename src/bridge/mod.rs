// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the convenience surface of the deltablock library. Callers that
// need a specific transform/finisher pairing build a `Codec` directly; everyone
// else goes through the stateless functions here, which own one default
// delta+zstd codec and the format-level helpers.
//
// Data Flow (Encoding):
//
//   1. [Stateless API (encode)]                -> Receives `&Sequence`
//         |
//         `-> calls the default codec's `encode_sequence` ->
//
//   2. [Block Engine (block_pipeline::orchestrator)] -> Returns `Result<Vec<u8>>` (an envelope)
//
//
// Data Flow (Inspection):
//
//   1. [Stateless API (analyze)]               -> Receives `&[u8]` (an envelope)
//         |
//         `-> a. Reads the magic and splits the blocks (`block_pipeline::envelope`)
//         |
//         `-> b. Peeks every block header (`block_pipeline::artifact`)
//         |
//         `-> c. Returns `EnvelopeStats`; no payload is decoded
//
// ====================================================================================
pub mod format;
pub mod stateless_api;

// --- Format Identity and Analysis Structs ---
pub use format::{codec_magic, BlockStats, EnvelopeStats};

// --- Stateless API ---
pub use stateless_api::{analyze, decode, default_codec, encode};
