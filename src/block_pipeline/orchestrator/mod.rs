//! The block codec and its dispatch table.

pub mod core;

pub use self::core::Codec;
pub(crate) use self::core::build_worker_pool;
