//! Transforms turn a block's values into the bytes its finisher receives.
//!
//! `Transform` methods are generic over `Element`, so a transform is written
//! once and monomorphized per kind. The codec asks `supports` while building
//! its dispatch table; a kind the transform declines never gets an entry.

pub mod delta;
pub mod element;
pub mod null;

use crate::block_pipeline::artifact::Block;
use crate::config::EncodeOptions;
use crate::error::CodecError;
use crate::finisher::Finisher;
use crate::types::DataKind;

pub use self::delta::DeltaTransform;
pub use self::element::Element;
pub use self::null::NullTransform;

pub trait Transform: Send + Sync + 'static {
    /// Stable name, part of the codec's magic number.
    fn name(&self) -> &'static str;

    fn supports(&self, kind: DataKind) -> bool;

    /// Fills `block` from `values`, which are exactly the block's slice.
    fn encode<T: Element>(
        &self,
        values: &[T],
        block: &mut Block<T>,
        options: &EncodeOptions<T::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError>;

    fn decode<T: Element>(
        &self,
        block: &Block<T>,
        finisher: &dyn Finisher,
    ) -> Result<Vec<T>, CodecError>;
}
