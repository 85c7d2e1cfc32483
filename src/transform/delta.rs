//! The delta transform: anchor, differences and an optional factor, handed
//! to the finisher. The per-kind work lives in the `Element` impls.

use super::{Element, Transform};
use crate::block_pipeline::artifact::Block;
use crate::config::EncodeOptions;
use crate::error::CodecError;
use crate::finisher::Finisher;
use crate::types::DataKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaTransform;

impl Transform for DeltaTransform {
    fn name(&self) -> &'static str {
        "delta"
    }

    fn supports(&self, _kind: DataKind) -> bool {
        true
    }

    fn encode<T: Element>(
        &self,
        values: &[T],
        block: &mut Block<T>,
        options: &EncodeOptions<T::Factor>,
        finisher: &dyn Finisher,
    ) -> Result<(), CodecError> {
        T::delta_encode(values, block, options, finisher)
    }

    fn decode<T: Element>(
        &self,
        block: &Block<T>,
        finisher: &dyn Finisher,
    ) -> Result<Vec<T>, CodecError> {
        T::delta_decode(block, finisher)
    }
}
