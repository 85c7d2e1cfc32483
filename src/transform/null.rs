//! The identity transform. Values go to the finisher as fixed-width records;
//! no anchor, factor or ordering is recorded.
//!
//! It backs comparison codecs that measure a finisher on its own, and codecs
//! that do their own differencing before the finisher sees the bytes.

use super::{Element, Transform};
use crate::block_pipeline::artifact::Block;
use crate::config::{EncodeOptions, Monotonicity};
use crate::error::CodecError;
use crate::finisher::{Finisher, FinisherExt};
use crate::types::DataKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransform;

impl Transform for NullTransform {
    fn name(&self) -> &'static str {
        "null"
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
        block.anchor = None;
        block.factor = None;
        block.monotonicity = Monotonicity::None;
        block.payload = finisher.encode_values(values, options.level)?;
        Ok(())
    }

    fn decode<T: Element>(
        &self,
        block: &Block<T>,
        finisher: &dyn Finisher,
    ) -> Result<Vec<T>, CodecError> {
        let values: Vec<T> = finisher.decode_values(&block.payload)?;
        if values.len() != block.len as usize {
            return Err(CodecError::FrameFormatError(format!(
                "Block holds {} values, header declares {}",
                values.len(),
                block.len
            )));
        }
        Ok(values)
    }
}
