//! Shared, low-level byte/slice conversions used by the bit-level kernels.

use crate::error::CodecError;

/// Copies a byte slice into an owned, correctly aligned vector of `T`.
///
/// Finisher output has no alignment guarantee, so a zero-copy cast is not
/// possible in general; each element is read unaligned.
///
/// # Errors
/// Returns a `CodecError::BufferMismatch` if the byte slice length is not
/// perfectly divisible by the size of the target type `T`.
pub fn bytes_to_typed_vec<T>(bytes: &[u8]) -> Result<Vec<T>, CodecError>
where
    T: bytemuck::Pod,
{
    let width = std::mem::size_of::<T>();
    if bytes.len() % width != 0 {
        return Err(CodecError::BufferMismatch(bytes.len(), width));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

/// Converts a slice of plain-old-data values into a `Vec<u8>` in native
/// (little-endian on every supported target) byte order.
pub fn typed_slice_to_bytes<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}
