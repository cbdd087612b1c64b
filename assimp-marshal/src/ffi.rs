//! Internal FFI helpers.
//!
//! These helpers centralize the pointer/length checks used when reading
//! Assimp-owned memory, and the fallible allocations used when copying it out.
//! Borrowed slices are tied to an "owner" reference (usually the foreign struct
//! they were read from) so callers cannot fabricate a longer lifetime.

use crate::error::{Error, Result};

/// Borrow a slice from a raw pointer and element count.
///
/// Returns an empty slice when `ptr` is null or `len == 0`.
///
/// # Safety
/// Callers must ensure the memory behind `ptr` is valid for `len` elements of `T`
/// for at least as long as `owner` is alive.
pub(crate) unsafe fn slice_from_ptr_len<O: ?Sized, T>(
    owner: &O,
    ptr: *const T,
    len: usize,
) -> &[T] {
    let _ = owner;
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // `from_raw_parts` requires `len * size_of::<T>() <= isize::MAX`.
        let elem_size = std::mem::size_of::<T>();
        if elem_size != 0 && len > (isize::MAX as usize) / elem_size {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(ptr, len) }
        }
    }
}

/// Allocate an empty vector able to hold `len` elements without reallocating.
pub(crate) fn try_with_capacity<T>(len: usize, what: &'static str) -> Result<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(Error::out_of_memory(what))?;
    Ok(out)
}

/// `a * b`, reported as an allocation failure when it overflows.
pub(crate) fn checked_len(a: usize, b: usize, what: &'static str) -> Result<usize> {
    a.checked_mul(b).ok_or(Error::OutOfMemory { what })
}
