//! Conversions from Assimp C types to owned Rust values
//!
//! Math stays as plain arrays in the marshaled records; `glam` and `mint`
//! conversions are available behind their features.

use crate::sys;
use std::borrow::Cow;

/// Row-major 4x4 matrix as stored in [`Node::transformation`](crate::Node::transformation)
pub type Matrix4Rows = [[f32; 4]; 4];

pub const IDENTITY: Matrix4Rows = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Convert Assimp `aiString` to a UTF-8 string (lossy).
///
/// Assimp stores the length explicitly; do not assume the buffer is NUL-terminated.
#[inline]
pub fn ai_string_to_str(value: &sys::aiString) -> Cow<'_, str> {
    let len = (value.length as usize).min(value.data.len());
    if len == 0 {
        return Cow::Borrowed("");
    }
    let bytes = unsafe { std::slice::from_raw_parts(value.data.as_ptr() as *const u8, len) };
    String::from_utf8_lossy(bytes)
}

/// Convert Assimp `aiString` to an owned UTF-8 string (lossy).
#[inline]
pub fn ai_string_to_string(value: &sys::aiString) -> String {
    ai_string_to_str(value).into_owned()
}

/// Copy a NUL-terminated C string (lossy); `None` for null or empty.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for the call.
#[cfg(any(feature = "system", test))]
pub(crate) unsafe fn c_str_to_string(ptr: *const std::os::raw::c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let s = unsafe { std::ffi::CStr::from_ptr(ptr) }.to_string_lossy();
    (!s.is_empty()).then(|| s.into_owned())
}

/// Assimp matrices are row-major with `a1..a4` as the first row.
#[inline]
pub fn matrix_rows(m: &sys::aiMatrix4x4) -> Matrix4Rows {
    [
        [m.a1, m.a2, m.a3, m.a4],
        [m.b1, m.b2, m.b3, m.b4],
        [m.c1, m.c2, m.c3, m.c4],
        [m.d1, m.d2, m.d3, m.d4],
    ]
}

/// Convert row-major rows to a glam `Mat4` (which stores columns).
#[cfg(feature = "glam")]
#[inline]
pub fn rows_to_mat4(rows: &Matrix4Rows) -> glam::Mat4 {
    glam::Mat4::from_cols_array_2d(rows).transpose()
}

#[cfg(feature = "mint")]
#[inline]
pub fn rows_to_mint(rows: &Matrix4Rows) -> mint::RowMatrix4<f32> {
    (*rows).into()
}
