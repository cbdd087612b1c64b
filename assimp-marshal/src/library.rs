//! The foreign library seam
//!
//! The marshaling core never calls Assimp directly. It goes through
//! [`AssetLibrary`], which covers exactly the entry points the pipeline needs:
//! import, last-error retrieval, release, the material property getters and the
//! texture queries. [`Assimp`] (feature `system`) forwards to the linked C API.

use std::ffi::CStr;
use std::ptr::NonNull;

use crate::sys;

/// Provider of `aiScene` memory and the accessors the marshalers use on it
///
/// Implementations must be shareable across threads; the importer serializes
/// the import call and error capture itself.
pub trait AssetLibrary: Send + Sync {
    /// `aiImportFile`: returns null on failure
    fn import_file(&self, path: &CStr, flags: u32) -> *const sys::aiScene;

    /// `aiGetErrorString`: the process-wide error left by the most recent call
    fn last_error(&self) -> Option<String>;

    /// `aiReleaseImport`
    ///
    /// # Safety
    /// `scene` must come from [`import_file`](Self::import_file) on this library
    /// and must not be used or released again afterwards.
    unsafe fn release_import(&self, scene: NonNull<sys::aiScene>);

    /// `aiGetMaterialString`
    fn material_string(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
    ) -> Option<String>;

    /// `aiGetMaterialFloatArray`: fills `out` and returns the element count written
    fn material_floats(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [f32],
    ) -> Option<usize>;

    /// `aiGetMaterialIntegerArray`: fills `out` and returns the element count written
    fn material_integers(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [i32],
    ) -> Option<usize>;

    /// `aiGetMaterialTextureCount`
    fn texture_count(&self, material: &sys::aiMaterial, texture_type: u32) -> u32;

    /// `aiGetMaterialTexture`, path only
    fn texture_path(&self, material: &sys::aiMaterial, texture_type: u32, index: u32)
    -> Option<String>;
}

/// The linked Assimp C library
#[cfg(feature = "system")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Assimp;

#[cfg(feature = "system")]
impl Assimp {
    /// Whether Assimp has an importer for `extension` (with or without the dot)
    pub fn is_extension_supported(&self, extension: &str) -> bool {
        let ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{extension}")
        };
        let Ok(c_ext) = std::ffi::CString::new(ext) else {
            return false;
        };
        unsafe { sys::aiIsExtensionSupported(c_ext.as_ptr()) != sys::AI_FALSE }
    }
}

#[cfg(feature = "system")]
impl AssetLibrary for Assimp {
    fn import_file(&self, path: &CStr, flags: u32) -> *const sys::aiScene {
        unsafe { sys::aiImportFile(path.as_ptr(), flags) }
    }

    fn last_error(&self) -> Option<String> {
        unsafe { crate::types::c_str_to_string(sys::aiGetErrorString()) }
    }

    unsafe fn release_import(&self, scene: NonNull<sys::aiScene>) {
        unsafe { sys::aiReleaseImport(scene.as_ptr()) }
    }

    fn material_string(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
    ) -> Option<String> {
        let mut out = sys::aiString::default();
        let ret =
            unsafe { sys::aiGetMaterialString(material, key.as_ptr(), semantic, index, &mut out) };
        (ret == sys::aiReturn_aiReturn_SUCCESS).then(|| crate::types::ai_string_to_string(&out))
    }

    fn material_floats(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [f32],
    ) -> Option<usize> {
        let mut max = u32::try_from(out.len()).ok()?;
        let ret = unsafe {
            sys::aiGetMaterialFloatArray(
                material,
                key.as_ptr(),
                semantic,
                index,
                out.as_mut_ptr(),
                &mut max,
            )
        };
        (ret == sys::aiReturn_aiReturn_SUCCESS).then(|| (max as usize).min(out.len()))
    }

    fn material_integers(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [i32],
    ) -> Option<usize> {
        let mut max = u32::try_from(out.len()).ok()?;
        let ret = unsafe {
            sys::aiGetMaterialIntegerArray(
                material,
                key.as_ptr(),
                semantic,
                index,
                out.as_mut_ptr(),
                &mut max,
            )
        };
        (ret == sys::aiReturn_aiReturn_SUCCESS).then(|| (max as usize).min(out.len()))
    }

    fn texture_count(&self, material: &sys::aiMaterial, texture_type: u32) -> u32 {
        unsafe { sys::aiGetMaterialTextureCount(material, texture_type) }
    }

    fn texture_path(
        &self,
        material: &sys::aiMaterial,
        texture_type: u32,
        index: u32,
    ) -> Option<String> {
        let mut path = sys::aiString::default();
        let ret = unsafe {
            sys::aiGetMaterialTexture(
                material,
                texture_type,
                index,
                &mut path,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        (ret == sys::aiReturn_aiReturn_SUCCESS).then(|| crate::types::ai_string_to_string(&path))
    }
}
