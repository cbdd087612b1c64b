//! The import pipeline
//!
//! One import is: check the path exists, call the library's import entry point,
//! validate the returned scene, run the mesh, material and node marshalers,
//! then release the foreign scene. The release happens in [`ForeignScene`]'s
//! `Drop`, so it runs exactly once on success, on every error and on panic.

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::{Error, Result},
    library::AssetLibrary,
    material::marshal_materials,
    mesh::marshal_meshes,
    node::marshal_node_tree,
    options::{ImportOptions, TextureSlots, UnknownKeyPolicy},
    postprocess::PostProcessSteps,
    scene::Scene,
    sys,
};

/// Serializes the import call and the read of the process-wide error string.
static IMPORT_LOCK: Mutex<()> = Mutex::new(());

/// Owns an imported `aiScene` until it is dropped
struct ForeignScene<'a, L: AssetLibrary + ?Sized> {
    library: &'a L,
    ptr: NonNull<sys::aiScene>,
}

impl<L: AssetLibrary + ?Sized> ForeignScene<'_, L> {
    fn scene(&self) -> &sys::aiScene {
        unsafe { self.ptr.as_ref() }
    }
}

impl<L: AssetLibrary + ?Sized> Drop for ForeignScene<'_, L> {
    fn drop(&mut self) {
        unsafe { self.library.release_import(self.ptr) }
    }
}

/// Entry point for imports against one [`AssetLibrary`]
///
/// ```no_run
/// # #[cfg(feature = "system")]
/// # fn main() -> assimp_marshal::Result<()> {
/// use assimp_marshal::{Importer, PostProcessSteps};
///
/// let scene = Importer::new()
///     .read_file("model.obj")
///     .with_post_process(PostProcessSteps::TRIANGULATE | PostProcessSteps::GEN_SMOOTH_NORMALS)
///     .import()?;
/// println!("{} meshes", scene.mesh_count());
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "system"))]
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct Importer<L: AssetLibrary> {
    library: Arc<L>,
    options: ImportOptions,
}

impl<L: AssetLibrary> Clone for Importer<L> {
    fn clone(&self) -> Self {
        Self {
            library: Arc::clone(&self.library),
            options: self.options.clone(),
        }
    }
}

#[cfg(feature = "system")]
impl Importer<crate::library::Assimp> {
    /// Importer backed by the linked Assimp
    pub fn new() -> Self {
        Self::with_library(crate::library::Assimp)
    }
}

#[cfg(feature = "system")]
impl Default for Importer<crate::library::Assimp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: AssetLibrary> Importer<L> {
    pub fn with_library(library: L) -> Self {
        Self::from_shared(Arc::new(library))
    }

    pub fn from_shared(library: Arc<L>) -> Self {
        Self {
            library,
            options: ImportOptions::default(),
        }
    }

    /// Default options for builders created by [`read_file`](Self::read_file)
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    /// Start building an import of `path`
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> ImportBuilder<'_, L> {
        ImportBuilder {
            importer: self,
            path: path.as_ref().to_path_buf(),
            options: self.options.clone(),
        }
    }

    /// Import with this importer's options
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> Result<Scene> {
        run_import(&*self.library, path.as_ref(), &self.options)
    }
}

#[cfg(feature = "tokio")]
impl<L: AssetLibrary + 'static> Importer<L> {
    /// [`import_file`](Self::import_file) on tokio's blocking pool
    pub async fn import_file_async<P: AsRef<Path>>(&self, path: P) -> Result<Scene> {
        spawn_import(
            Arc::clone(&self.library),
            path.as_ref().to_path_buf(),
            self.options.clone(),
        )
        .await
    }
}

/// Builder for configuring and executing one import
#[must_use = "call .import() to run the import"]
pub struct ImportBuilder<'a, L: AssetLibrary> {
    importer: &'a Importer<L>,
    path: PathBuf,
    options: ImportOptions,
}

impl<L: AssetLibrary> ImportBuilder<'_, L> {
    /// Set the post-processing steps to apply
    pub fn with_post_process(mut self, steps: PostProcessSteps) -> Self {
        self.options.post_process = steps;
        self
    }

    /// Add post-processing steps to the current set
    pub fn add_post_process(mut self, steps: PostProcessSteps) -> Self {
        self.options.post_process |= steps;
        self
    }

    pub fn with_node_hierarchy(mut self, enabled: bool) -> Self {
        self.options.node_hierarchy = enabled;
        self
    }

    pub fn with_texture_slots(mut self, slots: TextureSlots) -> Self {
        self.options.texture_slots = slots;
        self
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.options.unknown_keys = policy;
        self
    }

    pub fn with_decoupled_bitangents(mut self, enabled: bool) -> Self {
        self.options.decouple_bitangents = enabled;
        self
    }

    /// Replace every option at once
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn import(self) -> Result<Scene> {
        run_import(&*self.importer.library, &self.path, &self.options)
    }
}

#[cfg(feature = "tokio")]
impl<L: AssetLibrary + 'static> ImportBuilder<'_, L> {
    pub async fn import_async(self) -> Result<Scene> {
        spawn_import(Arc::clone(&self.importer.library), self.path, self.options).await
    }
}

#[cfg(feature = "tokio")]
async fn spawn_import<L: AssetLibrary + 'static>(
    library: Arc<L>,
    path: PathBuf,
    options: ImportOptions,
) -> Result<Scene> {
    tokio::task::spawn_blocking(move || run_import(&*library, &path, &options))
        .await
        .map_err(|e| Error::other(format!("import task failed: {e}")))?
}

/// Run the whole pipeline for one file.
pub(crate) fn run_import<L: AssetLibrary + ?Sized>(
    library: &L,
    path: &Path,
    options: &ImportOptions,
) -> Result<Scene> {
    let c_path = path_to_c_string(path)?;

    // Distinguish "no such file" from a generic import failure.
    std::fs::File::open(path).map_err(|source| Error::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    if let Err(e) = options.post_process.validate() {
        log::warn!("{e}; passing the flags to Assimp unchanged");
    }
    let flags = options.post_process.as_raw();
    log::debug!("importing '{}' with flags {flags:#010x}", path.display());

    let foreign = import_validated(library, &c_path, path, flags)?;
    let raw = foreign.scene();

    let meshes = marshal_meshes(raw, options)?;
    let materials = marshal_materials(library, raw, options)?;
    let root_node = if options.node_hierarchy {
        // Validation guarantees a root node.
        let root = unsafe { raw.mRootNode.as_ref() }
            .ok_or_else(|| Error::invalid_scene("scene has no root node"))?;
        Some(marshal_node_tree(root)?)
    } else {
        None
    };
    drop(foreign);

    log::debug!(
        "imported '{}': {} meshes, {} materials",
        path.display(),
        meshes.len(),
        materials.len()
    );

    Ok(Scene::new(
        meshes,
        materials,
        root_node,
        path.to_path_buf(),
        options.post_process,
    ))
}

/// Import under the global lock and reject unusable scenes.
///
/// The error string is read before the scene is released, while no other
/// import can overwrite it.
fn import_validated<'a, L: AssetLibrary + ?Sized>(
    library: &'a L,
    c_path: &CString,
    path: &Path,
    flags: u32,
) -> Result<ForeignScene<'a, L>> {
    let _lock = IMPORT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let Some(ptr) = NonNull::new(library.import_file(c_path, flags).cast_mut()) else {
        let message = last_error_or(library, "import returned no scene");
        log::warn!("import of '{}' failed: {message}", path.display());
        return Err(Error::ImportFailed {
            path: path.to_path_buf(),
            message,
        });
    };
    let foreign = ForeignScene { library, ptr };

    let scene = foreign.scene();
    if scene.mRootNode.is_null() {
        let message = last_error_or(library, "scene has no root node");
        log::warn!("import of '{}' failed: {message}", path.display());
        return Err(Error::ImportFailed {
            path: path.to_path_buf(),
            message,
        });
    }
    if scene.mFlags & sys::AI_SCENE_FLAGS_INCOMPLETE != 0 {
        let message = last_error_or(library, "scene flagged incomplete");
        log::warn!("import of '{}' is incomplete: {message}", path.display());
        return Err(Error::IncompleteScene {
            path: path.to_path_buf(),
            message,
        });
    }

    Ok(foreign)
}

fn last_error_or<L: AssetLibrary + ?Sized>(library: &L, fallback: &str) -> String {
    library
        .last_error()
        .unwrap_or_else(|| fallback.to_string())
}

fn path_to_c_string(path: &Path) -> Result<CString> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path
        .to_str()
        .ok_or_else(|| Error::invalid_parameter("path is not valid UTF-8"))?
        .as_bytes()
        .to_vec();

    CString::new(bytes).map_err(|_| Error::invalid_parameter("path contains a NUL byte"))
}
