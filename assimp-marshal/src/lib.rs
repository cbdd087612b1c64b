//! # assimp-marshal
//!
//! Import 3D scenes with Assimp and copy them into plain, owned Rust values.
//!
//! An import walks Assimp's `aiScene` once and produces a [`Scene`] of
//! [`Mesh`]es (flat `f32`/`u32` buffers), [`Material`]s (properties keyed by
//! canonical name plus texture paths) and a [`Node`] tree. The foreign scene
//! is released before the result is returned; nothing in a [`Scene`] points
//! into Assimp memory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "system")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use assimp_marshal::{import_file, process};
//!
//! let scene = import_file("model.obj", process::TRIANGULATE | process::GEN_SMOOTH_NORMALS)?;
//! for mesh in scene.meshes() {
//!     println!("{}: {} triangles", mesh.name(), mesh.face_count());
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "system"))]
//! # fn main() {}
//! ```
//!
//! ## Architecture
//!
//! This crate is built on `assimp-marshal-sys`, which declares the C structs
//! and, with the `system` feature, links Assimp. All foreign calls go through
//! the [`AssetLibrary`] trait, so any provider of `aiScene` memory can drive
//! the same pipeline.

#![deny(unsafe_op_in_unsafe_fn)]

pub use assimp_marshal_sys as sys;

pub use crate::{
    error::{Error, ErrorKind, Result},
    importer::{ImportBuilder, Importer},
    library::AssetLibrary,
    logging::{LogCrateStream, LogLevel, LogStream, MemoryLogStream},
    material::{
        Material, MaterialEntry, NONE_KEY, PropertyValue, TEXTURES_KEY, TextureType, canonical_name,
        texture_type,
    },
    mesh::{Mesh, VertexBuffer},
    node::Node,
    options::{ImportOptions, TextureSlots, UnknownKeyPolicy},
    postprocess::{PostProcessSteps, process},
    scene::Scene,
};

#[cfg(feature = "system")]
pub use crate::library::Assimp;
#[cfg(feature = "system")]
pub use crate::logging::Logger;

pub mod error;
pub mod importer;
pub mod library;
pub mod logging;
pub mod material;
pub mod mesh;
pub mod node;
pub mod options;
pub mod postprocess;
pub mod scene;
pub mod types;

mod ffi;

/// Import `path` with the raw post-processing mask `flags`
///
/// Uses the default [`ImportOptions`] otherwise: node hierarchy on, classic
/// texture slots, unknown material keys collapsed to `NONE`.
#[cfg(feature = "system")]
pub fn import_file<P: AsRef<std::path::Path>>(path: P, flags: u32) -> Result<Scene> {
    Importer::new()
        .read_file(path)
        .with_post_process(PostProcessSteps::from_bits_retain(flags))
        .import()
}

/// Version information
pub mod version {
    /// Version of this crate
    pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Version of the linked Assimp, `major.minor.revision`
    #[cfg(feature = "system")]
    pub fn assimp_version() -> String {
        let (major, minor, revision) = unsafe {
            (
                crate::sys::aiGetVersionMajor(),
                crate::sys::aiGetVersionMinor(),
                crate::sys::aiGetVersionRevision(),
            )
        };
        format!("{major}.{minor}.{revision}")
    }

    #[cfg(feature = "system")]
    pub fn assimp_version_major() -> u32 {
        unsafe { crate::sys::aiGetVersionMajor() }
    }
}
