//! Error handling for scene import and marshaling

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing and marshaling a scene
///
/// Every variant aborts the whole import: there is no partial [`Scene`](crate::Scene).
#[derive(Error, Debug)]
pub enum Error {
    /// The input path could not be opened; Assimp was never called
    #[error("File not found or unreadable: '{}'", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Assimp returned no scene, or a scene without a root node
    #[error("Assimp error loading '{}': {message}", path.display())]
    ImportFailed { path: PathBuf, message: String },

    /// Assimp flagged the scene as incomplete
    #[error("Assimp returned an incomplete scene for '{}': {message}", path.display())]
    IncompleteScene { path: PathBuf, message: String },

    /// A face is not a triangle; flat index buffers require triangulated input
    #[error(
        "mesh {mesh} face {face} has {indices} indices; import assumes triangulated faces (enable TRIANGULATE)"
    )]
    NonTriangularFace { mesh: usize, face: usize, indices: u32 },

    /// Memory allocation failed
    #[error("Memory allocation failed while copying {what}")]
    OutOfMemory { what: &'static str },

    /// A texture path could not be fetched
    #[error("material {material}: failed to fetch texture path (type {texture_type}, index {index})")]
    TexturePath {
        material: usize,
        texture_type: u32,
        index: u32,
    },

    /// Invalid scene data
    #[error("Invalid scene: {message}")]
    InvalidScene { message: String },

    /// Generic error with custom message
    #[error("{message}")]
    Other { message: String },
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input, reported before the foreign library is invoked
    Input,
    /// Assimp failed or produced an unusable scene
    Import,
    /// A face violated the flat-triangle precondition
    Topology,
    /// An allocation failed
    Allocation,
    /// A texture path fetch failed
    Texture,
    /// Any other value could not be constructed
    Value,
}

impl Error {
    /// Create a new invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a new invalid scene error
    pub fn invalid_scene<S: Into<String>>(message: S) -> Self {
        Self::InvalidScene {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub(crate) fn out_of_memory(what: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |_| Self::OutOfMemory { what }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } | Self::InvalidParameter { .. } => ErrorKind::Input,
            Self::ImportFailed { .. } | Self::IncompleteScene { .. } => ErrorKind::Import,
            Self::NonTriangularFace { .. } => ErrorKind::Topology,
            Self::OutOfMemory { .. } => ErrorKind::Allocation,
            Self::TexturePath { .. } => ErrorKind::Texture,
            Self::InvalidScene { .. } | Self::Other { .. } => ErrorKind::Value,
        }
    }
}
