//! The marshaled scene

use std::path::{Path, PathBuf};

use crate::{material::Material, mesh::Mesh, node::Node, postprocess::PostProcessSteps};

/// Everything copied out of one Assimp import
///
/// A `Scene` owns all of its data; the foreign scene it was built from has
/// already been released by the time the caller sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    root_node: Option<Node>,
    source_path: PathBuf,
    post_process: PostProcessSteps,
}

impl Scene {
    pub(crate) fn new(
        meshes: Vec<Mesh>,
        materials: Vec<Material>,
        root_node: Option<Node>,
        source_path: PathBuf,
        post_process: PostProcessSteps,
    ) -> Self {
        Self {
            meshes,
            materials,
            root_node,
            source_path,
            post_process,
        }
    }

    /// Meshes in Assimp's order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Materials in Assimp's order; [`Mesh::material_index`] points here
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Root of the node tree; `None` when the hierarchy was not requested
    pub fn root_node(&self) -> Option<&Node> {
        self.root_node.as_ref()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Material used by `mesh`, if its index is in range
    pub fn material_for(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials.get(mesh.material_index())
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.root_node.as_ref()?.find(name)
    }

    /// The path that was imported
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The post-processing steps Assimp was asked to run
    pub fn post_process(&self) -> PostProcessSteps {
        self.post_process
    }

    pub fn into_parts(self) -> (Vec<Mesh>, Vec<Material>, Option<Node>) {
        (self.meshes, self.materials, self.root_node)
    }
}
