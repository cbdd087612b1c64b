//! Post-processing flags passed to the importer
//!
//! [`PostProcessSteps`] is the typed form; [`process`] re-exports the same
//! bits as plain `u32` constants for callers that build the mask by hand and
//! pass it to [`import_file`](crate::import_file).

use crate::error::{Error, Result};
use crate::sys;
use bitflags::bitflags;

bitflags! {
    /// Post-processing steps Assimp applies before the scene is marshaled
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcessSteps: u32 {
        const CALC_TANGENT_SPACE = sys::aiPostProcessSteps_aiProcess_CalcTangentSpace;
        const JOIN_IDENTICAL_VERTICES = sys::aiPostProcessSteps_aiProcess_JoinIdenticalVertices;
        const MAKE_LEFT_HANDED = sys::aiPostProcessSteps_aiProcess_MakeLeftHanded;
        /// Split every polygon into triangles. Marshaling requires triangle faces.
        const TRIANGULATE = sys::aiPostProcessSteps_aiProcess_Triangulate;
        const REMOVE_COMPONENT = sys::aiPostProcessSteps_aiProcess_RemoveComponent;
        const GEN_NORMALS = sys::aiPostProcessSteps_aiProcess_GenNormals;
        const GEN_SMOOTH_NORMALS = sys::aiPostProcessSteps_aiProcess_GenSmoothNormals;
        const SPLIT_LARGE_MESHES = sys::aiPostProcessSteps_aiProcess_SplitLargeMeshes;
        /// Bake node transforms into vertices and flatten the node graph.
        const PRE_TRANSFORM_VERTICES = sys::aiPostProcessSteps_aiProcess_PreTransformVertices;
        const LIMIT_BONE_WEIGHTS = sys::aiPostProcessSteps_aiProcess_LimitBoneWeights;
        const VALIDATE_DATA_STRUCTURE = sys::aiPostProcessSteps_aiProcess_ValidateDataStructure;
        const IMPROVE_CACHE_LOCALITY = sys::aiPostProcessSteps_aiProcess_ImproveCacheLocality;
        const REMOVE_REDUNDANT_MATERIALS = sys::aiPostProcessSteps_aiProcess_RemoveRedundantMaterials;
        const FIX_INFACING_NORMALS = sys::aiPostProcessSteps_aiProcess_FixInfacingNormals;
        const POPULATE_ARMATURE_DATA = sys::aiPostProcessSteps_aiProcess_PopulateArmatureData;
        /// Split meshes by primitive type (points, lines, triangles).
        const SORT_BY_PTYPE = sys::aiPostProcessSteps_aiProcess_SortByPType;
        const FIND_DEGENERATES = sys::aiPostProcessSteps_aiProcess_FindDegenerates;
        const FIND_INVALID_DATA = sys::aiPostProcessSteps_aiProcess_FindInvalidData;
        const GEN_UV_COORDS = sys::aiPostProcessSteps_aiProcess_GenUVCoords;
        const TRANSFORM_UV_COORDS = sys::aiPostProcessSteps_aiProcess_TransformUVCoords;
        const FIND_INSTANCES = sys::aiPostProcessSteps_aiProcess_FindInstances;
        const OPTIMIZE_MESHES = sys::aiPostProcessSteps_aiProcess_OptimizeMeshes;
        const OPTIMIZE_GRAPH = sys::aiPostProcessSteps_aiProcess_OptimizeGraph;
        const FLIP_UVS = sys::aiPostProcessSteps_aiProcess_FlipUVs;
        const FLIP_WINDING_ORDER = sys::aiPostProcessSteps_aiProcess_FlipWindingOrder;
        const SPLIT_BY_BONE_COUNT = sys::aiPostProcessSteps_aiProcess_SplitByBoneCount;
        const DEBONE = sys::aiPostProcessSteps_aiProcess_Debone;
        const GLOBAL_SCALE = sys::aiPostProcessSteps_aiProcess_GlobalScale;
        const EMBED_TEXTURES = sys::aiPostProcessSteps_aiProcess_EmbedTextures;
        const FORCE_GEN_NORMALS = sys::aiPostProcessSteps_aiProcess_ForceGenNormals;
        const DROP_NORMALS = sys::aiPostProcessSteps_aiProcess_DropNormals;
        const GEN_BOUNDING_BOXES = sys::aiPostProcessSteps_aiProcess_GenBoundingBoxes;
    }
}

impl PostProcessSteps {
    /// Get the raw value for use with the C API
    pub fn as_raw(self) -> u32 {
        self.bits()
    }

    /// Create from a raw mask; bits Assimp does not define are dropped
    pub fn from_raw(value: u32) -> Self {
        Self::from_bits_truncate(value)
    }

    /// Reject combinations that contradict each other
    pub fn validate(&self) -> Result<()> {
        if self.contains(Self::GEN_SMOOTH_NORMALS | Self::GEN_NORMALS) {
            return Err(Error::invalid_parameter(
                "GEN_SMOOTH_NORMALS and GEN_NORMALS are incompatible",
            ));
        }

        if self.contains(Self::OPTIMIZE_GRAPH | Self::PRE_TRANSFORM_VERTICES) {
            return Err(Error::invalid_parameter(
                "OPTIMIZE_GRAPH and PRE_TRANSFORM_VERTICES are incompatible",
            ));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Triangulation plus vertex welding, the usual choice for GPU upload
    pub const REALTIME: Self = Self::from_bits_truncate(
        Self::TRIANGULATE.bits()
            | Self::JOIN_IDENTICAL_VERTICES.bits()
            | Self::SORT_BY_PTYPE.bits()
            | Self::GEN_SMOOTH_NORMALS.bits()
            | Self::IMPROVE_CACHE_LOCALITY.bits(),
    );
}

impl Default for PostProcessSteps {
    fn default() -> Self {
        Self::TRIANGULATE
    }
}

/// Raw post-processing bits, identical to Assimp's `aiProcess_*` values
pub mod process {
    use crate::sys;

    pub const CALC_TANGENT_SPACE: u32 = sys::aiPostProcessSteps_aiProcess_CalcTangentSpace;
    pub const JOIN_IDENTICAL_VERTICES: u32 = sys::aiPostProcessSteps_aiProcess_JoinIdenticalVertices;
    pub const MAKE_LEFT_HANDED: u32 = sys::aiPostProcessSteps_aiProcess_MakeLeftHanded;
    pub const TRIANGULATE: u32 = sys::aiPostProcessSteps_aiProcess_Triangulate;
    pub const REMOVE_COMPONENT: u32 = sys::aiPostProcessSteps_aiProcess_RemoveComponent;
    pub const GEN_NORMALS: u32 = sys::aiPostProcessSteps_aiProcess_GenNormals;
    pub const GEN_SMOOTH_NORMALS: u32 = sys::aiPostProcessSteps_aiProcess_GenSmoothNormals;
    pub const SPLIT_LARGE_MESHES: u32 = sys::aiPostProcessSteps_aiProcess_SplitLargeMeshes;
    pub const PRE_TRANSFORM_VERTICES: u32 = sys::aiPostProcessSteps_aiProcess_PreTransformVertices;
    pub const LIMIT_BONE_WEIGHTS: u32 = sys::aiPostProcessSteps_aiProcess_LimitBoneWeights;
    pub const VALIDATE_DATA_STRUCTURE: u32 = sys::aiPostProcessSteps_aiProcess_ValidateDataStructure;
    pub const IMPROVE_CACHE_LOCALITY: u32 = sys::aiPostProcessSteps_aiProcess_ImproveCacheLocality;
    pub const REMOVE_REDUNDANT_MATERIALS: u32 =
        sys::aiPostProcessSteps_aiProcess_RemoveRedundantMaterials;
    pub const FIX_INFACING_NORMALS: u32 = sys::aiPostProcessSteps_aiProcess_FixInfacingNormals;
    pub const POPULATE_ARMATURE_DATA: u32 = sys::aiPostProcessSteps_aiProcess_PopulateArmatureData;
    pub const SORT_BY_PTYPE: u32 = sys::aiPostProcessSteps_aiProcess_SortByPType;
    pub const FIND_DEGENERATES: u32 = sys::aiPostProcessSteps_aiProcess_FindDegenerates;
    pub const FIND_INVALID_DATA: u32 = sys::aiPostProcessSteps_aiProcess_FindInvalidData;
    pub const GEN_UV_COORDS: u32 = sys::aiPostProcessSteps_aiProcess_GenUVCoords;
    pub const TRANSFORM_UV_COORDS: u32 = sys::aiPostProcessSteps_aiProcess_TransformUVCoords;
    pub const FIND_INSTANCES: u32 = sys::aiPostProcessSteps_aiProcess_FindInstances;
    pub const OPTIMIZE_MESHES: u32 = sys::aiPostProcessSteps_aiProcess_OptimizeMeshes;
    pub const OPTIMIZE_GRAPH: u32 = sys::aiPostProcessSteps_aiProcess_OptimizeGraph;
    pub const FLIP_UVS: u32 = sys::aiPostProcessSteps_aiProcess_FlipUVs;
    pub const FLIP_WINDING_ORDER: u32 = sys::aiPostProcessSteps_aiProcess_FlipWindingOrder;
    pub const SPLIT_BY_BONE_COUNT: u32 = sys::aiPostProcessSteps_aiProcess_SplitByBoneCount;
    pub const DEBONE: u32 = sys::aiPostProcessSteps_aiProcess_Debone;
    pub const GLOBAL_SCALE: u32 = sys::aiPostProcessSteps_aiProcess_GlobalScale;
    pub const EMBED_TEXTURES: u32 = sys::aiPostProcessSteps_aiProcess_EmbedTextures;
    pub const FORCE_GEN_NORMALS: u32 = sys::aiPostProcessSteps_aiProcess_ForceGenNormals;
    pub const DROP_NORMALS: u32 = sys::aiPostProcessSteps_aiProcess_DropNormals;
    pub const GEN_BOUNDING_BOXES: u32 = sys::aiPostProcessSteps_aiProcess_GenBoundingBoxes;
}
