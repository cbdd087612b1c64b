//! Import configuration

use crate::material::TextureType;
use crate::postprocess::PostProcessSteps;

/// Which texture types the material marshaler queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureSlots {
    /// `NONE` through `REFLECTION`, plus `UNKNOWN`
    #[default]
    Classic,
    /// The classic set plus the PBR slots (base color through ambient occlusion)
    Extended,
}

impl TextureSlots {
    pub fn types(self) -> &'static [TextureType] {
        match self {
            Self::Classic => TextureType::CLASSIC,
            Self::Extended => TextureType::EXTENDED,
        }
    }
}

/// What to do with material keys missing from the canonical name table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnknownKeyPolicy {
    /// Store under `NONE`; later unknown keys overwrite earlier ones
    #[default]
    Sentinel,
    /// Store under the raw Assimp key (e.g. `$mat.gltf.alphaMode`).
    ///
    /// A raw key spelled [`TEXTURES_KEY`](crate::TEXTURES_KEY) would be
    /// shadowed by the texture map, so it is stored under
    /// [`NONE_KEY`](crate::NONE_KEY) instead.
    RawKey,
}

/// Options for one import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub post_process: PostProcessSteps,
    /// Marshal the node tree into [`Scene::root_node`](crate::Scene::root_node)
    pub node_hierarchy: bool,
    pub texture_slots: TextureSlots,
    pub unknown_keys: UnknownKeyPolicy,
    /// Copy bitangents whenever Assimp has them, instead of only when tangents
    /// are present too
    pub decouple_bitangents: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            post_process: PostProcessSteps::TRIANGULATE,
            node_hierarchy: true,
            texture_slots: TextureSlots::Classic,
            unknown_keys: UnknownKeyPolicy::Sentinel,
            decouple_bitangents: false,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post_process(mut self, steps: PostProcessSteps) -> Self {
        self.post_process = steps;
        self
    }

    pub fn add_post_process(mut self, steps: PostProcessSteps) -> Self {
        self.post_process |= steps;
        self
    }

    pub fn with_node_hierarchy(mut self, enabled: bool) -> Self {
        self.node_hierarchy = enabled;
        self
    }

    pub fn with_texture_slots(mut self, slots: TextureSlots) -> Self {
        self.texture_slots = slots;
        self
    }

    pub fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn with_decoupled_bitangents(mut self, enabled: bool) -> Self {
        self.decouple_bitangents = enabled;
        self
    }
}
