//! Material records and the material marshaler
//!
//! Assimp stores a material as an untyped property list. Each property is
//! re-fetched through the library's typed getters, stored under a canonical
//! name (see [`canonical_name`]) and shaped into a [`PropertyValue`]. Texture
//! paths are collected separately into the `TEXTURES` entry.

use std::collections::BTreeMap;
use std::ffi::CString;

use crate::{
    error::{Error, Result},
    ffi::{slice_from_ptr_len, try_with_capacity},
    library::AssetLibrary,
    options::{ImportOptions, UnknownKeyPolicy},
    sys,
    types::ai_string_to_str,
};

/// Key under which a material exposes its texture map
pub const TEXTURES_KEY: &str = "TEXTURES";
/// Canonical name for keys missing from the table
pub const NONE_KEY: &str = "NONE";

/// Minimum buffer handed to the numeric getters
const MIN_FETCH_CAPACITY: usize = 16;

/// Map a raw Assimp material key to its canonical name.
pub fn canonical_name(key: &str) -> Option<&'static str> {
    Some(match key {
        "?mat.name" => "NAME",
        "$mat.twosided" => "TWOSIDED",
        "$mat.shadingm" => "SHADING_MODEL",
        "$mat.wireframe" => "ENABLE_WIREFRAME",
        "$mat.blend" => "BLEND_FUNC",
        "$mat.opacity" => "OPACITY",
        "$mat.bumpscaling" => "BUMPSCALING",
        "$mat.shininess" => "SHININESS",
        "$mat.reflectivity" => "REFLECTIVITY",
        "$mat.shinpercent" => "SHININESS_STRENGTH",
        "$mat.refracti" => "REFRACTI",
        "$clr.diffuse" => "COLOR_DIFFUSE",
        "$clr.ambient" => "COLOR_AMBIENT",
        "$clr.specular" => "COLOR_SPECULAR",
        "$clr.emissive" => "COLOR_EMISSIVE",
        "$clr.transparent" => "COLOR_TRANSPARENT",
        "$clr.reflective" => "COLOR_REFLECTIVE",
        "?bg.global" => "GLOBAL_BACKGROUND_IMAGE",
        "$tex.file" => "TEXTURE_BASE",
        "$tex.mapping" => "MAPPING_BASE",
        "$tex.flags" => "TEXFLAGS_BASE",
        "$tex.uvwsrc" => "UVWSRC_BASE",
        "$tex.mapmodeu" => "MAPPINGMODE_U_BASE",
        "$tex.mapmodev" => "MAPPINGMODE_V_BASE",
        "$tex.mapaxis" => "TEXMAP_AXIS_BASE",
        "$tex.blend" => "TEXBLEND_BASE",
        "$tex.uvtrafo" => "UVTRANSFORM_BASE",
        "$tex.op" => "TEXOP_BASE",
        _ => return None,
    })
}

/// A shaped material property value
///
/// Single-element numeric arrays become scalars, longer ones lists.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Float(f32),
    FloatList(Vec<f32>),
    Integer(i32),
    IntegerList(Vec<i32>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats as a slice, whether stored as a scalar or a list
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(std::slice::from_ref(v)),
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[i32]> {
        match self {
            Self::Integer(v) => Some(std::slice::from_ref(v)),
            Self::IntegerList(v) => Some(v),
            _ => None,
        }
    }

    fn floats(mut values: Vec<f32>) -> Self {
        if values.len() == 1 {
            Self::Float(values[0])
        } else {
            values.shrink_to_fit();
            Self::FloatList(values)
        }
    }

    fn integers(mut values: Vec<i32>) -> Self {
        if values.len() == 1 {
            Self::Integer(values[0])
        } else {
            values.shrink_to_fit();
            Self::IntegerList(values)
        }
    }
}

/// Texture slots Assimp distinguishes
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureType {
    None = sys::aiTextureType_aiTextureType_NONE,
    Diffuse = sys::aiTextureType_aiTextureType_DIFFUSE,
    Specular = sys::aiTextureType_aiTextureType_SPECULAR,
    Ambient = sys::aiTextureType_aiTextureType_AMBIENT,
    Emissive = sys::aiTextureType_aiTextureType_EMISSIVE,
    Height = sys::aiTextureType_aiTextureType_HEIGHT,
    Normals = sys::aiTextureType_aiTextureType_NORMALS,
    Shininess = sys::aiTextureType_aiTextureType_SHININESS,
    Opacity = sys::aiTextureType_aiTextureType_OPACITY,
    Displacement = sys::aiTextureType_aiTextureType_DISPLACEMENT,
    Lightmap = sys::aiTextureType_aiTextureType_LIGHTMAP,
    Reflection = sys::aiTextureType_aiTextureType_REFLECTION,
    BaseColor = sys::aiTextureType_aiTextureType_BASE_COLOR,
    NormalCamera = sys::aiTextureType_aiTextureType_NORMAL_CAMERA,
    EmissionColor = sys::aiTextureType_aiTextureType_EMISSION_COLOR,
    Metalness = sys::aiTextureType_aiTextureType_METALNESS,
    DiffuseRoughness = sys::aiTextureType_aiTextureType_DIFFUSE_ROUGHNESS,
    AmbientOcclusion = sys::aiTextureType_aiTextureType_AMBIENT_OCCLUSION,
    Unknown = sys::aiTextureType_aiTextureType_UNKNOWN,
}

impl TextureType {
    /// The thirteen legacy slots, `None` through `Reflection` plus `Unknown`
    pub const CLASSIC: &'static [TextureType] = &[
        Self::None,
        Self::Diffuse,
        Self::Specular,
        Self::Ambient,
        Self::Emissive,
        Self::Height,
        Self::Normals,
        Self::Shininess,
        Self::Opacity,
        Self::Displacement,
        Self::Lightmap,
        Self::Reflection,
        Self::Unknown,
    ];

    /// The legacy slots followed by the PBR slots
    pub const EXTENDED: &'static [TextureType] = &[
        Self::None,
        Self::Diffuse,
        Self::Specular,
        Self::Ambient,
        Self::Emissive,
        Self::Height,
        Self::Normals,
        Self::Shininess,
        Self::Opacity,
        Self::Displacement,
        Self::Lightmap,
        Self::Reflection,
        Self::BaseColor,
        Self::NormalCamera,
        Self::EmissionColor,
        Self::Metalness,
        Self::DiffuseRoughness,
        Self::AmbientOcclusion,
        Self::Unknown,
    ];

    pub fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn from_raw(value: u32) -> Option<Self> {
        Self::EXTENDED.iter().copied().find(|t| t.as_raw() == value)
    }

    /// Upper-case name, as used by the `texture_type` constants
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Diffuse => "DIFFUSE",
            Self::Specular => "SPECULAR",
            Self::Ambient => "AMBIENT",
            Self::Emissive => "EMISSIVE",
            Self::Height => "HEIGHT",
            Self::Normals => "NORMALS",
            Self::Shininess => "SHININESS",
            Self::Opacity => "OPACITY",
            Self::Displacement => "DISPLACEMENT",
            Self::Lightmap => "LIGHTMAP",
            Self::Reflection => "REFLECTION",
            Self::BaseColor => "BASE_COLOR",
            Self::NormalCamera => "NORMAL_CAMERA",
            Self::EmissionColor => "EMISSION_COLOR",
            Self::Metalness => "METALNESS",
            Self::DiffuseRoughness => "DIFFUSE_ROUGHNESS",
            Self::AmbientOcclusion => "AMBIENT_OCCLUSION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TextureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw texture type values, identical to Assimp's `aiTextureType_*`
pub mod texture_type {
    use crate::sys;

    pub const NONE: u32 = sys::aiTextureType_aiTextureType_NONE;
    pub const DIFFUSE: u32 = sys::aiTextureType_aiTextureType_DIFFUSE;
    pub const SPECULAR: u32 = sys::aiTextureType_aiTextureType_SPECULAR;
    pub const AMBIENT: u32 = sys::aiTextureType_aiTextureType_AMBIENT;
    pub const EMISSIVE: u32 = sys::aiTextureType_aiTextureType_EMISSIVE;
    pub const HEIGHT: u32 = sys::aiTextureType_aiTextureType_HEIGHT;
    pub const NORMALS: u32 = sys::aiTextureType_aiTextureType_NORMALS;
    pub const SHININESS: u32 = sys::aiTextureType_aiTextureType_SHININESS;
    pub const OPACITY: u32 = sys::aiTextureType_aiTextureType_OPACITY;
    pub const DISPLACEMENT: u32 = sys::aiTextureType_aiTextureType_DISPLACEMENT;
    pub const LIGHTMAP: u32 = sys::aiTextureType_aiTextureType_LIGHTMAP;
    pub const REFLECTION: u32 = sys::aiTextureType_aiTextureType_REFLECTION;
    pub const BASE_COLOR: u32 = sys::aiTextureType_aiTextureType_BASE_COLOR;
    pub const NORMAL_CAMERA: u32 = sys::aiTextureType_aiTextureType_NORMAL_CAMERA;
    pub const EMISSION_COLOR: u32 = sys::aiTextureType_aiTextureType_EMISSION_COLOR;
    pub const METALNESS: u32 = sys::aiTextureType_aiTextureType_METALNESS;
    pub const DIFFUSE_ROUGHNESS: u32 = sys::aiTextureType_aiTextureType_DIFFUSE_ROUGHNESS;
    pub const AMBIENT_OCCLUSION: u32 = sys::aiTextureType_aiTextureType_AMBIENT_OCCLUSION;
    pub const UNKNOWN: u32 = sys::aiTextureType_aiTextureType_UNKNOWN;
}

/// One entry of a material, looked up by key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialEntry<'a> {
    Property(&'a PropertyValue),
    Textures(&'a BTreeMap<TextureType, Vec<String>>),
}

/// A material's properties keyed by canonical name, plus its texture paths
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    properties: Vec<(String, PropertyValue)>,
    textures: BTreeMap<TextureType, Vec<String>>,
}

impl Material {
    /// Material name (`NAME`), if it has one
    pub fn name(&self) -> Option<&str> {
        self.get("NAME").and_then(PropertyValue::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Property or, for [`TEXTURES_KEY`], the texture map
    pub fn entry(&self, key: &str) -> Option<MaterialEntry<'_>> {
        if key == TEXTURES_KEY {
            return Some(MaterialEntry::Textures(&self.textures));
        }
        self.get(key).map(MaterialEntry::Property)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        key == TEXTURES_KEY || self.get(key).is_some()
    }

    /// Property keys in first-seen order, then [`TEXTURES_KEY`]
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties
            .iter()
            .map(|(k, _)| k.as_str())
            .chain(std::iter::once(TEXTURES_KEY))
    }

    pub fn properties(&self) -> impl ExactSizeIterator<Item = (&str, &PropertyValue)> + '_ {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties, not counting `TEXTURES`
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn textures(&self) -> &BTreeMap<TextureType, Vec<String>> {
        &self.textures
    }

    pub fn texture_paths(&self, texture_type: TextureType) -> &[String] {
        self.textures
            .get(&texture_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Later values replace earlier ones but keep the original position.
    fn insert(&mut self, key: String, value: PropertyValue) {
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                log::debug!("material property '{key}' replaced by a later property");
                slot.1 = value;
            }
            None => self.properties.push((key, value)),
        }
    }
}

/// Copy every material of `scene`, in order.
pub(crate) fn marshal_materials<L: AssetLibrary + ?Sized>(
    library: &L,
    scene: &sys::aiScene,
    options: &ImportOptions,
) -> Result<Vec<Material>> {
    let count = scene.mNumMaterials as usize;
    if count > 0 && scene.mMaterials.is_null() {
        return Err(Error::invalid_scene(format!(
            "scene reports {count} materials but has no material array"
        )));
    }
    let ptrs =
        unsafe { slice_from_ptr_len(scene, scene.mMaterials as *const *mut sys::aiMaterial, count) };

    let mut materials = try_with_capacity(ptrs.len(), "material list")?;
    for (index, &ptr) in ptrs.iter().enumerate() {
        let material = unsafe { ptr.as_ref() }
            .ok_or_else(|| Error::invalid_scene(format!("material {index} is null")))?;
        materials.push(marshal_material(library, index, material, options)?);
    }
    Ok(materials)
}

fn marshal_material<L: AssetLibrary + ?Sized>(
    library: &L,
    index: usize,
    material: &sys::aiMaterial,
    options: &ImportOptions,
) -> Result<Material> {
    let mut out = Material::default();

    let props = unsafe {
        slice_from_ptr_len(
            material,
            material.mProperties as *const *mut sys::aiMaterialProperty,
            material.mNumProperties as usize,
        )
    };
    for &ptr in props {
        let Some(prop) = (unsafe { ptr.as_ref() }) else {
            log::debug!("material {index}: skipping null property slot");
            continue;
        };
        let raw_key = ai_string_to_str(&prop.mKey);
        let key = match (canonical_name(&raw_key), options.unknown_keys) {
            (Some(name), _) => name.to_string(),
            (None, UnknownKeyPolicy::Sentinel) => NONE_KEY.to_string(),
            (None, UnknownKeyPolicy::RawKey) if raw_key == TEXTURES_KEY => {
                log::debug!(
                    "material {index}: raw key '{TEXTURES_KEY}' is reserved, storing under '{NONE_KEY}'"
                );
                NONE_KEY.to_string()
            }
            (None, UnknownKeyPolicy::RawKey) => raw_key.to_string(),
        };
        match fetch_property(library, material, prop)? {
            Some(value) => out.insert(key, value),
            None => log::debug!(
                "material {index}: skipping property '{raw_key}' (type {}, semantic {}, index {})",
                prop.mType,
                prop.mSemantic,
                prop.mIndex
            ),
        }
    }

    for &texture_type in options.texture_slots.types() {
        let count = library.texture_count(material, texture_type.as_raw());
        if count == 0 {
            continue;
        }
        let mut paths = try_with_capacity(count as usize, "texture paths")?;
        for slot in 0..count {
            let path = library
                .texture_path(material, texture_type.as_raw(), slot)
                .ok_or(Error::TexturePath {
                    material: index,
                    texture_type: texture_type.as_raw(),
                    index: slot,
                })?;
            paths.push(path);
        }
        out.textures.insert(texture_type, paths);
    }

    Ok(out)
}

/// Re-fetch one property through the typed getters.
///
/// `Ok(None)` means the property is skipped: unsupported tag, failed fetch or
/// an empty numeric array. Only allocation failures are errors.
fn fetch_property<L: AssetLibrary + ?Sized>(
    library: &L,
    material: &sys::aiMaterial,
    prop: &sys::aiMaterialProperty,
) -> Result<Option<PropertyValue>> {
    let Some(key) = key_c_string(&prop.mKey) else {
        return Ok(None);
    };
    let (semantic, index) = (prop.mSemantic, prop.mIndex);
    let capacity = (prop.mDataLength as usize / 4).max(MIN_FETCH_CAPACITY);

    let value = match prop.mType {
        sys::aiPropertyTypeInfo_aiPTI_String => library
            .material_string(material, &key, semantic, index)
            .map(PropertyValue::String),
        sys::aiPropertyTypeInfo_aiPTI_Float
        | sys::aiPropertyTypeInfo_aiPTI_Double
        | sys::aiPropertyTypeInfo_aiPTI_Buffer => {
            let mut buf = try_with_capacity(capacity, "material property")?;
            buf.resize(capacity, 0.0f32);
            library
                .material_floats(material, &key, semantic, index, &mut buf)
                .filter(|&n| n > 0)
                .map(|n| {
                    buf.truncate(n);
                    PropertyValue::floats(buf)
                })
        }
        sys::aiPropertyTypeInfo_aiPTI_Integer => {
            let mut buf = try_with_capacity(capacity, "material property")?;
            buf.resize(capacity, 0i32);
            library
                .material_integers(material, &key, semantic, index, &mut buf)
                .filter(|&n| n > 0)
                .map(|n| {
                    buf.truncate(n);
                    PropertyValue::integers(buf)
                })
        }
        _ => None,
    };
    Ok(value)
}

/// The raw key bytes as a C string; `None` if they contain a NUL.
fn key_c_string(key: &sys::aiString) -> Option<CString> {
    let len = (key.length as usize).min(key.data.len());
    let bytes: Vec<u8> = key.data[..len].iter().map(|&c| c as u8).collect();
    CString::new(bytes).ok()
}
