//! In-process stand-in for Assimp
//!
//! `FixtureLibrary` builds real `#[repr(C)]` scene graphs from a plain
//! description, stores material properties the way Assimp does and answers the
//! material getters by searching those properties. It counts imports and
//! releases so tests can check that every scene is released exactly once.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use assimp_marshal::AssetLibrary;
use assimp_marshal::sys;

pub const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Value stored in a material property
#[derive(Debug, Clone, PartialEq)]
pub enum PropData {
    String(String),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    Integers(Vec<i32>),
    Buffer(Vec<u8>),
    /// Arbitrary type tag and payload
    Raw(u32, Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropSpec {
    pub key: String,
    pub semantic: u32,
    pub index: u32,
    pub data: PropData,
}

impl PropSpec {
    pub fn new(key: &str, data: PropData) -> Self {
        Self {
            key: key.to_string(),
            semantic: 0,
            index: 0,
            data,
        }
    }

    /// A `$tex.file` entry for slot `index` of `texture_type`
    pub fn texture(texture_type: u32, index: u32, path: &str) -> Self {
        Self {
            key: "$tex.file".to_string(),
            semantic: texture_type,
            index,
            data: PropData::String(path.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialSpec {
    pub properties: Vec<PropSpec>,
}

impl MaterialSpec {
    pub fn with(mut self, prop: PropSpec) -> Self {
        self.properties.push(prop);
        self
    }

    pub fn named(name: &str) -> Self {
        Self::default().with(PropSpec::new("?mat.name", PropData::String(name.into())))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSpec {
    pub name: String,
    pub positions: Option<Vec<[f32; 3]>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    pub colors: Vec<Vec<[f32; 4]>>,
    /// Component count and 3-wide storage per UV set
    pub texcoords: Vec<(u32, Vec<[f32; 3]>)>,
    pub faces: Vec<Vec<u32>>,
    pub material_index: u32,
}

impl MeshSpec {
    /// A unit quad in the XY plane as one four-index face
    pub fn quad(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positions: Some(vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ]),
            faces: vec![vec![0, 1, 2, 3]],
            ..Default::default()
        }
    }

    pub fn triangle(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positions: Some(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            faces: vec![vec![0, 1, 2]],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub transform: [[f32; 4]; 4],
    pub meshes: Vec<u32>,
    pub children: Vec<NodeSpec>,
    /// Null entries appended to `mChildren` after the real children
    pub null_children: usize,
}

impl NodeSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
            null_children: 0,
        }
    }

    pub fn with_meshes(mut self, meshes: &[u32]) -> Self {
        self.meshes = meshes.to_vec();
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_null_child(mut self) -> Self {
        self.null_children += 1;
        self
    }

    pub fn with_transform(mut self, transform: [[f32; 4]; 4]) -> Self {
        self.transform = transform;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSpec {
    pub meshes: Vec<MeshSpec>,
    pub materials: Vec<MaterialSpec>,
    /// `None` produces a scene without a root node
    pub root: Option<NodeSpec>,
    pub flags: u32,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
            root: Some(NodeSpec::new("root")),
            flags: 0,
        }
    }
}

impl SceneSpec {
    pub fn with_mesh(mut self, mesh: MeshSpec) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_material(mut self, material: MaterialSpec) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_root(mut self, root: NodeSpec) -> Self {
        self.root = Some(root);
        self
    }

    pub fn without_root(mut self) -> Self {
        self.root = None;
        self
    }

    pub fn incomplete(mut self) -> Self {
        self.flags |= sys::AI_SCENE_FLAGS_INCOMPLETE;
        self
    }
}

enum Behavior {
    Scene(SceneSpec),
    Fail(String),
}

/// Fake asset library handing out fixture scenes
pub struct FixtureLibrary {
    behavior: Behavior,
    live: Mutex<HashMap<usize, LiveScene>>,
    last_error: Mutex<Option<String>>,
    imports: AtomicUsize,
    releases: AtomicUsize,
    last_flags: AtomicU32,
}

impl FixtureLibrary {
    pub fn new(scene: SceneSpec) -> Self {
        Self::with_behavior(Behavior::Scene(scene))
    }

    /// Every import returns null and leaves `message` as the last error
    pub fn failing(message: &str) -> Self {
        Self::with_behavior(Behavior::Fail(message.to_string()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            live: Mutex::new(HashMap::new()),
            last_error: Mutex::new(None),
            imports: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            last_flags: AtomicU32::new(0),
        }
    }

    /// Number of scenes handed out
    pub fn imports(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Scenes handed out and not yet released
    pub fn live_scenes(&self) -> usize {
        self.live.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_flags(&self) -> u32 {
        self.last_flags.load(Ordering::SeqCst)
    }
}

impl AssetLibrary for FixtureLibrary {
    fn import_file(&self, _path: &CStr, flags: u32) -> *const sys::aiScene {
        self.last_flags.store(flags, Ordering::SeqCst);
        let spec = match &self.behavior {
            Behavior::Scene(spec) => spec,
            Behavior::Fail(message) => {
                *self.last_error.lock().unwrap() = Some(message.clone());
                return std::ptr::null();
            }
        };

        let triangulate = flags & sys::aiPostProcessSteps_aiProcess_Triangulate != 0;
        let scene = LiveScene::build(spec, triangulate);
        let ptr = scene.scene_ptr();
        self.imports.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(ptr as usize, scene);
        if spec.root.is_none() {
            *self.last_error.lock().unwrap() = Some("no root node".to_string());
        }
        ptr
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    unsafe fn release_import(&self, scene: NonNull<sys::aiScene>) {
        let removed = self.live.lock().unwrap().remove(&(scene.as_ptr() as usize));
        assert!(removed.is_some(), "released a scene that is not live");
        self.releases.fetch_add(1, Ordering::SeqCst);
    }

    fn material_string(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
    ) -> Option<String> {
        let prop = find_property(material, key.to_bytes(), semantic, index)?;
        decode_string(prop)
    }

    fn material_floats(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [f32],
    ) -> Option<usize> {
        let prop = find_property(material, key.to_bytes(), semantic, index)?;
        let bytes = property_bytes(prop);
        let values: Vec<f32> = match prop.mType {
            sys::aiPropertyTypeInfo_aiPTI_Float | sys::aiPropertyTypeInfo_aiPTI_Buffer => bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            sys::aiPropertyTypeInfo_aiPTI_Double => bytes
                .chunks_exact(8)
                .map(|c| f64::from_ne_bytes(c.try_into().unwrap()) as f32)
                .collect(),
            sys::aiPropertyTypeInfo_aiPTI_Integer => bytes
                .chunks_exact(4)
                .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]) as f32)
                .collect(),
            _ => return None,
        };
        let n = values.len().min(out.len());
        out[..n].copy_from_slice(&values[..n]);
        Some(n)
    }

    fn material_integers(
        &self,
        material: &sys::aiMaterial,
        key: &CStr,
        semantic: u32,
        index: u32,
        out: &mut [i32],
    ) -> Option<usize> {
        let prop = find_property(material, key.to_bytes(), semantic, index)?;
        let bytes = property_bytes(prop);
        let values: Vec<i32> = match prop.mType {
            sys::aiPropertyTypeInfo_aiPTI_Integer | sys::aiPropertyTypeInfo_aiPTI_Buffer => bytes
                .chunks_exact(4)
                .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            sys::aiPropertyTypeInfo_aiPTI_Float => bytes
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]) as i32)
                .collect(),
            _ => return None,
        };
        let n = values.len().min(out.len());
        out[..n].copy_from_slice(&values[..n]);
        Some(n)
    }

    fn texture_count(&self, material: &sys::aiMaterial, texture_type: u32) -> u32 {
        properties(material)
            .filter(|p| key_bytes(&p.mKey) == b"$tex.file" && p.mSemantic == texture_type)
            .map(|p| p.mIndex + 1)
            .max()
            .unwrap_or(0)
    }

    fn texture_path(
        &self,
        material: &sys::aiMaterial,
        texture_type: u32,
        index: u32,
    ) -> Option<String> {
        let prop = find_property(material, b"$tex.file", texture_type, index)?;
        decode_string(prop)
    }
}

fn properties(material: &sys::aiMaterial) -> impl Iterator<Item = &sys::aiMaterialProperty> {
    let ptrs: &[*mut sys::aiMaterialProperty] = if material.mProperties.is_null() {
        &[]
    } else {
        unsafe {
            std::slice::from_raw_parts(material.mProperties, material.mNumProperties as usize)
        }
    };
    ptrs.iter().filter_map(|&p| unsafe { p.as_ref() })
}

fn find_property<'a>(
    material: &'a sys::aiMaterial,
    key: &[u8],
    semantic: u32,
    index: u32,
) -> Option<&'a sys::aiMaterialProperty> {
    properties(material)
        .find(|p| key_bytes(&p.mKey) == key && p.mSemantic == semantic && p.mIndex == index)
}

fn key_bytes(key: &sys::aiString) -> Vec<u8> {
    key.data[..key.length as usize]
        .iter()
        .map(|&c| c as u8)
        .collect()
}

fn property_bytes(prop: &sys::aiMaterialProperty) -> &[u8] {
    if prop.mData.is_null() {
        return &[];
    }
    unsafe { std::slice::from_raw_parts(prop.mData as *const u8, prop.mDataLength as usize) }
}

/// Strings are stored as a `u32` length, the bytes and a terminating NUL.
fn decode_string(prop: &sys::aiMaterialProperty) -> Option<String> {
    if prop.mType != sys::aiPropertyTypeInfo_aiPTI_String {
        return None;
    }
    let bytes = property_bytes(prop);
    let len = u32::from_ne_bytes(bytes.get(..4)?.try_into().ok()?) as usize;
    let text = bytes.get(4..4 + len)?;
    Some(String::from_utf8_lossy(text).into_owned())
}

fn encode(data: &PropData) -> (u32, Vec<u8>) {
    match data {
        PropData::String(s) => {
            let mut bytes = (s.len() as u32).to_ne_bytes().to_vec();
            bytes.extend_from_slice(s.as_bytes());
            bytes.push(0);
            (sys::aiPropertyTypeInfo_aiPTI_String, bytes)
        }
        PropData::Floats(v) => (
            sys::aiPropertyTypeInfo_aiPTI_Float,
            v.iter().flat_map(|f| f.to_ne_bytes()).collect(),
        ),
        PropData::Doubles(v) => (
            sys::aiPropertyTypeInfo_aiPTI_Double,
            v.iter().flat_map(|f| f.to_ne_bytes()).collect(),
        ),
        PropData::Integers(v) => (
            sys::aiPropertyTypeInfo_aiPTI_Integer,
            v.iter().flat_map(|i| i.to_ne_bytes()).collect(),
        ),
        PropData::Buffer(b) => (sys::aiPropertyTypeInfo_aiPTI_Buffer, b.clone()),
        PropData::Raw(tag, b) => (*tag, b.clone()),
    }
}

pub fn ai_string(s: &str) -> sys::aiString {
    let mut out = sys::aiString::default();
    let bytes = &s.as_bytes()[..s.len().min(sys::MAXLEN - 1)];
    for (dst, &b) in out.data.iter_mut().zip(bytes) {
        *dst = b as c_char;
    }
    out.length = bytes.len() as u32;
    out
}

fn matrix(rows: [[f32; 4]; 4]) -> sys::aiMatrix4x4 {
    let [a, b, c, d] = rows;
    sys::aiMatrix4x4 {
        a1: a[0],
        a2: a[1],
        a3: a[2],
        a4: a[3],
        b1: b[0],
        b2: b[1],
        b3: b[2],
        b4: b[3],
        c1: c[0],
        c2: c[1],
        c3: c[2],
        c4: c[3],
        d1: d[0],
        d2: d[1],
        d3: d[2],
        d4: d[3],
    }
}

/// Split polygons into triangle fans, the way `aiProcess_Triangulate` would
/// for convex faces.
pub fn triangulate(faces: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    for face in faces {
        if face.len() <= 3 {
            out.push(face.clone());
            continue;
        }
        for i in 1..face.len() - 1 {
            out.push(vec![face[0], face[i], face[i + 1]]);
        }
    }
    out
}

/// Heap storage behind one handed-out scene. Every pointer inside the
/// `aiScene` graph points into a buffer owned here.
#[derive(Default)]
struct LiveScene {
    scene: Option<Box<sys::aiScene>>,
    meshes: Vec<Box<sys::aiMesh>>,
    materials: Vec<Box<sys::aiMaterial>>,
    properties: Vec<Box<sys::aiMaterialProperty>>,
    nodes: Vec<Box<sys::aiNode>>,
    vec3s: Vec<Vec<sys::aiVector3D>>,
    colors: Vec<Vec<sys::aiColor4D>>,
    faces: Vec<Vec<sys::aiFace>>,
    u32s: Vec<Vec<u32>>,
    bytes: Vec<Vec<u8>>,
    mesh_ptrs: Vec<Vec<*mut sys::aiMesh>>,
    material_ptrs: Vec<Vec<*mut sys::aiMaterial>>,
    property_ptrs: Vec<Vec<*mut sys::aiMaterialProperty>>,
    node_ptrs: Vec<Vec<*mut sys::aiNode>>,
}

// Only touched under the library's mutex.
unsafe impl Send for LiveScene {}

impl LiveScene {
    fn build(spec: &SceneSpec, triangulate_faces: bool) -> Self {
        let mut live = LiveScene::default();
        let mut scene = Box::new(sys::aiScene {
            mFlags: spec.flags,
            ..Default::default()
        });

        let mut mesh_ptrs: Vec<*mut sys::aiMesh> = spec
            .meshes
            .iter()
            .map(|m| live.build_mesh(m, triangulate_faces))
            .collect();
        scene.mNumMeshes = mesh_ptrs.len() as u32;
        scene.mMeshes = mesh_ptrs.as_mut_ptr();
        live.mesh_ptrs.push(mesh_ptrs);

        let mut material_ptrs: Vec<*mut sys::aiMaterial> = spec
            .materials
            .iter()
            .map(|m| live.build_material(m))
            .collect();
        scene.mNumMaterials = material_ptrs.len() as u32;
        scene.mMaterials = material_ptrs.as_mut_ptr();
        live.material_ptrs.push(material_ptrs);

        if let Some(root) = &spec.root {
            scene.mRootNode = live.build_node(root, std::ptr::null_mut());
        }

        live.scene = Some(scene);
        live
    }

    fn scene_ptr(&self) -> *const sys::aiScene {
        self.scene
            .as_deref()
            .map_or(std::ptr::null(), |s| s as *const sys::aiScene)
    }

    fn vec3_array(&mut self, data: Option<&Vec<[f32; 3]>>) -> *mut sys::aiVector3D {
        let Some(data) = data else {
            return std::ptr::null_mut();
        };
        let mut v: Vec<sys::aiVector3D> = data
            .iter()
            .map(|&[x, y, z]| sys::aiVector3D { x, y, z })
            .collect();
        let ptr = v.as_mut_ptr();
        self.vec3s.push(v);
        ptr
    }

    fn build_mesh(&mut self, spec: &MeshSpec, triangulate_faces: bool) -> *mut sys::aiMesh {
        let mut mesh = Box::new(sys::aiMesh {
            mName: ai_string(&spec.name),
            mNumVertices: spec.positions.as_ref().map_or(0, Vec::len) as u32,
            mMaterialIndex: spec.material_index,
            ..Default::default()
        });
        mesh.mVertices = self.vec3_array(spec.positions.as_ref());
        mesh.mNormals = self.vec3_array(spec.normals.as_ref());
        mesh.mTangents = self.vec3_array(spec.tangents.as_ref());
        mesh.mBitangents = self.vec3_array(spec.bitangents.as_ref());

        for (slot, set) in spec.colors.iter().enumerate() {
            let mut v: Vec<sys::aiColor4D> = set
                .iter()
                .map(|&[r, g, b, a]| sys::aiColor4D { r, g, b, a })
                .collect();
            mesh.mColors[slot] = v.as_mut_ptr();
            self.colors.push(v);
        }
        for (slot, (components, set)) in spec.texcoords.iter().enumerate() {
            mesh.mTextureCoords[slot] = self.vec3_array(Some(set));
            mesh.mNumUVComponents[slot] = *components;
        }

        let faces = if triangulate_faces {
            triangulate(&spec.faces)
        } else {
            spec.faces.clone()
        };
        let mut ai_faces = Vec::with_capacity(faces.len());
        for face in faces {
            let mut indices = face;
            ai_faces.push(sys::aiFace {
                mNumIndices: indices.len() as u32,
                mIndices: indices.as_mut_ptr(),
            });
            self.u32s.push(indices);
        }
        mesh.mNumFaces = ai_faces.len() as u32;
        mesh.mFaces = ai_faces.as_mut_ptr();
        self.faces.push(ai_faces);

        let ptr: *mut sys::aiMesh = &mut *mesh;
        self.meshes.push(mesh);
        ptr
    }

    fn build_material(&mut self, spec: &MaterialSpec) -> *mut sys::aiMaterial {
        let mut prop_ptrs = Vec::with_capacity(spec.properties.len());
        for prop in &spec.properties {
            let (tag, mut data) = encode(&prop.data);
            let mut ai_prop = Box::new(sys::aiMaterialProperty {
                mKey: ai_string(&prop.key),
                mSemantic: prop.semantic,
                mIndex: prop.index,
                mDataLength: data.len() as u32,
                mType: tag,
                mData: data.as_mut_ptr() as *mut c_char,
            });
            self.bytes.push(data);
            prop_ptrs.push(&mut *ai_prop as *mut sys::aiMaterialProperty);
            self.properties.push(ai_prop);
        }

        let mut material = Box::new(sys::aiMaterial {
            mProperties: prop_ptrs.as_mut_ptr(),
            mNumProperties: prop_ptrs.len() as u32,
            mNumAllocated: prop_ptrs.len() as u32,
        });
        self.property_ptrs.push(prop_ptrs);
        let ptr: *mut sys::aiMaterial = &mut *material;
        self.materials.push(material);
        ptr
    }

    fn build_node(&mut self, spec: &NodeSpec, parent: *mut sys::aiNode) -> *mut sys::aiNode {
        let mut node = Box::new(sys::aiNode {
            mName: ai_string(&spec.name),
            mTransformation: matrix(spec.transform),
            mParent: parent,
            ..Default::default()
        });
        let ptr: *mut sys::aiNode = &mut *node;

        let mut children: Vec<*mut sys::aiNode> = spec
            .children
            .iter()
            .map(|c| self.build_node(c, ptr))
            .collect();
        children.extend(std::iter::repeat_n(std::ptr::null_mut(), spec.null_children));
        let mut meshes = spec.meshes.clone();

        node.mNumChildren = children.len() as u32;
        node.mChildren = children.as_mut_ptr();
        node.mNumMeshes = meshes.len() as u32;
        node.mMeshes = meshes.as_mut_ptr();

        self.node_ptrs.push(children);
        self.u32s.push(meshes);
        self.nodes.push(node);
        ptr
    }
}

/// A placeholder file so the importer's existence check passes
pub fn fixture_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("assimp-marshal-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, b"fixture").unwrap();
    path
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
