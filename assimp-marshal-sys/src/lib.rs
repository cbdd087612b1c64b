//! Low-level declarations for the subset of the Assimp C API read by `assimp-marshal`
//!
//! The structs mirror the Assimp 5.x / 6.x C headers field for field and keep the
//! names bindgen would generate, so code written against generated bindings reads
//! the same against this crate. Entry points are only declared (and linked) with the
//! `system` feature; without it the crate is pure layout, which is enough to walk an
//! `aiScene` produced by any other means.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::os::raw::{c_char, c_int, c_uint};

/// Maximum length of the buffer inside [`aiString`].
pub const MAXLEN: usize = 1024;
pub const AI_MAX_NUMBER_OF_COLOR_SETS: u32 = 8;
pub const AI_MAX_NUMBER_OF_TEXTURECOORDS: u32 = 8;

pub const AI_SCENE_FLAGS_INCOMPLETE: u32 = 0x1;
pub const AI_SCENE_FLAGS_VALIDATED: u32 = 0x2;
pub const AI_SCENE_FLAGS_VALIDATION_WARNING: u32 = 0x4;
pub const AI_SCENE_FLAGS_NON_VERBOSE_FORMAT: u32 = 0x8;
pub const AI_SCENE_FLAGS_TERRAIN: u32 = 0x10;
pub const AI_SCENE_FLAGS_ALLOW_SHARED: u32 = 0x20;

pub type ai_real = f32;
pub type aiBool = c_int;
pub const AI_FALSE: aiBool = 0;
pub const AI_TRUE: aiBool = 1;

pub type aiReturn = c_int;
pub const aiReturn_aiReturn_SUCCESS: aiReturn = 0;
pub const aiReturn_aiReturn_FAILURE: aiReturn = -1;
pub const aiReturn_aiReturn_OUTOFMEMORY: aiReturn = -3;

pub type aiPropertyTypeInfo = c_uint;
pub const aiPropertyTypeInfo_aiPTI_Float: aiPropertyTypeInfo = 1;
pub const aiPropertyTypeInfo_aiPTI_Double: aiPropertyTypeInfo = 2;
pub const aiPropertyTypeInfo_aiPTI_String: aiPropertyTypeInfo = 3;
pub const aiPropertyTypeInfo_aiPTI_Integer: aiPropertyTypeInfo = 4;
pub const aiPropertyTypeInfo_aiPTI_Buffer: aiPropertyTypeInfo = 5;

pub type aiTextureType = c_uint;
pub const aiTextureType_aiTextureType_NONE: aiTextureType = 0;
pub const aiTextureType_aiTextureType_DIFFUSE: aiTextureType = 1;
pub const aiTextureType_aiTextureType_SPECULAR: aiTextureType = 2;
pub const aiTextureType_aiTextureType_AMBIENT: aiTextureType = 3;
pub const aiTextureType_aiTextureType_EMISSIVE: aiTextureType = 4;
pub const aiTextureType_aiTextureType_HEIGHT: aiTextureType = 5;
pub const aiTextureType_aiTextureType_NORMALS: aiTextureType = 6;
pub const aiTextureType_aiTextureType_SHININESS: aiTextureType = 7;
pub const aiTextureType_aiTextureType_OPACITY: aiTextureType = 8;
pub const aiTextureType_aiTextureType_DISPLACEMENT: aiTextureType = 9;
pub const aiTextureType_aiTextureType_LIGHTMAP: aiTextureType = 10;
pub const aiTextureType_aiTextureType_REFLECTION: aiTextureType = 11;
pub const aiTextureType_aiTextureType_BASE_COLOR: aiTextureType = 12;
pub const aiTextureType_aiTextureType_NORMAL_CAMERA: aiTextureType = 13;
pub const aiTextureType_aiTextureType_EMISSION_COLOR: aiTextureType = 14;
pub const aiTextureType_aiTextureType_METALNESS: aiTextureType = 15;
pub const aiTextureType_aiTextureType_DIFFUSE_ROUGHNESS: aiTextureType = 16;
pub const aiTextureType_aiTextureType_AMBIENT_OCCLUSION: aiTextureType = 17;
pub const aiTextureType_aiTextureType_UNKNOWN: aiTextureType = 18;

pub type aiPostProcessSteps = c_uint;
pub const aiPostProcessSteps_aiProcess_CalcTangentSpace: aiPostProcessSteps = 0x1;
pub const aiPostProcessSteps_aiProcess_JoinIdenticalVertices: aiPostProcessSteps = 0x2;
pub const aiPostProcessSteps_aiProcess_MakeLeftHanded: aiPostProcessSteps = 0x4;
pub const aiPostProcessSteps_aiProcess_Triangulate: aiPostProcessSteps = 0x8;
pub const aiPostProcessSteps_aiProcess_RemoveComponent: aiPostProcessSteps = 0x10;
pub const aiPostProcessSteps_aiProcess_GenNormals: aiPostProcessSteps = 0x20;
pub const aiPostProcessSteps_aiProcess_GenSmoothNormals: aiPostProcessSteps = 0x40;
pub const aiPostProcessSteps_aiProcess_SplitLargeMeshes: aiPostProcessSteps = 0x80;
pub const aiPostProcessSteps_aiProcess_PreTransformVertices: aiPostProcessSteps = 0x100;
pub const aiPostProcessSteps_aiProcess_LimitBoneWeights: aiPostProcessSteps = 0x200;
pub const aiPostProcessSteps_aiProcess_ValidateDataStructure: aiPostProcessSteps = 0x400;
pub const aiPostProcessSteps_aiProcess_ImproveCacheLocality: aiPostProcessSteps = 0x800;
pub const aiPostProcessSteps_aiProcess_RemoveRedundantMaterials: aiPostProcessSteps = 0x1000;
pub const aiPostProcessSteps_aiProcess_FixInfacingNormals: aiPostProcessSteps = 0x2000;
pub const aiPostProcessSteps_aiProcess_PopulateArmatureData: aiPostProcessSteps = 0x4000;
pub const aiPostProcessSteps_aiProcess_SortByPType: aiPostProcessSteps = 0x8000;
pub const aiPostProcessSteps_aiProcess_FindDegenerates: aiPostProcessSteps = 0x10000;
pub const aiPostProcessSteps_aiProcess_FindInvalidData: aiPostProcessSteps = 0x20000;
pub const aiPostProcessSteps_aiProcess_GenUVCoords: aiPostProcessSteps = 0x40000;
pub const aiPostProcessSteps_aiProcess_TransformUVCoords: aiPostProcessSteps = 0x80000;
pub const aiPostProcessSteps_aiProcess_FindInstances: aiPostProcessSteps = 0x100000;
pub const aiPostProcessSteps_aiProcess_OptimizeMeshes: aiPostProcessSteps = 0x200000;
pub const aiPostProcessSteps_aiProcess_OptimizeGraph: aiPostProcessSteps = 0x400000;
pub const aiPostProcessSteps_aiProcess_FlipUVs: aiPostProcessSteps = 0x800000;
pub const aiPostProcessSteps_aiProcess_FlipWindingOrder: aiPostProcessSteps = 0x1000000;
pub const aiPostProcessSteps_aiProcess_SplitByBoneCount: aiPostProcessSteps = 0x2000000;
pub const aiPostProcessSteps_aiProcess_Debone: aiPostProcessSteps = 0x4000000;
pub const aiPostProcessSteps_aiProcess_GlobalScale: aiPostProcessSteps = 0x8000000;
pub const aiPostProcessSteps_aiProcess_EmbedTextures: aiPostProcessSteps = 0x10000000;
pub const aiPostProcessSteps_aiProcess_ForceGenNormals: aiPostProcessSteps = 0x20000000;
pub const aiPostProcessSteps_aiProcess_DropNormals: aiPostProcessSteps = 0x40000000;
pub const aiPostProcessSteps_aiProcess_GenBoundingBoxes: aiPostProcessSteps = 0x80000000;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct aiString {
    pub length: u32,
    pub data: [c_char; MAXLEN],
}

impl Default for aiString {
    fn default() -> Self {
        Self {
            length: 0,
            data: [0; MAXLEN],
        }
    }
}

impl std::fmt::Debug for aiString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = (self.length as usize).min(MAXLEN);
        let bytes: Vec<u8> = self.data[..len].iter().map(|&c| c as u8).collect();
        f.debug_tuple("aiString")
            .field(&String::from_utf8_lossy(&bytes))
            .finish()
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct aiVector2D {
    pub x: ai_real,
    pub y: ai_real,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct aiVector3D {
    pub x: ai_real,
    pub y: ai_real,
    pub z: ai_real,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct aiColor4D {
    pub r: ai_real,
    pub g: ai_real,
    pub b: ai_real,
    pub a: ai_real,
}

/// Row-major 4x4 matrix; `a1..a4` is the first row.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct aiMatrix4x4 {
    pub a1: ai_real,
    pub a2: ai_real,
    pub a3: ai_real,
    pub a4: ai_real,
    pub b1: ai_real,
    pub b2: ai_real,
    pub b3: ai_real,
    pub b4: ai_real,
    pub c1: ai_real,
    pub c2: ai_real,
    pub c3: ai_real,
    pub c4: ai_real,
    pub d1: ai_real,
    pub d2: ai_real,
    pub d3: ai_real,
    pub d4: ai_real,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct aiAABB {
    pub mMin: aiVector3D,
    pub mMax: aiVector3D,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiFace {
    pub mNumIndices: c_uint,
    pub mIndices: *mut c_uint,
}

impl Default for aiFace {
    fn default() -> Self {
        Self {
            mNumIndices: 0,
            mIndices: std::ptr::null_mut(),
        }
    }
}

// Pointee types the marshaling core never dereferences.
macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque!(
    aiBone,
    aiAnimMesh,
    aiMetadata,
    aiAnimation,
    aiTexture,
    aiLight,
    aiCamera,
    aiSkeleton,
);

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiMesh {
    pub mPrimitiveTypes: c_uint,
    pub mNumVertices: c_uint,
    pub mNumFaces: c_uint,
    pub mVertices: *mut aiVector3D,
    pub mNormals: *mut aiVector3D,
    pub mTangents: *mut aiVector3D,
    pub mBitangents: *mut aiVector3D,
    pub mColors: [*mut aiColor4D; AI_MAX_NUMBER_OF_COLOR_SETS as usize],
    pub mTextureCoords: [*mut aiVector3D; AI_MAX_NUMBER_OF_TEXTURECOORDS as usize],
    pub mNumUVComponents: [c_uint; AI_MAX_NUMBER_OF_TEXTURECOORDS as usize],
    pub mFaces: *mut aiFace,
    pub mNumBones: c_uint,
    pub mBones: *mut *mut aiBone,
    pub mMaterialIndex: c_uint,
    pub mName: aiString,
    pub mNumAnimMeshes: c_uint,
    pub mAnimMeshes: *mut *mut aiAnimMesh,
    pub mMethod: c_uint,
    pub mAABB: aiAABB,
    pub mTextureCoordsNames: *mut *mut aiString,
}

impl Default for aiMesh {
    fn default() -> Self {
        let null = std::ptr::null_mut();
        Self {
            mPrimitiveTypes: 0,
            mNumVertices: 0,
            mNumFaces: 0,
            mVertices: null,
            mNormals: null,
            mTangents: null,
            mBitangents: null,
            mColors: [std::ptr::null_mut(); AI_MAX_NUMBER_OF_COLOR_SETS as usize],
            mTextureCoords: [null; AI_MAX_NUMBER_OF_TEXTURECOORDS as usize],
            mNumUVComponents: [0; AI_MAX_NUMBER_OF_TEXTURECOORDS as usize],
            mFaces: std::ptr::null_mut(),
            mNumBones: 0,
            mBones: std::ptr::null_mut(),
            mMaterialIndex: 0,
            mName: aiString::default(),
            mNumAnimMeshes: 0,
            mAnimMeshes: std::ptr::null_mut(),
            mMethod: 0,
            mAABB: aiAABB::default(),
            mTextureCoordsNames: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiNode {
    pub mName: aiString,
    pub mTransformation: aiMatrix4x4,
    pub mParent: *mut aiNode,
    pub mNumChildren: c_uint,
    pub mChildren: *mut *mut aiNode,
    pub mNumMeshes: c_uint,
    pub mMeshes: *mut c_uint,
    pub mMetaData: *mut aiMetadata,
}

impl Default for aiNode {
    fn default() -> Self {
        Self {
            mName: aiString::default(),
            mTransformation: aiMatrix4x4::default(),
            mParent: std::ptr::null_mut(),
            mNumChildren: 0,
            mChildren: std::ptr::null_mut(),
            mNumMeshes: 0,
            mMeshes: std::ptr::null_mut(),
            mMetaData: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiMaterialProperty {
    pub mKey: aiString,
    pub mSemantic: c_uint,
    pub mIndex: c_uint,
    pub mDataLength: c_uint,
    pub mType: aiPropertyTypeInfo,
    pub mData: *mut c_char,
}

impl Default for aiMaterialProperty {
    fn default() -> Self {
        Self {
            mKey: aiString::default(),
            mSemantic: 0,
            mIndex: 0,
            mDataLength: 0,
            mType: 0,
            mData: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiMaterial {
    pub mProperties: *mut *mut aiMaterialProperty,
    pub mNumProperties: c_uint,
    pub mNumAllocated: c_uint,
}

impl Default for aiMaterial {
    fn default() -> Self {
        Self {
            mProperties: std::ptr::null_mut(),
            mNumProperties: 0,
            mNumAllocated: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiScene {
    pub mFlags: c_uint,
    pub mRootNode: *mut aiNode,
    pub mNumMeshes: c_uint,
    pub mMeshes: *mut *mut aiMesh,
    pub mNumMaterials: c_uint,
    pub mMaterials: *mut *mut aiMaterial,
    pub mNumAnimations: c_uint,
    pub mAnimations: *mut *mut aiAnimation,
    pub mNumTextures: c_uint,
    pub mTextures: *mut *mut aiTexture,
    pub mNumLights: c_uint,
    pub mLights: *mut *mut aiLight,
    pub mNumCameras: c_uint,
    pub mCameras: *mut *mut aiCamera,
    pub mMetaData: *mut aiMetadata,
    pub mName: aiString,
    pub mNumSkeletons: c_uint,
    pub mSkeletons: *mut *mut aiSkeleton,
    pub mPrivate: *mut c_char,
}

impl Default for aiScene {
    fn default() -> Self {
        Self {
            mFlags: 0,
            mRootNode: std::ptr::null_mut(),
            mNumMeshes: 0,
            mMeshes: std::ptr::null_mut(),
            mNumMaterials: 0,
            mMaterials: std::ptr::null_mut(),
            mNumAnimations: 0,
            mAnimations: std::ptr::null_mut(),
            mNumTextures: 0,
            mTextures: std::ptr::null_mut(),
            mNumLights: 0,
            mLights: std::ptr::null_mut(),
            mNumCameras: 0,
            mCameras: std::ptr::null_mut(),
            mMetaData: std::ptr::null_mut(),
            mName: aiString::default(),
            mNumSkeletons: 0,
            mSkeletons: std::ptr::null_mut(),
            mPrivate: std::ptr::null_mut(),
        }
    }
}

pub type aiLogStreamCallback = Option<unsafe extern "C" fn(message: *const c_char, user: *mut c_char)>;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct aiLogStream {
    pub callback: aiLogStreamCallback,
    pub user: *mut c_char,
}

#[cfg(feature = "system")]
unsafe extern "C" {
    pub fn aiImportFile(pFile: *const c_char, pFlags: c_uint) -> *const aiScene;
    pub fn aiReleaseImport(pScene: *const aiScene);
    pub fn aiGetErrorString() -> *const c_char;
    pub fn aiIsExtensionSupported(szExtension: *const c_char) -> aiBool;

    pub fn aiGetMaterialString(
        pMat: *const aiMaterial,
        pKey: *const c_char,
        type_: c_uint,
        index: c_uint,
        pOut: *mut aiString,
    ) -> aiReturn;
    pub fn aiGetMaterialFloatArray(
        pMat: *const aiMaterial,
        pKey: *const c_char,
        type_: c_uint,
        index: c_uint,
        pOut: *mut ai_real,
        pMax: *mut c_uint,
    ) -> aiReturn;
    pub fn aiGetMaterialIntegerArray(
        pMat: *const aiMaterial,
        pKey: *const c_char,
        type_: c_uint,
        index: c_uint,
        pOut: *mut c_int,
        pMax: *mut c_uint,
    ) -> aiReturn;
    pub fn aiGetMaterialTextureCount(pMat: *const aiMaterial, type_: aiTextureType) -> c_uint;
    pub fn aiGetMaterialTexture(
        mat: *const aiMaterial,
        type_: aiTextureType,
        index: c_uint,
        path: *mut aiString,
        mapping: *mut c_uint,
        uvindex: *mut c_uint,
        blend: *mut ai_real,
        op: *mut c_uint,
        mapmode: *mut c_uint,
        flags: *mut c_uint,
    ) -> aiReturn;

    pub fn aiAttachLogStream(stream: *const aiLogStream);
    pub fn aiDetachLogStream(stream: *const aiLogStream) -> aiReturn;
    pub fn aiDetachAllLogStreams();
    pub fn aiEnableVerboseLogging(d: aiBool);

    pub fn aiGetVersionMajor() -> c_uint;
    pub fn aiGetVersionMinor() -> c_uint;
    pub fn aiGetVersionRevision() -> c_uint;
}

/// Version information for this crate
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

mod test;
