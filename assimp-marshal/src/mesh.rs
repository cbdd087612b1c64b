//! Mesh records and the mesh marshaler
//!
//! Every attribute array is copied out of the foreign `aiMesh` into an owned
//! [`VertexBuffer`]; nothing in a [`Mesh`] points back into Assimp memory.

use crate::{
    error::{Error, Result},
    ffi::{checked_len, slice_from_ptr_len, try_with_capacity},
    options::ImportOptions,
    sys,
    types::ai_string_to_string,
};

/// A flat `f32` buffer holding `len()` elements of `components()` floats each
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    data: Box<[f32]>,
    components: usize,
}

impl VertexBuffer {
    /// `components` must be non-zero and divide `data.len()`.
    fn new(data: Vec<f32>, components: usize) -> Self {
        debug_assert!(components > 0 && data.len() % components == 0);
        Self {
            data: data.into_boxed_slice(),
            components,
        }
    }

    /// All floats, element after element
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Number of elements (vertices), not floats
    pub fn len(&self) -> usize {
        self.data.len() / self.components
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Floats per element: 3 for positions, 4 for colors, 1-3 for UVs
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn get(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.components)?;
        self.data.get(start..start.checked_add(self.components)?)
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.components)
    }

    /// Raw bytes for direct GPU upload
    #[cfg(feature = "bytemuck")]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data[..])
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data.into_vec()
    }
}

impl<'a> IntoIterator for &'a VertexBuffer {
    type Item = &'a [f32];
    type IntoIter = std::slice::ChunksExact<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One drawable primitive copied out of an `aiMesh`
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertex_count: usize,
    face_count: usize,
    index_count: usize,
    material_index: usize,
    vertices: Option<VertexBuffer>,
    normals: Option<VertexBuffer>,
    tangents: Option<VertexBuffer>,
    bitangents: Option<VertexBuffer>,
    indices: Option<Box<[u32]>>,
    color_sets: Vec<VertexBuffer>,
    texcoord_sets: Vec<VertexBuffer>,
    uv_component_counts: Vec<u32>,
}

impl Mesh {
    /// Mesh label; not guaranteed unique
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Always `3 * face_count()`
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Index into [`Scene::materials`](crate::Scene::materials); not range-checked
    pub fn material_index(&self) -> usize {
        self.material_index
    }

    /// Positions, 3 floats per vertex
    ///
    /// `None` only for a malformed mesh without a position array.
    pub fn vertices(&self) -> Option<&VertexBuffer> {
        self.vertices.as_ref()
    }

    pub fn normals(&self) -> Option<&VertexBuffer> {
        self.normals.as_ref()
    }

    pub fn tangents(&self) -> Option<&VertexBuffer> {
        self.tangents.as_ref()
    }

    /// Present only when tangents are present too, unless the import used
    /// [`ImportOptions::decouple_bitangents`].
    pub fn bitangents(&self) -> Option<&VertexBuffer> {
        self.bitangents.as_ref()
    }

    /// Flat triangle list; `None` when the mesh has no faces
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Per-face index triples, in face order
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = [u32; 3]> + '_ {
        self.indices
            .as_deref()
            .unwrap_or_default()
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// RGBA sets, 4 floats per vertex
    pub fn color_sets(&self) -> &[VertexBuffer] {
        &self.color_sets
    }

    pub fn num_color_sets(&self) -> usize {
        self.color_sets.len()
    }

    /// UV sets, densely packed at [`uv_component_counts`](Self::uv_component_counts) floats per vertex
    pub fn texcoord_sets(&self) -> &[VertexBuffer] {
        &self.texcoord_sets
    }

    pub fn num_texcoord_sets(&self) -> usize {
        self.texcoord_sets.len()
    }

    pub fn uv_component_counts(&self) -> &[u32] {
        &self.uv_component_counts
    }
}

/// Copy every mesh of `scene`, in order.
///
/// The first failure drops everything copied so far and is returned.
pub(crate) fn marshal_meshes(scene: &sys::aiScene, options: &ImportOptions) -> Result<Vec<Mesh>> {
    let count = scene.mNumMeshes as usize;
    if count > 0 && scene.mMeshes.is_null() {
        return Err(Error::invalid_scene(format!(
            "scene reports {count} meshes but has no mesh array"
        )));
    }
    let ptrs = unsafe { slice_from_ptr_len(scene, scene.mMeshes as *const *mut sys::aiMesh, count) };

    let mut meshes = try_with_capacity(ptrs.len(), "mesh list")?;
    for (index, &ptr) in ptrs.iter().enumerate() {
        let mesh = unsafe { ptr.as_ref() }
            .ok_or_else(|| Error::invalid_scene(format!("mesh {index} is null")))?;
        meshes.push(marshal_mesh(index, mesh, options)?);
    }
    Ok(meshes)
}

fn marshal_mesh(index: usize, mesh: &sys::aiMesh, options: &ImportOptions) -> Result<Mesh> {
    let vertex_count = mesh.mNumVertices as usize;
    let face_count = mesh.mNumFaces as usize;

    let indices = flatten_faces(index, mesh)?;
    let index_count = indices.as_ref().map_or(0, |i| i.len());

    let vertices = copy_vec3(mesh, mesh.mVertices, vertex_count, "vertices")?;
    let normals = copy_vec3(mesh, mesh.mNormals, vertex_count, "normals")?;
    let tangents = copy_vec3(mesh, mesh.mTangents, vertex_count, "tangents")?;
    let bitangents = if options.decouple_bitangents || !mesh.mTangents.is_null() {
        copy_vec3(mesh, mesh.mBitangents, vertex_count, "bitangents")?
    } else {
        None
    };

    let color_sets = copy_color_sets(mesh, vertex_count)?;
    let (texcoord_sets, uv_component_counts) = copy_texcoord_sets(index, mesh, vertex_count)?;

    log::trace!(
        "mesh {index}: {vertex_count} vertices, {face_count} faces, {} color sets, {} uv sets",
        color_sets.len(),
        texcoord_sets.len()
    );

    Ok(Mesh {
        name: ai_string_to_string(&mesh.mName),
        vertex_count,
        face_count,
        index_count,
        material_index: mesh.mMaterialIndex as usize,
        vertices,
        normals,
        tangents,
        bitangents,
        indices,
        color_sets,
        texcoord_sets,
        uv_component_counts,
    })
}

/// Concatenate all face index lists; every face must be a triangle.
fn flatten_faces(mesh_index: usize, mesh: &sys::aiMesh) -> Result<Option<Box<[u32]>>> {
    let face_count = mesh.mNumFaces as usize;
    if face_count == 0 {
        return Ok(None);
    }
    if mesh.mFaces.is_null() {
        return Err(Error::invalid_scene(format!(
            "mesh {mesh_index} reports {face_count} faces but has no face array"
        )));
    }
    let faces = unsafe { slice_from_ptr_len(mesh, mesh.mFaces as *const sys::aiFace, face_count) };

    // Check topology before allocating so a quad mesh fails fast.
    if let Some((face, f)) = faces.iter().enumerate().find(|(_, f)| f.mNumIndices != 3) {
        return Err(Error::NonTriangularFace {
            mesh: mesh_index,
            face,
            indices: f.mNumIndices,
        });
    }

    let mut out = try_with_capacity(checked_len(faces.len(), 3, "indices")?, "indices")?;
    for (face, f) in faces.iter().enumerate() {
        if f.mIndices.is_null() {
            return Err(Error::invalid_scene(format!(
                "mesh {mesh_index} face {face} has no index array"
            )));
        }
        out.extend_from_slice(unsafe { slice_from_ptr_len(f, f.mIndices as *const u32, 3) });
    }
    Ok(Some(out.into_boxed_slice()))
}

fn copy_vec3(
    mesh: &sys::aiMesh,
    ptr: *const sys::aiVector3D,
    vertex_count: usize,
    what: &'static str,
) -> Result<Option<VertexBuffer>> {
    if ptr.is_null() {
        return Ok(None);
    }
    let src = unsafe { slice_from_ptr_len(mesh, ptr, vertex_count) };
    let mut out = try_with_capacity(checked_len(src.len(), 3, what)?, what)?;
    for v in src {
        out.extend_from_slice(&[v.x, v.y, v.z]);
    }
    Ok(Some(VertexBuffer::new(out, 3)))
}

/// Color sets are dense: scanning stops at the first empty slot.
fn copy_color_sets(mesh: &sys::aiMesh, vertex_count: usize) -> Result<Vec<VertexBuffer>> {
    let present = mesh.mColors.iter().take_while(|p| !p.is_null()).count();
    let mut sets = try_with_capacity(present, "color sets")?;
    for &ptr in &mesh.mColors[..present] {
        let src = unsafe { slice_from_ptr_len(mesh, ptr as *const sys::aiColor4D, vertex_count) };
        let mut out = try_with_capacity(checked_len(src.len(), 4, "colors")?, "colors")?;
        for c in src {
            out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        sets.push(VertexBuffer::new(out, 4));
    }
    Ok(sets)
}

/// UV sets are stored 3-wide by Assimp; only the declared components are kept.
fn copy_texcoord_sets(
    mesh_index: usize,
    mesh: &sys::aiMesh,
    vertex_count: usize,
) -> Result<(Vec<VertexBuffer>, Vec<u32>)> {
    let present = mesh.mTextureCoords.iter().take_while(|p| !p.is_null()).count();
    let mut sets = try_with_capacity(present, "texture coordinate sets")?;
    let mut counts = try_with_capacity(present, "texture coordinate sets")?;

    for (set, &ptr) in mesh.mTextureCoords[..present].iter().enumerate() {
        let ncomp = mesh.mNumUVComponents[set];
        if !(1..=3).contains(&ncomp) {
            return Err(Error::invalid_scene(format!(
                "mesh {mesh_index} uv set {set} declares {ncomp} components"
            )));
        }
        let width = ncomp as usize;
        let src = unsafe { slice_from_ptr_len(mesh, ptr as *const sys::aiVector3D, vertex_count) };
        let len = checked_len(src.len(), width, "texture coordinates")?;
        let mut out = try_with_capacity(len, "texture coordinates")?;
        for v in src {
            out.extend_from_slice(&[v.x, v.y, v.z][..width]);
        }
        sets.push(VertexBuffer::new(out, width));
        counts.push(ncomp);
    }
    Ok((sets, counts))
}
