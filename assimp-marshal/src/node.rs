//! Node hierarchy records and the node marshaler
//!
//! Children are owned by their parent. The link back up is the parent's
//! name only; use [`Node::name_index`] to walk upwards.

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    ffi::{slice_from_ptr_len, try_with_capacity},
    sys,
    types::{Matrix4Rows, ai_string_to_string, matrix_rows},
};

/// Deeper trees are rejected. The walk itself keeps its own stack, but
/// dropping, cloning or comparing a [`Node`] still recurses once per level.
const MAX_DEPTH: usize = 512;

/// A node in the scene hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    transformation: Matrix4Rows,
    parent_name: Option<String>,
    children: Vec<Node>,
    mesh_indices: Vec<u32>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform relative to the parent, row-major
    pub fn transformation(&self) -> &Matrix4Rows {
        &self.transformation
    }

    /// Name of the parent node; `None` for the root
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Indices into [`Scene::meshes`](crate::Scene::meshes)
    pub fn mesh_indices(&self) -> &[u32] {
        &self.mesh_indices
    }

    pub fn num_meshes(&self) -> usize {
        self.mesh_indices.len()
    }

    /// First node named `name` in depth-first order, starting with `self`
    pub fn find(&self, name: &str) -> Option<&Node> {
        std::iter::once(self)
            .chain(self.descendants())
            .find(|n| n.name == name)
    }

    /// Every node below `self`, depth-first, parents before children
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.descendants().count()
    }

    /// Name to node map over this subtree. Names are not unique; the first
    /// node in depth-first order wins.
    pub fn name_index(&self) -> HashMap<&str, &Node> {
        let mut index = HashMap::new();
        for node in std::iter::once(self).chain(self.descendants()) {
            index.entry(node.name.as_str()).or_insert(node);
        }
        index
    }

    #[cfg(feature = "glam")]
    pub fn transformation_mat4(&self) -> glam::Mat4 {
        crate::types::rows_to_mat4(&self.transformation)
    }

    #[cfg(feature = "mint")]
    pub fn transformation_mint(&self) -> mint::RowMatrix4<f32> {
        crate::types::rows_to_mint(&self.transformation)
    }
}

/// Depth-first iterator returned by [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A node whose children are still being copied.
struct Frame<'a> {
    raw: &'a sys::aiNode,
    child_ptrs: &'a [*mut sys::aiNode],
    next_child: usize,
    node: Node,
}

impl<'a> Frame<'a> {
    fn open(raw: &'a sys::aiNode, parent: Option<&sys::aiNode>) -> Result<Self> {
        // Prefer the walk's parent; fall back to mParent for the root of a subtree.
        let parent = parent.or_else(|| unsafe { raw.mParent.as_ref() });
        let parent_name = parent.map(|p| ai_string_to_string(&p.mName));

        let num_meshes = raw.mNumMeshes as usize;
        let src_meshes = unsafe { slice_from_ptr_len(raw, raw.mMeshes as *const u32, num_meshes) };
        let mut mesh_indices = try_with_capacity(src_meshes.len(), "node mesh indices")?;
        mesh_indices.extend_from_slice(src_meshes);

        let num_children = raw.mNumChildren as usize;
        let child_ptrs = unsafe {
            slice_from_ptr_len(raw, raw.mChildren as *const *mut sys::aiNode, num_children)
        };
        let children = try_with_capacity(child_ptrs.len(), "node children")?;

        Ok(Self {
            raw,
            child_ptrs,
            next_child: 0,
            node: Node {
                name: ai_string_to_string(&raw.mName),
                transformation: matrix_rows(&raw.mTransformation),
                parent_name,
                children,
                mesh_indices,
            },
        })
    }
}

/// Copy the tree rooted at `root`.
///
/// The walk is depth-first with an explicit stack, so a deep tree fails with
/// [`Error::InvalidScene`] instead of exhausting the thread's stack.
pub(crate) fn marshal_node_tree(root: &sys::aiNode) -> Result<Node> {
    let mut current = Frame::open(root, None)?;
    let mut ancestors: Vec<Frame<'_>> = Vec::new();

    loop {
        if let Some(&ptr) = current.child_ptrs.get(current.next_child) {
            let index = current.next_child;
            current.next_child += 1;

            let child = unsafe { ptr.as_ref() }.ok_or_else(|| {
                Error::invalid_scene(format!(
                    "node '{}' child {index} is null",
                    current.node.name
                ))
            })?;
            if ancestors.len() + 1 > MAX_DEPTH {
                return Err(Error::invalid_scene(format!(
                    "node hierarchy deeper than {MAX_DEPTH} levels"
                )));
            }

            let frame = Frame::open(child, Some(current.raw))?;
            ancestors.push(std::mem::replace(&mut current, frame));
            continue;
        }

        let finished = current.node;
        match ancestors.pop() {
            Some(parent) => {
                current = parent;
                current.node.children.push(finished);
            }
            None => return Ok(finished),
        }
    }
}
