#[cfg(test)]
mod tests {
    use crate::*;
    use std::mem::{align_of, offset_of, size_of};

    #[test]
    fn test_plain_struct_sizes() {
        assert_eq!(size_of::<aiString>(), 4 + MAXLEN);
        assert_eq!(size_of::<aiVector3D>(), 12);
        assert_eq!(size_of::<aiColor4D>(), 16);
        assert_eq!(size_of::<aiMatrix4x4>(), 64);
        assert_eq!(size_of::<aiAABB>(), 24);
    }

    #[test]
    fn test_pointer_fields_are_aligned() {
        let ptr = size_of::<*const u8>();
        assert_eq!(offset_of!(aiFace, mIndices), ptr);
        assert_eq!(offset_of!(aiScene, mRootNode), ptr);
        assert_eq!(offset_of!(aiMaterial, mNumProperties), ptr);
        assert_eq!(offset_of!(aiMesh, mVertices), 12usize.next_multiple_of(ptr));
        assert!(align_of::<aiMesh>().is_power_of_two());
    }

    #[test]
    fn test_mesh_attribute_arrays_follow_header_order() {
        let ptr = size_of::<*const u8>();
        let vertices = offset_of!(aiMesh, mVertices);
        assert_eq!(offset_of!(aiMesh, mBitangents), vertices + 3 * ptr);
        assert_eq!(offset_of!(aiMesh, mColors), vertices + 4 * ptr);
        assert_eq!(
            offset_of!(aiMesh, mTextureCoords),
            offset_of!(aiMesh, mColors) + AI_MAX_NUMBER_OF_COLOR_SETS as usize * ptr
        );
        assert_eq!(
            offset_of!(aiMesh, mNumUVComponents),
            offset_of!(aiMesh, mTextureCoords) + AI_MAX_NUMBER_OF_TEXTURECOORDS as usize * ptr
        );
    }

    #[test]
    fn test_node_and_property_headers() {
        assert_eq!(offset_of!(aiNode, mName), 0);
        assert_eq!(offset_of!(aiNode, mTransformation), size_of::<aiString>());
        assert_eq!(offset_of!(aiMaterialProperty, mSemantic), size_of::<aiString>());
        assert_eq!(offset_of!(aiMaterialProperty, mType), size_of::<aiString>() + 12);
    }

    #[test]
    fn test_post_process_flags_are_distinct_powers_of_two() {
        let flags = [
            aiPostProcessSteps_aiProcess_CalcTangentSpace,
            aiPostProcessSteps_aiProcess_JoinIdenticalVertices,
            aiPostProcessSteps_aiProcess_Triangulate,
            aiPostProcessSteps_aiProcess_GenSmoothNormals,
            aiPostProcessSteps_aiProcess_FlipUVs,
            aiPostProcessSteps_aiProcess_GenBoundingBoxes,
        ];
        let mut seen = 0u32;
        for f in flags {
            assert!(f.is_power_of_two());
            assert_eq!(seen & f, 0);
            seen |= f;
        }
    }

    #[test]
    fn test_defaults_are_null() {
        let mesh = aiMesh::default();
        assert!(mesh.mVertices.is_null());
        assert!(mesh.mColors.iter().all(|p| p.is_null()));
        let scene = aiScene::default();
        assert!(scene.mRootNode.is_null());
        assert_eq!(scene.mFlags & AI_SCENE_FLAGS_INCOMPLETE, 0);
    }
}
