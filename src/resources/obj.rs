//! Wavefront OBJ import through `tobj`.
//!
//! Every mesh is flattened into interleaved [`ModelVertex`] data: position,
//! normal, the diffuse colour of the mesh's material and texture coordinates.

use std::{
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use cgmath::{InnerSpace, Vector3, Zero};

use crate::{
    data_structures::model::{MeshData, Model, ModelVertex},
    resources::load_string,
};

pub fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Interleave the attributes of parsed OBJ models.
pub fn meshes_from_obj(models: &[tobj::Model], materials: &[tobj::Material]) -> Vec<MeshData> {
    models
        .iter()
        .map(|m| {
            let mesh = &m.mesh;
            let material_colour = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|material| material.diffuse);
            let has_normals = mesh.normals.len() == mesh.positions.len();

            let mut vertices = (0..mesh.positions.len() / 3)
                .map(|i| {
                    let attr3 = |data: &[f32]| [data[i * 3], data[i * 3 + 1], data[i * 3 + 2]];
                    let color = material_colour
                        .or_else(|| (mesh.vertex_color.len() == mesh.positions.len()).then(|| attr3(&mesh.vertex_color[..])))
                        .unwrap_or(ModelVertex::WHITE);
                    let normal = if has_normals { attr3(&mesh.normals[..]) } else { [0.0; 3] };
                    ModelVertex::new(attr3(&mesh.positions[..]), normal)
                        .with_color(color)
                        .with_tex_coords([
                            mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                            1.0 - mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(0.0),
                        ])
                })
                .collect::<Vec<_>>();

            if !has_normals {
                log::debug!("{}: no normals in file, averaging face normals", m.name);
                smooth_normals(&mut vertices, &mesh.indices);
            }

            MeshData {
                vertices,
                indices: mesh.indices.clone(),
            }
        })
        .collect()
}

/// Give every vertex the normalized sum of the normals of the faces that use it.
pub fn smooth_normals(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut sums = vec![Vector3::zero(); vertices.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        if a.max(b).max(c) >= vertices.len() {
            continue;
        }
        let pa = Vector3::from(vertices[a].position);
        let pb = Vector3::from(vertices[b].position);
        let pc = Vector3::from(vertices[c].position);
        // area weighted
        let normal = (pb - pa).cross(pc - pa);
        sums[a] += normal;
        sums[b] += normal;
        sums[c] += normal;
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        if sum.magnitude2() > 0.0 {
            vertex.normal = sum.normalize().into();
        }
    }
}

/// Read an OBJ (and its MTL files) relative to `root`.
///
/// A missing material library is not fatal: the meshes fall back to white.
pub async fn load_obj(root: &Path, file_name: &str) -> anyhow::Result<Vec<MeshData>> {
    let obj_text = load_string(root, file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    // MTL names inside the file are relative to the OBJ itself
    let obj_dir: PathBuf = Path::new(file_name)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (models, obj_materials) =
        tobj::load_obj_buf_async(&mut obj_reader, &load_options(), |p| {
            let root = root.to_path_buf();
            let mtl_name = obj_dir.join(p).to_string_lossy().into_owned();
            async move {
                match load_string(&root, &mtl_name).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("{:#}", e);
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        })
        .await?;

    let materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("{file_name}: materials unavailable ({e}), using white");
        Vec::new()
    });
    let meshes = meshes_from_obj(&models, &materials);
    if meshes.iter().all(|mesh| mesh.indices.is_empty()) {
        anyhow::bail!("{file_name} contains no triangles");
    }
    log::info!(
        "loaded {file_name}: {} meshes, {} triangles",
        meshes.len(),
        meshes.iter().map(MeshData::triangle_count).sum::<usize>()
    );
    Ok(meshes)
}

/// Load an OBJ file straight into GPU buffers.
pub async fn load_model_obj(device: &wgpu::Device, root: &Path, file_name: &str) -> anyhow::Result<Model> {
    let meshes = load_obj(root, file_name).await?;
    Ok(Model::from_data(device, file_name, &meshes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
mtllib tri.mtl
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
usemtl red
f 1/1/1 2/2/1 3/3/1
";

    const TRIANGLE_MTL: &str = "\
newmtl red
Kd 1.0 0.0 0.0
";

    fn parse(obj: &str, mtl: Option<&'static str>) -> Vec<MeshData> {
        let (models, materials) = tobj::load_obj_buf(&mut BufReader::new(Cursor::new(obj)), &load_options(), |_| match mtl {
            Some(text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(text))),
            None => Err(tobj::LoadError::OpenFileFailed),
        })
        .unwrap();
        meshes_from_obj(&models, &materials.unwrap_or_default())
    }

    #[test]
    fn interleaves_position_normal_colour_and_uv() {
        let meshes = parse(TRIANGLE_OBJ, Some(TRIANGLE_MTL));
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.triangle_count(), 1);
        let top = mesh
            .vertices
            .iter()
            .find(|v| v.position == [0.0, 1.0, 0.0])
            .unwrap();
        assert_eq!(top.normal, [0.0, 0.0, 1.0]);
        assert_eq!(top.color, [1.0, 0.0, 0.0]);
        // V is flipped for top-left texture origin
        assert_eq!(top.tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn missing_material_is_white() {
        let meshes = parse(TRIANGLE_OBJ, None);
        assert!(meshes[0].vertices.iter().all(|v| v.color == ModelVertex::WHITE));
    }

    #[test]
    fn quads_are_triangulated_and_missing_normals_rebuilt() {
        let quad = "v 0 0 0\nv 1 0 0\nv 1 0 -1\nv 0 0 -1\nf 1 2 3 4\n";
        let meshes = parse(quad, None);
        let mesh = &meshes[0];
        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert!((v.normal[1] - 1.0).abs() < 1e-6, "normal {:?}", v.normal);
        }
    }
}
