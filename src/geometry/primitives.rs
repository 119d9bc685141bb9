use std::f32::consts::PI;

use crate::data_structures::model::{MeshData, ModelVertex};

const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

/// Corner indices and outward normal per face: bottom, left, front, back, right, top.
const CUBE_FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 1, 2, 3], [0.0, -1.0, 0.0]),
    ([7, 4, 0, 3], [-1.0, 0.0, 0.0]),
    ([4, 5, 1, 0], [0.0, 0.0, 1.0]),
    ([6, 7, 3, 2], [0.0, 0.0, -1.0]),
    ([5, 6, 2, 1], [1.0, 0.0, 0.0]),
    ([7, 6, 5, 4], [0.0, 1.0, 0.0]),
];

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// A 2×2×2 cube centred on the origin with 4 vertices per face so each face has its own normal.
pub fn cube() -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (face, (corners, normal)) in CUBE_FACES.iter().enumerate() {
        let base = (face * 4) as u32;
        for (corner, uv) in corners.iter().zip(FACE_UVS) {
            vertices.push(ModelVertex::new(CUBE_CORNERS[*corner], *normal).with_tex_coords(uv));
        }
        indices.extend([3, 1, 0, 3, 2, 1].map(|i| base + i));
    }
    MeshData { vertices, indices }
}

/// Unit sphere with `stacks` latitude bands and `slices` longitude bands.
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let phi = v * PI;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let theta = u * 2.0 * PI;
            let p = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(ModelVertex::new(p, p).with_tex_coords([u, v]));
        }
    }

    let row = slices + 1;
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + row;
            indices.extend([a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_four_vertices_per_face() {
        let cube = cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(&cube.indices[..6], &[3, 1, 0, 3, 2, 1]);
        assert_eq!(&cube.indices[30..], &[23, 21, 20, 23, 22, 21]);
    }

    #[test]
    fn cube_face_vertices_lie_on_their_face() {
        let cube = cube();
        for face in cube.vertices.chunks(4) {
            let normal = face[0].normal;
            for v in face {
                assert_eq!(v.normal, normal);
                let along: f32 = (0..3).map(|i| v.position[i] * normal[i]).sum();
                assert_eq!(along, 1.0);
            }
        }
        // bottom comes first, top last
        assert_eq!(cube.vertices[0].normal, [0.0, -1.0, 0.0]);
        assert_eq!(cube.vertices[23].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn sphere_vertices_are_unit_length() {
        let sphere = uv_sphere(8, 16);
        assert_eq!(sphere.vertices.len(), 9 * 17);
        assert_eq!(sphere.triangle_count(), 8 * 16 * 2);
        for v in &sphere.vertices {
            let len: f32 = v.position.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
        assert!(sphere.indices.iter().all(|i| (*i as usize) < sphere.vertices.len()));
    }
}
