//! Per-instance transforms.
//!
//! Every drawn object carries at least one instance. Its model matrix and the
//! matching normal matrix are streamed to the vertex shader through an instance
//! buffer instead of a per-draw uniform.

use cgmath::{Matrix, Matrix3, Matrix4, One, Quaternion, SquareMatrix, Vector3};

use crate::data_structures::model;

/// Translation, rotation and (possibly non-uniform) scale, composed as `T * R * S`.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_nonuniform_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw::from_matrix(self.to_matrix())
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Self::at(position)
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// Transpose of the inverse of the upper 3x3, so normals survive non-uniform scaling.
/// Singular matrices (a zero scale axis) fall back to the plain upper 3x3.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        model.x.truncate(),
        model.y.truncate(),
        model.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(upper)
}

/// What the instance buffer actually stores.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    pub fn from_matrix(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            normal: normal_matrix(&model).into(),
        }
    }
}

impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // mat4 model, one slot per column
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // mat3 normal
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, Rotation3, Transform, Vector4};

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let instance = Instance::at(Vector3::new(10.0, 0.0, 0.0))
            .with_rotation(Quaternion::from_angle_y(Deg(90.0)))
            .with_scale(2.0);
        let p = instance.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated about y (0,0,-2) -> moved (10,0,-2)
        assert!(close(p.x, 10.0));
        assert!(close(p.y, 0.0));
        assert!(close(p.z, -2.0));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_nonuniform_scale() {
        let model = Instance::new()
            .with_nonuniform_scale(Vector3::new(200.0, 0.1, 200.0))
            .to_matrix();
        // A sloped surface: tangent along (1, 1, 0), normal along (1, -1, 0)
        let tangent = model.transform_vector(Vector3::new(1.0, 1.0, 0.0));
        let normal = normal_matrix(&model) * Vector3::new(1.0, -1.0, 0.0);
        assert!(close(tangent.normalize().dot(normal.normalize()), 0.0));
    }

    #[test]
    fn singular_scale_does_not_produce_nan() {
        let model = Instance::new().with_scale(0.0).to_matrix();
        let raw = InstanceRaw::from_matrix(model);
        assert!(raw.normal.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn instance_layout_spans_locations_five_to_eleven() {
        use crate::data_structures::model::Vertex;
        let desc = InstanceRaw::desc();
        assert_eq!(desc.array_stride, 100);
        let locations: Vec<_> = desc.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, (5..=11).collect::<Vec<_>>());
    }
}
