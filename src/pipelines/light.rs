//! Scene-wide shading inputs: the light list and the environment cube map.
//!
//! Both live in bind group 2 of the lit pipeline; the skybox pipeline samples the
//! same environment map.

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::texture::Texture;

pub const MAX_LIGHTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Parallel rays along `direction`; position is ignored.
    Directional = 0,
    /// Radiates from `position`, falling off with distance.
    Point = 1,
    /// A point light restricted to a cone around `direction`.
    Spot = 2,
}

impl LightKind {
    pub fn next(self) -> Self {
        match self {
            Self::Directional => Self::Point,
            Self::Point => Self::Spot,
            Self::Spot => Self::Directional,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vector3<f32>,
    /// Direction the light travels in.
    pub direction: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Cosine of the spot cone half-angle.
    pub cone_cos: f32,
}

impl Light {
    pub fn directional(direction: Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vector3::new(0.0, 0.0, 0.0),
            direction: direction.normalize(),
            color,
            intensity,
            cone_cos: -1.0,
        }
    }

    pub fn point(position: Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vector3::new(0.0, -1.0, 0.0),
            color,
            intensity,
            cone_cos: -1.0,
        }
    }

    pub fn spot(
        position: Vector3<f32>,
        direction: Vector3<f32>,
        color: [f32; 3],
        intensity: f32,
        cone_cos: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            direction: direction.normalize(),
            color,
            intensity,
            cone_cos,
        }
    }

    /// A light given as a homogeneous vector: `w == 0` is a direction the light
    /// comes from, anything else a position.
    pub fn from_homogeneous(v: [f32; 4], color: [f32; 3], intensity: f32) -> Self {
        let xyz = Vector3::new(v[0], v[1], v[2]);
        if v[3] == 0.0 {
            Self::directional(-xyz, color, intensity)
        } else {
            Self::point(xyz / v[3], color, intensity)
        }
    }

    pub fn to_raw(&self) -> LightRaw {
        LightRaw {
            position: self.position.extend(1.0).into(),
            direction: self.direction.extend(self.cone_cos).into(),
            color: [self.color[0], self.color[1], self.color[2], self.intensity],
            kind: self.kind as u32,
            _padding: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    position: [f32; 4],
    /// xyz = direction, w = cone cosine
    direction: [f32; 4],
    /// rgb = colour, a = intensity
    color: [f32; 4],
    kind: u32,
    // Uniform arrays need a 16 byte stride
    _padding: [u32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    lights: [LightRaw; MAX_LIGHTS],
    count: u32,
    _padding: [u32; 3],
}

impl SceneUniform {
    /// Lights beyond [`MAX_LIGHTS`] are dropped with a warning.
    pub fn new(lights: &[Light]) -> Self {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights requested, only the first {} are used",
                lights.len(),
                MAX_LIGHTS
            );
        }
        let mut uniform: SceneUniform = bytemuck::Zeroable::zeroed();
        for (slot, light) in uniform.lights.iter_mut().zip(lights) {
            *slot = light.to_raw();
        }
        uniform.count = lights.len().min(MAX_LIGHTS) as u32;
        uniform
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[derive(Debug)]
pub struct SceneResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub environment: Texture,
}

impl SceneResources {
    pub fn new(device: &wgpu::Device, environment: Texture, lights: &[Light]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Light Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::new(lights)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer, &environment);
        Self {
            buffer,
            bind_group,
            bind_group_layout,
            environment,
        }
    }

    pub fn write_lights(&self, queue: &wgpu::Queue, lights: &[Light]) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::new(lights)]),
        );
    }

    /// Swap the cube map used for the skybox and reflections.
    pub fn set_environment(&mut self, device: &wgpu::Device, environment: Texture) {
        self.bind_group = mk_bind_group(device, &self.bind_group_layout, &self.buffer, &environment);
        self.environment = environment;
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::Cube,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("scene_bind_group_layout"),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    environment: &Texture,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &environment.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = crate::data_structures::texture::create_default_sampler(device);
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&environment.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("scene_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<LightRaw>(), 64);
        assert_eq!(std::mem::size_of::<SceneUniform>(), 64 * MAX_LIGHTS + 16);
    }

    #[test]
    fn homogeneous_w_selects_kind() {
        let sun = Light::from_homogeneous([3.0, 1.0, 3.0, 0.0], [1.0; 3], 1.0);
        assert_eq!(sun.kind, LightKind::Directional);
        // light comes from (3,1,3), so it travels towards the origin
        assert!(sun.direction.x < 0.0 && sun.direction.y < 0.0);

        let bulb = Light::from_homogeneous([0.0, 3.0, 13.0, 1.0], [1.0; 3], 100.0);
        assert_eq!(bulb.kind, LightKind::Point);
        assert_eq!(bulb.position, Vector3::new(0.0, 3.0, 13.0));
    }

    #[test]
    fn scene_uniform_caps_light_count() {
        let light = Light::point(Vector3::new(0.0, 1.0, 0.0), [1.0; 3], 1.0);
        let lights = vec![light; MAX_LIGHTS + 3];
        assert_eq!(SceneUniform::new(&lights).count(), MAX_LIGHTS as u32);
        assert_eq!(SceneUniform::new(&lights[..5]).count(), 5);
    }

    #[test]
    fn light_kinds_cycle() {
        assert_eq!(LightKind::Directional.next(), LightKind::Point);
        assert_eq!(LightKind::Spot.next(), LightKind::Directional);
    }
}
