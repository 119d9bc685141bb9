//! Surface materials for the lit pipeline.
//!
//! A material binds a diffuse map, a specular map and a small uniform with the
//! tunable surface parameters. The uniform can be rewritten every frame, which is
//! how the demos expose colour, shininess and ambient controls.

use wgpu::util::DeviceExt;

use crate::data_structures::texture::{Texture, create_default_sampler};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Multiplied into the vertex colour and the diffuse map.
    pub tint: [f32; 4],
    /// rgb = specular colour, a = specular power
    pub specular: [f32; 4],
    /// x = ambient, y = reflectivity, z = emissive, w = use specular map
    pub params: [f32; 4],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            tint: [1.0; 4],
            specular: [0.5, 0.5, 0.5, 32.0],
            params: [0.1, 0.0, 0.0, 0.0],
        }
    }
}

impl MaterialUniform {
    pub fn tinted(rgb: [f32; 3]) -> Self {
        Self::default().with_tint(rgb)
    }

    /// Drawn at full brightness regardless of the lights, e.g. the sun or light markers.
    pub fn emissive(rgb: [f32; 3]) -> Self {
        let mut uniform = Self::tinted(rgb);
        uniform.params[2] = 1.0;
        uniform
    }

    pub fn with_tint(mut self, rgb: [f32; 3]) -> Self {
        self.tint = [rgb[0], rgb[1], rgb[2], 1.0];
        self
    }

    pub fn with_specular(mut self, rgb: [f32; 3], power: f32) -> Self {
        self.specular = [rgb[0], rgb[1], rgb[2], power];
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.params[0] = ambient;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.params[1] = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Scale the specular colour by the red channel of the specular map.
    pub fn with_specular_map(mut self) -> Self {
        self.params[3] = 1.0;
        self
    }

    pub fn specular_power(&self) -> f32 {
        self.specular[3]
    }

    pub fn set_specular_power(&mut self, power: f32) {
        self.specular[3] = power;
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub uniform: MaterialUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        diffuse: &Texture,
        specular: &Texture,
        uniform: MaterialUniform,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} material buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let fallback_sampler = create_default_sampler(device);
        let diffuse_sampler = diffuse.sampler.as_ref().unwrap_or(&fallback_sampler);
        let specular_sampler = specular.sampler.as_ref().unwrap_or(&fallback_sampler);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(diffuse_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(specular_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: buffer.as_entire_binding(),
                },
            ],
            label: Some(name),
        });

        Self {
            name: name.to_string(),
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Mirror `self.uniform` to the GPU.
    pub fn write(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    let sampler = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture(0),
            sampler(1),
            texture(2),
            sampler(3),
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_three_vec4s() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn emissive_sets_flag_and_tint() {
        let m = MaterialUniform::emissive([1.0, 0.5, 0.0]);
        assert_eq!(m.params[2], 1.0);
        assert_eq!(m.tint, [1.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn reflectivity_is_clamped() {
        let m = MaterialUniform::default().with_reflectivity(3.0);
        assert_eq!(m.params[1], 1.0);
    }
}
