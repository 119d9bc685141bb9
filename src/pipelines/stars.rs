//! Scrolling starfield backdrop.

use wgpu::util::DeviceExt;

use crate::pipelines::basic::{depth_state, mk_render_pipeline};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarsUniform {
    pub offset: [f32; 4],
    /// x = time, y = aspect ratio, z = density
    pub params: [f32; 4],
}

impl Default for StarsUniform {
    fn default() -> Self {
        Self {
            offset: [0.0; 4],
            params: [0.0, 16.0 / 9.0, 0.25, 0.0],
        }
    }
}

#[derive(Debug)]
pub struct Starfield {
    pub uniform: StarsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Starfield {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let uniform = StarsUniform::default();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Starfield Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("starfield_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, offset: [f32; 2], time: f32, aspect: f32) {
        self.uniform.offset = [offset[0], offset[1], 0.0, 0.0];
        self.uniform.params[0] = time;
        self.uniform.params[1] = aspect;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("starfield_bind_group_layout"),
    })
}

pub fn mk_stars_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    stars_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Starfield Pipeline Layout"),
        bind_group_layouts: &[stars_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Starfield Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("stars.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        None,
        Some(depth_state(false, wgpu::CompareFunction::LessEqual)),
        None,
        &[],
        shader,
    )
}
