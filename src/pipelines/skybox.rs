//! Skybox pass: draws the scene's environment cube map behind everything else.

use crate::pipelines::basic::{depth_state, mk_render_pipeline};

pub fn mk_skybox_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Skybox Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, scene_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Skybox Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        None,
        // The sky sits exactly on the far plane and must not occlude anything
        Some(depth_state(false, wgpu::CompareFunction::LessEqual)),
        None,
        &[],
        shader,
    )
}
