//! Render pipelines.
//!
//! - `basic` builds the lit pipeline every mesh is drawn with
//! - `light` holds the scene light list and environment map
//! - `skybox` and `stars` are full-screen backdrops

pub mod basic;
pub mod light;
pub mod skybox;
pub mod stars;

#[derive(Debug)]
pub struct Pipelines {
    pub lit: wgpu::RenderPipeline,
    pub skybox: wgpu::RenderPipeline,
    pub stars: wgpu::RenderPipeline,
    pub stars_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        material_layout: &wgpu::BindGroupLayout,
        camera_layout: &wgpu::BindGroupLayout,
        scene_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let stars_layout = stars::mk_bind_group_layout(device);
        Self {
            lit: basic::mk_lit_pipeline(device, config, material_layout, camera_layout, scene_layout),
            skybox: skybox::mk_skybox_pipeline(device, config, camera_layout, scene_layout),
            stars: stars::mk_stars_pipeline(device, config, &stars_layout),
            stars_layout,
        }
    }
}
