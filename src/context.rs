use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraUniform, Projection},
    config::DemoConfig,
    data_structures::{
        material::{Material, MaterialUniform, material_layout},
        texture::Texture,
    },
    input::KeyState,
    pipelines::{
        Pipelines,
        light::{Light, SceneResources},
    },
};

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    pub tick_duration_millis: u64,
    pub camera: CameraResources,
    pub scene: SceneResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub assets: PathBuf,
    /// 1x1 white texture for materials without an image.
    pub white: Texture,
    /// Keys held and pressed during the current frame.
    pub keys: KeyState,
}

impl Context {
    pub async fn new(window: Arc<Window>, demo: &DemoConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::debug!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter is compatible with the window")?;
        let info = adapter.get_info();
        log::info!("Renderer: {} ({:?})", info.name, info.backend);
        log::info!("Driver: {} {}", info.driver, info.driver_info);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours in the shaders are linear, so an sRGB surface is required for correct output
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        let present_mode = if demo.window.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::default();
        let mut projection = Projection::default();
        projection.resize(config.width, config.height);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            projection,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        // Until a demo provides its own sky, reflections see a neutral grey
        let environment = Texture::solid_cube(&device, &queue, [128, 128, 128, 255], "default environment")?;
        let scene = SceneResources::new(
            &device,
            environment,
            &[Light::directional(
                cgmath::Vector3::new(-0.3, -1.0, -0.5),
                [1.0; 3],
                1.0,
            )],
        );

        let material_layout = material_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &config,
            &material_layout,
            &camera.bind_group_layout,
            &scene.bind_group_layout,
        );
        let white = Texture::solid_colour(&device, &queue, [255; 4], "white");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            clear_colour: demo.clear_colour(),
            tick_duration_millis: 500,
            camera,
            scene,
            pipelines,
            material_layout,
            assets: demo.assets_dir.clone(),
            white,
            keys: KeyState::default(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera.camera = camera;
    }

    pub fn set_projection(&mut self, mut projection: Projection) {
        projection.resize(self.config.width, self.config.height);
        self.camera.projection = projection;
    }
}

/// What a flow constructor may use while its resources load, before the first frame.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub assets: PathBuf,
    pub material_layout: wgpu::BindGroupLayout,
    pub stars_layout: wgpu::BindGroupLayout,
    pub white: Texture,
}

impl InitContext {
    /// A material with white textures and the given parameters.
    pub fn plain_material(&self, name: &str, uniform: MaterialUniform) -> Material {
        self.material(name, &self.white, &self.white, uniform)
    }

    pub fn material(
        &self,
        name: &str,
        diffuse: &Texture,
        specular: &Texture,
        uniform: MaterialUniform,
    ) -> Material {
        Material::new(
            &self.device,
            name,
            diffuse,
            specular,
            uniform,
            &self.material_layout,
        )
    }
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        // wgpu handles are reference counted, so these clones are cheap
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            assets: ctx.assets.clone(),
            material_layout: ctx.material_layout.clone(),
            stars_layout: ctx.pipelines.stars_layout.clone(),
            white: ctx.white.clone(),
        }
    }
}
