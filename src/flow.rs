//! Flow control and application event loop.
//!
//! A "flow" is one self-contained demo scene: it loads its resources, reacts to
//! input, advances its simulation and says what to draw every frame. The runtime
//! owns the window and GPU context and drives all active flows.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S, E>`] is the trait for scenes that handle events and rendering
//! - [`Out<S, E>`] is the output type for async work and context configuration
//! - [`FlowConstructor<S, E>`] builds a flow asynchronously once the GPU is ready
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. Window/device events are forwarded to every flow (keys are tracked in the context)
//! 2. `on_update` runs with the frame time
//! 3. The camera uniform is uploaded
//! 4. Every flow's `on_render` is collected, backdrops are drawn, then lit objects
//! 5. The frame is presented and `on_tick` runs if a tick elapsed

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{Backdrop, Instanced, Render},
};

///
/// Output type of every lifecycle hook.
///
/// `Out::FutEvent` resolves futures into custom events that are queued for
/// `on_custom_events`.
///
/// `Out::FutFn` resolves futures into mutations of the shared state.
///
/// `Out::Configure` modifies the Context, e.g. to move the camera, change the
/// clear colour or swap the environment map.
///
/// `Empty` is the default when nothing needs to happen.
///
pub enum Out<S, E> {
    FutEvent(Vec<Box<dyn Future<Output = E>>>),
    FutFn(Vec<Box<dyn Future<Output = Box<dyn FnOnce(&mut S)>>>>),
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl<S, E> Out<S, E> {
    pub fn configure(f: impl FnOnce(&mut Context) + 'static) -> Self {
        Self::Configure(Box::new(f))
    }
}

impl<S, E> Default for Out<S, E> {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure the context here
/// 2. `on_window_events()` and `on_device_events()` are called for each winit input event
/// 3. `on_update()` is called every frame
/// 4. `on_tick()` is called every `tick_duration_millis`
/// 5. `on_custom_events()` is called for custom application events
/// 6. `on_render()` is called each frame and specifies how to render `self`
///
pub trait GraphicsFlow<S, E> {
    /// Initialize the flow and configure the context (camera, projection, clear colour, sky).
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S, E>;

    /// Called every frame with the elapsed time `dt`.
    ///
    /// Keyboard state for this frame is available through `ctx.keys`.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S, E>;

    /// Called every `tick_duration_millis` milliseconds.
    fn on_tick(&mut self, _ctx: &Context, _state: &mut S) -> Out<S, E> {
        Out::Empty
    }

    fn on_device_events(&mut self, _ctx: &Context, _state: &mut S, _event: &DeviceEvent) -> Out<S, E> {
        Out::Empty
    }

    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out<S, E> {
        Out::Empty
    }

    /// Returns the event if it was not consumed so the next flow can see it.
    fn on_custom_events(&mut self, _ctx: &Context, _state: &mut S, event: E) -> Option<E> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass>;

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _state: &mut S,
        _texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok(ImageTestResult::Passed)
    }
}

impl<State, Event> Debug for dyn GraphicsFlow<State, Event> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Async factory for a flow. Failing here (e.g. a mesh is missing) stops the program.
pub type FlowConstructor<S, E> = Box<
    dyn FnOnce(
        InitContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S, E>>>>>>,
>;

/// Wrap an async flow builder into a [`FlowConstructor`].
pub fn constructor<S, E, F, Fut, G>(build: F) -> FlowConstructor<S, E>
where
    F: FnOnce(InitContext) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<G>> + 'static,
    G: GraphicsFlow<S, E> + 'static,
{
    Box::new(move |ctx| {
        Box::pin(async move {
            let flow = build(ctx).await?;
            let flow: Box<dyn GraphicsFlow<S, E>> = Box::new(flow);
            Ok(flow)
        })
    })
}

/// GPU context, shared state and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>, config: &DemoConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let mut app_state = Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        };
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        Ok(app_state)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.camera.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    #[cfg(feature = "integration-tests")]
    fn padded_size(&self) -> (u32, u32) {
        // Buffer copies need rows aligned to 256 bytes, i.e. 64 RGBA pixels
        (self.ctx.config.width.div_ceil(64) * 64, self.ctx.config.height)
    }

    #[cfg(feature = "integration-tests")]
    fn test_targets(&self) -> (wgpu::Texture, wgpu::Texture, wgpu::Extent3d) {
        let (width, height) = self.padded_size();
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = |label, format| {
            self.ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
        };
        (
            target("Golden Image Colour", self.ctx.config.format),
            target("Golden Image Depth", Texture::DEPTH_FORMAT),
            extent,
        )
    }

    fn render<Event>(
        &mut self,
        graphics_flows: &mut [Box<dyn GraphicsFlow<State, Event>>],
        #[cfg(feature = "integration-tests")] async_runtime: &tokio::runtime::Runtime,
        #[cfg(feature = "integration-tests")] proxy: &winit::event_loop::EventLoopProxy<
            FlowEvent<Event>,
        >,
    ) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;

        #[cfg(not(feature = "integration-tests"))]
        let (view, depth_view) = (
            output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            self.ctx.depth_texture.view.clone(),
        );

        #[cfg(feature = "integration-tests")]
        let (tex, view, depth_view, extent) = {
            let (tex, depth, extent) = self.test_targets();
            let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
            let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
            (tex, view, depth_view, extent)
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut backdrops: Vec<Backdrop> = Vec::new();
            let mut lits: Vec<Instanced> = Vec::new();
            graphics_flows.iter().for_each(|flow| {
                flow.on_render()
                    .set_pipelines(&self.ctx, &mut render_pass, &mut backdrops, &mut lits);
            });

            for backdrop in backdrops {
                match backdrop {
                    Backdrop::Skybox => {
                        render_pass.set_pipeline(&self.ctx.pipelines.skybox);
                        render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                        render_pass.set_bind_group(1, &self.ctx.scene.bind_group, &[]);
                    }
                    Backdrop::Starfield(stars) => {
                        render_pass.set_pipeline(&self.ctx.pipelines.stars);
                        render_pass.set_bind_group(0, &stars.bind_group, &[]);
                    }
                }
                render_pass.draw(0..3, 0..1);
            }

            render_pass.set_pipeline(&self.ctx.pipelines.lit);
            for instanced in lits {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("skipping a draw with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    &instanced.material.bind_group,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.scene.bind_group,
                );
            }
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: (u32_size * extent.width * extent.height) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: Some("Golden Image Readback"),
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * extent.width),
                        rows_per_image: Some(extent.height),
                    },
                },
                extent,
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            let verdict = async_runtime.block_on(self.validate_frame(graphics_flows, &output_buffer, extent));
            match verdict {
                Ok(true) => {
                    let _ = proxy.send_event(FlowEvent::Exit);
                }
                Ok(false) => (),
                Err(e) => {
                    let _ = proxy.send_event(FlowEvent::Failed(e));
                }
            }
        }

        output.present();
        Ok(())
    }

    /// Read the offscreen frame back and let every flow judge it. `Ok(true)` once all passed.
    #[cfg(feature = "integration-tests")]
    async fn validate_frame<Event>(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow<State, Event>>],
        output_buffer: &wgpu::Buffer,
        extent: wgpu::Extent3d,
    ) -> anyhow::Result<bool> {
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        self.ctx.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })?;
        rx.receive()
            .await
            .ok_or_else(|| anyhow::anyhow!("readback channel closed"))??;
        let data = buffer_slice.get_mapped_range();
        let mut img = image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(extent.width, extent.height, data)
            .ok_or_else(|| anyhow::anyhow!("readback buffer is smaller than the frame"))?;
        let mut all_passed = true;
        for flow in graphics_flows {
            match flow.render_to_texture(&self.ctx, &mut self.state, &mut img)? {
                ImageTestResult::Passed => (),
                ImageTestResult::Waiting => all_passed = false,
                ImageTestResult::Failed => anyhow::bail!("golden image assertion failed"),
            }
        }
        Ok(all_passed)
    }
}

pub struct App<State: 'static, Event: 'static> {
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<Event>>,
    config: DemoConfig,
    state: Option<AppState<State>>,
    graphics_flows: Vec<Box<dyn GraphicsFlow<State, Event>>>,
    // Taken on `resumed`
    constructors: Option<Vec<FlowConstructor<State, Event>>>,
    failure: Option<anyhow::Error>,
    last_time: Instant,
    time_since_tick: Duration,
}

impl<State, Event> App<State, Event>
where
    State: 'static,
    Event: 'static,
{
    fn new(
        event_loop: &EventLoop<FlowEvent<Event>>,
        config: DemoConfig,
        constructors: Vec<FlowConstructor<State, Event>>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            config,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            failure: None,
            last_time: Instant::now(),
            time_since_tick: Duration::from_millis(0),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure = Some(error);
        event_loop.exit();
    }

    fn min_frame_time(&self) -> Option<Duration> {
        self.config
            .window
            .max_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps))
    }
}

pub(crate) enum FlowEvent<Event: 'static> {
    Custom(Event),
    #[allow(dead_code)]
    Failed(anyhow::Error),
    #[allow(dead_code)]
    Exit,
}

impl<Event> Debug for FlowEvent<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(E)"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl<State: 'static + Default, Event: 'static> ApplicationHandler<FlowEvent<Event>>
    for App<State, Event>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            // Already initialized; mobile platforms may resume more than once
            return;
        };

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("cannot open a window")),
        };

        let config = self.config.clone();
        let init_future = async move {
            let app_state = AppState::<State>::new(window, &config).await?;
            let flow_futures: Vec<_> = constructors
                .into_iter()
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures)
                .await
                .into_iter()
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::Ok((app_state, flows))
        };

        let (mut app_state, flows) = match self.async_runtime.block_on(init_future) {
            Ok(initialized) => initialized,
            Err(e) => return self.fail(event_loop, e),
        };
        self.graphics_flows = flows;
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(
                &self.async_runtime,
                &mut app_state.state,
                &mut app_state.ctx,
                self.proxy.clone(),
                out,
            );
        });
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<Event>) {
        match event {
            FlowEvent::Custom(custom_event) => {
                if let Some(state) = &mut self.state {
                    let result = self
                        .graphics_flows
                        .iter_mut()
                        .fold(Some(custom_event), |event, flow| {
                            flow.on_custom_events(&state.ctx, &mut state.state, event?)
                        });
                    if result.is_some() {
                        log::warn!("Custom event was not consumed this cycle");
                    }
                }
            }
            FlowEvent::Failed(error) => self.fail(event_loop, error),
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_device_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(
                &self.async_runtime,
                &mut state.state,
                &mut state.ctx,
                self.proxy.clone(),
                out,
            );
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let min_frame_time = self.min_frame_time();
        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.keys.handle_window_event(&event);

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(
                &self.async_runtime,
                &mut state.state,
                &mut state.ctx,
                self.proxy.clone(),
                out,
            );
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Some(min) = min_frame_time {
                    if self.last_time.elapsed() < min {
                        state.ctx.window.request_redraw();
                        return;
                    }
                }
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                self.time_since_tick += dt;

                self.graphics_flows.iter_mut().for_each(|f| {
                    let out = f.on_update(&state.ctx, &mut state.state, dt);
                    handle_flow_output(
                        &self.async_runtime,
                        &mut state.state,
                        &mut state.ctx,
                        self.proxy.clone(),
                        out,
                    );
                });
                state.ctx.keys.end_frame();
                state.ctx.camera.write(&state.ctx.queue);

                match state.render(
                    &mut self.graphics_flows,
                    #[cfg(feature = "integration-tests")]
                    &self.async_runtime,
                    #[cfg(feature = "integration-tests")]
                    &self.proxy,
                ) {
                    Ok(_) => {
                        if self.time_since_tick
                            >= Duration::from_millis(state.ctx.tick_duration_millis)
                        {
                            self.graphics_flows.iter_mut().for_each(|f| {
                                let out = f.on_tick(&state.ctx, &mut state.state);
                                handle_flow_output(
                                    &self.async_runtime,
                                    &mut state.state,
                                    &mut state.ctx,
                                    self.proxy.clone(),
                                    out,
                                );
                            });
                            self.time_since_tick = Duration::from_millis(0);
                        }
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

fn handle_flow_output<State, Event>(
    async_runtime: &tokio::runtime::Runtime,
    state: &mut State,
    ctx: &mut Context,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<Event>>,
    out: Out<State, Event>,
) {
    match out {
        Out::FutEvent(futures) => {
            let fut =
                async move { futures::future::join_all(futures.into_iter().map(Pin::from)).await };
            let resolved = async_runtime.block_on(fut);
            for event in resolved {
                if let Err(err) = proxy.send_event(FlowEvent::Custom(event)) {
                    log::error!("Event loop closed before all events could be processed: {}", err);
                    break;
                }
            }
        }
        Out::FutFn(futures) => {
            let fut = async move {
                futures::future::join_all(futures.into_iter().map(Pin::from)).await
            };
            let resolved: Vec<Box<dyn FnOnce(&mut State)>> = async_runtime.block_on(fut);
            resolved.into_iter().for_each(|mutation| mutation(state));
        }
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Warning: Could not initialize logger: {}", e);
    }
}

/// Open a window for `config` and drive the given flows until it closes.
///
/// Returns the error that stopped the program, if any: a failed flow
/// constructor, a missing GPU or a failed golden image check.
pub fn run<State: 'static + Default, Event: 'static>(
    config: DemoConfig,
    constructors: Vec<FlowConstructor<State, Event>>,
) -> anyhow::Result<()> {
    init_logging();
    log::info!("starting {}", config.window.title);

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<Event>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<Event>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent<Event>> = EventLoop::with_user_event().build()?;

    let mut app: App<State, Event> = App::new(&event_loop, config, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
