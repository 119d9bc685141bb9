#[cfg(feature = "integration-tests")]
use flow_labs::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

/// Frames seen by a golden image flow. Readback starts on frame 0, which may
/// still show the clear colour only, so validators usually wait a frame.
#[derive(Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) type Frame = image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>;

/// Something a golden image test draws.
#[cfg(feature = "integration-tests")]
pub(crate) trait Subject {
    fn render<'pass>(&self) -> Render<'_, 'pass>;
}

#[cfg(feature = "integration-tests")]
impl Subject for flow_labs::data_structures::object::SceneObject {
    fn render<'pass>(&self) -> Render<'_, 'pass> {
        self.into()
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) type Setup = Box<dyn Fn(&mut Context)>;
#[cfg(feature = "integration-tests")]
pub(crate) type Validate =
    Box<dyn Fn(&Context, &mut FrameCounter, &mut Frame) -> Result<ImageTestResult, anyhow::Error>>;

/// Draws a subject once and hands every read-back frame to `validate`.
#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender<T> {
    subject: T,
    setup: Setup,
    validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl<T: Subject> TestRender<T> {
    pub(crate) fn new(
        subject: T,
        setup: impl Fn(&mut Context) + 'static,
        validate: impl Fn(&Context, &mut FrameCounter, &mut Frame) -> Result<ImageTestResult, anyhow::Error>
        + 'static,
    ) -> Self {
        Self {
            subject,
            setup: Box::new(setup),
            validate: Box::new(validate),
        }
    }
}

#[cfg(feature = "integration-tests")]
impl<T: Subject> GraphicsFlow<FrameCounter, ()> for TestRender<T> {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut FrameCounter, _: std::time::Duration) -> Out<FrameCounter, ()> {
        state.progress();
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.subject.render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut Frame,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, state, texture)
    }
}

/// Pixel value a clear colour or flat material ends up as.
#[cfg(feature = "integration-tests")]
pub(crate) fn rgba8(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

/// Run a single flow built by an async `InitContext -> anyhow::Result<TestRender<_>>`
/// closure until its validator passes.
#[macro_export]
macro_rules! golden_image_test {
    ($build:expr) => {{
        use flow_labs::{config::DemoConfig, flow};

        let config = DemoConfig::titled("golden image");
        flow::run::<crate::common::test_utils::FrameCounter, ()>(config, vec![flow::constructor($build)])
            .expect("golden image flow failed");
    }};
}
