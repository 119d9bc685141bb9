#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour() {
    use common::test_utils::{Subject, TestRender, rgba8};
    use flow_labs::{context::InitContext, flow::ImageTestResult, render::Render};
    use wgpu::Color;

    struct Empty;
    impl Subject for Empty {
        fn render<'pass>(&self) -> Render<'_, 'pass> {
            Render::None
        }
    }

    golden_image_test!(|_: InitContext| async move {
        Ok(TestRender::new(
            Empty,
            |ctx| ctx.clear_colour = Color::WHITE,
            |_, frames, texture| {
                if frames.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let white = rgba8(Color::WHITE);
                if texture.pixels().all(|pixel| *pixel == white) {
                    Ok(ImageTestResult::Passed)
                } else {
                    Ok(ImageTestResult::Failed)
                }
            },
        ))
    });
}
