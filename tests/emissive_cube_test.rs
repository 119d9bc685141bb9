#[cfg(feature = "integration-tests")]
#[macro_use]
mod common;

// An emissive cube ignores lighting, so its pixels carry the material colour unchanged.
#[test]
#[cfg(feature = "integration-tests")]
fn should_render_emissive_cube_over_clear_colour() {
    use std::sync::Arc;

    use common::test_utils::{TestRender, rgba8};
    use flow_labs::{
        Deg, Point3, Vector3,
        camera::{Camera, Projection},
        context::InitContext,
        data_structures::{instance::Instance, material::MaterialUniform, model::Model, object::SceneObject},
        flow::ImageTestResult,
        geometry::primitives::cube,
    };
    use wgpu::Color;

    golden_image_test!(|init: InitContext| async move {
        let model = Arc::new(Model::single(&init.device, "cube", &cube()));
        let cube = SceneObject::single(
            &init.device,
            model,
            init.plain_material("green", MaterialUniform::emissive([0.0, 1.0, 0.0])),
            Instance::new(),
        );
        Ok(TestRender::new(
            cube,
            |ctx| {
                ctx.clear_colour = Color::BLACK;
                if let Some(camera) =
                    Camera::look_at(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0), Vector3::unit_y())
                {
                    ctx.set_camera(camera);
                }
                ctx.set_projection(Projection::perspective(Deg(50.0), 0.1, 100.0));
            },
            |_, frames, texture| {
                if frames.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let (width, height) = texture.dimensions();
                let centre = *texture.get_pixel(width / 2, height / 2);
                let corner = *texture.get_pixel(0, 0);
                // green and black survive an RGBA/BGRA swap
                if centre == rgba8(Color::GREEN) && corner == rgba8(Color::BLACK) {
                    Ok(ImageTestResult::Passed)
                } else {
                    log::error!("centre {:?}, corner {:?}", centre, corner);
                    Ok(ImageTestResult::Failed)
                }
            },
        ))
    });
}
