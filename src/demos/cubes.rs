//! Two transformed cubes, one of them bobbing up and down.

use std::time::Duration;

use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};

use crate::{
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{instance::Instance, material::MaterialUniform, object::SceneObject},
    flow::{self, GraphicsFlow, Out, constructor},
    render::Render,
};

use super::cube_model;

/// `T(3, 0, 1) * R_x(10 rad) * S(0.5)`
pub fn small_cube_matrix() -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(3.0, 0.0, 1.0))
        * Matrix4::from_angle_x(Rad(10.0))
        * Matrix4::from_scale(0.5)
}

/// `T(-3, sin t, 1) * R_z(10 rad) * S(1.5)`
pub fn large_cube_matrix(seconds: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(-3.0, seconds.sin(), 1.0))
        * Matrix4::from_angle_z(Rad(10.0))
        * Matrix4::from_scale(1.5)
}

pub struct Cubes {
    small: SceneObject,
    large: SceneObject,
    elapsed: f32,
}

impl Cubes {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let model = cube_model(&init);
        let small = SceneObject::single(
            &init.device,
            model.clone(),
            init.plain_material("small cube", MaterialUniform::tinted([0.9, 0.55, 0.1]).with_ambient(0.2)),
            Instance::new(),
        );
        let large = SceneObject::single(
            &init.device,
            model,
            init.plain_material("large cube", MaterialUniform::tinted([0.1, 0.6, 0.7]).with_ambient(0.2)),
            Instance::new(),
        );
        Ok(Self {
            small,
            large,
            elapsed: 0.0,
        })
    }
}

impl GraphicsFlow<(), ()> for Cubes {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        if let Some(camera) = Camera::look_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        ) {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Projection::perspective(Deg(50.0), 0.01, 100.0));
        self.small.write_matrix(&ctx.queue, small_cube_matrix());
        self.large.write_matrix(&ctx.queue, large_cube_matrix(0.0));
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        self.elapsed += dt.as_secs_f32();
        self.large.write_matrix(&ctx.queue, large_cube_matrix(self.elapsed));
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        [&self.small, &self.large].into_iter().collect()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Cubes").load()?;
    flow::run::<(), ()>(config, vec![constructor(Cubes::new)])
}

#[cfg(test)]
mod tests {
    use cgmath::{Transform, Vector4};

    use super::*;

    #[test]
    fn large_cube_bobs_with_sine_of_time() {
        let centre = large_cube_matrix(std::f32::consts::FRAC_PI_2) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((centre.y - 1.0).abs() < 1e-5);
        assert_eq!(centre.x, -3.0);
    }

    #[test]
    fn small_cube_is_half_size() {
        let m = small_cube_matrix();
        let edge = m.transform_vector(Vector3::new(1.0, 0.0, 0.0));
        assert!((edge.x - 0.5).abs() < 1e-6);
    }
}
