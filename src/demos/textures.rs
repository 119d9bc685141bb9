//! A textured box that can wobble about Y.
//!
//! Keys: `R` toggles the wobble, `C` switches between the crate and checker textures.

use std::time::Duration;

use cgmath::{Deg, Matrix4, Point3, Vector3};

use crate::{
    KeyCode,
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        material::MaterialUniform,
        object::SceneObject,
        texture::Texture,
    },
    flow::{self, GraphicsFlow, Out, constructor},
    pipelines::light::Light,
    render::Render,
    resources::{obj::load_model_obj, texture::load_texture_or},
};

const CONTROLS: &str = "R wobble, C crate/checker";

/// `R_y(sin(t) * 90°)` while wobbling, then scaled to three units.
pub fn box_matrix(seconds: f32, wobble: bool) -> Matrix4<f32> {
    let angle = if wobble { seconds.sin() * 90.0 } else { 0.0 };
    Matrix4::from_angle_y(Deg(angle)) * Matrix4::from_scale(3.0)
}

pub struct Textures {
    crate_box: SceneObject,
    checker_box: SceneObject,
    wobble: bool,
    checker: bool,
    elapsed: f32,
}

impl Textures {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let model = std::sync::Arc::new(load_model_obj(&init.device, &init.assets, "Models/Box.obj").await?);
        let crate_texture = load_texture_or(&init.device, &init.queue, &init.assets, "Textures/Crate.bmp", || {
            Texture::solid_colour(&init.device, &init.queue, [150, 111, 51, 255], "crate fallback")
        })
        .await;
        let checker_texture = load_texture_or(&init.device, &init.queue, &init.assets, "Textures/Checker.bmp", || {
            Texture::checker(&init.device, &init.queue, "checker fallback")
        })
        .await;

        let surface = MaterialUniform::default().with_ambient(0.2);
        let crate_box = SceneObject::single(
            &init.device,
            model.clone(),
            init.material("crate", &crate_texture, &init.white, surface),
            Instance::new(),
        );
        let checker_box = SceneObject::single(
            &init.device,
            model,
            init.material("checker", &checker_texture, &init.white, surface),
            Instance::new(),
        );
        Ok(Self {
            crate_box,
            checker_box,
            wobble: true,
            checker: false,
            elapsed: 0.0,
        })
    }

    fn shown(&self) -> &SceneObject {
        if self.checker {
            &self.checker_box
        } else {
            &self.crate_box
        }
    }
}

impl GraphicsFlow<(), ()> for Textures {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        if let Some(camera) = Camera::look_at(
            Point3::new(0.0, 2.0, 10.0),
            Point3::new(0.0, 1.0, 0.0),
            Vector3::unit_y(),
        ) {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Projection::perspective(Deg(50.0), 0.01, 100.0));
        ctx.scene.write_lights(
            &ctx.queue,
            &[Light::from_homogeneous([3.0, 1.0, 3.0, 0.0], [1.0; 3], 1.0)],
        );
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        self.elapsed += dt.as_secs_f32();
        if ctx.keys.just_pressed(KeyCode::KeyR) {
            self.wobble = !self.wobble;
        }
        if ctx.keys.just_pressed(KeyCode::KeyC) {
            self.checker = !self.checker;
            log::debug!("checker texture: {}", self.checker);
        }
        self.shown()
            .write_matrix(&ctx.queue, box_matrix(self.elapsed, self.wobble));
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.shown().into()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Textures").load()?;
    flow::run::<(), ()>(config, vec![constructor(Textures::new)])
}
