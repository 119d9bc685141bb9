//! Drawing a [`SolarSystem`]: one textured sphere per body, the sun as an
//! emissive point light and a star backdrop.

use std::time::Duration;

use cgmath::{Deg, Vector3, Zero};

use crate::{
    camera::{Camera, Projection},
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        material::MaterialUniform,
        object::SceneObject,
        texture::Texture,
    },
    flow::Out,
    orbit::SolarSystem,
    pipelines::{light::Light, stars::Starfield},
    render::Render,
    resources::texture::{load_cubemap, load_texture_or},
};

use super::sphere_model;

const STAR_SKY: &str = "textures/star_sky/stars.png";
// bright enough for the earth at 30 units; the outer planets mostly see ambient light
const SUN_INTENSITY: f32 = 1000.0;

/// Diffuse texture and fallback colour of a body.
pub fn body_texture(name: &str) -> (&'static str, [u8; 4]) {
    match name {
        "sun" => ("textures/sunTexture.png", [255, 200, 60, 255]),
        "earth" => ("textures/earthDiffuse.png", [40, 90, 200, 255]),
        "moon" => ("textures/moonTexture.png", [160, 160, 160, 255]),
        "mercury" => ("textures/mercury.png", [140, 130, 120, 255]),
        "venus" => ("textures/venus.png", [220, 190, 130, 255]),
        "mars" => ("textures/mars.png", [190, 80, 40, 255]),
        "jupiter" => ("textures/jupiter.png", [200, 160, 120, 255]),
        "saturn" => ("textures/saturn.png", [220, 200, 150, 255]),
        "uranus" => ("textures/uranus.png", [150, 210, 220, 255]),
        "neptune" => ("textures/neptune.png", [60, 90, 200, 255]),
        _ => ("", [255, 255, 255, 255]),
    }
}

enum Sky {
    Cube(Option<Texture>),
    Stars(Starfield),
}

pub struct PlanetScene {
    pub system: SolarSystem,
    bodies: Vec<SceneObject>,
    sky: Sky,
    fovy: Deg<f32>,
    elapsed: f32,
}

impl PlanetScene {
    pub async fn load(init: &InitContext, system: SolarSystem, fovy: Deg<f32>) -> anyhow::Result<Self> {
        let sphere = sphere_model(init);
        let mut bodies = Vec::with_capacity(system.bodies.len());
        for body in &system.bodies {
            let (file, colour) = body_texture(body.name);
            let diffuse = load_texture_or(&init.device, &init.queue, &init.assets, file, || {
                Texture::solid_colour(&init.device, &init.queue, colour, body.name)
            })
            .await;
            let material = match body.name {
                "sun" => init.material(body.name, &diffuse, &init.white, MaterialUniform::emissive([1.0; 3])),
                "earth" => {
                    let specular = load_texture_or(
                        &init.device,
                        &init.queue,
                        &init.assets,
                        "textures/earthSpecular.png",
                        || Texture::solid_colour(&init.device, &init.queue, [60, 60, 60, 255], "earth specular"),
                    )
                    .await;
                    init.material(
                        body.name,
                        &diffuse,
                        &specular,
                        MaterialUniform::default()
                            .with_specular([1.0; 3], 20.0)
                            .with_specular_map()
                            .with_ambient(0.15),
                    )
                }
                _ => init.material(
                    body.name,
                    &diffuse,
                    &init.white,
                    MaterialUniform::default()
                        .with_specular([0.2; 3], 20.0)
                        .with_ambient(0.15),
                ),
            };
            bodies.push(SceneObject::single(&init.device, sphere.clone(), material, Instance::new()));
        }

        let sky = match load_cubemap(&init.device, &init.queue, &init.assets, [STAR_SKY; 6], "star sky").await {
            Ok(texture) => Sky::Cube(Some(texture)),
            Err(e) => {
                log::warn!("{:#}; drawing procedural stars instead", e);
                Sky::Stars(Starfield::new(&init.device, &init.stars_layout))
            }
        };

        Ok(Self {
            system,
            bodies,
            sky,
            fovy,
            elapsed: 0.0,
        })
    }

    pub fn init(&mut self, ctx: &mut Context) {
        ctx.set_projection(Projection::perspective(self.fovy, 0.1, 1000.0));
        ctx.scene.write_lights(
            &ctx.queue,
            &[Light::point(Vector3::zero(), [1.0; 3], SUN_INTENSITY)],
        );
        if let Sky::Cube(texture) = &mut self.sky {
            if let Some(texture) = texture.take() {
                ctx.scene.set_environment(&ctx.device, texture);
            }
        }
        self.write_bodies(ctx);
        if let Some(camera) = self.camera() {
            ctx.set_camera(camera);
        }
    }

    /// Advance the clock, move the bodies and point the camera for the current view mode.
    pub fn update(&mut self, ctx: &Context, dt: Duration) -> Out<(), ()> {
        let dt = dt.as_secs_f32();
        self.elapsed += dt;
        self.system.advance(dt);
        self.write_bodies(ctx);

        if let Sky::Stars(stars) = &mut self.sky {
            stars.update(&ctx.queue, [0.0, 0.0], self.elapsed, ctx.aspect());
        }

        match self.camera() {
            Some(camera) => Out::configure(move |ctx| ctx.set_camera(camera)),
            // eye and target coincide; keep the last view
            None => Out::Empty,
        }
    }

    fn camera(&self) -> Option<Camera> {
        let (eye, target) = self.system.view_eye_target();
        Camera::look_at(eye, target, Vector3::unit_y())
    }

    fn write_bodies(&mut self, ctx: &Context) {
        let visible = self.system.visible_bodies();
        for ((object, visible), matrix) in self
            .bodies
            .iter_mut()
            .zip(visible)
            .zip(self.system.model_matrices())
        {
            object.visible = visible;
            object.write_matrix(&ctx.queue, matrix);
        }
    }

    pub fn render<'pass>(&self) -> Render<'_, 'pass> {
        let backdrop = match &self.sky {
            Sky::Cube(_) => Render::Skybox,
            Sky::Stars(stars) => Render::Starfield(stars),
        };
        Render::Composed(vec![backdrop, self.bodies.iter().collect()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_body_has_a_texture() {
        for body in SolarSystem::full().bodies {
            let (file, _) = body_texture(body.name);
            assert!(file.starts_with("textures/"), "{} has no texture", body.name);
        }
    }

    #[test]
    fn default_views_hide_the_body_around_the_camera() {
        for (system, hidden) in [(SolarSystem::earth_moon(), "moon"), (SolarSystem::full(), "sun")] {
            let hidden_names: Vec<_> = system
                .bodies
                .iter()
                .zip(system.visible_bodies())
                .filter(|(_, visible)| !visible)
                .map(|(body, _)| body.name)
                .collect();
            assert_eq!(hidden_names, vec![hidden]);
        }
    }
}
