//! A reflective sphere or cube inside a cube-map sky.
//!
//! Keys:
//! - `Space` switches between the two skies and their sun directions
//! - `[`/`]` lower or raise the specular exponent (power = 2^exponent)
//! - `Z`/`X` lower or raise the ambient level
//! - `C` toggles between cube and sphere, `T` cycles the tint
//! - `W`/`A`/`S`/`D` and the arrows fly the camera, `P` prints its position

use std::{sync::Arc, time::Duration};

use cgmath::{InnerSpace, Point3, Vector3};

use crate::{
    KeyCode,
    camera::{FreeCam, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        material::MaterialUniform,
        model::Model,
        object::SceneObject,
        texture::Texture,
    },
    flow::{self, GraphicsFlow, Out, constructor},
    pipelines::light::Light,
    render::Render,
    resources::texture::load_cubemap,
};

use super::{LAB_CLEAR_COLOUR, cube_model, nudge, sphere_model};

const CONTROLS: &str = "Space sky, [/] specular exponent, Z/X ambient, T tint, C cube/sphere, WASD and arrows fly, P position";

/// Cube face files in +X, -X, +Y, -Y, +Z, -Z order.
pub fn sky_faces(name: &str) -> [String; 6] {
    ["bk", "ft", "up", "dn", "rt", "lf"].map(|face| format!("skybox/{name}_{face}.png"))
}

const SKIES: [(&str, [u8; 4]); 2] = [("cloudtop", [120, 150, 200, 255]), ("alps", [170, 180, 190, 255])];
const TINTS: [[f32; 3]; 4] = [[1.0, 1.0, 1.0], [1.0, 0.85, 0.6], [0.6, 0.8, 1.0], [0.7, 1.0, 0.7]];
const REFLECTIVITY: f32 = 0.8;

/// Where the sun of each sky sits, as seen from the origin.
pub fn sun_direction(sky: usize) -> Vector3<f32> {
    match sky {
        0 => Vector3::new(-15.5, 5.25, -5.0).normalize(),
        _ => Vector3::new(13.9662, 11.3477, -5.69199).normalize(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub specular_exponent: f32,
    pub ambient: f32,
    pub tint: usize,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            specular_exponent: 10.0,
            ambient: 0.2,
            tint: 0,
        }
    }
}

impl Surface {
    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform::tinted(TINTS[self.tint % TINTS.len()])
            .with_specular([1.0; 3], 2f32.powf(self.specular_exponent))
            .with_ambient(self.ambient)
            .with_reflectivity(REFLECTIVITY)
    }
}

pub struct Skybox {
    skies: Vec<Texture>,
    sky: usize,
    sphere: Arc<Model>,
    cube: Arc<Model>,
    show_cube: bool,
    object: SceneObject,
    surface: Surface,
    free_cam: FreeCam,
}

impl Skybox {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let mut skies = Vec::with_capacity(SKIES.len());
        for (name, fallback) in SKIES {
            let files = sky_faces(name);
            let faces: [&str; 6] = std::array::from_fn(|i| files[i].as_str());
            let sky = match load_cubemap(&init.device, &init.queue, &init.assets, faces, name).await {
                Ok(sky) => sky,
                Err(e) => {
                    log::warn!("{:#}; using a plain {} sky", e, name);
                    Texture::solid_cube(&init.device, &init.queue, fallback, name)?
                }
            };
            skies.push(sky);
        }

        let surface = Surface::default();
        let sphere = sphere_model(&init);
        let object = SceneObject::single(
            &init.device,
            sphere.clone(),
            init.material("mirror", &init.white, &init.white, surface.uniform()),
            Instance::new(),
        );

        Ok(Self {
            skies,
            sky: 0,
            sphere,
            cube: cube_model(&init),
            show_cube: false,
            object,
            surface,
            free_cam: FreeCam::looking_at(Point3::new(0.0, 1.0, -3.0), Point3::new(0.0, 0.0, 0.0)),
        })
    }

    fn light(&self) -> Light {
        // the light travels away from the sun
        Light::directional(-sun_direction(self.sky), [1.0; 3], 1.0)
    }

    /// Move to the next sky and its light; returns the cube map to install.
    fn next_sky(&mut self, ctx: &Context) -> Texture {
        self.sky = (self.sky + 1) % self.skies.len();
        log::info!("sky: {}", SKIES[self.sky].0);
        ctx.scene.write_lights(&ctx.queue, &[self.light()]);
        self.skies[self.sky].clone()
    }
}

impl GraphicsFlow<(), ()> for Skybox {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        ctx.set_camera(self.free_cam.camera());
        ctx.set_projection(Projection::perspective(cgmath::Deg(60.0), 0.1, 1000.0));
        ctx.scene.write_lights(&ctx.queue, &[self.light()]);
        if let Some(sky) = self.skies.first() {
            ctx.scene.set_environment(&ctx.device, sky.clone());
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        let keys = &ctx.keys;
        let surface = &mut self.surface;
        let mut changed = [
            nudge(keys, &mut surface.specular_exponent, (KeyCode::BracketLeft, KeyCode::BracketRight), 1.0, (0.0, 10.0)),
            nudge(keys, &mut surface.ambient, (KeyCode::KeyZ, KeyCode::KeyX), 0.05, (0.0, 1.0)),
        ]
        .contains(&true);
        if keys.just_pressed(KeyCode::KeyT) {
            surface.tint = (surface.tint + 1) % TINTS.len();
            changed = true;
        }
        if changed {
            log::info!(
                "specular power {}, ambient {:.2}, tint {:?}",
                2f32.powf(surface.specular_exponent),
                surface.ambient,
                TINTS[surface.tint]
            );
            self.object.material.uniform = surface.uniform();
            self.object.material.write(&ctx.queue);
        }

        if keys.just_pressed(KeyCode::KeyC) {
            self.show_cube = !self.show_cube;
            self.object.model = if self.show_cube {
                self.cube.clone()
            } else {
                self.sphere.clone()
            };
        }

        self.free_cam.update(keys, dt);
        let camera = self.free_cam.camera();

        let sky = keys
            .just_pressed(KeyCode::Space)
            .then(|| self.next_sky(ctx));
        Out::configure(move |ctx| {
            ctx.set_camera(camera);
            if let Some(sky) = sky {
                ctx.scene.set_environment(&ctx.device, sky);
            }
        })
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Composed(vec![Render::Skybox, (&self.object).into()])
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Skybox")
        .with_clear_colour(LAB_CLEAR_COLOUR)
        .load()?;
    flow::run::<(), ()>(config, vec![constructor(Skybox::new)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_follow_cube_map_layer_order() {
        let faces = sky_faces("alps");
        assert_eq!(faces[0], "skybox/alps_bk.png");
        assert_eq!(faces[1], "skybox/alps_ft.png");
        assert_eq!(faces[4], "skybox/alps_rt.png");
        assert_eq!(faces[5], "skybox/alps_lf.png");
    }

    #[test]
    fn exponent_maps_to_power_of_two() {
        let surface = Surface {
            specular_exponent: 3.0,
            ..Default::default()
        };
        assert_eq!(surface.uniform().specular_power(), 8.0);
        assert_eq!(Surface::default().uniform().specular_power(), 1024.0);
    }

    #[test]
    fn sun_directions_are_unit_length() {
        for sky in 0..SKIES.len() {
            assert!((sun_direction(sky).magnitude() - 1.0).abs() < 1e-5);
        }
    }
}
