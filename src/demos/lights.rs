//! Five coloured lights circling over a ground slab.
//!
//! Keys: `1`-`5` select a light, `T` cycles its type, `[`/`]` narrow or widen
//! its cone, `I`/`K` raise or lower its intensity.

use std::{f32::consts::TAU, time::Duration};

use cgmath::{Deg, Matrix4, Point3, Vector3};

use crate::{
    KeyCode,
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{instance::Instance, material::MaterialUniform, object::SceneObject},
    flow::{self, GraphicsFlow, Out, constructor},
    pipelines::light::{Light, LightKind},
    render::Render,
};

use super::{cube_model, nudge, sphere_model};

const CONTROLS: &str = "1-5 select a light, T type, [/] cone, I/K intensity";

pub const LIGHT_COUNT: usize = 5;
const COLOURS: [[f32; 3]; LIGHT_COUNT] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];
const INTENSITY: f32 = 4.0;
const MARKER_SCALE: f32 = 0.1;

/// Position of light `index` on the unit circle one unit above the ground.
pub fn light_position(seconds: f32, index: usize) -> Vector3<f32> {
    let angle = seconds + index as f32 * TAU / LIGHT_COUNT as f32;
    Vector3::new(angle.cos(), 1.0, angle.sin())
}

pub fn initial_lights() -> Vec<Light> {
    COLOURS
        .iter()
        .enumerate()
        .map(|(i, colour)| {
            let mut light = Light::spot(
                light_position(0.0, i),
                Vector3::new(0.0, -1.0, 0.0),
                *colour,
                INTENSITY,
                45.0f32.to_radians().cos(),
            );
            light.kind = LightKind::Point;
            light
        })
        .collect()
}

pub struct Lights {
    ground: SceneObject,
    markers: Vec<SceneObject>,
    lights: Vec<Light>,
    selected: usize,
    elapsed: f32,
}

impl Lights {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let ground = SceneObject::single(
            &init.device,
            cube_model(&init),
            init.plain_material("ground", MaterialUniform::default().with_ambient(0.05)),
            Instance::new().with_nonuniform_scale(Vector3::new(200.0, 0.1, 200.0)),
        );
        let sphere = sphere_model(&init);
        let markers = COLOURS
            .iter()
            .enumerate()
            .map(|(i, colour)| {
                SceneObject::single(
                    &init.device,
                    sphere.clone(),
                    init.plain_material(&format!("light {}", i + 1), MaterialUniform::emissive(*colour)),
                    Instance::new(),
                )
            })
            .collect();
        Ok(Self {
            ground,
            markers,
            lights: initial_lights(),
            selected: 0,
            elapsed: 0.0,
        })
    }

    fn edit_selected(&mut self, ctx: &Context) {
        let keys = &ctx.keys;
        if let Some(index) = keys.digit_pressed().filter(|i| *i < self.lights.len()) {
            self.selected = index;
            log::info!("editing light {}", index + 1);
        }
        let Some(light) = self.lights.get_mut(self.selected) else {
            return;
        };
        let mut changed = [
            nudge(keys, &mut light.cone_cos, (KeyCode::BracketRight, KeyCode::BracketLeft), 0.05, (0.0, 1.0)),
            nudge(keys, &mut light.intensity, (KeyCode::KeyK, KeyCode::KeyI), 0.5, (0.0, f32::MAX)),
        ]
        .contains(&true);
        if keys.just_pressed(KeyCode::KeyT) {
            light.kind = light.kind.next();
            changed = true;
        }
        if changed {
            log::info!(
                "light {}: {:?}, intensity {:.1}, cone cosine {:.2}",
                self.selected + 1,
                light.kind,
                light.intensity,
                light.cone_cos
            );
        }
    }
}

impl GraphicsFlow<(), ()> for Lights {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        if let Some(camera) = Camera::look_at(
            Point3::new(0.0, 2.0, -10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        ) {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Projection::perspective(Deg(50.0), 0.01, 100.0));
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        self.elapsed += dt.as_secs_f32();
        self.edit_selected(ctx);

        for (i, (light, marker)) in self.lights.iter_mut().zip(&self.markers).enumerate() {
            light.position = light_position(self.elapsed, i);
            marker.write_matrix(
                &ctx.queue,
                Matrix4::from_translation(light.position) * Matrix4::from_scale(MARKER_SCALE),
            );
        }
        ctx.scene.write_lights(&ctx.queue, &self.lights);
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        std::iter::once(&self.ground).chain(&self.markers).collect()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Lights").load()?;
    flow::run::<(), ()>(config, vec![constructor(Lights::new)])
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    #[test]
    fn lights_are_evenly_spread() {
        let a = light_position(0.3, 0);
        let b = light_position(0.3, 1);
        let cos = (a.x * b.x + a.z * b.z) / (a.x.hypot(a.z) * b.x.hypot(b.z));
        assert!((cos - (TAU / 5.0).cos()).abs() < 1e-5);
        assert_eq!(a.y, 1.0);
    }

    #[test]
    fn lights_start_as_points_pointing_down() {
        let lights = initial_lights();
        assert_eq!(lights.len(), LIGHT_COUNT);
        for light in &lights {
            assert_eq!(light.kind, LightKind::Point);
            assert!((light.direction - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-6);
            assert!((light.cone_cos - 0.5f32.sqrt()).abs() < 1e-5);
        }
    }
}
