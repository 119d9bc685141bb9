//! Part one shows the Stanford bunny with an editable material and four camera
//! presets; part two draws a cardinal spline through a list of control points.
//!
//! Keys:
//! - `Tab` switches between the parts
//! - `1`-`4` fly the camera to a preset
//! - `C` cycles the diffuse colour, `V` the specular colour, `O`/`P` lower or raise the specular power
//! - `T`/`G` tension, `D`/`F` divisions, `W`/`S` line width

use std::{sync::Arc, time::Duration};

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::{
    KeyCode,
    camera::{Camera, CameraTransition, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        material::MaterialUniform,
        model::{MeshData, Model},
        object::SceneObject,
    },
    flow::{self, GraphicsFlow, Out, constructor},
    geometry::{cardinal_spline, ribbon},
    pipelines::light::Light,
    render::Render,
    resources::{
        ply::{bunny_mesh, load_ply},
        points::load_points,
    },
};

use super::{LAB_CLEAR_COLOUR, nudge};

const CONTROLS: &str = "Tab part, 1-4 camera presets, C/V colours, O/P power, T/G tension, D/F divisions, W/S width";

pub const CAMERA_PRESETS: [[f32; 3]; 4] = [
    [0.0, 0.6, 1.0],
    [1.0, 0.6, 0.0],
    [1.0, 1.6, 1.0],
    [-1.0, -0.6, 1.0],
];
const LOOK_AT: [f32; 3] = [0.0, 0.5, 0.0];
const TRANSITION: Duration = Duration::from_secs(2);

const DIFFUSE_COLOURS: [[f32; 3]; 4] = [
    [0.85, 0.078, 0.23],
    [0.95, 0.75, 0.2],
    [0.2, 0.55, 0.9],
    [0.9, 0.9, 0.9],
];
const SPECULAR_COLOURS: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [0.4, 0.4, 0.4], [0.0, 0.0, 0.0]];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineParams {
    pub tension: f32,
    pub divisions: u32,
    pub width: f32,
}

impl Default for SplineParams {
    fn default() -> Self {
        Self {
            tension: 0.5,
            divisions: 30,
            width: 0.006,
        }
    }
}

impl SplineParams {
    pub fn mesh(&self, points: &[Vector3<f32>]) -> MeshData {
        let curve = cardinal_spline(points, self.tension, self.divisions);
        ribbon(&curve, self.width, [0.0, 0.0, 0.0])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Bunny,
    Spline,
}

pub struct Bunny {
    part: Part,
    bunny: SceneObject,
    diffuse: usize,
    specular: usize,
    transition: CameraTransition,
    points: Vec<Vector3<f32>>,
    params: SplineParams,
    spline: SceneObject,
}

impl Bunny {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let ply = load_ply(&init.assets, "bunny.ply").await?;
        let bunny = SceneObject::single(
            &init.device,
            Arc::new(Model::single(&init.device, "bunny", &bunny_mesh(&ply))),
            init.plain_material(
                "bunny",
                MaterialUniform::tinted(DIFFUSE_COLOURS[0])
                    .with_specular(SPECULAR_COLOURS[0], 2.0)
                    .with_ambient(0.15),
            ),
            Instance::new().with_scale(5.0),
        );

        let points = load_points(&init.assets, "points.txt").await?;
        let params = SplineParams::default();
        let spline = SceneObject::single(
            &init.device,
            Arc::new(Model::single(&init.device, "spline", &params.mesh(&points))),
            init.plain_material("spline", MaterialUniform::emissive([1.0; 3])),
            Instance::new(),
        );

        Ok(Self {
            part: Part::Bunny,
            bunny,
            diffuse: 0,
            specular: 0,
            transition: CameraTransition::new(CAMERA_PRESETS[0].into(), TRANSITION),
            points,
            params,
            spline,
        })
    }

    fn bunny_camera(&self) -> Option<Camera> {
        Camera::look_at(self.transition.eye(), LOOK_AT.into(), Vector3::unit_y())
    }

    /// The spline is drawn straight in clip space, so the view is the identity.
    fn spline_view() -> (Camera, Projection) {
        (
            Camera::from_view(Matrix4::identity()),
            Projection::orthographic(1.0, -10.0, 10.0).with_zoom(0.75),
        )
    }

    fn bunny_projection() -> Projection {
        Projection::perspective(Deg(80.0), 0.01, 10.0)
    }

    fn update_material(&mut self, ctx: &Context) {
        let keys = &ctx.keys;
        let uniform = &mut self.bunny.material.uniform;
        let mut power = uniform.specular_power();
        let mut changed = nudge(keys, &mut power, (KeyCode::KeyO, KeyCode::KeyP), 1.0, (2.0, 20.0));
        uniform.set_specular_power(power);

        if keys.just_pressed(KeyCode::KeyC) {
            self.diffuse = (self.diffuse + 1) % DIFFUSE_COLOURS.len();
            *uniform = uniform.with_tint(DIFFUSE_COLOURS[self.diffuse]);
            changed = true;
        }
        if keys.just_pressed(KeyCode::KeyV) {
            self.specular = (self.specular + 1) % SPECULAR_COLOURS.len();
            *uniform = uniform.with_specular(SPECULAR_COLOURS[self.specular], power);
            changed = true;
        }
        if changed {
            log::info!(
                "bunny material: diffuse {:?}, specular {:?}, power {}",
                DIFFUSE_COLOURS[self.diffuse],
                SPECULAR_COLOURS[self.specular],
                power
            );
            self.bunny.material.write(&ctx.queue);
        }
    }

    fn update_spline(&mut self, ctx: &Context) {
        let keys = &ctx.keys;
        let params = &mut self.params;
        let mut divisions = params.divisions as f32;
        let changed = [
            nudge(keys, &mut params.tension, (KeyCode::KeyG, KeyCode::KeyT), 0.05, (0.0, 1.0)),
            nudge(keys, &mut divisions, (KeyCode::KeyD, KeyCode::KeyF), 1.0, (1.0, 30.0)),
            nudge(keys, &mut params.width, (KeyCode::KeyS, KeyCode::KeyW), 0.001, (0.001, 0.01)),
        ]
        .contains(&true);
        params.divisions = divisions as u32;

        if changed {
            log::info!(
                "spline: tension {:.2}, divisions {}, width {:.3}",
                params.tension,
                params.divisions,
                params.width
            );
            let mesh = params.mesh(&self.points);
            self.spline.visible = mesh.triangle_count() > 0;
            self.spline.model = Arc::new(Model::single(&ctx.device, "spline", &mesh));
        }
    }
}

impl GraphicsFlow<(), ()> for Bunny {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        if let Some(camera) = self.bunny_camera() {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Self::bunny_projection());
        ctx.scene.write_lights(
            &ctx.queue,
            &[Light::directional(Vector3::new(-1.0, -1.0, -1.0), [1.0; 3], 1.0)],
        );
        self.spline.visible = self.points.len() >= 4;
        if !self.spline.visible {
            log::warn!("{} control points are too few for a spline", self.points.len());
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        if ctx.keys.just_pressed(KeyCode::Tab) {
            self.part = match self.part {
                Part::Bunny => Part::Spline,
                Part::Spline => Part::Bunny,
            };
            let (camera, projection) = match self.part {
                Part::Spline => Self::spline_view(),
                Part::Bunny => (
                    self.bunny_camera().unwrap_or(ctx.camera.camera),
                    Self::bunny_projection(),
                ),
            };
            return Out::configure(move |ctx| {
                ctx.set_camera(camera);
                ctx.set_projection(projection);
            });
        }

        match self.part {
            Part::Bunny => {
                if let Some(preset) = ctx.keys.digit_pressed().and_then(|i| CAMERA_PRESETS.get(i)) {
                    if !self.transition.start((*preset).into()) {
                        log::debug!("camera is still moving, preset ignored");
                    }
                }
                self.transition.update(dt);
                self.update_material(ctx);
                match self.bunny_camera() {
                    Some(camera) => Out::configure(move |ctx| ctx.set_camera(camera)),
                    None => Out::Empty,
                }
            }
            Part::Spline => {
                self.update_spline(ctx);
                Out::Empty
            }
        }
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        match self.part {
            Part::Bunny => (&self.bunny).into(),
            Part::Spline => (&self.spline).into(),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Bunny")
        .with_clear_colour(LAB_CLEAR_COLOUR)
        .load()?;
    flow::run::<(), ()>(config, vec![constructor(Bunny::new)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(-0.5, -0.5, 0.0),
            Vector3::new(0.5, -0.5, 0.0),
            Vector3::new(0.5, 0.5, 0.0),
            Vector3::new(-0.5, 0.5, 0.0),
            Vector3::new(-0.5, -0.5, 0.0),
        ]
    }

    #[test]
    fn default_spline_matches_the_lab_settings() {
        let params = SplineParams::default();
        assert_eq!(params.tension, 0.5);
        assert_eq!(params.divisions, 30);
        assert_eq!(params.width, 0.006);
    }

    #[test]
    fn ribbon_has_two_vertices_per_curve_sample() {
        let params = SplineParams {
            divisions: 4,
            ..Default::default()
        };
        let points = square();
        let curve = cardinal_spline(&points, params.tension, params.divisions);
        let mesh = params.mesh(&points);
        assert_eq!(mesh.vertices.len(), curve.len() * 2);
        assert!(mesh.vertices.iter().all(|v| v.color == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn too_few_points_give_an_empty_mesh() {
        let mesh = SplineParams::default().mesh(&square()[..2]);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
