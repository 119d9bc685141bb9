//! A row of snowy trees under an orbiting light, with an adjustable lens.
//!
//! Keys: `L` toggles the light between directional and point, `Up`/`Down`
//! widen or narrow the field of view, `N`/`M` move the near plane.

use std::time::Duration;

use cgmath::{Deg, Matrix4, Quaternion, Rotation3, SquareMatrix, Vector3};

use crate::{
    KeyCode,
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{instance::Instance, material::MaterialUniform, object::SceneObject},
    flow::{self, GraphicsFlow, Out, constructor},
    pipelines::light::Light,
    render::Render,
    resources::obj::load_model_obj,
};

use super::{LAB_CLEAR_COLOUR, nudge};

const CONTROLS: &str = "L light type, Up/Down field of view, N/M near plane";

const MODELS: [&str; 5] = [
    "Models/treeDecorated.obj",
    "Models/treePine.obj",
    "Models/snowmanFancy.obj",
    "Models/treePineSnowed.obj",
    "Models/treePineSnowRound.obj",
];
const GROUND: &str = "Models/snowPatch.obj";
const FAR: f32 = 100.0;

/// The orbiting light as a homogeneous vector; `w = 0` makes it directional.
pub fn light_vector(seconds: f32, point: bool) -> [f32; 4] {
    [
        13.0 * seconds.sin(),
        3.0,
        13.0 * seconds.cos(),
        if point { 1.0 } else { 0.0 },
    ]
}

/// The camera drifts left and right in front of the row.
pub fn camera_world(seconds: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(5.0 * seconds.sin(), 2.0, 10.0))
}

pub struct Forest {
    trees: Vec<SceneObject>,
    ground: SceneObject,
    point_light: bool,
    fov: f32,
    near: f32,
    elapsed: f32,
}

impl Forest {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let loads = MODELS
            .iter()
            .map(|name| load_model_obj(&init.device, &init.assets, name));
        let models = futures::future::try_join_all(loads).await?;
        let trees = models
            .into_iter()
            .zip(MODELS)
            .enumerate()
            .map(|(i, (model, name))| {
                let instance = Instance::at(Vector3::new(i as f32 * 3.0 - 6.0, 0.0, 0.0))
                    .with_rotation(Quaternion::from_angle_y(Deg(180.0)))
                    .with_scale(0.2);
                SceneObject::single(
                    &init.device,
                    model.into(),
                    init.plain_material(name, MaterialUniform::default().with_ambient(0.15)),
                    instance,
                )
            })
            .collect();

        let ground = SceneObject::single(
            &init.device,
            load_model_obj(&init.device, &init.assets, GROUND).await?.into(),
            init.plain_material(GROUND, MaterialUniform::default().with_ambient(0.15)),
            Instance::at(Vector3::new(10.0, -0.5, -10.0)).with_scale(0.6),
        );

        Ok(Self {
            trees,
            ground,
            point_light: false,
            fov: 50.0,
            near: 0.01,
            elapsed: 0.0,
        })
    }

    fn light(&self) -> Light {
        let intensity = if self.point_light { 100.0 } else { 1.0 };
        Light::from_homogeneous(light_vector(self.elapsed, self.point_light), [1.0; 3], intensity)
    }

    fn projection(&self) -> Projection {
        Projection::perspective(Deg(self.fov), self.near, FAR)
    }
}

impl GraphicsFlow<(), ()> for Forest {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        ctx.set_projection(self.projection());
        ctx.scene.write_lights(&ctx.queue, &[self.light()]);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        self.elapsed += dt.as_secs_f32();
        let keys = &ctx.keys;

        if keys.just_pressed(KeyCode::KeyL) {
            self.point_light = !self.point_light;
            log::info!("light is now {}", if self.point_light { "a point light" } else { "directional" });
        }
        ctx.scene.write_lights(&ctx.queue, &[self.light()]);

        // held keys sweep the field of view at 30 degrees per second
        let fov = (self.fov + keys.axis(KeyCode::ArrowDown, KeyCode::ArrowUp) * 30.0 * dt.as_secs_f32())
            .clamp(1.0, 179.0);
        let near_changed = nudge(keys, &mut self.near, (KeyCode::KeyN, KeyCode::KeyM), 0.5, (0.01, 20.0));
        let lens_changed = near_changed || fov != self.fov;
        self.fov = fov;

        let view = camera_world(self.elapsed)
            .invert()
            .unwrap_or_else(Matrix4::identity);
        let camera = Camera::from_view(view);
        let projection = self.projection();
        Out::configure(move |ctx| {
            ctx.set_camera(camera);
            if lens_changed {
                ctx.set_projection(projection);
            }
        })
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.trees.iter().chain([&self.ground]).collect()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Forest")
        .with_clear_colour(LAB_CLEAR_COLOUR)
        .load()?;
    flow::run::<(), ()>(config, vec![constructor(Forest::new)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_orbits_at_radius_thirteen() {
        let [x, y, z, w] = light_vector(1.3, true);
        assert!(((x * x + z * z).sqrt() - 13.0).abs() < 1e-4);
        assert_eq!(y, 3.0);
        assert_eq!(w, 1.0);
        assert_eq!(light_vector(1.3, false)[3], 0.0);
    }

    #[test]
    fn camera_sways_between_minus_and_plus_five() {
        let world = camera_world(std::f32::consts::FRAC_PI_2);
        assert!((world.w.x - 5.0).abs() < 1e-5);
        assert_eq!(world.w.z, 10.0);
    }
}
