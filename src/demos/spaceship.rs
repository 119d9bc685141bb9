//! Fly a ship around a wrapping orthographic playfield over scrolling stars.
//!
//! Keys: arrows turn and thrust, `1`-`6` pick one of the six ship models.

use std::time::Duration;

use cgmath::{Point3, Vector3};

use crate::{
    KeyCode,
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{instance::Instance, material::MaterialUniform, object::SceneObject},
    flow::{self, GraphicsFlow, Out, constructor},
    pipelines::{light::Light, stars::Starfield},
    render::Render,
    resources::obj::load_model_obj,
    spaceship::{HALF_HEIGHT, Ship, ShipInput},
};

const CONTROLS: &str = "arrows turn and thrust, 1-6 select a ship";

const SHIP_COUNT: usize = 6;
/// World units of travel per full starfield tile.
const STAR_SCROLL: f32 = 0.05;

pub fn ship_file(index: usize) -> String {
    format!("Models/spaceCraft{}.obj", index + 1)
}

/// Left/right turn and up/down thrust from the arrow keys.
pub fn ship_input(keys: &crate::input::KeyState) -> ShipInput {
    ShipInput {
        turn: keys.axis(KeyCode::ArrowRight, KeyCode::ArrowLeft),
        thrust: keys.axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
    }
}

pub struct Spaceship {
    ships: Vec<SceneObject>,
    selected: usize,
    ship: Ship,
    stars: Starfield,
    elapsed: f32,
}

impl Spaceship {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let files: Vec<String> = (0..SHIP_COUNT).map(ship_file).collect();
        let loads = files
            .iter()
            .map(|name| load_model_obj(&init.device, &init.assets, name));
        let models = futures::future::try_join_all(loads).await?;
        let ships = models
            .into_iter()
            .zip(&files)
            .map(|(model, name)| {
                SceneObject::single(
                    &init.device,
                    model.into(),
                    init.plain_material(name, MaterialUniform::default().with_ambient(0.3)),
                    Instance::new(),
                )
            })
            .collect();

        Ok(Self {
            ships,
            selected: 0,
            ship: Ship::default(),
            stars: Starfield::new(&init.device, &init.stars_layout),
            elapsed: 0.0,
        })
    }
}

impl GraphicsFlow<(), ()> for Spaceship {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        if let Some(camera) = Camera::look_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        ) {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Projection::orthographic(HALF_HEIGHT, -100.0, 100.0));
        ctx.scene.write_lights(
            &ctx.queue,
            &[Light::directional(Vector3::new(-0.3, -0.5, -1.0), [1.0; 3], 1.0)],
        );
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        let dt = dt.as_secs_f32();
        self.elapsed += dt;

        if let Some(index) = ctx.keys.digit_pressed().filter(|i| *i < self.ships.len()) {
            self.selected = index;
            log::info!("flying {}", ship_file(index));
        }

        let aspect = ctx.aspect();
        self.ship.update(ship_input(&ctx.keys), dt, aspect);
        if let Some(ship) = self.ships.get(self.selected) {
            ship.write_matrix(&ctx.queue, self.ship.model_matrix());
        }

        let offset = self.ship.travelled * STAR_SCROLL;
        self.stars
            .update(&ctx.queue, [offset.x, offset.y], self.elapsed, aspect);
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let ship = self
            .ships
            .get(self.selected)
            .map(Render::from)
            .unwrap_or(Render::None);
        Render::Composed(vec![Render::Starfield(&self.stars), ship])
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Spaceship").load()?;
    flow::run::<(), ()>(config, vec![constructor(Spaceship::new)])
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;

    use super::*;
    use crate::input::KeyState;

    #[test]
    fn ship_files_are_numbered_from_one() {
        assert_eq!(ship_file(0), "Models/spaceCraft1.obj");
        assert_eq!(ship_file(5), "Models/spaceCraft6.obj");
    }

    #[test]
    fn left_arrow_turns_left_and_up_thrusts() {
        let mut keys = KeyState::default();
        keys.set(KeyCode::ArrowLeft, ElementState::Pressed);
        keys.set(KeyCode::ArrowUp, ElementState::Pressed);
        assert_eq!(ship_input(&keys), ShipInput { turn: 1.0, thrust: 1.0 });
    }
}
