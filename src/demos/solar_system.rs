//! The sun, eight planets and the moon with switchable viewpoints.
//!
//! Keys: `0`-`4` select the view mode, `=`/`-` speed the clock up or slow it down.

use std::time::Duration;

use cgmath::Deg;

use crate::{
    KeyCode,
    config::DemoConfig,
    context::{Context, InitContext},
    flow::{self, GraphicsFlow, Out, constructor},
    input::KeyState,
    orbit::{SolarSystem, ViewMode},
    render::Render,
};

use super::planets::PlanetScene;

const CONTROLS: &str = "0-4 view mode, =/- speed";
const SPEED_STEP: f32 = 1.1;
/// The simulation clock is tuned for this frame rate.
const MAX_FPS: f32 = 120.0;

/// View mode index from the number row; `0` maps to the first mode.
pub fn view_key(keys: &KeyState) -> Option<usize> {
    if keys.just_pressed(KeyCode::Digit0) {
        return Some(0);
    }
    keys.digit_pressed().map(|i| i + 1)
}

pub struct SolarSystemDemo {
    scene: PlanetScene,
}

impl SolarSystemDemo {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let scene = PlanetScene::load(&init, SolarSystem::full(), Deg(40.0)).await?;
        Ok(Self { scene })
    }

    fn handle_keys(&mut self, keys: &KeyState) {
        let system = &mut self.scene.system;
        if let Some(mode) = view_key(keys).and_then(ViewMode::from_index) {
            system.view_mode = mode;
            log::info!("view mode {:?}", mode);
        }
        if keys.just_pressed(KeyCode::Equal) {
            system.set_speed(system.days_per_second * SPEED_STEP);
            log::info!("{:.2} days per second", system.days_per_second);
        }
        if keys.just_pressed(KeyCode::Minus) {
            system.set_speed(system.days_per_second / SPEED_STEP);
            log::info!("{:.2} days per second", system.days_per_second);
        }
    }
}

impl GraphicsFlow<(), ()> for SolarSystemDemo {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        log::info!("controls: {}", CONTROLS);
        self.scene.init(ctx);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
        self.handle_keys(&ctx.keys);
        self.scene.update(ctx, dt)
    }

    fn on_tick(&mut self, _: &Context, _: &mut ()) -> Out<(), ()> {
        log::trace!("day {:.2}", self.scene.system.simulation_days());
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.scene.render()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Solar System")
        .with_max_fps(MAX_FPS)
        .load()?;
    flow::run::<(), ()>(config, vec![constructor(SolarSystemDemo::new)])
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;

    use super::*;

    #[test]
    fn number_row_selects_view_modes() {
        let mut keys = KeyState::default();
        assert_eq!(view_key(&keys), None);
        keys.set(KeyCode::Digit0, ElementState::Pressed);
        assert_eq!(view_key(&keys), Some(0));
        keys.end_frame();
        keys.set(KeyCode::Digit4, ElementState::Pressed);
        assert_eq!(view_key(&keys).and_then(ViewMode::from_index), Some(ViewMode::Static));
    }
}
