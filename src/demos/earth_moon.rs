//! The earth circling the sun with the moon circling the earth, seen from the moon.

use std::time::Duration;

use cgmath::Deg;

use crate::{
    config::DemoConfig,
    context::{Context, InitContext},
    flow::{self, GraphicsFlow, Out, constructor},
    orbit::SolarSystem,
    render::Render,
};

use super::planets::PlanetScene;

/// The simulation clock is tuned for this frame rate.
const MAX_FPS: f32 = 120.0;

pub struct EarthMoon {
    scene: PlanetScene,
}

impl EarthMoon {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let scene = PlanetScene::load(&init, SolarSystem::earth_moon(), Deg(60.0)).await?;
        Ok(Self { scene })
    }
}

impl GraphicsFlow<(), ()> for EarthMoon {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        self.scene.init(ctx);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut (), dt: Duration) -> Out<(), ()> {
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

/// Built-in defaults before the config file and environment are layered on.
fn defaults() -> DemoConfig {
    DemoConfig::titled("Earth and Moon").with_max_fps(MAX_FPS)
}

pub fn run() -> anyhow::Result<()> {
    let config = defaults().load()?;
    flow::run::<(), ()>(config, vec![constructor(EarthMoon::new)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_is_capped_for_the_orbit_clock() {
        let config = defaults();
        assert_eq!(config.window.title, "Earth and Moon");
        assert_eq!(config.window.max_fps, Some(120.0));
    }
}
