//! The demo programs.
//!
//! Every demo is a single [`GraphicsFlow`](crate::flow::GraphicsFlow) with no
//! shared state or custom events. Its `run` function builds the window
//! configuration and hands the flow to [`flow::run`](crate::flow::run).

use std::sync::Arc;

use crate::{KeyCode, context::InitContext, data_structures::model::Model, geometry, input::KeyState};

pub mod bunny;
pub mod coloring;
pub mod cubes;
pub mod earth_moon;
pub mod forest;
pub mod lights;
mod planets;
pub mod skybox;
pub mod solar_system;
pub mod spaceship;
pub mod textures;

/// Light blue-grey background used by the lab scenes.
pub const LAB_CLEAR_COLOUR: [f64; 4] = [0.96, 0.97, 1.0, 1.0];

pub(crate) fn cube_model(init: &InitContext) -> Arc<Model> {
    Arc::new(Model::single(&init.device, "cube", &geometry::cube()))
}

pub(crate) fn sphere_model(init: &InitContext) -> Arc<Model> {
    Arc::new(Model::single(&init.device, "sphere", &geometry::uv_sphere(32, 48)))
}

/// Step `value` by `step` per press of `down` / `up`, clamped to `[min, max]`.
/// Returns whether the value changed.
pub(crate) fn nudge(
    keys: &KeyState,
    value: &mut f32,
    (down, up): (KeyCode, KeyCode),
    step: f32,
    (min, max): (f32, f32),
) -> bool {
    let mut next = *value;
    if keys.just_pressed(down) {
        next -= step;
    }
    if keys.just_pressed(up) {
        next += step;
    }
    let next = next.clamp(min, max);
    let changed = next != *value;
    *value = next;
    changed
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;

    use super::*;

    #[test]
    fn nudge_steps_and_clamps() {
        let mut keys = KeyState::default();
        let mut power = 19.5;
        keys.set(KeyCode::KeyP, ElementState::Pressed);
        assert!(nudge(&keys, &mut power, (KeyCode::KeyO, KeyCode::KeyP), 1.0, (2.0, 20.0)));
        assert_eq!(power, 20.0);
        // already at the top
        assert!(!nudge(&keys, &mut power, (KeyCode::KeyO, KeyCode::KeyP), 1.0, (2.0, 20.0)));
        keys.end_frame();
        assert!(!nudge(&keys, &mut power, (KeyCode::KeyO, KeyCode::KeyP), 1.0, (2.0, 20.0)));
    }
}
