//! Keyboard state shared by the demos.

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Held keys plus the keys that went down since the last [`KeyState::end_frame`].
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
}

impl KeyState {
    /// Feed a window event. Returns true when it was a keyboard event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if !repeat || !state.is_pressed() {
                    self.set(*code, *state);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.held.clear();
                false
            }
            _ => false,
        }
    }

    pub fn set(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.held.insert(code) {
                    self.pressed_this_frame.insert(code);
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// True once per key press.
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.pressed_this_frame.contains(&code)
    }

    /// -1, 0 or 1 depending on which of the two keys is held.
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_pressed(negative) {
            value -= 1.0;
        }
        if self.is_pressed(positive) {
            value += 1.0;
        }
        value
    }

    /// Index of the first digit key (1..=9) pressed this frame, zero based.
    pub fn digit_pressed(&self) -> Option<usize> {
        const DIGITS: [KeyCode; 9] = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        DIGITS.iter().position(|code| self.just_pressed(*code))
    }

    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once_per_frame() {
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyC, ElementState::Pressed);
        assert!(keys.just_pressed(KeyCode::KeyC));
        keys.end_frame();
        assert!(!keys.just_pressed(KeyCode::KeyC));
        assert!(keys.is_pressed(KeyCode::KeyC));
        // holding the key does not fire again
        keys.set(KeyCode::KeyC, ElementState::Pressed);
        assert!(!keys.just_pressed(KeyCode::KeyC));
        keys.set(KeyCode::KeyC, ElementState::Released);
        assert!(!keys.is_pressed(KeyCode::KeyC));
    }

    #[test]
    fn axis_cancels_opposing_keys() {
        let mut keys = KeyState::default();
        keys.set(KeyCode::ArrowLeft, ElementState::Pressed);
        assert_eq!(keys.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), -1.0);
        keys.set(KeyCode::ArrowRight, ElementState::Pressed);
        assert_eq!(keys.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), 0.0);
    }

    #[test]
    fn digits_map_to_zero_based_indices() {
        let mut keys = KeyState::default();
        assert_eq!(keys.digit_pressed(), None);
        keys.set(KeyCode::Digit3, ElementState::Pressed);
        assert_eq!(keys.digit_pressed(), Some(2));
    }
}
