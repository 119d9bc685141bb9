//! Asteroids-style ship movement on the XY plane of an orthographic view.

use cgmath::{Deg, InnerSpace, Matrix4, Rad, Vector2, Vector3, Zero};

pub const MAX_SPEED: f32 = 5.0;
/// Degrees per second added to the angular velocity while turning.
pub const TURN_ACCELERATION: f32 = 5.0;
/// Two full spins per second.
pub const MAX_ANGULAR_SPEED: f32 = 720.0;
pub const THRUST: f32 = 0.5;
pub const FRICTION: f32 = 0.99;
/// Half the visible height of the orthographic view.
pub const HALF_HEIGHT: f32 = 10.0;

/// Control state for one update: `turn` > 0 turns left, `thrust` > 0 accelerates forward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShipInput {
    pub turn: f32,
    pub thrust: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ship {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    /// Radians, counter-clockwise about Z.
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Sum of all movement, used to scroll the background.
    pub travelled: Vector2<f32>,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            velocity: Vector2::zero(),
            rotation: 0.0,
            angular_velocity: 0.0,
            travelled: Vector2::zero(),
        }
    }
}

impl Ship {
    /// Unit vector the nose points at.
    pub fn heading(&self) -> Vector2<f32> {
        Vector2::new(-self.rotation.sin(), self.rotation.cos())
    }

    pub fn update(&mut self, input: ShipInput, dt: f32, aspect: f32) {
        let turn_step = Rad::from(Deg(TURN_ACCELERATION)).0;
        self.angular_velocity += input.turn * turn_step * dt;
        self.velocity += self.heading() * THRUST * input.thrust * dt;

        if self.velocity.magnitude() > MAX_SPEED {
            self.velocity = self.velocity.normalize() * MAX_SPEED;
        }
        let max_spin = Rad::from(Deg(MAX_ANGULAR_SPEED)).0;
        self.angular_velocity = self.angular_velocity.clamp(-max_spin, max_spin);

        self.position += self.velocity;
        self.travelled += self.velocity;
        self.rotation += self.angular_velocity;

        self.velocity *= FRICTION;
        self.angular_velocity *= FRICTION;

        self.wrap(aspect);
    }

    /// Leaving one edge of `[-10·aspect, 10·aspect] × [-10, 10]` re-enters at the opposite one.
    pub fn wrap(&mut self, aspect: f32) {
        let half_width = HALF_HEIGHT * aspect;
        if self.position.y > HALF_HEIGHT {
            self.position.y = -HALF_HEIGHT;
        }
        if self.position.y < -HALF_HEIGHT {
            self.position.y = HALF_HEIGHT;
        }
        if self.position.x > half_width {
            self.position.x = -half_width;
        }
        if self.position.x < -half_width {
            self.position.x = half_width;
        }
    }

    /// Ship models are authored lying on XZ, so they are stood up before the heading is applied.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(self.position.x, self.position.y, 0.0))
            * Matrix4::from_angle_z(Rad(self.rotation))
            * Matrix4::from_angle_x(Deg(90.0))
            * Matrix4::from_scale(0.1)
    }
}
