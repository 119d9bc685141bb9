//! Cameras, projections and the camera uniform.
//!
//! Demos own their camera logic and hand the resulting view to the context,
//! which combines it with the window-sized [`Projection`] once per frame.

use std::time::Duration;

use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix3, Matrix4, Point3, Rad, SquareMatrix, Vector3,
    Vector4, perspective,
};
use winit::keyboard::KeyCode;

use crate::input::KeyState;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A view matrix plus the world position it was taken from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub view: Matrix4<f32>,
}

impl Camera {
    /// Right-handed look-at. Returns `None` when `eye` and `target` coincide.
    pub fn look_at(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Option<Self> {
        if (target - eye).magnitude2() < f32::EPSILON {
            return None;
        }
        Some(Self {
            eye,
            view: Matrix4::look_at_rh(eye, target, up),
        })
    }

    /// Use an already built view matrix; the eye is recovered from its inverse.
    pub fn from_view(view: Matrix4<f32>) -> Self {
        let eye = view
            .invert()
            .map(|world| Point3::from_vec(world.w.truncate()))
            .unwrap_or_else(Point3::origin);
        Self { eye, view }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 10.0),
            view: Matrix4::look_at_rh(
                Point3::new(0.0, 0.0, 10.0),
                Point3::origin(),
                Vector3::unit_y(),
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        aspect: f32,
        fovy: Rad<f32>,
        znear: f32,
        zfar: f32,
    },
    /// Spans `[-half_height * aspect, half_height * aspect] x [-half_height, half_height]`, then scaled by `zoom`.
    Orthographic {
        aspect: f32,
        half_height: f32,
        znear: f32,
        zfar: f32,
        zoom: f32,
    },
}

impl Projection {
    pub fn perspective<F: Into<Rad<f32>>>(fovy: F, znear: f32, zfar: f32) -> Self {
        Self::Perspective {
            aspect: 16.0 / 9.0,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn orthographic(half_height: f32, znear: f32, zfar: f32) -> Self {
        Self::Orthographic {
            aspect: 16.0 / 9.0,
            half_height,
            znear,
            zfar,
            zoom: 1.0,
        }
    }

    pub fn with_zoom(self, zoom: f32) -> Self {
        match self {
            Self::Orthographic {
                aspect,
                half_height,
                znear,
                zfar,
                ..
            } => Self::Orthographic {
                aspect,
                half_height,
                znear,
                zfar,
                zoom,
            },
            other => other,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let new_aspect = width as f32 / height as f32;
        match self {
            Self::Perspective { aspect, .. } | Self::Orthographic { aspect, .. } => {
                *aspect = new_aspect
            }
        }
    }

    pub fn aspect(&self) -> f32 {
        match self {
            Self::Perspective { aspect, .. } | Self::Orthographic { aspect, .. } => *aspect,
        }
    }

    /// Clip-space matrix for wgpu (depth in `[0, 1]`).
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let gl = match *self {
            Self::Perspective {
                aspect,
                fovy,
                znear,
                zfar,
            } => perspective(fovy, aspect, znear, zfar),
            Self::Orthographic {
                aspect,
                half_height,
                znear,
                zfar,
                zoom,
            } => {
                let w = half_height * aspect;
                Matrix4::from_scale(zoom)
                    * cgmath::ortho(-w, w, -half_height, half_height, znear, zfar)
            }
        };
        OPENGL_TO_WGPU_MATRIX * gl
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(Deg(45.0), 0.1, 100.0)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
            inv_proj: Matrix4::identity().into(),
            inv_view: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let proj = projection.calc_matrix();
        self.view_position = camera.eye.to_homogeneous().into();
        self.view_proj = (proj * camera.view).into();
        self.inv_proj = proj.invert().unwrap_or_else(Matrix4::identity).into();
        self.inv_view = camera
            .view
            .invert()
            .unwrap_or_else(Matrix4::identity)
            .into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub projection: Projection,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn write(&mut self, queue: &wgpu::Queue) {
        self.uniform
            .update_view_proj(&self.camera, &self.projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// Fly camera stored as a camera-to-world basis: columns are left, up, forward and position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeCam {
    pub world: Matrix4<f32>,
    pub speed: f32,
    pub turn_speed: f32,
}

impl FreeCam {
    pub fn new(world: Matrix4<f32>) -> Self {
        Self {
            world,
            speed: 4.0,
            turn_speed: 1.0,
        }
    }

    /// Starts where `look_at(eye, target)` would put the camera.
    pub fn looking_at(eye: Point3<f32>, target: Point3<f32>) -> Self {
        let view = Matrix4::look_at_rh(eye, target, Vector3::unit_y());
        Self::new(view.invert().unwrap_or_else(Matrix4::identity))
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from_vec(self.world.w.truncate())
    }

    pub fn left(&self) -> Vector3<f32> {
        self.world.x.truncate()
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.world.z.truncate()
    }

    pub fn update(&mut self, keys: &KeyState, dt: Duration) {
        let dt = dt.as_secs_f32();
        let step = self.speed * dt;
        let mut position = self.world.w.truncate();
        if keys.is_pressed(KeyCode::KeyW) {
            position -= self.forward() * step;
        }
        if keys.is_pressed(KeyCode::KeyS) {
            position += self.forward() * step;
        }
        if keys.is_pressed(KeyCode::KeyA) {
            position -= self.left() * step;
        }
        if keys.is_pressed(KeyCode::KeyD) {
            position += self.left() * step;
        }
        self.world.w = position.extend(1.0);

        let turn = self.turn_speed * dt;
        if keys.is_pressed(KeyCode::ArrowLeft) {
            self.rotate(Matrix3::from_angle_y(Rad(turn)));
        }
        if keys.is_pressed(KeyCode::ArrowRight) {
            self.rotate(Matrix3::from_angle_y(Rad(-turn)));
        }
        if keys.is_pressed(KeyCode::ArrowUp) {
            self.rotate(Matrix3::from_axis_angle(self.left().normalize(), Rad(-turn)));
        }
        if keys.is_pressed(KeyCode::ArrowDown) {
            self.rotate(Matrix3::from_axis_angle(self.left().normalize(), Rad(turn)));
        }
        if keys.just_pressed(KeyCode::KeyP) {
            let p = self.position();
            log::info!("camera position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
        }
    }

    fn rotate(&mut self, rotation: Matrix3<f32>) {
        let basis = |v: Vector4<f32>| (rotation * v.truncate()).extend(0.0);
        self.world.x = basis(self.world.x);
        self.world.y = basis(self.world.y);
        self.world.z = basis(self.world.z);
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.world.invert().unwrap_or_else(Matrix4::identity)
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.position(),
            view: self.view(),
        }
    }
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Eases the eye between preset positions. A new target is refused while moving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
    from: Point3<f32>,
    to: Point3<f32>,
    elapsed: f32,
    duration: f32,
}

impl CameraTransition {
    pub fn new(start: Point3<f32>, duration: Duration) -> Self {
        let duration = duration.as_secs_f32();
        Self {
            from: start,
            to: start,
            elapsed: duration,
            duration,
        }
    }

    /// Interpolation parameter in `[0, 1]`; 1 means the camera has arrived.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Returns whether the new target was accepted.
    pub fn start(&mut self, target: Point3<f32>) -> bool {
        if !self.is_finished() {
            return false;
        }
        self.from = self.to;
        self.to = target;
        self.elapsed = 0.0;
        true
    }

    pub fn update(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt.as_secs_f32()).min(self.duration);
    }

    pub fn eye(&self) -> Point3<f32> {
        let t = smoothstep(self.progress());
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Transform;
    use winit::event::ElementState;

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn look_at_rejects_degenerate_direction() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(Camera::look_at(p, p, Vector3::unit_y()).is_none());
    }

    #[test]
    fn from_view_recovers_eye() {
        let eye = Point3::new(0.0, 2.0, -10.0);
        let camera = Camera::look_at(eye, Point3::origin(), Vector3::unit_y()).unwrap();
        let recovered = Camera::from_view(camera.view);
        assert!(close(recovered.eye.y, 2.0));
        assert!(close(recovered.eye.z, -10.0));
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let projection = Projection::perspective(Deg(50.0), 0.01, 100.0);
        let clip = projection.calc_matrix() * Vector4::new(0.0, 0.0, -0.01, 1.0);
        assert!(close(clip.z / clip.w, 0.0));
        let clip = projection.calc_matrix() * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!(close(clip.z / clip.w, 1.0));
    }

    #[test]
    fn orthographic_edges_follow_aspect() {
        let mut projection = Projection::orthographic(10.0, -100.0, 100.0);
        projection.resize(200, 100);
        let clip = projection.calc_matrix() * Vector4::new(20.0, 10.0, 0.0, 1.0);
        assert!(close(clip.x, 1.0));
        assert!(close(clip.y, 1.0));
    }

    #[test]
    fn resize_ignores_minimised_window() {
        let mut projection = Projection::default();
        let aspect = projection.aspect();
        projection.resize(0, 600);
        assert_eq!(projection.aspect(), aspect);
    }

    #[test]
    fn free_cam_forward_key_approaches_target() {
        let mut cam = FreeCam::looking_at(Point3::new(0.0, 1.0, -3.0), Point3::origin());
        let before = cam.position().to_vec().magnitude();
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyW, ElementState::Pressed);
        cam.update(&keys, Duration::from_millis(250));
        let after = cam.position().to_vec().magnitude();
        assert!(close(before - after, 1.0));
    }

    #[test]
    fn free_cam_view_inverts_world() {
        let cam = FreeCam::looking_at(Point3::new(0.0, 1.0, -3.0), Point3::origin());
        let p = cam.view().transform_point(cam.position());
        assert!(close(p.x, 0.0) && close(p.y, 0.0) && close(p.z, 0.0));
    }

    #[test]
    fn free_cam_yaw_keeps_basis_orthonormal() {
        let mut cam = FreeCam::looking_at(Point3::new(0.0, 1.0, -3.0), Point3::origin());
        let mut keys = KeyState::default();
        keys.set(KeyCode::ArrowLeft, ElementState::Pressed);
        keys.set(KeyCode::ArrowUp, ElementState::Pressed);
        cam.update(&keys, Duration::from_millis(500));
        assert!(close(cam.left().magnitude(), 1.0));
        assert!(close(cam.left().dot(cam.forward()), 0.0));
    }

    #[test]
    fn transition_eases_and_blocks_retargeting() {
        let mut transition = CameraTransition::new(Point3::new(0.0, 0.6, 1.0), Duration::from_secs(2));
        assert!(transition.is_finished());
        assert!(transition.start(Point3::new(1.0, 0.6, 0.0)));
        assert!(!transition.start(Point3::new(1.0, 1.6, 1.0)));

        transition.update(Duration::from_secs(1));
        let halfway = transition.eye();
        assert!(close(halfway.x, 0.5));
        assert!(close(halfway.z, 0.5));

        transition.update(Duration::from_secs(5));
        assert!(transition.is_finished());
        assert_eq!(transition.eye(), Point3::new(1.0, 0.6, 0.0));
        assert!(transition.start(Point3::new(1.0, 1.6, 1.0)));
    }

    #[test]
    fn smoothstep_is_flat_at_the_ends() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!(close(smoothstep(0.1), 0.028));
    }
}
