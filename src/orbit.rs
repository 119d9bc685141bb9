//! Closed-form orbital mechanics for the solar system demos.
//!
//! Nothing is integrated: every position is a trigonometric function of the
//! elapsed simulation time in days.

use std::f32::consts::TAU;

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, Vector3, Zero};

/// Day count shown in [`ViewMode::Static`] and the starting point of every preset.
pub const STATIC_DAYS: f32 = 17.62;
pub const MIN_SPEED: f32 = 0.01;
pub const MAX_SPEED: f32 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// In front of the earth, looking at it.
    FrontOfEarth,
    /// Behind the earth, looking towards the earth and moon.
    BehindEarth,
    /// From the sun at the earth-moon midpoint.
    FromSun,
    /// From the sun across the inner and outer planets.
    #[default]
    Overview,
    /// From the moon at the earth with time frozen at [`STATIC_DAYS`].
    Static,
    /// From the moon at the earth while time keeps running.
    FromMoon,
}

impl ViewMode {
    /// The five selectable modes, by number key 0-4.
    pub const SELECTABLE: [ViewMode; 5] = [
        ViewMode::FrontOfEarth,
        ViewMode::BehindEarth,
        ViewMode::FromSun,
        ViewMode::Overview,
        ViewMode::Static,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::SELECTABLE.get(index).copied()
    }

    /// Name of the body the eye sits inside, if any.
    pub fn eye_body(self) -> Option<&'static str> {
        match self {
            ViewMode::FromSun | ViewMode::Overview => Some("sun"),
            ViewMode::Static | ViewMode::FromMoon => Some("moon"),
            ViewMode::FrontOfEarth | ViewMode::BehindEarth => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: &'static str,
    /// Days per revolution around the parent.
    pub orbit_period: f32,
    pub orbit_radius: f32,
    /// Days per spin cycle, multiplied by `spin_rate`.
    pub spin_period: f32,
    pub spin_rate: f32,
    pub scale: f32,
    /// Index of the body this one orbits; `None` orbits the origin.
    pub parent: Option<usize>,
}

impl Body {
    pub fn star(name: &'static str, scale: f32) -> Self {
        Self {
            name,
            orbit_period: 1.0,
            orbit_radius: 0.0,
            spin_period: 1.0,
            spin_rate: 0.0,
            scale,
            parent: None,
        }
    }

    pub fn planet(name: &'static str, orbit_period: f32, orbit_radius: f32, spin_rate: f32, scale: f32) -> Self {
        Self {
            name,
            orbit_period,
            orbit_radius,
            spin_period: 1.0,
            spin_rate,
            scale,
            parent: None,
        }
    }

    pub fn around(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_spin(mut self, spin_period: f32, spin_rate: f32) -> Self {
        self.spin_period = spin_period;
        self.spin_rate = spin_rate;
        self
    }

    pub fn orbit_angle(&self, days: f32) -> f32 {
        days / self.orbit_period * TAU
    }

    pub fn spin_angle(&self, days: f32) -> f32 {
        (days / self.spin_period).fract() * TAU * self.spin_rate
    }

    /// Offset from the parent's position.
    pub fn orbit_offset(&self, days: f32) -> Vector3<f32> {
        let theta = self.orbit_angle(days);
        Vector3::new(theta.cos(), 0.0, theta.sin()) * self.orbit_radius
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    pub days: f32,
    pub days_per_second: f32,
    pub view_mode: ViewMode,
    /// Parents always precede their satellites.
    pub bodies: Vec<Body>,
}

impl SolarSystem {
    /// Sun, earth and moon, watched from the moon.
    pub fn earth_moon() -> Self {
        Self {
            days: STATIC_DAYS,
            days_per_second: 4.10,
            view_mode: ViewMode::FromMoon,
            bodies: vec![
                Body::star("sun", 3.0),
                Body::planet("earth", 365.0, 30.0, 1.0, 1.0),
                Body::planet("moon", 27.322, 4.0, -1.0, 0.27)
                    .around(1)
                    .with_spin(27.0, -1.0),
            ],
        }
    }

    /// The sun and all eight planets plus the moon.
    pub fn full() -> Self {
        Self {
            days: STATIC_DAYS,
            days_per_second: 60.0,
            view_mode: ViewMode::Overview,
            bodies: vec![
                Body::star("sun", 3.0),
                Body::planet("mercury", 87.97, 11.7, 58.6, 0.38),
                Body::planet("venus", 224.7, 21.69, 243.0, 0.95),
                Body::planet("earth", 365.0, 30.0, 1.0, 1.0),
                Body::planet("moon", 27.322, 4.0, -1.0, 0.27)
                    .around(3)
                    .with_spin(27.0, -1.0),
                Body::planet("mars", 686.98, 45.72, 1.042, 0.53),
                Body::planet("jupiter", 4332.59, 156.09, 0.42, 11.20),
                Body::planet("saturn", 10759.22, 286.17, 0.46, 9.45),
                Body::planet("uranus", 30688.5, 575.4, 0.71, 4.0),
                Body::planet("neptune", 60182.0, 901.8, 0.67, 3.88),
            ],
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.days += dt * self.days_per_second;
    }

    /// Clamped to `[MIN_SPEED, MAX_SPEED]` days per second.
    pub fn set_speed(&mut self, days_per_second: f32) {
        self.days_per_second = days_per_second.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// The day count everything is evaluated at; frozen in [`ViewMode::Static`].
    pub fn simulation_days(&self) -> f32 {
        match self.view_mode {
            ViewMode::Static => STATIC_DAYS,
            _ => self.days,
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|body| body.name == name)
    }

    /// World positions of all bodies, in body order.
    pub fn positions(&self) -> Vec<Vector3<f32>> {
        let days = self.simulation_days();
        let mut positions: Vec<Vector3<f32>> = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let origin = body
                .parent
                .and_then(|parent| positions.get(parent).copied())
                .unwrap_or_else(Vector3::zero);
            positions.push(origin + body.orbit_offset(days));
        }
        positions
    }

    /// Per body, whether it should be drawn. The body the eye sits inside is hidden.
    pub fn visible_bodies(&self) -> Vec<bool> {
        let hidden = self.view_mode.eye_body().and_then(|name| self.index_of(name));
        (0..self.bodies.len()).map(|i| Some(i) != hidden).collect()
    }

    pub fn position_of(&self, name: &str) -> Option<Vector3<f32>> {
        let index = self.index_of(name)?;
        self.positions().get(index).copied()
    }

    /// `T * R_y(spin) * S` for every body.
    pub fn model_matrices(&self) -> Vec<Matrix4<f32>> {
        let days = self.simulation_days();
        self.bodies
            .iter()
            .zip(self.positions())
            .map(|(body, position)| {
                Matrix4::from_translation(position)
                    * Matrix4::from_angle_y(Rad(body.spin_angle(days)))
                    * Matrix4::from_scale(body.scale)
            })
            .collect()
    }

    /// Eye and target of the camera for the current view mode.
    pub fn view_eye_target(&self) -> (Point3<f32>, Point3<f32>) {
        let at = |name| self.position_of(name).unwrap_or_else(Vector3::zero);
        let earth = at("earth");
        let moon = at("moon");
        let (eye, target) = match self.view_mode {
            ViewMode::FrontOfEarth => (
                earth + Vector3::new(-3.0f32, 1.0, 3.0) / 19.0f32.sqrt() * 5.0,
                earth,
            ),
            ViewMode::BehindEarth => (
                Vector3::new(-3.0f32, 2.0, 3.0) / 22.0f32.sqrt() * -5.0,
                earth * 0.05,
            ),
            ViewMode::FromSun => (Vector3::zero(), (earth + moon) * 0.5),
            ViewMode::Overview => (
                Vector3::zero(),
                earth + at("jupiter") + at("venus") + moon + at("neptune"),
            ),
            ViewMode::Static | ViewMode::FromMoon => (moon, earth),
        };
        (Point3::from_vec(eye), Point3::from_vec(target))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, SquareMatrix};

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn advance_is_scaled_by_speed() {
        let mut system = SolarSystem::earth_moon();
        system.days = 0.0;
        system.advance(2.0);
        assert!(close(system.days, 8.2));
    }

    #[test]
    fn speed_is_clamped() {
        let mut system = SolarSystem::full();
        system.set_speed(0.0);
        assert_eq!(system.days_per_second, MIN_SPEED);
        system.set_speed(1000.0);
        assert_eq!(system.days_per_second, MAX_SPEED);
        system.set_speed(12.5);
        assert_eq!(system.days_per_second, 12.5);
    }

    #[test]
    fn static_mode_freezes_time() {
        let mut system = SolarSystem::full();
        system.view_mode = ViewMode::Static;
        system.advance(100.0);
        assert_eq!(system.simulation_days(), STATIC_DAYS);
        let frozen = system.positions();
        system.advance(100.0);
        assert_eq!(system.positions(), frozen);
    }

    #[test]
    fn earth_starts_on_the_x_axis_and_completes_a_year() {
        let mut system = SolarSystem::earth_moon();
        system.days = 0.0;
        let earth = system.position_of("earth").unwrap();
        assert!(close(earth.x, 30.0) && close(earth.z, 0.0));

        system.days = 365.0 / 4.0;
        let earth = system.position_of("earth").unwrap();
        assert!(close(earth.x, 0.0) && close(earth.z, 30.0));
    }

    #[test]
    fn moon_follows_the_earth() {
        let mut system = SolarSystem::full();
        for days in [0.0, 13.0, 200.0, 5000.0] {
            system.days = days;
            let earth = system.position_of("earth").unwrap();
            let moon = system.position_of("moon").unwrap();
            assert!(close((moon - earth).magnitude(), 4.0));
        }
    }

    #[test]
    fn spin_wraps_every_period() {
        let moon = &SolarSystem::earth_moon().bodies[2];
        assert!(close(moon.spin_angle(0.0), 0.0));
        assert!(close(moon.spin_angle(13.5), -TAU * 0.5));
        assert!(close(moon.spin_angle(27.0 + 13.5), -TAU * 0.5));
    }

    #[test]
    fn model_matrix_places_and_scales_the_body() {
        let mut system = SolarSystem::earth_moon();
        system.days = 0.0;
        let matrices = system.model_matrices();
        assert_eq!(matrices.len(), 3);
        // sun is a pure scale at the origin
        assert_eq!(matrices[0], Matrix4::from_scale(3.0));
        let earth = matrices[1];
        assert!(close(earth.w.x, 30.0));
        assert!(close(earth.determinant(), 1.0));
    }

    #[test]
    fn view_modes_by_number() {
        assert_eq!(ViewMode::from_index(0), Some(ViewMode::FrontOfEarth));
        assert_eq!(ViewMode::from_index(4), Some(ViewMode::Static));
        assert_eq!(ViewMode::from_index(5), None);
        assert_eq!(ViewMode::Overview.eye_body(), Some("sun"));
        assert_eq!(ViewMode::Static.eye_body(), Some("moon"));
        assert_eq!(ViewMode::BehindEarth.eye_body(), None);
    }

    #[test]
    fn moon_views_look_at_the_earth() {
        let system = SolarSystem::earth_moon();
        let (eye, target) = system.view_eye_target();
        assert_eq!(eye.to_vec(), system.position_of("moon").unwrap());
        assert_eq!(target.to_vec(), system.position_of("earth").unwrap());
    }

    #[test]
    fn front_of_earth_keeps_a_fixed_distance() {
        let mut system = SolarSystem::full();
        system.view_mode = ViewMode::FrontOfEarth;
        let (eye, target) = system.view_eye_target();
        assert!(close((eye - target).magnitude(), 5.0));
    }

    #[test]
    fn the_body_holding_the_eye_is_hidden() {
        let mut system = SolarSystem::full();
        let moon = system.index_of("moon").unwrap();
        let sun = system.index_of("sun").unwrap();
        for mode in [ViewMode::FromMoon, ViewMode::Static] {
            system.view_mode = mode;
            let visible = system.visible_bodies();
            assert!(!visible[moon], "{:?} draws the moon around the eye", mode);
            assert_eq!(visible.iter().filter(|v| !**v).count(), 1);
        }
        for mode in [ViewMode::FromSun, ViewMode::Overview] {
            system.view_mode = mode;
            let visible = system.visible_bodies();
            assert!(!visible[sun] && visible[moon]);
        }
        for mode in [ViewMode::FrontOfEarth, ViewMode::BehindEarth] {
            system.view_mode = mode;
            assert!(system.visible_bodies().iter().all(|v| *v));
        }
    }

    #[test]
    fn earth_moon_default_view_hides_the_moon() {
        let system = SolarSystem::earth_moon();
        let (eye, _) = system.view_eye_target();
        let moon = system.index_of("moon").unwrap();
        // the eye is at the moon's centre, well inside its radius
        assert!((eye.to_vec() - system.position_of("moon").unwrap()).magnitude() < system.bodies[moon].scale);
        assert_eq!(system.visible_bodies(), vec![true, true, false]);
    }

    #[test]
    fn behind_earth_looks_at_a_twentieth_of_the_earth() {
        let mut system = SolarSystem::full();
        system.view_mode = ViewMode::BehindEarth;
        let (eye, target) = system.view_eye_target();
        let expected_eye = Vector3::new(-3.0f32, 2.0, 3.0).normalize() * -5.0;
        assert!((eye.to_vec() - expected_eye).magnitude() < 1e-4);
        let earth = system.position_of("earth").unwrap();
        assert!((target.to_vec() - earth * 0.05).magnitude() < 1e-4);
    }

    #[test]
    fn from_sun_looks_between_earth_and_moon() {
        let mut system = SolarSystem::full();
        system.view_mode = ViewMode::FromSun;
        let (eye, target) = system.view_eye_target();
        assert_eq!(eye, Point3::new(0.0, 0.0, 0.0));
        let earth = system.position_of("earth").unwrap();
        let moon = system.position_of("moon").unwrap();
        assert!((target.to_vec() - (earth + moon) / 2.0).magnitude() < 1e-4);
    }

    #[test]
    fn overview_aims_at_the_sum_of_five_bodies() {
        let mut system = SolarSystem::full();
        system.view_mode = ViewMode::Overview;
        let (eye, target) = system.view_eye_target();
        assert_eq!(eye, Point3::new(0.0, 0.0, 0.0));
        let sum: Vector3<f32> = ["earth", "jupiter", "venus", "moon", "neptune"]
            .iter()
            .map(|name| system.position_of(name).unwrap())
            .sum();
        assert!((target.to_vec() - sum).magnitude() < 1e-2);
    }

    #[test]
    fn full_preset_orbits_and_sizes() {
        let system = SolarSystem::full();
        let table: Vec<_> = system
            .bodies
            .iter()
            .map(|b| (b.name, b.orbit_radius, b.scale, b.spin_rate, b.parent))
            .collect();
        assert_eq!(
            table,
            vec![
                ("sun", 0.0, 3.0, 0.0, None),
                ("mercury", 11.7, 0.38, 58.6, None),
                ("venus", 21.69, 0.95, 243.0, None),
                ("earth", 30.0, 1.0, 1.0, None),
                ("moon", 4.0, 0.27, -1.0, Some(3)),
                ("mars", 45.72, 0.53, 1.042, None),
                ("jupiter", 156.09, 11.20, 0.42, None),
                ("saturn", 286.17, 9.45, 0.46, None),
                ("uranus", 575.4, 4.0, 0.71, None),
                ("neptune", 901.8, 3.88, 0.67, None),
            ]
        );
        assert_eq!(system.view_mode, ViewMode::Overview);
    }
}
