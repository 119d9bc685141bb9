//! Procedurally generated meshes.

pub mod primitives;
pub mod spline;

pub use primitives::{cube, uv_sphere};
pub use spline::{cardinal_spline, ribbon};
