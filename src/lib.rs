//! flow-labs
//!
//! Small graphics demos on top of a flow-based wgpu frame loop: a toy solar
//! system, a handful of lighting labs, a mesh and spline viewer, skybox
//! reflections and a multi-light scene. Each demo is one [`flow::GraphicsFlow`]
//! started by a thin binary under `src/bin/`.
//!
//! High-level modules
//! - `camera`: view matrices, projections, the fly camera and preset transitions
//! - `config`: layered demo configuration (defaults, `flow-labs.toml`, environment)
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, instances, textures and materials
//! - `flow`: the frame loop and the trait every demo implements
//! - `geometry`: generated meshes (cube, sphere) and cardinal splines
//! - `input`: keyboard state shared by the demos
//! - `orbit`: closed-form planet positions and solar system view modes
//! - `pipelines`: the lit pipeline, scene lights and backdrops (skybox, stars)
//! - `resources`: OBJ, PLY, point list and texture loading
//! - `render`: render composition for efficient pipeline reuse
//! - `spaceship`: ship movement for the orthographic space demo
//! - `demos`: the programs themselves
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod demos;
pub mod flow;
pub mod geometry;
pub mod input;
pub mod orbit;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod spaceship;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
