//! Scene data: geometry, textures, materials and instances.
//!
//! - `model` holds interleaved vertices, CPU mesh data and GPU meshes
//! - `texture` wraps GPU textures, including cube maps
//! - `material` is the per-object shading input of the lit pipeline
//! - `instance` is the per-instance transform streamed to the vertex shader
//! - `object` bundles a model, material and instances into something drawable

pub mod instance;
pub mod material;
pub mod model;
pub mod object;
pub mod texture;
