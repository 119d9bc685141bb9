//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn each frame with a [`Render`] value. The
//! frame loop walks all of them, draws backdrops first and then batches every
//! instanced object onto the lit pipeline.

use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::{material::Material, model::Model, object::SceneObject},
    pipelines::stars::Starfield,
};

/// A model drawn with a material at `amount` instances from `instance`.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub material: &'a Material,
    pub amount: usize,
}

/// Full-screen passes drawn before any geometry.
#[derive(Clone, Copy)]
pub enum Backdrop<'a> {
    /// The scene's environment cube map.
    Skybox,
    Starfield(&'a Starfield),
}

/// Specifies how a flow should be rendered this frame.
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single lit object
/// - `Defaults(Vec<Instanced>)` renders a batch of lit objects
/// - `Skybox` fills the background with the scene's environment map
/// - `Starfield` fills the background with a scrolling starfield
/// - `Composed(Vec<Render>)` recursively renders multiple renders
/// - `Custom(...)` invokes a closure with direct access to the render pass
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Skybox,
    Starfield(&'a Starfield),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

impl<'a, 'pass> Render<'a, 'pass> {
    pub(crate) fn set_pipelines(
        self,
        ctx: &Context,
        render_pass: &mut RenderPass<'pass>,
        backdrops: &mut Vec<Backdrop<'a>>,
        lits: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::Default(instanced) => lits.push(instanced),
            Render::Defaults(mut vec) => lits.append(&mut vec),
            Render::Skybox => backdrops.push(Backdrop::Skybox),
            Render::Starfield(stars) => backdrops.push(Backdrop::Starfield(stars)),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(ctx, render_pass, backdrops, lits)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a SceneObject> for Instanced<'a> {
    fn from(object: &'a SceneObject) -> Self {
        Instanced {
            instance: &object.instance_buffer,
            model: &object.model,
            material: &object.material,
            amount: object.instances.len(),
        }
    }
}

impl<'a, 'pass> From<&'a SceneObject> for Render<'a, 'pass> {
    fn from(object: &'a SceneObject) -> Self {
        if object.visible {
            Render::Default(object.into())
        } else {
            Render::None
        }
    }
}

impl<'a, 'pass> FromIterator<&'a SceneObject> for Render<'a, 'pass> {
    fn from_iter<I: IntoIterator<Item = &'a SceneObject>>(iter: I) -> Self {
        Render::Defaults(
            iter.into_iter()
                .filter(|object| object.visible)
                .map(Instanced::from)
                .collect(),
        )
    }
}
