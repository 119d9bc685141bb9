//! Three flat-coloured cubes in a row.

use std::time::Duration;

use cgmath::{Deg, Point3, Vector3};

use crate::{
    camera::{Camera, Projection},
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{instance::Instance, material::MaterialUniform, object::SceneObject},
    flow::{self, GraphicsFlow, Out, constructor},
    render::Render,
};

use super::cube_model;

const COLOURS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]];

pub struct Coloring {
    cubes: Vec<SceneObject>,
}

impl Coloring {
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let model = cube_model(&init);
        let cubes = COLOURS
            .iter()
            .enumerate()
            .map(|(i, colour)| {
                let material =
                    init.plain_material(&format!("cube {i}"), MaterialUniform::emissive(*colour));
                let x = 4.5 * i as f32 - 4.5;
                SceneObject::single(
                    &init.device,
                    model.clone(),
                    material,
                    Instance::at(Vector3::new(x, 0.0, 0.0)),
                )
            })
            .collect();
        Ok(Self { cubes })
    }
}

impl GraphicsFlow<(), ()> for Coloring {
    fn on_init(&mut self, ctx: &mut Context, _: &mut ()) -> Out<(), ()> {
        if let Some(camera) = Camera::look_at(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        ) {
            ctx.set_camera(camera);
        }
        ctx.set_projection(Projection::perspective(Deg(50.0), 0.01, 100.0));
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, _: &mut (), _: Duration) -> Out<(), ()> {
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.cubes.iter().collect()
    }
}

pub fn run() -> anyhow::Result<()> {
    let config = DemoConfig::titled("Coloring").load()?;
    flow::run::<(), ()>(config, vec![constructor(Coloring::new)])
}
