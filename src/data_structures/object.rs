use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::{Instance, InstanceRaw},
    material::Material,
    model::Model,
};

/// A model drawn with one material at one or more transforms.
///
/// Models are shared through an `Arc` so several objects (e.g. planets) can reuse
/// the same sphere with their own material and instances.
#[derive(Debug)]
pub struct SceneObject {
    pub model: Arc<Model>,
    pub material: Material,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(
        device: &wgpu::Device,
        model: Arc<Model>,
        material: Material,
        instances: Vec<Instance>,
    ) -> Self {
        let instances = if instances.is_empty() {
            vec![Instance::new()]
        } else {
            instances
        };
        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", material.name)),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            model,
            material,
            instances,
            instance_buffer,
            visible: true,
        }
    }

    pub fn single(device: &wgpu::Device, model: Arc<Model>, material: Material, instance: Instance) -> Self {
        Self::new(device, model, material, vec![instance])
    }

    /// Replace the first instance's transform with an arbitrary matrix and upload it.
    pub fn write_matrix(&self, queue: &wgpu::Queue, matrix: cgmath::Matrix4<f32>) {
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&[InstanceRaw::from_matrix(matrix)]),
        );
    }
}
