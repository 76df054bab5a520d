use blade_graphics as gpu;

use std::{mem, ptr};

/// GPU-resident copy of a [`Renderable`](crate::Renderable) mesh.
///
/// Positions and normals are bound as storage buffers of `vec4<f32>`,
/// indices are drawn as `u32`.
pub struct GpuMesh {
    pub position_buf: gpu::Buffer,
    pub normal_buf: gpu::Buffer,
    pub index_buf: gpu::Buffer,
    pub index_count: u32,
}

fn upload<T: Copy>(
    context: &gpu::Context,
    name: &'static str,
    data: &[T],
) -> (gpu::Buffer, gpu::Buffer, u64) {
    let size = mem::size_of_val(data) as u64;
    let buffer = context.create_buffer(gpu::BufferDesc {
        name,
        size,
        memory: gpu::Memory::Device,
    });
    let stage = context.create_buffer(gpu::BufferDesc {
        name: "mesh-stage",
        size,
        memory: gpu::Memory::Upload,
    });
    unsafe {
        ptr::copy_nonoverlapping(data.as_ptr(), stage.data() as *mut T, data.len());
    }
    (buffer, stage, size)
}

impl GpuMesh {
    pub fn new(
        mesh: &impl crate::Renderable,
        context: &gpu::Context,
        encoder: &mut gpu::CommandEncoder,
    ) -> Self {
        let positions = mesh.positions();
        let normals = mesh.normals();
        let indices = mesh.indices();
        debug_assert_eq!(positions.len(), normals.len());

        let (position_buf, position_stage, vertex_data_size) =
            upload(context, "mesh-positions", positions);
        let (normal_buf, normal_stage, _) = upload(context, "mesh-normals", normals);
        let (index_buf, index_stage, index_data_size) =
            upload(context, "mesh-indices", indices);

        encoder.start();
        if let mut pass = encoder.transfer("upload mesh") {
            pass.copy_buffer_to_buffer(position_stage.at(0), position_buf.at(0), vertex_data_size);
            pass.copy_buffer_to_buffer(normal_stage.at(0), normal_buf.at(0), vertex_data_size);
            pass.copy_buffer_to_buffer(index_stage.at(0), index_buf.at(0), index_data_size);
        }
        let sync_point = context.submit(encoder);
        context.wait_for(&sync_point, !0);

        context.destroy_buffer(position_stage);
        context.destroy_buffer(normal_stage);
        context.destroy_buffer(index_stage);

        log::info!(
            "Uploaded mesh: {} vertices, {} indices",
            positions.len(),
            indices.len()
        );
        Self {
            position_buf,
            normal_buf,
            index_buf,
            index_count: mesh.count(),
        }
    }

    pub fn deinit(&mut self, context: &gpu::Context) {
        context.destroy_buffer(self.position_buf);
        context.destroy_buffer(self.normal_buf);
        context.destroy_buffer(self.index_buf);
    }
}
