//! wgpu implementation of the render backend

use bytemuck::{Pod, Zeroable};
use imagecloud_core::{Material, PointGeometry, RenderBackend, Result};

use crate::device::GpuContext;

/// Material state laid out for a uniform buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// RGB tint with opacity in `w`
    pub color: [f32; 4],
    pub size: f32,
    /// Bit 0: vertex colors, bit 1: transparent, bit 2: size attenuation
    pub flags: u32,
    pub _padding: [u32; 2],
}

impl MaterialUniform {
    pub const VERTEX_COLORS: u32 = 1;
    pub const TRANSPARENT: u32 = 1 << 1;
    pub const SIZE_ATTENUATION: u32 = 1 << 2;
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        let mut flags = 0;
        if material.vertex_colors {
            flags |= Self::VERTEX_COLORS;
        }
        if material.transparent {
            flags |= Self::TRANSPARENT;
        }
        if material.size_attenuation {
            flags |= Self::SIZE_ATTENUATION;
        }

        let [r, g, b] = material.color;
        Self {
            color: [r, g, b, material.opacity],
            size: material.size,
            flags,
            _padding: [0; 2],
        }
    }
}

/// Position and color vertex buffers on the GPU
///
/// Both buffers are destroyed when the handle is dropped.
pub struct GpuGeometry {
    pub position_buffer: wgpu::Buffer,
    pub color_buffer: wgpu::Buffer,
    point_count: u32,
}

impl GpuGeometry {
    /// Number of points in the buffers
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Vertex buffer layouts: slot 0 holds positions, slot 1 holds colors
    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                }],
            },
        ]
    }
}

impl Drop for GpuGeometry {
    fn drop(&mut self) {
        self.position_buffer.destroy();
        self.color_buffer.destroy();
    }
}

/// Material uniform buffer on the GPU, destroyed on drop
pub struct GpuMaterial {
    pub uniform_buffer: wgpu::Buffer,
    uniform: MaterialUniform,
}

impl GpuMaterial {
    /// The values last written to the uniform buffer
    pub fn uniform(&self) -> &MaterialUniform {
        &self.uniform
    }
}

impl Drop for GpuMaterial {
    fn drop(&mut self) {
        self.uniform_buffer.destroy();
    }
}

/// Render backend creating wgpu buffers on a [`GpuContext`]
pub struct WgpuBackend<'a> {
    context: &'a GpuContext,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(context: &'a GpuContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &GpuContext {
        self.context
    }
}

impl RenderBackend for WgpuBackend<'_> {
    type Geometry = GpuGeometry;
    type Material = GpuMaterial;

    fn upload_geometry(&mut self, geometry: &PointGeometry) -> Result<GpuGeometry> {
        let usage = wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC;
        log::debug!("Uploading {} points", geometry.len());

        Ok(GpuGeometry {
            position_buffer: self
                .context
                .create_buffer_init("ImageCloud Positions", geometry.positions(), usage),
            color_buffer: self
                .context
                .create_buffer_init("ImageCloud Colors", geometry.colors(), usage),
            point_count: geometry.len() as u32,
        })
    }

    fn update_positions(&mut self, handle: &mut GpuGeometry, positions: &[[f32; 3]]) -> Result<()> {
        if !positions.is_empty() {
            self.context
                .queue
                .write_buffer(&handle.position_buffer, 0, bytemuck::cast_slice(positions));
        }
        Ok(())
    }

    fn create_material(&mut self, material: &Material) -> Result<GpuMaterial> {
        let uniform = MaterialUniform::from(material);
        Ok(GpuMaterial {
            uniform_buffer: self.context.create_buffer_init(
                "ImageCloud Material",
                &[uniform],
                wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
            ),
            uniform,
        })
    }

    fn update_material(&mut self, handle: &mut GpuMaterial, material: &Material) -> Result<()> {
        let uniform = MaterialUniform::from(material);
        self.context
            .queue
            .write_buffer(&handle.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        handle.uniform = uniform;
        Ok(())
    }
}
