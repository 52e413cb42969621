//! In-memory render backend
//!
//! Keeps uploaded buffers in host memory and tracks how many geometry and
//! material handles are alive. Useful for headless processing and for
//! checking that point clouds release what they upload.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;
use crate::geometry::PointGeometry;
use crate::material::Material;
use crate::traits::RenderBackend;

#[derive(Debug, Default)]
struct LiveCounts {
    geometries: Cell<usize>,
    materials: Cell<usize>,
    uploads: Cell<usize>,
}

/// Render backend that stores buffers in host memory
///
/// Clones share the same live-handle counters.
#[derive(Debug, Clone, Default)]
pub struct HostBackend {
    counts: Rc<LiveCounts>,
}

impl HostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometry handles not yet dropped
    pub fn live_geometries(&self) -> usize {
        self.counts.geometries.get()
    }

    /// Number of material handles not yet dropped
    pub fn live_materials(&self) -> usize {
        self.counts.materials.get()
    }

    /// Total geometry uploads, including position updates
    pub fn uploads(&self) -> usize {
        self.counts.uploads.get()
    }
}

/// Geometry buffers held by a [`HostBackend`]
#[derive(Debug)]
pub struct HostGeometry {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    counts: Rc<LiveCounts>,
}

impl HostGeometry {
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }
}

impl Drop for HostGeometry {
    fn drop(&mut self) {
        self.counts.geometries.set(self.counts.geometries.get() - 1);
    }
}

/// Material state held by a [`HostBackend`]
#[derive(Debug)]
pub struct HostMaterial {
    material: Material,
    counts: Rc<LiveCounts>,
}

impl HostMaterial {
    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Drop for HostMaterial {
    fn drop(&mut self) {
        self.counts.materials.set(self.counts.materials.get() - 1);
    }
}

impl RenderBackend for HostBackend {
    type Geometry = HostGeometry;
    type Material = HostMaterial;

    fn upload_geometry(&mut self, geometry: &PointGeometry) -> Result<HostGeometry> {
        self.counts.geometries.set(self.counts.geometries.get() + 1);
        self.counts.uploads.set(self.counts.uploads.get() + 1);
        Ok(HostGeometry {
            positions: geometry.positions().to_vec(),
            colors: geometry.colors().to_vec(),
            counts: Rc::clone(&self.counts),
        })
    }

    fn update_positions(&mut self, handle: &mut HostGeometry, positions: &[[f32; 3]]) -> Result<()> {
        handle.positions.copy_from_slice(positions);
        self.counts.uploads.set(self.counts.uploads.get() + 1);
        Ok(())
    }

    fn create_material(&mut self, material: &Material) -> Result<HostMaterial> {
        self.counts.materials.set(self.counts.materials.get() + 1);
        Ok(HostMaterial {
            material: *material,
            counts: Rc::clone(&self.counts),
        })
    }

    fn update_material(&mut self, handle: &mut HostMaterial, material: &Material) -> Result<()> {
        handle.material = *material;
        Ok(())
    }
}
