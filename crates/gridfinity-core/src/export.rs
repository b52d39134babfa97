//! Export delegation
//!
//! The generator issues no file format of its own. STL goes through the
//! kernel's tessellation and `stl_io`; STEP is forwarded to the kernel's
//! own writer.

use std::fs::File;
use std::path::Path;

use gridfinity_kernel::{Modeler, ModelerError, Solid, StepExportOptions};

use crate::constants::STL_TOLERANCE;
use crate::error::BuildResult;

/// Write a solid to a binary STL file
pub fn export_stl(
    modeler: &dyn Modeler,
    solid: &Solid,
    path: impl AsRef<Path>,
) -> BuildResult<()> {
    let mesh = modeler.tessellate(solid, STL_TOLERANCE)?;

    let triangles: Vec<stl_io::Triangle> = mesh
        .indices
        .chunks(3)
        .zip(&mesh.normals)
        .map(|(tri, normal)| stl_io::Triangle {
            normal: stl_io::Normal::new(*normal),
            vertices: [
                stl_io::Vertex::new(mesh.vertices[tri[0] as usize]),
                stl_io::Vertex::new(mesh.vertices[tri[1] as usize]),
                stl_io::Vertex::new(mesh.vertices[tri[2] as usize]),
            ],
        })
        .collect();

    let mut file =
        File::create(path.as_ref()).map_err(|e| ModelerError::FileIo(e.to_string()))?;
    stl_io::write_stl(&mut file, triangles.iter())
        .map_err(|e| ModelerError::FileIo(e.to_string()))?;

    tracing::debug!(triangles = triangles.len(), "wrote stl");
    Ok(())
}

/// Export a solid to a STEP file using the kernel's own writer
pub fn export_step(
    modeler: &dyn Modeler,
    solid: &Solid,
    path: impl AsRef<Path>,
) -> BuildResult<()> {
    Ok(modeler.export_step(solid, path.as_ref(), &StepExportOptions::default())?)
}
