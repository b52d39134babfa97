//! CAD kernel abstraction for the Gridfinity generator
//!
//! This crate provides:
//! - An abstract [`Modeler`](kernel::Modeler) trait for solid geometry
//!   operations (primitives, extrude, loft, booleans, queries, export)
//! - A pure Rust backend built on the Truck B-Rep kernel
//! - A null backend used when no kernel is compiled in

pub mod kernel;

// Re-exports for convenience
pub use kernel::{
    Aabb, BooleanType, EdgeId, EdgeInfo, FaceId, FaceInfo, Modeler, ModelerError, ModelerResult,
    NullModeler, Solid, StepExportOptions, TessellatedMesh, Wire2D, default_modeler,
};

#[cfg(feature = "truck")]
pub use kernel::TruckModeler;
