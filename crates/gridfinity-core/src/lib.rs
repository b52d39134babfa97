//! Parametric Gridfinity storage component generator
//!
//! This crate contains the declarative domain model and build pipeline:
//! - GridDefinition: which grid cells a part occupies
//! - Feature / FeatureLocation: local geometry modifications and where
//!   they attach
//! - Base, BasePlate, Bin: root objects built once into immutable solids
//! - Compartments: subdivision of a bin's top volume
//!
//! All solid geometry is delegated to a [`gridfinity_kernel::Modeler`]
//! backend; builds are one-shot pure functions from declarative arguments
//! to a solid handle.

pub mod base;
pub mod baseplate;
pub mod bin;
pub mod compartments;
pub mod constants;
pub mod error;
pub mod export;
pub mod features;
pub mod grid;
pub mod locations;
pub mod outline;
pub mod profile;

#[cfg(test)]
mod testkit;

pub use base::{Base, BaseBlock};
pub use baseplate::{BasePlate, BasePlateBlock};
pub use bin::{Bin, BinHeight, StackingLip};
pub use compartments::{Compartment, Compartments, Region};
pub use error::{BuildError, BuildResult};
pub use export::{export_step, export_stl};
pub use features::{Feature, FeatureHost};
pub use grid::{CellKind, GridDefinition};
pub use locations::{FeatureLocation, Placement};
pub use outline::{CornerFlags, PlanOutline};
pub use profile::{ProfileKind, StackProfile};
