//! CAD kernel backends
//!
//! The [`Modeler`] trait is the only geometry surface the generator uses;
//! backends implement it on top of an actual kernel.

pub mod traits;

#[cfg(feature = "truck")]
pub mod truck;

pub use traits::*;

#[cfg(feature = "truck")]
pub use truck::TruckModeler;
