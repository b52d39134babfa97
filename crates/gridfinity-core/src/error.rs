//! Build errors
//!
//! Two failure classes exist: invalid construction arguments, raised before
//! any geometry is built, and kernel failures, which are wrapped unmodified.
//! A build either returns a complete solid or fails; there are no partial
//! results.

use gridfinity_kernel::ModelerError;
use thiserror::Error;

/// Errors raised while constructing or building generator objects
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Grid needs at least one occupied cell")]
    EmptyGrid,

    #[error("Grid dimensions must be at least 1x1, got {x}x{y}")]
    InvalidGridSize { x: usize, y: usize },

    #[error("Expected {expected} compartments, got {found}")]
    CompartmentCountMismatch { expected: usize, found: usize },

    #[error("Compartment {id} does not span a rectangle")]
    InvalidCompartmentSpan { id: u16 },

    #[error("{feature} cannot be applied to a {host}")]
    InvalidPlacement {
        feature: &'static str,
        host: &'static str,
    },

    #[error("{location} placements fall outside the host bounds")]
    PlacementOutOfBounds { location: &'static str },

    #[error("Label angle must be within 0..=90 degrees, got {0}")]
    InvalidLabelAngle(f32),

    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error(transparent)]
    Modeler(#[from] ModelerError),
}

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;
