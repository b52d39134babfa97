//! Gridfinity stacking profiles
//!
//! The stacking system is one cross-section used twice: swept around a bin
//! foot it forms the shape that drops into a baseplate, and as a cavity it
//! forms the recess of the baseplate itself. The bin and plate variants
//! differ only in the rise of the upper chamfer.
//!
//! A profile is stored as `(z, inset)` breakpoints from the bottom up,
//! where the inset is measured from the outline the profile is applied to.
//! Turning a profile into a solid is a single loft through the outline at
//! each breakpoint.

use gridfinity_kernel::{Modeler, Solid, Wire2D};
use serde::{Deserialize, Serialize};

use crate::constants::stacking_lip;
use crate::error::BuildResult;

/// Which variant of the stacking cross-section to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Bin feet (drops into a plate)
    Bin,
    /// Baseplate cavities (receives a foot)
    Plate,
}

/// One breakpoint of a stack profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileStep {
    /// Height above the profile bottom
    pub z: f32,
    /// Inward offset from the reference outline at this height
    pub inset: f32,
}

/// The Gridfinity stacking cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackProfile {
    steps: Vec<ProfileStep>,
}

impl StackProfile {
    /// Create the standard profile of the given kind
    pub fn new(kind: ProfileKind) -> Self {
        let h1 = stacking_lip::HEIGHT_1;
        let h2 = stacking_lip::HEIGHT_2;
        let h3 = match kind {
            ProfileKind::Bin => stacking_lip::HEIGHT_3_BIN,
            ProfileKind::Plate => stacking_lip::HEIGHT_3_BASE_PLATE,
        };
        let width = h1 + h3;

        // Lower 45 degree chamfer, straight wall, upper 45 degree chamfer
        // flaring out to the reference outline.
        let steps = vec![
            ProfileStep { z: 0.0, inset: width },
            ProfileStep {
                z: h1,
                inset: width - h1,
            },
            ProfileStep {
                z: h1 + h2,
                inset: width - h1,
            },
            ProfileStep {
                z: h1 + h2 + h3,
                inset: 0.0,
            },
        ];
        Self { steps }
    }

    /// Breakpoints from the bottom up
    pub fn steps(&self) -> &[ProfileStep] {
        &self.steps
    }

    /// Total height of the profile
    pub fn height(&self) -> f32 {
        self.steps.last().map(|s| s.z).unwrap_or(0.0)
    }

    /// Lateral width of the profile (largest inset)
    pub fn width(&self) -> f32 {
        self.steps
            .iter()
            .map(|s| s.inset)
            .fold(0.0, f32::max)
    }

    /// Loft the profile into a solid
    ///
    /// `section` supplies the outline at a given inset; the solid spans
    /// `z0` to `z0 + height()`. All sections must keep the same point
    /// count, which holds as long as the corner radii stay positive.
    pub fn solid<F>(&self, modeler: &dyn Modeler, z0: f32, section: F) -> BuildResult<Solid>
    where
        F: Fn(f32) -> Wire2D,
    {
        let sections: Vec<(Wire2D, glam::Vec3)> = self
            .steps
            .iter()
            .map(|step| {
                (
                    section(step.inset),
                    glam::Vec3::new(0.0, 0.0, z0 + step.z),
                )
            })
            .collect();
        Ok(modeler.loft(&sections)?)
    }
}
