//! Gridfinity bins
//!
//! A bin stacks a hollowable body on top of a [`Base`]: the base's plan
//! outline is extruded to the requested height, compartments are cut into
//! the top volume, and an optional stacking lip is unioned onto the rim so
//! another bin's feet can drop onto it.

use gridfinity_kernel::{BooleanType, Modeler, Solid};
use serde::{Deserialize, Serialize};

use crate::base::Base;
use crate::compartments::Compartments;
use crate::constants::{grid as grid_constants, stacking_lip};
use crate::error::{BuildError, BuildResult};
use crate::grid::GridDefinition;
use crate::outline::grid_outline;
use crate::profile::{ProfileKind, StackProfile};

/// Requested bin height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinHeight {
    /// Height of the body extruded on top of the base, in millimeters
    Millimeters(f32),
    /// Total bin height in 7 mm units, base included
    Units(u32),
}

impl BinHeight {
    /// Body height above a base of the given height
    fn body_height(self, base_height: f32) -> BuildResult<f32> {
        let body = match self {
            BinHeight::Millimeters(mm) => mm,
            BinHeight::Units(units) => units as f32 * grid_constants::HEIGHT_UNIT - base_height,
        };
        if body <= 0.0 {
            return Err(BuildError::NonPositiveDimension {
                name: "bin body height",
                value: body,
            });
        }
        Ok(body)
    }
}

/// Stacking lip unioned onto a bin's rim
///
/// Built as a rim ring of stack-profile height with the plate-side recess
/// subtracted, so a foot drops into the top of this bin exactly as it
/// drops into a baseplate. Height added by the lip is not counted towards
/// the requested bin height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackingLip;

impl StackingLip {
    pub fn new() -> Self {
        Self
    }

    /// Height the lip adds above the bin body
    pub fn height(&self) -> f32 {
        StackProfile::new(ProfileKind::Plate).height()
    }

    /// Build the lip ring sitting on the rim at `z0`
    fn build(&self, modeler: &dyn Modeler, grid: &GridDefinition, z0: f32) -> BuildResult<Solid> {
        let profile = StackProfile::new(ProfileKind::Plate);
        let rim = Base::platform_outline(grid).extrude(modeler, z0, profile.height())?;
        let recess = profile.solid(modeler, z0, |inset| {
            grid_outline(
                grid,
                grid_constants::SIZE,
                stacking_lip::OFFSET + inset,
                grid_constants::RADIUS - stacking_lip::OFFSET - inset,
            )
            .outer
        })?;
        Ok(modeler.boolean(&rim, &recess, BooleanType::Subtract)?)
    }
}

/// A built bin
#[derive(Debug)]
pub struct Bin {
    solid: Solid,
    grid: GridDefinition,
    height: f32,
}

impl Bin {
    /// Build a bin on top of a base
    ///
    /// The build order is fixed: extrude the body from the base's plan
    /// outline, cut compartments into it top-down, then union the lip.
    pub fn new(
        modeler: &dyn Modeler,
        base: Base,
        height: BinHeight,
        compartments: Option<Compartments>,
        lip: Option<StackingLip>,
    ) -> BuildResult<Self> {
        let body_height = height.body_height(base.height())?;
        let total = base.height() + body_height;
        let grid = base.grid().clone();

        let outline = Base::platform_outline(&grid);
        let body = outline.extrude(modeler, base.height(), body_height)?;
        let mut solid = modeler.boolean(base.solid(), &body, BooleanType::Union)?;

        if let Some(compartments) = &compartments {
            let face = modeler.bounding_box(&body)?;
            solid = compartments.cut(modeler, solid, &face, body_height)?;
        }

        let mut lip_height = 0.0;
        if let Some(lip) = &lip {
            let ring = lip.build(modeler, &grid, total)?;
            solid = modeler.boolean(&solid, &ring, BooleanType::Union)?;
            lip_height = lip.height();
        }

        tracing::debug!(total, body_height, "built bin");

        Ok(Self {
            solid,
            grid,
            height: total + lip_height,
        })
    }

    /// The built solid
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// The grid this bin stands on
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Total height including the lip, if any
    pub fn height(&self) -> f32 {
        self.height
    }
}
