//! Gridfinity bases
//!
//! A base is the part that drops into a baseplate: one profiled foot per
//! occupied grid cell, joined by a platform slab on top. Bins are built by
//! extruding a body on top of a base.

use gridfinity_kernel::{BooleanType, Modeler, Solid};

use crate::constants::{bottom, grid as grid_constants, stacking_lip};
use crate::error::{BuildError, BuildResult};
use crate::features::{Feature, FeatureHost};
use crate::grid::GridDefinition;
use crate::outline::{CornerFlags, PlanOutline, grid_outline, rounded_cell};
use crate::profile::{ProfileKind, StackProfile};

/// A single profiled foot block
///
/// The foot follows the bin stacking profile, shrunk by the fit tolerance
/// and the stacking clearance so it drops into a plate cavity. Features
/// are applied to the block before it is replicated over the grid.
#[derive(Debug, Clone, Default)]
pub struct BaseBlock {
    features: Vec<Feature>,
}

impl BaseBlock {
    /// Create a foot block with the given features
    pub fn new(features: Vec<Feature>) -> BuildResult<Self> {
        for feature in &features {
            if !feature.allowed_on(FeatureHost::BaseBlock) {
                return Err(BuildError::InvalidPlacement {
                    feature: feature.kind_name(),
                    host: FeatureHost::BaseBlock.name(),
                });
            }
        }
        Ok(Self { features })
    }

    /// Build the block centered on the origin, bottom at z = 0
    pub fn build(&self, modeler: &dyn Modeler) -> BuildResult<Solid> {
        let profile = StackProfile::new(ProfileKind::Bin);
        let size = grid_constants::SIZE - grid_constants::TOLERANCE;
        let radius = grid_constants::RADIUS - grid_constants::TOLERANCE * 0.5;
        let clearance = stacking_lip::OFFSET;

        let mut solid = profile.solid(modeler, 0.0, |inset| {
            let total = clearance + inset;
            rounded_cell(size - 2.0 * total, radius - total, CornerFlags::ALL)
        })?;

        for feature in &self.features {
            solid = feature.apply(modeler, &solid, FeatureHost::BaseBlock)?;
        }
        Ok(solid)
    }

    /// Height of a foot block
    pub fn height() -> f32 {
        StackProfile::new(ProfileKind::Bin).height()
    }
}

/// A built base: feet per occupied cell under a joining platform
#[derive(Debug)]
pub struct Base {
    solid: Solid,
    grid: GridDefinition,
    height: f32,
}

impl Base {
    /// Build a base over a grid definition
    ///
    /// The feature list is applied to the foot block, so every occupied
    /// cell carries the same features.
    pub fn new(
        modeler: &dyn Modeler,
        grid: GridDefinition,
        features: Vec<Feature>,
    ) -> BuildResult<Self> {
        let block = BaseBlock::new(features)?;
        let block_solid = block.build(modeler)?;
        let foot_height = BaseBlock::height();

        let mut feet: Option<Solid> = None;
        for (col, row) in grid.cells() {
            let center = grid.cell_center(col, row, grid_constants::SIZE);
            let placed = modeler.translate(&block_solid, center.extend(0.0))?;
            feet = Some(match feet {
                Some(joined) => modeler.boolean(&joined, &placed, BooleanType::Union)?,
                None => placed,
            });
        }
        let feet = feet.ok_or(BuildError::EmptyGrid)?;

        // Platform joining the feet, shrunk by the stacking clearance.
        let platform_outline = Self::platform_outline(&grid);
        let platform =
            platform_outline.extrude(modeler, foot_height, bottom::PLATFORM_HEIGHT)?;
        let solid = modeler.boolean(&feet, &platform, BooleanType::Union)?;

        let height = foot_height + bottom::PLATFORM_HEIGHT;
        tracing::debug!(cells = grid.cell_count(), height, "built base");

        Ok(Self {
            solid,
            grid,
            height,
        })
    }

    /// Build a fully occupied rectangular base
    pub fn equal(
        modeler: &dyn Modeler,
        grid_x: usize,
        grid_y: usize,
        features: Vec<Feature>,
    ) -> BuildResult<Self> {
        Self::new(modeler, GridDefinition::equal(grid_x, grid_y)?, features)
    }

    /// The merged plan outline at the platform/wall inset
    pub(crate) fn platform_outline(grid: &GridDefinition) -> PlanOutline {
        grid_outline(
            grid,
            grid_constants::SIZE,
            stacking_lip::OFFSET,
            grid_constants::RADIUS - stacking_lip::OFFSET,
        )
    }

    /// The built solid
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// The grid this base was built over
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Total height of the base
    pub fn height(&self) -> f32 {
        self.height
    }
}
