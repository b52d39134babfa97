//! Gridfinity baseplates
//!
//! A baseplate is the counterpart of a base: one tile per occupied grid
//! cell, each carrying the plate-profile cavity a bin foot drops into.
//! Tiles are square; only corners facing away from every neighbour are
//! rounded, so adjacent tiles merge seamlessly.

use glam::Vec2;
use gridfinity_kernel::{BooleanType, Modeler, Solid};
use serde::{Deserialize, Serialize};

use crate::constants::{baseplate, grid as grid_constants};
use crate::error::{BuildError, BuildResult};
use crate::features::{Feature, FeatureHost};
use crate::grid::GridDefinition;
use crate::outline::{CornerFlags, cell_corner_flags, round_loop, rounded_cell};
use crate::profile::{ProfileKind, StackProfile};

/// Tile variant used to assemble a baseplate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BasePlateBlock {
    /// Bare cavity walls, nothing below
    Frame { features: Vec<Feature> },
    /// Cavity walls on a solid bottom
    Full {
        bottom_height: f32,
        features: Vec<Feature>,
    },
    /// Full tile with a weight-saving relief pocket underneath
    Skeleton {
        bottom_height: f32,
        features: Vec<Feature>,
    },
}

impl BasePlateBlock {
    /// Bare frame tile
    pub fn frame() -> Self {
        BasePlateBlock::Frame { features: vec![] }
    }

    /// Frame tile with features
    pub fn frame_with(features: Vec<Feature>) -> BuildResult<Self> {
        Self::check_features(&features)?;
        Ok(BasePlateBlock::Frame { features })
    }

    /// Full-bottom tile at the standard bottom height
    pub fn full() -> Self {
        BasePlateBlock::Full {
            bottom_height: baseplate::BOTTOM_HEIGHT,
            features: vec![],
        }
    }

    /// Full-bottom tile with explicit height and features
    pub fn full_with(bottom_height: f32, features: Vec<Feature>) -> BuildResult<Self> {
        if bottom_height <= 0.0 {
            return Err(BuildError::NonPositiveDimension {
                name: "bottom height",
                value: bottom_height,
            });
        }
        Self::check_features(&features)?;
        Ok(BasePlateBlock::Full {
            bottom_height,
            features,
        })
    }

    /// Skeletonized tile at the standard bottom height
    pub fn skeleton() -> Self {
        BasePlateBlock::Skeleton {
            bottom_height: baseplate::BOTTOM_HEIGHT,
            features: vec![],
        }
    }

    fn check_features(features: &[Feature]) -> BuildResult<()> {
        for feature in features {
            if !feature.allowed_on(FeatureHost::BasePlateBlock) {
                return Err(BuildError::InvalidPlacement {
                    feature: feature.kind_name(),
                    host: FeatureHost::BasePlateBlock.name(),
                });
            }
        }
        Ok(())
    }

    fn features(&self) -> &[Feature] {
        match self {
            BasePlateBlock::Frame { features }
            | BasePlateBlock::Full { features, .. }
            | BasePlateBlock::Skeleton { features, .. } => features,
        }
    }

    /// Extent below and above z = 0 (the cavity floor)
    pub fn heights(&self) -> (f32, f32) {
        let above = StackProfile::new(ProfileKind::Plate).height();
        let below = match self {
            BasePlateBlock::Frame { .. } => 0.0,
            BasePlateBlock::Full { bottom_height, .. }
            | BasePlateBlock::Skeleton { bottom_height, .. } => *bottom_height,
        };
        (below, above)
    }

    /// Build one tile centered on the origin
    ///
    /// `corners` selects which tile corners get the outward rounding,
    /// derived from the neighbouring cells.
    fn build(&self, modeler: &dyn Modeler, corners: CornerFlags) -> BuildResult<Solid> {
        let profile = StackProfile::new(ProfileKind::Plate);
        let size = grid_constants::SIZE;
        let radius = grid_constants::RADIUS;

        let walls = modeler.extrude(
            &rounded_cell(size, radius, corners),
            glam::Vec3::ZERO,
            glam::Vec3::Z,
            profile.height(),
        )?;

        // The recess a bin foot drops into.
        let cavity = profile.solid(modeler, 0.0, |inset| {
            rounded_cell(size - 2.0 * inset, radius - inset, CornerFlags::ALL)
        })?;
        let mut solid = modeler.boolean(&walls, &cavity, BooleanType::Subtract)?;

        let (below, _) = self.heights();
        if below > 0.0 {
            let bottom = modeler.extrude(
                &rounded_cell(size, radius, corners),
                glam::Vec3::new(0.0, 0.0, -below),
                glam::Vec3::Z,
                below,
            )?;
            solid = modeler.boolean(&solid, &bottom, BooleanType::Union)?;
        }

        if matches!(self, BasePlateBlock::Skeleton { .. }) {
            let pocket = modeler.extrude(
                &skeleton_outline(),
                glam::Vec3::new(0.0, 0.0, -below),
                glam::Vec3::Z,
                below,
            )?;
            solid = modeler.boolean(&solid, &pocket, BooleanType::Subtract)?;
        }

        for feature in self.features() {
            solid = feature.apply(modeler, &solid, FeatureHost::BasePlateBlock)?;
        }
        Ok(solid)
    }
}

impl Default for BasePlateBlock {
    fn default() -> Self {
        Self::frame()
    }
}

/// The notched-square relief cut into a skeleton tile
fn skeleton_outline() -> gridfinity_kernel::Wire2D {
    let l = baseplate::SKELETON_SIZE / 2.0;
    let s = l - baseplate::SKELETON_NOTCH;
    let points = [
        Vec2::new(l, s),
        Vec2::new(s, s),
        Vec2::new(s, l),
        Vec2::new(-s, l),
        Vec2::new(-s, s),
        Vec2::new(-l, s),
        Vec2::new(-l, -s),
        Vec2::new(-s, -s),
        Vec2::new(-s, -l),
        Vec2::new(s, -l),
        Vec2::new(s, -s),
        Vec2::new(l, -s),
    ];
    let mut radii = [0.0f32; 12];
    for i in [1, 4, 7, 10] {
        radii[i] = baseplate::SKELETON_RADIUS;
    }
    gridfinity_kernel::Wire2D::new(
        round_loop(&points, &radii, crate::constants::CORNER_ARC_SEGMENTS),
        true,
    )
}

/// A built baseplate
#[derive(Debug)]
pub struct BasePlate {
    solid: Solid,
    grid: GridDefinition,
    height: f32,
}

impl BasePlate {
    /// Build a baseplate over a grid definition
    ///
    /// Block features are applied to every tile; `features` applies to the
    /// assembled plate as a whole.
    pub fn new(
        modeler: &dyn Modeler,
        grid: GridDefinition,
        block: BasePlateBlock,
        features: Vec<Feature>,
    ) -> BuildResult<Self> {
        let mut plate: Option<Solid> = None;
        for (col, row) in grid.cells() {
            let tile = block.build(modeler, cell_corner_flags(&grid, col, row))?;
            let center = grid.cell_center(col, row, grid_constants::SIZE);
            let placed = modeler.translate(&tile, center.extend(0.0))?;
            plate = Some(match plate {
                Some(joined) => modeler.boolean(&joined, &placed, BooleanType::Union)?,
                None => placed,
            });
        }
        let mut solid = plate.ok_or(BuildError::EmptyGrid)?;

        for feature in &features {
            solid = feature.apply(modeler, &solid, FeatureHost::BasePlate)?;
        }

        let (below, above) = block.heights();
        tracing::debug!(cells = grid.cell_count(), "built baseplate");

        Ok(Self {
            solid,
            grid,
            height: below + above,
        })
    }

    /// Build a fully occupied rectangular baseplate
    pub fn equal(
        modeler: &dyn Modeler,
        grid_x: usize,
        grid_y: usize,
        block: BasePlateBlock,
        features: Vec<Feature>,
    ) -> BuildResult<Self> {
        Self::new(
            modeler,
            GridDefinition::equal(grid_x, grid_y)?,
            block,
            features,
        )
    }

    /// The built solid
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// The grid this plate was built over
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Total height of the plate
    pub fn height(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::FeatureLocation;
    use crate::testkit::MockModeler;
    use approx::assert_relative_eq;

    #[test]
    fn one_tile_per_occupied_cell() {
        let modeler = MockModeler::new();
        let grid = GridDefinition::new(vec![vec![true, true], vec![true, false]]).unwrap();
        let cells = grid.cell_count();
        BasePlate::new(&modeler, grid, BasePlateBlock::frame(), vec![]).unwrap();
        assert_eq!(modeler.count_ops("translate"), cells);
        // each tile lofts one cavity
        assert_eq!(modeler.count_ops("loft"), cells);
    }

    #[test]
    fn frame_plate_height_is_the_cavity_height() {
        let modeler = MockModeler::new();
        let plate = BasePlate::equal(
            &modeler,
            1,
            1,
            BasePlateBlock::frame(),
            vec![],
        )
        .unwrap();
        assert_relative_eq!(plate.height(), 4.65, epsilon = 1e-5);

        let bounds = modeler.bounding_box(plate.solid()).unwrap();
        assert_relative_eq!(bounds.size().z, 4.65, epsilon = 1e-4);
        assert_relative_eq!(bounds.size().x, 42.0, epsilon = 1e-4);
    }

    #[test]
    fn full_plate_extends_below() {
        let modeler = MockModeler::new();
        let plate = BasePlate::equal(
            &modeler,
            2,
            1,
            BasePlateBlock::full(),
            vec![],
        )
        .unwrap();
        assert_relative_eq!(plate.height(), 6.4 + 4.65, epsilon = 1e-5);

        let bounds = modeler.bounding_box(plate.solid()).unwrap();
        assert_relative_eq!(bounds.min.z, -6.4, epsilon = 1e-4);
        assert_relative_eq!(bounds.size().x, 84.0, epsilon = 1e-4);
    }

    #[test]
    fn skeleton_cuts_a_relief_pocket() {
        let modeler = MockModeler::new();
        BasePlate::equal(&modeler, 1, 1, BasePlateBlock::skeleton(), vec![]).unwrap();
        // cavity subtract plus relief subtract
        assert_eq!(modeler.count_ops("subtract"), 2);
    }

    #[test]
    fn plate_level_weighted_cutout() {
        let modeler = MockModeler::new();
        let features = vec![Feature::weighted(FeatureLocation::BottomMiddle)];
        BasePlate::equal(&modeler, 1, 1, BasePlateBlock::full(), features).unwrap();
        // one cavity subtract, one weighted subtract
        assert_eq!(modeler.count_ops("subtract"), 2);
    }

    #[test]
    fn block_features_repeat_per_tile() {
        let modeler = MockModeler::new();
        let block = BasePlateBlock::full_with(
            6.4,
            vec![Feature::magnet_hole(FeatureLocation::bottom_corners())],
        )
        .unwrap();
        BasePlate::equal(&modeler, 2, 1, block, vec![]).unwrap();
        // per tile: one cavity subtract and four magnet subtracts
        assert_eq!(modeler.count_ops("subtract"), 2 * (1 + 4));
    }

    #[test]
    fn compartment_features_are_rejected() {
        assert!(matches!(
            BasePlateBlock::frame_with(vec![Feature::scoop()]),
            Err(BuildError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn skeleton_outline_is_notched() {
        let outline = skeleton_outline();
        let (min, max) = outline.bounds();
        assert_relative_eq!(max.x - min.x, baseplate::SKELETON_SIZE, epsilon = 1e-4);
        assert_relative_eq!(max.y - min.y, baseplate::SKELETON_SIZE, epsilon = 1e-4);
    }
}
