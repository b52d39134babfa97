//! Compartment arrangement and cutting
//!
//! Compartments subdivide the usable top face of a bin. The arrangement is
//! an integer grid: equal ids span a rectangle of slots that merge into one
//! compartment, zero leaves a slot solid. Every distinct id needs exactly
//! one entry in the compartment list, in row-major order of first
//! appearance.

use glam::{Vec2, Vec3};
use gridfinity_kernel::{Aabb, BooleanType, Modeler, Solid};
use serde::{Deserialize, Serialize};

use crate::constants::bin;
use crate::error::{BuildError, BuildResult};
use crate::features::{Feature, FeatureHost};
use crate::outline::rounded_rect;

/// One compartment of a bin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    features: Vec<Feature>,
    depth: Option<f32>,
}

impl Compartment {
    /// Create a plain compartment hollowed to the full bin depth
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compartment with features (label shelf, scoop ramp)
    pub fn with_features(features: Vec<Feature>) -> BuildResult<Self> {
        for feature in &features {
            if !feature.allowed_on(FeatureHost::Compartment) {
                return Err(BuildError::InvalidPlacement {
                    feature: feature.kind_name(),
                    host: FeatureHost::Compartment.name(),
                });
            }
        }
        Ok(Self {
            features,
            depth: None,
        })
    }

    /// Override the hollowed depth of this compartment
    pub fn with_depth(mut self, depth: f32) -> BuildResult<Self> {
        if depth <= 0.0 {
            return Err(BuildError::NonPositiveDimension {
                name: "compartment depth",
                value: depth,
            });
        }
        self.depth = Some(depth);
        Ok(self)
    }

    /// Build this compartment's cutter and subtract it from the bin
    fn cut(
        &self,
        modeler: &dyn Modeler,
        solid: Solid,
        region: &Region,
        face: &Aabb,
        default_depth: f32,
    ) -> BuildResult<Solid> {
        let depth = self.depth.unwrap_or(default_depth);
        let outline = rounded_rect(region.size.x, region.size.y, bin::INNER_RADIUS);
        let center = face.center() + Vec3::new(region.center.x, region.center.y, 0.0);

        let mut cutter = modeler.extrude(
            &outline,
            Vec3::new(center.x, center.y, face.max.z - depth),
            Vec3::Z,
            depth,
        )?;

        for feature in &self.features {
            cutter = feature.apply(modeler, &cutter, FeatureHost::Compartment)?;
        }

        Ok(modeler.boolean(&solid, &cutter, BooleanType::Subtract)?)
    }
}

/// A rectangle of the partitioned face, relative to the face center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Center offset from the face center
    pub center: Vec2,
    /// Plan size of the compartment
    pub size: Vec2,
}

/// Compartment arrangement over the usable top face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartments {
    grid: Vec<Vec<u16>>,
    compartments: Vec<Compartment>,
    inner_wall: f32,
    outer_wall: f32,
}

impl Compartments {
    /// Create an arrangement from an id grid and matching compartment list
    pub fn new(grid: Vec<Vec<u16>>, compartments: Vec<Compartment>) -> BuildResult<Self> {
        Self::with_walls(grid, compartments, bin::INNER_WALL, bin::OUTER_WALL)
    }

    /// Create an arrangement with explicit wall thicknesses
    pub fn with_walls(
        grid: Vec<Vec<u16>>,
        compartments: Vec<Compartment>,
        inner_wall: f32,
        outer_wall: f32,
    ) -> BuildResult<Self> {
        if grid.is_empty() || grid.iter().all(|row| row.is_empty()) {
            return Err(BuildError::EmptyGrid);
        }

        let mut ids: Vec<u16> = grid.iter().flatten().copied().filter(|&id| id != 0).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != compartments.len() {
            return Err(BuildError::CompartmentCountMismatch {
                expected: ids.len(),
                found: compartments.len(),
            });
        }

        // Every id must fill the bounding rectangle of its slots.
        for &id in &ids {
            let mut rows = (usize::MAX, 0usize);
            let mut cols = (usize::MAX, 0usize);
            for (r, row) in grid.iter().enumerate() {
                for (c, &cell) in row.iter().enumerate() {
                    if cell == id {
                        rows = (rows.0.min(r), rows.1.max(r));
                        cols = (cols.0.min(c), cols.1.max(c));
                    }
                }
            }
            for r in rows.0..=rows.1 {
                for c in cols.0..=cols.1 {
                    if grid.get(r).and_then(|row| row.get(c)).copied() != Some(id) {
                        return Err(BuildError::InvalidCompartmentSpan { id });
                    }
                }
            }
        }

        Ok(Self {
            grid,
            compartments,
            inner_wall,
            outer_wall,
        })
    }

    /// Equal subdivision into `div_x` by `div_y` compartments
    ///
    /// The compartment list length must match `div_x * div_y` exactly.
    pub fn equal(
        div_x: usize,
        div_y: usize,
        compartments: Vec<Compartment>,
    ) -> BuildResult<Self> {
        if div_x == 0 || div_y == 0 {
            return Err(BuildError::InvalidGridSize { x: div_x, y: div_y });
        }
        if compartments.len() != div_x * div_y {
            return Err(BuildError::CompartmentCountMismatch {
                expected: div_x * div_y,
                found: compartments.len(),
            });
        }

        let mut id = 0u16;
        let grid = (0..div_y)
            .map(|_| {
                (0..div_x)
                    .map(|_| {
                        id += 1;
                        id
                    })
                    .collect()
            })
            .collect();
        Self::new(grid, compartments)
    }

    /// Partition a face of the given size into compartment regions
    ///
    /// Regions are returned in row-major order of first appearance and
    /// never overlap; walls take up `inner_wall` between regions and
    /// `outer_wall` around them.
    pub fn regions(&self, face_size: Vec2) -> Vec<Region> {
        let cols = self.grid.iter().map(Vec::len).max().unwrap_or(0);
        let rows = self.grid.len();

        let area = Vec2::new(
            face_size.x - 2.0 * self.outer_wall + self.inner_wall,
            face_size.y - 2.0 * self.outer_wall + self.inner_wall,
        );
        let unit = Vec2::new(area.x / cols as f32, area.y / rows as f32);

        let mut seen: Vec<u16> = Vec::new();
        let mut regions = Vec::new();
        for (r, row) in self.grid.iter().enumerate() {
            for (c, &id) in row.iter().enumerate() {
                if id == 0 || seen.contains(&id) {
                    continue;
                }
                seen.push(id);

                let units_x = row[c..].iter().take_while(|&&v| v == id).count();
                let units_y = self.grid[r..]
                    .iter()
                    .take_while(|row| row.get(c).copied() == Some(id))
                    .count();

                let middle_x = c as f32 + units_x as f32 / 2.0;
                let middle_y = r as f32 + units_y as f32 / 2.0;

                regions.push(Region {
                    center: Vec2::new(
                        (middle_x / cols as f32 - 0.5) * area.x,
                        (0.5 - middle_y / rows as f32) * area.y,
                    ),
                    size: Vec2::new(
                        unit.x * units_x as f32 - self.inner_wall,
                        unit.y * units_y as f32 - self.inner_wall,
                    ),
                });
            }
        }
        regions
    }

    /// Hollow every compartment out of the bin's top volume
    ///
    /// `face` bounds the usable top face; `default_depth` is used for
    /// compartments without their own depth. Cutting follows list order.
    pub(crate) fn cut(
        &self,
        modeler: &dyn Modeler,
        mut solid: Solid,
        face: &Aabb,
        default_depth: f32,
    ) -> BuildResult<Solid> {
        let size = face.size();
        let regions = self.regions(Vec2::new(size.x, size.y));

        for (region, compartment) in regions.iter().zip(&self.compartments) {
            solid = compartment.cut(modeler, solid, region, face, default_depth)?;
        }

        tracing::debug!(count = regions.len(), "cut compartments");
        Ok(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equal_partition_counts_and_covers() {
        let comps = vec![Compartment::new(); 6];
        let arrangement = Compartments::equal(3, 2, comps).unwrap();
        let regions = arrangement.regions(Vec2::new(100.0, 80.0));
        assert_eq!(regions.len(), 6);

        // equal sizes
        for region in &regions {
            assert_relative_eq!(region.size.x, regions[0].size.x, epsilon = 1e-4);
            assert_relative_eq!(region.size.y, regions[0].size.y, epsilon = 1e-4);
        }

        // full coverage: region extents plus walls add up to the face
        let total_x = regions[0].size.x * 3.0 + 2.0 * bin::INNER_WALL + 2.0 * bin::OUTER_WALL;
        assert_relative_eq!(total_x, 100.0, epsilon = 1e-4);
    }

    #[test]
    fn regions_do_not_overlap() {
        let comps = vec![Compartment::new(); 4];
        let arrangement = Compartments::equal(2, 2, comps).unwrap();
        let regions = arrangement.regions(Vec2::new(80.0, 80.0));

        for (i, a) in regions.iter().enumerate() {
            for b in regions.iter().skip(i + 1) {
                let gap = (a.center - b.center).abs();
                let reach = (a.size + b.size) / 2.0;
                assert!(gap.x >= reach.x - 1e-4 || gap.y >= reach.y - 1e-4);
            }
        }
    }

    #[test]
    fn mismatched_compartment_count_is_rejected() {
        let comps = vec![Compartment::new(); 3];
        assert!(matches!(
            Compartments::equal(2, 2, comps),
            Err(BuildError::CompartmentCountMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn zero_divisions_are_rejected() {
        assert!(matches!(
            Compartments::equal(0, 1, vec![]),
            Err(BuildError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn spanning_ids_merge_slots() {
        let arrangement = Compartments::new(
            vec![vec![1, 1, 2], vec![1, 1, 3]],
            vec![Compartment::new(), Compartment::new(), Compartment::new()],
        )
        .unwrap();
        let regions = arrangement.regions(Vec2::new(90.0, 60.0));
        assert_eq!(regions.len(), 3);
        // the spanning compartment is roughly twice as wide and tall
        assert!(regions[0].size.x > regions[1].size.x * 1.5);
        assert!(regions[0].size.y > regions[1].size.y * 1.5);
    }

    #[test]
    fn non_rectangular_spans_are_rejected() {
        let result = Compartments::new(
            vec![vec![1, 1], vec![1, 2]],
            vec![Compartment::new(), Compartment::new()],
        );
        assert!(matches!(
            result,
            Err(BuildError::InvalidCompartmentSpan { id: 1 })
        ));
    }

    #[test]
    fn label_is_a_valid_compartment_feature() {
        assert!(Compartment::with_features(vec![Feature::label()]).is_ok());
        assert!(Compartment::with_features(vec![Feature::screw_hole(
            crate::locations::FeatureLocation::BottomMiddle
        )])
        .is_err());
    }

    #[test]
    fn negative_depth_is_rejected() {
        assert!(Compartment::new().with_depth(-1.0).is_err());
    }
}
