//! Feature locations
//!
//! A feature location is a placement policy over a face of the host solid.
//! It resolves against the host's bounding box at build time into concrete
//! anchor points; resolved points must land inside the face bounds.

use glam::{Vec2, Vec3};
use gridfinity_kernel::Aabb;
use serde::{Deserialize, Serialize};

use crate::constants::bottom;
use crate::error::{BuildError, BuildResult};

/// A resolved feature placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Anchor point on the host face
    pub point: Vec3,
    /// Outward normal of the face the feature enters through
    pub outward: Vec3,
}

/// Placement policy for a feature over a host face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureLocation {
    /// Center of the top face
    TopMiddle,
    /// Center of the bottom face
    BottomMiddle,
    /// Four corners of the top face, inset by `offset`
    TopCorners { offset: f32 },
    /// Four corners of the bottom face, inset by `offset`
    BottomCorners { offset: f32 },
    /// Points spread along the edges of the bottom face, `per_x` on each
    /// X-parallel edge and `per_y` on each Y-parallel edge, inset by
    /// `offset`
    BottomSides { per_x: u32, per_y: u32, offset: f32 },
}

impl FeatureLocation {
    /// Bottom corners at the standard hole inset
    pub fn bottom_corners() -> Self {
        FeatureLocation::BottomCorners {
            offset: bottom::HOLE_FROM_SIDE,
        }
    }

    /// Top corners at the standard hole inset
    pub fn top_corners() -> Self {
        FeatureLocation::TopCorners {
            offset: bottom::HOLE_FROM_SIDE,
        }
    }

    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FeatureLocation::TopMiddle => "TopMiddle",
            FeatureLocation::BottomMiddle => "BottomMiddle",
            FeatureLocation::TopCorners { .. } => "TopCorners",
            FeatureLocation::BottomCorners { .. } => "BottomCorners",
            FeatureLocation::BottomSides { .. } => "BottomSides",
        }
    }

    /// Resolve the policy against a host bounding box
    pub fn resolve(&self, bounds: &Aabb) -> BuildResult<Vec<Placement>> {
        let center = bounds.center();
        let size = bounds.size();

        let placements = match *self {
            FeatureLocation::TopMiddle => vec![Placement {
                point: Vec3::new(center.x, center.y, bounds.max.z),
                outward: Vec3::Z,
            }],
            FeatureLocation::BottomMiddle => vec![Placement {
                point: Vec3::new(center.x, center.y, bounds.min.z),
                outward: -Vec3::Z,
            }],
            FeatureLocation::TopCorners { offset } => {
                self.check_inset(offset, size)?;
                corner_points(center, size, offset, bounds.max.z, Vec3::Z)
            }
            FeatureLocation::BottomCorners { offset } => {
                self.check_inset(offset, size)?;
                corner_points(center, size, offset, bounds.min.z, -Vec3::Z)
            }
            FeatureLocation::BottomSides {
                per_x,
                per_y,
                offset,
            } => {
                self.check_inset(offset, size)?;
                side_points(bounds, per_x, per_y, offset)
            }
        };

        for placement in &placements {
            if !bounds.contains_xy(Vec2::new(placement.point.x, placement.point.y), 1e-4) {
                return Err(BuildError::PlacementOutOfBounds {
                    location: self.name(),
                });
            }
        }
        Ok(placements)
    }

    /// An inset must leave its placements between the face center and the
    /// face rim
    fn check_inset(&self, offset: f32, size: Vec3) -> BuildResult<()> {
        if offset < 0.0 || offset * 2.0 >= size.x || offset * 2.0 >= size.y {
            return Err(BuildError::PlacementOutOfBounds {
                location: self.name(),
            });
        }
        Ok(())
    }
}

/// Four corner placements, row-major from the front-left
fn corner_points(center: Vec3, size: Vec3, offset: f32, z: f32, outward: Vec3) -> Vec<Placement> {
    let dx = size.x / 2.0 - offset;
    let dy = size.y / 2.0 - offset;
    [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
        .iter()
        .map(|&(sx, sy)| Placement {
            point: Vec3::new(center.x + sx * dx, center.y + sy * dy, z),
            outward,
        })
        .collect()
}

/// Placements spread along the bottom face edges
fn side_points(bounds: &Aabb, per_x: u32, per_y: u32, offset: f32) -> Vec<Placement> {
    let size = bounds.size();
    let z = bounds.min.z;
    let mut points = Vec::new();

    for i in 0..per_x {
        let x = bounds.min.x + size.x * ((2 * i + 1) as f32) / ((2 * per_x) as f32);
        for y in [bounds.min.y + offset, bounds.max.y - offset] {
            points.push(Placement {
                point: Vec3::new(x, y, z),
                outward: -Vec3::Z,
            });
        }
    }
    for i in 0..per_y {
        let y = bounds.min.y + size.y * ((2 * i + 1) as f32) / ((2 * per_y) as f32);
        for x in [bounds.min.x + offset, bounds.max.x - offset] {
            points.push(Placement {
                point: Vec3::new(x, y, z),
                outward: -Vec3::Z,
            });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn block_bounds() -> Aabb {
        Aabb::new(Vec3::new(-21.0, -21.0, 0.0), Vec3::new(21.0, 21.0, 7.0))
    }

    #[test]
    fn bottom_middle_resolves_to_face_center() {
        let placements = FeatureLocation::BottomMiddle
            .resolve(&block_bounds())
            .unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].point, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(placements[0].outward, -Vec3::Z);
    }

    #[test]
    fn bottom_corners_use_the_standard_inset() {
        let placements = FeatureLocation::bottom_corners()
            .resolve(&block_bounds())
            .unwrap();
        assert_eq!(placements.len(), 4);
        for p in &placements {
            assert_relative_eq!(p.point.x.abs(), 13.0, epsilon = 1e-5);
            assert_relative_eq!(p.point.y.abs(), 13.0, epsilon = 1e-5);
            assert_relative_eq!(p.point.z, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn top_corners_sit_on_the_top_face() {
        let placements = FeatureLocation::top_corners()
            .resolve(&block_bounds())
            .unwrap();
        for p in &placements {
            assert_relative_eq!(p.point.z, 7.0, epsilon = 1e-5);
            assert_eq!(p.outward, Vec3::Z);
        }
    }

    #[test]
    fn oversized_offset_is_out_of_bounds() {
        let result =
            FeatureLocation::BottomCorners { offset: 30.0 }.resolve(&block_bounds());
        assert!(matches!(
            result,
            Err(BuildError::PlacementOutOfBounds { .. })
        ));
    }

    #[test]
    fn bottom_sides_counts_points() {
        let placements = FeatureLocation::BottomSides {
            per_x: 2,
            per_y: 1,
            offset: 4.0,
        }
        .resolve(&block_bounds())
        .unwrap();
        // two per X-parallel edge pair plus one per Y-parallel edge pair
        assert_eq!(placements.len(), 2 * 2 + 1 * 2);
    }
}
