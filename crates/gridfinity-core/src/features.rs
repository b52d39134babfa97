//! Object features
//!
//! A feature is a local geometry modification attached to a host solid at a
//! [`FeatureLocation`]: holes and cutouts subtract, label shelves reshape a
//! compartment cutter. Features are plain values; they are consumed exactly
//! once when the containing block is built.
//!
//! Features apply in caller-supplied list order. Overlapping features are
//! not detected; later features simply operate on whatever the earlier ones
//! produced.

use glam::{Vec2, Vec3};
use gridfinity_kernel::{BooleanType, Modeler, ModelerError, Solid, Wire2D};
use serde::{Deserialize, Serialize};

use crate::constants::{label, magnet, screw, scoop, weighted};
use crate::error::{BuildError, BuildResult};
use crate::locations::{FeatureLocation, Placement};

/// The kind of object a feature is being applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureHost {
    /// A single base foot block
    BaseBlock,
    /// A single baseplate tile
    BasePlateBlock,
    /// A whole assembled baseplate
    BasePlate,
    /// A compartment cutter
    Compartment,
}

impl FeatureHost {
    /// Name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            FeatureHost::BaseBlock => "base block",
            FeatureHost::BasePlateBlock => "baseplate block",
            FeatureHost::BasePlate => "baseplate",
            FeatureHost::Compartment => "compartment",
        }
    }
}

/// A unit of local geometry modification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    /// Plain cylindrical hole
    Hole {
        radius: f32,
        depth: f32,
        location: FeatureLocation,
    },

    /// Screw hole at the published screw dimensions
    ScrewHole {
        radius: f32,
        depth: f32,
        location: FeatureLocation,
    },

    /// Magnet pocket at the published magnet dimensions
    MagnetHole {
        radius: f32,
        depth: f32,
        location: FeatureLocation,
    },

    /// Screw hole with a conical countersink at the surface
    ScrewHoleCountersink {
        radius: f32,
        sink_radius: f32,
        /// Included countersink angle, degrees
        sink_angle: f32,
        depth: f32,
        location: FeatureLocation,
    },

    /// Screw hole with a cylindrical counterbore at the surface
    ScrewHoleCounterbore {
        radius: f32,
        bore_radius: f32,
        bore_depth: f32,
        depth: f32,
        location: FeatureLocation,
    },

    /// Weight pocket with side reliefs, for baseplates
    Weighted { location: FeatureLocation },

    /// Label shelf along the rear top edge of a compartment
    Label {
        width: f32,
        /// Shelf angle from the top face, degrees
        angle: f32,
    },

    /// Scoop ramp along the front bottom edge of a compartment
    Scoop { radius: f32 },
}

impl Feature {
    /// Create a plain hole feature
    pub fn hole(location: FeatureLocation, radius: f32, depth: f32) -> BuildResult<Self> {
        check_positive("hole radius", radius)?;
        check_positive("hole depth", depth)?;
        Ok(Feature::Hole {
            radius,
            depth,
            location,
        })
    }

    /// Create a screw hole at the standard dimensions
    pub fn screw_hole(location: FeatureLocation) -> Self {
        Feature::ScrewHole {
            radius: screw::RADIUS,
            depth: screw::DEPTH,
            location,
        }
    }

    /// Create a magnet pocket at the standard dimensions
    pub fn magnet_hole(location: FeatureLocation) -> Self {
        Feature::MagnetHole {
            radius: magnet::RADIUS,
            depth: magnet::THICKNESS,
            location,
        }
    }

    /// Create a countersunk screw hole at the standard dimensions
    pub fn countersunk_screw_hole(location: FeatureLocation) -> Self {
        Feature::ScrewHoleCountersink {
            radius: 1.75,
            sink_radius: 4.25,
            sink_angle: 82.0,
            depth: screw::DEPTH,
            location,
        }
    }

    /// Create a counterbored screw hole at the standard dimensions
    pub fn counterbored_screw_hole(location: FeatureLocation) -> Self {
        Feature::ScrewHoleCounterbore {
            radius: screw::RADIUS,
            bore_radius: screw::RADIUS * 1.5,
            bore_depth: 2.0,
            depth: screw::DEPTH,
            location,
        }
    }

    /// Create a weight pocket
    pub fn weighted(location: FeatureLocation) -> Self {
        Feature::Weighted { location }
    }

    /// Create a label shelf at the standard width and angle
    pub fn label() -> Self {
        Feature::Label {
            width: label::WIDTH,
            angle: label::ANGLE,
        }
    }

    /// Create a label shelf with a custom angle
    pub fn label_with_angle(angle: f32) -> BuildResult<Self> {
        if !(0.0..=90.0).contains(&angle) {
            return Err(BuildError::InvalidLabelAngle(angle));
        }
        Ok(Feature::Label {
            width: label::WIDTH,
            angle: angle.max(1e-4),
        })
    }

    /// Create a scoop ramp at the standard radius
    pub fn scoop() -> Self {
        Feature::Scoop {
            radius: scoop::RADIUS,
        }
    }

    /// Name of the feature kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Feature::Hole { .. } => "Hole",
            Feature::ScrewHole { .. } => "ScrewHole",
            Feature::MagnetHole { .. } => "MagnetHole",
            Feature::ScrewHoleCountersink { .. } => "ScrewHoleCountersink",
            Feature::ScrewHoleCounterbore { .. } => "ScrewHoleCounterbore",
            Feature::Weighted { .. } => "Weighted",
            Feature::Label { .. } => "Label",
            Feature::Scoop { .. } => "Scoop",
        }
    }

    /// Whether the feature may attach to the given host kind
    pub fn allowed_on(&self, host: FeatureHost) -> bool {
        match self {
            Feature::Hole { .. }
            | Feature::ScrewHole { .. }
            | Feature::MagnetHole { .. }
            | Feature::ScrewHoleCountersink { .. }
            | Feature::ScrewHoleCounterbore { .. } => matches!(
                host,
                FeatureHost::BaseBlock | FeatureHost::BasePlateBlock | FeatureHost::BasePlate
            ),
            Feature::Weighted { .. } => {
                matches!(host, FeatureHost::BasePlateBlock | FeatureHost::BasePlate)
            }
            Feature::Label { .. } | Feature::Scoop { .. } => {
                matches!(host, FeatureHost::Compartment)
            }
        }
    }

    /// Apply the feature to a host solid, producing the modified solid
    pub fn apply(
        &self,
        modeler: &dyn Modeler,
        solid: &Solid,
        host: FeatureHost,
    ) -> BuildResult<Solid> {
        if !self.allowed_on(host) {
            return Err(BuildError::InvalidPlacement {
                feature: self.kind_name(),
                host: host.name(),
            });
        }

        let bounds = modeler.bounding_box(solid)?;

        match *self {
            Feature::Hole {
                radius,
                depth,
                location,
            }
            | Feature::ScrewHole {
                radius,
                depth,
                location,
            }
            | Feature::MagnetHole {
                radius,
                depth,
                location,
            } => drill(modeler, solid, &location.resolve(&bounds)?, |p| {
                let into = -p.outward;
                Ok(modeler.create_cylinder(p.point, radius, depth, into)?)
            }),

            Feature::ScrewHoleCountersink {
                radius,
                sink_radius,
                sink_angle,
                depth,
                location,
            } => {
                let sink_depth = (sink_radius - radius) / (sink_angle.to_radians() / 2.0).tan();
                drill(modeler, solid, &location.resolve(&bounds)?, |p| {
                    let into = -p.outward;
                    let hole = modeler.create_cylinder(p.point, radius, depth, into)?;
                    let sink =
                        modeler.create_cone(p.point, sink_radius, radius, sink_depth, into)?;
                    Ok(modeler.boolean(&hole, &sink, BooleanType::Union)?)
                })
            }

            Feature::ScrewHoleCounterbore {
                radius,
                bore_radius,
                bore_depth,
                depth,
                location,
            } => drill(modeler, solid, &location.resolve(&bounds)?, |p| {
                let into = -p.outward;
                let hole = modeler.create_cylinder(p.point, radius, depth, into)?;
                let bore = modeler.create_cylinder(p.point, bore_radius, bore_depth, into)?;
                Ok(modeler.boolean(&hole, &bore, BooleanType::Union)?)
            }),

            Feature::Weighted { location } => {
                drill(modeler, solid, &location.resolve(&bounds)?, |p| {
                    weighted_cutter(modeler, p)
                })
            }

            Feature::Label { width, angle } => {
                let size = bounds.size();
                if width >= size.y {
                    return Err(BuildError::PlacementOutOfBounds { location: "Label" });
                }
                let wedge = label_wedge(modeler, &bounds, width, angle)?;
                Ok(modeler.boolean(solid, &wedge, BooleanType::Subtract)?)
            }

            Feature::Scoop { radius } => {
                let edges = modeler.get_edges(solid)?;
                let eps = 1e-3;
                let front_bottom: Vec<_> = edges
                    .iter()
                    .filter(|e| {
                        (e.midpoint.z - bounds.min.z).abs() < eps
                            && (e.midpoint.y - bounds.min.y).abs() < eps
                    })
                    .map(|e| e.id)
                    .collect();
                if front_bottom.is_empty() {
                    return Err(BuildError::Modeler(ModelerError::OperationFailed(
                        "No front bottom edge to scoop".into(),
                    )));
                }
                Ok(modeler.fillet(solid, &front_bottom, radius)?)
            }
        }
    }
}

fn check_positive(name: &'static str, value: f32) -> BuildResult<()> {
    if value <= 0.0 {
        return Err(BuildError::NonPositiveDimension { name, value });
    }
    Ok(())
}

/// Subtract one cutter per placement, in placement order
fn drill<F>(
    modeler: &dyn Modeler,
    solid: &Solid,
    placements: &[Placement],
    build_cutter: F,
) -> BuildResult<Solid>
where
    F: Fn(&Placement) -> BuildResult<Solid>,
{
    let mut result = solid.clone();
    for placement in placements {
        let cutter = build_cutter(placement)?;
        result = modeler.boolean(&result, &cutter, BooleanType::Subtract)?;
    }
    Ok(result)
}

/// Weight pocket with four side reliefs
fn weighted_cutter(modeler: &dyn Modeler, placement: &Placement) -> BuildResult<Solid> {
    let into = -placement.outward;
    let p = placement.point;

    let pocket_center = p + into * (weighted::HEIGHT / 2.0);
    let mut cutter = modeler.create_box(
        pocket_center,
        Vec3::new(weighted::SIZE, weighted::SIZE, weighted::HEIGHT),
    )?;

    let arm_reach = weighted::SIZE / 2.0 + weighted::APPENDIX_LENGTH / 2.0;
    let arm_z = p.z + into.z * (weighted::APPENDIX_HEIGHT / 2.0);
    let arms = [
        (
            Vec3::new(p.x + arm_reach, p.y, arm_z),
            Vec3::new(
                weighted::APPENDIX_LENGTH,
                weighted::APPENDIX_WIDTH,
                weighted::APPENDIX_HEIGHT,
            ),
        ),
        (
            Vec3::new(p.x - arm_reach, p.y, arm_z),
            Vec3::new(
                weighted::APPENDIX_LENGTH,
                weighted::APPENDIX_WIDTH,
                weighted::APPENDIX_HEIGHT,
            ),
        ),
        (
            Vec3::new(p.x, p.y + arm_reach, arm_z),
            Vec3::new(
                weighted::APPENDIX_WIDTH,
                weighted::APPENDIX_LENGTH,
                weighted::APPENDIX_HEIGHT,
            ),
        ),
        (
            Vec3::new(p.x, p.y - arm_reach, arm_z),
            Vec3::new(
                weighted::APPENDIX_WIDTH,
                weighted::APPENDIX_LENGTH,
                weighted::APPENDIX_HEIGHT,
            ),
        ),
    ];
    for (center, size) in arms {
        let arm = modeler.create_box(center, size)?;
        cutter = modeler.boolean(&cutter, &arm, BooleanType::Union)?;
    }
    Ok(cutter)
}

/// The wedge removed from a compartment cutter to leave a label shelf
///
/// Lofted from a sliver at the rear edge up to the full shelf depth at the
/// top face, spanning the cutter's width.
fn label_wedge(
    modeler: &dyn Modeler,
    bounds: &gridfinity_kernel::Aabb,
    width: f32,
    angle: f32,
) -> BuildResult<Solid> {
    let drop = width * angle.to_radians().tan();
    let back = bounds.max.y;
    let (x0, x1) = (bounds.min.x, bounds.max.x);
    let sliver = 0.01;

    let section = |depth: f32| {
        Wire2D::new(
            vec![
                Vec2::new(x0, back - depth),
                Vec2::new(x1, back - depth),
                Vec2::new(x1, back),
                Vec2::new(x0, back),
            ],
            true,
        )
    };

    let lower = (section(sliver), Vec3::new(0.0, 0.0, bounds.max.z - drop));
    let upper = (section(width), Vec3::new(0.0, 0.0, bounds.max.z));
    Ok(modeler.loft(&[lower, upper])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MockModeler;

    fn block(modeler: &MockModeler) -> Solid {
        modeler
            .create_box(Vec3::new(0.0, 0.0, 3.5), Vec3::new(42.0, 42.0, 7.0))
            .unwrap()
    }

    #[test]
    fn screw_hole_drills_four_corners() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);
        let feature = Feature::screw_hole(FeatureLocation::bottom_corners());
        feature
            .apply(&modeler, &solid, FeatureHost::BaseBlock)
            .unwrap();
        assert_eq!(modeler.count_ops("subtract"), 4);
    }

    #[test]
    fn application_order_is_preserved() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);

        let first = Feature::magnet_hole(FeatureLocation::BottomMiddle);
        let second = Feature::screw_hole(FeatureLocation::BottomMiddle);

        let solid = first
            .apply(&modeler, &solid, FeatureHost::BaseBlock)
            .unwrap();
        second
            .apply(&modeler, &solid, FeatureHost::BaseBlock)
            .unwrap();

        let cylinders: Vec<String> = modeler
            .ops_with_prefix("cylinder")
            .into_iter()
            .collect();
        assert_eq!(cylinders.len(), 2);
        // magnet radius first, screw radius second
        assert!(cylinders[0].contains("r=3.25"));
        assert!(cylinders[1].contains("r=1.5"));
    }

    #[test]
    fn countersink_unions_a_cone() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);
        let feature = Feature::countersunk_screw_hole(FeatureLocation::BottomMiddle);
        feature
            .apply(&modeler, &solid, FeatureHost::BaseBlock)
            .unwrap();
        assert_eq!(modeler.count_ops("cone"), 1);
        assert_eq!(modeler.count_ops("subtract"), 1);
    }

    #[test]
    fn label_refuses_non_compartment_hosts() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);
        let result = Feature::label().apply(&modeler, &solid, FeatureHost::BaseBlock);
        assert!(matches!(
            result,
            Err(BuildError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn weighted_refuses_base_blocks() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);
        let result = Feature::weighted(FeatureLocation::BottomMiddle).apply(
            &modeler,
            &solid,
            FeatureHost::BaseBlock,
        );
        assert!(matches!(
            result,
            Err(BuildError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn weighted_cuts_pocket_and_reliefs() {
        let modeler = MockModeler::new();
        let solid = block(&modeler);
        Feature::weighted(FeatureLocation::BottomMiddle)
            .apply(&modeler, &solid, FeatureHost::BasePlate)
            .unwrap();
        // central pocket plus four reliefs
        assert_eq!(modeler.count_ops("box"), 1 + 5);
        assert_eq!(modeler.count_ops("subtract"), 1);
    }

    #[test]
    fn label_angle_is_validated() {
        assert!(Feature::label_with_angle(45.0).is_ok());
        assert!(matches!(
            Feature::label_with_angle(120.0),
            Err(BuildError::InvalidLabelAngle(_))
        ));
    }

    #[test]
    fn label_reshapes_a_compartment_cutter() {
        let modeler = MockModeler::new();
        let cutter = modeler
            .create_box(Vec3::new(0.0, 0.0, 10.0), Vec3::new(30.0, 30.0, 20.0))
            .unwrap();
        Feature::label()
            .apply(&modeler, &cutter, FeatureHost::Compartment)
            .unwrap();
        assert_eq!(modeler.count_ops("loft"), 1);
        assert_eq!(modeler.count_ops("subtract"), 1);
    }

    #[test]
    fn scoop_fillets_the_front_bottom_edge() {
        let modeler = MockModeler::new();
        let cutter = modeler
            .create_box(Vec3::new(0.0, 0.0, 10.0), Vec3::new(30.0, 30.0, 20.0))
            .unwrap();
        Feature::scoop()
            .apply(&modeler, &cutter, FeatureHost::Compartment)
            .unwrap();
        assert_eq!(modeler.count_ops("fillet"), 1);
    }

    #[test]
    fn invalid_hole_dimensions_are_rejected() {
        assert!(matches!(
            Feature::hole(FeatureLocation::BottomMiddle, -1.0, 6.0),
            Err(BuildError::NonPositiveDimension { .. })
        ));
        assert!(matches!(
            Feature::hole(FeatureLocation::BottomMiddle, 1.0, 0.0),
            Err(BuildError::NonPositiveDimension { .. })
        ));
    }
}
