//! Truck kernel backend
//!
//! Pure Rust B-Rep kernel using the Truck library.
//!
//! Booleans are provided by `truck-shapeops` and tessellation by
//! `truck-meshalgo`. Fillet, chamfer, edge/face enumeration and STEP
//! export are not available in this backend; operations that need them
//! report an error instead of approximating.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use glam::Vec3;
use uuid::Uuid;

use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};
use truck_modeling::{Point3, Rad, Shell, Solid as TruckSolid, Vector3, Vertex, Wire, builder};

use super::{
    Aabb, BooleanType, EdgeId, EdgeInfo, FaceId, FaceInfo, Modeler, ModelerError, ModelerResult,
    Solid, StepExportOptions, TessellatedMesh, Wire2D,
};

/// Tolerance handed to truck-shapeops boolean evaluation
const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Truck-based modeler backend
pub struct TruckModeler {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, TruckSolid>>,
}

impl TruckModeler {
    /// Create a new Truck modeler
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
        }
    }

    /// Store a solid and return a Solid reference
    fn store_solid(&self, solid: TruckSolid) -> Solid {
        let id = Uuid::new_v4();
        let mut solids = self.solids.lock().unwrap();
        solids.insert(id, solid);
        Solid::new(id).with_kernel_data()
    }

    /// Get a stored solid by ID
    fn get_solid(&self, id: Uuid) -> ModelerResult<TruckSolid> {
        let solids = self.solids.lock().unwrap();
        solids.get(&id).cloned().ok_or(ModelerError::SolidNotFound(id))
    }

    /// Create a wire from a planar profile anchored at `origin`
    fn create_wire(&self, profile: &Wire2D, origin: Vec3) -> ModelerResult<Wire> {
        if profile.points.len() < 3 {
            return Err(ModelerError::InvalidProfile(
                "Profile must have at least 3 points".into(),
            ));
        }

        let points: Vec<Point3> = profile
            .points
            .iter()
            .map(|p| {
                Point3::new(
                    (origin.x + p.x) as f64,
                    (origin.y + p.y) as f64,
                    origin.z as f64,
                )
            })
            .collect();

        Ok(wire_from_points(&points))
    }
}

/// Build a closed wire of line segments through the given points
fn wire_from_points(points: &[Point3]) -> Wire {
    let vertices: Vec<Vertex> = points.iter().map(|p| builder::vertex(*p)).collect();

    let n = vertices.len();
    let edges: Vec<_> = (0..n)
        .map(|i| {
            let v0 = &vertices[i];
            let v1 = &vertices[(i + 1) % n];
            builder::line(v0, v1)
        })
        .collect();

    edges.into()
}

/// Per-triangle normal with a fallback for degenerate triangles
fn triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let e1 = Vec3::from(v1) - Vec3::from(v0);
    let e2 = Vec3::from(v2) - Vec3::from(v0);
    let cross = e1.cross(e2);
    let len = cross.length();
    if len > 0.0 {
        (cross / len).into()
    } else {
        [0.0, 0.0, 1.0]
    }
}

impl Default for TruckModeler {
    fn default() -> Self {
        Self::new()
    }
}

impl Modeler for TruckModeler {
    fn name(&self) -> &str {
        "truck"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, center: Vec3, size: Vec3) -> ModelerResult<Solid> {
        let half = size * 0.5;
        let min = center - half;

        let vertex = builder::vertex(Point3::new(min.x as f64, min.y as f64, min.z as f64));
        let edge = builder::tsweep(&vertex, Vector3::new(size.x as f64, 0.0, 0.0));
        let face = builder::tsweep(&edge, Vector3::new(0.0, size.y as f64, 0.0));
        let solid = builder::tsweep(&face, Vector3::new(0.0, 0.0, size.z as f64));

        Ok(self.store_solid(solid))
    }

    fn create_cylinder(
        &self,
        base_center: Vec3,
        radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid> {
        self.create_cone(base_center, radius, radius, height, axis)
    }

    fn create_cone(
        &self,
        base_center: Vec3,
        bottom_radius: f32,
        top_radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid> {
        if height <= 0.0 || (bottom_radius <= 0.0 && top_radius <= 0.0) {
            return Err(ModelerError::InvalidProfile(
                "Cone needs a positive height and at least one positive radius".into(),
            ));
        }

        // Half profile in the XZ plane, revolved around +Z, then oriented
        // onto the requested axis.
        let mut profile = vec![Point3::new(0.0, 0.0, 0.0)];
        if bottom_radius > 0.0 {
            profile.push(Point3::new(bottom_radius as f64, 0.0, 0.0));
        }
        if top_radius > 0.0 {
            profile.push(Point3::new(top_radius as f64, 0.0, height as f64));
        }
        profile.push(Point3::new(0.0, 0.0, height as f64));

        let wire = wire_from_points(&profile);
        let face = builder::try_attach_plane(&[wire])
            .map_err(|e| ModelerError::OperationFailed(format!("Failed to create face: {:?}", e)))?;

        let solid = builder::rsweep(
            &face,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Rad(std::f64::consts::TAU),
        );

        let axis_n = axis.normalize();
        let solid = if axis_n.distance(Vec3::Z) < 1e-6 {
            solid
        } else {
            // Rotation taking +Z onto the axis; antiparallel flips about X.
            let (rot_axis, angle) = if axis_n.distance(-Vec3::Z) < 1e-6 {
                (Vec3::X, std::f32::consts::PI)
            } else {
                let cross = Vec3::Z.cross(axis_n);
                (cross.normalize(), Vec3::Z.dot(axis_n).clamp(-1.0, 1.0).acos())
            };
            builder::rotated(
                &solid,
                Point3::new(0.0, 0.0, 0.0),
                Vector3::new(rot_axis.x as f64, rot_axis.y as f64, rot_axis.z as f64),
                Rad(angle as f64),
            )
        };

        let solid = builder::translated(
            &solid,
            Vector3::new(
                base_center.x as f64,
                base_center.y as f64,
                base_center.z as f64,
            ),
        );

        Ok(self.store_solid(solid))
    }

    fn extrude(
        &self,
        profile: &Wire2D,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
    ) -> ModelerResult<Solid> {
        let wire = self.create_wire(profile, origin)?;

        let dir = Vector3::new(
            (direction.x * distance) as f64,
            (direction.y * distance) as f64,
            (direction.z * distance) as f64,
        );

        let face = builder::try_attach_plane(&[wire])
            .map_err(|e| ModelerError::OperationFailed(format!("Failed to create face: {:?}", e)))?;

        let solid = builder::tsweep(&face, dir);

        Ok(self.store_solid(solid))
    }

    fn loft(&self, sections: &[(Wire2D, Vec3)]) -> ModelerResult<Solid> {
        if sections.len() < 2 {
            return Err(ModelerError::InvalidProfile(
                "Loft needs at least two sections".into(),
            ));
        }

        let point_count = sections[0].0.points.len();
        if sections.iter().any(|(p, _)| p.points.len() != point_count) {
            return Err(ModelerError::InvalidProfile(
                "Loft sections must have matching point counts".into(),
            ));
        }

        let wires = sections
            .iter()
            .map(|(profile, origin)| self.create_wire(profile, *origin))
            .collect::<ModelerResult<Vec<Wire>>>()?;

        let mut faces = Vec::new();
        for pair in wires.windows(2) {
            let band = builder::try_wire_homotopy(&pair[0], &pair[1]).map_err(|e| {
                ModelerError::OperationFailed(format!("Failed to create loft walls: {:?}", e))
            })?;
            faces.extend(band);
        }

        let bottom = builder::try_attach_plane(&[wires[0].clone()])
            .map_err(|e| ModelerError::OperationFailed(format!("Failed to create face: {:?}", e)))?
            .inverse();
        let top = builder::try_attach_plane(&[wires[wires.len() - 1].clone()])
            .map_err(|e| ModelerError::OperationFailed(format!("Failed to create face: {:?}", e)))?;
        faces.push(bottom);
        faces.push(top);

        let shell: Shell = faces.into();
        let solid = TruckSolid::try_new(vec![shell]).map_err(|e| {
            ModelerError::OperationFailed(format!("Loft shell is not closed: {:?}", e))
        })?;

        Ok(self.store_solid(solid))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> ModelerResult<Solid> {
        let solid_a = self.get_solid(a.id)?;
        let mut solid_b = self.get_solid(b.id)?;

        let result = match op {
            BooleanType::Union => truck_shapeops::or(&solid_a, &solid_b, BOOLEAN_TOLERANCE),
            BooleanType::Intersect => truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE),
            BooleanType::Subtract => {
                solid_b.not();
                truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE)
            }
        };

        let solid = result.ok_or_else(|| {
            ModelerError::BooleanFailed(format!("{:?} produced no solid", op))
        })?;

        Ok(self.store_solid(solid))
    }

    fn translate(&self, solid: &Solid, offset: Vec3) -> ModelerResult<Solid> {
        let ts = self.get_solid(solid.id)?;
        let moved = builder::translated(
            &ts,
            Vector3::new(offset.x as f64, offset.y as f64, offset.z as f64),
        );
        Ok(self.store_solid(moved))
    }

    fn bounding_box(&self, solid: &Solid) -> ModelerResult<Aabb> {
        let ts = self.get_solid(solid.id)?;

        // Vertex hull is exact for the planar-faceted solids this backend
        // produces (curves are segment-approximated before they get here).
        let mut points = Vec::new();
        for shell in ts.boundaries() {
            for face in shell.face_iter() {
                for wire in face.absolute_boundaries() {
                    for vertex in wire.vertex_iter() {
                        let p = vertex.point();
                        points.push(Vec3::new(p.x as f32, p.y as f32, p.z as f32));
                    }
                }
            }
        }

        Aabb::from_points(points)
            .ok_or_else(|| ModelerError::OperationFailed("Solid has no vertices".into()))
    }

    fn get_edges(&self, _solid: &Solid) -> ModelerResult<Vec<EdgeInfo>> {
        Err(ModelerError::OperationFailed(
            "Edge enumeration is not supported in the truck backend".into(),
        ))
    }

    fn get_faces(&self, _solid: &Solid) -> ModelerResult<Vec<FaceInfo>> {
        Err(ModelerError::OperationFailed(
            "Face enumeration is not supported in the truck backend".into(),
        ))
    }

    fn fillet(&self, _solid: &Solid, _edges: &[EdgeId], _radius: f32) -> ModelerResult<Solid> {
        Err(ModelerError::OperationFailed(
            "Fillet is not supported in the truck backend".into(),
        ))
    }

    fn chamfer(&self, _solid: &Solid, _edges: &[EdgeId], _distance: f32) -> ModelerResult<Solid> {
        Err(ModelerError::OperationFailed(
            "Chamfer is not supported in the truck backend".into(),
        ))
    }

    fn tessellate(&self, solid: &Solid, tolerance: f32) -> ModelerResult<TessellatedMesh> {
        let ts = self.get_solid(solid.id)?;

        let polygon = ts.triangulation(tolerance as f64).to_polygon();
        let positions = polygon.positions();

        let mut mesh = TessellatedMesh::new();
        mesh.vertices = positions
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect();

        for tri in polygon.faces().triangle_iter() {
            let idx = [tri[0].pos as u32, tri[1].pos as u32, tri[2].pos as u32];
            let v0 = mesh.vertices[idx[0] as usize];
            let v1 = mesh.vertices[idx[1] as usize];
            let v2 = mesh.vertices[idx[2] as usize];
            mesh.normals.push(triangle_normal(v0, v1, v2));
            mesh.indices.extend_from_slice(&idx);
        }

        if mesh.is_empty() {
            return Err(ModelerError::TessellationFailed(
                "Triangulation produced an empty mesh".into(),
            ));
        }

        Ok(mesh)
    }

    fn export_step(
        &self,
        _solid: &Solid,
        _path: &Path,
        _options: &StepExportOptions,
    ) -> ModelerResult<()> {
        Err(ModelerError::OperationFailed(
            "STEP export is not supported in the truck backend".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stores_and_finds_solids() {
        let modeler = TruckModeler::new();
        let solid = modeler.create_box(Vec3::ZERO, Vec3::ONE).unwrap();
        assert!(solid.has_kernel_data());
        assert!(modeler.get_solid(solid.id).is_ok());
        assert!(modeler.get_solid(Uuid::new_v4()).is_err());
    }

    #[test]
    fn box_bounding_box_matches_size() {
        let modeler = TruckModeler::new();
        let solid = modeler
            .create_box(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0))
            .unwrap();
        let bounds = modeler.bounding_box(&solid).unwrap();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.x, 2.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.y, 4.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.z, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn translate_shifts_bounds() {
        let modeler = TruckModeler::new();
        let solid = modeler.create_box(Vec3::ZERO, Vec3::ONE).unwrap();
        let moved = modeler.translate(&solid, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        let center = modeler.bounding_box(&moved).unwrap().center();
        assert_relative_eq!(center.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(center.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn fillet_reports_unsupported() {
        let modeler = TruckModeler::new();
        let solid = modeler.create_box(Vec3::ZERO, Vec3::ONE).unwrap();
        assert!(modeler.fillet(&solid, &[], 1.0).is_err());
    }
}
