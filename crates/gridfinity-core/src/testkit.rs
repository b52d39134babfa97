//! Test-only mock modeler
//!
//! Models every solid as its axis-aligned bounding box and records the
//! operation sequence. That is enough to assert what a build constructs
//! and in which order without running a geometric kernel.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use glam::Vec3;
use gridfinity_kernel::{
    Aabb, BooleanType, EdgeId, EdgeInfo, FaceId, FaceInfo, Modeler, ModelerError, ModelerResult,
    Solid, StepExportOptions, TessellatedMesh, Wire2D,
};
use uuid::Uuid;

/// Mock modeler backend for domain tests
pub struct MockModeler {
    solids: Mutex<HashMap<Uuid, Aabb>>,
    ops: Mutex<Vec<String>>,
}

impl MockModeler {
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
            ops: Mutex::new(Vec::new()),
        }
    }

    /// All recorded operations, in call order
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    /// Recorded operations starting with `prefix`, in call order
    pub fn ops_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter(|op| op.starts_with(prefix))
            .collect()
    }

    /// Number of recorded operations starting with `prefix`
    pub fn count_ops(&self, prefix: &str) -> usize {
        self.ops_with_prefix(prefix).len()
    }

    fn store(&self, op: String, bounds: Aabb) -> Solid {
        self.ops.lock().unwrap().push(op);
        let id = Uuid::new_v4();
        self.solids.lock().unwrap().insert(id, bounds);
        Solid::new(id).with_kernel_data()
    }

    fn bounds_of(&self, solid: &Solid) -> ModelerResult<Aabb> {
        self.solids
            .lock()
            .unwrap()
            .get(&solid.id)
            .copied()
            .ok_or(ModelerError::SolidNotFound(solid.id))
    }

    fn corner(bounds: &Aabb, index: u8) -> Vec3 {
        Vec3::new(
            if index & 1 == 0 { bounds.min.x } else { bounds.max.x },
            if index & 2 == 0 { bounds.min.y } else { bounds.max.y },
            if index & 4 == 0 { bounds.min.z } else { bounds.max.z },
        )
    }
}

impl Default for MockModeler {
    fn default() -> Self {
        Self::new()
    }
}

impl Modeler for MockModeler {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, center: Vec3, size: Vec3) -> ModelerResult<Solid> {
        let half = size * 0.5;
        Ok(self.store("box".into(), Aabb::new(center - half, center + half)))
    }

    fn create_cylinder(
        &self,
        base_center: Vec3,
        radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid> {
        let tip = base_center + axis.normalize_or_zero() * height;
        let mut bounds = Aabb::new(base_center.min(tip), base_center.max(tip));
        bounds.min -= Vec3::splat(radius);
        bounds.max += Vec3::splat(radius);
        Ok(self.store(format!("cylinder r={radius} h={height}"), bounds))
    }

    fn create_cone(
        &self,
        base_center: Vec3,
        bottom_radius: f32,
        top_radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid> {
        let radius = bottom_radius.max(top_radius);
        let tip = base_center + axis.normalize_or_zero() * height;
        let mut bounds = Aabb::new(base_center.min(tip), base_center.max(tip));
        bounds.min -= Vec3::splat(radius);
        bounds.max += Vec3::splat(radius);
        Ok(self.store(
            format!("cone rb={bottom_radius} rt={top_radius} h={height}"),
            bounds,
        ))
    }

    fn extrude(
        &self,
        profile: &Wire2D,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
    ) -> ModelerResult<Solid> {
        let (min, max) = profile.bounds();
        let base_min = origin + Vec3::new(min.x, min.y, 0.0);
        let base_max = origin + Vec3::new(max.x, max.y, 0.0);
        let offset = direction * distance;
        let bounds = Aabb::new(
            base_min.min(base_min + offset),
            base_max.max(base_max + offset),
        );
        Ok(self.store("extrude".into(), bounds))
    }

    fn loft(&self, sections: &[(Wire2D, Vec3)]) -> ModelerResult<Solid> {
        if sections.len() < 2 {
            return Err(ModelerError::InvalidProfile(
                "Loft needs at least two sections".into(),
            ));
        }
        let points = sections.iter().flat_map(|(profile, origin)| {
            let (min, max) = profile.bounds();
            [
                *origin + Vec3::new(min.x, min.y, 0.0),
                *origin + Vec3::new(max.x, max.y, 0.0),
            ]
        });
        let bounds = Aabb::from_points(points)
            .ok_or_else(|| ModelerError::InvalidProfile("Loft sections are empty".into()))?;
        Ok(self.store("loft".into(), bounds))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> ModelerResult<Solid> {
        let bounds_a = self.bounds_of(a)?;
        let bounds_b = self.bounds_of(b)?;
        let (name, bounds) = match op {
            BooleanType::Union => ("union", bounds_a.union(&bounds_b)),
            BooleanType::Subtract => ("subtract", bounds_a),
            BooleanType::Intersect => (
                "intersect",
                bounds_a.intersection(&bounds_b).unwrap_or(bounds_a),
            ),
        };
        Ok(self.store(name.into(), bounds))
    }

    fn translate(&self, solid: &Solid, offset: Vec3) -> ModelerResult<Solid> {
        let bounds = self.bounds_of(solid)?;
        Ok(self.store(
            "translate".into(),
            Aabb::new(bounds.min + offset, bounds.max + offset),
        ))
    }

    fn bounding_box(&self, solid: &Solid) -> ModelerResult<Aabb> {
        self.bounds_of(solid)
    }

    fn get_edges(&self, solid: &Solid) -> ModelerResult<Vec<EdgeInfo>> {
        let bounds = self.bounds_of(solid)?;
        const PAIRS: [(u8, u8); 12] = [
            (0, 1),
            (2, 3),
            (4, 5),
            (6, 7),
            (0, 2),
            (1, 3),
            (4, 6),
            (5, 7),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        Ok(PAIRS
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                EdgeInfo::new(
                    EdgeId::new(solid.id, i as u32),
                    Self::corner(&bounds, a),
                    Self::corner(&bounds, b),
                )
            })
            .collect())
    }

    fn get_faces(&self, solid: &Solid) -> ModelerResult<Vec<FaceInfo>> {
        let bounds = self.bounds_of(solid)?;
        let center = bounds.center();
        let half = bounds.size() * 0.5;
        let normals = [
            Vec3::X,
            -Vec3::X,
            Vec3::Y,
            -Vec3::Y,
            Vec3::Z,
            -Vec3::Z,
        ];
        Ok(normals
            .iter()
            .enumerate()
            .map(|(i, &normal)| {
                FaceInfo::new(
                    FaceId::new(solid.id, i as u32),
                    center + normal * (normal.abs().dot(half)),
                    normal,
                )
            })
            .collect())
    }

    fn fillet(&self, solid: &Solid, edges: &[EdgeId], radius: f32) -> ModelerResult<Solid> {
        let bounds = self.bounds_of(solid)?;
        Ok(self.store(format!("fillet n={} r={radius}", edges.len()), bounds))
    }

    fn chamfer(&self, solid: &Solid, edges: &[EdgeId], distance: f32) -> ModelerResult<Solid> {
        let bounds = self.bounds_of(solid)?;
        Ok(self.store(format!("chamfer n={} d={distance}", edges.len()), bounds))
    }

    fn tessellate(&self, solid: &Solid, _tolerance: f32) -> ModelerResult<TessellatedMesh> {
        let bounds = self.bounds_of(solid)?;
        self.ops.lock().unwrap().push("tessellate".into());

        let mut mesh = TessellatedMesh::new();
        mesh.vertices = (0..8u8).map(|i| Self::corner(&bounds, i).into()).collect();

        // Two triangles per box face, outward winding.
        const QUADS: [[u32; 4]; 6] = [
            [0, 2, 3, 1], // bottom
            [4, 5, 7, 6], // top
            [0, 1, 5, 4], // front
            [2, 6, 7, 3], // back
            [0, 4, 6, 2], // left
            [1, 3, 7, 5], // right
        ];
        for quad in QUADS {
            for tri in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
                let v0 = Vec3::from(mesh.vertices[tri[0] as usize]);
                let v1 = Vec3::from(mesh.vertices[tri[1] as usize]);
                let v2 = Vec3::from(mesh.vertices[tri[2] as usize]);
                let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
                mesh.normals.push(normal.into());
                mesh.indices.extend_from_slice(&tri);
            }
        }
        Ok(mesh)
    }

    fn export_step(
        &self,
        solid: &Solid,
        _path: &Path,
        _options: &StepExportOptions,
    ) -> ModelerResult<()> {
        self.bounds_of(solid)?;
        self.ops.lock().unwrap().push("step_export".into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_ops_in_order() {
        let modeler = MockModeler::new();
        let a = modeler.create_box(Vec3::ZERO, Vec3::ONE).unwrap();
        let b = modeler.create_box(Vec3::ONE, Vec3::ONE).unwrap();
        modeler.boolean(&a, &b, BooleanType::Subtract).unwrap();
        assert_eq!(modeler.ops(), vec!["box", "box", "subtract"]);
        assert_eq!(modeler.count_ops("box"), 2);
    }

    #[test]
    fn subtract_keeps_the_host_bounds() {
        let modeler = MockModeler::new();
        let a = modeler.create_box(Vec3::ZERO, Vec3::splat(2.0)).unwrap();
        let b = modeler.create_box(Vec3::ZERO, Vec3::splat(10.0)).unwrap();
        let cut = modeler.boolean(&a, &b, BooleanType::Subtract).unwrap();
        let bounds = modeler.bounding_box(&cut).unwrap();
        assert_eq!(bounds.size(), Vec3::splat(2.0));
    }

    #[test]
    fn box_has_twelve_edges_and_six_faces() {
        let modeler = MockModeler::new();
        let solid = modeler.create_box(Vec3::ZERO, Vec3::splat(2.0)).unwrap();
        assert_eq!(modeler.get_edges(&solid).unwrap().len(), 12);
        assert_eq!(modeler.get_faces(&solid).unwrap().len(), 6);
    }

    #[test]
    fn tessellation_is_a_closed_box() {
        let modeler = MockModeler::new();
        let solid = modeler.create_box(Vec3::ZERO, Vec3::ONE).unwrap();
        let mesh = modeler.tessellate(&solid, 0.1).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.normals.len(), 12);
    }
}
