//! Modeler trait definitions
//!
//! These traits define the interface that all CAD kernel backends must
//! implement. The generator only ever talks to the kernel through this
//! boundary; all solid geometry is computed behind it.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an edge within a solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    /// ID of the solid this edge belongs to
    pub solid_id: Uuid,
    /// Index of the edge within the solid
    pub index: u32,
}

impl EdgeId {
    /// Create a new edge ID
    pub fn new(solid_id: Uuid, index: u32) -> Self {
        Self { solid_id, index }
    }
}

/// Unique identifier for a face within a solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId {
    /// ID of the solid this face belongs to
    pub solid_id: Uuid,
    /// Index of the face within the solid
    pub index: u32,
}

impl FaceId {
    /// Create a new face ID
    pub fn new(solid_id: Uuid, index: u32) -> Self {
        Self { solid_id, index }
    }
}

/// Information about an edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Start point of the edge
    pub start: Vec3,
    /// End point of the edge
    pub end: Vec3,
    /// Midpoint of the edge
    pub midpoint: Vec3,
    /// Length of the edge
    pub length: f32,
}

impl EdgeInfo {
    /// Create a new edge info
    pub fn new(id: EdgeId, start: Vec3, end: Vec3) -> Self {
        let midpoint = (start + end) * 0.5;
        let length = (end - start).length();
        Self {
            id,
            start,
            end,
            midpoint,
            length,
        }
    }
}

/// Information about a face
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceInfo {
    /// Unique identifier for this face
    pub id: FaceId,
    /// Center point of the face
    pub center: Vec3,
    /// Normal vector of the face
    pub normal: Vec3,
}

impl FaceInfo {
    /// Create a new face info
    pub fn new(id: FaceId, center: Vec3, normal: Vec3) -> Self {
        Self {
            id,
            center,
            normal: normal.normalize(),
        }
    }
}

/// Error type for modeler operations
#[derive(Debug, Clone, Error)]
pub enum ModelerError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("STEP export failed: {0}")]
    StepExport(String),
}

/// Result type for modeler operations
pub type ModelerResult<T> = Result<T, ModelerError>;

/// A tessellated mesh output from the CAD kernel
///
/// Normals are stored per triangle, matching what STL writers expect.
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Triangle normals (one per triangle)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A planar wire (closed loop of line segments) used as a profile
///
/// Curved outlines are approximated by segments before they reach the
/// kernel, so a profile is always a simple polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire2D {
    /// Points defining the wire (in order)
    pub points: Vec<Vec2>,
    /// Whether the wire is closed
    pub closed: bool,
}

impl Wire2D {
    /// Create a new wire from points
    pub fn new(points: Vec<Vec2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Create a rectangle wire
    pub fn rectangle(center: Vec2, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(
            vec![
                center + Vec2::new(-hw, -hh),
                center + Vec2::new(hw, -hh),
                center + Vec2::new(hw, hh),
                center + Vec2::new(-hw, hh),
            ],
            true,
        )
    }

    /// Create a circle wire (approximated with segments)
    pub fn circle(center: Vec2, radius: f32, segments: u32) -> Self {
        let points: Vec<Vec2> = (0..segments)
            .map(|i| {
                let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
                center + Vec2::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();
        Self::new(points, true)
    }

    /// Axis-aligned bounds of the wire points
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for p in &self.points {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }
}

/// A 3D solid body handle
///
/// The actual boundary representation lives inside the kernel backend;
/// this handle only carries the identity.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
    /// Internal marker for kernel data (actual data stored in kernel)
    #[serde(skip)]
    has_kernel_data: bool,
}

impl Clone for Solid {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            has_kernel_data: self.has_kernel_data,
        }
    }
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            has_kernel_data: false,
        }
    }

    /// Mark that this solid has kernel data
    pub fn with_kernel_data(mut self) -> Self {
        self.has_kernel_data = true;
        self
    }

    /// Check if this solid has kernel data
    pub fn has_kernel_data(&self) -> bool {
        self.has_kernel_data
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a bounding box from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounding box of a set of points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        Some(bounds)
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Merge with another bounding box
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Intersection with another bounding box, if any
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min.x <= max.x && min.y <= max.y && min.z <= max.z {
            Some(Aabb::new(min, max))
        } else {
            None
        }
    }

    /// Check whether a point projected on the XY plane lies within the
    /// plan bounds (with a small tolerance)
    pub fn contains_xy(&self, point: Vec2, tolerance: f32) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Options for STEP file export
#[derive(Debug, Clone, Default)]
pub struct StepExportOptions {
    /// Author name in the STEP header
    pub author: Option<String>,
    /// Organization name in the STEP header
    pub organization: Option<String>,
}

/// The main modeler trait
///
/// Implementations of this trait provide the actual geometry operations
/// using different kernel backends.
pub trait Modeler: Send + Sync {
    /// Get the name of this modeler backend
    fn name(&self) -> &str;

    /// Check if the backend is available
    fn is_available(&self) -> bool;

    /// Create a box primitive centered at `center`
    fn create_box(&self, center: Vec3, size: Vec3) -> ModelerResult<Solid>;

    /// Create a cylinder primitive
    ///
    /// The cylinder starts at `base_center` and extends `height` along
    /// `axis`.
    fn create_cylinder(
        &self,
        base_center: Vec3,
        radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid>;

    /// Create a conical frustum primitive
    ///
    /// The frustum starts at `base_center` with `bottom_radius` and ends
    /// `height` along `axis` with `top_radius`. One of the radii may be
    /// zero for a full cone.
    fn create_cone(
        &self,
        base_center: Vec3,
        bottom_radius: f32,
        top_radius: f32,
        height: f32,
        axis: Vec3,
    ) -> ModelerResult<Solid>;

    /// Extrude a closed planar profile
    ///
    /// The profile lies in the XY plane anchored at `origin` and is swept
    /// `distance` along `direction`.
    fn extrude(
        &self,
        profile: &Wire2D,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
    ) -> ModelerResult<Solid>;

    /// Loft through planar sections
    ///
    /// Each section is a closed profile in the XY plane anchored at its
    /// own origin. All sections must have the same point count; matching
    /// points are connected by ruled side walls and the first and last
    /// sections are capped.
    fn loft(&self, sections: &[(Wire2D, Vec3)]) -> ModelerResult<Solid>;

    /// Perform a boolean operation on two solids
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> ModelerResult<Solid>;

    /// Translate a solid by an offset, producing a new solid
    fn translate(&self, solid: &Solid, offset: Vec3) -> ModelerResult<Solid>;

    /// Get the axis-aligned bounding box of a solid
    fn bounding_box(&self, solid: &Solid) -> ModelerResult<Aabb>;

    /// Get all edges of a solid with their geometric information
    fn get_edges(&self, solid: &Solid) -> ModelerResult<Vec<EdgeInfo>>;

    /// Get all faces of a solid with their geometric information
    ///
    /// Face selection by direction is done by filtering the returned
    /// normals.
    fn get_faces(&self, solid: &Solid) -> ModelerResult<Vec<FaceInfo>>;

    /// Apply fillet (rounded edge) to selected edges
    fn fillet(&self, solid: &Solid, edges: &[EdgeId], radius: f32) -> ModelerResult<Solid>;

    /// Apply chamfer (beveled edge) to selected edges
    fn chamfer(&self, solid: &Solid, edges: &[EdgeId], distance: f32) -> ModelerResult<Solid>;

    /// Tessellate a solid into triangles
    fn tessellate(&self, solid: &Solid, tolerance: f32) -> ModelerResult<TessellatedMesh>;

    /// Export a solid to a STEP file using the kernel's own writer
    fn export_step(
        &self,
        solid: &Solid,
        path: &Path,
        options: &StepExportOptions,
    ) -> ModelerResult<()>;
}

fn unavailable<T>() -> ModelerResult<T> {
    Err(ModelerError::KernelNotAvailable(
        "No CAD kernel available".into(),
    ))
}

/// A null modeler that always returns errors (used when no kernel backend
/// is compiled in)
#[derive(Debug, Default)]
pub struct NullModeler;

impl Modeler for NullModeler {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_box(&self, _center: Vec3, _size: Vec3) -> ModelerResult<Solid> {
        unavailable()
    }

    fn create_cylinder(
        &self,
        _base_center: Vec3,
        _radius: f32,
        _height: f32,
        _axis: Vec3,
    ) -> ModelerResult<Solid> {
        unavailable()
    }

    fn create_cone(
        &self,
        _base_center: Vec3,
        _bottom_radius: f32,
        _top_radius: f32,
        _height: f32,
        _axis: Vec3,
    ) -> ModelerResult<Solid> {
        unavailable()
    }

    fn extrude(
        &self,
        _profile: &Wire2D,
        _origin: Vec3,
        _direction: Vec3,
        _distance: f32,
    ) -> ModelerResult<Solid> {
        unavailable()
    }

    fn loft(&self, _sections: &[(Wire2D, Vec3)]) -> ModelerResult<Solid> {
        unavailable()
    }

    fn boolean(&self, _a: &Solid, _b: &Solid, _op: BooleanType) -> ModelerResult<Solid> {
        unavailable()
    }

    fn translate(&self, _solid: &Solid, _offset: Vec3) -> ModelerResult<Solid> {
        unavailable()
    }

    fn bounding_box(&self, _solid: &Solid) -> ModelerResult<Aabb> {
        unavailable()
    }

    fn get_edges(&self, _solid: &Solid) -> ModelerResult<Vec<EdgeInfo>> {
        unavailable()
    }

    fn get_faces(&self, _solid: &Solid) -> ModelerResult<Vec<FaceInfo>> {
        unavailable()
    }

    fn fillet(&self, _solid: &Solid, _edges: &[EdgeId], _radius: f32) -> ModelerResult<Solid> {
        unavailable()
    }

    fn chamfer(&self, _solid: &Solid, _edges: &[EdgeId], _distance: f32) -> ModelerResult<Solid> {
        unavailable()
    }

    fn tessellate(&self, _solid: &Solid, _tolerance: f32) -> ModelerResult<TessellatedMesh> {
        unavailable()
    }

    fn export_step(
        &self,
        _solid: &Solid,
        _path: &Path,
        _options: &StepExportOptions,
    ) -> ModelerResult<()> {
        unavailable()
    }
}

/// Get the default modeler based on available features
pub fn default_modeler() -> Box<dyn Modeler> {
    #[cfg(feature = "truck")]
    {
        Box::new(super::TruckModeler::new())
    }

    #[cfg(not(feature = "truck"))]
    {
        Box::new(NullModeler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_modeler_reports_unavailable() {
        let modeler = NullModeler;
        assert!(!modeler.is_available());
        assert!(modeler.create_box(Vec3::ZERO, Vec3::ONE).is_err());
    }

    #[test]
    fn aabb_union_and_intersection() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::new(Vec3::ONE, Vec3::splat(3.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::ZERO);
        assert_eq!(u.max, Vec3::splat(3.0));

        let i = a.intersection(&b).unwrap();
        assert_eq!(i.min, Vec3::ONE);
        assert_eq!(i.max, Vec3::splat(2.0));

        let far = Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0));
        assert!(a.intersection(&far).is_none());
    }

    #[test]
    fn wire_rectangle_bounds() {
        let wire = Wire2D::rectangle(glam::Vec2::ZERO, 4.0, 2.0);
        let (min, max) = wire.bounds();
        assert_eq!(min, glam::Vec2::new(-2.0, -1.0));
        assert_eq!(max, glam::Vec2::new(2.0, 1.0));
    }
}
