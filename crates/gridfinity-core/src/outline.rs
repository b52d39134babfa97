//! Plan outlines
//!
//! Everything a root object extrudes or lofts starts as a planar outline:
//! a single cell with some corners rounded, or the merged boundary of a
//! whole grid. Outlines are generated here as segment polylines so the
//! kernel only ever sees simple closed wires.
//!
//! Grid boundaries are traced from the occupied cells directly: every cell
//! side facing a vacant cell contributes a directed edge (interior kept on
//! the left), edges are chained into loops, collinear runs are merged, and
//! corners are replaced by quarter-arc fans. Insetting shifts each edge
//! along its interior normal before corners are intersected, which is what
//! the fit tolerances and wall offsets use.

use std::collections::HashMap;

use glam::Vec2;
use gridfinity_kernel::{BooleanType, Modeler, Solid, Wire2D};
use serde::{Deserialize, Serialize};

use crate::constants::CORNER_ARC_SEGMENTS;
use crate::error::BuildResult;
use crate::grid::GridDefinition;

/// Which corners of a cell outline are rounded
///
/// Directions are in plan orientation: +X east, +Y north (towards row 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerFlags {
    pub sw: bool,
    pub se: bool,
    pub ne: bool,
    pub nw: bool,
}

impl CornerFlags {
    /// All four corners rounded
    pub const ALL: CornerFlags = CornerFlags {
        sw: true,
        se: true,
        ne: true,
        nw: true,
    };

    /// No corner rounded
    pub const NONE: CornerFlags = CornerFlags {
        sw: false,
        se: false,
        ne: false,
        nw: false,
    };
}

/// Corners of a cell that face away from every neighbour
///
/// A corner is free when both adjacent sides and the diagonal are vacant;
/// those are the corners that receive the outward rounding.
pub fn cell_corner_flags(grid: &GridDefinition, col: usize, row: usize) -> CornerFlags {
    let (c, r) = (col as isize, row as isize);
    let vacant = |dc: isize, dr: isize| !grid.occupied(c + dc, r + dr);

    CornerFlags {
        sw: vacant(-1, 0) && vacant(0, 1) && vacant(-1, 1),
        se: vacant(1, 0) && vacant(0, 1) && vacant(1, 1),
        ne: vacant(1, 0) && vacant(0, -1) && vacant(1, -1),
        nw: vacant(-1, 0) && vacant(0, -1) && vacant(-1, -1),
    }
}

/// Rectangle with all four corners rounded
pub fn rounded_rect(width: f32, height: f32, radius: f32) -> Wire2D {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let corners = [
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ];
    Wire2D::new(
        round_loop(&corners, &[radius; 4], CORNER_ARC_SEGMENTS),
        true,
    )
}

/// Square cell outline with selected corners rounded
pub fn rounded_cell(size: f32, radius: f32, corners: CornerFlags) -> Wire2D {
    let h = size / 2.0;
    let points = [
        Vec2::new(-h, -h),
        Vec2::new(h, -h),
        Vec2::new(h, h),
        Vec2::new(-h, h),
    ];
    let r = |flag: bool| if flag { radius } else { 0.0 };
    let radii = [r(corners.sw), r(corners.se), r(corners.ne), r(corners.nw)];
    Wire2D::new(round_loop(&points, &radii, CORNER_ARC_SEGMENTS), true)
}

/// Replace the corners of an axis-aligned loop by quarter-arc fans
///
/// `points` are the sharp corners in order; `radii` gives the rounding per
/// corner, zero keeping the corner sharp. Works for convex and concave
/// corners alike.
pub fn round_loop(points: &[Vec2], radii: &[f32], segments: u32) -> Vec<Vec2> {
    debug_assert_eq!(points.len(), radii.len());

    let n = points.len();
    let mut out = Vec::new();
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let p = points[i];
        let next = points[(i + 1) % n];
        let r = radii[i];

        if r <= 1e-3 {
            out.push(p);
            continue;
        }

        let u = (p - prev).normalize();
        let v = (next - p).normalize();
        let turn = u.perp_dot(v).signum();

        let a = p - u * r;
        let o = p - u * r + v * r;
        let start = a - o;
        let sweep = turn * std::f32::consts::FRAC_PI_2;
        for k in 0..=segments {
            let angle = sweep * (k as f32 / segments as f32);
            let (sin, cos) = angle.sin_cos();
            let rotated = Vec2::new(
                start.x * cos - start.y * sin,
                start.x * sin + start.y * cos,
            );
            out.push(o + rotated);
        }
    }
    out
}

/// The plan boundary of a grid: one outer loop plus a loop per enclosed
/// vacancy
#[derive(Debug, Clone)]
pub struct PlanOutline {
    /// Outermost boundary loop
    pub outer: Wire2D,
    /// Boundaries of enclosed vacant regions
    pub holes: Vec<Wire2D>,
}

impl PlanOutline {
    /// Extrude the outline into a slab between `z0` and `z0 + height`,
    /// cutting the holes through
    pub fn extrude(
        &self,
        modeler: &dyn Modeler,
        z0: f32,
        height: f32,
    ) -> BuildResult<Solid> {
        let origin = glam::Vec3::new(0.0, 0.0, z0);
        let mut solid = modeler.extrude(&self.outer, origin, glam::Vec3::Z, height)?;
        for hole in &self.holes {
            let cut = modeler.extrude(hole, origin, glam::Vec3::Z, height)?;
            solid = modeler.boolean(&solid, &cut, BooleanType::Subtract)?;
        }
        Ok(solid)
    }
}

/// Trace the merged plan boundary of a grid
///
/// The outline is inset from the nominal cell edges by `inset` (growing
/// enclosed holes accordingly) and every corner is rounded with
/// `corner_radius`. The grid is centered on the origin.
pub fn grid_outline(
    grid: &GridDefinition,
    cell_size: f32,
    inset: f32,
    corner_radius: f32,
) -> PlanOutline {
    let loops = trace_loops(grid);

    let mut wires: Vec<Wire2D> = loops
        .iter()
        .map(|lp| {
            let sharp = loop_to_points(lp, grid, cell_size, inset);
            let radii = vec![corner_radius; sharp.len()];
            Wire2D::new(round_loop(&sharp, &radii, CORNER_ARC_SEGMENTS), true)
        })
        .collect();

    // The loop with the largest extent is the outer boundary.
    let outer_index = wires
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let area = |w: &Wire2D| {
                let (min, max) = w.bounds();
                (max.x - min.x) * (max.y - min.y)
            };
            area(a).total_cmp(&area(b))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let outer = wires.remove(outer_index);
    PlanOutline {
        outer,
        holes: wires,
    }
}

type LatticePoint = (i32, i32);

/// Plan-space direction of a lattice step (lattice rows grow southwards)
fn mm_dir(from: LatticePoint, to: LatticePoint) -> (i32, i32) {
    ((to.0 - from.0).signum(), -(to.1 - from.1).signum())
}

/// Collect the directed boundary edges of the occupied region and chain
/// them into closed loops of lattice corner points
fn trace_loops(grid: &GridDefinition) -> Vec<Vec<LatticePoint>> {
    let mut edges: Vec<(LatticePoint, LatticePoint)> = Vec::new();
    for (col, row) in grid.cells() {
        let (c, r) = (col as i32, row as i32);
        let (ci, ri) = (col as isize, row as isize);
        if !grid.occupied(ci, ri - 1) {
            edges.push(((c + 1, r), (c, r)));
        }
        if !grid.occupied(ci, ri + 1) {
            edges.push(((c, r + 1), (c + 1, r + 1)));
        }
        if !grid.occupied(ci - 1, ri) {
            edges.push(((c, r), (c, r + 1)));
        }
        if !grid.occupied(ci + 1, ri) {
            edges.push(((c + 1, r + 1), (c + 1, r)));
        }
    }

    let mut by_start: HashMap<LatticePoint, Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        by_start.entry(e.0).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }

        let origin = edges[start].0;
        let mut lp: Vec<LatticePoint> = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let (from, to) = edges[current];
            lp.push(from);
            if to == origin {
                break;
            }

            let dir = mm_dir(from, to);
            // Prefer the sharpest left turn so loops that touch only at a
            // point stay separate.
            let next = by_start
                .get(&to)
                .into_iter()
                .flatten()
                .copied()
                .filter(|&i| !used[i])
                .max_by_key(|&i| {
                    let cand = mm_dir(edges[i].0, edges[i].1);
                    dir.0 * cand.1 - dir.1 * cand.0
                });
            match next {
                Some(i) => current = i,
                None => break,
            }
        }

        loops.push(simplify_loop(lp));
    }

    loops
}

/// Drop intermediate points of collinear runs
fn simplify_loop(lp: Vec<LatticePoint>) -> Vec<LatticePoint> {
    let n = lp.len();
    (0..n)
        .filter(|&i| {
            let prev = lp[(i + n - 1) % n];
            let next = lp[(i + 1) % n];
            let din = (
                (lp[i].0 - prev.0).signum(),
                (lp[i].1 - prev.1).signum(),
            );
            let dout = (
                (next.0 - lp[i].0).signum(),
                (next.1 - lp[i].1).signum(),
            );
            din != dout
        })
        .map(|i| lp[i])
        .collect()
}

/// Convert a lattice corner loop to mm coordinates with the inset applied
///
/// Each edge is shifted along its interior normal; corner points are the
/// intersections of the shifted edge lines.
fn loop_to_points(
    corners: &[LatticePoint],
    grid: &GridDefinition,
    cell_size: f32,
    inset: f32,
) -> Vec<Vec2> {
    let plan = grid.plan_size(cell_size);
    let to_mm = |p: LatticePoint| {
        Vec2::new(
            p.0 as f32 * cell_size - plan.x / 2.0,
            plan.y / 2.0 - p.1 as f32 * cell_size,
        )
    };

    let n = corners.len();
    (0..n)
        .map(|i| {
            let prev = corners[(i + n - 1) % n];
            let p = corners[i];
            let next = corners[(i + 1) % n];

            let din = mm_dir(prev, p);
            let dout = mm_dir(p, next);
            let d_in = Vec2::new(din.0 as f32, din.1 as f32);
            let d_out = Vec2::new(dout.0 as f32, dout.1 as f32);
            let n_in = Vec2::new(-d_in.y, d_in.x);
            let n_out = Vec2::new(-d_out.y, d_out.x);

            let pm = to_mm(p);
            let on_in = pm + n_in * inset;
            let on_out = pm + n_out * inset;

            if din.0 == 0 {
                // incoming edge vertical: it pins x, the outgoing pins y
                Vec2::new(on_in.x, on_out.y)
            } else {
                Vec2::new(on_out.x, on_in.y)
            }
        })
        .collect()
}
