//! Grid definitions
//!
//! A grid definition is an ordered 2-D boolean matrix describing which grid
//! cells a base or baseplate occupies. Rows may have irregular lengths;
//! missing entries count as vacant, so non-rectangular footprints are plain
//! jagged vectors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// How a cell sits within its grid, judged by its four orthogonal
/// neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Vacant neighbours on two adjacent sides (or more)
    Corner,
    /// At least one vacant neighbour, but no adjacent pair
    Edge,
    /// Fully surrounded
    Interior,
}

/// Boolean occupancy grid
///
/// Column index grows along +X, row index 0 is the rearmost (+Y) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDefinition {
    rows: Vec<Vec<bool>>,
}

impl GridDefinition {
    /// Create a grid definition from occupancy rows
    ///
    /// At least one cell must be occupied.
    pub fn new(rows: Vec<Vec<bool>>) -> BuildResult<Self> {
        let occupied = rows.iter().flatten().filter(|c| **c).count();
        if occupied == 0 {
            return Err(BuildError::EmptyGrid);
        }
        Ok(Self { rows })
    }

    /// Create a fully occupied rectangular grid
    pub fn equal(grid_x: usize, grid_y: usize) -> BuildResult<Self> {
        if grid_x == 0 || grid_y == 0 {
            return Err(BuildError::InvalidGridSize {
                x: grid_x,
                y: grid_y,
            });
        }
        Self::new(vec![vec![true; grid_x]; grid_y])
    }

    /// Occupancy rows
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (longest row)
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether a cell is occupied; out-of-range and jagged gaps are vacant
    pub fn occupied(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Iterate over occupied cells as `(col, row)` indices, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(col, _)| (col, row))
        })
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Classify an occupied cell by its vacant neighbour directions
    ///
    /// Returns `None` for vacant cells.
    pub fn classify(&self, col: usize, row: usize) -> Option<CellKind> {
        let (c, r) = (col as isize, row as isize);
        if !self.occupied(c, r) {
            return None;
        }

        let west = self.occupied(c - 1, r);
        let east = self.occupied(c + 1, r);
        let north = self.occupied(c, r - 1);
        let south = self.occupied(c, r + 1);

        let kind = if west && east && north && south {
            CellKind::Interior
        } else if (!west && !north) || (!north && !east) || (!east && !south) || (!south && !west) {
            CellKind::Corner
        } else {
            CellKind::Edge
        };
        Some(kind)
    }

    /// Overall plan size in mm for a given cell pitch
    pub fn plan_size(&self, cell_size: f32) -> Vec2 {
        Vec2::new(
            self.col_count() as f32 * cell_size,
            self.row_count() as f32 * cell_size,
        )
    }

    /// Center of a cell in mm, with the whole grid centered on the origin
    pub fn cell_center(&self, col: usize, row: usize, cell_size: f32) -> Vec2 {
        let plan = self.plan_size(cell_size);
        Vec2::new(
            (col as f32 + 0.5) * cell_size - plan.x / 2.0,
            plan.y / 2.0 - (row as f32 + 0.5) * cell_size,
        )
    }
}
