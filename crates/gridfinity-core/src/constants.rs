//! Published Gridfinity standard dimensions
//!
//! All values are millimeters (or degrees where noted). These are fixed by
//! the standard, not configuration; per-object overrides go through the
//! constructors that accept explicit values.

/// Grid dimensions
pub mod grid {
    /// Modular grid cell pitch
    pub const SIZE: f32 = 42.0;
    /// Outer corner radius of cells and plates
    pub const RADIUS: f32 = 4.0;
    /// Clearance between a bin and its baseplate
    pub const TOLERANCE: f32 = 0.5;
    /// One bin height unit
    pub const HEIGHT_UNIT: f32 = 7.0;
}

/// Stacking profile cross-section
pub mod stacking_lip {
    /// Lower chamfer rise
    pub const HEIGHT_1: f32 = 0.7;
    /// Straight wall rise
    pub const HEIGHT_2: f32 = 1.8;
    /// Upper chamfer rise for bin feet
    pub const HEIGHT_3_BIN: f32 = 1.9;
    /// Upper chamfer rise for baseplate cavities
    pub const HEIGHT_3_BASE_PLATE: f32 = 2.15;
    /// Extra clearance applied to bin feet so they drop into the recess
    pub const OFFSET: f32 = 0.25;
}

/// Base bottom section
pub mod bottom {
    /// Height of the platform joining the feet of a base
    pub const PLATFORM_HEIGHT: f32 = 2.8;
    /// Inset from a cell side to the center of a corner hole
    pub const HOLE_FROM_SIDE: f32 = 8.0;
}

/// Magnet holes
pub mod magnet {
    pub const RADIUS: f32 = 3.25;
    pub const THICKNESS: f32 = 2.4;
}

/// Screw holes
pub mod screw {
    pub const RADIUS: f32 = 1.5;
    pub const DEPTH: f32 = 6.0;
}

/// Bin interior
pub mod bin {
    /// Corner radius of compartment walls
    pub const INNER_RADIUS: f32 = 1.8;
    /// Wall thickness between compartments
    pub const INNER_WALL: f32 = 1.2;
    /// Wall thickness around the compartment arrangement
    pub const OUTER_WALL: f32 = 0.95;
}

/// Label shelves
pub mod label {
    /// Shelf depth measured along the top face
    pub const WIDTH: f32 = 12.0;
    /// Shelf angle from the top face, degrees
    pub const ANGLE: f32 = 36.0;
}

/// Scoop ramps
pub mod scoop {
    pub const RADIUS: f32 = 5.0;
}

/// Baseplate bottoms
pub mod baseplate {
    /// Height of the solid bottom under a full baseplate
    pub const BOTTOM_HEIGHT: f32 = 6.4;
    /// Side length of the skeleton relief pocket
    pub const SKELETON_SIZE: f32 = 36.3;
    /// Corner notch of the skeleton relief pocket
    pub const SKELETON_NOTCH: f32 = 9.4;
    /// Fillet radius of the skeleton relief pocket
    pub const SKELETON_RADIUS: f32 = 4.25;
}

/// Weighted baseplate cutout
pub mod weighted {
    /// Side length of the central pocket
    pub const SIZE: f32 = 21.4;
    /// Depth of the central pocket
    pub const HEIGHT: f32 = 4.0;
    /// Width of a side relief
    pub const APPENDIX_WIDTH: f32 = 8.5;
    /// Length of a side relief
    pub const APPENDIX_LENGTH: f32 = 4.25;
    /// Depth of a side relief
    pub const APPENDIX_HEIGHT: f32 = 2.0;
}

/// Number of segments used to approximate a quarter-circle corner arc
pub const CORNER_ARC_SEGMENTS: u32 = 8;

/// Default number of segments for full-circle profiles (holes)
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Default tessellation tolerance for STL export
pub const STL_TOLERANCE: f32 = 0.1;
