//! Lattice layout constants and numeric thresholds.
//!
//! # Sample Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SCALAR FIELD LAYOUT                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  index = x + y * dim_x + z * dim_x * dim_y                              │
//! │                                                                         │
//! │  Address:  0      1      ...  dim_x-1    dim_x    ...                   │
//! │  Content: [0,0,0][1,0,0]...[dx-1,0,0]  [0,1,0]  ...                     │
//! │           └──────── X ──────────────┘  └── X ──...                      │
//! │                                                                         │
//! │  Optimal access: sequential X, then Y, then Z                           │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Sign convention:                                                       │
//! │                                                                         │
//! │    value >= 0   inside  (an exact zero counts as inside)                │
//! │    value <  0   outside                                                 │
//! │    NaN          neither, never produces a crossing                      │
//! │                                                                         │
//! │  Emitted faces point outward, toward decreasing field values.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Coordinate System
//!
//! ```text
//!         +Y
//!          │
//!          │
//!          │
//!          └───────── +X
//!         /
//!        /
//!       +Z
//!
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```
//!
//! # Parity
//!
//! A cell (or lattice point) at `(x, y, z)` has parity `(x + y + z) & 1`.
//! Even and odd cells use mirrored 5-tetrahedron decompositions so that the
//! face diagonals of neighbouring cells agree.

/// Tetrahedra per cell.
pub const TETS_PER_CELL: usize = 5;

/// Index of the central tetrahedron (the only one touching no cube corner
/// as an apex).
pub const CENTER_TET: usize = 4;

/// Candidate lines owned by each lattice point.
pub const LINES_PER_POINT: usize = 6;

/// Edges of a tetrahedron.
pub const EDGES_PER_TET: usize = 6;

/// Integer coordinates of the 8 cube corners.
///
/// Corner layout (binary: ZYX):
/// - 0 = (0,0,0)
/// - 1 = (1,0,0)
/// - 2 = (0,1,0)
/// - 3 = (1,1,0)
/// - 4 = (0,0,1)
/// - 5 = (1,0,1)
/// - 6 = (0,1,1)
/// - 7 = (1,1,1)
pub const CORNER_COORDS: [[u8; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

/// Corner index from unit offsets.
#[inline(always)]
pub const fn corner_index(x: u8, y: u8, z: u8) -> u8 {
  (x & 1) | ((y & 1) << 1) | ((z & 1) << 2)
}

/// Parity of a lattice point (0 = even, 1 = odd).
#[inline(always)]
pub const fn parity(x: usize, y: usize, z: usize) -> usize {
  (x + y + z) & 1
}

// =============================================================================
// Numeric thresholds
// =============================================================================

/// Crossings closer than this to the inside endpoint snap onto it.
pub const SNAP_INSIDE_EPSILON: f32 = 1e-4;

/// Crossings closer than this to the outside endpoint snap onto it.
pub const SNAP_OUTSIDE_EPSILON: f32 = 1e-3;

/// Squared magnitude below which a cross product or edge is degenerate.
pub const DEGENERATE_EPSILON_SQ: f32 = 1e-8;

/// Summed normal differences at or below this are treated as co-linear.
pub const COLINEAR_NORMAL_THRESHOLD: f32 = 0.1;

/// `1 / sqrt(sqrt(3) / 18)`, normalizes the area of a normal-tip triangle.
pub const NORMAL_SPREAD_SCALE: f32 = 3.223_709_7;

/// Normalized normal-tip area below which three normals form a sliver.
pub const SLIVER_AREA_THRESHOLD: f32 = 0.1;

/// Furthest a plane-intersection dual point may sit from its centroid.
pub const MAX_DUAL_OFFSET: f32 = 1.0;

/// Cosine of the widest angle a preferred ring split may open between one
/// of its triangles and the ring normal (60 degrees).
pub const MIN_SPLIT_ALIGNMENT: f32 = 0.5;

/// Normal used when no direction can be derived.
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
