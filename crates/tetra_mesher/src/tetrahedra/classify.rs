//! Tetrahedron crossing-pattern classification.
//!
//! A tetrahedron's 6 edge crossings form a 6-bit mask (bit `e` for edge
//! `e`, edges ordered 01, 02, 03, 12, 23, 31). Only 7 of the 64 masks can
//! arise from a consistent sign assignment: one vertex separated from the
//! other three (a triangle), or two from two (a quad).
//!
//! ```text
//! Pattern  Edges          Split        Reference  Faces
//! ───────  ─────────────  ───────────  ─────────  ─────
//!    1     01 02 03       v0 | v1v2v3      v0       1
//!    2     01 02 23 31    v0v3 | v1v2      v0       2
//!    3     01 03 12 23    v0v2 | v1v3      v0       2
//!    4     01 31 12       v1 | v0v2v3      v1       1
//!    5     02 03 12 31    v0v1 | v2v3      v0       2
//!    6     02 12 23       v2 | v0v1v3      v2       1
//!    7     03 23 31       v3 | v0v1v2      v3       1
//! ```
//!
//! Faces are stored winding toward the reference vertex and flipped when
//! that vertex is inside, so emitted faces always point outward.

use crate::constants::EDGES_PER_TET;
use crate::tables::TET_EDGES;

use super::scan::{crosses, is_inside};

/// Surface faces for one valid crossing pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceConfig {
  /// Pattern id, 1 through 7.
  pub pattern: u8,
  /// The 6-bit crossing mask this pattern matches.
  pub flags: u8,
  /// Local vertex that decides the winding.
  pub reference: u8,
  /// Triangles as local edge indices, wound toward `reference`.
  pub triangles: &'static [[u8; 3]],
}

impl FaceConfig {
  /// Triangles wound so their normals leave the inside region.
  ///
  /// `invert` is true when the reference vertex is inside.
  #[inline]
  pub fn oriented(&self, invert: bool) -> impl Iterator<Item = [u8; 3]> + '_ {
    self
      .triangles
      .iter()
      .map(move |&[a, b, c]| if invert { [b, a, c] } else { [a, b, c] })
  }
}

/// Result of classifying a crossing mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
  /// No edge crosses.
  Empty,
  /// A valid pattern.
  Cut(FaceConfig),
  /// Crossings no sign assignment can produce.
  Invalid,
}

const fn edge_mask(edges: &[u8]) -> u8 {
  let mut mask = 0;
  let mut i = 0;
  while i < edges.len() {
    mask |= 1 << edges[i];
    i += 1;
  }
  mask
}

const PATTERNS: [FaceConfig; 7] = [
  FaceConfig {
    pattern: 1,
    flags: edge_mask(&[0, 1, 2]),
    reference: 0,
    triangles: &[[1, 0, 2]],
  },
  FaceConfig {
    pattern: 2,
    flags: edge_mask(&[0, 1, 4, 5]),
    reference: 0,
    triangles: &[[1, 0, 4], [4, 0, 5]],
  },
  FaceConfig {
    pattern: 3,
    flags: edge_mask(&[0, 2, 3, 4]),
    reference: 0,
    triangles: &[[3, 0, 4], [4, 0, 2]],
  },
  FaceConfig {
    pattern: 4,
    flags: edge_mask(&[0, 3, 5]),
    reference: 1,
    triangles: &[[5, 0, 3]],
  },
  FaceConfig {
    pattern: 5,
    flags: edge_mask(&[1, 2, 3, 5]),
    reference: 0,
    triangles: &[[5, 2, 1], [5, 1, 3]],
  },
  FaceConfig {
    pattern: 6,
    flags: edge_mask(&[1, 3, 4]),
    reference: 2,
    triangles: &[[3, 1, 4]],
  },
  FaceConfig {
    pattern: 7,
    flags: edge_mask(&[2, 4, 5]),
    reference: 3,
    triangles: &[[4, 2, 5]],
  },
];

/// Classification of every 6-bit crossing mask.
pub const PATTERN_TABLE: [Classification; 64] = generate_pattern_table();

const fn generate_pattern_table() -> [Classification; 64] {
  let mut table = [Classification::Invalid; 64];
  table[0] = Classification::Empty;

  let mut i = 0;
  while i < PATTERNS.len() {
    table[PATTERNS[i].flags as usize] = Classification::Cut(PATTERNS[i]);
    i += 1;
  }

  table
}

/// Classify a crossing mask. Bits above the sixth are ignored.
#[inline(always)]
pub fn classify(flags: u8) -> Classification {
  PATTERN_TABLE[(flags & 0x3F) as usize]
}

/// Crossing mask of a tetrahedron from its 4 corner values.
#[inline]
pub fn tet_flags(values: [f32; 4]) -> u8 {
  let mut flags = 0;
  for (edge, pair) in TET_EDGES.iter().enumerate().take(EDGES_PER_TET) {
    if crosses(values[pair[0] as usize], values[pair[1] as usize]) {
      flags |= 1 << edge;
    }
  }
  flags
}

/// Whether faces of `config` must be flipped for these corner values.
#[inline(always)]
pub fn is_inverted(config: &FaceConfig, values: [f32; 4]) -> bool {
  is_inside(values[config.reference as usize])
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
