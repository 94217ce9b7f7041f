//! Tetrahedral lattice topology tables.
//!
//! Every cell is split into 5 tetrahedra. Even and odd cells use mirrored
//! splits so that the face diagonals of neighbouring cells line up (the
//! diamond lattice).
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Y
//!     0──────1            │  +Z
//!                         │ /
//!                         └───+X
//! ```
//!
//! # Lines
//!
//! Each lattice point owns 6 lines running from it (or from its cell's
//! corner 1/2 for odd anti-diagonals) into its cell:
//!
//! ```text
//! Line  Even    Odd     Kind
//! ────  ──────  ──────  ─────────────
//!   0   [0,2]   [0,2]   Y axis
//!   1   [0,4]   [0,4]   Z axis
//!   2   [0,6]   [2,4]   YZ diagonal
//!   3   [0,1]   [0,1]   X axis
//!   4   [0,3]   [1,2]   XY diagonal
//!   5   [0,5]   [1,4]   XZ diagonal
//! ```
//!
//! Every tetrahedron edge is exactly one line, owned either by the cell's
//! own origin or by one of its forward neighbours. [`EDGE_SLOTS`] records
//! that owner and is derived here rather than transcribed.
//!
//! # Rings
//!
//! The tetrahedra around a line form a closed ring: 4 corner tetrahedra
//! around an axis line, 6 tetrahedra (a center tetrahedron flanked by two
//! corner tetrahedra, per cell) around a face diagonal. [`LINE_RINGS`]
//! stores each ring in right-handed order around the line direction.

use crate::constants::{corner_index, CENTER_TET, CORNER_COORDS, EDGES_PER_TET, LINES_PER_POINT, TETS_PER_CELL};

/// Corner pairs of the lines owned by a lattice point, indexed by parity.
pub const POINT_LINES: [[[u8; 2]; LINES_PER_POINT]; 2] = [
  [[0, 2], [0, 4], [0, 6], [0, 1], [0, 3], [0, 5]],
  [[0, 2], [0, 4], [2, 4], [0, 1], [1, 2], [1, 4]],
];

/// Cube corners of the 5 tetrahedra, indexed by parity.
///
/// Tetrahedra 0-3 each have one apex cube corner; tetrahedron 4 is the
/// central one. All ten have positive orientation.
pub const TET_CORNERS: [[[u8; 4]; TETS_PER_CELL]; 2] = [
  [[4, 6, 5, 0], [3, 1, 5, 0], [2, 3, 6, 0], [6, 7, 5, 3], [0, 6, 5, 3]],
  [[0, 2, 4, 1], [4, 7, 5, 1], [6, 7, 4, 2], [3, 1, 7, 2], [1, 2, 4, 7]],
];

/// Local vertex pairs of the 6 tetrahedron edges.
pub const TET_EDGES: [[u8; 2]; EDGES_PER_TET] = [[0, 1], [0, 2], [0, 3], [1, 2], [2, 3], [3, 1]];

/// Where a tetrahedron edge's crossing point lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSlot {
  /// Cube corner of the lattice point owning the line (offset from the cell
  /// origin).
  pub owner: u8,
  /// Line index at the owning lattice point.
  pub line: u8,
}

/// Owning lattice line for every tetrahedron edge, `[parity][tet][edge]`.
pub const EDGE_SLOTS: [[[EdgeSlot; EDGES_PER_TET]; TETS_PER_CELL]; 2] = generate_edge_slots();

/// A tetrahedron in the ring around a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingMember {
  /// Cell offset relative to the lattice point owning the line.
  pub cell: [i8; 3],
  /// Tetrahedron index within that cell.
  pub tet: u8,
}

/// Longest ring around any line.
pub const MAX_RING: usize = 6;

/// Tetrahedra around one line.
#[derive(Clone, Copy, Debug)]
pub struct LineRing {
  len: u8,
  members: [RingMember; MAX_RING],
}

impl LineRing {
  const EMPTY: LineRing = LineRing {
    len: 0,
    members: [RingMember { cell: [0; 3], tet: 0 }; MAX_RING],
  };

  /// Members in right-handed order around the line direction. Rings of 6
  /// start at a center tetrahedron.
  #[inline]
  pub fn members(&self) -> &[RingMember] {
    &self.members[..self.len as usize]
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len as usize
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

/// Ring of tetrahedra around every line, `[parity][line]`.
pub const LINE_RINGS: [[LineRing; LINES_PER_POINT]; 2] = generate_line_rings();

// =============================================================================
// Derivation
// =============================================================================

const fn generate_edge_slots() -> [[[EdgeSlot; EDGES_PER_TET]; TETS_PER_CELL]; 2] {
  let mut table = [[[EdgeSlot { owner: 0, line: 0 }; EDGES_PER_TET]; TETS_PER_CELL]; 2];
  let mut parity = 0;

  while parity < 2 {
    let mut tet = 0;
    while tet < TETS_PER_CELL {
      let mut edge = 0;
      while edge < EDGES_PER_TET {
        let a = TET_CORNERS[parity][tet][TET_EDGES[edge][0] as usize];
        let b = TET_CORNERS[parity][tet][TET_EDGES[edge][1] as usize];
        table[parity][tet][edge] = find_owner(parity, a, b);
        edge += 1;
      }
      tet += 1;
    }
    parity += 1;
  }

  table
}

/// Search the cell origin and its forward neighbours for the line joining
/// cube corners `a` and `b`.
const fn find_owner(parity: usize, a: u8, b: u8) -> EdgeSlot {
  let ca = CORNER_COORDS[a as usize];
  let cb = CORNER_COORDS[b as usize];
  let mut found = EdgeSlot { owner: 0, line: 0 };
  let mut matches = 0;
  let mut owner = 0;

  while owner < 8 {
    let d = CORNER_COORDS[owner];
    if d[0] <= min_u8(ca[0], cb[0]) && d[1] <= min_u8(ca[1], cb[1]) && d[2] <= min_u8(ca[2], cb[2]) {
      let la = corner_index(ca[0] - d[0], ca[1] - d[1], ca[2] - d[2]);
      let lb = corner_index(cb[0] - d[0], cb[1] - d[1], cb[2] - d[2]);
      let owner_parity = parity ^ ((d[0] + d[1] + d[2]) as usize & 1);

      let mut line = 0;
      while line < LINES_PER_POINT {
        let pair = POINT_LINES[owner_parity][line];
        if (pair[0] == la && pair[1] == lb) || (pair[0] == lb && pair[1] == la) {
          found = EdgeSlot {
            owner: owner as u8,
            line: line as u8,
          };
          matches += 1;
        }
        line += 1;
      }
    }
    owner += 1;
  }

  if matches != 1 {
    panic!("tetrahedron edge must map to exactly one lattice line");
  }
  found
}

const fn generate_line_rings() -> [[LineRing; LINES_PER_POINT]; 2] {
  let mut table = [[LineRing::EMPTY; LINES_PER_POINT]; 2];
  let mut parity = 0;

  while parity < 2 {
    let mut line = 0;
    while line < LINES_PER_POINT {
      table[parity][line] = build_ring(parity, line);
      line += 1;
    }
    parity += 1;
  }

  table
}

const fn build_ring(parity: usize, line: usize) -> LineRing {
  let pair = POINT_LINES[parity][line];
  let a = CORNER_COORDS[pair[0] as usize];
  let b = CORNER_COORDS[pair[1] as usize];
  let mut ring = LineRing::EMPTY;
  let mut keys = [[0i32; 2]; MAX_RING];

  let dir = [
    b[0] as i32 - a[0] as i32,
    b[1] as i32 - a[1] as i32,
    b[2] as i32 - a[2] as i32,
  ];
  // Any axis perpendicular to the line, then v = dir × u keeps (u, v, dir)
  // right-handed.
  let u = if dir[0] == 0 {
    [1, 0, 0]
  } else if dir[1] == 0 {
    [0, 1, 0]
  } else {
    [0, 0, 1]
  };
  let v = cross_i32(dir, u);

  let mut cell = 0;
  while cell < 27 {
    let off = [(cell % 3) as i32 - 1, ((cell / 3) % 3) as i32 - 1, (cell / 9) as i32 - 1];
    let la = [a[0] as i32 - off[0], a[1] as i32 - off[1], a[2] as i32 - off[2]];
    let lb = [b[0] as i32 - off[0], b[1] as i32 - off[1], b[2] as i32 - off[2]];

    if is_unit_corner(la) && is_unit_corner(lb) {
      let flips = (off[0] & 1) + (off[1] & 1) + (off[2] & 1);
      let cell_parity = parity ^ (flips as usize & 1);
      let ia = corner_index(la[0] as u8, la[1] as u8, la[2] as u8);
      let ib = corner_index(lb[0] as u8, lb[1] as u8, lb[2] as u8);

      let mut tet = 0;
      while tet < TETS_PER_CELL {
        let corners = TET_CORNERS[cell_parity][tet];
        if contains_corner(corners, ia) && contains_corner(corners, ib) {
          if ring.len as usize >= MAX_RING {
            panic!("ring around a lattice line is too long");
          }

          // Centroid relative to the line midpoint, scaled by 4.
          let mut w = [
            4 * off[0] - 2 * (a[0] as i32 + b[0] as i32),
            4 * off[1] - 2 * (a[1] as i32 + b[1] as i32),
            4 * off[2] - 2 * (a[2] as i32 + b[2] as i32),
          ];
          let mut k = 0;
          while k < 4 {
            let c = CORNER_COORDS[corners[k] as usize];
            w[0] += c[0] as i32;
            w[1] += c[1] as i32;
            w[2] += c[2] as i32;
            k += 1;
          }

          let slot = ring.len as usize;
          ring.members[slot] = RingMember {
            cell: [off[0] as i8, off[1] as i8, off[2] as i8],
            tet: tet as u8,
          };
          keys[slot] = [dot_i32(w, u), dot_i32(w, v)];
          ring.len += 1;
        }
        tet += 1;
      }
    }
    cell += 1;
  }

  if ring.len != 4 && ring.len != 6 {
    panic!("ring around a lattice line must hold 4 or 6 tetrahedra");
  }

  // Insertion sort by angle around the line.
  let len = ring.len as usize;
  let mut i = 1;
  while i < len {
    let mut j = i;
    while j > 0 && angle_before(keys[j], keys[j - 1]) {
      let key = keys[j];
      keys[j] = keys[j - 1];
      keys[j - 1] = key;
      let member = ring.members[j];
      ring.members[j] = ring.members[j - 1];
      ring.members[j - 1] = member;
      j -= 1;
    }
    i += 1;
  }

  if len == MAX_RING {
    let mut start = 0;
    while start < len && ring.members[start].tet as usize != CENTER_TET {
      start += 1;
    }
    let mut rotated = ring.members;
    let mut k = 0;
    while k < len {
      rotated[k] = ring.members[(start + k) % len];
      k += 1;
    }
    ring.members = rotated;
  }

  ring
}

const fn min_u8(a: u8, b: u8) -> u8 {
  if a < b {
    a
  } else {
    b
  }
}

const fn is_unit_corner(c: [i32; 3]) -> bool {
  c[0] >= 0 && c[0] <= 1 && c[1] >= 0 && c[1] <= 1 && c[2] >= 0 && c[2] <= 1
}

const fn contains_corner(corners: [u8; 4], corner: u8) -> bool {
  corners[0] == corner || corners[1] == corner || corners[2] == corner || corners[3] == corner
}

const fn cross_i32(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
  [
    a[1] * b[2] - a[2] * b[1],
    a[2] * b[0] - a[0] * b[2],
    a[0] * b[1] - a[1] * b[0],
  ]
}

const fn dot_i32(a: [i32; 3], b: [i32; 3]) -> i32 {
  a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Half-plane first, then counter-clockwise order within the half-plane.
const fn angle_before(p: [i32; 2], q: [i32; 2]) -> bool {
  let hp = half_plane(p);
  let hq = half_plane(q);
  if hp != hq {
    return hp < hq;
  }
  p[0] * q[1] - p[1] * q[0] > 0
}

const fn half_plane(p: [i32; 2]) -> u8 {
  if p[1] > 0 || (p[1] == 0 && p[0] > 0) {
    0
  } else {
    1
  }
}

/// Cube corner coordinates of a tetrahedron as floats.
#[inline]
pub fn tet_corner_positions(parity: usize, tet: usize) -> [[f32; 3]; 4] {
  std::array::from_fn(|i| {
    let c = CORNER_COORDS[TET_CORNERS[parity][tet][i] as usize];
    [c[0] as f32, c[1] as f32, c[2] as f32]
  })
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;
