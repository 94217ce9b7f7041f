//! Triangulation of ring polygons.
//!
//! A ring of dual points closes into a polygon of 3 to 6 distinct corners.
//! Candidate splits are tried in order of preference. The first one whose
//! triangles all stay close to the ring normal is kept, otherwise the one
//! folding least.
//!
//! ```text
//!   4 corners                     6 corners
//!
//!   1. fold rule diagonal         1. ears at r0, r3 + quad (fold rule)
//!   2. other diagonal             2. ears at r0, r3 + quad (other diagonal)
//!                                 3. ears at r1, r4 / r2, r5
//!                                 4. fans from every corner
//!   5 corners: fans from every corner
//! ```

use glam::Vec3A;
use smallvec::{smallvec, SmallVec};

use super::fold::{ring_normal, split_quad};
use crate::constants::MIN_SPLIT_ALIGNMENT;
use crate::tables::MAX_RING;
use crate::tetrahedra::normals::face_normal;

/// Triangles of local corner indices.
pub type Triangulation = SmallVec<[[usize; 3]; MAX_RING - 2]>;

const QUAD_SPLITS: [[[usize; 3]; 2]; 2] = [[[0, 1, 2], [0, 2, 3]], [[0, 1, 3], [1, 2, 3]]];

/// Split a counter-clockwise polygon into triangles.
///
/// Polygons with fewer than 3 corners give no triangles.
pub fn triangulate(positions: &[Vec3A], normals: &[Vec3A]) -> Triangulation {
  if positions.len() < 3 {
    return Triangulation::new();
  }

  let reference = ring_normal(normals);
  let mut best: Option<(f32, Triangulation)> = None;

  for candidate in candidates(positions, normals) {
    let score = alignment(&candidate, positions, reference);
    if score >= MIN_SPLIT_ALIGNMENT {
      return candidate;
    }
    if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
      best = Some((score, candidate));
    }
  }

  best.map(|(_, triangles)| triangles).unwrap_or_default()
}

/// Smallest cosine between a triangle normal and `reference`.
///
/// Triangles without a derivable normal do not count.
fn alignment(triangles: &[[usize; 3]], positions: &[Vec3A], reference: Vec3A) -> f32 {
  triangles
    .iter()
    .filter_map(|tri| face_normal(positions[tri[0]], positions[tri[1]], positions[tri[2]]))
    .map(|n| n.dot(reference))
    .fold(f32::INFINITY, f32::min)
}

fn candidates(positions: &[Vec3A], normals: &[Vec3A]) -> SmallVec<[Triangulation; 12]> {
  let n = positions.len();
  let mut out = SmallVec::new();

  match n {
    3 => out.push(smallvec![[0, 1, 2]]),
    4 => {
      for split in quad_splits([0, 1, 2, 3], positions, normals) {
        out.push(split.iter().copied().collect());
      }
    }
    6 => {
      for k in 0..3 {
        let at = |i: usize| (k + i) % 6;
        let ears = [[at(5), at(0), at(1)], [at(2), at(3), at(4)]];
        for split in quad_splits([at(1), at(2), at(4), at(5)], positions, normals) {
          out.push(ears.iter().chain(&split).copied().collect());
        }
      }
    }
    _ => {}
  }

  if n > 4 {
    for apex in 0..n {
      out.push((1..n - 1).map(|i| [apex, (apex + i) % n, (apex + i + 1) % n]).collect());
    }
  }

  out
}

/// Both splits of the quad `corners`, fold rule first, as polygon indices.
fn quad_splits(corners: [usize; 4], positions: &[Vec3A], normals: &[Vec3A]) -> [[[usize; 3]; 2]; 2] {
  let preferred = split_quad(corners.map(|i| positions[i]), corners.map(|i| normals[i]));
  let other = if preferred == QUAD_SPLITS[0] {
    QUAD_SPLITS[1]
  } else {
    QUAD_SPLITS[0]
  };
  [preferred, other].map(|split| split.map(|tri| tri.map(|i| corners[i])))
}

#[cfg(test)]
#[path = "polygon_test.rs"]
mod polygon_test;
