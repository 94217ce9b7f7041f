//! Quad diagonal selection.
//!
//! A quad of dual points is split along one of its two diagonals. The
//! split follows the surface: on a ridge the higher diagonal is kept, in a
//! valley the lower one.
//!
//! ```text
//!   p3 ─────── p2        fold: is the p0-p2 diagonal above p1-p3
//!   │ ╲      ╱ │               along the reference normal?
//!   │   ╲  ╱   │
//!   │   ╱  ╲   │         convex: do the corner normals diverge?
//!   │ ╱      ╲ │
//!   p0 ─────── p1        split 0-2 when fold == convex, else 1-3
//! ```

use glam::Vec3A;

use crate::constants::FALLBACK_NORMAL;
use crate::orientation::blend_directions;

/// Order of a normal's absolute components, largest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AxisOrder {
  /// x > y > z
  Xyz = 0,
  /// x > z >= y
  Xzy = 1,
  /// z >= x > y
  Zxy = 2,
  /// y >= x > z
  Yxz = 3,
  /// y > z >= x
  Yzx = 4,
  /// z >= y >= x
  Zyx = 5,
}

impl AxisOrder {
  /// Index of the largest component.
  #[inline]
  pub fn major_axis(self) -> usize {
    match self {
      AxisOrder::Xyz | AxisOrder::Xzy => 0,
      AxisOrder::Yxz | AxisOrder::Yzx => 1,
      AxisOrder::Zxy | AxisOrder::Zyx => 2,
    }
  }
}

/// Sign octant and axis order of a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalState {
  /// Bit 1, 2, 4 set for a negative x, y, z component.
  pub dir: u8,
  pub largest: AxisOrder,
}

impl NormalState {
  /// Signed unit vector along the largest component.
  pub fn dominant_axis(&self) -> Vec3A {
    let axis = self.largest.major_axis();
    let mut v = Vec3A::ZERO;
    v[axis] = if self.dir & (1 << axis) != 0 { -1.0 } else { 1.0 };
    v
  }
}

/// Classify a direction by sign octant and component order.
pub fn normal_state(n: Vec3A) -> NormalState {
  let dir = (n.x < 0.0) as u8 | ((n.y < 0.0) as u8) << 1 | ((n.z < 0.0) as u8) << 2;
  let (bx, by, bz) = (n.x.abs(), n.y.abs(), n.z.abs());

  let largest = if bx > by {
    if bx > bz {
      if by > bz {
        AxisOrder::Xyz
      } else {
        AxisOrder::Xzy
      }
    } else {
      AxisOrder::Zxy
    }
  } else if by > bz {
    if bx > bz {
      AxisOrder::Yxz
    } else {
      AxisOrder::Yzx
    }
  } else {
    AxisOrder::Zyx
  };

  NormalState { dir, largest }
}

/// True if the `p1`-`p3` diagonal passes above the `p2`-`p4` diagonal
/// along `normal`.
///
/// Measured between the closest points of the two diagonal lines.
/// Parallel or zero-length diagonals report no fold.
pub fn get_fold(normal: Vec3A, p1: Vec3A, p2: Vec3A, p3: Vec3A, p4: Vec3A) -> bool {
  let d1 = p3 - p1;
  let d2 = p4 - p2;
  let r = p1 - p2;

  let a = d1.length_squared();
  let e = d2.length_squared();
  if a <= f32::EPSILON || e <= f32::EPSILON {
    return false;
  }

  let b = d1.dot(d2);
  let c = d1.dot(r);
  let f = d2.dot(r);
  let denom = a * e - b * b;
  if denom <= f32::EPSILON * a * e {
    return false;
  }

  let s = (b * f - c * e) / denom;
  let u = (a * f - b * c) / denom;
  let on_first = p1 + d1 * s;
  let on_second = p2 + d2 * u;

  (on_first - on_second).dot(normal) > 0.0
}

/// Blend of a ring's corner normals, `+Y` if they cancel out.
pub fn ring_normal(normals: &[Vec3A]) -> Vec3A {
  blend_directions(normals)
    .or_else(|| normals.iter().copied().sum::<Vec3A>().try_normalize())
    .unwrap_or(Vec3A::from_array(FALLBACK_NORMAL))
}

/// Reference direction for a set of corner normals: the dominant signed
/// axis of their blend.
pub fn reference_axis(normals: &[Vec3A]) -> Vec3A {
  normal_state(ring_normal(normals)).dominant_axis()
}

/// Split a counter-clockwise quad into two triangles of local indices.
pub fn split_quad(positions: [Vec3A; 4], normals: [Vec3A; 4]) -> [[usize; 3]; 2] {
  let [p0, p1, p2, p3] = positions;
  let [n0, n1, n2, n3] = normals;

  let reference = reference_axis(&normals);
  let fold = get_fold(reference, p0, p1, p2, p3);
  let convex = (n2 - n0).dot(p2 - p0) + (n3 - n1).dot(p3 - p1) >= 0.0;

  if fold == convex {
    [[0, 1, 2], [0, 2, 3]]
  } else {
    [[0, 1, 3], [1, 2, 3]]
  }
}

#[cfg(test)]
#[path = "fold_test.rs"]
mod fold_test;
