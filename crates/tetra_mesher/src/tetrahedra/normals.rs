//! Face and vertex normal computation using glam SIMD.
//!
//! Vertex normals use angle-weighted averaging (Thürmer & Wüthrich, "Mean
//! Weighted by Angle"): each face contributes its unit normal scaled by the
//! interior angle at the vertex.
//!
//! Reference: Thürmer, G. & Wüthrich, C.A. (1998). Computing Vertex Normals
//! from Polygonal Facets. Journal of Graphics Tools, 3(1), 43-46.

use glam::Vec3A;

use crate::constants::{DEGENERATE_EPSILON_SQ, FALLBACK_NORMAL};

/// True if any two positions are bit-identical.
#[inline]
pub fn is_degenerate(p0: Vec3A, p1: Vec3A, p2: Vec3A) -> bool {
  p0 == p1 || p1 == p2 || p2 == p0
}

/// Unit normal of a counter-clockwise triangle.
///
/// Tries the cross product at each of the 3 corners in turn, since a near
/// zero product at one corner can still be resolved at another. Returns
/// `None` if all three are degenerate.
#[inline]
pub fn face_normal(p0: Vec3A, p1: Vec3A, p2: Vec3A) -> Option<Vec3A> {
  let candidates = [
    (p1 - p0).cross(p2 - p0),
    (p2 - p1).cross(p0 - p1),
    (p0 - p2).cross(p1 - p2),
  ];

  candidates.into_iter().find_map(|n| {
    let len_sq = n.length_squared();
    (len_sq >= DEGENERATE_EPSILON_SQ).then(|| n * len_sq.sqrt().recip())
  })
}

/// Angle between two edge vectors at a vertex.
///
/// Returns the angle in radians using the formula: acos(dot(a, b) / (|a| *
/// |b|))
#[inline]
pub fn vertex_angle(e1: Vec3A, e2: Vec3A) -> f32 {
  let len1_sq = e1.length_squared();
  let len2_sq = e2.length_squared();

  if len1_sq <= DEGENERATE_EPSILON_SQ || len2_sq <= DEGENERATE_EPSILON_SQ {
    return 0.0;
  }

  let dot = e1.dot(e2);
  let cos_angle = dot / (len1_sq.sqrt() * len2_sq.sqrt());

  // Clamp to [-1, 1] to handle floating point errors
  cos_angle.clamp(-1.0, 1.0).acos()
}

/// Interior angles at the 3 corners of a triangle.
#[inline]
pub fn corner_angles(p0: Vec3A, p1: Vec3A, p2: Vec3A) -> [f32; 3] {
  let e01 = p1 - p0;
  let e02 = p2 - p0;
  let e12 = p2 - p1;
  [
    vertex_angle(e01, e02),
    vertex_angle(-e01, e12),
    vertex_angle(-e02, -e12),
  ]
}

/// Add a face's angle-weighted contribution to its 3 vertex accumulators.
#[inline]
pub fn accumulate(normals: &mut [Vec3A], ids: [u32; 3], positions: [Vec3A; 3], unit_normal: Vec3A) {
  let angles = corner_angles(positions[0], positions[1], positions[2]);
  for (id, angle) in ids.into_iter().zip(angles) {
    normals[id as usize] += unit_normal * angle;
  }
}

/// Normalize an accumulated normal, falling back to +Y.
#[inline]
pub fn finalize(normal: Vec3A) -> Vec3A {
  normal
    .try_normalize()
    .unwrap_or(Vec3A::from_array(FALLBACK_NORMAL))
}

#[cfg(test)]
#[path = "normals_test.rs"]
mod normals_test;
