//! Dual point placement for one surface triangle.
//!
//! The three crossing points each define a tangent plane (position plus
//! normal). Where the planes meet is the feature point the triangle
//! approximates. Nearly parallel normals fall back to the centroid.
//!
//! ```text
//!   plane a ╲     ╱ plane b       line = n_a × n_b
//!            ╲   ╱
//!             ╲ ╱                 corner = line ∩ plane c
//!   ───────────●─────────── plane c
//! ```

use glam::Vec3A;

use crate::constants::{COLINEAR_NORMAL_THRESHOLD, MAX_DUAL_OFFSET, NORMAL_SPREAD_SCALE, SLIVER_AREA_THRESHOLD};
use crate::tetrahedra::normals::corner_angles;

/// A position with its unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
  pub position: Vec3A,
  pub normal: Vec3A,
}

impl SurfacePoint {
  pub fn new(position: Vec3A, normal: Vec3A) -> Self {
    Self { position, normal }
  }
}

/// Parameter along `origin + slope * t` where the line meets the plane
/// through `plane_point` with normal `plane_normal`.
///
/// `None` when the line runs (nearly) parallel to the plane.
#[inline]
pub fn intersect_line_with_plane(
  origin: Vec3A,
  slope: Vec3A,
  plane_normal: Vec3A,
  plane_point: Vec3A,
) -> Option<f32> {
  let denom = slope.dot(plane_normal);
  let scale = slope.length() * plane_normal.length();
  if scale == 0.0 || denom.abs() <= 1e-6 * scale {
    return None;
  }
  Some(plane_normal.dot(plane_point - origin) / denom)
}

/// Place the dual point of one triangle.
pub fn tet_vert(p1: SurfacePoint, p2: SurfacePoint, p3: SurfacePoint) -> SurfacePoint {
  let centroid = (p1.position + p2.position + p3.position) / 3.0;
  let flat = SurfacePoint::new(centroid, p1.normal);

  let d1 = p2.normal - p1.normal;
  let d2 = p3.normal - p2.normal;
  let d3 = p1.normal - p3.normal;
  let (l1, l2, l3) = (d1.length(), d2.length(), d3.length());

  if l1 + l2 + l3 <= COLINEAR_NORMAL_THRESHOLD {
    return flat;
  }
  if d1.cross(d2).length() * 0.5 * NORMAL_SPREAD_SCALE < SLIVER_AREA_THRESHOLD {
    return flat;
  }

  // The most divergent pair spans the best conditioned line.
  let (a, b, c) = if l1 >= l2 && l1 >= l3 {
    (p1, p2, p3)
  } else if l2 >= l3 {
    (p2, p3, p1)
  } else {
    (p3, p1, p2)
  };

  let position = plane_corner(a, b, c)
    .filter(|p| p.distance(centroid) <= MAX_DUAL_OFFSET)
    .unwrap_or(centroid);

  SurfacePoint::new(position, blended_normal(p1, p2, p3))
}

/// Average two placements, as for a tetrahedron cut by a quad.
pub fn merge(a: SurfacePoint, b: SurfacePoint) -> SurfacePoint {
  SurfacePoint {
    position: (a.position + b.position) * 0.5,
    normal: (a.normal + b.normal).try_normalize().unwrap_or(a.normal),
  }
}

/// Angle-weighted sum of the corner normals.
fn blended_normal(p1: SurfacePoint, p2: SurfacePoint, p3: SurfacePoint) -> Vec3A {
  let [a1, a2, a3] = corner_angles(p1.position, p2.position, p3.position);
  (p1.normal * a1 + p2.normal * a2 + p3.normal * a3)
    .try_normalize()
    .or_else(|| (p1.normal + p2.normal + p3.normal).try_normalize())
    .unwrap_or(p1.normal)
}

/// Point shared by the tangent planes of `a`, `b` and `c`.
///
/// Walks from `a` inside its own plane, perpendicular to the `a`/`b` line,
/// onto the plane of `b`, then along that line onto the plane of `c`.
fn plane_corner(a: SurfacePoint, b: SurfacePoint, c: SurfacePoint) -> Option<Vec3A> {
  let line_dir = a.normal.cross(b.normal);
  let in_plane = a.normal.cross(line_dir);

  let s = intersect_line_with_plane(a.position, in_plane, b.normal, b.position)?;
  let on_line = a.position + in_plane * s;

  let t = intersect_line_with_plane(on_line, line_dir, c.normal, c.position)?;
  let corner = on_line + line_dir * t;
  corner.is_finite().then_some(corner)
}

#[cfg(test)]
#[path = "tet_vert_test.rs"]
mod tet_vert_test;
