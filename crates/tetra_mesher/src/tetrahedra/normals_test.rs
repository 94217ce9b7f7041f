use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::*;

#[test]
fn test_face_normal_ccw() {
  let n = face_normal(Vec3A::ZERO, Vec3A::X, Vec3A::Y).unwrap();
  assert!((n - Vec3A::Z).length() < 1e-6);

  let flipped = face_normal(Vec3A::ZERO, Vec3A::Y, Vec3A::X).unwrap();
  assert!((flipped + Vec3A::Z).length() < 1e-6);
}

#[test]
fn test_face_normal_colinear_is_none() {
  let n = face_normal(Vec3A::ZERO, Vec3A::X, Vec3A::X * 2.0);
  assert!(n.is_none());
}

#[test]
fn test_face_normal_tiny_triangle_is_none() {
  let n = face_normal(Vec3A::ZERO, Vec3A::X * 1e-5, Vec3A::Y * 1e-5);
  assert!(n.is_none());
}

#[test]
fn test_degenerate_detection() {
  let p = Vec3A::new(1.0, 2.0, 3.0);
  assert!(is_degenerate(p, p, Vec3A::ZERO));
  assert!(is_degenerate(Vec3A::ZERO, p, p));
  assert!(is_degenerate(p, Vec3A::ZERO, p));
  assert!(!is_degenerate(p, Vec3A::ZERO, Vec3A::X));
}

#[test]
fn test_vertex_angle() {
  assert!((vertex_angle(Vec3A::X, Vec3A::Y) - FRAC_PI_2).abs() < 1e-6);
  assert!((vertex_angle(Vec3A::X, Vec3A::new(1.0, 1.0, 0.0)) - FRAC_PI_4).abs() < 1e-6);
  assert!((vertex_angle(Vec3A::X, -Vec3A::X) - PI).abs() < 1e-6);
  assert_eq!(vertex_angle(Vec3A::ZERO, Vec3A::Y), 0.0);
}

#[test]
fn test_corner_angles_sum_to_pi() {
  let angles = corner_angles(
    Vec3A::new(0.3, -1.0, 0.2),
    Vec3A::new(2.0, 0.5, -0.7),
    Vec3A::new(-0.4, 1.5, 1.1),
  );
  assert!((angles.iter().sum::<f32>() - PI).abs() < 1e-5);
}

#[test]
fn test_accumulate_weights_by_angle() {
  // Right triangle: the right-angle corner gets twice the weight of the
  // 45 degree corners.
  let mut normals = vec![Vec3A::ZERO; 3];
  let positions = [Vec3A::ZERO, Vec3A::X, Vec3A::Y];
  accumulate(&mut normals, [0, 1, 2], positions, Vec3A::Z);

  assert!((normals[0].z - FRAC_PI_2).abs() < 1e-6);
  assert!((normals[1].z - FRAC_PI_4).abs() < 1e-6);
  assert!((normals[2].z - FRAC_PI_4).abs() < 1e-6);
}

#[test]
fn test_accumulate_blends_faces() {
  let mut normals = vec![Vec3A::ZERO; 4];
  accumulate(&mut normals, [0, 1, 2], [Vec3A::ZERO, Vec3A::X, Vec3A::Y], Vec3A::Z);
  accumulate(&mut normals, [0, 2, 3], [Vec3A::ZERO, Vec3A::Y, Vec3A::Z], Vec3A::X);

  let shared = finalize(normals[0]);
  let expected = Vec3A::new(1.0, 0.0, 1.0).normalize();
  assert!((shared - expected).length() < 1e-6);
}

#[test]
fn test_finalize_fallback() {
  assert_eq!(finalize(Vec3A::ZERO), Vec3A::Y);
  assert!((finalize(Vec3A::new(0.0, 0.0, 3.0)) - Vec3A::Z).length() < 1e-6);
}
