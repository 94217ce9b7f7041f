use super::*;

#[test]
fn test_corner_index_matches_coords() {
  for (corner, coords) in CORNER_COORDS.iter().enumerate() {
    assert_eq!(
      corner_index(coords[0], coords[1], coords[2]) as usize,
      corner,
      "Corner {} has coords {:?}",
      corner,
      coords
    );
  }
}

#[test]
fn test_parity_alternates_along_each_axis() {
  assert_eq!(parity(0, 0, 0), 0);
  assert_eq!(parity(1, 0, 0), 1);
  assert_eq!(parity(0, 1, 0), 1);
  assert_eq!(parity(0, 0, 1), 1);
  assert_eq!(parity(1, 1, 0), 0);
  assert_eq!(parity(3, 4, 5), 0);
}

#[test]
fn test_snap_thresholds_are_small() {
  assert!(SNAP_INSIDE_EPSILON < SNAP_OUTSIDE_EPSILON);
  assert!(SNAP_OUTSIDE_EPSILON < 0.01);
}

#[test]
fn test_normal_spread_scale() {
  let expected = 1.0 / (3.0f32.sqrt() / 18.0).sqrt();
  assert!((NORMAL_SPREAD_SCALE - expected).abs() < 1e-5);
}
