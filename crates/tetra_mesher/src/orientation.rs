//! Orientation as a rotation vector ("log quaternion").
//!
//! A [`LogQuat`] stores `axis * angle`. Rotation vectors add linearly, so
//! several orientations can be blended by a weighted sum and converted back
//! to a rotation once at the end.
//!
//! ```text
//!   spin = axis * angle            |spin| = angle in radians
//!   quat = exp(spin / 2)           glam::Quat::from_scaled_axis
//!   blend(a, b, w) = a + b * w     linear in spin space
//! ```
//!
//! The frame convention is right-handed with +Y up and +Z forward:
//! `right × up = forward`.

use glam::{Mat3, Quat, Vec3, Vec3A};

/// Rotation stored as `axis * angle`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LogQuat {
  spin: Vec3A,
}

impl LogQuat {
  /// No rotation.
  pub const IDENTITY: LogQuat = LogQuat { spin: Vec3A::ZERO };

  /// Rotation by `angle` radians about `axis`. A zero axis gives identity.
  pub fn from_axis_angle(axis: Vec3A, angle: f32) -> Self {
    match axis.try_normalize() {
      Some(axis) => Self { spin: axis * angle },
      None => Self::IDENTITY,
    }
  }

  /// Use an already scaled rotation vector as is.
  pub const fn from_raw_spin(x: f32, y: f32, z: f32) -> Self {
    Self {
      spin: Vec3A::new(x, y, z),
    }
  }

  /// Rotation taking the X, Y and Z axes onto `right`, `up` and `forward`.
  ///
  /// The basis should be orthonormal and right-handed.
  pub fn from_basis(right: Vec3A, up: Vec3A, forward: Vec3A) -> Self {
    let matrix = Mat3::from_cols(right.into(), up.into(), forward.into());
    Self::from_quat(Quat::from_mat3(&matrix))
  }

  /// Frame looking along `forward` with `up` as the roll hint.
  ///
  /// Without a usable hint, +Y is used unless `forward` is nearly vertical,
  /// then +Z.
  pub fn from_look_at(forward: Vec3A, up: Option<Vec3A>) -> Self {
    let Some(forward) = forward.try_normalize() else {
      return Self::IDENTITY;
    };

    let hint = up
      .and_then(|up| up.cross(forward).try_normalize().map(|_| up))
      .unwrap_or(if forward.y.abs() > 0.99 { Vec3A::Z } else { Vec3A::Y });

    let right = hint.cross(forward).normalize();
    let up = forward.cross(right);
    Self::from_basis(right, up, forward)
  }

  /// Shortest rotation taking +Y onto `normal`.
  pub fn from_normal(normal: Vec3A) -> Self {
    Self::between(Vec3A::Y, normal)
  }

  /// Orientation of the plane spanned by two edge vectors, using their
  /// cross product as the normal.
  pub fn from_edge_deltas(first: Vec3A, second: Vec3A) -> Self {
    Self::from_normal(first.cross(second))
  }

  /// Shortest rotation taking direction `from` onto `to`.
  ///
  /// Either vector being zero gives identity.
  pub fn between(from: Vec3A, to: Vec3A) -> Self {
    match (from.try_normalize(), to.try_normalize()) {
      (Some(from), Some(to)) => Self::from_quat(Quat::from_rotation_arc(from.into(), to.into())),
      _ => Self::IDENTITY,
    }
  }

  fn from_quat(quat: Quat) -> Self {
    Self {
      spin: quat.to_scaled_axis().into(),
    }
  }

  /// Weighted sum `self + other * weight`.
  #[inline]
  pub fn add(self, other: LogQuat, weight: f32) -> Self {
    Self {
      spin: self.spin + other.spin * weight,
    }
  }

  /// In-place [`LogQuat::add`].
  #[inline]
  pub fn accumulate(&mut self, other: LogQuat, weight: f32) {
    self.spin += other.spin * weight;
  }

  /// The rotation vector.
  #[inline]
  pub fn spin(&self) -> Vec3A {
    self.spin
  }

  /// Rotation angle in radians.
  #[inline]
  pub fn angle(&self) -> f32 {
    self.spin.length()
  }

  /// Unit rotation axis, +Y for the identity.
  pub fn axis(&self) -> Vec3A {
    self.spin.try_normalize().unwrap_or(Vec3A::Y)
  }

  pub fn to_quat(&self) -> Quat {
    Quat::from_scaled_axis(Vec3::from(self.spin))
  }

  /// Rotate a vector.
  #[inline]
  pub fn apply(&self, v: Vec3A) -> Vec3A {
    self.to_quat() * v
  }

  /// The rotated +Y axis.
  pub fn up(&self) -> Vec3A {
    self.apply(Vec3A::Y)
  }

  /// The rotated +X axis.
  pub fn right(&self) -> Vec3A {
    self.apply(Vec3A::X)
  }

  /// The rotated +Z axis.
  pub fn forward(&self) -> Vec3A {
    self.apply(Vec3A::Z)
  }
}

/// Average directions by blending their rotations away from the first one.
///
/// Zero vectors are ignored. Returns `None` if the first direction is zero.
pub fn blend_directions(directions: &[Vec3A]) -> Option<Vec3A> {
  let base = directions.first()?.try_normalize()?;
  let weight = 1.0 / directions.len() as f32;

  let mut blended = LogQuat::IDENTITY;
  for direction in directions {
    blended.accumulate(LogQuat::between(base, *direction), weight);
  }

  Some(blended.apply(base))
}

#[cfg(test)]
#[path = "orientation_test.rs"]
mod orientation_test;
