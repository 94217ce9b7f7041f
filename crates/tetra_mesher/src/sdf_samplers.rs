//! Simple analytic fields for testing, benchmarking and debugging.
//!
//! These samplers implement deterministic mathematical fields that are easy
//! to verify visually. All of them follow the mesher's sign convention:
//! values `>= 0` are inside.

use crate::types::GridDims;

/// A scalar field defined over world space.
pub trait FieldSampler: Send + Sync {
  /// Field value at a world position, `>= 0` inside.
  fn sample(&self, position: [f64; 3]) -> f32;

  /// Sample a grid whose sample `(i, j, k)` sits at
  /// `(origin + (i, j, k)) * voxel_size`, in mesher layout.
  fn sample_grid(&self, origin: [i64; 3], dims: GridDims, voxel_size: f64) -> Vec<f32> {
    let mut samples = Vec::with_capacity(dims.sample_count());
    for z in 0..dims.z {
      for y in 0..dims.y {
        for x in 0..dims.x {
          let position = [
            (origin[0] + x as i64) as f64 * voxel_size,
            (origin[1] + y as i64) as f64 * voxel_size,
            (origin[2] + z as i64) as f64 * voxel_size,
          ];
          samples.push(self.sample(position));
        }
      }
    }
    samples
  }
}

/// Tilted plane sampler.
///
/// Creates a plane tilted around Z through `(0, height, 0)`. The surface
/// crosses many cells at a predictable angle.
///
/// Field: `x * sin(angle) - (y - height) * cos(angle)`
/// Default: plane tilted 45°, inside below it.
#[derive(Clone)]
pub struct TiltedPlaneSampler {
  /// Height offset of the plane (default: 0.0)
  pub height: f64,
  /// Tilt angle in radians (default: π/4 = 45°)
  pub angle: f64,
}

impl Default for TiltedPlaneSampler {
  fn default() -> Self {
    Self {
      height: 0.0,
      angle: std::f64::consts::FRAC_PI_4, // 45 degrees
    }
  }
}

impl TiltedPlaneSampler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_height(mut self, height: f64) -> Self {
    self.height = height;
    self
  }

  pub fn with_angle_degrees(mut self, degrees: f64) -> Self {
    self.angle = degrees.to_radians();
    self
  }
}

impl FieldSampler for TiltedPlaneSampler {
  fn sample(&self, [x, y, _]: [f64; 3]) -> f32 {
    (x * self.angle.sin() - (y - self.height) * self.angle.cos()) as f32
  }
}

/// Sphere sampler.
///
/// Field: `radius - |p - center|`, positive inside the ball.
#[derive(Clone)]
pub struct SphereSampler {
  /// Center of the sphere in world coordinates
  pub center: [f64; 3],
  /// Radius of the sphere
  pub radius: f64,
}

impl Default for SphereSampler {
  fn default() -> Self {
    Self {
      center: [0.0, 0.0, 0.0],
      radius: 20.0,
    }
  }
}

impl SphereSampler {
  pub fn new(radius: f64) -> Self {
    Self {
      center: [0.0, 0.0, 0.0],
      radius,
    }
  }

  pub fn with_center(mut self, center: [f64; 3]) -> Self {
    self.center = center;
    self
  }
}

impl FieldSampler for SphereSampler {
  fn sample(&self, p: [f64; 3]) -> f32 {
    let dx = p[0] - self.center[0];
    let dy = p[1] - self.center[1];
    let dz = p[2] - self.center[2];
    (self.radius - (dx * dx + dy * dy + dz * dz).sqrt()) as f32
  }
}

/// Horizontal plane sampler (ground plane).
///
/// Solid below `height`. Good baseline test.
#[derive(Clone, Default)]
pub struct GroundPlaneSampler {
  /// Height of the ground plane
  pub height: f64,
}

impl GroundPlaneSampler {
  pub fn new(height: f64) -> Self {
    Self { height }
  }
}

impl FieldSampler for GroundPlaneSampler {
  fn sample(&self, [_, y, _]: [f64; 3]) -> f32 {
    (self.height - y) as f32
  }
}

/// Axis-aligned box sampler.
#[derive(Clone)]
pub struct BoxSampler {
  /// Center of the box
  pub center: [f64; 3],
  /// Half-extents (half-size in each dimension)
  pub half_extents: [f64; 3],
}

impl Default for BoxSampler {
  fn default() -> Self {
    Self {
      center: [0.0, 0.0, 0.0],
      half_extents: [10.0, 10.0, 10.0],
    }
  }
}

impl BoxSampler {
  pub fn new(half_extents: [f64; 3]) -> Self {
    Self {
      center: [0.0, 0.0, 0.0],
      half_extents,
    }
  }

  pub fn with_center(mut self, center: [f64; 3]) -> Self {
    self.center = center;
    self
  }
}

impl FieldSampler for BoxSampler {
  fn sample(&self, p: [f64; 3]) -> f32 {
    let dx = (p[0] - self.center[0]).abs() - self.half_extents[0];
    let dy = (p[1] - self.center[1]).abs() - self.half_extents[1];
    let dz = (p[2] - self.center[2]).abs() - self.half_extents[2];

    let outside = (dx.max(0.0).powi(2) + dy.max(0.0).powi(2) + dz.max(0.0).powi(2)).sqrt();
    let inside = dx.max(dy).max(dz).min(0.0);
    -(outside + inside) as f32
  }
}

/// Torus sampler, ring in the XZ plane.
#[derive(Clone)]
pub struct TorusSampler {
  pub center: [f64; 3],
  /// Distance from the center to the tube center line.
  pub major_radius: f64,
  /// Tube radius.
  pub minor_radius: f64,
}

impl TorusSampler {
  pub fn new(major_radius: f64, minor_radius: f64) -> Self {
    Self {
      center: [0.0, 0.0, 0.0],
      major_radius,
      minor_radius,
    }
  }

  pub fn with_center(mut self, center: [f64; 3]) -> Self {
    self.center = center;
    self
  }
}

impl FieldSampler for TorusSampler {
  fn sample(&self, p: [f64; 3]) -> f32 {
    let dx = p[0] - self.center[0];
    let dy = p[1] - self.center[1];
    let dz = p[2] - self.center[2];
    let ring = (dx * dx + dz * dz).sqrt() - self.major_radius;
    (self.minor_radius - (ring * ring + dy * dy).sqrt()) as f32
  }
}

/// Metaball (blobby) sampler.
///
/// Each metaball contributes `strength * r² / d²` to the field. The surface
/// appears where the combined field equals the threshold.
#[derive(Clone)]
pub struct MetaballsSampler {
  /// Individual metaballs
  pub balls: Vec<Metaball>,
  /// Field threshold for surface (default: 1.0)
  pub threshold: f64,
}

/// A single metaball influence.
#[derive(Clone, Copy)]
pub struct Metaball {
  /// Center position in world coordinates
  pub center: [f64; 3],
  /// Radius of influence
  pub radius: f64,
  /// Strength of the influence (typically 1.0)
  pub strength: f64,
}

impl MetaballsSampler {
  pub fn new(balls: Vec<Metaball>, threshold: f64) -> Self {
    Self { balls, threshold }
  }

  /// Scatter `count` metaballs within `[-extent, extent]³`, seeded.
  pub fn random(seed: u32, count: usize, extent: f64) -> Self {
    let mut balls = Vec::with_capacity(count);
    let mut rng = XorShift32::new(seed);

    for _ in 0..count {
      let x = (rng.next_f64() * 2.0 - 1.0) * extent;
      let y = (rng.next_f64() * 2.0 - 1.0) * extent;
      let z = (rng.next_f64() * 2.0 - 1.0) * extent;

      // Random radius [extent * 0.1, extent * 0.4]
      let radius = extent * (0.1 + rng.next_f64() * 0.3);

      balls.push(Metaball {
        center: [x, y, z],
        radius,
        strength: 1.0,
      });
    }

    Self {
      balls,
      threshold: 1.0,
    }
  }
}

impl FieldSampler for MetaballsSampler {
  fn sample(&self, p: [f64; 3]) -> f32 {
    let mut field = 0.0;
    for ball in &self.balls {
      let dx = p[0] - ball.center[0];
      let dy = p[1] - ball.center[1];
      let dz = p[2] - ball.center[2];
      let dist_sq = dx * dx + dy * dy + dz * dz;

      let r_sq = ball.radius * ball.radius;
      if dist_sq < r_sq * 0.01 {
        // Very close to center - large contribution
        field += ball.strength * 100.0;
      } else {
        field += ball.strength * r_sq / dist_sq;
      }
    }

    (field - self.threshold) as f32
  }
}

/// Simple xorshift32 PRNG for deterministic random generation.
struct XorShift32 {
  state: u32,
}

impl XorShift32 {
  fn new(seed: u32) -> Self {
    // Ensure non-zero state
    Self {
      state: if seed == 0 { 1 } else { seed },
    }
  }

  fn next(&mut self) -> u32 {
    let mut x = self.state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    self.state = x;
    x
  }

  fn next_f64(&mut self) -> f64 {
    self.next() as f64 / u32::MAX as f64
  }
}
