//! Crossing scanner.
//!
//! Walks every lattice point and tests its 6 lines for a sign change. Each
//! crossing becomes one shared surface point, so the 4 or 6 tetrahedra that
//! meet at a line all reference the same point.
//!
//! ```text
//!   inside (f >= 0)                outside (f < 0)
//!        ●━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━○
//!        │◄──── t = f_in / (f_in - f_out) ──►
//!        │
//!        t < 1e-4       snap onto inside corner
//!        t > 1 - 1e-3   snap onto outside corner
//! ```
//!
//! Snapped crossings are merged through a per-sample cache, so every line
//! snapping onto the same corner shares a single point.

use glam::Vec3A;

use crate::constants::{parity, CORNER_COORDS, SNAP_INSIDE_EPSILON, SNAP_OUTSIDE_EPSILON};
use crate::tables::POINT_LINES;
use crate::types::{GridDims, ScalarField, NO_POINT};

/// True for samples inside the surface. NaN is neither inside nor outside.
#[inline(always)]
pub fn is_inside(value: f32) -> bool {
  value >= 0.0
}

/// True for samples outside the surface.
#[inline(always)]
pub fn is_outside(value: f32) -> bool {
  value < 0.0
}

/// True if the surface crosses between two samples.
#[inline(always)]
pub fn crosses(a: f32, b: f32) -> bool {
  (is_inside(a) && is_outside(b)) || (is_outside(a) && is_inside(b))
}

/// Which endpoint, if any, a crossing snapped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Snap {
  None,
  Inside,
  Outside,
}

/// A sign change between two samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
  /// True if the first sample passed to [`crossing`] is the inside one.
  pub first_inside: bool,
  /// Parameter measured from the inside sample, in `[0, 1]`.
  pub t: f32,
  pub snap: Snap,
}

/// Locate the crossing between samples `a` and `b`, if any.
///
/// `t` is always measured from the inside sample, so swapping the arguments
/// only flips `first_inside`.
#[inline]
pub fn crossing(a: f32, b: f32) -> Option<Crossing> {
  let (first_inside, f_in, f_out) = if is_inside(a) && is_outside(b) {
    (true, a, b)
  } else if is_outside(a) && is_inside(b) {
    (false, b, a)
  } else {
    return None;
  };

  let t = f_in / (f_in - f_out);
  let snap = if t < SNAP_INSIDE_EPSILON {
    Snap::Inside
  } else if t > 1.0 - SNAP_OUTSIDE_EPSILON {
    Snap::Outside
  } else {
    Snap::None
  };

  Some(Crossing { first_inside, t, snap })
}

/// A surface point on a lattice line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossingPoint {
  /// Position in grid units.
  pub position: Vec3A,
  /// Sample indices, inside first.
  pub samples: [u32; 2],
  /// Parameter from `samples[0]`. Exactly 0 or 1 for snapped points.
  pub t: f32,
}

/// Buffers written by [`scan`], reused across runs.
#[derive(Debug, Default)]
pub struct ScanBuffers {
  /// Surface points in discovery order.
  pub points: Vec<CrossingPoint>,
  /// Point id per `(sample, line)` slot, [`NO_POINT`] where uncrossed.
  pub slot_ids: Vec<u32>,
  /// Bit `l` set if line `l` of the sample crosses.
  pub crossing_bits: Vec<u8>,
  /// Point id already snapped onto a sample.
  pub merge_cache: Vec<u32>,
}

impl ScanBuffers {
  /// Size and reset the per-sample buffers, keeping capacity.
  pub fn prepare(&mut self, dims: GridDims) {
    let samples = dims.sample_count();
    self.points.clear();
    self.slot_ids.clear();
    self.slot_ids.resize(dims.line_slot_count(), NO_POINT);
    self.crossing_bits.clear();
    self.crossing_bits.resize(samples, 0);
    self.merge_cache.clear();
    self.merge_cache.resize(samples, NO_POINT);
  }

  /// Point id at `(sample, line)`.
  #[inline(always)]
  pub fn point_at(&self, sample: usize, line: usize) -> u32 {
    self.slot_ids[GridDims::line_slot(sample, line)]
  }

  /// Point id snapped onto `corner`, allocating it on first use.
  fn snapped(&mut self, corner: usize, inside: usize, outside: usize, dims: GridDims) -> u32 {
    let cached = self.merge_cache[corner];
    if cached != NO_POINT {
      return cached;
    }

    let [x, y, z] = dims.coords(corner);
    let id = self.points.len() as u32;
    self.points.push(CrossingPoint {
      position: Vec3A::new(x as f32, y as f32, z as f32),
      samples: [inside as u32, outside as u32],
      t: if corner == inside { 0.0 } else { 1.0 },
    });
    self.merge_cache[corner] = id;
    id
  }
}

/// Find every crossed line of the field.
///
/// Lines leaving the grid are never crossed. Returns the number of surface
/// points allocated.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tetrahedra::scan"))]
pub fn scan(field: &ScalarField, buffers: &mut ScanBuffers) -> usize {
  let dims = field.dims;
  buffers.prepare(dims);

  for z in 0..dims.z {
    for y in 0..dims.y {
      for x in 0..dims.x {
        let base = dims.index(x, y, z);
        let lines = &POINT_LINES[parity(x, y, z)];

        for (line, pair) in lines.iter().enumerate() {
          let ca = CORNER_COORDS[pair[0] as usize];
          let cb = CORNER_COORDS[pair[1] as usize];
          let (ax, ay, az) = (x + ca[0] as usize, y + ca[1] as usize, z + ca[2] as usize);
          let (bx, by, bz) = (x + cb[0] as usize, y + cb[1] as usize, z + cb[2] as usize);
          if ax.max(bx) >= dims.x || ay.max(by) >= dims.y || az.max(bz) >= dims.z {
            continue;
          }

          let ia = dims.index(ax, ay, az);
          let ib = dims.index(bx, by, bz);
          let Some(hit) = crossing(field.value(ia), field.value(ib)) else {
            continue;
          };

          let (inside, outside) = if hit.first_inside { (ia, ib) } else { (ib, ia) };
          let id = match hit.snap {
            Snap::Inside => buffers.snapped(inside, inside, outside, dims),
            Snap::Outside => buffers.snapped(outside, inside, outside, dims),
            Snap::None => {
              let p_in = lattice_position(dims, inside);
              let p_out = lattice_position(dims, outside);
              let id = buffers.points.len() as u32;
              buffers.points.push(CrossingPoint {
                position: p_in + (p_out - p_in) * hit.t,
                samples: [inside as u32, outside as u32],
                t: hit.t,
              });
              id
            }
          };

          buffers.slot_ids[GridDims::line_slot(base, line)] = id;
          buffers.crossing_bits[base] |= 1 << line;
        }
      }
    }
  }

  buffers.points.len()
}

#[inline]
fn lattice_position(dims: GridDims, index: usize) -> Vec3A {
  let [x, y, z] = dims.coords(index);
  Vec3A::new(x as f32, y as f32, z as f32)
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod scan_test;
