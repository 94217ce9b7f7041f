//! Dual surface: one point per cut tetrahedron, fused around crossed lines.
//!
//! Every crossed lattice line is surrounded by a closed ring of tetrahedra
//! (4 around an axis line, 6 around a face diagonal) and each of them is
//! cut, so the ring's dual points form a polygon that caps the line.
//!
//! ```text
//!   Axis line (4 ring)           Face diagonal (6 ring)
//!
//!     r3 ───── r2                    r1 ── r2
//!     │         │                  ╱  │  ╲   ╲
//!     │    ●    │               r0 ── │ ── r3   center tets r0, r3
//!     │         │                  ╲  │  ╱   ╱
//!     r0 ───── r1                    r5 ── r4
//!
//!   bridging quad                 ears (r5 r0 r1) (r2 r3 r4)
//!                                 + quad (r1 r2 r4 r5)
//! ```
//!
//! Polygons are wound counter-clockwise around the direction from the
//! inside endpoint of the line to the outside one, then split by
//! [`polygon::triangulate`].
//!
//! Dual points landing on the same position (tetrahedra cut only at one
//! snapped corner) are welded into one. Ring corners that repeat collapse,
//! so the surface stays closed where those polygons shrink.

pub mod fold;
pub mod polygon;
pub mod tet_vert;

use std::collections::HashMap;

use glam::Vec3A;
use smallvec::SmallVec;

use crate::constants::{parity, CORNER_COORDS, LINES_PER_POINT, TETS_PER_CELL};
use crate::context::MesherContext;
use crate::error::MeshError;
use crate::sink::MeshSink;
use crate::tables::{LineRing, LINE_RINGS, MAX_RING, POINT_LINES};
use crate::tetrahedra::normals;
use crate::tetrahedra::scan::{is_inside, CrossingPoint, ScanBuffers};
use crate::tetrahedra::{crossing_vertex, emit_faces, TetFace};
use crate::types::*;
use tet_vert::{merge, tet_vert, SurfacePoint};

/// Dual point of one cut tetrahedron.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualPoint {
  /// Position in grid units.
  pub position: Vec3A,
  /// Unit normal.
  pub normal: Vec3A,
  /// Crossing point whose metadata the output vertex carries.
  pub source: u32,
}

/// A fused triangle of dual point ids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualFace {
  pub points: [u32; 3],
  /// Unit normal, the blended corner normal if the triangle is too small to
  /// give one.
  pub normal: Vec3A,
}

/// Buffers owned by the dual stage, reused across runs.
#[derive(Debug, Default)]
pub struct DualBuffers {
  /// Welded dual points in creation order, one per distinct position.
  pub points: Vec<DualPoint>,
  /// Dual point id per `(cell origin sample, tet)`, [`NO_POINT`] if uncut.
  pub slots: Vec<u32>,
  pub faces: Vec<DualFace>,
  /// Point id per position bit pattern.
  welded: HashMap<[u32; 3], u32>,
}

impl DualBuffers {
  #[inline]
  pub fn point_for(&self, cell: usize, tet: usize) -> u32 {
    self.slots[cell * TETS_PER_CELL + tet]
  }
}

/// Build, fuse and emit the dual surface.
pub(crate) fn generate<S: MeshSink + ?Sized>(
  ctx: &mut MesherContext,
  field: &ScalarField,
  config: &MeshConfig,
  sink: &mut S,
  stats: &mut MeshStats,
) {
  build_points(
    field.dims,
    &ctx.scan.points,
    &ctx.point_normals,
    &ctx.faces,
    &mut ctx.dual,
  );
  fuse(field, &ctx.scan, &mut ctx.dual, stats);
  face_normals(&mut ctx.dual, stats);

  #[cfg(feature = "tracing")]
  let _span = tracing::info_span!("dual::emit").entered();

  let dual = &ctx.dual;
  let crossings = &ctx.scan.points;
  let faces = dual.faces.iter().map(|face| (face.points, Some(face.normal)));

  emit_faces(
    faces,
    dual.points.len(),
    config.normal_mode,
    &mut ctx.remap,
    |id, flat| {
      let point = &dual.points[id as usize];
      crossing_vertex(
        field,
        &crossings[point.source as usize],
        point.position,
        flat.unwrap_or(point.normal),
        config.voxel_size,
      )
    },
    sink,
    stats,
  );
}

/// Place one dual point per cut tetrahedron, welding equal positions.
///
/// Faces of one tetrahedron are adjacent in `faces`. Degenerate faces still
/// contribute, so a collapsed cut keeps its dual point.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "dual::points"))]
pub(crate) fn build_points(
  dims: GridDims,
  crossings: &[CrossingPoint],
  point_normals: &[Vec3A],
  faces: &[TetFace],
  dual: &mut DualBuffers,
) {
  let DualBuffers {
    points,
    slots,
    welded,
    ..
  } = dual;
  points.clear();
  welded.clear();
  slots.clear();
  slots.resize(dims.sample_count() * TETS_PER_CELL, NO_POINT);

  let surface = |id: u32| {
    SurfacePoint::new(
      crossings[id as usize].position,
      normals::finalize(point_normals[id as usize]),
    )
  };
  let place = |face: &TetFace| {
    let [a, b, c] = face.points.map(&surface);
    tet_vert(a, b, c)
  };

  for group in faces.chunk_by(|a, b| a.cell == b.cell && a.tet == b.tet) {
    let first = &group[0];
    let placed = group[1..]
      .iter()
      .fold(place(first), |acc, face| merge(acc, place(face)));

    // `+ 0.0` folds -0.0 into 0.0 so equal positions share a key.
    let key = (placed.position + Vec3A::ZERO).to_array().map(f32::to_bits);
    let id = *welded.entry(key).or_insert_with(|| {
      points.push(DualPoint {
        position: placed.position,
        normal: placed.normal,
        source: first.points[0],
      });
      points.len() as u32 - 1
    });

    slots[first.cell as usize * TETS_PER_CELL + first.tet as usize] = id;
  }
}

/// Cap every crossed line with the polygon of its ring's dual points.
///
/// Lines whose ring leaves the grid are skipped.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "dual::fuse"))]
pub(crate) fn fuse(field: &ScalarField, scan: &ScanBuffers, dual: &mut DualBuffers, stats: &mut MeshStats) {
  dual.faces.clear();
  let dims = field.dims;

  for z in 0..dims.z {
    for y in 0..dims.y {
      for x in 0..dims.x {
        let base = dims.index(x, y, z);
        let bits = scan.crossing_bits[base];
        if bits == 0 {
          continue;
        }
        let parity = parity(x, y, z);

        for line in 0..LINES_PER_POINT {
          if bits & (1 << line) == 0 {
            continue;
          }

          let Some(mut ring) = gather_ring(dims, [x, y, z], &LINE_RINGS[parity][line], dual, stats) else {
            continue;
          };

          // Rings run counter-clockwise around the line's first corner to
          // its second. Flip when the first corner is outside.
          let corner = CORNER_COORDS[POINT_LINES[parity][line][0] as usize];
          let first = dims.index(
            x + corner[0] as usize,
            y + corner[1] as usize,
            z + corner[2] as usize,
          );
          if !is_inside(field.value(first)) {
            ring[1..].reverse();
          }

          close_ring(&mut ring);
          emit_polygon(&ring, dual);
        }
      }
    }
  }
}

/// Dual point ids around one line, or `None` if the ring is incomplete.
fn gather_ring(
  dims: GridDims,
  point: [usize; 3],
  ring: &LineRing,
  dual: &DualBuffers,
  stats: &mut MeshStats,
) -> Option<SmallVec<[u32; MAX_RING]>> {
  let mut ids = SmallVec::new();

  for member in ring.members() {
    let cell: [i64; 3] = std::array::from_fn(|k| point[k] as i64 + member.cell[k] as i64);
    if !dims.contains_cell(cell) {
      return None;
    }

    let cell = cell.map(|c| c as usize);
    let id = dual.point_for(dims.index(cell[0], cell[1], cell[2]), member.tet as usize);
    if id == NO_POINT {
      stats.record(MeshError::MissingNeighborFacet { cell, tet: member.tet });
      return None;
    }
    ids.push(id);
  }

  Some(ids)
}

/// Drop ring corners repeating their predecessor, wrapping around.
fn close_ring(ring: &mut SmallVec<[u32; MAX_RING]>) {
  ring.dedup();
  while ring.len() > 1 && ring.first() == ring.last() {
    ring.pop();
  }
}

/// Triangulate an oriented ring polygon.
///
/// A ring touching itself at a welded point is split there into simple
/// loops first.
fn emit_polygon(ring: &[u32], dual: &mut DualBuffers) {
  for i in 0..ring.len() {
    if let Some(j) = ring[i + 1..].iter().position(|&id| id == ring[i]) {
      let j = i + 1 + j;
      let rest: SmallVec<[u32; MAX_RING]> = ring[j..].iter().chain(&ring[..i]).copied().collect();
      emit_polygon(&ring[i..j], dual);
      emit_polygon(&rest, dual);
      return;
    }
  }

  let positions: SmallVec<[Vec3A; MAX_RING]> = ring.iter().map(|&id| dual.points[id as usize].position).collect();
  let normals: SmallVec<[Vec3A; MAX_RING]> = ring.iter().map(|&id| dual.points[id as usize].normal).collect();

  for tri in polygon::triangulate(&positions, &normals) {
    dual.faces.push(DualFace {
      points: tri.map(|i| ring[i]),
      normal: Vec3A::ZERO,
    });
  }
}

/// Derive face normals of the fused triangles.
fn face_normals(dual: &mut DualBuffers, stats: &mut MeshStats) {
  let points = &dual.points;
  for face in dual.faces.iter_mut() {
    let ids = face.points;
    let corners = ids.map(|id| &points[id as usize]);
    let [p0, p1, p2] = corners.map(|point| point.position);

    face.normal = normals::face_normal(p0, p1, p2).unwrap_or_else(|| {
      stats.record(MeshError::DegenerateNormal(ids));
      normals::finalize(corners.iter().map(|point| point.normal).sum())
    });
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
