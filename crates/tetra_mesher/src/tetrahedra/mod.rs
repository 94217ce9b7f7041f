//! Marching tetrahedra over a 5-tetrahedron diamond lattice.
//!
//! # Algorithm Overview
//!
//! Every cell of the grid is split into 5 tetrahedra, mirrored between even
//! and odd cells so neighbouring faces share their diagonals. The surface is
//! extracted per tetrahedron from the 6 edge crossings, which makes every
//! cut unambiguous (no marching cubes ambiguity cases).
//!
//! ```text
//! Marching Cubes:
//!   - 256 corner cases, some ambiguous
//!   - Holes where neighbouring cells disagree
//!
//! Marching Tetrahedra:
//!   - 7 valid cut patterns per tetrahedron
//!   - Shared crossing points, closed surface by construction
//! ```
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  samples: &[f32]            - Scalar field, >= 0 inside         │
//! │  dims: GridDims             - Sample counts per axis            │
//! │  elements: Option<&[u16]>   - Per-sample element ids            │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 1: Crossing Scan                       │
//! │  For each lattice point and each of its 6 lines:                │
//! │    Test for a sign change                                       │
//! │    Allocate one shared point (snapped points merge per corner)  │
//! │    Set the line's crossing bit                                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 2: Classification                      │
//! │  For each cell and each of its 5 tetrahedra:                    │
//! │    Gather 6 crossing bits through the edge slot table           │
//! │    Look up the face pattern (64 entry table, 7 valid)           │
//! │    Orient faces away from the inside region                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 3: Normals                             │
//! │  Skip triangles with coincident corners                         │
//! │  Unit face normal (3 corner fallbacks)                          │
//! │  Angle-weighted accumulation per shared point                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 4: Emission                            │
//! │  Tetrahedra: crossing points become vertices                    │
//! │  Dual: one point per cut tetrahedron, fused around lines        │
//! │  Smooth: referenced vertices once, shared                       │
//! │  Flat: 3 vertices per triangle carrying the face normal         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod classify;
pub mod normals;
pub mod scan;

use glam::Vec3A;
#[cfg(feature = "tracing")]
use tracing::info_span;
use web_time::Instant;

use crate::constants::{parity, FALLBACK_NORMAL, TETS_PER_CELL};
use crate::context::MesherContext;
use crate::dual;
use crate::error::{MeshError, Result};
use crate::sink::MeshSink;
use crate::tables::{EDGE_SLOTS, TET_CORNERS};
use crate::types::*;
use classify::{classify, Classification};
use scan::{is_inside, CrossingPoint, ScanBuffers};

/// A surface triangle cut from one tetrahedron.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TetFace {
  /// Crossing point ids, counter-clockwise from outside.
  pub points: [u32; 3],
  /// Sample index of the owning cell's origin.
  pub cell: u32,
  /// Tetrahedron within the cell.
  pub tet: u8,
  /// Unit face normal, `None` if it could not be derived.
  pub normal: Option<Vec3A>,
  /// Two corners share a position. Never emitted.
  pub degenerate: bool,
}

/// Run the full extraction with `ctx`'s buffers.
pub fn generate<S: MeshSink + ?Sized>(
  ctx: &mut MesherContext,
  field: &ScalarField,
  config: &MeshConfig,
  sink: &mut S,
) -> Result<MeshStats> {
  #[cfg(feature = "tracing")]
  let _span = info_span!("tetrahedra::generate").entered();

  field.validate()?;
  let start = Instant::now();
  let mut stats = MeshStats::default();

  stats.crossing_points = scan::scan(field, &mut ctx.scan);

  extract_faces(field, &ctx.scan, &mut ctx.faces, &mut stats);

  // Dual points need vertex normals even when shading flat.
  let accumulate = config.smooth_shade() || config.topology == Topology::Dual;
  compute_normals(
    &ctx.scan.points,
    &mut ctx.faces,
    &mut ctx.point_normals,
    accumulate,
    &mut stats,
  );

  match config.topology {
    Topology::Tetrahedra => {
      #[cfg(feature = "tracing")]
      let _span = info_span!("tetrahedra::emit").entered();

      let points = &ctx.scan.points;
      let point_normals = &ctx.point_normals;
      let faces = ctx
        .faces
        .iter()
        .filter(|face| !face.degenerate)
        .map(|face| (face.points, face.normal));

      emit_faces(
        faces,
        points.len(),
        config.normal_mode,
        &mut ctx.remap,
        |id, flat| {
          let point = &points[id as usize];
          let normal = flat.unwrap_or_else(|| normals::finalize(point_normals[id as usize]));
          crossing_vertex(field, point, point.position, normal, config.voxel_size)
        },
        sink,
        &mut stats,
      );
    }
    Topology::Dual => dual::generate(ctx, field, config, sink, &mut stats),
  }

  log::debug!(
    "[tetrahedra] {:?}: {} points, {} vertices, {} triangles in {:.2}ms",
    config.topology,
    stats.crossing_points,
    stats.vertices,
    stats.triangles,
    start.elapsed().as_secs_f64() * 1000.0
  );

  Ok(stats)
}

/// Classify every tetrahedron and collect its oriented faces.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tetrahedra::classify"))]
pub(crate) fn extract_faces(
  field: &ScalarField,
  scan: &ScanBuffers,
  faces: &mut Vec<TetFace>,
  stats: &mut MeshStats,
) {
  faces.clear();
  let dims = field.dims;
  let offsets = dims.corner_offsets();

  for z in 0..dims.z - 1 {
    for y in 0..dims.y - 1 {
      for x in 0..dims.x - 1 {
        let base = dims.index(x, y, z);
        let parity = parity(x, y, z);

        for tet in 0..TETS_PER_CELL {
          let slots = &EDGE_SLOTS[parity][tet];

          let mut flags = 0u8;
          for (edge, slot) in slots.iter().enumerate() {
            let owner = base + offsets[slot.owner as usize];
            flags |= ((scan.crossing_bits[owner] >> slot.line) & 1) << edge;
          }

          let config = match classify(flags) {
            Classification::Empty => continue,
            Classification::Invalid => {
              stats.record(MeshError::InvalidCrossingPattern {
                cell: [x, y, z],
                tet: tet as u8,
                flags,
              });
              continue;
            }
            Classification::Cut(config) => config,
          };

          let reference = TET_CORNERS[parity][tet][config.reference as usize];
          let invert = is_inside(field.value(base + offsets[reference as usize]));

          for local in config.oriented(invert) {
            let points = local.map(|edge| {
              let slot = slots[edge as usize];
              scan.point_at(base + offsets[slot.owner as usize], slot.line as usize)
            });
            faces.push(TetFace {
              points,
              cell: base as u32,
              tet: tet as u8,
              normal: None,
              degenerate: false,
            });
          }
        }
      }
    }
  }
}

/// Derive face normals and, if `accumulate`, angle-weighted point normals.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tetrahedra::normals"))]
pub(crate) fn compute_normals(
  points: &[CrossingPoint],
  faces: &mut [TetFace],
  point_normals: &mut Vec<Vec3A>,
  accumulate: bool,
  stats: &mut MeshStats,
) {
  point_normals.clear();
  point_normals.resize(points.len(), Vec3A::ZERO);

  for face in faces.iter_mut() {
    let [p0, p1, p2] = face.points.map(|id| points[id as usize].position);

    if normals::is_degenerate(p0, p1, p2) {
      face.degenerate = true;
      stats.record(MeshError::DegenerateTriangle(face.points));
      continue;
    }

    match normals::face_normal(p0, p1, p2) {
      Some(n) => {
        face.normal = Some(n);
        if accumulate {
          normals::accumulate(point_normals, face.points, [p0, p1, p2], n);
        }
      }
      None => stats.record(MeshError::DegenerateNormal(face.points)),
    }
  }
}

/// Send faces to the sink, sharing vertices (smooth) or splitting them
/// per triangle (flat).
///
/// `vertex(id, flat)` builds the vertex for source point `id`. `flat` is
/// the face normal to use in flat mode, `None` for the shared normal.
pub(crate) fn emit_faces<S, I, F>(
  faces: I,
  point_count: usize,
  mode: NormalMode,
  remap: &mut Vec<u32>,
  vertex: F,
  sink: &mut S,
  stats: &mut MeshStats,
) where
  S: MeshSink + ?Sized,
  I: Iterator<Item = ([u32; 3], Option<Vec3A>)>,
  F: Fn(u32, Option<Vec3A>) -> Vertex,
{
  let fallback = Vec3A::from_array(FALLBACK_NORMAL);

  match mode {
    NormalMode::Smooth => {
      remap.clear();
      remap.resize(point_count, NO_POINT);

      for (points, normal) in faces {
        let indices = points.map(|id| {
          let slot = &mut remap[id as usize];
          if *slot == NO_POINT {
            *slot = sink.emit_vertex(vertex(id, None));
            stats.vertices += 1;
          }
          *slot
        });
        sink.emit_triangle(indices, normal.unwrap_or(fallback).to_array());
        stats.triangles += 1;
      }
    }
    NormalMode::Flat => {
      for (points, normal) in faces {
        let normal = normal.unwrap_or(fallback);
        let indices = points.map(|id| sink.emit_vertex(vertex(id, Some(normal))));
        stats.vertices += 3;
        sink.emit_triangle(indices, normal.to_array());
        stats.triangles += 1;
      }
    }
  }
}

/// Output vertex for a position derived from crossing point `source`.
#[inline]
pub(crate) fn crossing_vertex(
  field: &ScalarField,
  source: &CrossingPoint,
  position: Vec3A,
  normal: Vec3A,
  voxel_size: f32,
) -> Vertex {
  let [a, b] = source.samples.map(|s| s as usize);
  Vertex {
    position: (position * voxel_size).to_array(),
    normal: normal.to_array(),
    source: VertexSource {
      samples: source.samples,
      t: source.t,
      elements: field
        .element(a)
        .zip(field.element(b))
        .map(|(a, b)| [a, b]),
    },
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
