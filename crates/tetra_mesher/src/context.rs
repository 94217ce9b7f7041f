//! Reusable mesher state.
//!
//! A [`MesherContext`] owns every intermediate buffer of an extraction.
//! Buffers are resized per run and keep their capacity, so meshing many
//! fields of the same size allocates only once. Contexts are independent:
//! run one per thread to mesh in parallel.

use glam::Vec3A;

use crate::dual::{DualBuffers, DualPoint};
use crate::error::Result;
use crate::sink::MeshSink;
use crate::tetrahedra::scan::{CrossingPoint, ScanBuffers};
use crate::tetrahedra::{self, TetFace};
use crate::types::{MeshConfig, MeshOutput, MeshStats, ScalarField, NO_POINT};

/// Intermediate buffers for one extraction at a time.
#[derive(Debug, Default)]
pub struct MesherContext {
  pub(crate) scan: ScanBuffers,
  /// Angle-weighted normal sums per crossing point, unnormalized.
  pub(crate) point_normals: Vec<Vec3A>,
  pub(crate) faces: Vec<TetFace>,
  pub(crate) dual: DualBuffers,
  /// Source point to emitted vertex index.
  pub(crate) remap: Vec<u32>,
}

impl MesherContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Extract the surface of `field` into `sink`.
  ///
  /// Caller contract violations are returned as errors before anything is
  /// emitted. Local problems are counted in the returned stats.
  pub fn mesh<S: MeshSink + ?Sized>(
    &mut self,
    field: &ScalarField,
    config: &MeshConfig,
    sink: &mut S,
  ) -> Result<MeshStats> {
    tetrahedra::generate(self, field, config, sink)
  }

  /// Crossing points of the last run.
  pub fn points(&self) -> &[CrossingPoint] {
    &self.scan.points
  }

  /// Accumulated (unnormalized) normal per crossing point of the last run.
  pub fn point_normals(&self) -> &[Vec3A] {
    &self.point_normals
  }

  /// Per-sample crossed-line bitmasks of the last run.
  pub fn crossing_bits(&self) -> &[u8] {
    &self.scan.crossing_bits
  }

  /// Crossing point on `line` of lattice point `sample`, if crossed.
  pub fn point_at(&self, sample: usize, line: usize) -> Option<u32> {
    let id = self.scan.point_at(sample, line);
    (id != NO_POINT).then_some(id)
  }

  /// Faces cut from tetrahedra in the last run, degenerate ones included.
  pub fn faces(&self) -> &[TetFace] {
    &self.faces
  }

  /// Dual points of the last dual run.
  pub fn dual_points(&self) -> &[DualPoint] {
    &self.dual.points
  }

  /// Release all buffers.
  pub fn clear(&mut self) {
    *self = Self::default();
  }
}

/// Mesh `field` with a fresh context into a new [`MeshOutput`].
pub fn mesh(field: &ScalarField, config: &MeshConfig) -> Result<MeshOutput> {
  let mut output = MeshOutput::new();
  MesherContext::new().mesh(field, config, &mut output)?;
  Ok(output)
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;
