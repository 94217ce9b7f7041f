//! Pipeline I/O types for batch meshing.
//!
//! ```text
//!   MeshJob { id, samples, elements, dims, config }
//!        │
//!        │ mesh_job / mesh_batch / AsyncMesher
//!        ▼
//!   MeshResult { id, output, stats, timing_us }
//! ```
//!
//! Jobs own their samples so they can cross thread boundaries. The `id` is
//! opaque to the mesher and routes results back to the caller.

use crate::error::Result;
use crate::sdf_samplers::FieldSampler;
use crate::types::{ElementId, GridDims, MeshConfig, MeshOutput, MeshStats, ScalarField};

// =============================================================================
// Jobs
// =============================================================================

/// One field to mesh.
#[derive(Clone, Debug)]
pub struct MeshJob {
  /// Caller-defined identifier, copied to the result.
  pub id: u64,
  /// Field values, x fastest.
  pub samples: Vec<f32>,
  /// Optional per-sample element ids.
  pub elements: Option<Vec<ElementId>>,
  pub dims: GridDims,
  pub config: MeshConfig,
}

impl MeshJob {
  pub fn new(id: u64, samples: Vec<f32>, dims: GridDims) -> Self {
    Self {
      id,
      samples,
      elements: None,
      dims,
      config: MeshConfig::default(),
    }
  }

  /// Sample `sampler` over `dims` lattice points starting at `origin`.
  ///
  /// The config's voxel size is used as the sample spacing.
  pub fn from_sampler<S: FieldSampler + ?Sized>(
    id: u64,
    sampler: &S,
    origin: [i64; 3],
    dims: GridDims,
    config: MeshConfig,
  ) -> Self {
    let samples = sampler.sample_grid(origin, dims, config.voxel_size as f64);
    Self::new(id, samples, dims).with_config(config)
  }

  pub fn with_elements(mut self, elements: Vec<ElementId>) -> Self {
    self.elements = Some(elements);
    self
  }

  pub fn with_config(mut self, config: MeshConfig) -> Self {
    self.config = config;
    self
  }

  /// Borrowed view for the mesher.
  pub fn field(&self) -> ScalarField<'_> {
    let field = ScalarField::new(&self.samples, self.dims);
    match &self.elements {
      Some(elements) => field.with_elements(elements),
      None => field,
    }
  }
}

// =============================================================================
// Results
// =============================================================================

/// Output of one job.
#[derive(Clone, Debug)]
pub struct MeshResult {
  /// Identifier of the originating job.
  pub id: u64,
  /// Mesh data. Empty when `stats` is an error.
  pub output: MeshOutput,
  /// Run statistics, or the contract violation that rejected the job.
  pub stats: Result<MeshStats>,
  /// Wall time in microseconds.
  pub timing_us: u64,
}

impl MeshResult {
  pub fn is_ok(&self) -> bool {
    self.stats.is_ok()
  }
}
