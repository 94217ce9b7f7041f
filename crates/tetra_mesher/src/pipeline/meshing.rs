//! Batch meshing.
//!
//! Thin wrapper around [`MesherContext::mesh`] that:
//! - Processes jobs in parallel via rayon
//! - Reuses one context per worker
//! - Tracks timing per job
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ Meshing Stage                                                           │
//! │                                                                         │
//! │  MeshJob { id, samples, elements, dims, config }                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────┐            │
//! │  │ MesherContext::mesh(&field, &config, &mut output)       │            │
//! │  │ → MeshStats                                             │            │
//! │  └─────────────────────────────────────────────────────────┘            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  MeshResult { id, output, stats, timing_us }                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use web_time::Instant;

use rayon::prelude::*;

use super::types::{MeshJob, MeshResult};
use crate::context::MesherContext;
use crate::types::MeshOutput;

/// Mesh a single job with a caller-owned context.
pub fn mesh_job(ctx: &mut MesherContext, job: MeshJob) -> MeshResult {
  let start = Instant::now();
  let mut output = MeshOutput::new();
  let stats = ctx.mesh(&job.field(), &job.config, &mut output);
  let timing_us = start.elapsed().as_micros() as u64;

  if let Err(err) = &stats {
    log::warn!("mesh job {} rejected: {}", job.id, err);
  }

  MeshResult {
    id: job.id,
    output,
    stats,
    timing_us,
  }
}

/// Mesh multiple jobs in parallel using rayon.
///
/// Results maintain the same order as jobs for deterministic output.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::mesh_batch"))]
pub fn mesh_batch(jobs: Vec<MeshJob>) -> Vec<MeshResult> {
  if jobs.is_empty() {
    return Vec::new();
  }

  jobs
    .into_par_iter()
    .map_init(MesherContext::new, mesh_job)
    .collect()
}

#[cfg(test)]
#[path = "meshing_test.rs"]
mod meshing_test;
