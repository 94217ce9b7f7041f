//! Batch meshing pipeline.
//!
//! ```text
//! ┌─────────┐     ┌──────────────────────────┐     ┌────────────┐
//! │ MeshJob ├────►│ mesh_batch (rayon)       ├────►│ MeshResult │
//! └─────────┘     │ one MesherContext/worker │     └────────────┘
//!                 └──────────────────────────┘
//!                              ▲
//!                              │ rayon::spawn + channel
//!                       ┌──────┴──────┐
//!                       │ AsyncMesher │
//!                       └─────────────┘
//! ```
//!
//! Each job is independent: failures are reported per job and never abort
//! the batch.

pub mod types;

pub mod async_meshing;
pub mod meshing;

// Re-exports
pub use async_meshing::{AsyncMesher, BatchResult};
pub use meshing::{mesh_batch, mesh_job};
pub use types::{MeshJob, MeshResult};
