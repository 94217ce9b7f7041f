//! Async Batch Meshing
//!
//! Runs [`mesh_batch`] on rayon's thread pool so the caller's thread never
//! blocks on extraction.
//!
//! # Flow
//!
//! ```text
//! Caller Thread                     Async (rayon)
//! ┌────────────────┐
//! │ Build jobs     │
//! └───────┬────────┘
//!         │ start()
//!         ▼
//!                                  ┌───────────────┐
//!                                  │ mesh_batch()  │
//!                                  │ (par_iter,    │
//!                                  │  context per  │
//!                                  │  worker)      │
//!                                  └───────┬───────┘
//!                                          │
//! ┌────────────────┐                       │
//! │ poll_results() │◄──────────────────────┘
//! └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut mesher = AsyncMesher::new();
//! mesher.start(jobs);
//!
//! // Poll each frame
//! if let Some(batch) = mesher.poll_results() {
//!     for result in batch.results {
//!         upload(result.id, result.output);
//!     }
//! }
//! ```

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use web_time::Instant;

use super::meshing::mesh_batch;
use super::types::{MeshJob, MeshResult};

/// Result of one async batch.
#[derive(Debug)]
pub struct BatchResult {
	/// Per-job results, in job order.
	pub results: Vec<MeshResult>,
	/// Wall time of the whole batch in microseconds.
	pub total_us: u64,
}

/// Non-blocking batch mesher.
///
/// At most one batch is in flight at a time.
pub struct AsyncMesher {
	/// Receiver for pending result.
	receiver: Option<Receiver<BatchResult>>,
}

impl AsyncMesher {
	/// Create an idle mesher.
	pub fn new() -> Self {
		Self { receiver: None }
	}

	/// Check if a batch is running.
	pub fn is_busy(&self) -> bool {
		self.receiver.is_some()
	}

	/// Start meshing `jobs`.
	///
	/// Returns `true` if started, `false` if already busy.
	pub fn start(&mut self, jobs: Vec<MeshJob>) -> bool {
		if self.is_busy() {
			return false;
		}

		let (sender, receiver) = channel::bounded(1);
		self.receiver = Some(receiver);

		rayon::spawn(move || {
			let start = Instant::now();
			let results = mesh_batch(jobs);
			let total_us = start.elapsed().as_micros() as u64;
			// Receiver dropped means cancelled
			let _ = sender.send(BatchResult { results, total_us });
		});

		true
	}

	/// Poll for results (non-blocking).
	///
	/// Returns `Some(batch)` when complete, `None` if still running or idle.
	pub fn poll_results(&mut self) -> Option<BatchResult> {
		let receiver = self.receiver.as_ref()?;

		match receiver.try_recv() {
			Ok(batch) => {
				self.receiver = None;
				Some(batch)
			}
			Err(TryRecvError::Empty) => None,
			Err(TryRecvError::Disconnected) => {
				self.receiver = None;
				None
			}
		}
	}

	/// Drop the pending batch. Its work finishes in the background.
	pub fn cancel(&mut self) {
		self.receiver = None;
	}
}

impl Default for AsyncMesher {
	fn default() -> Self {
		Self::new()
	}
}
