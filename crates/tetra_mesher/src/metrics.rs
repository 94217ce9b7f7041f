//! Metrics collection for meshing throughput.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use tetra_mesher::metrics::{MeshMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Record each finished job:
//! metrics.record(&result);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::pipeline::MeshResult;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Get the number of values in the window.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear all values.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Aggregate meshing statistics.
#[derive(Debug, Clone, Default)]
pub struct MeshMetrics {
    /// Rolling window of per-job mesh times in microseconds.
    pub mesh_timings: RollingWindow<u64>,
    /// Jobs recorded this session.
    pub meshes: u64,
    /// Jobs rejected with an error.
    pub failed: u64,
    /// Vertices emitted.
    pub vertices: u64,
    /// Triangles emitted.
    pub triangles: u64,
    /// Degenerate triangles and normals skipped.
    pub degenerate: u64,
    /// Invalid crossing patterns and missing dual facets.
    pub invalid: u64,
    /// Last mesh time in microseconds.
    pub last_mesh_us: u64,
}

impl MeshMetrics {
    /// Create new metrics with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished job.
    pub fn record(&mut self, result: &MeshResult) {
        if !is_enabled() {
            return;
        }

        self.meshes += 1;
        self.mesh_timings.push(result.timing_us);
        self.last_mesh_us = result.timing_us;

        match &result.stats {
            Ok(stats) => {
                self.vertices += stats.vertices as u64;
                self.triangles += stats.triangles as u64;
                self.degenerate += (stats.degenerate_triangles + stats.degenerate_normals) as u64;
                self.invalid += (stats.invalid_patterns + stats.missing_facets) as u64;
            }
            Err(_) => self.failed += 1,
        }
    }

    /// Record every result of a batch.
    pub fn record_batch(&mut self, results: &[MeshResult]) {
        for result in results {
            self.record(result);
        }
    }

    /// Reset all counters and timings.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get average mesh timing in microseconds.
    pub fn avg_mesh_timing_us(&self) -> f64 {
        self.mesh_timings.average()
    }

    /// Approximate output memory: 48 bytes per vertex, 16 per triangle.
    pub fn mesh_memory_mb(&self) -> f64 {
        (self.vertices * 48 + self.triangles * 16) as f64 / 1_048_576.0
    }
}
