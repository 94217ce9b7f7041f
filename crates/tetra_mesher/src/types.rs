//! Core data types for tetrahedral meshing.

use crate::constants::LINES_PER_POINT;
use crate::error::{MeshError, Result};

/// Per-sample auxiliary classification (material / element id).
///
/// Carried through to vertex metadata untouched, never read for control
/// flow.
pub type ElementId = u16;

/// Sentinel for "no point" in index buffers.
pub const NO_POINT: u32 = u32::MAX;

// =============================================================================
// Grid
// =============================================================================

/// Sample counts along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
  pub x: usize,
  pub y: usize,
  pub z: usize,
}

impl GridDims {
  pub const fn new(x: usize, y: usize, z: usize) -> Self {
    Self { x, y, z }
  }

  /// Same sample count on every axis.
  pub const fn cubic(n: usize) -> Self {
    Self { x: n, y: n, z: n }
  }

  /// Total number of samples.
  #[inline(always)]
  pub const fn sample_count(&self) -> usize {
    self.x * self.y * self.z
  }

  /// Number of cells (one fewer than samples on each axis).
  #[inline]
  pub const fn cell_count(&self) -> usize {
    self.x.saturating_sub(1) * self.y.saturating_sub(1) * self.z.saturating_sub(1)
  }

  #[inline(always)]
  pub const fn stride_y(&self) -> usize {
    self.x
  }

  #[inline(always)]
  pub const fn stride_z(&self) -> usize {
    self.x * self.y
  }

  /// Linear sample index: `x + y * dim_x + z * dim_x * dim_y`.
  #[inline(always)]
  pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
    x + y * self.x + z * self.x * self.y
  }

  /// Inverse of [`GridDims::index`].
  #[inline]
  pub const fn coords(&self, index: usize) -> [usize; 3] {
    let stride_z = self.x * self.y;
    [index % self.x, (index / self.x) % self.y, index / stride_z]
  }

  /// Sample offsets of the 8 cube corners from a cell origin.
  #[inline]
  pub const fn corner_offsets(&self) -> [usize; 8] {
    let dx = self.stride_y();
    let dxy = self.stride_z();
    [0, 1, dx, 1 + dx, dxy, 1 + dxy, dx + dxy, 1 + dx + dxy]
  }

  /// True if the signed cell coordinate addresses a cell of this grid.
  #[inline]
  pub fn contains_cell(&self, cell: [i64; 3]) -> bool {
    cell[0] >= 0
      && cell[1] >= 0
      && cell[2] >= 0
      && (cell[0] as usize) + 1 < self.x
      && (cell[1] as usize) + 1 < self.y
      && (cell[2] as usize) + 1 < self.z
  }

  /// Index of `(sample, line)` in line-indexed buffers.
  #[inline(always)]
  pub const fn line_slot(sample: usize, line: usize) -> usize {
    sample * LINES_PER_POINT + line
  }

  /// Length of a line-indexed buffer for this grid.
  #[inline]
  pub const fn line_slot_count(&self) -> usize {
    self.sample_count() * LINES_PER_POINT
  }

  pub fn validate(&self) -> Result<()> {
    if self.x < 2 || self.y < 2 || self.z < 2 {
      return Err(MeshError::InvalidDimensions([self.x, self.y, self.z]));
    }
    if self.sample_count() > NO_POINT as usize / LINES_PER_POINT {
      return Err(MeshError::InvalidDimensions([self.x, self.y, self.z]));
    }
    Ok(())
  }
}

/// Borrowed scalar field plus optional per-sample element ids.
#[derive(Clone, Copy, Debug)]
pub struct ScalarField<'a> {
  /// Samples, `value >= 0` is inside.
  pub samples: &'a [f32],
  pub dims: GridDims,
  /// Optional element id per sample.
  pub elements: Option<&'a [ElementId]>,
}

impl<'a> ScalarField<'a> {
  pub fn new(samples: &'a [f32], dims: GridDims) -> Self {
    Self {
      samples,
      dims,
      elements: None,
    }
  }

  pub fn with_elements(mut self, elements: &'a [ElementId]) -> Self {
    self.elements = Some(elements);
    self
  }

  /// Check the caller contract: dimensions and buffer lengths agree.
  pub fn validate(&self) -> Result<()> {
    self.dims.validate()?;

    let expected = self.dims.sample_count();
    if self.samples.len() != expected {
      return Err(MeshError::FieldSizeMismatch {
        expected,
        actual: self.samples.len(),
      });
    }
    if let Some(elements) = self.elements {
      if elements.len() != expected {
        return Err(MeshError::ElementSizeMismatch {
          expected,
          actual: elements.len(),
        });
      }
    }
    Ok(())
  }

  #[inline(always)]
  pub fn value(&self, index: usize) -> f32 {
    self.samples[index]
  }

  #[inline]
  pub fn element(&self, index: usize) -> Option<ElementId> {
    self.elements.map(|elements| elements[index])
  }
}

// =============================================================================
// Output
// =============================================================================

/// Where an output vertex came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexSource {
  /// Field samples of the crossed line, inside sample first.
  pub samples: [u32; 2],

  /// Interpolation parameter measured from the inside sample.
  pub t: f32,

  /// Element ids of `samples`, when the field carries them.
  pub elements: Option<[ElementId; 2]>,
}

impl Default for VertexSource {
  fn default() -> Self {
    Self {
      samples: [0; 2],
      t: 0.0,
      elements: None,
    }
  }
}

/// Output vertex with all mesh attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Vertex position, grid coordinates scaled by the voxel size.
  pub position: [f32; 3],

  /// Surface normal (unit vector, pointing outward).
  pub normal: [f32; 3],

  /// Originating samples for material blending.
  pub source: VertexSource,
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: [0.0; 3],
      normal: [0.0, 1.0, 0.0],
      source: VertexSource::default(),
    }
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Default in-memory mesh sink.
///
/// Appends on every call, so one buffer can collect several extractions.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  /// Output vertices with positions, normals and source metadata.
  pub vertices: Vec<Vertex>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Unit face normal per triangle (parallel to `indices.chunks(3)`).
  pub face_normals: Vec<[f32; 3]>,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.face_normals.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Vertex indices of triangle `i`.
  pub fn triangle(&self, i: usize) -> [u32; 3] {
    [self.indices[i * 3], self.indices[i * 3 + 1], self.indices[i * 3 + 2]]
  }
}

// =============================================================================
// Configuration
// =============================================================================

/// Normal computation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMode {
  /// Shared vertices with angle-weighted normals.
  #[default]
  Smooth,

  /// Vertices split per triangle, each carrying its face normal.
  Flat,
}

/// Which surface is emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Topology {
  /// Triangles directly on tetrahedron edges.
  #[default]
  Tetrahedra,

  /// One point per cut tetrahedron, fused across neighbouring cells.
  Dual,
}

/// Configuration for mesh generation.
#[derive(Clone, Debug)]
pub struct MeshConfig {
  /// Scale factor applied to vertex positions.
  pub voxel_size: f32,

  /// Normal computation mode.
  pub normal_mode: NormalMode,

  /// Direct or dual surface.
  pub topology: Topology,
}

impl Default for MeshConfig {
  fn default() -> Self {
    Self {
      voxel_size: 1.0,
      normal_mode: NormalMode::default(),
      topology: Topology::default(),
    }
  }
}

impl MeshConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_voxel_size(mut self, size: f32) -> Self {
    self.voxel_size = size;
    self
  }

  pub fn with_normal_mode(mut self, mode: NormalMode) -> Self {
    self.normal_mode = mode;
    self
  }

  /// `true` selects [`NormalMode::Smooth`], `false` [`NormalMode::Flat`].
  pub fn with_smooth_shade(mut self, smooth: bool) -> Self {
    self.normal_mode = if smooth {
      NormalMode::Smooth
    } else {
      NormalMode::Flat
    };
    self
  }

  pub fn with_topology(mut self, topology: Topology) -> Self {
    self.topology = topology;
    self
  }

  pub fn smooth_shade(&self) -> bool {
    self.normal_mode == NormalMode::Smooth
  }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters and non-fatal diagnostics from one extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshStats {
  /// Vertices sent to the sink.
  pub vertices: usize,
  /// Triangles sent to the sink.
  pub triangles: usize,
  /// Crossing points allocated by the scanner.
  pub crossing_points: usize,
  /// Triangles skipped because two positions coincide.
  pub degenerate_triangles: usize,
  /// Triangles whose normal could not be derived.
  pub degenerate_normals: usize,
  /// Tetrahedra with an impossible crossing pattern.
  pub invalid_patterns: usize,
  /// Dual polygons skipped for a missing ring member.
  pub missing_facets: usize,
  /// Logged diagnostics in discovery order.
  pub diagnostics: Vec<MeshError>,
}

impl MeshStats {
  /// True when no invalid state was detected.
  pub fn is_clean(&self) -> bool {
    self.invalid_patterns == 0 && self.missing_facets == 0
  }

  /// Record a non-fatal condition, logging the ones that indicate bad input
  /// or an upstream logic error.
  pub fn record(&mut self, issue: MeshError) {
    match issue {
      MeshError::DegenerateTriangle(_) => {
        self.degenerate_triangles += 1;
        return;
      }
      MeshError::DegenerateNormal(_) => {
        self.degenerate_normals += 1;
        return;
      }
      MeshError::InvalidCrossingPattern { .. } => self.invalid_patterns += 1,
      MeshError::MissingNeighborFacet { .. } => self.missing_facets += 1,
      _ => {}
    }
    log::warn!("{}", issue);
    self.diagnostics.push(issue);
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
