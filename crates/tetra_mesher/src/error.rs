//! Error types for tetrahedral meshing.
//!
//! Only caller contract violations are returned as `Err`. The remaining
//! variants describe local problems that degrade the output (a skipped face
//! or facet) and are collected in [`MeshStats`](crate::MeshStats).

use thiserror::Error;

/// Conditions raised while extracting a surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
  /// A tetrahedron's crossing flags match none of the 7 valid patterns.
  #[error("invalid crossing pattern {flags:#08b} in cell {cell:?} tetrahedron {tet}")]
  InvalidCrossingPattern { cell: [usize; 3], tet: u8, flags: u8 },

  /// A dual ring member carries no dual point although its line crossed.
  #[error("missing dual point for cell {cell:?} tetrahedron {tet}")]
  MissingNeighborFacet { cell: [usize; 3], tet: u8 },

  /// Two of a triangle's positions coincide exactly.
  #[error("degenerate triangle {0:?}")]
  DegenerateTriangle([u32; 3]),

  /// No edge pair of a triangle yields a usable cross product.
  #[error("degenerate normal for triangle {0:?}")]
  DegenerateNormal([u32; 3]),

  /// Fewer than 2 samples on an axis, or too many to index.
  #[error("invalid grid dimensions {0:?}")]
  InvalidDimensions([usize; 3]),

  /// Field length does not match the dimensions.
  #[error("field size mismatch: expected {expected}, got {actual}")]
  FieldSizeMismatch { expected: usize, actual: usize },

  /// Element buffer length does not match the dimensions.
  #[error("element size mismatch: expected {expected}, got {actual}")]
  ElementSizeMismatch { expected: usize, actual: usize },
}

/// A specialized Result type for meshing operations.
pub type Result<T> = std::result::Result<T, MeshError>;
