//! tetra_mesher - Isosurface extraction on a tetrahedral lattice
//!
//! This crate turns a sampled scalar field into a closed, outward-facing
//! triangle mesh. Every grid cell is split into 5 tetrahedra (the diamond
//! lattice), which removes the ambiguous cases of marching cubes.
//!
//! # Features
//!
//! - **Marching Tetrahedra**: One vertex per crossed lattice line, shared
//!   between neighbouring tetrahedra so the surface is watertight
//! - **Dual Surface**: One vertex per cut tetrahedron placed where the
//!   tangent planes meet, fused into polygons around each crossed line
//! - **Smooth or Flat Shading**: Angle-weighted vertex normals, or split
//!   vertices carrying the face normal
//! - **Element Pass-Through**: Per-sample element ids reach vertex metadata
//! - **Batch Meshing**: Parallel jobs via rayon, with an async front-end
//!
//! # Example
//!
//! ```ignore
//! use tetra_mesher::{mesh, GridDims, MeshConfig, ScalarField, Topology};
//!
//! // 16³ samples, >= 0 inside
//! let dims = GridDims::cubic(16);
//! let samples: Vec<f32> = fill_sphere(dims);
//!
//! let config = MeshConfig::default().with_topology(Topology::Dual);
//! let output = mesh(&ScalarField::new(&samples, dims), &config)?;
//!
//! println!("Generated {} vertices, {} triangles",
//!     output.vertices.len(), output.triangle_count());
//! ```

pub mod constants;
pub mod error;
pub mod tables;
pub mod types;

// Re-export commonly used items
pub use error::{MeshError, Result};
pub use types::{
  ElementId, GridDims, MeshConfig, MeshOutput, MeshStats, MinMaxAABB, NormalMode, ScalarField, Topology,
  Vertex, VertexSource,
};

// Output sinks
pub mod sink;
pub use sink::MeshSink;

// Reusable scratch buffers and entry points
pub mod context;
pub use context::{mesh, MesherContext};

// Marching tetrahedra and the dual surface
pub mod dual;
pub mod tetrahedra;

// Rotation-vector helper for blending normals
pub mod orientation;
pub use orientation::LogQuat;

// Analytic fields for tests and benches
pub mod sdf_samplers;

// Batch and async meshing
pub mod pipeline;

pub mod metrics;
