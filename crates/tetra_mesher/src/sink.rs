//! Mesh output sinks.
//!
//! The mesher never owns its output. Vertices and triangles are streamed
//! into a [`MeshSink`], which hands back the index it assigned to each
//! vertex. [`MeshOutput`] is the default in-memory sink.

use crate::types::{MeshOutput, Vertex};

/// Receiver for emitted geometry.
pub trait MeshSink {
  /// Store a vertex and return the index triangles should use for it.
  fn emit_vertex(&mut self, vertex: Vertex) -> u32;

  /// Store a triangle of previously returned vertex indices, wound
  /// counter-clockwise when seen from outside, with its unit face normal.
  fn emit_triangle(&mut self, indices: [u32; 3], face_normal: [f32; 3]);
}

impl MeshSink for MeshOutput {
  #[inline]
  fn emit_vertex(&mut self, vertex: Vertex) -> u32 {
    let index = self.vertices.len() as u32;
    self.bounds.encapsulate(vertex.position);
    self.vertices.push(vertex);
    index
  }

  #[inline]
  fn emit_triangle(&mut self, indices: [u32; 3], face_normal: [f32; 3]) {
    self.indices.extend_from_slice(&indices);
    self.face_normals.push(face_normal);
  }
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
  #[inline]
  fn emit_vertex(&mut self, vertex: Vertex) -> u32 {
    (**self).emit_vertex(vertex)
  }

  #[inline]
  fn emit_triangle(&mut self, indices: [u32; 3], face_normal: [f32; 3]) {
    (**self).emit_triangle(indices, face_normal)
  }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
