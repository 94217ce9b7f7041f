use std::collections::{HashMap, HashSet};

use super::*;
use crate::sdf_samplers::{FieldSampler, SphereSampler};

fn init_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

fn sphere_field(radius: f64, center: [f64; 3]) -> (Vec<f32>, GridDims) {
  let dims = GridDims::cubic(16);
  let sampler = SphereSampler::new(radius).with_center(center);
  (sampler.sample_grid([0, 0, 0], dims, 1.0), dims)
}

fn run(samples: &[f32], dims: GridDims, config: &MeshConfig) -> (MeshOutput, MeshStats) {
  let mut output = MeshOutput::new();
  let stats = MesherContext::new()
    .mesh(&ScalarField::new(samples, dims), config, &mut output)
    .unwrap();
  (output, stats)
}

/// 2x2x2 field with only the listed corners inside.
fn cube_field(inside: &[usize]) -> Vec<f32> {
  let mut samples = vec![-1.0; 8];
  for &corner in inside {
    samples[corner] = 1.0;
  }
  samples
}

fn triangles(output: &MeshOutput) -> impl Iterator<Item = [u32; 3]> + '_ {
  (0..output.triangle_count()).map(|i| output.triangle(i))
}

fn centroid(output: &MeshOutput, tri: [u32; 3]) -> Vec3A {
  tri
    .map(|i| Vec3A::from_array(output.vertices[i as usize].position))
    .into_iter()
    .sum::<Vec3A>()
    / 3.0
}

// =============================================================================
// Closed surfaces
// =============================================================================

#[test]
fn test_sphere_is_watertight() {
  let (samples, dims) = sphere_field(5.0, [8.0, 8.0, 8.0]);
  let (output, stats) = run(&samples, dims, &MeshConfig::default());

  assert!(output.triangle_count() > 1000);
  assert!(stats.is_clean(), "{:?}", stats.diagnostics);

  let mut directed = HashMap::new();
  let mut undirected = HashMap::new();
  for tri in triangles(&output) {
    for k in 0..3 {
      let (a, b) = (tri[k], tri[(k + 1) % 3]);
      *directed.entry((a, b)).or_insert(0) += 1;
      *undirected.entry((a.min(b), a.max(b))).or_insert(0) += 1;
    }
  }

  assert!(directed.values().all(|&n| n == 1), "directed edge reused");
  assert!(undirected.values().all(|&n| n == 2), "edge not shared by exactly 2 triangles");

  // Sphere topology: V - E + F = 2
  let euler = output.vertices.len() as i64 - undirected.len() as i64 + output.triangle_count() as i64;
  assert_eq!(euler, 2);
}

#[test]
fn test_sphere_faces_point_outward() {
  let center = [8.0, 8.0, 8.0];
  let sampler = SphereSampler::new(5.0).with_center(center);
  let (samples, dims) = sphere_field(5.0, center);
  let (output, _) = run(&samples, dims, &MeshConfig::default());
  let center = Vec3A::new(8.0, 8.0, 8.0);

  for (i, tri) in triangles(&output).enumerate() {
    let normal = Vec3A::from_array(output.face_normals[i]);
    let c = centroid(&output, tri);
    assert!(normal.dot(c - center) > 0.0, "triangle {} points inward", i);

    // The field decreases along the face normal.
    let ahead = c + normal * 0.25;
    let behind = c - normal * 0.25;
    let value = |p: Vec3A| sampler.sample([p.x as f64, p.y as f64, p.z as f64]);
    assert!(value(ahead) < value(behind));
  }
}

#[test]
fn test_exact_zeros_skip_degenerate_triangles() {
  // Integer radius on an integer center: many samples sit exactly on the
  // surface and snap.
  let (samples, dims) = sphere_field(5.0, [8.0, 8.0, 8.0]);
  let (output, stats) = run(&samples, dims, &MeshConfig::default());

  assert!(stats.degenerate_triangles > 0);
  for tri in triangles(&output) {
    assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[2] != tri[0]);
  }
}

#[test]
fn test_off_grid_sphere_has_no_degenerates() {
  let (samples, dims) = sphere_field(5.0, [8.3, 7.9, 8.1]);
  let (output, stats) = run(&samples, dims, &MeshConfig::default());

  assert_eq!(stats.degenerate_triangles, 0);
  assert_eq!(stats.degenerate_normals, 0);
  assert_eq!(stats.triangles, output.triangle_count());
}

// =============================================================================
// Small fields
// =============================================================================

#[test]
fn test_empty_fields() {
  let dims = GridDims::cubic(4);
  for value in [1.0, -1.0] {
    let samples = vec![value; dims.sample_count()];
    let (output, stats) = run(&samples, dims, &MeshConfig::default());
    assert!(output.is_empty());
    assert_eq!(stats.crossing_points, 0);
    assert_eq!(stats.triangles, 0);
    assert!(stats.is_clean());
  }
}

#[test]
fn test_single_apex_corner() {
  // Corner 1 of an even cell is the apex of tetrahedron 1 only.
  let samples = cube_field(&[1]);
  let (output, stats) = run(&samples, GridDims::cubic(2), &MeshConfig::default());

  assert_eq!(stats.triangles, 1);
  assert_eq!(output.vertices.len(), 3);

  for vertex in &output.vertices {
    assert_eq!(vertex.source.samples[0], 1, "inside sample first");
    assert_eq!(vertex.source.t, 0.5);
  }

  // Faces point away from the only inside corner.
  let normal = Vec3A::from_array(output.face_normals[0]);
  let c = centroid(&output, output.triangle(0));
  assert!(normal.dot(c - Vec3A::X) > 0.0);
}

#[test]
fn test_origin_corner_cuts_four_tets() {
  let samples = cube_field(&[0]);
  let mut ctx = MesherContext::new();
  let mut output = MeshOutput::new();
  let stats = ctx
    .mesh(&ScalarField::new(&samples, GridDims::cubic(2)), &MeshConfig::default(), &mut output)
    .unwrap();

  assert_eq!(stats.crossing_points, 6);
  assert_eq!(stats.triangles, 4);
  let tets: Vec<u8> = ctx.faces().iter().map(|face| face.tet).collect();
  assert_eq!(tets, vec![0, 1, 2, 4]);

  // Smooth mode shares all 6 crossing points.
  assert_eq!(output.vertices.len(), 6);
  for tri in triangles(&output) {
    let normal = super::normals::face_normal(
      Vec3A::from_array(output.vertices[tri[0] as usize].position),
      Vec3A::from_array(output.vertices[tri[1] as usize].position),
      Vec3A::from_array(output.vertices[tri[2] as usize].position),
    )
    .unwrap();
    assert!(normal.dot(centroid(&output, tri)) > 0.0);
  }
}

#[test]
fn test_exact_zero_corner_merges_points() {
  let mut samples = vec![-1.0; 8];
  samples[0] = 0.0;

  let mut ctx = MesherContext::new();
  let mut output = MeshOutput::new();
  let stats = ctx
    .mesh(&ScalarField::new(&samples, GridDims::cubic(2)), &MeshConfig::default(), &mut output)
    .unwrap();

  // Every crossing of the zero corner resolves to one point.
  assert_eq!(ctx.points().len(), 1);
  let ids: HashSet<u32> = (0..6).filter_map(|line| ctx.point_at(0, line)).collect();
  assert_eq!(ids.len(), 1);

  // The collapsed faces are skipped.
  assert_eq!(stats.degenerate_triangles, 4);
  assert!(output.is_empty());
}

#[test]
fn test_nan_yields_invalid_pattern() {
  init_logger();
  let mut samples = cube_field(&[0]);
  samples[1] = f32::NAN;

  let (output, stats) = run(&samples, GridDims::cubic(2), &MeshConfig::default());

  assert_eq!(stats.invalid_patterns, 1);
  assert!(!stats.is_clean());
  assert_eq!(
    stats.diagnostics,
    vec![MeshError::InvalidCrossingPattern {
      cell: [0, 0, 0],
      tet: 1,
      flags: 0b010100,
    }]
  );
  // Other tetrahedra still mesh.
  assert_eq!(output.triangle_count(), 3);
}

// =============================================================================
// Emission
// =============================================================================

#[test]
fn test_smooth_vertices_are_compacted() {
  let (samples, dims) = sphere_field(4.5, [8.0, 8.0, 8.0]);
  let (output, stats) = run(&samples, dims, &MeshConfig::default());

  let referenced: HashSet<u32> = output.indices.iter().copied().collect();
  assert_eq!(referenced.len(), output.vertices.len());
  assert_eq!(stats.vertices, output.vertices.len());
  assert_eq!(output.face_normals.len(), output.triangle_count());

  for vertex in &output.vertices {
    let n = Vec3A::from_array(vertex.normal);
    assert!((n.length() - 1.0).abs() < 1e-4);
  }
}

#[test]
fn test_flat_mode_splits_vertices() {
  let (samples, dims) = sphere_field(4.5, [8.0, 8.0, 8.0]);
  let config = MeshConfig::default().with_normal_mode(NormalMode::Flat);
  let (output, stats) = run(&samples, dims, &config);

  assert_eq!(output.vertices.len(), output.triangle_count() * 3);
  assert_eq!(stats.vertices, stats.triangles * 3);

  for (i, tri) in triangles(&output).enumerate() {
    for id in tri {
      assert_eq!(output.vertices[id as usize].normal, output.face_normals[i]);
    }
  }
}

#[test]
fn test_flat_and_smooth_share_triangles() {
  let (samples, dims) = sphere_field(4.5, [8.0, 8.0, 8.0]);
  let (smooth, _) = run(&samples, dims, &MeshConfig::default());
  let (flat, _) = run(&samples, dims, &MeshConfig::default().with_smooth_shade(false));

  assert_eq!(smooth.triangle_count(), flat.triangle_count());
  assert_eq!(smooth.face_normals, flat.face_normals);
}

#[test]
fn test_voxel_size_scales_positions() {
  let (samples, dims) = sphere_field(4.5, [8.0, 8.0, 8.0]);
  let (unit, _) = run(&samples, dims, &MeshConfig::default());
  let (scaled, _) = run(&samples, dims, &MeshConfig::default().with_voxel_size(0.5));

  assert_eq!(unit.vertices.len(), scaled.vertices.len());
  for (a, b) in unit.vertices.iter().zip(&scaled.vertices) {
    assert!((Vec3A::from_array(a.position) * 0.5 - Vec3A::from_array(b.position)).length() < 1e-5);
    assert_eq!(a.source, b.source);
  }
  assert!((scaled.bounds.max[0] - unit.bounds.max[0] * 0.5).abs() < 1e-5);
}

#[test]
fn test_elements_pass_through() {
  let (samples, dims) = sphere_field(4.5, [8.0, 8.0, 8.0]);
  let elements: Vec<ElementId> = (0..dims.sample_count()).map(|i| (i % 7) as ElementId).collect();

  let mut output = MeshOutput::new();
  let field = ScalarField::new(&samples, dims).with_elements(&elements);
  MesherContext::new()
    .mesh(&field, &MeshConfig::default(), &mut output)
    .unwrap();

  for vertex in &output.vertices {
    let [a, b] = vertex.source.samples;
    assert_eq!(
      vertex.source.elements,
      Some([elements[a as usize], elements[b as usize]])
    );
  }
}

#[test]
fn test_vertex_source_interpolates_field() {
  let (samples, dims) = sphere_field(4.5, [8.3, 7.9, 8.1]);
  let (output, _) = run(&samples, dims, &MeshConfig::default());

  for vertex in &output.vertices {
    let [a, b] = vertex.source.samples.map(|s| samples[s as usize]);
    assert!(a >= 0.0 && b < 0.0);
    let value = a + (b - a) * vertex.source.t;
    // Snapped points sit within the snap tolerance of the surface.
    assert!(value.abs() <= 1e-3 * (a - b) + 1e-5, "field at vertex is {}", value);
  }
}
