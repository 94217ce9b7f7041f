use std::collections::{HashMap, HashSet};

use super::*;
use crate::sdf_samplers::{FieldSampler, SphereSampler};

const CENTER: [f64; 3] = [8.3, 7.9, 8.1];
/// Sphere centered on a sample: some samples sit exactly on the surface.
const GRID_CENTER: [f64; 3] = [8.0, 8.0, 8.0];
const RADIUS: f64 = 5.0;

fn dual_config() -> MeshConfig {
  MeshConfig::default().with_topology(Topology::Dual)
}

fn sphere_samples(size: usize, radius: f64, center: [f64; 3]) -> (Vec<f32>, GridDims) {
  let dims = GridDims::cubic(size);
  let sampler = SphereSampler::new(radius).with_center(center);
  (sampler.sample_grid([0, 0, 0], dims, 1.0), dims)
}

fn mesh_dual(samples: &[f32], dims: GridDims, config: &MeshConfig) -> (MesherContext, MeshOutput, MeshStats) {
  let mut ctx = MesherContext::new();
  let mut output = MeshOutput::new();
  let stats = ctx
    .mesh(&ScalarField::new(samples, dims), config, &mut output)
    .unwrap();
  (ctx, output, stats)
}

fn position(output: &MeshOutput, id: u32) -> Vec3A {
  Vec3A::from_array(output.vertices[id as usize].position)
}

fn to_vec3a(p: [f64; 3]) -> Vec3A {
  Vec3A::new(p[0] as f32, p[1] as f32, p[2] as f32)
}

fn ring(ids: &[u32]) -> SmallVec<[u32; MAX_RING]> {
  ids.iter().copied().collect()
}

// =============================================================================
// Dual point placement
// =============================================================================

#[test]
fn test_one_dual_point_per_cut_tet() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let (ctx, _, _) = mesh_dual(&samples, dims, &dual_config());

  let cut: HashSet<(u32, u8)> = ctx.faces().iter().map(|face| (face.cell, face.tet)).collect();
  assert!(!ctx.dual_points().is_empty());
  assert_eq!(ctx.dual_points().len(), cut.len());
  for &(cell, tet) in &cut {
    assert_ne!(ctx.dual.point_for(cell as usize, tet as usize), NO_POINT);
  }
}

#[test]
fn test_coincident_dual_points_are_welded() {
  let (samples, dims) = sphere_samples(16, RADIUS, GRID_CENTER);
  let (ctx, _, _) = mesh_dual(&samples, dims, &dual_config());

  let cut: HashSet<(u32, u8)> = ctx.faces().iter().map(|face| (face.cell, face.tet)).collect();
  let points = ctx.dual_points();
  assert!(points.len() < cut.len(), "no tetrahedra share a snapped corner");

  for &(cell, tet) in &cut {
    let id = ctx.dual.point_for(cell as usize, tet as usize);
    assert!((id as usize) < points.len());
  }

  let distinct: HashSet<[u32; 3]> = points
    .iter()
    .map(|point| point.position.to_array().map(f32::to_bits))
    .collect();
  assert_eq!(distinct.len(), points.len());
}

#[test]
fn test_dual_points_hug_the_surface() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let (ctx, _, _) = mesh_dual(&samples, dims, &dual_config());
  let center = Vec3A::new(CENTER[0] as f32, CENTER[1] as f32, CENTER[2] as f32);

  for point in ctx.dual_points() {
    let offset = point.position - center;
    assert!((offset.length() - RADIUS as f32).abs() < 0.25, "{:?}", point.position);
    assert!((point.normal.length() - 1.0).abs() < 1e-4);
    assert!(point.normal.dot(offset) > 0.0, "dual normal points inward");
  }
}

#[test]
fn test_dual_vertices_carry_crossing_metadata() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let (ctx, output, _) = mesh_dual(&samples, dims, &dual_config());

  let sources: HashSet<[u32; 2]> = ctx.points().iter().map(|p| p.samples).collect();
  for vertex in &output.vertices {
    assert!(sources.contains(&vertex.source.samples));
  }
}

// =============================================================================
// Fused surface
// =============================================================================

#[test]
fn test_dual_sphere_is_manifold() {
  for center in [GRID_CENTER, CENTER] {
    let (samples, dims) = sphere_samples(16, RADIUS, center);
    let (_, output, stats) = mesh_dual(&samples, dims, &dual_config());

    assert!(stats.is_clean(), "{:?}", stats.diagnostics);
    assert!(output.triangle_count() > 1000);

    let mut directed = HashMap::new();
    let mut undirected = HashMap::new();
    for i in 0..output.triangle_count() {
      let tri = output.triangle(i);
      assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[2] != tri[0], "{:?}", tri);
      for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        *directed.entry((a, b)).or_insert(0) += 1;
        *undirected.entry((a.min(b), a.max(b))).or_insert(0) += 1;
      }
    }

    assert!(directed.values().all(|&n| n == 1), "inconsistent winding at {:?}", center);
    assert!(
      undirected.values().all(|&n| n == 2),
      "edge not shared by exactly 2 triangles at {:?}",
      center
    );

    let euler = output.vertices.len() as i64 - undirected.len() as i64 + output.triangle_count() as i64;
    assert_eq!(euler, 2, "at {:?}", center);
  }
}

#[test]
fn test_dual_sphere_faces_point_outward() {
  for sphere_center in [GRID_CENTER, CENTER] {
    let (samples, dims) = sphere_samples(16, RADIUS, sphere_center);
    let (_, output, _) = mesh_dual(&samples, dims, &dual_config());
    let sampler = SphereSampler::new(RADIUS).with_center(sphere_center);
    let center = to_vec3a(sphere_center);

    let mut volume = 0.0;
    for i in 0..output.triangle_count() {
      let [a, b, c] = output.triangle(i).map(|id| position(&output, id));
      let normal = Vec3A::from_array(output.face_normals[i]);
      let centroid = (a + b + c) / 3.0;
      assert!(
        normal.dot(centroid - center) > 0.0,
        "triangle {} at {:?} faces inward",
        i,
        centroid
      );

      let ahead = centroid + normal * 0.25;
      let value = sampler.sample(ahead.to_array().map(f64::from));
      assert!(value < 0.0, "triangle {} normal leads inside ({})", i, value);

      volume += (a - center).dot((b - center).cross(c - center)) / 6.0;
    }

    let expected = 4.0 / 3.0 * std::f32::consts::PI * (RADIUS as f32).powi(3);
    assert!(volume > 0.0);
    assert!((volume - expected).abs() < expected * 0.1, "volume {} vs {}", volume, expected);
  }
}

#[test]
fn test_dual_flat_mode() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let (_, smooth, _) = mesh_dual(&samples, dims, &dual_config());
  let config = dual_config().with_normal_mode(NormalMode::Flat);
  let (_, flat, stats) = mesh_dual(&samples, dims, &config);

  assert_eq!(flat.triangle_count(), smooth.triangle_count());
  assert_eq!(flat.vertices.len(), flat.triangle_count() * 3);
  assert_eq!(stats.vertices, flat.vertices.len());
  for i in 0..flat.triangle_count() {
    for id in flat.triangle(i) {
      assert_eq!(flat.vertices[id as usize].normal, flat.face_normals[i]);
    }
  }
}

#[test]
fn test_dual_differs_from_tetrahedra() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let (_, dual, _) = mesh_dual(&samples, dims, &dual_config());
  let (_, tetra, _) = mesh_dual(&samples, dims, &MeshConfig::default());

  // One vertex per cut tetrahedron instead of one per crossed line.
  assert!(dual.vertices.len() > tetra.vertices.len());
}

// =============================================================================
// Rings
// =============================================================================

#[test]
fn test_close_ring_drops_repeats() {
  let mut repeated = ring(&[4, 4, 7, 9, 9, 2, 4]);
  close_ring(&mut repeated);
  assert_eq!(repeated.as_slice(), &[4, 7, 9, 2]);

  let mut collapsed = ring(&[3, 3, 3, 3]);
  close_ring(&mut collapsed);
  assert_eq!(collapsed.as_slice(), &[3]);
}

#[test]
fn test_pinched_ring_splits_into_loops() {
  // Two triangles meeting at welded point 0.
  let mut dual = DualBuffers::default();
  for p in [[0.0, 0.0], [1.0, 0.5], [1.0, 1.0], [-1.0, -0.5], [-1.0, -1.0]] {
    dual.points.push(DualPoint {
      position: Vec3A::new(p[0], p[1], 0.0),
      normal: Vec3A::Z,
      source: 0,
    });
  }

  emit_polygon(&[0, 1, 2, 0, 3, 4], &mut dual);

  let faces: Vec<[u32; 3]> = dual.faces.iter().map(|face| face.points).collect();
  assert_eq!(faces, vec![[0, 1, 2], [0, 3, 4]]);
}

#[test]
fn test_tiny_faces_take_dual_normals() {
  let mut dual = DualBuffers::default();
  let normal = Vec3A::new(1.0, 1.0, 0.0).normalize();
  for x in [0.0, 1e-6, 2e-6] {
    dual.points.push(DualPoint {
      position: Vec3A::new(x, 0.0, 0.0),
      normal,
      source: 0,
    });
  }
  dual.faces.push(DualFace {
    points: [0, 1, 2],
    normal: Vec3A::ZERO,
  });

  let mut stats = MeshStats::default();
  face_normals(&mut dual, &mut stats);

  assert!(dual.faces[0].normal.abs_diff_eq(normal, 1e-5));
  assert_eq!(stats.degenerate_normals, 1);
}

// =============================================================================
// Boundaries and bad input
// =============================================================================

#[test]
fn test_rings_leaving_the_grid_are_skipped() {
  let mut samples = vec![-1.0; 8];
  samples[1] = 1.0;

  let (ctx, output, stats) = mesh_dual(&samples, GridDims::cubic(2), &dual_config());

  assert_eq!(ctx.dual_points().len(), 1);
  assert!(output.is_empty());
  assert!(stats.is_clean());
}

#[test]
fn test_invalid_tet_reports_missing_facet() {
  let _ = env_logger::builder().is_test(true).try_init();
  let (mut samples, dims) = sphere_samples(6, 1.6, [2.5, 2.5, 2.5]);
  let (_, clean, stats) = mesh_dual(&samples, dims, &dual_config());
  assert!(stats.is_clean());
  assert!(!clean.is_empty());

  samples[dims.index(2, 1, 1)] = f32::NAN;
  let (_, output, stats) = mesh_dual(&samples, dims, &dual_config());

  assert!(stats.invalid_patterns > 0);
  assert!(stats.missing_facets > 0);
  assert!(stats
    .diagnostics
    .iter()
    .any(|d| matches!(d, MeshError::MissingNeighborFacet { .. })));
  assert!(output.triangle_count() < clean.triangle_count());
}

#[test]
fn test_buffers_reset_between_runs() {
  let (samples, dims) = sphere_samples(16, RADIUS, CENTER);
  let mut ctx = MesherContext::new();
  let field = ScalarField::new(&samples, dims);

  let mut first = MeshOutput::new();
  ctx.mesh(&field, &dual_config(), &mut first).unwrap();
  let points = ctx.dual_points().len();

  let mut second = MeshOutput::new();
  ctx.mesh(&field, &dual_config(), &mut second).unwrap();

  assert_eq!(ctx.dual_points().len(), points);
  assert_eq!(first.indices, second.indices);
  assert_eq!(first.vertices, second.vertices);
}
