use super::*;
use crate::error::MeshError;
use crate::sdf_samplers::{FieldSampler, SphereSampler, TorusSampler};
use crate::types::{GridDims, NormalMode, Topology};

fn sphere() -> (Vec<f32>, GridDims) {
  let dims = GridDims::cubic(16);
  let sampler = SphereSampler::new(5.0).with_center([8.0, 8.0, 8.0]);
  (sampler.sample_grid([0, 0, 0], dims, 1.0), dims)
}

#[test]
fn test_mesh_convenience() {
  let (samples, dims) = sphere();
  let output = mesh(&ScalarField::new(&samples, dims), &MeshConfig::default()).unwrap();

  assert!(!output.is_empty());
  assert!(output.bounds.is_valid());
  assert!(output.bounds.min[0] >= 2.9 && output.bounds.max[0] <= 13.1);
}

#[test]
fn test_contract_violations_are_errors() {
  let samples = vec![1.0; 8];

  let err = mesh(&ScalarField::new(&samples, GridDims::new(1, 4, 2)), &MeshConfig::default());
  assert_eq!(err.unwrap_err(), MeshError::InvalidDimensions([1, 4, 2]));

  let err = mesh(&ScalarField::new(&samples, GridDims::cubic(3)), &MeshConfig::default());
  assert_eq!(
    err.unwrap_err(),
    MeshError::FieldSizeMismatch { expected: 27, actual: 8 }
  );

  let elements = vec![0; 3];
  let field = ScalarField::new(&samples, GridDims::cubic(2)).with_elements(&elements);
  assert_eq!(
    mesh(&field, &MeshConfig::default()).unwrap_err(),
    MeshError::ElementSizeMismatch { expected: 8, actual: 3 }
  );
}

#[test]
fn test_rejected_call_emits_nothing() {
  let samples = vec![1.0; 7];
  let mut output = MeshOutput::new();
  let result = MesherContext::new().mesh(
    &ScalarField::new(&samples, GridDims::cubic(2)),
    &MeshConfig::default(),
    &mut output,
  );

  assert!(result.is_err());
  assert!(output.is_empty());
  assert!(output.indices.is_empty());
}

#[test]
fn test_accessors_after_run() {
  let (samples, dims) = sphere();
  let mut ctx = MesherContext::new();
  let mut output = MeshOutput::new();
  let stats = ctx
    .mesh(&ScalarField::new(&samples, dims), &MeshConfig::default(), &mut output)
    .unwrap();

  assert_eq!(ctx.points().len(), stats.crossing_points);
  assert_eq!(ctx.point_normals().len(), ctx.points().len());
  assert_eq!(ctx.crossing_bits().len(), dims.sample_count());
  assert!(ctx.dual_points().is_empty());

  // Every set bit resolves to a point and every clear bit to none.
  for (sample, &bits) in ctx.crossing_bits().iter().enumerate() {
    for line in 0..6 {
      let crossed = bits & (1 << line) != 0;
      assert_eq!(ctx.point_at(sample, line).is_some(), crossed);
    }
  }

  ctx.clear();
  assert!(ctx.points().is_empty());
  assert!(ctx.faces().is_empty());
}

#[test]
fn test_repeated_runs_are_identical() {
  let sampler = TorusSampler::new(5.0, 1.7).with_center([8.2, 8.1, 7.9]);
  let dims = GridDims::cubic(16);
  let samples = sampler.sample_grid([0, 0, 0], dims, 1.0);
  let field = ScalarField::new(&samples, dims);

  for topology in [Topology::Tetrahedra, Topology::Dual] {
    for mode in [NormalMode::Smooth, NormalMode::Flat] {
      let config = MeshConfig::default().with_topology(topology).with_normal_mode(mode);

      let mut ctx = MesherContext::new();
      let mut first = MeshOutput::new();
      let mut second = MeshOutput::new();
      let a = ctx.mesh(&field, &config, &mut first).unwrap();
      let b = ctx.mesh(&field, &config, &mut second).unwrap();
      let fresh = mesh(&field, &config).unwrap();

      assert_eq!(a, b);
      assert_eq!(first.vertices, second.vertices);
      assert_eq!(first.indices, second.indices);
      assert_eq!(first.face_normals, second.face_normals);
      assert_eq!(first.vertices, fresh.vertices);
      assert_eq!(first.indices, fresh.indices);
    }
  }
}

#[test]
fn test_context_reused_across_sizes() {
  let mut ctx = MesherContext::new();
  let small = SphereSampler::new(2.0).with_center([3.0, 3.0, 3.0]);
  let large = SphereSampler::new(5.0).with_center([8.0, 8.0, 8.0]);

  for (sampler, size) in [(&large, 16), (&small, 6), (&large, 16)] {
    let dims = GridDims::cubic(size);
    let samples = sampler.sample_grid([0, 0, 0], dims, 1.0);
    let field = ScalarField::new(&samples, dims);

    let mut output = MeshOutput::new();
    ctx.mesh(&field, &MeshConfig::default(), &mut output).unwrap();
    let fresh = mesh(&field, &MeshConfig::default()).unwrap();
    assert_eq!(output.indices, fresh.indices);
    assert_eq!(ctx.crossing_bits().len(), dims.sample_count());
  }
}

#[test]
fn test_output_appends() {
  let (samples, dims) = sphere();
  let field = ScalarField::new(&samples, dims);
  let single = mesh(&field, &MeshConfig::default()).unwrap();

  let mut ctx = MesherContext::new();
  let mut output = MeshOutput::new();
  ctx.mesh(&field, &MeshConfig::default(), &mut output).unwrap();
  ctx.mesh(&field, &MeshConfig::default(), &mut output).unwrap();

  let vertex_count = single.vertices.len() as u32;
  assert_eq!(output.vertices.len(), single.vertices.len() * 2);
  assert_eq!(output.triangle_count(), single.triangle_count() * 2);

  let (head, tail) = output.indices.split_at(single.indices.len());
  assert_eq!(head, single.indices.as_slice());
  for (a, b) in tail.iter().zip(&single.indices) {
    assert_eq!(*a, b + vertex_count);
  }
}
