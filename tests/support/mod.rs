//! Test support library
//! Provides various helper functions & utilities for tests.

use trisect::TriangleMesh;
use trisect::float_types::Real;

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a mesh's vertices, computed independently of the library's own cache.
pub fn bounding_box(mesh: &TriangleMesh) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for p in &mesh.vertices {
        if p.x < min_x {
            min_x = p.x;
        }
        if p.y < min_y {
            min_y = p.y;
        }
        if p.z < min_z {
            min_z = p.z;
        }
        if p.x > max_x {
            max_x = p.x;
        }
        if p.y > max_y {
            max_y = p.y;
        }
        if p.z > max_z {
            max_z = p.z;
        }
    }

    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// True when `mesh` has some vertex within `eps` of `(x, y, z)`.
pub fn has_vertex_near(mesh: &TriangleMesh, x: Real, y: Real, z: Real, eps: Real) -> bool {
    mesh.vertices
        .iter()
        .any(|v| (v - nalgebra::Point3::new(x, y, z)).norm() < eps)
}
