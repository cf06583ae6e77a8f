#![cfg(feature = "obb")]
mod support;

use nalgebra::{Point3, Rotation3, Vector3};
use support::approx_eq;
use trisect::TriangleMesh;
use trisect::float_types::Real;
use trisect::obb::minimal_obb;

#[test]
fn axis_aligned_cube_gets_a_unit_box() {
    let cube = TriangleMesh::cube(1.0);
    let obb = minimal_obb(&cube.vertices).unwrap();
    assert!(approx_eq(obb.volume(), 1.0, 1e-6));

    let extents = obb.extents();
    assert!(approx_eq(extents.x, 1.0, 1e-6));
    assert!(approx_eq(extents.y, 1.0, 1e-6));
    assert!(approx_eq(extents.z, 1.0, 1e-6));
}

#[test]
fn rotated_cube_recovers_its_true_volume() {
    let rotation = Rotation3::from_euler_angles(0.3, 0.4, 0.5);
    let points: Vec<Point3<Real>> = TriangleMesh::cube(1.0)
        .vertices
        .iter()
        .map(|vertex| rotation * vertex)
        .collect();

    let obb = minimal_obb(&points).unwrap();
    assert!(
        approx_eq(obb.volume(), 1.0, 1e-6),
        "volume {} should match the rotated unit cube",
        obb.volume()
    );

    // The world-axis box around the same points is strictly worse.
    let mut mins = points[0];
    let mut maxs = points[0];
    for point in &points[1..] {
        mins = Point3::new(mins.x.min(point.x), mins.y.min(point.y), mins.z.min(point.z));
        maxs = Point3::new(maxs.x.max(point.x), maxs.y.max(point.y), maxs.z.max(point.z));
    }
    let aabb_extents: Vector3<Real> = maxs - mins;
    let aabb_volume = aabb_extents.x * aabb_extents.y * aabb_extents.z;
    assert!(aabb_volume > 2.0, "the rotation must inflate the world box");
    assert!(obb.volume() < aabb_volume);
}

#[test]
fn every_input_point_lies_inside_the_box() {
    let rotation = Rotation3::from_euler_angles(-0.7, 0.2, 1.1);
    let points: Vec<Point3<Real>> = TriangleMesh::cuboid(2.0, 1.0, 0.5)
        .vertices
        .iter()
        .map(|vertex| rotation * vertex)
        .collect();

    let obb = minimal_obb(&points).unwrap();
    let slack = 1e-9;
    for point in &points {
        let local = obb.rotation * point;
        assert!(local.x >= obb.mins.x - slack && local.x <= obb.maxs.x + slack);
        assert!(local.y >= obb.mins.y - slack && local.y <= obb.maxs.y + slack);
        assert!(local.z >= obb.mins.z - slack && local.z <= obb.maxs.z + slack);
    }

    // The corner centroid is the box center mapped back to world space.
    let corners = obb.corners();
    let centroid = Point3::from(
        corners
            .iter()
            .fold(Vector3::zeros(), |acc, corner| acc + corner.coords)
            / 8.0,
    );
    let center = obb.rotation.inverse()
        * Point3::from((obb.mins.coords + obb.maxs.coords) / 2.0);
    assert!((centroid - center).norm() < 1e-9);
}

#[test]
fn flat_point_sets_are_rejected() {
    let flat = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.5, 0.5, 0.0),
    ];
    assert!(minimal_obb(&flat).is_err(), "coplanar points have no volume");
}
