//! Narrow-phase triangle/triangle intersection
//!
//! One invocation finds the points where the edges of the *first* triangle
//! cross the supporting plane of the *second* triangle inside the second
//! triangle. It must be invoked in both directions per pair: each direction
//! only sees points lying on the first triangle's edges, and pairs exist
//! where one triangle's edges pass through the other's interior while the
//! converse edges miss entirely.

use crate::float_types::{
    Real,
    parry3d::{query::PointQuery, shape::Triangle},
};
use nalgebra::{Point3, Vector3};

/// Points where `tri`'s edges cross `other`'s supporting plane and land on
/// `other`, accepting boundary hits within `epsilon`. Raw output: not
/// deduplicated, zero or more points per edge.
pub(crate) fn edge_plane_points(tri: &Triangle, other: &Triangle, epsilon: Real) -> Vec<Point3<Real>> {
    let Some(normal) = other.normal() else {
        // Degenerate opposite triangle: no supporting plane to cross.
        return Vec::new();
    };

    let mut points = Vec::new();
    for (start, end) in [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)] {
        let direction = end - start;
        let Some(time) = line_plane_intersection(&start, &direction, &other.a, &normal) else {
            continue; // parallel to the plane, or a zero-length edge
        };

        // The line hit must lie on the edge itself: signed distance along
        // the edge within [0, length], widened by epsilon so hits exactly on
        // an endpoint are kept.
        let length = direction.norm();
        let along = time * length;
        if along < -epsilon || along > length + epsilon {
            continue;
        }

        let hit = start + direction * time;
        if point_on_triangle(&hit, other, epsilon) {
            points.push(hit);
        }
    }
    points
}

/// Parameter `t` such that `origin + t * direction` lies on the plane, or
/// `None` when the line is parallel to it (within machine epsilon of the
/// direction/normal product).
fn line_plane_intersection(
    origin: &Point3<Real>,
    direction: &Vector3<Real>,
    plane_point: &Point3<Real>,
    plane_normal: &Vector3<Real>,
) -> Option<Real> {
    let denominator = direction.dot(plane_normal);
    if denominator.abs() < Real::EPSILON {
        return None;
    }
    Some((plane_point - origin).dot(plane_normal) / denominator)
}

/// Point-in-triangle by projection: the point counts as on the triangle when
/// its closest point on the triangle is within `epsilon`. Hits on a vertex
/// or edge of the triangle therefore pass, matching the edge-bound policy.
fn point_on_triangle(point: &Point3<Real>, triangle: &Triangle, epsilon: Real) -> bool {
    let projection = triangle.project_local_point(point, true);
    (projection.point - point).norm() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::tolerance;

    fn triangle(a: [Real; 3], b: [Real; 3], c: [Real; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn needle_through_a_large_triangle_is_one_directional() {
        // A thin triangle pierces a large one through its interior. The
        // needle's edges cross the big plane inside the big triangle, but
        // the big triangle's edges cross the needle's plane far away from
        // the needle itself.
        let large = triangle([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let needle = triangle([1.0, 1.0, -1.0], [1.2, 1.0, 1.0], [1.0, 1.2, 1.0]);

        let forward = edge_plane_points(&needle, &large, tolerance());
        assert_eq!(
            forward.len(),
            2,
            "two needle edges cross the large triangle's plane inside it"
        );
        for point in &forward {
            assert!(point.z.abs() < 1e-9, "hits lie on the large plane z = 0");
        }

        let reverse = edge_plane_points(&large, &needle, tolerance());
        assert!(
            reverse.is_empty(),
            "the large triangle's edges cross the needle's plane outside the needle"
        );
    }

    #[test]
    fn the_opposite_asymmetry_exists_too() {
        let large = triangle([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let needle = triangle([1.0, 1.0, -1.0], [1.2, 1.0, 1.0], [1.0, 1.2, 1.0]);

        // Same pair, arguments swapped: now only the swapped direction
        // reports points. Both invocations together capture the event no
        // matter which mesh each triangle came from.
        assert!(!edge_plane_points(&needle, &large, tolerance()).is_empty());
        assert!(edge_plane_points(&large, &needle, tolerance()).is_empty());
    }

    #[test]
    fn coplanar_triangles_produce_nothing() {
        let one = triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let two = triangle([0.2, 0.2, 0.0], [0.8, 0.2, 0.0], [0.2, 0.8, 0.0]);
        assert!(
            edge_plane_points(&one, &two, tolerance()).is_empty(),
            "every edge is parallel to the coplanar plane"
        );
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let ok = triangle([0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
        let collapsed = triangle([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert!(
            edge_plane_points(&ok, &collapsed, tolerance()).is_empty(),
            "a collapsed triangle has no supporting plane"
        );

        let with_zero_edge = triangle([0.5, 0.5, -1.0], [0.5, 0.5, -1.0], [0.5, 0.5, 1.0]);
        let floor = triangle([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let points = edge_plane_points(&with_zero_edge, &floor, tolerance());
        // The zero-length edge yields no candidate; the two real edges are
        // the same segment and both cross at (0.5, 0.5, 0).
        assert_eq!(points.len(), 2);
        for point in &points {
            assert!((point - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-9);
        }
    }

    #[test]
    fn hits_on_the_shared_edge_are_accepted_not_rejected() {
        // Two triangles sharing an edge to within the tolerance: the hit
        // lands exactly on a vertex of both, and the ±epsilon policy on the
        // edge bound and the containment test must keep it.
        let flat = triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let folded = triangle([0.0, 1e-6, 0.0], [1.0, 1e-6, 0.0], [0.5, 1e-6, 1.0]);

        let forward = edge_plane_points(&flat, &folded, tolerance());
        let reverse = edge_plane_points(&folded, &flat, tolerance());
        assert!(
            !forward.is_empty() || !reverse.is_empty(),
            "a shared edge within tolerance must contribute at least one point"
        );
    }

    #[test]
    fn vertex_touch_within_epsilon_counts() {
        let floor = triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        // Edge ends a hair above the floor plane, within tolerance of it
        // extended past the endpoint.
        let above = triangle(
            [0.5, 0.5, 2.0],
            [0.5, 0.5, 0.5e-5],
            [1.5, 0.5, 2.0],
        );
        let points = edge_plane_points(&above, &floor, tolerance());
        assert!(
            !points.is_empty(),
            "an endpoint within epsilon of the plane still produces its hit"
        );
    }
}
