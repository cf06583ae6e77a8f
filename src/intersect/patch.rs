//! Per-triangle re-triangulation
//!
//! Once the narrow phase has attached intersection points to a triangle,
//! the triangle is rebuilt as a planar constrained Delaunay patch over its
//! corners plus that evidence. The triangulation runs in 2D after rotating
//! the triangle's plane onto the XY plane; emitted vertices are lifted back
//! by reusing the original 3D coordinates, so the rotation never leaks
//! round-trip error into the output mesh.

use crate::float_types::{PI, Real, parry3d::shape::Triangle};
use hashbrown::HashSet;
use nalgebra::{Point3, Rotation3, Vector3};
use spade::{DelaunayTriangulation, Point2, Triangulation};

/// Coordinates closer to zero than this are snapped to zero before being
/// handed to the triangulator, which rejects denormal magnitudes.
#[allow(clippy::excessive_precision)]
const MIN_SPADE_COORDINATE: Real = 1.793662034335766e-43;

/// Re-triangulates one source triangle over its `corners` and `evidence`
/// points, appending the resulting vertices and faces to the output mesh
/// buffers. Returns the number of faces emitted; zero means the patch was
/// degenerate and the source triangle disappears from the output.
pub(crate) fn append_patch(
    corners: [Point3<Real>; 3],
    evidence: &[Point3<Real>],
    epsilon: Real,
    vertices: &mut Vec<Point3<Real>>,
    triangles: &mut Vec<[usize; 3]>,
) -> usize {
    let points = dedup_with_corners(corners, evidence, epsilon);
    if points.len() < 3 {
        return 0;
    }
    let Some(rotation) = plane_rotation(&corners) else {
        return 0;
    };

    // Triangulate in the rotated plane. Handles are dense, so a vector maps
    // them back to the deduplicated input points; a point whose projection
    // coincides with an earlier one keeps the earlier mapping.
    let mut triangulation: DelaunayTriangulation<Point2<Real>> = DelaunayTriangulation::new();
    let mut by_handle: Vec<usize> = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let flat = rotation * point;
        let Ok(handle) = triangulation.insert(Point2::new(
            clamp_spade(flat.x),
            clamp_spade(flat.y),
        )) else {
            return 0;
        };
        if handle.index() == by_handle.len() {
            by_handle.push(index);
        }
    }

    // Lift each face back to 3D lazily: a deduplicated point becomes an
    // output vertex the first time a face references it.
    let mut emitted: Vec<Option<usize>> = vec![None; points.len()];
    let mut faces = 0;
    for face in triangulation.inner_faces() {
        let mut indices = [0usize; 3];
        for (slot, vertex) in indices.iter_mut().zip(face.vertices()) {
            let source = by_handle[vertex.fix().index()];
            *slot = *emitted[source].get_or_insert_with(|| {
                vertices.push(points[source]);
                vertices.len() - 1
            });
        }
        triangles.push(indices);
        faces += 1;
    }
    faces
}

/// Order-preserving deduplication on a quantized grid of cell size
/// `epsilon`. Corners are seeded first so an evidence point within a
/// corner's cell resolves to the corner's exact coordinates.
fn dedup_with_corners(
    corners: [Point3<Real>; 3],
    evidence: &[Point3<Real>],
    epsilon: Real,
) -> Vec<Point3<Real>> {
    let quantize = |point: &Point3<Real>| -> [i64; 3] {
        [
            (point.x / epsilon).round() as i64,
            (point.y / epsilon).round() as i64,
            (point.z / epsilon).round() as i64,
        ]
    };

    let mut seen: HashSet<[i64; 3]> = HashSet::with_capacity(3 + evidence.len());
    let mut points = Vec::with_capacity(3 + evidence.len());
    for point in corners.iter().chain(evidence) {
        if seen.insert(quantize(point)) {
            points.push(*point);
        }
    }
    points
}

/// Rotation taking the triangle's plane onto the XY plane, with the normal
/// mapped to +Z so face winding in 2D matches the source winding. `None`
/// for triangles without a normal.
fn plane_rotation(corners: &[Point3<Real>; 3]) -> Option<Rotation3<Real>> {
    let normal = Triangle::new(corners[0], corners[1], corners[2]).normal()?;
    Some(
        Rotation3::rotation_between(&normal, &Vector3::z())
            // Exactly opposite normals have no unique alignment; any
            // half-turn through a horizontal axis works.
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI)),
    )
}

fn clamp_spade(value: Real) -> Real {
    if value.abs() < MIN_SPADE_COORDINATE {
        0.0
    } else {
        value
    }
}
