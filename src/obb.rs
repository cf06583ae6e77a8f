//! Minimal-volume oriented bounding boxes
//!
//! The candidate orientations come from the faces of the convex hull: for
//! every hull face, the box is aligned to the face normal and one of the
//! face's edges, and the best candidate over all faces wins. The exact
//! minimal box is aligned to *some* hull face in one axis, so scanning
//! face frames lands on it or very close for meshes with flat features.

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::shape::Triangle, tolerance};
use chull::ConvexHullWrapper;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// An oriented box: `rotation` maps world coordinates into the box frame,
/// where the box is the axis-aligned span from `mins` to `maxs`.
#[derive(Debug, Clone, Copy)]
pub struct OrientedBox {
    pub rotation: Rotation3<Real>,
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl OrientedBox {
    /// Side lengths along the box frame axes.
    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }

    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// The eight box corners in world coordinates. Corner `k` takes its
    /// x/y/z from `mins` or `maxs` according to bits 0, 1 and 2 of `k`.
    pub fn corners(&self) -> [Point3<Real>; 8] {
        let back = self.rotation.inverse();
        let mut corners = [Point3::origin(); 8];
        for (k, corner) in corners.iter_mut().enumerate() {
            let local = Point3::new(
                if k & 1 == 0 { self.mins.x } else { self.maxs.x },
                if k & 2 == 0 { self.mins.y } else { self.maxs.y },
                if k & 4 == 0 { self.mins.z } else { self.maxs.z },
            );
            *corner = back * local;
        }
        corners
    }
}

/// Smallest-volume box over the convex hull of `points`, searching the
/// hull's face-aligned frames. Needs at least four points spanning a
/// volume; flat or near-flat point sets fail the hull construction.
pub fn minimal_obb(points: &[Point3<Real>]) -> Result<OrientedBox, ValidationError> {
    if points.len() < 4 {
        return Err(ValidationError::Other(
            "minimal oriented box needs at least 4 points".to_string(),
            None,
        ));
    }

    let rows: Vec<Vec<Real>> = points.iter().map(|p| vec![p.x, p.y, p.z]).collect();
    let hull = ConvexHullWrapper::try_new(&rows, None).map_err(|error| {
        ValidationError::Other(format!("convex hull construction failed: {error:?}"), None)
    })?;
    let (hull_vertices, hull_indices) = hull.vertices_indices();
    let hull_points: Vec<Point3<Real>> = hull_vertices
        .iter()
        .map(|row| Point3::new(row[0], row[1], row[2]))
        .collect();

    let mut best: Option<OrientedBox> = None;
    for face in hull_indices.chunks(3) {
        let (a, b, c) = (
            hull_points[face[0]],
            hull_points[face[1]],
            hull_points[face[2]],
        );
        let Some(normal) = Triangle::new(a, b, c).normal() else {
            continue;
        };

        // Each edge of the face fixes the in-plane axis of one candidate
        // frame. Hull faces are triangulated, so coplanar regions still
        // offer their true boundary edges through some face.
        for (start, end) in [(a, b), (b, c), (c, a)] {
            let edge = end - start;
            let length = edge.norm();
            if length < tolerance() {
                continue;
            }
            let edge = edge / length;
            let tangent = normal.cross(&edge);
            let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_rows(&[
                edge.transpose(),
                tangent.transpose(),
                normal.transpose(),
            ]));

            let mut mins = rotation * hull_points[0];
            let mut maxs = mins;
            for point in &hull_points[1..] {
                let local = rotation * point;
                mins = Point3::new(
                    mins.x.min(local.x),
                    mins.y.min(local.y),
                    mins.z.min(local.z),
                );
                maxs = Point3::new(
                    maxs.x.max(local.x),
                    maxs.y.max(local.y),
                    maxs.z.max(local.z),
                );
            }

            let candidate = OrientedBox {
                rotation,
                mins,
                maxs,
            };
            if best
                .as_ref()
                .is_none_or(|current| candidate.volume() < current.volume())
            {
                best = Some(candidate);
            }
        }
    }

    best.ok_or_else(|| {
        ValidationError::Other("convex hull produced only degenerate faces".to_string(), None)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_cover_every_min_max_combination() {
        let box_ = OrientedBox {
            rotation: Rotation3::identity(),
            mins: Point3::new(-1.0, -2.0, -3.0),
            maxs: Point3::new(1.0, 2.0, 3.0),
        };
        let corners = box_.corners();
        assert_eq!(corners.len(), 8);
        for x in [-1.0, 1.0] {
            for y in [-2.0, 2.0] {
                for z in [-3.0, 3.0] {
                    assert!(
                        corners
                            .iter()
                            .any(|c| (c - Point3::new(x, y, z)).norm() < 1e-12),
                        "missing corner ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn too_few_points_are_rejected() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(minimal_obb(&points).is_err());
    }
}
