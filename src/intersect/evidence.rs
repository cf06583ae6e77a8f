//! Per-triangle accumulation of intersection points

use crate::float_types::Real;
use nalgebra::Point3;

/// Intersection evidence for every triangle of both input meshes, keyed by a
/// stable global triangle index: mesh A's triangles occupy `0..split`, mesh
/// B's occupy `split..len`. Every triangle owns an entry from construction
/// on, even if it ends up empty, so downstream re-triangulation always has a
/// well-defined point set and untouched triangles survive as corner-only
/// patches.
pub(crate) struct EvidenceMap {
    entries: Vec<Vec<Point3<Real>>>,
    split: usize,
}

impl EvidenceMap {
    pub fn new(triangles_a: usize, triangles_b: usize) -> Self {
        EvidenceMap {
            entries: vec![Vec::new(); triangles_a + triangles_b],
            split: triangles_a,
        }
    }

    /// Total entry count; always `triangles_a + triangles_b`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First global index belonging to mesh B.
    pub fn split(&self) -> usize {
        self.split
    }

    /// The accumulated points of the triangle with global index `index`.
    pub fn entry(&self, index: usize) -> &[Point3<Real>] {
        &self.entries[index]
    }

    /// Record points from one narrow-phase invocation against the pair
    /// `(triangle_a, triangle_b)`. Each point lies on one triangle's
    /// boundary and on the other's face, so it belongs to both entries.
    pub fn extend_pair(&mut self, triangle_a: usize, triangle_b: usize, points: &[Point3<Real>]) {
        if points.is_empty() {
            return;
        }
        self.entries[triangle_a].extend_from_slice(points);
        self.entries[self.split + triangle_b].extend_from_slice(points);
    }
}
