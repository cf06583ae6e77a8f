//! Spatial index over one mesh: parry `TriMesh` plus the BVH-backed queries
//! the pipeline and the membership tests consume

use crate::errors::ValidationError;
use crate::float_types::{
    Real, tolerance,
    parry3d::{
        query::{
            PointQuery, Ray, RayCast,
            visitors::{BoundingVolumeIntersectionsSimultaneousVisitor, RayIntersectionsVisitor},
        },
        shape::TriMesh,
    },
};
use crate::mesh::TriangleMesh;
use nalgebra::{Isometry3, Point3, Vector3};

/// Static spatial index over a mesh's current vertex positions. Build it
/// once; the indexed mesh is read-only from then on.
pub struct SpatialIndex {
    trimesh: TriMesh,
}

impl SpatialIndex {
    /// Index a mesh. Validates first, so malformed input fails here and not
    /// somewhere inside a traversal.
    ///
    /// ## Errors
    /// Input validation errors, or parry's builder error for a mesh with
    /// zero triangles (callers short-circuit empty inputs instead).
    pub fn build(mesh: &TriangleMesh) -> Result<SpatialIndex, ValidationError> {
        mesh.validate()?;
        Ok(SpatialIndex {
            trimesh: mesh.to_trimesh()?,
        })
    }

    /// Every pair of triangles, one from each index, whose bounding volumes
    /// overlap. Broad phase only: an over-approximation with no ordering
    /// guarantee and no duplicates; the narrow phase filters false positives.
    pub fn overlap_pairs(&self, other: &SpatialIndex) -> Vec<(u32, u32)> {
        let mut pairs = Vec::new();
        let mut visitor = BoundingVolumeIntersectionsSimultaneousVisitor::new(
            |triangle_1: &u32, triangle_2: &u32| {
                pairs.push((*triangle_1, *triangle_2));
                true
            },
        );
        self.trimesh.qbvh().traverse_bvtt(other.trimesh.qbvh(), &mut visitor);
        pairs
    }

    /// Casts a ray defined by `origin` + t * `direction` against the indexed
    /// triangles and returns a list of (intersection_point, distance),
    /// sorted by ascending distance. Hits closer together than the crate
    /// tolerance collapse into one, so rays grazing a shared edge count it
    /// once.
    pub fn ray_hits(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity(); // No transformation on the triangles themselves.

        // 1) Collect candidate leaves whose volumes the ray touches:
        let mut candidates: Vec<u32> = Vec::new();
        let mut record = |index: &u32| {
            candidates.push(*index);
            true
        };
        let mut visitor = RayIntersectionsVisitor::new(&ray, Real::MAX, &mut record);
        self.trimesh.qbvh().traverse_depth_first(&mut visitor);

        // 2) Exact ray–triangle test per candidate:
        let mut hits = Vec::new();
        for index in candidates {
            let triangle = self.trimesh.triangle(index);
            if let Some(hit) = triangle.cast_ray_and_get_normal(&iso, &ray, Real::MAX, true) {
                hits.push((ray.point_at(hit.time_of_impact), hit.time_of_impact));
            }
        }

        // 3) Sort hits by ascending distance (toi):
        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        // 4) remove duplicate hits if they fall within tolerance
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < tolerance());

        hits
    }

    /// Parity membership test: a point is inside a closed surface when a ray
    /// from it crosses the surface an odd number of times.
    pub fn contains(&self, point: &Point3<Real>) -> bool {
        self.ray_hits(point, &Vector3::new(1.0, 1.0, 1.0)).len() % 2 == 1
    }

    /// Monte-Carlo membership test: inside a closed surface, a ray in *any*
    /// direction hits it. `directions` is typically a fixed set of uniform
    /// unit-sphere samples.
    pub fn contains_from_all_directions(
        &self,
        point: &Point3<Real>,
        directions: &[Vector3<Real>],
    ) -> bool {
        !directions.is_empty()
            && directions
                .iter()
                .all(|direction| !self.ray_hits(point, direction).is_empty())
    }

    /// Nearest-surface membership test: project the point onto the mesh and
    /// compare the offset against the winning triangle's outward normal.
    /// Inside when the offset opposes the normal. Several triangles tie at
    /// the nearest distance whenever the closest feature is an edge or a
    /// vertex; the triangle whose normal aligns strongest with the offset
    /// decides then, since the others see the offset nearly in their own
    /// plane and the sign of that dot product is noise.
    pub fn contains_by_normal(&self, point: &Point3<Real>) -> bool {
        let tie_margin = tolerance() * tolerance();
        // (distance², |offset·normal|, offset·normal) of the winner so far.
        let mut nearest: Option<(Real, Real, Real)> = None;
        for index in 0..self.trimesh.num_triangles() {
            let triangle = self.trimesh.triangle(index as u32);
            let Some(normal) = triangle.normal() else {
                continue; // degenerate triangles get no vote
            };
            let projection = triangle.project_local_point(point, true);
            let offset = point - projection.point;
            let distance_squared = offset.norm_squared();
            let alignment = offset.dot(&normal.into_inner());
            let replace = match nearest {
                None => true,
                Some((best_distance, best_alignment, _)) => {
                    if distance_squared + tie_margin < best_distance {
                        true
                    } else if distance_squared <= best_distance + tie_margin {
                        alignment.abs() > best_alignment
                    } else {
                        false
                    }
                },
            };
            if replace {
                nearest = Some((distance_squared, alignment.abs(), alignment));
            }
        }
        nearest.is_some_and(|(_, _, alignment)| alignment < 0.0)
    }
}
