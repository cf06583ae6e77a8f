//! Mesh/mesh corefinement and boolean intersection
//!
//! The pipeline has three stages. The broad phase walks both meshes' BVHs
//! simultaneously and yields candidate triangle pairs. The narrow phase
//! ([`tri_tri`]) turns each candidate pair into concrete intersection
//! points, recorded per triangle of *both* meshes ([`evidence`]). Assembly
//! ([`patch`]) then rebuilds every triangle of both inputs as a planar
//! Delaunay patch over its corners and accumulated evidence, so the two
//! surfaces end up sharing vertices along their intersection curves.
//!
//! [`TriangleMesh::corefine`] returns that combined surface whole.
//! [`TriangleMesh::intersection`] additionally keeps only the faces that
//! bound the common volume, leaving the boolean intersection volume's
//! boundary.

mod evidence;
mod patch;
mod tri_tri;

use std::sync::OnceLock;

use nalgebra::Point3;

use crate::bvh::SpatialIndex;
use crate::errors::ValidationError;
use crate::float_types::{parry3d::shape::Triangle, tolerance};
use crate::mesh::TriangleMesh;
use evidence::EvidenceMap;

impl TriangleMesh {
    /// Corefine this mesh against `other`: split the triangles of both
    /// meshes along their mutual intersection curves and return both
    /// surfaces combined into one mesh. Every face of both inputs is kept;
    /// coincident vertices along the curves (and between neighbouring
    /// patches) are welded, and triangles left degenerate by the split are
    /// dissolved.
    pub fn corefine(&self, other: &TriangleMesh) -> Result<TriangleMesh, ValidationError> {
        let (mut mesh, _) = corefine_assembled(self, other)?;
        finalize(&mut mesh);
        Ok(mesh)
    }

    /// Boolean intersection of the volumes bounded by this mesh and
    /// `other`. Both surfaces are corefined, then a face survives only when
    /// the volume just behind it (against its outward normal) lies inside
    /// the other input, so walls coincident with the other surface resolve
    /// the same way as strictly interior ones. Disjoint solids therefore
    /// produce an empty mesh; where the surfaces overlap in coplanar
    /// regions with matching orientation, both coverings are kept.
    ///
    /// Both inputs must be closed, consistently oriented surfaces for the
    /// winding-number selection to be meaningful.
    pub fn intersection(&self, other: &TriangleMesh) -> Result<TriangleMesh, ValidationError> {
        let (mut mesh, from_first) = corefine_assembled(self, other)?;

        let epsilon = tolerance();
        let kept: Vec<[usize; 3]> = mesh
            .triangles
            .iter()
            .zip(&from_first)
            .filter_map(|(&[a, b, c], &source_first)| {
                let face =
                    Triangle::new(mesh.vertices[a], mesh.vertices[b], mesh.vertices[c]);
                // The winding number is discontinuous across the other
                // surface, and walls coincident with it put face centroids
                // exactly there. A sample nudged just inside the face's own
                // solid is off that surface, so membership is well defined.
                let normal = face.normal()?;
                let centroid =
                    Point3::from((face.a.coords + face.b.coords + face.c.coords) / 3.0);
                let sample = centroid - normal.into_inner() * epsilon;
                let opposite = if source_first { other } else { self };
                opposite.contains_point(&sample).then_some([a, b, c])
            })
            .collect();
        mesh.triangles = kept;

        finalize(&mut mesh);
        Ok(mesh)
    }
}

/// Runs broad phase, narrow phase and patch assembly, returning the
/// combined mesh before any cleanup together with one provenance flag per
/// face: `true` when the face descends from a triangle of `first`.
fn corefine_assembled(
    first: &TriangleMesh,
    second: &TriangleMesh,
) -> Result<(TriangleMesh, Vec<bool>), ValidationError> {
    first.validate()?;
    second.validate()?;

    let epsilon = tolerance();
    let mut evidence = EvidenceMap::new(first.triangles.len(), second.triangles.len());

    // The BVH pruning never produces pairs when either mesh has no
    // triangles, so skip building the indices entirely.
    if !first.is_empty() && !second.is_empty() {
        let index_first = SpatialIndex::build(first)?;
        let index_second = SpatialIndex::build(second)?;
        for (triangle_first, triangle_second) in index_first.overlap_pairs(&index_second) {
            let tri_first = first.triangle(triangle_first as usize);
            let tri_second = second.triangle(triangle_second as usize);

            // Both directions per pair: edges of each triangle against the
            // plane of the other. Either side alone misses pairs where only
            // one triangle's edges pierce the other.
            let mut points = tri_tri::edge_plane_points(&tri_first, &tri_second, epsilon);
            points.extend(tri_tri::edge_plane_points(&tri_second, &tri_first, epsilon));
            evidence.extend_pair(
                triangle_first as usize,
                triangle_second as usize,
                &points,
            );
        }
    }

    // Rebuild every triangle of both meshes, evidence or not. Untouched
    // triangles come back as themselves; degenerate patches vanish.
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut from_first = Vec::with_capacity(evidence.len());
    for global in 0..evidence.len() {
        let (corners, source_first) = if global < evidence.split() {
            (first.triangle_points(global), true)
        } else {
            (second.triangle_points(global - evidence.split()), false)
        };
        let faces = patch::append_patch(
            corners,
            evidence.entry(global),
            epsilon,
            &mut vertices,
            &mut triangles,
        );
        from_first.resize(from_first.len() + faces, source_first);
    }

    Ok((
        TriangleMesh {
            vertices,
            triangles,
            bounding_box: OnceLock::new(),
        },
        from_first,
    ))
}

fn finalize(mesh: &mut TriangleMesh) {
    let epsilon = tolerance();
    mesh.merge_vertices(epsilon);
    mesh.dissolve_degenerate(epsilon);
    mesh.remove_unused_vertices();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_meshes_assemble_every_triangle_unchanged() {
        let near = TriangleMesh::cube(1.0);
        let far = near.translate(5.0, 0.0, 0.0);

        let (mesh, from_first) = corefine_assembled(&near, &far).unwrap();
        assert_eq!(mesh.triangles.len(), 24, "12 faces per cube, none split");
        assert_eq!(from_first.len(), 24);
        assert!(from_first[..12].iter().all(|&flag| flag));
        assert!(from_first[12..].iter().all(|&flag| !flag));
        // Each patch materializes its own corners; welding happens later.
        assert_eq!(mesh.vertices.len(), 72);
    }

    #[test]
    fn overlapping_meshes_split_faces_on_both_sides() {
        let left = TriangleMesh::cube(1.0);
        let right = left.translate(0.5, 0.0, 0.0);

        let (mesh, from_first) = corefine_assembled(&left, &right).unwrap();
        assert_eq!(from_first.len(), mesh.triangles.len());
        assert!(
            mesh.triangles.len() > 24,
            "the seam must split faces beyond the original 24"
        );
        let first_faces = from_first.iter().filter(|&&flag| flag).count();
        assert!(first_faces > 12, "faces of the first mesh were split");
        assert!(
            from_first.len() - first_faces > 12,
            "faces of the second mesh were split"
        );
    }

    #[test]
    fn empty_inputs_short_circuit() {
        let cube = TriangleMesh::cube(1.0);
        let empty = TriangleMesh::new();

        let (mesh, from_first) = corefine_assembled(&cube, &empty).unwrap();
        assert_eq!(mesh.triangles.len(), 12);
        assert!(from_first.iter().all(|&flag| flag));

        let (mesh, from_first) = corefine_assembled(&empty, &empty).unwrap();
        assert!(mesh.is_empty());
        assert!(from_first.is_empty());
    }

    #[test]
    fn validation_failures_surface_before_any_work() {
        let mut broken = TriangleMesh::cube(1.0);
        broken.triangles[0] = [0, 0, 1];
        assert!(broken.corefine(&TriangleMesh::cube(1.0)).is_err());
        assert!(TriangleMesh::cube(1.0).intersection(&broken).is_err());
    }
}
