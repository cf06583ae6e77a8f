//! `TriangleMesh`: an indexed triangle soup and the cleanup utilities the
//! intersection pipeline runs over it

use crate::errors::ValidationError;
use crate::float_types::{
    PI, Real,
    parry3d::{
        bounding_volume::Aabb,
        shape::{TriMesh, Triangle},
    },
};
use nalgebra::{Point3, Unit, Vector3, partial_max, partial_min};
use std::sync::OnceLock;

pub mod shapes;

/// An indexed triangle soup: a vertex position array and a triangle array of
/// index triples into it. The only face type the intersection pipeline
/// accepts; polygonal input must be triangulated before it gets here.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Vertex positions
    pub vertices: Vec<Point3<Real>>,

    /// Counter-clockwise (seen from outside) index triples into `vertices`
    pub triangles: Vec<[usize; 3]>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl TriangleMesh {
    /// An empty mesh
    pub fn new() -> Self {
        TriangleMesh {
            vertices: Vec::new(),
            triangles: Vec::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Build a mesh from raw arrays, failing fast on malformed input.
    ///
    /// ## Errors
    /// [`ValidationError::InvalidCoordinate`] for NaN/infinite positions,
    /// [`ValidationError::IndexOutOfRange`] and
    /// [`ValidationError::RepeatedIndex`] for bad triangle references.
    pub fn from_arrays(
        vertices: Vec<Point3<Real>>,
        triangles: Vec<[usize; 3]>,
    ) -> Result<Self, ValidationError> {
        let mesh = TriangleMesh {
            vertices,
            triangles,
            bounding_box: OnceLock::new(),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Check the soup invariants: finite coordinates, in-bounds and
    /// pairwise-distinct vertex references per triangle.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for vertex in &self.vertices {
            if !(vertex.x.is_finite() && vertex.y.is_finite() && vertex.z.is_finite()) {
                return Err(ValidationError::InvalidCoordinate(*vertex));
            }
        }
        for (t, tri) in self.triangles.iter().enumerate() {
            for &index in tri {
                if index >= self.vertices.len() {
                    return Err(ValidationError::IndexOutOfRange {
                        triangle: t,
                        index,
                        vertex_count: self.vertices.len(),
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
                let repeated = if tri[0] == tri[1] || tri[0] == tri[2] {
                    tri[0]
                } else {
                    tri[1]
                };
                return Err(ValidationError::RepeatedIndex {
                    triangle: t,
                    index: repeated,
                });
            }
        }
        Ok(())
    }

    /// The three corner positions of triangle `index`.
    pub fn triangle_points(&self, index: usize) -> [Point3<Real>; 3] {
        let [i0, i1, i2] = self.triangles[index];
        [self.vertices[i0], self.vertices[i1], self.vertices[i2]]
    }

    /// Triangle `index` as a parry shape, for ray/point queries.
    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangle_points(index);
        Triangle::new(a, b, c)
    }

    /// Geometric outward normal of triangle `index` by the right-hand rule;
    /// `None` when the triangle is degenerate.
    pub fn triangle_normal(&self, index: usize) -> Option<Unit<Vector3<Real>>> {
        self.triangle(index).normal()
    }

    /// Return a translated copy of this mesh.
    pub fn translate(&self, x: Real, y: Real, z: Real) -> TriangleMesh {
        let offset = Vector3::new(x, y, z);
        TriangleMesh {
            vertices: self.vertices.iter().map(|vertex| *vertex + offset).collect(),
            triangles: self.triangles.clone(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `vertices`.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            // Track overall min/max in x, y, z among all vertices
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for vertex in &self.vertices {
                min_x = *partial_min(&min_x, &vertex.x).unwrap();
                min_y = *partial_min(&min_y, &vertex.y).unwrap();
                min_z = *partial_min(&min_z, &vertex.z).unwrap();

                max_x = *partial_max(&max_x, &vertex.x).unwrap();
                max_y = *partial_max(&max_y, &vertex.y).unwrap();
                max_z = *partial_max(&max_z, &vertex.z).unwrap();
            }

            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        })
    }

    /// Convert this mesh to a parry `TriMesh`, the spatial-index backing shape.
    ///
    /// ## Errors
    /// Parry returns a `TriMeshBuilderError` for empty or inconsistent input.
    pub fn to_trimesh(&self) -> Result<TriMesh, ValidationError> {
        let vertices = self.vertices.clone();
        let indices = self
            .triangles
            .iter()
            .map(|tri| [tri[0] as u32, tri[1] as u32, tri[2] as u32])
            .collect();
        Ok(TriMesh::new(vertices, indices)?)
    }

    /// Merge vertices closer than `epsilon` into a single vertex at the
    /// cluster centroid, remapping all triangle references. Independent
    /// planar patches materialize duplicate vertices at shared intersection
    /// points; this pass welds them back together.
    pub fn merge_vertices(&mut self, epsilon: Real) {
        if self.vertices.is_empty() {
            return;
        }

        let mut vertex_clusters = Vec::new();
        let mut vertex_to_cluster: Vec<Option<usize>> = vec![None; self.vertices.len()];

        // Build clusters of nearby vertices
        for (i, vertex) in self.vertices.iter().enumerate() {
            if vertex_to_cluster[i].is_some() {
                continue; // Already assigned to a cluster
            }

            // Start new cluster
            let cluster_id = vertex_clusters.len();
            let mut cluster_vertices = vec![i];
            vertex_to_cluster[i] = Some(cluster_id);

            // Find nearby vertices
            for (j, other_vertex) in self.vertices.iter().enumerate().skip(i + 1) {
                if vertex_to_cluster[j].is_none() {
                    let distance = (vertex - other_vertex).norm();
                    if distance < epsilon {
                        cluster_vertices.push(j);
                        vertex_to_cluster[j] = Some(cluster_id);
                    }
                }
            }

            vertex_clusters.push(cluster_vertices);
        }

        // Create merged vertices (centroids of clusters)
        let mut merged_vertices: Vec<Point3<Real>> = Vec::with_capacity(vertex_clusters.len());
        let mut old_to_new_index = vec![0; self.vertices.len()];

        for (cluster_id, cluster) in vertex_clusters.iter().enumerate() {
            let centroid = cluster.iter().fold(Point3::origin(), |acc, &idx| {
                acc + self.vertices[idx].coords
            }) / cluster.len() as Real;
            merged_vertices.push(centroid);

            // Update index mapping
            for &old_idx in cluster {
                old_to_new_index[old_idx] = cluster_id;
            }
        }

        // Update triangle indices
        for tri in &mut self.triangles {
            for idx in tri {
                *idx = old_to_new_index[*idx];
            }
        }

        // Replace vertices
        self.vertices = merged_vertices;

        // Invalidate cached bounding box
        self.bounding_box = OnceLock::new();
    }

    /// Drop triangles left degenerate after merging: repeated indices, an
    /// edge shorter than `epsilon`, or vanishing area. Vertex positions are
    /// untouched.
    pub fn dissolve_degenerate(&mut self, epsilon: Real) {
        let vertices = &self.vertices;
        self.triangles.retain(|tri| {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
                return false;
            }
            let a = vertices[tri[0]];
            let b = vertices[tri[1]];
            let c = vertices[tri[2]];
            let shortest_edge = (b - a).norm().min((c - b).norm()).min((a - c).norm());
            if shortest_edge < epsilon {
                return false;
            }
            (b - a).cross(&(c - a)).norm() * 0.5 > epsilon * epsilon
        });
    }

    /// Drop vertices no triangle references and compact the vertex array.
    pub fn remove_unused_vertices(&mut self) {
        let mut used = vec![false; self.vertices.len()];
        for tri in &self.triangles {
            for &index in tri {
                used[index] = true;
            }
        }
        if used.iter().all(|&flag| flag) {
            return;
        }

        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (old_index, vertex) in self.vertices.iter().enumerate() {
            if used[old_index] {
                remap[old_index] = kept.len();
                kept.push(*vertex);
            }
        }
        for tri in &mut self.triangles {
            for index in tri {
                *index = remap[*index];
            }
        }

        self.vertices = kept;
        self.bounding_box = OnceLock::new();
    }

    /// Generalized winding number of `point` with respect to this surface:
    /// the sum of the signed solid angles subtended by every triangle,
    /// divided by 4π. For a watertight mesh the magnitude is ~1 inside and
    /// ~0 outside. The sum is discontinuous across the surface itself, so
    /// for points lying on it the result carries no information; callers
    /// that may sample the surface nudge the query point off it first.
    pub fn winding_number(&self, point: &Point3<Real>) -> Real {
        let mut total = 0.0;
        for tri in &self.triangles {
            let a = self.vertices[tri[0]] - point;
            let b = self.vertices[tri[1]] - point;
            let c = self.vertices[tri[2]] - point;
            total += solid_angle(&a, &b, &c);
        }
        total / (4.0 * PI)
    }

    /// Winding-number membership test, orientation-agnostic.
    ///
    /// ## Example
    /// ```
    /// # use trisect::TriangleMesh;
    /// # use nalgebra::Point3;
    /// let cube = TriangleMesh::cube(6.0);
    ///
    /// assert!(cube.contains_point(&Point3::new(3.0, 3.0, 3.0)));
    /// assert!(cube.contains_point(&Point3::new(1.0, 2.0, 5.9)));
    ///
    /// assert!(!cube.contains_point(&Point3::new(3.0, 3.0, 7.0)));
    /// assert!(!cube.contains_point(&Point3::new(3.0, 3.0, -1.0)));
    /// ```
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        self.winding_number(point).abs() > 0.5
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed solid angle of the triangle `(a, b, c)` seen from the origin,
/// in the numerically robust van Oosterom–Strackee `atan2` form.
fn solid_angle(a: &Vector3<Real>, b: &Vector3<Real>, c: &Vector3<Real>) -> Real {
    let la = a.norm();
    let lb = b.norm();
    let lc = c.norm();
    let numerator = a.dot(&b.cross(c));
    let denominator = la * lb * lc + a.dot(b) * lc + b.dot(c) * la + c.dot(a) * lb;
    2.0 * numerator.atan2(denominator)
}
