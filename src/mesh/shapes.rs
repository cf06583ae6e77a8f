//! Triangulated primitive shapes, mostly as pipeline fixtures

use crate::float_types::Real;
use crate::mesh::TriangleMesh;
use nalgebra::Point3;
use std::sync::OnceLock;

impl TriangleMesh {
    /// Axis-aligned box spanning `(0, 0, 0)` to `(width, length, height)`,
    /// eight shared vertices, each quad face split into two triangles wound
    /// counter-clockwise seen from outside.
    ///
    /// ```text
    ///     4-------5
    ///    /|      /|
    ///   7-------6 |
    ///   | |     | |
    ///   | 0-----|-1
    ///   |/      |/
    ///   3-------2
    /// ```
    pub fn cuboid(width: Real, length: Real, height: Real) -> TriangleMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),          // 0: origin
            Point3::new(width, 0.0, 0.0),        // 1: +X
            Point3::new(width, length, 0.0),     // 2: +X+Y
            Point3::new(0.0, length, 0.0),       // 3: +Y
            Point3::new(0.0, 0.0, height),       // 4: +Z
            Point3::new(width, 0.0, height),     // 5: +X+Z
            Point3::new(width, length, height),  // 6: +X+Y+Z
            Point3::new(0.0, length, height),    // 7: +Y+Z
        ];

        // Quad faces with proper winding order (CCW from outside)
        let face_definitions: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // bottom (normal -Z)
            [4, 5, 6, 7], // top (normal +Z)
            [0, 1, 5, 4], // front (normal -Y)
            [3, 7, 6, 2], // back (normal +Y)
            [0, 4, 7, 3], // left (normal -X)
            [1, 2, 6, 5], // right (normal +X)
        ];

        let mut triangles = Vec::with_capacity(12);
        for [q0, q1, q2, q3] in face_definitions {
            triangles.push([q0, q1, q2]);
            triangles.push([q0, q2, q3]);
        }

        TriangleMesh {
            vertices,
            triangles,
            bounding_box: OnceLock::new(),
        }
    }

    /// Cube with edge `width`, one corner at the origin.
    pub fn cube(width: Real) -> TriangleMesh {
        Self::cuboid(width, width, width)
    }

    /// Right-angle tetrahedron with unit legs at the origin, outward winding.
    pub fn tetrahedron() -> TriangleMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let triangles = vec![
            [0, 2, 1], // bottom (normal -Z)
            [0, 1, 3], // front (normal -Y)
            [0, 3, 2], // left (normal -X)
            [1, 2, 3], // slanted
        ];

        TriangleMesh {
            vertices,
            triangles,
            bounding_box: OnceLock::new(),
        }
    }
}
