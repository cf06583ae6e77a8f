//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;
use std::fmt::Display;

/// All the possible validation issues we might encounter
///
/// Every variant is a fatal input violation: the pipeline checks for these
/// before building any spatial index and never starts processing bad meshes.
/// Degenerate per-triangle geometry is *not* an error and is recovered
/// locally by emitting zero faces for the triangle concerned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    InvalidCoordinate(Point3<Real>),
    /// (IndexOutOfRange) A triangle references a vertex past the end of the vertex array
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
    /// (RepeatedIndex) A triangle references the same vertex twice
    RepeatedIndex { triangle: usize, index: usize },
    /// In general, anything else
    Other(String, Option<Point3<Real>>),
    /// Indicates an inconsistency while building a triangle mesh
    TriMesh(#[from] crate::float_types::parry3d::shape::TriMeshBuilderError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidCoordinate(opoint) => write!(
                f,
                "(InvalidCoordinate) The coordinate ({}) has a NaN or infinite",
                opoint
            ),
            ValidationError::IndexOutOfRange {
                triangle,
                index,
                vertex_count,
            } => write!(
                f,
                "(IndexOutOfRange) Triangle {} references vertex {} (vertex count = {})",
                triangle, index, vertex_count
            ),
            ValidationError::RepeatedIndex { triangle, index } => write!(
                f,
                "(RepeatedIndex) Triangle {} references vertex {} more than once",
                triangle, index
            ),
            ValidationError::Other(str, opoint) => {
                if let Some(opoint) = opoint {
                    write!(f, "{} at: {}", str, opoint)
                } else {
                    write!(f, "{}", str)
                }
            },
            ValidationError::TriMesh(tri_mesh_builder_error) => tri_mesh_builder_error.fmt(f),
        }
    }
}
