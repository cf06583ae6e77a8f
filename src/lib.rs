//! Triangle-mesh **corefinement and boolean intersection**, built around a
//! per-triangle re-triangulation pipeline: a BVH broad phase collects
//! candidate triangle pairs, an edge/plane narrow phase turns each pair into
//! intersection points, and every triangle is rebuilt as a planar Delaunay
//! patch so both surfaces share vertices along their intersection curves.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **obb**: minimal-volume oriented bounding boxes using [chull](https://crates.io/crates/chull)
//! - **sampling**: seeded rejection sampling of points inside a surface
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bvh;
pub mod errors;
pub mod float_types;
pub mod mesh;

mod intersect;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use bvh::SpatialIndex;
pub use errors::ValidationError;
pub use mesh::TriangleMesh;

#[cfg(feature = "obb")]
pub mod obb;

#[cfg(feature = "sampling")]
pub mod sampling;
