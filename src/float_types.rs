// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate: edge containment,
/// point-in-triangle acceptance, dedup quantization, and post-merge distance
/// all read this one value. Can be overridden:
///  1) **Build-time**: set env var `TRISECT_TOLERANCE` (e.g. `TRISECT_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Default coincidence tolerance. Same value in both precisions; well above
/// `f32::EPSILON`.
const DEFAULT_TOLERANCE: Real = 1e-5;

/// Returns the current tolerance value.
/// If not set yet, it tries `TRISECT_TOLERANCE` (parsed as the active `Real`)
/// and falls back to the default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided, inherited by dependencies
        if let Some(environment_variable) = option_env!("TRISECT_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        DEFAULT_TOLERANCE
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `trisect::float_types::set_tolerance(1e-6);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;
