//! Helper functions: error type, curve builders, configurations.

use std::f64::consts::TAU;

use burrow_engine::EngineError;
use burrow_geom::{GeometryError, GuideCurve, Point3};
use burrow_kernel::KernelError;
use burrow_types::ColonyConfig;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("curve not found: {name}")]
    CurveNotFound { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("no main tunnel")]
    NoMainTunnel,

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

// ── Curve Builders ──────────────────────────────────────────────────────────

/// Cubic curve along the segment `start -> end`, control points evenly spaced.
pub fn straight_curve(start: Point3, end: Point3) -> Result<GuideCurve, GeometryError> {
    let points = (0..4)
        .map(|i| start + (end - start) * (i as f64 / 3.0))
        .collect();
    GuideCurve::new(points)
}

/// Closed curve through `points` control points on a circle in the XZ plane.
pub fn circle_curve(
    center: Point3,
    radius: f64,
    points: usize,
) -> Result<GuideCurve, GeometryError> {
    let control = (0..points)
        .map(|i| {
            let a = TAU * i as f64 / points as f64;
            Point3::new(
                center.x + radius * a.cos(),
                center.y,
                center.z - radius * a.sin(),
            )
        })
        .collect();
    GuideCurve::new(control)?.closed()
}

// ── Configurations ──────────────────────────────────────────────────────────

/// Default configuration with a fixed sampling seed.
pub fn seeded_config(seed: u64) -> ColonyConfig {
    ColonyConfig {
        seed: Some(seed),
        ..ColonyConfig::default()
    }
}
