//! Built-in curves: the default circle and the two sample curves a new scene starts with.

use std::f64::consts::TAU;

use burrow_geom::{GeometryError, GuideCurve, Point3};

/// Control points on the default circle.
pub const CIRCLE_POINTS: usize = 8;

/// Closed unit circle at the origin in the XZ plane, wound counter-clockwise
/// about +Y.
pub fn default_circle() -> Result<GuideCurve, GeometryError> {
    let points = (0..CIRCLE_POINTS)
        .map(|i| {
            let a = TAU * i as f64 / CIRCLE_POINTS as f64;
            Point3::new(a.cos(), 0.0, -a.sin())
        })
        .collect();
    GuideCurve::new(points)?.closed()
}

/// A winding path dropping from y = 42.7 to the ground.
pub fn sample_tunnel_path() -> Result<GuideCurve, GeometryError> {
    GuideCurve::new(vec![
        Point3::new(-0.6, 42.7, 0.0),
        Point3::new(-2.9, 32.4, 0.0),
        Point3::new(-0.8, 30.0, 0.0),
        Point3::new(1.2, 27.7, 0.0),
        Point3::new(3.0, 16.4, 0.0),
        Point3::new(-1.9, 10.6, 0.0),
        Point3::new(-6.8, 4.8, 0.0),
        Point3::new(-1.7, 0.6, 0.0),
    ])
}

/// An irregular closed outline in the XZ plane, used as the chamber base.
pub fn sample_chamber_outline() -> Result<GuideCurve, GeometryError> {
    GuideCurve::new(vec![
        Point3::new(0.0, 0.0, -1.33),
        Point3::new(0.75, 0.0, -0.89),
        Point3::new(2.2, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.65),
        Point3::new(-1.5, 0.0, 0.0),
        Point3::new(-0.5, 0.0, -0.88),
    ])?
    .closed()
}
