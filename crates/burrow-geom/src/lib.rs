pub mod error;
pub mod geometry;
pub mod mesh;

pub use error::GeometryError;
pub use geometry::curve::GuideCurve;
pub use geometry::profile::ProfileCircle;
pub use geometry::{Point3, Vec3};
pub use mesh::chamber::ChamberMesh;
pub use mesh::tube::TubeMesh;

/// Tolerances for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident.
    pub coincidence: f64,
    /// Vectors shorter than this have no usable direction.
    pub direction: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-7,
            direction: 1e-9,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3, b: &Point3) -> bool {
        nalgebra::distance(a, b) < self.coincidence
    }

    pub fn is_zero_direction(&self, v: &Vec3) -> bool {
        !v.iter().all(|c| c.is_finite()) || v.norm() < self.direction
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
