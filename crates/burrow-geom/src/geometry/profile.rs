use std::f64::consts::TAU;

use super::frame::Frame;
use super::{perpendicular, Point3, Vec3};
use crate::error::GeometryError;

/// Transient circular cross-section swept along a guide curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileCircle {
    pub center: Point3,
    /// Unit plane normal; the sweep direction at the start of the path.
    pub normal: Vec3,
    pub radius: f64,
    /// Polygon segments used when the circle is converted to vertices.
    pub segments: usize,
    /// Degree of the source circle. Informational only, the mesh is polygonal.
    pub degree: usize,
    /// In-plane reference direction (angle zero).
    pub x_axis: Vec3,
}

impl ProfileCircle {
    pub const DEFAULT_SEGMENTS: usize = 8;

    pub fn new(
        center: Point3,
        normal: Vec3,
        radius: f64,
        segments: usize,
    ) -> Result<Self, GeometryError> {
        let normal = normal
            .try_normalize(crate::default_tolerance().direction)
            .ok_or_else(|| GeometryError::degenerate_curve("profile normal has zero length"))?;
        if segments < 3 {
            return Err(GeometryError::DegenerateSurface {
                reason: format!("profile needs at least 3 segments, got {segments}"),
            });
        }
        Ok(Self {
            center,
            normal,
            radius,
            segments,
            degree: 3,
            x_axis: perpendicular(&normal),
        })
    }

    pub fn y_axis(&self) -> Vec3 {
        self.normal.cross(&self.x_axis)
    }

    /// The profile's frame: tangent along the normal, x axis in-plane.
    pub fn frame(&self) -> Frame {
        Frame {
            tangent: self.normal,
            normal: self.x_axis,
            binormal: self.y_axis(),
        }
    }

    /// Angle of the `i`-th polygon vertex.
    pub fn segment_angle(&self, i: usize) -> f64 {
        TAU * i as f64 / self.segments as f64
    }

    /// Polygon vertices in winding order around the normal.
    pub fn points(&self) -> Vec<Point3> {
        let frame = self.frame();
        (0..self.segments)
            .map(|i| frame.circle_point(&self.center, self.radius, self.segment_angle(i)))
            .collect()
    }

    /// Centroid of the polygon vertices. Equals `center` for a regular polygon.
    pub fn centroid(&self) -> Point3 {
        super::centroid(&self.points())
    }
}
