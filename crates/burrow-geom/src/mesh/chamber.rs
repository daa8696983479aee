use std::f64::consts::FRAC_PI_2;

use burrow_types::BevelStyle;
use tracing::{debug, instrument};

use crate::error::GeometryError;
use crate::geometry::curve::GuideCurve;
use crate::geometry::{centroid, newell_normal, Point3, Vec3};

/// A closed chamber volume: a beveled, capped extrusion of a planar outline.
///
/// The pivot is the center of the volume; placing a chamber moves its pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChamberMesh {
    vertices: Vec<Point3>,
    faces: Vec<Vec<usize>>,
    pivot: Point3,
}

impl ChamberMesh {
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn pivot(&self) -> Point3 {
        self.pivot
    }

    /// Largest distance from the pivot to any vertex.
    pub fn bounding_radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| nalgebra::distance(v, &self.pivot))
            .fold(0.0, f64::max)
    }

    /// Uniform scale about the pivot.
    pub fn scale_about_pivot(&mut self, factor: f64) {
        let pivot = self.pivot;
        for v in &mut self.vertices {
            *v = pivot + (*v - pivot) * factor;
        }
    }

    /// Copy of this chamber moved so its pivot sits on `target`.
    pub fn translated_to(&self, target: &Point3) -> Self {
        let delta = *target - self.pivot;
        Self {
            vertices: self.vertices.iter().map(|v| *v + delta).collect(),
            faces: self.faces.clone(),
            pivot: *target,
        }
    }
}

/// A chamber base curve sampled around its closed loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ChamberOutline {
    pub points: Vec<Point3>,
    pub center: Point3,
    /// Plane normal from the outline's winding.
    pub normal: Vec3,
}

/// Sample `curve` as a closed loop (closing a copy if it is open) and find its
/// plane. Fails when the loop encloses no area.
pub fn chamber_outline(
    curve: &GuideCurve,
    outline_samples: usize,
) -> Result<ChamberOutline, GeometryError> {
    let closed = if curve.is_closed() {
        curve.clone()
    } else {
        curve.clone().closed()?
    };

    let samples = outline_samples.max(3);
    let points: Vec<Point3> = (0..samples)
        .map(|k| closed.point_at(k as f64 / samples as f64))
        .collect();

    let center = centroid(&points);
    let normal = newell_normal(&points)
        .ok_or_else(|| GeometryError::degenerate_curve("chamber outline encloses no area"))?;
    Ok(ChamberOutline {
        points,
        center,
        normal,
    })
}

/// Bevel and cap a closed base curve into a chamber volume.
///
/// The outline is sampled `outline_samples` times and lifted along its plane
/// normal through two rounded bevel bands joined by a straight wall. Each
/// bevel insets the outline toward its centroid by `style.width`, limited so
/// no point crosses the centroid. Flat caps close both ends.
#[instrument(skip(curve, style))]
pub fn bevel_chamber(
    curve: &GuideCurve,
    style: &BevelStyle,
    outline_samples: usize,
) -> Result<ChamberMesh, GeometryError> {
    let ChamberOutline {
        points: outline,
        center,
        normal,
    } = chamber_outline(curve, outline_samples)?;
    let samples = outline.len();

    let layers = bevel_layers(style);
    let height = 2.0 * style.depth + style.extrude_depth;

    let mut vertices = Vec::with_capacity(layers.len() * samples + 2);
    for &(inset, lift) in &layers {
        for p in &outline {
            vertices.push(inset_point(p, &center, inset, style.width) + normal * lift);
        }
    }
    let bottom_center = vertices.len();
    vertices.push(center);
    let top_center = vertices.len();
    vertices.push(center + normal * height);

    let mut faces = Vec::with_capacity((layers.len() - 1) * samples + 2 * samples);
    for layer in 0..layers.len() - 1 {
        let a = layer * samples;
        let b = (layer + 1) * samples;
        for k in 0..samples {
            let next = (k + 1) % samples;
            faces.push(vec![a + k, a + next, b + next, b + k]);
        }
    }
    let top = (layers.len() - 1) * samples;
    for k in 0..samples {
        let next = (k + 1) % samples;
        faces.push(vec![bottom_center, next, k]);
        faces.push(vec![top_center, top + k, top + next]);
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "beveled chamber"
    );

    Ok(ChamberMesh {
        vertices,
        faces,
        pivot: center + normal * (height / 2.0),
    })
}

/// (inset, lift) for every ring, bottom to top.
fn bevel_layers(style: &BevelStyle) -> Vec<(f64, f64)> {
    let segments = style.segments.max(1);
    let mut layers = Vec::with_capacity(2 * (segments + 1));
    for j in 0..=segments {
        let phi = FRAC_PI_2 * j as f64 / segments as f64;
        layers.push((
            style.width * (1.0 - phi.sin()),
            style.depth * (1.0 - phi.cos()),
        ));
    }
    for j in 0..=segments {
        let phi = FRAC_PI_2 * j as f64 / segments as f64;
        layers.push((
            style.width * (1.0 - phi.cos()),
            style.depth + style.extrude_depth + style.depth * phi.sin(),
        ));
    }
    layers
}

fn inset_point(p: &Point3, center: &Point3, inset: f64, width: f64) -> Point3 {
    let to_center: Vec3 = *center - *p;
    let dist = to_center.norm();
    if dist < 1e-12 || width <= 0.0 {
        return *p;
    }
    let limit = (0.9 * dist / width).min(1.0);
    *p + to_center * (inset * limit / dist)
}
