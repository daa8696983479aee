use nalgebra::UnitQuaternion;
use tracing::{debug, instrument};

use crate::error::GeometryError;
use crate::geometry::curve::GuideCurve;
use crate::geometry::frame::transport_frames;
use crate::geometry::profile::ProfileCircle;
use crate::geometry::{centroid, newell_normal, Point3, Vec3};

/// An open polygonal tube: rings of profile vertices joined by quads.
///
/// Vertices are ring-major (`ring * segments + segment`). Face
/// `ring * segments + segment` joins ring `ring` to ring `ring + 1`, so the
/// start of the face list is the start of the tube.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeMesh {
    vertices: Vec<Point3>,
    segments: usize,
    rings: usize,
}

impl TubeMesh {
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Option<Point3> {
        self.vertices.get(index).copied()
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn ring_count(&self) -> usize {
        self.rings
    }

    pub fn face_count(&self) -> usize {
        self.rings.saturating_sub(1) * self.segments
    }

    /// Quad vertex indices, wound so the normal points out of the tube.
    pub fn face_vertices(&self, face: usize) -> Option<[usize; 4]> {
        if face >= self.face_count() {
            return None;
        }
        let ring = face / self.segments;
        let seg = face % self.segments;
        let next = (seg + 1) % self.segments;
        Some([
            self.index(ring, seg),
            self.index(ring, next),
            self.index(ring + 1, next),
            self.index(ring + 1, seg),
        ])
    }

    /// Outward unit normal of a face. `None` for a collapsed face.
    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        let quad = self.face_vertices(face)?;
        let pts = quad.map(|i| self.vertices[i]);
        newell_normal(&pts)
    }

    /// Vertex indices of every edge ring, ordered from the start of the tube.
    pub fn edge_rings(&self) -> Vec<Vec<usize>> {
        (0..self.rings).map(|r| self.ring(r)).collect()
    }

    pub fn ring(&self, ring: usize) -> Vec<usize> {
        (0..self.segments).map(|s| self.index(ring, s)).collect()
    }

    pub fn ring_center(&self, ring: usize) -> Point3 {
        let pts: Vec<Point3> = self.ring(ring).iter().map(|&i| self.vertices[i]).collect();
        centroid(&pts)
    }

    /// Mean distance from a ring's vertices to its center.
    pub fn ring_radius(&self, ring: usize) -> f64 {
        let center = self.ring_center(ring);
        let idx = self.ring(ring);
        idx.iter()
            .map(|&i| nalgebra::distance(&self.vertices[i], &center))
            .sum::<f64>()
            / idx.len() as f64
    }

    /// Cross-section radius at normalized path parameter `t`, interpolated
    /// between the two nearest rings.
    pub fn radius_at(&self, t: f64) -> f64 {
        if self.rings == 1 {
            return self.ring_radius(0);
        }
        let station = t.clamp(0.0, 1.0) * (self.rings - 1) as f64;
        let lo = (station.floor() as usize).min(self.rings - 2);
        let frac = station - lo as f64;
        let a = self.ring_radius(lo);
        let b = self.ring_radius(lo + 1);
        a + (b - a) * frac
    }

    /// Length of the polyline through the ring centers.
    pub fn length(&self) -> f64 {
        (1..self.rings)
            .map(|r| nalgebra::distance(&self.ring_center(r - 1), &self.ring_center(r)))
            .sum()
    }

    /// Rotate the given vertices about `pivot`. Out-of-range indices are ignored.
    pub fn rotate_vertices(&mut self, indices: &[usize], pivot: &Point3, rotation: &UnitQuaternion<f64>) {
        for &i in indices {
            if let Some(v) = self.vertices.get_mut(i) {
                *v = *pivot + rotation.transform_vector(&(*v - *pivot));
            }
        }
    }

    fn index(&self, ring: usize, seg: usize) -> usize {
        ring * self.segments + seg
    }
}

/// Sweep `profile` along `curve`, scaling the radius linearly from 1 at the
/// start to `taper` at the end.
///
/// The profile keeps its offset from the curve start for the whole sweep.
/// Produces `path_divisions + 1` rings and no end caps.
#[instrument(skip(curve, profile), fields(radius = profile.radius, segments = profile.segments))]
pub fn sweep_tube(
    curve: &GuideCurve,
    profile: &ProfileCircle,
    taper: f64,
    path_divisions: usize,
) -> Result<TubeMesh, GeometryError> {
    let tol = crate::default_tolerance();
    if curve.is_degenerate(tol.coincidence) {
        return Err(GeometryError::degenerate_curve("all control points coincide"));
    }
    let divisions = path_divisions.max(1);
    let offset = profile.center - curve.point_at(0.0);

    let params: Vec<f64> = (0..=divisions).map(|i| i as f64 / divisions as f64).collect();
    let path: Vec<Point3> = params.iter().map(|&t| curve.point_at(t) + offset).collect();

    let mut tangents = Vec::with_capacity(params.len());
    tangents.push(profile.normal);
    for &t in &params[1..] {
        let prev = tangents[tangents.len() - 1];
        tangents.push(curve.tangent_at(t).unwrap_or(prev));
    }

    let frames = transport_frames(profile.frame(), &path, &tangents);

    let segments = profile.segments;
    let mut vertices = Vec::with_capacity(path.len() * segments);
    for ((center, frame), &t) in path.iter().zip(&frames).zip(&params) {
        let radius = profile.radius * (1.0 + (taper - 1.0) * t);
        for s in 0..segments {
            vertices.push(frame.circle_point(center, radius, profile.segment_angle(s)));
        }
    }

    if vertices.iter().any(|v| !v.coords.iter().all(|c| c.is_finite())) {
        return Err(GeometryError::degenerate_curve("sweep produced non-finite vertices"));
    }

    debug!(rings = path.len(), vertices = vertices.len(), "swept tube");

    Ok(TubeMesh {
        vertices,
        segments,
        rings: path.len(),
    })
}
