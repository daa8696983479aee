//! MockKernel: deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Surfaces are synthetic: every face is a unit quad with a caller-chosen
//! normal, so face selection can be tested without sweeping real geometry.
//! Every mutating call is recorded in a call log.

use burrow_geom::{GeometryError, GuideCurve, Point3, ProfileCircle, Vec3};
use burrow_types::BevelStyle;
use nalgebra::UnitQuaternion;
use slotmap::SlotMap;

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// A mutating kernel call, as recorded by MockKernel.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    InsertCurve { id: CurveId },
    CloseCurve { id: CurveId },
    DeleteCurve { id: CurveId },
    DeleteSurface { id: SurfaceId },
    ExtrudeProfile {
        curve: CurveId,
        radius: f64,
        taper: f64,
        path_divisions: usize,
    },
    RotateVertices { surface: SurfaceId, count: usize },
    BevelAndCap { curve: CurveId, scale: f64 },
    DuplicateAndTranslate { chamber: ChamberId, target: Point3 },
}

/// A synthetic surface: face `f` owns vertices `4f..4f + 4`.
#[derive(Debug, Clone)]
struct MockSurface {
    normals: Vec<Option<Vec3>>,
    positions: Vec<Point3>,
}

impl MockSurface {
    fn with_normals(normals: Vec<Option<Vec3>>, origin: Point3) -> Self {
        let mut positions = Vec::with_capacity(normals.len() * 4);
        for f in 0..normals.len() {
            let x = origin.x + f as f64;
            positions.push(Point3::new(x, origin.y, origin.z));
            positions.push(Point3::new(x + 1.0, origin.y, origin.z));
            positions.push(Point3::new(x + 1.0, origin.y - 1.0, origin.z));
            positions.push(Point3::new(x, origin.y - 1.0, origin.z));
        }
        Self { normals, positions }
    }
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
#[derive(Debug, Default)]
pub struct MockKernel {
    curves: SlotMap<CurveId, GuideCurve>,
    surfaces: SlotMap<SurfaceId, MockSurface>,
    chambers: SlotMap<ChamberId, Point3>,
    calls: Vec<KernelCall>,
    /// Normal given to every face of an extruded surface.
    extrude_normal: Option<Vec3>,
    /// Extrusions allowed before `extrude_profile` starts failing.
    extrude_limit: Option<usize>,
    extrusions: usize,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faces of surfaces created by `extrude_profile` get this normal.
    /// Defaults to straight down (always admissible).
    pub fn with_extrude_normal(mut self, normal: Option<Vec3>) -> Self {
        self.extrude_normal = normal;
        self
    }

    /// Let only the first `limit` extrusions succeed; later ones fail with a
    /// degenerate-curve error.
    pub fn with_extrude_limit(mut self, limit: usize) -> Self {
        self.extrude_limit = Some(limit);
        self
    }

    /// Insert a synthetic surface with one face per entry in `normals`.
    /// `None` marks a face without a defined normal.
    pub fn insert_surface_with_normals(&mut self, normals: Vec<Option<Vec3>>) -> SurfaceId {
        self.surfaces
            .insert(MockSurface::with_normals(normals, Point3::origin()))
    }

    /// Every mutating call made so far, oldest first.
    pub fn calls(&self) -> &[KernelCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn surface(&self, surface: SurfaceId) -> Result<&MockSurface, KernelError> {
        self.surfaces
            .get(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })
    }

    fn check_face(&self, surface: SurfaceId, face: usize) -> Result<&MockSurface, KernelError> {
        let s = self.surface(surface)?;
        if face >= s.normals.len() {
            return Err(KernelError::FaceOutOfRange {
                surface,
                face,
                count: s.normals.len(),
            });
        }
        Ok(s)
    }
}

impl Kernel for MockKernel {
    fn insert_curve(&mut self, curve: GuideCurve) -> CurveId {
        let id = self.curves.insert(curve);
        self.calls.push(KernelCall::InsertCurve { id });
        id
    }

    fn close_curve(&mut self, curve: CurveId) -> Result<(), KernelError> {
        let entry = self
            .curves
            .get_mut(curve)
            .ok_or(KernelError::CurveNotFound { id: curve })?;
        if !entry.is_closed() {
            *entry = entry.clone().closed()?;
        }
        self.calls.push(KernelCall::CloseCurve { id: curve });
        Ok(())
    }

    fn delete_curve(&mut self, curve: CurveId) -> Result<GuideCurve, KernelError> {
        let removed = self
            .curves
            .remove(curve)
            .ok_or(KernelError::CurveNotFound { id: curve })?;
        self.calls.push(KernelCall::DeleteCurve { id: curve });
        Ok(removed)
    }

    fn extrude_profile(
        &mut self,
        curve: CurveId,
        profile: &ProfileCircle,
        taper: f64,
        path_divisions: usize,
    ) -> Result<SurfaceId, KernelError> {
        if !self.curves.contains_key(curve) {
            return Err(KernelError::CurveNotFound { id: curve });
        }
        if self.extrude_limit.is_some_and(|limit| self.extrusions >= limit) {
            return Err(GeometryError::DegenerateCurve {
                reason: format!("extrusion limit of {} reached", self.extrusions),
            }
            .into());
        }
        self.extrusions += 1;
        let normal = Some(self.extrude_normal.unwrap_or(-Vec3::y()));
        let faces = profile.segments * path_divisions.max(1);
        let id = self
            .surfaces
            .insert(MockSurface::with_normals(vec![normal; faces], profile.center));
        self.calls.push(KernelCall::ExtrudeProfile {
            curve,
            radius: profile.radius,
            taper,
            path_divisions,
        });
        Ok(id)
    }

    fn delete_surface(&mut self, surface: SurfaceId) -> Result<(), KernelError> {
        self.surfaces
            .remove(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })?;
        self.calls.push(KernelCall::DeleteSurface { id: surface });
        Ok(())
    }

    fn rotate_vertices(
        &mut self,
        surface: SurfaceId,
        vertices: &[usize],
        pivot: &Point3,
        rotation: &UnitQuaternion<f64>,
    ) -> Result<(), KernelError> {
        let s = self
            .surfaces
            .get_mut(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })?;
        let count = s.positions.len();
        if let Some(&vertex) = vertices.iter().find(|&&v| v >= count) {
            return Err(KernelError::VertexOutOfRange {
                surface,
                vertex,
                count,
            });
        }
        for &v in vertices {
            let p = s.positions[v];
            s.positions[v] = *pivot + rotation.transform_vector(&(p - *pivot));
        }
        self.calls.push(KernelCall::RotateVertices {
            surface,
            count: vertices.len(),
        });
        Ok(())
    }

    fn bevel_and_cap(
        &mut self,
        curve: CurveId,
        _style: &BevelStyle,
        scale: f64,
        _outline_samples: usize,
    ) -> Result<ChamberId, KernelError> {
        let base = self.curve(curve)?;
        let center = burrow_geom::geometry::centroid(base.control_points());
        let id = self.chambers.insert(center);
        self.calls.push(KernelCall::BevelAndCap { curve, scale });
        Ok(id)
    }

    fn duplicate_and_translate(
        &mut self,
        chamber: ChamberId,
        target: &Point3,
    ) -> Result<ChamberId, KernelError> {
        if !self.chambers.contains_key(chamber) {
            return Err(KernelError::ChamberNotFound { id: chamber });
        }
        let id = self.chambers.insert(*target);
        self.calls.push(KernelCall::DuplicateAndTranslate {
            chamber,
            target: *target,
        });
        Ok(id)
    }
}

impl KernelIntrospect for MockKernel {
    fn curve(&self, curve: CurveId) -> Result<&GuideCurve, KernelError> {
        self.curves
            .get(curve)
            .ok_or(KernelError::CurveNotFound { id: curve })
    }

    fn sample_tangent(&self, curve: CurveId, param: f64) -> Result<Vec3, KernelError> {
        Ok(self.curve(curve)?.tangent_at(param)?)
    }

    fn control_point(&self, curve: CurveId, index: usize) -> Result<Point3, KernelError> {
        let c = self.curve(curve)?;
        c.control_point(index)
            .ok_or(KernelError::ControlPointOutOfRange {
                curve,
                index,
                count: c.num_control_points(),
            })
    }

    fn list_curves(&self) -> Vec<CurveId> {
        self.curves.keys().collect()
    }

    fn list_surfaces(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().collect()
    }

    fn list_chambers(&self) -> Vec<ChamberId> {
        self.chambers.keys().collect()
    }

    fn face_count(&self, surface: SurfaceId) -> Result<usize, KernelError> {
        Ok(self.surface(surface)?.normals.len())
    }

    fn face_vertices(&self, surface: SurfaceId, face: usize) -> Result<Vec<usize>, KernelError> {
        self.check_face(surface, face)?;
        Ok((4 * face..4 * face + 4).collect())
    }

    fn sample_normal(&self, surface: SurfaceId, face: usize) -> Result<Option<Vec3>, KernelError> {
        Ok(self.check_face(surface, face)?.normals[face])
    }

    fn vertex_position(&self, surface: SurfaceId, vertex: usize) -> Result<Point3, KernelError> {
        let s = self.surface(surface)?;
        s.positions
            .get(vertex)
            .copied()
            .ok_or(KernelError::VertexOutOfRange {
                surface,
                vertex,
                count: s.positions.len(),
            })
    }

    /// One ring per synthetic face.
    fn edge_rings(&self, surface: SurfaceId) -> Result<Vec<Vec<usize>>, KernelError> {
        let faces = self.surface(surface)?.normals.len();
        Ok((0..faces).map(|f| (4 * f..4 * f + 4).collect()).collect())
    }

    fn chamber_position(&self, chamber: ChamberId) -> Result<Point3, KernelError> {
        self.chambers
            .get(chamber)
            .copied()
            .ok_or(KernelError::ChamberNotFound { id: chamber })
    }
}
