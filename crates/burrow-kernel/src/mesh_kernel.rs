//! MeshKernel: the real geometry kernel, backed by polygon meshes.
//!
//! Curves, tube surfaces and chambers live in generational slot maps, so a
//! deleted entity's handle can never resolve to a newer one.

use burrow_geom::mesh::{bevel_chamber, sweep_tube};
use burrow_geom::{ChamberMesh, GuideCurve, Point3, ProfileCircle, TubeMesh, Vec3};
use burrow_types::BevelStyle;
use nalgebra::UnitQuaternion;
use slotmap::SlotMap;
use tracing::{debug, info, instrument};

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

#[derive(Debug, Default)]
pub struct MeshKernel {
    curves: SlotMap<CurveId, GuideCurve>,
    surfaces: SlotMap<SurfaceId, TubeMesh>,
    chambers: SlotMap<ChamberId, ChamberMesh>,
}

impl MeshKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tube(&self, surface: SurfaceId) -> Option<&TubeMesh> {
        self.surfaces.get(surface)
    }

    pub fn chamber(&self, chamber: ChamberId) -> Option<&ChamberMesh> {
        self.chambers.get(chamber)
    }

    fn tube_ref(&self, surface: SurfaceId) -> Result<&TubeMesh, KernelError> {
        self.surfaces
            .get(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })
    }

    fn chamber_ref(&self, chamber: ChamberId) -> Result<&ChamberMesh, KernelError> {
        self.chambers
            .get(chamber)
            .ok_or(KernelError::ChamberNotFound { id: chamber })
    }
}

impl Kernel for MeshKernel {
    fn insert_curve(&mut self, curve: GuideCurve) -> CurveId {
        let points = curve.num_control_points();
        let closed = curve.is_closed();
        let id = self.curves.insert(curve);
        debug!(?id, points, closed, "inserted curve");
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
        Ok(())
    }

    fn delete_curve(&mut self, curve: CurveId) -> Result<GuideCurve, KernelError> {
        let removed = self
            .curves
            .remove(curve)
            .ok_or(KernelError::CurveNotFound { id: curve })?;
        debug!(?curve, "deleted curve");
        Ok(removed)
    }

    fn delete_surface(&mut self, surface: SurfaceId) -> Result<(), KernelError> {
        self.surfaces
            .remove(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })?;
        debug!(?surface, "deleted surface");
        Ok(())
    }

    #[instrument(skip(self, profile), fields(radius = profile.radius))]
    fn extrude_profile(
        &mut self,
        curve: CurveId,
        profile: &ProfileCircle,
        taper: f64,
        path_divisions: usize,
    ) -> Result<SurfaceId, KernelError> {
        let path = self.curve(curve)?;
        let tube = sweep_tube(path, profile, taper, path_divisions)?;
        let faces = tube.face_count();
        let id = self.surfaces.insert(tube);
        info!(?id, faces, "extruded tube surface");
        Ok(id)
    }

    fn rotate_vertices(
        &mut self,
        surface: SurfaceId,
        vertices: &[usize],
        pivot: &Point3,
        rotation: &UnitQuaternion<f64>,
    ) -> Result<(), KernelError> {
        let tube = self
            .surfaces
            .get_mut(surface)
            .ok_or(KernelError::SurfaceNotFound { id: surface })?;
        let count = tube.vertices().len();
        if let Some(&vertex) = vertices.iter().find(|&&v| v >= count) {
            return Err(KernelError::VertexOutOfRange {
                surface,
                vertex,
                count,
            });
        }
        tube.rotate_vertices(vertices, pivot, rotation);
        Ok(())
    }

    #[instrument(skip(self, style))]
    fn bevel_and_cap(
        &mut self,
        curve: CurveId,
        style: &BevelStyle,
        scale: f64,
        outline_samples: usize,
    ) -> Result<ChamberId, KernelError> {
        let base = self.curve(curve)?;
        let mut chamber = bevel_chamber(base, style, outline_samples)?;
        chamber.scale_about_pivot(scale);
        let faces = chamber.faces().len();
        let id = self.chambers.insert(chamber);
        info!(?id, faces, "built chamber");
        Ok(id)
    }

    fn duplicate_and_translate(
        &mut self,
        chamber: ChamberId,
        target: &Point3,
    ) -> Result<ChamberId, KernelError> {
        let copy = self.chamber_ref(chamber)?.translated_to(target);
        let id = self.chambers.insert(copy);
        debug!(?id, source = ?chamber, "duplicated chamber");
        Ok(id)
    }
}

impl KernelIntrospect for MeshKernel {
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
        Ok(self.tube_ref(surface)?.face_count())
    }

    fn face_vertices(&self, surface: SurfaceId, face: usize) -> Result<Vec<usize>, KernelError> {
        let tube = self.tube_ref(surface)?;
        tube.face_vertices(face)
            .map(|quad| quad.to_vec())
            .ok_or(KernelError::FaceOutOfRange {
                surface,
                face,
                count: tube.face_count(),
            })
    }

    fn sample_normal(&self, surface: SurfaceId, face: usize) -> Result<Option<Vec3>, KernelError> {
        let tube = self.tube_ref(surface)?;
        if face >= tube.face_count() {
            return Err(KernelError::FaceOutOfRange {
                surface,
                face,
                count: tube.face_count(),
            });
        }
        Ok(tube.face_normal(face))
    }

    fn vertex_position(&self, surface: SurfaceId, vertex: usize) -> Result<Point3, KernelError> {
        let tube = self.tube_ref(surface)?;
        tube.vertex(vertex).ok_or(KernelError::VertexOutOfRange {
            surface,
            vertex,
            count: tube.vertices().len(),
        })
    }

    fn edge_rings(&self, surface: SurfaceId) -> Result<Vec<Vec<usize>>, KernelError> {
        Ok(self.tube_ref(surface)?.edge_rings())
    }

    fn chamber_position(&self, chamber: ChamberId) -> Result<Point3, KernelError> {
        Ok(self.chamber_ref(chamber)?.pivot())
    }
}
