use burrow_geom::{GuideCurve, Point3, ProfileCircle, Vec3};
use burrow_types::BevelStyle;
use nalgebra::UnitQuaternion;

use crate::types::*;

/// Geometry kernel: every operation that creates, modifies or removes entities.
/// Implemented by MeshKernel (real polygon meshes) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Store a guide curve and return its handle.
    fn insert_curve(&mut self, curve: GuideCurve) -> CurveId;

    /// Mark a stored curve as closed, keeping its control points.
    fn close_curve(&mut self, curve: CurveId) -> Result<(), KernelError>;

    /// Remove a curve. Its handle never resolves again.
    fn delete_curve(&mut self, curve: CurveId) -> Result<GuideCurve, KernelError>;

    /// Sweep a circular profile along a curve into an open tube surface.
    /// The radius scales linearly from 1 at the curve start to `taper` at its end.
    fn extrude_profile(
        &mut self,
        curve: CurveId,
        profile: &ProfileCircle,
        taper: f64,
        path_divisions: usize,
    ) -> Result<SurfaceId, KernelError>;

    /// Remove a surface. Its handle never resolves again.
    fn delete_surface(&mut self, surface: SurfaceId) -> Result<(), KernelError>;

    /// Rotate a set of surface vertices about `pivot`.
    fn rotate_vertices(
        &mut self,
        surface: SurfaceId,
        vertices: &[usize],
        pivot: &Point3,
        rotation: &UnitQuaternion<f64>,
    ) -> Result<(), KernelError>;

    /// Bevel, extrude and cap a closed base curve into a chamber scaled by `scale`
    /// about its center.
    fn bevel_and_cap(
        &mut self,
        curve: CurveId,
        style: &BevelStyle,
        scale: f64,
        outline_samples: usize,
    ) -> Result<ChamberId, KernelError>;

    /// Independent copy of a chamber, moved so its center sits on `target`.
    fn duplicate_and_translate(
        &mut self,
        chamber: ChamberId,
        target: &Point3,
    ) -> Result<ChamberId, KernelError>;
}

/// Read-only queries against kernel entities.
pub trait KernelIntrospect {
    fn curve(&self, curve: CurveId) -> Result<&GuideCurve, KernelError>;

    /// Unit tangent of a curve at normalized parameter `param`.
    fn sample_tangent(&self, curve: CurveId, param: f64) -> Result<Vec3, KernelError>;

    fn control_point(&self, curve: CurveId, index: usize) -> Result<Point3, KernelError>;

    fn list_curves(&self) -> Vec<CurveId>;

    fn list_surfaces(&self) -> Vec<SurfaceId>;

    fn list_chambers(&self) -> Vec<ChamberId>;

    fn face_count(&self, surface: SurfaceId) -> Result<usize, KernelError>;

    /// Vertex indices of a face, in winding order.
    fn face_vertices(&self, surface: SurfaceId, face: usize) -> Result<Vec<usize>, KernelError>;

    /// Outward unit normal of a face, or `None` when the face has no area.
    fn sample_normal(&self, surface: SurfaceId, face: usize) -> Result<Option<Vec3>, KernelError>;

    fn vertex_position(&self, surface: SurfaceId, vertex: usize) -> Result<Point3, KernelError>;

    /// Vertex loops around the surface, ordered from its start.
    fn edge_rings(&self, surface: SurfaceId) -> Result<Vec<Vec<usize>>, KernelError>;

    /// Center of a chamber volume.
    fn chamber_position(&self, chamber: ChamberId) -> Result<Point3, KernelError>;
}
