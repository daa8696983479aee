use burrow_geom::GeometryError;

slotmap::new_key_type! {
    /// Handle to a guide curve held by a kernel.
    pub struct CurveId;
    /// Handle to a swept tube surface.
    pub struct SurfaceId;
    /// Handle to a chamber volume.
    pub struct ChamberId;
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("curve not found: {id:?}")]
    CurveNotFound { id: CurveId },

    #[error("surface not found: {id:?}")]
    SurfaceNotFound { id: SurfaceId },

    #[error("chamber not found: {id:?}")]
    ChamberNotFound { id: ChamberId },

    #[error("control point {index} out of range for curve {curve:?} with {count} points")]
    ControlPointOutOfRange {
        curve: CurveId,
        index: usize,
        count: usize,
    },

    #[error("face {face} out of range for surface {surface:?} with {count} faces")]
    FaceOutOfRange {
        surface: SurfaceId,
        face: usize,
        count: usize,
    },

    #[error("vertex {vertex} out of range for surface {surface:?} with {count} vertices")]
    VertexOutOfRange {
        surface: SurfaceId,
        vertex: usize,
        count: usize,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
