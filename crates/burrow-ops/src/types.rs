use burrow_geom::{GeometryError, Point3, Vec3};
use burrow_kernel::{ChamberId, CurveId, KernelError, SurfaceId};

/// A tube swept along a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeBuild {
    pub curve: CurveId,
    pub surface: SurfaceId,
    /// Center of the first ring.
    pub anchor: Point3,
}

/// One offshoot: the branch curve, its tube, and the main-tunnel face it grows from.
#[derive(Debug, Clone, PartialEq)]
pub struct OffshootBuild {
    pub tube: TubeBuild,
    pub face: usize,
    pub normal: Vec3,
}

impl OffshootBuild {
    pub fn curve(&self) -> CurveId {
        self.tube.curve
    }
}

/// Result of placing offshoots on a main tunnel.
#[derive(Debug, Clone, Default)]
pub struct OffshootBatch {
    /// Requested offshoot count, `floor(faces * density)`.
    pub target: usize,
    /// Placed offshoots, in placement order.
    pub offshoots: Vec<OffshootBuild>,
    pub diagnostics: Diagnostics,
}

impl OffshootBatch {
    pub fn curves(&self) -> Vec<CurveId> {
        self.offshoots.iter().map(OffshootBuild::curve).collect()
    }
}

/// Result of placing chambers at offshoot ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ChamberBatch {
    pub template: ChamberId,
    pub chambers: Vec<ChamberId>,
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Face samples drawn while searching for admissible faces.
    pub attempts: usize,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl OpError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}
