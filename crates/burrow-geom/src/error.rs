/// Errors from curve evaluation and mesh construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate curve: {reason}")]
    DegenerateCurve { reason: String },

    #[error("degenerate surface: {reason}")]
    DegenerateSurface { reason: String },

    #[error("curve has {provided} control points, need at least {required}")]
    InsufficientControlPoints { required: usize, provided: usize },

    #[error("no admissible face found after {attempts} attempts")]
    NoAdmissibleFace { attempts: usize },
}

impl GeometryError {
    pub(crate) fn degenerate_curve(reason: impl Into<String>) -> Self {
        Self::DegenerateCurve {
            reason: reason.into(),
        }
    }
}
