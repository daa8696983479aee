use burrow_kernel::CurveId;
use burrow_ops::{ChamberBatch, OffshootBatch, OpError, TubeBuild};
use burrow_types::{ConfigError, TunnelParams};

/// The session's main tunnel: the surface offshoots grow from.
#[derive(Debug, Clone, PartialEq)]
pub struct MainTunnel {
    pub tube: TubeBuild,
    /// Edge rings twisted by the deformer.
    pub deformed_rings: usize,
    /// Parameters the tunnel was built with.
    pub params: TunnelParams,
}

/// Everything one "Create Chambers" action produced.
#[derive(Debug, Clone)]
pub struct ColonyBuild {
    pub offshoots: OffshootBatch,
    /// `None` when no offshoot was placed, so no template was built.
    pub chambers: Option<ChamberBatch>,
}

impl ColonyBuild {
    pub fn chamber_count(&self) -> usize {
        self.chambers.as_ref().map_or(0, |c| c.chambers.len())
    }
}

/// Handles of the two built-in sample curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCurves {
    pub tunnel_path: CurveId,
    pub chamber_outline: CurveId,
}

/// Errors from session actions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("missing selection: {what}")]
    MissingSelection { what: &'static str },

    #[error("operation failed: {0}")]
    Op(#[from] OpError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
