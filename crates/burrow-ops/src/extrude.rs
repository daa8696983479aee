use burrow_geom::{Point3, ProfileCircle};
use burrow_kernel::CurveId;
use burrow_types::TessellationSettings;
use tracing::{info, instrument};

use crate::kernel_ext::KernelBundle;
use crate::types::{OpError, TubeBuild};

/// Curve parameter where the start tangent is sampled. Slightly inside the
/// domain so a clamped end does not flatten the direction.
pub const TANGENT_SAMPLE_PARAM: f64 = 0.01;

/// Sweep a circular profile of `radius` along `curve`, starting at `anchor`.
///
/// The profile is oriented by the curve tangent at [`TANGENT_SAMPLE_PARAM`]
/// and centered on the anchor. The radius scales from 1 at the start to
/// `taper` at the end. The curve is left in place.
#[instrument(skip(kb, tessellation))]
pub fn execute_extrude(
    kb: &mut dyn KernelBundle,
    curve: CurveId,
    anchor: Point3,
    radius: f64,
    taper: f64,
    tessellation: &TessellationSettings,
) -> Result<TubeBuild, OpError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(OpError::invalid(format!("radius must be positive, got {radius}")));
    }
    if !taper.is_finite() || taper < 0.0 {
        return Err(OpError::invalid(format!(
            "taper must be non-negative, got {taper}"
        )));
    }

    let tangent = kb.sample_tangent(curve, TANGENT_SAMPLE_PARAM)?;
    let profile = ProfileCircle::new(anchor, tangent, radius, tessellation.profile_segments)?;
    let surface = kb.extrude_profile(curve, &profile, taper, tessellation.path_divisions)?;

    info!(?curve, ?surface, radius, taper, "extruded tunnel");

    Ok(TubeBuild {
        curve,
        surface,
        anchor,
    })
}
