use burrow_geom::mesh::chamber_outline;
use burrow_geom::{GeometryError, Point3};
use burrow_kernel::{ChamberId, CurveId, KernelIntrospect};
use burrow_types::ChamberParams;
use tracing::{info, instrument};

use crate::kernel_ext::KernelBundle;
use crate::offshoot::CHAMBER_ANCHOR_INDEX;
use crate::types::OpError;

/// Check that `base` can become a chamber at `params.size` without touching
/// the kernel: a positive size, at least 3 distinct control points, and an
/// outline that encloses area.
pub fn check_chamber_base(
    introspect: &dyn KernelIntrospect,
    base: CurveId,
    params: &ChamberParams,
    outline_samples: usize,
) -> Result<(), OpError> {
    if !params.size.is_finite() || params.size <= 0.0 {
        return Err(OpError::invalid(format!(
            "chamber size must be positive, got {}",
            params.size
        )));
    }

    let curve = introspect.curve(base)?;
    let distinct = distinct_points(curve.control_points());
    if distinct < 3 {
        return Err(GeometryError::DegenerateCurve {
            reason: format!("chamber outline needs 3 distinct points, got {distinct}"),
        }
        .into());
    }
    chamber_outline(curve, outline_samples)?;
    Ok(())
}

/// Build the chamber every offshoot end gets a copy of.
///
/// The base curve is checked first, then closed in place if it is open,
/// beveled, capped and scaled by `params.size` about its center.
#[instrument(skip(kb, params), fields(size = params.size))]
pub fn build_chamber_template(
    kb: &mut dyn KernelBundle,
    base: CurveId,
    params: &ChamberParams,
    outline_samples: usize,
) -> Result<ChamberId, OpError> {
    check_chamber_base(kb.as_introspect(), base, params, outline_samples)?;
    kb.close_curve(base)?;
    let template = kb.bevel_and_cap(base, &params.bevel, params.size, outline_samples)?;
    info!(?template, "built chamber template");
    Ok(template)
}

/// Put a copy of `template` at control point 3 of every curve, then delete
/// the curves. All anchors are read before anything is placed, so a short
/// curve leaves the kernel untouched.
#[instrument(skip(kb, curves), fields(count = curves.len()))]
pub fn place_chambers(
    kb: &mut dyn KernelBundle,
    template: ChamberId,
    curves: &[CurveId],
) -> Result<Vec<ChamberId>, OpError> {
    let anchors = curves
        .iter()
        .map(|&c| kb.control_point(c, CHAMBER_ANCHOR_INDEX))
        .collect::<Result<Vec<_>, _>>()?;

    let mut placed = Vec::with_capacity(curves.len());
    for (&curve, anchor) in curves.iter().zip(&anchors) {
        placed.push(kb.duplicate_and_translate(template, anchor)?);
        kb.delete_curve(curve)?;
    }

    if !placed.is_empty() {
        info!(placed = placed.len(), "placed chambers");
    }
    Ok(placed)
}

fn distinct_points(points: &[Point3]) -> usize {
    let tol = burrow_geom::default_tolerance();
    let mut seen: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.iter().any(|q| tol.points_coincident(p, q)) {
            seen.push(*p);
        }
    }
    seen.len()
}
