//! Assertion helpers with diagnostic output.
//!
//! Every failure names the check context and reports expected vs actual.

use burrow_geom::{Point3, TubeMesh};
use burrow_kernel::{ChamberId, KernelIntrospect, SurfaceId};
use burrow_ops::offshoot::ADMISSIBILITY_THRESHOLD;
use burrow_ops::OffshootBatch;

use crate::helpers::HarnessError;

fn fail(ctx: &str, detail: String) -> HarnessError {
    HarnessError::AssertionFailed {
        detail: format!("[{ctx}] {detail}"),
    }
}

/// Assert `actual` is within `tol` of `expected`.
pub fn assert_near(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(fail(
            ctx,
            format!("expected {expected:.6}, got {actual:.6} (tol={tol})"),
        ))
    }
}

/// Assert a surface has exactly `expected` faces.
pub fn assert_face_count(
    kb: &dyn KernelIntrospect,
    surface: SurfaceId,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = kb.face_count(surface)?;
    if actual == expected {
        Ok(())
    } else {
        Err(fail(ctx, format!("expected {expected} faces, got {actual}")))
    }
}

/// Assert a tube's path length and its start and end cross-section radii.
pub fn assert_tube_profile(
    tube: &TubeMesh,
    length: f64,
    start_radius: f64,
    end_radius: f64,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    assert_near(tube.length(), length, tol, &format!("{ctx}: length"))?;
    assert_near(
        tube.radius_at(0.0),
        start_radius,
        tol,
        &format!("{ctx}: start radius"),
    )?;
    assert_near(
        tube.radius_at(1.0),
        end_radius,
        tol,
        &format!("{ctx}: end radius"),
    )
}

/// Assert every placed offshoot grows from a face that does not point too far up.
pub fn assert_offshoots_admissible(batch: &OffshootBatch, ctx: &str) -> Result<(), HarnessError> {
    for (i, offshoot) in batch.offshoots.iter().enumerate() {
        if offshoot.normal.y > ADMISSIBILITY_THRESHOLD {
            return Err(fail(
                ctx,
                format!(
                    "offshoot {i} on face {} has normal.y = {:.3} > {ADMISSIBILITY_THRESHOLD}",
                    offshoot.face, offshoot.normal.y
                ),
            ));
        }
    }
    Ok(())
}

/// Assert chamber `i` sits on `targets[i]`.
pub fn assert_chambers_at(
    kb: &dyn KernelIntrospect,
    chambers: &[ChamberId],
    targets: &[Point3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    if chambers.len() != targets.len() {
        return Err(fail(
            ctx,
            format!(
                "expected {} chambers, got {}",
                targets.len(),
                chambers.len()
            ),
        ));
    }
    for (i, (chamber, target)) in chambers.iter().zip(targets).enumerate() {
        let at = kb.chamber_position(*chamber)?;
        let dist = nalgebra::distance(&at, target);
        if dist > tol {
            return Err(fail(
                ctx,
                format!("chamber {i} at {at:?}, expected {target:?} (off by {dist:.2e})"),
            ));
        }
    }
    Ok(())
}

/// Assert two vertex snapshots match position for position.
pub fn assert_vertices_unchanged(
    before: &[Point3],
    after: &[Point3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    if before.len() != after.len() {
        return Err(fail(
            ctx,
            format!("vertex count changed: {} -> {}", before.len(), after.len()),
        ));
    }
    match before
        .iter()
        .zip(after)
        .position(|(a, b)| nalgebra::distance(a, b) > tol)
    {
        Some(i) => Err(fail(
            ctx,
            format!("vertex {i} moved: {:?} -> {:?}", before[i], after[i]),
        )),
        None => Ok(()),
    }
}
