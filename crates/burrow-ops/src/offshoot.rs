use std::f64::consts::PI;

use burrow_geom::{GeometryError, GuideCurve, Point3, Vec3};
use burrow_kernel::{KernelIntrospect, SurfaceId};
use burrow_types::{OffshootParams, TessellationSettings};
use nalgebra::UnitQuaternion;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::extrude::execute_extrude;
use crate::kernel_ext::KernelBundle;
use crate::types::{OffshootBatch, OffshootBuild, OpError};

/// Faces whose normal Y component exceeds this point too far upward to grow a branch.
pub const ADMISSIBILITY_THRESHOLD: f64 = 0.2;

/// Control point of an offshoot curve where its chamber sits.
pub const CHAMBER_ANCHOR_INDEX: usize = 3;

/// Face vertex used as the offshoot's starting point.
pub const ANCHOR_VERTEX: usize = 2;

/// Offshoot shape in local space. Control point 0 is the pivot, the branch
/// grows along +X and droops toward -Y, ending in a short hook past the chamber.
pub const OFFSHOOT_TEMPLATE: [[f64; 3]; 6] = [
    [-1.0, 0.0, 0.0],
    [-0.66, -0.1, 0.1],
    [-0.33, -0.3, -0.2],
    [0.0, -0.4, -0.1],
    [0.2, -0.55, -0.05],
    [0.3, -0.75, 0.0],
];

/// Number of offshoots requested for a surface of `face_count` faces.
pub fn target_count(face_count: usize, density: f64) -> usize {
    (face_count as f64 * density).floor() as usize
}

/// An accepted face and where the offshoot starts on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSample {
    pub face: usize,
    pub anchor: Point3,
    pub normal: Vec3,
    /// Samples drawn, including the accepted one.
    pub attempts: usize,
}

/// Draw random faces until one is admissible (`normal.y <= 0.2`).
///
/// Three draws in four come from the first quarter of the face list (the
/// start of the tunnel), the rest from the whole surface. Faces with no
/// defined normal are rejected. Gives up after `max_attempts` draws.
pub fn sample_admissible_face<R: Rng + ?Sized>(
    introspect: &dyn KernelIntrospect,
    surface: SurfaceId,
    max_attempts: usize,
    rng: &mut R,
) -> Result<FaceSample, OpError> {
    let faces = introspect.face_count(surface)?;
    if faces == 0 {
        return Err(GeometryError::NoAdmissibleFace { attempts: 0 }.into());
    }
    let head = (faces / 4).max(1);

    for attempt in 1..=max_attempts {
        let face = if rng.gen_ratio(3, 4) {
            rng.gen_range(0..head)
        } else {
            rng.gen_range(0..faces)
        };

        let normal = match introspect.sample_normal(surface, face)? {
            Some(n) if n.y <= ADMISSIBILITY_THRESHOLD => n,
            Some(n) => {
                debug!(face, score = n.y, "rejected face");
                continue;
            }
            None => {
                debug!(face, "rejected face without normal");
                continue;
            }
        };

        let vertices = introspect.face_vertices(surface, face)?;
        let Some(&vertex) = vertices.get(ANCHOR_VERTEX) else {
            debug!(face, vertices = vertices.len(), "rejected face with too few vertices");
            continue;
        };
        let anchor = introspect.vertex_position(surface, vertex)?;

        return Ok(FaceSample {
            face,
            anchor,
            normal,
            attempts: attempt,
        });
    }

    Err(GeometryError::NoAdmissibleFace {
        attempts: max_attempts,
    }
    .into())
}

/// The offshoot template placed at `anchor`, with control point 0 on the
/// anchor and the local +X axis turned onto `normal`.
pub fn offshoot_curve(anchor: Point3, normal: &Vec3) -> Result<GuideCurve, GeometryError> {
    let rotation = UnitQuaternion::rotation_between(&Vec3::x(), normal)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vec3::y_axis(), PI));
    let [px, py, pz] = OFFSHOOT_TEMPLATE[0];
    let pivot = Point3::new(px, py, pz);
    let points = OFFSHOOT_TEMPLATE
        .iter()
        .map(|&[x, y, z]| anchor + rotation.transform_vector(&(Point3::new(x, y, z) - pivot)))
        .collect();
    GuideCurve::new(points)
}

/// Grow `floor(faces * density)` offshoot tunnels from admissible faces of
/// the main tunnel.
///
/// An offshoot whose face search runs out of attempts is skipped with a
/// warning; the rest of the batch continues. Any other error removes every
/// curve and surface the batch created before it is returned.
#[instrument(skip(kb, params, tessellation, rng), fields(density = params.density))]
pub fn execute_offshoots<R: Rng + ?Sized>(
    kb: &mut dyn KernelBundle,
    main: SurfaceId,
    params: &OffshootParams,
    tessellation: &TessellationSettings,
    rng: &mut R,
) -> Result<OffshootBatch, OpError> {
    if !(0.0..=1.0).contains(&params.density) {
        return Err(OpError::invalid(format!(
            "density must be within [0, 1], got {}",
            params.density
        )));
    }

    let faces = kb.face_count(main)?;
    let mut batch = OffshootBatch {
        target: target_count(faces, params.density),
        ..OffshootBatch::default()
    };

    if let Err(err) = grow_offshoots(kb, main, params, tessellation, rng, &mut batch) {
        warn!(built = batch.offshoots.len(), error = %err, "offshoot batch failed, rolling back");
        discard_offshoots(kb, &batch.offshoots);
        return Err(err);
    }

    info!(
        placed = batch.offshoots.len(),
        requested = batch.target,
        attempts = batch.diagnostics.attempts,
        "placed offshoots"
    );
    Ok(batch)
}

fn grow_offshoots<R: Rng + ?Sized>(
    kb: &mut dyn KernelBundle,
    main: SurfaceId,
    params: &OffshootParams,
    tessellation: &TessellationSettings,
    rng: &mut R,
    batch: &mut OffshootBatch,
) -> Result<(), OpError> {
    for index in 0..batch.target {
        let sample = match sample_admissible_face(kb.as_introspect(), main, params.max_attempts, rng)
        {
            Ok(sample) => sample,
            Err(OpError::Geometry(GeometryError::NoAdmissibleFace { attempts })) => {
                warn!(index, attempts, "skipping offshoot");
                batch.diagnostics.attempts += attempts;
                batch.diagnostics.warnings.push(format!(
                    "offshoot {index} skipped: no admissible face after {attempts} attempts"
                ));
                continue;
            }
            Err(err) => return Err(err),
        };
        batch.diagnostics.attempts += sample.attempts;

        let curve = kb.insert_curve(offshoot_curve(sample.anchor, &sample.normal)?);
        let tube = match execute_extrude(
            kb,
            curve,
            sample.anchor,
            params.radius,
            params.taper,
            tessellation,
        ) {
            Ok(tube) => tube,
            Err(err) => {
                if let Err(e) = kb.delete_curve(curve) {
                    warn!(?curve, error = %e, "could not remove offshoot curve");
                }
                return Err(err);
            }
        };
        batch.offshoots.push(OffshootBuild {
            tube,
            face: sample.face,
            normal: sample.normal,
        });
    }
    Ok(())
}

/// Remove the curves and surfaces of built offshoots. Failures are logged
/// and skipped so the rest are still removed.
pub fn discard_offshoots(kb: &mut dyn KernelBundle, offshoots: &[OffshootBuild]) {
    for offshoot in offshoots {
        if let Err(e) = kb.delete_surface(offshoot.tube.surface) {
            warn!(surface = ?offshoot.tube.surface, error = %e, "could not remove offshoot surface");
        }
        if let Err(e) = kb.delete_curve(offshoot.tube.curve) {
            warn!(curve = ?offshoot.tube.curve, error = %e, "could not remove offshoot curve");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burrow_kernel::MockKernel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_target_count_floors() {
        assert_eq!(target_count(200, 0.05), 10);
        assert_eq!(target_count(200, 0.0), 0);
        assert_eq!(target_count(200, 1.0), 200);
        assert_eq!(target_count(199, 0.01), 1);
        assert_eq!(target_count(10, 0.05), 0);
    }

    #[test]
    fn test_offshoot_curve_starts_on_anchor() {
        let anchor = Point3::new(1.0, 2.0, 3.0);
        let curve = offshoot_curve(anchor, &Vec3::z()).unwrap();
        assert_eq!(curve.num_control_points(), 6);
        assert_relative_eq!(curve.control_point(0).unwrap(), anchor, epsilon = 1e-12);
    }

    #[test]
    fn test_offshoot_curve_aims_along_normal() {
        let anchor = Point3::origin();
        for normal in [Vec3::x(), -Vec3::x(), Vec3::z(), Vec3::new(0.6, -0.8, 0.0)] {
            let curve = offshoot_curve(anchor, &normal).unwrap();
            // Template X runs from -1 at the pivot to 0 at the chamber anchor.
            let chamber = curve.control_point(CHAMBER_ANCHOR_INDEX).unwrap();
            let along = (chamber - anchor).dot(&normal);
            assert_relative_eq!(along, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sampling_rejects_upward_faces() {
        let mut kernel = MockKernel::new();
        let up = Some(Vec3::y());
        let down = Some(-Vec3::y());
        let surface = kernel.insert_surface_with_normals(vec![up, up, None, down, up, up, up, up]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let sample = sample_admissible_face(&kernel, surface, 10_000, &mut rng).unwrap();
            assert_eq!(sample.face, 3);
            assert_relative_eq!(sample.anchor, Point3::new(4.0, -1.0, 0.0));
        }
    }

    #[test]
    fn test_sampling_exhaustion() {
        let mut kernel = MockKernel::new();
        let surface = kernel.insert_surface_with_normals(vec![Some(Vec3::y()); 12]);
        let mut rng = StdRng::seed_from_u64(1);
        let result = sample_admissible_face(&kernel, surface, 50, &mut rng);
        assert!(matches!(
            result,
            Err(OpError::Geometry(GeometryError::NoAdmissibleFace { attempts: 50 }))
        ));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut kernel = MockKernel::new();
        let surface = kernel.insert_surface_with_normals(vec![Some(Vec3::new(0.0, 0.2, 1.0))]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(sample_admissible_face(&kernel, surface, 1, &mut rng).is_ok());
    }

    fn head_share(faces: usize, draws: usize, seed: u64) -> f64 {
        let mut kernel = MockKernel::new();
        let surface = kernel.insert_surface_with_normals(vec![Some(-Vec3::y()); faces]);
        let head = (faces / 4).max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let hits = (0..draws)
            .filter(|_| {
                let sample = sample_admissible_face(&kernel, surface, 1, &mut rng).unwrap();
                assert!(sample.face < faces);
                sample.face < head
            })
            .count();
        hits as f64 / draws as f64
    }

    #[test]
    fn test_sampling_favors_tunnel_start() {
        // 3/4 from the first quarter, 1/4 uniform: 0.75 + 0.25 * 0.25.
        let share = head_share(400, 20_000, 11);
        assert!((share - 0.8125).abs() < 0.02, "head share {share}");
    }

    #[test]
    fn test_sampling_head_is_at_least_one_face() {
        // F / 4 == 0, so the head is face 0 alone: 0.75 + 0.25 / 3.
        let share = head_share(3, 20_000, 12);
        assert!((share - (0.75 + 0.25 / 3.0)).abs() < 0.02, "head share {share}");
        assert_eq!(head_share(1, 200, 13), 1.0);
    }

    #[test]
    fn test_failed_batch_removes_built_offshoots() {
        let mut kernel = MockKernel::new().with_extrude_limit(3);
        let main = kernel.insert_surface_with_normals(vec![Some(-Vec3::y()); 100]);
        let mut rng = StdRng::seed_from_u64(5);
        let result = execute_offshoots(
            &mut kernel,
            main,
            &OffshootParams::default(),
            &TessellationSettings::default(),
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(OpError::Kernel(burrow_kernel::KernelError::Geometry(
                GeometryError::DegenerateCurve { .. }
            )))
        ));
        assert!(kernel.list_curves().is_empty());
        assert_eq!(kernel.list_surfaces(), vec![main]);
        let deleted_curves = kernel
            .calls()
            .iter()
            .filter(|c| matches!(c, burrow_kernel::KernelCall::DeleteCurve { .. }))
            .count();
        assert_eq!(deleted_curves, 4);
    }
}
