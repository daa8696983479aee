use burrow_geom::geometry::{centroid, newell_normal};
use burrow_geom::{GeometryError, Point3};
use burrow_kernel::{KernelIntrospect, SurfaceId};
use nalgebra::{Unit, UnitQuaternion};
use tracing::{debug, instrument};

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Every `RING_STRIDE`-th interior ring is twisted.
pub const RING_STRIDE: usize = 3;

/// Indices (into `rings`) of the rings twisted by the deformer.
///
/// The first and last rings are excluded; from the remaining rings, every
/// third one is taken starting at the second.
pub fn select_deform_rings(rings: &[Vec<usize>]) -> Vec<usize> {
    if rings.len() < 3 {
        return Vec::new();
    }
    let interior = rings.len() - 2;
    (1..interior).step_by(RING_STRIDE).map(|i| i + 1).collect()
}

/// Twist a subset of a tube's edge rings by `bumpiness` degrees about the
/// tube's long axis, giving the surface a lumpy look.
///
/// All selected rings rotate together about their common centroid. Returns the
/// number of rings rotated.
#[instrument(skip(kb))]
pub fn execute_deform(
    kb: &mut dyn KernelBundle,
    surface: SurfaceId,
    bumpiness: f64,
) -> Result<usize, OpError> {
    if !bumpiness.is_finite() {
        return Err(OpError::invalid(format!(
            "bumpiness must be finite, got {bumpiness}"
        )));
    }
    if bumpiness == 0.0 {
        return Ok(0);
    }

    let rings = kb.edge_rings(surface)?;
    let selected = select_deform_rings(&rings);
    if selected.is_empty() {
        return Ok(0);
    }

    let axis = long_axis(kb.as_introspect(), surface, &rings)?;
    let vertices: Vec<usize> = selected
        .iter()
        .flat_map(|&r| rings[r].iter().copied())
        .collect();
    let positions = vertices
        .iter()
        .map(|&v| kb.vertex_position(surface, v))
        .collect::<Result<Vec<_>, _>>()?;
    let pivot = centroid(&positions);

    let rotation = UnitQuaternion::from_axis_angle(&axis, bumpiness.to_radians());
    kb.rotate_vertices(surface, &vertices, &pivot, &rotation)?;

    debug!(rings = selected.len(), vertices = vertices.len(), "twisted rings");
    Ok(selected.len())
}

/// Direction from the first ring center to the last; the first ring's plane
/// normal when the two centers coincide.
fn long_axis(
    introspect: &dyn KernelIntrospect,
    surface: SurfaceId,
    rings: &[Vec<usize>],
) -> Result<Unit<nalgebra::Vector3<f64>>, OpError> {
    let first = ring_positions(introspect, surface, &rings[0])?;
    let last = ring_positions(introspect, surface, &rings[rings.len() - 1])?;
    let span = centroid(&last) - centroid(&first);
    let tol = burrow_geom::default_tolerance();
    if !tol.is_zero_direction(&span) {
        return Ok(Unit::new_normalize(span));
    }
    newell_normal(&first).map(Unit::new_unchecked).ok_or_else(|| {
        GeometryError::DegenerateSurface {
            reason: "tube has no long axis".to_string(),
        }
        .into()
    })
}

fn ring_positions(
    introspect: &dyn KernelIntrospect,
    surface: SurfaceId,
    ring: &[usize],
) -> Result<Vec<Point3>, OpError> {
    ring.iter()
        .map(|&v| introspect.vertex_position(surface, v).map_err(OpError::from))
        .collect()
}
