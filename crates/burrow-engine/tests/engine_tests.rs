use burrow_engine::{ColonySession, EngineError};
use burrow_geom::{GeometryError, GuideCurve, Point3};
use burrow_kernel::{Kernel, KernelError, KernelIntrospect, MeshKernel, MockKernel};
use burrow_ops::OpError;
use burrow_types::{ChamberParams, ColonyConfig, ConfigError, OffshootParams, TunnelParams};
use proptest::prelude::*;

fn seeded(seed: u64) -> ColonySession {
    ColonySession::new(ColonyConfig {
        seed: Some(seed),
        ..ColonyConfig::default()
    })
    .unwrap()
}

// ── Session setup ──────────────────────────────────────────────────────────

#[test]
fn new_session_rejects_invalid_config() {
    let config = ColonyConfig {
        tunnel: TunnelParams {
            taper: 3.0,
            ..TunnelParams::default()
        },
        ..ColonyConfig::default()
    };
    assert!(matches!(
        ColonySession::new(config),
        Err(EngineError::Config(ConfigError::OutOfRange { .. }))
    ));
}

#[test]
fn session_without_seed_uses_entropy() {
    let session = ColonySession::new(ColonyConfig::default()).unwrap();
    assert!(session.main_tunnel().is_none());
    assert!(session.warnings.is_empty());
}

#[test]
fn default_circle_and_sample_curves() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(1);
    let circle = session.create_default_circle(&mut kernel).unwrap();
    let samples = session.create_sample_curves(&mut kernel).unwrap();

    let c = kernel.curve(circle).unwrap();
    assert!(c.is_closed());
    assert_eq!(c.num_control_points(), 8);
    assert_eq!(kernel.curve(samples.tunnel_path).unwrap().num_control_points(), 8);
    assert!(kernel.curve(samples.chamber_outline).unwrap().is_closed());
    assert_eq!(kernel.list_curves().len(), 3);
}

#[test]
fn add_curve_stores_user_curve() {
    let mut kernel = MockKernel::new();
    let mut session = seeded(1);
    let id = session.add_curve(
        GuideCurve::new(vec![Point3::origin(), Point3::new(0.0, -1.0, 0.0)]).unwrap(),
        &mut kernel,
    );
    assert_eq!(kernel.list_curves(), vec![id]);
}

// ── Create Tunnel ──────────────────────────────────────────────────────────

#[test]
fn create_tunnel_sets_main_tunnel() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(2);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    let tunnel = session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();

    assert_eq!(kernel.face_count(tunnel.tube.surface).unwrap(), 200);
    assert_eq!(tunnel.deformed_rings, 8);
    assert_eq!(session.main_tunnel(), Some(&tunnel));
    let start = kernel.control_point(samples.tunnel_path, 0).unwrap();
    assert!(nalgebra::distance(&tunnel.tube.anchor, &start) < 1e-12);
}

#[test]
fn create_tunnel_without_selection_warns() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(3);
    let result = session.create_tunnel(None, &TunnelParams::default(), &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::MissingSelection { what: "guide curve" })
    ));
    assert_eq!(session.warnings.len(), 1);
    assert!(session.main_tunnel().is_none());
    assert!(kernel.list_surfaces().is_empty());
}

#[test]
fn create_tunnel_rejects_out_of_range_params() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(3);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    let params = TunnelParams {
        bumpiness: 150.0,
        ..TunnelParams::default()
    };
    let result = session.create_tunnel(Some(samples.tunnel_path), &params, &mut kernel);
    assert!(matches!(result, Err(EngineError::Config(_))));
    assert!(kernel.list_surfaces().is_empty());
    assert_eq!(session.warnings.len(), 1);
}

#[test]
fn create_tunnel_on_deleted_curve_fails_cleanly() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(4);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    kernel.delete_curve(samples.tunnel_path).unwrap();
    let result = session.create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::Op(OpError::Kernel(KernelError::CurveNotFound { .. })))
    ));
    assert!(session.main_tunnel().is_none());
}

// ── Create Chambers ────────────────────────────────────────────────────────

#[test]
fn create_chambers_requires_main_tunnel() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(5);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    let result = session.create_chambers_from_config(Some(samples.chamber_outline), &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::MissingSelection { what: "main tunnel" })
    ));
    assert!(kernel.list_chambers().is_empty());
}

#[test]
fn create_chambers_requires_base_curve() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(5);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();
    let result = session.create_chambers_from_config(None, &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::MissingSelection { what: "chamber base curve" })
    ));
    assert_eq!(kernel.list_surfaces().len(), 1);
    assert_eq!(session.warnings.len(), 1);
}

#[test]
fn create_chambers_full_colony() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(6);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();
    let build = session
        .create_chambers_from_config(Some(samples.chamber_outline), &mut kernel)
        .unwrap();

    assert_eq!(build.offshoots.offshoots.len(), 10);
    assert_eq!(build.chamber_count(), 10);
    // Template plus one copy per offshoot.
    assert_eq!(kernel.list_chambers().len(), 11);
    // Offshoot curves are consumed; the two sample curves remain.
    assert_eq!(kernel.list_curves().len(), 2);
    assert!(session.warnings.is_empty());
}

#[test]
fn create_chambers_zero_density_builds_nothing() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(7);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();
    let offshoots = OffshootParams {
        density: 0.0,
        ..OffshootParams::default()
    };
    let build = session
        .create_chambers(
            Some(samples.chamber_outline),
            &offshoots,
            &ChamberParams::default(),
            &mut kernel,
        )
        .unwrap();
    assert!(build.chambers.is_none());
    assert_eq!(build.chamber_count(), 0);
    assert!(kernel.list_chambers().is_empty());
    assert_eq!(kernel.list_surfaces().len(), 1);
}

#[test]
fn skipped_offshoots_surface_as_session_warnings() {
    let mut kernel = MockKernel::new().with_extrude_normal(Some(nalgebra::Vector3::y()));
    let mut session = seeded(8);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();
    let offshoots = OffshootParams {
        max_attempts: 5,
        ..OffshootParams::default()
    };
    let build = session
        .create_chambers(
            Some(samples.chamber_outline),
            &offshoots,
            &ChamberParams::default(),
            &mut kernel,
        )
        .unwrap();
    assert_eq!(build.offshoots.target, 10);
    assert!(build.offshoots.offshoots.is_empty());
    assert!(build.chambers.is_none());
    assert_eq!(session.warnings.len(), 10);
}

#[test]
fn create_chambers_with_flat_base_creates_nothing() {
    let mut kernel = MeshKernel::new();
    let mut session = seeded(9);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();
    let line = session.add_curve(
        GuideCurve::new(vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap(),
        &mut kernel,
    );

    let result = session.create_chambers_from_config(Some(line), &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::Op(OpError::Geometry(GeometryError::DegenerateCurve { .. })))
    ));
    assert_eq!(kernel.list_curves().len(), 3);
    assert_eq!(kernel.list_surfaces().len(), 1);
    assert!(kernel.list_chambers().is_empty());
    assert!(!kernel.curve(line).unwrap().is_closed());
    assert_eq!(session.warnings.len(), 1);
}

#[test]
fn failed_offshoot_extrusion_leaves_no_offshoots() {
    // The main tunnel and three offshoots extrude, the fourth fails.
    let mut kernel = MockKernel::new().with_extrude_limit(4);
    let mut session = seeded(10);
    let samples = session.create_sample_curves(&mut kernel).unwrap();
    session
        .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
        .unwrap();

    let result = session.create_chambers_from_config(Some(samples.chamber_outline), &mut kernel);
    assert!(matches!(
        result,
        Err(EngineError::Op(OpError::Kernel(KernelError::Geometry(_))))
    ));
    assert_eq!(kernel.list_curves().len(), 2);
    assert_eq!(kernel.list_surfaces().len(), 1);
    assert!(kernel.list_chambers().is_empty());
}

#[test]
fn same_seed_same_colony() {
    let run = |seed| {
        let mut kernel = MeshKernel::new();
        let mut session = seeded(seed);
        let samples = session.create_sample_curves(&mut kernel).unwrap();
        session
            .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
            .unwrap();
        let build = session
            .create_chambers_from_config(Some(samples.chamber_outline), &mut kernel)
            .unwrap();
        build
            .offshoots
            .offshoots
            .iter()
            .map(|o| o.face)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(11), run(11));
}

// ── Property tests ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn chamber_count_follows_density(density in 0.0f64..=0.2, seed in any::<u64>()) {
        let mut kernel = MockKernel::new();
        let mut session = seeded(seed);
        let samples = session.create_sample_curves(&mut kernel).unwrap();
        session
            .create_tunnel_from_config(Some(samples.tunnel_path), &mut kernel)
            .unwrap();
        let offshoots = OffshootParams { density, ..OffshootParams::default() };
        let build = session
            .create_chambers(Some(samples.chamber_outline), &offshoots, &ChamberParams::default(), &mut kernel)
            .unwrap();
        let expected = (200.0 * density).floor() as usize;
        prop_assert_eq!(build.offshoots.offshoots.len(), expected);
        prop_assert_eq!(build.chamber_count(), expected);
        prop_assert_eq!(kernel.list_curves().len(), 2);
    }
}
