//! Colony workflows against MockKernel: deterministic surfaces with chosen normals.

use burrow_geom::{Point3, Vec3};
use burrow_kernel::{KernelCall, KernelIntrospect, MockKernel};
use burrow_types::{ChamberParams, OffshootParams};
use proptest::prelude::*;
use test_harness::assertions::*;
use test_harness::helpers::{circle_curve, seeded_config};
use test_harness::workflow::{SAMPLE_OUTLINE, SAMPLE_PATH};
use test_harness::ColonyBuilder;

// ── Scenario 1: Call sequence of a full build ───────────────────────────

#[test]
fn test_full_build_call_sequence() {
    let mut m = ColonyBuilder::mock(1).unwrap();
    m.sample_curves().unwrap();
    m.default_tunnel(SAMPLE_PATH).unwrap();
    m.kernel.clear_calls();

    let build = m.default_chambers(SAMPLE_OUTLINE).unwrap().clone();
    assert_eq!(build.chamber_count(), 10);

    let calls = m.kernel.calls();
    let count = |pred: fn(&KernelCall) -> bool| calls.iter().filter(|c| pred(c)).count();
    assert_eq!(count(|c| matches!(c, KernelCall::InsertCurve { .. })), 10);
    assert_eq!(count(|c| matches!(c, KernelCall::ExtrudeProfile { .. })), 10);
    assert_eq!(count(|c| matches!(c, KernelCall::BevelAndCap { .. })), 1);
    assert_eq!(count(|c| matches!(c, KernelCall::DuplicateAndTranslate { .. })), 10);
    assert_eq!(count(|c| matches!(c, KernelCall::DeleteCurve { .. })), 10);

    // The template is built after every offshoot is extruded.
    let bevel = calls
        .iter()
        .position(|c| matches!(c, KernelCall::BevelAndCap { .. }))
        .unwrap();
    let last_extrude = calls
        .iter()
        .rposition(|c| matches!(c, KernelCall::ExtrudeProfile { .. }))
        .unwrap();
    assert!(bevel > last_extrude);
}

// ── Scenario 2: Offshoot extrusion parameters ───────────────────────────

#[test]
fn test_offshoots_use_offshoot_params() {
    let mut m = ColonyBuilder::mock(2).unwrap();
    m.sample_curves().unwrap();
    m.default_tunnel(SAMPLE_PATH).unwrap();
    m.kernel.clear_calls();
    let offshoots = OffshootParams {
        density: 0.02,
        radius: 0.25,
        taper: 0.8,
        ..OffshootParams::default()
    };
    m.chambers(SAMPLE_OUTLINE, &offshoots, &ChamberParams::default())
        .unwrap();
    for call in m.kernel.calls() {
        if let KernelCall::ExtrudeProfile { radius, taper, .. } = call {
            assert_eq!(*radius, 0.25);
            assert_eq!(*taper, 0.8);
        }
    }
}

// ── Scenario 3: Chamber size scales the template ────────────────────────

#[test]
fn test_chamber_size_reaches_kernel() {
    let mut m = ColonyBuilder::mock(3).unwrap();
    m.sample_curves().unwrap();
    m.default_tunnel(SAMPLE_PATH).unwrap();
    let chambers = ChamberParams {
        size: 2.5,
        ..ChamberParams::default()
    };
    m.chambers(SAMPLE_OUTLINE, &OffshootParams::default(), &chambers)
        .unwrap();
    assert!(m
        .kernel
        .calls()
        .contains(&KernelCall::BevelAndCap {
            curve: m.curve_id(SAMPLE_OUTLINE).unwrap(),
            scale: 2.5,
        }));
}

// ── Scenario 4: Steep main tunnel ───────────────────────────────────────

#[test]
fn test_all_faces_facing_up_skips_every_offshoot() {
    let kernel = MockKernel::new().with_extrude_normal(Some(Vec3::y()));
    let mut m = ColonyBuilder::with_config(kernel, seeded_config(4)).unwrap();
    m.sample_curves().unwrap();
    m.default_tunnel(SAMPLE_PATH).unwrap();
    let offshoots = OffshootParams {
        max_attempts: 25,
        ..OffshootParams::default()
    };
    let build = m
        .chambers(SAMPLE_OUTLINE, &offshoots, &ChamberParams::default())
        .unwrap()
        .clone();
    assert_eq!(build.offshoots.target, 10);
    assert_eq!(build.offshoots.diagnostics.attempts, 250);
    assert!(build.chambers.is_none());
    assert!(m.kernel.list_chambers().is_empty());
    assert_eq!(m.report().warnings.len(), 10);
}

// ── Scenario 5: Repeated chamber runs on one tunnel ─────────────────────

#[test]
fn test_second_chamber_run_adds_more() {
    let mut m = ColonyBuilder::mock(5).unwrap();
    m.sample_curves().unwrap();
    m.curve("blob", circle_curve(Point3::origin(), 1.5, 6).unwrap())
        .unwrap();
    m.default_tunnel(SAMPLE_PATH).unwrap();
    m.default_chambers(SAMPLE_OUTLINE).unwrap();
    m.default_chambers("blob").unwrap();
    // Two templates and ten copies from each run.
    assert_eq!(m.kernel.list_chambers().len(), 22);
    assert_eq!(m.kernel.list_curves().len(), 3);
}

// ── Property: chambers always land on offshoot ends ─────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn chamber_count_tracks_offshoots(seed in any::<u64>(), density in 0.0f64..=0.1) {
        let mut m = ColonyBuilder::mock(seed).unwrap();
        m.sample_curves().unwrap();
        m.default_tunnel(SAMPLE_PATH).unwrap();
        let offshoots = OffshootParams { density, ..OffshootParams::default() };
        let build = m
            .chambers(SAMPLE_OUTLINE, &offshoots, &ChamberParams::default())
            .unwrap()
            .clone();
        assert_offshoots_admissible(&build.offshoots, "mock").unwrap();
        prop_assert_eq!(build.chamber_count(), build.offshoots.offshoots.len());
        prop_assert_eq!(build.offshoots.offshoots.len(), (200.0 * density).floor() as usize);
    }
}
