//! ColonyBuilder: fluent API for scripting colony builds in tests.
//!
//! Drives the real `ColonySession` actions. Curves are addressed by name
//! instead of handle for readability.

use std::collections::HashMap;

use burrow_engine::{ColonyBuild, ColonySession, MainTunnel};
use burrow_geom::{GuideCurve, TubeMesh};
use burrow_kernel::{CurveId, MeshKernel, MockKernel};
use burrow_ops::KernelBundle;
use burrow_types::{ChamberParams, ColonyConfig, OffshootParams, TunnelParams};

use crate::helpers::{seeded_config, HarnessError};
use crate::report::ColonyReport;

/// Name the sample tunnel path is registered under.
pub const SAMPLE_PATH: &str = "path";
/// Name the sample chamber outline is registered under.
pub const SAMPLE_OUTLINE: &str = "outline";

/// A fluent builder for constructing and verifying colonies in tests.
pub struct ColonyBuilder<K: KernelBundle> {
    pub kernel: K,
    pub session: ColonySession,
    curves: HashMap<String, CurveId>,
    last_build: Option<ColonyBuild>,
}

impl ColonyBuilder<MeshKernel> {
    /// Builder over the real mesh kernel with a fixed sampling seed.
    pub fn mesh(seed: u64) -> Result<Self, HarnessError> {
        Self::with_config(MeshKernel::new(), seeded_config(seed))
    }

    /// The main tunnel's mesh.
    pub fn main_tube(&self) -> Result<&TubeMesh, HarnessError> {
        let tunnel = self.session.main_tunnel().ok_or(HarnessError::NoMainTunnel)?;
        self.kernel
            .tube(tunnel.tube.surface)
            .ok_or(HarnessError::NoMainTunnel)
    }
}

impl ColonyBuilder<MockKernel> {
    /// Builder over the mock kernel with a fixed sampling seed.
    pub fn mock(seed: u64) -> Result<Self, HarnessError> {
        Self::with_config(MockKernel::new(), seeded_config(seed))
    }
}

impl<K: KernelBundle> ColonyBuilder<K> {
    pub fn with_config(kernel: K, config: ColonyConfig) -> Result<Self, HarnessError> {
        Ok(Self {
            kernel,
            session: ColonySession::new(config)?,
            curves: HashMap::new(),
            last_build: None,
        })
    }

    // ── Curves ──────────────────────────────────────────────────────────

    /// Register a curve under `name`.
    pub fn curve(&mut self, name: &str, curve: GuideCurve) -> Result<CurveId, HarnessError> {
        self.check_name_available(name)?;
        let id = self.session.add_curve(curve, &mut self.kernel);
        self.curves.insert(name.to_string(), id);
        Ok(id)
    }

    /// Add the default unit circle under `name`.
    pub fn default_circle(&mut self, name: &str) -> Result<CurveId, HarnessError> {
        self.check_name_available(name)?;
        let id = self.session.create_default_circle(&mut self.kernel)?;
        self.curves.insert(name.to_string(), id);
        Ok(id)
    }

    /// Add the sample curves as [`SAMPLE_PATH`] and [`SAMPLE_OUTLINE`].
    pub fn sample_curves(&mut self) -> Result<&mut Self, HarnessError> {
        self.check_name_available(SAMPLE_PATH)?;
        self.check_name_available(SAMPLE_OUTLINE)?;
        let samples = self.session.create_sample_curves(&mut self.kernel)?;
        self.curves.insert(SAMPLE_PATH.to_string(), samples.tunnel_path);
        self.curves
            .insert(SAMPLE_OUTLINE.to_string(), samples.chamber_outline);
        Ok(self)
    }

    /// Look up a registered curve handle.
    pub fn curve_id(&self, name: &str) -> Result<CurveId, HarnessError> {
        self.curves
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::CurveNotFound {
                name: name.to_string(),
            })
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// "Create Tunnel" along the named curve.
    pub fn tunnel(&mut self, curve: &str, params: &TunnelParams) -> Result<MainTunnel, HarnessError> {
        let id = self.curve_id(curve)?;
        Ok(self.session.create_tunnel(Some(id), params, &mut self.kernel)?)
    }

    /// "Create Tunnel" along the named curve with the configured parameters.
    pub fn default_tunnel(&mut self, curve: &str) -> Result<MainTunnel, HarnessError> {
        let params = self.session.config.tunnel;
        self.tunnel(curve, &params)
    }

    /// "Create Chambers" with the named base curve.
    pub fn chambers(
        &mut self,
        base: &str,
        offshoots: &OffshootParams,
        chambers: &ChamberParams,
    ) -> Result<&ColonyBuild, HarnessError> {
        let id = self.curve_id(base)?;
        let build = self
            .session
            .create_chambers(Some(id), offshoots, chambers, &mut self.kernel)?;
        Ok(self.last_build.insert(build))
    }

    /// "Create Chambers" with the named base curve and the configured parameters.
    pub fn default_chambers(&mut self, base: &str) -> Result<&ColonyBuild, HarnessError> {
        let offshoots = self.session.config.offshoots;
        let chambers = self.session.config.chambers;
        self.chambers(base, &offshoots, &chambers)
    }

    /// Result of the last successful "Create Chambers".
    pub fn last_build(&self) -> Option<&ColonyBuild> {
        self.last_build.as_ref()
    }

    /// Text summary of the kernel contents and session state.
    pub fn report(&self) -> ColonyReport {
        ColonyReport::collect(self.kernel.as_introspect(), &self.session)
    }

    fn check_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.curves.contains_key(name) {
            Err(HarnessError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}
