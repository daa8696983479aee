pub mod presets;
pub mod types;

use burrow_geom::GuideCurve;
use burrow_kernel::CurveId;
use burrow_ops::{
    build_chamber_template, check_chamber_base, discard_offshoots, execute_deform,
    execute_extrude, execute_offshoots, place_chambers, ChamberBatch, KernelBundle, OpError,
};
use burrow_types::{ChamberParams, ColonyConfig, OffshootParams, TunnelParams};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument, warn};

pub use crate::types::{ColonyBuild, EngineError, MainTunnel, SampleCurves};

/// An authoring session for one ant colony.
///
/// Holds the configuration, the random source for offshoot placement and the
/// last main tunnel. The kernel is passed into every action. A failed action
/// is logged, recorded in `warnings`, and leaves the session usable.
pub struct ColonySession {
    /// Configuration the session was created with.
    pub config: ColonyConfig,
    /// User-facing messages from failed or partial actions, oldest first.
    pub warnings: Vec<String>,
    rng: StdRng,
    main_tunnel: Option<MainTunnel>,
}

impl ColonySession {
    /// Create a session. The random source is seeded from `config.seed`, or
    /// from OS entropy when no seed is set.
    pub fn new(config: ColonyConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            warnings: Vec::new(),
            rng,
            main_tunnel: None,
        })
    }

    /// The tunnel built by the last successful "Create Tunnel".
    pub fn main_tunnel(&self) -> Option<&MainTunnel> {
        self.main_tunnel.as_ref()
    }

    /// Store a user-drawn curve.
    pub fn add_curve(&mut self, curve: GuideCurve, kb: &mut dyn KernelBundle) -> CurveId {
        kb.insert_curve(curve)
    }

    /// Add the closed unit circle at the origin.
    pub fn create_default_circle(&mut self, kb: &mut dyn KernelBundle) -> Result<CurveId, EngineError> {
        let result = presets::default_circle()
            .map(|curve| kb.insert_curve(curve))
            .map_err(|e| EngineError::Op(e.into()));
        self.record("create default circle", result)
    }

    /// Add the sample tunnel path and chamber outline.
    pub fn create_sample_curves(
        &mut self,
        kb: &mut dyn KernelBundle,
    ) -> Result<SampleCurves, EngineError> {
        let result = insert_sample_curves(kb);
        self.record("create sample curves", result)
    }

    /// "Create Tunnel": sweep a tapered tube along the selected curve,
    /// starting at its first control point, then roughen it.
    ///
    /// On success the tube becomes the session's main tunnel.
    #[instrument(skip(self, params, kb))]
    pub fn create_tunnel(
        &mut self,
        selection: Option<CurveId>,
        params: &TunnelParams,
        kb: &mut dyn KernelBundle,
    ) -> Result<MainTunnel, EngineError> {
        let result = self.build_tunnel(selection, params, kb);
        if let Ok(tunnel) = &result {
            self.main_tunnel = Some(tunnel.clone());
        }
        self.record("create tunnel", result)
    }

    /// "Create Tunnel" with the configured tunnel parameters.
    pub fn create_tunnel_from_config(
        &mut self,
        selection: Option<CurveId>,
        kb: &mut dyn KernelBundle,
    ) -> Result<MainTunnel, EngineError> {
        let params = self.config.tunnel;
        self.create_tunnel(selection, &params, kb)
    }

    /// "Create Chambers": grow offshoots from the main tunnel and put a
    /// chamber, built from the selected base curve, at the end of each one.
    ///
    /// The offshoot curves are consumed. With no offshoots nothing else is built.
    /// The base curve is checked before any geometry is created, and a failure
    /// after the offshoots exist removes them again.
    #[instrument(skip(self, offshoots, chambers, kb))]
    pub fn create_chambers(
        &mut self,
        selection: Option<CurveId>,
        offshoots: &OffshootParams,
        chambers: &ChamberParams,
        kb: &mut dyn KernelBundle,
    ) -> Result<ColonyBuild, EngineError> {
        let result = self.build_colony(selection, offshoots, chambers, kb);
        if let Ok(build) = &result {
            self.warnings
                .extend(build.offshoots.diagnostics.warnings.iter().cloned());
        }
        self.record("create chambers", result)
    }

    /// "Create Chambers" with the configured offshoot and chamber parameters.
    pub fn create_chambers_from_config(
        &mut self,
        selection: Option<CurveId>,
        kb: &mut dyn KernelBundle,
    ) -> Result<ColonyBuild, EngineError> {
        let offshoots = self.config.offshoots;
        let chambers = self.config.chambers;
        self.create_chambers(selection, &offshoots, &chambers, kb)
    }

    fn build_tunnel(
        &self,
        selection: Option<CurveId>,
        params: &TunnelParams,
        kb: &mut dyn KernelBundle,
    ) -> Result<MainTunnel, EngineError> {
        let curve = selection.ok_or(EngineError::MissingSelection {
            what: "guide curve",
        })?;
        ColonyConfig {
            tunnel: *params,
            ..self.config.clone()
        }
        .validate()?;

        let anchor = kb.control_point(curve, 0).map_err(OpError::from)?;
        let tube = execute_extrude(
            kb,
            curve,
            anchor,
            params.radius,
            params.taper,
            &self.config.tessellation,
        )?;
        let deformed_rings = execute_deform(kb, tube.surface, params.bumpiness)?;

        info!(surface = ?tube.surface, deformed_rings, "created tunnel");
        Ok(MainTunnel {
            tube,
            deformed_rings,
            params: *params,
        })
    }

    fn build_colony(
        &mut self,
        selection: Option<CurveId>,
        offshoots: &OffshootParams,
        chambers: &ChamberParams,
        kb: &mut dyn KernelBundle,
    ) -> Result<ColonyBuild, EngineError> {
        let base = selection.ok_or(EngineError::MissingSelection {
            what: "chamber base curve",
        })?;
        let main = self
            .main_tunnel
            .as_ref()
            .map(|t| t.tube.surface)
            .ok_or(EngineError::MissingSelection {
                what: "main tunnel",
            })?;
        ColonyConfig {
            offshoots: *offshoots,
            chambers: *chambers,
            ..self.config.clone()
        }
        .validate()?;
        check_chamber_base(
            kb.as_introspect(),
            base,
            chambers,
            self.config.tessellation.chamber_outline_samples,
        )?;

        let batch = execute_offshoots(kb, main, offshoots, &self.config.tessellation, &mut self.rng)?;
        if batch.offshoots.is_empty() {
            info!(requested = batch.target, "no offshoots placed, skipping chambers");
            return Ok(ColonyBuild {
                offshoots: batch,
                chambers: None,
            });
        }

        let placed = build_chamber_template(
            kb,
            base,
            chambers,
            self.config.tessellation.chamber_outline_samples,
        )
        .and_then(|template| {
            place_chambers(kb, template, &batch.curves()).map(|placed| ChamberBatch {
                template,
                chambers: placed,
            })
        });
        let chamber_batch = match placed {
            Ok(chamber_batch) => chamber_batch,
            Err(err) => {
                discard_offshoots(kb, &batch.offshoots);
                return Err(err.into());
            }
        };

        info!(
            offshoots = batch.offshoots.len(),
            chambers = chamber_batch.chambers.len(),
            "created chambers"
        );
        Ok(ColonyBuild {
            offshoots: batch,
            chambers: Some(chamber_batch),
        })
    }

    fn record<T>(&mut self, action: &'static str, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(e) = &result {
            warn!(action, error = %e, "action failed");
            self.warnings.push(format!("{action}: {e}"));
        }
        result
    }
}

fn insert_sample_curves(kb: &mut dyn KernelBundle) -> Result<SampleCurves, EngineError> {
    let path = presets::sample_tunnel_path().map_err(OpError::from)?;
    let outline = presets::sample_chamber_outline().map_err(OpError::from)?;
    Ok(SampleCurves {
        tunnel_path: kb.insert_curve(path),
        chamber_outline: kb.insert_curve(outline),
    })
}
