use serde::{Deserialize, Serialize};

/// Parameters for the "Create Tunnel" action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelParams {
    /// Profile radius at the start of the guide curve.
    pub radius: f64,
    /// Radius scale reached at the end of the guide curve.
    /// Values below 1 taper inward, values above 1 flare outward.
    pub taper: f64,
    /// Edge-ring rotation in degrees. 0 disables deformation.
    pub bumpiness: f64,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            taper: 0.3,
            bumpiness: 10.0,
        }
    }
}

/// Parameters for offshoot placement and extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffshootParams {
    /// Fraction of main tunnel faces that spawn an offshoot, in [0, 1].
    pub density: f64,
    /// Profile radius of each offshoot tube.
    pub radius: f64,
    /// Radius scale at the far end of each offshoot tube.
    pub taper: f64,
    /// Upper bound on rejection-sampling draws per offshoot.
    pub max_attempts: usize,
}

impl Default for OffshootParams {
    fn default() -> Self {
        Self {
            density: 0.05,
            radius: 0.1,
            taper: 0.3,
            max_attempts: 1000,
        }
    }
}

/// Fixed bevel settings used when turning a base curve into a chamber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BevelStyle {
    /// Inset of the bevel from the outline toward the centroid.
    pub width: f64,
    /// Height of each rounded bevel band.
    pub depth: f64,
    /// Height of the straight wall between the two bevels.
    pub extrude_depth: f64,
    /// Number of rings used to round each bevel band.
    pub segments: usize,
}

impl Default for BevelStyle {
    fn default() -> Self {
        Self {
            width: 0.75,
            depth: 0.1,
            extrude_depth: 0.1,
            segments: 4,
        }
    }
}

/// Parameters for the "Create Chambers" action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberParams {
    /// Uniform scale applied to the chamber template.
    pub size: f64,
    pub bevel: BevelStyle,
}

impl Default for ChamberParams {
    fn default() -> Self {
        Self {
            size: 0.5,
            bevel: BevelStyle::default(),
        }
    }
}

/// Curve-to-polygon conversion settings shared by every extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationSettings {
    /// Vertices per tube cross-section.
    pub profile_segments: usize,
    /// Quad bands along the sweep path. Rings = divisions + 1.
    pub path_divisions: usize,
    /// Outline samples taken from a chamber base curve.
    pub chamber_outline_samples: usize,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        Self {
            profile_segments: 8,
            path_divisions: 25,
            chamber_outline_samples: 32,
        }
    }
}

impl TessellationSettings {
    /// Number of quad faces a single swept tube will have.
    pub fn tube_face_count(&self) -> usize {
        self.profile_segments * self.path_divisions
    }
}
