//! Structured text colony reports.
//!
//! Reports are plain text so a failing scenario can print the whole scene.

use std::fmt;

use burrow_engine::ColonySession;
use burrow_geom::Point3;
use burrow_kernel::KernelIntrospect;

/// A snapshot of everything in the kernel plus the session's state.
#[derive(Debug, Clone)]
pub struct ColonyReport {
    pub curve_count: usize,
    /// Face count of every surface, in kernel order.
    pub surface_faces: Vec<usize>,
    pub chamber_positions: Vec<Point3>,
    pub main_tunnel_faces: Option<usize>,
    pub warnings: Vec<String>,
}

impl ColonyReport {
    pub fn collect(kb: &dyn KernelIntrospect, session: &ColonySession) -> Self {
        let surface_faces = kb
            .list_surfaces()
            .into_iter()
            .filter_map(|s| kb.face_count(s).ok())
            .collect();
        let chamber_positions = kb
            .list_chambers()
            .into_iter()
            .filter_map(|c| kb.chamber_position(c).ok())
            .collect();
        let main_tunnel_faces = session
            .main_tunnel()
            .and_then(|t| kb.face_count(t.tube.surface).ok());
        Self {
            curve_count: kb.list_curves().len(),
            surface_faces,
            chamber_positions,
            main_tunnel_faces,
            warnings: session.warnings.clone(),
        }
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Colony Report ===\n\n");
        out.push_str(&format!("Curves: {}\n", self.curve_count));

        match self.main_tunnel_faces {
            Some(faces) => out.push_str(&format!("Main tunnel: {faces} faces\n")),
            None => out.push_str("Main tunnel: none\n"),
        }

        out.push_str(&format!("\nSurfaces ({}):\n", self.surface_faces.len()));
        for (i, faces) in self.surface_faces.iter().enumerate() {
            out.push_str(&format!("  [{i}] {faces} faces\n"));
        }

        out.push_str(&format!("\nChambers ({}):\n", self.chamber_positions.len()));
        for (i, p) in self.chamber_positions.iter().enumerate() {
            out.push_str(&format!("  [{i}] at ({:.2}, {:.2}, {:.2})\n", p.x, p.y, p.z));
        }

        if self.warnings.is_empty() {
            out.push_str("\nWarnings: none\n");
        } else {
            out.push_str(&format!("\nWarnings ({}):\n", self.warnings.len()));
            for w in &self.warnings {
                out.push_str(&format!("  {w}\n"));
            }
        }

        out
    }
}

impl fmt::Display for ColonyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
