pub mod chamber;
pub mod tube;

pub use chamber::{bevel_chamber, chamber_outline, ChamberMesh, ChamberOutline};
pub use tube::{sweep_tube, TubeMesh};
