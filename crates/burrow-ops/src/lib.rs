pub mod chamber;
pub mod deform;
pub mod extrude;
pub mod kernel_ext;
pub mod offshoot;
pub mod types;

pub use chamber::{build_chamber_template, check_chamber_base, place_chambers};
pub use deform::{execute_deform, select_deform_rings};
pub use extrude::execute_extrude;
pub use kernel_ext::KernelBundle;
pub use offshoot::{
    discard_offshoots, execute_offshoots, offshoot_curve, sample_admissible_face, target_count,
};
pub use types::*;
