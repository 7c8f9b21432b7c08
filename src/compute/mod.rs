//----------------------------------------
// compute mod
//----------------------------------------
pub mod types;

pub use crate::study::simulate::simulate_trial;
pub use crate::survival::cox::hazard_ratio;
pub use crate::survival::km::kaplan_meier_curve;
