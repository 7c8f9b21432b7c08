//----------------------------------------
// compute mod types
//----------------------------------------

pub use crate::dataset::types::{Endpoint, EventRecord};
pub use crate::participant::types::Arm;
pub use crate::study::types::{ArmParams, TransitionModel, TrialDuration, TrialSettings};
pub use crate::survival::cox::HazardRatioFit;
pub use crate::survival::km::KmPoint;
