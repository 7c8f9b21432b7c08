use crate::error::OctsimErr;
use crate::participant::types::Arm;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurvivalFitErr {
    #[error(
        "cohort too small to fit a proportional-hazards model ({n_treatment} treatment / {n_control} control records)"
    )]
    CohortTooSmall {
        n_treatment: usize,
        n_control: usize,
    },
    #[error("no events recorded in either arm")]
    NoEvents,
    #[error("all events fall in the {arm:?} arm; the partial likelihood is unbounded")]
    EventsInOneArmOnly { arm: Arm },
    #[error("failed to converge after {0} Newton-Raphson iterations")]
    FailedToConverge(usize),
}

impl Into<OctsimErr> for SurvivalFitErr {
    fn into(self) -> OctsimErr {
        OctsimErr::SurvivalFit(self)
    }
}
