use crate::error::OctsimErr;
use crate::participant::types::Arm;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyConfigErr {
    #[error("probability {name} = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error(
        "no-progression transition probabilities for {arm:?} arm sum to {sum} (must be <= 1)"
    )]
    BranchWeightsExceedOne { arm: Arm, sum: f64 },
    #[error("cohort size per arm must be at least 1")]
    ZeroCohortSize,
    #[error("bounded trial duration must be at least 1 step")]
    ZeroDuration,
    #[error("unbounded trial cannot terminate: death is unreachable for {arm:?} arm")]
    DeathUnreachable { arm: Arm },
}

impl Into<OctsimErr> for StudyConfigErr {
    fn into(self) -> OctsimErr {
        OctsimErr::StudyConfig(self)
    }
}
