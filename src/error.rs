//----------------------------------------
// Crate error type
//----------------------------------------
use crate::study::error::*;
use crate::survival::error::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OctsimErr {
    #[error("while validating trial configuration: {0}")]
    StudyConfig(StudyConfigErr),
    #[error("while fitting survival model: {0}")]
    SurvivalFit(SurvivalFitErr),
}
