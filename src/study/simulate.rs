use crate::dataset::build::build_event_records;
use crate::dataset::types::EventRecord;
use crate::error::OctsimErr;
use crate::study::engine::Study;
use crate::study::types::{TrialDuration, TrialSettings};

/// Simulate one complete trial and flatten it into the time-to-event
/// dataset consumed by the survival estimators. Validates the settings
/// eagerly, runs the cohort stepper to completion, and builds one record
/// per participant.
pub fn simulate_trial(settings: &TrialSettings) -> Result<Vec<EventRecord>, OctsimErr> {
    let mut study = Study::new(settings)?;
    study.run();

    // Bounded trials administratively censor survivors at the configured
    // horizon even when everyone dies early; unbounded trials end exactly
    // when the last participant dies
    let horizon = match settings.duration {
        TrialDuration::Bounded(duration) => duration,
        TrialDuration::Unbounded => study.elapsed(),
    };

    Ok(build_event_records(
        study.treatment_group(),
        study.control_group(),
        horizon,
    ))
}
