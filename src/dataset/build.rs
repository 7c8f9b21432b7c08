use crate::dataset::types::EventRecord;
use crate::participant::types::{Arm, Participant};

/// Derive one event record from a participant's terminal state.
///
/// PFS takes the first present of censoring, progression, and death times,
/// falling back to the horizon; the event indicator is false for censored
/// participants and for participants with no event of any kind before the
/// horizon. OS takes the death time, falling back to the horizon, with the
/// event indicator set iff death was observed.
fn to_record(arm: Arm, index: usize, participant: &Participant, horizon: u32) -> EventRecord {
    let progression_time = participant.progress_time();
    let death_time = participant.death_time();
    let censor_time = participant.censor_time();

    let pfs_event_time = censor_time
        .or(progression_time)
        .or(death_time)
        .unwrap_or(horizon);
    let has_pfs_event = censor_time.is_none()
        && (progression_time.is_some() || death_time.is_some());

    let os_event_time = death_time.unwrap_or(horizon);
    let has_os_event = death_time.is_some();

    EventRecord {
        arm,
        index,
        progression_time,
        death_time,
        censor_time,
        trial_duration: horizon,
        pfs_event_time,
        has_pfs_event,
        os_event_time,
        has_os_event,
    }
}

/// Flatten the two completed cohorts into one ordered collection of event
/// records, treatment arm first. Pure function of the terminal participant
/// states; no randomness.
pub fn build_event_records(
    treatment: &[Participant],
    control: &[Participant],
    horizon: u32,
) -> Vec<EventRecord> {
    let treatment_records = treatment
        .iter()
        .enumerate()
        .map(|(index, p)| to_record(Arm::Treatment, index, p, horizon));
    let control_records = control
        .iter()
        .enumerate()
        .map(|(index, p)| to_record(Arm::Control, index, p, horizon));
    treatment_records.chain(control_records).collect()
}
