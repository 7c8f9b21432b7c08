/// Which of the two cohorts a participant (or an event record derived from
/// one) belongs to. Coded 1/0 when used as the regression covariate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Treatment,
    Control,
}

impl Arm {
    /// Group coding used by the event-time dataset and the Cox model
    pub fn group(&self) -> u8 {
        match self {
            Arm::Treatment => 1,
            Arm::Control => 0,
        }
    }
}

/// The four states of the per-participant process. Dead is terminal;
/// Progressed and Censored can only remain or move to Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantState {
    NoProgression,
    Progressed,
    Censored,
    Dead,
}

/// A single trial participant: its current state plus the time of first
/// entry into each of the progressed / censored / dead states. Each time
/// field is set at most once and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    state: ParticipantState,
    progress_time: Option<u32>,
    censor_time: Option<u32>,
    death_time: Option<u32>,
}

impl Participant {
    pub fn new() -> Self {
        Self {
            state: ParticipantState::NoProgression,
            progress_time: None,
            censor_time: None,
            death_time: None,
        }
    }

    pub fn state(&self) -> ParticipantState {
        self.state
    }

    pub fn progress_time(&self) -> Option<u32> {
        self.progress_time
    }

    pub fn censor_time(&self) -> Option<u32> {
        self.censor_time
    }

    pub fn death_time(&self) -> Option<u32> {
        self.death_time
    }

    /// Move the participant to `state` at time `t`, stamping the matching
    /// event time on first entry. Applying the current state again is a
    /// no-op, so remain-in-place draws never re-stamp a time. Callers must
    /// not apply anything once the participant is dead.
    pub fn apply(&mut self, state: ParticipantState, t: u32) {
        if state == self.state {
            return;
        }
        self.state = state;
        match state {
            ParticipantState::Progressed => self.progress_time = Some(t),
            ParticipantState::Censored => self.censor_time = Some(t),
            ParticipantState::Dead => self.death_time = Some(t),
            ParticipantState::NoProgression => {}
        }
    }
}

impl Default for Participant {
    fn default() -> Self {
        Self::new()
    }
}
