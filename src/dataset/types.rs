use crate::participant::types::Arm;

/// Which derived time-to-event column pair an estimator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Progression-free survival: first of censoring, progression, death
    Pfs,
    /// Overall survival: death, or administrative censoring at the horizon
    Os,
}

/// One row of the flattened time-to-event dataset: the raw first-entry
/// times of a single participant plus the derived PFS and OS endpoint
/// columns. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub arm: Arm,
    /// Ordinal position within the arm, for traceability
    pub index: usize,
    pub progression_time: Option<u32>,
    pub death_time: Option<u32>,
    pub censor_time: Option<u32>,
    /// Configured horizon for bounded trials; realized length for
    /// unbounded ones
    pub trial_duration: u32,
    pub pfs_event_time: u32,
    pub has_pfs_event: bool,
    pub os_event_time: u32,
    pub has_os_event: bool,
}

impl EventRecord {
    pub fn endpoint_time(&self, endpoint: Endpoint) -> u32 {
        match endpoint {
            Endpoint::Pfs => self.pfs_event_time,
            Endpoint::Os => self.os_event_time,
        }
    }

    pub fn endpoint_event(&self, endpoint: Endpoint) -> bool {
        match endpoint {
            Endpoint::Pfs => self.has_pfs_event,
            Endpoint::Os => self.has_os_event,
        }
    }
}
