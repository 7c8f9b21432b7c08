/// Per-arm transition parameters. All values are probabilities in [0, 1]
/// applied once per discrete time step.
#[derive(Debug, Clone, Copy)]
pub struct ArmParams {
    /// P(no progression -> progressed)
    pub p_progression: f64,
    /// P(no progression -> dead)
    pub p_death: f64,
    /// P(no progression -> censored)
    pub p_censor: f64,
    /// P(progressed -> dead)
    pub p_death_given_progression: f64,
    /// P(censored -> dead)
    pub p_death_given_censor: f64,
}

/// How the per-step draw from the no-progression state is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionModel {
    /// One categorical draw over {dead, progressed, censored, remain},
    /// with remain weighted by the head room 1 - p_death - p_progression
    /// - p_censor. Requires the three probabilities to sum to at most 1.
    Probability,
    /// Independent Bernoulli draws per cause, resolved with priority
    /// death > censoring > progression.
    HazardRate,
}

/// Whether the trial stops at a fixed horizon (administratively censoring
/// survivors) or runs until every participant has died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialDuration {
    Bounded(u32),
    Unbounded,
}

#[derive(Debug, Clone, Copy)]
pub struct TrialSettings {
    pub seed: u64,
    pub n_per_arm: usize,
    pub duration: TrialDuration,
    pub model: TransitionModel,
    pub treatment: ArmParams,
    pub control: ArmParams,
}

impl Default for TrialSettings {
    fn default() -> Self {
        let arm = ArmParams {
            p_progression: 0.05,
            p_death: 0.05,
            p_censor: 0.05,
            p_death_given_progression: 0.1,
            p_death_given_censor: 0.05,
        };
        Self {
            seed: 24601,
            n_per_arm: 10000,
            duration: TrialDuration::Bounded(20),
            model: TransitionModel::Probability,
            treatment: arm,
            control: arm,
        }
    }
}
