use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::{SeedableRng, rngs};

use crate::error::OctsimErr;
use crate::participant::types::{Arm, Participant, ParticipantState};
use crate::study::error::StudyConfigErr;
use crate::study::types::{ArmParams, TransitionModel, TrialDuration, TrialSettings};

/// Head room for floating point noise when the three no-progression
/// probabilities are meant to sum to exactly 1
const WEIGHT_SUM_TOL: f64 = 1e-9;

/// Category order of the no-progression draw
const CATEGORICAL_STATES: [ParticipantState; 4] = [
    ParticipantState::Dead,
    ParticipantState::Progressed,
    ParticipantState::Censored,
    ParticipantState::NoProgression,
];

/// Per-arm distributions, built once at study construction so the per-step
/// loop only samples
struct ArmDraws {
    no_progression: WeightedIndex<f64>,
    progression: Bernoulli,
    death: Bernoulli,
    censor: Bernoulli,
    death_given_progression: Bernoulli,
    death_given_censor: Bernoulli,
}

impl ArmDraws {
    /// Only call after `check_arm_params` has passed; the distribution
    /// constructors cannot fail on validated inputs
    fn new(params: &ArmParams) -> Self {
        let remainder =
            (1.0 - params.p_death - params.p_progression - params.p_censor).max(0.0);
        let weights = [
            params.p_death,
            params.p_progression,
            params.p_censor,
            remainder,
        ];
        Self {
            no_progression: WeightedIndex::new(weights).unwrap(),
            progression: Bernoulli::new(params.p_progression).unwrap(),
            death: Bernoulli::new(params.p_death).unwrap(),
            censor: Bernoulli::new(params.p_censor).unwrap(),
            death_given_progression: Bernoulli::new(params.p_death_given_progression).unwrap(),
            death_given_censor: Bernoulli::new(params.p_death_given_censor).unwrap(),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), OctsimErr> {
    if !(0.0..=1.0).contains(&value) {
        return Err(StudyConfigErr::ProbabilityOutOfRange { name, value }.into());
    }
    Ok(())
}

fn death_reachable(params: &ArmParams) -> bool {
    params.p_death > 0.0
        || (params.p_progression > 0.0 && params.p_death_given_progression > 0.0)
        || (params.p_censor > 0.0 && params.p_death_given_censor > 0.0)
}

fn check_arm_params(
    arm: Arm,
    params: &ArmParams,
    model: TransitionModel,
    duration: TrialDuration,
) -> Result<(), OctsimErr> {
    check_probability("p_progression", params.p_progression)?;
    check_probability("p_death", params.p_death)?;
    check_probability("p_censor", params.p_censor)?;
    check_probability("p_death_given_progression", params.p_death_given_progression)?;
    check_probability("p_death_given_censor", params.p_death_given_censor)?;

    // The categorical draw needs non-negative head room; the hazard-rate
    // draw samples each cause independently and has no sum constraint
    if model == TransitionModel::Probability {
        let sum = params.p_death + params.p_progression + params.p_censor;
        if sum > 1.0 + WEIGHT_SUM_TOL {
            return Err(StudyConfigErr::BranchWeightsExceedOne { arm, sum }.into());
        }
    }

    if duration == TrialDuration::Unbounded && !death_reachable(params) {
        return Err(StudyConfigErr::DeathUnreachable { arm }.into());
    }

    Ok(())
}

/// Draw the next state for a living participant. Progressed and censored
/// participants can only die or remain; the branching from no progression
/// depends on the transition model.
fn draw_next(
    model: TransitionModel,
    draws: &ArmDraws,
    state: ParticipantState,
    rng: &mut rngs::StdRng,
) -> ParticipantState {
    match state {
        ParticipantState::Censored => {
            if draws.death_given_censor.sample(rng) {
                ParticipantState::Dead
            } else {
                ParticipantState::Censored
            }
        }
        ParticipantState::Progressed => {
            if draws.death_given_progression.sample(rng) {
                ParticipantState::Dead
            } else {
                ParticipantState::Progressed
            }
        }
        ParticipantState::NoProgression => match model {
            TransitionModel::Probability => CATEGORICAL_STATES[draws.no_progression.sample(rng)],
            TransitionModel::HazardRate => {
                let has_progression = draws.progression.sample(rng);
                let has_death = draws.death.sample(rng);
                let has_censor = draws.censor.sample(rng);
                if has_death {
                    ParticipantState::Dead
                } else if has_censor {
                    ParticipantState::Censored
                } else if has_progression {
                    ParticipantState::Progressed
                } else {
                    ParticipantState::NoProgression
                }
            }
        },
        // The stepper never draws for the dead
        ParticipantState::Dead => ParticipantState::Dead,
    }
}

fn advance(
    model: TransitionModel,
    draws: &ArmDraws,
    participant: &mut Participant,
    t: u32,
    rng: &mut rngs::StdRng,
) {
    if participant.state() == ParticipantState::Dead {
        return;
    }
    let next = draw_next(model, draws, participant.state(), rng);
    participant.apply(next, t);
}

/// A two-arm trial in progress: two fixed-size cohorts advanced in lockstep
/// over discrete time steps, with an instance-owned seeded rng so runs
/// replay deterministically.
pub struct Study {
    t: u32,
    duration: TrialDuration,
    model: TransitionModel,
    treatment_draws: ArmDraws,
    control_draws: ArmDraws,
    treatment_group: Vec<Participant>,
    control_group: Vec<Participant>,
    complete: bool,
    rng: rngs::StdRng,
}

impl Study {
    pub fn new(settings: &TrialSettings) -> Result<Self, OctsimErr> {
        //----------------------------------------
        // Check arguments
        if settings.n_per_arm < 1 {
            return Err(StudyConfigErr::ZeroCohortSize.into());
        }
        if let TrialDuration::Bounded(duration) = settings.duration
            && duration < 1
        {
            return Err(StudyConfigErr::ZeroDuration.into());
        }
        check_arm_params(
            Arm::Treatment,
            &settings.treatment,
            settings.model,
            settings.duration,
        )?;
        check_arm_params(
            Arm::Control,
            &settings.control,
            settings.model,
            settings.duration,
        )?;

        //----------------------------------------
        // Build cohorts
        Ok(Self {
            t: 0,
            duration: settings.duration,
            model: settings.model,
            treatment_draws: ArmDraws::new(&settings.treatment),
            control_draws: ArmDraws::new(&settings.control),
            treatment_group: vec![Participant::new(); settings.n_per_arm],
            control_group: vec![Participant::new(); settings.n_per_arm],
            complete: false,
            rng: rngs::StdRng::seed_from_u64(settings.seed),
        })
    }

    pub fn elapsed(&self) -> u32 {
        self.t
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn treatment_group(&self) -> &[Participant] {
        &self.treatment_group
    }

    pub fn control_group(&self) -> &[Participant] {
        &self.control_group
    }

    /// Advance simulated time by one step: draw and apply the next state
    /// for every living participant in both arms, then re-evaluate the
    /// completion predicate
    pub fn simulate_period(&mut self) {
        self.t += 1;
        let t = self.t;
        let model = self.model;

        for participant in self.treatment_group.iter_mut() {
            advance(model, &self.treatment_draws, participant, t, &mut self.rng);
        }
        for participant in self.control_group.iter_mut() {
            advance(model, &self.control_draws, participant, t, &mut self.rng);
        }

        self.complete = self.check_complete();
    }

    /// Step until the horizon is reached or, in the unbounded variant,
    /// until every participant has died
    pub fn run(&mut self) {
        while !self.complete {
            self.simulate_period();
        }
    }

    fn check_complete(&self) -> bool {
        if let TrialDuration::Bounded(duration) = self.duration
            && self.t >= duration
        {
            return true;
        }
        self.treatment_group
            .iter()
            .chain(self.control_group.iter())
            .all(|p| p.death_time().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zero_params() -> ArmParams {
        ArmParams {
            p_progression: 0.0,
            p_death: 0.0,
            p_censor: 0.0,
            p_death_given_progression: 0.0,
            p_death_given_censor: 0.0,
        }
    }

    #[test]
    fn certain_death_control_vs_inert_treatment() {
        let settings = TrialSettings {
            seed: 1,
            n_per_arm: 4,
            duration: TrialDuration::Bounded(3),
            model: TransitionModel::Probability,
            treatment: zero_params(),
            control: ArmParams {
                p_death: 1.0,
                ..zero_params()
            },
        };
        let mut study = Study::new(&settings).expect("settings should be valid");
        study.run();

        assert_eq!(study.elapsed(), 3);
        for p in study.control_group() {
            assert_eq!(p.death_time(), Some(1));
        }
        for p in study.treatment_group() {
            assert_eq!(p.state(), ParticipantState::NoProgression);
            assert_eq!(p.progress_time(), None);
            assert_eq!(p.censor_time(), None);
            assert_eq!(p.death_time(), None);
        }
    }

    #[test]
    fn censored_participant_dies_next_step_and_keeps_censor_time() {
        // Certain censoring at t = 1, then certain death at t = 2
        let arm = ArmParams {
            p_censor: 1.0,
            p_death_given_censor: 1.0,
            ..zero_params()
        };
        let settings = TrialSettings {
            seed: 7,
            n_per_arm: 3,
            duration: TrialDuration::Bounded(5),
            model: TransitionModel::Probability,
            treatment: arm,
            control: arm,
        };
        let mut study = Study::new(&settings).expect("settings should be valid");
        study.run();

        for p in study.treatment_group().iter().chain(study.control_group()) {
            assert_eq!(p.censor_time(), Some(1));
            assert_eq!(p.death_time(), Some(2));
            assert_eq!(p.progress_time(), None);
        }
    }

    #[test]
    fn hazard_rate_draw_resolves_death_before_censoring() {
        let arm = ArmParams {
            p_progression: 1.0,
            p_death: 1.0,
            p_censor: 1.0,
            ..zero_params()
        };
        let settings = TrialSettings {
            seed: 3,
            n_per_arm: 2,
            duration: TrialDuration::Bounded(4),
            model: TransitionModel::HazardRate,
            treatment: arm,
            control: arm,
        };
        let mut study = Study::new(&settings).expect("settings should be valid");
        study.run();

        for p in study.treatment_group().iter().chain(study.control_group()) {
            assert_eq!(p.death_time(), Some(1));
            assert_eq!(p.censor_time(), None);
            assert_eq!(p.progress_time(), None);
        }
    }

    #[test]
    fn unbounded_trial_runs_until_all_dead() {
        let arm = ArmParams {
            p_death: 0.3,
            ..zero_params()
        };
        let settings = TrialSettings {
            seed: 11,
            n_per_arm: 50,
            duration: TrialDuration::Unbounded,
            model: TransitionModel::Probability,
            treatment: arm,
            control: arm,
        };
        let mut study = Study::new(&settings).expect("settings should be valid");
        study.run();

        assert!(study.is_complete());
        for p in study.treatment_group().iter().chain(study.control_group()) {
            assert!(p.death_time().is_some());
        }
    }

    #[test]
    fn replays_deterministically_under_the_same_seed() {
        let settings = TrialSettings {
            n_per_arm: 100,
            duration: TrialDuration::Bounded(10),
            ..TrialSettings::default()
        };
        let mut first = Study::new(&settings).expect("settings should be valid");
        let mut second = Study::new(&settings).expect("settings should be valid");
        first.run();
        second.run();

        assert_eq!(first.treatment_group(), second.treatment_group());
        assert_eq!(first.control_group(), second.control_group());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let settings = TrialSettings {
            treatment: ArmParams {
                p_death: 1.2,
                ..zero_params()
            },
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_err());
    }

    #[test]
    fn rejects_branch_weights_summing_above_one() {
        let settings = TrialSettings {
            model: TransitionModel::Probability,
            control: ArmParams {
                p_progression: 0.5,
                p_death: 0.4,
                p_censor: 0.3,
                ..zero_params()
            },
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_err());
    }

    #[test]
    fn hazard_rate_model_has_no_sum_constraint() {
        let settings = TrialSettings {
            model: TransitionModel::HazardRate,
            control: ArmParams {
                p_progression: 0.5,
                p_death: 0.4,
                p_censor: 0.3,
                ..zero_params()
            },
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_ok());
    }

    #[test]
    fn rejects_zero_cohort_and_zero_duration() {
        let settings = TrialSettings {
            n_per_arm: 0,
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_err());

        let settings = TrialSettings {
            duration: TrialDuration::Bounded(0),
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_err());
    }

    #[test]
    fn rejects_unbounded_trial_with_unreachable_death() {
        let settings = TrialSettings {
            duration: TrialDuration::Unbounded,
            treatment: ArmParams {
                p_progression: 0.2,
                ..zero_params()
            },
            control: ArmParams {
                p_death: 0.2,
                ..zero_params()
            },
            ..TrialSettings::default()
        };
        assert!(Study::new(&settings).is_err());
    }

    prop_compose! {
        fn arb_arm_params()(
            p_progression in 0.0..=0.3f64,
            p_death in 0.0..=0.3f64,
            p_censor in 0.0..=0.3f64,
            p_death_given_progression in 0.0..=0.9f64,
            p_death_given_censor in 0.0..=0.9f64,
        ) -> ArmParams {
            ArmParams {
                p_progression,
                p_death,
                p_censor,
                p_death_given_progression,
                p_death_given_censor,
            }
        }
    }

    proptest! {
        // Event times are stamped once, in order: progression and censoring
        // are mutually exclusive before death, and both precede it
        #[test]
        fn event_times_are_monotone_and_exclusive(
            seed in any::<u64>(),
            n in 1usize..30,
            duration in 1u32..12,
            treatment in arb_arm_params(),
            control in arb_arm_params(),
        ) {
            let settings = TrialSettings {
                seed,
                n_per_arm: n,
                duration: TrialDuration::Bounded(duration),
                model: TransitionModel::Probability,
                treatment,
                control,
            };
            let mut study = Study::new(&settings).expect("generated settings are valid");
            study.run();

            prop_assert!(study.elapsed() <= duration);
            for p in study.treatment_group().iter().chain(study.control_group()) {
                prop_assert!(!(p.progress_time().is_some() && p.censor_time().is_some()));
                if let (Some(t_prog), Some(t_death)) = (p.progress_time(), p.death_time()) {
                    prop_assert!(t_prog < t_death);
                }
                if let (Some(t_cens), Some(t_death)) = (p.censor_time(), p.death_time()) {
                    prop_assert!(t_cens < t_death);
                }
                for t in [p.progress_time(), p.censor_time(), p.death_time()]
                    .into_iter()
                    .flatten()
                {
                    prop_assert!(t >= 1 && t <= study.elapsed());
                }
            }
        }
    }
}
