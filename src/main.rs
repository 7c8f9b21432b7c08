use std::time::Instant;

use octsim::compute::types::{
    Arm, ArmParams, Endpoint, TransitionModel, TrialDuration, TrialSettings,
};
use octsim::compute::{hazard_ratio, kaplan_meier_curve, simulate_trial};
use octsim::error::OctsimErr;

fn main() -> Result<(), OctsimErr> {
    //----------------------------------------
    // Default bounded trial
    let settings = TrialSettings::default();
    let start = Instant::now();
    let records = simulate_trial(&settings)?;
    let duration = start.elapsed();
    println!(
        "Simulated bounded trial (n = {} per arm): {:?}",
        settings.n_per_arm, duration
    );

    let hr_pfs = hazard_ratio(&records, Endpoint::Pfs)?;
    let hr_os = hazard_ratio(&records, Endpoint::Os)?;
    println!(
        "PFS hazard ratio: {:.3} (95% CI {:.3}-{:.3}, p = {:.4})",
        hr_pfs.hazard_ratio, hr_pfs.ci_lower, hr_pfs.ci_upper, hr_pfs.p_value
    );
    println!(
        "OS hazard ratio:  {:.3} (95% CI {:.3}-{:.3}, p = {:.4})",
        hr_os.hazard_ratio, hr_os.ci_lower, hr_os.ci_upper, hr_os.p_value
    );

    let km_treatment = kaplan_meier_curve(&records, Endpoint::Os, Arm::Treatment);
    println!(
        "OS Kaplan-Meier (treatment), {} steps, final survival {:.3}",
        km_treatment.len(),
        km_treatment.last().map(|p| p.survival).unwrap_or(1.0)
    );

    //----------------------------------------
    // Same trial with censoring switched off: no censoring transitions,
    // and the censored branch inherits the no-progression death risk
    let no_censor = ArmParams {
        p_censor: 0.0,
        p_death_given_censor: settings.treatment.p_death,
        ..settings.treatment
    };
    let settings_no_censor = TrialSettings {
        treatment: no_censor,
        control: no_censor,
        ..settings
    };
    let records = simulate_trial(&settings_no_censor)?;
    let hr_os = hazard_ratio(&records, Endpoint::Os)?;
    println!("OS hazard ratio without censoring: {:.3}", hr_os.hazard_ratio);

    //----------------------------------------
    // Unbounded hazard-rate variant: runs until every participant dies
    let arm = ArmParams {
        p_progression: 0.1,
        p_death: 0.05,
        p_censor: 0.02,
        p_death_given_progression: 0.2,
        p_death_given_censor: 0.05,
    };
    let settings_unbounded = TrialSettings {
        seed: 24601,
        n_per_arm: 2000,
        duration: TrialDuration::Unbounded,
        model: TransitionModel::HazardRate,
        treatment: arm,
        control: arm,
    };
    let start = Instant::now();
    let records = simulate_trial(&settings_unbounded)?;
    let duration = start.elapsed();
    println!("Simulated unbounded trial: {:?}", duration);

    let hr_os = hazard_ratio(&records, Endpoint::Os)?;
    println!("Unbounded OS hazard ratio: {:.3}", hr_os.hazard_ratio);

    Ok(())
}
