use itertools::Itertools;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::dataset::types::{Endpoint, EventRecord};
use crate::error::OctsimErr;
use crate::participant::types::Arm;
use crate::survival::error::SurvivalFitErr;

const MAX_ITERATIONS: usize = 50;
const STEP_TOL: f64 = 1e-9;
// A coefficient this large means the partial likelihood is monotone
// (perfect separation between the arms), not a real maximum
const DIVERGENCE_BOUND: f64 = 30.0;

/// Result of fitting a proportional-hazards regression of one endpoint on
/// the binary arm covariate. The hazard ratio is treatment relative to
/// control; the remaining fields summarize the fit the way the usual
/// regression output does.
#[derive(Debug, Clone, Copy)]
pub struct HazardRatioFit {
    pub hazard_ratio: f64,
    pub log_hr: f64,
    pub se_log_hr: f64,
    pub z: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub iterations: usize,
}

/// One distinct event time: tied events at that time plus the risk-set
/// composition just before they occur
struct TimeGroup {
    d: f64,
    d_treatment: f64,
    n_risk_treatment: f64,
    n_risk_control: f64,
}

/// Gradient and Hessian of the Efron partial log-likelihood at `beta`.
/// With a single binary covariate the second moment of the covariate over
/// any risk set equals its first moment, which collapses the Hessian to
/// ratio * (1 - ratio) terms.
fn gradient_hessian(groups: &[TimeGroup], beta: f64) -> (f64, f64) {
    let eb = beta.exp();
    let mut gradient = 0.0;
    let mut hessian = 0.0;

    for g in groups {
        let phi_risk = g.n_risk_control + g.n_risk_treatment * eb;
        let psi_risk = g.n_risk_treatment * eb;
        let phi_tied = (g.d - g.d_treatment) + g.d_treatment * eb;
        let psi_tied = g.d_treatment * eb;

        gradient += g.d_treatment;
        for j in 0..(g.d as usize) {
            let fraction = (j as f64) / g.d;
            let phi = phi_risk - fraction * phi_tied;
            let psi = psi_risk - fraction * psi_tied;
            let ratio = psi / phi;
            gradient -= ratio;
            hessian -= ratio * (1.0 - ratio);
        }
    }

    (gradient, hessian)
}

/// Collapse the endpoint columns into per-event-time groups with the
/// risk-set counts just before each time. Censored observations leave the
/// risk set at their time without contributing events.
fn collapse_into_time_groups(records: &[EventRecord], endpoint: Endpoint) -> Vec<TimeGroup> {
    let observations: Vec<(u32, bool, bool)> = records
        .iter()
        .map(|r| {
            (
                r.endpoint_time(endpoint),
                r.endpoint_event(endpoint),
                r.arm == Arm::Treatment,
            )
        })
        .sorted_by_key(|&(t, _, _)| t)
        .collect();

    let mut n_risk_treatment = observations.iter().filter(|&&(_, _, trt)| trt).count() as f64;
    let mut n_risk_control = observations.len() as f64 - n_risk_treatment;

    let mut groups = Vec::new();
    for (_, group) in &observations.iter().chunk_by(|&&(t, _, _)| t) {
        let mut d = 0.0;
        let mut d_treatment = 0.0;
        let mut removed_treatment = 0.0;
        let mut removed_control = 0.0;
        for &(_, event, treated) in group {
            if treated {
                removed_treatment += 1.0;
            } else {
                removed_control += 1.0;
            }
            if event {
                d += 1.0;
                if treated {
                    d_treatment += 1.0;
                }
            }
        }
        if d > 0.0 {
            groups.push(TimeGroup {
                d,
                d_treatment,
                n_risk_treatment,
                n_risk_control,
            });
        }
        n_risk_treatment -= removed_treatment;
        n_risk_control -= removed_control;
    }
    groups
}

/// Estimate the hazard ratio of treatment vs. control for one endpoint by
/// Newton-Raphson on the Cox partial likelihood with Efron handling of
/// tied event times (the discrete clock makes ties the norm).
///
/// Degenerate datasets are surfaced as errors rather than NaN: fewer than
/// two records per arm, no events at all, every event in a single arm, or
/// a likelihood with no finite maximum.
pub fn hazard_ratio(
    records: &[EventRecord],
    endpoint: Endpoint,
) -> Result<HazardRatioFit, OctsimErr> {
    //----------------------------------------
    // Check for degenerate data
    let n_treatment = records.iter().filter(|r| r.arm == Arm::Treatment).count();
    let n_control = records.len() - n_treatment;
    if n_treatment < 2 || n_control < 2 {
        return Err(SurvivalFitErr::CohortTooSmall {
            n_treatment,
            n_control,
        }
        .into());
    }

    let events_treatment = records
        .iter()
        .filter(|r| r.arm == Arm::Treatment && r.endpoint_event(endpoint))
        .count();
    let events_control = records
        .iter()
        .filter(|r| r.arm == Arm::Control && r.endpoint_event(endpoint))
        .count();
    match (events_treatment, events_control) {
        (0, 0) => return Err(SurvivalFitErr::NoEvents.into()),
        (_, 0) => {
            return Err(SurvivalFitErr::EventsInOneArmOnly {
                arm: Arm::Treatment,
            }
            .into());
        }
        (0, _) => {
            return Err(SurvivalFitErr::EventsInOneArmOnly { arm: Arm::Control }.into());
        }
        _ => {}
    }

    //----------------------------------------
    // Newton-Raphson on the partial likelihood
    let groups = collapse_into_time_groups(records, endpoint);
    let mut beta = 0.0;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let (gradient, hessian) = gradient_hessian(&groups, beta);
        if !gradient.is_finite() || !hessian.is_finite() || hessian >= 0.0 {
            return Err(SurvivalFitErr::FailedToConverge(iterations).into());
        }
        let step = gradient / hessian;
        beta -= step;
        if !beta.is_finite() || beta.abs() > DIVERGENCE_BOUND {
            return Err(SurvivalFitErr::FailedToConverge(iterations).into());
        }
        if step.abs() < STEP_TOL {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            return Err(SurvivalFitErr::FailedToConverge(iterations).into());
        }
    }

    //----------------------------------------
    // Fit summary
    let (_, hessian) = gradient_hessian(&groups, beta);
    let se = (-hessian).recip().sqrt();
    let std_normal = Normal::new(0.0, 1.0).unwrap();
    let z = beta / se;
    let p_value = 2.0 * (1.0 - std_normal.cdf(z.abs()));
    let z_crit = std_normal.inverse_cdf(0.975);

    Ok(HazardRatioFit {
        hazard_ratio: beta.exp(),
        log_hr: beta,
        se_log_hr: se,
        z,
        p_value,
        ci_lower: (beta - z_crit * se).exp(),
        ci_upper: (beta + z_crit * se).exp(),
        iterations,
    })
}
