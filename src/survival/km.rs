use itertools::Itertools;

use crate::dataset::types::{Endpoint, EventRecord};
use crate::participant::types::Arm;

/// One step of a Kaplan-Meier curve: cumulative survival probability just
/// after `time`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmPoint {
    pub time: f64,
    pub survival: f64,
}

/// Product-limit estimate of the survival function for one arm and one
/// endpoint. The curve starts at (0, 1) and emits one point per distinct
/// observed time; censored observations leave the risk set at their time
/// without counting as events, so censor-only times keep the curve flat.
pub fn kaplan_meier_curve(
    records: &[EventRecord],
    endpoint: Endpoint,
    arm: Arm,
) -> Vec<KmPoint> {
    let observations: Vec<(u32, bool)> = records
        .iter()
        .filter(|r| r.arm == arm)
        .map(|r| (r.endpoint_time(endpoint), r.endpoint_event(endpoint)))
        .sorted_by_key(|&(t, _)| t)
        .collect();

    let mut n_at_risk = observations.len() as f64;
    let mut survival = 1.0;
    let mut curve = vec![KmPoint {
        time: 0.0,
        survival: 1.0,
    }];

    for (time, group) in &observations.iter().chunk_by(|&&(t, _)| t) {
        let mut d = 0.0;
        let mut removed = 0.0;
        for &(_, event) in group {
            removed += 1.0;
            if event {
                d += 1.0;
            }
        }
        if d > 0.0 {
            survival *= 1.0 - d / n_at_risk;
        }
        curve.push(KmPoint {
            time: time as f64,
            survival,
        });
        n_at_risk -= removed;
    }

    curve
}
