//! Converts a solve outcome into a structured, solver-independent record
//! matching the exported JSON schema.

use serde::{Deserialize, Serialize};

use crate::instance::{AlpInstance, LandingWindow, SolveConfig};
use crate::resolution::solve::SolveOutcome;

/// A binary assignment variable must reach this value to count as set;
/// the slack absorbs numerical noise in the engine's integer output.
pub const ASSIGNMENT_THRESHOLD: f64 = 0.99;

const NO_SOLUTION_MESSAGE: &str = "No feasible or optimal solution found.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyPair {
    pub early: f64,
    pub late: f64,
}

/// Echo of the problem data the record was produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftData {
    pub n_aircraft: usize,
    pub n_runways: usize,
    pub freeze_time: f64,
    pub landing_times: Vec<LandingWindow>,
    pub separation_times: Vec<Vec<f64>>,
    pub t_ir: Vec<Vec<f64>>,
}

/// One solve, one record. Solution fields stay empty and `message` is set
/// when the status carries no solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub status: String,
    pub landing_times: Vec<f64>,
    pub penalties: Vec<PenaltyPair>,
    pub makespan: Option<f64>,
    pub lateness: Option<f64>,
    pub total_penalty: Option<f64>,
    pub runway_assignments: Vec<Option<usize>>,
    pub landing_order: Vec<Vec<u8>>,
    pub aircraft_data: AircraftData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds the result record for one solve. Pure: the same outcome always
/// yields the same record.
pub fn extract_report(
    instance: &AlpInstance,
    config: &SolveConfig,
    travel: &[Vec<f64>],
    outcome: &SolveOutcome,
) -> SolutionReport {
    let aircraft_data = AircraftData {
        n_aircraft: instance.nb_aircrafts,
        n_runways: config.nb_runways,
        freeze_time: instance.freeze_time,
        landing_times: instance.windows.clone(),
        separation_times: instance.separation.clone(),
        t_ir: travel.to_vec(),
    };

    let mut report = SolutionReport {
        status: outcome.status.to_string(),
        landing_times: vec![],
        penalties: vec![],
        makespan: None,
        lateness: None,
        total_penalty: None,
        runway_assignments: vec![],
        landing_order: vec![],
        aircraft_data,
        message: None,
    };

    let values = match &outcome.values {
        Some(values) if outcome.status.has_solution() => values,
        _ => {
            report.message = Some(NO_SOLUTION_MESSAGE.to_string());
            return report;
        }
    };

    report.landing_times = values.landing_times.iter().map(|&x| round2(x)).collect();

    if let (Some(early), Some(late)) = (&values.early_penalty, &values.late_penalty) {
        report.penalties = early
            .iter()
            .zip(late)
            .map(|(&e, &l)| PenaltyPair {
                early: round2(e),
                late: round2(l),
            })
            .collect();
        let total = instance
            .windows
            .iter()
            .zip(early.iter().zip(late))
            .map(|(w, (&e, &l))| w.penalty_before_target * e + w.penalty_after_target * l)
            .sum();
        report.total_penalty = Some(round2(total));
    }

    report.makespan = values.makespan.map(round2);
    report.lateness = values
        .lateness
        .as_ref()
        .map(|lateness| round2(lateness.iter().sum()));

    // An aircraft whose assignment row never crosses the threshold is
    // reported unassigned: a near-failure signal from the engine, not a
    // valid outcome.
    report.runway_assignments = values
        .runway_assignment
        .iter()
        .map(|row| row.iter().position(|&v| v >= ASSIGNMENT_THRESHOLD))
        .collect();

    report.landing_order = values
        .landing_order
        .iter()
        .map(|row| row.iter().map(|&v| v.round() as u8).collect())
        .collect();

    report
}
