//! Hand-off to the external MILP engine: one fresh CBC model per call, a
//! wall-clock budget, and a status plus plain variable values back.

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};

use crate::resolution::model::VariableGroups;

/// Outcome label of one engine call. A non-optimal status is a normal,
/// representable result, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    NoSolutionFound,
}

impl SolveStatus {
    /// Whether variable values were produced and may be extracted.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::NoSolutionFound => "NO_SOLUTION_FOUND",
        };
        write!(f, "{label}")
    }
}

/// The solved values of every variable group, decoupled from the solver so
/// extraction and reporting stay engine-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedGroups {
    pub landing_times: Vec<f64>,
    pub runway_assignment: Vec<Vec<f64>>,
    pub landing_order: Vec<Vec<f64>>,
    pub early_penalty: Option<Vec<f64>>,
    pub late_penalty: Option<Vec<f64>>,
    pub makespan: Option<f64>,
    pub lateness: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Present exactly when `status.has_solution()`.
    pub values: Option<SolvedGroups>,
}

/// Minimises `objective` under `constraints` with CBC, blocking until the
/// engine finishes or the wall-clock budget elapses.
///
/// The engine is opaque: its internal parallelism is not controlled here,
/// and any failure beyond proven infeasibility or unboundedness collapses
/// into [`SolveStatus::NoSolutionFound`].
pub fn minimise(
    vars: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    groups: &VariableGroups,
    max_time: u64,
) -> SolveOutcome {
    let mut model = vars.minimise(objective).using(coin_cbc);
    model.set_parameter("log", "0");
    model.set_parameter("seconds", &max_time.to_string());
    let model = constraints.into_iter().fold(model, |m, c| m.with(c));

    match model.solve() {
        Ok(solution) => {
            // A solution returned without the optimality proof is the best
            // incumbent found within the budget.
            let status = if solution.model().is_proven_optimal() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };
            SolveOutcome {
                status,
                values: Some(evaluate(groups, &solution)),
            }
        }
        Err(ResolutionError::Infeasible) => SolveOutcome {
            status: SolveStatus::Infeasible,
            values: None,
        },
        Err(ResolutionError::Unbounded) => SolveOutcome {
            status: SolveStatus::Unbounded,
            values: None,
        },
        Err(_) => SolveOutcome {
            status: SolveStatus::NoSolutionFound,
            values: None,
        },
    }
}

fn evaluate(groups: &VariableGroups, solution: &impl Solution) -> SolvedGroups {
    let row = |vs: &[good_lp::Variable]| -> Vec<f64> {
        vs.iter().map(|&v| solution.value(v)).collect()
    };
    let grid = |m: &[Vec<good_lp::Variable>]| -> Vec<Vec<f64>> {
        m.iter().map(|r| row(r)).collect()
    };

    SolvedGroups {
        landing_times: row(&groups.landing_times),
        runway_assignment: grid(&groups.runway_assignment),
        landing_order: grid(&groups.landing_order),
        early_penalty: groups.early_penalty.as_deref().map(row),
        late_penalty: groups.late_penalty.as_deref().map(row),
        makespan: groups.makespan.map(|v| solution.value(v)),
        lateness: groups.lateness.as_deref().map(row),
    }
}
