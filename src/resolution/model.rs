//! MILP building blocks shared by the three problem variants: the decision
//! variable groups and the constraint builders.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use crate::instance::AlpInstance;

/// The named decision-variable groups of one solve.
///
/// A fresh set is produced per solve; nothing is shared or mutated across
/// solves. The three optional groups belong to the objective that created
/// them.
#[derive(Debug, Clone)]
pub struct VariableGroups {
    /// Landing time per aircraft (continuous).
    pub landing_times: Vec<Variable>,
    /// Assignment per (aircraft, runway) pair (binary).
    pub runway_assignment: Vec<Vec<Variable>>,
    /// Precedence per ordered aircraft pair (binary, antisymmetric).
    pub landing_order: Vec<Vec<Variable>>,
    pub early_penalty: Option<Vec<Variable>>,
    pub late_penalty: Option<Vec<Variable>>,
    pub makespan: Option<Variable>,
    pub lateness: Option<Vec<Variable>>,
}

/// One free continuous landing-time variable per aircraft; the window bounds
/// are added by [`time_window_constraints`].
pub fn landing_time_variables(
    vars: &mut ProblemVariables,
    instance: &AlpInstance,
) -> Vec<Variable> {
    (0..instance.nb_aircrafts)
        .map(|i| vars.add(variable().name(format!("landing_time_{i}"))))
        .collect()
}

/// `earliest_i <= x_i <= latest_i` for every aircraft.
pub fn time_window_constraints(
    instance: &AlpInstance,
    landing_times: &[Variable],
) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(2 * instance.nb_aircrafts);
    for (w, &x) in instance.windows.iter().zip(landing_times) {
        constraints.push(constraint!(x >= w.earliest));
        constraints.push(constraint!(x <= w.latest));
    }
    constraints
}

/// The big-M bound deactivating a separation constraint whenever its pair
/// does not share a runway in the stated order.
///
/// `(max_latest - min_earliest)` already dominates any landing-time gap the
/// windows allow; adding the largest separation makes the constraint slack in
/// the worst case without loosening the LP relaxation further. Always derived
/// from the instance, never a fixed constant.
pub fn separation_big_m(instance: &AlpInstance) -> f64 {
    let min_earliest = instance
        .windows
        .iter()
        .map(|w| w.earliest)
        .fold(f64::INFINITY, f64::min);
    let max_latest = instance
        .windows
        .iter()
        .map(|w| w.latest)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_separation = instance
        .separation
        .iter()
        .flatten()
        .copied()
        .fold(0.0, f64::max);
    (max_latest - min_earliest) + max_separation
}

/// Runway assignment, landing order and the linearized disjunctive
/// separation rule.
///
/// Adds, for a validated instance:
/// - exclusive assignment: `sum_r assign[i][r] == 1` per aircraft,
/// - a total order: `order[i][j] + order[j][i] == 1` for i != j and
///   `order[i][i] == 0`,
/// - for every ordered pair i != j and every runway r
///   `x_j >= x_i + sep[i][j] - M * (3 - assign[i][r] - assign[j][r] - order[i][j])`.
///
/// The penalty term collapses to zero exactly when i and j are both on
/// runway r with i first; in every other combination the constraint is
/// slack. Self-pairs are skipped by construction.
pub fn runway_separation_constraints(
    vars: &mut ProblemVariables,
    instance: &AlpInstance,
    nb_runways: usize,
    landing_times: &[Variable],
) -> (Vec<Vec<Variable>>, Vec<Vec<Variable>>, Vec<Constraint>) {
    let n = instance.nb_aircrafts;

    let runway_assignment: Vec<Vec<Variable>> = (0..n)
        .map(|i| {
            (0..nb_runways)
                .map(|r| vars.add(variable().binary().name(format!("runway_{i}_{r}"))))
                .collect()
        })
        .collect();
    let landing_order: Vec<Vec<Variable>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| vars.add(variable().binary().name(format!("order_{i}_{j}"))))
                .collect()
        })
        .collect();

    let mut constraints = Vec::new();

    for i in 0..n {
        let assigned = runway_assignment[i]
            .iter()
            .fold(Expression::from(0.0), |acc, &v| acc + v);
        constraints.push(constraint!(assigned == 1.0));
    }

    for i in 0..n {
        constraints.push(constraint!(landing_order[i][i] == 0.0));
        for j in (i + 1)..n {
            constraints.push(constraint!(
                landing_order[i][j] + landing_order[j][i] == 1.0
            ));
        }
    }

    let big_m = separation_big_m(instance);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            for r in 0..nb_runways {
                let mut off = Expression::from(3.0);
                off -= runway_assignment[i][r];
                off -= runway_assignment[j][r];
                off -= landing_order[i][j];
                constraints.push(constraint!(
                    landing_times[j] >= landing_times[i] + instance.separation[i][j] - big_m * off
                ));
            }
        }
    }

    (runway_assignment, landing_order, constraints)
}
