//! The three objective formulations. Each builds its auxiliary variables on
//! top of the shared constraint builders and hands one fresh model to the
//! engine.

use good_lp::{constraint, variable, variables, Expression, Variable};

use crate::instance::{AlpInstance, SolveConfig};
use crate::resolution::model::{self, VariableGroups};
use crate::resolution::solve::{self, SolveOutcome};

/// Problem 1: minimise the weighted deviation from the target landing times.
///
/// `early_i >= target_i - x_i` and `late_i >= x_i - target_i`, both
/// non-negative: an epigraph linearization of the absolute deviation, exact
/// at optimality because the objective drives both to their tight lower
/// bound.
pub fn weighted_deviation(instance: &AlpInstance, config: &SolveConfig) -> SolveOutcome {
    let mut vars = variables!();
    let landing_times = model::landing_time_variables(&mut vars, instance);
    let mut constraints = model::time_window_constraints(instance, &landing_times);
    let (runway_assignment, landing_order, mut shared) = model::runway_separation_constraints(
        &mut vars,
        instance,
        config.nb_runways,
        &landing_times,
    );
    constraints.append(&mut shared);

    let early_penalty: Vec<Variable> = (0..instance.nb_aircrafts)
        .map(|i| vars.add(variable().min(0.0).name(format!("early_penalty_{i}"))))
        .collect();
    let late_penalty: Vec<Variable> = (0..instance.nb_aircrafts)
        .map(|i| vars.add(variable().min(0.0).name(format!("late_penalty_{i}"))))
        .collect();

    for (i, w) in instance.windows.iter().enumerate() {
        constraints.push(constraint!(early_penalty[i] + landing_times[i] >= w.target));
        constraints.push(constraint!(late_penalty[i] - landing_times[i] >= -w.target));
    }

    let objective = instance
        .windows
        .iter()
        .enumerate()
        .fold(Expression::from(0.0), |acc, (i, w)| {
            acc + w.penalty_before_target * early_penalty[i]
                + w.penalty_after_target * late_penalty[i]
        });

    let groups = VariableGroups {
        landing_times,
        runway_assignment,
        landing_order,
        early_penalty: Some(early_penalty),
        late_penalty: Some(late_penalty),
        makespan: None,
        lateness: None,
    };

    solve::minimise(vars, objective, constraints, &groups, config.max_time)
}

/// Problem 2: minimise the makespan, the latest landing time.
pub fn makespan(instance: &AlpInstance, config: &SolveConfig) -> SolveOutcome {
    let mut vars = variables!();
    let landing_times = model::landing_time_variables(&mut vars, instance);
    let mut constraints = model::time_window_constraints(instance, &landing_times);
    let (runway_assignment, landing_order, mut shared) = model::runway_separation_constraints(
        &mut vars,
        instance,
        config.nb_runways,
        &landing_times,
    );
    constraints.append(&mut shared);

    let makespan = vars.add(variable().name("makespan"));
    for &x in &landing_times {
        constraints.push(constraint!(makespan >= x));
    }

    let groups = VariableGroups {
        landing_times,
        runway_assignment,
        landing_order,
        early_penalty: None,
        late_penalty: None,
        makespan: Some(makespan),
        lateness: None,
    };

    solve::minimise(
        vars,
        Expression::from(makespan),
        constraints,
        &groups,
        config.max_time,
    )
}

/// Problem 3: minimise the total lateness measured at the aircraft's final
/// position, i.e. landing time plus the travel time of the assigned runway.
///
/// The travel-time matrix is computed once per solve by the caller and
/// passed explicitly.
pub fn total_lateness(
    instance: &AlpInstance,
    config: &SolveConfig,
    travel: &[Vec<f64>],
) -> SolveOutcome {
    let mut vars = variables!();
    let landing_times = model::landing_time_variables(&mut vars, instance);
    let mut constraints = model::time_window_constraints(instance, &landing_times);
    let (runway_assignment, landing_order, mut shared) = model::runway_separation_constraints(
        &mut vars,
        instance,
        config.nb_runways,
        &landing_times,
    );
    constraints.append(&mut shared);

    let lateness: Vec<Variable> = (0..instance.nb_aircrafts)
        .map(|i| vars.add(variable().min(0.0).name(format!("lateness_{i}"))))
        .collect();

    for (i, w) in instance.windows.iter().enumerate() {
        // lateness_i >= x_i + sum_r t[i][r] * assign[i][r] - target_i
        let mut completion = Expression::from(landing_times[i]);
        for r in 0..config.nb_runways {
            completion += travel[i][r] * runway_assignment[i][r];
        }
        constraints.push(constraint!(lateness[i] >= completion - w.target));
    }

    let objective = lateness
        .iter()
        .fold(Expression::from(0.0), |acc, &v| acc + v);

    let groups = VariableGroups {
        landing_times,
        runway_assignment,
        landing_order,
        early_penalty: None,
        late_penalty: None,
        makespan: None,
        lateness: Some(lateness),
    };

    solve::minimise(vars, objective, constraints, &groups, config.max_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::LandingWindow;
    use crate::resolution::solve::{SolveStatus, SolvedGroups};

    const TOL: f64 = 1e-4;

    fn scenario() -> AlpInstance {
        let windows = [
            (10.0, 20.0, 30.0),
            (15.0, 27.0, 40.0),
            (20.0, 35.0, 50.0),
            (30.0, 45.0, 60.0),
            (35.0, 52.0, 70.0),
        ]
        .iter()
        .map(|&(e, t, l)| LandingWindow::new(0.0, e, t, l, 1.0, 1.0).unwrap())
        .collect();
        let separation = vec![
            vec![0.0, 3.0, 4.0, 5.0, 6.0],
            vec![3.0, 0.0, 2.0, 4.0, 5.0],
            vec![4.0, 2.0, 0.0, 3.0, 4.0],
            vec![5.0, 4.0, 3.0, 0.0, 2.0],
            vec![6.0, 5.0, 4.0, 2.0, 0.0],
        ];
        AlpInstance::new(5, 0.0, windows, separation).unwrap()
    }

    fn config(nb_runways: usize) -> SolveConfig {
        SolveConfig {
            nb_runways,
            seed: 1,
            max_time: 10,
        }
    }

    fn assert_schedule_valid(instance: &AlpInstance, nb_runways: usize, values: &SolvedGroups) {
        let n = instance.nb_aircrafts;
        for i in 0..n {
            let x = values.landing_times[i];
            assert!(
                instance.windows[i].earliest - TOL <= x && x <= instance.windows[i].latest + TOL,
                "aircraft {i} lands at {x} outside its window"
            );

            let assigned: f64 = values.runway_assignment[i].iter().sum();
            assert!((assigned - 1.0).abs() < TOL, "aircraft {i} runway sum {assigned}");

            assert!(values.landing_order[i][i].abs() < TOL);
            for j in (i + 1)..n {
                let pair = values.landing_order[i][j] + values.landing_order[j][i];
                assert!((pair - 1.0).abs() < TOL, "pair ({i}, {j}) order sum {pair}");
            }
        }

        for i in 0..n {
            for j in 0..n {
                if i == j || values.landing_order[i][j] < 0.5 {
                    continue;
                }
                for r in 0..nb_runways {
                    if values.runway_assignment[i][r] > 0.5 && values.runway_assignment[j][r] > 0.5
                    {
                        assert!(
                            values.landing_times[j] + TOL
                                >= values.landing_times[i] + instance.separation[i][j],
                            "aircraft {j} violates separation behind {i} on runway {r}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn weighted_deviation_on_one_runway() {
        let instance = scenario();
        let outcome = weighted_deviation(&instance, &config(1));
        assert!(outcome.status.has_solution(), "status {}", outcome.status);

        let values = outcome.values.expect("solved values");
        assert_schedule_valid(&instance, 1, &values);

        let early = values.early_penalty.as_ref().expect("early penalties");
        let late = values.late_penalty.as_ref().expect("late penalties");
        for i in 0..instance.nb_aircrafts {
            let deviation = values.landing_times[i] - instance.windows[i].target;
            assert!(early[i] + TOL >= (-deviation).max(0.0));
            assert!(late[i] + TOL >= deviation.max(0.0));
        }
    }

    #[test]
    fn makespan_on_one_runway_covers_every_landing() {
        let instance = scenario();
        let outcome = makespan(&instance, &config(1));
        assert!(outcome.status.has_solution(), "status {}", outcome.status);

        let values = outcome.values.expect("solved values");
        assert_schedule_valid(&instance, 1, &values);

        let span = values.makespan.expect("makespan value");
        for &x in &values.landing_times {
            assert!(span + TOL >= x);
        }
    }

    #[test]
    fn an_extra_runway_never_hurts() {
        let instance = scenario();

        let one = makespan(&instance, &config(1));
        let two = makespan(&instance, &config(2));
        let span_one = one.values.expect("1-runway values").makespan.unwrap();
        let two_values = two.values.expect("2-runway values");
        assert_schedule_valid(&instance, 2, &two_values);
        assert!(two_values.makespan.unwrap() <= span_one + TOL);
    }

    #[test]
    fn total_lateness_charges_taxi_time() {
        let instance = scenario();
        let config = config(2);
        let travel = instance.travel_times(&config);

        let outcome = total_lateness(&instance, &config, &travel);
        assert!(outcome.status.has_solution(), "status {}", outcome.status);

        let values = outcome.values.expect("solved values");
        assert_schedule_valid(&instance, 2, &values);

        let lateness = values.lateness.as_ref().expect("lateness values");
        for i in 0..instance.nb_aircrafts {
            let runway = values.runway_assignment[i]
                .iter()
                .position(|&v| v > 0.5)
                .expect("assigned runway");
            let completion = values.landing_times[i] + travel[i][runway];
            let target = instance.windows[i].target;
            assert!(lateness[i] + TOL >= (completion - target).max(0.0));
        }
    }

    #[test]
    fn collapsed_window_lands_exactly_on_target() {
        let windows = vec![
            LandingWindow::new(0.0, 25.0, 25.0, 25.0, 1.0, 1.0).unwrap(),
            LandingWindow::new(0.0, 10.0, 15.0, 60.0, 1.0, 1.0).unwrap(),
        ];
        let separation = vec![vec![0.0, 4.0], vec![4.0, 0.0]];
        let instance = AlpInstance::new(2, 0.0, windows, separation).unwrap();

        let outcome = makespan(&instance, &config(1));
        assert!(outcome.status.has_solution(), "status {}", outcome.status);
        let values = outcome.values.expect("solved values");
        assert!((values.landing_times[0] - 25.0).abs() < TOL);
        assert_schedule_valid(&instance, 1, &values);
    }

    #[test]
    fn impossible_separation_is_reported_infeasible() {
        // Both aircraft are pinned to t = 10 but must be 3 apart on the
        // single runway.
        let windows = vec![
            LandingWindow::new(0.0, 10.0, 10.0, 10.0, 1.0, 1.0).unwrap(),
            LandingWindow::new(0.0, 10.0, 10.0, 10.0, 1.0, 1.0).unwrap(),
        ];
        let separation = vec![vec![0.0, 3.0], vec![3.0, 0.0]];
        let instance = AlpInstance::new(2, 0.0, windows, separation).unwrap();

        let outcome = weighted_deviation(&instance, &config(1));
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_none());
    }
}
