//! This module defines an abstract representation of an aircraft landing
//! instance, together with the per-solve configuration that complements it.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// The landing time window of a single aircraft.
///
/// Invariant: `earliest <= target <= latest`. Construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingWindow {
    pub appearance_time: f64,
    pub earliest: f64,
    pub target: f64,
    pub latest: f64,
    pub penalty_before_target: f64,
    pub penalty_after_target: f64,
}

impl LandingWindow {
    pub fn new(
        appearance_time: f64,
        earliest: f64,
        target: f64,
        latest: f64,
        penalty_before_target: f64,
        penalty_after_target: f64,
    ) -> Result<Self, InstanceError> {
        if earliest > target || target > latest {
            return Err(InstanceError::WindowOutOfOrder {
                earliest,
                target,
                latest,
            });
        }
        Ok(Self {
            appearance_time,
            earliest,
            target,
            latest,
            penalty_before_target,
            penalty_after_target,
        })
    }
}

/// One aircraft landing scheduling problem.
///
/// `separation[i][j]` is the minimum time gap required between aircraft `i`
/// and `j` landing consecutively on the same runway. The matrix is not
/// symmetric. The runway count and the travel-time seed are deliberately not
/// part of the instance: they belong to [`SolveConfig`] so that the same
/// immutable instance can be solved under different configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlpInstance {
    pub nb_aircrafts: usize,
    pub freeze_time: f64,
    pub windows: Vec<LandingWindow>,
    pub separation: Vec<Vec<f64>>,
}

impl AlpInstance {
    pub fn new(
        nb_aircrafts: usize,
        freeze_time: f64,
        windows: Vec<LandingWindow>,
        separation: Vec<Vec<f64>>,
    ) -> Result<Self, InstanceError> {
        if nb_aircrafts == 0 {
            return Err(InstanceError::EmptyInstance);
        }
        if windows.len() != nb_aircrafts {
            return Err(InstanceError::WindowCountMismatch {
                declared: nb_aircrafts,
                supplied: windows.len(),
            });
        }
        if separation.len() != nb_aircrafts {
            return Err(InstanceError::SeparationRowCount {
                expected: nb_aircrafts,
                found: separation.len(),
            });
        }
        for (row, values) in separation.iter().enumerate() {
            if values.len() != nb_aircrafts {
                return Err(InstanceError::SeparationRowLength {
                    row,
                    expected: nb_aircrafts,
                    found: values.len(),
                });
            }
        }
        Ok(Self {
            nb_aircrafts,
            freeze_time,
            windows,
            separation,
        })
    }

    /// The derived travel-time matrix `t[i][r]`: the time aircraft `i` needs
    /// to reach its final position after landing on runway `r`.
    ///
    /// Pure: the same seed and instance data always yield the same matrix.
    /// Each entry is drawn uniformly from `[1, max(1, target_i - earliest_i)]`
    /// so taxi times scale with how much slack the aircraft has before its
    /// target. Computed once per solve and passed around explicitly; it is
    /// never cached on the instance.
    pub fn travel_times(&self, config: &SolveConfig) -> Vec<Vec<f64>> {
        let mut rng = ChaChaRng::seed_from_u64(config.seed);
        self.windows
            .iter()
            .map(|w| {
                let spread = (w.target - w.earliest).max(1.0);
                let dist = Uniform::new_inclusive(1.0, spread);
                (0..config.nb_runways)
                    .map(|_| dist.sample(&mut rng).round())
                    .collect()
            })
            .collect()
    }
}

/// Per-solve configuration combined with an immutable [`AlpInstance`].
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// Number of available runways.
    pub nb_runways: usize,
    /// Seed for the derived travel-time matrix.
    pub seed: u64,
    /// Wall-clock budget for the solver engine, in seconds.
    pub max_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    WindowOutOfOrder {
        earliest: f64,
        target: f64,
        latest: f64,
    },
    WindowCountMismatch {
        declared: usize,
        supplied: usize,
    },
    EmptyInstance,
    SeparationRowCount {
        expected: usize,
        found: usize,
    },
    SeparationRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::WindowOutOfOrder {
                earliest,
                target,
                latest,
            } => write!(
                f,
                "landing window must satisfy earliest <= target <= latest, got {earliest} <= {target} <= {latest}"
            ),
            InstanceError::WindowCountMismatch { declared, supplied } => write!(
                f,
                "there must be a landing window for each aircraft: declared {declared}, supplied {supplied}"
            ),
            InstanceError::EmptyInstance => write!(f, "an instance needs at least one aircraft"),
            InstanceError::SeparationRowCount { expected, found } => write!(
                f,
                "separation matrix must have one row per aircraft: expected {expected}, found {found}"
            ),
            InstanceError::SeparationRowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "separation row {row} must have one entry per aircraft: expected {expected}, found {found}"
            ),
        }
    }
}

impl std::error::Error for InstanceError {}
