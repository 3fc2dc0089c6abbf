//! Loading of OR-Library `airland` benchmark files.
//!
//! A dataset is a flat sequence of numeric tokens: the aircraft count and the
//! freeze time, then for each aircraft six window fields
//! (appearance, earliest, target, latest, penalty before/after target)
//! followed by that aircraft's row of the separation matrix.

use std::fs;
use std::path::{Path, PathBuf};

use crate::instance::{AlpInstance, InstanceError, LandingWindow};

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    fn next_value(&mut self) -> Result<f64, DatasetError> {
        let position = self.position;
        let token = self
            .iter
            .next()
            .ok_or(DatasetError::UnexpectedEnd { position })?;
        self.position += 1;
        token.parse().map_err(|_| DatasetError::BadToken {
            position,
            token: token.to_string(),
        })
    }

    fn next_count(&mut self) -> Result<usize, DatasetError> {
        let position = self.position;
        let value = self.next_value()?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(DatasetError::BadToken {
                position,
                token: value.to_string(),
            });
        }
        Ok(value as usize)
    }
}

/// Parses one benchmark dataset from its raw text.
pub fn parse_instance(text: &str) -> Result<AlpInstance, DatasetError> {
    let mut tokens = Tokens::new(text);

    let nb_aircrafts = tokens.next_count()?;
    let freeze_time = tokens.next_value()?;

    let mut windows = Vec::with_capacity(nb_aircrafts);
    let mut separation = Vec::with_capacity(nb_aircrafts);
    for _ in 0..nb_aircrafts {
        let appearance_time = tokens.next_value()?;
        let earliest = tokens.next_value()?;
        let target = tokens.next_value()?;
        let latest = tokens.next_value()?;
        let penalty_before_target = tokens.next_value()?;
        let penalty_after_target = tokens.next_value()?;
        windows.push(LandingWindow::new(
            appearance_time,
            earliest,
            target,
            latest,
            penalty_before_target,
            penalty_after_target,
        )?);

        let mut row = Vec::with_capacity(nb_aircrafts);
        for _ in 0..nb_aircrafts {
            row.push(tokens.next_value()?);
        }
        separation.push(row);
    }

    if tokens.iter.next().is_some() {
        return Err(DatasetError::TrailingData {
            position: tokens.position,
        });
    }

    Ok(AlpInstance::new(
        nb_aircrafts,
        freeze_time,
        windows,
        separation,
    )?)
}

/// Reads and parses one dataset file.
pub fn load_instance(path: &Path) -> Result<AlpInstance, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance(&text)
}

/// Loads `airland1.txt ..= airland{n_files}.txt` from a directory, keeping
/// the file stem as the dataset name.
pub fn load_benchmarks(
    dir: &Path,
    n_files: usize,
) -> Result<Vec<(String, AlpInstance)>, DatasetError> {
    (1..=n_files)
        .map(|i| {
            let name = format!("airland{i}");
            let instance = load_instance(&dir.join(format!("{name}.txt")))?;
            Ok((name, instance))
        })
        .collect()
}

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    UnexpectedEnd {
        position: usize,
    },
    BadToken {
        position: usize,
        token: String,
    },
    TrailingData {
        position: usize,
    },
    Instance(InstanceError),
}

impl From<InstanceError> for DatasetError {
    fn from(err: InstanceError) -> Self {
        DatasetError::Instance(err)
    }
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "cannot read dataset {}: {source}", path.display())
            }
            DatasetError::UnexpectedEnd { position } => {
                write!(f, "dataset ends early at token {position}")
            }
            DatasetError::BadToken { position, token } => {
                write!(f, "token {position} is not a valid number: {token:?}")
            }
            DatasetError::TrailingData { position } => {
                write!(f, "unexpected extra data from token {position} on")
            }
            DatasetError::Instance(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Instance(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_AIRCRAFT: &str = "\
        2 10
        54 129 155 559 10.00 10.00
        0 3
        120 195 258 744 10.00 10.00
        3 0
    ";

    #[test]
    fn parses_a_flat_dataset() {
        let instance = parse_instance(TWO_AIRCRAFT).unwrap();
        assert_eq!(instance.nb_aircrafts, 2);
        assert_eq!(instance.freeze_time, 10.0);
        assert_eq!(instance.windows[0].appearance_time, 54.0);
        assert_eq!(instance.windows[1].target, 258.0);
        assert_eq!(instance.separation, vec![vec![0.0, 3.0], vec![3.0, 0.0]]);
    }

    #[test]
    fn reports_truncated_input() {
        let err = parse_instance("2 10 54 129 155 559 10.00 10.00 0").unwrap_err();
        assert!(matches!(err, DatasetError::UnexpectedEnd { position: 9 }));
    }

    #[test]
    fn reports_malformed_numbers_with_position() {
        let err = parse_instance("2 10 54 129 abc 559 10.00 10.00 0 3").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::BadToken { position: 4, ref token } if token == "abc"
        ));
    }

    #[test]
    fn reports_trailing_garbage() {
        let text = format!("{TWO_AIRCRAFT} 99");
        let err = parse_instance(&text).unwrap_err();
        assert!(matches!(err, DatasetError::TrailingData { .. }));
    }

    #[test]
    fn propagates_window_validation() {
        // target 100 sits before earliest 129
        let err = parse_instance("1 10 54 129 100 559 10.00 10.00 0").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Instance(InstanceError::WindowOutOfOrder { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_instance(Path::new("/nonexistent/airland1.txt")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
