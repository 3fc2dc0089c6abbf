//! Printing, JSON export and CSV summary of solution records.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::resolution::extract::SolutionReport;

/// Human-readable dump of one solve.
pub fn print_report(dataset: &str, problem: usize, report: &SolutionReport) {
    println!("\n{dataset} / problem {problem}");
    println!("Optimization status: {}", report.status);

    if let Some(message) = &report.message {
        println!("{message}");
        return;
    }

    println!("Landing times:");
    for (i, t) in report.landing_times.iter().enumerate() {
        println!("  Aircraft {i}: {t:.2}");
    }

    if !report.penalties.is_empty() {
        println!("Penalties:");
        for (i, p) in report.penalties.iter().enumerate() {
            println!("  Aircraft {i}: early = {:.2}, late = {:.2}", p.early, p.late);
        }
    }

    if let Some(makespan) = report.makespan {
        println!("Makespan: {makespan:.2}");
    }
    if let Some(lateness) = report.lateness {
        println!("Total lateness: {lateness:.2}");
    }

    println!("Runway assignments:");
    for (i, assignment) in report.runway_assignments.iter().enumerate() {
        match assignment {
            Some(runway) => println!("  Aircraft {i}: runway {runway}"),
            None => println!("  Aircraft {i}: unassigned"),
        }
    }

    println!("Landing order matrix:");
    for (i, row) in report.landing_order.iter().enumerate() {
        println!("  {i}: {row:?}");
    }
}

/// Writes one record to `<out_dir>/problem{problem}/result_{index}.json`.
pub fn write_report(
    out_dir: &Path,
    problem: usize,
    index: usize,
    report: &SolutionReport,
) -> std::io::Result<PathBuf> {
    let dir = out_dir.join(format!("problem{problem}"));
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("result_{index}.json"));
    let json = serde_json::to_string_pretty(report)?;
    File::create(&path)?.write_all(json.as_bytes())?;
    Ok(path)
}

/// Collects every exported record into a CSV table sorted by dataset and
/// problem. Directories or files that cannot be read are skipped so a
/// partial run still summarizes.
pub fn summarize_results(result_dir: &Path, output_file: &Path) -> std::io::Result<()> {
    let mut rows: Vec<(usize, usize, String, String, String)> = Vec::new();

    for problem in 1..=3 {
        let dir = result_dir.join(format!("problem{problem}"));
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(result_no) = result_number(file_name) else {
                continue;
            };
            let Ok(text) = fs::read_to_string(&path) else {
                continue;
            };
            let Ok(report) = serde_json::from_str::<SolutionReport>(&text) else {
                continue;
            };

            let times = if report.landing_times.is_empty() {
                "-".to_string()
            } else {
                report
                    .landing_times
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            rows.push((
                result_no,
                problem,
                file_name.to_string(),
                report.status,
                times,
            ));
        }
    }

    rows.sort();

    let mut out = File::create(output_file)?;
    writeln!(out, "File,Problem,Status,Landing Times")?;
    for (_, problem, file, status, times) in rows {
        writeln!(out, "{file},Problem {problem},{status},\"{times}\"")?;
    }
    Ok(())
}

fn result_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix("result_")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}
