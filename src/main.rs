use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::instance::SolveConfig;

mod data;
mod instance;
mod report;
mod resolution;

/// Formulates the OR-Library aircraft landing benchmarks as mixed-integer
/// programs and solves the three problem variants under a time budget.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct AirlandTool {
    /// Seed for the derived travel-time matrix
    seed: u64,
    /// The number of runways available for landing
    n_runways: usize,
    /// How many airland datasets to load, starting from airland1
    #[clap(long = "n_files", default_value = "12")]
    n_files: usize,
    /// Wall-clock budget per solve, in seconds
    #[clap(long = "max_time", default_value = "60")]
    max_time: u64,
    /// Directory holding the airland{i}.txt benchmark files
    #[clap(long = "data_dir", default_value = "data")]
    data_dir: PathBuf,
    /// Directory where result records are written
    #[clap(short, long, default_value = "results")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = AirlandTool::parse();
    let config = SolveConfig {
        nb_runways: cli.n_runways,
        seed: cli.seed,
        max_time: cli.max_time,
    };

    let benchmarks = data::load_benchmarks(&cli.data_dir, cli.n_files)?;
    for (index, (name, instance)) in benchmarks.iter().enumerate() {
        let travel = instance.travel_times(&config);
        for problem in 1..=3 {
            let outcome = match problem {
                1 => resolution::problems::weighted_deviation(instance, &config),
                2 => resolution::problems::makespan(instance, &config),
                _ => resolution::problems::total_lateness(instance, &config, &travel),
            };
            let record = resolution::extract::extract_report(instance, &config, &travel, &outcome);
            report::print_report(name, problem, &record);
            let path = report::write_report(&cli.output, problem, index + 1, &record)?;
            println!("Solution export completed: {}", path.display());
        }
    }

    report::summarize_results(&cli.output, &cli.output.join("summary.csv"))?;
    Ok(())
}
