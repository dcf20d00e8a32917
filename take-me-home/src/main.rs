use std::process::ExitCode;

use chrono::{NaiveDate, NaiveDateTime};
use take_me_home::planner::RoutePlanner;
use take_me_home::scoring::ScoringWeights;
use take_me_home::web::parse_timestamp;
use tracing_subscriber::EnvFilter;

/// Start time used when none is given on the command line.
fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_opt(14, 5, 0))
        .expect("valid default start time")
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let start = match std::env::args().nth(1) {
        None => default_start(),
        Some(raw) => match parse_timestamp(&raw) {
            Some(start) => start,
            None => {
                eprintln!("usage: take-me-home [YYYY-MM-DDTHH:MM]");
                return ExitCode::from(2);
            }
        },
    };

    let planner = match RoutePlanner::new(start) {
        Ok(planner) => planner.with_weights(ScoringWeights::default()),
        Err(e) => {
            eprintln!("Failed to build candidate routes: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", planner.summary());
    ExitCode::SUCCESS
}
