//! Corona CLI entry point.
//!
//! Lays out a scenario file and writes its frame as JSON. Failures are
//! rendered as miette reports, with malformed scenario files pointing at
//! the offending source span.

use std::process;

use clap::Parser;
use log::{debug, error, info, warn};

use corona_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let (log_level, fallback) = args.level_filter();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if fallback {
        warn!(requested = args.log_level; "Unknown log level, using warn");
    }
    info!(log_level:?, measure:? = args.measure; "Starting Corona");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = corona_cli::run(&args) {
        let reporter = miette::GraphicalReportHandler::new();

        for reportable in to_reportables(&err) {
            let mut report = String::new();
            if reporter.render_report(&mut report, &reportable).is_err() {
                report = reportable.to_string();
            }
            error!("{report}");
        }

        process::exit(1);
    }

    info!(output = args.output; "Frame written");
}
