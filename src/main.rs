use std::process::ExitCode;
use std::sync::Arc;

use terminatr::args::{CliAction, ParsedArgs, RunOptions, display_help_message, display_version_message};
use terminatr::logger::Log;
use terminatr::terminatr::Terminatr;
use terminatr::time_source::{self, SimulatedTimeSource, parse_datetime};
use terminatr::{log_error_exit, log_pipe, log_version};

fn main() -> ExitCode {
    match ParsedArgs::from_env().action {
        CliAction::Help => {
            display_help_message();
            ExitCode::SUCCESS
        }
        CliAction::Version => {
            display_version_message();
            ExitCode::SUCCESS
        }
        CliAction::Error(message) => {
            log_version!();
            log_error_exit!("{message}");
            ExitCode::FAILURE
        }
        CliAction::Run(options) => run(options),
    }
}

fn run(options: RunOptions) -> ExitCode {
    // The time source must be pinned before anything asks for "now"
    if let Some(spec) = &options.simulate_at {
        let start = match parse_datetime(spec) {
            Ok(start) => start,
            Err(e) => {
                log_version!();
                log_error_exit!("Invalid --at value: {e}");
                return ExitCode::FAILURE;
            }
        };
        time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, 1.0)));
    }

    // Keep the guard alive for the whole run so the log file flushes on exit
    let _log_guard = if options.log_to_file {
        match Log::start_file_logging(format!(
            "terminatr-{}.log",
            time_source::now().format("%Y%m%d-%H%M%S")
        )) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log_version!();
                log_error_exit!("Could not start file logging: {e:#}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let mut app = Terminatr::new()
        .with_projection(options.projection)
        .with_debug(options.debug);
    if let Some(path) = options.geometry {
        app = app.with_geometry(path);
    }
    if let Some(dir) = options.config_dir {
        app = app.with_config_dir(dir);
    }

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_pipe!();
            log_error_exit!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
