//! Command-line argument handling.
//!
//! Hand-rolled parsing over `std::env::args`: the flag surface is small and
//! stable, and the error messages stay in the same box-drawing style as the
//! rest of the output.

use std::path::PathBuf;

use crate::map::projection::ProjectionKind;

/// What the process should do after parsing.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the interactive map.
    Run(RunOptions),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
    /// A flag or value was wrong; the message has already been printed.
    Error(String),
}

#[derive(Debug, PartialEq, Default)]
pub struct RunOptions {
    pub debug: bool,
    pub log_to_file: bool,
    pub geometry: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    pub projection: ProjectionKind,
    /// Simulated start instant, "YYYY-MM-DD HH:MM:SS" in UTC.
    pub simulate_at: Option<String>,
}

pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_slice(&args)
    }

    fn from_slice(args: &[String]) -> Self {
        let mut options = RunOptions::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Self { action: CliAction::Help },
                "--version" | "-V" => return Self { action: CliAction::Version },
                "--debug" | "-d" => options.debug = true,
                "--log" | "-l" => options.log_to_file = true,
                "--geometry" => match iter.next() {
                    Some(value) => options.geometry = Some(PathBuf::from(value)),
                    None => return Self::missing_value("--geometry", "a GeoJSON file path"),
                },
                "--config-dir" => match iter.next() {
                    Some(value) => options.config_dir = Some(PathBuf::from(value)),
                    None => return Self::missing_value("--config-dir", "a directory path"),
                },
                "--projection" => match iter.next() {
                    Some(value) => match value.as_str() {
                        "equirectangular" => {
                            options.projection = ProjectionKind::Equirectangular;
                        }
                        "mercator" => options.projection = ProjectionKind::Mercator,
                        other => {
                            return Self {
                                action: CliAction::Error(format!(
                                    "unknown projection \"{other}\" (expected equirectangular or mercator)"
                                )),
                            };
                        }
                    },
                    None => return Self::missing_value("--projection", "a projection name"),
                },
                "--at" => match iter.next() {
                    Some(value) => options.simulate_at = Some(value.clone()),
                    None => return Self::missing_value("--at", "\"YYYY-MM-DD HH:MM:SS\""),
                },
                other => {
                    return Self {
                        action: CliAction::Error(format!("unknown argument: {other}")),
                    };
                }
            }
        }

        Self {
            action: CliAction::Run(options),
        }
    }

    fn missing_value(flag: &str, expected: &str) -> Self {
        Self {
            action: CliAction::Error(format!("{flag} requires a value: {expected}")),
        }
    }
}

/// Print the help text in the standard block format.
pub fn display_help_message() {
    log_version!();
    log_block_start!("Usage: terminatr [OPTIONS]");
    log_indented!("-h, --help                Show this help message");
    log_indented!("-V, --version             Show the version");
    log_indented!("-d, --debug               Enable debug output");
    log_indented!("-l, --log                 Route log output to a file");
    log_indented!("    --geometry <path>     Load world boundaries from a GeoJSON file");
    log_indented!("    --config-dir <path>   Override the settings directory");
    log_indented!("    --projection <name>   equirectangular (default) or mercator");
    log_indented!("    --at <datetime>       Run against a simulated UTC clock");
    log_block_start!("Keys while running");
    log_indented!("q quit, / search cities, r remove a clock");
    log_indented!("f toggle 12/24h, t cycle theme");
    log_end!();
}

/// Print version information in the standard block format.
pub fn display_version_message() {
    log_version!();
    log_block_start!("World map with day/night terminator and city clocks");
    log_indented!(env!("CARGO_PKG_DESCRIPTION"));
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ParsedArgs::from_slice(&owned).action
    }

    #[test]
    fn no_args_runs_with_defaults() {
        assert_eq!(parse(&[]), CliAction::Run(RunOptions::default()));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help"]), CliAction::Help);
        assert_eq!(parse(&["-h", "--debug"]), CliAction::Help);
        assert_eq!(parse(&["--version"]), CliAction::Version);
    }

    #[test]
    fn run_flags_accumulate() {
        let action = parse(&[
            "--debug",
            "--projection",
            "mercator",
            "--geometry",
            "/tmp/world.json",
            "--at",
            "2024-06-21 12:00:00",
        ]);
        match action {
            CliAction::Run(options) => {
                assert!(options.debug);
                assert_eq!(options.projection, ProjectionKind::Mercator);
                assert_eq!(options.geometry, Some(PathBuf::from("/tmp/world.json")));
                assert_eq!(options.simulate_at.as_deref(), Some("2024-06-21 12:00:00"));
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn missing_values_and_unknown_flags_are_errors() {
        assert!(matches!(parse(&["--geometry"]), CliAction::Error(_)));
        assert!(matches!(parse(&["--projection", "globe"]), CliAction::Error(_)));
        assert!(matches!(parse(&["--sideways"]), CliAction::Error(_)));
    }
}
