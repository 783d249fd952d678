//! `lps` command-line tool: needle calibration, capture replay and command framing.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use lps::qtm::{encode_command, start_stream_commands, ControlCommand};
use lps::{replay_capture, LpsConfig, LpsConfigError, LpsIoError};

#[derive(Parser, Debug)]
#[command(name = "lps", version, about = "Needle tracking on motion-capture marker streams")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit structured JSON logs through `tracing`.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calibrate the configured needle and print the model as JSON.
    Needle {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Track every packet of a recorded capture and report the poses.
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Concatenated raw packets.
        #[arg(long)]
        capture: PathBuf,
        /// Write the JSON report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the framed control commands that start (or stop) a marker stream.
    Command {
        #[arg(long, default_value_t = 100)]
        frequency: u32,
        #[arg(long, default_value_t = 22222)]
        udp_port: u16,
        /// Print the stop command instead of the start sequence.
        #[arg(long)]
        stop: bool,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("config: {0}")]
    ConfigIo(#[source] LpsIoError),
    #[error(transparent)]
    Config(#[from] LpsConfigError),
    #[error("capture {path}: {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report: {0}")]
    Report(#[source] LpsIoError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_stderr_logger(verbose: u8) {
    if let Err(e) = lps::core::init_with_level(level_from_verbosity(verbose)) {
        eprintln!("logger already installed: {e}");
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    if cli.log_json {
        lps::core::init_tracing(true);
    } else {
        init_stderr_logger(cli.verbose);
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    init_stderr_logger(cli.verbose);
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Needle { config } => {
            let config = LpsConfig::load_json(&config).map_err(CliError::ConfigIo)?;
            let detector = config.build_detector()?;
            println!("{}", serde_json::to_string_pretty(detector.model())?);
        }
        Command::Replay {
            config,
            capture,
            output,
        } => {
            let config = LpsConfig::load_json(&config).map_err(CliError::ConfigIo)?;
            let detector = config.build_detector()?;
            let bytes = fs::read(&capture).map_err(|source| CliError::Capture {
                path: capture.clone(),
                source,
            })?;

            let report = replay_capture(&bytes, &detector);
            match output {
                Some(path) => {
                    report.write_json(&path).map_err(CliError::Report)?;
                    println!(
                        "{} packets, {} frames, {} poses ({:.1}% detected), {} failures -> {}",
                        report.packets,
                        report.frames.len(),
                        report.poses.len(),
                        100.0 * report.detection_rate(),
                        report.failures.len(),
                        path.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Command::Command {
            frequency,
            udp_port,
            stop,
        } => {
            let commands = if stop {
                vec![ControlCommand::StreamFramesStop]
            } else {
                start_stream_commands(frequency, udp_port).to_vec()
            };
            for command in &commands {
                println!("{command}\t{}", hex(&encode_command(command)));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
