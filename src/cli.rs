use crate::error::PlayerError;
use crate::hardware::serial::{device_path, SerialSettings};
use crate::playback::{PlaybackConfig, PlaybackMode};
use crate::settings::PlayerSettings;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const PROGRAM: &str = "serial-log-player";

/// Long options that take their value as the following argument
const VALUE_OPTIONS: &[&str] = &[
    "--port", "--baud", "--pause", "--start", "--end", "--device", "--config", "--poll-interval",
];

/// Configuration errors; any of these aborts the run with usage text
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("Unknown option '{0}'")]
    UnknownSwitch(String),

    #[error("Option '{0}' requires a value, e.g. {0}:<n>")]
    MissingValue(String),

    #[error("Option '{0}' does not take a value")]
    UnexpectedValue(String),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("No log file given")]
    MissingLogFile,

    #[error("Start line {start} is after end line {end}")]
    InvalidWindow { start: u32, end: u32 },

    #[error("{0}")]
    Invalid(String),
}

/// Command line model, parsed after legacy switches are rewritten
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = PROGRAM, disable_help_flag = true, disable_version_flag = true)]
pub struct PlayArgs {
    /// Log file to play
    #[arg(value_name = "LOGFILE")]
    pub log_path: Option<PathBuf>,

    /// Serial port number (-p:<n>)
    #[arg(long)]
    pub port: Option<u32>,

    /// Baud rate (-b:<n>)
    #[arg(long)]
    pub baud: Option<u32>,

    /// Pause between lines in milliseconds (-d:<n>)
    #[arg(long = "pause")]
    pub pause_ms: Option<u64>,

    /// First line to play, one-based (-s:<n>)
    #[arg(long = "start")]
    pub start_line: Option<u32>,

    /// Last line to play, one-based inclusive (-e:<n>)
    #[arg(long = "end")]
    pub end_line: Option<u32>,

    /// Play one pass, then exit (-o)
    #[arg(long)]
    pub once: bool,

    /// Echo each line sent (-v)
    #[arg(long)]
    pub verbose: bool,

    /// Read the file byte by byte (-l)
    #[arg(long = "line-by-line")]
    pub line_by_line: bool,

    /// Serial device path, overrides the port number
    #[arg(long)]
    pub device: Option<String>,

    /// Settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write lines to stdout instead of a serial port
    #[arg(long)]
    pub console: bool,

    /// Wait in milliseconds before restarting after an empty pass
    #[arg(long = "poll-interval")]
    pub poll_interval_ms: Option<u64>,

    /// Do not print the progress line
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// List serial ports and exit
    #[arg(long = "list-ports")]
    pub list_ports: bool,
}

/// What the command line asks for
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    ListPorts,
    Play(PlayArgs),
}

pub fn usage() -> &'static str {
    "\nserial-log-player [options] logfile\n\n\
     Options are:\n\
     \t-p:port\t\t\tserial port number (default 1)\n\
     \t-b:baud\t\t\tbaud rate (default 4800)\n\
     \t-d:pause\t\tpause between lines in ms (default 100)\n\
     \t-s:start line\t\tone-based\n\
     \t-e:end line\t\tone-based, inclusive\n\
     \t-v[erbose]\t\techo each line sent\n\
     \t-o[nce]\t\t\tplay one pass instead of looping\n\
     \t-l[inebylinemode]\tread the file byte by byte\n\n\
     \t--device <path>\t\tserial device, overrides -p\n\
     \t--config <path>\t\tsettings file\n\
     \t--console\t\twrite to stdout instead of a serial port\n\
     \t--poll-interval <ms>\twait before restarting an empty pass\n\
     \t--no-progress\t\tdo not print the progress line\n\
     \t--list-ports\t\tlist serial ports and exit\n\n\
     serial-log-player [-?|-h] for help\n"
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "-?" | "/?" | "-h" | "-H" | "/h" | "/H" | "-help" | "--help")
}

fn legacy_long_option(name: &str) -> Option<(&'static str, bool)> {
    let option = match name.to_ascii_lowercase().as_str() {
        "s" => ("--start", true),
        "e" => ("--end", true),
        "p" => ("--port", true),
        "d" => ("--pause", true),
        "b" => ("--baud", true),
        "o" | "once" => ("--once", false),
        "v" | "verbose" => ("--verbose", false),
        "l" | "linebylinemode" => ("--line-by-line", false),
        _ => return None,
    };
    Some(option)
}

/// Whether `arg` is written as a `-x` or `/x` style switch
fn is_switch(arg: &str) -> bool {
    if let Some(body) = arg.strip_prefix('/') {
        let name = body.split(':').next().unwrap_or_default();
        return legacy_long_option(name).is_some();
    }
    arg.len() > 1 && arg.starts_with('-')
}

/// Rewrite `-x:<n>` or `/x:<n>` to the matching long option
fn normalize_switch(arg: &str) -> Result<String, CliError> {
    let body = &arg[1..];
    let (name, value) = match body.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let (long, takes_value) =
        legacy_long_option(name).ok_or_else(|| CliError::UnknownSwitch(arg.to_string()))?;

    match (takes_value, value) {
        (true, Some(value)) if !value.is_empty() => Ok(format!("{}={}", long, value)),
        (true, _) => Err(CliError::MissingValue(arg.to_string())),
        (false, None) => Ok(long.to_string()),
        (false, Some(_)) => Err(CliError::UnexpectedValue(arg.to_string())),
    }
}

/// Parse a full argument list, program name first
pub fn parse_args<I, T>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| PROGRAM.to_string());
    let rest: Vec<String> = args.collect();

    if rest.is_empty() || rest.iter().any(|a| is_help(a)) {
        return Ok(Command::Help);
    }

    let mut normalized = vec![program];
    let mut have_path = false;
    let mut value_pending = false;

    for arg in rest {
        if value_pending {
            value_pending = false;
            normalized.push(arg);
        } else if arg.starts_with("--") {
            value_pending = VALUE_OPTIONS.contains(&arg.as_str());
            normalized.push(arg);
        } else if is_switch(&arg) {
            normalized.push(normalize_switch(&arg)?);
        } else if have_path {
            return Err(CliError::UnexpectedArgument(arg));
        } else {
            have_path = true;
            normalized.push(arg);
        }
    }

    let parsed = PlayArgs::try_parse_from(normalized)
        .map_err(|e| CliError::Invalid(e.render().to_string().trim_end().to_string()))?;

    if parsed.list_ports {
        return Ok(Command::ListPorts);
    }
    if parsed.log_path.is_none() {
        return Err(CliError::MissingLogFile);
    }
    Ok(Command::Play(parsed))
}

/// Everything a run needs, after settings and switches are merged
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub log_path: PathBuf,
    pub playback: PlaybackConfig,
    pub serial: SerialSettings,
    pub console: bool,
}

impl RunOptions {
    pub fn resolve(args: PlayArgs, settings: &PlayerSettings) -> Result<Self, CliError> {
        let log_path = args.log_path.ok_or(CliError::MissingLogFile)?;

        let mode = if args.line_by_line {
            PlaybackMode::Streaming
        } else {
            PlaybackMode::Buffered
        };
        // a limit of 0 in the settings file selects the mode default
        let max_line = match mode {
            PlaybackMode::Buffered => settings.buffered_max_line,
            PlaybackMode::Streaming => settings.streaming_max_line,
        };
        let max_line = if max_line == 0 {
            mode.default_max_line()
        } else {
            max_line
        };

        let playback = PlaybackConfig {
            start_line: args.start_line.unwrap_or(0),
            end_line: args.end_line,
            once: args.once,
            pause: Duration::from_millis(args.pause_ms.unwrap_or(settings.pause_ms)),
            verbose: args.verbose,
            mode,
            max_line,
            poll_interval: Duration::from_millis(
                args.poll_interval_ms.unwrap_or(settings.poll_interval_ms).max(1),
            ),
            // console output shares stdout with the progress line
            show_progress: !(args.no_progress || args.console),
        };
        if let Err(PlayerError::InvalidWindow { start, end }) = playback.window() {
            return Err(CliError::InvalidWindow { start, end });
        }

        let device = match (args.device, args.port) {
            (Some(device), _) => device,
            (None, Some(port)) => device_path(port),
            (None, None) => settings
                .device
                .clone()
                .unwrap_or_else(|| device_path(settings.port)),
        };
        let mut serial = SerialSettings::new(device, args.baud.unwrap_or(settings.baud));
        serial.write_timeout = Duration::from_millis(settings.write_timeout_ms);

        Ok(Self {
            log_path,
            playback,
            serial,
            console: args.console,
        })
    }
}
