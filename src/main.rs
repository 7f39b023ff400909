mod cli;
mod core;
mod error;
mod hardware;
mod input;
mod playback;
mod settings;

use anyhow::{Context, Result};
use cli::{Command, RunOptions};
use hardware::{ConsoleSink, EchoSink, LineSink, SerialSink};
use input::LogSource;
use playback::{PlaybackEngine, PlaybackOutcome};
use settings::PlayerSettings;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the log, open the sink, then play until done or stopped
async fn run(options: RunOptions) -> Result<()> {
    let source = LogSource::open(&options.log_path, options.playback.mode).await?;

    let mut sink: Box<dyn LineSink> = if options.console {
        Box::new(ConsoleSink::new())
    } else {
        Box::new(SerialSink::open(&options.serial)?)
    };
    if options.playback.verbose {
        sink = Box::new(EchoSink::new(sink));
    }

    let engine = PlaybackEngine::new(options.playback)?;

    let stop = engine.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.trigger();
        }
    });

    let report = engine.play(source, sink.as_mut()).await;
    info!(
        "Playback finished: {} passes, {} lines, {} bytes in {} ms",
        report.passes,
        report.lines_sent,
        report.bytes_sent,
        report.elapsed().num_milliseconds()
    );

    match report.outcome {
        PlaybackOutcome::Completed => Ok(()),
        PlaybackOutcome::Interrupted => {
            println!("\nStopped after {} lines", report.lines_sent);
            Ok(())
        }
        PlaybackOutcome::DeviceError(e) => Err(e.into()),
    }
}

fn main() {
    init_tracing();

    println!("Serial Log Player");

    let args = match cli::parse_args(std::env::args()) {
        Ok(Command::Play(args)) => args,
        Ok(Command::Help) => {
            println!("{}", cli::usage());
            return;
        }
        Ok(Command::ListPorts) => {
            for port in SerialSink::available_ports() {
                println!("{}", port);
            }
            return;
        }
        Err(e) => {
            println!("{}", e);
            println!("{}", cli::usage());
            return;
        }
    };

    let settings = PlayerSettings::load(args.config.as_deref());
    let options = match RunOptions::resolve(args, &settings) {
        Ok(options) => options,
        Err(e) => {
            println!("{}", e);
            println!("{}", cli::usage());
            return;
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime");

    let result = runtime.and_then(|rt| rt.block_on(run(options)));
    if let Err(e) = result {
        warn!("Run failed: {:#}", e);
        println!("\n{}", e);
    }
}
