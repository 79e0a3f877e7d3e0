//! resmatch
//!
//! Changes this machine's screen resolution to match a remote-support
//! technician's display, and offers to put the original back on exit.

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info, warn};

use cli::{Cli, Command};
use resmatch_config::ResmatchConfig;
use resmatch_display::mock::{MockBackend, MockProfile};
use resmatch_display::{
    ApplyOutcome, DisplayBackend, DisplayController, DisplayMode, DriverHealth, ExitPolicy, Session,
};

/// Controller and session over whichever backend was selected at startup
pub type DynController = DisplayController<Box<dyn DisplayBackend>>;
pub type DynSession = Session<Box<dyn DisplayBackend>>;

/// One row of `list --json`
#[derive(Debug, Serialize)]
struct ModeEntry {
    width: u32,
    height: u32,
    current: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli) {
        eprintln!("Failed to set up logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RESMATCH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else if cli.is_interactive() {
        // The picker owns the terminal, so nothing may be written to it
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let backend: Box<dyn DisplayBackend> = match cli.mock.as_deref() {
        Some(name) => {
            let profile = MockProfile::from_name(name)
                .with_context(|| format!("unknown mock profile '{}'", name))?;
            info!("Using simulated display ({:?})", profile);
            Box::new(MockBackend::new(profile))
        }
        None => match resmatch_display::native_backend() {
            Ok(backend) => backend,
            Err(e) => {
                // No fallback exists for the mode-change API
                eprintln!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    let config = load_config(cli.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    let controller = DisplayController::with_min_width(backend, config.display.min_width);

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(controller, &config),
        Command::Current => {
            println!("{}", controller.query_current_mode());
            Ok(ExitCode::SUCCESS)
        }
        Command::List { json } => list_modes(&controller, json),
        Command::Set { mode, no_probe } => {
            let mut session = Session::start(controller);
            let probe = config.session.probe_before_apply && !no_probe;
            Ok(report(session.select_with(mode, probe)))
        }
        Command::Restore { mode } => restore_mode(&controller, mode),
        Command::Driver => {
            println!("{}", config.diagnostics.probe().query());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ResmatchConfig> {
    match path {
        Some(path) => ResmatchConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => ResmatchConfig::load_default().context("loading configuration"),
    }
}

fn run_tui(controller: DynController, config: &ResmatchConfig) -> Result<ExitCode> {
    info!("resmatch picker starting...");

    let session = Session::start(controller);
    let mut app = tui::App::new(
        session,
        &config.display.shortcuts,
        config.diagnostics.probe(),
        config.session.probe_before_apply,
        config.session.on_exit,
    );

    let result = tui::run(&mut app);
    let (session, policy, restore) = app.into_exit();
    close_session(session, policy, restore, result)
}

/// Run the exit step after the picker closes
///
/// `restore` is the answer given to the picker's prompt. If the picker failed
/// no prompt was answered, so a changed mode is put back unconditionally.
fn close_session(
    session: DynSession,
    policy: ExitPolicy,
    restore: bool,
    picker: Result<()>,
) -> Result<ExitCode> {
    if let Err(e) = picker {
        if let Some(outcome) = session.finish(ExitPolicy::Always, |_| true) {
            report(outcome);
        }
        return Err(e);
    }

    match session.finish(policy, |_| restore) {
        Some(outcome) => Ok(report(outcome)),
        None => Ok(ExitCode::SUCCESS),
    }
}

fn mode_entries(controller: &DynController) -> (Vec<ModeEntry>, DriverHealth) {
    let current = controller.query_current_mode();
    let modes = controller.enumerate_supported_modes();
    let health = DriverHealth::assess(&modes);

    let entries = modes
        .iter()
        .map(|m| ModeEntry {
            width: m.width(),
            height: m.height(),
            current: *m == current,
        })
        .collect();
    (entries, health)
}

fn list_modes(controller: &DynController, json: bool) -> Result<ExitCode> {
    let (entries, health) = mode_entries(controller);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            let mode = DisplayMode::new(entry.width, entry.height);
            let tag = if entry.current { "  <- current" } else { "" };
            println!("{:>11}{}", mode.to_string(), tag);
        }
    }

    if let Some(warning) = health.warning() {
        warn!("{}", warning);
        eprintln!("{}", warning);
    }

    Ok(ExitCode::SUCCESS)
}

fn restore_mode(controller: &DynController, mode: DisplayMode) -> Result<ExitCode> {
    if controller.query_current_mode() == mode {
        return Ok(report(ApplyOutcome::AlreadyCurrent(mode)));
    }

    let outcome = match controller.apply_mode(mode.width(), mode.height()) {
        Ok(()) => ApplyOutcome::Restored(mode),
        Err(e) => ApplyOutcome::Failed(mode, e),
    };
    Ok(report(outcome))
}

/// Print an outcome and pick the exit status for it
fn report(outcome: ApplyOutcome) -> ExitCode {
    match outcome {
        ApplyOutcome::Applied(_) | ApplyOutcome::Restored(_) | ApplyOutcome::AlreadyCurrent(_) => {
            println!("{}", outcome);
            ExitCode::SUCCESS
        }
        ApplyOutcome::Rejected(_) | ApplyOutcome::Failed(..) => {
            eprintln!("{}", outcome);
            ExitCode::FAILURE
        }
    }
}
