//! Video driver diagnostics
//!
//! Shells out to the system inventory tool to describe the video adapter. This
//! is informational only: every failure collapses into [`INFO_UNAVAILABLE`].

use crate::DisplayModeSet;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Text returned when the adapter cannot be described
pub const INFO_UNAVAILABLE: &str = "Information unavailable";

/// Default inventory command
pub const DEFAULT_PROGRAM: &str = "wmic";
pub const DEFAULT_ARGS: &[&str] = &[
    "path",
    "win32_VideoController",
    "get",
    "Name,DriverVersion,Status",
];
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How much the driver exposes, judged from the enumerated modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverHealth {
    /// No modes at all, driver missing or corrupt
    Missing,
    /// Only one or two modes, driver probably outdated
    Limited,
    Healthy,
}

impl DriverHealth {
    pub fn assess(modes: &DisplayModeSet) -> Self {
        match modes.len() {
            0 => DriverHealth::Missing,
            1 | 2 => DriverHealth::Limited,
            _ => DriverHealth::Healthy,
        }
    }

    /// Warning to show the user, if any
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            DriverHealth::Missing => Some(
                "No resolutions were detected. The video driver is missing or corrupt; \
                 resolution changes may not work.",
            ),
            DriverHealth::Limited => Some("Few resolutions available. The video driver may be outdated."),
            DriverHealth::Healthy => None,
        }
    }
}

/// Timeout-bounded call to an external inventory command
#[derive(Debug, Clone)]
pub struct DriverInfoProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for DriverInfoProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS.iter().copied(), DEFAULT_TIMEOUT)
    }
}

impl DriverInfoProbe {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Describe the video adapter, or [`INFO_UNAVAILABLE`]
    pub fn query(&self) -> String {
        match self.run() {
            Some(output) => parse_inventory(&output).unwrap_or_else(|| {
                tracing::debug!("{} returned no adapter rows", self.program);
                INFO_UNAVAILABLE.to_string()
            }),
            None => INFO_UNAVAILABLE.to_string(),
        }
    }

    /// Run the command, returning stdout only on a timely, successful exit
    fn run(&self) -> Option<String> {
        if which::which(&self.program).is_err() {
            tracing::debug!("{} not found on PATH", self.program);
            return None;
        }

        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to start {}: {}", self.program, e);
                return None;
            }
        };

        // Drain stdout while waiting so a large report cannot fill the pipe
        let mut stdout = child.stdout.take()?;
        let reader = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stdout.read_to_end(&mut bytes).map(|_| bytes)
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() < self.timeout => std::thread::sleep(POLL_INTERVAL),
                Ok(None) => {
                    tracing::warn!("{} timed out after {:?}", self.program, self.timeout);
                    kill_and_reap(&mut child);
                    return None;
                }
                Err(e) => {
                    tracing::warn!("Failed to wait for {}: {}", self.program, e);
                    kill_and_reap(&mut child);
                    return None;
                }
            }
        };

        if !status.success() {
            tracing::debug!("{} exited with {}", self.program, status);
            return None;
        }

        let bytes = reader.join().ok()?.ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Drop blank lines and the column header, keep one adapter per line
pub fn parse_inventory(output: &str) -> Option<String> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        return None;
    }

    Some(lines[1..].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisplayMode;

    #[test]
    fn test_health_assessment() {
        let none = DisplayModeSet::default();
        assert_eq!(DriverHealth::assess(&none), DriverHealth::Missing);

        let two = DisplayModeSet::from_modes([DisplayMode::new(800, 600), DisplayMode::new(1024, 768)]);
        assert_eq!(DriverHealth::assess(&two), DriverHealth::Limited);

        let three = DisplayModeSet::from_modes([
            DisplayMode::new(800, 600),
            DisplayMode::new(1024, 768),
            DisplayMode::new(1280, 720),
        ]);
        assert_eq!(DriverHealth::assess(&three), DriverHealth::Healthy);
        assert!(DriverHealth::Healthy.warning().is_none());
        assert!(DriverHealth::Missing.warning().is_some());
    }

    #[test]
    fn test_parse_inventory() {
        let output = "DriverVersion   Name                    Status  \r\n\r\n\
                      31.0.15.3623    NVIDIA GeForce GTX 1650  OK      \r\n\r\n";
        let parsed = parse_inventory(output).unwrap();
        assert_eq!(parsed, "31.0.15.3623    NVIDIA GeForce GTX 1650  OK");
    }

    #[test]
    fn test_parse_inventory_header_only() {
        assert_eq!(parse_inventory("DriverVersion  Name  Status\n\n"), None);
        assert_eq!(parse_inventory(""), None);
    }

    #[test]
    fn test_default_probe() {
        let probe = DriverInfoProbe::default();
        assert_eq!(probe.program(), "wmic");
        assert_eq!(probe.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_program_degrades() {
        let probe = DriverInfoProbe::new(
            "resmatch-no-such-inventory-tool",
            Vec::<String>::new(),
            Duration::from_secs(1),
        );
        assert_eq!(probe.query(), INFO_UNAVAILABLE);
    }
}
