//! Session policy
//!
//! Tracks the mode the machine had when the support session started and the
//! mode it has now, and implements the probe-then-apply and restore-on-exit
//! sequence on top of the stateless controller.

use crate::{DisplayBackend, DisplayChangeError, DisplayController, DisplayMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Original and current mode of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    original: DisplayMode,
    current: DisplayMode,
}

impl SessionState {
    pub fn new(original: DisplayMode) -> Self {
        Self {
            original,
            current: original,
        }
    }

    /// Mode captured at startup
    pub fn original(&self) -> DisplayMode {
        self.original
    }

    /// Mode after the last successful apply
    pub fn current(&self) -> DisplayMode {
        self.current
    }

    fn record_applied(&mut self, mode: DisplayMode) {
        self.current = mode;
    }
}

/// What to do about a changed resolution when the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// Ask the user before restoring
    #[default]
    Ask,
    /// Restore without asking
    Always,
    /// Leave the new resolution in place
    Never,
}

impl ExitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitPolicy::Ask => "ask",
            ExitPolicy::Always => "always",
            ExitPolicy::Never => "never",
        }
    }
}

/// Result of a select or restore request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Mode changed and persisted
    Applied(DisplayMode),
    /// Restored to the session's original mode
    Restored(DisplayMode),
    /// Requested mode is already active, nothing was sent to the OS
    AlreadyCurrent(DisplayMode),
    /// Driver refused the mode during the probe, nothing was applied
    Rejected(DisplayMode),
    /// Driver refused the committing change
    Failed(DisplayMode, DisplayChangeError),
}

impl ApplyOutcome {
    /// Whether the session's current mode changed
    pub fn changed(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_) | ApplyOutcome::Restored(_))
    }

    /// Whether this should be shown as a warning
    pub fn is_warning(&self) -> bool {
        !self.changed()
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyOutcome::Applied(mode) => write!(f, "Resolution changed to {}.", mode),
            ApplyOutcome::Restored(mode) => write!(f, "Resolution restored to {}.", mode),
            ApplyOutcome::AlreadyCurrent(mode) => {
                write!(f, "{} is already the current resolution.", mode)
            }
            ApplyOutcome::Rejected(mode) => {
                write!(f, "{} is not accepted by this machine's video driver.", mode)
            }
            ApplyOutcome::Failed(mode, err) => write!(f, "Could not apply {}: {}", mode, err),
        }
    }
}

/// One support session over a display controller
#[derive(Debug)]
pub struct Session<B> {
    controller: DisplayController<B>,
    state: SessionState,
}

impl<B: DisplayBackend> Session<B> {
    /// Capture the active mode as both original and current
    pub fn start(controller: DisplayController<B>) -> Self {
        let original = controller.query_current_mode();
        tracing::info!("Session started at {}", original);

        Self {
            controller,
            state: SessionState::new(original),
        }
    }

    pub fn controller(&self) -> &DisplayController<B> {
        &self.controller
    }

    pub fn original(&self) -> DisplayMode {
        self.state.original()
    }

    pub fn current(&self) -> DisplayMode {
        self.state.current()
    }

    /// Whether the current mode differs from the one the session started with
    pub fn needs_restore(&self) -> bool {
        self.state.current() != self.state.original()
    }

    /// Probe and apply a mode chosen by the user
    pub fn select(&mut self, mode: DisplayMode) -> ApplyOutcome {
        self.select_with(mode, true)
    }

    /// Apply a mode, optionally skipping the probe
    pub fn select_with(&mut self, mode: DisplayMode, probe: bool) -> ApplyOutcome {
        if mode == self.state.current() {
            return ApplyOutcome::AlreadyCurrent(mode);
        }

        if probe && !self.controller.probe_mode(mode.width(), mode.height()) {
            tracing::warn!("{} rejected by driver probe", mode);
            return ApplyOutcome::Rejected(mode);
        }

        match self.controller.apply_mode(mode.width(), mode.height()) {
            Ok(()) => {
                self.state.record_applied(mode);
                ApplyOutcome::Applied(mode)
            }
            Err(e) => ApplyOutcome::Failed(mode, e),
        }
    }

    /// Put the original mode back
    pub fn restore(&mut self) -> ApplyOutcome {
        let original = self.state.original();
        if original == self.state.current() {
            return ApplyOutcome::AlreadyCurrent(original);
        }

        match self.controller.apply_mode(original.width(), original.height()) {
            Ok(()) => {
                self.state.record_applied(original);
                ApplyOutcome::Restored(original)
            }
            Err(e) => ApplyOutcome::Failed(original, e),
        }
    }

    /// Run the exit step; `confirm` is only consulted for [`ExitPolicy::Ask`]
    pub fn finish<F>(mut self, policy: ExitPolicy, confirm: F) -> Option<ApplyOutcome>
    where
        F: FnOnce(&SessionState) -> bool,
    {
        if !self.needs_restore() {
            return None;
        }

        let restore = match policy {
            ExitPolicy::Always => true,
            ExitPolicy::Never => false,
            ExitPolicy::Ask => confirm(&self.state),
        };

        if !restore {
            tracing::info!(
                "Leaving resolution at {} (original was {})",
                self.state.current(),
                self.state.original()
            );
            return None;
        }

        Some(self.restore())
    }
}
