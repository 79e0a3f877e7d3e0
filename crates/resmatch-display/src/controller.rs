//! Display mode controller
//!
//! Stateless wrapper over a [`DisplayBackend`]. All sequencing (probe, apply,
//! tracking the session's current mode, restoring on exit) belongs to the
//! caller; see [`crate::Session`] for the standard policy.

use crate::{ChangeFlag, DisplayBackend, DisplayChangeError, DisplayMode, DisplayModeSet};

/// Modes narrower than this are legacy modes with no use in a support session
pub const DEFAULT_MIN_WIDTH: u32 = 800;

/// Display mode controller
#[derive(Debug)]
pub struct DisplayController<B> {
    backend: B,
    min_width: u32,
}

impl<B: DisplayBackend> DisplayController<B> {
    /// Create a controller with the default width filter
    pub fn new(backend: B) -> Self {
        Self::with_min_width(backend, DEFAULT_MIN_WIDTH)
    }

    /// Create a controller that drops modes narrower than `min_width`
    pub fn with_min_width(backend: B, min_width: u32) -> Self {
        Self { backend, min_width }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the width filter
    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    /// Read the active resolution
    pub fn query_current_mode(&self) -> DisplayMode {
        let mode = self.backend.current_mode();
        tracing::debug!("Current mode from {}: {}", self.backend.name(), mode);
        mode
    }

    /// Enumerate driver modes, filtered, deduplicated and sorted by area
    pub fn enumerate_supported_modes(&self) -> DisplayModeSet {
        let mut entries = 0u32;
        let mut accepted = Vec::new();

        while let Some(raw) = self.backend.mode_at(entries) {
            entries += 1;
            if raw.width >= self.min_width {
                accepted.push(raw.mode());
            }
        }

        let set = DisplayModeSet::from_modes(accepted);
        tracing::debug!(
            "Driver reported {} entries, {} distinct modes at width >= {}",
            entries,
            set.len(),
            self.min_width
        );

        if set.is_empty() {
            tracing::warn!("No display modes reported by {}", self.backend.name());
        }

        set
    }

    /// Ask the driver whether a mode is valid without applying it
    pub fn probe_mode(&self, width: u32, height: u32) -> bool {
        let mode = DisplayMode::new(width, height);
        let code = self.backend.change_mode(mode, ChangeFlag::Test);
        let ok = DisplayChangeError::check(code).is_ok();
        tracing::debug!("Probe {} -> code {} ({})", mode, code, if ok { "ok" } else { "rejected" });
        ok
    }

    /// Apply a mode and persist it to the display configuration store
    pub fn apply_mode(&self, width: u32, height: u32) -> Result<(), DisplayChangeError> {
        let mode = DisplayMode::new(width, height);
        let code = self.backend.change_mode(mode, ChangeFlag::Persist);

        match DisplayChangeError::check(code) {
            Ok(()) => {
                tracing::info!("Display mode changed to {}", mode);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to apply {}: {} (code {})", mode, e, code);
                Err(e)
            }
        }
    }
}
