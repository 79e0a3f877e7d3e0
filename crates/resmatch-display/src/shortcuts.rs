//! Technician shortcuts
//!
//! Resolutions of the technician's own monitor, offered for one-key apply.
//! A shortcut is only usable when this machine lists the mode and the driver
//! accepts it in a probe.

use crate::{DisplayBackend, DisplayController, DisplayMode, DisplayModeSet};

/// Common technician-side resolutions
pub const DEFAULT_SHORTCUTS: &[DisplayMode] = &[
    DisplayMode::new(1366, 768),
    DisplayMode::new(1280, 720),
    DisplayMode::new(1920, 1080),
    DisplayMode::new(1600, 900),
    DisplayMode::new(1440, 900),
    DisplayMode::new(1280, 800),
];

/// A shortcut and whether it can be applied on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub mode: DisplayMode,
    pub available: bool,
}

/// Check each shortcut in configured order
///
/// Modes missing from `supported` are never probed.
pub fn shortcut_availability<B: DisplayBackend>(
    controller: &DisplayController<B>,
    supported: &DisplayModeSet,
    shortcuts: &[DisplayMode],
) -> Vec<Shortcut> {
    shortcuts
        .iter()
        .map(|&mode| Shortcut {
            mode,
            available: supported.contains(&mode)
                && controller.probe_mode(mode.width(), mode.height()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChangeFlag;
    use crate::mock::{MockBackend, MockProfile};

    #[test]
    fn test_availability_on_laptop() {
        let backend = MockBackend::new(MockProfile::Laptop);
        backend.reject(DisplayMode::new(1280, 800));
        let controller = DisplayController::new(backend.clone());
        let supported = controller.enumerate_supported_modes();

        let shortcuts = shortcut_availability(&controller, &supported, DEFAULT_SHORTCUTS);
        let available: Vec<DisplayMode> = shortcuts
            .iter()
            .filter(|s| s.available)
            .map(|s| s.mode)
            .collect();

        assert_eq!(shortcuts.len(), DEFAULT_SHORTCUTS.len());
        assert_eq!(
            available,
            vec![DisplayMode::new(1366, 768), DisplayMode::new(1280, 720)]
        );

        // 1920x1080, 1600x900 and 1440x900 are not listed, so only three probes
        assert_eq!(backend.request_count(ChangeFlag::Test), 3);
        assert_eq!(backend.request_count(ChangeFlag::Persist), 0);
    }

    #[test]
    fn test_no_driver_has_no_shortcuts() {
        let controller = DisplayController::new(MockBackend::new(MockProfile::NoDriver));
        let supported = controller.enumerate_supported_modes();

        let shortcuts = shortcut_availability(&controller, &supported, DEFAULT_SHORTCUTS);
        assert!(shortcuts.iter().all(|s| !s.available));
    }
}
