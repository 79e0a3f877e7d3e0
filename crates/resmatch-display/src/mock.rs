//! Mock backend for testing without a Windows display driver
//!
//! The mock keeps its state behind a shared handle so a test can keep a clone
//! of the backend after moving it into a controller and inspect every change
//! request made through it.
//!
//! # Usage
//!
//! ```no_run
//! use resmatch_display::mock::{MockBackend, MockProfile};
//! use resmatch_display::DisplayController;
//!
//! let backend = MockBackend::new(MockProfile::Desktop);
//! let controller = DisplayController::new(backend.clone());
//! controller.apply_mode(1280, 720).unwrap();
//! assert_eq!(backend.requests().len(), 1);
//! ```

use crate::change::{DISP_CHANGE_BADMODE, DISP_CHANGE_SUCCESSFUL};
use crate::{ChangeFlag, DisplayBackend, DisplayMode, RawMode};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, RwLock};

/// Pre-defined mock machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProfile {
    /// 1366x768 panel with the usual laptop mode list
    Laptop,
    /// 1920x1080 monitor on a current driver
    Desktop,
    /// Generic adapter with no driver installed, no modes reported
    NoDriver,
    /// Outdated driver exposing only two modes
    LegacyDriver,
}

impl MockProfile {
    /// Active mode at startup
    pub fn current_mode(self) -> DisplayMode {
        match self {
            MockProfile::Laptop => DisplayMode::new(1366, 768),
            MockProfile::Desktop => DisplayMode::new(1920, 1080),
            MockProfile::NoDriver => DisplayMode::new(1024, 768),
            MockProfile::LegacyDriver => DisplayMode::new(1024, 768),
        }
    }

    /// Raw driver entries, including duplicates at other depths and rates
    pub fn raw_modes(self) -> Vec<RawMode> {
        let resolutions: &[(u32, u32)] = match self {
            MockProfile::Laptop => &[
                (640, 480),
                (800, 600),
                (1024, 768),
                (1280, 720),
                (1280, 800),
                (1360, 768),
                (1366, 768),
            ],
            MockProfile::Desktop => &[
                (640, 480),
                (720, 480),
                (800, 600),
                (1024, 768),
                (1280, 720),
                (1280, 800),
                (1280, 1024),
                (1366, 768),
                (1440, 900),
                (1600, 900),
                (1680, 1050),
                (1920, 1080),
            ],
            MockProfile::NoDriver => &[],
            MockProfile::LegacyDriver => &[(640, 480), (800, 600), (1024, 768)],
        };

        let mut modes = Vec::with_capacity(resolutions.len() * 3);
        for &(width, height) in resolutions {
            modes.push(RawMode::new(width, height, 32, 60));
            modes.push(RawMode::new(width, height, 16, 60));
            if self == MockProfile::Desktop {
                modes.push(RawMode::new(width, height, 32, 75));
            }
        }
        modes
    }

    /// Get profile from name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "laptop" => Some(MockProfile::Laptop),
            "desktop" => Some(MockProfile::Desktop),
            "nodriver" | "no-driver" | "no_driver" => Some(MockProfile::NoDriver),
            "legacy" | "legacydriver" | "legacy-driver" => Some(MockProfile::LegacyDriver),
            _ => None,
        }
    }

    /// Get all available mock profiles
    pub fn all() -> &'static [MockProfile] {
        &[
            MockProfile::Laptop,
            MockProfile::Desktop,
            MockProfile::NoDriver,
            MockProfile::LegacyDriver,
        ]
    }
}

/// Shared mock state
#[derive(Debug, Clone)]
struct MockState {
    modes: Vec<RawMode>,
    current: DisplayMode,
    /// Modes the mock driver refuses even though it lists them
    rejected: HashSet<DisplayMode>,
    /// Status codes returned by upcoming persisting changes, in order
    scripted: VecDeque<i32>,
    /// Every change request seen, in order
    requests: Vec<(DisplayMode, ChangeFlag)>,
}

/// In-memory display backend
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<RwLock<MockState>>,
}

impl MockBackend {
    /// Create a mock from a pre-defined profile
    pub fn new(profile: MockProfile) -> Self {
        Self::with_modes(profile.current_mode(), profile.raw_modes())
    }

    /// Create a mock with an explicit mode list
    pub fn with_modes(current: DisplayMode, modes: Vec<RawMode>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                modes,
                current,
                rejected: HashSet::new(),
                scripted: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    /// Make the driver refuse a mode in both probe and apply
    pub fn reject(&self, mode: DisplayMode) {
        if let Ok(mut state) = self.state.write() {
            state.rejected.insert(mode);
        }
    }

    /// Force the status code of the next persisting change
    pub fn script_apply(&self, code: i32) {
        if let Ok(mut state) = self.state.write() {
            state.scripted.push_back(code);
        }
    }

    /// Get recorded change requests
    pub fn requests(&self) -> Vec<(DisplayMode, ChangeFlag)> {
        self.state
            .read()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Count recorded requests with the given flag
    pub fn request_count(&self, flag: ChangeFlag) -> usize {
        self.requests().iter().filter(|(_, f)| *f == flag).count()
    }
}

impl DisplayBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn current_mode(&self) -> DisplayMode {
        match self.state.read() {
            Ok(state) => state.current,
            Err(poisoned) => poisoned.into_inner().current,
        }
    }

    fn mode_at(&self, index: u32) -> Option<RawMode> {
        let state = self.state.read().ok()?;
        state.modes.get(index as usize).copied()
    }

    fn change_mode(&self, mode: DisplayMode, flag: ChangeFlag) -> i32 {
        let Ok(mut state) = self.state.write() else {
            return crate::change::DISP_CHANGE_FAILED;
        };

        state.requests.push((mode, flag));

        if flag == ChangeFlag::Persist {
            if let Some(code) = state.scripted.pop_front() {
                if code == DISP_CHANGE_SUCCESSFUL {
                    state.current = mode;
                }
                tracing::debug!("[MOCK] Scripted result {} for {}", code, mode);
                return code;
            }
        }

        let listed = state.modes.iter().any(|m| m.mode() == mode);
        if !listed || state.rejected.contains(&mode) {
            tracing::debug!("[MOCK] {} rejected ({})", mode, flag.as_str());
            return DISP_CHANGE_BADMODE;
        }

        if flag == ChangeFlag::Persist {
            state.current = mode;
            tracing::debug!("[MOCK] Mode set to {}", mode);
        }

        DISP_CHANGE_SUCCESSFUL
    }
}
