//! Display mode control
//!
//! This crate wraps the operating system's display configuration API behind a
//! small, stateless controller so that a remote-support front end can match the
//! local screen resolution to the technician's display and put it back afterwards.
//!
//! # Backends
//!
//! - Windows (`EnumDisplaySettingsW` / `ChangeDisplaySettingsW`)
//! - In-memory mock for tests and development on other hosts
//!
//! # Example
//!
//! ```no_run
//! use resmatch_display::mock::{MockBackend, MockProfile};
//! use resmatch_display::{DisplayController, Session};
//!
//! let controller = DisplayController::new(MockBackend::new(MockProfile::Laptop));
//! let mut session = Session::start(controller);
//!
//! for mode in session.controller().enumerate_supported_modes() {
//!     println!("{}", mode);
//! }
//!
//! let outcome = session.select(resmatch_display::DisplayMode::new(1366, 768));
//! println!("{}", outcome);
//! ```

pub mod backend;
pub mod change;
pub mod controller;
pub mod driver;
pub mod mock;
pub mod mode;
pub mod session;
pub mod shortcuts;

#[cfg(windows)]
pub mod win32;

pub use backend::DisplayBackend;
pub use change::{ChangeFlag, DisplayChangeError};
pub use controller::{DEFAULT_MIN_WIDTH, DisplayController};
pub use driver::{DriverHealth, DriverInfoProbe, INFO_UNAVAILABLE};
pub use mode::{DisplayMode, DisplayModeSet, RawMode};
pub use session::{ApplyOutcome, ExitPolicy, Session, SessionState};
pub use shortcuts::{Shortcut, shortcut_availability};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("Invalid display mode: {0}")]
    InvalidMode(String),

    #[error("Display backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Display crate result type
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Open the native backend for this host, if one exists
#[cfg(windows)]
pub fn native_backend() -> Result<Box<dyn DisplayBackend>> {
    Ok(Box::new(win32::WindowsBackend::new()))
}

/// Open the native backend for this host, if one exists
#[cfg(not(windows))]
pub fn native_backend() -> Result<Box<dyn DisplayBackend>> {
    Err(DisplayError::BackendUnavailable(format!(
        "changing the screen resolution is only supported on Windows (this host is {})",
        std::env::consts::OS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error_messages() {
        let err = DisplayError::InvalidMode("abc".into());
        assert!(err.to_string().contains("Invalid display mode"));

        let err = DisplayError::BackendUnavailable("linux".into());
        assert!(err.to_string().contains("unavailable"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_native_backend_unavailable_off_windows() {
        match native_backend() {
            Err(DisplayError::BackendUnavailable(msg)) => assert!(msg.contains("Windows")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("native backend should not exist off Windows"),
        }
    }
}
