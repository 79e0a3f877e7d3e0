//! Mode change requests and driver status codes

use thiserror::Error;

/// Status returned by the OS when a mode change succeeds
pub const DISP_CHANGE_SUCCESSFUL: i32 = 0;
pub const DISP_CHANGE_RESTART: i32 = 1;
pub const DISP_CHANGE_FAILED: i32 = -1;
pub const DISP_CHANGE_BADMODE: i32 = -2;
pub const DISP_CHANGE_NOTUPDATED: i32 = -3;
pub const DISP_CHANGE_BADFLAGS: i32 = -4;
pub const DISP_CHANGE_BADPARAM: i32 = -5;
pub const DISP_CHANGE_BADDUALVIEW: i32 = -6;

/// Selects test-only or committing semantics for a mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFlag {
    /// Ask the driver whether the mode is valid without applying it
    Test,
    /// Apply the mode and save it to the display configuration store
    Persist,
}

impl ChangeFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFlag::Test => "test",
            ChangeFlag::Persist => "persist",
        }
    }
}

/// Reasons the driver or OS refused a mode change
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DisplayChangeError {
    #[error("A restart is required to apply this resolution.")]
    RestartRequired,

    #[error("The video driver rejected the change.")]
    Failed,

    #[error("Resolution not supported by the video driver.")]
    BadMode,

    #[error("Could not save the resolution to the Windows registry.")]
    NotUpdated,

    #[error("Invalid parameters in the request.")]
    InvalidParameters,

    #[error("Video mode not supported on this hardware.")]
    UnsupportedHardware,

    #[error("Unknown error (code {0}).")]
    Unknown(i32),
}

impl DisplayChangeError {
    /// Map an OS status code, `Ok` for success
    pub fn check(code: i32) -> Result<(), Self> {
        match code {
            DISP_CHANGE_SUCCESSFUL => Ok(()),
            DISP_CHANGE_RESTART => Err(Self::RestartRequired),
            DISP_CHANGE_FAILED => Err(Self::Failed),
            DISP_CHANGE_BADMODE => Err(Self::BadMode),
            DISP_CHANGE_NOTUPDATED => Err(Self::NotUpdated),
            DISP_CHANGE_BADFLAGS | DISP_CHANGE_BADPARAM => Err(Self::InvalidParameters),
            DISP_CHANGE_BADDUALVIEW => Err(Self::UnsupportedHardware),
            other => Err(Self::Unknown(other)),
        }
    }

    /// The OS status code this error came from
    pub fn code(&self) -> i32 {
        match self {
            Self::RestartRequired => DISP_CHANGE_RESTART,
            Self::Failed => DISP_CHANGE_FAILED,
            Self::BadMode => DISP_CHANGE_BADMODE,
            Self::NotUpdated => DISP_CHANGE_NOTUPDATED,
            Self::InvalidParameters => DISP_CHANGE_BADPARAM,
            Self::UnsupportedHardware => DISP_CHANGE_BADDUALVIEW,
            Self::Unknown(code) => *code,
        }
    }
}
