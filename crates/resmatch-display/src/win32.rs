//! Windows display backend
//!
//! Talks to the primary display through `EnumDisplaySettingsW` and
//! `ChangeDisplaySettingsW`. Both probe and apply send the same `DEVMODEW`
//! payload with only `dmPelsWidth`/`dmPelsHeight` marked as set.

use crate::{ChangeFlag, DisplayBackend, DisplayMode, RawMode};
use std::mem;
use windows::Win32::Graphics::Gdi::{
    CDS_TEST, CDS_TYPE, CDS_UPDATEREGISTRY, ChangeDisplaySettingsW, DEVMODEW, DM_PELSHEIGHT,
    DM_PELSWIDTH, ENUM_CURRENT_SETTINGS, ENUM_DISPLAY_SETTINGS_MODE, EnumDisplaySettingsW,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};
use windows::core::PCWSTR;

/// Primary display via the Win32 GDI API
#[derive(Debug, Default)]
pub struct WindowsBackend;

impl WindowsBackend {
    pub fn new() -> Self {
        Self
    }

    fn empty_devmode() -> DEVMODEW {
        // SAFETY: DEVMODEW is a plain C struct, all-zero is a valid value
        let mut devmode: DEVMODEW = unsafe { mem::zeroed() };
        devmode.dmSize = mem::size_of::<DEVMODEW>() as u16;
        devmode
    }

    fn enum_settings(mode: ENUM_DISPLAY_SETTINGS_MODE) -> Option<DEVMODEW> {
        let mut devmode = Self::empty_devmode();

        // SAFETY: devmode is initialized with dmSize and outlives the call
        let found = unsafe { EnumDisplaySettingsW(PCWSTR::null(), mode, &mut devmode) };

        found.as_bool().then_some(devmode)
    }
}

impl DisplayBackend for WindowsBackend {
    fn name(&self) -> &str {
        "win32"
    }

    fn current_mode(&self) -> DisplayMode {
        if let Some(devmode) = Self::enum_settings(ENUM_CURRENT_SETTINGS) {
            return DisplayMode::new(devmode.dmPelsWidth, devmode.dmPelsHeight);
        }

        tracing::debug!("ENUM_CURRENT_SETTINGS failed, using system metrics");

        // SAFETY: GetSystemMetrics has no preconditions
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        DisplayMode::new(width.max(0) as u32, height.max(0) as u32)
    }

    fn mode_at(&self, index: u32) -> Option<RawMode> {
        Self::enum_settings(ENUM_DISPLAY_SETTINGS_MODE(index)).map(|devmode| {
            RawMode::new(
                devmode.dmPelsWidth,
                devmode.dmPelsHeight,
                devmode.dmBitsPerPel,
                devmode.dmDisplayFrequency,
            )
        })
    }

    fn change_mode(&self, mode: DisplayMode, flag: ChangeFlag) -> i32 {
        let mut devmode = Self::empty_devmode();
        devmode.dmPelsWidth = mode.width();
        devmode.dmPelsHeight = mode.height();
        devmode.dmFields = DM_PELSWIDTH | DM_PELSHEIGHT;

        let flags: CDS_TYPE = match flag {
            ChangeFlag::Test => CDS_TEST,
            ChangeFlag::Persist => CDS_UPDATEREGISTRY,
        };

        // SAFETY: devmode is fully initialized and lives across the call
        let result = unsafe { ChangeDisplaySettingsW(Some(&devmode as *const DEVMODEW), flags) };
        result.0
    }
}
