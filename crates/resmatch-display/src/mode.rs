//! Display mode types
//!
//! A display mode here is only a pixel resolution. Refresh rate and color depth
//! are reported by the driver but ignored when building the supported set.

use crate::DisplayError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A width x height resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayMode {
    width: u32,
    height: u32,
}

impl DisplayMode {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel count, used to rank modes for display
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for DisplayMode {
    type Err = DisplayError;

    /// Parse `1920x1080`, `1920 x 1080` or `1920×1080`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DisplayError::InvalidMode(s.to_string());

        let (w, h) = s
            .split_once(['x', 'X', '×'])
            .ok_or_else(invalid)?;

        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self::new(width, height))
    }
}

impl TryFrom<String> for DisplayMode {
    type Error = DisplayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplayMode> for String {
    fn from(mode: DisplayMode) -> Self {
        mode.to_string()
    }
}

impl From<(u32, u32)> for DisplayMode {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A mode entry exactly as the driver reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub refresh_rate: u32,
}

impl RawMode {
    pub fn new(width: u32, height: u32, bits_per_pixel: u32, refresh_rate: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
            refresh_rate,
        }
    }

    /// Resolution part of this entry
    pub fn mode(&self) -> DisplayMode {
        DisplayMode::new(self.width, self.height)
    }
}

/// Supported modes, unique by resolution and ordered by ascending area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayModeSet {
    modes: Vec<DisplayMode>,
}

impl DisplayModeSet {
    /// Build a set from arbitrary modes, dropping duplicates
    pub fn from_modes<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = DisplayMode>,
    {
        let unique: BTreeSet<DisplayMode> = modes.into_iter().collect();
        let mut modes: Vec<DisplayMode> = unique.into_iter().collect();

        // Ties on area keep (width, height) order from the BTreeSet
        modes.sort_by_key(DisplayMode::area);

        Self { modes }
    }

    pub fn as_slice(&self) -> &[DisplayMode] {
        &self.modes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayMode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn contains(&self, mode: &DisplayMode) -> bool {
        self.modes.contains(mode)
    }

    /// Position of a mode in display order
    pub fn position(&self, mode: &DisplayMode) -> Option<usize> {
        self.modes.iter().position(|m| m == mode)
    }

    pub fn get(&self, index: usize) -> Option<DisplayMode> {
        self.modes.get(index).copied()
    }

    pub fn into_vec(self) -> Vec<DisplayMode> {
        self.modes
    }
}

impl<'a> IntoIterator for &'a DisplayModeSet {
    type Item = &'a DisplayMode;
    type IntoIter = std::slice::Iter<'a, DisplayMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.modes.iter()
    }
}

impl IntoIterator for DisplayModeSet {
    type Item = DisplayMode;
    type IntoIter = std::vec::IntoIter<DisplayMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.modes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display_and_parse() {
        let mode = DisplayMode::new(1920, 1080);
        assert_eq!(mode.to_string(), "1920x1080");
        assert_eq!("1920x1080".parse::<DisplayMode>().unwrap(), mode);
        assert_eq!("1920 x 1080".parse::<DisplayMode>().unwrap(), mode);
        assert_eq!("1920×1080".parse::<DisplayMode>().unwrap(), mode);
        assert_eq!("1920X1080".parse::<DisplayMode>().unwrap(), mode);
    }

    #[test]
    fn test_mode_parse_rejects_garbage() {
        assert!("1920".parse::<DisplayMode>().is_err());
        assert!("axb".parse::<DisplayMode>().is_err());
        assert!("0x600".parse::<DisplayMode>().is_err());
        assert!("-800x600".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_area_does_not_overflow() {
        let mode = DisplayMode::new(u32::MAX, 2);
        assert_eq!(mode.area(), u64::from(u32::MAX) * 2);
    }

    #[test]
    fn test_ordering_is_by_width_then_height() {
        assert!(DisplayMode::new(1280, 1024) < DisplayMode::new(1366, 768));
        assert!(DisplayMode::new(1280, 720) < DisplayMode::new(1280, 800));
    }

    #[test]
    fn test_set_sorts_by_area() {
        let set = DisplayModeSet::from_modes([
            DisplayMode::new(1920, 1080),
            DisplayMode::new(800, 600),
            DisplayMode::new(1366, 768),
        ]);

        assert_eq!(
            set.as_slice(),
            &[
                DisplayMode::new(800, 600),
                DisplayMode::new(1366, 768),
                DisplayMode::new(1920, 1080),
            ]
        );
    }

    #[test]
    fn test_set_deduplicates() {
        let set = DisplayModeSet::from_modes([
            DisplayMode::new(1024, 768),
            DisplayMode::new(1024, 768),
            DisplayMode::new(800, 600),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.position(&DisplayMode::new(1024, 768)), Some(1));
    }

    #[test]
    fn test_set_equal_area_is_deterministic() {
        // 1600x900 and 1440x1000 both cover 1,440,000 pixels
        let a = DisplayModeSet::from_modes([DisplayMode::new(1600, 900), DisplayMode::new(1440, 1000)]);
        let b = DisplayModeSet::from_modes([DisplayMode::new(1440, 1000), DisplayMode::new(1600, 900)]);
        assert_eq!(a, b);
        assert_eq!(a.get(0), Some(DisplayMode::new(1440, 1000)));
    }

    #[test]
    fn test_mode_serde_as_string() {
        let mode = DisplayMode::new(1366, 768);
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, "\"1366x768\"");

        let parsed: DisplayMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mode);

        assert!(serde_json::from_str::<DisplayMode>("\"wide\"").is_err());
    }
}
