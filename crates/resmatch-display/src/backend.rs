//! Backend seam for the OS display configuration API

use crate::{ChangeFlag, DisplayMode, RawMode};

/// The three display primitives the controller is built on
///
/// Implementations talk to the OS directly and keep no state of their own
/// beyond what they need to reach it.
pub trait DisplayBackend {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Active resolution of the primary display
    fn current_mode(&self) -> DisplayMode;

    /// Driver mode entry at `index`, `None` once the list is exhausted
    fn mode_at(&self, index: u32) -> Option<RawMode>;

    /// Request a width/height change and return the raw OS status code
    fn change_mode(&self, mode: DisplayMode, flag: ChangeFlag) -> i32;
}

impl<B: DisplayBackend + ?Sized> DisplayBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn current_mode(&self) -> DisplayMode {
        (**self).current_mode()
    }

    fn mode_at(&self, index: u32) -> Option<RawMode> {
        (**self).mode_at(index)
    }

    fn change_mode(&self, mode: DisplayMode, flag: ChangeFlag) -> i32 {
        (**self).change_mode(mode, flag)
    }
}
