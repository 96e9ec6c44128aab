//! Imgtune Panel Hardware Library
//!
//! Provides display mode control for mobile panels that expose the
//! img_tune sysfs interface (picture presets such as Cinema or Game).

pub mod error;
pub mod modes;

pub use error::{Error, Result};
pub use modes::{mode_by_code, mode_by_id, ModeController, ModeEntry, MODE_TABLE};

/// Sysfs attribute that selects the active panel mode.
pub const MODE_PATH: &str = "/sys/devices/virtual/panel/img_tune/screen_mode";

/// State file holding the control code of the persisted default mode.
pub const DEFAULT_MODE_PATH: &str = "/data/vendor/display/default_display_mode";
