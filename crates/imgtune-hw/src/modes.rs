//! Panel display mode control.
//!
//! The panel exposes a single sysfs attribute that selects the active
//! picture preset. Writing a mode's control code switches the panel;
//! reading the attribute back reports the code of the active mode. The
//! last persisted default lives in a small state file so it survives
//! reboot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Mode id applied when no valid persisted default exists.
const FALLBACK_MODE_ID: i32 = 0;

/// A single display mode preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeEntry {
    /// Mode identifier exposed over the control interface.
    pub id: i32,
    /// Human-readable preset name.
    pub name: &'static str,
    /// Control code the kernel attribute expects for this mode.
    pub code: &'static str,
}

/// Fixed mode table, in ascending id order.
pub const MODE_TABLE: &[ModeEntry] = &[
    ModeEntry { id: 0, name: "Cinema", code: "1" },
    ModeEntry { id: 1, name: "Sports", code: "4" },
    ModeEntry { id: 2, name: "Game", code: "5" },
    ModeEntry { id: 3, name: "Photos", code: "2" },
    ModeEntry { id: 4, name: "Web", code: "3" },
    // ModeEntry { id: 5, name: "Expert", code: "10" },
];

/// Looks up a mode by identifier.
pub fn mode_by_id(id: i32) -> Option<&'static ModeEntry> {
    MODE_TABLE.iter().find(|m| m.id == id)
}

/// Looks up a mode by its control code.
pub fn mode_by_code(code: &str) -> Option<&'static ModeEntry> {
    MODE_TABLE.iter().find(|m| m.code == code)
}

/// Reads the first whitespace-delimited token from a control file.
///
/// An empty file counts as a read failure, matching the token-level
/// semantics of the kernel attribute.
fn read_token(path: &Path) -> io::Result<String> {
    let contents = fs::read_to_string(path)?;
    contents
        .split_whitespace()
        .next()
        .map(str::to_owned)
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "empty control file"))
}

/// Controller for the panel mode attribute and the persisted default.
///
/// Holds no file handles between operations; every read or write opens
/// the file, performs a single token-level access, and releases it.
pub struct ModeController {
    mode_path: PathBuf,
    default_path: PathBuf,
    default_mode: &'static ModeEntry,
}

impl ModeController {
    /// Creates a controller and restores the persisted default mode.
    ///
    /// Reads the last persisted control code from the state file and
    /// resolves it against the mode table. If the state file is missing,
    /// unreadable, or empty the default stays at mode 0 and the panel is
    /// left untouched. Otherwise the resolved default is applied to the
    /// panel so it reflects the last known default on every start.
    pub fn new<P, Q>(mode_path: P, default_path: Q) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        let mut controller = Self {
            mode_path: mode_path.into(),
            default_path: default_path.into(),
            default_mode: &MODE_TABLE[0],
        };

        let code = match read_token(&controller.default_path) {
            Ok(code) => code,
            Err(e) => {
                debug!("No persisted default mode ({}), using fallback", e);
                return controller;
            }
        };
        debug!("Persisted default mode code: {}", code);

        if let Some(entry) = mode_by_code(&code) {
            controller.default_mode = entry;
        }

        if let Err(e) = controller.set_mode(controller.default_mode.id, false) {
            debug!("Failed to apply default mode at startup: {}", e);
        }
        controller
    }

    /// Creates a controller over the well-known device paths.
    pub fn open() -> Self {
        Self::new(crate::MODE_PATH, crate::DEFAULT_MODE_PATH)
    }

    /// All known modes, in table order.
    pub fn modes(&self) -> &'static [ModeEntry] {
        MODE_TABLE
    }

    /// The mode the panel is currently in.
    ///
    /// Falls back to the default mode when the attribute cannot be read
    /// or reports a code outside the table.
    pub fn current_mode(&self) -> &'static ModeEntry {
        match read_token(&self.mode_path) {
            Ok(code) => mode_by_code(&code).unwrap_or(self.default_mode),
            Err(_) => self.default_mode,
        }
    }

    /// The configured default mode.
    pub fn default_mode(&self) -> &'static ModeEntry {
        self.default_mode
    }

    /// Switches the panel to the given mode.
    ///
    /// With `make_default` the control code is also persisted so the mode
    /// is restored on the next start. A persist failure leaves the panel
    /// on the new mode but keeps the previous default.
    pub fn set_mode(&mut self, id: i32, make_default: bool) -> Result<()> {
        let entry = mode_by_id(id).ok_or(Error::UnknownMode(id))?;

        fs::write(&self.mode_path, entry.code)?;

        if make_default {
            fs::write(&self.default_path, entry.code)?;
            self.default_mode = entry;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> (PathBuf, PathBuf) {
        (
            dir.path().join("screen_mode"),
            dir.path().join("default_display_mode"),
        )
    }

    #[test]
    fn test_table_order_and_uniqueness() {
        for pair in MODE_TABLE.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(mode_by_id(2).unwrap().name, "Game");
        assert!(mode_by_id(5).is_none());
        assert_eq!(mode_by_code("3").unwrap().name, "Web");
        assert!(mode_by_code("10").is_none());
    }

    #[test]
    fn test_set_mode_round_trip() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        let mut ctl = ModeController::new(&mode_path, &default_path);

        for entry in MODE_TABLE {
            ctl.set_mode(entry.id, false).unwrap();
            assert_eq!(fs::read_to_string(&mode_path).unwrap(), entry.code);
            assert_eq!(ctl.current_mode().id, entry.id);
            assert_eq!(ctl.current_mode().name, entry.name);
        }
    }

    #[test]
    fn test_set_mode_unknown_id() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        let mut ctl = ModeController::new(&mode_path, &default_path);

        assert!(matches!(
            ctl.set_mode(42, true),
            Err(Error::UnknownMode(42))
        ));
        assert_eq!(ctl.default_mode().id, 0);
        assert!(!mode_path.exists());
        assert!(!default_path.exists());
    }

    #[test]
    fn test_persisted_default_restored() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        fs::write(&default_path, "4").unwrap();

        let ctl = ModeController::new(&mode_path, &default_path);
        assert_eq!(ctl.default_mode().id, 1);
        assert_eq!(ctl.default_mode().name, "Sports");
        // Startup applies the restored default to the panel.
        assert_eq!(fs::read_to_string(&mode_path).unwrap(), "4");
    }

    #[test]
    fn test_missing_state_file() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);

        let ctl = ModeController::new(&mode_path, &default_path);
        assert_eq!(ctl.default_mode().id, 0);
        assert_eq!(ctl.default_mode().name, "Cinema");
        // No persisted default, panel left untouched.
        assert!(!mode_path.exists());
    }

    #[test]
    fn test_empty_state_file() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        fs::write(&default_path, "").unwrap();

        let ctl = ModeController::new(&mode_path, &default_path);
        assert_eq!(ctl.default_mode().id, 0);
        assert!(!mode_path.exists());
    }

    #[test]
    fn test_unmatched_state_token() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        fs::write(&default_path, "99").unwrap();

        let ctl = ModeController::new(&mode_path, &default_path);
        // Unknown code keeps the fallback, but the read succeeded so the
        // fallback is still applied to the panel.
        assert_eq!(ctl.default_mode().id, 0);
        assert_eq!(fs::read_to_string(&mode_path).unwrap(), "1");
    }

    #[test]
    fn test_make_default_survives_restart() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);

        let mut ctl = ModeController::new(&mode_path, &default_path);
        ctl.set_mode(2, true).unwrap();
        assert_eq!(ctl.default_mode().id, 2);
        assert_eq!(fs::read_to_string(&default_path).unwrap(), "5");

        let ctl = ModeController::new(&mode_path, &default_path);
        assert_eq!(ctl.default_mode().id, 2);
        assert_eq!(ctl.default_mode().name, "Game");
    }

    #[test]
    fn test_current_mode_falls_back_when_unreadable() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);

        let ctl = ModeController::new(&mode_path, &default_path);
        assert_eq!(ctl.current_mode().id, ctl.default_mode().id);
    }

    #[test]
    fn test_current_mode_falls_back_on_garbage() {
        let dir = TempDir::new().unwrap();
        let (mode_path, default_path) = paths(&dir);
        fs::write(&default_path, "2").unwrap();

        let ctl = ModeController::new(&mode_path, &default_path);
        fs::write(&mode_path, "bogus").unwrap();
        assert_eq!(ctl.current_mode().id, 3);
        assert_eq!(ctl.current_mode().name, "Photos");
    }

    #[test]
    fn test_persist_failure_keeps_previous_default() {
        let dir = TempDir::new().unwrap();
        let mode_path = dir.path().join("screen_mode");
        let bad_default_path = dir.path().join("missing").join("default_display_mode");

        let mut ctl = ModeController::new(&mode_path, &bad_default_path);
        assert!(ctl.set_mode(1, true).is_err());
        // The panel write happened before the persist failed.
        assert_eq!(fs::read_to_string(&mode_path).unwrap(), "4");
        assert_eq!(ctl.default_mode().id, 0);
    }
}
