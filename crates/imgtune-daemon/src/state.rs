//! Application state management.

use std::sync::Mutex;

use imgtune_hw::{ModeController, ModeEntry};
use tracing::info;

use crate::config::Config;

/// Shared daemon state.
///
/// The controller assumes serialized callers, so every operation holds
/// the one lock for its full duration. That keeps the panel write and
/// the persisted-default write of a single SetMode from interleaving
/// with another call.
pub struct AppState {
    modes: Mutex<ModeController>,
}

impl AppState {
    /// Creates the state; this restores and applies the persisted
    /// default mode.
    pub fn new(config: &Config) -> Self {
        let controller =
            ModeController::new(&config.modes.mode_path, &config.modes.default_path);
        info!(
            "Mode controller ready (control: {}, state: {})",
            config.modes.mode_path, config.modes.default_path
        );
        Self {
            modes: Mutex::new(controller),
        }
    }

    /// All known modes as (id, name) pairs, in table order.
    pub fn list_modes(&self) -> Vec<(i32, String)> {
        imgtune_hw::MODE_TABLE.iter().map(to_pair).collect()
    }

    /// The mode the panel is currently in.
    pub fn current_mode(&self) -> (i32, String) {
        let modes = self.modes.lock().unwrap();
        to_pair(modes.current_mode())
    }

    /// The configured default mode.
    pub fn default_mode(&self) -> (i32, String) {
        let modes = self.modes.lock().unwrap();
        to_pair(modes.default_mode())
    }

    /// Switches the panel mode, optionally persisting it as the default.
    pub fn set_mode(&self, mode_id: i32, make_default: bool) -> imgtune_hw::Result<()> {
        let mut modes = self.modes.lock().unwrap();
        modes.set_mode(mode_id, make_default)
    }
}

fn to_pair(entry: &ModeEntry) -> (i32, String) {
    (entry.id, entry.name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModesConfig;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        Config {
            modes: ModesConfig {
                mode_path: dir.path().join("screen_mode").display().to_string(),
                default_path: dir
                    .path()
                    .join("default_display_mode")
                    .display()
                    .to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_list_modes_is_stable() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&test_config(&dir));

        let before = state.list_modes();
        state.set_mode(2, true).unwrap();
        assert_eq!(state.list_modes(), before);
        assert_eq!(before[0], (0, "Cinema".to_string()));
    }

    #[test]
    fn test_set_and_query() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&test_config(&dir));

        state.set_mode(4, false).unwrap();
        assert_eq!(state.current_mode(), (4, "Web".to_string()));
        assert_eq!(state.default_mode(), (0, "Cinema".to_string()));

        state.set_mode(1, true).unwrap();
        assert_eq!(state.default_mode(), (1, "Sports".to_string()));
    }

    #[test]
    fn test_set_unknown_mode_fails() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(&test_config(&dir));

        assert!(state.set_mode(9, true).is_err());
        assert_eq!(state.default_mode(), (0, "Cinema".to_string()));
    }
}
