use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{DispatchError, DispatchResult};

pub const CONFIG_FILE: &str = "config.toml";
pub const APP_DIR: &str = "grounded-dispatch";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

/// Pacing and safety knobs for the dispatcher and the native backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Pause after every dispatched operation so the UI can settle.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Wait between setting the clipboard and pasting.
    #[serde(default = "default_clipboard_settle_ms")]
    pub clipboard_settle_ms: u64,
    /// Pause after every backend primitive (move, click, key, scroll).
    #[serde(default = "default_action_pause_ms")]
    pub action_pause_ms: u64,
    #[serde(default = "default_scroll_amount")]
    pub scroll_amount: i32,
    /// Abort when the cursor is parked in a screen corner.
    #[serde(default = "default_true")]
    pub fail_safe: bool,
    /// Platform descriptor override, e.g. "macos". Defaults to the build target OS.
    #[serde(default)]
    pub platform: Option<String>,
}

impl ExecutorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn clipboard_settle(&self) -> Duration {
        Duration::from_millis(self.clipboard_settle_ms)
    }

    pub fn action_pause(&self) -> Duration {
        Duration::from_millis(self.action_pause_ms)
    }

    /// No sleeps anywhere; for previews and tests.
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            clipboard_settle_ms: 0,
            action_pause_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            clipboard_settle_ms: default_clipboard_settle_ms(),
            action_pause_ms: default_action_pause_ms(),
            scroll_amount: default_scroll_amount(),
            fail_safe: true,
            platform: None,
        }
    }
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_clipboard_settle_ms() -> u64 {
    1000
}

fn default_action_pause_ms() -> u64 {
    1000
}

fn default_scroll_amount() -> i32 {
    10
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Searched in order for `.app` bundles on macOS.
    #[serde(default = "default_mac_app_dirs")]
    pub mac_app_dirs: Vec<PathBuf>,
    /// Where `.desktop` entries live on Linux.
    #[serde(default = "default_linux_desktop_dir")]
    pub linux_desktop_dir: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            mac_app_dirs: default_mac_app_dirs(),
            linux_desktop_dir: default_linux_desktop_dir(),
        }
    }
}

fn default_mac_app_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/System/Applications"),
    ]
}

fn default_linux_desktop_dir() -> PathBuf {
    PathBuf::from("/usr/share/applications")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Overrides `<data_local_dir>/grounded-dispatch/sessions`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Lookup order: next to the executable, working directory, user config dir.
fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidate = cwd.join(CONFIG_FILE);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in working directory");
            return Some(candidate);
        }
    }

    let candidate = dirs::config_dir()?.join(APP_DIR).join(CONFIG_FILE);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in user config dir");
        return Some(candidate);
    }
    None
}

pub fn load_config_from(path: &Path) -> DispatchResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    validate(&config)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Loads `explicit` if given, else the first config found on the lookup path,
/// else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> DispatchResult<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    match resolve_config_path() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::info!("no config file found; using defaults");
            Ok(AppConfig::default())
        }
    }
}

pub fn save_config(config: &AppConfig, path: &Path) -> DispatchResult<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

fn validate(config: &AppConfig) -> DispatchResult<()> {
    if config.executor.scroll_amount <= 0 {
        return Err(DispatchError::Config(format!(
            "executor.scroll_amount must be positive, got {}",
            config.executor.scroll_amount
        )));
    }
    if config.launch.mac_app_dirs.is_empty() {
        return Err(DispatchError::Config(
            "launch.mac_app_dirs must list at least one directory".into(),
        ));
    }
    Ok(())
}
