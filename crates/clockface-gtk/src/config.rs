use crate::events::AppEvent;
use async_channel::{Receiver, Sender};
use clockface::{Behavior, ClockError, ClockStyle, ZoneOffset};
use directories::ProjectDirs;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How long the config file must stay quiet before it is re-read. Editors
/// often save with a truncate, several writes and a rename.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub style: ClockStyle,
    pub behavior: Behavior,
}

impl Config {
    pub fn validate(&self) -> Result<(), ClockError> {
        self.style.validate()?;
        self.behavior.validate()
    }
}

/// Settings given on the command line. They win over the config file,
/// including after a reload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub offset: Option<ZoneOffset>,
    pub smooth: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(offset) = self.offset {
            config.behavior.utc_offset_seconds = offset;
        }
        if self.smooth {
            config.behavior.minute_hand_moves_smoothly = true;
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid clock settings: {0}")]
    Clock(#[from] ClockError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "clockface", "clockface")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("CLOCKFACE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    into_config(s)
}

fn into_config(source: config::Config) -> Result<Config, ConfigError> {
    let config: Config = source.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Loads the config file, falling back to defaults when it is missing or
/// broken.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return Config::default();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

/// Writes the built-in defaults to the user's config path. An existing file
/// is left alone.
pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if write_defaults_to(&path)? {
        log::info!("Wrote default config to {}", path.display());
    } else {
        log::info!("Keeping existing config at {}", path.display());
    }
    Ok(path)
}

/// Returns whether the file was written.
fn write_defaults_to(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Whether `event` may have changed the contents of the config file.
/// Permission and timestamp changes do not count.
fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    let content_change = match event.kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => true,
        _ => false,
    };
    content_change && event.paths.iter().any(|p| p == config_path)
}

type WatchResult = notify::Result<notify::Event>;

/// Watches the directory rather than the file so that rename-on-save and
/// delete-then-create are both seen.
fn watch_config_dir(
    config_path: &Path,
) -> Result<(RecommendedWatcher, Receiver<WatchResult>), ConfigError> {
    let dir = config_path.parent().ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

/// Sends one [`AppEvent::ConfigReload`] per burst of changes to the config
/// file. Runs until the app side hangs up.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    // dropping the watcher stops the events
    let (_watcher, events) = match watch_config_dir(&config_path) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Not watching {}: {}", config_path.display(), e);
            return;
        }
    };
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = events.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                while let Ok(Ok(_)) = tokio::time::timeout(RELOAD_DEBOUNCE, events.recv()).await {}
                log::debug!("Config file changed");
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
