use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use murmur_panel::HeightStore;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "murmur";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Keyboard heights closer than this are treated as unchanged.
const KEYBOARD_HEIGHT_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Last keyboard height observed on any screen; seeds panel sizing on the next launch.
    #[serde(default)]
    pub keyboard_height: Option<f32>,
    #[serde(default = "default_animate_message_list")]
    pub animate_message_list: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            keyboard_height: None,
            animate_message_list: default_animate_message_list(),
        }
    }
}

impl ChatSettings {
    pub fn normalized(mut self) -> Self {
        self.keyboard_height = self
            .keyboard_height
            .filter(|height| height.is_finite() && *height > 0.0);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<ArcSwap<ChatSettings>>,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".murmur"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> Arc<ChatSettings> {
        self.settings.load_full()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn update(&self, settings: ChatSettings) -> Result<(), SettingsError> {
        let normalized_settings = settings.normalized();
        self.persist(&normalized_settings)?;
        self.settings.store(Arc::new(normalized_settings));
        Ok(())
    }

    fn load_from_disk(path: &Path) -> ChatSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return ChatSettings::default();
        }

        let figment =
            Figment::from(Serialized::defaults(ChatSettings::default())).merge(Json::file(path));

        match figment.extract::<ChatSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                ChatSettings::default()
            }
        }
    }

    /// Writes through a sibling temp file so a crash never leaves half a settings file.
    fn persist(&self, settings: &ChatSettings) -> Result<(), SettingsError> {
        let path = &self.config_path;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(IoSnafu {
                stage: "create-settings-directory",
                path: parent,
            })?;
        }

        let content =
            serde_json::to_vec_pretty(settings).context(EncodeSnafu { stage: "encode-settings" })?;
        let staged = path.with_extension("json.tmp");
        std::fs::write(&staged, content).context(IoSnafu {
            stage: "write-staged-settings",
            path: &staged,
        })?;
        std::fs::rename(&staged, path).context(IoSnafu {
            stage: "swap-in-staged-settings",
            path,
        })?;

        tracing::debug!(?path, "settings persisted");
        Ok(())
    }
}

// The coordinator only sees the keyboard height; persistence failures stay here.
impl HeightStore for SettingsStore {
    fn keyboard_height(&self) -> Option<f32> {
        self.settings().keyboard_height
    }

    fn remember_keyboard_height(&self, height: f32) {
        let current = self.settings();
        let unchanged = current
            .keyboard_height
            .is_some_and(|known| (known - height).abs() < KEYBOARD_HEIGHT_EPSILON);
        if unchanged {
            return;
        }

        let next = ChatSettings {
            keyboard_height: Some(height),
            ..(*current).clone()
        };
        if let Err(error) = self.update(next) {
            tracing::warn!("failed to remember keyboard height {height}: {error}");
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("settings file {path:?} failed on `{stage}`: {source}"))]
    Io {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("settings could not be encoded on `{stage}`: {source}"))]
    Encode {
        stage: &'static str,
        source: serde_json::Error,
    },
}

fn default_animate_message_list() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("murmur-settings-{}", uuid::Uuid::now_v7()))
            .join(SETTINGS_FILE_NAME)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(scratch_path());
        assert_eq!(*store.settings(), ChatSettings::default());
        assert_eq!(store.keyboard_height(), None);
    }

    #[test]
    fn remembered_height_survives_reload() {
        let path = scratch_path();
        let store = SettingsStore::new(path.clone());
        store.remember_keyboard_height(612.0);
        assert_eq!(store.keyboard_height(), Some(612.0));

        let reloaded = SettingsStore::new(path.clone());
        assert_eq!(reloaded.keyboard_height(), Some(612.0));
        assert!(reloaded.settings().animate_message_list);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let path = scratch_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create scratch dir");
        }
        std::fs::write(&path, r#"{ "keyboard_height": -4.0 }"#).expect("write settings");

        let store = SettingsStore::new(path);
        assert_eq!(store.keyboard_height(), None);
        assert!(store.settings().animate_message_list);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = scratch_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create scratch dir");
        }
        std::fs::write(&path, "{ not json").expect("write settings");

        let store = SettingsStore::new(path);
        assert_eq!(*store.settings(), ChatSettings::default());
    }

    #[test]
    fn update_stores_normalized_settings() {
        let store = SettingsStore::new(scratch_path());
        let result = store.update(ChatSettings {
            keyboard_height: Some(f32::NAN),
            animate_message_list: false,
        });
        assert!(result.is_ok());
        assert_eq!(store.keyboard_height(), None);
        assert!(!store.settings().animate_message_list);
    }

    #[test]
    fn failed_save_keeps_previous_settings() {
        let blocker = scratch_path();
        if let Some(parent) = blocker.parent() {
            std::fs::create_dir_all(parent).expect("create scratch dir");
        }
        std::fs::write(&blocker, "{}").expect("write blocker");

        // The settings directory would have to live under a regular file.
        let store = SettingsStore::new(blocker.join(SETTINGS_FILE_NAME));
        let result = store.update(ChatSettings {
            keyboard_height: Some(500.0),
            animate_message_list: false,
        });

        assert!(matches!(
            result,
            Err(SettingsError::Io {
                stage: "create-settings-directory",
                ..
            })
        ));
        assert_eq!(*store.settings(), ChatSettings::default());
    }
}
