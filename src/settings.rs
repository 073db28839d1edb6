//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrodemo/settings.toml (or platform equivalent)

use crate::animation::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::cell::Bevel;
use crate::tetromino::GRID_SIZE;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Fastest allowed movement, in logical pixels per frame on each axis
pub const MAX_SPEED: i32 = 50;

/// Demo settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Animation settings
    pub animation: AnimationSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub next_shape: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
    /// Fire actions on key "press" or key "release"
    pub trigger: KeyTrigger,
}

/// Which key event kind fires an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyTrigger {
    #[default]
    Press,
    /// Only honored on terminals that report key releases
    Release,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys.as_slice() {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Which trim is lit: "raised" or "sunken"
    pub bevel: Bevel,
    /// Canvas marker: "halfblock", "braille", "block" or "dot"
    pub marker: String,
    /// Show the status line under the canvas
    pub show_status: bool,
}

/// Animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Frame budget in milliseconds
    pub frame_ms: u64,
    /// Pixels moved per frame on each axis
    pub speed: i32,
    /// Cell size in logical pixels
    pub block_size: i32,
    /// Shape selected at startup, wrapping past the last
    pub start_shape: usize,
    /// Orientation at startup, taken modulo 4
    pub start_orientation: i32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next_shape: vec!["Space".to_string()],
            rotate_left: vec!["Left".to_string()],
            rotate_right: vec!["Right".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
            trigger: KeyTrigger::Press,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            bevel: Bevel::Raised,
            marker: "halfblock".to_string(),
            show_status: true,
        }
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            speed: 2,
            block_size: 20,
            start_shape: 0,
            start_orientation: 0,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrodemo", "tetrodemo").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config dir, or defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a file; missing or invalid files give defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings from TOML text, clamping out-of-range values
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Settings = toml::from_str(contents)?;
        settings.animation.frame_ms = settings.animation.frame_ms.max(1);
        // A whole 4x4 grid must fit inside the window
        let max_block = WINDOW_WIDTH.min(WINDOW_HEIGHT) / GRID_SIZE as i32;
        settings.animation.block_size = settings.animation.block_size.clamp(1, max_block);
        settings.animation.speed = settings.animation.speed.clamp(-MAX_SPEED, MAX_SPEED);
        Ok(settings)
    }

    /// Save settings to the platform config dir
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };
        self.save_to(&path)
    }

    /// Save settings to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}
