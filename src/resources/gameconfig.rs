//! Engine settings.
//!
//! Read once from an INI file at startup; keys that are missing or invalid
//! keep their defaults. The Settings menu edits the audio and window
//! toggles in place and [`GameConfig::save_to_file`] writes them back.
//!
//! # File Layout
//!
//! ```ini
//! [game]
//! move_duration = 0.2
//! push_limit = 1
//! fade_duration = 0.5
//!
//! [paths]
//! maps = ./assets/maps
//! save = ./save.dat
//! max_maps = 100
//!
//! [audio]
//! sfx = true
//! music = true
//!
//! [window]
//! fullscreen = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::systems::resolver::MoveRules;

const DEFAULT_MOVE_DURATION: f32 = 0.2;
const DEFAULT_PUSH_LIMIT: usize = 1;
const DEFAULT_FADE_DURATION: f32 = 0.5;
const DEFAULT_MAPS_DIR: &str = "./assets/maps";
const DEFAULT_SAVE_PATH: &str = "./save.dat";
const DEFAULT_MAX_MAPS: usize = 100;
const DEFAULT_SFX: bool = true;
const DEFAULT_MUSIC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Stores the movement rules, asset locations and the audio/window toggles
/// the Settings menu can change.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Seconds a single one-tile move takes.
    pub move_duration: f32,
    /// Longest chain of sleeping workers a single move may push.
    pub push_limit: usize,
    /// Seconds per transition phase.
    pub fade_duration: f32,
    /// Directory holding `1.json`, `2.json`, …
    pub maps_dir: PathBuf,
    /// Progress record file.
    pub save_path: PathBuf,
    /// Highest map slot probed.
    pub max_maps: usize,
    /// Sound effects enabled.
    pub sfx: bool,
    /// Music enabled.
    pub music: bool,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Where this configuration is read from and written to.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Built-in defaults.
    pub fn new() -> Self {
        Self {
            move_duration: DEFAULT_MOVE_DURATION,
            push_limit: DEFAULT_PUSH_LIMIT,
            fade_duration: DEFAULT_FADE_DURATION,
            maps_dir: PathBuf::from(DEFAULT_MAPS_DIR),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            max_maps: DEFAULT_MAX_MAPS,
            sfx: DEFAULT_SFX,
            music: DEFAULT_MUSIC,
            fullscreen: DEFAULT_FULLSCREEN,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Defaults, bound to the file at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Movement rules handed to every stage.
    pub fn move_rules(&self) -> MoveRules {
        MoveRules {
            move_duration: self.move_duration,
            push_limit: self.push_limit,
        }
    }

    /// Overlay the values found in the file on top of the current ones.
    ///
    /// Fails only when the file itself cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [game] section
        if let Some(duration) = config.getfloat("game", "move_duration").ok().flatten() {
            if duration > 0.0 {
                self.move_duration = duration as f32;
            }
        }
        if let Some(limit) = config.getuint("game", "push_limit").ok().flatten() {
            self.push_limit = limit as usize;
        }
        if let Some(fade) = config.getfloat("game", "fade_duration").ok().flatten() {
            self.fade_duration = (fade as f32).max(0.0);
        }

        // [paths] section
        if let Some(maps) = config.get("paths", "maps") {
            self.maps_dir = PathBuf::from(maps);
        }
        if let Some(save) = config.get("paths", "save") {
            self.save_path = PathBuf::from(save);
        }
        if let Some(max) = config.getuint("paths", "max_maps").ok().flatten() {
            self.max_maps = max as usize;
        }

        // [audio] section
        if let Some(sfx) = config.getbool("audio", "sfx").ok().flatten() {
            self.sfx = sfx;
        }
        if let Some(music) = config.getbool("audio", "music").ok().flatten() {
            self.music = music;
        }

        // [window] section
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        info!(
            "Loaded config: move={}s push={} fade={}s maps={:?} save={:?} sfx={} music={} fullscreen={}",
            self.move_duration,
            self.push_limit,
            self.fade_duration,
            self.maps_dir,
            self.save_path,
            self.sfx,
            self.music,
            self.fullscreen
        );

        Ok(())
    }

    /// Write every value back, creating the file when needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [game] section
        config.set("game", "move_duration", Some(self.move_duration.to_string()));
        config.set("game", "push_limit", Some(self.push_limit.to_string()));
        config.set("game", "fade_duration", Some(self.fade_duration.to_string()));

        // [paths] section
        config.set("paths", "maps", Some(self.maps_dir.display().to_string()));
        config.set("paths", "save", Some(self.save_path.display().to_string()));
        config.set("paths", "max_maps", Some(self.max_maps.to_string()));

        // [audio] section
        config.set("audio", "sfx", Some(self.sfx.to_string()));
        config.set("audio", "music", Some(self.music.to_string()));

        // [window] section
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
