use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::viewport::{MarginPolicy, Margins};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "vitrine";
const APP_CONFIG_FILE: &str = "config.json";

/// Motion timings and factors from `config.json`. Defaults are the tuned
/// values the interaction was designed around.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub wheel_factor: f64,
    pub wheel_duration_s: f64,
    pub intro_item_duration_s: f64,
    pub intro_stagger_s: f64,
    pub intro_container_duration_s: f64,
    pub zoom_duration_s: f64,
    pub transition_duration_s: f64,
    pub close_delay_s: f64,
    pub content_fade_s: f64,
    pub follower_duration_s: f64,
    pub follower_delay_s: f64,
    /// Horizontal shift of the grid container while a detail is open, in vw.
    pub container_shift_vw: f64,
    /// Resting offset of the detail panel while closed, in vw.
    pub panel_offscreen_vw: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            wheel_factor: 7.0,
            wheel_duration_s: 0.3,
            intro_item_duration_s: 0.6,
            intro_stagger_s: 1.2,
            intro_container_duration_s: 1.2,
            zoom_duration_s: 0.8,
            transition_duration_s: 1.2,
            close_delay_s: 0.3,
            content_fade_s: 0.3,
            follower_duration_s: 0.4,
            follower_delay_s: 0.5,
            container_shift_vw: -33.0,
            panel_offscreen_vw: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub wide_margin_x: f64,
    pub wide_margin_y: f64,
    pub tight_margin_x: f64,
    pub tight_margin_y: f64,
    pub edge_resistance: f64,
    pub inertia: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        let wide = MarginPolicy::Wide.default_margins();
        let tight = MarginPolicy::Tight.default_margins();
        Self {
            wide_margin_x: wide.x,
            wide_margin_y: wide.y,
            tight_margin_x: tight.x,
            tight_margin_y: tight.y,
            edge_resistance: 0.9,
            inertia: true,
        }
    }
}

impl InteractionConfig {
    pub fn margins(&self, policy: MarginPolicy) -> Margins {
        match policy {
            MarginPolicy::Wide => Margins::new(self.wide_margin_x, self.wide_margin_y),
            MarginPolicy::Tight => Margins::new(self.tight_margin_x, self.tight_margin_y),
        }
    }
}

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub motion: MotionConfig,
    pub interaction: InteractionConfig,
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
