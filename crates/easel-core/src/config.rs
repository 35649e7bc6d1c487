//! Editor preferences consumed by the interaction and drawing code.
//!
//! The interaction core reads only `align_handle`; the remaining fields
//! parameterise handle drawing and hit testing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EaselError, Result};

/// Hover radius around points and handle tips, in screen pixels.
pub const DEFAULT_HOVER_RADIUS_PX: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Mirror a dragged Bezier handle onto the handle across the joint
    pub align_handle: bool,
    /// Draw handles at all
    pub show_handle: bool,
    pub hover_radius_px: f64,
    pub handle_thickness: f32,
    pub root_radius: f32,
    pub tip_radius: f32,
    pub tip_thickness: f32,
    /// Stop handle lines at the tip circle instead of its centre
    pub cutoff_line: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            align_handle: true,
            show_handle: true,
            hover_radius_px: DEFAULT_HOVER_RADIUS_PX,
            handle_thickness: 2.0,
            root_radius: 2.5,
            tip_radius: 5.0,
            tip_thickness: 1.5,
            cutoff_line: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EaselError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EaselError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_toml_str(&text) {
                Ok(config) => {
                    log::info!("Config loaded from: {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Config file is malformed, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_toml_string()?;
        std::fs::write(path, text)?;
        log::info!("Config saved to: {}", path.display());
        Ok(())
    }
}
