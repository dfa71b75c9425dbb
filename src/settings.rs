//! Page settings
//!
//! Read once from a JSON block embedded in the page
//! (`<script id="portfolio-settings" type="application/json">`). Nothing is
//! ever written back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element holding the settings JSON
pub const SETTINGS_ELEMENT_ID: &str = "portfolio-settings";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("particle area must be positive, got {0}")]
    ParticleArea(f32),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Background particle cap for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 120,
            QualityPreset::High => 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Spark bursts on hits and impacts
    pub effects: bool,
    /// Disables sparks and freezes the background
    pub reduced_motion: bool,
    /// Surface pixels per background particle
    pub particle_area: f32,
    /// Viewport width (CSS px) below which the compact layout is used
    pub compact_breakpoint: f32,
    /// GET endpoint returning a joke as plain text
    pub joke_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            effects: true,
            reduced_motion: false,
            particle_area: crate::consts::PARTICLE_AREA,
            compact_breakpoint: 1024.0,
            joke_endpoint: "https://icanhazdadjoke.com/".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        if !(settings.particle_area > 0.0) {
            return Err(SettingsError::ParticleArea(settings.particle_area));
        }
        Ok(settings)
    }

    /// Sparks are shown
    pub fn effective_effects(&self) -> bool {
        self.effects && !self.reduced_motion
    }

    /// Background particles move
    pub fn animate_background(&self) -> bool {
        !self.reduced_motion
    }

    pub fn is_compact(&self, viewport_width: f32) -> bool {
        viewport_width < self.compact_breakpoint
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings (quality {})", settings.quality.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring page settings: {}", e);
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
