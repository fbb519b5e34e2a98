//! Game settings and feature flags
//!
//! Embedded in the page as JSON (`<script id="game-config">`), never persisted.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Malformed JSON or unknown field types
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value that parses but cannot drive the game
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameVariant {
    /// Single enemy type, no power-ups, fixed enemy interval
    Classic,
    /// Tiered enemies, power-ups, enemy interval shrinks with level
    #[default]
    Arcade,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Classic => "Classic",
            GameVariant::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "simple" => Some(GameVariant::Classic),
            "arcade" => Some(GameVariant::Arcade),
            _ => None,
        }
    }

    /// Normal/fast/boss enemies instead of a single type
    pub fn enemy_variety(&self) -> bool {
        matches!(self, GameVariant::Arcade)
    }

    /// Falling power-ups that double the score for a while
    pub fn power_ups(&self) -> bool {
        matches!(self, GameVariant::Arcade)
    }

    /// Enemy spawn interval scales with 1/sqrt(level)
    pub fn level_scaling(&self) -> bool {
        matches!(self, GameVariant::Arcade)
    }
}

/// Rendered sizes of every entity type, in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySizes {
    pub player: Vec2,
    pub bullet: Vec2,
    pub enemy: Vec2,
    pub power_up: Vec2,
}

impl Default for EntitySizes {
    fn default() -> Self {
        Self {
            player: Vec2::new(50.0, 50.0),
            bullet: Vec2::new(5.0, 15.0),
            enemy: Vec2::new(40.0, 40.0),
            power_up: Vec2::new(30.0, 30.0),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Variant preset the flags were derived from
    pub variant: GameVariant,

    // === Feature flags ===
    pub enemy_variety: bool,
    pub power_ups: bool,
    pub level_scaling: bool,

    // === Timing ===
    pub bullet_interval_ms: f64,
    pub enemy_interval_ms: f64,
    pub power_up_interval_ms: f64,
    pub multiplier_duration_ms: f64,

    // === Player ===
    pub starting_health: i32,

    // === Presentation ===
    pub sizes: EntitySizes,
    /// Background music volume while playing (0.0 - 1.0)
    pub music_volume: f64,
    /// Background music volume on the game-over screen (0.0 - 1.0)
    pub game_over_volume: f64,

    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(GameVariant::default())
    }
}

impl Settings {
    /// Create settings from a variant preset (applies preset flags)
    pub fn from_preset(variant: GameVariant) -> Self {
        let mut settings = Self {
            variant,
            enemy_variety: false,
            power_ups: false,
            level_scaling: false,
            bullet_interval_ms: BULLET_INTERVAL_MS,
            enemy_interval_ms: ENEMY_BASE_INTERVAL_MS,
            power_up_interval_ms: POWER_UP_INTERVAL_MS,
            multiplier_duration_ms: MULTIPLIER_DURATION_MS,
            starting_health: STARTING_HEALTH,
            sizes: EntitySizes::default(),
            music_volume: 1.0,
            game_over_volume: GAME_OVER_VOLUME,
            seed: None,
        };
        settings.apply_preset(variant);
        settings
    }

    /// Apply a variant preset (updates the feature flags)
    pub fn apply_preset(&mut self, variant: GameVariant) {
        self.variant = variant;
        self.enemy_variety = variant.enemy_variety();
        self.power_ups = variant.power_ups();
        self.level_scaling = variant.level_scaling();
    }

    /// Parse and validate settings from JSON
    ///
    /// Missing fields come from the preset named by `variant` (Arcade when
    /// absent); fields present in the JSON override it one by one.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;

        let settings: Settings = match overrides.as_object() {
            Some(fields) => {
                let variant = match fields.get("variant") {
                    Some(value) => serde_json::from_value(value.clone())?,
                    None => GameVariant::default(),
                };
                let mut merged = serde_json::to_value(Self::from_preset(variant))?;
                if let Some(base) = merged.as_object_mut() {
                    for (key, value) in fields {
                        base.insert(key.clone(), value.clone());
                    }
                }
                serde_json::from_value(merged)?
            }
            None => serde_json::from_value(overrides)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game loop cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let intervals = [
            ("bullet_interval_ms", self.bullet_interval_ms),
            ("enemy_interval_ms", self.enemy_interval_ms),
            ("power_up_interval_ms", self.power_up_interval_ms),
            ("multiplier_duration_ms", self.multiplier_duration_ms),
        ];
        for (field, value) in intervals {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive duration, got {value}"),
                });
            }
        }

        if self.starting_health <= 0 {
            return Err(SettingsError::Invalid {
                field: "starting_health",
                reason: format!("must be positive, got {}", self.starting_health),
            });
        }

        let sizes = [
            ("sizes.player", self.sizes.player),
            ("sizes.bullet", self.sizes.bullet),
            ("sizes.enemy", self.sizes.enemy),
            ("sizes.power_up", self.sizes.power_up),
        ];
        for (field, size) in sizes {
            if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive size, got {size}"),
                });
            }
        }

        Ok(())
    }

    /// Effective music volume (clamped to the media range)
    pub fn effective_music_volume(&self) -> f64 {
        self.music_volume.clamp(0.0, 1.0)
    }

    /// Effective game-over volume (clamped to the media range)
    pub fn effective_game_over_volume(&self) -> f64 {
        self.game_over_volume.clamp(0.0, 1.0)
    }

    /// Id of the page element holding the JSON configuration (used only in wasm32)
    #[allow(dead_code)]
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Load settings embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded {} settings from page", settings.variant.as_str());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring page settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_preset_disables_features() {
        let settings = Settings::from_preset(GameVariant::Classic);
        assert!(!settings.enemy_variety);
        assert!(!settings.power_ups);
        assert!(!settings.level_scaling);
        assert_eq!(settings.starting_health, 100);
    }

    #[test]
    fn test_default_is_arcade() {
        let settings = Settings::default();
        assert_eq!(settings.variant, GameVariant::Arcade);
        assert!(settings.enemy_variety && settings.power_ups && settings.level_scaling);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(GameVariant::from_str("CLASSIC"), Some(GameVariant::Classic));
        assert_eq!(GameVariant::from_str("arcade"), Some(GameVariant::Arcade));
        assert_eq!(GameVariant::from_str("hard"), None);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let settings = Settings::from_json(r#"{ "power_ups": false, "seed": 7 }"#).unwrap();
        assert!(!settings.power_ups);
        assert!(settings.enemy_variety);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.bullet_interval_ms, BULLET_INTERVAL_MS);
    }

    #[test]
    fn test_from_json_variant_sets_flag_defaults() {
        let classic = Settings::from_json(r#"{ "variant": "Classic" }"#).unwrap();
        assert_eq!(classic.variant, GameVariant::Classic);
        assert!(!classic.enemy_variety);
        assert!(!classic.power_ups);
        assert!(!classic.level_scaling);

        let mixed = Settings::from_json(r#"{ "variant": "Classic", "power_ups": true }"#).unwrap();
        assert!(mixed.power_ups);
        assert!(!mixed.enemy_variety);
        assert!(!mixed.level_scaling);

        let arcade = Settings::from_json(r#"{ "variant": "Arcade", "level_scaling": false }"#).unwrap();
        assert!(arcade.enemy_variety && arcade.power_ups);
        assert!(!arcade.level_scaling);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "enemy_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "enemy_interval_ms", .. }));

        let err = Settings::from_json(r#"{ "starting_health": -5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "starting_health", .. }));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = Settings::from_json(r#"{ "variant": "Hard" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = Settings::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_volumes_are_clamped() {
        let mut settings = Settings::default();
        settings.music_volume = 3.0;
        settings.game_over_volume = -1.0;
        assert_eq!(settings.effective_music_volume(), 1.0);
        assert_eq!(settings.effective_game_over_volume(), 0.0);
    }
}
