//! Level configuration loaded from YAML.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use dodgecoin_stream::{ArchetypeSet, ConfigurationError, RoomArchetype, StreamConfig};

/// Errors from loading or validating a level configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid level: {0}")]
    Level(#[from] ConfigurationError),
    #[error("invalid {section}.{field}: {value}")]
    Invalid {
        section: &'static str,
        field: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second.
    pub speed: f32,
    pub size: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 300.0,
            size: 32.0,
        }
    }
}

impl PlayerConfig {
    pub fn extent(&self) -> Vec2 {
        Vec2::splat(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub size: f32,
    /// Units per second once the coin starts moving.
    pub speed: f32,
    /// Per-frame chance that a wave of coins spawns.
    pub spawn_chance: f64,
    /// Seconds a coin waits before it starts moving.
    pub stationary_secs: f32,
    /// Distance from a room's edges that spawn points keep.
    pub spawn_margin: f32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            size: 24.0,
            speed: 200.0,
            spawn_chance: 0.02,
            stationary_secs: 3.0,
            spawn_margin: 50.0,
        }
    }
}

impl CoinConfig {
    pub fn extent(&self) -> Vec2 {
        Vec2::splat(self.size)
    }
}

/// Everything needed to run a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub stream: StreamConfig,
    pub archetypes: ArchetypeSet,
    pub player: PlayerConfig,
    pub coins: CoinConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            archetypes: ArchetypeSet::new(vec![RoomArchetype::default()]),
            player: PlayerConfig::default(),
            coins: CoinConfig::default(),
        }
    }
}

impl LevelConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), archetypes = config.archetypes.len(), "level config loaded");
        Ok(config)
    }

    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stream.validate()?;
        let cell = self.archetypes.validate()?;

        let positive = |v: f32| v.is_finite() && v > 0.0;
        let checks = [
            ("player", "speed", self.player.speed, positive(self.player.speed)),
            ("player", "size", self.player.size, positive(self.player.size)),
            ("coins", "size", self.coins.size, positive(self.coins.size)),
            ("coins", "speed", self.coins.speed, positive(self.coins.speed)),
            (
                "coins",
                "stationary_secs",
                self.coins.stationary_secs,
                self.coins.stationary_secs.is_finite() && self.coins.stationary_secs >= 0.0,
            ),
            (
                "coins",
                "spawn_margin",
                self.coins.spawn_margin,
                self.coins.spawn_margin >= 0.0 && 2.0 * self.coins.spawn_margin < cell.min_element(),
            ),
        ];
        for (section, field, value, ok) in checks {
            if !ok {
                return Err(ConfigError::Invalid {
                    section,
                    field,
                    value: value as f64,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.coins.spawn_chance) {
            return Err(ConfigError::Invalid {
                section: "coins",
                field: "spawn_chance",
                value: self.coins.spawn_chance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodgecoin_stream::RegenerationPolicy;

    #[test]
    fn defaults_validate() {
        let config = LevelConfig::default();
        config.validate().unwrap();
        assert_eq!(config.stream.radius, 2);
        assert_eq!(config.player.speed, 300.0);
        assert_eq!(config.coins.spawn_chance, 0.02);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
stream:
  radius: 1
  regeneration: latest
archetypes:
  - name: hall
    width: 400
    height: 400
  - name: vault
    width: 400
    height: 400
    doors: { left: false, right: true, up: true, down: true }
"#;
        let config = LevelConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.stream.radius, 1);
        assert_eq!(config.stream.regeneration, RegenerationPolicy::Latest);
        assert_eq!(config.archetypes.len(), 2);
        let vault = config.archetypes.iter().nth(1).unwrap();
        assert!(!vault.doors.left);
        assert_eq!(vault.wall_thickness, 20.0);
        assert!(vault.trigger.is_some());
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn empty_archetype_list_is_rejected() {
        let err = LevelConfig::from_yaml_str("archetypes: []\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Level(ConfigurationError::EmptyArchetypeSet)
        ));
    }

    #[test]
    fn huge_radius_is_rejected() {
        let err = LevelConfig::from_yaml_str("stream:\n  radius: 100000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Level(ConfigurationError::RadiusTooLarge { radius: 100000, .. })
        ));
    }

    #[test]
    fn bad_spawn_chance_is_rejected() {
        let err = LevelConfig::from_yaml_str("coins:\n  spawn_chance: 2.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "spawn_chance",
                ..
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = LevelConfig::from_yaml_str("stream: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip() {
        let config = LevelConfig::default();
        let text = config.to_yaml_string().unwrap();
        assert_eq!(LevelConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut config = LevelConfig::default();
        config.stream.radius = 3;
        config.save(tmp.path()).unwrap();

        let loaded = LevelConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.stream.radius, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LevelConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
