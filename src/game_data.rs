//! Gameplay configuration: ship profiles and session settings
//!
//! Loaded from a camelCase JSON document. The state machine only reads it
//! through [`AssetSource`], which also reports loading progress.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SHIP;
use crate::sim::ParticleEffectKind;
use crate::sim::object::HitBox;

/// Game data shipped with the binary
pub const DEFAULT_GAME_DATA: &str = include_str!("../assets/game_data.json");

/// What a ship does when it reaches the edge of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryHandling {
    #[default]
    Wrap,
    Bounce,
    Stop,
}

/// Errors raised while loading or querying game data
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    Io { path: String, message: String },
    Parse(String),
    MissingShip(String),
    Invalid { field: &'static str, message: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse(message) => write!(f, "malformed game data: {message}"),
            Self::MissingShip(name) => write!(f, "no ship profile named '{name}'"),
            Self::Invalid { field, message } => write!(f, "invalid {field}: {message}"),
        }
    }
}

impl std::error::Error for DataError {}

/// Session-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Credits granted at startup and after completing the game
    pub initial_credits: i32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self { initial_credits: 3 }
    }
}

/// Settings shared by all player ships
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSettings {
    #[serde(default)]
    pub boundary_handling_setting: BoundaryHandling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitBoxProfile {
    pub size: f32,
    #[serde(default)]
    pub x_offset: f32,
    #[serde(default)]
    pub y_offset: f32,
}

impl From<HitBoxProfile> for HitBox {
    fn from(profile: HitBoxProfile) -> Self {
        HitBox {
            size: profile.size,
            offset: Vec2::new(profile.x_offset, profile.y_offset),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleEffects {
    #[serde(default)]
    pub explosion: ParticleEffectKind,
}

/// Performance figures of one ship type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipProfile {
    pub hit_points: i32,
    /// pixels / second
    pub max_speed: f32,
    /// Velocity added per thrust input (pixels / second)
    pub thrust: f32,
    pub max_angular_speed: f32,
    /// Degrees turned per yaw input
    pub yaw_speed: f32,
    pub width: f32,
    pub height: f32,
    /// Coefficient of restitution for boundary bounces
    #[serde(default = "default_cor")]
    pub cor: f32,
    pub hit_box: HitBoxProfile,
    #[serde(default)]
    pub particle_effects: ParticleEffects,
}

fn default_cor() -> f32 {
    1.0
}

impl Default for ShipProfile {
    fn default() -> Self {
        Self {
            hit_points: 100,
            max_speed: 400.0,
            thrust: 12.0,
            max_angular_speed: 0.0,
            yaw_speed: 5.0,
            width: 64.0,
            height: 64.0,
            cor: 0.8,
            hit_box: HitBoxProfile {
                size: 40.0,
                x_offset: 0.0,
                y_offset: -15.0,
            },
            particle_effects: ParticleEffects::default(),
        }
    }
}

/// All gameplay data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub player: PlayerSettings,
    pub player_ships: BTreeMap<String, ShipProfile>,
}

impl Default for GameData {
    fn default() -> Self {
        let mut player_ships = BTreeMap::new();
        player_ships.insert(DEFAULT_SHIP.to_string(), ShipProfile::default());
        Self {
            general: GeneralSettings::default(),
            player: PlayerSettings::default(),
            player_ships,
        }
    }
}

impl GameData {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let data: GameData =
            serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), DataError> {
        if self.general.initial_credits < 0 {
            return Err(DataError::Invalid {
                field: "general.initialCredits",
                message: format!("{} is negative", self.general.initial_credits),
            });
        }
        self.ship(DEFAULT_SHIP)?;
        for (name, ship) in &self.player_ships {
            if ship.hit_points <= 0 {
                return Err(DataError::Invalid {
                    field: "playerShips.hitPoints",
                    message: format!("ship '{name}' has {} hit points", ship.hit_points),
                });
            }
            if ship.max_speed < 0.0 || ship.thrust < 0.0 {
                return Err(DataError::Invalid {
                    field: "playerShips.maxSpeed",
                    message: format!("ship '{name}' has negative speed figures"),
                });
            }
        }
        Ok(())
    }

    pub fn ship(&self, name: &str) -> Result<&ShipProfile, DataError> {
        self.player_ships
            .get(name)
            .ok_or_else(|| DataError::MissingShip(name.to_string()))
    }
}

/// Read-only view of the game data plus its loading progress
pub trait AssetSource {
    fn is_all_files_loaded(&self) -> bool;
    fn is_loading_error(&self) -> bool;
    /// Available once loading finished successfully
    fn game_data(&self) -> Option<&GameData>;
}

#[derive(Debug, Clone)]
enum LoadStatus {
    Pending,
    Loaded(GameData),
    Failed(DataError),
}

/// In-memory [`AssetSource`]
#[derive(Debug, Clone)]
pub struct GameDataStore {
    status: LoadStatus,
}

impl GameDataStore {
    /// A store whose data has not arrived yet
    pub fn pending() -> Self {
        Self {
            status: LoadStatus::Pending,
        }
    }

    pub fn loaded(data: GameData) -> Self {
        Self {
            status: LoadStatus::Loaded(data),
        }
    }

    /// Parse `json`, recording a failure instead of returning it
    pub fn from_json(json: &str) -> Self {
        let mut store = Self::pending();
        store.finish_json(json);
        store
    }

    /// Complete a pending load with a JSON document
    pub fn finish_json(&mut self, json: &str) {
        self.status = match GameData::from_json(json) {
            Ok(data) => {
                log::info!("Loaded {} ship profile(s)", data.player_ships.len());
                LoadStatus::Loaded(data)
            }
            Err(err) => {
                log::error!("Game data rejected: {}", err);
                LoadStatus::Failed(err)
            }
        };
    }

    /// Load from a file on disk (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) => {
                let err = DataError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                };
                log::error!("{}", err);
                Self {
                    status: LoadStatus::Failed(err),
                }
            }
        }
    }

    pub fn error(&self) -> Option<&DataError> {
        match &self.status {
            LoadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl AssetSource for GameDataStore {
    fn is_all_files_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded(_))
    }

    fn is_loading_error(&self) -> bool {
        matches!(self.status, LoadStatus::Failed(_))
    }

    fn game_data(&self) -> Option<&GameData> {
        match &self.status {
            LoadStatus::Loaded(data) => Some(data),
            _ => None,
        }
    }
}
