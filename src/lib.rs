//! Space Arcade - runtime core of a 2D arcade space shooter
//!
//! Core modules:
//! - `sim`: Game state machine, player ship, timers (no rendering)
//! - `platform`: Frame driver and input polling
//! - `game_data`: Ship profiles and gameplay configuration
//! - `headless`: Renderer-free collaborators for demos and tests

pub mod game_data;
pub mod headless;
pub mod platform;
pub mod sim;

pub use game_data::{AssetSource, DataError, GameData, GameDataStore};
pub use sim::{Game, GameState, Player, StageState};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound for a single frame delta (ms). A stalled frame advances
    /// the simulation by at most this much.
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Number of player slots (numbered 1..=NUMBER_OF_PLAYERS)
    pub const NUMBER_OF_PLAYERS: u8 = 2;
    /// Horizontal distance between neighbouring spawn points
    pub const SPAWN_SPACING: f32 = 100.0;
    /// Spawn row offset below the field center
    pub const SPAWN_ROW_OFFSET: f32 = 100.0;

    /// Where inactive ships are parked, far outside the field
    pub const PARKING_POSITION: (f32, f32) = (-1000.0, -1000.0);

    /// Lives granted on activation
    pub const STARTING_LIVES: u32 = 3;

    /// Forward-thrust animation length (ms)
    pub const THRUST_ANIMATION_MS: f32 = 500.0;
    /// Weapon cooldown (ms)
    pub const WEAPON_COOLDOWN_MS: f32 = 500.0;
    /// Extra distance past the hit box at which torpedoes spawn
    pub const MUZZLE_OFFSET: f32 = 30.0;

    /// Ship profile selected on activation
    pub const DEFAULT_SHIP: &str = "default";
}

/// Length of a 2D velocity vector
#[inline]
pub fn calculate_magnitude(vx: f32, vy: f32) -> f32 {
    Vec2::new(vx, vy).length()
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Unit heading for an orientation where 0 points up and angles grow clockwise
/// (screen coordinates, y down).
#[inline]
pub fn heading(orientation: f32) -> Vec2 {
    Vec2::new(orientation.sin(), -orientation.cos())
}
