//! State tags shared by the state machine, the stage and the entities

use serde::{Deserialize, Serialize};

/// Top-level phase of the game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for game data to finish loading
    Loading,
    /// Attract mode, waiting for a player to join
    TitleScreen,
    /// Loading the current stage (lasts exactly one frame)
    StageLoading,
    /// Stage in progress
    StageRunning,
    /// Stage cleared, advancing to the next one
    StageEnded,
    /// All players out of lives
    GameOver,
    /// Final stage cleared
    GameCompleted,
    /// Reserved for highscore entry
    EnterHighscore,
}

impl GameState {
    /// All states in ordinal order
    pub const ALL: [GameState; 8] = [
        GameState::Loading,
        GameState::TitleScreen,
        GameState::StageLoading,
        GameState::StageRunning,
        GameState::StageEnded,
        GameState::GameOver,
        GameState::GameCompleted,
        GameState::EnterHighscore,
    ];

    /// Number of states
    pub const COUNT: usize = Self::ALL.len();

    /// Ordinal of this state
    pub fn index(self) -> usize {
        self as usize
    }

    /// State for an ordinal, `None` outside `0..COUNT`
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Loading => "LOADING",
            GameState::TitleScreen => "TITLESCREEN",
            GameState::StageLoading => "STAGE_LOADING",
            GameState::StageRunning => "STAGE_RUNNING",
            GameState::StageEnded => "STAGE_ENDED",
            GameState::GameOver => "GAME_OVER",
            GameState::GameCompleted => "GAME_COMPLETED",
            GameState::EnterHighscore => "ENTER_HIGHSCORE",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress signal reported by the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageState {
    /// Loaded but not started
    #[default]
    Loaded,
    /// Gameplay in progress
    Running,
    /// Stage cleared and its outro finished
    CompletedEnded,
    /// Every player is out and the game-over outro finished
    GameOverEnded,
}

/// Ship control actions (one per `move_ship` call)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    ThrustForward,
    YawLeft,
    YawRight,
    ReduceSpeed,
}

/// Engine sprite state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    NoThrust,
    Thrust,
}

/// Particle effect kinds the object factory can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticleEffectKind {
    #[default]
    PurpleExplosion,
    OrangeExplosion,
    BlueExplosion,
}

/// Kind tag for game objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameObjectKind {
    Player,
    Torpedo,
}
