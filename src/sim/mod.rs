//! Game core
//!
//! Everything that decides what happens in a frame lives here:
//! - The top-level state machine and its elapsed-time clamp
//! - The player ship and its sub-lifecycle
//! - No rendering or platform dependencies; collaborators are traits

pub mod collaborators;
pub mod game;
pub mod object;
pub mod player;
pub mod state;
pub mod timer;

pub use collaborators::{
    Background, DebugOverlay, FrameContext, InGameUi, ObjectFactory, Spawn, Stage, TitleScreen,
};
pub use game::{Collaborators, Game};
pub use object::{Body, Entity, HitBox, SpriteFrame};
pub use player::Player;
pub use state::{
    EngineState, GameObjectKind, GameState, ParticleEffectKind, PlayerAction, StageState,
};
pub use timer::Countdown;
