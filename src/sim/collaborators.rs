//! Interfaces the core drives but does not implement
//!
//! Rendering, stage content and spawning live behind these traits. The
//! state machine owns one boxed implementation of each for the session.

use super::player::Player;
use super::state::{GameObjectKind, ParticleEffectKind, StageState};

/// Spawns short-lived objects. Calls are fire-and-forget.
pub trait ObjectFactory {
    fn generate_torpedo(&mut self, x: f32, y: f32, orientation: f32);
    fn generate_particle_effect(&mut self, x: f32, y: f32, effect: ParticleEffectKind);
}

/// In-game HUD
pub trait InGameUi {
    fn update(&mut self, dt: f32);
    fn draw(&mut self);
    /// Publish a value under a dotted key such as `credits` or `player1.lives`
    fn update_information(&mut self, key: &str, value: i64);
}

/// Diagnostics overlay
pub trait DebugOverlay {
    fn update(&mut self, dt: f32);
    fn draw(&mut self);
}

/// Title screen overlay
pub trait TitleScreen {
    fn draw(&mut self);
}

/// Static background layer
pub trait Background {
    /// Populate the background once at startup
    fn fill_starfield(&mut self);
    fn draw(&mut self);
}

/// Stage content: enemies, torpedoes and the player roster
pub trait Stage {
    fn load_stage(&mut self, number: u32);
    fn start_stage(&mut self);
    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'_>);
    fn draw(&mut self);
    fn stage_state(&self) -> StageState;
    /// Fixed-size roster; player `n` lives at index `n - 1`
    fn players(&self) -> &[Player];
    fn players_mut(&mut self) -> &mut [Player];
}

/// Collaborators an entity may call while updating
pub struct FrameContext<'a> {
    pub factory: &'a mut dyn ObjectFactory,
    pub ui: &'a mut dyn InGameUi,
}

/// A spawn request recorded by [`SpawnLog`](crate::headless::SpawnLog)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Object {
        kind: GameObjectKind,
        x: f32,
        y: f32,
        orientation: f32,
    },
    Effect {
        effect: ParticleEffectKind,
        x: f32,
        y: f32,
    },
}
