//! Input polling
//!
//! Pollers turn raw device state into [`InputCommand`]s for the current game
//! state. Key bindings are the poller's business; the core only sees commands.

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, PlayerAction};

/// A request from a player, addressed by 1-based player number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputCommand {
    /// Spend a credit and enter the game
    Join { player: u8 },
    /// Steer or thrust
    Move { player: u8, action: PlayerAction },
    /// Launch a torpedo
    Fire { player: u8 },
}

impl InputCommand {
    /// Whether the command means anything in `state`
    pub fn applies_in(&self, state: GameState) -> bool {
        match self {
            InputCommand::Join { .. } => {
                matches!(state, GameState::TitleScreen | GameState::StageRunning)
            }
            InputCommand::Move { .. } | InputCommand::Fire { .. } => {
                state == GameState::StageRunning
            }
        }
    }
}

/// Source of player commands, polled once per frame
pub trait InputPoller {
    fn poll(&mut self, state: GameState) -> Vec<InputCommand>;
}

/// Replays commands at fixed frame numbers (0 = first poll)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<(u64, InputCommand)>,
    frame: u64,
}

impl ScriptedInput {
    pub fn new(mut script: Vec<(u64, InputCommand)>) -> Self {
        script.sort_by_key(|(frame, _)| *frame);
        Self { script, frame: 0 }
    }

    /// Frames polled so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl InputPoller for ScriptedInput {
    fn poll(&mut self, state: GameState) -> Vec<InputCommand> {
        let frame = self.frame;
        self.frame += 1;

        let mut commands = Vec::new();
        for (_, command) in self.script.iter().filter(|(at, _)| *at == frame) {
            if command.applies_in(state) {
                commands.push(*command);
            } else {
                log::trace!("Dropping {:?} in {}", command, state);
            }
        }
        commands
    }
}
