//! Top-level game state machine
//!
//! One `on_frame` call per display frame: clamp the elapsed time, apply
//! input, update then draw whatever the current state shows, and decide the
//! next state.

use super::collaborators::{
    Background, DebugOverlay, FrameContext, InGameUi, ObjectFactory, Stage, TitleScreen,
};
use super::state::{GameState, StageState};
use crate::consts::MAX_FRAME_DELTA_MS;
use crate::game_data::AssetSource;
use crate::platform::driver::{FrameTarget, NextFrame};
use crate::platform::input::{InputCommand, InputPoller};

/// Everything the state machine drives, handed over at construction
pub struct Collaborators {
    pub stage: Box<dyn Stage>,
    pub input: Box<dyn InputPoller>,
    pub assets: Box<dyn AssetSource>,
    pub factory: Box<dyn ObjectFactory>,
    pub in_game_ui: Box<dyn InGameUi>,
    pub debug_overlay: Box<dyn DebugOverlay>,
    pub title_screen: Box<dyn TitleScreen>,
    pub background: Box<dyn Background>,
}

/// The session root
pub struct Game {
    state: GameState,
    previous_timestamp: f64,
    current_stage_number: u32,
    credits: i32,
    initial_credits: i32,
    halted: bool,
    stage: Box<dyn Stage>,
    input: Box<dyn InputPoller>,
    assets: Box<dyn AssetSource>,
    factory: Box<dyn ObjectFactory>,
    in_game_ui: Box<dyn InGameUi>,
    debug_overlay: Box<dyn DebugOverlay>,
    title_screen: Box<dyn TitleScreen>,
}

impl Game {
    /// Start a session in `Loading`. Paints the background once (it is not
    /// redrawn afterwards) and loads the attract-mode stage.
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            mut stage,
            input,
            assets,
            factory,
            in_game_ui,
            debug_overlay,
            title_screen,
            mut background,
        } = collaborators;

        background.fill_starfield();
        background.draw();
        stage.load_stage(0);

        Self {
            state: GameState::Loading,
            previous_timestamp: 0.0,
            current_stage_number: 0,
            credits: -1,
            initial_credits: -1,
            halted: false,
            stage,
            input,
            assets,
            factory,
            in_game_ui,
            debug_overlay,
            title_screen,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        if state != self.state {
            log::debug!("Game state {} -> {}", self.state, state);
        }
        self.state = state;
    }

    /// Set the state by ordinal. Out-of-range ordinals are ignored.
    pub fn set_state_index(&mut self, index: i64) {
        match GameState::from_index(index) {
            Some(state) => self.set_state(state),
            None => log::warn!("Ignoring invalid game state {}", index),
        }
    }

    pub fn credits(&self) -> i32 {
        self.credits
    }

    pub fn set_credits(&mut self, value: i32) {
        self.credits = value;
        self.in_game_ui
            .update_information("credits", i64::from(self.credits));
    }

    pub fn initial_credits(&self) -> i32 {
        self.initial_credits
    }

    pub fn current_stage_number(&self) -> u32 {
        self.current_stage_number
    }

    /// Stage loaded on the next `StageLoading` frame
    pub fn set_current_stage_number(&mut self, number: u32) {
        self.current_stage_number = number;
    }

    /// True once a loading error stopped the session
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn previous_timestamp(&self) -> f64 {
        self.previous_timestamp
    }

    pub fn stage(&self) -> &dyn Stage {
        self.stage.as_ref()
    }

    pub fn stage_mut(&mut self) -> &mut dyn Stage {
        self.stage.as_mut()
    }

    /// Spend a credit to bring player `player_number` (1-based) into the game
    pub fn join_player(&mut self, player_number: u8) {
        if self.credits <= 0 {
            log::debug!("Player {} cannot join: no credits", player_number);
            return;
        }
        let Some(index) = player_index(player_number, self.stage.players().len()) else {
            log::warn!("Ignoring join for unknown player {}", player_number);
            return;
        };
        let Some(data) = self.assets.game_data() else {
            log::warn!("Player {} cannot join before game data loads", player_number);
            return;
        };

        let player = &mut self.stage.players_mut()[index];
        if let Err(err) = player.activate(data, self.in_game_ui.as_mut()) {
            log::error!("Player {} failed to join: {}", player_number, err);
            return;
        }
        player.reset_position();

        self.credits -= 1;
        self.in_game_ui
            .update_information("credits", i64::from(self.credits));
    }

    /// Advance one frame. `timestamp` is in milliseconds and increases
    /// monotonically between calls.
    pub fn on_frame(&mut self, timestamp: f64) -> NextFrame {
        // Entities work in f32 ms
        let dt = self.advance_clock(timestamp) as f32;

        let commands = self.input.poll(self.state);
        for command in commands {
            self.apply_input(command);
        }

        match self.state {
            GameState::Loading => self.tick_loading(),
            GameState::TitleScreen => self.tick_title_screen(dt),
            GameState::StageLoading => self.tick_stage_loading(dt),
            GameState::StageRunning => self.tick_stage_running(dt),
            GameState::StageEnded => self.tick_stage_ended(dt),
            GameState::GameOver => self.tick_game_over(dt),
            GameState::GameCompleted => self.tick_game_completed(dt),
            // Reserved, nothing to do yet
            GameState::EnterHighscore => {}
        }

        NextFrame::after(timestamp)
    }

    /// Elapsed time since the previous frame, capped at `MAX_FRAME_DELTA_MS`
    fn advance_clock(&mut self, timestamp: f64) -> f64 {
        let elapsed = (timestamp - self.previous_timestamp).min(MAX_FRAME_DELTA_MS);
        self.previous_timestamp = timestamp;
        elapsed
    }

    fn apply_input(&mut self, command: InputCommand) {
        match command {
            InputCommand::Join { player } => self.join_player(player),
            InputCommand::Move { player, action } => {
                let len = self.stage.players().len();
                if let Some(index) = player_index(player, len) {
                    let ship = &mut self.stage.players_mut()[index];
                    if ship.is_active() {
                        ship.move_ship(action);
                    }
                }
            }
            InputCommand::Fire { player } => {
                let len = self.stage.players().len();
                let stage_state = self.stage.stage_state();
                if let Some(index) = player_index(player, len) {
                    let ship = &mut self.stage.players_mut()[index];
                    if ship.is_active() {
                        ship.fire(stage_state, self.factory.as_mut());
                    }
                }
            }
        }
    }

    fn frame_context(&mut self) -> (&mut dyn Stage, FrameContext<'_>) {
        (
            self.stage.as_mut(),
            FrameContext {
                factory: self.factory.as_mut(),
                ui: self.in_game_ui.as_mut(),
            },
        )
    }

    fn tick_loading(&mut self) {
        if self.halted {
            return;
        }
        if self.assets.is_loading_error() {
            log::error!("Loading error. Execution halted.");
            self.halted = true;
            return;
        }
        log::trace!("loading");
        if self.assets.is_all_files_loaded() {
            self.initialise();
            self.set_state(GameState::TitleScreen);
        }
    }

    /// Snapshot configuration once game data is available
    fn initialise(&mut self) {
        let initial = match self.assets.game_data() {
            Some(data) => data.general.initial_credits,
            None => {
                log::warn!("Game data missing after load, starting without credits");
                0
            }
        };
        self.initial_credits = initial;
        self.set_credits(initial);
        log::info!("Game data ready, {} credit(s)", initial);
    }

    fn tick_title_screen(&mut self, dt: f32) {
        let (stage, mut ctx) = self.frame_context();
        stage.update(dt, &mut ctx);
        self.debug_overlay.update(dt);

        self.title_screen.draw();
        self.debug_overlay.draw();
        self.stage.draw();

        if self.stage.players().iter().any(|p| p.is_active()) {
            self.set_current_stage_number(1);
            self.set_state(GameState::StageLoading);
        }
    }

    fn tick_stage_loading(&mut self, dt: f32) {
        self.stage.load_stage(self.current_stage_number);
        self.stage.start_stage();
        log::info!("Stage {} started", self.current_stage_number);
        self.in_game_ui.update(dt);
        self.debug_overlay.update(dt);

        self.in_game_ui.draw();
        self.debug_overlay.draw();

        self.set_state(GameState::StageRunning);
    }

    fn tick_stage_running(&mut self, dt: f32) {
        let (stage, mut ctx) = self.frame_context();
        stage.update(dt, &mut ctx);
        self.in_game_ui.update(dt);
        self.debug_overlay.update(dt);

        self.stage.draw();
        self.in_game_ui.draw();
        self.debug_overlay.draw();

        match self.stage.stage_state() {
            StageState::CompletedEnded => self.set_state(GameState::StageEnded),
            StageState::GameOverEnded => self.set_state(GameState::GameOver),
            StageState::Loaded | StageState::Running => {}
        }
    }

    fn tick_stage_ended(&mut self, dt: f32) {
        self.debug_overlay.update(dt);
        self.debug_overlay.draw();

        // TODO: go to GameCompleted once stages report a final one
        self.current_stage_number += 1;
        self.set_state(GameState::StageLoading);
    }

    fn tick_game_over(&mut self, dt: f32) {
        self.debug_overlay.update(dt);
        self.debug_overlay.draw();

        log::info!("Game over");
        self.current_stage_number = 0;
        self.stage.load_stage(self.current_stage_number);
        self.set_state(GameState::TitleScreen);
    }

    fn tick_game_completed(&mut self, dt: f32) {
        self.debug_overlay.update(dt);
        self.debug_overlay.draw();

        log::debug!("Game completed");
        self.set_credits(self.initial_credits);
    }
}

impl FrameTarget for Game {
    fn on_frame(&mut self, timestamp: f64) -> NextFrame {
        Game::on_frame(self, timestamp)
    }
}

/// Roster index for a 1-based player number
fn player_index(player_number: u8, roster_len: usize) -> Option<usize> {
    let index = usize::from(player_number.checked_sub(1)?);
    (index < roster_len).then_some(index)
}
