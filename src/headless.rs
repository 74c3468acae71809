//! Renderer-free collaborators
//!
//! Lets the core run natively without a window: the HUD is a key/value board,
//! drawing is logged at trace level, spawns are recorded. Handles that share
//! state (`HeadlessUi`, `SpawnLog`) can be cloned before handing one copy to
//! the game so the other can be inspected.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, NUMBER_OF_PLAYERS};
use crate::game_data::GameDataStore;
use crate::platform::InputPoller;
use crate::sim::{
    Background, Collaborators, DebugOverlay, Entity, FrameContext, Game, GameObjectKind,
    InGameUi, ObjectFactory, ParticleEffectKind, Player, Spawn, SpriteFrame, Stage, StageState,
    TitleScreen,
};

/// Seed for the starfield of headless sessions
const STARFIELD_SEED: u64 = 0x5EED;

/// A game wired to headless collaborators, with inspection handles
pub struct HeadlessSession {
    pub game: Game,
    pub hud: HeadlessUi,
    pub spawns: SpawnLog,
}

impl HeadlessSession {
    pub fn new(
        assets: GameDataStore,
        input: impl InputPoller + 'static,
        stage: ArenaStage,
    ) -> Self {
        let hud = HeadlessUi::new();
        let spawns = SpawnLog::new();
        let game = Game::new(Collaborators {
            stage: Box::new(stage),
            input: Box::new(input),
            assets: Box::new(assets),
            factory: Box::new(spawns.clone()),
            in_game_ui: Box::new(hud.clone()),
            debug_overlay: Box::new(FrameStats::new()),
            title_screen: Box::new(PlainTitleScreen),
            background: Box::new(Starfield::new(STARFIELD_SEED)),
        });
        Self { game, hud, spawns }
    }
}

/// HUD that stores published values
#[derive(Debug, Clone, Default)]
pub struct HeadlessUi {
    board: Rc<RefCell<BTreeMap<String, i64>>>,
    elapsed: f32,
}

impl HeadlessUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `key`
    pub fn information(&self, key: &str) -> Option<i64> {
        self.board.borrow().get(key).copied()
    }

    /// Time the HUD has been updated for (ms)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl InGameUi for HeadlessUi {
    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    fn draw(&mut self) {
        log::trace!("hud {:?}", self.board.borrow());
    }

    fn update_information(&mut self, key: &str, value: i64) {
        self.board.borrow_mut().insert(key.to_string(), value);
    }
}

/// Number of frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Debug overlay tracking frame rate
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    fps: u32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            fps: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl DebugOverlay for FrameStats {
    fn update(&mut self, dt: f32) {
        if self.frame_times.len() == FPS_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        let elapsed: f32 = self.frame_times.iter().sum();
        if elapsed > 0.0 {
            self.fps = (self.frame_times.len() as f32 * 1000.0 / elapsed).round() as u32;
        }
    }

    fn draw(&mut self) {
        log::trace!("fps {}", self.fps);
    }
}

/// A background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub brightness: f32,
    pub size: f32,
}

/// Seeded starfield background
#[derive(Debug, Clone)]
pub struct Starfield {
    seed: u64,
    count: usize,
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            count: 200,
            stars: Vec::new(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

impl Background for Starfield {
    fn fill_starfield(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        self.stars = (0..self.count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..FIELD_WIDTH),
                    rng.random_range(0.0..FIELD_HEIGHT),
                ),
                brightness: rng.random_range(0.2..1.0),
                size: rng.random_range(0.5..2.0),
            })
            .collect();
    }

    fn draw(&mut self) {
        log::trace!("starfield with {} stars", self.stars.len());
    }
}

/// Title overlay that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTitleScreen;

impl TitleScreen for PlainTitleScreen {
    fn draw(&mut self) {
        log::trace!("title screen");
    }
}

/// Object factory that records what it was asked to spawn
#[derive(Debug, Clone, Default)]
pub struct SpawnLog {
    spawns: Rc<RefCell<Vec<Spawn>>>,
}

impl SpawnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawns(&self) -> Vec<Spawn> {
        self.spawns.borrow().clone()
    }

    pub fn torpedo_count(&self) -> usize {
        self.spawns
            .borrow()
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    Spawn::Object {
                        kind: GameObjectKind::Torpedo,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn effect_count(&self) -> usize {
        self.spawns
            .borrow()
            .iter()
            .filter(|s| matches!(s, Spawn::Effect { .. }))
            .count()
    }
}

impl ObjectFactory for SpawnLog {
    fn generate_torpedo(&mut self, x: f32, y: f32, orientation: f32) {
        self.spawns.borrow_mut().push(Spawn::Object {
            kind: GameObjectKind::Torpedo,
            x,
            y,
            orientation,
        });
    }

    fn generate_particle_effect(&mut self, x: f32, y: f32, effect: ParticleEffectKind) {
        self.spawns.borrow_mut().push(Spawn::Effect { effect, x, y });
    }
}

/// Minimal stage: an empty arena hosting the player roster.
///
/// Stage 0 is the attract stage and never ends. Play stages end with
/// `GameOverEnded` once nobody is left, or `CompletedEnded` after their
/// duration if one is set.
#[derive(Debug, Clone)]
pub struct ArenaStage {
    players: Vec<Player>,
    stage_number: u32,
    state: StageState,
    elapsed: f32,
    duration: Option<f32>,
    sprites: Vec<SpriteFrame>,
}

impl Default for ArenaStage {
    fn default() -> Self {
        Self::new(NUMBER_OF_PLAYERS, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }
}

impl ArenaStage {
    pub fn new(player_count: u8, field: Vec2) -> Self {
        let players = (1..=player_count)
            .map(|number| Player::new(number, player_count, field))
            .collect();
        Self {
            players,
            stage_number: 0,
            state: StageState::Loaded,
            elapsed: 0.0,
            duration: None,
            sprites: Vec::new(),
        }
    }

    /// End play stages after `ms` milliseconds
    pub fn with_stage_duration(mut self, ms: f32) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn stage_number(&self) -> u32 {
        self.stage_number
    }

    /// Sprites emitted by the last draw
    pub fn sprites(&self) -> &[SpriteFrame] {
        &self.sprites
    }
}

impl Stage for ArenaStage {
    fn load_stage(&mut self, number: u32) {
        self.stage_number = number;
        self.state = StageState::Loaded;
        self.elapsed = 0.0;
        log::debug!("Arena stage {} loaded", number);
    }

    fn start_stage(&mut self) {
        self.state = StageState::Running;
    }

    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'_>) {
        for player in &mut self.players {
            player.update(dt, ctx);
        }
        self.elapsed += dt;

        if self.state != StageState::Running || self.stage_number == 0 {
            return;
        }
        if !self.players.iter().any(|p| p.is_active()) {
            self.state = StageState::GameOverEnded;
        } else if self.duration.is_some_and(|d| self.elapsed >= d) {
            self.state = StageState::CompletedEnded;
        }
    }

    fn draw(&mut self) {
        self.sprites.clear();
        for player in &self.players {
            player.draw(&mut self.sprites);
        }
        log::trace!("stage {} drew {} sprite(s)", self.stage_number, self.sprites.len());
    }

    fn stage_state(&self) -> StageState {
        self.state
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
}
