use std::cell::Cell;
use std::rc::Rc;

use space_arcade::game_data::{AssetSource, GameData, GameDataStore};
use space_arcade::headless::{
    ArenaStage, FrameStats, HeadlessSession, HeadlessUi, PlainTitleScreen, SpawnLog, Starfield,
};
use space_arcade::platform::{FrameDriver, InputCommand, ManualClock, ScriptedInput};
use space_arcade::sim::{Collaborators, Game, GameState, PlayerAction, StageState};

/// Game data that becomes available when the test flips a switch
struct DeferredAssets {
    data: GameData,
    ready: Rc<Cell<bool>>,
}

impl AssetSource for DeferredAssets {
    fn is_all_files_loaded(&self) -> bool {
        self.ready.get()
    }

    fn is_loading_error(&self) -> bool {
        false
    }

    fn game_data(&self) -> Option<&GameData> {
        self.ready.get().then_some(&self.data)
    }
}

fn joined_session(stage: ArenaStage) -> (HeadlessSession, FrameDriver<ManualClock>) {
    let input = ScriptedInput::new(vec![(1, InputCommand::Join { player: 1 })]);
    let mut session =
        HeadlessSession::new(GameDataStore::loaded(GameData::default()), input, stage);
    let mut driver = FrameDriver::new(ManualClock::new(16.0));
    driver.run_frames(&mut session.game, 3);
    assert_eq!(session.game.state(), GameState::StageRunning);
    (session, driver)
}

#[test]
fn loading_waits_then_opens_title_screen() {
    let ready = Rc::new(Cell::new(false));
    let hud = HeadlessUi::new();
    let mut game = Game::new(Collaborators {
        stage: Box::new(ArenaStage::default()),
        input: Box::new(ScriptedInput::default()),
        assets: Box::new(DeferredAssets {
            data: GameData::default(),
            ready: ready.clone(),
        }),
        factory: Box::new(SpawnLog::new()),
        in_game_ui: Box::new(hud.clone()),
        debug_overlay: Box::new(FrameStats::new()),
        title_screen: Box::new(PlainTitleScreen),
        background: Box::new(Starfield::new(1)),
    });
    let mut driver = FrameDriver::new(ManualClock::new(16.0));

    driver.step(&mut game);
    assert_eq!(game.state(), GameState::Loading);
    assert_eq!(game.credits(), -1);

    ready.set(true);
    driver.step(&mut game);
    assert_eq!(game.state(), GameState::TitleScreen);
    assert_eq!(game.credits(), GameData::default().general.initial_credits);
    assert_eq!(hud.information("credits"), Some(3));
}

#[test]
fn join_starts_stage_one_and_publishes_lives() {
    let (session, _) = joined_session(ArenaStage::default());
    assert_eq!(session.game.current_stage_number(), 1);
    assert_eq!(session.game.credits(), 2);
    assert_eq!(session.hud.information("credits"), Some(2));
    assert_eq!(session.hud.information("player1.lives"), Some(3));
    assert!(session.game.stage().players()[0].is_active());
    assert!(!session.game.stage().players()[1].is_active());
}

#[test]
fn losing_every_life_ends_in_title_screen() {
    let (mut session, mut driver) = joined_session(ArenaStage::default());

    for lives_left in [2, 1] {
        session.game.stage_mut().players_mut()[0].apply_damage(1000);
        driver.step(&mut session.game);
        assert_eq!(session.hud.information("player1.lives"), Some(lives_left));
        assert_eq!(session.game.state(), GameState::StageRunning);
    }

    // Last life: stage reports game over and the machine follows on the same frame
    session.game.stage_mut().players_mut()[0].apply_damage(1000);
    driver.step(&mut session.game);
    assert_eq!(session.game.stage().stage_state(), StageState::GameOverEnded);
    assert_eq!(session.game.state(), GameState::GameOver);
    assert_eq!(session.spawns.effect_count(), 3);

    driver.step(&mut session.game);
    assert_eq!(session.game.state(), GameState::TitleScreen);
    assert_eq!(session.game.current_stage_number(), 0);
    assert_eq!(session.game.stage().stage_state(), StageState::Loaded);
}

#[test]
fn completed_stage_loads_the_next_one() {
    let (mut session, mut driver) = joined_session(ArenaStage::default().with_stage_duration(100.0));

    driver.run_until(&mut session.game, |game| game.state() != GameState::StageRunning);
    assert_eq!(session.game.state(), GameState::StageEnded);

    driver.step(&mut session.game);
    assert_eq!(session.game.state(), GameState::StageLoading);
    assert_eq!(session.game.current_stage_number(), 2);

    driver.step(&mut session.game);
    assert_eq!(session.game.state(), GameState::StageRunning);
    assert!(session.game.stage().players()[0].is_active());
}

#[test]
fn stalled_frame_advances_at_most_one_clamped_step() {
    let (mut session, mut driver) = joined_session(ArenaStage::default());
    session.game.stage_mut().players_mut()[0].move_ship(PlayerAction::ThrustForward);

    driver.step(&mut session.game);
    let before = session.game.stage().players()[0].position();
    let speed = session.game.stage().players()[0].velocity().y;

    driver.clock_mut().stall(5000.0);
    driver.step(&mut session.game);
    let after = session.game.stage().players()[0].position();

    let expected = speed * 100.0 / 1000.0;
    assert!(((after.y - before.y) - expected).abs() < 1e-3);
}

#[test]
fn fire_command_spawns_one_torpedo_per_cooldown() {
    let input = ScriptedInput::new(vec![
        (1, InputCommand::Join { player: 1 }),
        (3, InputCommand::Fire { player: 1 }),
        (4, InputCommand::Fire { player: 1 }),
        (40, InputCommand::Fire { player: 1 }),
    ]);
    let mut session = HeadlessSession::new(
        GameDataStore::loaded(GameData::default()),
        input,
        ArenaStage::default(),
    );
    let mut driver = FrameDriver::new(ManualClock::new(16.0));

    driver.run_frames(&mut session.game, 5);
    assert_eq!(session.spawns.torpedo_count(), 1);

    // 36 frames x 16 ms is well past the 500 ms cooldown
    driver.run_frames(&mut session.game, 36);
    assert_eq!(session.spawns.torpedo_count(), 2);
}
