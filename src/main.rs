//! Space Arcade entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use space_arcade::game_data::{DEFAULT_GAME_DATA, GameDataStore};
    use space_arcade::headless::{ArenaStage, HeadlessSession};
    use space_arcade::platform::ScriptedInput;
    use space_arcade::platform::driver::browser;

    /// Non-interactive attract loop: no input is wired, so nobody joins and
    /// the game stays on the title screen.
    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Space Arcade starting...");

        let session = HeadlessSession::new(
            GameDataStore::from_json(DEFAULT_GAME_DATA),
            ScriptedInput::default(),
            ArenaStage::default(),
        );
        let game = Rc::new(RefCell::new(session.game));

        // Start game loop
        browser::start(game);

        log::info!("Space Arcade running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Arcade (native) starting...");
    log::info!("Running a headless demo session");

    demo::run(std::env::args().nth(1));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use space_arcade::game_data::{DEFAULT_GAME_DATA, GameDataStore};
    use space_arcade::headless::{ArenaStage, HeadlessSession};
    use space_arcade::platform::{FixedRateClock, FrameDriver, InputCommand, ScriptedInput};
    use space_arcade::sim::{GameState, PlayerAction};

    const FRAMES_PER_SECOND: u32 = 60;
    /// Ten seconds of play
    const DEMO_FRAMES: u64 = 600;
    const STAGE_DURATION_MS: f32 = 4000.0;

    /// Player 1 joins, then circles and shoots
    fn demo_script() -> ScriptedInput {
        let mut script = vec![(5, InputCommand::Join { player: 1 })];
        for frame in (20..DEMO_FRAMES).step_by(4) {
            let action = if frame % 40 < 20 {
                PlayerAction::ThrustForward
            } else {
                PlayerAction::YawRight
            };
            script.push((frame, InputCommand::Move { player: 1, action }));
            if frame % 32 == 0 {
                script.push((frame, InputCommand::Fire { player: 1 }));
            }
        }
        ScriptedInput::new(script)
    }

    pub fn run(data_path: Option<String>) {
        let assets = match data_path {
            Some(path) => {
                log::info!("Loading game data from {}", path);
                GameDataStore::load_file(Path::new(&path))
            }
            None => GameDataStore::from_json(DEFAULT_GAME_DATA),
        };

        let mut session = HeadlessSession::new(
            assets,
            demo_script(),
            ArenaStage::default().with_stage_duration(STAGE_DURATION_MS),
        );
        let mut driver = FrameDriver::new(FixedRateClock::new(FRAMES_PER_SECOND));

        let mut frames = 0;
        driver.run_until(&mut session.game, |game| {
            frames += 1;
            game.is_halted() || frames >= DEMO_FRAMES
        });

        let game = &session.game;
        if game.is_halted() {
            log::error!("Session halted while loading game data");
            return;
        }
        log::info!(
            "Demo finished after {} frames: state {}, stage {}, credits {}",
            driver.frames(),
            game.state(),
            game.current_stage_number(),
            game.credits()
        );
        log::info!(
            "{} torpedo(s) fired, player 1 has {:?} lives",
            session.spawns.torpedo_count(),
            session.hud.information("player1.lives")
        );
        if game.state() == GameState::StageRunning {
            log::info!("Player 1 still flying");
        }
    }
}
