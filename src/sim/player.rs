//! Player-controlled ship
//!
//! A player slot exists for the whole session. Joining activates it, running
//! out of lives deactivates it; the ship is re-initialised, never rebuilt.

use glam::Vec2;

use super::collaborators::{FrameContext, InGameUi, ObjectFactory};
use super::object::{Body, Entity, HitBox, SpriteFrame};
use super::state::{EngineState, GameObjectKind, ParticleEffectKind, PlayerAction, StageState};
use super::timer::Countdown;
use crate::consts::*;
use crate::game_data::{BoundaryHandling, DataError, GameData, ShipProfile};
use crate::{calculate_magnitude, deg_to_rad, heading};

/// Ship figures copied from the selected profile on activation
#[derive(Debug, Clone, Copy, PartialEq)]
struct ShipStats {
    yaw_speed: f32,
    thrust: f32,
    max_speed: f32,
    max_angular_speed: f32,
    full_hit_points: i32,
    width: f32,
    height: f32,
    cor: f32,
    explosion: ParticleEffectKind,
}

impl ShipStats {
    fn from_profile(profile: &ShipProfile) -> Self {
        Self {
            yaw_speed: profile.yaw_speed,
            thrust: profile.thrust,
            max_speed: profile.max_speed,
            max_angular_speed: profile.max_angular_speed,
            full_hit_points: profile.hit_points,
            width: profile.width,
            height: profile.height,
            cor: profile.cor,
            explosion: profile.particle_effects.explosion,
        }
    }
}

impl Default for ShipStats {
    fn default() -> Self {
        Self::from_profile(&ShipProfile::default())
    }
}

/// A player's ship and its session bookkeeping
#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    player_number: u8,
    ship_type: String,
    stats: ShipStats,
    hit_points: i32,
    score: u64,
    lives: u32,
    is_playing: bool,
    engine: EngineState,
    forward_thrust: Countdown,
    weapon_cooldown: Countdown,
    spawn_point: Vec2,
    field: Vec2,
    boundary_handling: BoundaryHandling,
}

impl Player {
    /// Create the (inactive) ship for slot `player_number` of `player_count`
    /// on a `field`-sized play area.
    pub fn new(player_number: u8, player_count: u8, field: Vec2) -> Self {
        let spawn_point = Self::spawn_layout(player_number, player_count, field);
        let mut player = Self {
            body: Body::new(spawn_point, 0.0),
            player_number,
            ship_type: DEFAULT_SHIP.to_string(),
            stats: ShipStats::default(),
            hit_points: 0,
            score: 0,
            lives: 0,
            is_playing: false,
            engine: EngineState::NoThrust,
            forward_thrust: Countdown::new(THRUST_ANIMATION_MS),
            weapon_cooldown: Countdown::new(WEAPON_COOLDOWN_MS),
            spawn_point,
            field,
            boundary_handling: BoundaryHandling::default(),
        };
        player.deactivate();
        player
    }

    /// Starting position of slot `n`: a centred row below the field middle
    pub fn spawn_layout(player_number: u8, player_count: u8, field: Vec2) -> Vec2 {
        let count = f32::from(player_count.max(1));
        let slot = f32::from(player_number.saturating_sub(1));
        Vec2::new(
            field.x / 2.0 - (count - 1.0) / 2.0 * SPAWN_SPACING + slot * SPAWN_SPACING,
            field.y / 2.0 + SPAWN_ROW_OFFSET,
        )
    }

    pub fn player_number(&self) -> u8 {
        self.player_number
    }

    pub fn is_active(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> Vec2 {
        self.body.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.vel
    }

    pub fn orientation(&self) -> f32 {
        self.body.orientation
    }

    pub fn angular_speed(&self) -> f32 {
        self.body.angular_speed
    }

    pub fn hit_box(&self) -> HitBox {
        self.body.hit_box
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn full_hit_points(&self) -> i32 {
        self.stats.full_hit_points
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine
    }

    pub fn is_weapon_cooling_down(&self) -> bool {
        self.weapon_cooldown.is_active()
    }

    pub fn is_forward_thrust(&self) -> bool {
        self.forward_thrust.is_active()
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Ship sprite size from the active profile
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.stats.width, self.stats.height)
    }

    /// Profile used on the next activation
    pub fn set_ship_type(&mut self, ship_type: impl Into<String>) {
        self.ship_type = ship_type.into();
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Lower hit points; the ship is destroyed on its next update once they
    /// reach zero.
    pub fn apply_damage(&mut self, points: i32) {
        if self.is_playing {
            self.hit_points -= points;
        }
    }

    /// Apply one control input
    pub fn move_ship(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::ThrustForward => {
                self.body.vel += heading(self.body.orientation) * self.stats.thrust;
                self.forward_thrust.start();
                self.engine = EngineState::Thrust;
            }
            PlayerAction::YawLeft => {
                self.body.orientation -= deg_to_rad(self.stats.yaw_speed);
                self.body.angular_speed = 0.0;
            }
            PlayerAction::YawRight => {
                self.body.orientation += deg_to_rad(self.stats.yaw_speed);
                self.body.angular_speed = 0.0;
            }
            PlayerAction::ReduceSpeed => {
                let magnitude = calculate_magnitude(self.body.vel.x, self.body.vel.y);
                let new_magnitude = magnitude - self.stats.thrust / 2.0;
                if new_magnitude <= 0.0 {
                    self.body.vel = Vec2::ZERO;
                } else {
                    self.body.vel = self.body.vel / magnitude * new_magnitude;
                }
            }
        }
    }

    /// Launch a torpedo ahead of the ship. Returns whether one was spawned.
    pub fn fire(&mut self, stage_state: StageState, factory: &mut dyn ObjectFactory) -> bool {
        if self.weapon_cooldown.is_active() || stage_state != StageState::Running {
            return false;
        }

        // Spawn outside the ship's own hit box
        let muzzle = self.body.pos
            + heading(self.body.orientation) * (self.body.hit_box.size + MUZZLE_OFFSET);
        factory.generate_torpedo(muzzle.x, muzzle.y, self.body.orientation);
        self.weapon_cooldown.start();
        true
    }

    /// Load ship figures from the named profile
    pub fn select_ship(&mut self, data: &GameData, ship_type: &str) -> Result<(), DataError> {
        let profile = data.ship(ship_type)?;
        self.stats = ShipStats::from_profile(profile);
        self.hit_points = self.stats.full_hit_points;
        self.body.hit_box = profile.hit_box.into();
        self.ship_type = ship_type.to_string();
        Ok(())
    }

    /// Join the game: fresh ship, score 0, full lives
    pub fn activate(&mut self, data: &GameData, ui: &mut dyn InGameUi) -> Result<(), DataError> {
        let ship_type = self.ship_type.clone();
        self.select_ship(data, &ship_type)?;
        self.boundary_handling = data.player.boundary_handling_setting;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.is_playing = true;
        self.report_lives(ui);
        log::info!("Player {} joined with ship '{}'", self.player_number, ship_type);
        Ok(())
    }

    /// Leave the game; the ship is parked outside the field
    pub fn deactivate(&mut self) {
        self.is_playing = false;
        self.body.pos = Vec2::new(PARKING_POSITION.0, PARKING_POSITION.1);
        self.body.vel = Vec2::ZERO;
        self.body.angular_speed = 0.0;
    }

    /// Back to the slot's spawn point, at rest, facing up
    pub fn reset_position(&mut self) {
        self.body.pos = self.spawn_point;
        self.body.vel = Vec2::ZERO;
        self.body.angular_speed = 0.0;
        self.body.orientation = 0.0;
    }

    pub fn reset_hit_points(&mut self) {
        self.hit_points = self.stats.full_hit_points;
    }

    /// Lose a life: explode, then respawn or drop out
    pub fn destroy_ship(&mut self, ctx: &mut FrameContext<'_>) {
        ctx.factory
            .generate_particle_effect(self.body.pos.x, self.body.pos.y, self.stats.explosion);

        self.lives = self.lives.saturating_sub(1);
        self.report_lives(ctx.ui);

        if self.lives == 0 {
            log::info!("Player {} is out of lives", self.player_number);
            self.deactivate();
        } else {
            log::debug!(
                "Player {} destroyed, {} lives left",
                self.player_number,
                self.lives
            );
            self.reset_hit_points();
            self.reset_position();
        }
    }

    fn report_lives(&self, ui: &mut dyn InGameUi) {
        let key = format!("player{}.lives", self.player_number);
        ui.update_information(&key, i64::from(self.lives));
    }
}

impl Entity for Player {
    fn kind(&self) -> GameObjectKind {
        GameObjectKind::Player
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'_>) {
        if !self.is_playing {
            return;
        }

        self.body.clamp_speed(self.stats.max_speed);
        if self.stats.max_angular_speed > 0.0 {
            self.body.angular_speed = self
                .body
                .angular_speed
                .clamp(-self.stats.max_angular_speed, self.stats.max_angular_speed);
        }
        self.body.integrate(dt);
        self.body
            .confine(self.field, self.boundary_handling, self.stats.cor);

        if self.forward_thrust.tick(dt) {
            self.engine = EngineState::NoThrust;
        }
        self.weapon_cooldown.tick(dt);

        if self.hit_points <= 0 {
            self.destroy_ship(ctx);
        }
    }

    fn draw(&self, frames: &mut Vec<SpriteFrame>) {
        if !self.is_playing {
            return;
        }
        frames.push(SpriteFrame {
            engine: self.engine,
            player_number: Some(self.player_number),
            ..SpriteFrame::of(self, self.size())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessUi, SpawnLog};
    use crate::sim::collaborators::Spawn;
    use proptest::prelude::*;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn active_player(ui: &mut HeadlessUi) -> Player {
        let mut player = Player::new(1, 2, field());
        player.activate(&GameData::default(), ui).unwrap();
        player.reset_position();
        player
    }

    fn parked() -> Vec2 {
        Vec2::new(PARKING_POSITION.0, PARKING_POSITION.1)
    }

    #[test]
    fn test_new_player_is_parked() {
        let player = Player::new(2, 2, field());
        assert!(!player.is_active());
        assert_eq!(player.position(), parked());
        assert_eq!(player.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_spawn_layout_centres_row() {
        let f = field();
        let one = Player::spawn_layout(1, 2, f);
        let two = Player::spawn_layout(2, 2, f);
        assert_eq!(one, Vec2::new(f.x / 2.0 - 50.0, f.y / 2.0 + 100.0));
        assert_eq!(two, Vec2::new(f.x / 2.0 + 50.0, f.y / 2.0 + 100.0));
        assert_eq!(Player::spawn_layout(1, 1, f).x, f.x / 2.0);
    }

    #[test]
    fn test_activate_resets_session() {
        let mut ui = HeadlessUi::new();
        let mut player = active_player(&mut ui);
        player.add_score(250);
        player.deactivate();

        player.activate(&GameData::default(), &mut ui).unwrap();
        assert!(player.is_active());
        assert_eq!(player.score(), 0);
        assert_eq!(player.lives(), 3);
        assert_eq!(player.hit_points(), ShipProfile::default().hit_points);
        assert_eq!(ui.information("player1.lives"), Some(3));
    }

    #[test]
    fn test_activate_unknown_ship_fails() {
        let mut ui = HeadlessUi::new();
        let mut player = Player::new(1, 2, field());
        player.set_ship_type("interceptor");
        let err = player.activate(&GameData::default(), &mut ui).unwrap_err();
        assert_eq!(err, DataError::MissingShip("interceptor".to_string()));
        assert!(!player.is_active());
    }

    #[test]
    fn test_thrust_follows_heading() {
        let mut ui = HeadlessUi::new();
        let mut player = active_player(&mut ui);
        let thrust = ShipProfile::default().thrust;

        player.move_ship(PlayerAction::ThrustForward);
        assert!(player.velocity().x.abs() < 1e-4);
        assert!((player.velocity().y + thrust).abs() < 1e-4);
        assert!(player.is_forward_thrust());
        assert_eq!(player.engine_state(), EngineState::Thrust);
    }

    #[test]
    fn test_yaw_sets_orientation_directly() {
        let mut ui = HeadlessUi::new();
        let mut player = active_player(&mut ui);
        let step = deg_to_rad(ShipProfile::default().yaw_speed);

        player.move_ship(PlayerAction::YawRight);
        player.move_ship(PlayerAction::YawRight);
        player.move_ship(PlayerAction::YawLeft);
        assert!((player.orientation() - step).abs() < 1e-6);
        assert_eq!(player.angular_speed(), 0.0);
    }

    #[test]
    fn test_reduce_speed_stops_slow_ship() {
        let mut ui = HeadlessUi::new();
        let mut player = active_player(&mut ui);
        player.move_ship(PlayerAction::ThrustForward);
        player.move_ship(PlayerAction::ReduceSpeed);
        player.move_ship(PlayerAction::ReduceSpeed);
        assert_eq!(player.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_thrust_animation_expires() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);
        player.move_ship(PlayerAction::ThrustForward);

        let mut ctx = FrameContext {
            factory: &mut spawns,
            ui: &mut ui,
        };
        player.update(THRUST_ANIMATION_MS - 1.0, &mut ctx);
        assert_eq!(player.engine_state(), EngineState::Thrust);
        player.update(1.0, &mut ctx);
        assert_eq!(player.engine_state(), EngineState::NoThrust);
        assert!(!player.is_forward_thrust());
    }

    #[test]
    fn test_weapon_cooldown_gates_fire() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);

        assert!(player.fire(StageState::Running, &mut spawns));
        assert!(!player.fire(StageState::Running, &mut spawns));
        assert_eq!(spawns.torpedo_count(), 1);

        {
            let mut scratch = SpawnLog::new();
            let mut ctx = FrameContext {
                factory: &mut scratch,
                ui: &mut ui,
            };
            player.update(WEAPON_COOLDOWN_MS / 2.0, &mut ctx);
        }
        assert!(!player.fire(StageState::Running, &mut spawns));
        assert_eq!(spawns.torpedo_count(), 1);

        {
            let mut scratch = SpawnLog::new();
            let mut ctx = FrameContext {
                factory: &mut scratch,
                ui: &mut ui,
            };
            player.update(WEAPON_COOLDOWN_MS / 2.0, &mut ctx);
        }
        assert!(player.fire(StageState::Running, &mut spawns));
        assert_eq!(spawns.torpedo_count(), 2);
    }

    #[test]
    fn test_fire_requires_running_stage() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);

        assert!(!player.fire(StageState::Loaded, &mut spawns));
        assert!(!player.fire(StageState::CompletedEnded, &mut spawns));
        assert_eq!(spawns.torpedo_count(), 0);
        assert!(!player.is_weapon_cooling_down());
    }

    #[test]
    fn test_torpedo_spawns_past_hit_box() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);
        let spawn = player.spawn_point();
        let reach = player.hit_box().size + MUZZLE_OFFSET;

        player.fire(StageState::Running, &mut spawns);
        match spawns.spawns()[0] {
            Spawn::Object { kind, x, y, orientation } => {
                assert_eq!(kind, GameObjectKind::Torpedo);
                assert!((x - spawn.x).abs() < 1e-3);
                assert!((y - (spawn.y - reach)).abs() < 1e-3);
                assert_eq!(orientation, 0.0);
            }
            other => panic!("unexpected spawn {other:?}"),
        }
    }

    #[test]
    fn test_destroy_then_respawn_then_out() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);
        let full = player.full_hit_points();

        // 1 hit point, 2 lives
        player.apply_damage(full - 1);
        {
            let mut ctx = FrameContext {
                factory: &mut spawns,
                ui: &mut ui,
            };
            player.destroy_ship(&mut ctx);
        }
        assert_eq!(player.lives(), 2);
        player.apply_damage(full - 1);
        assert_eq!(player.hit_points(), 1);
        player.move_ship(PlayerAction::ThrustForward);

        // Depleting update: respawn with full hit points
        player.apply_damage(1);
        {
            let mut ctx = FrameContext {
                factory: &mut spawns,
                ui: &mut ui,
            };
            player.update(16.0, &mut ctx);
        }
        assert_eq!(player.lives(), 1);
        assert_eq!(player.hit_points(), full);
        assert_eq!(player.position(), player.spawn_point());
        assert_eq!(player.velocity(), Vec2::ZERO);
        assert_eq!(player.orientation(), 0.0);
        assert!(player.is_active());
        assert_eq!(ui.information("player1.lives"), Some(1));

        // Last life: dropped out and parked
        player.apply_damage(full);
        {
            let mut ctx = FrameContext {
                factory: &mut spawns,
                ui: &mut ui,
            };
            player.update(16.0, &mut ctx);
        }
        assert_eq!(player.lives(), 0);
        assert!(!player.is_active());
        assert_eq!(player.position(), parked());
        assert_eq!(player.velocity(), Vec2::ZERO);
        assert_eq!(ui.information("player1.lives"), Some(0));
        assert_eq!(spawns.effect_count(), 3);
    }

    #[test]
    fn test_inactive_player_ignores_update_and_draw() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = Player::new(1, 2, field());
        let mut ctx = FrameContext {
            factory: &mut spawns,
            ui: &mut ui,
        };
        player.update(100.0, &mut ctx);
        assert_eq!(player.position(), parked());

        let mut frames = Vec::new();
        player.draw(&mut frames);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_draw_reports_engine_state() {
        let mut ui = HeadlessUi::new();
        let mut player = active_player(&mut ui);
        player.move_ship(PlayerAction::ThrustForward);

        let mut frames = Vec::new();
        player.draw(&mut frames);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].kind, GameObjectKind::Player);
        assert_eq!(frames[0].pos, player.position());
        assert_eq!(frames[0].size, Vec2::new(64.0, 64.0));
        assert_eq!(frames[0].engine, EngineState::Thrust);
        assert_eq!(frames[0].player_number, Some(1));
    }

    #[test]
    fn test_update_caps_speed() {
        let mut ui = HeadlessUi::new();
        let mut spawns = SpawnLog::new();
        let mut player = active_player(&mut ui);
        for _ in 0..200 {
            player.move_ship(PlayerAction::ThrustForward);
        }
        let mut ctx = FrameContext {
            factory: &mut spawns,
            ui: &mut ui,
        };
        player.update(1.0, &mut ctx);
        assert!(player.velocity().length() <= ShipProfile::default().max_speed + 1e-3);
    }

    proptest! {
        #[test]
        fn prop_reduce_speed(vx in -500.0f32..500.0, vy in -500.0f32..500.0) {
            let mut ui = HeadlessUi::new();
            let mut player = active_player(&mut ui);
            player.body.vel = Vec2::new(vx, vy);
            let before = calculate_magnitude(vx, vy);
            let expected = before - ShipProfile::default().thrust / 2.0;

            player.move_ship(PlayerAction::ReduceSpeed);
            let after = player.velocity();

            if expected <= 0.0 {
                prop_assert_eq!(after, Vec2::ZERO);
            } else {
                prop_assert!((after.length() - expected).abs() < 1e-2);
                let dir_before = Vec2::new(vx, vy) / before;
                let dir_after = after / after.length();
                prop_assert!((dir_before - dir_after).length() < 1e-3);
            }
        }

        #[test]
        fn prop_deactivate_parks(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            vx in -500.0f32..500.0,
            spin in -10.0f32..10.0,
        ) {
            let mut ui = HeadlessUi::new();
            let mut player = active_player(&mut ui);
            player.body.pos = Vec2::new(x, y);
            player.body.vel = Vec2::new(vx, -vx);
            player.body.angular_speed = spin;

            player.deactivate();
            prop_assert!(!player.is_active());
            prop_assert_eq!(player.position(), parked());
            prop_assert_eq!(player.velocity(), Vec2::ZERO);
            prop_assert_eq!(player.angular_speed(), 0.0);
        }
    }
}
