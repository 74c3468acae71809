//! Shared game object building blocks
//!
//! Entities compose a [`Body`] (physical state + hit box) and implement the
//! [`Entity`] capability trait instead of inheriting from a base object.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collaborators::FrameContext;
use super::state::{EngineState, GameObjectKind};
use crate::calculate_magnitude;
use crate::game_data::BoundaryHandling;

/// Square hit box, axis-aligned to the entity, offset from its position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub size: f32,
    pub offset: Vec2,
}

impl Default for HitBox {
    fn default() -> Self {
        Self {
            size: 40.0,
            offset: Vec2::new(0.0, -15.0),
        }
    }
}

/// Physical state of a game object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Position (pixels)
    pub pos: Vec2,
    /// Velocity (pixels / second)
    pub vel: Vec2,
    /// Heading in radians, 0 = up, clockwise positive
    pub orientation: f32,
    /// Angular speed (radians / second)
    pub angular_speed: f32,
    pub hit_box: HitBox,
}

impl Body {
    pub fn new(pos: Vec2, orientation: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            orientation,
            angular_speed: 0.0,
            hit_box: HitBox::default(),
        }
    }

    pub fn speed(&self) -> f32 {
        calculate_magnitude(self.vel.x, self.vel.y)
    }

    /// Scale velocity down to `max_speed` if it is faster
    pub fn clamp_speed(&mut self, max_speed: f32) {
        self.vel = self.vel.clamp_length_max(max_speed.max(0.0));
    }

    /// Advance position and orientation by `dt` milliseconds
    pub fn integrate(&mut self, dt: f32) {
        let secs = dt / 1000.0;
        self.pos += self.vel * secs;
        self.orientation += self.angular_speed * secs;
    }

    /// Keep the body inside a `field`-sized play area
    pub fn confine(&mut self, field: Vec2, handling: BoundaryHandling, cor: f32) {
        match handling {
            BoundaryHandling::Wrap => {
                self.pos.x = self.pos.x.rem_euclid(field.x);
                self.pos.y = self.pos.y.rem_euclid(field.y);
            }
            BoundaryHandling::Bounce => {
                if self.pos.x < 0.0 || self.pos.x > field.x {
                    self.pos.x = self.pos.x.clamp(0.0, field.x);
                    self.vel.x = -self.vel.x * cor;
                }
                if self.pos.y < 0.0 || self.pos.y > field.y {
                    self.pos.y = self.pos.y.clamp(0.0, field.y);
                    self.vel.y = -self.vel.y * cor;
                }
            }
            BoundaryHandling::Stop => {
                if self.pos.x < 0.0 || self.pos.x > field.x {
                    self.pos.x = self.pos.x.clamp(0.0, field.x);
                    self.vel.x = 0.0;
                }
                if self.pos.y < 0.0 || self.pos.y > field.y {
                    self.pos.y = self.pos.y.clamp(0.0, field.y);
                    self.vel.y = 0.0;
                }
            }
        }
    }
}

/// What the renderer needs to draw one entity this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub kind: GameObjectKind,
    pub pos: Vec2,
    pub orientation: f32,
    /// Sprite size (pixels)
    pub size: Vec2,
    pub engine: EngineState,
    /// Player slot for player ships (selects the sprite set)
    pub player_number: Option<u8>,
}

impl SpriteFrame {
    /// Frame placed at the entity's body
    pub fn of(entity: &dyn Entity, size: Vec2) -> Self {
        let body = entity.body();
        Self {
            kind: entity.kind(),
            pos: body.pos,
            orientation: body.orientation,
            size,
            engine: EngineState::NoThrust,
            player_number: None,
        }
    }
}

/// Capabilities every game object exposes to the stage
pub trait Entity {
    fn kind(&self) -> GameObjectKind;

    fn body(&self) -> &Body;

    /// Advance by `dt` milliseconds
    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'_>);

    /// Push this frame's sprites
    fn draw(&self, frames: &mut Vec<SpriteFrame>);
}
