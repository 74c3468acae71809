//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Frame scheduling (fixed-rate native loop, `requestAnimationFrame` on web)
//! - Input polling

pub mod driver;
pub mod input;

pub use driver::{Clock, FrameDriver, FrameTarget, ManualClock, NextFrame};
pub use input::{InputCommand, InputPoller, ScriptedInput};

#[cfg(not(target_arch = "wasm32"))]
pub use driver::FixedRateClock;
