//! Frame scheduling
//!
//! The host owns the loop. Each `on_frame` hands back a [`NextFrame`] and the
//! driver schedules the following call; the core never schedules itself.

/// Request for another frame, returned by every frame tick
#[must_use = "the frame loop stops unless the next frame is requested"]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextFrame {
    after: f64,
}

impl NextFrame {
    /// Ask for a frame later than `timestamp` (ms)
    pub fn after(timestamp: f64) -> Self {
        Self { after: timestamp }
    }

    /// Timestamp of the frame that issued the request
    pub fn timestamp(&self) -> f64 {
        self.after
    }
}

/// Something ticked once per frame with a millisecond timestamp
pub trait FrameTarget {
    fn on_frame(&mut self, timestamp: f64) -> NextFrame;
}

/// Time source for the driver
pub trait Clock {
    /// Block until the next frame is due and return its timestamp (ms)
    fn wait_next_frame(&mut self, request: NextFrame) -> f64;
}

/// Deterministic clock: every frame is `step` ms after the previous one
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: f64,
    step: f64,
    stall: f64,
}

impl ManualClock {
    pub fn new(step: f64) -> Self {
        Self {
            now: 0.0,
            step,
            stall: 0.0,
        }
    }

    /// Delay the next frame by an extra `ms`, as a backgrounded tab would
    pub fn stall(&mut self, ms: f64) {
        self.stall += ms;
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Clock for ManualClock {
    fn wait_next_frame(&mut self, request: NextFrame) -> f64 {
        self.now = self.now.max(request.timestamp()) + self.step + self.stall;
        self.stall = 0.0;
        self.now
    }
}

/// Wall-clock driven fixed-rate clock (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    start: std::time::Instant,
    frame: std::time::Duration,
    deadline: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl FixedRateClock {
    pub fn new(frames_per_second: u32) -> Self {
        let start = std::time::Instant::now();
        let frame = std::time::Duration::from_secs_f64(1.0 / f64::from(frames_per_second.max(1)));
        Self {
            start,
            frame,
            deadline: start,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for FixedRateClock {
    fn wait_next_frame(&mut self, _request: NextFrame) -> f64 {
        self.deadline += self.frame;
        let now = std::time::Instant::now();
        if self.deadline > now {
            std::thread::sleep(self.deadline - now);
        } else {
            // Running late: don't try to catch up with a burst of frames
            self.deadline = now;
        }
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Runs a [`FrameTarget`] on a [`Clock`]
#[derive(Debug)]
pub struct FrameDriver<C: Clock> {
    clock: C,
    frames: u64,
    pending: NextFrame,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            frames: 0,
            pending: NextFrame::after(0.0),
        }
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Run exactly one frame
    pub fn step<T: FrameTarget + ?Sized>(&mut self, target: &mut T) {
        let timestamp = self.clock.wait_next_frame(self.pending);
        self.pending = target.on_frame(timestamp);
        self.frames += 1;
    }

    /// Run `count` frames
    pub fn run_frames<T: FrameTarget + ?Sized>(&mut self, target: &mut T, count: u64) {
        for _ in 0..count {
            self.step(target);
        }
    }

    /// Run until `done` returns true (checked after each frame)
    pub fn run_until<T: FrameTarget + ?Sized>(
        &mut self,
        target: &mut T,
        mut done: impl FnMut(&T) -> bool,
    ) {
        loop {
            self.step(target);
            if done(target) {
                break;
            }
        }
    }
}

/// `requestAnimationFrame` loop for the browser
#[cfg(target_arch = "wasm32")]
pub mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::FrameTarget;

    /// Start ticking `target` on every display refresh
    pub fn start<T: FrameTarget + 'static>(target: Rc<RefCell<T>>) {
        request_animation_frame(target);
    }

    fn request_animation_frame<T: FrameTarget + 'static>(target: Rc<RefCell<T>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(target, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop<T: FrameTarget + 'static>(target: Rc<RefCell<T>>, time: f64) {
        let _next = target.borrow_mut().on_frame(time);
        request_animation_frame(target);
    }
}
