//! Touch Gesture Recognition
//!
//! Turns raw touch events into the two gestures the favorites grid needs:
//! - Tap: quick touch + release without moving
//! - Long-press drag: hold > 500ms, then move; reported as a phase stream
//!   `Began → Changed* → Ended | Cancelled`
//!
//! Moving beyond the slop radius before the hold threshold turns the touch
//! into a scroll, which never becomes a long press.

use std::time::{Duration, Instant};

use egui::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongPressPhase {
    Began,
    Changed,
    Ended,
    /// Interrupted (second finger, system cancel). Never commits.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchGesture {
    Tap { pos: Pos2 },
    LongPress { phase: LongPressPhase, pos: Pos2 },
    None,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    id: u64,
    start: Pos2,
    pos: Pos2,
    started: Instant,
    pressing: bool,
    scrolled: bool,
}

/// Single-finger gesture state machine.
pub struct TouchTracker {
    active: Option<ActiveTouch>,
    /// Hold time before a long press begins
    long_press: Duration,
    /// Movement tolerated before the touch counts as a scroll
    slop: f32,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchTracker {
    pub fn new() -> Self {
        Self {
            active: None,
            long_press: Duration::from_millis(500),
            slop: 10.0,
        }
    }

    pub fn is_pressing(&self) -> bool {
        self.active.map_or(false, |t| t.pressing)
    }

    pub fn touch_start(&mut self, pos: Pos2, id: u64, now: Instant) -> TouchGesture {
        // A second finger aborts whatever the first one was doing.
        if let Some(active) = self.active.take() {
            if active.pressing {
                return TouchGesture::LongPress {
                    phase: LongPressPhase::Cancelled,
                    pos: active.pos,
                };
            }
            return TouchGesture::None;
        }
        self.active = Some(ActiveTouch {
            id,
            start: pos,
            pos,
            started: now,
            pressing: false,
            scrolled: false,
        });
        TouchGesture::None
    }

    pub fn touch_move(&mut self, pos: Pos2, id: u64, now: Instant) -> TouchGesture {
        let long_press = self.long_press;
        let slop = self.slop;
        let touch = match self.active.as_mut() {
            Some(t) if t.id == id => t,
            _ => return TouchGesture::None,
        };
        touch.pos = pos;

        if touch.pressing {
            return TouchGesture::LongPress {
                phase: LongPressPhase::Changed,
                pos,
            };
        }
        if touch.scrolled {
            return TouchGesture::None;
        }
        if now.duration_since(touch.started) >= long_press {
            touch.pressing = true;
            return TouchGesture::LongPress {
                phase: LongPressPhase::Began,
                pos: touch.start,
            };
        }
        if touch.start.distance(pos) > slop {
            touch.scrolled = true;
        }
        TouchGesture::None
    }

    /// Begin a long press once the finger has been held still long enough.
    /// Call every frame while a touch is down.
    pub fn tick(&mut self, now: Instant) -> TouchGesture {
        match self.active.as_mut() {
            Some(t) if !t.pressing && !t.scrolled && now.duration_since(t.started) >= self.long_press => {
                t.pressing = true;
                TouchGesture::LongPress {
                    phase: LongPressPhase::Began,
                    pos: t.pos,
                }
            }
            _ => TouchGesture::None,
        }
    }

    pub fn touch_end(&mut self, pos: Pos2, id: u64, now: Instant) -> TouchGesture {
        let touch = match self.active {
            Some(t) if t.id == id => t,
            _ => return TouchGesture::None,
        };
        self.active = None;

        if touch.pressing {
            return TouchGesture::LongPress {
                phase: LongPressPhase::Ended,
                pos,
            };
        }
        if !touch.scrolled
            && touch.start.distance(pos) <= self.slop
            && now.duration_since(touch.started) < self.long_press
        {
            return TouchGesture::Tap { pos };
        }
        TouchGesture::None
    }

    pub fn touch_cancel(&mut self, id: u64) -> TouchGesture {
        match self.active {
            Some(t) if t.id == id => {
                self.active = None;
                if t.pressing {
                    TouchGesture::LongPress {
                        phase: LongPressPhase::Cancelled,
                        pos: t.pos,
                    }
                } else {
                    TouchGesture::None
                }
            }
            _ => TouchGesture::None,
        }
    }
}
