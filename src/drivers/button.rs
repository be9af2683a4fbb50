//! Debounced power-button driver with short and long press detection.
//!
//! The panel reports raw press/release edges with a millisecond
//! timestamp; `tick()` (called from the panel loop) runs the debounce and
//! gesture state machine.  A hold reaching the threshold fires
//! `LongPress` while the button is still down, exactly once per hold.
//!
//! | Gesture     | Condition                         | Event        |
//! |-------------|-----------------------------------|--------------|
//! | Short press | Released before the hold threshold| `ShortPress` |
//! | Long press  | Held >= hold threshold            | `LongPress`  |

use log::debug;

/// Edges closer together than this are contact bounce.
const DEBOUNCE_MS: u32 = 50;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Pressed { since_ms: u32 },
    /// Long press already reported; wait for release.
    Latched,
}

pub struct PowerButton {
    hold_ms: u32,
    state: GestureState,
    down: bool,
}

impl PowerButton {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            state: GestureState::Idle,
            down: false,
        }
    }

    /// Raw press edge.
    pub fn press(&mut self, now_ms: u32) {
        self.down = true;
        if self.state == GestureState::Idle {
            self.state = GestureState::DebounceWait { since_ms: now_ms };
        }
    }

    /// Raw release edge.  Returns `ShortPress` for a debounced press that
    /// ends before the threshold.
    pub fn release(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        self.down = false;
        let event = match self.state {
            GestureState::Pressed { since_ms } if now_ms.wrapping_sub(since_ms) < self.hold_ms => {
                Some(ButtonEvent::ShortPress)
            }
            _ => None,
        };
        self.state = GestureState::Idle;
        event
    }

    /// Advance the state machine.  `now_ms` is monotonic milliseconds.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        match self.state {
            GestureState::Idle | GestureState::Latched => None,

            GestureState::DebounceWait { since_ms } => {
                if !self.down {
                    self.state = GestureState::Idle;
                } else if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Pressed { since_ms };
                    return self.tick(now_ms);
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                let held_ms = now_ms.wrapping_sub(since_ms);
                if held_ms >= self.hold_ms {
                    debug!("power button held {held_ms} ms");
                    self.state = GestureState::Latched;
                    return Some(ButtonEvent::LongPress);
                }
                None
            }
        }
    }

    /// Convenience for scripted input: a full hold of `held_ms`.
    pub fn hold_for(&mut self, start_ms: u32, held_ms: u32) -> Option<ButtonEvent> {
        self.press(start_ms);
        let long = self.tick(start_ms.wrapping_add(held_ms));
        let short = self.release(start_ms.wrapping_add(held_ms));
        long.or(short)
    }
}
