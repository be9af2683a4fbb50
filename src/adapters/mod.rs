//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                  | Connects to                |
//! |------------|-----------------------------|----------------------------|
//! | `audio`    | AudioPort                   | Single-source cue player   |
//! | `log_sink` | EventSink                   | `log` facade               |
//! | `panel`    | all of [`DevicePorts`]      | Simulated training panel   |
//! | `time`     | ClockPort                   | Scaled host sleep          |
//!
//! [`DevicePorts`]: crate::app::ports::DevicePorts

pub mod audio;
pub mod log_sink;
pub mod panel;
pub mod time;
