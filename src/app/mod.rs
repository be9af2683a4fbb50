//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the AED trainer: the scripted
//! procedure, safety gating and rhythm routing.  All interaction with the
//! training panel happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a UI.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
