//! AED trainer simulator library.
//!
//! Exposes the controller, its supporting models and the host adapters
//! for the binary and for integration testing.

#![deny(unused_must_use)]

pub mod app;
pub mod battery;
pub mod config;
pub mod error;
pub mod fsm;
pub mod prompts;
pub mod rhythm;
pub mod safety;
pub mod scenario;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
