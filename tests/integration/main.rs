//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one area of the trainer
//! against the mock panel in `mock_hw`.  Everything runs on the host in
//! simulated time; no test sleeps for real.

mod mock_hw;
mod safety_tests;
mod scenario_tests;
