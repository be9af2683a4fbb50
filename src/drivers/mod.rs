//! Panel input drivers.

pub mod button;
