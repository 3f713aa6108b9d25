//! Utility functions and helpers

pub mod path;
pub mod time;
