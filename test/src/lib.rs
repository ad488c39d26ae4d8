//! Fixtures shared by the scenesync integration tests

pub mod helpers;

pub use helpers::*;
