//! Authored content types and the player-state snapshot.

pub mod action;
pub mod location;
pub mod state;
