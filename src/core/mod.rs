//! Engine internals: the content catalog, condition evaluation, state
//! transitions and the session wrapper.

pub mod catalog;
pub mod condition;
pub mod engine;
pub mod session;
pub mod transition;
