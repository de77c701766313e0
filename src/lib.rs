//! Adventure Engine — a deterministic state engine for branching stories.
//!
//! Walks an authored graph of locations and scenes: the player picks an
//! action or uses an item, visibility conditions and on-enter effects are
//! evaluated against story flags, and a complete new player state comes
//! back. No narrative text is generated; everything is authored content.

pub mod core;
pub mod schema;

pub use crate::core::catalog::{CatalogError, ContentCatalog, ContentRegistry};
pub use crate::core::engine::{EntryPoint, StoryEngine, StoryEngineBuilder, StoryError, StoryManifest};
pub use crate::core::session::{Session, SessionError};
pub use crate::core::transition::EngineError;
pub use crate::schema::state::PlayerState;
