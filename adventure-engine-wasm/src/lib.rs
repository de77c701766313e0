//! WASM bindings for adventure-engine — powers the browser front end.
//!
//! The page keeps the current `GameState` as JSON and hands it back with
//! every intent; the engine itself holds no per-player state.

use wasm_bindgen::prelude::*;

use adventure_engine::{ContentCatalog, PlayerState, StoryEngine, StoryManifest};

// ---------------------------------------------------------------------------
// Embedded story data — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const STORY: &str = include_str!("../../story_data/lighthouse/story.ron");

    pub const LOCATIONS: &[&str] = &[
        include_str!("../../story_data/lighthouse/locations/harbor.ron"),
        include_str!("../../story_data/lighthouse/locations/lighthouse.ron"),
        include_str!("../../story_data/lighthouse/locations/cove.ron"),
    ];
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryInfo {
    title: String,
    location_count: usize,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureInfo {
    message: String,
    recoverable: bool,
}

fn parse_state(state_json: &str) -> Result<PlayerState, JsError> {
    serde_json::from_str(state_json)
        .map_err(|e| JsError::new(&format!("Invalid game state JSON: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

#[wasm_bindgen]
pub struct AdventureDemo {
    engine: StoryEngine,
}

#[wasm_bindgen]
impl AdventureDemo {
    /// Load the bundled story.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AdventureDemo, JsError> {
        let mut catalog = ContentCatalog::new();
        for source in data::LOCATIONS {
            let location = ContentCatalog::parse_ron(source)
                .map_err(|e| JsError::new(&format!("Location parse error: {e}")))?;
            catalog
                .insert(location)
                .map_err(|e| JsError::new(&format!("Catalog error: {e}")))?;
        }

        let manifest = StoryManifest::parse_ron(data::STORY)
            .map_err(|e| JsError::new(&format!("Story parse error: {e}")))?;

        let engine = StoryEngine::builder()
            .with_catalog(catalog)
            .title(&manifest.title)
            .entry_point(&manifest.entry.location_id, &manifest.entry.scene_id)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;

        Ok(AdventureDemo { engine })
    }

    /// Return the starting `GameState` as JSON.
    pub fn initial_state(&self) -> Result<String, JsError> {
        to_json(&self.engine.initialize())
    }

    /// Take an action. Returns the next `GameState` JSON, or throws with
    /// the reason; the caller keeps its previous state on failure.
    pub fn apply_action(&self, state_json: &str, action: &str) -> Result<String, JsError> {
        let state = parse_state(state_json)?;
        let next = self
            .engine
            .apply_action(&state, action)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&next)
    }

    /// Use an inventory item. Same contract as `apply_action`.
    pub fn apply_item_use(&self, state_json: &str, item: &str) -> Result<String, JsError> {
        let state = parse_state(state_json)?;
        let next = self
            .engine
            .apply_item_use(&state, item)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&next)
    }

    /// Describe why an action would be rejected without throwing.
    /// Returns `null` JSON when the action is accepted.
    pub fn check_action(&self, state_json: &str, action: &str) -> Result<String, JsError> {
        let state = parse_state(state_json)?;
        let failure = self
            .engine
            .apply_action(&state, action)
            .err()
            .map(|e| FailureInfo {
                message: e.to_string(),
                recoverable: e.is_recoverable(),
            });
        to_json(&failure)
    }

    /// Return a JSON description of the loaded story.
    pub fn story_info(&self) -> Result<String, JsError> {
        to_json(&StoryInfo {
            title: self.engine.title().to_string(),
            location_count: self.engine.catalog().len(),
        })
    }
}
