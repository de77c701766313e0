/// The story engine: a loaded catalog plus its fixed entry point.
///
/// Wraps the pure transition functions with content loading and
/// configuration. Built via `StoryEngine::builder()`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::{CatalogError, ContentCatalog};
use crate::core::transition::{self, EngineError};
use crate::schema::state::PlayerState;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("no entry point configured")]
    MissingEntryPoint,
    #[error("entry point does not resolve: {0}")]
    Entry(#[from] EngineError),
}

/// Where every new session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub location_id: String,
    pub scene_id: String,
}

/// Story manifest file: a title and the entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Story")]
pub struct StoryManifest {
    #[serde(default)]
    pub title: String,
    pub entry: EntryPoint,
}

impl StoryManifest {
    pub fn load_from_ron(path: &Path) -> Result<StoryManifest, StoryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<StoryManifest, StoryError> {
        Ok(ron::from_str(input)?)
    }
}

/// The top-level engine. Holds no mutable state; every call is a pure
/// function of its arguments and the catalog.
#[derive(Debug, Clone)]
pub struct StoryEngine {
    catalog: ContentCatalog,
    entry: EntryPoint,
    title: String,
    initial: PlayerState,
}

/// Builder for constructing a `StoryEngine`.
pub struct StoryEngineBuilder {
    locations_dirs: Vec<PathBuf>,
    manifest_path: Option<PathBuf>,
    entry: Option<EntryPoint>,
    title: Option<String>,
    /// Directly provided content (for testing and embedding without files).
    catalog: Option<ContentCatalog>,
}

impl StoryEngine {
    pub fn builder() -> StoryEngineBuilder {
        StoryEngineBuilder {
            locations_dirs: Vec::new(),
            manifest_path: None,
            entry: None,
            title: None,
            catalog: None,
        }
    }

    /// The entry state: entry scene, empty inventory, no flags.
    pub fn initialize(&self) -> PlayerState {
        self.initial.clone()
    }

    pub fn apply_action(
        &self,
        state: &PlayerState,
        action_text: &str,
    ) -> Result<PlayerState, EngineError> {
        transition::apply_action(&self.catalog, state, action_text)
    }

    pub fn apply_item_use(
        &self,
        state: &PlayerState,
        item_id: &str,
    ) -> Result<PlayerState, EngineError> {
        transition::apply_item_use(&self.catalog, state, item_id)
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn entry(&self) -> &EntryPoint {
        &self.entry
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl StoryEngineBuilder {
    /// Load every location file in `path`. May be called more than once.
    pub fn locations_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.locations_dirs.push(path.into());
        self
    }

    /// Read the title and entry point from a story manifest.
    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Set the entry point directly. Takes precedence over a manifest.
    pub fn entry_point(mut self, location_id: &str, scene_id: &str) -> Self {
        self.entry = Some(EntryPoint {
            location_id: location_id.to_string(),
            scene_id: scene_id.to_string(),
        });
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Provide content directly (for testing without files).
    pub fn with_catalog(mut self, catalog: ContentCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<StoryEngine, StoryError> {
        let mut catalog = self.catalog.unwrap_or_default();

        for dir in &self.locations_dirs {
            let loaded = ContentCatalog::load_dir(dir)?;
            catalog.merge(loaded)?;
        }

        let manifest = match self.manifest_path {
            Some(ref path) => Some(StoryManifest::load_from_ron(path)?),
            None => None,
        };

        let entry = match (self.entry, manifest.as_ref()) {
            (Some(entry), _) => entry,
            (None, Some(manifest)) => manifest.entry.clone(),
            (None, None) => return Err(StoryError::MissingEntryPoint),
        };
        let title = self
            .title
            .or_else(|| manifest.map(|m| m.title))
            .unwrap_or_default();

        let initial = transition::initial_state(&catalog, &entry.location_id, &entry.scene_id)?;

        tracing::info!(
            "Story '{}' ready: {} locations, entry {}/{}",
            title,
            catalog.len(),
            entry.location_id,
            entry.scene_id
        );

        Ok(StoryEngine {
            catalog,
            entry,
            title,
            initial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> ContentCatalog {
        let location = ContentCatalog::parse_ron(
            r#"Location(
                id: "manor",
                name: "The Manor",
                image: "images/manor.png",
                scenes: {
                    "foyer": Scene(
                        narrative: "A heavy door.",
                        actions: [(text: "Open the door", transition: (scene_id: "hallway"))],
                        on_enter: Some((adds_item: Some("umbrella"))),
                    ),
                    "hallway": Scene(
                        narrative: "A long hallway.",
                        on_enter: Some((sets_flag: Some("doorOpened"))),
                    ),
                },
            )"#,
        )
        .unwrap();
        ContentCatalog::from_locations([location]).unwrap()
    }

    #[test]
    fn build_requires_entry_point() {
        let result = StoryEngine::builder().with_catalog(test_catalog()).build();
        assert!(matches!(result, Err(StoryError::MissingEntryPoint)));
    }

    #[test]
    fn build_rejects_unresolvable_entry() {
        let result = StoryEngine::builder()
            .with_catalog(test_catalog())
            .entry_point("manor", "cellar")
            .build();
        assert!(matches!(
            result,
            Err(StoryError::Entry(EngineError::UnknownScene { .. }))
        ));
    }

    #[test]
    fn initialize_skips_entry_on_enter() {
        let engine = StoryEngine::builder()
            .with_catalog(test_catalog())
            .entry_point("manor", "foyer")
            .title("Test")
            .build()
            .unwrap();
        let state = engine.initialize();
        assert_eq!(state.scene_id, "foyer");
        assert!(state.inventory.is_empty());
        assert!(state.flags.is_empty());
        assert_eq!(state.actions, vec!["Open the door"]);
        assert_eq!(engine.title(), "Test");
        assert_eq!(engine.entry().location_id, "manor");
    }

    #[test]
    fn engine_delegates_to_transitions() {
        let engine = StoryEngine::builder()
            .with_catalog(test_catalog())
            .entry_point("manor", "foyer")
            .build()
            .unwrap();
        let start = engine.initialize();
        let next = engine.apply_action(&start, "Open the door").unwrap();
        assert!(next.is_flag_set("doorOpened"));
        assert!(matches!(
            engine.apply_item_use(&next, "umbrella"),
            Err(EngineError::ItemNotHeld { .. })
        ));
        // Input untouched.
        assert_eq!(start, engine.initialize());
    }

    #[test]
    fn manifest_parses() {
        let manifest = StoryManifest::parse_ron(
            r#"Story(title: "Lamplight", entry: (location_id: "lighthouse", scene_id: "door"))"#,
        )
        .unwrap();
        assert_eq!(manifest.title, "Lamplight");
        assert_eq!(manifest.entry.scene_id, "door");
    }

    #[test]
    fn explicit_entry_overrides_manifest() {
        let engine = StoryEngine::builder()
            .locations_dir("tests/fixtures/locations")
            .manifest("tests/fixtures/story.ron")
            .entry_point("cove", "beach")
            .build()
            .unwrap();
        assert_eq!(engine.initialize().location_id, "cove");
        assert!(!engine.title().is_empty());
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoryEngine>();
    }
}
