/// Content catalog — the read-only registry of authored locations.

use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::location::{Location, Scene};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("location '{0}' is defined more than once")]
    DuplicateLocation(String),
}

/// Lookup contract between the engine and whatever stores the content.
///
/// Implementations must not change what they return for the lifetime of a
/// session.
pub trait ContentRegistry {
    fn location(&self, id: &str) -> Option<&Location>;

    fn scene(&self, location_id: &str, scene_id: &str) -> Option<&Scene> {
        self.location(location_id)?.scene(scene_id)
    }
}

/// In-memory catalog of locations keyed by id. Scene ids are scoped to
/// their location, so the whole graph is two flat lookups deep.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    locations: FxHashMap<String, Location>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of locations, rejecting duplicate ids.
    pub fn from_locations(
        locations: impl IntoIterator<Item = Location>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for location in locations {
            catalog.insert(location)?;
        }
        Ok(catalog)
    }

    /// Parse a single `Location(...)` document.
    pub fn parse_ron(input: &str) -> Result<Location, CatalogError> {
        Ok(ron::from_str(input)?)
    }

    /// Load a single location file.
    pub fn load_from_ron(path: &Path) -> Result<Location, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Load every `.ron` file in `dir`, one location per file.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent; keep duplicate errors stable.
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let location = Self::load_from_ron(&path)?;
            tracing::debug!(
                "Loaded location '{}' ({} scenes) from {}",
                location.id,
                location.scenes.len(),
                path.display()
            );
            catalog.insert(location)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, location: Location) -> Result<(), CatalogError> {
        if self.locations.contains_key(&location.id) {
            return Err(CatalogError::DuplicateLocation(location.id));
        }
        self.locations.insert(location.id.clone(), location);
        Ok(())
    }

    /// Move every location of `other` into this catalog. Locations never
    /// override each other: a shared id is an error and leaves `self`
    /// untouched.
    pub fn merge(&mut self, other: ContentCatalog) -> Result<(), CatalogError> {
        if let Some(id) = other
            .locations
            .keys()
            .find(|id| self.locations.contains_key(*id))
        {
            return Err(CatalogError::DuplicateLocation(id.clone()));
        }
        self.locations.extend(other.locations);
        Ok(())
    }

    pub fn get_location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn location_ids(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }
}

impl ContentRegistry for ContentCatalog {
    fn location(&self, id: &str) -> Option<&Location> {
        self.get_location(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_location(id: &str) -> Location {
        ContentCatalog::parse_ron(&format!(
            r#"Location(
                id: "{id}",
                name: "Somewhere",
                image: "images/{id}.png",
                scenes: {{
                    "start": Scene(narrative: "You are here."),
                }},
            )"#
        ))
        .unwrap()
    }

    #[test]
    fn lookup_hits_and_misses() {
        let catalog = ContentCatalog::from_locations([make_location("manor")]).unwrap();
        assert!(catalog.get_location("manor").is_some());
        assert!(catalog.get_location("garden").is_none());
        assert!(catalog.scene("manor", "start").is_some());
        assert!(catalog.scene("manor", "attic").is_none());
        assert!(catalog.scene("garden", "start").is_none());
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut catalog = ContentCatalog::new();
        catalog.insert(make_location("manor")).unwrap();
        let err = catalog.insert(make_location("manor")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLocation(id) if id == "manor"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn merge_combines_disjoint_catalogs() {
        let mut base = ContentCatalog::from_locations([make_location("manor")]).unwrap();
        let other = ContentCatalog::from_locations([make_location("garden")]).unwrap();
        base.merge(other).unwrap();
        assert_eq!(base.len(), 2);

        let mut ids: Vec<&str> = base.location_ids().collect();
        ids.sort();
        assert_eq!(ids, vec!["garden", "manor"]);
    }

    #[test]
    fn merge_with_shared_id_leaves_catalog_untouched() {
        let mut base = ContentCatalog::from_locations([make_location("manor")]).unwrap();
        let other =
            ContentCatalog::from_locations([make_location("garden"), make_location("manor")])
                .unwrap();
        assert!(matches!(
            base.merge(other),
            Err(CatalogError::DuplicateLocation(_))
        ));
        assert_eq!(base.len(), 1);
        assert!(base.get_location("garden").is_none());
    }

    #[test]
    fn parse_error_surfaces_as_ron() {
        let err = ContentCatalog::parse_ron("Location(id: ").unwrap_err();
        assert!(matches!(err, CatalogError::Ron(_)));
    }

    #[test]
    fn load_fixture_directory() {
        let catalog =
            ContentCatalog::load_dir(Path::new("tests/fixtures/locations")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get_location("lighthouse").is_some());
        assert!(catalog.get_location("cove").is_some());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = ContentCatalog::load_dir(Path::new("tests/fixtures/nowhere")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
