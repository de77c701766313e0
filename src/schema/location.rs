use rustc_hash::FxHashMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::fmt;
use std::marker::PhantomData;

use super::action::{Action, ItemUse, OnEnter};

/// A single narrative beat within a location: the unit of display and of
/// action offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub narrative: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Keyed by item id. A repeated key is a parse error.
    #[serde(default, deserialize_with = "unique_keys")]
    pub item_use: FxHashMap<String, ItemUse>,
    #[serde(default)]
    pub on_enter: Option<OnEnter>,
}

impl Scene {
    /// The item-use rule for `item_id` in this scene, if any.
    pub fn item_use(&self, item_id: &str) -> Option<&ItemUse> {
        self.item_use.get(item_id)
    }
}

/// An authored place in the story. Scene ids are scoped to their location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Asset reference for the location illustration.
    pub image: String,
    /// A repeated scene id is a parse error.
    #[serde(deserialize_with = "unique_keys")]
    pub scenes: FxHashMap<String, Scene>,
}

impl Location {
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    pub fn has_scene(&self, scene_id: &str) -> bool {
        self.scenes.contains_key(scene_id)
    }
}

/// Deserialize a string-keyed map, failing on the first repeated key
/// instead of letting the later entry replace the earlier one.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<FxHashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = FxHashMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = FxHashMap::default();
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                match map.entry(key) {
                    Entry::Occupied(e) => {
                        return Err(de::Error::custom(format_args!(
                            "duplicate key '{}'",
                            e.key()
                        )));
                    }
                    Entry::Vacant(e) => {
                        e.insert(value);
                    }
                }
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLAR: &str = r#"
        Location(
            id: "cellar",
            name: "The Cellar",
            image: "images/cellar.png",
            scenes: {
                "stairs": Scene(
                    narrative: "Stone steps descend into the dark.",
                    actions: [
                        (text: "Go down", transition: (scene_id: "bottom")),
                    ],
                ),
                "bottom": Scene(
                    narrative: "Barrels line the walls.",
                    item_use: {
                        "torch": (transition: (scene_id: "lit"), consumed: false),
                    },
                    on_enter: Some((sets_flag: Some("cellarFound"))),
                ),
            },
        )
    "#;

    #[test]
    fn location_from_ron() {
        let location: Location = ron::from_str(CELLAR).unwrap();
        assert_eq!(location.id, "cellar");
        assert_eq!(location.scenes.len(), 2);
        assert!(location.has_scene("stairs"));
        assert!(!location.has_scene("attic"));
    }

    #[test]
    fn optional_scene_fields_default() {
        let location: Location = ron::from_str(CELLAR).unwrap();
        let stairs = location.scene("stairs").unwrap();
        assert!(stairs.item_use.is_empty());
        assert!(stairs.on_enter.is_none());

        let bottom = location.scene("bottom").unwrap();
        assert!(bottom.actions.is_empty());
        assert!(bottom.item_use("torch").is_some());
        assert!(bottom.item_use("key").is_none());
        assert_eq!(
            bottom.on_enter.as_ref().and_then(|e| e.sets_flag.as_deref()),
            Some("cellarFound")
        );
    }

    #[test]
    fn duplicate_scene_id_rejected() {
        let err = ron::from_str::<Location>(
            r#"Location(
                id: "cellar",
                name: "The Cellar",
                image: "images/cellar.png",
                scenes: {
                    "stairs": Scene(narrative: "First."),
                    "stairs": Scene(narrative: "Second."),
                },
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate key 'stairs'"), "{err}");
    }

    #[test]
    fn duplicate_item_use_key_rejected() {
        let err = ron::from_str::<Scene>(
            r#"Scene(
                narrative: "Barrels line the walls.",
                item_use: {
                    "torch": (transition: (scene_id: "lit")),
                    "torch": (transition: (scene_id: "dark"), consumed: true),
                },
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate key 'torch'"), "{err}");
    }
}
