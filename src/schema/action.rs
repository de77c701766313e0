use serde::{Deserialize, Serialize};

/// A pointer to the location and scene an action or item use leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Target location. `None` keeps the player in the current location.
    #[serde(default)]
    pub location_id: Option<String>,
    pub scene_id: String,
}

impl Transition {
    /// A transition to another scene of the current location.
    pub fn local(scene_id: impl Into<String>) -> Self {
        Self {
            location_id: None,
            scene_id: scene_id.into(),
        }
    }

    /// A transition to a scene in a named location.
    pub fn to(location_id: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self {
            location_id: Some(location_id.into()),
            scene_id: scene_id.into(),
        }
    }

    /// The location this transition lands in when taken from `current`.
    pub fn target_location<'a>(&'a self, current: &'a str) -> &'a str {
        self.location_id.as_deref().unwrap_or(current)
    }
}

/// Visibility predicate over story flags.
///
/// Every name in `all_set` must be set and no name in `none_set` may be
/// set. Both lists may be omitted in content files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShowIf {
    #[serde(default)]
    pub all_set: Vec<String>,
    #[serde(default)]
    pub none_set: Vec<String>,
}

/// A player-selectable choice within a scene.
///
/// `text` is both the button label and the identifier the player submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub text: String,
    pub transition: Transition,
    #[serde(default)]
    pub show_if: Option<ShowIf>,
}

/// What happens when an item is used in a particular scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUse {
    pub transition: Transition,
    #[serde(default)]
    pub consumed: bool,
}

/// Effects applied when a transition enters a scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnEnter {
    #[serde(default)]
    pub adds_item: Option<String>,
    #[serde(default)]
    pub sets_flag: Option<String>,
}
