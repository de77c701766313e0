use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete snapshot of player progress, the engine's sole input and
/// output currency.
///
/// Serializes with the camelCase field names the presentation layer
/// expects (`locationId`, `imageUrl`, ...). `actions` holds the labels that
/// were visible when the state was produced; it is not recomputed when
/// `flags` are read later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub location_id: String,
    pub location_name: String,
    pub image_url: String,
    pub scene_id: String,
    pub narrative: String,
    pub actions: Vec<String>,
    pub inventory: Vec<String>,
    pub flags: BTreeMap<String, bool>,
}

impl PlayerState {
    /// Returns true if the flag is present and set. Missing flags are unset.
    pub fn is_flag_set(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|item| item == item_id)
    }

    /// Number of units of `item_id` in the inventory.
    pub fn count_of(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|item| *item == item_id).count()
    }

    pub fn can_choose(&self, action_text: &str) -> bool {
        self.actions.iter().any(|a| a == action_text)
    }
}
