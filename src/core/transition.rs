/// State transitions — resolving actions and item uses against the
/// content graph.
///
/// Every function here is pure: the input state is borrowed, never
/// mutated, and a failure carries no partial result.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::catalog::ContentRegistry;
use crate::core::condition;
use crate::schema::action::{OnEnter, Transition};
use crate::schema::location::{Location, Scene};
use crate::schema::state::PlayerState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("action '{action}' is not available here")]
    InvalidAction { action: String },
    #[error("you are not carrying '{item}'")]
    ItemNotHeld { item: String },
    #[error("'{item}' has no use in scene '{scene}' of '{location}'")]
    ItemNotUsable {
        item: String,
        location: String,
        scene: String,
    },
    #[error("unknown location '{location}'")]
    UnknownLocation { location: String },
    #[error("unknown scene '{scene}' in location '{location}'")]
    UnknownScene { location: String, scene: String },
    #[error("player state points at missing scene '{scene}' in location '{location}'")]
    CorruptState { location: String, scene: String },
}

impl EngineError {
    /// Failures caused by player input; the state of record is still good
    /// and the player can simply choose again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidAction { .. } | Self::ItemNotHeld { .. } | Self::ItemNotUsable { .. }
        )
    }

    /// Failures caused by a transition that points outside the catalog.
    pub fn is_content_defect(&self) -> bool {
        matches!(self, Self::UnknownLocation { .. } | Self::UnknownScene { .. })
    }
}

/// Resolve the scene the state currently sits in.
fn current_scene<'a, R: ContentRegistry>(
    registry: &'a R,
    state: &PlayerState,
) -> Result<&'a Scene, EngineError> {
    registry
        .scene(&state.location_id, &state.scene_id)
        .ok_or_else(|| {
            tracing::error!(
                "Corrupt player state: {}/{} does not resolve",
                state.location_id,
                state.scene_id
            );
            EngineError::CorruptState {
                location: state.location_id.clone(),
                scene: state.scene_id.clone(),
            }
        })
}

/// Resolve a transition taken from `current_location`.
fn resolve_target<'a, R: ContentRegistry>(
    registry: &'a R,
    transition: &Transition,
    current_location: &str,
) -> Result<(&'a Location, &'a Scene), EngineError> {
    let location_id = transition.target_location(current_location);
    let location = registry.location(location_id).ok_or_else(|| {
        tracing::warn!("Transition names unknown location '{}'", location_id);
        EngineError::UnknownLocation {
            location: location_id.to_string(),
        }
    })?;
    let scene = location.scene(&transition.scene_id).ok_or_else(|| {
        tracing::warn!(
            "Transition names unknown scene '{}' in '{}'",
            transition.scene_id,
            location_id
        );
        EngineError::UnknownScene {
            location: location_id.to_string(),
            scene: transition.scene_id.clone(),
        }
    })?;
    Ok((location, scene))
}

/// Apply an on-enter bundle. The item is added before the flag is set.
fn apply_on_enter(
    on_enter: Option<&OnEnter>,
    mut inventory: Vec<String>,
    mut flags: BTreeMap<String, bool>,
) -> (Vec<String>, BTreeMap<String, bool>) {
    if let Some(effects) = on_enter {
        if let Some(ref item) = effects.adds_item {
            inventory.push(item.clone());
        }
        if let Some(ref flag) = effects.sets_flag {
            flags.insert(flag.clone(), true);
        }
    }
    (inventory, flags)
}

/// Produce the state for standing in `scene` of `location` with the given
/// inventory and flags. Visible actions are computed from these flags.
pub fn snapshot(
    location: &Location,
    scene_id: &str,
    scene: &Scene,
    inventory: Vec<String>,
    flags: BTreeMap<String, bool>,
) -> PlayerState {
    PlayerState {
        location_id: location.id.clone(),
        location_name: location.name.clone(),
        image_url: location.image.clone(),
        scene_id: scene_id.to_string(),
        narrative: scene.narrative.clone(),
        actions: condition::visible_actions(&scene.actions, &flags),
        inventory,
        flags,
    }
}

/// Enter the target of `transition`, applying its on-enter effects to the
/// given inventory and flags.
fn enter<R: ContentRegistry>(
    registry: &R,
    transition: &Transition,
    current_location: &str,
    inventory: Vec<String>,
    flags: BTreeMap<String, bool>,
) -> Result<PlayerState, EngineError> {
    let (location, scene) = resolve_target(registry, transition, current_location)?;
    let (inventory, flags) = apply_on_enter(scene.on_enter.as_ref(), inventory, flags);
    Ok(snapshot(location, &transition.scene_id, scene, inventory, flags))
}

/// The state a new session starts in: the entry scene with an empty
/// inventory and no flags set.
pub fn initial_state<R: ContentRegistry>(
    registry: &R,
    location_id: &str,
    scene_id: &str,
) -> Result<PlayerState, EngineError> {
    let (location, scene) =
        resolve_target(registry, &Transition::to(location_id, scene_id), location_id)?;
    Ok(snapshot(location, scene_id, scene, Vec::new(), BTreeMap::new()))
}

/// Take the action labelled `action_text` from the current scene.
pub fn apply_action<R: ContentRegistry>(
    registry: &R,
    state: &PlayerState,
    action_text: &str,
) -> Result<PlayerState, EngineError> {
    let scene = current_scene(registry, state)?;

    let action = scene
        .actions
        .iter()
        .find(|a| a.text == action_text && condition::is_visible(a, &state.flags))
        .ok_or_else(|| EngineError::InvalidAction {
            action: action_text.to_string(),
        })?;

    let next = enter(
        registry,
        &action.transition,
        &state.location_id,
        state.inventory.clone(),
        state.flags.clone(),
    )?;
    tracing::debug!(
        "Action '{}': {}/{} -> {}/{}",
        action_text,
        state.location_id,
        state.scene_id,
        next.location_id,
        next.scene_id
    );
    Ok(next)
}

/// Use one held item in the current scene.
pub fn apply_item_use<R: ContentRegistry>(
    registry: &R,
    state: &PlayerState,
    item_id: &str,
) -> Result<PlayerState, EngineError> {
    let Some(held_at) = state.inventory.iter().position(|item| item == item_id) else {
        return Err(EngineError::ItemNotHeld {
            item: item_id.to_string(),
        });
    };

    let scene = current_scene(registry, state)?;
    let item_use = scene
        .item_use(item_id)
        .ok_or_else(|| EngineError::ItemNotUsable {
            item: item_id.to_string(),
            location: state.location_id.clone(),
            scene: state.scene_id.clone(),
        })?;

    let mut inventory = state.inventory.clone();
    if item_use.consumed {
        inventory.remove(held_at);
    }

    let next = enter(
        registry,
        &item_use.transition,
        &state.location_id,
        inventory,
        state.flags.clone(),
    )?;
    tracing::debug!(
        "Used '{}' (consumed: {}): {}/{} -> {}/{}",
        item_id,
        item_use.consumed,
        state.location_id,
        state.scene_id,
        next.location_id,
        next.scene_id
    );
    Ok(next)
}
