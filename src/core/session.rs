/// Session — the state of record for one player.
///
/// Replaces the current state only when a transition succeeds, so a failed
/// action or item use leaves the last valid state in place. Transitions
/// take `&mut self`, which keeps at most one in flight per session.

use thiserror::Error;

use crate::core::engine::StoryEngine;
use crate::core::transition::EngineError;
use crate::schema::state::PlayerState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("no item selected")]
    NoItemSelected,
}

pub struct Session<'e> {
    engine: &'e StoryEngine,
    state: PlayerState,
    selected_item: Option<String>,
    last_error: Option<SessionError>,
    turns: u64,
}

impl<'e> Session<'e> {
    pub fn new(engine: &'e StoryEngine) -> Self {
        let state = engine.initialize();
        let selected_item = state.inventory.first().cloned();
        Self {
            engine,
            state,
            selected_item,
            last_error: None,
            turns: 0,
        }
    }

    /// Resume from a previously produced state. The state is checked on
    /// the next transition, not here.
    pub fn resume(engine: &'e StoryEngine, state: PlayerState) -> Self {
        let selected_item = state.inventory.first().cloned();
        Self {
            engine,
            state,
            selected_item,
            last_error: None,
            turns: 0,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn into_state(self) -> PlayerState {
        self.state
    }

    /// The error from the most recent failed call, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    /// Number of successful transitions since the session started.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Select a held item for `use_selected_item`.
    pub fn select_item(&mut self, item_id: &str) -> Result<(), SessionError> {
        if !self.state.holds(item_id) {
            return Err(self.reject(
                EngineError::ItemNotHeld {
                    item: item_id.to_string(),
                }
                .into(),
            ));
        }
        self.selected_item = Some(item_id.to_string());
        self.last_error = None;
        Ok(())
    }

    pub fn perform_action(&mut self, action_text: &str) -> Result<&PlayerState, SessionError> {
        let result = self.engine.apply_action(&self.state, action_text);
        self.commit(result.map_err(SessionError::from))
    }

    pub fn use_item(&mut self, item_id: &str) -> Result<&PlayerState, SessionError> {
        let result = self.engine.apply_item_use(&self.state, item_id);
        self.commit(result.map_err(SessionError::from))
    }

    pub fn use_selected_item(&mut self) -> Result<&PlayerState, SessionError> {
        let result = match self.selected_item {
            Some(ref item) => self
                .engine
                .apply_item_use(&self.state, item)
                .map_err(SessionError::from),
            None => Err(SessionError::NoItemSelected),
        };
        self.commit(result)
    }

    /// Start over from the entry point.
    pub fn restart(&mut self) -> &PlayerState {
        self.state = self.engine.initialize();
        self.selected_item = self.state.inventory.first().cloned();
        self.last_error = None;
        self.turns = 0;
        &self.state
    }

    fn commit(
        &mut self,
        result: Result<PlayerState, SessionError>,
    ) -> Result<&PlayerState, SessionError> {
        match result {
            Ok(next) => {
                self.state = next;
                self.selected_item = self.state.inventory.first().cloned();
                self.last_error = None;
                self.turns += 1;
                Ok(&self.state)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn reject(&mut self, err: SessionError) -> SessionError {
        tracing::debug!("Rejected at turn {}: {}", self.turns, err);
        self.last_error = Some(err.clone());
        err
    }
}
