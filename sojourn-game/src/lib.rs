//! Sojourn Game Engine
//!
//! Platform-agnostic core logic for the Sojourn study-abroad life sim.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies; narrative generation and persistence are ports the host
//! plugs in.

pub mod actions;
pub mod constants;
pub mod events;
pub mod generator;
pub mod personas;
pub mod result;
pub mod session;
pub mod state;
pub mod stats;
pub mod tasks;

// Re-export commonly used types
pub use actions::{ActionId, ActionOutcome, display_label, resolve_action, validate_table};
pub use events::{ActiveEvent, EventOption, EventToken, RandomEvent, fallback_event};
pub use generator::{EventContext, NarrativeGenerator, ScriptedGenerator};
pub use personas::{Archetype, Country, Difficulty, Persona};
pub use result::{OutcomeKind, ResultSummary, score};
pub use session::{EventPolicy, GameSession, SessionError, TurnOutcome};
pub use state::{BurnoutCause, Ending, GamePhase, GameState, WeekOutcome};
pub use stats::{StatDelta, StatKey, Stats, round1};
pub use tasks::{Task, generate_task};

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main engine facade: pairs the turn logic with a storage backend.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new playing-phase state for the given persona.
    #[must_use]
    pub fn create_game(&self, persona: Persona, seed: u64) -> GameState {
        let mut state = GameState::new(persona, constants::DEFAULT_MAX_WEEKS, seed);
        state.begin();
        state
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Persist the state unless it is in a phase that should never be
    /// resumed: setup has nothing worth keeping and ended runs stay ended.
    /// Storage failures are logged, not propagated; autosave must never
    /// interrupt play.
    pub fn autosave(&self, save_name: &str, game_state: &GameState) -> bool {
        if matches!(game_state.phase, GamePhase::Setup | GamePhase::Ending) {
            return false;
        }
        match self.storage.save_game(save_name, game_state) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("autosave failed: {err}");
                false
            }
        }
    }

    /// Load a game state. The RNG is reseeded lazily from the stored seed
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn load_game(&self, save_name: &str) -> Result<Option<GameState>, S::Error> {
        self.storage.load_game(save_name)
    }

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, GameState>>>,
    }

    impl GameStorage for MemoryStorage {
        type Error = Infallible;

        fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(save_name.to_string(), game_state.clone());
            Ok(())
        }

        fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(self.saves.borrow().get(save_name).cloned())
        }

        fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(save_name);
            Ok(())
        }
    }

    #[derive(Clone, Copy, Default)]
    struct BrokenStorage;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskError;

    impl GameStorage for BrokenStorage {
        type Error = DiskError;

        fn save_game(&self, _: &str, _: &GameState) -> Result<(), Self::Error> {
            Err(DiskError)
        }

        fn load_game(&self, _: &str) -> Result<Option<GameState>, Self::Error> {
            Err(DiskError)
        }

        fn delete_save(&self, _: &str) -> Result<(), Self::Error> {
            Err(DiskError)
        }
    }

    fn persona() -> Persona {
        Persona {
            player_name: "Ada".to_string(),
            difficulty: Difficulty::Undergraduate,
            country: Country::Germany,
            archetype: Archetype::SocialButterfly,
        }
    }

    #[test]
    fn engine_creates_and_roundtrips_state() {
        let engine = GameEngine::new(MemoryStorage::default());
        let mut state = engine.create_game(persona(), 0xABCD);
        state.week = 9;
        engine.save_game("slot-one", &state).unwrap();

        let loaded = engine.load_game("slot-one").unwrap().expect("save exists");
        assert_eq!(loaded.week, 9);
        assert_eq!(loaded.persona.player_name, "Ada");
        assert!(engine.load_game("missing-slot").unwrap().is_none());

        engine.delete_save("slot-one").unwrap();
        assert!(engine.load_game("slot-one").unwrap().is_none());
    }

    #[test]
    fn autosave_skips_setup_and_ended_states() {
        let engine = GameEngine::new(MemoryStorage::default());
        let mut state = GameState::new(persona(), 50, 1);
        assert!(!engine.autosave("slot", &state));

        state.begin();
        assert!(engine.autosave("slot", &state));
        assert!(engine.load_game("slot").unwrap().is_some());

        state.phase = GamePhase::Ending;
        state.week = 20;
        assert!(!engine.autosave("slot", &state));
        let saved = engine.load_game("slot").unwrap().unwrap();
        assert_ne!(saved.week, 20);
    }

    #[test]
    fn autosave_swallows_storage_failures() {
        let engine = GameEngine::new(BrokenStorage);
        let mut state = GameState::new(persona(), 50, 1);
        state.begin();
        assert!(!engine.autosave("slot", &state));
    }
}
