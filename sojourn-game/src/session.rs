//! The turn orchestrator: paces action resolution, races narrative
//! generation against the pacing delay, and merges late illustrations
//! behind a token guard.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use crate::actions::{ActionId, resolve_action};
use crate::constants::{
    ACTION_PACING_MS, EVENT_FORCE_INTERVAL_WEEKS, EVENT_PROBABILITY_THRESHOLD,
    FALLBACK_ENDING_NARRATIVE,
};
use crate::events::{ActiveEvent, EventToken, RandomEvent, fallback_event};
use crate::generator::{EventContext, NarrativeGenerator};
use crate::personas::Persona;
use crate::state::{Ending, GamePhase, GameState, WeekOutcome};

/// Result of submitting an action for the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Another action is already resolving, or the session is not in the
    /// turn loop. Nothing changed.
    Rejected,
    /// The action resolved and the week advanced.
    Advanced(WeekOutcome),
    /// The action resolved into a random event awaiting a choice.
    EventRaised { token: EventToken },
}

/// When the turn loop rolls for a random event. `Standard` is the live
/// behavior; the fixed policies exist for deterministic harness runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPolicy {
    #[default]
    Standard,
    Never,
    Always,
}

impl EventPolicy {
    fn decide(self, state: &mut GameState) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Standard => {
                state.week % EVENT_FORCE_INTERVAL_WEEKS == 0
                    || state.rng_mut().gen_range(0.0..1.0_f32) > EVENT_PROBABILITY_THRESHOLD
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no event is awaiting a choice")]
    NoActiveEvent,
    #[error("event option {index} out of range ({available} available)")]
    InvalidOption { index: usize, available: usize },
}

/// Owns a [`GameState`] and drives it through the turn loop against an
/// external [`NarrativeGenerator`].
pub struct GameSession {
    state: GameState,
    generator: Arc<dyn NarrativeGenerator>,
    active_event: Option<ActiveEvent>,
    pending_illustration: Option<(EventToken, JoinHandle<Option<String>>)>,
    pacing: Duration,
    event_policy: EventPolicy,
    next_token: u64,
}

impl GameSession {
    /// Start a fresh session in the turn loop.
    #[must_use]
    pub fn start(persona: Persona, generator: Arc<dyn NarrativeGenerator>, seed: u64) -> Self {
        let mut state = GameState::new(persona, crate::constants::DEFAULT_MAX_WEEKS, seed);
        state.begin();
        Self::resume(state, generator)
    }

    /// Wrap an existing (typically loaded) state in a session.
    #[must_use]
    pub fn resume(state: GameState, generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            state,
            generator,
            active_event: None,
            pending_illustration: None,
            pacing: Duration::from_millis(ACTION_PACING_MS),
            event_policy: EventPolicy::Standard,
            next_token: 0,
        }
    }

    /// Override the pacing delay (harness runs use zero).
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub const fn with_event_policy(mut self, policy: EventPolicy) -> Self {
        self.event_policy = policy;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub const fn active_event(&self) -> Option<&ActiveEvent> {
        self.active_event.as_ref()
    }

    /// Resolve one weekly action. Event text generation is dispatched
    /// before the pacing delay so the wait overlaps the generator's
    /// latency; the context snapshot is taken before the action's own
    /// delta lands.
    pub async fn perform_action(&mut self, action: ActionId) -> TurnOutcome {
        if self.state.phase != GamePhase::Playing || self.state.action_in_flight() {
            return TurnOutcome::Rejected;
        }
        self.state.current_action = Some(action);

        let pending_event = if self.event_policy.decide(&mut self.state) {
            log::debug!("random event rolled for week {}", self.state.week);
            let ctx = EventContext {
                difficulty: self.state.persona.difficulty,
                country: self.state.persona.country,
                week: self.state.week,
                stats: self.state.stats,
                archetype: self.state.persona.archetype,
            };
            let generator = Arc::clone(&self.generator);
            Some(tokio::spawn(
                async move { generator.generate_event(&ctx).await },
            ))
        } else {
            None
        };

        tokio::time::sleep(self.pacing).await;

        let outcome = resolve_action(
            action,
            self.state.persona.archetype,
            self.state.persona.country,
        );
        self.state
            .apply_consequence(&outcome.delta, Some(&outcome.log_line));

        if let Some(handle) = pending_event {
            let event = match handle.await {
                Ok(Ok(event)) => event.sanitize().unwrap_or_else(fallback_event),
                Ok(Err(err)) => {
                    log::warn!("event generation failed: {err}");
                    fallback_event()
                }
                Err(err) => {
                    log::warn!("event generation panicked: {err}");
                    fallback_event()
                }
            };
            let token = self.raise_event(event);
            self.state.current_action = None;
            return TurnOutcome::EventRaised { token };
        }

        let week = self.advance_and_finish().await;
        self.state.current_action = None;
        TurnOutcome::Advanced(week)
    }

    fn raise_event(&mut self, event: RandomEvent) -> EventToken {
        self.next_token += 1;
        let token = EventToken(self.next_token);
        let generator = Arc::clone(&self.generator);
        let title = event.title.clone();
        let description = event.description.clone();
        let handle = tokio::spawn(async move {
            match generator.generate_illustration(&title, &description).await {
                Ok(image) => image,
                Err(err) => {
                    log::warn!("illustration generation failed: {err}");
                    None
                }
            }
        });
        self.pending_illustration = Some((token, handle));
        self.active_event = Some(ActiveEvent { token, event });
        self.state.phase = GamePhase::Event;
        token
    }

    /// Apply the chosen branch of the active event and advance the week.
    pub async fn resolve_event(&mut self, index: usize) -> Result<WeekOutcome, SessionError> {
        if self.state.phase != GamePhase::Event {
            return Err(SessionError::NoActiveEvent);
        }
        let option = {
            let active = self.active_event.as_ref().ok_or(SessionError::NoActiveEvent)?;
            active
                .event
                .options
                .get(index)
                .cloned()
                .ok_or(SessionError::InvalidOption {
                    index,
                    available: active.event.options.len(),
                })?
        };
        self.active_event = None;
        self.state.phase = GamePhase::Playing;
        self.state
            .apply_consequence(&option.consequence, Some(&option.result_text));
        Ok(self.advance_and_finish().await)
    }

    /// Merge an illustration for the event identified by `token`. A stale
    /// token (the event was already resolved, or a newer one replaced it)
    /// is dropped and `false` returned.
    pub fn apply_illustration(&mut self, token: EventToken, image: String) -> bool {
        match self.active_event.as_mut() {
            Some(active) if active.token == token => {
                active.event.image = Some(image);
                true
            }
            _ => false,
        }
    }

    /// Wait for the in-flight illustration, if any, and merge it through
    /// the token guard. Returns whether an image was applied.
    pub async fn await_illustration(&mut self) -> bool {
        let Some((token, handle)) = self.pending_illustration.take() else {
            return false;
        };
        match handle.await {
            Ok(Some(image)) => self.apply_illustration(token, image),
            Ok(None) => false,
            Err(err) => {
                log::warn!("illustration task failed: {err}");
                false
            }
        }
    }

    async fn advance_and_finish(&mut self) -> WeekOutcome {
        let outcome = self.state.advance_week();
        if outcome == WeekOutcome::Ended(Ending::Completed) {
            let text = match self.generator.generate_ending(&self.state).await {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("ending generation failed: {err}");
                    FALLBACK_ENDING_NARRATIVE.to_string()
                }
            };
            self.state.ending_text = Some(text);
        }
        outcome
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.state.toggle_sound()
    }

    /// Throw the run away and start over with the same persona and seed.
    pub fn restart(&mut self) {
        let persona = self.state.persona.clone();
        let max_weeks = self.state.max_weeks;
        let seed = self.state.seed;
        self.state = GameState::new(persona, max_weeks, seed);
        self.state.begin();
        self.active_event = None;
        self.pending_illustration = None;
    }
}
