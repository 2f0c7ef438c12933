//! Narrative generator port and the deterministic scripted implementation
//! used by tests and the headless tester.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::events::{EventOption, RandomEvent};
use crate::personas::{Archetype, Country, Difficulty};
use crate::state::GameState;
use crate::stats::{StatDelta, Stats};

/// Context handed to the generator when an event fires. Captured from the
/// stats as they were when the action was chosen, before the action's own
/// delta is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub difficulty: Difficulty,
    pub country: Country,
    pub week: u32,
    pub stats: Stats,
    pub archetype: Archetype,
}

/// External narrative/illustration collaborator. Implementations talk to a
/// text/image generation service; the engine only requires that every call
/// eventually resolves or fails, and converts failures to fallbacks itself.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate a narrative random event for the current turn.
    async fn generate_event(&self, ctx: &EventContext) -> anyhow::Result<RandomEvent>;

    /// Generate an illustration reference for an already-displayed event.
    /// `Ok(None)` is a valid, non-error outcome (the event stays text-only).
    async fn generate_illustration(
        &self,
        title: &str,
        description: &str,
    ) -> anyhow::Result<Option<String>>;

    /// Generate the closing narrative for a completed game.
    async fn generate_ending(&self, state: &GameState) -> anyhow::Result<String>;
}

/// Deterministic in-process generator. Events can be queued up front; when
/// the queue is empty a synthesized event derived from the context is
/// returned. Latency and failures are injectable so the orchestrator's
/// racing and fallback paths can be exercised.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    queued: Mutex<VecDeque<RandomEvent>>,
    latency: Option<Duration>,
    fail_events: bool,
    fail_illustrations: bool,
    fail_endings: bool,
    omit_images: bool,
    event_calls: AtomicU32,
    illustration_calls: AtomicU32,
    last_context: Mutex<Option<EventContext>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned event; queued events are served before synthesized
    /// ones.
    #[must_use]
    pub fn with_event(self, event: RandomEvent) -> Self {
        self.queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
        self
    }

    /// Simulate generation latency on every call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make `generate_event` fail, exercising the fallback-event path.
    #[must_use]
    pub const fn failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    /// Make `generate_illustration` fail, leaving events text-only.
    #[must_use]
    pub const fn failing_illustrations(mut self) -> Self {
        self.fail_illustrations = true;
        self
    }

    /// Make `generate_ending` fail, exercising the fallback closing text.
    #[must_use]
    pub const fn failing_endings(mut self) -> Self {
        self.fail_endings = true;
        self
    }

    /// Resolve illustrations to "no image" rather than a reference.
    #[must_use]
    pub const fn without_images(mut self) -> Self {
        self.omit_images = true;
        self
    }

    /// Number of event-generation calls observed so far.
    #[must_use]
    pub fn event_calls(&self) -> u32 {
        self.event_calls.load(Ordering::SeqCst)
    }

    /// Number of illustration calls observed so far.
    #[must_use]
    pub fn illustration_calls(&self) -> u32 {
        self.illustration_calls.load(Ordering::SeqCst)
    }

    /// The context of the most recent event call, for assertions on the
    /// pre-action stats ordering.
    #[must_use]
    pub fn last_context(&self) -> Option<EventContext> {
        self.last_context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn synthesize(ctx: &EventContext) -> RandomEvent {
        RandomEvent {
            title: format!("Week {}: A Letter from Home", ctx.week),
            description: format!(
                "Family news reaches you in {}. Reading it stirs something up.",
                ctx.country.label()
            ),
            options: vec![
                EventOption {
                    text: "Write back at length".to_string(),
                    result_text: "The reply takes all evening, but it settles you."
                        .to_string(),
                    consequence: StatDelta {
                        mood: 8.0,
                        stamina: -4.0,
                        ..StatDelta::default()
                    },
                },
                EventOption {
                    text: "Set it aside for exam season".to_string(),
                    result_text: "You bury yourself in work and try not to think about it."
                        .to_string(),
                    consequence: StatDelta {
                        intelligence: 3.0,
                        mood: -6.0,
                        ..StatDelta::default()
                    },
                },
            ],
            image: None,
        }
    }
}

#[async_trait]
impl NarrativeGenerator for ScriptedGenerator {
    async fn generate_event(&self, ctx: &EventContext) -> anyhow::Result<RandomEvent> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_context
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(ctx.clone());
        self.simulate_latency().await;
        if self.fail_events {
            anyhow::bail!("scripted event failure");
        }
        let queued = self
            .queued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(queued.unwrap_or_else(|| Self::synthesize(ctx)))
    }

    async fn generate_illustration(
        &self,
        title: &str,
        _description: &str,
    ) -> anyhow::Result<Option<String>> {
        self.illustration_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_illustrations {
            anyhow::bail!("scripted illustration failure");
        }
        if self.omit_images {
            return Ok(None);
        }
        let slug = title.to_lowercase().replace(' ', "-");
        Ok(Some(format!("scripted://{slug}")))
    }

    async fn generate_ending(&self, state: &GameState) -> anyhow::Result<String> {
        self.simulate_latency().await;
        if self.fail_endings {
            anyhow::bail!("scripted ending failure");
        }
        Ok(format!(
            "{} leaves {} after {} weeks with intelligence {:.0}, money {:.0} and \
{} friends' worth of social grace.",
            state.persona.player_name,
            state.persona.country.label(),
            state.week.saturating_sub(1),
            state.stats.intelligence,
            state.stats.money,
            state.stats.social as i64,
        ))
    }
}
