//! Narrative random events and the token guard for late-arriving
//! illustrations.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EVENT_MAX_OPTIONS, FALLBACK_EVENT_DESCRIPTION, FALLBACK_EVENT_MOOD_BONUS,
    FALLBACK_EVENT_OPTION, FALLBACK_EVENT_RESULT, FALLBACK_EVENT_TITLE,
};
use crate::stats::StatDelta;

/// One selectable branch of a random event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub text: String,
    pub result_text: String,
    #[serde(default)]
    pub consequence: StatDelta,
}

/// A generated narrative branch point. The illustration arrives
/// asynchronously after the text and may never arrive at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub title: String,
    pub description: String,
    pub options: Vec<EventOption>,
    #[serde(default)]
    pub image: Option<String>,
}

impl RandomEvent {
    /// Normalize a generator response. Returns `None` for an unusable event
    /// (no options); surplus options beyond the display limit are dropped.
    #[must_use]
    pub fn sanitize(mut self) -> Option<Self> {
        if self.options.is_empty() {
            return None;
        }
        self.options.truncate(EVENT_MAX_OPTIONS);
        Some(self)
    }
}

/// Fixed innocuous substitute used when event generation fails: a single
/// neutral option with a small positive mood consequence, so the turn loop
/// never stalls.
#[must_use]
pub fn fallback_event() -> RandomEvent {
    RandomEvent {
        title: FALLBACK_EVENT_TITLE.to_string(),
        description: FALLBACK_EVENT_DESCRIPTION.to_string(),
        options: vec![EventOption {
            text: FALLBACK_EVENT_OPTION.to_string(),
            result_text: FALLBACK_EVENT_RESULT.to_string(),
            consequence: StatDelta {
                mood: FALLBACK_EVENT_MOOD_BONUS,
                ..StatDelta::default()
            },
        }],
        image: None,
    }
}

/// Opaque identity for a displayed event. An illustration response is
/// merged only while its token still matches the active event's token;
/// anything else is a stale result and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventToken(pub(crate) u64);

/// The event currently shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub token: EventToken,
    pub event: RandomEvent,
}
