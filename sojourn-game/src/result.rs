//! Summary of a finished run, for result screens and harness reports.

use serde::{Deserialize, Serialize};

use crate::state::{Ending, GamePhase, GameState};
use crate::stats::{Stats, round1};

/// How the run ended, flattened for display and report grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Completed,
    Exhaustion,
    Debt,
    Despair,
}

impl OutcomeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Exhaustion => "exhaustion",
            Self::Debt => "debt",
            Self::Despair => "despair",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<Ending> for OutcomeKind {
    fn from(ending: Ending) -> Self {
        match ending {
            Ending::Completed => Self::Completed,
            Ending::Burnout { cause } => match cause {
                crate::state::BurnoutCause::Exhaustion => Self::Exhaustion,
                crate::state::BurnoutCause::Debt => Self::Debt,
                crate::state::BurnoutCause::Despair => Self::Despair,
            },
        }
    }
}

/// Snapshot taken from a terminal [`GameState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub player_name: String,
    pub country: String,
    pub archetype: String,
    pub difficulty: String,
    pub outcome: OutcomeKind,
    /// Weeks actually lived through before the run ended.
    pub weeks_survived: u32,
    pub final_stats: Stats,
    pub goal_completed: bool,
    pub score: f64,
    pub ending_text: Option<String>,
}

impl ResultSummary {
    /// Build a summary from an ended state; `None` while the game is still
    /// in progress.
    #[must_use]
    pub fn from_state(state: &GameState) -> Option<Self> {
        if state.phase != GamePhase::Ending {
            return None;
        }
        let ending = state.ending?;
        Some(Self {
            player_name: state.persona.player_name.clone(),
            country: state.persona.country.label().to_string(),
            archetype: state.persona.archetype.label().to_string(),
            difficulty: state.persona.difficulty.to_string(),
            outcome: ending.into(),
            weeks_survived: state.week.saturating_sub(1),
            final_stats: state.stats,
            goal_completed: state
                .current_task
                .as_ref()
                .is_some_and(|task| task.completed),
            score: score(&state.stats),
            ending_text: state.ending_text.clone(),
        })
    }
}

/// Composite score for ranking runs: the soft stats at face value plus a
/// dampened money contribution so cash does not drown out everything else.
#[must_use]
pub fn score(stats: &Stats) -> f64 {
    round1(
        stats.intelligence
            + stats.stamina
            + stats.mood
            + stats.language
            + stats.social
            + stats.money / 100.0,
    )
}
