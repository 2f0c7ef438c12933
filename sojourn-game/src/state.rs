//! The aggregate game state and the week-advance rules.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::constants::{BURNOUT_NARRATIVE, DEBT_FLOOR, MAX_LOGS, MOOD_FLOOR, STAMINA_FLOOR};
use crate::personas::Persona;
use crate::stats::{StatDelta, Stats};
use crate::tasks::{Task, generate_task};

/// UI-visible phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Setup,
    Playing,
    Event,
    Ending,
}

/// Why a burnout ending fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnoutCause {
    /// Stamina hit zero.
    Exhaustion,
    /// Money fell through the debt floor.
    Debt,
    /// Mood hit zero.
    Despair,
}

impl BurnoutCause {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Exhaustion => "exhaustion",
            Self::Debt => "debt",
            Self::Despair => "despair",
        }
    }
}

/// Terminal outcome of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ending {
    Burnout { cause: BurnoutCause },
    Completed,
}

/// Result of advancing the week counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekOutcome {
    Continuing,
    Ended(Ending),
}

/// Aggregate root. Mutated exclusively through [`crate::session::GameSession`]
/// and the methods below; persisted whole by the storage port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub persona: Persona,
    pub week: u32,
    pub max_weeks: u32,
    pub stats: Stats,
    /// Previous turn's vector, retained for UI delta feedback.
    pub prev_stats: Stats,
    #[serde(default)]
    pub current_task: Option<Task>,
    pub logs: Vec<String>,
    pub phase: GamePhase,
    /// The in-flight action marker: non-null exactly while an action is
    /// resolving. This is the authoritative guard against concurrent turns.
    #[serde(default)]
    pub current_action: Option<ActionId>,
    #[serde(default = "default_sound")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub ending_text: Option<String>,
    pub seed: u64,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
}

const fn default_sound() -> bool {
    true
}

impl GameState {
    /// Fresh setup-phase state. Stats hold the difficulty baseline until
    /// [`Self::begin`] applies the archetype modifiers.
    #[must_use]
    pub fn new(persona: Persona, max_weeks: u32, seed: u64) -> Self {
        let baseline = persona.difficulty.initial_stats();
        Self {
            persona,
            week: 1,
            max_weeks,
            stats: baseline,
            prev_stats: baseline,
            current_task: None,
            logs: vec!["Welcome to the study-abroad survival challenge!".to_string()],
            phase: GamePhase::Setup,
            current_action: None,
            sound_enabled: true,
            ending: None,
            ending_text: None,
            seed,
            rng: Some(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Leave setup: apply the archetype's one-time modifiers, hand out the
    /// first goal, and enter the turn loop.
    pub fn begin(&mut self) {
        let stats = self.persona.starting_stats();
        self.stats = stats;
        self.prev_stats = stats;
        self.week = 1;
        let archetype = self.persona.archetype;
        let week = self.week;
        self.current_task = generate_task(archetype, week, self.rng_mut());
        self.logs = vec![format!(
            "{}, welcome to {} — your study-abroad life begins!",
            self.persona.player_name,
            self.persona.country.label(),
        )];
        self.phase = GamePhase::Playing;
    }

    /// Lazily (re)seed the RNG; deserialized states arrive without one.
    pub fn rng_mut(&mut self) -> &mut ChaCha20Rng {
        let seed = self.seed;
        self.rng
            .get_or_insert_with(|| ChaCha20Rng::seed_from_u64(seed))
    }

    /// Append a narrative log line, dropping the oldest beyond the cap.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
        if self.logs.len() > MAX_LOGS {
            let excess = self.logs.len() - MAX_LOGS;
            self.logs.drain(..excess);
        }
    }

    /// The single stat-mutation primitive. Snapshots the previous vector,
    /// applies the delta, then runs the goal-completion check: a satisfied
    /// goal is marked complete, logged, and has its reward added in the
    /// same mutation step.
    pub fn apply_consequence(&mut self, delta: &StatDelta, log_line: Option<&str>) {
        self.prev_stats = self.stats;
        self.stats = self.stats.apply(delta);
        if let Some(line) = log_line {
            if !line.is_empty() {
                self.push_log(line);
            }
        }
        self.check_task_completion();
    }

    fn check_task_completion(&mut self) {
        let Some(task) = self.current_task.as_mut() else {
            return;
        };
        if task.completed || self.stats.get(task.target) < task.target_value {
            return;
        }
        task.completed = true;
        let reward = task.reward;
        let description = task.description.clone();
        self.push_log(format!("Goal reached: {description}!"));
        self.stats = self.stats.apply(&reward);
    }

    /// Advance the week counter and evaluate termination. Failure
    /// thresholds are checked against the current vector first and win over
    /// normal completion; otherwise the goal is regenerated when stale and
    /// play continues.
    pub fn advance_week(&mut self) -> WeekOutcome {
        self.week += 1;

        if let Some(cause) = self.burnout_cause() {
            self.ending = Some(Ending::Burnout { cause });
            self.ending_text = Some(BURNOUT_NARRATIVE.to_string());
            self.phase = GamePhase::Ending;
            return WeekOutcome::Ended(Ending::Burnout { cause });
        }

        if self.week > self.max_weeks {
            self.ending = Some(Ending::Completed);
            self.phase = GamePhase::Ending;
            return WeekOutcome::Ended(Ending::Completed);
        }

        self.regenerate_task();
        WeekOutcome::Continuing
    }

    fn burnout_cause(&self) -> Option<BurnoutCause> {
        if self.stats.stamina <= STAMINA_FLOOR {
            Some(BurnoutCause::Exhaustion)
        } else if self.stats.money <= DEBT_FLOOR {
            Some(BurnoutCause::Debt)
        } else if self.stats.mood <= MOOD_FLOOR {
            Some(BurnoutCause::Despair)
        } else {
            None
        }
    }

    fn regenerate_task(&mut self) {
        let archetype = self.persona.archetype;
        if !archetype.has_goals() {
            return;
        }
        let needs_new = self
            .current_task
            .as_ref()
            .is_none_or(|task| task.is_stale(self.week));
        if needs_new {
            let week = self.week;
            self.current_task = generate_task(archetype, week, self.rng_mut());
        }
    }

    /// Whether a turn is currently resolving.
    #[must_use]
    pub const fn action_in_flight(&self) -> bool {
        self.current_action.is_some()
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }
}
