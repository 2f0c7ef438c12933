//! Goal generation and the per-archetype goal pools.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    TASK_DEADLINE_WEEKS, TASK_REWARD_INTELLIGENCE, TASK_REWARD_MONEY, TASK_REWARD_MOOD,
};
use crate::personas::Archetype;
use crate::stats::{StatDelta, StatKey};

/// An active goal: reach `target_value` on `target` before `deadline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub target: StatKey,
    pub target_value: f64,
    pub reward: StatDelta,
    /// Absolute week number by which the goal must be met.
    pub deadline: u32,
    pub completed: bool,
}

impl Task {
    /// A task is stale when it is finished or its deadline has passed;
    /// stale tasks are replaced at the start of a new week.
    #[must_use]
    pub const fn is_stale(&self, week: u32) -> bool {
        self.completed || week > self.deadline
    }
}

struct Goal {
    description: &'static str,
    target: StatKey,
    target_value: f64,
}

const fn goal(description: &'static str, target: StatKey, target_value: f64) -> Goal {
    Goal {
        description,
        target,
        target_value,
    }
}

const NERD_GOALS: &[Goal] = &[
    goal("Keep a straight-A transcript", StatKey::Intelligence, 120.0),
    goal("Publish a research paper", StatKey::Intelligence, 150.0),
    goal("Hold a seminar talk without notes", StatKey::Language, 90.0),
];

const SOCIAL_BUTTERFLY_GOALS: &[Goal] = &[
    goal("Become the campus social star", StatKey::Social, 100.0),
    goal("Build a name in the local scene", StatKey::Social, 120.0),
    goal("Master everyday small talk", StatKey::Language, 75.0),
];

const HARD_WORKER_GOALS: &[Goal] = &[
    goal("Save next month's rent", StatKey::Money, 5_000.0),
    goal("Keep up with a brutal courseload", StatKey::Intelligence, 70.0),
    goal("Stay in top physical shape", StatKey::Stamina, 80.0),
];

const fn pool_for(archetype: Archetype) -> &'static [Goal] {
    match archetype {
        Archetype::Nerd => NERD_GOALS,
        Archetype::SocialButterfly => SOCIAL_BUTTERFLY_GOALS,
        Archetype::HardWorker => HARD_WORKER_GOALS,
        Archetype::RichKid => &[],
    }
}

fn reward_bundle() -> StatDelta {
    StatDelta {
        mood: TASK_REWARD_MOOD,
        money: TASK_REWARD_MONEY,
        intelligence: TASK_REWARD_INTELLIGENCE,
        ..StatDelta::default()
    }
}

/// Pick a new goal for the archetype, or `None` for the no-obligations
/// archetype.
pub fn generate_task<R: Rng>(archetype: Archetype, week: u32, rng: &mut R) -> Option<Task> {
    if !archetype.has_goals() {
        return None;
    }
    Some(generate_from_pool(pool_for(archetype), week, rng))
}

/// An empty pool falls back to the hard worker's goals rather than failing.
fn generate_from_pool<R: Rng>(pool: &'static [Goal], week: u32, rng: &mut R) -> Task {
    let pool = if pool.is_empty() { HARD_WORKER_GOALS } else { pool };
    let pick = &pool[rng.gen_range(0..pool.len())];
    Task {
        description: pick.description.to_string(),
        target: pick.target,
        target_value: pick.target_value,
        reward: reward_bundle(),
        deadline: week + TASK_DEADLINE_WEEKS,
        completed: false,
    }
}
