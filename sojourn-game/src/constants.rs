//! Centralized balance and tuning constants for Sojourn game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Turn loop ----------------------------------------------------------------
pub(crate) const DEFAULT_MAX_WEEKS: u32 = 50;
pub(crate) const MAX_LOGS: usize = 30;
pub(crate) const ACTION_PACING_MS: u64 = 800;

// Event trigger ------------------------------------------------------------
pub(crate) const EVENT_FORCE_INTERVAL_WEEKS: u32 = 4;
pub(crate) const EVENT_PROBABILITY_THRESHOLD: f32 = 0.88;
pub(crate) const EVENT_MAX_OPTIONS: usize = 4;

// Tasks --------------------------------------------------------------------
pub(crate) const TASK_DEADLINE_WEEKS: u32 = 12;
pub(crate) const TASK_REWARD_MOOD: f64 = 20.0;
pub(crate) const TASK_REWARD_MONEY: f64 = 1_200.0;
pub(crate) const TASK_REWARD_INTELLIGENCE: f64 = 15.0;

// Failure thresholds -------------------------------------------------------
pub(crate) const STAMINA_FLOOR: f64 = 0.0;
pub(crate) const MOOD_FLOOR: f64 = 0.0;
pub(crate) const DEBT_FLOOR: f64 = -20_000.0;

// Fallback narrative -------------------------------------------------------
pub(crate) const BURNOUT_NARRATIVE: &str = "Body and mind have reached their limit. \
The journey ends here for now, but everything lived through becomes tomorrow's courage.";
pub(crate) const FALLBACK_ENDING_NARRATIVE: &str = "The final transcript never arrived, \
but the years abroad speak for themselves: a life stitched together from late nights, \
small victories, and a language that slowly became home.";
pub(crate) const FALLBACK_EVENT_TITLE: &str = "A Quiet Week";
pub(crate) const FALLBACK_EVENT_DESCRIPTION: &str =
    "Nothing out of the ordinary happens, which is its own small blessing. \
A walk through the neighborhood clears your head.";
pub(crate) const FALLBACK_EVENT_OPTION: &str = "Take it easy";
pub(crate) const FALLBACK_EVENT_RESULT: &str = "You enjoy the calm while it lasts.";
pub(crate) const FALLBACK_EVENT_MOOD_BONUS: f64 = 3.0;
