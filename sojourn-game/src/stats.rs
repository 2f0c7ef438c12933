//! Six-dimensional stat vector and its mutation rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Round a value to one decimal place. Every stat mutation passes through
/// this, so stored stats always carry at most one decimal.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The named stat fields, used for task targets and generic access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Intelligence,
    Stamina,
    Mood,
    Money,
    Language,
    Social,
}

impl StatKey {
    pub const ALL: [Self; 6] = [
        Self::Intelligence,
        Self::Stamina,
        Self::Mood,
        Self::Money,
        Self::Language,
        Self::Social,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intelligence => "intelligence",
            Self::Stamina => "stamina",
            Self::Mood => "mood",
            Self::Money => "money",
            Self::Language => "language",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intelligence" => Ok(Self::Intelligence),
            "stamina" => Ok(Self::Stamina),
            "mood" => Ok(Self::Mood),
            "money" => Ok(Self::Money),
            "language" => Ok(Self::Language),
            "social" => Ok(Self::Social),
            _ => Err(()),
        }
    }
}

/// The player's numeric life state. `stamina` and `mood` live in `[0, 100]`;
/// the remaining fields are unbounded and `money` may go negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub intelligence: f64,
    pub stamina: f64,
    pub mood: f64,
    pub money: f64,
    pub language: f64,
    pub social: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            intelligence: 50.0,
            stamina: 70.0,
            mood: 60.0,
            money: 40_000.0,
            language: 40.0,
            social: 40.0,
        }
    }
}

/// A partial stat mutation. A zero field is the "absent" case: base values
/// are always pre-rounded, so adding 0.0 and re-rounding is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StatDelta {
    #[serde(default)]
    pub intelligence: f64,
    #[serde(default)]
    pub stamina: f64,
    #[serde(default)]
    pub mood: f64,
    #[serde(default)]
    pub money: f64,
    #[serde(default)]
    pub language: f64,
    #[serde(default)]
    pub social: f64,
}

impl StatDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatKey::ALL.iter().all(|key| self.get(*key) == 0.0)
    }

    #[must_use]
    pub const fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Intelligence => self.intelligence,
            StatKey::Stamina => self.stamina,
            StatKey::Mood => self.mood,
            StatKey::Money => self.money,
            StatKey::Language => self.language,
            StatKey::Social => self.social,
        }
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        match key {
            StatKey::Intelligence => self.intelligence = value,
            StatKey::Stamina => self.stamina = value,
            StatKey::Mood => self.mood = value,
            StatKey::Money => self.money = value,
            StatKey::Language => self.language = value,
            StatKey::Social => self.social = value,
        }
    }
}

impl Stats {
    #[must_use]
    pub const fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Intelligence => self.intelligence,
            StatKey::Stamina => self.stamina,
            StatKey::Mood => self.mood,
            StatKey::Money => self.money,
            StatKey::Language => self.language,
            StatKey::Social => self.social,
        }
    }

    /// Apply a delta, producing a new vector. Pure: each field becomes
    /// `round1(base + delta)`, then `stamina` and `mood` are clamped into
    /// `[0, 100]`.
    #[must_use]
    pub fn apply(&self, delta: &StatDelta) -> Self {
        let mut next = Self {
            intelligence: round1(self.intelligence + delta.intelligence),
            stamina: round1(self.stamina + delta.stamina),
            mood: round1(self.mood + delta.mood),
            money: round1(self.money + delta.money),
            language: round1(self.language + delta.language),
            social: round1(self.social + delta.social),
        };
        next.stamina = next.stamina.clamp(0.0, 100.0);
        next.mood = next.mood.clamp(0.0, 100.0);
        next
    }
}
