//! Persona configuration: difficulty tier, destination country, and
//! character archetype. All three are fixed for the lifetime of a game.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::stats::{StatDelta, Stats};

/// Academic stage the player starts from. Determines the initial stat
/// vector: older students start sharper but poorer and more worn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    HighSchool,
    #[default]
    Undergraduate,
    Masters,
    Phd,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [
        Self::HighSchool,
        Self::Undergraduate,
        Self::Masters,
        Self::Phd,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighSchool => "high-school",
            Self::Undergraduate => "undergraduate",
            Self::Masters => "masters",
            Self::Phd => "phd",
        }
    }

    /// Starting stat vector for this tier.
    #[must_use]
    pub const fn initial_stats(self) -> Stats {
        match self {
            Self::HighSchool => Stats {
                intelligence: 30.0,
                stamina: 90.0,
                mood: 80.0,
                money: 60_000.0,
                language: 20.0,
                social: 50.0,
            },
            Self::Undergraduate => Stats {
                intelligence: 50.0,
                stamina: 70.0,
                mood: 60.0,
                money: 40_000.0,
                language: 40.0,
                social: 40.0,
            },
            Self::Masters => Stats {
                intelligence: 70.0,
                stamina: 50.0,
                mood: 40.0,
                money: 25_000.0,
                language: 65.0,
                social: 25.0,
            },
            Self::Phd => Stats {
                intelligence: 90.0,
                stamina: 40.0,
                mood: 30.0,
                money: 12_000.0,
                language: 85.0,
                social: 10.0,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high-school" => Ok(Self::HighSchool),
            "undergraduate" => Ok(Self::Undergraduate),
            "masters" => Ok(Self::Masters),
            "phd" => Ok(Self::Phd),
            _ => Err(()),
        }
    }
}

/// Destination country. Carries a cost-of-living multiplier applied to
/// monetary action deltas and a stress modifier surfaced to the narrative
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    #[default]
    Usa,
    Uk,
    Canada,
    Australia,
    Japan,
    Germany,
    Singapore,
}

impl Country {
    pub const ALL: [Self; 7] = [
        Self::Usa,
        Self::Uk,
        Self::Canada,
        Self::Australia,
        Self::Japan,
        Self::Germany,
        Self::Singapore,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usa => "usa",
            Self::Uk => "uk",
            Self::Canada => "canada",
            Self::Australia => "australia",
            Self::Japan => "japan",
            Self::Germany => "germany",
            Self::Singapore => "singapore",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Usa => "United States",
            Self::Uk => "United Kingdom",
            Self::Canada => "Canada",
            Self::Australia => "Australia",
            Self::Japan => "Japan",
            Self::Germany => "Germany",
            Self::Singapore => "Singapore",
        }
    }

    /// Cost-of-living multiplier applied to action money deltas.
    #[must_use]
    pub const fn cost_multiplier(self) -> f64 {
        match self {
            Self::Usa => 1.6,
            Self::Uk => 1.5,
            Self::Canada => 1.3,
            Self::Australia => 1.4,
            Self::Japan => 1.2,
            Self::Germany => 1.1,
            Self::Singapore => 1.4,
        }
    }

    /// Ambient stress level, fed to the narrative generator as context.
    #[must_use]
    pub const fn stress_modifier(self) -> i32 {
        match self {
            Self::Usa | Self::Uk => 4,
            Self::Canada => 2,
            Self::Australia => 3,
            Self::Japan => 6,
            Self::Germany | Self::Singapore => 5,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usa" => Ok(Self::Usa),
            "uk" => Ok(Self::Uk),
            "canada" => Ok(Self::Canada),
            "australia" => Ok(Self::Australia),
            "japan" => Ok(Self::Japan),
            "germany" => Ok(Self::Germany),
            "singapore" => Ok(Self::Singapore),
            _ => Err(()),
        }
    }
}

/// Character background. Grants one-time stat modifiers at game start and
/// overrides action flavor; the `RichKid` archetype is exempt from goal
/// tracking entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    RichKid,
    Nerd,
    SocialButterfly,
    #[default]
    HardWorker,
}

impl Archetype {
    pub const ALL: [Self; 4] = [
        Self::RichKid,
        Self::Nerd,
        Self::SocialButterfly,
        Self::HardWorker,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RichKid => "rich-kid",
            Self::Nerd => "nerd",
            Self::SocialButterfly => "social-butterfly",
            Self::HardWorker => "hard-worker",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RichKid => "Trust-Fund Heir",
            Self::Nerd => "Academic Prodigy",
            Self::SocialButterfly => "Trendsetter",
            Self::HardWorker => "All-Round Grinder",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RichKid => {
                "Money is never a worry; the challenge is balancing temptation with study."
            }
            Self::Nerd => "A gifted scholar who lives among books and lab benches.",
            Self::SocialButterfly => {
                "Fits into any circle in days, but parties drain both wallet and energy."
            }
            Self::HardWorker => {
                "Tough and diligent, turning odd jobs into experience and connections."
            }
        }
    }

    /// One-time stat modifiers applied when the game starts.
    #[must_use]
    pub const fn start_mods(self) -> StatDelta {
        match self {
            Self::RichKid => StatDelta {
                money: 40_000.0,
                social: 15.0,
                intelligence: -5.0,
                stamina: 0.0,
                mood: 0.0,
                language: 0.0,
            },
            Self::Nerd => StatDelta {
                intelligence: 25.0,
                language: 15.0,
                social: -15.0,
                mood: -10.0,
                stamina: 0.0,
                money: 0.0,
            },
            Self::SocialButterfly => StatDelta {
                social: 35.0,
                language: 20.0,
                money: -8_000.0,
                intelligence: -10.0,
                stamina: 0.0,
                mood: 0.0,
            },
            Self::HardWorker => StatDelta {
                stamina: 30.0,
                money: -5_000.0,
                mood: 5.0,
                social: 10.0,
                intelligence: 0.0,
                language: 0.0,
            },
        }
    }

    /// Whether this archetype participates in goal tracking. The rich kid
    /// is here to enjoy life, not to chase survival metrics.
    #[must_use]
    pub const fn has_goals(self) -> bool {
        !matches!(self, Self::RichKid)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rich-kid" => Ok(Self::RichKid),
            "nerd" => Ok(Self::Nerd),
            "social-butterfly" => Ok(Self::SocialButterfly),
            "hard-worker" => Ok(Self::HardWorker),
            _ => Err(()),
        }
    }
}

/// Immutable persona selected during setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub country: Country,
    pub archetype: Archetype,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            player_name: "New Student".to_string(),
            difficulty: Difficulty::default(),
            country: Country::default(),
            archetype: Archetype::default(),
        }
    }
}

impl Persona {
    /// Starting stats: difficulty tier baseline plus the archetype's
    /// one-time modifiers.
    #[must_use]
    pub fn starting_stats(&self) -> Stats {
        self.difficulty
            .initial_stats()
            .apply(&self.archetype.start_mods())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_strings() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        for c in Country::ALL {
            assert_eq!(c.as_str().parse::<Country>(), Ok(c));
        }
        for a in Archetype::ALL {
            assert_eq!(a.as_str().parse::<Archetype>(), Ok(a));
        }
        assert!("kindergarten".parse::<Difficulty>().is_err());
    }

    #[test]
    fn starting_stats_combine_difficulty_and_archetype() {
        let persona = Persona {
            difficulty: Difficulty::Undergraduate,
            archetype: Archetype::RichKid,
            ..Persona::default()
        };
        let stats = persona.starting_stats();
        assert!((stats.money - 80_000.0).abs() < f64::EPSILON);
        assert!((stats.social - 55.0).abs() < f64::EPSILON);
        assert!((stats.intelligence - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn phd_starts_sharp_but_broke() {
        let stats = Difficulty::Phd.initial_stats();
        assert!(stats.intelligence > Difficulty::HighSchool.initial_stats().intelligence);
        assert!(stats.money < Difficulty::HighSchool.initial_stats().money);
    }

    #[test]
    fn only_rich_kid_skips_goals() {
        assert!(!Archetype::RichKid.has_goals());
        assert!(Archetype::Nerd.has_goals());
        assert!(Archetype::SocialButterfly.has_goals());
        assert!(Archetype::HardWorker.has_goals());
    }

    #[test]
    fn country_table_matches_design_values() {
        assert!((Country::Usa.cost_multiplier() - 1.6).abs() < f64::EPSILON);
        assert!((Country::Germany.cost_multiplier() - 1.1).abs() < f64::EPSILON);
        assert_eq!(Country::Japan.stress_modifier(), 6);
        assert_eq!(Country::Canada.stress_modifier(), 2);
    }
}
