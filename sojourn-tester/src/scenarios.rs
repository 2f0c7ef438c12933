//! Scenario catalog: named batches of simulation runs with pass criteria.

use std::time::{Duration, Instant};

use sojourn_game::{Archetype, Country, Difficulty, EventPolicy};

use crate::simulation::{
    Aggregate, RunMetrics, SimulationConfig, Strategy, aggregate, run_simulation,
};

/// Outcome of running one scenario across its seeds and iterations.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub average_duration: Duration,
    pub aggregates: Vec<Aggregate>,
}

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    build: fn(&[u64], usize) -> Vec<(String, Vec<SimulationConfig>)>,
}

/// All scenarios the harness knows about, in display order.
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            key: "smoke",
            description: "one quick run per archetype, default strategy",
            build: build_smoke,
        },
        Scenario {
            key: "full-matrix",
            description: "every strategy against every archetype",
            build: build_full_matrix,
        },
        Scenario {
            key: "event-storm",
            description: "an event every single week, stressing the orchestrator",
            build: build_event_storm,
        },
        Scenario {
            key: "hard-mode",
            description: "phd in the most expensive destinations",
            build: build_hard_mode,
        },
        Scenario {
            key: "leisure-class",
            description: "rich kid runs, checking the no-goal path end to end",
            build: build_leisure_class,
        },
    ]
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.key == key)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog().iter().map(|s| (s.key, s.description)).collect()
}

fn seeds_for(seeds: &[u64], iterations: usize) -> Vec<u64> {
    let mut out = Vec::with_capacity(seeds.len() * iterations);
    for &seed in seeds {
        for i in 0..iterations as u64 {
            out.push(seed.wrapping_add(i));
        }
    }
    out
}

fn build_smoke(seeds: &[u64], _iterations: usize) -> Vec<(String, Vec<SimulationConfig>)> {
    Archetype::ALL
        .into_iter()
        .map(|archetype| {
            let configs = seeds
                .iter()
                .map(|&seed| SimulationConfig::new(archetype, Strategy::Balanced, seed))
                .collect();
            (format!("smoke/{archetype}"), configs)
        })
        .collect()
}

fn build_full_matrix(seeds: &[u64], iterations: usize) -> Vec<(String, Vec<SimulationConfig>)> {
    let seeds = seeds_for(seeds, iterations);
    let mut groups = Vec::new();
    for strategy in Strategy::ALL {
        for archetype in Archetype::ALL {
            let configs = seeds
                .iter()
                .map(|&seed| SimulationConfig::new(archetype, strategy, seed))
                .collect();
            groups.push((format!("{}/{archetype}", strategy.as_str()), configs));
        }
    }
    groups
}

fn build_event_storm(seeds: &[u64], iterations: usize) -> Vec<(String, Vec<SimulationConfig>)> {
    let seeds = seeds_for(seeds, iterations);
    let configs = seeds
        .iter()
        .map(|&seed| {
            let mut config = SimulationConfig::new(Archetype::SocialButterfly, Strategy::Social, seed);
            config.event_policy = EventPolicy::Always;
            config
        })
        .collect();
    vec![("event-storm".to_string(), configs)]
}

fn build_hard_mode(seeds: &[u64], iterations: usize) -> Vec<(String, Vec<SimulationConfig>)> {
    let seeds = seeds_for(seeds, iterations);
    [Country::Usa, Country::Japan]
        .into_iter()
        .map(|country| {
            let configs = seeds
                .iter()
                .map(|&seed| {
                    let mut config =
                        SimulationConfig::new(Archetype::HardWorker, Strategy::Grind, seed);
                    config.difficulty = Difficulty::Phd;
                    config.country = country;
                    config
                })
                .collect();
            (format!("hard-mode/{country}"), configs)
        })
        .collect()
}

fn build_leisure_class(seeds: &[u64], iterations: usize) -> Vec<(String, Vec<SimulationConfig>)> {
    let seeds = seeds_for(seeds, iterations);
    let configs = seeds
        .iter()
        .map(|&seed| SimulationConfig::new(Archetype::RichKid, Strategy::Balanced, seed))
        .collect();
    vec![("leisure-class".to_string(), configs)]
}

impl Scenario {
    /// Run every configured simulation, collecting per-group aggregates.
    /// A scenario passes when every run ends cleanly with no invariant
    /// violations.
    pub async fn run(&self, seeds: &[u64], iterations: usize, verbose: bool) -> ScenarioResult {
        let groups = (self.build)(seeds, iterations);
        let mut failures = Vec::new();
        let mut aggregates = Vec::new();
        let mut total = 0usize;
        let mut successes = 0usize;
        let mut durations = Vec::new();

        for (label, configs) in groups {
            let mut runs: Vec<RunMetrics> = Vec::with_capacity(configs.len());
            for config in &configs {
                total += 1;
                let start = Instant::now();
                match run_simulation(config).await {
                    Ok(metrics) => {
                        if verbose {
                            log::info!(
                                "{label} seed {}: {} after {} weeks",
                                config.seed,
                                metrics.outcome.as_str(),
                                metrics.weeks_survived
                            );
                        }
                        successes += 1;
                        runs.push(metrics);
                    }
                    Err(err) => {
                        failures.push(format!("{label} seed {}: {err}", config.seed));
                    }
                }
                durations.push(start.elapsed());
            }
            aggregates.push(aggregate(&label, &runs));
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / durations.len() as u32
        };

        ScenarioResult {
            scenario_name: self.key.to_string(),
            passed: failures.is_empty(),
            iterations_run: total,
            successful_iterations: successes,
            failures,
            average_duration,
            aggregates,
        }
    }
}
