mod reports;
mod scenarios;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use scenarios::{ScenarioResult, get_scenario, list_scenarios};

#[derive(Debug, Parser)]
#[command(name = "sojourn-tester", version)]
#[command(about = "Automated QA harness for the Sojourn game engine - headless full-session runs")]
struct Args {
    /// Scenarios to run (comma-separated; "all" expands the catalog)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per seed (derived seeds are consecutive)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose per-run output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();
    sojourn_game::validate_table().context("action table failed validation")?;

    let start_time = Instant::now();
    let scenario_keys = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let mut results: Vec<ScenarioResult> = Vec::new();
    for key in &scenario_keys {
        let Some(scenario) = get_scenario(key) else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            continue;
        };
        println!("{} {}", "▶".bright_cyan(), scenario.key.bold());
        let result = scenario.run(&seeds, args.iterations, args.verbose).await;
        println!(
            "  {} {}/{} runs ok",
            if result.passed {
                "✅".to_string()
            } else {
                "❌".to_string()
            },
            result.successful_iterations,
            result.iterations_run,
        );
        results.push(result);
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎓 Sojourn Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut target = OutputTarget::new(args.output.clone())?;
    writeln!(target, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(target, "  {key:15} - {description}")?;
    }
    target.flush_inner()?;
    Ok(true)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut keys = split_csv(scenarios_arg);
    if keys.contains(&"all".to_string()) {
        keys = list_scenarios()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect();
    }
    keys
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_seeds(value: &str) -> Result<Vec<u64>> {
    split_csv(value)
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed: {token}"))
        })
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut target, results)?,
        "markdown" => reports::generate_markdown_report(&mut target, results)?,
        _ => reports::generate_console_report(&mut target, results, start_time.elapsed())?,
    }
    target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_all_keyword_to_full_catalog() {
        let expanded = expand_scenarios("all");
        assert!(expanded.contains(&"smoke".to_string()));
        assert!(expanded.contains(&"event-storm".to_string()));
        assert!(expanded.len() >= 5);
    }

    #[test]
    fn expand_preserves_explicit_order() {
        let expanded = expand_scenarios("event-storm, smoke");
        assert_eq!(
            expanded,
            vec!["event-storm".to_string(), "smoke".to_string()]
        );
    }

    #[test]
    fn parses_seed_lists() {
        assert_eq!(parse_seeds("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seeds("1,banana").is_err());
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = std::env::temp_dir().join("sojourn-scenarios.txt");
        let args = Args {
            scenarios: "smoke".to_string(),
            list_scenarios: true,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "console".to_string(),
            verbose: false,
            output: Some(temp.clone()),
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("smoke"));
    }

    #[test]
    fn write_reports_emits_json_file() {
        let temp = std::env::temp_dir().join("sojourn-report.json");
        let args = Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: Some(temp.clone()),
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("[]"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
