//! Report generation over any `io::Write` sink.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::scenarios::ScenarioResult;

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out, "{}", "📊 Scenario Results".bright_yellow().bold())?;
    writeln!(out, "{}", "-".repeat(40))?;
    for result in results {
        let status = if result.passed {
            "PASS".green()
        } else {
            "FAIL".red()
        };
        writeln!(
            out,
            "{status} {:18} {}/{} runs ok (avg {:?})",
            result.scenario_name,
            result.successful_iterations,
            result.iterations_run,
            result.average_duration,
        )?;
        for failure in &result.failures {
            writeln!(out, "     {} {failure}", "✗".red())?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", "📈 Playability Summary".bright_yellow().bold())?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(
        out,
        "{:<28} {:>5} {:>9} {:>7} {:>7} {:>8}",
        "group", "runs", "survival", "weeks", "events", "score"
    )?;
    for result in results {
        for agg in &result.aggregates {
            writeln!(
                out,
                "{:<28} {:>5} {:>8.0}% {:>7.1} {:>7.1} {:>8.1}",
                agg.label,
                agg.iterations,
                agg.survival_rate * 100.0,
                agg.mean_weeks,
                agg.mean_events,
                agg.mean_score,
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "🏁 Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let payload: Vec<_> = results
        .iter()
        .map(|result| {
            json!({
                "scenario_name": result.scenario_name,
                "passed": result.passed,
                "iterations_run": result.iterations_run,
                "successful_iterations": result.successful_iterations,
                "failures": result.failures,
                "average_duration_ms": result.average_duration.as_millis(),
                "aggregates": result.aggregates,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Sojourn Harness Results\n")?;
    writeln!(out, "| Scenario | Status | Runs | Failures |")?;
    writeln!(out, "|----------|--------|------|----------|")?;
    for result in results {
        writeln!(
            out,
            "| {} | {} | {}/{} | {} |",
            result.scenario_name,
            if result.passed { "✅" } else { "❌" },
            result.successful_iterations,
            result.iterations_run,
            result.failures.len(),
        )?;
    }
    writeln!(out, "\n## Playability\n")?;
    writeln!(
        out,
        "| Group | Runs | Survival | Mean weeks | Mean events | Mean score |"
    )?;
    writeln!(out, "|-------|------|----------|------------|-------------|------------|")?;
    for result in results {
        for agg in &result.aggregates {
            writeln!(
                out,
                "| {} | {} | {:.0}% | {:.1} | {:.1} | {:.1} |",
                agg.label,
                agg.iterations,
                agg.survival_rate * 100.0,
                agg.mean_weeks,
                agg.mean_events,
                agg.mean_score,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Aggregate;

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "smoke".to_string(),
            passed,
            iterations_run: 4,
            successful_iterations: if passed { 4 } else { 3 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["smoke seed 9: run exceeded 120 turns without ending".to_string()]
            },
            average_duration: Duration::from_millis(3),
            aggregates: vec![Aggregate {
                label: "smoke/nerd".to_string(),
                iterations: 4,
                survival_rate: 0.5,
                mean_weeks: 31.0,
                mean_events: 9.5,
                mean_score: 412.3,
                burnout_exhaustion: 1,
                burnout_debt: 0,
                burnout_despair: 1,
            }],
        }
    }

    #[test]
    fn console_report_lists_scenarios_and_aggregates() {
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &[sample_result(true)], Duration::from_secs(1)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Playability Summary"));
        assert!(text.contains("smoke/nerd"));
        assert!(text.contains("Total time"));
    }

    #[test]
    fn console_report_prints_failures() {
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &[sample_result(false)], Duration::ZERO).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("exceeded 120 turns"));
    }

    #[test]
    fn json_report_is_valid_json() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample_result(true)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["scenario_name"], "smoke");
        assert_eq!(parsed[0]["aggregates"][0]["label"], "smoke/nerd");
    }

    #[test]
    fn markdown_report_has_both_tables() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[sample_result(true)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Sojourn Harness Results"));
        assert!(text.contains("## Playability"));
    }
}
