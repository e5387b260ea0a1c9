//! Train command - Run the Q-learning cab through a series of trials

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::build_agent,
    cli::{
        commands::RunOptions,
        config::RunConfig,
        output::{format_number, format_percent, print_kv, print_run_summary, print_section},
    },
    pipeline::{CsvObserver, JsonlObserver, ProgressObserver, RunSummary, TrialPipeline},
    q_learning::PolicyMode,
    world::World,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    config: &'a RunConfig,
    summary: &'a RunSummary,
    final_epsilon: f64,
    final_success_rate: f64,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the smartcab agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub run: RunOptions,

    /// Action selection policy (q-learning or random)
    #[arg(long)]
    pub policy: Option<PolicyMode>,

    /// Optional CSV file receiving one row per finished trial
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Optional file for JSONL observations (every tick of every trial)
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut config = args.run.resolve()?;
    if let Some(policy) = args.policy {
        config.agent.policy = policy;
    }

    let mut agent = build_agent(&config.agent).context("failed to build agent")?;
    let mut world = World::new(config.world.clone()).context("failed to build world")?;

    let mut pipeline = TrialPipeline::new(config.trials.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.stats {
        let observer = CsvObserver::new(path)
            .with_context(|| format!("failed to create stats file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    print_section("Smartcab Q-learning");
    print_kv("Policy", &config.agent.policy.to_string());
    print_kv("Trials", &format_number(config.trials.num_trials));
    print_kv("Grid", &format!("{}x{}", config.world.width, config.world.height));
    print_kv("Dummy cars", &config.world.dummy_agents.to_string());
    print_kv(
        "α / γ / ε",
        &format!(
            "{} / {} / {}",
            config.agent.alpha, config.agent.gamma, config.agent.epsilon
        ),
    );
    if let Some(seed) = config.trials.seed {
        print_kv("Seed", &seed.to_string());
    }

    let summary = pipeline
        .run(&mut agent, &mut world)
        .context("training run failed")?;

    print_section("Results");
    print_run_summary(&summary);
    print_kv("Final ε", &format!("{:.4}", agent.context().epsilon));

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create summary file {}", path.display()))?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                config: &config,
                summary: &summary,
                final_epsilon: agent.context().epsilon,
                final_success_rate: agent.scoreboard().cumulative_success_rate(),
            },
        )?;
        print_kv("Summary", &path.display().to_string());
    }

    if summary.trials > 0 && summary.successes == 0 {
        println!(
            "\nNo trial finished within its deadline ({}).",
            format_percent(summary.success_rate)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_parse_args() {
        let args = TrainArgs::parse_from([
            "train",
            "--trials",
            "12",
            "--alpha",
            "0.4",
            "--policy",
            "random",
            "--enforce-deadline",
            "--no-progress",
        ]);
        assert_eq!(args.run.trials, Some(12));
        assert_eq!(args.run.alpha, Some(0.4));
        assert_eq!(args.policy, Some(PolicyMode::Random));
        assert!(args.run.enforce_deadline);
        assert!(args.no_progress);
    }
}
