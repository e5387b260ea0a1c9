//! Compare command - Q-learning against the random baseline

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        commands::RunOptions,
        output::{format_percent, print_run_summary, print_section, print_subsection},
    },
    pipeline::compare_policies,
};

#[derive(Parser, Debug)]
#[command(about = "Compare action-selection policies", allow_negative_numbers = true)]
pub struct CompareArgs {
    #[command(flatten)]
    pub run: RunOptions,

    /// Export comparison results to JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let config = args.run.resolve()?;

    print_section("Policy comparison");
    println!(
        "{} trials per policy on a {}x{} grid",
        config.trials.num_trials, config.world.width, config.world.height
    );

    let results = compare_policies(&config.agent, &config.world, &config.trials)
        .context("comparison run failed")?;

    for result in &results {
        print_subsection(&result.policy.to_string());
        print_run_summary(&result.summary);
    }

    if let Some(best) = results
        .iter()
        .max_by(|a, b| a.summary.success_rate.total_cmp(&b.summary.success_rate))
    {
        println!(
            "\nBest success rate: {} ({})",
            best.policy,
            format_percent(best.summary.success_rate)
        );
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        to_writer_pretty(file, &results)?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}
