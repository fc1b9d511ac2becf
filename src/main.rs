//! Crew Battle - scenario replay
//!
//! Loads a scenario file, replays its script against a seeded stream and
//! prints the combat log or a JSON report. Same seed, same output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crew_battle::battle::TraitTable;
use crew_battle::command::{markup, CommandRegistry};
use crew_battle::core::error::Result;
use crew_battle::scenario::{run_scenario, ReplayReport, Scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Replay a scripted engagement
#[derive(Parser, Debug)]
#[command(name = "crew-battle")]
#[command(about = "Replay a scripted battle scenario deterministically")]
struct Args {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Random seed; overrides the scenario's own
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Trait table overrides (TOML)
    #[arg(long)]
    traits: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crew_battle=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let traits = match &args.traits {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading trait overrides");
            TraitTable::load(path)?
        }
        None => TraitTable::standard(),
    };

    let mut config = scenario.replay.clone();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let registry = CommandRegistry::standard();
    let report = run_scenario(&scenario, &registry, &traits, &config)?;
    tracing::info!(
        steps = report.outcomes.len(),
        succeeded = report.succeeded(),
        draws = report.rng_draws,
        "replay finished"
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &ReplayReport) {
    let title = if report.scenario.is_empty() {
        "Scenario"
    } else {
        report.scenario.as_str()
    };
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!("Seed: {}", report.seed);
    println!();

    for outcome in &report.outcomes {
        let target = outcome
            .target
            .as_deref()
            .map(|t| format!(" -> {}", t))
            .unwrap_or_default();
        let status = if outcome.result.success { "ok" } else { "failed" };
        println!(
            "[turn {}] #{} {:?} by {}{} ({})",
            outcome.turn, outcome.step, outcome.action, outcome.executor, target, status
        );
        for line in &outcome.result.logs {
            println!("    {}", markup::strip(line));
        }
    }

    println!();
    println!("Final state");
    println!("-----------");
    for unit in &report.units {
        println!(
            "{:<16} hp {:>5}/{:<5} atmos {:>3}  killed {:>5}  dead {:>5}{}{}",
            unit.name,
            unit.hp,
            unit.max_hp,
            unit.atmos,
            unit.killed_total,
            unit.dead_total,
            if unit.is_defending { "  [defending]" } else { "" },
            if unit.is_retreating { "  [retreating]" } else { "" },
        );
    }
}
