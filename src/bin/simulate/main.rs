// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Runner - seeded Monte Carlo over base/optimistic/pessimistic
//
// Usage:
//   cargo run --release --bin simulate                          # All scenarios, 1000 iterations
//   cargo run --release --bin simulate -- --iterations 5000     # More trials per scenario
//   cargo run --release --bin simulate -- optimistic            # Filter by scenario name
//   cargo run --release --bin simulate -- --config project.json # Custom base configuration
//   cargo run --release --bin simulate -- --seed 42 --samples 500
//   cargo run --release --bin simulate -- --dump-iterations     # Include per-iteration rows
//
// Logging follows RUST_LOG (default `info`).

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use report::*;
use valuation_engine::records::{iteration_rows, random_draw_rows, ConfigRow, SummaryRow};
use valuation_engine::scenarios::run_scenario;
use valuation_engine::statistics::frequency_table;
use valuation_engine::{validate_generators, ScenarioConfig, ScenarioKind, ValidationConfig};

type RunnerResult<T> = Result<T, Box<dyn std::error::Error>>;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    iterations: usize,
    seed: u64,
    samples: usize,
    bins: usize,
    config: Option<PathBuf>,
    dump_iterations: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        iterations: 1000,
        seed: 0,
        samples: valuation_engine::config::DEFAULT_SAMPLE_SIZE,
        bins: 10,
        config: None,
        dump_iterations: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" => {
                i += 1;
                if i < args.len() {
                    cli.iterations = args[i].parse().unwrap_or(1000);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--samples" => {
                i += 1;
                if i < args.len() {
                    cli.samples = args[i].parse().unwrap_or(cli.samples);
                }
            }
            "--bins" => {
                i += 1;
                if i < args.len() {
                    cli.bins = args[i].parse().unwrap_or(10);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            "--dump-iterations" => {
                cli.dump_iterations = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_config(path: Option<&Path>) -> RunnerResult<ScenarioConfig> {
    let config = match path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ScenarioConfig::base_case(),
    };
    Ok(config)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run(parse_args()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!(%err, "run failed");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every generator passed validation.
fn run(cli: CliArgs) -> RunnerResult<bool> {
    let base = load_config(cli.config.as_deref())?;
    base.validate()?;

    let to_run: Vec<ScenarioKind> = match &cli.filter {
        Some(f) => match ScenarioKind::from_name(f) {
            Some(kind) => vec![kind],
            None => return Err(format!("no scenario matches filter {f:?}").into()),
        },
        None => ScenarioKind::ALL.to_vec(),
    };

    println!("\n  Project Valuation Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Iterations/scenario: {} | Seed: {}", cli.iterations, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<18} {:>14} {:>14} {:>14} {:>14} {:>9} {:>7}",
        "Scenario", "Mean NPV", "Std dev", "P5", "P95", "IRR mean", "Time"
    );
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut scenarios = Vec::with_capacity(to_run.len());

    for kind in &to_run {
        let (config, result) = run_scenario(*kind, &base, cli.iterations, cli.seed)?;
        let elapsed_ms = result.elapsed_ms.unwrap_or_default();
        let npv = &result.summary.npv;

        let irr_mean = result
            .summary
            .irr
            .mean
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<18} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>9} {:>5}ms",
            kind.label(),
            npv.mean,
            npv.std_dev,
            npv.p5,
            npv.p95,
            irr_mean,
            elapsed_ms,
        );

        scenarios.push(ScenarioReport {
            config: ConfigRow::new(kind.label(), &config, cli.iterations, cli.seed),
            summary: SummaryRow::from_result(kind.label(), &result),
            irr: result.summary.irr.clone(),
            bands: npv.confidence_bands(),
            histogram: frequency_table(&result.npv, cli.bins)?,
            iterations: cli.dump_iterations.then(|| iteration_rows(&result)),
            elapsed_ms,
        });
    }

    println!("  {}", "-".repeat(96));

    // ─── Generator Validation ───────────────────────────────────────────

    let validation = validate_generators(&base, &ValidationConfig::with_sample_size(cli.samples), cli.seed)?;

    println!("\n  Generator Validation (n = {}, 5% significance):", validation.sample_size);
    for (driver, result) in &validation.results {
        println!(
            "    {:<20} {:<28} stat {:>9.4}  crit {:>9.4}  {}",
            driver.label(),
            result.test.label(),
            result.statistic,
            result.critical_value,
            verdict(result.accepted),
        );
    }
    println!("\n  Suite time: {:.2}s\n", suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();
    let all_accepted = validation.all_accepted();

    let report = RunReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        iterations: cli.iterations,
        seed: cli.seed,
        scenarios,
        validation: ValidationSection {
            all_accepted,
            draws: random_draw_rows(&validation),
            report: validation,
        },
    };

    let dir = Path::new("simulation-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("run-{timestamp}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %path.display(), "results saved");

    Ok(all_accepted)
}
