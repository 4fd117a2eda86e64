// Batch Simulation Runner — "Qui est le Patron?"
// Seedable PRNG, parallel match fan-out, CSV table + JSON summary report
//
// Usage:
//   cargo run --release --bin simulate                    # 10 matches, defaults
//   cargo run --release --bin simulate -- --matches 500   # bigger batch
//   cargo run --release --bin simulate -- --seed 42       # custom base seed
//   cargo run --release --bin simulate -- --policies balanced,passive
//   cargo run --release --bin simulate -- --sequential    # disable rayon fan-out
//   cargo run --release --bin simulate -- --out runs/my.csv

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use patron_engine::{run_batch_with_progress, BatchConfig, SimulationSummary};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    config: BatchConfig,
    out: Option<PathBuf>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = BatchConfig::default();
    let mut out = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--matches" => {
                i += 1;
                if i < args.len() {
                    config.matches = args[i].parse().unwrap_or(config.matches);
                }
            }
            "--turns" => {
                i += 1;
                if i < args.len() {
                    config.max_turns = args[i].parse().unwrap_or(config.max_turns);
                }
            }
            "--players" => {
                i += 1;
                if i < args.len() {
                    config.players_per_match = args[i].parse().unwrap_or(config.players_per_match);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    config.base_seed = args[i].parse().unwrap_or(0);
                }
            }
            "--policies" => {
                i += 1;
                if i < args.len() {
                    config.policies = args[i].split(',').map(str::to_string).collect();
                }
            }
            "--sequential" => {
                config.parallel = false;
            }
            "--out" => {
                i += 1;
                if i < args.len() {
                    out = Some(PathBuf::from(&args[i]));
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    CliArgs { config, out }
}

// ─── JSON Report ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunReport<'a> {
    timestamp: String,
    version: &'static str,
    prng: &'static str,
    started_at_ms: u128,
    finished_at_ms: u128,
    elapsed_secs: f64,
    config: &'a BatchConfig,
    summary: &'a SimulationSummary,
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    let config = cli.config;

    println!("\n  Qui est le Patron? Batch Runner");
    println!(
        "  PRNG: ChaCha8Rng | Matches: {} | Turn cap: {} | Players: {} | Base seed: {}",
        config.matches, config.max_turns, config.players_per_match, config.base_seed
    );
    println!("  Policies: {}\n", config.policies.join(", "));

    let started_at_ms = unix_millis();
    let start = Instant::now();

    let step = (config.matches / 10).max(1);
    let total = config.matches;
    let progress = move |done: u32, _total: u32| {
        if done % step == 0 || done == total {
            println!("  {:>4}/{} matches complete", done, total);
        }
    };

    let result = match run_batch_with_progress(&config, Some(&progress)) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("  Configuration error: {}", error);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();
    let finished_at_ms = unix_millis();

    // ─── Summary ────────────────────────────────────────────────────────

    let summary = &result.summary;
    println!(
        "\n  Matches: {}  Rows: {}  Avg terminal turn: {:.1} ± {:.1}  Time: {:.2}s",
        summary.total_matches,
        result.records.len(),
        summary.terminal_turns.mean,
        summary.terminal_turns.std_dev,
        elapsed.as_secs_f64()
    );
    println!("\n  Wins by player:");
    if summary.wins_by_player.is_empty() {
        println!("    (no winners)");
    }
    for (name, wins) in &summary.wins_by_player {
        println!("    {:<8} {:>5}", name, wins);
    }

    // ─── Write CSV + JSON report ────────────────────────────────────────

    let timestamp = format!("{}", finished_at_ms);
    let csv_path = cli.out.unwrap_or_else(|| {
        PathBuf::from("simulation-results").join(format!("simulation-{}.csv", timestamp))
    });
    if let Some(dir) = csv_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).expect("Failed to create output directory");
        }
    }
    std::fs::write(&csv_path, result.to_csv()).expect("Failed to write CSV table");

    let report = RunReport {
        timestamp,
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        started_at_ms,
        finished_at_ms,
        elapsed_secs: elapsed.as_secs_f64(),
        config: &config,
        summary,
    };
    let report_path = csv_path.with_extension("json");
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize report");
    std::fs::write(&report_path, &json).expect("Failed to write summary report");

    println!("\n  Table saved to:   {}", csv_path.display());
    println!("  Summary saved to: {}\n", report_path.display());
}
