// Ripple engine benchmark: seeded graphs, Dijkstra cross-check, per-tick audit.
//
// Usage:
//   cargo run --release --bin bench [-- --runs N] [--seed S] [--time-series] [FILTER]
//   RUST_LOG=ripple_engine=debug cargo run --bin bench    # engine logs on stderr

mod generator;
mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use report::{BenchReport, McReport, Summary};
use scenarios::{scenarios, Scenario};
use tracing_subscriber::EnvFilter;

const RESULTS_DIR: &str = "benchmark-results";

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut cli = CliArgs { runs: 30, seed: 0, time_series: false, filter: None };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => cli.runs = number(args.next(), "--runs")?,
            "--seed" => cli.seed = number(args.next(), "--seed")?,
            "--time-series" => cli.time_series = true,
            other if !other.starts_with('-') => cli.filter = Some(arg),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(cli)
}

fn number<T: std::str::FromStr>(value: Option<String>, flag: &str) -> Result<T, String> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("{flag} expects a number"))
}

fn write_report(report: &BenchReport) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(RESULTS_DIR)?;
    let path = Path::new(RESULTS_DIR).join(format!("bench-{}.json", report.timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

fn print_row(r: &McReport) {
    println!(
        "  {:<32} {:>4}% {:>9.0} {:>9.0} {:>8.2}ms {:>8.2}ms {:>6}  {}",
        r.label,
        (r.pass_rate * 100.0) as u32,
        r.ticks.mean,
        r.waves.mean,
        r.ripple_ms.mean,
        r.dijkstra_ms.mean,
        r.total_mismatches,
        if r.pass_rate >= 1.0 { "PASS" } else { "FAIL" },
    );
}

fn main() -> ExitCode {
    // Expected infeasible runs log at warn; keep them quiet unless asked.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let all = scenarios();
    let selected: Vec<&Scenario> = all
        .iter()
        .filter(|s| cli.filter.as_deref().map_or(true, |f| s.matches(f)))
        .collect();
    if selected.is_empty() {
        eprintln!("no scenarios match {:?}", cli.filter);
        return ExitCode::FAILURE;
    }
    let ts_dir = cli.time_series.then(|| Path::new(RESULTS_DIR).join("time-series"));

    println!("\n  ChaCha8Rng | {} run(s) per scenario | base seed {}\n", cli.runs, cli.seed);
    println!(
        "  {:<32} {:>5} {:>9} {:>9} {:>10} {:>10} {:>6}",
        "Scenario", "Pass%", "Ticks", "Waves", "Ripple", "Dijkstra", "Miss"
    );
    println!("  {}", "-".repeat(88));

    let started = Instant::now();
    let reports: Vec<McReport> = selected
        .iter()
        .map(|scenario| {
            let r = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref());
            print_row(&r);
            r
        })
        .collect();

    let total = reports.len();
    let passed = reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;
    println!("  {}", "-".repeat(88));
    println!(
        "  Total: {total}  Passed: {passed}  Failed: {failed}  Suite time: {:.1}s\n",
        started.elapsed().as_secs_f64()
    );

    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis());
    let report = BenchReport {
        timestamp: millis.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary { total, passed, failed, pass_rate: passed as f64 / total as f64 },
        scenarios: reports,
    };
    match write_report(&report) {
        Ok(path) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => eprintln!("  Could not save results: {e}"),
    }

    if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
