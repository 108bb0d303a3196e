//! Factor-search sweep runner.
//!
//! Usage: cargo run --release --bin anneal_runner [path/to/anneal.json]
//!
//! Without a path the built-in defaults are used. Results go to stdout as CSV;
//! progress is logged through `RUST_LOG`.

use anyhow::Context;
use log::info;
use pbit_multiplier::{run_sweep, sweep_results_to_csv, AnnealParams};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            AnnealParams::from_json(&raw).with_context(|| format!("parsing config {}", path))?
        }
        None => AnnealParams::default(),
    };

    info!(
        "sweep widths={:?} targets/width={} trials={} mode={}",
        params.widths,
        params.targets_per_width,
        params.trials,
        params.mode.name()
    );

    let t0 = std::time::Instant::now();
    let results = run_sweep(&params)?;
    info!("sweep finished in {:.2?}", t0.elapsed());

    print!("{}", sweep_results_to_csv(&results));
    Ok(())
}
