//! Lay out the parallel-resistor nomogram and print its scale nodes.
//!
//! Run with `cargo run --example parallel_resistors --features tracing` and
//! `RUST_LOG=nomogen=debug` to watch the optimizer. The summary line is
//! logged at info level even without the feature.

use nomogen::catalog::parallel_resistors;
use nomogen::{NomogramConfig, ScaleId, Verbosity, nomogen};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let nodes = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(9);

    let config = NomogramConfig::new((5.0, 50.0), (5.0, 50.0), (2.5, 25.0))?
        .with_nodes(nodes)?
        .with_verbosity(Verbosity::Progress);
    let chart = nomogen(parallel_resistors, &config)?;

    for id in ScaleId::ALL {
        let scale = chart.scale(id);
        println!("{id} scale (ticks {}):", scale.tick_side());
        for ((value, x), y) in scale.nodes().iter().zip(scale.xs()).zip(scale.ys()) {
            println!("  {value:>8.3}  ({x:.4}, {y:.4})");
        }
    }
    tracing::info!(
        max_error_mm = chart.max_error_mm(),
        iterations = chart.iterations,
        termination = ?chart.termination,
        "parallel resistors laid out"
    );
    if let Some(warning) = chart.warning() {
        eprintln!("{:?}", miette::Report::new(warning.clone()));
    }
    Ok(())
}
