//! Lay out every relation in the catalog and summarize the results.

use nomogen::catalog::catalog;
use nomogen::{Verbosity, nomogen};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    for relation in catalog() {
        let _span = tracing::info_span!("relation", name = relation.name).entered();
        let result = relation
            .config()
            .map(|config| config.with_verbosity(Verbosity::Summary))
            .and_then(|config| nomogen(relation.f, &config));
        match result {
            Ok(chart) => println!(
                "{:<20} {:>8.3} mm  w ticks {:<5}  {}",
                relation.name,
                chart.max_error_mm(),
                chart.w().tick_side(),
                relation.description
            ),
            Err(e) => {
                tracing::error!(relation = relation.name, "layout failed");
                eprintln!("{:?}", miette::Report::new(e));
            }
        }
    }
}
