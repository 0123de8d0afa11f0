use camino::Utf8PathBuf;
use nomogen::catalog::{Relation, catalog};
use nomogen::{Nomogram, NomogenError, Verbosity, nomogen};
use rayon::prelude::*;
use std::fmt::Write;
use std::fs;
use std::time::{Duration, Instant};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "survey" => survey(&args[2..]),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            usage();
            std::process::exit(1);
        }
    }
}

fn usage() {
    eprintln!("Usage: cargo xtask <command>");
    eprintln!("Commands:");
    eprintln!("  survey [--nodes N]... [--out FILE]");
    eprintln!("      Lay out every catalog relation at each node count, in parallel,");
    eprintln!("      and print a Markdown table of alignment errors");
}

struct SurveyOptions {
    node_counts: Vec<usize>,
    out: Option<Utf8PathBuf>,
}

fn parse_options(args: &[String]) -> SurveyOptions {
    let mut node_counts = Vec::new();
    let mut out = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--nodes" => match iter.next().and_then(|n| n.parse().ok()) {
                Some(n) => node_counts.push(n),
                None => {
                    eprintln!("--nodes needs a number");
                    std::process::exit(1);
                }
            },
            "--out" => match iter.next() {
                Some(path) => out = Some(Utf8PathBuf::from(path)),
                None => {
                    eprintln!("--out needs a path");
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown option: {other}");
                std::process::exit(1);
            }
        }
    }
    if node_counts.is_empty() {
        node_counts = vec![5, 9, 13];
    }
    SurveyOptions { node_counts, out }
}

/// One relation laid out at one node count
struct Run {
    relation: Relation,
    nodes: usize,
    elapsed: Duration,
    result: Result<Nomogram, NomogenError>,
}

fn lay_out(relation: Relation, nodes: usize) -> Run {
    let start = Instant::now();
    let result = relation
        .config()
        .and_then(|config| config.with_nodes(nodes))
        .map(|config| config.with_verbosity(Verbosity::Quiet))
        .and_then(|config| nomogen(relation.f, &config));
    Run {
        relation,
        nodes,
        elapsed: start.elapsed(),
        result,
    }
}

fn survey(args: &[String]) {
    let options = parse_options(args);
    let jobs: Vec<(Relation, usize)> = catalog()
        .into_iter()
        .flat_map(|relation| options.node_counts.iter().map(move |&n| (relation, n)))
        .collect();

    eprintln!("Laying out {} nomograms...", jobs.len());
    let runs: Vec<Run> = jobs
        .into_par_iter()
        .map(|(relation, nodes)| lay_out(relation, nodes))
        .collect();

    let mut report = String::new();
    report.push_str("| relation | nodes | max error (mm) | iterations | termination | w ticks | time |\n");
    report.push_str("|---|---:|---:|---:|---|---|---:|\n");
    let mut failures = 0;
    for run in &runs {
        let name = run.relation.name;
        let nodes = run.nodes;
        let ms = run.elapsed.as_secs_f64() * 1000.0;
        match &run.result {
            Ok(chart) => {
                let flag = if chart.warning().is_some() { " ⚠" } else { "" };
                let _ = writeln!(
                    report,
                    "| {name} | {nodes} | {:.4}{flag} | {} | {:?} | {} | {ms:.0} ms |",
                    chart.max_error_mm(),
                    chart.iterations,
                    chart.termination,
                    chart.w().tick_side(),
                );
            }
            Err(e) => {
                failures += 1;
                let _ = writeln!(report, "| {name} | {nodes} | error: {e} | | | | {ms:.0} ms |");
            }
        }
    }

    print!("{report}");
    if let Some(path) = options.out {
        if let Err(e) = fs::write(&path, &report) {
            eprintln!("Failed to write {path}: {e}");
            std::process::exit(1);
        }
        eprintln!("Report written to {path}");
    }
    if failures > 0 {
        eprintln!("{failures} layout(s) failed");
        std::process::exit(1);
    }
}
