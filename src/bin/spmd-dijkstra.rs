//! spmd-dijkstra CLI
//!
//! Loads or generates graphs and runs the lockstep distributed Dijkstra on
//! an in-process world of workers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use spmd_dijkstra::graph::{self, complete_edge_count};
use spmd_dijkstra::report::{render_distances, render_graph, render_json, render_timings};
use spmd_dijkstra::{Harness, RoundPolicy, RunConfig, ScanStrategy};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Compute shortest distances from a source vertex
    Run {
        /// Graph file in the flat text format
        #[clap(long)]
        graph: PathBuf,
        /// YAML or JSON run configuration; flags below override it
        #[clap(long)]
        config: Option<PathBuf>,
        #[clap(long)]
        workers: Option<usize>,
        #[clap(long)]
        source: Option<usize>,
        /// Timed repetitions of the whole computation (default 30)
        #[clap(long)]
        repeat: Option<usize>,
        /// Use the truncated round budget and strided scan
        #[clap(long)]
        legacy: bool,
        /// Compare against the sequential reference
        #[clap(long)]
        verify: bool,
        /// Print the full report as JSON
        #[clap(long)]
        json: bool,
        /// Print the adjacency list before running
        #[clap(long)]
        print_graph: bool,
    },
    /// Write a synthetic graph in the flat text format
    Generate {
        #[clap(long)]
        vertices: usize,
        #[clap(long)]
        output: PathBuf,
        /// Undirected complete graph with cycling weights
        #[clap(long, conflicts_with = "density")]
        complete: bool,
        /// Edge probability for a random directed graph
        #[clap(long, default_value_t = 0.1)]
        density: f64,
        #[clap(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a graph's adjacency list
    Show {
        #[clap(long)]
        graph: PathBuf,
        /// Largest vertex count to accept (defaults to the run limit)
        #[clap(long)]
        max_vertices: Option<usize>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::too_many_arguments)]
async fn run(
    graph_path: PathBuf,
    config_path: Option<PathBuf>,
    workers: Option<usize>,
    source: Option<usize>,
    repeat: Option<usize>,
    legacy: bool,
    verify: bool,
    json: bool,
    print_graph: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(workers) = workers {
        config.workers = workers;
    }
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(repeat) = repeat {
        config.repeat = repeat;
    }
    if legacy {
        config.round_policy = RoundPolicy::Truncated;
        config.scan_strategy = ScanStrategy::Strided;
    }
    config.verify |= verify;
    config.validate().context("invalid run configuration")?;

    let graph = graph::load_graph(&graph_path, config.max_vertices)
        .with_context(|| format!("loading graph {}", graph_path.display()))?;
    if print_graph {
        print!("{}", render_graph(&graph));
    }
    println!(
        "Vertices: {}  Complete-graph pairs: {}",
        graph.vertex_count(),
        complete_edge_count(graph.vertex_count())
    );

    let harness = Harness::new(Arc::new(graph), config)?;
    let report = harness.run().await?;

    if json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_distances(report.source, &report.distances));
        print!("{}", render_timings(&report));
    }

    if report.verified == Some(false) {
        anyhow::bail!("distributed result differs from the sequential reference");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.cmd {
        Command::Run {
            graph,
            config,
            workers,
            source,
            repeat,
            legacy,
            verify,
            json,
            print_graph,
        } => {
            run(
                graph,
                config,
                workers,
                source,
                repeat,
                legacy,
                verify,
                json,
                print_graph,
            )
            .await?
        }
        Command::Generate {
            vertices,
            output,
            complete,
            density,
            seed,
        } => {
            let generated = if complete {
                graph::complete_graph(vertices)?
            } else {
                graph::random_graph(vertices, density, seed)?
            };
            graph::save_graph(&generated, &output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Wrote {} vertices, {} edges to {}",
                generated.vertex_count(),
                generated.edge_count(),
                output.display()
            );
        }
        Command::Show {
            graph,
            max_vertices,
        } => {
            let limit = max_vertices.unwrap_or_else(|| RunConfig::default().max_vertices);
            let loaded = graph::load_graph(&graph, limit)
                .with_context(|| format!("loading graph {}", graph.display()))?;
            print!("{}", render_graph(&loaded));
        }
    }

    Ok(())
}
