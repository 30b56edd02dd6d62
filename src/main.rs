//! webnet CLI - Topology Inspection Tool
//!
//! Loads a topology description and answers questions about it: full report,
//! summary, JSON snapshot, critical servers, hop distance between two
//! servers, or the average hyperlink distance of a page.
//!
//! Usage:
//!   webnet [OPTIONS] [TOPOLOGY]

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use webnet::{load_topology, render_pages, render_summary, render_topology, to_json};

/// webnet - inspect a small-internet topology
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology file
    #[arg(default_value = "topology.toml")]
    topology: PathBuf,

    /// Show summary only (counts and critical servers)
    #[arg(short, long)]
    summary: bool,

    /// Emit the topology as a JSON snapshot
    #[arg(long)]
    json: bool,

    /// List the critical servers, one per line
    #[arg(long)]
    critical: bool,

    /// Hop distance between two servers
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    route: Option<Vec<String>>,

    /// Average hyperlink distance for the given page
    #[arg(long, value_name = "PAGE")]
    avg_links: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let web = load_topology(&args.topology)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(stdout()),
    };

    if args.json {
        writeln!(writer, "{}", to_json(&web)?)?;
    } else if args.critical {
        for name in web.servers().critical_servers() {
            writeln!(writer, "{name}")?;
        }
    } else if let Some(route) = &args.route {
        let (from, to) = (&route[0], &route[1]);
        match web.servers().shortest_path(from, to) {
            Some(hops) => writeln!(writer, "{from} -> {to}: {hops} hop(s)")?,
            None => writeln!(writer, "{from} -> {to}: no route")?,
        }
    } else if let Some(page) = &args.avg_links {
        let average = web.avg_shortest_paths(page)?;
        writeln!(writer, "{page}: {average:.2}")?;
    } else if args.summary {
        render_summary(&web, &mut writer)?;
    } else {
        render_topology(web.servers(), &mut writer)?;
        writeln!(writer)?;
        render_pages(&web, &mut writer)?;
        writeln!(writer)?;
        render_summary(&web, &mut writer)?;
    }

    if let Some(path) = &args.output {
        eprintln!("Report written to: {}", path.display());
    }

    Ok(())
}
