//! Text rendering for topology inspection
//!
//! Human-readable dumps of the server and page graphs. Output is
//! deterministic for a given insertion history: servers and pages appear in
//! insertion order, and that order doubles as the matrix index. Nothing
//! parses these formats; they exist for eyeballing a topology.

use std::io::{self, Write};

use crate::pages::PageGraph;
use crate::servers::ServerGraph;

/// Render the server list, adjacency matrix, and hosted pages
pub fn render_topology<W: Write>(graph: &ServerGraph, writer: &mut W) -> io::Result<()> {
    let names: Vec<&str> = graph.server_names().collect();

    writeln!(writer, "Servers: {}", names.len())?;
    for (index, name) in names.iter().enumerate() {
        writeln!(writer, "  {name}({index})")?;
    }
    writeln!(writer)?;

    writeln!(writer, "Connections:")?;
    let labels: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(index, name)| format!("{name}({index})"))
        .collect();
    // One column per server, wide enough for the longest label or a "false".
    let width = labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("false".len())
        + 2;

    write!(writer, "{:width$}", "")?;
    for label in &labels {
        write!(writer, "{label:<width$}")?;
    }
    writeln!(writer)?;

    for (row, label) in labels.iter().enumerate() {
        write!(writer, "{label:<width$}")?;
        for column in 0..names.len() {
            write!(writer, "{:<width$}", graph.connected(names[row], names[column]))?;
        }
        writeln!(writer)?;
    }
    writeln!(writer)?;

    writeln!(writer, "Hosted pages:")?;
    for name in &names {
        let pages = graph.hosted_pages(name).unwrap_or(&[]);
        if pages.is_empty() {
            writeln!(writer, "  {name}: (none)")?;
        } else {
            writeln!(writer, "  {name}: {}", pages.join(", "))?;
        }
    }
    Ok(())
}

/// Render every page with its host and outbound hyperlinks
pub fn render_pages<W: Write>(web: &PageGraph, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Pages: {}", web.page_count())?;
    for name in web.page_names() {
        let host = web.host_of(name).unwrap_or("?");
        let links = web.links(name).unwrap_or(&[]);
        if links.is_empty() {
            writeln!(writer, "  {name} @ {host} -> (none)")?;
        } else {
            writeln!(writer, "  {name} @ {host} -> {}", links.join(", "))?;
        }
    }
    Ok(())
}

/// Render counts and the critical-server set
pub fn render_summary<W: Write>(web: &PageGraph, writer: &mut W) -> io::Result<()> {
    let servers = web.servers();

    writeln!(writer, "Topology summary")?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(
        writer,
        "Servers: {} | Connections: {} | Pages: {} | Hyperlinks: {}",
        servers.server_count(),
        servers.connection_count(),
        web.page_count(),
        web.link_count()
    )?;

    let critical = servers.critical_servers();
    if critical.is_empty() {
        writeln!(writer, "Critical servers: (none)")?;
    } else {
        writeln!(writer, "Critical servers: {}", critical.join(", "))?;
    }
    Ok(())
}
