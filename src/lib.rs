//! # webnet - A Small-Internet Topology Model
//!
//! Models a miniature internet: an undirected graph of web servers joined by
//! network connections, and a directed graph of the web pages those servers
//! host, joined by hyperlinks.
//!
//! ## Overview
//!
//! Two cooperating graphs:
//!
//! 1. **[`ServerGraph`]** - the server topology. Add and remove servers, wire
//!    up connections, find the critical servers whose failure would split the
//!    network, and measure hop distances between servers.
//! 2. **[`PageGraph`]** - the pages, layered over a server graph it owns.
//!    Add and remove pages and hyperlinks, and compute the average hop
//!    distance from a page's host to the hosts of everything it links to.
//!
//! Removing a server transfers its pages and connections to another server
//! rather than dropping them, so pages never dangle and the network never
//! silently fragments.
//!
//! ## Usage
//!
//! ```rust
//! use webnet::{PageGraph, ServerGraph};
//!
//! let mut servers = ServerGraph::new();
//! servers.add_server("core", None)?;
//! servers.add_server("edge", Some("core"))?;
//!
//! let mut web = PageGraph::new(servers);
//! web.add_page("index", "core")?;
//! web.add_page("about", "edge")?;
//! web.add_link("index", "about")?;
//!
//! assert_eq!(web.servers().shortest_path("core", "edge"), Some(1));
//! assert_eq!(web.avg_shortest_paths("index")?, 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Topologies can also be described declaratively in TOML and loaded with
//! [`load_topology`]; see the [`config`] module for the file format.

pub mod config;
pub mod pages;
pub mod report;
pub mod servers;
pub mod snapshot;

pub use config::{ConfigError, TopologyConfig, load_topology, parse_topology};
pub use pages::{PageGraph, PageGraphError};
pub use report::{render_pages, render_summary, render_topology};
pub use servers::{ServerGraph, ServerGraphError};
pub use snapshot::{GraphData, build_graph_data, to_json};
