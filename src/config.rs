//! Topology file support
//!
//! Declarative topology descriptions in TOML. A file is replayed through the
//! public graph operations in section order (servers, then connections, then
//! pages, then links), so everything a file can express is validated by the
//! same rules as programmatic construction.
//!
//! ## Topology File Format
//!
//! ```toml
//! # topology.toml
//!
//! [[servers]]
//! name = "core"            # the first server needs no attachment
//!
//! [[servers]]
//! name = "edge-1"
//! attach_to = "core"
//!
//! [[connections]]
//! from = "edge-1"
//! to = "edge-2"
//!
//! [[pages]]
//! name = "index"
//! host = "core"
//!
//! [[links]]
//! from = "index"
//! to = "about"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::pages::{PageGraph, PageGraphError};
use crate::servers::{ServerGraph, ServerGraphError};

/// Errors that can occur when loading or applying a topology file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read topology file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse topology file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Server(#[from] ServerGraphError),

    #[error(transparent)]
    Page(#[from] PageGraphError),
}

/// A server declaration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    pub name: String,

    /// Existing server to connect to; only the first declared server may
    /// omit it
    #[serde(default)]
    pub attach_to: Option<String>,
}

/// An extra connection between two declared servers
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionEntry {
    pub from: String,
    pub to: String,
}

/// A page declaration
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub name: String,
    pub host: String,
}

/// A hyperlink declaration
#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    pub from: String,
    pub to: String,
}

/// Root topology file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TopologyConfig {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,

    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,

    #[serde(default)]
    pub pages: Vec<PageEntry>,

    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl TopologyConfig {
    /// Build the graphs this file describes
    ///
    /// Entries are applied in declaration order within each section, so the
    /// resulting insertion order (and render index order) follows the file.
    pub fn build(&self) -> Result<PageGraph, ConfigError> {
        let mut servers = ServerGraph::new();
        for entry in &self.servers {
            servers.add_server(&entry.name, entry.attach_to.as_deref())?;
        }
        for entry in &self.connections {
            servers.add_connection(&entry.from, &entry.to)?;
        }

        let mut web = PageGraph::new(servers);
        for entry in &self.pages {
            web.add_page(&entry.name, &entry.host)?;
        }
        for entry in &self.links {
            web.add_link(&entry.from, &entry.to)?;
        }

        debug!(
            servers = self.servers.len(),
            pages = self.pages.len(),
            "built topology from config"
        );
        Ok(web)
    }
}

/// Parse a topology description from a TOML string
pub fn parse_topology(content: &str) -> Result<TopologyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load a topology file and build the graphs it describes
pub fn load_topology(path: &Path) -> Result<PageGraph, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_topology(&content)?;
    config.build()
}
