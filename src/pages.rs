//! Hyperlink graph of web pages
//!
//! A directed graph of pages layered over a [`ServerGraph`]. Every page is
//! hosted by exactly one server; hosting is delegated to the server graph,
//! which a `PageGraph` owns from construction, so the page→host relation can
//! never go stale. Hyperlinks are directed, with at most one edge per ordered
//! pair; self-links are allowed.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::servers::{ServerGraph, ServerGraphError};

/// Errors that can occur when mutating or querying a [`PageGraph`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageGraphError {
    #[error("page '{0}' already exists")]
    DuplicatePage(String),

    #[error("page '{0}' does not exist")]
    UnknownPage(String),

    #[error("hyperlink from '{from}' to '{to}' already exists")]
    DuplicateLink { from: String, to: String },

    #[error("no hyperlink from '{from}' to '{to}'")]
    UnknownLink { from: String, to: String },

    #[error("page '{0}' has no outbound hyperlinks")]
    NoOutboundLinks(String),

    #[error("no route from server '{from}' to server '{to}'")]
    UnreachableHost { from: String, to: String },

    #[error(transparent)]
    Topology(#[from] ServerGraphError),
}

/// A single page: its outbound hyperlink targets
#[derive(Debug, Clone, Default)]
struct PageNode {
    /// Target page names in link-creation order
    links: Vec<String>,
}

/// Directed hyperlink graph over the pages of a server topology
///
/// Owns the [`ServerGraph`] it was built on; the server graph stays reachable
/// through [`servers`](PageGraph::servers) and
/// [`servers_mut`](PageGraph::servers_mut).
#[derive(Debug, Clone)]
pub struct PageGraph {
    servers: ServerGraph,
    /// Live page names in insertion order
    order: Vec<String>,
    /// Page name → node state
    pages: HashMap<String, PageNode>,
}

impl PageGraph {
    /// Create a page graph over an existing server topology
    pub fn new(servers: ServerGraph) -> Self {
        Self {
            servers,
            order: Vec::new(),
            pages: HashMap::new(),
        }
    }

    /// The underlying server topology
    pub fn servers(&self) -> &ServerGraph {
        &self.servers
    }

    /// Mutable access to the underlying server topology
    pub fn servers_mut(&mut self) -> &mut ServerGraph {
        &mut self.servers
    }

    /// Number of live pages
    pub fn page_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of hyperlinks
    pub fn link_count(&self) -> usize {
        self.pages.values().map(|page| page.links.len()).sum()
    }

    /// True if a page with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Page names in insertion order
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Outbound hyperlink targets of a page, in creation order
    pub fn links(&self, name: &str) -> Option<&[String]> {
        self.pages.get(name).map(|page| page.links.as_slice())
    }

    /// The server hosting a page
    pub fn host_of(&self, name: &str) -> Option<&str> {
        self.servers.host_of(name)
    }

    /// Add a page hosted by the given server
    ///
    /// The duplicate-name check runs first, regardless of host validity. If
    /// host registration fails the page graph is left untouched.
    pub fn add_page(&mut self, name: &str, host: &str) -> Result<(), PageGraphError> {
        if self.contains(name) {
            warn!(page = name, "page already exists");
            return Err(PageGraphError::DuplicatePage(name.to_string()));
        }
        self.servers.add_hosted_page(name, host)?;
        self.order.push(name.to_string());
        self.pages.insert(name.to_string(), PageNode::default());
        debug!(page = name, host, "added page");
        Ok(())
    }

    /// Remove a page, purging every hyperlink to and from it
    ///
    /// Host unregistration runs first: if it fails, nothing has changed.
    /// Afterwards every other page's outbound list is scanned and any entry
    /// pointing at the removed page is dropped.
    pub fn remove_page(&mut self, name: &str) -> Result<(), PageGraphError> {
        if !self.contains(name) {
            return Err(PageGraphError::UnknownPage(name.to_string()));
        }
        let host = self.servers.remove_hosted_page(name)?;

        for page in self.pages.values_mut() {
            page.links.retain(|target| target != name);
        }
        self.pages.remove(name);
        self.order.retain(|n| n != name);
        debug!(page = name, host = host.as_str(), "removed page");
        Ok(())
    }

    /// Add a hyperlink between two pages
    ///
    /// At most one hyperlink per ordered pair; linking a page to itself is
    /// allowed.
    pub fn add_link(&mut self, from: &str, to: &str) -> Result<(), PageGraphError> {
        if !self.contains(to) {
            return Err(PageGraphError::UnknownPage(to.to_string()));
        }
        let page = self
            .pages
            .get_mut(from)
            .ok_or_else(|| PageGraphError::UnknownPage(from.to_string()))?;
        if page.links.iter().any(|target| target == to) {
            warn!(from, to, "hyperlink already exists");
            return Err(PageGraphError::DuplicateLink {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        page.links.push(to.to_string());
        debug!(from, to, "added hyperlink");
        Ok(())
    }

    /// Remove a hyperlink between two pages
    pub fn remove_link(&mut self, from: &str, to: &str) -> Result<(), PageGraphError> {
        if !self.contains(to) {
            return Err(PageGraphError::UnknownPage(to.to_string()));
        }
        let page = self
            .pages
            .get_mut(from)
            .ok_or_else(|| PageGraphError::UnknownPage(from.to_string()))?;
        let position = page.links.iter().position(|target| target == to).ok_or_else(|| {
            PageGraphError::UnknownLink {
                from: from.to_string(),
                to: to.to_string(),
            }
        })?;
        page.links.remove(position);
        debug!(from, to, "removed hyperlink");
        Ok(())
    }

    /// Average hop distance from a page's host to the hosts of its targets
    ///
    /// For every outbound hyperlink target, takes the shortest path between
    /// the two hosting servers and averages the hop counts. A page with no
    /// outbound links is a distinguished error, not a division by zero; an
    /// unreachable target host is likewise reported rather than folded into
    /// the average.
    pub fn avg_shortest_paths(&self, name: &str) -> Result<f64, PageGraphError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| PageGraphError::UnknownPage(name.to_string()))?;
        if page.links.is_empty() {
            return Err(PageGraphError::NoOutboundLinks(name.to_string()));
        }
        let host = self
            .servers
            .host_of(name)
            .ok_or_else(|| ServerGraphError::UnknownPage(name.to_string()))?;

        let mut total = 0usize;
        for target in &page.links {
            let target_host = self
                .servers
                .host_of(target)
                .ok_or_else(|| ServerGraphError::UnknownPage(target.clone()))?;
            let hops = self.servers.shortest_path(host, target_host).ok_or_else(|| {
                PageGraphError::UnreachableHost {
                    from: host.to_string(),
                    to: target_host.to_string(),
                }
            })?;
            total += hops;
        }
        Ok(total as f64 / page.links.len() as f64)
    }
}
