//! Server topology graph
//!
//! An undirected graph of web servers. Servers are keyed by name; the
//! connection relation is symmetric and boolean. Each server also carries the
//! ordered list of pages it hosts, with a page→host reverse index so a page's
//! host can be resolved without scanning.
//!
//! Two analyses are provided on top of graph maintenance:
//!
//! 1. **Critical servers** - articulation points, found with a
//!    discovery-time/low-link depth-first search
//! 2. **Shortest path** - hop count between two servers, found with a
//!    breadth-first search

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when mutating or querying a [`ServerGraph`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerGraphError {
    #[error("server '{0}' already exists")]
    DuplicateServer(String),

    #[error("server '{0}' does not exist")]
    UnknownServer(String),

    #[error("server '{0}' must attach to an existing server")]
    MissingAttachment(String),

    #[error("page '{0}' is not registered with any server")]
    UnknownPage(String),

    #[error("page '{0}' is already registered with server '{1}'")]
    DuplicatePage(String, String),

    #[error("cannot remove server '{0}' into itself")]
    SelfTransfer(String),
}

/// A single server: its neighbors and the pages it hosts
#[derive(Debug, Clone, Default)]
struct ServerNode {
    /// Names of directly connected servers (symmetric, no self-loops stored)
    neighbors: HashSet<String>,
    /// Names of hosted pages, in registration order
    pages: Vec<String>,
}

/// Undirected graph of web servers
///
/// Servers are identified by unique name. Insertion order is preserved and
/// doubles as the index order used by rendering; removing a server never
/// renumbers the others.
#[derive(Debug, Clone, Default)]
pub struct ServerGraph {
    /// Live server names in insertion order
    order: Vec<String>,
    /// Server name → node state
    servers: HashMap<String, ServerNode>,
    /// Page name → hosting server name
    hosts: HashMap<String, String>,
}

impl ServerGraph {
    /// Create an empty server graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live servers
    pub fn server_count(&self) -> usize {
        self.order.len()
    }

    /// True if the graph has no servers
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True if a server with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    /// Server names in insertion order
    pub fn server_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// True if `a` and `b` are directly connected
    pub fn connected(&self, a: &str, b: &str) -> bool {
        self.servers
            .get(a)
            .is_some_and(|node| node.neighbors.contains(b))
    }

    /// Number of connections, counting each undirected edge once
    pub fn connection_count(&self) -> usize {
        self.servers
            .values()
            .map(|node| node.neighbors.len())
            .sum::<usize>()
            / 2
    }

    /// Add a server and connect it to an existing one
    ///
    /// The very first server is accepted unconditionally and starts with no
    /// connections; any supplied attachment is ignored. Every later server
    /// must name an existing server to attach to.
    pub fn add_server(
        &mut self,
        name: &str,
        attach_to: Option<&str>,
    ) -> Result<(), ServerGraphError> {
        if self.is_empty() {
            if let Some(other) = attach_to {
                debug!(server = name, ignored = other, "first server starts unconnected");
            }
            self.insert_node(name);
            debug!(server = name, "added first server with no connections");
            return Ok(());
        }

        if self.contains(name) {
            warn!(server = name, "server already exists");
            return Err(ServerGraphError::DuplicateServer(name.to_string()));
        }
        let other = attach_to.ok_or_else(|| {
            warn!(server = name, "no attachment given for non-first server");
            ServerGraphError::MissingAttachment(name.to_string())
        })?;
        if !self.contains(other) {
            warn!(server = name, attach_to = other, "attachment server not found");
            return Err(ServerGraphError::UnknownServer(other.to_string()));
        }

        self.insert_node(name);
        self.insert_edge(name, other);
        debug!(server = name, attached_to = other, "added server");
        Ok(())
    }

    /// Connect two existing servers
    ///
    /// Idempotent: re-adding an existing connection is a no-op success, as is
    /// connecting a server to itself.
    pub fn add_connection(&mut self, from: &str, to: &str) -> Result<(), ServerGraphError> {
        for endpoint in [from, to] {
            if !self.contains(endpoint) {
                warn!(from, to, missing = endpoint, "connection endpoint not found");
                return Err(ServerGraphError::UnknownServer(endpoint.to_string()));
            }
        }
        if from != to {
            self.insert_edge(from, to);
        }
        debug!(from, to, "connected servers");
        Ok(())
    }

    /// Register a page as hosted by the given server
    pub fn add_hosted_page(&mut self, page: &str, server: &str) -> Result<(), ServerGraphError> {
        if let Some(current) = self.hosts.get(page) {
            warn!(page, host = current.as_str(), "page is already hosted");
            return Err(ServerGraphError::DuplicatePage(
                page.to_string(),
                current.clone(),
            ));
        }
        let node = self
            .servers
            .get_mut(server)
            .ok_or_else(|| ServerGraphError::UnknownServer(server.to_string()))?;
        node.pages.push(page.to_string());
        self.hosts.insert(page.to_string(), server.to_string());
        debug!(page, server, "registered hosted page");
        Ok(())
    }

    /// Unregister a page from its current host
    ///
    /// Returns the name of the server that was hosting it.
    pub fn remove_hosted_page(&mut self, page: &str) -> Result<String, ServerGraphError> {
        let host = self
            .hosts
            .remove(page)
            .ok_or_else(|| ServerGraphError::UnknownPage(page.to_string()))?;
        // The reverse index and the hosted lists move together, so the host
        // entry is always present here.
        if let Some(node) = self.servers.get_mut(&host) {
            node.pages.retain(|p| p != page);
        }
        debug!(page, host = host.as_str(), "unregistered hosted page");
        Ok(host)
    }

    /// The server currently hosting a page, if it is registered
    pub fn host_of(&self, page: &str) -> Option<&str> {
        self.hosts.get(page).map(String::as_str)
    }

    /// Pages hosted by a server, in registration order
    pub fn hosted_pages(&self, server: &str) -> Option<&[String]> {
        self.servers.get(server).map(|node| node.pages.as_slice())
    }

    /// Remove a server, transferring its pages and connections to another
    ///
    /// Every page hosted by `name` is reassigned to `into` (appended to its
    /// hosted list in order), and every former neighbor of `name` other than
    /// `into` itself is reconnected to `into`. Returns the names of the moved
    /// pages.
    pub fn remove_server(&mut self, name: &str, into: &str) -> Result<Vec<String>, ServerGraphError> {
        if name == into {
            warn!(server = name, "refusing to remove a server into itself");
            return Err(ServerGraphError::SelfTransfer(name.to_string()));
        }
        if !self.contains(name) {
            return Err(ServerGraphError::UnknownServer(name.to_string()));
        }
        if !self.contains(into) {
            return Err(ServerGraphError::UnknownServer(into.to_string()));
        }

        let removed = self
            .servers
            .remove(name)
            .unwrap_or_default();
        self.order.retain(|n| n != name);

        // Detach, then reattach the orphaned neighbors to the absorbing
        // server so the transfer drops no connectivity.
        for neighbor in &removed.neighbors {
            if let Some(node) = self.servers.get_mut(neighbor) {
                node.neighbors.remove(name);
            }
        }
        for neighbor in &removed.neighbors {
            if neighbor != into {
                self.insert_edge(into, neighbor);
            }
        }

        for page in &removed.pages {
            self.hosts.insert(page.clone(), into.to_string());
        }
        if let Some(node) = self.servers.get_mut(into) {
            node.pages.extend(removed.pages.iter().cloned());
        }

        debug!(
            server = name,
            into,
            moved_pages = removed.pages.len(),
            moved_connections = removed.neighbors.len(),
            "removed server"
        );
        Ok(removed.pages)
    }

    /// Servers whose failure would split the network
    ///
    /// Articulation points of the connection graph, computed with a
    /// discovery-time/low-link depth-first search over every component.
    /// Results are in insertion order and contain no duplicates. A server
    /// with no connections is never critical.
    pub fn critical_servers(&self) -> Vec<String> {
        let mut state = DfsState::default();
        for name in &self.order {
            if !state.disc.contains_key(name.as_str()) {
                self.dfs_low_link(name, None, &mut state);
            }
        }
        self.order
            .iter()
            .filter(|name| state.critical.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Low-link DFS helper for articulation points
    fn dfs_low_link<'a>(&'a self, node: &'a str, parent: Option<&str>, state: &mut DfsState<'a>) {
        state.timer += 1;
        state.disc.insert(node, state.timer);
        state.low.insert(node, state.timer);
        let mut children = 0usize;

        if let Some(server) = self.servers.get(node) {
            for neighbor in &server.neighbors {
                if !state.disc.contains_key(neighbor.as_str()) {
                    children += 1;
                    self.dfs_low_link(neighbor, Some(node), state);

                    let child_low = state.low[neighbor.as_str()];
                    let own_low = state.low[node].min(child_low);
                    state.low.insert(node, own_low);

                    // A non-root node is critical when some subtree cannot
                    // reach above it.
                    if parent.is_some() && child_low >= state.disc[node] {
                        state.critical.insert(node);
                    }
                } else if Some(neighbor.as_str()) != parent {
                    let back = state.disc[neighbor.as_str()];
                    let own_low = state.low[node].min(back);
                    state.low.insert(node, own_low);
                }
            }
        }

        // A root is critical only when the DFS splits into several subtrees.
        if parent.is_none() && children >= 2 {
            state.critical.insert(node);
        }
    }

    /// Minimum number of hops between two servers
    ///
    /// Returns `None` if either endpoint is absent or no path exists, and
    /// `Some(0)` when `from == to`. Breadth-first search with per-node
    /// distances, stopping as soon as the target is dequeued.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<usize> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(0);
        }

        let mut dist: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        dist.insert(from, 0);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            let hops = dist[current];
            if current == to {
                return Some(hops);
            }
            if let Some(node) = self.servers.get(current) {
                for neighbor in &node.neighbors {
                    if !dist.contains_key(neighbor.as_str()) {
                        dist.insert(neighbor, hops + 1);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        None
    }

    fn insert_node(&mut self, name: &str) {
        self.order.push(name.to_string());
        self.servers.insert(name.to_string(), ServerNode::default());
    }

    /// Set the symmetric connection between two existing servers
    fn insert_edge(&mut self, a: &str, b: &str) {
        if let Some(node) = self.servers.get_mut(a) {
            node.neighbors.insert(b.to_string());
        }
        if let Some(node) = self.servers.get_mut(b) {
            node.neighbors.insert(a.to_string());
        }
    }
}

/// Working state for the articulation-point search
#[derive(Debug, Default)]
struct DfsState<'a> {
    disc: HashMap<&'a str, usize>,
    low: HashMap<&'a str, usize>,
    timer: usize,
    critical: HashSet<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A–B–C–D path graph
    fn path_graph() -> ServerGraph {
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        graph.add_server("B", Some("A")).unwrap();
        graph.add_server("C", Some("B")).unwrap();
        graph.add_server("D", Some("C")).unwrap();
        graph
    }

    /// Star around A with leaves B..G, plus a direct E–F connection
    fn star_graph() -> ServerGraph {
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        for leaf in ["B", "C", "D", "E", "F", "G"] {
            graph.add_server(leaf, Some("A")).unwrap();
        }
        graph.add_connection("E", "F").unwrap();
        graph
    }

    #[test]
    fn test_first_server_accepted_unconditionally() {
        let mut graph = ServerGraph::new();
        // The attachment does not exist yet; the first server is taken anyway.
        graph.add_server("A", Some("Z")).unwrap();
        assert!(graph.contains("A"));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_duplicate_server_rejected() {
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        graph.add_server("B", Some("A")).unwrap();
        assert_eq!(
            graph.add_server("B", Some("A")),
            Err(ServerGraphError::DuplicateServer("B".to_string()))
        );
        assert_eq!(graph.server_count(), 2);
    }

    #[test]
    fn test_attachment_must_exist() {
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        assert_eq!(
            graph.add_server("C", Some("Z")),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
        assert_eq!(
            graph.add_server("C", None),
            Err(ServerGraphError::MissingAttachment("C".to_string()))
        );
        assert!(!graph.contains("C"));
    }

    #[test]
    fn test_connections_are_symmetric() {
        let mut graph = star_graph();
        graph.add_connection("B", "C").unwrap();
        let names: Vec<&str> = graph.server_names().collect();
        for a in &names {
            for b in &names {
                assert_eq!(graph.connected(a, b), graph.connected(b, a));
            }
        }
    }

    #[test]
    fn test_add_connection_idempotent() {
        let mut graph = path_graph();
        assert_eq!(graph.connection_count(), 3);
        graph.add_connection("A", "B").unwrap();
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_self_connection_is_noop() {
        let mut graph = path_graph();
        graph.add_connection("A", "A").unwrap();
        assert!(!graph.connected("A", "A"));
    }

    #[test]
    fn test_connection_requires_both_endpoints() {
        let mut graph = path_graph();
        assert_eq!(
            graph.add_connection("A", "Z"),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
        assert_eq!(
            graph.add_connection("Z", "A"),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
    }

    #[test]
    fn test_hosted_page_round_trip() {
        let mut graph = path_graph();
        graph.add_hosted_page("index", "A").unwrap();
        graph.add_hosted_page("about", "A").unwrap();
        assert_eq!(graph.host_of("index"), Some("A"));
        assert_eq!(graph.hosted_pages("A").unwrap(), ["index", "about"]);

        let host = graph.remove_hosted_page("index").unwrap();
        assert_eq!(host, "A");
        assert_eq!(graph.host_of("index"), None);
        assert_eq!(graph.hosted_pages("A").unwrap(), ["about"]);
    }

    #[test]
    fn test_hosted_page_rejects_unknown_server_and_rehosting() {
        let mut graph = path_graph();
        assert_eq!(
            graph.add_hosted_page("index", "Z"),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
        graph.add_hosted_page("index", "A").unwrap();
        assert_eq!(
            graph.add_hosted_page("index", "B"),
            Err(ServerGraphError::DuplicatePage(
                "index".to_string(),
                "A".to_string()
            ))
        );
    }

    #[test]
    fn test_remove_unregistered_page_fails() {
        let mut graph = path_graph();
        assert_eq!(
            graph.remove_hosted_page("ghost"),
            Err(ServerGraphError::UnknownPage("ghost".to_string()))
        );
    }

    #[test]
    fn test_remove_server_transfers_pages_and_connections() {
        let mut graph = star_graph();
        graph.add_hosted_page("index", "A").unwrap();
        graph.add_hosted_page("news", "A").unwrap();
        graph.add_hosted_page("wiki", "B").unwrap();

        let moved = graph.remove_server("A", "B").unwrap();
        assert_eq!(moved, ["index", "news"]);

        assert!(!graph.contains("A"));
        assert_eq!(graph.host_of("index"), Some("B"));
        assert_eq!(graph.host_of("news"), Some("B"));
        // Existing pages keep their position, moved pages are appended.
        assert_eq!(graph.hosted_pages("B").unwrap(), ["wiki", "index", "news"]);

        // Every former neighbor of A is now attached to B.
        for leaf in ["C", "D", "E", "F", "G"] {
            assert!(graph.connected("B", leaf), "B should reach {leaf}");
        }
        assert!(!graph.connected("B", "A"));
    }

    #[test]
    fn test_remove_server_validates_arguments() {
        let mut graph = path_graph();
        assert_eq!(
            graph.remove_server("A", "A"),
            Err(ServerGraphError::SelfTransfer("A".to_string()))
        );
        assert_eq!(
            graph.remove_server("Z", "A"),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
        assert_eq!(
            graph.remove_server("A", "Z"),
            Err(ServerGraphError::UnknownServer("Z".to_string()))
        );
        assert_eq!(graph.server_count(), 4);
    }

    #[test]
    fn test_remove_server_keeps_names_stable() {
        let mut graph = star_graph();
        graph.remove_server("C", "B").unwrap();
        let names: Vec<&str> = graph.server_names().collect();
        assert_eq!(names, ["A", "B", "D", "E", "F", "G"]);
    }

    #[test]
    fn test_shortest_path_on_path_graph() {
        let graph = path_graph();
        assert_eq!(graph.shortest_path("A", "D"), Some(3));
        assert_eq!(graph.shortest_path("D", "A"), Some(3));
        assert_eq!(graph.shortest_path("B", "C"), Some(1));
    }

    #[test]
    fn test_shortest_path_same_server_is_zero() {
        let graph = path_graph();
        for name in ["A", "B", "C", "D"] {
            assert_eq!(graph.shortest_path(name, name), Some(0));
        }
    }

    #[test]
    fn test_shortest_path_unknown_endpoint() {
        let graph = path_graph();
        assert_eq!(graph.shortest_path("A", "Z"), None);
        assert_eq!(graph.shortest_path("Z", "A"), None);
        assert_eq!(graph.shortest_path("Y", "Z"), None);
    }

    #[test]
    fn test_shortest_path_prefers_shortcut() {
        let mut graph = path_graph();
        graph.add_connection("A", "D").unwrap();
        assert_eq!(graph.shortest_path("A", "D"), Some(1));
    }

    #[test]
    fn test_triangle_inequality() {
        let mut graph = star_graph();
        graph.add_connection("B", "C").unwrap();
        let names: Vec<String> = graph.server_names().map(str::to_string).collect();
        for x in &names {
            for y in &names {
                for z in &names {
                    let xz = graph.shortest_path(x, z).unwrap();
                    let xy = graph.shortest_path(x, y).unwrap();
                    let yz = graph.shortest_path(y, z).unwrap();
                    assert!(xz <= xy + yz, "{x}->{z} > {x}->{y} + {y}->{z}");
                }
            }
        }
    }

    #[test]
    fn test_critical_servers_on_path_graph() {
        // Interior servers of a path are critical, the endpoints are not.
        let graph = path_graph();
        assert_eq!(graph.critical_servers(), ["B", "C"]);
    }

    #[test]
    fn test_critical_servers_on_star_with_shortcut() {
        // Only the hub is critical: every leaf hangs off A directly, and the
        // extra E-F connection does not save the rest from losing A.
        let graph = star_graph();
        assert_eq!(graph.critical_servers(), ["A"]);
    }

    #[test]
    fn test_critical_servers_on_cycle() {
        // A ring has no articulation points.
        let mut graph = path_graph();
        graph.add_connection("D", "A").unwrap();
        assert!(graph.critical_servers().is_empty());
    }

    #[test]
    fn test_single_server_never_critical() {
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        assert!(graph.critical_servers().is_empty());
    }

    #[test]
    fn test_bridge_between_clusters() {
        // Two triangles joined through X: only X and the servers it bridges
        // through are critical.
        let mut graph = ServerGraph::new();
        graph.add_server("A", None).unwrap();
        graph.add_server("B", Some("A")).unwrap();
        graph.add_server("C", Some("A")).unwrap();
        graph.add_connection("B", "C").unwrap();
        graph.add_server("X", Some("C")).unwrap();
        graph.add_server("D", Some("X")).unwrap();
        graph.add_server("E", Some("D")).unwrap();
        graph.add_connection("D", "E").unwrap();
        graph.add_connection("X", "E").unwrap();
        assert_eq!(graph.critical_servers(), ["C", "X"]);
    }

    #[test]
    fn test_server_names_preserve_insertion_order() {
        let graph = star_graph();
        let names: Vec<&str> = graph.server_names().collect();
        assert_eq!(names, ["A", "B", "C", "D", "E", "F", "G"]);
    }
}
