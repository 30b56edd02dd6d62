//! Serializable topology snapshots
//!
//! Converts a [`PageGraph`] and its underlying server topology into a
//! JSON-friendly structure: one node per server, one entry per undirected
//! connection, one record per page, plus summary counts and the critical
//! servers.

use serde::Serialize;

use crate::pages::PageGraph;

/// Complete snapshot of a topology
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub pages: Vec<PageInfo>,
    pub summary: Summary,
}

/// A server in the snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: String,
    /// Position in insertion order; matches the rendered matrix index
    pub index: usize,
    pub hosted_pages: Vec<String>,
}

/// An undirected connection, listed once per pair
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// A page with its host and outbound hyperlinks
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub name: String,
    pub host: Option<String>,
    pub links: Vec<String>,
}

/// Aggregate counts for the whole topology
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub server_count: usize,
    pub connection_count: usize,
    pub page_count: usize,
    pub link_count: usize,
    pub critical_servers: Vec<String>,
}

/// Build a snapshot of the given topology
pub fn build_graph_data(web: &PageGraph) -> GraphData {
    let servers = web.servers();
    let names: Vec<&str> = servers.server_names().collect();

    let nodes = names
        .iter()
        .enumerate()
        .map(|(index, name)| Node {
            id: name.to_string(),
            index,
            hosted_pages: servers
                .hosted_pages(name)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        })
        .collect();

    // Index order keeps the edge list deterministic; each pair shows up once.
    let mut edges = Vec::new();
    for (i, source) in names.iter().enumerate() {
        for target in &names[i + 1..] {
            if servers.connected(source, target) {
                edges.push(Edge {
                    source: source.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    let pages = web
        .page_names()
        .map(|name| PageInfo {
            name: name.to_string(),
            host: web.host_of(name).map(str::to_string),
            links: web.links(name).map(<[String]>::to_vec).unwrap_or_default(),
        })
        .collect();

    let summary = Summary {
        server_count: servers.server_count(),
        connection_count: servers.connection_count(),
        page_count: web.page_count(),
        link_count: web.link_count(),
        critical_servers: servers.critical_servers(),
    };

    GraphData {
        nodes,
        edges,
        pages,
        summary,
    }
}

/// Serialize a topology snapshot as pretty-printed JSON
pub fn to_json(web: &PageGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build_graph_data(web))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servers::ServerGraph;

    fn sample_web() -> PageGraph {
        let mut servers = ServerGraph::new();
        servers.add_server("core", None).unwrap();
        servers.add_server("edge-1", Some("core")).unwrap();
        servers.add_server("edge-2", Some("core")).unwrap();

        let mut web = PageGraph::new(servers);
        web.add_page("index", "core").unwrap();
        web.add_page("about", "edge-1").unwrap();
        web.add_link("index", "about").unwrap();
        web
    }

    #[test]
    fn test_snapshot_counts_match_graph() {
        let web = sample_web();
        let data = build_graph_data(&web);

        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.edges.len(), 2);
        assert_eq!(data.pages.len(), 2);
        assert_eq!(data.summary.server_count, 3);
        assert_eq!(data.summary.connection_count, 2);
        assert_eq!(data.summary.page_count, 2);
        assert_eq!(data.summary.link_count, 1);
    }

    #[test]
    fn test_snapshot_nodes_keep_index_order() {
        let web = sample_web();
        let data = build_graph_data(&web);

        let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["core", "edge-1", "edge-2"]);
        assert_eq!(data.nodes[0].index, 0);
        assert_eq!(data.nodes[0].hosted_pages, ["index"]);
    }

    #[test]
    fn test_snapshot_edges_listed_once() {
        let web = sample_web();
        let data = build_graph_data(&web);

        assert!(data
            .edges
            .iter()
            .any(|e| e.source == "core" && e.target == "edge-1"));
        assert!(!data
            .edges
            .iter()
            .any(|e| e.source == "edge-1" && e.target == "core"));
    }

    #[test]
    fn test_snapshot_reports_critical_servers() {
        let web = sample_web();
        let data = build_graph_data(&web);
        assert_eq!(data.summary.critical_servers, ["core"]);
    }

    #[test]
    fn test_json_serialization() {
        let web = sample_web();
        let json = to_json(&web).unwrap();

        assert!(json.contains("\"nodes\""));
        assert!(json.contains("\"critical_servers\""));
        assert!(json.contains("\"index\""));
    }
}
