use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use webnet::ServerGraph;

/// A ring of `clusters` hubs, each with `leaves` servers hanging off it.
/// Every hub is an articulation point, so the critical-server search has
/// real work to do.
fn ring_of_stars(clusters: usize, leaves: usize) -> ServerGraph {
    let mut graph = ServerGraph::new();
    graph.add_server("hub-0", None).unwrap();
    for c in 1..clusters {
        graph
            .add_server(&format!("hub-{c}"), Some(&format!("hub-{}", c - 1)))
            .unwrap();
    }
    graph.add_connection("hub-0", &format!("hub-{}", clusters - 1)).unwrap();

    for c in 0..clusters {
        for l in 0..leaves {
            graph
                .add_server(&format!("leaf-{c}-{l}"), Some(&format!("hub-{c}")))
                .unwrap();
        }
    }
    graph
}

fn bench_critical_servers(c: &mut Criterion) {
    let graph = ring_of_stars(50, 10);
    c.bench_function("critical_servers/550", |b| {
        b.iter(|| black_box(&graph).critical_servers())
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    let graph = ring_of_stars(50, 10);
    c.bench_function("shortest_path/opposite_leaves", |b| {
        b.iter(|| black_box(&graph).shortest_path("leaf-0-0", "leaf-25-9"))
    });
}

criterion_group!(benches, bench_critical_servers, bench_shortest_path);
criterion_main!(benches);
