use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::{LineString, Point};
use petgraph::graph::NodeIndex;

use streetnet_core::prelude::*;
use streetnet_core::{StreetEdge, StreetNode};

/// Square lattice of two-way streets around Helsinki centre
fn lattice(side: usize) -> StreetGraph {
    let mut graph = StreetGraph::new(Directedness::Directed);
    let step = 0.0009;
    for r in 0..side {
        for c in 0..side {
            let id = (r * side + c) as i64;
            let (lon, lat) = (24.9 + c as f64 * step * 2.0, 60.15 + r as f64 * step);
            graph.add_node(StreetNode::new(id, lon, lat));
        }
    }
    for r in 0..side {
        for c in 0..side {
            let here = NodeIndex::new(r * side + c);
            let mut neighbours = Vec::new();
            if c + 1 < side {
                neighbours.push(NodeIndex::new(r * side + c + 1));
            }
            if r + 1 < side {
                neighbours.push(NodeIndex::new((r + 1) * side + c));
            }
            for next in neighbours {
                let (a, b) = (graph.graph[here].geometry, graph.graph[next].geometry);
                let shape = LineString::from(vec![a.0, b.0]);
                let edge = StreetEdge::new(haversine_distance(a, b), shape);
                graph.add_street(here, next, edge, true).unwrap();
            }
        }
    }
    annotate_travel_times(&mut graph, &TravelMode::walk());
    graph
}

fn bench_single_source(c: &mut Criterion) {
    let graph = lattice(150);
    let walk = graph.impedance("walk_time").unwrap();
    let source = NodeIndex::new(75 * 150 + 75);

    c.bench_function("single_source_costs", |b| {
        b.iter(|| single_source_costs(black_box(&graph), source, walk, None).unwrap())
    });
    c.bench_function("ego_graph_15min", |b| {
        b.iter(|| ego_graph(black_box(&graph), source, 900.0, walk).unwrap())
    });
}

fn bench_nearest(c: &mut Criterion) {
    let graph = lattice(150);
    let points: Vec<_> = (0..1000)
        .map(|i| Point::new(24.9 + (i % 97) as f64 * 0.0021, 60.15 + (i % 89) as f64 * 0.0013))
        .collect();

    c.bench_function("nearest_nodes_haversine", |b| {
        b.iter(|| graph.nearest_nodes(black_box(&points), DistanceMetric::Haversine))
    });
}

criterion_group!(benches, bench_single_source, bench_nearest);
criterion_main!(benches);
