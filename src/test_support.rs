use crate::graph::{BaseGraph, GraphBuilder, VertexWeightedGraph, Weight, WeightedGraph};
use crate::tree_decomposition::TreeDecomposition;
use fxhash::FxHashSet;
use rand::prelude::{SliceRandom, StdRng};
use rand::Rng;

pub fn graph(edges: &[(&str, &str)], weights: &[(&str, Weight)]) -> VertexWeightedGraph {
    let mut builder = GraphBuilder::new();
    for (a, b) in edges {
        builder.add_edge(a, b);
    }
    for (v, w) in weights {
        builder.set_weight(v, *w);
    }
    builder.build()
}

/// Bags are given as `;`-separated vertex names.
pub fn decomposition(
    graph: &VertexWeightedGraph,
    bags: &[(&str, &str)],
    edges: &[(&str, &str)],
) -> TreeDecomposition {
    let mut td = TreeDecomposition::new();
    for (name, bag) in bags {
        let id = td.add_node(name);
        td.set_bag(
            id,
            bag.split(';')
                .filter(|v| !v.is_empty())
                .map(|v| graph.id(v).unwrap()),
        );
    }
    for (a, b) in edges {
        let a = td.add_node(a);
        let b = td.add_node(b);
        td.add_edge(a, b);
    }
    td
}

pub fn cycle_graph() -> VertexWeightedGraph {
    graph(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")], &[])
}

/// Width 2 path decomposition of the 4-cycle. Optimum 2.
pub fn cycle_path_decomposition() -> (VertexWeightedGraph, TreeDecomposition) {
    let graph = cycle_graph();
    let td = decomposition(
        &graph,
        &[("N1", "a;b;d"), ("N2", "b;c;d"), ("N3", "c;d"), ("N4", "c")],
        &[("N1", "N2"), ("N2", "N3"), ("N3", "N4")],
    );
    (graph, td)
}

fn house_graph() -> VertexWeightedGraph {
    graph(
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "d"),
            ("d", "a"),
            ("a", "e"),
            ("b", "e"),
        ],
        &[("a", 20), ("b", 20), ("c", 30), ("d", 30), ("e", 50)],
    )
}

/// Optimum 70.
pub fn house() -> (VertexWeightedGraph, TreeDecomposition) {
    let graph = house_graph();
    let td = decomposition(
        &graph,
        &[("N1", "a;b;c"), ("N2", "a;c;d"), ("N3", "a;b;e")],
        &[("N1", "N2"), ("N1", "N3")],
    );
    (graph, td)
}

/// Same as [`house`] with `N4` repeating the bag of `N1` in between.
pub fn house_with_duplicate() -> (VertexWeightedGraph, TreeDecomposition) {
    let graph = house_graph();
    let td = decomposition(
        &graph,
        &[
            ("N1", "a;b;c"),
            ("N2", "a;c;d"),
            ("N3", "a;b;e"),
            ("N4", "a;b;c"),
        ],
        &[("N1", "N4"), ("N4", "N2"), ("N4", "N3")],
    );
    (graph, td)
}

/// K4 on `a, b, c, d` where the first `pendants` vertices get a pendant
/// neighbour `p<x>`. Optimum 3 for up to three pendants, 4 for four.
pub fn k4_with_pendants(pendants: usize) -> (VertexWeightedGraph, TreeDecomposition) {
    let core = ["a", "b", "c", "d"];
    let pendant_names: Vec<String> = core.iter().map(|v| format!("p{}", v)).collect();
    let mut edges = Vec::new();
    for (i, u) in core.iter().enumerate() {
        for v in core.iter().skip(i + 1) {
            edges.push((*u, *v));
        }
    }
    for (v, p) in core.iter().zip(pendant_names.iter()).take(pendants) {
        edges.push((*v, p.as_str()));
    }
    let graph = graph(&edges, &[]);

    let node_names: Vec<String> = (0..pendants).map(|i| format!("N{}", i + 2)).collect();
    let pendant_bags: Vec<String> = core
        .iter()
        .zip(pendant_names.iter())
        .take(pendants)
        .map(|(v, p)| format!("{};{}", v, p))
        .collect();
    let mut bags = vec![("N1", "a;b;c;d")];
    let mut tree_edges = Vec::new();
    for (name, bag) in node_names.iter().zip(pendant_bags.iter()) {
        bags.push((name.as_str(), bag.as_str()));
        tree_edges.push(("N1", name.as_str()));
    }
    let td = decomposition(&graph, &bags, &tree_edges);
    (graph, td)
}

/// Two triangles joined through `c-d` and `c-e`, covered by a path of three
/// bags. Optimum 9.
pub fn sigma() -> (VertexWeightedGraph, TreeDecomposition) {
    let graph = graph(
        &[
            ("a", "b"),
            ("b", "c"),
            ("a", "c"),
            ("c", "d"),
            ("d", "e"),
            ("c", "e"),
            ("e", "f"),
            ("d", "f"),
        ],
        &[("a", 3), ("b", 2), ("c", 2), ("d", 3), ("e", 4), ("f", 2)],
    );
    let td = decomposition(
        &graph,
        &[("N1", "a;b;c"), ("N2", "c;d;e"), ("N3", "d;e;f")],
        &[("N1", "N2"), ("N2", "N3")],
    );
    (graph, td)
}

/// Weighted 6-cycle with a fan decomposition around `a`. Optimum 90 with
/// cover `a, c, e`.
pub fn hexagon() -> (VertexWeightedGraph, TreeDecomposition) {
    let graph = graph(
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("e", "f"),
            ("f", "a"),
        ],
        &[
            ("a", 10),
            ("b", 20),
            ("c", 30),
            ("d", 40),
            ("e", 50),
            ("f", 60),
        ],
    );
    let td = decomposition(
        &graph,
        &[
            ("N1", "a;b;c"),
            ("N2", "a;c;d"),
            ("N3", "a;d;e"),
            ("N4", "a;e;f"),
        ],
        &[("N1", "N2"), ("N2", "N3"), ("N3", "N4")],
    );
    (graph, td)
}

/// Minimum weight of a vertex cover by exhaustive search.
pub fn brute_force_cover_weight<G: WeightedGraph>(graph: &G) -> Weight {
    let n = graph.order();
    assert!(n <= 20);
    let edges: Vec<(usize, usize)> = graph.edges().collect();
    (0..1u64 << n)
        .filter(|mask| {
            edges
                .iter()
                .all(|(u, v)| mask & (1u64 << u) != 0 || mask & (1u64 << v) != 0)
        })
        .map(|mask| {
            graph
                .vertices()
                .filter(|v| mask & (1u64 << v) != 0)
                .map(|v| graph.weight(v))
                .sum::<Weight>()
        })
        .min()
        .unwrap_or(0)
}

/// Random weighted graph on `n` vertices together with the decomposition
/// derived from a random elimination order.
pub fn random_instance(
    rng: &mut StdRng,
    n: usize,
    edge_probability: f64,
) -> (VertexWeightedGraph, TreeDecomposition) {
    let mut builder = GraphBuilder::new();
    let names: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
    for name in &names {
        builder.set_weight(name, rng.gen_range(1..=10));
    }
    for (i, u) in names.iter().enumerate() {
        for v in names.iter().skip(i + 1) {
            if rng.gen_bool(edge_probability) {
                builder.add_edge(u, v);
            }
        }
    }
    let graph = builder.build();

    let mut order: Vec<usize> = graph.vertices().collect();
    order.shuffle(rng);
    let mut position = vec![0; n];
    for (i, v) in order.iter().enumerate() {
        position[*v] = i;
    }

    let mut fill: Vec<FxHashSet<usize>> = graph
        .vertices()
        .map(|v| graph.neighborhood(v).collect())
        .collect();
    let mut td = TreeDecomposition::new();
    let mut parents = Vec::with_capacity(n);
    for (i, v) in order.iter().copied().enumerate() {
        let later: Vec<usize> = fill[v]
            .iter()
            .copied()
            .filter(|u| position[*u] > i)
            .collect();
        for x in &later {
            for y in &later {
                if x != y {
                    fill[*x].insert(*y);
                }
            }
        }
        let id = td.add_node(&format!("N{}", i));
        td.set_bag(id, later.iter().copied().chain(std::iter::once(v)));
        let parent = later.iter().map(|u| position[*u]).min();
        parents.push(match parent {
            Some(p) => Some(p),
            None if i + 1 < n => Some(i + 1),
            None => None,
        });
    }
    for (i, parent) in parents.into_iter().enumerate() {
        if let Some(p) = parent {
            td.add_edge(i, p);
        }
    }
    (graph, td)
}
