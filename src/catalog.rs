//! Built-in example graphs, keyed by algorithm and example id.

use log::warn;

use crate::graph::{Edge, GraphModel, Node};
use crate::trace::ElementSequence;

/// Static description of one example graph.
pub struct ExampleEntry {
	pub id: &'static str,
	pub name: &'static str,
	pub description: &'static str,
	pub nodes: &'static [&'static str],
	/// `(id, source, target, weight)`
	pub edges: &'static [(&'static str, &'static str, &'static str, Option<f64>)],
	pub start_node: &'static str,
	/// Edge ids of the canned traversal.
	pub default_path: &'static [&'static str],
}

/// A catalog entry materialised as a graph.
#[derive(Clone, Debug)]
pub struct Example {
	pub algorithm: &'static str,
	pub id: &'static str,
	pub name: &'static str,
	pub description: &'static str,
	pub graph: GraphModel,
	pub start_node: String,
	pub default_path: Vec<String>,
}

impl Example {
	pub fn default_sequence(&self) -> ElementSequence {
		ElementSequence::from_edge_path(&self.default_path, &self.graph)
	}
}

const DAG_EDGES: &[(&str, &str, &str, Option<f64>)] = &[
	("01", "0", "1", None),
	("02", "0", "2", None),
	("13", "1", "3", None),
	("14", "1", "4", None),
	("25", "2", "5", None),
	("26", "2", "6", None),
	("47", "4", "7", None),
];

const WEIGHTED_EDGES: &[(&str, &str, &str, Option<f64>)] = &[
	("AB", "A", "B", Some(4.0)),
	("AC", "A", "C", Some(2.0)),
	("BC", "B", "C", Some(1.0)),
	("BD", "B", "D", Some(5.0)),
	("CD", "C", "D", Some(8.0)),
	("CE", "C", "E", Some(10.0)),
	("DE", "D", "E", Some(2.0)),
];

const CATALOG: &[(&str, &[ExampleEntry])] = &[
	(
		"dfs",
		&[
			ExampleEntry {
				id: "simple",
				name: "Simple DFS Graph",
				description: "Basic graph for DFS demonstration",
				nodes: &["0", "1", "2", "3", "4", "5", "6", "7"],
				edges: DAG_EDGES,
				start_node: "0",
				default_path: &["01", "13", "14", "47", "02", "25", "26"],
			},
			ExampleEntry {
				id: "complex",
				name: "Complex DFS Graph",
				description: "More complex graph with cycles",
				nodes: &["A", "B", "C", "D", "E", "F", "G"],
				edges: &[
					("AB", "A", "B", None),
					("AC", "A", "C", None),
					("BD", "B", "D", None),
					("BE", "B", "E", None),
					("CF", "C", "F", None),
					("CG", "C", "G", None),
					("DE", "D", "E", None),
					("FG", "F", "G", None),
				],
				start_node: "A",
				default_path: &["AB", "BD", "BE", "AC", "CF", "FG"],
			},
		],
	),
	(
		"bfs",
		&[ExampleEntry {
			id: "simple",
			name: "Simple BFS Graph",
			description: "Basic graph for BFS demonstration",
			nodes: &["0", "1", "2", "3", "4", "5"],
			edges: &[
				("01", "0", "1", None),
				("02", "0", "2", None),
				("13", "1", "3", None),
				("14", "1", "4", None),
				("25", "2", "5", None),
			],
			start_node: "0",
			default_path: &["01", "02", "13", "14", "25"],
		}],
	),
	(
		"dijkstra",
		&[ExampleEntry {
			id: "weighted",
			name: "Weighted Graph for Dijkstra",
			description: "Graph with weighted edges for shortest path",
			nodes: &["A", "B", "C", "D", "E"],
			edges: WEIGHTED_EDGES,
			start_node: "A",
			default_path: &["AC", "BC", "BD", "DE"],
		}],
	),
	(
		"mst",
		&[ExampleEntry {
			id: "undirected",
			name: "Undirected Graph for MST",
			description: "Undirected graph for Kruskal's and Prim's algorithms",
			nodes: &["A", "B", "C", "D", "E"],
			edges: WEIGHTED_EDGES,
			start_node: "A",
			default_path: &["BC", "AC", "DE", "BD"],
		}],
	),
	(
		"topological",
		&[ExampleEntry {
			id: "dag",
			name: "Directed Acyclic Graph",
			description: "DAG for topological sorting",
			nodes: &["A", "B", "C", "D", "E", "F"],
			edges: &[
				("AB", "A", "B", None),
				("AC", "A", "C", None),
				("BD", "B", "D", None),
				("CD", "C", "D", None),
				("DE", "D", "E", None),
				("DF", "D", "F", None),
			],
			start_node: "A",
			default_path: &["AB", "AC", "BD", "CD", "DE", "DF"],
		}],
	),
];

/// Example id tried when the requested one does not exist.
pub const FALLBACK_EXAMPLE: &str = "simple";

pub fn algorithms() -> impl Iterator<Item = &'static str> {
	CATALOG.iter().map(|(algorithm, _)| *algorithm)
}

/// Examples for `algorithm`; empty for an unknown algorithm.
pub fn examples_for(algorithm: &str) -> &'static [ExampleEntry] {
	CATALOG
		.iter()
		.find(|(id, _)| *id == algorithm)
		.map(|(_, examples)| *examples)
		.unwrap_or(&[])
}

/// Look up an example, falling back to the algorithm's `simple` entry and then
/// its first entry. `None` only for unknown algorithms or broken entries.
pub fn get(algorithm: &str, example: &str) -> Option<Example> {
	let &(algorithm, examples) = CATALOG.iter().find(|(id, _)| *id == algorithm)?;
	let entry = examples
		.iter()
		.find(|e| e.id == example)
		.or_else(|| examples.iter().find(|e| e.id == FALLBACK_EXAMPLE))
		.or_else(|| examples.first())?;
	if entry.id != example {
		warn!("no example `{example}` for {algorithm}, using `{}`", entry.id);
	}
	build(algorithm, entry)
}

/// Edge ids of the canned traversal, or nothing for an unknown pair.
pub fn default_path(algorithm: &str, example: &str) -> Vec<String> {
	examples_for(algorithm)
		.iter()
		.find(|e| e.id == example)
		.map(|e| e.default_path.iter().map(|s| s.to_string()).collect())
		.unwrap_or_default()
}

fn build(algorithm: &'static str, entry: &'static ExampleEntry) -> Option<Example> {
	let nodes = entry.nodes.iter().map(|id| Node::new(*id));
	let edges = entry.edges.iter().map(|(id, source, target, weight)| Edge {
		weight: *weight,
		..Edge::new(*id, *source, *target)
	});
	match GraphModel::from_parts(nodes, edges) {
		Ok(graph) => Some(Example {
			algorithm,
			id: entry.id,
			name: entry.name,
			description: entry.description,
			graph,
			start_node: entry.start_node.to_string(),
			default_path: entry.default_path.iter().map(|s| s.to_string()).collect(),
		}),
		Err(err) => {
			warn!("catalog entry {algorithm}/{} is invalid: {err}", entry.id);
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_entry_builds_and_paths_resolve() {
		for algorithm in algorithms() {
			for entry in examples_for(algorithm) {
				let example = get(algorithm, entry.id).expect("catalog entry builds");
				assert_eq!(example.id, entry.id);
				assert!(example.graph.contains_node(&example.start_node));
				for edge in &example.default_path {
					assert!(example.graph.contains_edge(edge), "{algorithm}/{}: {edge}", entry.id);
				}
			}
		}
	}

	#[test]
	fn missing_example_falls_back() {
		assert_eq!(get("dfs", "nope").map(|e| e.id), Some("simple"));
		assert_eq!(get("dijkstra", "nope").map(|e| e.id), Some("weighted"));
		assert!(get("astar", "simple").is_none());
		assert!(examples_for("astar").is_empty());
	}

	#[test]
	fn weights_are_carried() {
		let example = get("dijkstra", "weighted").unwrap();
		assert_eq!(example.graph.edge("CE").and_then(|e| e.weight), Some(10.0));
	}

	#[test]
	fn default_path_lookup() {
		assert_eq!(default_path("bfs", "simple"), ["01", "02", "13", "14", "25"]);
		assert!(default_path("bfs", "complex").is_empty());
	}
}
