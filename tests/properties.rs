use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use algo_visualizer::graph::{Edge, ElementRef, GraphModel, Node};
use algo_visualizer::playback::{PlaybackEngine, Scheduler, TickId, VisualClass, VisualState};
use algo_visualizer::trace::{ElementSequence, FlatListPolicy, RawTraceResult, normalize};
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::{Value, json};

struct NoTimer;

impl Scheduler for NoTimer {
	fn schedule(&mut self, _tick: TickId, _delay: Duration) -> bool {
		true
	}

	fn cancel(&mut self, _tick: TickId) {}
}

/// `n0..n{count}` with edges `e0, e1, ...` between arbitrary pairs. Self-loops
/// and repeated pairs are dropped the same way an edit would drop them.
fn build_graph(count: usize, pairs: Vec<(usize, usize, Option<u16>)>) -> GraphModel {
	let mut graph = GraphModel::from_parts((0..count).map(|i| Node::new(format!("n{i}"))), []).unwrap();
	for (k, (source, target, weight)) in pairs.into_iter().enumerate() {
		let _ = graph.insert_edge(Edge {
			weight: weight.map(|w| f64::from(w) / 4.0),
			..Edge::new(format!("e{k}"), format!("n{source}"), format!("n{target}"))
		});
	}
	graph
}

fn graph_strategy() -> impl Strategy<Value = GraphModel> {
	(1usize..8).prop_flat_map(|count| {
		prop::collection::vec((0..count, 0..count, prop::option::of(0u16..400)), 0..16)
			.prop_map(move |pairs| build_graph(count, pairs))
	})
}

/// Edge ids drawn from the graph, with the odd id the graph does not have.
fn edge_path_strategy() -> impl Strategy<Value = (GraphModel, Vec<String>)> {
	graph_strategy().prop_flat_map(|graph| {
		let edges: Vec<String> = graph.edges().iter().map(|e| e.id.clone()).collect();
		prop::collection::vec(prop::option::weighted(0.9, any::<Index>()), 0..24).prop_map(move |picks| {
			let path = picks
				.into_iter()
				.map(|pick| match pick {
					Some(idx) if !edges.is_empty() => edges[idx.index(edges.len())].clone(),
					_ => "missing".to_string(),
				})
				.collect();
			(graph.clone(), path)
		})
	})
}

fn node_pick(graph: &GraphModel, idx: &Index) -> String {
	graph.nodes()[idx.index(graph.nodes().len())].id.clone()
}

/// A step record in the interpreter's wire form, over nodes and edges of `graph`.
fn step_value(
	graph: &GraphModel,
	number: usize,
	(current, visited, frontier, edge, queue): (Index, Vec<Index>, Vec<Index>, Option<Index>, bool),
) -> Value {
	let edge = edge.and_then(|idx| {
		let edges = graph.edges();
		(!edges.is_empty()).then(|| edges[idx.index(edges.len())].id.clone())
	});
	json!({
		"step": number,
		"algorithm": if queue { "bfs" } else { "dfs" },
		"action": "visit",
		"current_node": node_pick(graph, &current),
		"visited_after": visited.iter().map(|idx| node_pick(graph, idx)).collect::<Vec<_>>(),
		"frontier_after": frontier.iter().map(|idx| node_pick(graph, idx)).collect::<Vec<_>>(),
		"edge": edge,
	})
}

fn step_trace_strategy() -> impl Strategy<Value = (GraphModel, Value)> {
	let step = (
		any::<Index>(),
		prop::collection::vec(any::<Index>(), 0..5),
		prop::collection::vec(any::<Index>(), 0..4),
		prop::option::of(any::<Index>()),
		any::<bool>(),
	);
	(graph_strategy(), prop::collection::vec(step, 1..12)).prop_map(|(graph, steps)| {
		let steps: Vec<Value> = steps
			.into_iter()
			.enumerate()
			.map(|(i, step)| step_value(&graph, i + 1, step))
			.collect();
		(graph, json!({ "steps": steps }))
	})
}

/// Every class's members, in a comparable form.
fn classes(visual: &VisualState) -> Vec<Vec<ElementRef>> {
	VisualClass::ALL
		.iter()
		.map(|class| visual.with_class(*class).into_iter().cloned().collect())
		.collect()
}

fn node_ids(graph: &GraphModel) -> BTreeSet<String> {
	graph.nodes().iter().map(|n| n.id.clone()).collect()
}

fn edge_set(graph: &GraphModel) -> BTreeSet<(String, String, String, Option<String>)> {
	graph
		.edges()
		.iter()
		.map(|e| (e.id.clone(), e.source.clone(), e.target.clone(), e.weight.map(|w| w.to_string())))
		.collect()
}

proptest! {
	#[test]
	fn edge_paths_interleave_each_element_once((graph, path) in edge_path_strategy()) {
		let seq = ElementSequence::from_edge_path(&path, &graph);
		let items = seq.items();
		let position = |element: &ElementRef| items.iter().position(|item| item == element);

		let unique: HashSet<&ElementRef> = items.iter().collect();
		prop_assert_eq!(unique.len(), items.len());

		let mut expected = HashSet::new();
		let mut edge_order = Vec::new();
		for id in &path {
			let Some(edge) = graph.edge(id) else {
				prop_assert!(position(&ElementRef::edge(id.clone())).is_none());
				continue;
			};
			let at = position(&ElementRef::edge(id.clone()));
			prop_assert!(at.is_some());
			let at = at.unwrap_or_default();
			let source = position(&ElementRef::node(edge.source.clone()));
			let target = position(&ElementRef::node(edge.target.clone()));
			prop_assert!(source.is_some_and(|source| source < at));
			prop_assert!(target.is_some_and(|target| target < at || target == at + 1));

			if expected.insert(ElementRef::edge(id.clone())) {
				edge_order.push(at);
			}
			expected.insert(ElementRef::node(edge.source.clone()));
			expected.insert(ElementRef::node(edge.target.clone()));
		}
		prop_assert_eq!(unique, expected.iter().collect::<HashSet<_>>());
		prop_assert!(edge_order.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[test]
	fn stepping_back_retraces_every_forward_state((graph, trace) in step_trace_strategy(), pick in any::<Index>()) {
		let raw = RawTraceResult::from_value(&trace, FlatListPolicy::default()).unwrap();
		let mut engine = PlaybackEngine::new(VisualState::for_graph(&graph), NoTimer);
		engine.load(normalize(&raw, &graph));
		let forward = pick.index(engine.len() + 1);

		let mut seen = vec![classes(engine.adapter())];
		for _ in 0..forward {
			prop_assert!(engine.step_forward());
			seen.push(classes(engine.adapter()));
		}
		while let Some(expected) = seen.pop() {
			prop_assert_eq!(&classes(engine.adapter()), &expected);
			if !seen.is_empty() {
				prop_assert!(engine.step_backward());
			}
		}
		prop_assert_eq!(engine.cursor(), 0);
		prop_assert!(engine.adapter().is_clear());
	}

	#[test]
	fn saved_graphs_load_back_regardless_of_entry_order(graph in graph_strategy()) {
		let text = graph.to_json_pretty().unwrap();
		let loaded = GraphModel::from_json(&text).unwrap();
		prop_assert_eq!(node_ids(&loaded), node_ids(&graph));
		prop_assert_eq!(edge_set(&loaded), edge_set(&graph));

		let mut document: Value = serde_json::from_str(&text).unwrap();
		for key in ["nodes", "edges"] {
			if let Some(entries) = document[key].as_array_mut() {
				entries.reverse();
			}
		}
		let reordered = GraphModel::from_json(&document.to_string()).unwrap();
		prop_assert_eq!(node_ids(&reordered), node_ids(&graph));
		prop_assert_eq!(edge_set(&reordered), edge_set(&graph));
	}
}
