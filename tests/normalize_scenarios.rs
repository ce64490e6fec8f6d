use algo_visualizer::catalog;
use algo_visualizer::graph::{Edge, GraphModel, Node};
use algo_visualizer::trace::{FlatListPolicy, FrontierKind, Playback, RawTraceResult, normalize};
use serde_json::json;

fn dag() -> GraphModel {
	catalog::get("dfs", "simple").unwrap().graph
}

fn labels(playback: &Playback) -> Vec<String> {
	match playback {
		Playback::Elements(seq) => seq.items().iter().map(ToString::to_string).collect(),
		Playback::Steps(_) => panic!("expected an element sequence"),
	}
}

fn playback_of(value: serde_json::Value, graph: &GraphModel) -> Playback {
	let raw = RawTraceResult::from_value(&value, FlatListPolicy::default()).unwrap();
	normalize(&raw, graph)
}

#[test]
fn edge_path_interleaves_endpoints() {
	let playback = playback_of(json!(["01", "13", "14", "47"]), &dag());
	assert_eq!(
		labels(&playback),
		[
			"0(node)", "01(edge)", "1(node)", "13(edge)", "3(node)", "14(edge)", "4(node)", "47(edge)",
			"7(node)"
		]
	);
}

#[test]
fn node_path_matches_edge_path() {
	let graph = dag();
	let from_nodes = playback_of(json!({"node_path": ["0", "1", "3"]}), &graph);
	let from_edges = playback_of(json!({"edge_path": ["01", "13"]}), &graph);
	assert_eq!(labels(&from_nodes), labels(&from_edges));
	assert_eq!(from_nodes.len(), 5);
}

#[test]
fn node_path_without_connecting_edge() {
	let graph = GraphModel::from_parts(["0", "9"].map(Node::new), []).unwrap();
	let playback = playback_of(json!(["0", "9"]), &graph);
	assert_eq!(labels(&playback), ["0(node)", "9(node)"]);
}

#[test]
fn numeric_ids_from_python_are_accepted() {
	let playback = playback_of(json!({"node_path": [0, 1, 3]}), &dag());
	assert_eq!(playback.len(), 5);
}

#[test]
fn bare_numeric_list_is_a_node_path() {
	let graph = GraphModel::from_parts(
		["10", "11", "12"].map(Node::new),
		[Edge::new("e1", "10", "11"), Edge::new("e2", "11", "12")],
	)
	.unwrap();
	let playback = playback_of(json!([10, 11, 12]), &graph);
	assert_eq!(playback.len(), 5);
	assert_eq!(
		labels(&playback),
		["10(node)", "e1(edge)", "11(node)", "e2(edge)", "12(node)"]
	);
}

#[test]
fn edge_ids_are_not_parsed_for_endpoints() {
	let graph = GraphModel::from_parts(
		["a", "b"].map(Node::new),
		[Edge::new("xy", "a", "b")],
	)
	.unwrap();
	let playback = playback_of(json!(["xy"]), &graph);
	assert_eq!(labels(&playback), ["a(node)", "xy(edge)", "b(node)"]);
}

#[test]
fn step_record_keeps_frontier_and_edge() {
	let value = json!([{
		"step": 1,
		"algorithm": "DFS",
		"action": "visit",
		"current_node": "2",
		"visited_after": ["0", "1", "2"],
		"stack_after": [["5", "2"], ["6", "2"]],
		"edge_added": "02"
	}]);
	let Playback::Steps(steps) = playback_of(value, &dag()) else {
		panic!("expected steps");
	};
	let step = steps.get(0).unwrap();
	assert_eq!(step.frontier_kind, FrontierKind::Stack);
	assert_eq!(step.frontier_after.len(), 2);
	assert_eq!(step.frontier_after[0].parent.as_deref(), Some("2"));
	assert_eq!(step.edge.as_deref(), Some("02"));
}

#[test]
fn explicit_policy_overrides_length_heuristic() {
	let graph = GraphModel::from_parts(
		["ab", "cd"].map(Node::new),
		[Edge::new("ab-cd", "ab", "cd")],
	)
	.unwrap();
	let raw = RawTraceResult::from_value(&json!(["ab", "cd"]), FlatListPolicy::NodeIds).unwrap();
	assert_eq!(
		labels(&normalize(&raw, &graph)),
		["ab(node)", "ab-cd(edge)", "cd(node)"]
	);
}

#[test]
fn unknown_shapes_are_errors_not_panics() {
	for value in [json!(42), json!({"result": true}), json!([{"x": 1}])] {
		assert!(RawTraceResult::from_value(&value, FlatListPolicy::default()).is_err());
	}
}
