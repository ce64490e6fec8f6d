use serde::{Deserialize, Serialize};

use super::element::ElementRef;
use super::error::GraphError;

/// A vertex. Only the id matters to playback; the label is cosmetic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl Node {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: None,
		}
	}
}

/// A directed connection. The id is opaque: endpoints are always read from
/// `source`/`target`, never parsed out of the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
}

impl Edge {
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			weight: None,
		}
	}

	pub fn touches(&self, node: &str) -> bool {
		self.source == node || self.target == node
	}
}

/// Nodes and edges of one graph, in insertion order.
///
/// Every edge endpoint refers to an existing node; removing a node removes
/// its incident edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

/// On-disk shape written by "Save Graph": cytoscape-style `{ data: ... }` wrappers.
#[derive(Serialize, Deserialize)]
struct SavedGraph {
	nodes: Vec<Entry<Node>>,
	edges: Vec<Entry<Edge>>,
}

#[derive(Serialize, Deserialize)]
struct Entry<T> {
	data: T,
}

impl GraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a graph from loose parts, validating ids and endpoints.
	pub fn from_parts(
		nodes: impl IntoIterator<Item = Node>,
		edges: impl IntoIterator<Item = Edge>,
	) -> Result<Self, GraphError> {
		let mut graph = Self::new();
		for node in nodes {
			graph.insert_node(node)?;
		}
		for edge in edges {
			graph.insert_edge(edge)?;
		}
		Ok(graph)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	pub fn contains_edge(&self, id: &str) -> bool {
		self.edge(id).is_some()
	}

	/// Every node and edge as a drawable element, nodes first.
	pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
		self.nodes
			.iter()
			.map(|n| ElementRef::node(n.id.clone()))
			.chain(self.edges.iter().map(|e| ElementRef::edge(e.id.clone())))
	}

	/// First edge running from `source` to `target`, if any.
	pub fn edge_between(&self, source: &str, target: &str) -> Option<&Edge> {
		self.edges
			.iter()
			.find(|e| e.source == source && e.target == target)
	}

	/// Add a node under a freshly generated id and return that id.
	pub fn add_node(&mut self) -> String {
		let id = self.next_node_id();
		self.nodes.push(Node::new(id.clone()));
		id
	}

	pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
		if self.contains_node(&node.id) {
			return Err(GraphError::DuplicateNode(node.id));
		}
		self.nodes.push(node);
		Ok(())
	}

	/// Connect two existing nodes. The edge id is `source + target`.
	pub fn add_edge(&mut self, source: &str, target: &str) -> Result<String, GraphError> {
		let id = format!("{source}{target}");
		self.insert_edge(Edge::new(id.clone(), source, target))?;
		Ok(id)
	}

	pub fn insert_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
		if edge.source == edge.target {
			return Err(GraphError::SelfLoop(edge.source));
		}
		for endpoint in [&edge.source, &edge.target] {
			if !self.contains_node(endpoint) {
				return Err(GraphError::UnknownNode(endpoint.clone()));
			}
		}
		if self.contains_edge(&edge.id) {
			return Err(GraphError::DuplicateEdge(edge.id));
		}
		self.edges.push(edge);
		Ok(())
	}

	/// Remove a node together with every edge incident to it.
	pub fn remove_node(&mut self, id: &str) -> Option<Node> {
		let pos = self.nodes.iter().position(|n| n.id == id)?;
		self.edges.retain(|e| !e.touches(id));
		Some(self.nodes.remove(pos))
	}

	pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
		let pos = self.edges.iter().position(|e| e.id == id)?;
		Some(self.edges.remove(pos))
	}

	/// Pretty-printed JSON document written by "Save Graph".
	pub fn to_json_pretty(&self) -> Result<String, GraphError> {
		let saved = SavedGraph {
			nodes: self
				.nodes
				.iter()
				.cloned()
				.map(|data| Entry { data })
				.collect(),
			edges: self
				.edges
				.iter()
				.cloned()
				.map(|data| Entry { data })
				.collect(),
		};
		Ok(serde_json::to_string_pretty(&saved)?)
	}

	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		let saved: SavedGraph = serde_json::from_str(text)?;
		Self::from_parts(
			saved.nodes.into_iter().map(|e| e.data),
			saved.edges.into_iter().map(|e| e.data),
		)
	}

	/// Letter-keyed graphs get the next unused letter after the highest one in
	/// use; numeric graphs get `max + 1`; anything else gets `n0`, `n1`, ...
	fn next_node_id(&self) -> String {
		let letters: Option<Vec<char>> = self.nodes.iter().map(|n| single_letter(&n.id)).collect();
		if let Some(letters) = letters {
			let upper = !letters.is_empty() && letters.iter().all(char::is_ascii_uppercase);
			let alphabet = if upper { 'A'..='Z' } else { 'a'..='z' };
			let highest = letters.iter().max().copied();
			let next = alphabet
				.clone()
				.filter(|c| highest.is_none_or(|h| *c > h))
				.find(|c| !letters.contains(c))
				.or_else(|| alphabet.clone().find(|c| !letters.contains(c)));
			if let Some(c) = next {
				return c.to_string();
			}
		}

		let numbers: Option<Vec<u64>> = self.nodes.iter().map(|n| n.id.parse().ok()).collect();
		if let Some(max) = numbers.and_then(|nums| nums.into_iter().max()) {
			return (max + 1..)
				.map(|n| n.to_string())
				.find(|id| !self.contains_node(id))
				.unwrap_or_default();
		}

		(0..)
			.map(|i| format!("n{i}"))
			.find(|id| !self.contains_node(id))
			.unwrap_or_default()
	}
}

fn single_letter(id: &str) -> Option<char> {
	let mut chars = id.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) if c.is_ascii_alphabetic() => Some(c),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn letters(ids: &[&str]) -> GraphModel {
		GraphModel::from_parts(ids.iter().map(|id| Node::new(*id)), []).unwrap()
	}

	#[test]
	fn add_node_picks_next_letter() {
		let mut graph = letters(&["a", "b", "c"]);
		assert_eq!(graph.add_node(), "d");
		assert_eq!(GraphModel::new().add_node(), "a");
	}

	#[test]
	fn add_node_wraps_to_unused_gap() {
		let mut graph = letters(&["b", "z"]);
		assert_eq!(graph.add_node(), "a");
	}

	#[test]
	fn add_node_follows_case_and_numbers() {
		assert_eq!(letters(&["A", "B"]).add_node(), "C");
		assert_eq!(letters(&["0", "1", "7"]).add_node(), "8");
		assert_eq!(letters(&["start", "end"]).add_node(), "n0");
	}

	#[test]
	fn add_edge_rejects_self_loops_and_duplicates() {
		let mut graph = letters(&["a", "b"]);
		assert_eq!(graph.add_edge("a", "b").unwrap(), "ab");
		assert!(matches!(graph.add_edge("a", "b"), Err(GraphError::DuplicateEdge(id)) if id == "ab"));
		assert!(matches!(graph.add_edge("a", "a"), Err(GraphError::SelfLoop(_))));
		assert!(matches!(graph.add_edge("a", "q"), Err(GraphError::UnknownNode(id)) if id == "q"));
		assert_eq!(graph.edges().len(), 1);
	}

	#[test]
	fn remove_node_cascades_to_incident_edges() {
		let mut graph = letters(&["a", "b", "c"]);
		graph.add_edge("a", "b").unwrap();
		graph.add_edge("b", "c").unwrap();
		graph.add_edge("a", "c").unwrap();

		assert!(graph.remove_node("b").is_some());
		assert_eq!(graph.nodes().len(), 2);
		let remaining: Vec<_> = graph.edges().iter().map(|e| e.id.as_str()).collect();
		assert_eq!(remaining, ["ac"]);
		assert!(graph.remove_node("b").is_none());
	}

	#[test]
	fn remove_edge_leaves_nodes() {
		let mut graph = letters(&["a", "b"]);
		graph.add_edge("a", "b").unwrap();
		assert!(graph.remove_edge("ab").is_some());
		assert!(graph.edges().is_empty());
		assert_eq!(graph.nodes().len(), 2);
	}

	#[test]
	fn edge_lookup_does_not_parse_ids() {
		let graph = GraphModel::from_parts(
			[Node::new("10"), Node::new("2")],
			[Edge::new("e-1", "10", "2")],
		)
		.unwrap();
		assert_eq!(graph.edge_between("10", "2").map(|e| e.id.as_str()), Some("e-1"));
		assert!(graph.edge_between("1", "02").is_none());
	}

	#[test]
	fn saved_document_uses_data_wrappers() {
		let mut graph = letters(&["a", "b"]);
		graph.add_edge("a", "b").unwrap();
		let json: serde_json::Value = serde_json::from_str(&graph.to_json_pretty().unwrap()).unwrap();
		assert_eq!(json["nodes"][0]["data"]["id"], "a");
		assert_eq!(json["edges"][0]["data"]["source"], "a");
		assert_eq!(json["edges"][0]["data"]["target"], "b");
	}

	#[test]
	fn from_json_rejects_dangling_edges() {
		let text = r#"{"nodes":[{"data":{"id":"a"}}],"edges":[{"data":{"id":"ab","source":"a","target":"b"}}]}"#;
		assert!(matches!(GraphModel::from_json(text), Err(GraphError::UnknownNode(id)) if id == "b"));
	}
}
