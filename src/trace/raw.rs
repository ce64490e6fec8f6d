use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TraceError;

/// What an algorithm run handed back, before it is turned into something playable.
#[derive(Clone, Debug, PartialEq)]
pub enum RawTraceResult {
	/// Edge ids in traversal order.
	EdgePath(Vec<String>),
	/// Node ids in visit order; edges are recovered from consecutive pairs.
	NodePath(Vec<String>),
	/// Full execution snapshots, one per step.
	StepTrace(Vec<Step>),
}

/// How an untagged flat list of strings is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlatListPolicy {
	/// Edge ids if every entry has exactly `edge_id_len` characters, node ids otherwise.
	Auto { edge_id_len: usize },
	EdgeIds,
	NodeIds,
}

impl Default for FlatListPolicy {
	fn default() -> Self {
		FlatListPolicy::Auto { edge_id_len: 2 }
	}
}

impl FlatListPolicy {
	pub fn is_edge_list(&self, items: &[String]) -> bool {
		match self {
			FlatListPolicy::Auto { edge_id_len } => {
				!items.is_empty() && items.iter().all(|s| s.chars().count() == *edge_id_len)
			}
			FlatListPolicy::EdgeIds => true,
			FlatListPolicy::NodeIds => false,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
	Pop,
	Dequeue,
	Visit,
	SkipVisited,
	#[serde(other)]
	Other,
}

/// Whether the pending-node collection is LIFO or FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierKind {
	Stack,
	Queue,
}

impl FrontierKind {
	/// Breadth-first traversals queue, everything else stacks.
	pub fn for_algorithm(algorithm: &str) -> Self {
		if algorithm.eq_ignore_ascii_case("bfs") {
			FrontierKind::Queue
		} else {
			FrontierKind::Stack
		}
	}
}

/// One frontier slot: a node, optionally with the node that discovered it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "FrontierRepr")]
pub struct FrontierEntry {
	pub node: String,
	pub parent: Option<String>,
}

/// One execution snapshot of a traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
	/// 1-based, increasing.
	pub index: usize,
	pub algorithm: String,
	pub action: StepAction,
	pub current: String,
	pub parent: Option<String>,
	pub frontier_kind: FrontierKind,
	pub frontier_before: Vec<FrontierEntry>,
	pub frontier_after: Vec<FrontierEntry>,
	/// Insertion order, not sorted.
	pub visited_before: Vec<String>,
	pub visited_after: Vec<String>,
	/// Edge newly traversed by this step.
	pub edge: Option<String>,
}

/// Node ids arrive as strings or as bare numbers from the interpreter.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum IdRepr {
	Text(String),
	Number(serde_json::Number),
}

impl From<IdRepr> for String {
	fn from(id: IdRepr) -> Self {
		match id {
			IdRepr::Text(s) => s,
			IdRepr::Number(n) => n.to_string(),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrontierRepr {
	Pair((IdRepr, Option<IdRepr>)),
	Single(IdRepr),
}

impl From<FrontierRepr> for FrontierEntry {
	fn from(repr: FrontierRepr) -> Self {
		match repr {
			FrontierRepr::Pair((node, parent)) => FrontierEntry {
				node: node.into(),
				parent: parent.map(String::from),
			},
			FrontierRepr::Single(node) => FrontierEntry {
				node: node.into(),
				parent: None,
			},
		}
	}
}

/// Step record as produced by the traversal code.
#[derive(Deserialize)]
struct WireStep {
	step: usize,
	#[serde(default, alias = "algo")]
	algorithm: Option<String>,
	action: StepAction,
	current_node: IdRepr,
	#[serde(default, alias = "parent_node")]
	parent: Option<IdRepr>,
	#[serde(default)]
	frontier_kind: Option<FrontierKind>,
	#[serde(default)]
	frontier_before: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	frontier_after: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	stack_before: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	stack_after: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	queue_before: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	queue_after: Option<Vec<FrontierEntry>>,
	#[serde(default)]
	visited_before: Vec<IdRepr>,
	#[serde(default)]
	visited_after: Vec<IdRepr>,
	#[serde(default, alias = "edge")]
	edge_added: Option<IdRepr>,
}

impl From<WireStep> for Step {
	fn from(wire: WireStep) -> Self {
		let algorithm = wire.algorithm.unwrap_or_default();
		let frontier_kind = wire
			.frontier_kind
			.or_else(|| {
				if wire.stack_after.is_some() || wire.stack_before.is_some() {
					Some(FrontierKind::Stack)
				} else if wire.queue_after.is_some() || wire.queue_before.is_some() {
					Some(FrontierKind::Queue)
				} else {
					None
				}
			})
			.unwrap_or_else(|| FrontierKind::for_algorithm(&algorithm));
		let (before, after) = match frontier_kind {
			FrontierKind::Stack => (wire.stack_before, wire.stack_after),
			FrontierKind::Queue => (wire.queue_before, wire.queue_after),
		};

		Step {
			index: wire.step,
			algorithm,
			action: wire.action,
			current: wire.current_node.into(),
			parent: wire.parent.map(String::from),
			frontier_kind,
			frontier_before: wire.frontier_before.or(before).unwrap_or_default(),
			frontier_after: wire.frontier_after.or(after).unwrap_or_default(),
			visited_before: wire.visited_before.into_iter().map(String::from).collect(),
			visited_after: wire.visited_after.into_iter().map(String::from).collect(),
			edge: wire.edge_added.map(String::from),
		}
	}
}

/// Explicitly tagged payload: `{"kind": "edge_path", "edges": [...]}` and friends.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Tagged {
	EdgePath { edges: Vec<IdRepr> },
	NodePath { nodes: Vec<IdRepr> },
	StepTrace { steps: Vec<WireStep> },
}

const STEP_FIELDS: &[&str] = &["steps", "trace", "step_trace"];

impl RawTraceResult {
	/// Classify an interpreter return value.
	///
	/// A `kind` tag wins outright. Otherwise the first match of: a list of step
	/// records (bare or under `steps`/`trace`/`step_trace`), an `edge_path` field,
	/// a `node_path` field, a flat list of ids split by `policy`.
	pub fn from_value(value: &Value, policy: FlatListPolicy) -> Result<Self, TraceError> {
		if let Some(obj) = value.as_object() {
			if obj.contains_key("kind") {
				return Ok(Tagged::deserialize(value)?.into());
			}
			if let Some(steps) = STEP_FIELDS
				.iter()
				.filter_map(|key| obj.get(*key))
				.find(|v| looks_like_steps(v))
			{
				return parse_steps(steps);
			}
			if let Some(path) = obj.get("edge_path") {
				return Ok(RawTraceResult::EdgePath(parse_ids(path)?));
			}
			if let Some(path) = obj.get("node_path") {
				return Ok(RawTraceResult::NodePath(parse_ids(path)?));
			}
			return Err(TraceError::UnrecognizedShape(describe(value)));
		}

		if looks_like_steps(value) {
			return parse_steps(value);
		}
		if let Some(items) = value.as_array().filter(|items| items.iter().all(is_id)) {
			let ids: Vec<String> = items.iter().filter_map(id_text).collect();
			// numbers lose leading zeroes, so they can only be node ids
			let all_text = items.iter().all(Value::is_string);
			return Ok(if all_text && policy.is_edge_list(&ids) {
				RawTraceResult::EdgePath(ids)
			} else {
				RawTraceResult::NodePath(ids)
			});
		}
		Err(TraceError::UnrecognizedShape(describe(value)))
	}

	pub fn shape_name(&self) -> &'static str {
		match self {
			RawTraceResult::EdgePath(_) => "edge path",
			RawTraceResult::NodePath(_) => "node path",
			RawTraceResult::StepTrace(_) => "step trace",
		}
	}
}

impl From<Tagged> for RawTraceResult {
	fn from(tagged: Tagged) -> Self {
		match tagged {
			Tagged::EdgePath { edges } => {
				RawTraceResult::EdgePath(edges.into_iter().map(String::from).collect())
			}
			Tagged::NodePath { nodes } => {
				RawTraceResult::NodePath(nodes.into_iter().map(String::from).collect())
			}
			Tagged::StepTrace { steps } => {
				RawTraceResult::StepTrace(steps.into_iter().map(Step::from).collect())
			}
		}
	}
}

fn looks_like_steps(value: &Value) -> bool {
	value.as_array().is_some_and(|items| {
		!items.is_empty()
			&& items.iter().all(|item| {
				item.as_object().is_some_and(|o| {
					o.contains_key("step") && o.contains_key("action") && o.contains_key("current_node")
				})
			})
	})
}

fn parse_steps(value: &Value) -> Result<RawTraceResult, TraceError> {
	let steps = Vec::<WireStep>::deserialize(value)?;
	Ok(RawTraceResult::StepTrace(
		steps.into_iter().map(Step::from).collect(),
	))
}

fn parse_ids(value: &Value) -> Result<Vec<String>, TraceError> {
	Ok(Vec::<IdRepr>::deserialize(value)?
		.into_iter()
		.map(String::from)
		.collect())
}

fn is_id(value: &Value) -> bool {
	value.is_string() || value.is_number()
}

fn id_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

fn describe(value: &Value) -> String {
	match value {
		Value::Null => "null".into(),
		Value::Bool(_) => "a boolean".into(),
		Value::Number(_) => "a number".into(),
		Value::String(_) => "a string".into(),
		Value::Array(items) => format!("a list of {} non-id values", items.len()),
		Value::Object(obj) => {
			let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
			format!("an object with keys [{}]", keys.join(", "))
		}
	}
}
