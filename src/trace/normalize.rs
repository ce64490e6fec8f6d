use std::collections::{BTreeSet, HashSet};

use log::warn;

use super::raw::{RawTraceResult, Step};
use crate::graph::{ElementRef, GraphModel};

/// Reveal order for path playback. Every element appears at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSequence {
	items: Vec<ElementRef>,
	/// Indices whose reveal comes right after the walk jumped back to a node
	/// it had already visited.
	backtracks: BTreeSet<usize>,
}

impl ElementSequence {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn items(&self) -> &[ElementRef] {
		&self.items
	}

	pub fn get(&self, index: usize) -> Option<&ElementRef> {
		self.items.get(index)
	}

	pub fn follows_backtrack(&self, index: usize) -> bool {
		self.backtracks.contains(&index)
	}

	pub fn backtrack_count(&self) -> usize {
		self.backtracks.len()
	}

	/// Interleave each edge with its endpoints: source, edge, target.
	/// Edge ids missing from `graph` are skipped.
	pub fn from_edge_path(path: &[String], graph: &GraphModel) -> Self {
		let mut builder = SequenceBuilder::default();
		for id in path {
			let Some(edge) = graph.edge(id) else {
				warn!("edge `{id}` from trace is not in the graph, skipping");
				continue;
			};
			builder.push(ElementRef::node(edge.source.clone()));
			builder.push(ElementRef::edge(edge.id.clone()));
			builder.push(ElementRef::node(edge.target.clone()));
		}
		builder.finish()
	}

	/// Each node in order, followed by the edge to the next node when the graph
	/// has one. A missing edge just leaves a gap.
	pub fn from_node_path(path: &[String], graph: &GraphModel) -> Self {
		let mut builder = SequenceBuilder::default();
		let mut seen_nodes = HashSet::new();
		for (i, node) in path.iter().enumerate() {
			if !seen_nodes.insert(node.as_str()) {
				builder.mark_backtrack();
			}
			builder.push(ElementRef::node(node.clone()));
			if let Some(next) = path.get(i + 1)
				&& let Some(edge) = graph.edge_between(node, next)
			{
				builder.push(ElementRef::edge(edge.id.clone()));
			}
		}
		builder.finish()
	}
}

#[derive(Default)]
struct SequenceBuilder {
	seq: ElementSequence,
	emitted: HashSet<ElementRef>,
	backtrack_pending: bool,
}

impl SequenceBuilder {
	fn push(&mut self, element: ElementRef) {
		if !self.emitted.insert(element.clone()) {
			return;
		}
		if std::mem::take(&mut self.backtrack_pending) {
			self.seq.backtracks.insert(self.seq.items.len());
		}
		self.seq.items.push(element);
	}

	fn mark_backtrack(&mut self) {
		self.backtrack_pending = true;
	}

	fn finish(self) -> ElementSequence {
		self.seq
	}
}

/// Step snapshots in execution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepSequence {
	steps: Vec<Step>,
}

impl StepSequence {
	pub fn new(steps: Vec<Step>) -> Self {
		Self { steps }
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	pub fn get(&self, index: usize) -> Option<&Step> {
		self.steps.get(index)
	}
}

/// The sequence a playback engine animates.
#[derive(Clone, Debug, PartialEq)]
pub enum Playback {
	Elements(ElementSequence),
	Steps(StepSequence),
}

impl Default for Playback {
	fn default() -> Self {
		Playback::empty()
	}
}

impl Playback {
	pub fn empty() -> Self {
		Playback::Elements(ElementSequence::default())
	}

	pub fn len(&self) -> usize {
		match self {
			Playback::Elements(seq) => seq.len(),
			Playback::Steps(seq) => seq.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Extra one-step waits owed to backtracks; step traces have none.
	pub fn backtrack_count(&self) -> usize {
		match self {
			Playback::Elements(seq) => seq.backtrack_count(),
			Playback::Steps(_) => 0,
		}
	}

	pub fn follows_backtrack(&self, index: usize) -> bool {
		match self {
			Playback::Elements(seq) => seq.follows_backtrack(index),
			Playback::Steps(_) => false,
		}
	}
}

impl From<ElementSequence> for Playback {
	fn from(seq: ElementSequence) -> Self {
		Playback::Elements(seq)
	}
}

/// Convert a classified result into a playable sequence. Never fails: lookups
/// that miss are dropped from the output.
pub fn normalize(raw: &RawTraceResult, graph: &GraphModel) -> Playback {
	match raw {
		RawTraceResult::StepTrace(steps) => Playback::Steps(StepSequence::new(steps.clone())),
		RawTraceResult::EdgePath(path) => ElementSequence::from_edge_path(path, graph).into(),
		RawTraceResult::NodePath(path) => ElementSequence::from_node_path(path, graph).into(),
	}
}
