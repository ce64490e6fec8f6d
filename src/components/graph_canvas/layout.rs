use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;

use crate::graph::GraphModel;

const LEVEL_GAP: f64 = 90.0;
const SIBLING_GAP: f64 = 70.0;

/// Node placement strategy. Purely cosmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
	/// Breadth-first levels from the start node.
	#[default]
	Tree,
	Force,
	Circle,
}

impl Layout {
	pub const ALL: [Layout; 3] = [Layout::Tree, Layout::Force, Layout::Circle];

	pub fn label(self) -> &'static str {
		match self {
			Layout::Tree => "Tree",
			Layout::Force => "Force",
			Layout::Circle => "Circle",
		}
	}

	pub fn from_label(label: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|l| l.label() == label)
	}

	/// Whether the force simulation moves nodes under this layout.
	pub fn is_simulated(self) -> bool {
		self == Layout::Force
	}
}

/// World-space positions, centred on the origin.
pub fn arrange(layout: Layout, model: &GraphModel, start: Option<&str>) -> HashMap<String, (f64, f64)> {
	match layout {
		Layout::Tree => tree(model, start),
		Layout::Force => circle(model, 100.0),
		Layout::Circle => circle(model, (model.nodes().len() as f64 * 18.0).max(120.0)),
	}
}

fn circle(model: &GraphModel, radius: f64) -> HashMap<String, (f64, f64)> {
	let n = model.nodes().len().max(1) as f64;
	model
		.nodes()
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let angle = (i as f64) * 2.0 * PI / n - PI / 2.0;
			(node.id.clone(), (radius * angle.cos(), radius * angle.sin()))
		})
		.collect()
}

/// Directed breadth-first levels. Nodes unreachable from the start seed
/// further roots in insertion order.
fn tree(model: &GraphModel, start: Option<&str>) -> HashMap<String, (f64, f64)> {
	let mut levels: Vec<Vec<&str>> = Vec::new();
	let mut seen: HashSet<&str> = HashSet::new();
	let roots = start
		.filter(|s| model.contains_node(s))
		.into_iter()
		.chain(model.nodes().iter().map(|n| n.id.as_str()));

	for root in roots {
		if !seen.insert(root) {
			continue;
		}
		let mut queue = VecDeque::from([(root, 0usize)]);
		while let Some((node, depth)) = queue.pop_front() {
			if levels.len() <= depth {
				levels.resize_with(depth + 1, Vec::new);
			}
			levels[depth].push(node);
			for edge in model.edges().iter().filter(|e| e.source == node) {
				if seen.insert(edge.target.as_str()) {
					queue.push_back((edge.target.as_str(), depth + 1));
				}
			}
		}
	}

	let top = -(levels.len().saturating_sub(1) as f64) * LEVEL_GAP / 2.0;
	let mut positions = HashMap::new();
	for (depth, row) in levels.iter().enumerate() {
		let left = -(row.len().saturating_sub(1) as f64) * SIBLING_GAP / 2.0;
		for (i, node) in row.iter().enumerate() {
			positions.insert(
				node.to_string(),
				(left + i as f64 * SIBLING_GAP, top + depth as f64 * LEVEL_GAP),
			);
		}
	}
	positions
}
