use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::layout::{Layout, arrange};
use crate::graph::{ElementRef, GraphModel};

pub const NODE_RADIUS: f64 = 14.0;
pub const HIT_RADIUS: f64 = 18.0;
const EDGE_HIT_DISTANCE: f64 = 6.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub weight: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer leaves the click tolerance; a drag that never moves is a click.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	delay_t: f64,
}

/// Positions, camera and pointer state for one graph on the canvas.
pub struct CanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub layout: Layout,
	pub flow_time: f64,
	index: HashMap<String, DefaultNodeIdx>,
	edges: Vec<EdgeInfo>,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl CanvasState {
	pub fn new(model: &GraphModel, layout: Layout, start: Option<&str>, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			layout,
			flow_time: 0.0,
			index: HashMap::new(),
			edges: Vec::new(),
		};
		state.populate(model, &arrange(layout, model, start));
		state
	}

	/// Re-read the model after an edit. Existing nodes keep their place; new
	/// ones go where the current layout would put them.
	pub fn rebuild(&mut self, model: &GraphModel, start: Option<&str>) {
		let mut positions = arrange(self.layout, model, start);
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		self.populate(model, &positions);
	}

	/// Switch layout and re-place every node.
	pub fn apply_layout(&mut self, layout: Layout, model: &GraphModel, start: Option<&str>) {
		self.layout = layout;
		self.transform.x = self.width / 2.0;
		self.transform.y = self.height / 2.0;
		self.transform.k = 1.0;
		self.populate(model, &arrange(layout, model, start));
	}

	fn populate(&mut self, model: &GraphModel, positions: &HashMap<String, (f64, f64)>) {
		self.graph = simulation();
		self.index.clear();
		self.edges.clear();
		self.drag = DragState::default();
		self.hover = HoverState::default();
		let anchored = !self.layout.is_simulated();

		for node in model.nodes() {
			let (x, y) = positions.get(&node.id).copied().unwrap_or_default();
			let idx = self.graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: anchored,
				user_data: NodeInfo {
					id: node.id.clone(),
				},
			});
			self.index.insert(node.id.clone(), idx);
		}

		for edge in model.edges() {
			if let (Some(&src), Some(&tgt)) = (self.index.get(&edge.source), self.index.get(&edge.target)) {
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push(EdgeInfo {
					id: edge.id.clone(),
					source: src,
					target: tgt,
					weight: edge.weight,
				});
			}
		}
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<&EdgeInfo> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		self.edges.iter().find(|edge| {
			let (Some(&(x1, y1)), Some(&(x2, y2))) =
				(positions.get(&edge.source), positions.get(&edge.target))
			else {
				return false;
			};
			segment_distance(gx, gy, x1, y1, x2, y2) < EDGE_HIT_DISTANCE
		})
	}

	/// Node first, then edge, under a screen point.
	pub fn element_at_position(&self, sx: f64, sy: f64) -> Option<ElementRef> {
		if let Some(idx) = self.node_at_position(sx, sy) {
			return self.node_id(idx).map(ElementRef::node);
		}
		self.edge_at_position(sx, sy)
			.map(|edge| ElementRef::edge(edge.id.clone()))
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();
		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	pub fn tick(&mut self, dt: f32) {
		if self.layout.is_simulated() {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};
		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t < delay {
				return;
			}
		}
		self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Edge, Node};

	fn model() -> GraphModel {
		GraphModel::from_parts(["a", "b"].map(Node::new), [Edge::new("ab", "a", "b")]).unwrap()
	}

	#[test]
	fn picks_nodes_before_edges() {
		let state = CanvasState::new(&model(), Layout::Tree, Some("a"), 800.0, 600.0);
		// tree layout: a at (0, -45), b at (0, 45), origin at screen centre
		assert_eq!(state.element_at_position(400.0, 255.0), Some(ElementRef::node("a")));
		assert_eq!(state.element_at_position(400.0, 300.0), Some(ElementRef::edge("ab")));
		assert_eq!(state.element_at_position(10.0, 10.0), None);
	}

	#[test]
	fn rebuild_keeps_existing_positions() {
		let mut model = model();
		let mut state = CanvasState::new(&model, Layout::Tree, Some("a"), 800.0, 600.0);
		let before = state.positions().len();
		model.add_node();
		state.rebuild(&model, Some("a"));
		assert_eq!(state.positions().len(), before + 1);
		assert_eq!(state.element_at_position(400.0, 255.0), Some(ElementRef::node("a")));
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		assert_eq!(segment_distance(0.0, 5.0, 0.0, 0.0, 10.0, 0.0), 5.0);
		assert_eq!(segment_distance(13.0, 4.0, 0.0, 0.0, 10.0, 0.0), 5.0);
	}
}
