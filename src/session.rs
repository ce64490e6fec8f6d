//! Everything one mounted visualizer owns: the graph being shown, its canvas
//! placement and the playback engine painting over it.

use log::{info, warn};
use serde_json::Value;

use crate::catalog;
use crate::components::graph_canvas::{CanvasState, Layout};
use crate::config::VisualizerConfig;
use crate::graph::{ElementRef, GraphError, GraphModel};
use crate::playback::{PlaybackEngine, Scheduler, TimeoutScheduler, VisualState};
use crate::trace::{ElementSequence, FlatListPolicy, Playback, RawTraceResult, TraceError, normalize};

const INITIAL_WIDTH: f64 = 800.0;
const INITIAL_HEIGHT: f64 = 600.0;

pub struct Session<S: Scheduler = TimeoutScheduler> {
	graph: GraphModel,
	start_node: String,
	default_sequence: ElementSequence,
	/// `true` while the catalog's canned path is loaded rather than a run result.
	using_default_path: bool,
	show_default_path: bool,
	pub canvas: CanvasState,
	engine: PlaybackEngine<VisualState, S>,
}

impl<S: Scheduler> Session<S> {
	pub fn new(scheduler: S, config: &VisualizerConfig) -> Self {
		let engine = PlaybackEngine::new(VisualState::default(), scheduler)
			.with_backtrack_pause(config.backtrack_pause);
		let mut session = Self {
			graph: GraphModel::new(),
			start_node: String::new(),
			default_sequence: ElementSequence::default(),
			using_default_path: true,
			show_default_path: true,
			canvas: CanvasState::new(&GraphModel::new(), Layout::default(), None, INITIAL_WIDTH, INITIAL_HEIGHT),
			engine,
		};
		if !session.load_example(&config.default_algorithm, &config.default_example) {
			session.load_example("dfs", catalog::FALLBACK_EXAMPLE);
		}
		session
	}

	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	pub fn start_node(&self) -> &str {
		&self.start_node
	}

	pub fn engine(&self) -> &PlaybackEngine<VisualState, S> {
		&self.engine
	}

	pub fn engine_mut(&mut self) -> &mut PlaybackEngine<VisualState, S> {
		&mut self.engine
	}

	pub fn visual(&self) -> &VisualState {
		self.engine.adapter()
	}

	pub fn using_default_path(&self) -> bool {
		self.using_default_path
	}

	pub fn shows_default_path(&self) -> bool {
		self.show_default_path
	}

	/// Replace the graph with a catalog example. Unknown algorithms leave the
	/// current example in place and return `false`.
	pub fn load_example(&mut self, algorithm: &str, example: &str) -> bool {
		let Some(found) = catalog::get(algorithm, example) else {
			warn!("no examples for `{algorithm}`, keeping the current graph");
			return false;
		};
		info!("loaded example {}/{}", found.algorithm, found.id);
		self.default_sequence = found.default_sequence();
		self.graph = found.graph;
		self.start_node = found.start_node;
		self.using_default_path = true;
		self.canvas
			.apply_layout(self.canvas.layout, &self.graph, Some(&self.start_node));
		self.engine.adapter_mut().sync(&self.graph);
		self.engine.load(self.default_playback());
		true
	}

	fn default_playback(&self) -> Playback {
		if self.show_default_path {
			self.default_sequence.clone().into()
		} else {
			Playback::empty()
		}
	}

	/// Replace the active sequence with a run result.
	pub fn load_playback(&mut self, playback: Playback) {
		self.using_default_path = false;
		self.engine.load(playback);
	}

	/// Parse and normalise an interpreter return value against the current
	/// graph. An unrecognised shape still clears the old sequence.
	pub fn load_trace(&mut self, value: &Value, policy: FlatListPolicy) -> Result<usize, TraceError> {
		match RawTraceResult::from_value(value, policy) {
			Ok(raw) => {
				let playback = normalize(&raw, &self.graph);
				let len = playback.len();
				info!("loaded {} trace with {len} items", raw.shape_name());
				self.load_playback(playback);
				Ok(len)
			}
			Err(err) => {
				warn!("{err}");
				self.load_playback(Playback::empty());
				Err(err)
			}
		}
	}

	/// Toggle the canned path. Only affects playback while no run result is loaded.
	pub fn set_show_default_path(&mut self, show: bool) {
		self.show_default_path = show;
		if self.using_default_path {
			self.engine.load(self.default_playback());
		}
	}

	pub fn add_node(&mut self) -> String {
		let id = self.graph.add_node();
		self.graph_changed();
		id
	}

	pub fn add_edge(&mut self, source: &str, target: &str) -> Result<String, GraphError> {
		let id = self.graph.add_edge(source, target)?;
		self.graph_changed();
		Ok(id)
	}

	/// Remove a node (with its edges) or an edge. Playback keeps going; reveals
	/// of removed elements become no-ops.
	pub fn remove(&mut self, element: &ElementRef) -> bool {
		let removed = if element.is_node() {
			self.graph.remove_node(&element.id).is_some()
		} else {
			self.graph.remove_edge(&element.id).is_some()
		};
		if removed {
			self.graph_changed();
		}
		removed
	}

	fn graph_changed(&mut self) {
		self.canvas.rebuild(&self.graph, Some(&self.start_node));
		self.engine.adapter_mut().sync(&self.graph);
	}

	pub fn set_layout(&mut self, layout: Layout) {
		self.canvas.apply_layout(layout, &self.graph, Some(&self.start_node));
	}

	/// Pretty JSON for the Save Graph download.
	pub fn save_json(&self) -> Result<String, GraphError> {
		self.graph.to_json_pretty()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde_json::json;

	use super::*;
	use crate::playback::{PlaybackState, TickId, VisualClass};

	#[derive(Default)]
	struct NoTimer;

	impl Scheduler for NoTimer {
		fn schedule(&mut self, _tick: TickId, _delay: Duration) -> bool {
			true
		}

		fn cancel(&mut self, _tick: TickId) {}
	}

	fn session() -> Session<NoTimer> {
		Session::new(NoTimer, &VisualizerConfig::default())
	}

	#[test]
	fn starts_on_the_default_example() {
		let session = session();
		assert_eq!(session.start_node(), "0");
		assert!(session.using_default_path());
		// seven edges plus eight nodes
		assert_eq!(session.engine().len(), 15);
	}

	#[test]
	fn unknown_algorithm_keeps_current_graph() {
		let mut session = session();
		assert!(!session.load_example("astar", "simple"));
		assert!(session.graph().contains_node("7"));
	}

	#[test]
	fn run_result_supersedes_default_path() {
		let mut session = session();
		let len = session
			.load_trace(&json!(["01", "13"]), FlatListPolicy::default())
			.unwrap();
		assert_eq!(len, 5);
		assert!(!session.using_default_path());

		// hiding the default path no longer touches a run result
		session.set_show_default_path(false);
		assert_eq!(session.engine().len(), 5);
	}

	#[test]
	fn unrecognised_trace_clears_playback() {
		let mut session = session();
		assert!(session.load_trace(&json!({"foo": 1}), FlatListPolicy::default()).is_err());
		assert!(session.engine().is_empty());
		assert_eq!(session.engine().state(), PlaybackState::Idle);
	}

	#[test]
	fn hide_default_path_loads_nothing() {
		let mut session = session();
		session.set_show_default_path(false);
		assert!(!session.shows_default_path());
		assert!(session.engine().is_empty());
		session.set_show_default_path(true);
		assert!(session.shows_default_path());
		assert_eq!(session.engine().len(), 15);
	}

	#[test]
	fn removing_a_node_mid_playback_is_tolerated() {
		let mut session = session();
		assert!(session.engine_mut().start(Duration::from_millis(1500)));
		assert!(session.engine_mut().pause());
		assert!(session.remove(&ElementRef::node("1")));
		assert!(!session.graph().contains_edge("13"));
		while session.engine_mut().step_forward() {}
		assert!(!session.visual().has(&ElementRef::node("1"), VisualClass::Highlighted));
		assert!(session.visual().has(&ElementRef::node("7"), VisualClass::Highlighted));
	}

	#[test]
	fn edits_reach_the_canvas() {
		let mut session = session();
		let id = session.add_node();
		assert_eq!(session.add_edge("7", &id).unwrap(), format!("7{id}"));
		assert_eq!(session.canvas.edges().len(), 8);
		assert!(session.add_edge("7", "7").is_err());
	}
}
