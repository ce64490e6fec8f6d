use std::time::Duration;

use algo_visualizer::catalog;
use algo_visualizer::graph::ElementRef;
use algo_visualizer::playback::{
	PlaybackEngine, PlaybackState, Scheduler, TickId, VisualClass, VisualState,
};
use algo_visualizer::trace::{ElementSequence, FlatListPolicy, RawTraceResult, normalize};
use serde_json::json;

/// Virtual clock: at most one pending tick, fired by `advance_to`.
#[derive(Default)]
struct Clock {
	now: u64,
	pending: Option<(TickId, u64)>,
}

impl Scheduler for Clock {
	fn schedule(&mut self, tick: TickId, delay: Duration) -> bool {
		self.pending = Some((tick, self.now + delay.as_millis() as u64));
		true
	}

	fn cancel(&mut self, tick: TickId) {
		if self.pending.is_some_and(|(pending, _)| pending == tick) {
			self.pending = None;
		}
	}
}

/// Fire every tick due up to `until`, recording the cursor after each.
fn advance_to(engine: &mut PlaybackEngine<VisualState, Clock>, until: u64) -> Vec<(u64, usize)> {
	let mut fired = Vec::new();
	while let Some((tick, due)) = engine.scheduler().pending {
		if due > until {
			break;
		}
		engine.scheduler_mut().pending = None;
		engine.scheduler_mut().now = due;
		engine.on_tick(tick);
		fired.push((due, engine.cursor()));
	}
	engine.scheduler_mut().now = until;
	fired
}

fn five_element_engine() -> PlaybackEngine<VisualState, Clock> {
	let example = catalog::get("dfs", "simple").unwrap();
	let path = vec!["01".to_string(), "13".to_string()];
	let mut engine = PlaybackEngine::new(VisualState::for_graph(&example.graph), Clock::default());
	engine.load(ElementSequence::from_edge_path(&path, &example.graph).into());
	engine
}

#[test]
fn reveals_are_spread_over_the_total_and_pause_holds() {
	let mut engine = five_element_engine();
	assert!(engine.start(Duration::from_millis(5000)));
	assert_eq!(engine.cursor(), 1);

	let fired = advance_to(&mut engine, 2500);
	assert_eq!(fired, [(1000, 2), (2000, 3)]);
	assert!(engine.pause());
	assert_eq!(engine.cursor(), 3);
	assert!(advance_to(&mut engine, 10_000).is_empty());

	assert!(engine.start(Duration::from_millis(5000)));
	let fired = advance_to(&mut engine, 20_000);
	assert_eq!(fired.last().map(|(_, cursor)| *cursor), Some(5));
	assert_eq!(engine.state(), PlaybackState::Idle);
}

#[test]
fn load_cancels_a_pending_reveal() {
	let mut engine = five_element_engine();
	engine.start(Duration::from_millis(5000));
	let (stale, _) = engine.scheduler().pending.unwrap();
	engine.load(ElementSequence::default().into());
	assert!(engine.scheduler().pending.is_none());
	assert_eq!(engine.cursor(), 0);

	// a late delivery of the old tick changes nothing
	engine.on_tick(stale);
	assert_eq!(engine.cursor(), 0);
	assert!(engine.adapter().is_clear());
}

#[test]
fn empty_sequence_never_runs() {
	let mut engine = PlaybackEngine::new(VisualState::default(), Clock::default());
	assert!(!engine.start(Duration::from_millis(3000)));
	assert_eq!(engine.state(), PlaybackState::Idle);
	assert!(engine.scheduler().pending.is_none());
}

#[test]
fn full_step_rewind_restores_a_clean_surface() {
	let graph = catalog::get("dfs", "simple").unwrap().graph;
	let steps = json!({"steps": [
		{"step": 1, "algorithm": "DFS", "action": "pop", "current_node": "0",
		 "visited_after": ["0"], "stack_after": [["1", "0"], ["2", "0"]]},
		{"step": 2, "algorithm": "DFS", "action": "visit", "current_node": "1", "parent": "0",
		 "visited_after": ["0", "1"], "stack_after": [["2", "0"], ["3", "1"]], "edge": "01"},
		{"step": 3, "algorithm": "DFS", "action": "visit", "current_node": "3", "parent": "1",
		 "visited_after": ["0", "1", "3"], "stack_after": [["2", "0"]], "edge": "13"}
	]});
	let raw = RawTraceResult::from_value(&steps, FlatListPolicy::default()).unwrap();
	let mut engine = PlaybackEngine::new(VisualState::for_graph(&graph), Clock::default());
	engine.load(normalize(&raw, &graph));

	while engine.step_forward() {}
	let visual = engine.adapter();
	assert!(visual.has(&ElementRef::node("3"), VisualClass::Current));
	assert!(visual.has(&ElementRef::edge("13"), VisualClass::Highlighted));
	assert!(visual.has(&ElementRef::node("2"), VisualClass::StackMember));
	assert!(!visual.has(&ElementRef::node("1"), VisualClass::Current));

	while engine.step_backward() {}
	assert_eq!(engine.cursor(), 0);
	assert!(engine.adapter().is_clear());
}

#[test]
fn teardown_makes_every_control_inert() {
	let mut engine = five_element_engine();
	engine.start(Duration::from_millis(5000));
	let (tick, _) = engine.scheduler().pending.unwrap();
	engine.teardown();
	assert!(engine.scheduler().pending.is_none());
	engine.on_tick(tick);
	assert!(!engine.start(Duration::from_millis(5000)));
	assert!(!engine.step_forward());
	assert_eq!(engine.cursor(), 1);
}

#[test]
fn one_step_paints_visited_frontier_current_and_edge() {
	let graph = catalog::get("dfs", "simple").unwrap().graph;
	let step = json!([{
		"step": 1,
		"algorithm": "DFS",
		"action": "visit",
		"current_node": "2",
		"visited_after": ["0", "1", "2"],
		"stack_after": [["5", "2"], ["6", "2"]],
		"edge_added": "02"
	}]);
	let raw = RawTraceResult::from_value(&step, FlatListPolicy::default()).unwrap();
	let mut engine = PlaybackEngine::new(VisualState::for_graph(&graph), Clock::default());
	engine.load(normalize(&raw, &graph));
	assert!(engine.step_forward());

	let visual = engine.adapter();
	let nodes = |ids: &[&str]| ids.iter().map(|id| ElementRef::node(*id)).collect::<Vec<_>>();
	let owned = |class| visual.with_class(class).into_iter().cloned().collect::<Vec<_>>();
	assert_eq!(owned(VisualClass::Visited), nodes(&["0", "1", "2"]));
	assert_eq!(owned(VisualClass::StackMember), nodes(&["5", "6"]));
	assert_eq!(owned(VisualClass::Current), nodes(&["2"]));
	assert_eq!(owned(VisualClass::Highlighted), [ElementRef::edge("02")]);
	assert!(owned(VisualClass::QueueMember).is_empty());
}
