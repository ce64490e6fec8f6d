use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, TickId};
use super::visual::{RenderAdapter, VisualClass};
use crate::graph::ElementRef;
use crate::trace::{FrontierKind, Playback, Step};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
	#[default]
	Idle,
	Running,
	Paused,
}

/// Total duration of a whole playback run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
	Fast,
	#[default]
	Normal,
	Slow,
}

impl Speed {
	pub const ALL: [Speed; 3] = [Speed::Fast, Speed::Normal, Speed::Slow];

	pub fn total(self) -> Duration {
		Duration::from_millis(match self {
			Speed::Fast => 3000,
			Speed::Normal => 5000,
			Speed::Slow => 8000,
		})
	}

	pub fn label(self) -> &'static str {
		match self {
			Speed::Fast => "Fast",
			Speed::Normal => "Normal",
			Speed::Slow => "Slow",
		}
	}

	pub fn from_label(label: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|s| s.label() == label)
	}
}

/// Copyable view of the engine for the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
	pub state: PlaybackState,
	pub cursor: usize,
	pub len: usize,
}

impl PlaybackSnapshot {
	pub fn is_running(&self) -> bool {
		self.state == PlaybackState::Running
	}

	pub fn can_step_forward(&self) -> bool {
		!self.is_running() && self.cursor < self.len
	}

	pub fn can_step_backward(&self) -> bool {
		!self.is_running() && self.cursor > 0
	}
}

/// Plays a [`Playback`] onto a [`RenderAdapter`] one element or step at a time.
///
/// `cursor` counts applied items: `0` is nothing shown, `len` is fully shown.
/// At most one reveal is ever pending; `load`, `reset`, `pause`, `teardown` and
/// drop all cancel it.
pub struct PlaybackEngine<R: RenderAdapter, S: Scheduler> {
	adapter: R,
	scheduler: S,
	playback: Playback,
	state: PlaybackState,
	cursor: usize,
	total: Duration,
	pause_on_backtrack: bool,
	pending: Option<TickId>,
	next_tick: u64,
	torn_down: bool,
}

impl<R: RenderAdapter, S: Scheduler> PlaybackEngine<R, S> {
	pub fn new(adapter: R, scheduler: S) -> Self {
		Self {
			adapter,
			scheduler,
			playback: Playback::empty(),
			state: PlaybackState::Idle,
			cursor: 0,
			total: Speed::default().total(),
			pause_on_backtrack: false,
			pending: None,
			next_tick: 0,
			torn_down: false,
		}
	}

	/// Give the reveal after a backtrack an extra step's worth of delay.
	pub fn with_backtrack_pause(mut self, enabled: bool) -> Self {
		self.pause_on_backtrack = enabled;
		self
	}

	pub fn state(&self) -> PlaybackState {
		self.state
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn len(&self) -> usize {
		self.playback.len()
	}

	pub fn is_empty(&self) -> bool {
		self.playback.is_empty()
	}

	pub fn is_running(&self) -> bool {
		self.state == PlaybackState::Running
	}

	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	pub fn playback(&self) -> &Playback {
		&self.playback
	}

	pub fn snapshot(&self) -> PlaybackSnapshot {
		PlaybackSnapshot {
			state: self.state,
			cursor: self.cursor,
			len: self.len(),
		}
	}

	pub fn adapter(&self) -> &R {
		&self.adapter
	}

	pub fn adapter_mut(&mut self) -> &mut R {
		&mut self.adapter
	}

	pub fn scheduler(&self) -> &S {
		&self.scheduler
	}

	pub fn scheduler_mut(&mut self) -> &mut S {
		&mut self.scheduler
	}

	/// Swap in a new sequence, rewinding to the start with a clean surface.
	pub fn load(&mut self, playback: Playback) {
		if self.torn_down {
			return;
		}
		self.cancel_pending();
		debug!("loading playback of {} items", playback.len());
		self.playback = playback;
		self.state = PlaybackState::Idle;
		self.cursor = 0;
		self.adapter.clear_all();
	}

	/// Play the rest of the sequence, spreading the whole sequence over `total`.
	/// The item at the cursor is shown immediately.
	pub fn start(&mut self, total: Duration) -> bool {
		if self.torn_down || self.is_running() {
			return false;
		}
		if self.cursor >= self.len() {
			debug!("start ignored: nothing left to play");
			return false;
		}
		info!(
			"playing from {}/{} over {}ms",
			self.cursor,
			self.len(),
			total.as_millis()
		);
		self.total = total;
		self.state = PlaybackState::Running;
		self.advance();
		self.schedule_next();
		true
	}

	/// Stop a run, keeping the cursor where it is.
	pub fn pause(&mut self) -> bool {
		if self.torn_down || !self.is_running() {
			return false;
		}
		self.cancel_pending();
		self.state = PlaybackState::Paused;
		debug!("paused at {}/{}", self.cursor, self.len());
		true
	}

	pub fn reset(&mut self) {
		if self.torn_down {
			return;
		}
		self.cancel_pending();
		self.state = PlaybackState::Idle;
		self.cursor = 0;
		self.adapter.clear_all();
	}

	pub fn step_forward(&mut self) -> bool {
		if self.torn_down || self.is_running() || self.cursor >= self.len() {
			return false;
		}
		self.advance();
		true
	}

	/// Undo the last applied item. Step traces are cumulative, so they are
	/// replayed from the beginning up to the new cursor.
	pub fn step_backward(&mut self) -> bool {
		if self.torn_down || self.is_running() || self.cursor == 0 {
			return false;
		}
		self.cursor -= 1;
		match &self.playback {
			Playback::Elements(seq) => {
				if let Some(element) = seq.get(self.cursor) {
					self.adapter.remove_class(element, VisualClass::Highlighted);
				}
			}
			Playback::Steps(_) => self.replay_to(self.cursor),
		}
		true
	}

	/// Jump to `target` (clamped to the sequence length) while not running.
	pub fn seek(&mut self, target: usize) -> bool {
		if self.torn_down || self.is_running() {
			return false;
		}
		let target = target.min(self.len());
		if target >= self.cursor {
			while self.cursor < target {
				self.advance();
			}
			return true;
		}
		match &self.playback {
			Playback::Elements(seq) => {
				for element in &seq.items()[target..self.cursor] {
					self.adapter.remove_class(element, VisualClass::Highlighted);
				}
				self.cursor = target;
			}
			Playback::Steps(_) => self.replay_to(target),
		}
		true
	}

	/// Deliver a fired timer. Anything but the currently pending tick of a
	/// running engine is dropped.
	pub fn on_tick(&mut self, tick: TickId) {
		if self.torn_down || !self.is_running() || self.pending != Some(tick) {
			debug!("dropping stale reveal {tick:?}");
			return;
		}
		self.pending = None;
		self.advance();
		self.schedule_next();
	}

	/// Cancel any pending reveal and refuse all further operations.
	pub fn teardown(&mut self) {
		self.cancel_pending();
		self.state = PlaybackState::Idle;
		self.torn_down = true;
	}

	fn step_delay(&self, index: usize) -> Duration {
		let backtracks = if self.pause_on_backtrack {
			self.playback.backtrack_count()
		} else {
			0
		};
		let slots = (self.len() + backtracks).max(1) as u32;
		let base = self.total / slots;
		if self.pause_on_backtrack && self.playback.follows_backtrack(index) {
			base * 2
		} else {
			base
		}
	}

	fn schedule_next(&mut self) {
		if self.cursor >= self.len() {
			info!("playback finished");
			self.state = PlaybackState::Idle;
			return;
		}
		let tick = TickId(self.next_tick);
		self.next_tick += 1;
		if self.scheduler.schedule(tick, self.step_delay(self.cursor)) {
			self.pending = Some(tick);
		} else {
			warn!("could not schedule the next reveal, pausing");
			self.state = PlaybackState::Paused;
		}
	}

	fn cancel_pending(&mut self) {
		if let Some(tick) = self.pending.take() {
			self.scheduler.cancel(tick);
		}
	}

	/// Apply the item at the cursor and move past it.
	fn advance(&mut self) {
		match &self.playback {
			Playback::Elements(seq) => {
				if let Some(element) = seq.get(self.cursor)
					&& !self.adapter.add_class(element, VisualClass::Highlighted)
				{
					debug!("{element} is gone from the surface, skipping");
				}
			}
			Playback::Steps(seq) => {
				if let Some(step) = seq.get(self.cursor) {
					apply_step(&mut self.adapter, step);
				}
			}
		}
		self.cursor += 1;
	}

	fn replay_to(&mut self, target: usize) {
		self.adapter.clear_all();
		if let Playback::Steps(seq) = &self.playback {
			for step in &seq.steps()[..target] {
				apply_step(&mut self.adapter, step);
			}
		}
		self.cursor = target;
	}
}

impl<R: RenderAdapter, S: Scheduler> Drop for PlaybackEngine<R, S> {
	fn drop(&mut self) {
		self.cancel_pending();
	}
}

/// Transient classes describe only this step; visited nodes and traversed
/// edges accumulate.
fn apply_step<R: RenderAdapter>(adapter: &mut R, step: &Step) {
	for class in VisualClass::TRANSIENT {
		adapter.clear_class(class);
	}
	for node in &step.visited_after {
		adapter.add_class(&ElementRef::node(node.clone()), VisualClass::Visited);
	}
	adapter.add_class(&ElementRef::node(step.current.clone()), VisualClass::Current);
	let member = match step.frontier_kind {
		FrontierKind::Stack => VisualClass::StackMember,
		FrontierKind::Queue => VisualClass::QueueMember,
	};
	for entry in &step.frontier_after {
		adapter.add_class(&ElementRef::node(entry.node.clone()), member);
	}
	if let Some(edge) = &step.edge {
		adapter.add_class(&ElementRef::edge(edge.clone()), VisualClass::Highlighted);
	}
}
