use std::rc::Rc;
use std::time::Duration;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Identifies one scheduled reveal. A fired tick that no longer matches the
/// engine's pending tick is stale and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickId(pub(crate) u64);

/// One-shot deferred callbacks for the playback engine.
pub trait Scheduler {
	/// Arrange for `tick` to be delivered back to the engine after `delay`.
	/// Returns `false` if nothing was scheduled.
	fn schedule(&mut self, tick: TickId, delay: Duration) -> bool;
	fn cancel(&mut self, tick: TickId);
}

/// Browser `setTimeout` scheduler. Fired ticks are routed to the callback
/// installed with [`TimeoutScheduler::bind`].
#[derive(Default)]
pub struct TimeoutScheduler {
	on_fire: Option<Rc<dyn Fn(TickId)>>,
	pending: Option<PendingTimeout>,
}

/// A live `setTimeout`. The callback is owned here so a cancelled timeout
/// releases it; a fired one is released by the next schedule.
struct PendingTimeout {
	tick: TickId,
	handle: i32,
	_callback: Closure<dyn FnMut()>,
}

impl TimeoutScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind(&mut self, on_fire: impl Fn(TickId) + 'static) {
		self.on_fire = Some(Rc::new(on_fire));
	}
}

impl Scheduler for TimeoutScheduler {
	fn schedule(&mut self, tick: TickId, delay: Duration) -> bool {
		let Some(on_fire) = self.on_fire.clone() else {
			warn!("reveal scheduled before a timer callback was bound");
			return false;
		};
		let Some(window) = web_sys::window() else {
			return false;
		};
		let callback = Closure::once(move || on_fire(tick));
		let millis = delay.as_millis().min(i32::MAX as u128) as i32;
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(
			callback.as_ref().unchecked_ref(),
			millis,
		) {
			Ok(handle) => {
				self.pending = Some(PendingTimeout {
					tick,
					handle,
					_callback: callback,
				});
				true
			}
			Err(err) => {
				warn!("setTimeout failed: {err:?}");
				false
			}
		}
	}

	fn cancel(&mut self, tick: TickId) {
		match self.pending.take() {
			Some(pending) if pending.tick == tick => {
				if let Some(window) = web_sys::window() {
					window.clear_timeout_with_handle(pending.handle);
				}
				// the closure goes with `pending`, after the timer is cleared
			}
			other => self.pending = other,
		}
	}
}
