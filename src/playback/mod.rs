//! Timed playback of traversal sequences onto a drawing surface.

mod engine;
mod scheduler;
mod visual;

pub use engine::{PlaybackEngine, PlaybackSnapshot, PlaybackState, Speed};
pub use scheduler::{Scheduler, TickId, TimeoutScheduler};
pub use visual::{RenderAdapter, VisualClass, VisualState};
