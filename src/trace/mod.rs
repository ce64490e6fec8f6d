//! Turning algorithm output into something the playback engine can animate.
//!
//! Raw results come in three shapes (edge path, node path, step trace). Paths
//! flatten into an [`ElementSequence`]; step traces are kept whole as a
//! [`StepSequence`] because each step rewrites several visual classes at once.

mod error;
mod normalize;
mod raw;

pub use error::TraceError;
pub use normalize::{ElementSequence, Playback, StepSequence, normalize};
pub use raw::{FlatListPolicy, FrontierEntry, FrontierKind, RawTraceResult, Step, StepAction};
