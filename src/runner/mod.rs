//! Running user code in the in-browser Python interpreter.

mod entry;
mod error;
mod pyodide;

pub use entry::{EntryCall, EntryConventions, resolve_entry};
pub use error::RunError;
pub use pyodide::{PyodideRunner, RunOutput};
