use thiserror::Error;

/// Failures of a code run, shown to the user verbatim.
#[derive(Debug, Error)]
pub enum RunError {
	#[error("Python interpreter is not available")]
	InterpreterUnavailable,
	#[error("Error: {0}")]
	Execution(String),
	#[error("Function call error in {0}(): {1}")]
	EntryCall(String, String),
	#[error("could not decode the return value: {0}")]
	Decode(#[from] serde_json::Error),
}
