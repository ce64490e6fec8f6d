use thiserror::Error;

/// Why a return value could not be turned into a trace.
#[derive(Debug, Error)]
pub enum TraceError {
	#[error("unrecognised trace shape: {0}")]
	UnrecognizedShape(String),
	#[error("malformed trace payload: {0}")]
	Malformed(#[from] serde_json::Error),
}
