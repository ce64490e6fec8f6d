use thiserror::Error;

/// Failures raised by [`super::GraphModel`] mutations and the saved-graph codec.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("node `{0}` does not exist")]
	UnknownNode(String),
	#[error("node `{0}` already exists")]
	DuplicateNode(String),
	#[error("edge `{0}` already exists")]
	DuplicateEdge(String),
	#[error("self-loop on node `{0}` is not allowed")]
	SelfLoop(String),
	#[error("graph document is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
}
