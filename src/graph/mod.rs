//! Node/edge data for the graph currently on screen.

mod element;
mod error;
mod model;

pub use element::{ElementKind, ElementRef};
pub use error::GraphError;
pub use model::{Edge, GraphModel, Node};
