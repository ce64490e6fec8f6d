use std::fmt;

/// Which half of the graph an identifier lives in. Node and edge ids may
/// collide, so every visual lookup carries the kind alongside the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
	Node,
	Edge,
}

/// A node or edge on the drawing surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef {
	pub kind: ElementKind,
	pub id: String,
}

impl ElementRef {
	pub fn node(id: impl Into<String>) -> Self {
		Self {
			kind: ElementKind::Node,
			id: id.into(),
		}
	}

	pub fn edge(id: impl Into<String>) -> Self {
		Self {
			kind: ElementKind::Edge,
			id: id.into(),
		}
	}

	pub fn is_node(&self) -> bool {
		self.kind == ElementKind::Node
	}
}

impl fmt::Display for ElementRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			ElementKind::Node => write!(f, "{}(node)", self.id),
			ElementKind::Edge => write!(f, "{}(edge)", self.id),
		}
	}
}
