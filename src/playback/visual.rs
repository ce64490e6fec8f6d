use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::{ElementRef, GraphModel};

/// Style classes toggled by playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualClass {
	/// Revealed path element. Persistent.
	Highlighted,
	/// Node in the visited set. Persistent.
	Visited,
	Current,
	StackMember,
	QueueMember,
}

impl VisualClass {
	pub const ALL: [VisualClass; 5] = [
		VisualClass::Highlighted,
		VisualClass::Visited,
		VisualClass::Current,
		VisualClass::StackMember,
		VisualClass::QueueMember,
	];

	/// Classes that only describe the latest step and are wiped before the next.
	pub const TRANSIENT: [VisualClass; 3] = [
		VisualClass::Current,
		VisualClass::StackMember,
		VisualClass::QueueMember,
	];

	pub fn name(self) -> &'static str {
		match self {
			VisualClass::Highlighted => "highlighted",
			VisualClass::Visited => "visited",
			VisualClass::Current => "current",
			VisualClass::StackMember => "stack-member",
			VisualClass::QueueMember => "queue-member",
		}
	}
}

/// The drawing surface as seen by the playback engine.
///
/// Implementations must treat unknown elements as a no-op: the surface can lose
/// elements while playback is in flight.
pub trait RenderAdapter {
	/// Returns `false` if the element is not on the surface.
	fn add_class(&mut self, element: &ElementRef, class: VisualClass) -> bool;
	fn remove_class(&mut self, element: &ElementRef, class: VisualClass) -> bool;
	/// Remove `class` from every element.
	fn clear_class(&mut self, class: VisualClass);
	/// Remove every playback class from every element.
	fn clear_all(&mut self) {
		for class in VisualClass::ALL {
			self.clear_class(class);
		}
	}
}

/// Class table for the elements of one graph; the canvas paints from it.
#[derive(Clone, Debug, Default)]
pub struct VisualState {
	present: HashSet<ElementRef>,
	classes: HashMap<ElementRef, BTreeSet<VisualClass>>,
}

impl VisualState {
	pub fn for_graph(graph: &GraphModel) -> Self {
		let mut state = Self::default();
		state.sync(graph);
		state
	}

	/// Track the graph's current element set, dropping classes of anything removed.
	pub fn sync(&mut self, graph: &GraphModel) {
		self.present = graph.elements().collect();
		let present = &self.present;
		self.classes.retain(|element, _| present.contains(element));
	}

	pub fn has(&self, element: &ElementRef, class: VisualClass) -> bool {
		self.classes
			.get(element)
			.is_some_and(|set| set.contains(&class))
	}

	pub fn classes_of(&self, element: &ElementRef) -> impl Iterator<Item = VisualClass> + '_ {
		self.classes.get(element).into_iter().flatten().copied()
	}

	/// Elements carrying `class`, sorted.
	pub fn with_class(&self, class: VisualClass) -> Vec<&ElementRef> {
		let mut found: Vec<_> = self
			.classes
			.iter()
			.filter(|(_, set)| set.contains(&class))
			.map(|(element, _)| element)
			.collect();
		found.sort();
		found
	}

	pub fn is_clear(&self) -> bool {
		self.classes.values().all(BTreeSet::is_empty)
	}
}

impl RenderAdapter for VisualState {
	fn add_class(&mut self, element: &ElementRef, class: VisualClass) -> bool {
		if !self.present.contains(element) {
			return false;
		}
		self.classes.entry(element.clone()).or_default().insert(class);
		true
	}

	fn remove_class(&mut self, element: &ElementRef, class: VisualClass) -> bool {
		if !self.present.contains(element) {
			return false;
		}
		if let Some(set) = self.classes.get_mut(element) {
			set.remove(&class);
		}
		true
	}

	fn clear_class(&mut self, class: VisualClass) {
		for set in self.classes.values_mut() {
			set.remove(&class);
		}
	}

	fn clear_all(&mut self) {
		self.classes.clear();
	}
}
