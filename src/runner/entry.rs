use serde::{Deserialize, Serialize};

/// Naming rules used to pick a traversal function when the submitted source
/// never calls one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConventions {
	/// Case-insensitive substrings, e.g. `dfs`.
	pub contains: Vec<String>,
	pub suffixes: Vec<String>,
	/// Name of the adjacency variable passed as the first argument.
	pub graph_argument: String,
}

impl Default for EntryConventions {
	fn default() -> Self {
		Self {
			contains: vec!["dfs".into(), "bfs".into()],
			suffixes: vec!["_edges".into(), "_trace".into()],
			graph_argument: "graph".into(),
		}
	}
}

impl EntryConventions {
	fn matches(&self, name: &str) -> bool {
		let lower = name.to_ascii_lowercase();
		self.contains.iter().any(|c| lower.contains(&c.to_ascii_lowercase()))
			|| self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
	}
}

/// The expression evaluated to obtain a trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryCall {
	pub function: String,
	pub expression: String,
	/// `true` when lifted from a call in the source, `false` when synthesised.
	pub explicit: bool,
}

/// Find the call whose return value is the trace.
///
/// The last top-level call of a function defined in `source` wins. Without
/// one, the first defined function matching `conventions` is called with the
/// graph variable and `start_node`.
pub fn resolve_entry(
	source: &str,
	conventions: &EntryConventions,
	start_node: &str,
) -> Option<EntryCall> {
	let defined = defined_functions(source);
	if let Some(call) = explicit_call(source, &defined) {
		return Some(call);
	}
	let function = defined.into_iter().find(|name| conventions.matches(name))?;
	let expression = format!(
		"{function}({}, {})",
		conventions.graph_argument,
		python_literal(start_node)
	);
	Some(EntryCall {
		function,
		expression,
		explicit: false,
	})
}

fn defined_functions(source: &str) -> Vec<String> {
	source
		.lines()
		.filter_map(|line| line.trim_start().strip_prefix("def "))
		.filter_map(|rest| {
			let name: String = rest
				.chars()
				.take_while(|c| c.is_alphanumeric() || *c == '_')
				.collect();
			(!name.is_empty()).then_some(name)
		})
		.collect()
}

fn explicit_call(source: &str, defined: &[String]) -> Option<EntryCall> {
	source
		.lines()
		.filter(|line| !line.starts_with([' ', '\t', '#']) && !line.starts_with("def "))
		.flat_map(|line| {
			defined
				.iter()
				.filter_map(move |name| call_in_line(line, name).map(|expr| (name, expr)))
		})
		.last()
		.map(|(name, expression)| EntryCall {
			function: name.clone(),
			expression,
			explicit: true,
		})
}

/// Text of `name(...)` in `line`, with balanced parentheses.
fn call_in_line(line: &str, name: &str) -> Option<String> {
	let mut from = 0;
	while let Some(pos) = line[from..].find(name) {
		let start = from + pos;
		let end = start + name.len();
		from = end;
		let boundary = line[..start]
			.chars()
			.next_back()
			.is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '.'));
		if !boundary || !line[end..].starts_with('(') {
			continue;
		}
		let close = matching_paren(&line[end..])?;
		return Some(line[start..end + close + 1].to_string());
	}
	None
}

/// Byte offset of the parenthesis closing the one at the start of `text`.
fn matching_paren(text: &str) -> Option<usize> {
	let mut depth = 0usize;
	let mut quote: Option<char> = None;
	for (i, c) in text.char_indices() {
		match (quote, c) {
			(Some(q), c) if c == q => quote = None,
			(Some(_), _) => {}
			(None, '\'' | '"') => quote = Some(c),
			(None, '(') => depth += 1,
			(None, ')') => {
				depth = depth.checked_sub(1)?;
				if depth == 0 {
					return Some(i);
				}
			}
			_ => {}
		}
	}
	None
}

fn python_literal(node: &str) -> String {
	if node.parse::<i64>().is_ok() {
		node.to_string()
	} else {
		format!("'{}'", node.replace('\\', "\\\\").replace('\'', "\\'"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DFS: &str = r#"
graph = {0: [1, 2], 1: [3], 2: []}

def dfs_iterative_edges(graph, start):
    visited = set()
    edge_path = []
    helper(start)
    return edge_path

def helper(x):
    return x

print(dfs_iterative_edges(graph, 0))
"#;

	#[test]
	fn explicit_call_is_lifted_from_print() {
		let call = resolve_entry(DFS, &EntryConventions::default(), "1").unwrap();
		assert_eq!(call.function, "dfs_iterative_edges");
		assert_eq!(call.expression, "dfs_iterative_edges(graph, 0)");
		assert!(call.explicit);
	}

	#[test]
	fn calls_inside_bodies_are_ignored() {
		let source = DFS.replace("print(dfs_iterative_edges(graph, 0))", "");
		let call = resolve_entry(&source, &EntryConventions::default(), "0").unwrap();
		assert_eq!(call.expression, "dfs_iterative_edges(graph, 0)");
		assert!(!call.explicit);
	}

	#[test]
	fn fallback_quotes_letter_ids() {
		let source = "def walk_trace(g, s):\n    return []\n";
		let call = resolve_entry(source, &EntryConventions::default(), "A").unwrap();
		assert_eq!(call.expression, "walk_trace(graph, 'A')");
	}

	#[test]
	fn nested_parens_and_strings() {
		let source = "def bfs(g, s):\n    pass\nresult = bfs(build(')'), 'A')\n";
		let call = resolve_entry(source, &EntryConventions::default(), "A").unwrap();
		assert_eq!(call.expression, "bfs(build(')'), 'A')");
	}

	#[test]
	fn methods_with_same_name_do_not_count() {
		let source = "def dfs(g, s):\n    pass\nx = obj.dfs(1)\n";
		let call = resolve_entry(source, &EntryConventions::default(), "0").unwrap();
		assert!(!call.explicit);
	}

	#[test]
	fn nothing_matches() {
		let source = "def helper(x):\n    return x\n";
		assert!(resolve_entry(source, &EntryConventions::default(), "0").is_none());
	}
}
