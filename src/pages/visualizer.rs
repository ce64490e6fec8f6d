use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Event, HtmlAnchorElement, Url};

use crate::catalog;
use crate::components::graph_canvas::{GraphCanvas, Layout, class_color};
use crate::config::VisualizerConfig;
use crate::graph::ElementRef;
use crate::playback::{PlaybackSnapshot, Speed, TimeoutScheduler, VisualClass};
use crate::runner::PyodideRunner;
use crate::session::Session;

const DEFAULT_SOURCE: &str = r#"# DFS Iterative Example (returns edge traversals)
graph = {
    0: [1, 2],
    1: [0, 3, 4],
    2: [0, 5, 6],
    3: [1],
    4: [1, 7],
    5: [2],
    6: [2],
    7: [4]
}

def dfs_iterative_edges(graph, start):
    visited = set()
    edge_path = []
    stack = [(start, None)]  # (current_node, parent_node)
    while stack:
        current, parent = stack.pop()
        if current not in visited:
            visited.add(current)
            if parent is not None:
                edge_path.append(f"{parent}{current}")
            for neighbor in reversed(graph.get(current, [])):
                if neighbor not in visited:
                    stack.append((neighbor, current))
    return edge_path

# Run DFS from node 0
print(dfs_iterative_edges(graph, 0))
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Interpreter {
	Loading,
	Ready,
	Unavailable,
}

/// Offer `text` as a file download.
fn download(name: &str, text: &str) -> Result<(), JsValue> {
	let parts = js_sys::Array::of1(&JsValue::from_str(text));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(name);
	anchor.click();
	Url::revoke_object_url(&url)
}

/// Algorithm visualizer: example graph, code panel and playback controls.
#[component]
pub fn Visualizer() -> impl IntoView {
	let config = VisualizerConfig::load();
	let algorithm = RwSignal::new(config.default_algorithm.clone());
	let example = RwSignal::new(config.default_example.clone());
	let speed = RwSignal::new(config.default_speed);
	let session = StoredValue::new_local(Session::new(TimeoutScheduler::new(), &config));
	let config = StoredValue::new(config);
	let runner = StoredValue::new_local(None::<PyodideRunner>);

	let snapshot = RwSignal::new(PlaybackSnapshot::default());
	let layout = RwSignal::new(Layout::default());
	let selection = RwSignal::new(None::<ElementRef>);
	let pending_edge = RwSignal::new(None::<String>);
	let using_default = RwSignal::new(true);
	let show_default = RwSignal::new(true);
	let graph_size = RwSignal::new((0usize, 0usize));
	let status = RwSignal::new(None::<String>);

	let code = RwSignal::new(DEFAULT_SOURCE.to_string());
	let output = RwSignal::new(String::new());
	let output_open = RwSignal::new(true);
	let interpreter = RwSignal::new(Interpreter::Loading);
	let running_code = RwSignal::new(false);

	let sync = move || {
		if let Some((snap, default, shown, size)) = session.try_with_value(|s| {
			let graph = s.graph();
			(
				s.engine().snapshot(),
				s.using_default_path(),
				s.shows_default_path(),
				(graph.nodes().len(), graph.edges().len()),
			)
		}) {
			snapshot.set(snap);
			using_default.set(default);
			show_default.set(shown);
			graph_size.set(size);
		}
	};

	session.update_value(|s| {
		s.engine_mut().scheduler_mut().bind(move |tick| {
			let snap = session.try_update_value(|s| {
				s.engine_mut().on_tick(tick);
				s.engine().snapshot()
			});
			if let Some(snap) = snap {
				snapshot.set(snap);
			}
		})
	});
	on_cleanup(move || {
		session.try_update_value(|s| s.engine_mut().teardown());
	});

	Effect::new(move |_| {
		let (algorithm, example) = (algorithm.get(), example.get());
		session.update_value(|s| {
			s.load_example(&algorithm, &example);
		});
		selection.set(None);
		pending_edge.set(None);
		status.set(None);
		sync();
	});

	spawn_local(async move {
		match PyodideRunner::connect().await {
			Ok(found) => {
				runner.set_value(Some(found));
				interpreter.set(Interpreter::Ready);
			}
			Err(err) => {
				warn!("{err}");
				interpreter.set(Interpreter::Unavailable);
			}
		}
	});

	let start = move |_| {
		session.update_value(|s| {
			s.engine_mut().start(speed.get_untracked().total());
		});
		sync();
	};
	let stop = move |_| {
		session.update_value(|s| {
			s.engine_mut().pause();
		});
		sync();
	};
	let reset = move |_| {
		session.update_value(|s| s.engine_mut().reset());
		sync();
	};
	let step_back = move |_| {
		session.update_value(|s| {
			s.engine_mut().step_backward();
		});
		sync();
	};
	let step_forward = move |_| {
		session.update_value(|s| {
			s.engine_mut().step_forward();
		});
		sync();
	};
	let seek = move |ev: Event| {
		if let Ok(target) = event_target_value(&ev).parse::<usize>() {
			session.update_value(|s| {
				s.engine_mut().seek(target);
			});
			sync();
		}
	};
	let change_speed = move |ev: Event| {
		let Some(next) = Speed::from_label(&event_target_value(&ev)) else {
			return;
		};
		speed.set(next);
		// a running sequence picks the new pace up from where it is
		session.update_value(|s| {
			if s.engine_mut().pause() {
				s.engine_mut().start(next.total());
			}
		});
		sync();
	};
	let change_layout = move |ev: Event| {
		if let Some(next) = Layout::from_label(&event_target_value(&ev)) {
			layout.set(next);
			session.update_value(|s| s.set_layout(next));
		}
	};
	let toggle_default = move |_| {
		session.update_value(|s| {
			let show = !s.shows_default_path();
			s.set_show_default_path(show);
		});
		sync();
	};

	let on_pick = move |picked: Option<ElementRef>| {
		let Some(source) = pending_edge.get_untracked() else {
			selection.set(picked);
			return;
		};
		match picked {
			Some(target) if target.is_node() && target.id != source => {
				match session.try_update_value(|s| s.add_edge(&source, &target.id)) {
					Some(Ok(id)) => {
						info!("added edge {id}");
						selection.set(Some(ElementRef::edge(id)));
						status.set(None);
					}
					Some(Err(err)) => status.set(Some(err.to_string())),
					None => {}
				}
				pending_edge.set(None);
			}
			Some(_) => {}
			None => {
				pending_edge.set(None);
				status.set(None);
			}
		}
	};

	let add_node = move |_| {
		if let Some(id) = session.try_update_value(|s| s.add_node()) {
			selection.set(Some(ElementRef::node(id)));
		}
	};
	let remove_selected = move |want_node: bool| {
		let Some(element) = selection.get_untracked().filter(|e| e.is_node() == want_node) else {
			status.set(Some(format!(
				"Select {} first",
				if want_node { "a node" } else { "an edge" }
			)));
			return;
		};
		session.update_value(|s| {
			s.remove(&element);
		});
		selection.set(None);
		status.set(None);
	};
	let add_edge = move |_| {
		if pending_edge.get_untracked().is_some() {
			pending_edge.set(None);
			status.set(None);
			return;
		}
		match selection.get_untracked().filter(ElementRef::is_node) {
			Some(node) => {
				pending_edge.set(Some(node.id));
				status.set(Some("Click the target node".into()));
			}
			None => status.set(Some("Select a source node first".into())),
		}
	};
	let reset_layout = move |_| {
		session.update_value(|s| s.set_layout(layout.get_untracked()));
	};
	let save_graph = move |_| {
		let saved = session
			.with_value(|s| s.save_json())
			.map_err(|err| err.to_string())
			.and_then(|text| download("graph.json", &text).map_err(|err| format!("{err:?}")));
		if let Err(err) = saved {
			warn!("save failed: {err}");
			status.set(Some(format!("Could not save graph: {err}")));
		}
	};

	let run_code = move |_| {
		let Some(found) = runner.get_value() else {
			return;
		};
		let source = code.get_untracked();
		let start_node = session.with_value(|s| s.start_node().to_string());
		let (conventions, policy, auto_start) =
			config.with_value(|c| (c.entry_point.clone(), c.flat_list, c.auto_start));
		running_code.set(true);
		status.set(None);
		spawn_local(async move {
			let result = found.run(&source, &conventions, &start_node).await;
			running_code.set(false);
			let out = match result {
				Ok(out) => out,
				Err(err) => {
					warn!("run failed: {err}");
					output.set(err.to_string());
					output_open.set(true);
					return;
				}
			};
			let mut text = out.stdout;
			match (&out.entry, &out.value) {
				(Some(entry), Some(value)) => {
					text.push_str(&format!("Return value from {}(): {value}\n", entry.function));
					let loaded = session.try_update_value(|s| {
						let loaded = s.load_trace(value, policy);
						if loaded.is_ok() && auto_start {
							s.engine_mut().start(speed.get_untracked().total());
						}
						loaded
					});
					if let Some(Err(err)) = loaded {
						status.set(Some(format!("Nothing to visualize: {err}")));
					}
				}
				_ => status.set(Some("No traversal function found to visualize".into())),
			}
			output.set(text);
			sync();
		});
	};

	view! {
		<div class="visualizer">
			<section class="graph-panel">
				<div class="controls">
					<select on:change=move |ev| {
						let next = event_target_value(&ev);
						let first = catalog::examples_for(&next)
							.first()
							.map(|e| e.id.to_string())
							.unwrap_or_default();
						example.set(first);
						algorithm.set(next);
					}>
						{catalog::algorithms()
							.map(|a| {
								view! {
									<option value=a selected=move || algorithm.get() == a>
										{a.to_uppercase()}
									</option>
								}
							})
							.collect_view()}
					</select>
					<select on:change=move |ev| example.set(event_target_value(&ev))>
						{move || {
							catalog::examples_for(&algorithm.get())
								.iter()
								.map(|e| {
									let id = e.id;
									view! {
										<option value=id selected=move || example.get() == id>
											{e.name}
										</option>
									}
								})
								.collect_view()
						}}
					</select>
					<select on:change=change_layout>
						{Layout::ALL
							.into_iter()
							.map(|l| {
								view! {
									<option value=l.label() selected=move || layout.get() == l>
										{l.label()}
									</option>
								}
							})
							.collect_view()}
					</select>
					<select on:change=change_speed>
						{Speed::ALL
							.into_iter()
							.map(|s| {
								view! {
									<option value=s.label() selected=move || speed.get() == s>
										{s.label()}
									</option>
								}
							})
							.collect_view()}
					</select>
				</div>

				<div class="controls">
					<button on:click=start prop:disabled=move || snapshot.get().is_running()>
						"Start"
					</button>
					<button on:click=stop prop:disabled=move || !snapshot.get().is_running()>
						"Stop"
					</button>
					<button on:click=reset>"Reset"</button>
					<button
						on:click=step_back
						prop:disabled=move || !snapshot.get().can_step_backward()
					>
						"←"
					</button>
					<button
						on:click=step_forward
						prop:disabled=move || !snapshot.get().can_step_forward()
					>
						"→"
					</button>
					<input
						type="range"
						min="0"
						prop:max=move || snapshot.get().len.to_string()
						prop:value=move || snapshot.get().cursor.to_string()
						prop:disabled=move || snapshot.get().is_running()
						on:input=seek
					/>
					<span class="progress">
						{move || {
							let snap = snapshot.get();
							format!("{} / {}", snap.cursor, snap.len)
						}}
					</span>
					<button on:click=toggle_default prop:disabled=move || !using_default.get()>
						{move || if show_default.get() { "Hide Default Path" } else { "Show Default Path" }}
					</button>
				</div>

				<div class="controls">
					<button on:click=add_node>"Add Node"</button>
					<button on:click=move |_| remove_selected(true)>"Remove Node"</button>
					<button on:click=add_edge>
						{move || if pending_edge.get().is_some() { "Cancel Edge" } else { "Add Edge" }}
					</button>
					<button on:click=move |_| remove_selected(false)>"Remove Edge"</button>
					<button on:click=reset_layout>"Reset Layout"</button>
					<button on:click=save_graph>"Save Graph"</button>
				</div>

				<div class="graph-container">
					<GraphCanvas
						session=session
						selection=selection
						pending_edge=pending_edge
						on_pick=on_pick
					/>
					<div class="graph-overlay">
						<ul class="legend">
							{VisualClass::ALL
								.into_iter()
								.map(|class| {
									view! {
										<li>
											<span
												class="swatch"
												style=format!("background: {}", class_color(class))
											></span>
											{class.name()}
										</li>
									}
								})
								.collect_view()}
						</ul>
						<span class="graph-size">
							{move || {
								let (nodes, edges) = graph_size.get();
								format!("{nodes} nodes, {edges} edges")
							}}
						</span>
					</div>
				</div>

				<Show when=move || status.get().is_some()>
					<p class="status">{move || status.get().unwrap_or_default()}</p>
				</Show>
			</section>

			<section class="code-panel">
				<textarea
					class="code-editor"
					spellcheck="false"
					prop:value=move || code.get()
					on:input=move |ev| code.set(event_target_value(&ev))
				></textarea>
				<div class="controls">
					<button
						on:click=run_code
						prop:disabled=move || {
							interpreter.get() != Interpreter::Ready || running_code.get()
						}
					>
						{move || if running_code.get() { "Running..." } else { "Run Code" }}
					</button>
					<button on:click=move |_| output.set(String::new())>"Clear"</button>
					<button on:click=move |_| output_open.update(|open| *open = !*open)>
						{move || if output_open.get() { "Hide Output" } else { "Show Output" }}
					</button>
					<span class="interpreter-status">
						{move || match interpreter.get() {
							Interpreter::Loading => "Loading Python interpreter…",
							Interpreter::Ready => "",
							Interpreter::Unavailable => {
								"Python interpreter unavailable. Reload the page to retry."
							}
						}}
					</span>
				</div>
				<Show when=move || output_open.get()>
					<pre class="output">{move || output.get()}</pre>
				</Show>
			</section>
		</div>
	}
}
