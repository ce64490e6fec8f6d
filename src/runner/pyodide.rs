use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::entry::{EntryCall, EntryConventions, resolve_entry};
use super::error::RunError;

/// What a run produced: captured stdout plus the entry call's return value.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
	pub stdout: String,
	pub entry: Option<EntryCall>,
	pub value: Option<serde_json::Value>,
}

/// Handle to the Pyodide interpreter loaded by `index.html`.
#[derive(Clone)]
pub struct PyodideRunner {
	pyodide: JsValue,
}

impl PyodideRunner {
	/// Wait for the page's `pyodideReady` promise.
	pub async fn connect() -> Result<Self, RunError> {
		let window = web_sys::window().ok_or(RunError::InterpreterUnavailable)?;
		let ready = Reflect::get(&window, &JsValue::from_str("pyodideReady"))
			.ok()
			.and_then(|p| p.dyn_into::<Promise>().ok())
			.ok_or(RunError::InterpreterUnavailable)?;
		let pyodide = JsFuture::from(ready)
			.await
			.map_err(|_| RunError::InterpreterUnavailable)?;
		if pyodide.is_undefined() || pyodide.is_null() {
			return Err(RunError::InterpreterUnavailable);
		}
		info!("Python interpreter ready");
		Ok(Self { pyodide })
	}

	/// Execute `source`, then evaluate its entry call and decode the result as JSON.
	///
	/// Source errors fail the run. A missing entry point is not an error: the
	/// output simply carries no value.
	pub async fn run(
		&self,
		source: &str,
		conventions: &EntryConventions,
		start_node: &str,
	) -> Result<RunOutput, RunError> {
		let stdout = Rc::new(RefCell::new(String::new()));
		let sink = stdout.clone();
		let on_line = Closure::<dyn FnMut(String)>::new(move |line: String| {
			let mut out = sink.borrow_mut();
			out.push_str(&line);
			out.push('\n');
		});
		self.set_stdout(Some(&on_line))?;

		let result = self.execute(source, conventions, start_node).await;
		self.set_stdout(None)?;
		drop(on_line);

		let (entry, value) = result?;
		let stdout = stdout.borrow().clone();
		Ok(RunOutput {
			stdout,
			entry,
			value,
		})
	}

	async fn execute(
		&self,
		source: &str,
		conventions: &EntryConventions,
		start_node: &str,
	) -> Result<(Option<EntryCall>, Option<serde_json::Value>), RunError> {
		let promise = self
			.method("runPythonAsync")?
			.call1(&self.pyodide, &JsValue::from_str(source))
			.map_err(js_error)?
			.dyn_into::<Promise>()
			.map_err(js_error)?;
		JsFuture::from(promise).await.map_err(js_error)?;

		let Some(entry) = resolve_entry(source, conventions, start_node) else {
			debug!("no entry point found in submitted source");
			return Ok((None, None));
		};
		debug!("evaluating {}", entry.expression);
		let wrapped = format!(
			"__import__('json').dumps({}, default=list)",
			entry.expression
		);
		let text = self
			.method("runPython")?
			.call1(&self.pyodide, &JsValue::from_str(&wrapped))
			.map_err(|err| RunError::EntryCall(entry.function.clone(), js_message(&err)))?
			.as_string()
			.ok_or_else(|| RunError::EntryCall(entry.function.clone(), "no value".into()))?;
		let value = serde_json::from_str(&text)?;
		Ok((Some(entry), Some(value)))
	}

	/// Route stdout lines to `batched`, or back to the console with `None`.
	fn set_stdout(&self, batched: Option<&Closure<dyn FnMut(String)>>) -> Result<(), RunError> {
		let set_stdout = self.method("setStdout")?;
		match batched {
			Some(callback) => {
				let options = Object::new();
				Reflect::set(&options, &JsValue::from_str("batched"), callback.as_ref())
					.map_err(js_error)?;
				set_stdout.call1(&self.pyodide, &options)
			}
			None => set_stdout.call0(&self.pyodide),
		}
		.map_err(js_error)?;
		Ok(())
	}

	fn method(&self, name: &str) -> Result<Function, RunError> {
		Reflect::get(&self.pyodide, &JsValue::from_str(name))
			.ok()
			.and_then(|f| f.dyn_into::<Function>().ok())
			.ok_or(RunError::InterpreterUnavailable)
	}
}

fn js_error(err: JsValue) -> RunError {
	RunError::Execution(js_message(&err))
}

fn js_message(err: &JsValue) -> String {
	err.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| err.as_string())
		.unwrap_or_else(|| format!("{err:?}"))
}
