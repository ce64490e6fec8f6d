//! Algorithm visualizer: plays traversal traces from in-browser Python over a
//! graph canvas. Client-side app wiring and routes live here.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod catalog;
pub mod config;
pub mod graph;
pub mod playback;
pub mod runner;
pub mod trace;

// Modules
mod components;
mod pages;
mod session;

// Top-Level pages
use crate::pages::not_found::NotFound;
use crate::pages::visualizer::Visualizer;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the visualizer and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Algorithm Visualizer" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Visualizer />
			</Routes>
		</Router>
	}
}
