//! archflow: interactive force-directed architecture diagrams.
//!
//! This crate provides a WASM-based diagram component that renders a small
//! set of typed nodes (services, queues) and the directed relationships
//! between them. A force simulation lays the diagram out, traveling dot
//! markers animate along each curved link, and nodes can be dragged while
//! their neighbors react live.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::diagram::{
	Diagram, GraphData, GraphError, GraphLink, GraphNode, LinkKind, NodeKind,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("archflow: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"archflow: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("archflow: failed to parse graph data: {}", e);
			None
		}
	}
}

/// The dataset rendered when the page embeds no `graph-data` script: a
/// small service pipeline feeding a queue.
fn sample_graph_data() -> GraphData {
	GraphData {
		nodes: vec![
			GraphNode {
				id: "Registry".to_string(),
				kind: NodeKind::Service,
			},
			GraphNode {
				id: "Initializer".to_string(),
				kind: NodeKind::Service,
			},
			GraphNode {
				id: "Finaliser".to_string(),
				kind: NodeKind::Service,
			},
			GraphNode {
				id: "Queue1".to_string(),
				kind: NodeKind::Queue,
			},
		],
		links: vec![
			GraphLink {
				source: "Registry".to_string(),
				target: "Initializer".to_string(),
				kind: LinkKind::Solid,
			},
			GraphLink {
				source: "Initializer".to_string(),
				target: "Finaliser".to_string(),
				kind: LinkKind::Solid,
			},
			GraphLink {
				source: "Finaliser".to_string(),
				target: "Queue1".to_string(),
				kind: LinkKind::Dashed,
			},
		],
	}
}

/// Main application component.
/// Loads graph data from the DOM (or the built-in sample) and renders the
/// interactive diagram.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(sample_graph_data);
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Architecture Diagram" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="App">
			<h1>"Architecture"</h1>
			<Diagram data=graph_signal />
		</div>
	}
}
