//! DOM scaffolding and per-tick render sync.
//!
//! Builds the diagram's element tree once at mount: an SVG surface holding
//! a `Links` group and a `Dots` group, plus a `Nodes` div layer for the
//! positioned boxes. Every tick rewrites node positions and path strings
//! in place. Appearance beyond computed geometry is left to external CSS
//! keyed on the `Node`/`Link`/`Dot` role classes and type tags.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use super::geometry::{self, NodeBox};
use super::state::DiagramState;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Owned references to every element the diagram writes to: one box per
/// node, one path and one dot marker per link. Held by the component for
/// the diagram's lifetime, never shared through module state.
pub struct RenderHandles {
	pub nodes: Vec<HtmlElement>,
	pub paths: Vec<Element>,
	pub dots: Vec<Element>,
}

/// Creates the element tree under `container` and returns the handles the
/// sync loop writes through.
pub fn mount(
	document: &Document,
	container: &HtmlElement,
	state: &DiagramState,
) -> Result<RenderHandles, JsValue> {
	let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
	svg.set_attribute("width", "100%")?;
	svg.set_attribute("height", "100%")?;
	let links_layer = document.create_element_ns(Some(SVG_NS), "g")?;
	links_layer.set_attribute("class", "Links")?;
	let dots_layer = document.create_element_ns(Some(SVG_NS), "g")?;
	dots_layer.set_attribute("class", "Dots")?;
	svg.append_child(&links_layer)?;
	svg.append_child(&dots_layer)?;
	container.append_child(&svg)?;

	let nodes_layer = document.create_element("div")?;
	nodes_layer.set_class_name("Nodes");
	container.append_child(&nodes_layer)?;

	let mut nodes = Vec::with_capacity(state.sim.nodes().len());
	for (i, node) in state.sim.nodes().iter().enumerate() {
		let boxed = document.create_element("div")?;
		boxed.set_id(&format!("node-{i}"));
		boxed.set_class_name(&format!("Node {}", node.data.kind.css_class()));
		let label = document.create_element("p")?;
		label.set_text_content(Some(&node.data.id));
		boxed.append_child(&label)?;
		nodes_layer.append_child(&boxed)?;
		nodes.push(boxed.dyn_into::<HtmlElement>()?);
	}

	let mut paths = Vec::with_capacity(state.links.len());
	let mut dots = Vec::with_capacity(state.links.len());
	for (i, link) in state.links.iter().enumerate() {
		let group = document.create_element_ns(Some(SVG_NS), "g")?;
		group.set_attribute("class", &format!("Link {}", link.kind.css_class()))?;
		let path = document.create_element_ns(Some(SVG_NS), "path")?;
		path.set_id(&format!("link-{i}"));
		group.append_child(&path)?;
		links_layer.append_child(&group)?;
		paths.push(path);

		let dot = document.create_element_ns(Some(SVG_NS), "circle")?;
		dot.set_attribute("class", &format!("Dot {}", link.kind.css_class()))?;
		dot.set_attribute("r", "0.25rem")?;
		let motion = document.create_element_ns(Some(SVG_NS), "animateMotion")?;
		motion.set_attribute("dur", "1.6s")?;
		motion.set_attribute("repeatCount", "indefinite")?;
		let mpath = document.create_element_ns(Some(SVG_NS), "mpath")?;
		// Bound by id, so the marker stays attached however often the
		// path data is rewritten.
		mpath.set_attribute("href", &format!("#link-{i}"))?;
		motion.append_child(&mpath)?;
		dot.append_child(&motion)?;
		dots_layer.append_child(&dot)?;
		dots.push(dot);
	}

	Ok(RenderHandles { nodes, paths, dots })
}

/// Writes current simulation state into the DOM: node positions first,
/// then the recomputed curve for every link. A failed style or attribute
/// write degrades that element and nothing else.
pub fn sync(state: &DiagramState, handles: &RenderHandles) {
	for (node, handle) in state.sim.nodes().iter().zip(&handles.nodes) {
		let style = handle.style();
		let _ = style.set_property("left", &format!("{}px", node.x));
		let _ = style.set_property("top", &format!("{}px", node.y));
	}

	for (link, path) in state.links.iter().zip(&handles.paths) {
		let source = &state.sim.nodes()[link.source];
		let target = &state.sim.nodes()[link.target];
		let d = geometry::link_path(
			(source.x, source.y),
			(target.x, target.y),
			measure(&handles.nodes[link.source]),
			measure(&handles.nodes[link.target]),
		);
		let _ = path.set_attribute("d", &d);
	}
}

/// Box measurement of a rendered node. An element that has not been laid
/// out yet measures as zero-sized, which the geometry tolerates.
fn measure(handle: &HtmlElement) -> NodeBox {
	let rect = handle.get_bounding_client_rect();
	NodeBox {
		left: rect.x(),
		width: rect.width(),
	}
}
