//! Leptos component wrapping the interactive diagram.
//!
//! Renders the container element, builds the diagram state and DOM
//! scaffold once mounted, and drives a `requestAnimationFrame` loop that
//! ticks the simulation and syncs the DOM after every live step. Mouse
//! events on the container feed the drag controller between frames;
//! cleanup stops the simulation so no timer outlives the diagram.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MouseEvent, Window};

use super::render::{self, RenderHandles};
use super::state::{DiagramState, LayoutConfig};
use super::types::GraphData;

/// Bundles the diagram state with the element handles it renders through.
struct DiagramContext {
	state: DiagramState,
	handles: RenderHandles,
}

/// Pointer coordinates of a mouse event in `container`-local space, which
/// is also the simulation's coordinate space.
fn local_pointer(ev: &MouseEvent, container: &HtmlElement) -> (f64, f64) {
	let rect = container.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Index of the node box the event landed on, if any, recovered from the
/// `node-{i}` element id.
fn node_index_of(ev: &MouseEvent) -> Option<usize> {
	let target: Element = ev.target()?.dyn_into().ok()?;
	let node_el = target.closest("[id^='node-']").ok()??;
	node_el.id().strip_prefix("node-")?.parse().ok()
}

/// Renders an interactive architecture diagram.
///
/// Pass graph data via the reactive `data` signal; invalid data (duplicate
/// ids, dangling link endpoints) is logged and renders nothing. The
/// component sizes itself from its container by default; explicit
/// `width`/`height` override measurement.
#[component]
pub fn Diagram(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let context: Rc<RefCell<Option<DiagramContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		let window: Window = web_sys::window().unwrap();

		let measured = (
			container.client_width() as f64,
			container.client_height() as f64,
		);
		let w = width.unwrap_or(if measured.0 > 0.0 { measured.0 } else { 600.0 });
		let h = height.unwrap_or(if measured.1 > 0.0 { measured.1 } else { 600.0 });

		let state = match DiagramState::new(&data.get(), w, h, LayoutConfig::default()) {
			Ok(state) => state,
			Err(e) => {
				error!("archflow: rejecting diagram data: {e}");
				return;
			}
		};

		// Reruns (data changes) rebuild the scaffold from scratch.
		container.set_inner_html("");
		let document = window.document().unwrap();
		let handles = match render::mount(&document, &container, &state) {
			Ok(handles) => handles,
			Err(e) => {
				error!("archflow: failed to build diagram DOM: {e:?}");
				return;
			}
		};
		render::sync(&state, &handles);

		*context_init.borrow_mut() = Some(DiagramContext { state, handles });

		// The frame loop is created once and reads whatever context is
		// current, so a data change swaps the model under a running loop.
		if animate_init.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut mounted = false;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.state.tick() {
					render::sync(&c.state, &c.handles);
				}
				mounted = true;
			}
			if mounted {
				if let Some(ref cb) = *animate_inner.borrow() {
					let _ = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_cleanup = context.clone();
	let cleanup = send_wrapper::SendWrapper::new(move || {
		let mut ctx = context_cleanup.borrow_mut();
		if let Some(ref mut c) = *ctx {
			c.state.sim.stop();
		}
		// Dropping the context makes the next scheduled frame bail out
		// without rescheduling.
		*ctx = None;
	});
	on_cleanup(move || cleanup.take()());

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		let Some(index) = node_index_of(&ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.drag_start(index, local_pointer(&ev, &container));
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: HtmlElement = container.into();
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.node.is_some() {
				c.state.drag_move(local_pointer(&ev, &container));
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.drag_end();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag_end();
		}
	};

	view! {
		<div
			node_ref=container_ref
			class="Container"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
		/>
	}
}
