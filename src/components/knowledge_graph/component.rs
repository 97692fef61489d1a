use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::GraphHandle;
use super::render;

/// The animation frame currently requested for a canvas, if any.
type PendingFrame = StoredValue<Option<AnimationFrameRequestHandle>>;

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Ticks and draws once per animation frame. Each frame requests the next
/// one; cancelling the pending request ends the loop and releases `graph`.
fn run_frames(graph: GraphHandle, ctx: CanvasRenderingContext2d, pending: PendingFrame) {
	let next = request_animation_frame_with_handle(move || {
		{
			let mut state = graph.borrow_mut();
			state.tick();
			render::draw(&render::project(&state), &ctx);
		}
		run_frames(graph, ctx, pending);
	});
	match next {
		Ok(frame) => {
			if !keep_pending(pending, frame) {
				frame.cancel();
			}
		}
		Err(_) => warn!("requestAnimationFrame unavailable, graph animation stopped"),
	}
}

/// Records the newest frame request. `false` once the canvas is gone.
fn keep_pending<H: Send + Sync + 'static>(slot: StoredValue<Option<H>>, frame: H) -> bool {
	slot.try_update_value(|pending| *pending = Some(frame)).is_some()
}

fn take_pending<H: Send + Sync + 'static>(slot: StoredValue<Option<H>>) -> Option<H> {
	slot.try_update_value(Option::take).flatten()
}

/// Canvas view of a shared knowledge graph. Ticks the simulation once per
/// animation frame and forwards pointer input to the graph state.
#[component]
pub fn KnowledgeGraphCanvas(
	graph: GraphHandle,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let pending: PendingFrame = StoredValue::new(None);
	let graph_init = graph.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(480.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("Canvas 2d context unavailable");
				return;
			}
		};
		graph_init.borrow_mut().resize(w, h);

		if fullscreen {
			let graph_resize = graph_init.clone();
			let listener = window_event_listener(leptos::ev::resize, move |_| {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas.set_width(nw as u32);
				canvas.set_height(nh as u32);
				graph_resize.borrow_mut().resize(nw, nh);
			});
			on_cleanup(move || listener.remove());
		}

		run_frames(graph_init.clone(), ctx, pending);
		on_cleanup(move || {
			if let Some(frame) = take_pending(pending) {
				frame.cancel();
			}
		});
	});

	let graph_md = graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			graph_md.borrow_mut().pointer_down(x, y);
		}
	};

	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			graph_mm.borrow_mut().pointer_move(x, y);
		}
	};

	let graph_mu = graph.clone();
	let on_mouseup = move |_: MouseEvent| {
		graph_mu.borrow_mut().pointer_up();
	};

	let graph_ml = graph.clone();
	let on_mouseleave = move |_: MouseEvent| {
		graph_ml.borrow_mut().pointer_leave();
	};

	let graph_wh = graph;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			graph_wh.borrow_mut().zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
