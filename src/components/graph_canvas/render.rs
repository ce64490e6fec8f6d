use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, NODE_RADIUS};
use crate::graph::ElementRef;
use crate::playback::{VisualClass, VisualState};

const BACKGROUND: &str = "#1a1a2e";
const NODE_FILL: &str = "#2d3a5c";
const EDGE_STROKE: &str = "rgba(100, 180, 255, 0.6)";
const SELECTED_RING: &str = "#ff9800";
const PENDING_RING: &str = "rgba(255, 152, 0, 0.5)";

/// Colour used for each traversal class, also shown in the legend.
pub fn class_color(class: VisualClass) -> &'static str {
	match class {
		VisualClass::Highlighted => "#61bffc",
		VisualClass::Visited => "#4caf50",
		VisualClass::Current => "#ff5722",
		VisualClass::StackMember => "#ffc107",
		VisualClass::QueueMember => "#9c27b0",
	}
}

/// Strongest class wins.
fn dominant(visual: &VisualState, element: &ElementRef) -> Option<VisualClass> {
	[
		VisualClass::Current,
		VisualClass::StackMember,
		VisualClass::QueueMember,
		VisualClass::Visited,
		VisualClass::Highlighted,
	]
	.into_iter()
	.find(|class| visual.has(element, *class))
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(
	state: &CanvasState,
	visual: &VisualState,
	selected: Option<&ElementRef>,
	pending_edge: Option<&str>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	draw_edges(state, &positions, visual, selected, ctx);
	draw_nodes(state, visual, selected, pending_edge, ctx);
	ctx.restore();
}

fn draw_edges(
	state: &CanvasState,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	visual: &VisualState,
	selected: Option<&ElementRef>,
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let element = ElementRef::edge(edge.id.as_str());
		let class = dominant(visual, &element);
		let is_selected = selected == Some(&element);
		let color = if is_selected {
			SELECTED_RING
		} else {
			class.map(class_color).unwrap_or(EDGE_STROKE)
		};
		let width = if class.is_some() || is_selected {
			line_width * 2.5
		} else {
			line_width
		};

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		// animated dashes mark edges the traversal has not reached yet
		if class.is_none() {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(color);
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(weight) = edge.weight {
			let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			let _ = ctx.fill_text(&format_weight(weight), mx - uy * 10.0, my + ux * 10.0);
		}
	}
}

fn draw_nodes(
	state: &CanvasState,
	visual: &VisualState,
	selected: Option<&ElementRef>,
	pending_edge: Option<&str>,
	ctx: &CanvasRenderingContext2d,
) {
	let (t, k) = (ease_out_cubic(state.hover.highlight_t), state.transform.k);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let id = node.data.user_data.id.as_str();
		let element = ElementRef::node(id);
		let (x, y) = (node.x() as f64, node.y() as f64);

		let is_hovered = state.is_hovered(idx);
		let is_neighbor = state.hover.neighbors.contains(&idx);
		let radius = if is_hovered {
			NODE_RADIUS * (1.0 + 0.25 * t)
		} else if is_neighbor {
			NODE_RADIUS * (1.0 + 0.1 * t)
		} else {
			NODE_RADIUS
		};

		if is_hovered && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, radius * 2.5) {
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.3 * t));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 2.5, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(dominant(visual, &element).map(class_color).unwrap_or(NODE_FILL));
		ctx.fill();

		let ring = if selected == Some(&element) {
			Some(SELECTED_RING)
		} else if pending_edge == Some(id) {
			Some(PENDING_RING)
		} else {
			None
		};
		if let Some(ring) = ring {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(ring);
			ctx.set_line_width(3.0 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("bold {}px sans-serif", 12.0 / k.max(0.5)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(id, x, y);
		ctx.set_text_align("start");
		ctx.set_text_baseline("alphabetic");
	});
}

fn format_weight(weight: f64) -> String {
	if weight.fract() == 0.0 {
		format!("{weight:.0}")
	} else {
		format!("{weight}")
	}
}
