//! Chart Component
//!
//! Usage bar chart using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use chatbot::controllers::ChartPoint;

/// Bar chart of usage totals, one bar per record
#[component]
pub fn UsageChart(
    #[prop(into)]
    points: Signal<Vec<ChartPoint>>,
    color: &'static str,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Redraw whenever the points change
    create_effect(move |_| {
        let points = points.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &points, color);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="300"
                class="w-full h-64 rounded-lg"
            />
        </div>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, points: &[ChartPoint], color: &str) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 60.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas
    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if points.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No usage for selected range", width / 2.0 - 100.0, height / 2.0);
        return;
    }

    // Bars start at zero
    let max = points
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };

    // Horizontal grid lines (5 lines)
    ctx.set_stroke_style(&"#e5e7eb".into()); // gray-200
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 5.0) * y_max;
        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }

    let slot = chart_width / points.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);

    // Thin out x labels so they don't overlap
    let label_every = (points.len() / 10).max(1);

    for (i, point) in points.iter().enumerate() {
        let bar_height = (point.value / y_max) * chart_height;
        let x = margin_left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = margin_top + chart_height - bar_height;

        ctx.set_fill_style(&color.into());
        ctx.fill_rect(x, y, bar_width, bar_height);

        if i % label_every == 0 {
            ctx.set_fill_style(&"#6b7280".into());
            let _ = ctx.fill_text(&point.label, x, height - 10.0);
        }
    }
}
