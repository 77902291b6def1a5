use super::wheel_utils::slice_color;
use shared::wheel::{slice_angle_for, WheelOption};
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

const CANVAS_SIZE: u32 = 500;
const LABEL_INSET: f64 = 20.0;

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub options: Vec<WheelOption>,
    pub rotation: f64,
    pub is_spinning: bool,
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn is_dark_mode() -> bool {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| el.class_list().contains("dark"))
        .unwrap_or(false)
}

fn draw_placeholder(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_font("20px 'Segoe UI', Roboto, system-ui, sans-serif");
    ctx.set_fill_style_str(if is_dark_mode() { "#ffffff" } else { "#374151" });
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("Add some food", width / 2.0, height / 2.0);
}

fn draw_slices(
    ctx: &CanvasRenderingContext2d,
    options: &[WheelOption],
    rotation: f64,
    center: (f64, f64),
    radius: f64,
) {
    let Ok(slice) = slice_angle_for(options.len()) else {
        return;
    };

    ctx.save();
    let _ = ctx.translate(center.0, center.1);
    let _ = ctx.rotate(rotation);

    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
    ctx.set_line_width(2.0);

    for (index, option) in options.iter().enumerate() {
        let start = index as f64 * slice;
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        let _ = ctx.arc(0.0, 0.0, radius, start, start + slice);
        ctx.set_fill_style_str(slice_color(index));
        ctx.fill();
        ctx.stroke();

        ctx.save();
        let _ = ctx.rotate(start + slice / 2.0);
        ctx.set_text_align("right");
        ctx.set_text_baseline("alphabetic");
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 20px 'Segoe UI', Roboto, system-ui, sans-serif");
        ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
        ctx.set_shadow_blur(3.0);
        let _ = ctx.fill_text(&option.label, radius - LABEL_INSET, 5.0);
        ctx.restore();
    }

    ctx.restore();
}

/// Fixed pointer at the top, pointing down into the wheel.
fn draw_pointer(ctx: &CanvasRenderingContext2d, center: (f64, f64), radius: f64, glowing: bool) {
    ctx.save();
    ctx.set_shadow_color(if glowing {
        "rgba(255, 215, 130, 0.8)"
    } else {
        "rgba(255, 215, 0, 0.6)"
    });
    ctx.set_shadow_blur(if glowing { 10.0 } else { 4.0 });
    ctx.begin_path();
    ctx.move_to(center.0, center.1 - radius + 18.0);
    ctx.line_to(center.0 - 14.0, center.1 - radius - 8.0);
    ctx.line_to(center.0 + 14.0, center.1 - radius - 8.0);
    ctx.close_path();
    ctx.set_fill_style_str("#fbbf24");
    ctx.fill();
    ctx.restore();
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(
            (props.options.clone(), props.rotation, props.is_spinning),
            move |(options, rotation, is_spinning)| {
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    if let Some(ctx) = context_2d(&canvas) {
                        let width = canvas.width() as f64;
                        let height = canvas.height() as f64;
                        ctx.clear_rect(0.0, 0.0, width, height);

                        if options.is_empty() {
                            draw_placeholder(&ctx, width, height);
                        } else {
                            let center = (width / 2.0, height / 2.0);
                            // Leave room for the pointer above the rim
                            let radius = width.min(height) / 2.0 - 12.0;
                            draw_slices(&ctx, options, *rotation, center, radius);

                            // Hub
                            ctx.begin_path();
                            let _ = ctx.arc(center.0, center.1, radius * 0.08, 0.0, 2.0 * PI);
                            ctx.set_fill_style_str("#ffffff");
                            ctx.fill();

                            draw_pointer(&ctx, center, radius, *is_spinning);
                        }
                    } else {
                        log::error!("Canvas 2d context unavailable");
                    }
                }
                || ()
            },
        );
    }

    html! {
        <canvas
            ref={canvas_ref}
            width={CANVAS_SIZE.to_string()}
            height={CANVAS_SIZE.to_string()}
            class="max-w-full h-auto mx-auto"
        />
    }
}
