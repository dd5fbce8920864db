use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use inkpad_engine::geometry::rotate_handle;
use inkpad_engine::EditorConfig;

use crate::state::View;

pub fn draw_overlay(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    view: &View,
    config: &EditorConfig,
) {
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.save();
    ctx.set_line_width(1.5);
    ctx.set_stroke_style_str("rgba(26, 31, 42, 0.65)");

    if view.lasso.len() > 1 {
        ctx.begin_path();
        let _ = ctx.set_line_dash(&js_sys::Array::of2(&4.into(), &6.into()));
        ctx.move_to(view.lasso[0].x, view.lasso[0].y);
        for point in &view.lasso[1..] {
            ctx.line_to(point.x, point.y);
        }
        ctx.stroke();
        let _ = ctx.set_line_dash(&js_sys::Array::new());
    }

    if let Some(bbox) = view.selection {
        ctx.stroke_rect(bbox.x, bbox.y, bbox.w, bbox.h);
        let handle = config.handle_size;
        for corner in bbox.corners() {
            draw_handle(ctx, corner.x, corner.y, handle);
        }
        let knob = rotate_handle(&bbox, config.rotate_handle_offset);
        ctx.begin_path();
        ctx.move_to(knob.x, bbox.y);
        ctx.line_to(knob.x, knob.y);
        ctx.stroke();
        draw_handle_circle(ctx, knob.x, knob.y, handle * 0.6);
    }

    if let Some((center, radius)) = view.eraser {
        ctx.set_stroke_style_str("rgba(228, 107, 73, 0.9)");
        ctx.set_fill_style_str("rgba(228, 107, 73, 0.12)");
        ctx.begin_path();
        let _ = ctx.arc(center.x, center.y, radius, 0.0, PI * 2.0);
        ctx.fill();
        ctx.stroke();
    }

    ctx.restore();
}

fn draw_handle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, size: f64) {
    let half = size / 2.0;
    ctx.set_fill_style_str("rgba(26, 31, 42, 0.85)");
    ctx.fill_rect(x - half, y - half, size, size);
}

fn draw_handle_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64) {
    ctx.set_fill_style_str("rgba(26, 31, 42, 0.85)");
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
    ctx.fill();
}
