use constellation::{css_rgba, Surface, Vec2};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

/// `Surface` backed by a canvas 2D context.
///
/// Coordinates are CSS pixels; the backing store is scaled by the device
/// pixel ratio in [`fit`](Self::fit).
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context. `None` when the canvas cannot provide one.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Option<Self>, JsValue> {
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let ctx = ctx.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from)?;
        Ok(Some(Self { ctx }))
    }

    /// Match the backing store to the canvas's laid-out size.
    /// Returns the size in CSS pixels.
    pub fn fit(&self, window: &Window, canvas: &HtmlCanvasElement) -> Result<(f32, f32), JsValue> {
        let (mut width, mut height) = (canvas.client_width() as f64, canvas.client_height() as f64);
        if width <= 0.0 || height <= 0.0 {
            // Not laid out yet: cover the viewport.
            width = window.inner_width()?.as_f64().unwrap_or(0.0);
            height = window.inner_height()?.as_f64().unwrap_or(0.0);
        }
        let dpr = window.device_pixel_ratio().max(1.0);
        canvas.set_width((width * dpr).round() as u32);
        canvas.set_height((height * dpr).round() as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        Ok((width as f32, height as f32))
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, std::f64::consts::TAU);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, rgb: [u8; 3], alpha: f32) {
        self.ctx.set_stroke_style_str(&css_rgba(rgb, alpha));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn stroke_fading_line(&mut self, tail: Vec2, head: Vec2, width: f32, rgb: [u8; 3], alpha: f32) {
        let gradient = self
            .ctx
            .create_linear_gradient(tail.x as f64, tail.y as f64, head.x as f64, head.y as f64);
        let _ = gradient.add_color_stop(0.0, &css_rgba(rgb, 0.0));
        let _ = gradient.add_color_stop(1.0, &css_rgba(rgb, alpha));
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(tail.x as f64, tail.y as f64);
        self.ctx.line_to(head.x as f64, head.y as f64);
        self.ctx.stroke();
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, rgb: [u8; 3], alpha: f32) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &css_rgba(rgb, alpha));
        let _ = gradient.add_color_stop(1.0, &css_rgba(rgb, 0.0));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }
}
