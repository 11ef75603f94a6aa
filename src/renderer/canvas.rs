//! Canvas 2D backend

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCmd, NET_DASH};

const FOREGROUND: &str = "white";
const BALL_CORE: &str = "green";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Returns `None` if the canvas has no 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    pub fn draw(&self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            self.draw_one(cmd);
        }
    }

    fn draw_one(&self, cmd: &DrawCmd) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear { size } => {
                ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
            }
            DrawCmd::DashedLine { from, to } => {
                let dash = js_sys::Array::of2(
                    &JsValue::from_f64(NET_DASH[0] as f64),
                    &JsValue::from_f64(NET_DASH[1] as f64),
                );
                ctx.set_stroke_style_str(FOREGROUND);
                let _ = ctx.set_line_dash(&dash);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
                let _ = ctx.set_line_dash(&js_sys::Array::new());
            }
            DrawCmd::Rect { pos, size } => {
                ctx.set_fill_style_str(FOREGROUND);
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::Ball { center, radius } => {
                let (x, y, r) = (center.x as f64, center.y as f64, *radius as f64);
                // Highlight sits slightly below center
                match ctx.create_radial_gradient(x, y + 5.0, 2.0, x, y + 5.0, r) {
                    Ok(gradient) => {
                        let _ = gradient.add_color_stop(0.0, BALL_CORE);
                        let _ = gradient.add_color_stop(1.0, FOREGROUND);
                        ctx.set_fill_style_canvas_gradient(&gradient);
                    }
                    Err(_) => ctx.set_fill_style_str(FOREGROUND),
                }
                ctx.begin_path();
                let _ = ctx.arc(x, y, r, 0.0, std::f64::consts::TAU);
                ctx.fill();
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                centered,
            } => {
                ctx.set_font(size.font());
                ctx.set_fill_style_str(FOREGROUND);
                let mut x = pos.x as f64;
                if *centered {
                    if let Ok(metrics) = ctx.measure_text(text) {
                        x -= metrics.width() / 2.0;
                    }
                }
                let _ = ctx.fill_text(text, x, pos.y as f64);
            }
        }
    }
}
