use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Path2d};

use jigsaw_core::{Piece, Session};

const SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.45)";
const SHADOW_BLUR: f64 = 8.0;
const SHADOW_OFFSET: f64 = 3.0;
const OUTLINE_COLOR: &str = "rgba(255, 255, 255, 0.35)";
const SELECTED_OUTLINE_COLOR: &str = "rgba(255, 230, 120, 0.9)";

/// Draws a session onto a 2D canvas. Outline paths are built once per piece
/// since shapes never change after construction.
pub(crate) struct CanvasView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
    paths: Vec<Path2d>,
}

impl CanvasView {
    pub(crate) fn new(
        canvas: HtmlCanvasElement,
        image: HtmlImageElement,
        session: &Session,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let (width, height) = session.board().canvas_size();
        canvas.set_width(width.round() as u32);
        canvas.set_height(height.round() as u32);
        let paths = session
            .board()
            .pieces()
            .iter()
            .map(|piece| Path2d::new_with_path_string(&piece.outline.to_svg_path()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            canvas,
            ctx,
            image,
            paths,
        })
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub(crate) fn render(&self, session: &Session, now_ms: f64) {
        let ctx = &self.ctx;
        ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        let selected = session.controller().selected();
        let board = session.board();
        for index in board.paint_order().iter() {
            let (Some(piece), Some(path)) = (board.piece(index), self.paths.get(index)) else {
                continue;
            };
            let position = session
                .display_position(index, now_ms)
                .unwrap_or(piece.current_position);
            if let Err(err) = self.draw_piece(piece, path, position, selected == Some(index)) {
                gloo::console::warn!("canvas: piece draw failed", err);
            }
        }
        self.draw_particles(session);
    }

    fn draw_piece(
        &self,
        piece: &Piece,
        path: &Path2d,
        position: (f32, f32),
        selected: bool,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(f64::from(position.0), f64::from(position.1))?;
        if !piece.locked {
            ctx.save();
            ctx.set_shadow_color(SHADOW_COLOR);
            ctx.set_shadow_blur(SHADOW_BLUR);
            ctx.set_shadow_offset_x(SHADOW_OFFSET);
            ctx.set_shadow_offset_y(SHADOW_OFFSET);
            ctx.set_fill_style_str("#000");
            ctx.fill_with_path_2d(path);
            ctx.restore();
        }
        ctx.save();
        ctx.clip_with_path_2d(path);
        let sample = piece.sample_rect;
        let bleed_x = -piece.sample_offset.0;
        let bleed_y = -piece.sample_offset.1;
        let drawn = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            &self.image,
            f64::from(sample.x),
            f64::from(sample.y),
            f64::from(sample.width),
            f64::from(sample.height),
            f64::from(piece.sample_offset.0),
            f64::from(piece.sample_offset.1),
            f64::from(piece.width + bleed_x * 2.0),
            f64::from(piece.height + bleed_y * 2.0),
        );
        ctx.restore();
        if !piece.locked {
            ctx.set_line_width(if selected { 2.0 } else { 1.0 });
            ctx.set_stroke_style_str(if selected {
                SELECTED_OUTLINE_COLOR
            } else {
                OUTLINE_COLOR
            });
            ctx.stroke_with_path(path);
        }
        ctx.restore();
        drawn
    }

    fn draw_particles(&self, session: &Session) {
        let ctx = &self.ctx;
        for particle in session.particles().particles() {
            ctx.set_fill_style_str(&particle.css_color());
            ctx.begin_path();
            let arc = ctx.arc(
                f64::from(particle.position.0),
                f64::from(particle.position.1),
                f64::from(particle.size),
                0.0,
                TAU,
            );
            if arc.is_ok() {
                ctx.fill();
            }
        }
    }
}
