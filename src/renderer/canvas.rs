//! Canvas2D layers for confetti, hearts, heart morph, fx and the scratch card

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::Viewport;
use crate::sim::scratch::{SCRATCH_COLS, SCRATCH_ROWS};
use crate::sim::{FxItem, FxKind, HeartMorph, Particle, SceneState, ScratchCard};

/// Element ids of the particle layers
pub const CONFETTI_CANVAS: &str = "confettiCanvas";
pub const HEARTS_CANVAS: &str = "heartsCanvas";
pub const MORPH_CANVAS: &str = "morphCanvas";
pub const FX_CANVAS: &str = "fxCanvas";
pub const SCRATCH_CANVAS: &str = "scratchCanvas";

/// Foil color of the scratch card
const SCRATCH_FOIL: &str = "#c9a3ad";

struct Layer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Layer {
    fn find(document: &Document, id: &str) -> Option<Self> {
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self { canvas, ctx })
    }

    /// Backing store in device pixels, CSS box in CSS pixels
    fn fit(&self, viewport: &Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
        let css_w = viewport.width / viewport.dpr;
        let css_h = viewport.height / viewport.dpr;
        let _ = self.canvas.set_attribute(
            "style",
            &format!("width:{css_w}px;height:{css_h}px"),
        );
    }

    fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }
}

fn hsla(hue: f32, sat: u32, light: f32, alpha: f32) -> String {
    format!(
        "hsla({:.0}, {}%, {:.0}%, {:.3})",
        hue.rem_euclid(360.0),
        sat,
        light,
        alpha.clamp(0.0, 1.0)
    )
}

/// Draws the scene's particle pools. Missing canvases are skipped.
pub struct CanvasRenderer {
    confetti: Option<Layer>,
    hearts: Option<Layer>,
    morph: Option<Layer>,
    fx: Option<Layer>,
    scratch: Option<Layer>,
    /// Last scratch coverage drawn (cells cleared)
    scratch_drawn: Option<f32>,
}

impl CanvasRenderer {
    pub fn new(document: &Document) -> Self {
        let layer = |id: &str| {
            let layer = Layer::find(document, id);
            if layer.is_none() {
                log::warn!("Canvas #{id} missing - layer disabled");
            }
            layer
        };
        Self {
            confetti: layer(CONFETTI_CANVAS),
            hearts: layer(HEARTS_CANVAS),
            morph: layer(MORPH_CANVAS),
            fx: layer(FX_CANVAS),
            scratch: layer(SCRATCH_CANVAS),
            scratch_drawn: None,
        }
    }

    fn particle_layers(&self) -> impl Iterator<Item = &Layer> {
        [&self.confetti, &self.hearts, &self.morph, &self.fx]
            .into_iter()
            .flatten()
    }

    /// Resize every particle layer to the viewport
    pub fn resize(&mut self, viewport: &Viewport) {
        for layer in self.particle_layers() {
            layer.fit(viewport);
        }
        if let Some(layer) = &self.scratch {
            let w = layer.canvas.client_width().max(1) as u32;
            let h = layer.canvas.client_height().max(1) as u32;
            layer.canvas.set_width((w as f32 * viewport.dpr) as u32);
            layer.canvas.set_height((h as f32 * viewport.dpr) as u32);
        }
        self.scratch_drawn = None;
    }

    /// Scratch canvas bounds in client coordinates (left, top, width, height)
    pub fn scratch_rect(&self) -> Option<(f32, f32, f32, f32)> {
        let rect = self.scratch.as_ref()?.canvas.get_bounding_client_rect();
        Some((
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    pub fn render(&mut self, state: &SceneState) {
        let dpr = state.viewport.dpr;
        if let Some(layer) = &self.confetti {
            layer.clear();
            for p in &state.confetti.particles {
                draw_confetti(&layer.ctx, p);
            }
        }
        if let Some(layer) = &self.hearts {
            layer.clear();
            for p in &state.hearts.particles {
                draw_heart(&layer.ctx, p.pos.x, p.pos.y, p.size, p.alpha);
            }
        }
        if let Some(layer) = &self.morph {
            // Formation stays hidden until the morph starts
            if state.morph.is_active() {
                layer.clear();
                draw_morph(&layer.ctx, &state.morph, dpr);
            }
        }
        if let Some(layer) = &self.fx {
            layer.clear();
            for item in &state.fx.items {
                draw_fx(&layer.ctx, item);
            }
        }
        let cleared = state.scratch.cleared_fraction();
        if self.scratch_drawn != Some(cleared) {
            if let Some(layer) = &self.scratch {
                draw_scratch(layer, &state.scratch);
            }
            self.scratch_drawn = Some(cleared);
        }
    }
}

fn draw_confetti(ctx: &CanvasRenderingContext2d, p: &Particle) {
    let size = p.size as f64;
    ctx.save();
    let _ = ctx.translate(p.pos.x as f64, p.pos.y as f64);
    let _ = ctx.rotate(((p.pos.x + p.pos.y) * 0.01) as f64);
    ctx.set_fill_style_str(&hsla(p.hue, 90, 60.0, 0.95));
    ctx.fill_rect(-size, -size, size * 2.0, size * 2.0);
    ctx.restore();
}

/// Bezier heart centred on (x, y), `size` pixels per unit
fn draw_heart(ctx: &CanvasRenderingContext2d, x: f32, y: f32, size: f32, alpha: f32) {
    ctx.save();
    let _ = ctx.translate(x as f64, y as f64);
    let _ = ctx.scale(size as f64, size as f64);
    ctx.begin_path();
    ctx.move_to(0.0, -0.5);
    ctx.bezier_curve_to(0.5, -1.2, 1.8, -0.1, 0.0, 1.0);
    ctx.bezier_curve_to(-1.8, -0.1, -0.5, -1.2, 0.0, -0.5);
    ctx.set_fill_style_str(&format!("rgba(255, 61, 110, {:.3})", alpha.clamp(0.0, 1.0)));
    ctx.fill();
    ctx.restore();
}

fn draw_morph(ctx: &CanvasRenderingContext2d, morph: &HeartMorph, dpr: f32) {
    let e = morph.eased();
    let alpha = 0.35 + 0.45 * e;
    for (i, p) in morph.particles.iter().enumerate() {
        let light = 60.0 + (i as f32).sin() * 10.0;
        ctx.set_fill_style_str(&hsla(p.hue, 90, light, alpha));
        ctx.begin_path();
        let r = (p.size * dpr * (0.8 + e)) as f64;
        let _ = ctx.arc(p.pos.x as f64, p.pos.y as f64, r, 0.0, TAU);
        ctx.fill();
    }
}

fn draw_fx(ctx: &CanvasRenderingContext2d, item: &FxItem) {
    let alpha = item.alpha();
    if alpha <= 0.0 {
        return;
    }
    let (x, y, size) = (item.pos.x as f64, item.pos.y as f64, item.size as f64);
    match item.kind {
        FxKind::Bokeh => {
            ctx.set_fill_style_str(&hsla(item.hue, 80, 75.0, alpha));
            ctx.begin_path();
            let _ = ctx.arc(x, y, size, 0.0, TAU);
            ctx.fill();
        }
        FxKind::Twinkle => {
            // Four-point star
            ctx.set_fill_style_str(&hsla(item.hue, 60, 92.0, alpha));
            ctx.begin_path();
            ctx.move_to(x, y - size * 2.0);
            ctx.line_to(x + size * 0.4, y - size * 0.4);
            ctx.line_to(x + size * 2.0, y);
            ctx.line_to(x + size * 0.4, y + size * 0.4);
            ctx.line_to(x, y + size * 2.0);
            ctx.line_to(x - size * 0.4, y + size * 0.4);
            ctx.line_to(x - size * 2.0, y);
            ctx.line_to(x - size * 0.4, y - size * 0.4);
            ctx.close_path();
            ctx.fill();
        }
        FxKind::Ribbon => {
            ctx.save();
            let _ = ctx.translate(x, y);
            let _ = ctx.rotate((item.phase.cos() * 0.6) as f64);
            ctx.set_fill_style_str(&hsla(item.hue, 85, 65.0, alpha));
            ctx.fill_rect(-size * 0.3, -size * 2.0, size * 0.6, size * 4.0);
            ctx.restore();
        }
        FxKind::Orbit | FxKind::Spark | FxKind::Rocket => {
            let light = if item.kind == FxKind::Rocket { 85.0 } else { 65.0 };
            ctx.set_fill_style_str(&hsla(item.hue, 95, light, alpha));
            ctx.begin_path();
            let _ = ctx.arc(x, y, size, 0.0, TAU);
            ctx.fill();
        }
    }
}

fn draw_scratch(layer: &Layer, card: &ScratchCard) {
    layer.clear();
    if card.is_revealed() {
        return;
    }
    let w = layer.canvas.width() as f64;
    let h = layer.canvas.height() as f64;
    let cell_w = w / SCRATCH_COLS as f64;
    let cell_h = h / SCRATCH_ROWS as f64;
    layer.ctx.set_fill_style_str(SCRATCH_FOIL);
    for row in 0..SCRATCH_ROWS {
        for col in 0..SCRATCH_COLS {
            if card.is_covered(col, row) {
                // Overlap by a pixel so seams don't show
                layer.ctx.fill_rect(
                    col as f64 * cell_w,
                    row as f64 * cell_h,
                    cell_w + 1.0,
                    cell_h + 1.0,
                );
            }
        }
    }
}

/// Normalized card position of a client-space point, if it lies on the card
pub fn to_card_space(rect: (f32, f32, f32, f32), client_x: f32, client_y: f32) -> Option<glam::Vec2> {
    let (left, top, width, height) = rect;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let p = glam::Vec2::new((client_x - left) / width, (client_y - top) / height);
    (p.x >= 0.0 && p.x <= 1.0 && p.y >= 0.0 && p.y <= 1.0).then_some(p)
}

