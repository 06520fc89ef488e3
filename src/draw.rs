//! Declarative drawing primitives for the procedural icon.
//!
//! The design is described as a flat list of [`Primitive`]s in canvas pixel
//! coordinates and painted in order by [`rasterize`].

use crate::error::{IconError, Result};
use image::{Rgba, RgbaImage};
use std::f32::consts::PI;
use tiny_skia::{
    Color, FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

// Steam wisps rise c/10 in segments of c/80.
const STEAM_SEGMENTS: u32 = 8;
const STEAM_PHASE_CANVAS: f32 = 768.0;

// Cubic control-point offset for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

const BOOK: Rgba<u8> = Rgba([218, 165, 108, 255]);
const PAGE: Rgba<u8> = Rgba([252, 246, 235, 255]);
const TEXT_LINE: Rgba<u8> = Rgba([200, 190, 170, 255]);
const PLATE: Rgba<u8> = Rgba([240, 240, 240, 255]);
const PLATE_RIM: Rgba<u8> = Rgba([200, 200, 200, 255]);
const PASTA: Rgba<u8> = Rgba([255, 165, 0, 255]);
const TOMATO: Rgba<u8> = Rgba([220, 50, 50, 255]);
const SEED: Rgba<u8> = Rgba([255, 255, 200, 255]);
const BASIL: Rgba<u8> = Rgba([60, 179, 113, 255]);
const STEAM: Rgba<u8> = Rgba([220, 220, 220, 128]);

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn centered(cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        Self::new(cx - rx, cy - ry, cx + rx, cy + ry)
    }

    fn to_rect(self) -> Option<Rect> {
        Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Rgba<u8>,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Paint the whole canvas.
    Fill { color: Rgba<u8> },
    Rect { bounds: Bounds, color: Rgba<u8> },
    RoundedRect {
        bounds: Bounds,
        radius: f32,
        color: Rgba<u8>,
    },
    Ellipse {
        bounds: Bounds,
        color: Rgba<u8>,
        outline: Option<Outline>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgba<u8>,
    },
}

/// The recipe-book launcher design for a square canvas of `canvas` pixels.
pub fn recipe_book(canvas: u32, background: Rgba<u8>) -> Vec<Primitive> {
    let c = canvas as f32;
    let mut shapes = vec![Primitive::Fill { color: background }];

    let margin = c / 12.0;
    shapes.push(Primitive::RoundedRect {
        bounds: Bounds::new(margin, margin, c - margin, c - margin),
        radius: c / 8.0,
        color: BOOK,
    });

    let page = Bounds::new(c / 6.0, c / 5.0, c - c / 8.0, c - c / 8.0);
    shapes.push(Primitive::RoundedRect {
        bounds: page,
        radius: c / 24.0,
        color: PAGE,
    });

    // Ruled lines standing in for recipe text, each a little shorter.
    let text_x = page.left + c / 12.0;
    let text_y = page.top + c / 12.0;
    let line_start = text_y + c / 6.0;
    let line_end = page.right - c / 12.0;
    let line_height = (c / 256.0).max(2.0);
    for i in 0..4 {
        let y = line_start + i as f32 * c / 20.0;
        shapes.push(Primitive::Rect {
            bounds: Bounds::new(text_x, y, line_end - i as f32 * c / 30.0, y + line_height),
            color: TEXT_LINE,
        });
    }

    let (px, py) = (page.right - c / 4.0, page.bottom - c / 4.0);
    let plate_radius = c / 8.0;
    shapes.push(Primitive::Ellipse {
        bounds: Bounds::centered(px, py, plate_radius, plate_radius),
        color: PLATE,
        outline: Some(Outline {
            color: PLATE_RIM,
            width: (c / 170.0).max(1.0),
        }),
    });

    let strand_width = (c / 200.0).max(1.0);
    for i in 0..8 {
        let angle = i as f32 / 8.0 * 2.0 * PI;
        let inner = plate_radius * 0.3;
        let outer = plate_radius * 0.7;
        shapes.push(Primitive::Line {
            from: (px + inner * angle.cos(), py + inner * angle.sin()),
            to: (
                px + outer * (angle + 0.5).cos(),
                py + outer * (angle + 0.5).sin(),
            ),
            width: strand_width,
            color: PASTA,
        });
    }

    let tomato_radius = c / 30.0;
    let seed_radius = (c / 400.0).max(1.0);
    let tomatoes = [
        (px - plate_radius / 3.0, py - plate_radius / 4.0),
        (px + plate_radius / 4.0, py - plate_radius / 3.0),
        (px, py + plate_radius / 4.0),
    ];
    for (tx, ty) in tomatoes {
        shapes.push(Primitive::Ellipse {
            bounds: Bounds::centered(tx, ty, tomato_radius, tomato_radius),
            color: TOMATO,
            outline: None,
        });
        for quarter in 0..4 {
            let angle = quarter as f32 * PI / 2.0;
            let offset = tomato_radius / 4.0;
            shapes.push(Primitive::Ellipse {
                bounds: Bounds::centered(
                    tx + offset * angle.cos(),
                    ty + offset * angle.sin(),
                    seed_radius,
                    seed_radius,
                ),
                color: SEED,
                outline: None,
            });
        }
    }

    let leaf = c / 40.0;
    shapes.push(Primitive::Ellipse {
        bounds: Bounds::centered(
            px + plate_radius / 6.0,
            py - plate_radius / 6.0,
            leaf,
            leaf / 2.0,
        ),
        color: BASIL,
        outline: None,
    });

    // Steam: three wavy polylines rising from the plate.
    let steam_x = px - plate_radius / 2.0;
    let steam_y = py - plate_radius;
    let amplitude = c / 60.0;
    let steam_width = (c / 512.0).max(1.0);
    // Wave phase is tuned on a 768px canvas and scaled so every density
    // shows the same number of periods.
    let phase_scale = STEAM_PHASE_CANVAS / c;
    for i in 0..3u32 {
        let x_offset = i as f32 * c / 40.0;
        let points: Vec<(f32, f32)> = (0..=STEAM_SEGMENTS)
            .map(|k| {
                let y = k as f32 * c / 80.0;
                let wave = ((y * phase_scale + i as f32 * 20.0) * 0.1).sin() * amplitude;
                (steam_x + x_offset + wave, steam_y - y)
            })
            .collect();
        for pair in points.windows(2) {
            shapes.push(Primitive::Line {
                from: pair[0],
                to: pair[1],
                width: steam_width,
                color: STEAM,
            });
        }
    }

    shapes
}

/// Paint `primitives` in order onto a transparent `canvas`×`canvas` image.
pub fn rasterize(primitives: &[Primitive], canvas: u32) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(canvas, canvas).ok_or_else(|| {
        IconError::InvalidConfig(format!("can't allocate a {canvas}x{canvas} canvas"))
    })?;

    for primitive in primitives {
        match *primitive {
            Primitive::Fill { color } => {
                pixmap.fill(Color::from_rgba8(color[0], color[1], color[2], color[3]));
            }
            Primitive::Rect { bounds, color } => {
                if let Some(rect) = bounds.to_rect() {
                    pixmap.fill_path(
                        &PathBuilder::from_rect(rect),
                        &paint(color),
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Primitive::RoundedRect {
                bounds,
                radius,
                color,
            } => {
                if let Some(path) = rounded_rect_path(bounds, radius) {
                    fill(&mut pixmap, &path, color);
                }
            }
            Primitive::Ellipse {
                bounds,
                color,
                outline,
            } => {
                let Some(path) = bounds.to_rect().and_then(PathBuilder::from_oval) else {
                    continue;
                };
                fill(&mut pixmap, &path, color);
                if let Some(outline) = outline {
                    let stroke = Stroke {
                        width: outline.width,
                        ..Default::default()
                    };
                    pixmap.stroke_path(
                        &path,
                        &paint(outline.color),
                        &stroke,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Primitive::Line {
                from,
                to,
                width,
                color,
            } => {
                let mut pb = PathBuilder::new();
                pb.move_to(from.0, from.1);
                pb.line_to(to.0, to.1);
                let Some(path) = pb.finish() else {
                    continue;
                };
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
            }
        }
    }

    // tiny-skia stores premultiplied alpha; image expects straight alpha.
    let mut out = RgbaImage::new(canvas, canvas);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

fn paint(color: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn fill(pixmap: &mut Pixmap, path: &Path, color: Rgba<u8>) {
    pixmap.fill_path(
        path,
        &paint(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn rounded_rect_path(b: Bounds, radius: f32) -> Option<Path> {
    let r = radius
        .min((b.right - b.left) / 2.0)
        .min((b.bottom - b.top) / 2.0)
        .max(0.0);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(b.left + r, b.top);
    pb.line_to(b.right - r, b.top);
    pb.cubic_to(b.right - r + k, b.top, b.right, b.top + r - k, b.right, b.top + r);
    pb.line_to(b.right, b.bottom - r);
    pb.cubic_to(
        b.right,
        b.bottom - r + k,
        b.right - r + k,
        b.bottom,
        b.right - r,
        b.bottom,
    );
    pb.line_to(b.left + r, b.bottom);
    pb.cubic_to(b.left + r - k, b.bottom, b.left, b.bottom - r + k, b.left, b.bottom - r);
    pb.line_to(b.left, b.top + r);
    pb.cubic_to(b.left, b.top + r - k, b.left + r - k, b.top, b.left + r, b.top);
    pb.close();
    pb.finish()
}
