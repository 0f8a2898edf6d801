//! Free-hand signature canvas
//!
//! Keeps two views of the same drawing: a white-filled RGBA raster used for
//! the empty-signature guard, and the recorded stroke list used for vector
//! export. Pointer and touch input are handled identically once their client
//! coordinates are translated from the canvas bounding box.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fmt::Write as _;

/// Fixed stroke width in canvas pixels
pub const STROKE_WIDTH: f32 = 2.0;

const WHITE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// On-screen bounding box of the canvas element, in client coordinates
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

pub struct SignatureCanvas {
    width: u32,
    height: u32,
    /// RGBA rows, white until drawn on
    pixels: Vec<u8>,
    strokes: Vec<Vec<Point>>,
}

impl SignatureCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: Vec::new(),
            strokes: Vec::new(),
        };
        canvas.fill_white();
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Translate client (pointer or touch) coordinates into canvas space,
    /// scaling for any difference between the raster size and the on-screen
    /// box.
    pub fn translate(&self, rect: BoundingBox, client_x: f32, client_y: f32) -> Point {
        let scale_x = self.width as f32 / rect.width;
        let scale_y = self.height as f32 / rect.height;
        Point {
            x: (client_x - rect.left) * scale_x,
            y: (client_y - rect.top) * scale_y,
        }
    }

    /// Start a new stroke at `p`. A stroke of a single point still leaves a
    /// round dot thanks to the round cap.
    pub fn begin_stroke(&mut self, p: Point) {
        self.strokes.push(vec![p]);
        self.stamp(p);
    }

    /// Continue the current stroke to `p`. Without an open stroke this
    /// starts one.
    pub fn extend_stroke(&mut self, p: Point) {
        let last = match self.strokes.last_mut() {
            Some(stroke) => {
                let prev = *stroke.last().expect("stroke is never empty");
                stroke.push(p);
                prev
            }
            None => {
                self.begin_stroke(p);
                return;
            }
        };
        self.draw_segment(last, p);
    }

    /// True iff any pixel differs from the white background.
    pub fn has_ink(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[..3] != WHITE[..3])
    }

    /// Refill white and drop all recorded strokes.
    pub fn clear(&mut self) {
        self.fill_white();
        self.strokes.clear();
    }

    /// Vector export: white background plus one 2px round-cap round-join
    /// black path per stroke.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = write!(
            svg,
            r##"<rect width="{}" height="{}" fill="#FFFFFF"/>"##,
            self.width, self.height
        );
        for stroke in &self.strokes {
            let mut d = String::new();
            for (i, p) in stroke.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{:.1} {:.1}", cmd, p.x, p.y);
            }
            // A lone point needs a zero-length segment for the cap to show
            if stroke.len() == 1 {
                let p = stroke[0];
                let _ = write!(d, "L{:.1} {:.1}", p.x + 0.01, p.y);
            }
            let _ = write!(
                svg,
                r##"<path d="{}" fill="none" stroke="#000000" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"##,
                d, STROKE_WIDTH
            );
        }
        svg.push_str("</svg>");
        svg
    }

    /// The SVG export as a base64 `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            BASE64.encode(self.to_svg().as_bytes())
        )
    }

    fn fill_white(&mut self) {
        let len = (self.width * self.height * 4) as usize;
        self.pixels = WHITE.repeat(len / 4);
    }

    /// Rasterize a segment by stamping round pen tips along it.
    fn draw_segment(&mut self, a: Point, b: Point) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let length = (dx * dx + dy * dy).sqrt();
        let steps = (length / 0.5).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(Point {
                x: a.x + dx * t,
                y: a.y + dy * t,
            });
        }
    }

    /// Stamp a filled disk of radius STROKE_WIDTH/2 at `p`.
    fn stamp(&mut self, p: Point) {
        let radius = STROKE_WIDTH / 2.0;
        let min_x = (p.x - radius).floor().max(0.0) as i64;
        let max_x = (p.x + radius).ceil().min(self.width as f32 - 1.0) as i64;
        let min_y = (p.y - radius).floor().max(0.0) as i64;
        let max_y = (p.y + radius).ceil().min(self.height as f32 - 1.0) as i64;
        if min_x > max_x || min_y > max_y {
            return;
        }

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let cx = px as f32 + 0.5 - p.x;
                let cy = py as f32 + 0.5 - p.y;
                if cx * cx + cy * cy <= radius * radius {
                    let idx = ((py as u32 * self.width + px as u32) * 4) as usize;
                    self.pixels[idx..idx + 4].copy_from_slice(&BLACK);
                }
            }
        }
    }
}
