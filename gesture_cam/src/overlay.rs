//! Software-rendered annotation of a frame: the hand skeleton and the
//! gesture label.
//!
//! The canvas stores pixels as `0x00RRGGBB`, the layout `minifb` presents.
//! Every primitive clips against the canvas, so landmarks a detector places
//! slightly outside the frame are simply cut off.  Positions further out are
//! clamped to a one-canvas margin first, which bounds the work per edge.

use gesture_classifier::{HandLandmarks, HAND_CONNECTIONS};

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Style
// ════════════════════════════════════════════════════════════════════════════

pub const LABEL_COLOR:      u32 = 0x0000FF00;  // green
pub const CONNECTION_COLOR: u32 = 0x00E0E0E0;
pub const LANDMARK_COLOR:   u32 = 0x00FF0000;

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Left end of the label's baseline, in pixels.
    pub label_origin:     (usize, usize),
    pub label_color:      u32,
    /// Each font cell becomes a `label_scale`×`label_scale` block.
    pub label_scale:      usize,
    pub connection_color: u32,
    pub landmark_color:   u32,
    pub landmark_radius:  usize,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            label_origin:     (50, 50),
            label_color:      LABEL_COLOR,
            label_scale:      4,
            connection_color: CONNECTION_COLOR,
            landmark_color:   LANDMARK_COLOR,
            landmark_radius:  3,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    pub width:  usize,
    pub height: usize,
    pub buf:    Vec<u32>,
}

impl Canvas {
    pub fn blank(width: usize, height: usize, color: u32) -> Self {
        Canvas { width, height, buf: vec![color; width * height] }
    }

    pub fn from_frame(frame: &Frame) -> Self {
        let mut buf = Vec::with_capacity(frame.width * frame.height);
        for y in 0..frame.height {
            for x in 0..frame.width {
                let (r, g, b) = frame.rgb_at(x, y).unwrap_or((0, 0, 0));
                buf.push(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
            }
        }
        Canvas { width: frame.width, height: frame.height, buf }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.buf[y * self.width + x])
        } else {
            None
        }
    }

    /// Landmark position in pixels, within one canvas of the visible area.
    /// NaN maps to 0.
    fn to_pixel(&self, x: f32, y: f32) -> (isize, isize) {
        (clamp_axis(x, self.width), clamp_axis(y, self.height))
    }

    /// Skeleton edges first, then landmark discs on top.
    pub fn draw_hand(&mut self, hand: &HandLandmarks, style: &OverlayStyle) {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let p = self.to_pixel(hand[a].x, hand[a].y);
            let q = self.to_pixel(hand[b].x, hand[b].y);
            self.draw_line(p, q, style.connection_color);
            self.draw_line((p.0 + 1, p.1), (q.0 + 1, q.1), style.connection_color);
        }
        for lm in hand.iter() {
            let (cx, cy) = self.to_pixel(lm.x, lm.y);
            self.fill_disc(cx, cy, style.landmark_radius as isize, style.landmark_color);
        }
    }

    /// Draw `text` with its baseline starting at `origin`.
    pub fn draw_label(&mut self, text: &str, origin: (usize, usize), scale: usize, color: u32) {
        let scale = scale.max(1);
        let top = origin.1 as isize - (GLYPH_H * scale) as isize;
        let mut cx = origin.0 as isize;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        let x = cx + (col * scale) as isize;
                        let y = top + (row * scale) as isize;
                        self.fill_rect(x, y, scale, scale, color);
                    }
                }
            }
            cx += ((GLYPH_W + 1) * scale) as isize;
            if cx >= self.width as isize { break; }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        for row in y..y + h as isize {
            for col in x..x + w as isize {
                self.set_pixel(col, row, color);
            }
        }
    }

    fn fill_disc(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line, endpoints inclusive.
    fn draw_line(&mut self, from: (isize, isize), to: (isize, isize), color: u32) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == to.0 && y == to.1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }
}

fn clamp_axis(v: f32, extent: usize) -> isize {
    let extent = extent as isize;
    ((v * extent as f32).floor() as isize).clamp(-extent, 2 * extent)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

const GLYPH_W: usize = 3;
const GLYPH_H: usize = 5;

/// Each character is encoded as 5 rows × 3 bits, most significant bit left.
fn char_glyph(c: char) -> [u8; GLYPH_H] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'n' | 'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
