//! Captured video frames.

use anyhow::{bail, Result};

/// Byte order of the three interleaved color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Native order of most capture devices.
    Bgr,
    /// Order expected by the hand-landmark model.
    Rgb,
}

/// One 8-bit, 3-channel, row-major frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width:  usize,
    pub height: usize,
    pub order:  ChannelOrder,
    pub data:   Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(width: usize, height: usize, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        let expected = width * height * Self::CHANNELS;
        if data.len() != expected {
            bail!(
                "frame {}x{} needs {} bytes, got {}",
                width, height, expected, data.len()
            );
        }
        Ok(Frame { width, height, order, data })
    }

    /// A black frame.
    pub fn blank(width: usize, height: usize, order: ChannelOrder) -> Self {
        Frame { width, height, order, data: vec![0; width * height * Self::CHANNELS] }
    }

    /// `(r, g, b)` of the pixel at `(x, y)`, regardless of channel order.
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * Self::CHANNELS;
        let (a, b, c) = (self.data[i], self.data[i + 1], self.data[i + 2]);
        Some(match self.order {
            ChannelOrder::Rgb => (a, b, c),
            ChannelOrder::Bgr => (c, b, a),
        })
    }

    /// Copy of this frame in RGB order.  Already-RGB frames are cloned as is.
    pub fn to_rgb(&self) -> Frame {
        match self.order {
            ChannelOrder::Rgb => self.clone(),
            ChannelOrder::Bgr => {
                let mut data = self.data.clone();
                for px in data.chunks_exact_mut(Self::CHANNELS) {
                    px.swap(0, 2);
                }
                Frame { width: self.width, height: self.height, order: ChannelOrder::Rgb, data }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
