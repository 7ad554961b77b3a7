//! Webcam capture through OpenCV (feature = "camera").

use anyhow::{bail, Context, Result};
use opencv::{core::Mat, prelude::*, videoio};
use tracing::{info, warn};

use crate::frame::{ChannelOrder, Frame};
use crate::source::FrameSource;

/// Frames from a capture device, in the device's native BGR order.
///
/// A failed or empty read ends the stream.  The device is released when
/// the source is dropped.
pub struct CameraSource {
    cap: videoio::VideoCapture,
}

impl CameraSource {
    pub fn open(device: i32) -> Result<Self> {
        let cap = videoio::VideoCapture::new(device, videoio::CAP_ANY)
            .with_context(|| format!("opening capture device {}", device))?;
        if !cap.is_opened()? {
            bail!("capture device {} could not be opened", device);
        }
        info!(device, "camera opened");
        Ok(CameraSource { cap })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut mat = Mat::default();
        match self.cap.read(&mut mat) {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "camera read failed");
                return Ok(None);
            }
        }
        if mat.empty() {
            return Ok(None);
        }
        if mat.channels() != Frame::CHANNELS as i32 {
            bail!("expected a {}-channel frame, got {}", Frame::CHANNELS, mat.channels());
        }

        let width = mat.cols() as usize;
        let height = mat.rows() as usize;
        let data = mat.data_bytes()?.to_vec();
        Frame::new(width, height, ChannelOrder::Bgr, data).map(Some)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.cap.release() {
            warn!(error = %e, "releasing camera");
        }
    }
}
