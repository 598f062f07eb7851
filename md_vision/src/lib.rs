//! ABOUTME: Region-of-interest motion detection over packed RGB565 frames
//! ABOUTME: Sparse luminance sampling compared against the previous cycle, rate limited

pub mod decision;
pub mod detector;
pub mod frame;
pub mod luminance;
pub mod params;
pub mod rate_limiter;
pub mod region;
pub mod sampling;
pub mod sensor;

pub use detector::{CycleReport, MotionDetector};
pub use frame::{Frame, FrameDescriptor, FrameGuard, FrameSource, OwnedFrame};
pub use params::{ColdStartPolicy, DetectionParameters};
pub use rate_limiter::RateLimiter;
pub use region::{map_region, RegionConfig, RegionRect};
pub use sampling::{SampleBuffer, SampleGrid};
pub use sensor::{MotionSensor, PollOutcome, StateSink, TracingSink};

// Re-export image types for hosts and benchmarks
pub use image;

/// Helpers for building synthetic RGB565 frames
pub mod utils {
    use crate::frame::OwnedFrame;
    use crate::luminance::rgb565_from_rgb8;
    use image::RgbImage;
    use md_core::{Error, Result};

    /// Frame where every pixel has the same packed value
    pub fn uniform_frame(width: u32, height: u32, pixel: u16) -> Result<OwnedFrame> {
        frame_with_patch(width, height, pixel, 0, 0, 0, 0, pixel)
    }

    /// Frame with a rectangular patch painted over a uniform background
    #[allow(clippy::too_many_arguments)]
    pub fn frame_with_patch(
        width: u32,
        height: u32,
        background: u16,
        patch_x: u32,
        patch_y: u32,
        patch_width: u32,
        patch_height: u32,
        patch: u16,
    ) -> Result<OwnedFrame> {
        let patch_x_end = patch_x.saturating_add(patch_width);
        let patch_y_end = patch_y.saturating_add(patch_height);

        let capacity = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(2))
            .ok_or_else(|| {
                Error::Validation(format!("Frame dimensions {}x{} overflow", width, height))
            })?;

        let mut data = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                let inside = (patch_x..patch_x_end).contains(&x) && (patch_y..patch_y_end).contains(&y);
                let pixel = if inside { patch } else { background };
                data.extend_from_slice(&pixel.to_be_bytes());
            }
        }

        OwnedFrame::new(width, height, data)
    }

    /// Convert an 8-bit RGB image to a big-endian RGB565 frame
    pub fn frame_from_rgb_image(img: &RgbImage) -> Result<OwnedFrame> {
        let data = img
            .pixels()
            .flat_map(|p| rgb565_from_rgb8(p[0], p[1], p[2]).to_be_bytes())
            .collect();
        OwnedFrame::new(img.width(), img.height(), data)
    }

    /// Decode PNG/JPEG bytes into an RGB565 frame
    pub fn frame_from_image_bytes(bytes: &[u8]) -> Result<OwnedFrame> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| Error::Image(format!("Failed to decode image: {}", e)))?;
        frame_from_rgb_image(&img.to_rgb8())
    }
}
