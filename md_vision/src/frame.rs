//! ABOUTME: Frame views over packed RGB565 pixel buffers and the frame source seam
//! ABOUTME: Guarantees acquired frames are handed back to their source on every path

use md_core::{Error, Result};
use tracing::trace;

/// Bytes per packed 16-bit pixel
pub const BYTES_PER_PIXEL: usize = 2;

/// Borrowed, validated view of one frame: dimensions plus a big-endian RGB565 buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> FrameDescriptor<'a> {
    /// Wrap a pixel buffer, rejecting buffers too short for the stated dimensions
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let required = required_len(width, height)?;
        if data.len() < required {
            return Err(Error::Validation(format!(
                "Frame buffer holds {} bytes, {}x{} RGB565 needs {}",
                data.len(),
                width,
                height,
                required
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Read the packed pixel at `(x, y)`, or `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let bytes = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

fn required_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            Error::Validation(format!("Frame dimensions {}x{} overflow", width, height))
        })
}

/// Anything that can expose itself as a [`FrameDescriptor`]
pub trait Frame {
    fn descriptor(&self) -> FrameDescriptor<'_>;
}

impl Frame for FrameDescriptor<'_> {
    fn descriptor(&self) -> FrameDescriptor<'_> {
        *self
    }
}

/// Heap-owned RGB565 frame, used by software sources and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl OwnedFrame {
    /// Take ownership of a big-endian RGB565 byte buffer
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        FrameDescriptor::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a frame from row-major packed pixels
    pub fn from_pixels(width: u32, height: u32, pixels: &[u16]) -> Result<Self> {
        let data = pixels.iter().flat_map(|p| p.to_be_bytes()).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Frame for OwnedFrame {
    fn descriptor(&self) -> FrameDescriptor<'_> {
        FrameDescriptor {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Supplier of frames, typically a camera driver's buffer pool
pub trait FrameSource {
    type Frame: Frame;

    /// Borrow the next frame from the source
    fn acquire(&mut self) -> Result<Self::Frame>;

    /// Hand a previously acquired frame back to the source
    fn release(&mut self, frame: Self::Frame);
}

/// RAII guard over an acquired frame
///
/// The frame goes back to its source when the guard drops, so every exit path
/// after a successful acquire releases it exactly once. A failed acquire never
/// produces a guard and therefore never releases.
pub struct FrameGuard<'s, S: FrameSource> {
    source: &'s mut S,
    frame: Option<S::Frame>,
}

impl<'s, S: FrameSource> FrameGuard<'s, S> {
    pub fn acquire(source: &'s mut S) -> Result<Self> {
        let frame = source.acquire()?;
        trace!("Acquired frame");
        Ok(Self {
            source,
            frame: Some(frame),
        })
    }

    /// The held frame; only `None` once the guard has begun dropping
    pub fn frame(&self) -> Option<&S::Frame> {
        self.frame.as_ref()
    }
}

impl<S: FrameSource> Drop for FrameGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.source.release(frame);
            trace!("Released frame");
        }
    }
}
