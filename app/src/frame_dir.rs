//! ABOUTME: Frame source replaying PNG/JPEG files from a directory
//! ABOUTME: Stands in for camera hardware when running the sensor on a workstation

use md_core::{Error, Result};
use md_vision::{utils::frame_from_image_bytes, FrameSource, OwnedFrame};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Cycles through the images of a directory in file-name order
#[derive(Debug)]
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
    released: u64,
}

impl ImageDirSource {
    /// Index the image files in `dir`
    #[instrument]
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "Frames directory does not exist: {}",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(Error::Config(format!(
                "No PNG or JPEG frames found in {}",
                dir.display()
            )));
        }

        paths.sort();
        info!(frames = paths.len(), dir = %dir.display(), "Frame directory indexed");

        Ok(Self {
            paths,
            next: 0,
            released: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

impl FrameSource for ImageDirSource {
    type Frame = OwnedFrame;

    fn acquire(&mut self) -> Result<OwnedFrame> {
        let path = &self.paths[self.next % self.paths.len()];
        self.next = self.next.wrapping_add(1);

        debug!(path = %path.display(), "Loading frame");
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Acquisition(format!("{}: {}", path.display(), e)))?;
        frame_from_image_bytes(&bytes)
            .map_err(|e| Error::Acquisition(format!("{}: {}", path.display(), e)))
    }

    fn release(&mut self, _frame: OwnedFrame) {
        self.released += 1;
    }
}
