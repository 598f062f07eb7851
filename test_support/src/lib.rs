//! ABOUTME: Shared testing utilities and helper functions
//! ABOUTME: Deterministic clock, scripted frame source, and recording sink doubles

use md_core::{Clock, Error, Result};
use md_vision::{FrameSource, OwnedFrame, StateSink};
use std::cell::Cell;
use std::collections::VecDeque;

/// Packed pixel that decodes to grayscale 49, the brightest value
pub const WHITE: u16 = 0xFFFF;
/// Packed pixel that decodes to grayscale 36
pub const GREEN: u16 = 0x07E0;
/// Packed pixel that decodes to grayscale 9
pub const RED: u16 = 0xF800;
/// Packed pixel that decodes to grayscale 0
pub const BLACK: u16 = 0x0000;

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

/// Frame source that replays a fixed script; `None` entries fail acquisition
#[derive(Debug, Default)]
pub struct ScriptedFrameSource {
    script: VecDeque<Option<OwnedFrame>>,
    acquired: usize,
    released: usize,
    failures: usize,
}

impl ScriptedFrameSource {
    pub fn new(script: impl IntoIterator<Item = Option<OwnedFrame>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Script of frames that all acquire successfully
    pub fn from_frames(frames: impl IntoIterator<Item = OwnedFrame>) -> Self {
        Self::new(frames.into_iter().map(Some))
    }

    pub fn push(&mut self, frame: Option<OwnedFrame>) {
        self.script.push_back(frame);
    }

    pub fn acquired(&self) -> usize {
        self.acquired
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Frames acquired but not yet handed back
    pub fn outstanding(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl FrameSource for ScriptedFrameSource {
    type Frame = OwnedFrame;

    fn acquire(&mut self) -> Result<OwnedFrame> {
        match self.script.pop_front() {
            Some(Some(frame)) => {
                self.acquired += 1;
                Ok(frame)
            }
            Some(None) => {
                self.failures += 1;
                Err(Error::Acquisition("scripted failure".to_string()))
            }
            None => {
                self.failures += 1;
                Err(Error::Acquisition("script exhausted".to_string()))
            }
        }
    }

    fn release(&mut self, _frame: OwnedFrame) {
        self.released += 1;
    }
}

/// Sink that remembers every published decision
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub published: Vec<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateSink for RecordingSink {
    fn publish(&mut self, motion: bool) {
        self.published.push(motion);
    }
}
