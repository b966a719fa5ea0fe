//! Scripted sensor array for host testing

use heapless::Deque;

use super::{SensorArray, SensorError, SensorSnapshot};

/// Maximum number of queued frames
pub const MAX_SCRIPTED_FRAMES: usize = 32;

/// Sensor array that plays back a queue of snapshots
///
/// Each read pops the next frame. Once the queue is empty the last frame
/// is repeated forever, which makes "the line never comes back" feeds
/// trivial to express. Reads can be forced to fail for error-path tests.
#[derive(Debug, Default)]
pub struct ScriptedSensorArray {
    frames: Deque<SensorSnapshot, MAX_SCRIPTED_FRAMES>,
    last: SensorSnapshot,
    fail_with: Option<SensorError>,
    reads: usize,
    last_threshold: Option<u8>,
}

impl ScriptedSensorArray {
    /// Create an array that always reads `frame`
    pub fn constant(frame: SensorSnapshot) -> Self {
        Self {
            last: frame,
            ..Self::default()
        }
    }

    /// Create an array that plays `frames` in order, then repeats the last one
    ///
    /// # Panics
    ///
    /// If `frames` holds more than [`MAX_SCRIPTED_FRAMES`] snapshots; a
    /// truncated script would replay the wrong sequence.
    pub fn from_frames(frames: &[SensorSnapshot]) -> Self {
        assert!(
            frames.len() <= MAX_SCRIPTED_FRAMES,
            "{} frames scripted, at most {} fit",
            frames.len(),
            MAX_SCRIPTED_FRAMES
        );
        let mut array = Self::default();
        for frame in frames {
            let _ = array.push(*frame);
        }
        array
    }

    /// Queue one more frame
    ///
    /// Returns the frame back when the queue is full.
    pub fn push(&mut self, frame: SensorSnapshot) -> Result<(), SensorSnapshot> {
        self.frames.push_back(frame)
    }

    /// Make every subsequent read fail with `error`
    pub fn fail_with(&mut self, error: SensorError) {
        self.fail_with = Some(error);
    }

    /// Number of reads served so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Threshold passed to the latest `read_binary`
    pub fn last_threshold(&self) -> Option<u8> {
        self.last_threshold
    }

    fn next_frame(&mut self) -> Result<SensorSnapshot, SensorError> {
        if let Some(error) = self.fail_with {
            return Err(error);
        }
        self.reads += 1;
        if let Some(frame) = self.frames.pop_front() {
            self.last = frame;
        }
        Ok(self.last)
    }
}

impl SensorArray for ScriptedSensorArray {
    fn read_binary(&mut self, threshold: u8) -> Result<SensorSnapshot, SensorError> {
        self.last_threshold = Some(threshold);
        self.next_frame()
    }

    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        self.next_frame()
    }
}
