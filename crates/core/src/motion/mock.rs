//! Recording motion driver for host testing

use heapless::Vec;

use super::{MotionDriver, DEFAULT_MAX_ANGLE, DEFAULT_MAX_SPEED};
use crate::motor::MotorError;

/// Maximum number of commands kept by [`RecordingMotionDriver`]
pub const MAX_RECORDED_COMMANDS: usize = 256;

/// One command seen by the recording driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommandRecord {
    Translate { speed: f32, angle: f32 },
    Stop,
}

/// Motion driver that validates and records every command
///
/// Commands beyond [`MAX_RECORDED_COMMANDS`] are counted but not stored.
#[derive(Debug)]
pub struct RecordingMotionDriver {
    commands: Vec<MotionCommandRecord, MAX_RECORDED_COMMANDS>,
    total: usize,
    max_speed: f32,
    max_angle: f32,
}

impl RecordingMotionDriver {
    /// Driver with the default 0-100 / 0-360 domain
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_SPEED, DEFAULT_MAX_ANGLE)
    }

    /// Driver with custom limits
    pub fn with_limits(max_speed: f32, max_angle: f32) -> Self {
        Self {
            commands: Vec::new(),
            total: 0,
            max_speed,
            max_angle,
        }
    }

    /// Stored commands, oldest first
    pub fn commands(&self) -> &[MotionCommandRecord] {
        &self.commands
    }

    /// Total commands received, including ones not stored
    pub fn total(&self) -> usize {
        self.total
    }

    /// Most recent command
    pub fn last(&self) -> Option<MotionCommandRecord> {
        self.commands.last().copied()
    }

    fn record(&mut self, command: MotionCommandRecord) {
        self.total += 1;
        let _ = self.commands.push(command);
    }
}

impl Default for RecordingMotionDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionDriver for RecordingMotionDriver {
    fn translate(&mut self, speed: f32, angle: f32) -> Result<(), MotorError> {
        if !(0.0..=self.max_speed).contains(&speed) {
            return Err(MotorError::InvalidSpeed);
        }
        if !(0.0..=self.max_angle).contains(&angle) {
            return Err(MotorError::InvalidAngle);
        }
        self.record(MotionCommandRecord::Translate { speed, angle });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.record(MotionCommandRecord::Stop);
        Ok(())
    }

    fn max_speed(&self) -> f32 {
        self.max_speed
    }

    fn max_angle(&self) -> f32 {
        self.max_angle
    }
}
