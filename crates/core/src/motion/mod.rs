//! Motion driver abstraction
//!
//! The control core commands the chassis with a normalized translate speed
//! (0 to [`MotionDriver::max_speed`]) and a translate angle in degrees
//! (0 to [`MotionDriver::max_angle`]). How that becomes wheel power is the
//! driver's business; [`MecanumDrive`] is the implementation for the
//! four-wheel mecanum chassis.

pub mod mecanum;
pub mod mock;

pub use mecanum::{body_velocity, wheel_speeds, MecanumDrive};
pub use mock::{MotionCommandRecord, RecordingMotionDriver};

use crate::motor::MotorError;

/// Default speed ceiling of the drive, in driver units
pub const DEFAULT_MAX_SPEED: f32 = 100.0;

/// Default angle range of the drive, in degrees
pub const DEFAULT_MAX_ANGLE: f32 = 360.0;

/// Motion driver collaborator
pub trait MotionDriver {
    /// Translate the chassis at `speed` toward `angle` degrees
    ///
    /// # Errors
    ///
    /// Implementations reject values outside their documented domain and
    /// report motor faults as [`MotorError`].
    fn translate(&mut self, speed: f32, angle: f32) -> Result<(), MotorError>;

    /// Stop all motion
    ///
    /// # Errors
    ///
    /// Returns [`MotorError`] if the motors cannot be stopped.
    fn stop(&mut self) -> Result<(), MotorError> {
        self.translate(0.0, 0.0)
    }

    /// Highest accepted speed
    fn max_speed(&self) -> f32 {
        DEFAULT_MAX_SPEED
    }

    /// Highest accepted angle; computed angles are wrapped modulo this value
    fn max_angle(&self) -> f32 {
        DEFAULT_MAX_ANGLE
    }
}
