//! Mecanum drive
//!
//! Holonomic translation on four mecanum wheels in X configuration.
//! Angle 0 is the chassis x axis and angles grow toward the chassis y axis.
//!
//! # Wheel Mixing
//!
//! With `s = speed / max_speed`, `vx = s cos(angle)`, `vy = s sin(angle)`:
//!
//! | Wheel       | Speed     |
//! |-------------|-----------|
//! | front left  | `vx - vy` |
//! | front right | `vx + vy` |
//! | back left   | `vx + vy` |
//! | back right  | `vx - vy` |
//!
//! All four are scaled down together when any exceeds 1.0, so the direction
//! of travel is preserved at the cost of top speed on diagonals.

use libm::{cosf, fabsf, sinf};

use super::{MotionDriver, DEFAULT_MAX_ANGLE, DEFAULT_MAX_SPEED};
use crate::motor::{Motor, MotorError, MotorGroup};

/// Wheel speeds `[front_left, front_right, back_left, back_right]` for a
/// translate command
pub fn wheel_speeds(speed: f32, angle_deg: f32, max_speed: f32) -> [f32; 4] {
    let s = if max_speed > 0.0 { speed / max_speed } else { 0.0 };
    let rad = angle_deg.to_radians();
    let vx = s * cosf(rad);
    let vy = s * sinf(rad);

    let mut wheels = [vx - vy, vx + vy, vx + vy, vx - vy];
    let peak = wheels.iter().fold(0.0f32, |acc, w| acc.max(fabsf(*w)));
    if peak > 1.0 {
        for w in wheels.iter_mut() {
            *w /= peak;
        }
    }
    wheels
}

/// Chassis velocity `(vx, vy)` as a fraction of full speed, recovered from
/// wheel speeds (forward kinematics of [`wheel_speeds`])
pub fn body_velocity(wheels: &[f32; 4]) -> (f32, f32) {
    let [fl, fr, bl, br] = *wheels;
    ((fl + fr + bl + br) / 4.0, (-fl + fr + bl - br) / 4.0)
}

/// Mecanum chassis implementing [`MotionDriver`]
pub struct MecanumDrive<M: Motor> {
    group: MotorGroup<M>,
    armed: bool,
    max_speed: f32,
    max_angle: f32,
    last_command: Option<(f32, f32)>,
}

impl<M: Motor> MecanumDrive<M> {
    /// Create a disarmed drive with the default 0-100 speed and 0-360 angle range
    pub fn new(group: MotorGroup<M>) -> Self {
        Self {
            group,
            armed: false,
            max_speed: DEFAULT_MAX_SPEED,
            max_angle: DEFAULT_MAX_ANGLE,
            last_command: None,
        }
    }

    /// Allow the motors to run
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop the motors and refuse further translate commands
    ///
    /// # Errors
    ///
    /// Returns [`MotorError`] if the motors cannot be stopped.
    pub fn disarm(&mut self) -> Result<(), MotorError> {
        self.armed = false;
        self.stop()
    }

    /// Whether translate commands are accepted
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Last accepted `(speed, angle)` command
    pub fn last_command(&self) -> Option<(f32, f32)> {
        self.last_command
    }

    /// The underlying motors
    pub fn motors(&self) -> &MotorGroup<M> {
        &self.group
    }
}

impl<M: Motor> MotionDriver for MecanumDrive<M> {
    fn translate(&mut self, speed: f32, angle: f32) -> Result<(), MotorError> {
        if !speed.is_finite() || !(0.0..=self.max_speed).contains(&speed) {
            return Err(MotorError::InvalidSpeed);
        }
        if !angle.is_finite() || !(0.0..=self.max_angle).contains(&angle) {
            return Err(MotorError::InvalidAngle);
        }

        let wheels = wheel_speeds(speed, angle, self.max_speed);
        self.group.set_group_speed(&wheels, self.armed)?;
        self.last_command = Some((speed, angle));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.group.stop_all()?;
        self.last_command = Some((0.0, 0.0));
        Ok(())
    }

    fn max_speed(&self) -> f32 {
        self.max_speed
    }

    fn max_angle(&self) -> f32 {
        self.max_angle
    }
}
