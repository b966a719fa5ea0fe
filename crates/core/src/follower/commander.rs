//! Motion synthesis from the two loop errors
//!
//! The front error steers the translate speed and the back error steers
//! the translate angle. Out-of-domain results are clamped or wrapped here
//! and never reported as errors, so a transient overshoot cannot halt the
//! control loop.

use crate::log_trace;
use crate::motion::MotionDriver;
use crate::motor::MotorError;

/// Nominal translate speed with zero front error
const BASE_TRANSLATE_SPEED: f32 = 80.0;

/// Front error units per unit of speed
const FRONT_ERROR_DIVISOR: f32 = 16.0;

/// Degrees of translate angle per unit of back error
const BACK_ERROR_DEG_PER_UNIT: f32 = 180.0 / 16.0;

/// Upper bound of both speeds on any driver
const SPEED_CEILING: f32 = 100.0;

/// One synthesized motion command in driver-native units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionCommand {
    /// Translate speed in [0, min(max_speed, 100)]
    pub translate_speed: f32,
    /// Translate angle, degrees in [0, max_angle)
    pub translate_angle: f32,
    /// Rotate speed in [0, min(max_speed, 100)]
    ///
    /// Computed for a future compound move; not dispatched.
    pub rotate_speed: f32,
}

impl MotionCommand {
    /// Send the translate part of this command to `driver`
    pub fn dispatch<D: MotionDriver>(&self, driver: &mut D) -> Result<(), MotorError> {
        driver.translate(self.translate_speed, self.translate_angle)
    }
}

/// Non-finite values become `default`, finite ones are clamped
fn sanitize(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if !value.is_finite() {
        return default;
    }
    value.clamp(min, max)
}

/// Highest speed the driver accepts, capped at [`SPEED_CEILING`]
///
/// A driver reporting a non-finite or negative limit gets 0.
fn speed_limit(max_speed: f32) -> f32 {
    if max_speed.is_finite() && max_speed > 0.0 {
        max_speed.min(SPEED_CEILING)
    } else {
        0.0
    }
}

/// Wrap an angle into [0, max_angle)
///
/// Non-finite angles and drivers without a positive finite angle range
/// give 0.
fn wrap_angle(angle: f32, max_angle: f32) -> f32 {
    if !angle.is_finite() || !max_angle.is_finite() || max_angle <= 0.0 {
        return 0.0;
    }
    let wrapped = libm::fmodf(angle, max_angle);
    let wrapped = if wrapped < 0.0 {
        wrapped + max_angle
    } else {
        wrapped
    };
    // -tiny + max_angle can round up to max_angle in f32
    if wrapped >= max_angle {
        0.0
    } else {
        wrapped
    }
}

/// Turn the front and back loop errors into a command inside the domain
/// of a driver reporting `max_speed` and `max_angle`
pub fn synthesize(front_error: f32, back_error: f32, max_speed: f32, max_angle: f32) -> MotionCommand {
    let ceiling = speed_limit(max_speed);
    let raw_translate = BASE_TRANSLATE_SPEED - front_error / FRONT_ERROR_DIVISOR;
    // Rotate speed is taken from the unclamped translate speed
    let rotate_speed = sanitize(SPEED_CEILING - raw_translate, 0.0, ceiling, 0.0);
    let translate_speed = sanitize(raw_translate, 0.0, ceiling, 0.0);

    let raw_angle = back_error * BACK_ERROR_DEG_PER_UNIT;
    let translate_angle = wrap_angle(raw_angle, max_angle);
    log_trace!("translate angle {} -> {}", raw_angle, translate_angle);

    MotionCommand {
        translate_speed,
        translate_angle,
        rotate_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{MotionCommandRecord, RecordingMotionDriver};

    fn full_range(front: f32, back: f32) -> MotionCommand {
        synthesize(front, back, 100.0, 360.0)
    }

    fn assert_in_domain(cmd: &MotionCommand) {
        assert!((0.0..=100.0).contains(&cmd.translate_speed), "{:?}", cmd);
        assert!((0.0..=100.0).contains(&cmd.rotate_speed), "{:?}", cmd);
        assert!((0.0..360.0).contains(&cmd.translate_angle), "{:?}", cmd);
    }

    #[test]
    fn test_zero_error() {
        let cmd = full_range(0.0, 0.0);
        assert_eq!(cmd.translate_speed, 80.0);
        assert_eq!(cmd.rotate_speed, 20.0);
        assert_eq!(cmd.translate_angle, 0.0);
    }

    #[test]
    fn test_front_error_scales_speed() {
        let cmd = full_range(16.0, 0.0);
        assert_eq!(cmd.translate_speed, 79.0);
        assert_eq!(cmd.rotate_speed, 21.0);

        let cmd = full_range(-160.0, 0.0);
        assert_eq!(cmd.translate_speed, 90.0);
        assert_eq!(cmd.rotate_speed, 10.0);
    }

    #[test]
    fn test_back_error_sets_angle() {
        assert_eq!(full_range(0.0, 8.0).translate_angle, 90.0);
        assert_eq!(full_range(0.0, -8.0).translate_angle, 270.0);
        assert_eq!(full_range(0.0, -1.0).translate_angle, 348.75);
    }

    #[test]
    fn test_extreme_errors_stay_in_domain() {
        for front in [-1000.0, -16.0, 0.0, 16.0, 1000.0, 1.0e9, -1.0e9] {
            for back in [-1000.0, -19.0, -1.0, 0.0, 1.0, 19.0, 1000.0, 1.0e9] {
                assert_in_domain(&full_range(front, back));
            }
        }
    }

    #[test]
    fn test_extreme_front_error_saturates() {
        let fast = full_range(-1000.0, 0.0);
        assert_eq!(fast.translate_speed, 100.0);
        // Rotate speed comes from the unclamped translate speed
        assert_eq!(fast.rotate_speed, 0.0);

        let slow = full_range(1000.0, 0.0);
        assert_eq!(slow.translate_speed, 17.5);
        assert_eq!(slow.rotate_speed, 82.5);

        let stopped = full_range(2000.0, 0.0);
        assert_eq!(stopped.translate_speed, 0.0);
        assert_eq!(stopped.rotate_speed, 100.0);
    }

    #[test]
    fn test_non_finite_errors() {
        let cmd = full_range(f32::NAN, f32::INFINITY);
        assert_in_domain(&cmd);
        assert_eq!(cmd.translate_speed, 0.0);
        assert_eq!(cmd.translate_angle, 0.0);
    }

    #[test]
    fn test_dispatch_forwards_translate_only() {
        let mut driver = RecordingMotionDriver::new();
        full_range(0.0, 8.0).dispatch(&mut driver).unwrap();
        assert_eq!(
            driver.last(),
            Some(MotionCommandRecord::Translate {
                speed: 80.0,
                angle: 90.0
            })
        );
        assert_eq!(driver.total(), 1);
    }

    #[test]
    fn test_speed_bounded_by_driver_limit() {
        let cmd = synthesize(0.0, 0.0, 50.0, 360.0);
        assert_eq!(cmd.translate_speed, 50.0);
        assert_eq!(cmd.rotate_speed, 20.0);

        let fast = synthesize(-1000.0, 0.0, 50.0, 360.0);
        assert_eq!(fast.translate_speed, 50.0);

        // A driver claiming more than 100 is still capped at 100
        assert_eq!(synthesize(-1000.0, 0.0, 250.0, 360.0).translate_speed, 100.0);
    }

    #[test]
    fn test_angle_wrapped_by_driver_limit() {
        assert_eq!(synthesize(0.0, 8.0, 100.0, 180.0).translate_angle, 90.0);
        assert_eq!(synthesize(0.0, 16.0, 100.0, 180.0).translate_angle, 0.0);
        assert_eq!(synthesize(0.0, -4.0, 100.0, 180.0).translate_angle, 135.0);
    }

    #[test]
    fn test_degenerate_driver_limits() {
        let cmd = synthesize(0.0, 8.0, f32::NAN, 0.0);
        assert_eq!(cmd.translate_speed, 0.0);
        assert_eq!(cmd.rotate_speed, 0.0);
        assert_eq!(cmd.translate_angle, 0.0);
    }

    #[test]
    fn test_narrow_driver_accepts_every_command() {
        let mut driver = RecordingMotionDriver::with_limits(30.0, 90.0);
        for front in [-1000.0, -16.0, 0.0, 16.0, 1000.0] {
            for back in [-19.0, -8.0, -1.0, 0.0, 1.0, 8.0, 19.0] {
                synthesize(front, back, driver.max_speed(), driver.max_angle())
                    .dispatch(&mut driver)
                    .unwrap();
            }
        }
        assert_eq!(driver.total(), 35);
    }
}
