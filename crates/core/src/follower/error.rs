use core::fmt;

use crate::motor::MotorError;
use crate::sensor::SensorError;

/// Follower error types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowerError {
    /// Heading is not one of 0, 90, 180, 270 degrees
    InvalidHeading(u16),
    /// A perpendicular scan angle fell outside [0, 360]
    ScanAngleOutOfRange(f32),
    /// Sensor array failure
    Sensor(SensorError),
    /// Motion driver failure
    Motor(MotorError),
}

impl fmt::Display for FollowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowerError::InvalidHeading(deg) => {
                write!(f, "Invalid heading {} (expected 0, 90, 180 or 270)", deg)
            }
            FollowerError::ScanAngleOutOfRange(angle) => {
                write!(f, "Scan angle {} out of range [0, 360]", angle)
            }
            FollowerError::Sensor(e) => write!(f, "Sensor error: {}", e),
            FollowerError::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl From<SensorError> for FollowerError {
    fn from(e: SensorError) -> Self {
        FollowerError::Sensor(e)
    }
}

impl From<MotorError> for FollowerError {
    fn from(e: MotorError) -> Self {
        FollowerError::Motor(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_message(error: FollowerError) -> String {
        match error {
            FollowerError::InvalidHeading(_) | FollowerError::ScanAngleOutOfRange(_) => {
                format!("configuration: {error}")
            }
            FollowerError::Sensor(_) | FollowerError::Motor(_) => format!("hardware: {error}"),
        }
    }

    #[test]
    fn test_collaborator_errors_convert() {
        assert_eq!(
            FollowerError::from(SensorError::Timeout),
            FollowerError::Sensor(SensorError::Timeout)
        );
        assert_eq!(
            FollowerError::from(MotorError::NotArmed),
            FollowerError::Motor(MotorError::NotArmed)
        );
    }

    #[test]
    fn test_every_variant_is_a_follow_exit() {
        assert_eq!(
            exit_message(FollowerError::InvalidHeading(45)),
            "configuration: Invalid heading 45 (expected 0, 90, 180 or 270)"
        );
        assert_eq!(
            exit_message(MotorError::NotArmed.into()),
            "hardware: Motor error: drive not armed"
        );
    }
}
