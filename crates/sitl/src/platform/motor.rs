//! Simulated wheel motor

use line_follower_core::motor::{Motor, MotorError, MotorGroup, Wheel};

use crate::world::SharedWorld;

/// One mecanum wheel; its speed drives the simulated chassis
#[derive(Debug, Clone)]
pub struct SimMotor {
    world: SharedWorld,
    wheel: Wheel,
}

impl SimMotor {
    pub fn new(world: SharedWorld, wheel: Wheel) -> Self {
        Self { world, wheel }
    }

    /// The four wheels of `world`, in [`MotorGroup`] order
    pub fn group(world: &SharedWorld) -> MotorGroup<SimMotor> {
        MotorGroup::new(Wheel::ALL.map(|wheel| SimMotor::new(world.clone(), wheel)))
    }

    pub fn wheel(&self) -> Wheel {
        self.wheel
    }

    /// Speed currently applied to this wheel
    pub fn speed(&self) -> f32 {
        self.world.borrow().wheel(self.wheel)
    }
}

impl Motor for SimMotor {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        if !speed.is_finite() || !(-1.0..=1.0).contains(&speed) {
            return Err(MotorError::InvalidSpeed);
        }
        self.world.borrow_mut().set_wheel(self.wheel, speed);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.world.borrow_mut().set_wheel(self.wheel, 0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SimClock;
    use crate::track::Track;
    use crate::world::{ChassisConfig, Position, SimWorld};
    use line_follower_core::motion::{MecanumDrive, MotionDriver};

    fn shared() -> SharedWorld {
        SimWorld::shared(
            Track::default(),
            ChassisConfig::default(),
            SimClock::new(),
            Position::default(),
        )
    }

    #[test]
    fn test_rejects_out_of_range_speed() {
        let world = shared();
        let mut motor = SimMotor::new(world.clone(), Wheel::BackLeft);
        assert_eq!(motor.set_speed(1.5), Err(MotorError::InvalidSpeed));
        assert_eq!(motor.set_speed(f32::NAN), Err(MotorError::InvalidSpeed));
        motor.set_speed(-0.5).unwrap();
        assert_eq!(world.borrow().wheel(Wheel::BackLeft), -0.5);
        motor.stop().unwrap();
        assert_eq!(motor.speed(), 0.0);
    }

    #[test]
    fn test_mecanum_drive_over_sim_motors() {
        let world = shared();
        let mut drive = MecanumDrive::new(SimMotor::group(&world));
        assert_eq!(drive.translate(50.0, 0.0), Err(MotorError::NotArmed));

        drive.arm();
        drive.translate(50.0, 0.0).unwrap();
        for wheel in Wheel::ALL {
            assert!((world.borrow().wheel(wheel) - 0.5).abs() < 1e-6);
        }

        drive.stop().unwrap();
        assert_eq!(world.borrow().wheel(Wheel::FrontRight), 0.0);
    }
}
