//! Wheel motors
//!
//! [`Motor`] is one wheel; [`MotorGroup`] is the four wheels of the mecanum
//! chassis indexed by [`Wheel`]. [`HBridgeMotor`] drives a DC motor through
//! a two-input H-bridge given two PWM outputs from the board.
//!
//! Speeds are normalized to [-1.0, +1.0], positive turning the wheel so it
//! rolls forward. Arming is decided by the caller and passed to
//! [`MotorGroup::set_group_speed`].

use core::fmt;

/// Motor control error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Drive not armed
    NotArmed,
    /// Speed outside the accepted range or not a number
    InvalidSpeed,
    /// Drive angle outside [0, 360]
    InvalidAngle,
    /// PWM output failed
    HardwareFault,
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MotorError::NotArmed => "drive not armed",
            MotorError::InvalidSpeed => "speed out of range",
            MotorError::InvalidAngle => "angle out of range",
            MotorError::HardwareFault => "motor hardware fault",
        };
        f.write_str(text)
    }
}

/// One PWM output, duty as a fraction in [0.0, 1.0]
pub trait PwmPin {
    fn set_duty(&mut self, duty: f32) -> Result<(), MotorError>;
}

/// A single wheel motor
pub trait Motor {
    /// Run at `speed` in [-1.0, +1.0]
    ///
    /// # Errors
    ///
    /// `InvalidSpeed` outside that range (NaN included), `HardwareFault` if
    /// the output fails.
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError>;

    /// Remove drive from the wheel
    fn stop(&mut self) -> Result<(), MotorError>;
}

/// What [`HBridgeMotor`] does with the bridge when stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Both inputs low, wheel spins down freely
    #[default]
    Coast,
    /// Both inputs high, motor terminals shorted
    Brake,
}

/// DC motor behind a two-input H-bridge (DRV8833 / TB6612 style)
///
/// Forward drives IN1 with the duty and holds IN2 low; reverse swaps them.
/// Speeds whose magnitude is below `min_duty` stall the motor without moving
/// the chassis, so they are raised to `min_duty`. A speed of exactly zero
/// stops the motor using the configured [`StopMode`].
pub struct HBridgeMotor<P: PwmPin> {
    in1: P,
    in2: P,
    min_duty: f32,
    stop_mode: StopMode,
}

impl<P: PwmPin> HBridgeMotor<P> {
    pub fn new(in1: P, in2: P) -> Self {
        Self {
            in1,
            in2,
            min_duty: 0.0,
            stop_mode: StopMode::Coast,
        }
    }

    /// Lowest non-zero duty sent to the bridge, clamped to [0.0, 1.0]
    pub fn with_min_duty(mut self, min_duty: f32) -> Self {
        self.min_duty = if min_duty.is_finite() {
            min_duty.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn with_stop_mode(mut self, stop_mode: StopMode) -> Self {
        self.stop_mode = stop_mode;
        self
    }

    /// Current IN1 / IN2 outputs
    pub fn pins(&self) -> (&P, &P) {
        (&self.in1, &self.in2)
    }

    fn drive(&mut self, in1: f32, in2: f32) -> Result<(), MotorError> {
        self.in1.set_duty(in1)?;
        self.in2.set_duty(in2)
    }
}

impl<P: PwmPin> Motor for HBridgeMotor<P> {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        if !(-1.0..=1.0).contains(&speed) {
            return Err(MotorError::InvalidSpeed);
        }
        if speed == 0.0 {
            return self.stop();
        }

        let duty = libm::fabsf(speed).max(self.min_duty);
        if speed > 0.0 {
            self.drive(duty, 0.0)
        } else {
            self.drive(0.0, duty)
        }
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        match self.stop_mode {
            StopMode::Coast => self.drive(0.0, 0.0),
            StopMode::Brake => self.drive(1.0, 1.0),
        }
    }
}

/// Wheel position on the chassis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    FrontLeft = 0,
    FrontRight = 1,
    BackLeft = 2,
    BackRight = 3,
}

impl Wheel {
    /// All wheels in [`MotorGroup`] order
    pub const ALL: [Wheel; 4] = [
        Wheel::FrontLeft,
        Wheel::FrontRight,
        Wheel::BackLeft,
        Wheel::BackRight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The four wheel motors, `[front_left, front_right, back_left, back_right]`
pub struct MotorGroup<M: Motor> {
    motors: [M; 4],
}

impl<M: Motor> MotorGroup<M> {
    pub fn new(motors: [M; 4]) -> Self {
        Self { motors }
    }

    /// Apply one speed per wheel, in [`Wheel::ALL`] order
    ///
    /// # Errors
    ///
    /// `NotArmed` when `is_armed` is false, in which case no motor is
    /// touched. Otherwise the first motor error; wheels before it have
    /// already been updated.
    pub fn set_group_speed(&mut self, speeds: &[f32; 4], is_armed: bool) -> Result<(), MotorError> {
        if !is_armed {
            return Err(MotorError::NotArmed);
        }
        self.motors
            .iter_mut()
            .zip(speeds)
            .try_for_each(|(motor, &speed)| motor.set_speed(speed))
    }

    /// Stop every wheel
    ///
    /// All wheels are asked to stop even if one fails; the first error is
    /// returned.
    pub fn stop_all(&mut self) -> Result<(), MotorError> {
        let mut result = Ok(());
        for motor in self.motors.iter_mut() {
            let stopped = motor.stop();
            if result.is_ok() {
                result = stopped;
            }
        }
        result
    }

    pub fn motor(&self, wheel: Wheel) -> &M {
        &self.motors[wheel.index()]
    }

    pub fn motor_mut(&mut self, wheel: Wheel) -> &mut M {
        &mut self.motors[wheel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Pin {
        duty: f32,
        broken: bool,
    }

    impl PwmPin for Pin {
        fn set_duty(&mut self, duty: f32) -> Result<(), MotorError> {
            if self.broken {
                return Err(MotorError::HardwareFault);
            }
            self.duty = duty;
            Ok(())
        }
    }

    fn bridge() -> HBridgeMotor<Pin> {
        HBridgeMotor::new(Pin::default(), Pin::default())
    }

    fn duties(motor: &HBridgeMotor<Pin>) -> (f32, f32) {
        let (in1, in2) = motor.pins();
        (in1.duty, in2.duty)
    }

    #[test]
    fn test_direction_selects_input() {
        let mut motor = bridge();
        motor.set_speed(0.75).unwrap();
        assert_eq!(duties(&motor), (0.75, 0.0));
        motor.set_speed(-0.5).unwrap();
        assert_eq!(duties(&motor), (0.0, 0.5));
    }

    #[test]
    fn test_min_duty_lifts_small_speeds() {
        let mut motor = bridge().with_min_duty(0.2);
        motor.set_speed(-0.05).unwrap();
        assert_eq!(duties(&motor), (0.0, 0.2));
        motor.set_speed(0.6).unwrap();
        assert_eq!(duties(&motor), (0.6, 0.0));
    }

    #[test]
    fn test_zero_speed_uses_stop_mode() {
        let mut coast = bridge();
        coast.set_speed(1.0).unwrap();
        coast.set_speed(0.0).unwrap();
        assert_eq!(duties(&coast), (0.0, 0.0));

        let mut brake = bridge().with_min_duty(0.3).with_stop_mode(StopMode::Brake);
        brake.set_speed(0.0).unwrap();
        assert_eq!(duties(&brake), (1.0, 1.0));
    }

    #[test]
    fn test_rejects_out_of_range_speed() {
        let mut motor = bridge();
        assert_eq!(motor.set_speed(1.5), Err(MotorError::InvalidSpeed));
        assert_eq!(motor.set_speed(f32::NAN), Err(MotorError::InvalidSpeed));
        assert_eq!(duties(&motor), (0.0, 0.0));
    }

    #[test]
    fn test_group_of_bridges() {
        let mut group = MotorGroup::new([bridge(), bridge(), bridge(), bridge()]);
        let speeds = [0.5, -0.5, 0.25, -0.25];

        assert_eq!(group.set_group_speed(&speeds, false), Err(MotorError::NotArmed));
        assert_eq!(duties(group.motor(Wheel::FrontLeft)), (0.0, 0.0));

        group.set_group_speed(&speeds, true).unwrap();
        assert_eq!(duties(group.motor(Wheel::FrontLeft)), (0.5, 0.0));
        assert_eq!(duties(group.motor(Wheel::FrontRight)), (0.0, 0.5));
        assert_eq!(duties(group.motor(Wheel::BackLeft)), (0.25, 0.0));
        assert_eq!(duties(group.motor(Wheel::BackRight)), (0.0, 0.25));
    }

    #[test]
    fn test_stop_all_reaches_every_wheel() {
        let mut group = MotorGroup::new([bridge(), bridge(), bridge(), bridge()]);
        group.set_group_speed(&[0.5; 4], true).unwrap();
        group.motor_mut(Wheel::FrontRight).in1.broken = true;

        assert_eq!(group.stop_all(), Err(MotorError::HardwareFault));
        for wheel in [Wheel::FrontLeft, Wheel::BackLeft, Wheel::BackRight] {
            assert_eq!(duties(group.motor(wheel)), (0.0, 0.0));
        }
    }
}
