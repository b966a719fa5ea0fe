//! PID controller
//!
//! The follow loop runs two independent loops, one on the front code and
//! one on the back code. Both reach the controller only through
//! [`PidController`], so tuned or filtered implementations can be swapped in.

/// PID collaborator
pub trait PidController {
    /// Replace the proportional, integral and derivative gains
    fn set_gains(&mut self, kp: f32, ki: f32, kd: f32);

    /// Advance one step and return the control output
    ///
    /// * `setpoint` - Desired value
    /// * `measured` - Current measurement
    /// * `dt` - Seconds since the previous step
    fn step(&mut self, setpoint: f32, measured: f32, dt: f32) -> f32;

    /// Clear accumulated integral and derivative history
    fn reset(&mut self);
}

/// Textbook PID on `error = setpoint - measured`
///
/// The integral accumulates `error * dt` and, when an output limit is set,
/// is clamped to `limit / ki` so it cannot wind up past what the output can
/// express. The derivative term is zero on the first step and whenever
/// `dt` is not positive.
#[derive(Debug, Clone, Default)]
pub struct Pid {
    kp: f32,
    ki: f32,
    kd: f32,
    output_limit: Option<f32>,
    integral: f32,
    prev_error: Option<f32>,
}

impl Pid {
    /// Controller with the given gains and no output limit
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            ..Self::default()
        }
    }

    /// Clamp the output (and the integral contribution) to `[-limit, limit]`
    pub fn with_output_limit(mut self, limit: f32) -> Self {
        self.output_limit = Some(libm::fabsf(limit));
        self
    }

    /// Current `(kp, ki, kd)`
    pub fn gains(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }
}

impl PidController for Pid {
    fn set_gains(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    fn step(&mut self, setpoint: f32, measured: f32, dt: f32) -> f32 {
        let error = setpoint - measured;

        if dt > 0.0 {
            self.integral += error * dt;
        }
        if let Some(limit) = self.output_limit {
            if self.ki != 0.0 {
                let i_max = limit / libm::fabsf(self.ki);
                self.integral = self.integral.clamp(-i_max, i_max);
            }
        }

        let derivative = match self.prev_error {
            Some(prev) if dt > 0.0 => (error - prev) / dt,
            _ => 0.0,
        };
        self.prev_error = Some(error);

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        match self.output_limit {
            Some(limit) => output.clamp(-limit, limit),
            None => output,
        }
    }

    fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = None;
    }
}
