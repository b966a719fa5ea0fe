//! The line follower: sensing, classification and the follow loop
//!
//! One control cycle reads the thresholded arrays, remaps them for the
//! commanded heading, classifies the result and then either stops (any
//! fault) or runs the two PID loops and commands the drive. Cycles run
//! strictly one after another at `FOLLOW_PERIOD_MS`.

use super::aggregate::{AggregateReading, Aggregator};
use super::commander::{synthesize, MotionCommand};
use super::error::FollowerError;
use super::fault::{classify, FaultLatch, FaultState};
use super::heading::{remap, Heading, LogicalCodes};
use super::search::{self, SearchOutcome};
use crate::motion::MotionDriver;
use crate::parameters::FollowerParams;
use crate::pid::{Pid, PidController};
use crate::sensor::SensorArray;
use crate::traits::TimeSource;
use crate::{log_debug, log_info, log_warn};

/// Why [`LineFollower::follow`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// An intersection was detected
    Intersection,
    /// The line was lost; carries the classification that ended the loop
    LineLost(FaultState),
    /// `FOLLOW_TIMEOUT` elapsed while still on the line
    TimedOut,
}

impl FollowOutcome {
    fn from_fault(fault: FaultState) -> Option<Self> {
        match fault {
            FaultState::Clear => None,
            FaultState::Intersection => Some(FollowOutcome::Intersection),
            lost => Some(FollowOutcome::LineLost(lost)),
        }
    }
}

/// State of the most recent cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerSnapshot {
    /// Logical position codes
    pub codes: LogicalCodes,
    /// Classification of `codes`
    pub fault: FaultState,
    /// Latched faults since construction
    pub latch: FaultLatch,
    /// Number of cycles sensed so far
    pub cycle: u64,
}

/// IR line follower over injected sensors, drive, clock and PID loops
pub struct LineFollower<S, D, T, P = Pid>
where
    S: SensorArray,
    D: MotionDriver,
    T: TimeSource,
    P: PidController,
{
    sensors: S,
    driver: D,
    time: T,
    params: FollowerParams,
    front_pid: P,
    back_pid: P,
    aggregator: Aggregator,
    codes: LogicalCodes,
    fault: FaultState,
    latch: FaultLatch,
    cycle: u64,
    front_error: f32,
    back_error: f32,
    last_command: Option<MotionCommand>,
}

impl<S, D, T> LineFollower<S, D, T, Pid>
where
    S: SensorArray,
    D: MotionDriver,
    T: TimeSource,
{
    /// Follower with two plain [`Pid`] loops
    pub fn new(sensors: S, driver: D, time: T, params: FollowerParams) -> Self {
        let front_pid = Pid::new(params.kp, params.ki, params.kd);
        let back_pid = Pid::new(params.kp, params.ki, params.kd);
        Self::with_pids(sensors, driver, time, params, front_pid, back_pid)
    }
}

impl<S, D, T, P> LineFollower<S, D, T, P>
where
    S: SensorArray,
    D: MotionDriver,
    T: TimeSource,
    P: PidController,
{
    /// Follower with caller-supplied PID loops
    ///
    /// The gains from `params` are applied to both loops whenever
    /// [`follow`](Self::follow) starts.
    pub fn with_pids(sensors: S, driver: D, time: T, params: FollowerParams, front_pid: P, back_pid: P) -> Self {
        Self {
            sensors,
            driver,
            time,
            params,
            front_pid,
            back_pid,
            aggregator: Aggregator::new(),
            codes: LogicalCodes::lost(),
            fault: FaultState::Clear,
            latch: FaultLatch::new(),
            cycle: 0,
            front_error: 0.0,
            back_error: 0.0,
            last_command: None,
        }
    }

    /// Read the thresholded arrays and refresh the telemetry aggregates
    pub fn update(&mut self) -> Result<&AggregateReading, FollowerError> {
        let snapshot = self.sensors.read_binary(self.params.ir_threshold)?;
        let now_us = self.time.now_us();
        Ok(self.aggregator.ingest(&snapshot, now_us))
    }

    /// Aggregates from the last [`update`](Self::update)
    pub fn aggregates(&self) -> &AggregateReading {
        self.aggregator.aggregates()
    }

    /// Time of the last [`update`](Self::update)
    pub fn last_updated_us(&self) -> Option<u64> {
        self.aggregator.last_updated_us()
    }

    /// Output of the front loop in the last control step
    pub fn front_error(&self) -> f32 {
        self.front_error
    }

    /// Output of the back loop in the last control step
    pub fn back_error(&self) -> f32 {
        self.back_error
    }

    /// False once any line-loss fault has been observed
    pub fn is_on_line(&self) -> bool {
        !self.latch.line_lost()
    }

    /// True once an intersection has been observed
    pub fn is_on_intersection(&self) -> bool {
        self.latch.intersection_seen()
    }

    pub fn snapshot(&self) -> FollowerSnapshot {
        FollowerSnapshot {
            codes: self.codes,
            fault: self.fault,
            latch: self.latch,
            cycle: self.cycle,
        }
    }

    /// Read, remap and classify; updates the latches
    pub fn sense(&mut self, heading: Heading) -> Result<FaultState, FollowerError> {
        let snapshot = self.sensors.read_binary(self.params.ir_threshold)?;
        self.codes = remap(&snapshot, heading);
        self.fault = classify(&self.codes);
        if self.latch.record(self.fault, self.cycle) {
            log_info!("fault latched at cycle {}: {}", self.cycle, self.fault.as_str());
        }
        self.cycle += 1;
        Ok(self.fault)
    }

    /// One control cycle with `dt` seconds since the previous one
    ///
    /// Stops the drive and returns the fault if the cycle is not `Clear`;
    /// otherwise steps both loops and commands the drive.
    pub fn step(&mut self, heading: Heading, dt: f32) -> Result<FaultState, FollowerError> {
        let fault = self.sense(heading)?;
        if fault != FaultState::Clear {
            self.driver.stop()?;
            return Ok(fault);
        }

        self.front_error = self.front_pid.step(0.0, self.codes.front.as_measurement(), dt);
        self.back_error = self.back_pid.step(0.0, self.codes.back.as_measurement(), dt);

        let command = synthesize(
            self.front_error,
            self.back_error,
            self.driver.max_speed(),
            self.driver.max_angle(),
        );
        command.dispatch(&mut self.driver)?;
        self.last_command = Some(command);
        Ok(FaultState::Clear)
    }

    /// Follow the line toward `heading_deg` until a fault or the timeout
    ///
    /// The drive is stopped on every exit, errors included.
    ///
    /// # Errors
    ///
    /// [`FollowerError::InvalidHeading`] before anything moves if
    /// `heading_deg` is not 0, 90, 180 or 270; sensor and motor failures
    /// as they occur.
    pub fn follow(&mut self, heading_deg: u16) -> Result<FollowOutcome, FollowerError> {
        let heading = Heading::try_from(heading_deg)?;
        let result = self.follow_loop(heading);
        if result.is_err() {
            let _ = self.driver.stop();
        }
        result
    }

    fn follow_loop(&mut self, heading: Heading) -> Result<FollowOutcome, FollowerError> {
        let FollowerParams {
            kp,
            ki,
            kd,
            period_ms,
            timeout_ms,
            ..
        } = self.params;
        self.front_pid.set_gains(kp, ki, kd);
        self.back_pid.set_gains(kp, ki, kd);
        self.front_pid.reset();
        self.back_pid.reset();

        let period_us = u64::from(period_ms.max(1)) * 1000;
        let timeout_us = u64::from(timeout_ms) * 1000;
        let start_us = self.time.now_us();
        let mut previous_us = start_us;
        log_info!("following at heading {}", heading.degrees());

        loop {
            let cycle_start_us = self.time.now_us();
            if timeout_us > 0 && cycle_start_us.saturating_sub(start_us) >= timeout_us {
                self.driver.stop()?;
                log_info!("follow timed out after {} cycles", self.cycle);
                return Ok(FollowOutcome::TimedOut);
            }

            let dt = self.time.elapsed_secs_since(previous_us);
            previous_us = cycle_start_us;

            let fault = self.step(heading, dt)?;
            if let Some(outcome) = FollowOutcome::from_fault(fault) {
                log_warn!(
                    "follow stopped: {} front {} back {}",
                    fault.as_str(),
                    self.codes.front.raw(),
                    self.codes.back.raw()
                );
                return Ok(outcome);
            }

            self.time.sleep_until(cycle_start_us.saturating_add(period_us));
        }
    }

    /// Sweep sideways of `heading_deg` until the line is seen again
    pub fn oscillate(&mut self, heading_deg: u16) -> Result<SearchOutcome, FollowerError> {
        let heading = Heading::try_from(heading_deg)?;
        log_debug!("searching around heading {}", heading.degrees());
        search::oscillate(
            &mut self.sensors,
            &mut self.driver,
            &self.time,
            heading,
            &self.params.search,
        )
    }

    pub fn params(&self) -> &FollowerParams {
        &self.params
    }

    /// Latest logical codes
    pub fn codes(&self) -> &LogicalCodes {
        &self.codes
    }

    pub fn fault_state(&self) -> FaultState {
        self.fault
    }

    pub fn latch(&self) -> &FaultLatch {
        &self.latch
    }

    /// Last command sent to the drive by a control step
    pub fn last_command(&self) -> Option<MotionCommand> {
        self.last_command
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn time(&self) -> &T {
        &self.time
    }
}
