//! Line reacquisition by sideways oscillation
//!
//! The chassis sweeps perpendicular to its heading, first to one side and
//! then, for twice the time the first sweep took, to the other. Each
//! failed pair of sweeps raises the sweep speed until the drive's speed
//! ceiling is reached.

use super::error::FollowerError;
use super::heading::Heading;
use crate::motion::MotionDriver;
use crate::parameters::SearchParams;
use crate::sensor::{SensorArray, SensorError, SensorSnapshot};
use crate::traits::TimeSource;
use crate::{log_debug, log_info, log_warn};

/// Result of one [`watch_for_line`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchResult {
    /// A side showed two adjacent lit units
    pub found: bool,
    /// Time spent watching
    pub elapsed_us: u64,
}

/// Result of a full search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// The line was seen during pass `pass` (0-based) while sweeping toward
    /// `angle` at `speed`
    Found {
        pass: u32,
        speed: f32,
        angle: f32,
        elapsed_us: u64,
    },
    /// The speed ceiling was reached without seeing the line
    NotFound { passes: u32, final_speed: f32 },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

fn shows_line(snapshot: &SensorSnapshot) -> bool {
    snapshot.iter().any(|(_, reading)| reading.has_adjacent_pair())
}

/// Poll the raw arrays until one shows the line or `max_time_us` passes
///
/// A zero poll interval is treated as one microsecond so the budget is
/// always consumed.
pub fn watch_for_line<S: SensorArray, T: TimeSource>(
    sensors: &mut S,
    time: &T,
    max_time_us: u64,
    poll_interval_us: u64,
) -> Result<WatchResult, SensorError> {
    let start_us = time.now_us();
    let poll_us = poll_interval_us.max(1);
    let deadline_us = start_us.saturating_add(max_time_us);

    loop {
        let snapshot = sensors.read_all()?;
        let elapsed_us = time.elapsed_since(start_us);
        if shows_line(&snapshot) {
            return Ok(WatchResult {
                found: true,
                elapsed_us,
            });
        }
        if elapsed_us >= max_time_us {
            return Ok(WatchResult {
                found: false,
                elapsed_us: max_time_us,
            });
        }
        time.sleep_until(time.now_us().saturating_add(poll_us).min(deadline_us));
    }
}

/// Reduce `angle` modulo `max_angle` into `[0, max_angle)`
fn wrap_scan_angle(angle: f32, max_angle: f32) -> f32 {
    let wrapped = libm::fmodf(angle, max_angle);
    if wrapped < 0.0 {
        wrapped + max_angle
    } else {
        wrapped
    }
}

/// The two sweep directions perpendicular to `heading`
///
/// # Errors
///
/// [`FollowerError::ScanAngleOutOfRange`] if a wrapped angle is outside
/// `[0, 360]`, which happens only with a misconfigured `max_angle`.
pub fn scan_angles(heading: Heading, max_angle: f32) -> Result<(f32, f32), FollowerError> {
    let degrees = f32::from(heading.degrees());
    let first = degrees + 90.0;
    let second = degrees - 90.0;
    log_debug!("scan angles before wrap: {} {}", first, second);

    let first = wrap_scan_angle(first, max_angle);
    let second = wrap_scan_angle(second, max_angle);
    log_debug!("scan angles after wrap: {} {}", first, second);

    for angle in [first, second] {
        if !(0.0..=360.0).contains(&angle) {
            return Err(FollowerError::ScanAngleOutOfRange(angle));
        }
    }
    Ok((first, second))
}

/// Sweep sideways with growing speed until the line is seen
///
/// The driver is stopped after every sweep and on every exit, including
/// a sensor failure mid-sweep.
pub fn oscillate<S, D, T>(
    sensors: &mut S,
    driver: &mut D,
    time: &T,
    heading: Heading,
    params: &SearchParams,
) -> Result<SearchOutcome, FollowerError>
where
    S: SensorArray,
    D: MotionDriver,
    T: TimeSource,
{
    let (first_angle, second_angle) = scan_angles(heading, driver.max_angle())?;
    let max_speed = driver.max_speed();
    let poll_us = u64::from(params.poll_interval_ms) * 1000;
    let first_budget_us = u64::from(params.scan_duration_ms) * 1000;
    let started_us = time.now_us();

    if params.speed_increment <= 0.0 {
        log_warn!(
            "search speed increment {} is not positive, single pass only",
            params.speed_increment
        );
    }

    let mut speed = params.initial_speed;
    let mut pass = 0u32;
    loop {
        log_debug!("search pass {}: speed {}", pass, speed);

        let first = sweep(sensors, driver, time, speed, first_angle, first_budget_us, poll_us)?;
        if first.found {
            return Ok(found(pass, speed, first_angle, time, started_us));
        }

        let second_budget_us = first.elapsed_us.saturating_mul(2);
        let second = sweep(sensors, driver, time, speed, second_angle, second_budget_us, poll_us)?;
        if second.found {
            return Ok(found(pass, speed, second_angle, time, started_us));
        }

        pass += 1;
        speed += params.speed_increment;
        if speed >= max_speed || params.speed_increment <= 0.0 || !speed.is_finite() {
            log_info!("search gave up after {} passes", pass);
            return Ok(SearchOutcome::NotFound {
                passes: pass,
                final_speed: speed,
            });
        }
    }
}

fn found<T: TimeSource>(pass: u32, speed: f32, angle: f32, time: &T, started_us: u64) -> SearchOutcome {
    log_info!("line found on search pass {} at angle {}", pass, angle);
    SearchOutcome::Found {
        pass,
        speed,
        angle,
        elapsed_us: time.elapsed_since(started_us),
    }
}

/// One sweep: move, watch, stop
fn sweep<S, D, T>(
    sensors: &mut S,
    driver: &mut D,
    time: &T,
    speed: f32,
    angle: f32,
    budget_us: u64,
    poll_us: u64,
) -> Result<WatchResult, FollowerError>
where
    S: SensorArray,
    D: MotionDriver,
    T: TimeSource,
{
    let speed = speed.clamp(0.0, driver.max_speed());
    if let Err(e) = driver.translate(speed, angle) {
        let _ = driver.stop();
        return Err(e.into());
    }
    let watched = watch_for_line(sensors, time, budget_us, poll_us);
    driver.stop()?;
    Ok(watched?)
}
