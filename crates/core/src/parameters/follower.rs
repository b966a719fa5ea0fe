//! Line follower parameter definitions
//!
//! # Parameters
//!
//! - `FOLLOW_IR_THRESH` - Threshold handed to the IR arrays (0-255)
//! - `FOLLOW_KP` / `FOLLOW_KI` / `FOLLOW_KD` - Gains of both follow loops
//! - `FOLLOW_PERIOD_MS` - Follow loop cadence
//! - `FOLLOW_TIMEOUT` - Follow loop time limit (0 = unlimited)
//! - `SRCH_SPEED` - First scan speed of the line search
//! - `SRCH_SPEED_INC` - Scan speed increase after each failed pass
//! - `SRCH_SCAN_MS` - Time budget of the first scan direction
//! - `SRCH_POLL_MS` - Sensor poll interval while scanning

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_IR_THRESH: i32 = 60;
const DEFAULT_KP: f32 = 1.0;
const DEFAULT_KI: f32 = 0.0;
const DEFAULT_KD: f32 = 0.0;
const DEFAULT_PERIOD_MS: i32 = 20;
const DEFAULT_TIMEOUT_MS: i32 = 0;

const DEFAULT_SRCH_SPEED: f32 = 10.0;
const DEFAULT_SRCH_SPEED_INC: f32 = 90.0;
const DEFAULT_SRCH_SCAN_MS: i32 = 1000;
const DEFAULT_SRCH_POLL_MS: i32 = 10;

/// Line search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Scan speed of the first pass
    pub initial_speed: f32,
    /// Added to the scan speed after every pass that did not find the line
    pub speed_increment: f32,
    /// Time budget of the first scan direction in milliseconds
    pub scan_duration_ms: u32,
    /// Sensor poll interval while scanning in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            initial_speed: DEFAULT_SRCH_SPEED,
            speed_increment: DEFAULT_SRCH_SPEED_INC,
            scan_duration_ms: DEFAULT_SRCH_SCAN_MS as u32,
            poll_interval_ms: DEFAULT_SRCH_POLL_MS as u32,
        }
    }
}

/// Follow loop parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerParams {
    /// Threshold handed to `SensorArray::read_binary`
    pub ir_threshold: u8,
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Follow loop cadence in milliseconds
    pub period_ms: u32,
    /// Follow loop time limit in milliseconds, 0 = unlimited
    pub timeout_ms: u32,
    /// Line search parameters
    pub search: SearchParams,
}

impl Default for FollowerParams {
    fn default() -> Self {
        Self {
            ir_threshold: DEFAULT_IR_THRESH as u8,
            kp: DEFAULT_KP,
            ki: DEFAULT_KI,
            kd: DEFAULT_KD,
            period_ms: DEFAULT_PERIOD_MS as u32,
            timeout_ms: DEFAULT_TIMEOUT_MS as u32,
            search: SearchParams::default(),
        }
    }
}

impl FollowerParams {
    /// Register follower parameters with default values
    ///
    /// # Errors
    ///
    /// Returns `ParameterError::StoreFull` if the store has no room left.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register("FOLLOW_IR_THRESH", ParamValue::Int(DEFAULT_IR_THRESH), none)?;
        store.register("FOLLOW_KP", ParamValue::Float(DEFAULT_KP), none)?;
        store.register("FOLLOW_KI", ParamValue::Float(DEFAULT_KI), none)?;
        store.register("FOLLOW_KD", ParamValue::Float(DEFAULT_KD), none)?;
        store.register("FOLLOW_PERIOD_MS", ParamValue::Int(DEFAULT_PERIOD_MS), none)?;
        store.register("FOLLOW_TIMEOUT", ParamValue::Int(DEFAULT_TIMEOUT_MS), none)?;
        store.register("SRCH_SPEED", ParamValue::Float(DEFAULT_SRCH_SPEED), none)?;
        store.register("SRCH_SPEED_INC", ParamValue::Float(DEFAULT_SRCH_SPEED_INC), none)?;
        store.register("SRCH_SCAN_MS", ParamValue::Int(DEFAULT_SRCH_SCAN_MS), none)?;
        store.register("SRCH_POLL_MS", ParamValue::Int(DEFAULT_SRCH_POLL_MS), none)?;
        Ok(())
    }

    /// Load follower parameters from a store
    ///
    /// Missing, mistyped or out-of-range values fall back to defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let f32_or = |name: &str, default: f32| store.get_f32(name).unwrap_or(default);
        let ms_or = |name: &str, default: i32| store.get_u32(name).unwrap_or(default as u32);
        let nonzero_ms_or = |name: &str, default: i32| match ms_or(name, default) {
            0 => default as u32,
            ms => ms,
        };

        let ir_threshold = store
            .get_u32("FOLLOW_IR_THRESH")
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(DEFAULT_IR_THRESH as u8);

        Self {
            ir_threshold,
            kp: f32_or("FOLLOW_KP", DEFAULT_KP),
            ki: f32_or("FOLLOW_KI", DEFAULT_KI),
            kd: f32_or("FOLLOW_KD", DEFAULT_KD),
            period_ms: nonzero_ms_or("FOLLOW_PERIOD_MS", DEFAULT_PERIOD_MS),
            timeout_ms: ms_or("FOLLOW_TIMEOUT", DEFAULT_TIMEOUT_MS),
            search: SearchParams {
                initial_speed: f32_or("SRCH_SPEED", DEFAULT_SRCH_SPEED),
                speed_increment: f32_or("SRCH_SPEED_INC", DEFAULT_SRCH_SPEED_INC),
                scan_duration_ms: ms_or("SRCH_SCAN_MS", DEFAULT_SRCH_SCAN_MS),
                poll_interval_ms: nonzero_ms_or("SRCH_POLL_MS", DEFAULT_SRCH_POLL_MS),
            },
        }
    }
}
