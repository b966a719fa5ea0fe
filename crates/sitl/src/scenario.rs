//! JSON scenarios
//!
//! A scenario places the chassis on a track, configures the follower and
//! runs the follow loop (optionally searching for the line when it is
//! lost) until it stops. [`Scenario::run`] returns a [`ScenarioReport`].
//!
//! ```json
//! {
//!   "name": "straight to cross",
//!   "track": { "stripes": [ ... ] },
//!   "start": { "x": 0.5, "y": 0.0 },
//!   "heading": 0,
//!   "params": { "FOLLOW_TIMEOUT": 20000 },
//!   "search_on_loss": true
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use line_follower_core::motion::MecanumDrive;
use line_follower_core::parameters::{FollowerParams, ParameterStore};
use line_follower_core::traits::TimeSource;
use line_follower_core::{FollowOutcome, LineFollower, SearchOutcome};
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;
use crate::platform::{SimClock, SimMotor, SimSensorArray};
use crate::track::Track;
use crate::world::{ChassisConfig, Position, SimWorld};

/// Follow time limit applied when the scenario leaves `FOLLOW_TIMEOUT` at 0
pub const DEFAULT_SIM_TIMEOUT_MS: i32 = 60_000;

fn default_max_searches() -> u32 {
    1
}

/// Simulation setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub track: Track,
    pub start: Position,
    /// Heading in degrees: 0, 90, 180 or 270
    #[serde(default)]
    pub heading: u16,
    #[serde(default)]
    pub chassis: ChassisConfig,
    /// Parameter overrides by name
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Probability of flipping each IR unit per read
    #[serde(default)]
    pub noise: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Run the line search whenever the line is lost
    #[serde(default)]
    pub search_on_loss: bool,
    /// Upper bound on searches per run
    #[serde(default = "default_max_searches")]
    pub max_searches: u32,
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Intersection,
    LineLost,
    TimedOut,
}

/// One line search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub found: bool,
    /// Passes completed before the line was seen, or all passes
    pub passes: u32,
    /// Sweep speed when the search ended
    pub speed: f32,
    /// Sweep angle that saw the line
    pub angle: Option<f32>,
    pub elapsed_ms: u64,
}

impl SearchRecord {
    fn new(outcome: SearchOutcome, elapsed_us: u64) -> Self {
        match outcome {
            SearchOutcome::Found {
                pass, speed, angle, ..
            } => Self {
                found: true,
                passes: pass,
                speed,
                angle: Some(angle),
                elapsed_ms: elapsed_us / 1000,
            },
            SearchOutcome::NotFound {
                passes,
                final_speed,
            } => Self {
                found: false,
                passes,
                speed: final_speed,
                angle: None,
                elapsed_ms: elapsed_us / 1000,
            },
        }
    }
}

/// Result of a scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: RunOutcome,
    /// Classification of the last cycle
    pub final_fault: String,
    pub final_position: Position,
    pub distance_m: f32,
    pub elapsed_ms: u64,
    pub cycles: u64,
    pub intersection_seen: bool,
    pub line_lost: bool,
    pub first_intersection_cycle: Option<u64>,
    pub first_line_loss_cycle: Option<u64>,
    pub searches: Vec<SearchRecord>,
}

impl Scenario {
    /// Parse a scenario from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimulatorError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulatorError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String, SimulatorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check everything that can be checked before running
    pub fn validate(&self) -> Result<(), SimulatorError> {
        self.track.validate()?;
        if !(self.start.x.is_finite() && self.start.y.is_finite()) {
            return Err(SimulatorError::InvalidScenario("start is not finite".into()));
        }
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(SimulatorError::InvalidScenario(format!(
                "noise {} outside [0, 1]",
                self.noise
            )));
        }
        let ChassisConfig {
            side_m,
            unit_spacing_m,
            max_speed_mps,
        } = self.chassis;
        if !(side_m > 0.0 && unit_spacing_m > 0.0 && max_speed_mps > 0.0) {
            return Err(SimulatorError::InvalidScenario(
                "chassis dimensions and speed must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Follower parameters: registered defaults with the overrides applied
    pub fn follower_params(&self) -> Result<FollowerParams, SimulatorError> {
        let mut store = ParameterStore::new();
        FollowerParams::register_defaults(&mut store).map_err(|reason| SimulatorError::Parameter {
            name: String::from("<defaults>"),
            reason,
        })?;

        for (name, &value) in &self.params {
            store.set_numeric(name, value).map_err(|reason| SimulatorError::Parameter {
                name: name.clone(),
                reason,
            })?;
        }

        let mut params = FollowerParams::from_store(&store);
        if params.timeout_ms == 0 {
            params.timeout_ms = DEFAULT_SIM_TIMEOUT_MS as u32;
        }
        Ok(params)
    }

    /// Run the scenario to completion
    pub fn run(&self) -> Result<ScenarioReport, SimulatorError> {
        self.validate()?;
        let params = self.follower_params()?;

        let clock = SimClock::new();
        let world = SimWorld::shared(self.track.clone(), self.chassis, clock.clone(), self.start);
        let sensors = if self.noise > 0.0 {
            SimSensorArray::with_noise(world.clone(), self.noise, self.seed)
        } else {
            SimSensorArray::new(world.clone())
        };
        let mut drive = MecanumDrive::new(SimMotor::group(&world));
        drive.arm();

        let mut follower = LineFollower::new(sensors, drive, clock.clone(), params);
        let mut searches = Vec::new();

        let outcome = loop {
            let outcome = follower.follow(self.heading)?;
            let may_search = searches.len() < self.max_searches as usize;
            match outcome {
                FollowOutcome::LineLost(_) if self.search_on_loss && may_search => {
                    let started_us = clock.now_us();
                    let result = follower.oscillate(self.heading)?;
                    searches.push(SearchRecord::new(result, clock.elapsed_since(started_us)));
                    if !result.is_found() {
                        break outcome;
                    }
                }
                other => break other,
            }
        };

        world.borrow_mut().advance();
        let snapshot = follower.snapshot();
        let world = world.borrow();
        Ok(ScenarioReport {
            name: self.name.clone(),
            outcome: match outcome {
                FollowOutcome::Intersection => RunOutcome::Intersection,
                FollowOutcome::LineLost(_) => RunOutcome::LineLost,
                FollowOutcome::TimedOut => RunOutcome::TimedOut,
            },
            final_fault: snapshot.fault.as_str().to_string(),
            final_position: world.position(),
            distance_m: world.distance_m(),
            elapsed_ms: clock.now_ms(),
            cycles: snapshot.cycle,
            intersection_seen: snapshot.latch.intersection_seen(),
            line_lost: snapshot.latch.line_lost(),
            first_intersection_cycle: snapshot.latch.first_intersection_cycle(),
            first_line_loss_cycle: snapshot.latch.first_line_loss().map(|(_, cycle)| cycle),
            searches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use line_follower_core::parameters::ParameterError;

    fn minimal() -> Scenario {
        Scenario::from_json_str(r#"{"track": {}, "start": {"x": 0.0, "y": 0.0}}"#).unwrap()
    }

    #[test]
    fn test_defaults() {
        let scenario = minimal();
        assert_eq!(scenario.heading, 0);
        assert_eq!(scenario.max_searches, 1);
        assert!(!scenario.search_on_loss);
        assert_eq!(scenario.chassis, ChassisConfig::default());
    }

    #[test]
    fn test_param_overrides_keep_types() {
        let mut scenario = minimal();
        scenario.params.insert("FOLLOW_KP".into(), 0.5);
        scenario.params.insert("SRCH_SCAN_MS".into(), 250.0);
        let params = scenario.follower_params().unwrap();
        assert_eq!(params.kp, 0.5);
        assert_eq!(params.search.scan_duration_ms, 250);
        assert_eq!(params.timeout_ms, DEFAULT_SIM_TIMEOUT_MS as u32);
    }

    #[test]
    fn test_unknown_param_rejected() {
        let mut scenario = minimal();
        scenario.params.insert("NOT_A_PARAM".into(), 1.0);
        assert!(matches!(
            scenario.follower_params(),
            Err(SimulatorError::Parameter { .. })
        ));
    }

    #[test]
    fn test_fractional_integer_param_rejected() {
        let mut scenario = minimal();
        scenario.params.insert("SRCH_SCAN_MS".into(), 12.5);
        assert!(matches!(
            scenario.follower_params(),
            Err(SimulatorError::Parameter { ref name, reason: ParameterError::TypeMismatch }) if name == "SRCH_SCAN_MS"
        ));
    }

    #[test]
    fn test_bad_noise_rejected() {
        let json = r#"{"track": {}, "start": {"x": 0.0, "y": 0.0}, "noise": 1.5}"#;
        assert!(matches!(
            Scenario::from_json_str(json),
            Err(SimulatorError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_invalid_heading_surfaces_follower_error() {
        let mut scenario = minimal();
        scenario.heading = 45;
        assert!(matches!(scenario.run(), Err(SimulatorError::Follower(_))));
    }
}
