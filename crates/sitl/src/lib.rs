//! line_follower_sitl - Software-in-the-loop simulator for the line follower
//!
//! Runs `line_follower_core` unchanged against a simulated chassis: a
//! painted track, four simulated IR arrays, four simulated mecanum wheels
//! and a shared simulation clock. Scenarios are JSON files; running one
//! produces a [`ScenarioReport`].

pub mod error;
pub mod platform;
pub mod scenario;
pub mod track;
pub mod world;

pub use error::SimulatorError;
pub use platform::{SimClock, SimMotor, SimSensorArray};
pub use scenario::{RunOutcome, Scenario, ScenarioReport, SearchRecord};
pub use track::{Stripe, Track};
pub use world::{ChassisConfig, Position, SharedWorld, SimWorld};
