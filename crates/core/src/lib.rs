//! line_follower_core - Pure no_std perception and control for an IR line follower
//!
//! This crate contains the platform-agnostic algorithms that turn four
//! edge-mounted binary IR arrays into motion commands. Hardware is reached
//! only through traits, so everything here can be tested on host.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies outside of host logging
//! - **Trait abstractions**: Sensors, motion, PID and time injected via traits
//! - **Fail soft on sensing**: Ambiguous readings become sentinel codes, not errors
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`sensor`]: IR array readings and the `SensorArray` collaborator
//! - [`motor`]: Motor driver abstraction for DC motors
//! - [`motion`]: `MotionDriver` collaborator and the mecanum drive
//! - [`pid`]: `PidController` collaborator and a plain PID
//! - [`parameters`]: Parameter store and follower parameters
//! - [`follower`]: Position encoding, heading remap, fault classification,
//!   motion synthesis, line search and the follow loop

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod logging;

pub mod follower;
pub mod motion;
pub mod motor;
pub mod parameters;
pub mod pid;
pub mod sensor;
pub mod traits;

pub use follower::{
    FaultLatch, FaultState, FollowOutcome, FollowerError, FollowerSnapshot, Heading, LineFollower,
    Orientation, PositionCode, SearchOutcome,
};
pub use sensor::{SensorArray, SensorError, SensorSnapshot, Side, SideReading, UNITS_PER_ARRAY};
