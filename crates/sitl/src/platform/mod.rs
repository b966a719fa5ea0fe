//! Simulated platform services
//!
//! Implementations of the core collaborator traits backed by the shared
//! [`SimWorld`](crate::world::SimWorld):
//!
//! - [`SimClock`]: `TimeSource` over a shared simulation clock
//! - [`SimSensorArray`]: `SensorArray` sampling the track under each unit
//! - [`SimMotor`]: `Motor` feeding wheel speeds into the world

pub mod clock;
pub mod motor;
pub mod sensor;

pub use clock::SimClock;
pub use motor::SimMotor;
pub use sensor::SimSensorArray;
