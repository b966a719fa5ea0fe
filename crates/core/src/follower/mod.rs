//! IR line following
//!
//! Four binary IR arrays sit on the four edges of a chassis that translates
//! without turning. Each control cycle:
//!
//! 1. [`encoder`] turns every array reading into a [`PositionCode`]
//! 2. [`heading`] assigns the arrays to the logical front/back/left/right
//!    roles for the commanded [`Heading`]
//! 3. [`fault`] classifies the logical codes and latches faults
//! 4. the PID loops and [`commander`] turn the front and back codes into a
//!    translate command
//!
//! [`search`] sweeps sideways to find a lost line, and [`aggregate`]
//! provides weighted line centres for telemetry.

pub mod aggregate;
pub mod commander;
pub mod encoder;
pub mod error;
pub mod fault;
pub mod follow;
pub mod heading;
pub mod search;

pub use aggregate::{AggregateReading, Aggregator};
pub use commander::{synthesize, MotionCommand};
pub use encoder::{decode_index, encode, Orientation, PositionCode};
pub use error::FollowerError;
pub use fault::{classify, FaultLatch, FaultState};
pub use follow::{FollowOutcome, FollowerSnapshot, LineFollower};
pub use heading::{remap, Heading, LogicalCodes, Rotation, RoleSource};
pub use search::{oscillate, scan_angles, watch_for_line, SearchOutcome, WatchResult};
