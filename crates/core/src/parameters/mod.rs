//! Parameter management
//!
//! A fixed-capacity key-value store in the ArduPilot style plus the typed
//! parameter sets that load from it. Persistence, if any, belongs to the
//! platform.

pub mod error;
pub mod follower;
pub mod storage;

pub use error::ParameterError;
pub use follower::{FollowerParams, SearchParams};
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
