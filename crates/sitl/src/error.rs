use line_follower_core::parameters::ParameterError;
use line_follower_core::FollowerError;

/// Errors that can occur during simulator operations.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Parameter {name}: {reason}")]
    Parameter { name: String, reason: ParameterError },

    #[error("Follower error: {0}")]
    Follower(FollowerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FollowerError> for SimulatorError {
    fn from(e: FollowerError) -> Self {
        SimulatorError::Follower(e)
    }
}
