//! Fault classification and latching
//!
//! Each cycle the four logical codes are classified into a [`FaultState`].
//! The state carries no history; what the follow loop needs to remember
//! (an intersection was reached, the line was lost) lives in [`FaultLatch`].

use core::fmt;

use super::encoder::PositionCode;
use super::heading::LogicalCodes;

/// Per-cycle classification of the logical codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultState {
    #[default]
    Clear,
    Intersection,
    FrontBackLost,
    FrontLost,
    BackLost,
    HighAngle,
}

impl FaultState {
    /// State name as a static string (usable with defmt on embedded)
    pub const fn as_str(self) -> &'static str {
        match self {
            FaultState::Clear => "Clear",
            FaultState::Intersection => "Intersection",
            FaultState::FrontBackLost => "FrontBackLost",
            FaultState::FrontLost => "FrontLost",
            FaultState::BackLost => "BackLost",
            FaultState::HighAngle => "HighAngle",
        }
    }

    /// Whether this state means the vehicle is off the line
    pub const fn is_line_loss(self) -> bool {
        matches!(
            self,
            FaultState::FrontBackLost
                | FaultState::FrontLost
                | FaultState::BackLost
                | FaultState::HighAngle
        )
    }
}

impl fmt::Display for FaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one cycle's codes
///
/// The outer guard is the one the deployed vehicle runs: it is entered
/// whenever front or back is a sentinel, and also whenever left or right
/// is an in-range offset.
pub fn classify(codes: &LogicalCodes) -> FaultState {
    let LogicalCodes {
        front,
        back,
        left,
        right,
    } = *codes;

    // TODO: confirm against the hardware whether the side terms were meant
    // to test for sentinels; a side offset currently always enters here.
    let guarded =
        front.is_sentinel() || back.is_sentinel() || !right.is_sentinel() || !left.is_sentinel();
    if !guarded {
        return FaultState::Clear;
    }

    if !right.is_sentinel()
        || !left.is_sentinel()
        || front == PositionCode::Intersection
        || back == PositionCode::Intersection
    {
        FaultState::Intersection
    } else if front == PositionCode::LargeError || back == PositionCode::LargeError {
        FaultState::HighAngle
    } else if front == PositionCode::NoLine && back == PositionCode::NoLine {
        FaultState::FrontBackLost
    } else if front == PositionCode::NoLine {
        FaultState::FrontLost
    } else if back == PositionCode::NoLine {
        FaultState::BackLost
    } else {
        FaultState::Clear
    }
}

/// Latched record of the first intersection and the first line loss
///
/// A latch is set by the first cycle that observes its fault and keeps
/// that cycle number; later observations and `Clear` cycles never change
/// it. Only a fresh latch (a fresh follower) resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultLatch {
    first_intersection: Option<u64>,
    first_line_loss: Option<(FaultState, u64)>,
}

impl FaultLatch {
    /// Empty latch
    pub const fn new() -> Self {
        Self {
            first_intersection: None,
            first_line_loss: None,
        }
    }

    /// Record the classification of cycle `cycle`
    ///
    /// Returns true if this call set a latch.
    pub fn record(&mut self, state: FaultState, cycle: u64) -> bool {
        match state {
            FaultState::Intersection if self.first_intersection.is_none() => {
                self.first_intersection = Some(cycle);
                true
            }
            s if s.is_line_loss() && self.first_line_loss.is_none() => {
                self.first_line_loss = Some((s, cycle));
                true
            }
            _ => false,
        }
    }

    /// Whether an intersection was ever observed
    pub fn intersection_seen(&self) -> bool {
        self.first_intersection.is_some()
    }

    /// Whether the line was ever lost
    pub fn line_lost(&self) -> bool {
        self.first_line_loss.is_some()
    }

    /// Cycle of the first intersection
    pub fn first_intersection_cycle(&self) -> Option<u64> {
        self.first_intersection
    }

    /// Kind and cycle of the first line loss
    pub fn first_line_loss(&self) -> Option<(FaultState, u64)> {
        self.first_line_loss
    }
}
