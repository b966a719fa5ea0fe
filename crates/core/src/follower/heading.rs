//! Heading-relative remapping of the four arrays
//!
//! The chassis never turns; it changes its notion of "forward" instead. A
//! [`Heading`] selects which physical array plays each logical role and in
//! which direction that array is scanned.
//!
//! | Heading | front        | back          | left         | right         |
//! |---------|--------------|---------------|--------------|---------------|
//! | 0       | left, L->R   | right, R->L   | back, L->R   | front, R->L   |
//! | 90      | back, L->R   | front, R->L   | right, L->R  | left, R->L    |
//! | 180     | right, L->R  | left, R->L    | front, L->R  | back, R->L    |
//! | 270     | front, L->R  | back, R->L    | left, L->R   | right, R->L   |

use core::fmt;

use super::encoder::{encode, Orientation, PositionCode};
use super::error::FollowerError;
use crate::sensor::{SensorSnapshot, Side};

/// Commanded travel direction in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Heading {
    /// All legal headings
    pub const ALL: [Heading; 4] = [Heading::Deg0, Heading::Deg90, Heading::Deg180, Heading::Deg270];

    /// Heading in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Heading::Deg0 => 0,
            Heading::Deg90 => 90,
            Heading::Deg180 => 180,
            Heading::Deg270 => 270,
        }
    }

    /// Array assignment for this heading
    pub fn rotation(self) -> &'static Rotation {
        &ROTATION_TABLE[self as usize]
    }
}

impl TryFrom<u16> for Heading {
    type Error = FollowerError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Heading::Deg0),
            90 => Ok(Heading::Deg90),
            180 => Ok(Heading::Deg180),
            270 => Ok(Heading::Deg270),
            other => Err(FollowerError::InvalidHeading(other)),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.degrees())
    }
}

/// Physical source of one logical role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSource {
    pub side: Side,
    pub orientation: Orientation,
}

/// Physical sources of all four logical roles for one heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub front: RoleSource,
    pub back: RoleSource,
    pub left: RoleSource,
    pub right: RoleSource,
}

const fn lr(side: Side) -> RoleSource {
    RoleSource {
        side,
        orientation: Orientation::LeftToRight,
    }
}

const fn rl(side: Side) -> RoleSource {
    RoleSource {
        side,
        orientation: Orientation::RightToLeft,
    }
}

/// Indexed by `Heading as usize`
static ROTATION_TABLE: [Rotation; 4] = [
    // 0
    Rotation {
        front: lr(Side::Left),
        back: rl(Side::Right),
        left: lr(Side::Back),
        right: rl(Side::Front),
    },
    // 90
    Rotation {
        front: lr(Side::Back),
        back: rl(Side::Front),
        left: lr(Side::Right),
        right: rl(Side::Left),
    },
    // 180
    Rotation {
        front: lr(Side::Right),
        back: rl(Side::Left),
        left: lr(Side::Front),
        right: rl(Side::Back),
    },
    // 270
    Rotation {
        front: lr(Side::Front),
        back: rl(Side::Back),
        left: lr(Side::Left),
        right: rl(Side::Right),
    },
];

/// Position codes of the four logical roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalCodes {
    pub front: PositionCode,
    pub back: PositionCode,
    pub left: PositionCode,
    pub right: PositionCode,
}

impl LogicalCodes {
    /// All four roles see no line
    pub const fn lost() -> Self {
        Self {
            front: PositionCode::NoLine,
            back: PositionCode::NoLine,
            left: PositionCode::NoLine,
            right: PositionCode::NoLine,
        }
    }
}

impl Default for LogicalCodes {
    fn default() -> Self {
        Self::lost()
    }
}

fn encode_role(snapshot: &SensorSnapshot, source: RoleSource) -> PositionCode {
    encode(snapshot.get(source.side), source.orientation)
}

/// Encode every array into its logical role for `heading`
pub fn remap(snapshot: &SensorSnapshot, heading: Heading) -> LogicalCodes {
    let rotation = heading.rotation();
    LogicalCodes {
        front: encode_role(snapshot, rotation.front),
        back: encode_role(snapshot, rotation.back),
        left: encode_role(snapshot, rotation.left),
        right: encode_role(snapshot, rotation.right),
    }
}
