//! Position encoding of a single IR array
//!
//! A reading becomes a [`PositionCode`]: a signed offset from the array
//! centre, or a sentinel when the reading cannot be trusted as a position.
//!
//! # Encoding
//!
//! With `first` the lowest lit index, the code is `first * 2`, plus one
//! when a second unit is lit next to it, minus [`HALF_WIDTH`]. Sides wired
//! right-to-left negate the result. Codes therefore span
//! `-HALF_WIDTH..=HALF_WIDTH` in unit half-steps.
//!
//! | Lit units                  | Code              |
//! |----------------------------|-------------------|
//! | none                       | `NoLine`          |
//! | 1, or 2-3 with first pair adjacent | offset    |
//! | first two not adjacent     | `Discontinuity`   |
//! | exactly 4                  | `LargeError`      |
//! | more than 4                | `Intersection`    |

use core::fmt;

use crate::sensor::{SideReading, UNITS_PER_ARRAY};

/// Largest offset magnitude; also the centring constant
pub const HALF_WIDTH: i16 = UNITS_PER_ARRAY as i16 - 1;

/// Raw value of [`PositionCode::NoLine`]
pub const NO_LINE: i16 = HALF_WIDTH + 1;
/// Raw value of [`PositionCode::Intersection`]
pub const INTERSECTION: i16 = HALF_WIDTH + 2;
/// Raw value of [`PositionCode::LargeError`]
pub const LARGE_ERROR: i16 = HALF_WIDTH + 3;
/// Raw value of [`PositionCode::Discontinuity`]
pub const DISCONTINUITY: i16 = HALF_WIDTH + 4;

/// Scan direction of an array relative to the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    LeftToRight,
    RightToLeft,
}

/// Offset-from-centre or sentinel produced by [`encode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionCode {
    /// Offset in half-unit steps, always within `-HALF_WIDTH..=HALF_WIDTH`
    Offset(i16),
    /// No unit lit
    NoLine,
    /// More than four units lit
    Intersection,
    /// Exactly four units lit
    LargeError,
    /// The first two lit units are not neighbours
    Discontinuity,
}

impl PositionCode {
    /// Integer form; sentinels are the values just above `HALF_WIDTH`
    pub const fn raw(self) -> i16 {
        match self {
            PositionCode::Offset(offset) => offset,
            PositionCode::NoLine => NO_LINE,
            PositionCode::Intersection => INTERSECTION,
            PositionCode::LargeError => LARGE_ERROR,
            PositionCode::Discontinuity => DISCONTINUITY,
        }
    }

    /// Parse the integer form; `None` for values that are neither an
    /// in-range offset nor a sentinel
    pub fn from_raw(raw: i16) -> Option<Self> {
        match raw {
            NO_LINE => Some(PositionCode::NoLine),
            INTERSECTION => Some(PositionCode::Intersection),
            LARGE_ERROR => Some(PositionCode::LargeError),
            DISCONTINUITY => Some(PositionCode::Discontinuity),
            r if (-HALF_WIDTH..=HALF_WIDTH).contains(&r) => Some(PositionCode::Offset(r)),
            _ => None,
        }
    }

    /// Whether this is one of the four sentinels
    pub const fn is_sentinel(self) -> bool {
        !matches!(self, PositionCode::Offset(_))
    }

    /// The offset, if this is not a sentinel
    pub const fn offset(self) -> Option<i16> {
        match self {
            PositionCode::Offset(offset) => Some(offset),
            _ => None,
        }
    }

    /// Value fed to the PID loops
    pub fn as_measurement(self) -> f32 {
        f32::from(self.raw())
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionCode::Offset(offset) => write!(f, "{offset}"),
            PositionCode::NoLine => f.write_str("NO_LINE"),
            PositionCode::Intersection => f.write_str("INTERSECTION"),
            PositionCode::LargeError => f.write_str("LARGE_ERROR"),
            PositionCode::Discontinuity => f.write_str("DISCONTINUITY"),
        }
    }
}

/// Encode one array reading
///
/// Pure: no state is kept between calls.
pub fn encode(reading: &SideReading, orientation: Orientation) -> PositionCode {
    let lit = reading.lit_count();
    if lit > 4 {
        return PositionCode::Intersection;
    }
    if lit == 4 {
        return PositionCode::LargeError;
    }

    let mut hits = reading.lit_indices();
    let Some(first) = hits.next() else {
        return PositionCode::NoLine;
    };

    let mut code = (first * 2) as i16;
    if let Some(second) = hits.next() {
        if second > 0 {
            code += 1;
        }
        if first.abs_diff(second) > 1 {
            return PositionCode::Discontinuity;
        }
    }

    let centered = code - HALF_WIDTH;
    match orientation {
        Orientation::LeftToRight => PositionCode::Offset(centered),
        Orientation::RightToLeft => PositionCode::Offset(-centered),
    }
}

/// Lowest lit unit index that produced `code`
///
/// Inverse of the centring and doubling in [`encode`]; for a pair of
/// neighbouring units this is the lower one. `None` for sentinels.
pub fn decode_index(code: PositionCode, orientation: Orientation) -> Option<usize> {
    let offset = code.offset()?;
    let centered = match orientation {
        Orientation::LeftToRight => offset,
        Orientation::RightToLeft => -offset,
    };
    usize::try_from((centered + HALF_WIDTH) / 2).ok()
}
