//! Painted track geometry
//!
//! A track is a set of axis-aligned rectangular stripes on the floor, in
//! world metres (x east, y north). A point is on the line when any stripe
//! contains it, edges included.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;

/// Default stripe width in metres
pub const DEFAULT_STRIPE_WIDTH_M: f32 = 0.025;

/// One painted rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stripe {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Stripe {
    /// East-west stripe centred on `y`, from `x_from` to `x_to`
    pub fn horizontal(y: f32, x_from: f32, x_to: f32, width: f32) -> Self {
        Self {
            x_min: x_from.min(x_to),
            x_max: x_from.max(x_to),
            y_min: y - width / 2.0,
            y_max: y + width / 2.0,
        }
    }

    /// North-south stripe centred on `x`, from `y_from` to `y_to`
    pub fn vertical(x: f32, y_from: f32, y_to: f32, width: f32) -> Self {
        Self {
            x_min: x - width / 2.0,
            x_max: x + width / 2.0,
            y_min: y_from.min(y_to),
            y_max: y_from.max(y_to),
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    fn is_valid(&self) -> bool {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        finite && self.x_min <= self.x_max && self.y_min <= self.y_max
    }
}

/// The floor: every painted stripe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub stripes: Vec<Stripe>,
}

impl Track {
    pub fn new(stripes: Vec<Stripe>) -> Self {
        Self { stripes }
    }

    /// Whether `(x, y)` is painted
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.stripes.iter().any(|s| s.contains(x, y))
    }

    /// Reject stripes with non-finite or inverted bounds
    pub fn validate(&self) -> Result<(), SimulatorError> {
        match self.stripes.iter().position(|s| !s.is_valid()) {
            Some(index) => Err(SimulatorError::InvalidTrack(format!(
                "stripe {index} has non-finite or inverted bounds"
            ))),
            None => Ok(()),
        }
    }

    /// Parse and validate a track from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimulatorError> {
        let track: Track = serde_json::from_str(json)?;
        track.validate()?;
        Ok(track)
    }

    /// Load and validate a track file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulatorError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_contains_edges() {
        let stripe = Stripe::horizontal(0.0, -1.0, 1.0, 0.02);
        assert!(stripe.contains(0.0, 0.0));
        assert!(stripe.contains(1.0, 0.01));
        assert!(!stripe.contains(0.0, 0.011));
        assert!(!stripe.contains(1.01, 0.0));
    }

    #[test]
    fn test_vertical_normalizes_order() {
        let stripe = Stripe::vertical(0.5, 1.0, -1.0, 0.02);
        assert_eq!(stripe.y_min, -1.0);
        assert_eq!(stripe.y_max, 1.0);
        assert!(stripe.contains(0.505, 0.0));
    }

    #[test]
    fn test_track_from_json() {
        let json = r#"{"stripes": [{"x_min": -1.0, "x_max": 1.0, "y_min": -0.01, "y_max": 0.01}]}"#;
        let track = Track::from_json_str(json).unwrap();
        assert_eq!(track.stripes.len(), 1);
        assert!(track.contains(0.5, 0.0));
        assert!(!track.contains(0.5, 0.5));
    }

    #[test]
    fn test_empty_track_json() {
        let track = Track::from_json_str("{}").unwrap();
        assert!(track.stripes.is_empty());
        assert!(!track.contains(0.0, 0.0));
    }

    #[test]
    fn test_inverted_stripe_rejected() {
        let json = r#"{"stripes": [{"x_min": 1.0, "x_max": -1.0, "y_min": 0.0, "y_max": 0.1}]}"#;
        assert!(matches!(
            Track::from_json_str(json),
            Err(SimulatorError::InvalidTrack(_))
        ));
    }
}
