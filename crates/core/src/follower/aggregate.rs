//! Weighted line centre per array, for telemetry
//!
//! Each unit carries a position weight spaced evenly from `-N/2` to `+N/2`.
//! The aggregate of a side is the mean weight of its lit units. It is
//! never consulted by the fault classifier.

use crate::sensor::{SensorSnapshot, Side, SideReading, UNITS_PER_ARRAY};

const HALF_SPAN: f32 = (UNITS_PER_ARRAY / 2) as f32;

/// Position weight of unit `index`
pub fn unit_weight(index: usize) -> f32 {
    -HALF_SPAN + index as f32 * (2.0 * HALF_SPAN) / (UNITS_PER_ARRAY - 1) as f32
}

/// Weighted centre of one reading, `None` when nothing is lit
pub fn weighted_centre(reading: &SideReading) -> Option<f32> {
    let mut weighted = 0.0f32;
    let mut lit = 0u32;
    for index in reading.lit_indices() {
        weighted += unit_weight(index);
        lit += 1;
    }
    if lit == 0 {
        None
    } else {
        Some(weighted / lit as f32)
    }
}

/// Per-side weighted centres of the last ingested snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateReading {
    centres: [Option<f32>; 4],
}

impl AggregateReading {
    /// Compute the centres of every side of `snapshot`
    pub fn from_snapshot(snapshot: &SensorSnapshot) -> Self {
        let mut centres = [None; 4];
        for (side, reading) in snapshot.iter() {
            centres[side.index()] = weighted_centre(reading);
        }
        Self { centres }
    }

    /// Centre of `side`, `None` when it saw nothing
    pub fn get(&self, side: Side) -> Option<f32> {
        self.centres[side.index()]
    }

    /// `(side, centre)` for all four sides
    pub fn iter(&self) -> impl Iterator<Item = (Side, Option<f32>)> + '_ {
        Side::ALL.iter().map(move |&side| (side, self.get(side)))
    }
}

/// Keeps the latest [`AggregateReading`] and when it was taken
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    latest: AggregateReading,
    last_updated_us: Option<u64>,
}

impl Aggregator {
    pub const fn new() -> Self {
        Self {
            latest: AggregateReading { centres: [None; 4] },
            last_updated_us: None,
        }
    }

    /// Replace the stored aggregates with those of `snapshot`
    pub fn ingest(&mut self, snapshot: &SensorSnapshot, now_us: u64) -> &AggregateReading {
        self.latest = AggregateReading::from_snapshot(snapshot);
        self.last_updated_us = Some(now_us);
        &self.latest
    }

    pub fn aggregates(&self) -> &AggregateReading {
        &self.latest
    }

    /// Time of the last `ingest`, `None` before the first one
    pub fn last_updated_us(&self) -> Option<u64> {
        self.last_updated_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_weights_span_the_array() {
        assert!(approx(unit_weight(0), -8.0));
        assert!(approx(unit_weight(UNITS_PER_ARRAY - 1), 8.0));
        for i in 1..UNITS_PER_ARRAY {
            assert!(unit_weight(i) > unit_weight(i - 1));
        }
    }

    #[test]
    fn test_empty_side_is_undefined() {
        let snapshot = SensorSnapshot::empty().with(Side::Front, SideReading::with_lit(&[3]));
        let agg = AggregateReading::from_snapshot(&snapshot);
        assert!(agg.get(Side::Front).is_some());
        assert_eq!(agg.get(Side::Back), None);
        assert_eq!(agg.get(Side::Left), None);
        assert_eq!(agg.get(Side::Right), None);
    }

    #[test]
    fn test_symmetric_pair_centres_at_zero() {
        let reading = SideReading::with_lit(&[7, 8]);
        assert!(approx(weighted_centre(&reading).unwrap(), 0.0));
    }

    #[test]
    fn test_centre_within_bounds() {
        for mask in [0x0001u16, 0x8000, 0xFFFF, 0x00F0, 0x8001, 0x1234, 0xF000] {
            let centre = weighted_centre(&SideReading::from_mask(mask)).unwrap();
            assert!((-HALF_SPAN..=HALF_SPAN).contains(&centre), "{}", centre);
        }
    }

    #[test]
    fn test_ingest_records_time_and_replaces() {
        let mut aggregator = Aggregator::new();
        assert_eq!(aggregator.last_updated_us(), None);

        let lit = SensorSnapshot::empty().with(Side::Right, SideReading::with_lit(&[15]));
        aggregator.ingest(&lit, 1_000);
        assert!(approx(aggregator.aggregates().get(Side::Right).unwrap(), 8.0));
        assert_eq!(aggregator.last_updated_us(), Some(1_000));

        aggregator.ingest(&SensorSnapshot::empty(), 2_000);
        assert_eq!(aggregator.aggregates().get(Side::Right), None);
        assert_eq!(aggregator.last_updated_us(), Some(2_000));
    }
}
