//! IR sensor array abstraction
//!
//! Four binary IR arrays are mounted one per physical side of the chassis.
//! Each poll yields an immutable [`SensorSnapshot`] holding one
//! [`SideReading`] per [`Side`]. The physical driver (I2C expander, GPIO
//! bank, simulator) lives outside this crate and implements [`SensorArray`].

pub mod mock;

pub use mock::ScriptedSensorArray;

use core::fmt;

/// Number of IR units on every array
pub const UNITS_PER_ARRAY: usize = 16;

/// Sensor read error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction with the array failed
    BusError,
    /// Array did not answer in time
    Timeout,
    /// Array returned a frame of unexpected length
    MalformedFrame,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::BusError => write!(f, "IR array bus error"),
            SensorError::Timeout => write!(f, "IR array read timed out"),
            SensorError::MalformedFrame => write!(f, "IR array returned a malformed frame"),
        }
    }
}

/// Physical mounting side of an IR array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Left,
    Right,
}

impl Side {
    /// All sides in snapshot storage order
    pub const ALL: [Side; 4] = [Side::Front, Side::Back, Side::Left, Side::Right];

    /// Storage index inside a [`SensorSnapshot`]
    pub const fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Back => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }

    /// Side name as a static string (usable with defmt on embedded)
    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary reading of one IR array, unit 0 first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideReading {
    units: [bool; UNITS_PER_ARRAY],
}

impl SideReading {
    /// Reading with no lit unit
    pub const fn empty() -> Self {
        Self {
            units: [false; UNITS_PER_ARRAY],
        }
    }

    /// Build from raw 0/1 values; any non-zero value counts as lit
    pub fn from_bits(bits: [u8; UNITS_PER_ARRAY]) -> Self {
        let mut units = [false; UNITS_PER_ARRAY];
        for (unit, bit) in units.iter_mut().zip(bits.iter()) {
            *unit = *bit != 0;
        }
        Self { units }
    }

    /// Build from a bit mask where bit `i` is unit `i`
    pub fn from_mask(mask: u16) -> Self {
        let mut units = [false; UNITS_PER_ARRAY];
        for (i, unit) in units.iter_mut().enumerate() {
            *unit = mask & (1 << i) != 0;
        }
        Self { units }
    }

    /// Build a reading with exactly the given units lit
    ///
    /// Indices outside the array are ignored.
    pub fn with_lit(indices: &[usize]) -> Self {
        let mut reading = Self::empty();
        for &i in indices {
            reading.set(i, true);
        }
        reading
    }

    /// Set a single unit; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, lit: bool) {
        if let Some(unit) = self.units.get_mut(index) {
            *unit = lit;
        }
    }

    /// Whether unit `index` is lit (false when out of range)
    pub fn is_lit(&self, index: usize) -> bool {
        self.units.get(index).copied().unwrap_or(false)
    }

    /// Indices of lit units in ascending order
    pub fn lit_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter_map(|(i, lit)| lit.then_some(i))
    }

    /// Number of lit units
    pub fn lit_count(&self) -> usize {
        self.units.iter().filter(|lit| **lit).count()
    }

    /// Whether two neighbouring units are both lit
    pub fn has_adjacent_pair(&self) -> bool {
        self.units.windows(2).any(|pair| pair[0] && pair[1])
    }

    /// Raw 0/1 values
    pub fn bits(&self) -> [u8; UNITS_PER_ARRAY] {
        let mut bits = [0u8; UNITS_PER_ARRAY];
        for (bit, lit) in bits.iter_mut().zip(self.units.iter()) {
            *bit = u8::from(*lit);
        }
        bits
    }
}

/// One poll of all four arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorSnapshot {
    readings: [SideReading; 4],
}

impl SensorSnapshot {
    /// Snapshot with every array dark
    pub const fn empty() -> Self {
        Self {
            readings: [SideReading::empty(); 4],
        }
    }

    /// Builder-style setter
    pub fn with(mut self, side: Side, reading: SideReading) -> Self {
        self.set(side, reading);
        self
    }

    /// Replace the reading for one side
    pub fn set(&mut self, side: Side, reading: SideReading) {
        self.readings[side.index()] = reading;
    }

    /// Reading for one side
    pub fn get(&self, side: Side) -> &SideReading {
        &self.readings[side.index()]
    }

    /// Iterate `(side, reading)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Side, &SideReading)> + '_ {
        Side::ALL.iter().map(move |side| (*side, self.get(*side)))
    }
}

/// IR array collaborator
///
/// Implementations own the physical arrays. Every call returns a fresh
/// snapshot; no state of the control core is kept by the driver.
pub trait SensorArray {
    /// Read all arrays, thresholding each analog unit at `threshold`
    ///
    /// # Errors
    ///
    /// Returns a [`SensorError`] if any array cannot be read.
    fn read_binary(&mut self, threshold: u8) -> Result<SensorSnapshot, SensorError>;

    /// Read all arrays using the driver's own raw digitisation
    ///
    /// Used while scanning for a lost line.
    ///
    /// # Errors
    ///
    /// Returns a [`SensorError`] if any array cannot be read.
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits_and_back() {
        let mut bits = [0u8; UNITS_PER_ARRAY];
        bits[3] = 1;
        bits[4] = 1;
        let reading = SideReading::from_bits(bits);
        assert_eq!(reading.lit_count(), 2);
        assert!(reading.is_lit(3));
        assert!(reading.is_lit(4));
        assert!(!reading.is_lit(5));
        assert_eq!(reading.bits(), bits);
    }

    #[test]
    fn test_from_mask() {
        let reading = SideReading::from_mask(0b1000_0000_0000_0001);
        let lit: heapless::Vec<usize, UNITS_PER_ARRAY> = reading.lit_indices().collect();
        assert_eq!(lit.as_slice(), &[0, 15]);
    }

    #[test]
    fn test_with_lit_ignores_out_of_range() {
        let reading = SideReading::with_lit(&[2, 40]);
        assert_eq!(reading.lit_count(), 1);
        assert!(!reading.is_lit(40));
    }

    #[test]
    fn test_adjacent_pair() {
        assert!(SideReading::with_lit(&[7, 8]).has_adjacent_pair());
        assert!(!SideReading::with_lit(&[7, 9]).has_adjacent_pair());
        assert!(!SideReading::empty().has_adjacent_pair());
    }

    #[test]
    fn test_snapshot_sides_are_independent() {
        let snapshot = SensorSnapshot::empty()
            .with(Side::Left, SideReading::with_lit(&[8]))
            .with(Side::Front, SideReading::with_lit(&[1, 2]));
        assert_eq!(snapshot.get(Side::Left).lit_count(), 1);
        assert_eq!(snapshot.get(Side::Front).lit_count(), 2);
        assert_eq!(snapshot.get(Side::Back).lit_count(), 0);
        assert_eq!(snapshot.iter().count(), 4);
    }

    #[test]
    fn test_side_names() {
        assert_eq!(Side::Front.as_str(), "front");
        assert_eq!(format!("{}", Side::Right), "right");
    }
}
