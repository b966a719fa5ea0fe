//! Simulated IR arrays
//!
//! Every unit reports a reflectance level: [`LINE_LEVEL`] over a stripe,
//! [`FLOOR_LEVEL`] elsewhere. A unit is lit when its level exceeds the
//! threshold. With noise enabled each unit is flipped independently with
//! the configured probability.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use line_follower_core::{SensorArray, SensorError, SensorSnapshot, Side, SideReading, UNITS_PER_ARRAY};

use crate::world::SharedWorld;

/// Reflectance level of a unit over the line
pub const LINE_LEVEL: u8 = 200;

/// Reflectance level of a unit over bare floor
pub const FLOOR_LEVEL: u8 = 20;

/// Threshold applied by `read_all`
pub const RAW_THRESHOLD: u8 = 127;

/// Four IR arrays sampling the shared world
#[derive(Debug)]
pub struct SimSensorArray {
    world: SharedWorld,
    rng: StdRng,
    flip_probability: f64,
    reads: u64,
}

impl SimSensorArray {
    /// Noise-free arrays
    pub fn new(world: SharedWorld) -> Self {
        Self {
            world,
            rng: StdRng::seed_from_u64(0),
            flip_probability: 0.0,
            reads: 0,
        }
    }

    /// Arrays that flip each unit with `flip_probability`
    ///
    /// `seed = None` draws the seed from entropy.
    pub fn with_noise(world: SharedWorld, flip_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world,
            rng,
            flip_probability: flip_probability.clamp(0.0, 1.0),
            reads: 0,
        }
    }

    /// Number of snapshots taken
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn sample(&mut self, threshold: u8) -> SensorSnapshot {
        let mut world = self.world.borrow_mut();
        world.advance();

        let mut snapshot = SensorSnapshot::empty();
        for side in Side::ALL {
            let mut reading = SideReading::empty();
            for index in 0..UNITS_PER_ARRAY {
                let level = if world.unit_on_line(side, index) {
                    LINE_LEVEL
                } else {
                    FLOOR_LEVEL
                };
                let mut lit = level > threshold;
                if self.flip_probability > 0.0 && self.rng.gen_bool(self.flip_probability) {
                    lit = !lit;
                }
                reading.set(index, lit);
            }
            snapshot.set(side, reading);
        }
        self.reads += 1;
        snapshot
    }
}

impl SensorArray for SimSensorArray {
    fn read_binary(&mut self, threshold: u8) -> Result<SensorSnapshot, SensorError> {
        Ok(self.sample(threshold))
    }

    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        Ok(self.sample(RAW_THRESHOLD))
    }
}
