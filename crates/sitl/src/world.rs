//! Simulated chassis on a painted track
//!
//! The chassis is square and only translates. Drive angle 0 points west
//! (-x), 90 north, 180 east and 270 south. One IR array sits on each edge:
//!
//! | Array   | Edge  | Unit 0 at   |
//! |---------|-------|-------------|
//! | `Left`  | west  | north end   |
//! | `Back`  | north | east end    |
//! | `Right` | east  | south end   |
//! | `Front` | south | west end    |
//!
//! so unit indices increase counter-clockwise around the chassis.
//!
//! Wheel speeds are integrated lazily: whenever the world is touched it
//! first advances the vehicle to the current clock time at the wheel
//! speeds that were in effect.

use std::cell::RefCell;
use std::rc::Rc;

use line_follower_core::motion::body_velocity;
use line_follower_core::motor::Wheel;
use line_follower_core::traits::TimeSource;
use line_follower_core::{Side, UNITS_PER_ARRAY};
use serde::{Deserialize, Serialize};

use crate::platform::SimClock;
use crate::track::Track;

/// World handle shared by the simulated sensors and motors
pub type SharedWorld = Rc<RefCell<SimWorld>>;

/// Point in world metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Chassis geometry and speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChassisConfig {
    /// Edge length of the square chassis in metres
    pub side_m: f32,
    /// Distance between neighbouring IR units in metres
    pub unit_spacing_m: f32,
    /// Ground speed at full wheel speed in m/s
    pub max_speed_mps: f32,
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            side_m: 0.30,
            unit_spacing_m: 0.0125,
            max_speed_mps: 0.5,
        }
    }
}

/// Vehicle state on the track
#[derive(Debug)]
pub struct SimWorld {
    track: Track,
    chassis: ChassisConfig,
    clock: SimClock,
    position: Position,
    wheels: [f32; 4],
    last_update_us: u64,
    distance_m: f32,
}

impl SimWorld {
    pub fn new(track: Track, chassis: ChassisConfig, clock: SimClock, start: Position) -> Self {
        let last_update_us = clock.now_us();
        Self {
            track,
            chassis,
            clock,
            position: start,
            wheels: [0.0; 4],
            last_update_us,
            distance_m: 0.0,
        }
    }

    /// Wrap in a [`SharedWorld`] handle
    pub fn shared(track: Track, chassis: ChassisConfig, clock: SimClock, start: Position) -> SharedWorld {
        Rc::new(RefCell::new(Self::new(track, chassis, clock, start)))
    }

    /// Integrate motion up to the current clock time
    pub fn advance(&mut self) {
        let now_us = self.clock.now_us();
        let dt = now_us.saturating_sub(self.last_update_us) as f32 / 1_000_000.0;
        self.last_update_us = now_us;
        if dt <= 0.0 {
            return;
        }

        let (vx, vy) = body_velocity(&self.wheels);
        let dx = -vx * self.chassis.max_speed_mps * dt;
        let dy = vy * self.chassis.max_speed_mps * dt;
        self.position.x += dx;
        self.position.y += dy;
        self.distance_m += (dx * dx + dy * dy).sqrt();
    }

    /// Set one wheel speed after integrating the old speeds up to now
    pub fn set_wheel(&mut self, wheel: Wheel, speed: f32) {
        self.advance();
        self.wheels[wheel.index()] = speed;
    }

    pub fn wheel(&self, wheel: Wheel) -> f32 {
        self.wheels[wheel.index()]
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Path length travelled so far
    pub fn distance_m(&self) -> f32 {
        self.distance_m
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn chassis(&self) -> &ChassisConfig {
        &self.chassis
    }

    /// World position of unit `index` of the array on `side`
    pub fn unit_position(&self, side: Side, index: usize) -> Position {
        let half = self.chassis.side_m / 2.0;
        let offset = (index as f32 - (UNITS_PER_ARRAY - 1) as f32 / 2.0) * self.chassis.unit_spacing_m;
        let Position { x, y } = self.position;
        match side {
            Side::Left => Position::new(x - half, y - offset),
            Side::Back => Position::new(x - offset, y + half),
            Side::Right => Position::new(x + half, y + offset),
            Side::Front => Position::new(x + offset, y - half),
        }
    }

    /// Whether unit `index` of `side` is over a stripe
    pub fn unit_on_line(&self, side: Side, index: usize) -> bool {
        let p = self.unit_position(side, index);
        self.track.contains(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Stripe;

    fn world(track: Track) -> (SimWorld, SimClock) {
        let clock = SimClock::new();
        let world = SimWorld::new(track, ChassisConfig::default(), clock.clone(), Position::default());
        (world, clock)
    }

    #[test]
    fn test_units_wind_counter_clockwise() {
        let (world, _) = world(Track::default());
        let first = world.unit_position(Side::Left, 0);
        let last = world.unit_position(Side::Left, 15);
        assert!(first.y > last.y);
        assert!(world.unit_position(Side::Back, 0).x > world.unit_position(Side::Back, 15).x);
        assert!(world.unit_position(Side::Right, 0).y < world.unit_position(Side::Right, 15).y);
        assert!(world.unit_position(Side::Front, 0).x < world.unit_position(Side::Front, 15).x);
        assert!((first.x + 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_centred_line_lights_middle_pair() {
        let track = Track::new(vec![Stripe::horizontal(0.0, -1.0, 1.0, 0.025)]);
        let (world, _) = world(track);
        let lit: Vec<usize> = (0..UNITS_PER_ARRAY)
            .filter(|&i| world.unit_on_line(Side::Left, i))
            .collect();
        assert_eq!(lit, vec![7, 8]);
        assert!(!(0..UNITS_PER_ARRAY).any(|i| world.unit_on_line(Side::Back, i)));
    }

    #[test]
    fn test_drive_angle_zero_moves_west() {
        let (mut world, clock) = world(Track::default());
        for wheel in Wheel::ALL {
            world.set_wheel(wheel, 1.0);
        }
        clock.advance_us(1_000_000);
        world.advance();
        let p = world.position();
        assert!((p.x + 0.5).abs() < 1e-5, "{:?}", p);
        assert!(p.y.abs() < 1e-5);
        assert!((world.distance_m() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_strafe_moves_north() {
        let (mut world, clock) = world(Track::default());
        // Angle 90: front left and back right reverse
        world.set_wheel(Wheel::FrontLeft, -1.0);
        world.set_wheel(Wheel::FrontRight, 1.0);
        world.set_wheel(Wheel::BackLeft, 1.0);
        world.set_wheel(Wheel::BackRight, -1.0);
        clock.advance_us(500_000);
        world.advance();
        let p = world.position();
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 0.25).abs() < 1e-5);
    }
}
