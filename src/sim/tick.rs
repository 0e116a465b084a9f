//! Fixed timestep plumbing
//!
//! Two cadences drive the world: a variable-rate frame tick (threshold checks,
//! pool maintenance) and a fixed-rate tick (movement, distance). The fixed
//! tick must stay fixed-interval regardless of render framerate; pause and time
//! scale are passed in explicitly through `TickContext`.

use crate::consts::{FIXED_HZ, MAX_SUBSTEPS, MPS_TO_KMH};

/// Per-tick simulation context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub paused: bool,
    /// Multiplier on world speed (1.0 = normal)
    pub time_scale: f32,
}

impl Default for TickContext {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: 1.0,
        }
    }
}

impl TickContext {
    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Default::default()
        }
    }

    /// Scale actually applied to movement this tick
    #[inline]
    pub fn effective_scale(&self) -> f32 {
        if self.paused { 0.0 } else { self.time_scale }
    }
}

/// Turns variable frame deltas into a whole number of fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepper {
    dt: f32,
    accumulator: f32,
}

impl FixedStepper {
    pub fn new(hz: f32) -> Self {
        Self {
            dt: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add a frame delta and return how many fixed steps to run now.
    /// Capped at `MAX_SUBSTEPS`; leftover time beyond the cap is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(FIXED_HZ)
    }
}

/// Distance travelled and speeds derived from it
#[derive(Debug, Clone, Default)]
pub struct Odometer {
    fixed_hz: f32,
    distance: f32,
    last_distance: f32,
    mps: f32,
    kmh: f32,
}

impl Odometer {
    pub fn new(fixed_hz: f32) -> Self {
        Self {
            fixed_hz,
            ..Default::default()
        }
    }

    /// One fixed step at `speed` units per step
    pub fn advance(&mut self, speed: f32) {
        self.distance += speed;
        self.mps = (self.distance - self.last_distance) * self.fixed_hz;
        self.kmh = self.mps * MPS_TO_KMH;
        self.last_distance = self.distance;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.fixed_hz);
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn meters_per_second(&self) -> f32 {
        self.mps
    }

    #[inline]
    pub fn kmh(&self) -> f32 {
        self.kmh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odometer_derives_speed() {
        let mut odo = Odometer::new(50.0);
        odo.advance(0.1);
        odo.advance(0.1);
        assert!((odo.distance() - 0.2).abs() < 1e-6);
        assert!((odo.meters_per_second() - 5.0).abs() < 1e-4);
        assert!((odo.kmh() - 18.0).abs() < 1e-3);

        odo.advance(0.0);
        assert_eq!(odo.kmh(), 0.0);

        odo.reset();
        assert_eq!(odo.distance(), 0.0);
        odo.advance(0.02);
        assert!((odo.meters_per_second() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_stepper_is_framerate_independent() {
        let mut fast = FixedStepper::new(50.0);
        let mut slow = FixedStepper::new(50.0);

        let fast_steps: u32 = (0..120).map(|_| fast.advance(1.0 / 120.0)).sum();
        let slow_steps: u32 = (0..30).map(|_| slow.advance(1.0 / 30.0)).sum();

        // One second either way
        assert!((49..=50).contains(&fast_steps), "{fast_steps}");
        assert!((49..=50).contains(&slow_steps), "{slow_steps}");
    }

    #[test]
    fn test_stepper_caps_substeps() {
        let mut stepper = FixedStepper::new(1000.0);
        assert_eq!(stepper.advance(0.1), MAX_SUBSTEPS);
    }

    #[test]
    fn test_paused_context() {
        assert_eq!(TickContext::paused().effective_scale(), 0.0);
        assert_eq!(TickContext::default().effective_scale(), 1.0);
    }
}
