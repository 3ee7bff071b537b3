//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Extent of an axis-aligned box (field units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned bounding box. `min` is the top-left corner; y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub size: Size,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both extents strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Aabb {
    pub fn new(min: DVec2, size: Size) -> Self {
        Self { min, size }
    }

    pub fn max_x(&self) -> f64 {
        self.min.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.min.y + self.size.height
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max_x()
            && self.max_x() > other.min.x
            && self.min.y < other.max_y()
            && self.max_y() > other.min.y
    }
}

impl SimTime {
    /// Advance by one tick at the given rate.
    pub fn advance(&mut self, tick_rate: u32) {
        self.tick += 1;
        self.elapsed_secs += 1.0 / f64::from(tick_rate.max(1));
    }
}
