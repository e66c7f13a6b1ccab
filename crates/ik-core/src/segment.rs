//! Rigid chain segment

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One rigid link of a planar chain
///
/// The length is fixed at creation. The start point is rewritten by every
/// forward kinematics pass and the angle is only written by the solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub(crate) start: DVec2,
    length: f64,
    pub(crate) angle: f64,
}

impl Segment {
    pub(crate) fn new(start: DVec2, length: f64, angle: f64) -> Self {
        Self {
            start,
            length,
            angle,
        }
    }

    /// Start point (the joint pivot)
    pub fn start(&self) -> DVec2 {
        self.start
    }

    /// Link length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Orientation in radians, within `[0, 2π)` once a solver has touched it
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// End point derived from start, length and angle
    pub fn end(&self) -> DVec2 {
        self.start + self.length * DVec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Add `delta` to the angle and wrap the result into `[0, 2π)`
    pub(crate) fn rotate(&mut self, delta: f64) {
        self.angle = wrap_angle(self.angle + delta);
    }
}

/// Wrap an angle into `[0, 2π)`, negative inputs included
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
