//! Cyclic Coordinate Descent
//!
//! Visits joints from the tip back to the base. Each joint is rotated by a
//! damped fraction of the angle between "pivot to end effector" and "pivot to
//! goal", and forward kinematics is refreshed before the next joint so every
//! correction sees the geometry left by the previous one.

use glam::DVec2;

use super::direction;
use crate::chain::Chain;

/// Signed angle that rotates `from` onto `to`, both unit vectors
///
/// Positive when `to` lies counter-clockwise of `from` in a y-up frame
/// (the z component of `from × to` is positive).
pub(crate) fn signed_angle(from: DVec2, to: DVec2) -> f64 {
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    if from.perp_dot(to) < 0.0 { -angle } else { angle }
}

/// One tip-to-base pass
pub(crate) fn step(chain: &mut Chain, goal: DVec2) {
    let gain = chain.params().ccd_step;

    for index in (0..chain.segments.len()).rev() {
        let pivot = chain.segments[index].start;
        let to_effector = direction(chain.end_effector - pivot);
        let to_goal = direction(goal - pivot);

        let (Some(re), Some(rg)) = (to_effector, to_goal) else {
            tracing::trace!(segment = index, "CCD skipping joint with degenerate direction");
            continue;
        };

        chain.segments[index].rotate(gain * signed_angle(re, rg));
        chain.recompute();
    }
}
