//! Jacobian-transpose solver
//!
//! For a revolute joint about the z axis at pivot `p`, rotating by `dθ` moves
//! the end effector `e` by `dθ * ẑ × (e - p)`. Stacking those vectors gives
//! the transpose of the positional Jacobian, which this solver applies
//! directly to a unit step towards the goal instead of inverting `J`.
//!
//! The transpose is only an approximation of the inverse. It stays stable
//! here because the step towards the goal is normalised and every joint
//! update is heavily damped.

use glam::DVec2;

use super::direction;
use crate::chain::Chain;

/// Rows of `Jᵀ`: one end-effector sensitivity vector per joint
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianTranspose {
    rows: Vec<DVec2>,
}

impl JacobianTranspose {
    /// Build the scaled sensitivity rows for the chain's current pose
    pub fn from_chain(chain: &Chain) -> Self {
        let scale = chain.params().jacobian_scale;
        let effector = chain.end_effector();
        let rows = chain
            .segments()
            .iter()
            // ẑ × (x, y, 0) = (-y, x, 0)
            .map(|seg| ((effector - seg.start()) / scale).perp())
            .collect();
        Self { rows }
    }

    /// Sensitivity rows in base-to-tip order
    pub fn rows(&self) -> &[DVec2] {
        &self.rows
    }

    /// Per-joint angle change for a desired end effector displacement
    pub fn joint_deltas(&self, displacement: DVec2) -> Vec<f64> {
        self.rows.iter().map(|row| row.dot(displacement)).collect()
    }
}

/// One batched update of every joint
pub(crate) fn step(chain: &mut Chain, goal: DVec2) {
    let Some(towards_goal) = direction(goal - chain.end_effector()) else {
        tracing::trace!("Jacobian step skipped: end effector already on goal");
        return;
    };

    let gain = chain.params().jacobian_step;
    let deltas = JacobianTranspose::from_chain(chain).joint_deltas(towards_goal);

    for (seg, delta) in chain.segments.iter_mut().zip(deltas) {
        seg.rotate(gain * delta);
    }
    chain.recompute();
}
