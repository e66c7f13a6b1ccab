//! IK solvers
//!
//! Both solvers advance a [`Chain`] by one damped pass per call. Convergence
//! happens across repeated calls (one per frame), never inside a single one.
//!
//! - [`ccd`]: Cyclic Coordinate Descent, joints corrected one at a time from
//!   tip to base with forward kinematics refreshed after each joint
//! - [`jacobian`]: Jacobian transpose, all joints corrected at once from a
//!   linearised sensitivity matrix

pub mod ccd;
pub mod jacobian;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::constants::{
    DEFAULT_CCD_STEP, DEFAULT_JACOBIAN_SCALE, DEFAULT_JACOBIAN_STEP, DEFAULT_STALL_EPSILON,
    DEFAULT_TOLERANCE, DIRECTION_EPSILON,
};

/// Which solver a chain runs, chosen once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Cyclic Coordinate Descent
    Ccd,
    /// Jacobian transpose used as an approximate inverse
    JacobianTranspose,
}

impl SolverKind {
    /// Run one pass of this solver on the chain
    ///
    /// Callers are expected to have checked convergence already; see
    /// [`Chain::step`].
    pub(crate) fn apply(self, chain: &mut Chain, goal: DVec2) {
        match self {
            SolverKind::Ccd => ccd::step(chain, goal),
            SolverKind::JacobianTranspose => jacobian::step(chain, goal),
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Ccd => "CCD",
            SolverKind::JacobianTranspose => "Jacobian transpose",
        }
    }
}

const fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
const fn default_stall_epsilon() -> f64 {
    DEFAULT_STALL_EPSILON
}
const fn default_ccd_step() -> f64 {
    DEFAULT_CCD_STEP
}
const fn default_jacobian_step() -> f64 {
    DEFAULT_JACOBIAN_STEP
}
const fn default_jacobian_scale() -> f64 {
    DEFAULT_JACOBIAN_SCALE
}

/// Tuning parameters shared by both solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Per-axis distance to the goal that counts as reached
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Per-axis displacement per step below which the chain counts as stalled
    #[serde(default = "default_stall_epsilon")]
    pub stall_epsilon: f64,
    /// Damping factor for CCD joint corrections
    #[serde(default = "default_ccd_step")]
    pub ccd_step: f64,
    /// Damping factor for Jacobian-transpose joint corrections
    #[serde(default = "default_jacobian_step")]
    pub jacobian_step: f64,
    /// Divisor applied to pivot-to-tip vectors in the Jacobian rows
    #[serde(default = "default_jacobian_scale")]
    pub jacobian_scale: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            stall_epsilon: default_stall_epsilon(),
            ccd_step: default_ccd_step(),
            jacobian_step: default_jacobian_step(),
            jacobian_scale: default_jacobian_scale(),
        }
    }
}

/// Unit vector along `v`, or `None` when `v` is too short to have a direction
pub(crate) fn direction(v: DVec2) -> Option<DVec2> {
    let len = v.length();
    if len < DIRECTION_EPSILON || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}
