//! Planar Inverse Kinematics
//!
//! This crate provides:
//! - Planar kinematic chains of rigid segments with forward kinematics
//! - Cyclic Coordinate Descent and Jacobian-transpose solvers, stepped once
//!   per animation frame
//! - Convergence and stall detection for unreachable goals
//! - A two-arm scene that turns pointer clicks into goals and produces
//!   line geometry for a renderer
//! - RON configuration for the scene and solver parameters
//!
//! Coordinates follow screen conventions (y grows downwards); angles are
//! radians measured from +x towards +y.

pub mod chain;
pub mod config;
pub mod constants;
pub mod scene;
pub mod segment;
pub mod solver;

// Re-exports for convenience
pub use chain::{Chain, ChainStatus, Convergence, LineSegment};
pub use config::{ConfigError, IkConfig, SceneConfig, ScriptedClick};
pub use scene::{ChainFrame, Frame, Scene, split_click};
pub use segment::{Segment, wrap_angle};
pub use solver::jacobian::JacobianTranspose;
pub use solver::{SolverKind, SolverParams};

pub use glam::DVec2;
