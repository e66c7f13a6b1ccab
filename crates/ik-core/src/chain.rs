//! Planar kinematic chain
//!
//! A [`Chain`] is an ordered list of [`Segment`]s from a fixed anchor to a
//! free tip. Insertion order is kinematic order: segment `i` always starts
//! where segment `i - 1` ends, and the first segment starts at the anchor.
//!
//! The chain owns its forward kinematics, its convergence bookkeeping and the
//! solver picked at construction. Solvers only ever mutate segment angles;
//! positions are derived by [`Chain::recompute`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::INITIAL_SEGMENT_ANGLE;
use crate::segment::Segment;
use crate::solver::{SolverKind, SolverParams};

/// Why a chain stopped moving towards its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    /// End effector is within tolerance of the goal on both axes
    Reached,
    /// Last step barely moved the end effector (goal out of reach or the
    /// pose is degenerate)
    Stalled,
}

/// Solver state of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChainStatus {
    /// Goal reached; steps are no-ops
    #[default]
    Idle,
    /// Actively correcting towards the goal
    Stepping,
    /// Gave up at the closest reachable pose; steps are no-ops until retarget
    Stalled,
}

impl From<Convergence> for ChainStatus {
    fn from(convergence: Convergence) -> Self {
        match convergence {
            Convergence::Reached => ChainStatus::Idle,
            Convergence::Stalled => ChainStatus::Stalled,
        }
    }
}

/// A drawable line, one per segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: DVec2,
    pub end: DVec2,
}

/// Planar chain of revolute joints
#[derive(Debug, Clone)]
pub struct Chain {
    anchor: DVec2,
    pub(crate) segments: Vec<Segment>,
    total_length: f64,
    pub(crate) end_effector: DVec2,
    previous_end_effector: Option<DVec2>,
    solver: SolverKind,
    params: SolverParams,
    status: ChainStatus,
}

impl Chain {
    /// Create an empty chain anchored at `anchor` using default parameters
    pub fn new(anchor: DVec2, solver: SolverKind) -> Self {
        Self::with_params(anchor, solver, SolverParams::default())
    }

    /// Create an empty chain with explicit solver parameters
    pub fn with_params(anchor: DVec2, solver: SolverKind, params: SolverParams) -> Self {
        Self {
            anchor,
            segments: Vec::new(),
            total_length: 0.0,
            end_effector: anchor,
            previous_end_effector: None,
            solver,
            params,
            status: ChainStatus::Idle,
        }
    }

    /// Append a segment of `length` at the tip, pointing straight down
    ///
    /// `length` must be positive.
    pub fn add_link(&mut self, length: f64) {
        debug_assert!(length > 0.0, "segment length must be positive, got {length}");

        let start = self.tip().map_or(self.anchor, Segment::end);
        let segment = Segment::new(start, length, INITIAL_SEGMENT_ANGLE);
        self.end_effector = segment.end();
        self.segments.push(segment);
        self.total_length += length;
    }

    // ============== Accessors ==============

    /// Fixed base point
    pub fn anchor(&self) -> DVec2 {
        self.anchor
    }

    /// Segments in base-to-tip order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Last segment, if any
    pub fn tip(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Sum of all segment lengths
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Current tip position
    pub fn end_effector(&self) -> DVec2 {
        self.end_effector
    }

    /// End effector position recorded before the most recent solver pass
    pub fn previous_end_effector(&self) -> Option<DVec2> {
        self.previous_end_effector
    }

    /// Solver selected at construction
    pub fn solver(&self) -> SolverKind {
        self.solver
    }

    /// Solver parameters
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Status reported by the most recent [`Chain::step`] or [`Chain::retarget`]
    pub fn status(&self) -> ChainStatus {
        self.status
    }

    /// Whether `goal` lies within the chain's total reach from the anchor
    ///
    /// Diagnostic only. Solvers never consult it; unreachable goals end in a
    /// stall instead.
    pub fn can_reach(&self, goal: DVec2) -> bool {
        self.anchor.distance(goal) <= self.total_length
    }

    /// Line per segment in base-to-tip order
    pub fn lines(&self) -> impl Iterator<Item = LineSegment> + Clone + '_ {
        self.segments.iter().map(|seg| LineSegment {
            start: seg.start(),
            end: seg.end(),
        })
    }

    // ============== Kinematics ==============

    /// Forward kinematics: rebuild every start point from the anchor outwards
    pub fn recompute(&mut self) {
        let mut cursor = self.anchor;
        for seg in &mut self.segments {
            seg.start = cursor;
            cursor = seg.end();
        }
        self.end_effector = cursor;
    }

    /// Check whether the chain should stop moving towards `goal`
    ///
    /// Reaching the goal takes precedence over stalling. Stall detection only
    /// applies once a previous end effector position has been recorded.
    pub fn convergence(&self, goal: DVec2) -> Option<Convergence> {
        let to_goal = (self.end_effector - goal).abs();
        if to_goal.x <= self.params.tolerance && to_goal.y <= self.params.tolerance {
            return Some(Convergence::Reached);
        }

        let previous = self.previous_end_effector?;
        let moved = (previous - self.end_effector).abs();
        if moved.x < self.params.stall_epsilon && moved.y < self.params.stall_epsilon {
            return Some(Convergence::Stalled);
        }

        None
    }

    /// Whether the chain is at (or as close as it gets to) `goal`
    pub fn is_converged(&self, goal: DVec2) -> bool {
        self.convergence(goal).is_some()
    }

    /// Advance one frame towards `goal`
    ///
    /// Does nothing once converged. Otherwise records the current end
    /// effector for stall detection and runs one pass of the chain's solver.
    /// The returned status reflects the pose after that pass, so the frame
    /// that reaches the goal already reports `Idle`.
    pub fn step(&mut self, goal: DVec2) -> ChainStatus {
        let status = match self.convergence(goal) {
            Some(convergence) => convergence.into(),
            None => {
                self.previous_end_effector = Some(self.end_effector);
                let solver = self.solver;
                solver.apply(self, goal);
                self.convergence(goal).map_or(ChainStatus::Stepping, ChainStatus::from)
            }
        };
        self.set_status(status);
        status
    }

    /// Forget the recorded end effector so stall detection re-arms for a new goal
    ///
    /// Must be called whenever the goal changes; otherwise the first step
    /// towards the new goal compares against a position from the old one.
    pub fn retarget(&mut self) {
        self.previous_end_effector = None;
        self.set_status(ChainStatus::Stepping);
    }

    fn set_status(&mut self, status: ChainStatus) {
        if status != self.status {
            tracing::debug!(
                solver = self.solver.name(),
                from = ?self.status,
                to = ?status,
                end_effector = ?self.end_effector,
                "Chain status changed"
            );
            self.status = status;
        }
    }
}
