//! Two-arm scene
//!
//! The scene is the application context shared by the frame driver and the
//! input handler. It owns the viewport size, a CCD chain anchored in the left
//! half and a Jacobian-transpose chain anchored in the right half, plus the
//! goal each of them is chasing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainStatus, LineSegment};
use crate::config::{ConfigError, IkConfig};
use crate::constants::GOAL_MARKER_HALF_SIZE;
use crate::solver::{SolverKind, SolverParams};

/// Split one click into a goal for each half of the viewport
///
/// The clicked half gets the click itself; the other half gets the same
/// point shifted by half the width. Both goals share the click's y.
pub fn split_click(click: DVec2, width: f64) -> (DVec2, DVec2) {
    let half = width / 2.0;
    if click.x <= half {
        (click, DVec2::new(click.x + half, click.y))
    } else {
        (DVec2::new(click.x - half, click.y), click)
    }
}

/// Snapshot of one chain after a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFrame {
    pub solver: SolverKind,
    pub status: ChainStatus,
    pub goal: DVec2,
    pub end_effector: DVec2,
    pub lines: Vec<LineSegment>,
}

impl ChainFrame {
    fn capture(chain: &Chain, goal: DVec2) -> Self {
        Self {
            solver: chain.solver(),
            status: chain.status(),
            goal,
            end_effector: chain.end_effector(),
            lines: chain.lines().collect(),
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame number, starting at 1 for the first stepped frame
    pub index: u64,
    /// x of the vertical line separating the two halves
    pub divider_x: f64,
    /// Half the side of the square drawn around each goal
    pub goal_marker_half_size: f64,
    pub left: ChainFrame,
    pub right: ChainFrame,
}

/// Application context for the two-arm demo
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    left: Chain,
    right: Chain,
    left_goal: DVec2,
    right_goal: DVec2,
    frames: u64,
}

impl Scene {
    /// Build the scene described by `config`
    ///
    /// Each chain hangs straight down from the vertical centre of its half.
    /// The initial goals sit on the initial end effectors, so nothing moves
    /// until the first click. The config is validated first, since its
    /// fields are public and chains need positive link lengths.
    pub fn new(config: &IkConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let scene = &config.scene;
        let (width, height) = (scene.width, scene.height);
        let build = |anchor: DVec2, solver: SolverKind, params: SolverParams| {
            let mut chain = Chain::with_params(anchor, solver, params);
            for _ in 0..scene.segments_per_chain {
                chain.add_link(scene.link_length());
            }
            chain
        };

        let left = build(
            DVec2::new(width / 4.0, height / 2.0),
            SolverKind::Ccd,
            config.solver,
        );
        let right = build(
            DVec2::new(3.0 * width / 4.0, height / 2.0),
            SolverKind::JacobianTranspose,
            config.solver,
        );

        tracing::info!(
            width,
            height,
            segments = scene.segments_per_chain,
            link_length = scene.link_length(),
            "Scene created"
        );

        Ok(Self {
            width,
            height,
            left_goal: left.end_effector(),
            right_goal: right.end_effector(),
            left,
            right,
            frames: 0,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// CCD chain in the left half
    pub fn left(&self) -> &Chain {
        &self.left
    }

    /// Jacobian-transpose chain in the right half
    pub fn right(&self) -> &Chain {
        &self.right
    }

    /// Current goals as `(left, right)`
    pub fn goals(&self) -> (DVec2, DVec2) {
        (self.left_goal, self.right_goal)
    }

    /// Number of frames stepped so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Handle a pointer click at `point`
    ///
    /// Retargets both chains, which clears their stall detection.
    pub fn click(&mut self, point: DVec2) {
        let (left_goal, right_goal) = split_click(point, self.width);
        self.left_goal = left_goal;
        self.right_goal = right_goal;
        self.left.retarget();
        self.right.retarget();

        tracing::info!(left = ?left_goal, right = ?right_goal, "New goals");
        for (chain, goal) in [(&self.left, left_goal), (&self.right, right_goal)] {
            if !chain.can_reach(goal) {
                tracing::warn!(
                    solver = chain.solver().name(),
                    goal = ?goal,
                    reach = chain.total_length(),
                    "Goal is out of reach; chain will stall at its closest pose"
                );
            }
        }
    }

    /// Step both chains once (left first) and return the resulting geometry
    pub fn frame(&mut self) -> Frame {
        self.left.step(self.left_goal);
        self.right.step(self.right_goal);
        self.frames += 1;
        self.snapshot()
    }

    /// Geometry of the current state without stepping
    pub fn snapshot(&self) -> Frame {
        Frame {
            index: self.frames,
            divider_x: self.width / 2.0,
            goal_marker_half_size: GOAL_MARKER_HALF_SIZE,
            left: ChainFrame::capture(&self.left, self.left_goal),
            right: ChainFrame::capture(&self.right, self.right_goal),
        }
    }

    /// Whether neither chain has work left for its current goal
    pub fn is_settled(&self) -> bool {
        self.left.is_converged(self.left_goal) && self.right.is_converged(self.right_goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_split_click_left_half() {
        let (left, right) = split_click(DVec2::new(100.0, 50.0), 800.0);
        assert_eq!(left, DVec2::new(100.0, 50.0));
        assert_eq!(right, DVec2::new(500.0, 50.0));
    }

    #[test]
    fn test_split_click_right_half() {
        let (left, right) = split_click(DVec2::new(700.0, 30.0), 800.0);
        assert_eq!(left, DVec2::new(300.0, 30.0));
        assert_eq!(right, DVec2::new(700.0, 30.0));
    }

    #[test]
    fn test_split_click_on_divider_goes_left() {
        let (left, right) = split_click(DVec2::new(400.0, 10.0), 800.0);
        assert_eq!(left, DVec2::new(400.0, 10.0));
        assert_eq!(right, DVec2::new(800.0, 10.0));
    }

    #[test]
    fn test_reference_layout() {
        let scene = Scene::new(&IkConfig::default()).unwrap();
        let (w, h) = (scene.width(), scene.height());

        assert_eq!(scene.left().anchor(), DVec2::new(w / 4.0, h / 2.0));
        assert_eq!(scene.right().anchor(), DVec2::new(3.0 * w / 4.0, h / 2.0));
        assert_eq!(scene.left().solver(), SolverKind::Ccd);
        assert_eq!(scene.right().solver(), SolverKind::JacobianTranspose);
        assert_eq!(scene.left().segments().len(), 3);
        assert_abs_diff_eq!(scene.left().total_length(), 3.0 * h / 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_starts_settled() {
        let mut scene = Scene::new(&IkConfig::default()).unwrap();
        assert!(scene.is_settled());

        let before = scene.snapshot();
        let frame = scene.frame();
        assert_eq!(frame.index, 1);
        assert_eq!(frame.left.lines, before.left.lines);
        assert_eq!(frame.right.lines, before.right.lines);
        assert_eq!(frame.left.status, ChainStatus::Idle);
        assert_eq!(frame.right.status, ChainStatus::Idle);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = IkConfig::default();
        config.scene.link_length = Some(-4.0);
        assert!(matches!(
            Scene::new(&config),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "scene.link_length"
        ));

        let mut config = IkConfig::default();
        config.scene.segments_per_chain = 0;
        assert!(Scene::new(&config).is_err());
    }

    #[test]
    fn test_click_retargets_both_chains() {
        let mut scene = Scene::new(&IkConfig::default()).unwrap();
        let initial = scene.snapshot();
        let click = DVec2::new(scene.width() * 0.3, scene.height() * 0.6);
        scene.click(click);

        let (left, right) = scene.goals();
        assert_eq!(left, click);
        assert_eq!(right, DVec2::new(click.x + scene.width() / 2.0, click.y));
        assert_eq!(scene.left().status(), ChainStatus::Stepping);
        assert_eq!(scene.right().status(), ChainStatus::Stepping);
        assert!(scene.left().previous_end_effector().is_none());
        assert!(scene.right().previous_end_effector().is_none());

        let frame = scene.frame();
        assert_eq!(frame.left.goal, left);
        assert_eq!(frame.right.goal, right);
        assert_eq!(frame.divider_x, scene.width() / 2.0);
        assert_eq!(frame.left.lines.len(), 3);
        assert_ne!(frame.left.end_effector, initial.left.end_effector);
        assert_ne!(frame.right.end_effector, initial.right.end_effector);
    }
}
