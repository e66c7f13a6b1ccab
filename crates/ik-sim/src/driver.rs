//! Per-frame driver loop

use std::io::Write;

use ik_core::{ChainStatus, ConfigError, DVec2, IkConfig, Scene, ScriptedClick};

/// Errors surfaced by the simulation binary
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a driver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub left: ChainStatus,
    pub right: ChainStatus,
    pub left_distance: f64,
    pub right_distance: f64,
}

/// Owns the scene and the click script, and steps one frame per tick
pub struct Driver {
    scene: Scene,
    /// Remaining clicks, sorted by frame
    script: Vec<ScriptedClick>,
    next_click: usize,
    frames: u32,
    until_settled: bool,
    /// Frame at which the current goals were set
    goal_frame: u32,
}

impl Driver {
    pub fn new(config: &IkConfig, until_settled: bool) -> Result<Self, ConfigError> {
        let scene = Scene::new(config)?;
        let mut script = config.script.clone();
        script.sort_by_key(|click| click.frame);
        Ok(Self {
            scene,
            script,
            next_click: 0,
            frames: config.frames,
            until_settled,
            goal_frame: 0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Run every frame, writing JSON lines to `dump` when given
    pub fn run(&mut self, mut dump: Option<&mut dyn Write>) -> Result<RunSummary, SimError> {
        let mut ran = 0;
        for frame in 0..self.frames {
            self.apply_clicks(frame);

            if self.until_settled && self.next_click == self.script.len() && self.scene.is_settled()
            {
                tracing::info!(frame, "Both chains settled; stopping early");
                break;
            }

            let before = (self.scene.left().status(), self.scene.right().status());
            let snapshot = self.scene.frame();
            ran += 1;
            self.report(frame, before.0, snapshot.left.status, "left");
            self.report(frame, before.1, snapshot.right.status, "right");

            if let Some(out) = dump.as_deref_mut() {
                serde_json::to_writer(&mut *out, &snapshot)?;
                writeln!(out)?;
            }
        }

        if let Some(out) = dump.as_deref_mut() {
            out.flush()?;
        }

        let summary = self.summary(ran);
        tracing::info!(
            frames = summary.frames,
            left = ?summary.left,
            left_distance = summary.left_distance,
            right = ?summary.right,
            right_distance = summary.right_distance,
            "Simulation finished"
        );
        Ok(summary)
    }

    fn apply_clicks(&mut self, frame: u32) {
        while let Some(click) = self.script.get(self.next_click) {
            if click.frame > frame {
                break;
            }
            self.scene.click(DVec2::new(click.x, click.y));
            self.goal_frame = frame;
            self.next_click += 1;
        }
    }

    fn report(&self, frame: u32, before: ChainStatus, after: ChainStatus, side: &str) {
        if before == after {
            return;
        }
        let frames_taken = frame + 1 - self.goal_frame;
        match after {
            ChainStatus::Idle => {
                tracing::info!(side, frames_taken, "Chain reached its goal")
            }
            ChainStatus::Stalled => {
                tracing::warn!(side, frames_taken, "Chain stalled short of its goal")
            }
            ChainStatus::Stepping => tracing::debug!(side, frame, "Chain moving"),
        }
    }

    fn summary(&self, frames: u32) -> RunSummary {
        let (left_goal, right_goal) = self.scene.goals();
        RunSummary {
            frames,
            left: self.scene.left().status(),
            right: self.scene.right().status(),
            left_distance: self.scene.left().end_effector().distance(left_goal),
            right_distance: self.scene.right().end_effector().distance(right_goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frames: u32, script: Vec<ScriptedClick>) -> IkConfig {
        let mut config = IkConfig::default();
        config.frames = frames;
        config.script = script;
        config
    }

    #[test]
    fn test_no_clicks_stays_idle() {
        let mut driver = Driver::new(&config(5, Vec::new()), false).unwrap();
        let summary = driver.run(None).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.left, ChainStatus::Idle);
        assert_eq!(summary.right, ChainStatus::Idle);
        assert_eq!(summary.left_distance, 0.0);
    }

    #[test]
    fn test_clicks_applied_in_frame_order() {
        let script = vec![
            ScriptedClick { frame: 4, x: 900.0, y: 300.0 },
            ScriptedClick { frame: 1, x: 300.0, y: 500.0 },
        ];
        let mut driver = Driver::new(&config(3, script), false).unwrap();
        driver.run(None).unwrap();

        // Only the frame-1 click has happened after three frames
        let (left, right) = driver.scene().goals();
        assert_eq!(left, DVec2::new(300.0, 500.0));
        assert_eq!(right, DVec2::new(940.0, 500.0));
    }

    #[test]
    fn test_dump_writes_one_line_per_frame() {
        let script = vec![ScriptedClick { frame: 0, x: 350.0, y: 450.0 }];
        let mut driver = Driver::new(&config(4, script), false).unwrap();

        let mut out = Vec::new();
        driver.run(Some(&mut out as &mut dyn Write)).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["index"], 1);
        assert_eq!(first["left"]["lines"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_until_settled_stops_early() {
        // Short links keep Jacobian steps smaller than the tolerance box
        let mut config = config(100_000, vec![ScriptedClick { frame: 0, x: 130.0, y: 130.0 }]);
        config.scene.width = 400.0;
        config.scene.height = 200.0;
        config.scene.link_length = Some(20.0);
        let mut driver = Driver::new(&config, true).unwrap();
        let mut out = Vec::new();
        let summary = driver.run(Some(&mut out as &mut dyn Write)).unwrap();

        assert!(summary.frames < 100_000);
        assert_eq!(summary.left, ChainStatus::Idle);
        assert_eq!(summary.right, ChainStatus::Idle);

        // The last dumped frame is the one that settled the scene
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len() as u32, summary.frames);
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["left"]["status"], "Idle");
        assert_eq!(last["right"]["status"], "Idle");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = config(10, Vec::new());
        config.scene.segments_per_chain = 0;
        assert!(matches!(Driver::new(&config, false), Err(ConfigError::InvalidValue { .. })));
    }
}
