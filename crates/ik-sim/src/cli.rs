//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use ik_core::ScriptedClick;

#[derive(Debug, Parser)]
#[command(about = "Headless frame driver for the two-arm IK scene (CCD left, Jacobian transpose right)")]
pub struct Args {
    /// RON scene configuration; defaults to the built-in reference scene
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Override the number of frames to run
    #[arg(long, short)]
    pub frames: Option<u32>,

    /// Extra click applied at the start of a frame, written `x,y@frame`
    #[arg(long = "click", value_parser = parse_click)]
    pub clicks: Vec<ScriptedClick>,

    /// Write every frame's geometry to stdout as one JSON object per line
    #[arg(long)]
    pub dump: bool,

    /// Stop early once both chains have settled and no clicks remain
    #[arg(long)]
    pub until_settled: bool,
}

/// Parse `x,y@frame` (the `@frame` part defaults to 0)
pub fn parse_click(text: &str) -> Result<ScriptedClick, String> {
    let (point, frame) = match text.split_once('@') {
        Some((point, frame)) => (
            point,
            frame
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid frame '{frame}': {e}"))?,
        ),
        None => (text, 0),
    };

    let (x, y) = point
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{point}'"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{s}'"))
    };

    Ok(ScriptedClick {
        frame,
        x: coord(x)?,
        y: coord(y)?,
    })
}
