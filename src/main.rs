//! CRT Sim headless driver
//!
//! Runs the engine on a fixed 60 Hz simulated clock and prints the final
//! frame as JSON. Drawing is left to a host renderer.
//!
//! Usage: `crt-sim [settings.json|bench|lab] [frames >= 1]`

use std::path::Path;
use std::process::ExitCode;

use crt_sim::consts::FRAME_RATE;
use crt_sim::{Preset, Settings};

const DEFAULT_FRAMES: u32 = 600;

/// Frame count argument; at least one frame is always stepped
fn parse_frames(arg: Option<&str>) -> Result<u32, String> {
    match arg.map(str::parse::<u32>) {
        Some(Ok(0)) => Err("Frame count must be at least 1".to_string()),
        Some(Ok(n)) => Ok(n),
        Some(Err(e)) => Err(format!("Invalid frame count: {e}")),
        None => Ok(DEFAULT_FRAMES),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("CRT Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(arg) => match Preset::from_str(&arg) {
            Some(preset) => Settings::from_preset(preset),
            None => Settings::load_or_default(Path::new(&arg)),
        },
        None => Settings::default(),
    };
    let frames = match parse_frames(args.next().as_deref()) {
        Ok(n) => n,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = settings.validate() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }

    log::info!(
        "Preset {} | tube {:.2} m | {} frames",
        settings.preset.as_str(),
        settings.geometry.total_length(),
        frames
    );

    let params = settings.ranges.apply(&settings.initial);
    let mut engine = settings.engine();

    for frame in 0..frames - 1 {
        let time = frame as f64 / FRAME_RATE;
        let snap = engine.step(time, &params);
        if frame % FRAME_RATE as u32 == 0 {
            log::debug!(
                "t={:.2}s Vh={:+.1} Vv={:+.1} screen=({:+.3}, {:+.3}) trail={}",
                time,
                snap.voltages.horizontal,
                snap.voltages.vertical,
                snap.screen.x,
                snap.screen.y,
                snap.trail.len()
            );
        }
    }

    let last_time = (frames - 1) as f64 / FRAME_RATE;
    let snap = engine.step(last_time, &params);
    match serde_json::to_string_pretty(&snap) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frames() {
        assert_eq!(parse_frames(None), Ok(DEFAULT_FRAMES));
        assert_eq!(parse_frames(Some("1")), Ok(1));
        assert!(parse_frames(Some("0")).is_err());
        assert!(parse_frames(Some("-3")).is_err());
    }
}
