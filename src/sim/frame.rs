//! Per-frame orchestration
//!
//! One `step` runs the whole pipeline for a single frame:
//! signal source -> kinematics -> display scale -> persistence trail -> snapshot.
//! Parameters arrive as an immutable snapshot; the trail is the only state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::kinematics::{KinematicModel, TrajectoryPoint};
use super::persistence::{PersistenceBuffer, TrailEntry};
use super::signal::{DeflectionVoltages, SignalMode, SignalSource, SinusoidalParams};
use crate::consts::{MIN_DISPLAY_DEFLECTION, TRAJECTORY_SAMPLES};

/// Operator settings for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameParams {
    /// Acceleration voltage `Va` (V)
    pub accel_voltage: f64,
    /// Active signal source
    pub mode: SignalMode,
    /// Plate voltages used in manual mode
    pub manual: DeflectionVoltages,
    /// Generator settings used in sinusoidal mode
    pub sinusoid: SinusoidalParams,
    /// Trail capacity (points)
    pub persistence: usize,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            accel_voltage: 2000.0,
            mode: SignalMode::Sinusoidal,
            manual: DeflectionVoltages::default(),
            sinusoid: SinusoidalParams::default(),
            persistence: 250,
        }
    }
}

impl FrameParams {
    /// Pick the source for this frame from the mode flag
    pub fn signal_source(&self) -> SignalSource {
        match self.mode {
            SignalMode::Manual => SignalSource::Manual {
                horizontal: self.manual.horizontal,
                vertical: self.manual.vertical,
            },
            SignalMode::Sinusoidal => SignalSource::Sinusoidal(self.sinusoid),
        }
    }
}

/// Everything the renderer needs for one frame.
///
/// Borrows the trail, so it must be dropped before the next `step`.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    /// Simulation time the frame was computed for (s)
    pub time: f64,
    pub mode: SignalMode,
    /// Plate voltages applied this frame
    pub voltages: DeflectionVoltages,
    /// Beam path, gun to screen
    pub trajectory: Vec<TrajectoryPoint>,
    /// Display scale reference (m), never below the fallback floor
    pub max_deflect: f64,
    /// Current impact (m), x horizontal / y vertical
    pub impact: DVec2,
    /// Current impact in normalized screen space
    pub screen: DVec2,
    /// `Va` the frame was simulated under
    pub accel_voltage: f64,
    /// Phosphor trail, oldest first (includes this frame's impact)
    pub trail: &'a PersistenceBuffer,
}

/// Runs the simulation one frame at a time
#[derive(Debug, Clone)]
pub struct FrameEngine {
    model: KinematicModel,
    trail: PersistenceBuffer,
    /// Nominal plate voltage used for the display scale
    max_deflect_voltage: f64,
    samples: usize,
}

impl FrameEngine {
    pub fn new(model: KinematicModel, max_deflect_voltage: f64) -> Self {
        Self {
            model,
            trail: PersistenceBuffer::new(0),
            max_deflect_voltage,
            samples: TRAJECTORY_SAMPLES,
        }
    }

    /// Override the trajectory sample count
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    #[inline]
    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    #[inline]
    pub fn max_deflect_voltage(&self) -> f64 {
        self.max_deflect_voltage
    }

    #[inline]
    pub fn trail(&self) -> &PersistenceBuffer {
        &self.trail
    }

    #[inline]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Drop all persisted impacts (e.g. when the tube is reconfigured)
    pub fn reset_trail(&mut self) {
        self.trail.clear();
    }

    /// Advance one frame at simulation time `time` (seconds)
    pub fn step(&mut self, time: f64, params: &FrameParams) -> FrameSnapshot<'_> {
        let source = params.signal_source();
        let voltages = source.voltages(time);

        // Read once; the trail entry must carry the same Va as the trajectory
        let accel_voltage = params.accel_voltage;

        let trajectory = self.model.trajectory(
            accel_voltage,
            voltages.horizontal,
            voltages.vertical,
            self.samples,
        );

        let mut max_deflect = self.model.max_deflection(accel_voltage, self.max_deflect_voltage);
        if max_deflect < MIN_DISPLAY_DEFLECTION {
            log::debug!("Display scale fell back to plate separation (Va={accel_voltage})");
            max_deflect = self.model.geometry().plate_separation();
        }

        let impact = trajectory
            .last()
            .map(TrajectoryPoint::transverse)
            .unwrap_or(DVec2::ZERO);
        let screen = impact / max_deflect;

        if params.persistence != self.trail.capacity() {
            log::debug!(
                "Persistence capacity {} -> {}",
                self.trail.capacity(),
                params.persistence
            );
            self.trail.set_capacity(params.persistence);
        }
        self.trail.push(TrailEntry {
            screen,
            accel_voltage,
        });

        FrameSnapshot {
            time,
            mode: source.mode(),
            voltages,
            trajectory,
            max_deflect,
            impact,
            screen,
            accel_voltage,
            trail: &self.trail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FrameEngine {
        FrameEngine::new(KinematicModel::default(), 140.0)
    }

    #[test]
    fn test_manual_zero_is_centered() {
        let mut eng = engine();
        let params = FrameParams {
            mode: SignalMode::Manual,
            ..Default::default()
        };
        let snap = eng.step(0.5, &params);
        assert_eq!(snap.trajectory.len(), TRAJECTORY_SAMPLES);
        assert!(snap.trajectory.iter().all(|p| p.vertical == 0.0 && p.horizontal == 0.0));
        assert_eq!(snap.impact, DVec2::ZERO);
        assert_eq!(snap.screen, DVec2::ZERO);
        assert_eq!(snap.trail.len(), 1);
    }

    #[test]
    fn test_sinusoidal_at_zero() {
        let mut eng = engine();
        let snap = eng.step(0.0, &FrameParams::default());
        assert_eq!(snap.mode, SignalMode::Sinusoidal);
        assert_eq!(snap.voltages.horizontal, 100.0);
        assert_eq!(snap.voltages.vertical, 100.0);
        assert!(snap.impact.x > 0.0);
        assert_eq!(snap.impact.x, snap.impact.y);

        // 100 V against a 140 V reference lands at 100/140 of full scale
        assert!((snap.screen.x - 100.0 / 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_trail_records_simulated_voltage() {
        let mut eng = engine();
        let mut params = FrameParams::default();
        for (i, va) in [2000.0, 2500.0, 3000.0].into_iter().enumerate() {
            params.accel_voltage = va;
            let snap = eng.step(i as f64 / 60.0, &params);
            assert_eq!(snap.accel_voltage, va);
            assert_eq!(snap.trail.latest().map(|e| e.accel_voltage), Some(va));
            assert_eq!(snap.trail.latest().map(|e| e.screen), Some(snap.screen));
        }
        let recorded: Vec<f64> = eng.trail().entries().map(|e| e.accel_voltage).collect();
        assert_eq!(recorded, vec![2000.0, 2500.0, 3000.0]);
    }

    #[test]
    fn test_capacity_follows_params() {
        let mut eng = engine();
        let mut params = FrameParams {
            persistence: 10,
            ..Default::default()
        };
        for i in 0..20 {
            eng.step(i as f64 / 60.0, &params);
        }
        assert_eq!(eng.trail_len(), 10);

        params.persistence = 3;
        let snap = eng.step(1.0, &params);
        assert_eq!(snap.trail.len(), 3);

        eng.reset_trail();
        assert_eq!(eng.trail_len(), 0);
    }

    #[test]
    fn test_beam_off_uses_fallback_scale() {
        let mut eng = engine();
        let params = FrameParams {
            accel_voltage: 0.0,
            ..Default::default()
        };
        let snap = eng.step(0.0, &params);
        assert_eq!(snap.max_deflect, KinematicModel::default().geometry().plate_separation());
        assert_eq!(snap.impact, DVec2::ZERO);
    }

    #[test]
    fn test_scale_matches_model() {
        let mut eng = engine();
        let params = FrameParams::default();
        let snap = eng.step(0.0, &params);
        let model = KinematicModel::default();
        assert_eq!(snap.max_deflect, model.max_deflection(params.accel_voltage, 140.0));
        assert_eq!(snap.max_deflect, model.display_scale(params.accel_voltage, 140.0));
    }

    #[test]
    fn test_deterministic() {
        let mut a = engine();
        let mut b = engine();
        let params = FrameParams {
            sinusoid: SinusoidalParams {
                amplitude: 80.0,
                freq_horizontal: 3.0,
                freq_vertical: 2.0,
                phase: 0.7,
            },
            ..Default::default()
        };
        for i in 0..30 {
            let t = i as f64 / 60.0;
            let sa = a.step(t, &params).screen;
            let sb = b.step(t, &params).screen;
            assert_eq!(sa, sb);
        }
    }
}
