//! Simulator settings and operator control ranges
//!
//! Persisted as JSON next to the binary (or wherever the caller points).
//! Every operator input is bounded by a `Range`; `ControlRanges::apply`
//! clamps a parameter snapshot before it reaches the engine.

use std::f64::consts::TAU;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TRAJECTORY_SAMPLES;
use crate::error::{CrtError, CrtResult};
use crate::sim::{
    DeflectionVoltages, FrameEngine, FrameParams, KinematicModel, SignalMode, SinusoidalParams,
    TubeGeometry,
};

/// Tube and control layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Long tube, 2000-3000 V gun, slow Lissajous generator
    #[default]
    Bench,
    /// Compact tube, 100-2000 V gun, audio-rate generator
    Lab,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Bench => "Bench",
            Preset::Lab => "Lab",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bench" => Some(Preset::Bench),
            "lab" => Some(Preset::Lab),
            _ => None,
        }
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the range.
    ///
    /// Never panics: an inverted range yields `max`, a NaN bound is ignored.
    #[inline]
    pub fn clamp(&self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }

    /// Position of `v` in the range, clamped to [0, 1]
    #[inline]
    pub fn normalize(&self, v: f64) -> f64 {
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    fn validate(&self, name: &'static str) -> CrtResult<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(CrtError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Bounds for every operator input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRanges {
    pub accel_voltage: Range,
    /// Manual plate voltage, both axes
    pub manual_voltage: Range,
    pub amplitude: Range,
    pub frequency: Range,
    pub phase: Range,
    /// Trail length in points
    pub persistence: Range,
}

impl ControlRanges {
    fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Bench => Self {
                accel_voltage: Range::new(2000.0, 3000.0),
                manual_voltage: Range::new(-150.0, 150.0),
                amplitude: Range::new(0.0, 140.0),
                frequency: Range::new(1.0, 5.0),
                phase: Range::new(0.0, TAU),
                persistence: Range::new(10.0, 500.0),
            },
            Preset::Lab => Self {
                accel_voltage: Range::new(100.0, 2000.0),
                manual_voltage: Range::new(-100.0, 100.0),
                amplitude: Range::new(0.0, 100.0),
                frequency: Range::new(1.0, 1000.0),
                phase: Range::new(0.0, TAU),
                persistence: Range::new(10.0, 500.0),
            },
        }
    }

    /// Clamp every field of a parameter snapshot into its range.
    ///
    /// Phase is wrapped into `[0, 2π)` rather than clamped. Ranges are
    /// expected to pass `validate`; inverted ones still clamp without panicking.
    pub fn apply(&self, params: &FrameParams) -> FrameParams {
        let phase = params.sinusoid.phase.rem_euclid(TAU);
        FrameParams {
            accel_voltage: self.accel_voltage.clamp(params.accel_voltage),
            mode: params.mode,
            manual: DeflectionVoltages {
                horizontal: self.manual_voltage.clamp(params.manual.horizontal),
                vertical: self.manual_voltage.clamp(params.manual.vertical),
            },
            sinusoid: SinusoidalParams {
                amplitude: self.amplitude.clamp(params.sinusoid.amplitude),
                freq_horizontal: self.frequency.clamp(params.sinusoid.freq_horizontal),
                freq_vertical: self.frequency.clamp(params.sinusoid.freq_vertical),
                phase: self.phase.clamp(phase),
            },
            persistence: self.persistence.clamp(params.persistence as f64).round() as usize,
        }
    }

    pub fn validate(&self) -> CrtResult<()> {
        self.accel_voltage.validate("accel_voltage")?;
        self.manual_voltage.validate("manual_voltage")?;
        self.amplitude.validate("amplitude")?;
        self.frequency.validate("frequency")?;
        self.phase.validate("phase")?;
        self.persistence.validate("persistence")?;
        if self.frequency.min <= 0.0 {
            return Err(CrtError::InvalidRange {
                name: "frequency",
                min: self.frequency.min,
                max: self.frequency.max,
            });
        }
        if self.persistence.min < 1.0 {
            return Err(CrtError::InvalidRange {
                name: "persistence",
                min: self.persistence.min,
                max: self.persistence.max,
            });
        }
        Ok(())
    }
}

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Preset the settings were derived from
    pub preset: Preset,
    pub geometry: TubeGeometry,
    pub ranges: ControlRanges,
    /// Nominal plate voltage that maps to full-scale on the display
    pub max_deflect_voltage: f64,
    /// `Va` range mapped onto the trail color ramp (independent of `ranges.accel_voltage`)
    pub trail_color_range: Range,
    /// Axial samples per trajectory
    #[serde(default = "default_samples")]
    pub trajectory_samples: usize,
    /// Operator state at startup
    pub initial: FrameParams,
}

fn default_samples() -> usize {
    TRAJECTORY_SAMPLES
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Preset::Bench)
    }
}

impl Settings {
    /// Create settings from a preset (geometry, ranges and startup state)
    pub fn from_preset(preset: Preset) -> Self {
        let ranges = ControlRanges::for_preset(preset);
        let (geometry, initial) = match preset {
            Preset::Bench => (TubeGeometry::default(), FrameParams::default()),
            Preset::Lab => (
                TubeGeometry::compact(),
                FrameParams {
                    accel_voltage: 1000.0,
                    mode: SignalMode::Manual,
                    manual: DeflectionVoltages::default(),
                    sinusoid: SinusoidalParams {
                        amplitude: 100.0,
                        freq_horizontal: 100.0,
                        freq_vertical: 100.0,
                        phase: 0.0,
                    },
                    persistence: 250,
                },
            ),
        };

        Self {
            preset,
            geometry,
            ranges,
            max_deflect_voltage: ranges.amplitude.max,
            trail_color_range: Range::new(2000.0, 3000.0),
            trajectory_samples: TRAJECTORY_SAMPLES,
            initial,
        }
    }

    /// Check ranges, color range and the startup state
    pub fn validate(&self) -> CrtResult<()> {
        self.ranges.validate()?;
        self.trail_color_range.validate("trail_color_range")?;
        self.initial.sinusoid.validate()?;
        if !(self.max_deflect_voltage.is_finite() && self.max_deflect_voltage > 0.0) {
            return Err(CrtError::InvalidRange {
                name: "max_deflect_voltage",
                min: 0.0,
                max: self.max_deflect_voltage,
            });
        }
        Ok(())
    }

    /// Build an engine for this tube
    pub fn engine(&self) -> FrameEngine {
        FrameEngine::new(KinematicModel::new(self.geometry), self.max_deflect_voltage)
            .with_samples(self.trajectory_samples)
    }

    pub fn from_json(json: &str) -> CrtResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> CrtResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> CrtResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {e})", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> CrtResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Bench, Preset::Lab] {
            let s = Settings::from_preset(preset);
            assert!(s.validate().is_ok(), "{preset:?}");
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str("nope"), None);
    }

    #[test]
    fn test_bench_defaults() {
        let s = Settings::default();
        assert_eq!(s.preset, Preset::Bench);
        assert_eq!(s.max_deflect_voltage, 140.0);
        assert_eq!(s.initial.accel_voltage, 2000.0);
        assert_eq!(s.initial.mode, SignalMode::Sinusoidal);
        assert_eq!(s.trail_color_range, Range::new(2000.0, 3000.0));
    }

    #[test]
    fn test_color_range_independent_of_accel_range() {
        let lab = Settings::from_preset(Preset::Lab);
        assert_eq!(lab.ranges.accel_voltage, Range::new(100.0, 2000.0));
        assert_eq!(lab.trail_color_range, Range::new(2000.0, 3000.0));
    }

    #[test]
    fn test_apply_clamps() {
        let ranges = ControlRanges::for_preset(Preset::Bench);
        let wild = FrameParams {
            accel_voltage: 5000.0,
            mode: SignalMode::Manual,
            manual: DeflectionVoltages {
                horizontal: -900.0,
                vertical: 20.0,
            },
            sinusoid: SinusoidalParams {
                amplitude: -3.0,
                freq_horizontal: 0.0,
                freq_vertical: 9.0,
                phase: TAU + 1.0,
            },
            persistence: 1,
        };
        let p = ranges.apply(&wild);
        assert_eq!(p.accel_voltage, 3000.0);
        assert_eq!(p.manual.horizontal, -150.0);
        assert_eq!(p.manual.vertical, 20.0);
        assert_eq!(p.sinusoid.amplitude, 0.0);
        assert_eq!(p.sinusoid.freq_horizontal, 1.0);
        assert_eq!(p.sinusoid.freq_vertical, 5.0);
        assert!((p.sinusoid.phase - 1.0).abs() < 1e-9);
        assert_eq!(p.persistence, 10);
        assert_eq!(p.mode, SignalMode::Manual);
    }

    #[test]
    fn test_apply_with_inverted_range() {
        let mut ranges = ControlRanges::for_preset(Preset::Bench);
        ranges.accel_voltage = Range::new(3000.0, 2000.0);
        assert!(ranges.validate().is_err());

        let p = ranges.apply(&FrameParams::default());
        assert_eq!(p.accel_voltage, 2000.0);

        let nan = Range::new(f64::NAN, 10.0);
        assert_eq!(nan.clamp(5.0), 5.0);
        assert_eq!(nan.clamp(20.0), 10.0);
    }

    #[test]
    fn test_json_roundtrip_and_rejects_bad() {
        let s = Settings::from_preset(Preset::Lab);
        let json = s.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back, s);

        let mut bad = Settings::default();
        bad.ranges.frequency = Range::new(0.0, 5.0);
        let json = serde_json::to_string(&bad).unwrap();
        assert!(matches!(
            Settings::from_json(&json),
            Err(CrtError::InvalidRange { name: "frequency", .. })
        ));

        assert!(matches!(Settings::from_json("{"), Err(CrtError::Json(_))));
    }

    #[test]
    fn test_load_missing_falls_back() {
        let s = Settings::load_or_default(Path::new("/nonexistent/crt-sim-settings.json"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("crt-sim-settings-{}.json", std::process::id()));
        let s = Settings::from_preset(Preset::Lab);
        s.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, s);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_engine_uses_geometry() {
        let s = Settings::from_preset(Preset::Lab);
        let engine = s.engine();
        assert_eq!(*engine.model().geometry(), TubeGeometry::compact());
        assert_eq!(engine.max_deflect_voltage(), 100.0);
    }
}
