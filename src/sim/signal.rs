//! Deflection signal sources
//!
//! Each frame the active source is evaluated at the current simulation time to
//! produce the plate voltage pair. Sources carry no state between frames.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{CrtError, CrtResult};

/// Instantaneous plate voltages (volts)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeflectionVoltages {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Two cosine generators sharing one amplitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinusoidalParams {
    /// Peak voltage on both axes
    pub amplitude: f64,
    /// Horizontal frequency (Hz)
    pub freq_horizontal: f64,
    /// Vertical frequency (Hz)
    pub freq_vertical: f64,
    /// Phase offset applied to the vertical axis (radians)
    pub phase: f64,
}

impl Default for SinusoidalParams {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            freq_horizontal: 1.0,
            freq_vertical: 1.0,
            phase: 0.0,
        }
    }
}

impl SinusoidalParams {
    /// All values finite, frequencies strictly positive
    pub fn validate(&self) -> CrtResult<()> {
        let finite = [self.amplitude, self.freq_horizontal, self.freq_vertical, self.phase]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(CrtError::InvalidSignal(format!("non-finite value in {self:?}")));
        }
        if self.freq_horizontal <= 0.0 || self.freq_vertical <= 0.0 {
            return Err(CrtError::InvalidSignal(format!(
                "frequencies must be > 0 (h={}, v={})",
                self.freq_horizontal, self.freq_vertical
            )));
        }
        Ok(())
    }
}

/// Which source drives the plates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignalMode {
    Manual,
    #[default]
    Sinusoidal,
}

impl SignalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalMode::Manual => "Manual",
            SignalMode::Sinusoidal => "Sinusoidal",
        }
    }
}

/// Resolved signal source for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SignalSource {
    /// Operator-set constant voltages
    Manual { horizontal: f64, vertical: f64 },
    /// Lissajous generator
    Sinusoidal(SinusoidalParams),
}

impl SignalSource {
    pub fn mode(&self) -> SignalMode {
        match self {
            SignalSource::Manual { .. } => SignalMode::Manual,
            SignalSource::Sinusoidal(_) => SignalMode::Sinusoidal,
        }
    }

    /// Plate voltages at simulation time `t` (seconds)
    pub fn voltages(&self, t: f64) -> DeflectionVoltages {
        match *self {
            SignalSource::Manual {
                horizontal,
                vertical,
            } => DeflectionVoltages {
                horizontal,
                vertical,
            },
            SignalSource::Sinusoidal(p) => DeflectionVoltages {
                horizontal: p.amplitude * (TAU * p.freq_horizontal * t).cos(),
                vertical: p.amplitude * (TAU * p.freq_vertical * t + p.phase).cos(),
            },
        }
    }

    /// Reduced `fh:fv` ratio when both frequencies are (near) whole numbers.
    ///
    /// Used to label the Lissajous pattern; `None` for manual sources or
    /// non-integer frequencies.
    pub fn frequency_ratio(&self) -> Option<(u32, u32)> {
        let SignalSource::Sinusoidal(p) = self else {
            return None;
        };
        let h = as_whole(p.freq_horizontal)?;
        let v = as_whole(p.freq_vertical)?;
        let g = gcd(h, v);
        Some((h / g, v / g))
    }
}

fn as_whole(f: f64) -> Option<u32> {
    let r = f.round();
    ((f - r).abs() < 1e-6 && r >= 1.0 && r <= u32::MAX as f64).then_some(r as u32)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_manual_ignores_time() {
        let src = SignalSource::Manual {
            horizontal: 12.0,
            vertical: -30.0,
        };
        for t in [0.0, 0.25, 17.3] {
            let v = src.voltages(t);
            assert_eq!(v.horizontal, 12.0);
            assert_eq!(v.vertical, -30.0);
        }
        assert_eq!(src.mode(), SignalMode::Manual);
        assert_eq!(src.frequency_ratio(), None);
    }

    #[test]
    fn test_sinusoidal_at_zero() {
        let src = SignalSource::Sinusoidal(SinusoidalParams::default());
        let v = src.voltages(0.0);
        assert_eq!(v.horizontal, 100.0);
        assert_eq!(v.vertical, 100.0);
    }

    #[test]
    fn test_phase_applies_to_vertical_only() {
        let src = SignalSource::Sinusoidal(SinusoidalParams {
            phase: FRAC_PI_2,
            ..Default::default()
        });
        let v = src.voltages(0.0);
        assert_eq!(v.horizontal, 100.0);
        assert!(v.vertical.abs() < 1e-9);
    }

    #[test]
    fn test_quarter_period() {
        let src = SignalSource::Sinusoidal(SinusoidalParams {
            amplitude: 50.0,
            freq_horizontal: 2.0,
            freq_vertical: 1.0,
            phase: 0.0,
        });
        // t = 0.25s: cos(pi) = -1 horizontally, cos(pi/2) = 0 vertically
        let v = src.voltages(0.25);
        assert!((v.horizontal + 50.0).abs() < 1e-9);
        assert!(v.vertical.abs() < 1e-9);
    }

    #[test]
    fn test_frequency_ratio() {
        let mk = |h, v| {
            SignalSource::Sinusoidal(SinusoidalParams {
                freq_horizontal: h,
                freq_vertical: v,
                ..Default::default()
            })
        };
        assert_eq!(mk(2.0, 4.0).frequency_ratio(), Some((1, 2)));
        assert_eq!(mk(3.0, 2.0).frequency_ratio(), Some((3, 2)));
        assert_eq!(mk(1.5, 2.0).frequency_ratio(), None);
    }

    #[test]
    fn test_validate() {
        assert!(SinusoidalParams::default().validate().is_ok());
        let bad = SinusoidalParams {
            freq_vertical: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let nan = SinusoidalParams {
            amplitude: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
