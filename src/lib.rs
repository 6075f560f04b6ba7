//! CRT Sim - cathode-ray tube electron beam simulator
//!
//! Core modules:
//! - `sim`: Deterministic beam physics, signal sources and phosphor trail
//! - `settings`: Tube presets, operator control ranges, JSON persistence
//! - `view`: Physical-to-pixel mapping and vertex lists for a host renderer
//! - `error`: Configuration error type

pub mod error;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{CrtError, CrtResult};
pub use settings::{ControlRanges, Preset, Range, Settings};
pub use sim::{FrameEngine, FrameParams, FrameSnapshot, KinematicModel, TubeGeometry};

/// Physical and simulation constants
pub mod consts {
    /// Elementary charge magnitude (C)
    pub const ELECTRON_CHARGE: f64 = 1.602e-19;
    /// Electron rest mass (kg)
    pub const ELECTRON_MASS: f64 = 9.109e-31;

    /// Acceleration voltages below this (V) count as "beam off"
    pub const BEAM_OFF_THRESHOLD: f64 = 1e-3;
    /// Display scales below this (m) are replaced by the plate separation
    pub const MIN_DISPLAY_DEFLECTION: f64 = 1e-9;

    /// Axial samples per trajectory
    pub const TRAJECTORY_SAMPLES: usize = 100;

    /// Simulated frame rate of the headless driver
    pub const FRAME_RATE: f64 = 60.0;
}
