//! Deterministic beam simulation
//!
//! All physics and trail state lives here. This module must stay pure:
//! - No rendering or platform dependencies
//! - Same time and parameters in, same snapshot out
//! - The persistence trail is the only mutable state

pub mod frame;
pub mod geometry;
pub mod kinematics;
pub mod persistence;
pub mod signal;

pub use frame::{FrameEngine, FrameParams, FrameSnapshot};
pub use geometry::TubeGeometry;
pub use kinematics::{BeamRegion, KinematicModel, TrajectoryPoint, beam_on};
pub use persistence::{PersistenceBuffer, TrailEntry};
pub use signal::{DeflectionVoltages, SignalMode, SignalSource, SinusoidalParams};
