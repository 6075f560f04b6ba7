//! Closed-form electron kinematics through the tube
//!
//! Uniform-field parallel-plate model, non-relativistic:
//! - the gun accelerates the electron to `v_x = sqrt(2 q Va / m)`
//! - between the plates the transverse acceleration is `a = q (V / d) / m`
//! - after the plates the beam drifts in a straight line
//!
//! The axial velocity is constant everywhere past the gun, so axial position
//! maps directly to time of flight.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::TubeGeometry;
use crate::consts::{BEAM_OFF_THRESHOLD, ELECTRON_CHARGE, ELECTRON_MASS, MIN_DISPLAY_DEFLECTION};

/// One sample of the beam path (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Distance from the gun along the tube axis
    pub axial: f64,
    /// Vertical displacement (driven by `Vv`)
    pub vertical: f64,
    /// Horizontal displacement (driven by `Vh`)
    pub horizontal: f64,
}

impl TrajectoryPoint {
    #[inline]
    pub fn on_axis(axial: f64) -> Self {
        Self {
            axial,
            vertical: 0.0,
            horizontal: 0.0,
        }
    }

    /// Transverse position as (horizontal, vertical)
    #[inline]
    pub fn transverse(&self) -> DVec2 {
        DVec2::new(self.horizontal, self.vertical)
    }
}

/// Which part of the tube an axial position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamRegion {
    /// Between the gun and the plates (no transverse force)
    PrePlates,
    /// Between the deflection plates (parabolic)
    InsidePlates,
    /// Past the plates (straight line)
    Drift,
}

/// Motion along one transverse axis, precomputed at the plate exit
#[derive(Debug, Clone, Copy)]
struct AxisMotion {
    accel: f64,
    exit_pos: f64,
    exit_vel: f64,
}

impl AxisMotion {
    fn new(accel: f64, t_exit: f64) -> Self {
        Self {
            accel,
            exit_pos: 0.5 * accel * t_exit * t_exit,
            exit_vel: accel * t_exit,
        }
    }

    /// Parabolic displacement after `t` seconds inside the plates
    #[inline]
    fn inside(&self, t: f64) -> f64 {
        0.5 * self.accel * t * t
    }

    /// Linear displacement after `t` seconds of drift
    #[inline]
    fn drift(&self, t: f64) -> f64 {
        self.exit_pos + self.exit_vel * t
    }
}

/// Stateless kinematic model bound to a tube geometry
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicModel {
    geometry: TubeGeometry,
}

/// True when the acceleration voltage is high enough to form a beam
#[inline]
pub fn beam_on(accel_voltage: f64) -> bool {
    accel_voltage > 0.0 && accel_voltage >= BEAM_OFF_THRESHOLD
}

impl KinematicModel {
    pub fn new(geometry: TubeGeometry) -> Self {
        Self { geometry }
    }

    #[inline]
    pub fn geometry(&self) -> &TubeGeometry {
        &self.geometry
    }

    /// Axial beam velocity (m/s) after the gun
    #[inline]
    pub fn beam_velocity(&self, accel_voltage: f64) -> f64 {
        (2.0 * ELECTRON_CHARGE * accel_voltage / ELECTRON_MASS).sqrt()
    }

    /// Transverse acceleration (m/s²) produced by a plate voltage
    #[inline]
    pub fn transverse_acceleration(&self, deflect_voltage: f64) -> f64 {
        ELECTRON_CHARGE * (deflect_voltage / self.geometry.plate_separation()) / ELECTRON_MASS
    }

    /// Gun-to-screen flight time in seconds, `None` with the beam off
    pub fn time_of_flight(&self, accel_voltage: f64) -> Option<f64> {
        beam_on(accel_voltage).then(|| self.geometry.total_length() / self.beam_velocity(accel_voltage))
    }

    /// Classify an axial position (boundaries belong to the earlier region)
    pub fn region_at(&self, axial: f64) -> BeamRegion {
        if axial <= self.geometry.gun_to_plates() {
            BeamRegion::PrePlates
        } else if axial <= self.geometry.plate_exit() {
            BeamRegion::InsidePlates
        } else {
            BeamRegion::Drift
        }
    }

    /// Displacement at the screen along one transverse axis.
    ///
    /// Returns 0 with the beam off. The sign follows `deflect_voltage`.
    pub fn final_deflection(&self, accel_voltage: f64, deflect_voltage: f64) -> f64 {
        if !beam_on(accel_voltage) {
            return 0.0;
        }

        let v_x = self.beam_velocity(accel_voltage);
        let time_in_plates = self.geometry.plate_length() / v_x;
        let axis = AxisMotion::new(self.transverse_acceleration(deflect_voltage), time_in_plates);
        let time_drift = self.geometry.plate_to_screen() / v_x;

        axis.drift(time_drift)
    }

    /// Screen displacement for the nominal maximum plate voltage.
    ///
    /// A scale reference only: real plate voltages may exceed it.
    pub fn max_deflection(&self, accel_voltage: f64, max_deflect_voltage: f64) -> f64 {
        self.final_deflection(accel_voltage, max_deflect_voltage)
    }

    /// Nonzero display scale: `max_deflection`, or the plate separation when
    /// that is negligible
    pub fn display_scale(&self, accel_voltage: f64, max_deflect_voltage: f64) -> f64 {
        let max_deflect = self.max_deflection(accel_voltage, max_deflect_voltage);
        if max_deflect < MIN_DISPLAY_DEFLECTION {
            self.geometry.plate_separation()
        } else {
            max_deflect
        }
    }

    /// Axial sample positions, evenly spaced over `[0, total_length]`
    pub fn sample_positions(&self, num_points: usize) -> impl Iterator<Item = f64> + '_ {
        let total = self.geometry.total_length();
        let last = num_points.saturating_sub(1).max(1) as f64;
        (0..num_points).map(move |i| total * (i as f64 / last))
    }

    /// Full beam path sampled at `num_points` axial positions.
    ///
    /// With the beam off the path is a straight line down the axis.
    pub fn trajectory(
        &self,
        accel_voltage: f64,
        horizontal_voltage: f64,
        vertical_voltage: f64,
        num_points: usize,
    ) -> Vec<TrajectoryPoint> {
        if !beam_on(accel_voltage) {
            return self.sample_positions(num_points).map(TrajectoryPoint::on_axis).collect();
        }

        let v_x = self.beam_velocity(accel_voltage);
        let t_exit = self.geometry.plate_length() / v_x;
        let vertical = AxisMotion::new(self.transverse_acceleration(vertical_voltage), t_exit);
        let horizontal = AxisMotion::new(self.transverse_acceleration(horizontal_voltage), t_exit);

        let entry = self.geometry.gun_to_plates();
        let exit = self.geometry.plate_exit();

        self.sample_positions(num_points)
            .map(|x| match self.region_at(x) {
                BeamRegion::PrePlates => TrajectoryPoint::on_axis(x),
                BeamRegion::InsidePlates => {
                    let t = (x - entry) / v_x;
                    TrajectoryPoint {
                        axial: x,
                        vertical: vertical.inside(t),
                        horizontal: horizontal.inside(t),
                    }
                }
                BeamRegion::Drift => {
                    let t = (x - exit) / v_x;
                    TrajectoryPoint {
                        axial: x,
                        vertical: vertical.drift(t),
                        horizontal: horizontal.drift(t),
                    }
                }
            })
            .collect()
    }
}
