//! Drive module descriptor

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// Internal
use super::{DriveModuleParams, KinModelError, Point};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Immutable description of a single drive module: its identity, where it is
/// mounted on the body and the limits of its steering and drive actuators.
///
/// Actuator acceleration limits are carried for the benefit of the caller's
/// ramping logic, the model itself only enforces the drive velocity limit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriveModule {
    name: String,
    steering_link: String,
    drive_link: String,

    steering_axis_xy_position: Point,
    wheel_radius: f64,

    steering_motor_maximum_velocity: f64,
    steering_motor_minimum_acceleration: f64,
    steering_motor_maximum_acceleration: f64,

    drive_motor_maximum_velocity: f64,
    drive_motor_minimum_acceleration: f64,
    drive_motor_maximum_acceleration: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveModule {
    /// Build a drive module from its parameters.
    ///
    /// Fails with `KinModelError::NonPositiveParameter` if the wheel radius or
    /// any actuator limit is not strictly positive.
    pub fn new(params: DriveModuleParams) -> Result<Self, KinModelError> {
        let checks = [
            ("wheel radius", params.wheel_radius_m),
            ("steering maximum velocity", params.str_max_rate_rads),
            ("steering minimum acceleration", params.str_min_accel_rads2),
            ("steering maximum acceleration", params.str_max_accel_rads2),
            ("drive maximum velocity", params.drv_max_vel_ms),
            ("drive minimum acceleration", params.drv_min_accel_ms2),
            ("drive maximum acceleration", params.drv_max_accel_ms2),
        ];

        // NaN fails this comparison too
        if let Some(&(parameter, value)) = checks.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(KinModelError::NonPositiveParameter {
                module: params.name,
                parameter,
                value,
            });
        }

        Ok(Self {
            steering_axis_xy_position: Point::from(params.str_axis_pos_m_rb),
            wheel_radius: params.wheel_radius_m,
            steering_motor_maximum_velocity: params.str_max_rate_rads,
            steering_motor_minimum_acceleration: params.str_min_accel_rads2,
            steering_motor_maximum_acceleration: params.str_max_accel_rads2,
            drive_motor_maximum_velocity: params.drv_max_vel_ms,
            drive_motor_minimum_acceleration: params.drv_min_accel_ms2,
            drive_motor_maximum_acceleration: params.drv_max_accel_ms2,
            name: params.name,
            steering_link: params.steering_link,
            drive_link: params.drive_link,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steering_link(&self) -> &str {
        &self.steering_link
    }

    pub fn drive_link(&self) -> &str {
        &self.drive_link
    }

    /// Position of the steering axis in the body frame.
    ///
    /// Units: meters
    pub fn steering_axis_xy_position(&self) -> Point {
        self.steering_axis_xy_position
    }

    /// Units: meters
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Units: radians/second
    pub fn steering_motor_maximum_velocity(&self) -> f64 {
        self.steering_motor_maximum_velocity
    }

    /// Units: radians/second^2
    pub fn steering_motor_minimum_acceleration(&self) -> f64 {
        self.steering_motor_minimum_acceleration
    }

    /// Units: radians/second^2
    pub fn steering_motor_maximum_acceleration(&self) -> f64 {
        self.steering_motor_maximum_acceleration
    }

    /// Maximum linear velocity of the wheel contact point.
    ///
    /// Units: meters/second
    pub fn drive_motor_maximum_velocity(&self) -> f64 {
        self.drive_motor_maximum_velocity
    }

    /// Units: meters/second^2
    pub fn drive_motor_minimum_acceleration(&self) -> f64 {
        self.drive_motor_minimum_acceleration
    }

    /// Units: meters/second^2
    pub fn drive_motor_maximum_acceleration(&self) -> f64 {
        self.drive_motor_maximum_acceleration
    }
}
