//! Parameters structure for the kinematic model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the kinematic model.
///
/// The order of `modules` is the canonical module order for every state list
/// passed to or returned from the model.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Params {
    pub modules: Vec<DriveModuleParams>,
}

/// Parameters describing a single drive module.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct DriveModuleParams {
    // ---- IDENTITY ----
    /// Name of the module.
    pub name: String,

    /// Identifier of the steering actuator link.
    pub steering_link: String,

    /// Identifier of the drive actuator link.
    pub drive_link: String,

    // ---- GEOMETRY ----
    /// The position of the steer axis in the body frame.
    ///
    /// Units: meters,
    /// Frame: Body
    pub str_axis_pos_m_rb: [f64; 3],

    /// The radius of the wheel.
    ///
    /// Units: meters.
    pub wheel_radius_m: f64,

    // ---- CAPABILITIES ----
    /// Maximum steer axis rate.
    ///
    /// Units: radians/second
    pub str_max_rate_rads: f64,

    /// Minimum steer axis acceleration.
    ///
    /// Units: radians/second^2
    pub str_min_accel_rads2: f64,

    /// Maximum steer axis acceleration.
    ///
    /// Units: radians/second^2
    pub str_max_accel_rads2: f64,

    /// Maximum drive linear velocity at the wheel contact point.
    ///
    /// Units: meters/second
    pub drv_max_vel_ms: f64,

    /// Minimum drive linear acceleration.
    ///
    /// Units: meters/second^2
    pub drv_min_accel_ms2: f64,

    /// Maximum drive linear acceleration.
    ///
    /// Units: meters/second^2
    pub drv_max_accel_ms2: f64,
}
