//! Instantaneous module and body motion values

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use util::maths::{get_ang_dist_2pi, wrap_2pi};

// Internal
use super::{DriveModule, Point};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The state of a single drive module at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriveModuleState {
    /// Name of the module this state belongs to.
    pub name: String,

    /// Position of the module's steering axis in the body frame.
    ///
    /// Units: meters
    pub x: f64,
    pub y: f64,

    /// Steering angle about the steering axis, 0 pointing along body +X.
    ///
    /// Units: radians
    pub orientation: f64,

    /// Units: radians/second
    pub orientation_velocity: f64,

    /// Signed linear velocity of the wheel contact point along the direction
    /// the wheel is pointing.
    ///
    /// Units: meters/second
    pub drive_velocity: f64,

    /// Units: meters/second^2
    pub drive_acceleration: f64,
}

/// Instantaneous motion (twist) of the body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Linear velocity of the body origin, Z is always zero.
    ///
    /// Units: meters/second,
    /// Frame: Body
    pub linear_velocity: Point,

    /// Angular velocity of the body, only Z (yaw rate) is used.
    ///
    /// Units: radians/second,
    /// Frame: Body
    pub angular_velocity: Point,
}

/// The two equivalent actuator commands for one module produced by the
/// inverse kinematics.
///
/// Pointing the wheel at `forward_steering_angle` and driving at
/// `forward_drive_velocity` moves the contact point exactly as pointing it at
/// `reverse_steering_angle` and driving at `reverse_drive_velocity`. Choosing
/// between them is left to the caller, see
/// [`ProposedModuleState::select_min_travel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposedModuleState {
    pub name: String,

    /// Units: radians, in `[0, 2pi)`
    pub forward_steering_angle: f64,

    /// Units: meters/second, never negative
    pub forward_drive_velocity: f64,

    /// Units: radians, in `[0, 2pi)`
    pub reverse_steering_angle: f64,

    /// Units: meters/second, never positive
    pub reverse_drive_velocity: f64,
}

/// A single actuator command chosen from a [`ProposedModuleState`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleCommand {
    pub name: String,

    /// Units: radians
    pub steering_angle: f64,

    /// Units: meters/second
    pub drive_velocity: f64,

    /// True if the reverse solution was selected.
    pub reversed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveModuleState {
    pub fn new(
        name: &str,
        x: f64,
        y: f64,
        orientation: f64,
        orientation_velocity: f64,
        drive_velocity: f64,
        drive_acceleration: f64,
    ) -> Self {
        Self {
            name: String::from(name),
            x,
            y,
            orientation,
            orientation_velocity,
            drive_velocity,
            drive_acceleration,
        }
    }

    /// Create a state for the given module, copying its name and position.
    pub fn from_module(
        module: &DriveModule,
        orientation: f64,
        orientation_velocity: f64,
        drive_velocity: f64,
        drive_acceleration: f64,
    ) -> Self {
        let pos = module.steering_axis_xy_position();

        Self::new(
            module.name(),
            pos.x,
            pos.y,
            orientation,
            orientation_velocity,
            drive_velocity,
            drive_acceleration,
        )
    }

    /// True if every value used by the solvers is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.orientation.is_finite()
            && self.drive_velocity.is_finite()
    }

    /// Velocity of the wheel contact point in the body frame.
    ///
    /// Units: meters/second
    pub fn contact_velocity(&self) -> Point {
        Point::new(
            self.drive_velocity * self.orientation.cos(),
            self.drive_velocity * self.orientation.sin(),
            0.0,
        )
    }
}

impl Motion {
    /// Build a planar twist from the linear velocities along body X and Y and
    /// the yaw rate.
    pub fn new(vx_ms: f64, vy_ms: f64, wz_rads: f64) -> Self {
        Self {
            linear_velocity: Point::new(vx_ms, vy_ms, 0.0),
            angular_velocity: Point::new(0.0, 0.0, wz_rads),
        }
    }

    /// No motion.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_finite(&self) -> bool {
        self.linear_velocity.x.is_finite()
            && self.linear_velocity.y.is_finite()
            && self.angular_velocity.z.is_finite()
    }

    /// Velocity required at the given body frame position for it to move
    /// with this twist.
    pub fn velocity_at(&self, position: Point) -> Point {
        let v = self.linear_velocity + position.rotational_velocity(self.angular_velocity.z);

        Point::new(v.x, v.y, 0.0)
    }
}

impl ProposedModuleState {
    /// Build the forward and reverse solutions for a module pointing at
    /// `steering_angle` with a non-negative `speed`.
    pub(crate) fn from_angle_and_speed(name: &str, steering_angle: f64, speed: f64) -> Self {
        let forward_steering_angle = wrap_2pi(steering_angle);

        Self {
            name: String::from(name),
            forward_steering_angle,
            forward_drive_velocity: speed,
            reverse_steering_angle: wrap_2pi(forward_steering_angle + std::f64::consts::PI),
            reverse_drive_velocity: -speed,
        }
    }

    /// Scale both drive velocities, leaving the steering angles untouched.
    pub(crate) fn scale_drive_velocity(&mut self, scale: f64) {
        self.forward_drive_velocity *= scale;
        self.reverse_drive_velocity *= scale;
    }

    /// Reference selection policy: pick whichever solution needs the smaller
    /// steering rotation from `current_orientation`.
    ///
    /// Ties are resolved in favour of the forward solution. The kinematic
    /// model never applies this itself.
    pub fn select_min_travel(&self, current_orientation: f64) -> ModuleCommand {
        let forward_travel =
            get_ang_dist_2pi(wrap_2pi(current_orientation), self.forward_steering_angle).abs();
        let reverse_travel =
            get_ang_dist_2pi(wrap_2pi(current_orientation), self.reverse_steering_angle).abs();

        if reverse_travel < forward_travel {
            ModuleCommand {
                name: self.name.clone(),
                steering_angle: self.reverse_steering_angle,
                drive_velocity: self.reverse_drive_velocity,
                reversed: true,
            }
        } else {
            ModuleCommand {
                name: self.name.clone(),
                steering_angle: self.forward_steering_angle,
                drive_velocity: self.forward_drive_velocity,
                reversed: false,
            }
        }
    }
}
