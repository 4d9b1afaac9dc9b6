//! Forward kinematics: body motion from module states

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;

// Internal
use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteeringModel {
    /// Estimate the body motion from the current state of every module.
    ///
    /// Each module measures the velocity of its wheel contact point. For a
    /// rigid body moving with twist `(vx, vy, wz)` the contact point of a
    /// module at `(x, y)` moves at `(vx - wz * y, vy + wz * x)`, which stacked
    /// over all modules gives an over-determined linear system
    /// `J [vx, vy, wz]^T = v`. The returned motion is its least squares
    /// solution `(J^T J)^-1 J^T v`, so measurements which disagree (slip,
    /// noise) are fused into the twist with the smallest total squared contact
    /// velocity error.
    ///
    /// `states` must contain one state per configured module, in the
    /// configured order and at the configured positions.
    pub fn body_motion_from_wheel_module_states(
        &self,
        states: &[DriveModuleState],
    ) -> Result<Motion, KinModelError> {
        self.check_states(states)?;

        // Accumulate J^T v
        let mut jtv = Vector3::<f64>::zeros();
        for state in states.iter() {
            let v = state.contact_velocity();

            jtv += Vector3::new(v.x, v.y, -state.y * v.x + state.x * v.y);
        }

        let twist = self.jtj_inv * jtv;

        let motion = Motion::new(twist[0], twist[1], twist[2]);

        trace!(
            "Forward kinematics: linear {:?}, angular {:?}",
            motion.linear_velocity,
            motion.angular_velocity
        );

        Ok(motion)
    }
}
