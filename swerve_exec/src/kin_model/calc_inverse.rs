//! Inverse kinematics: module states from body motion

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};

// Internal
use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteeringModel {
    /// Calculate the steering angle and drive velocity every module must
    /// adopt for the body to move with `motion`.
    ///
    /// For each module the required contact point velocity is
    /// `(vx - wz * y, vy + wz * x)`. The module is pointed along this vector
    /// and driven at its magnitude; the equivalent reverse solution (pointing
    /// the opposite way and driving backwards) is returned alongside.
    ///
    /// If a module has no velocity to achieve it keeps its current
    /// orientation from `states` and its drive velocity is zero.
    ///
    /// If any module would exceed its maximum drive velocity all drive
    /// velocities are scaled down by the same factor, so the shape of the
    /// commanded motion is kept and only its magnitude reduced. Steering
    /// angles are not affected by this.
    pub fn state_of_wheel_modules_from_body_motion(
        &self,
        states: &[DriveModuleState],
        motion: &Motion,
    ) -> Result<Vec<ProposedModuleState>, KinModelError> {
        self.check_states(states)?;

        if !motion.is_finite() {
            let e = KinModelError::NonFiniteInput(String::from("body motion"));
            warn!("Rejected body motion {:?}: {}", motion, e);
            return Err(e);
        }

        let mut proposed = Vec::with_capacity(self.modules.len());

        // Scale to apply to all drive velocities to keep every module within
        // its limit
        let mut scale = 1f64;

        for (module, state) in self.modules.iter().zip(states.iter()) {
            let required = motion.velocity_at(module.steering_axis_xy_position());
            let speed_ms = required.norm_xy();

            if speed_ms < ZERO_SPEED_TOLERANCE_MS {
                // Steering hold
                proposed.push(ProposedModuleState::from_angle_and_speed(
                    module.name(),
                    state.orientation,
                    0.0,
                ));
                continue;
            }

            let limit_ms = module.drive_motor_maximum_velocity();
            if speed_ms > limit_ms {
                scale = scale.min(limit_ms / speed_ms);
            }

            proposed.push(ProposedModuleState::from_angle_and_speed(
                module.name(),
                required.y.atan2(required.x),
                speed_ms,
            ));
        }

        if scale < 1.0 {
            debug!(
                "Drive velocity limit exceeded, scaling all drive velocities by {:.4}",
                scale
            );

            for p in proposed.iter_mut() {
                p.scale_drive_velocity(scale);
            }
        }

        trace!("Inverse kinematics for {:?}: {:?}", motion, proposed);

        Ok(proposed)
    }
}

#[cfg(test)]
mod test {
    use super::super::model::test::{create_drive_modules, create_model, create_states};
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};
    use util::maths::wrap_2pi;

    const EPS: f64 = 1e-9;

    fn assert_proposed(
        p: &ProposedModuleState,
        forward_angle: f64,
        forward_velocity: f64,
        reverse_angle: f64,
        reverse_velocity: f64,
    ) {
        assert_abs_diff_eq!(p.forward_steering_angle, forward_angle, epsilon = EPS);
        assert_abs_diff_eq!(p.forward_drive_velocity, forward_velocity, epsilon = EPS);
        assert_abs_diff_eq!(p.reverse_steering_angle, reverse_angle, epsilon = EPS);
        assert_abs_diff_eq!(p.reverse_drive_velocity, reverse_velocity, epsilon = EPS);
    }

    fn proposed_for(
        model: &SteeringModel,
        current_orientation: impl Fn(usize) -> f64,
        motion: Motion,
    ) -> Vec<ProposedModuleState> {
        let states = create_states(model, current_orientation, |_| 0.0);

        let proposed = model
            .state_of_wheel_modules_from_body_motion(&states, &motion)
            .unwrap();
        assert_eq!(proposed.len(), model.modules().len());

        proposed
    }

    /// The angular distance between two angles, ignoring wrapping.
    fn ang_diff(a: f64, b: f64) -> f64 {
        util::maths::get_ang_dist_2pi(a, b).abs()
    }

    #[test]
    fn test_parallel_forward_wheels_when_forward_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::new(1.0, 0.0, 0.0)) {
            assert_proposed(&p, 0.0, 1.0, PI, -1.0);
        }
    }

    #[test]
    fn test_legal_forward_velocity_when_excessive_forward_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::new(2.0, 0.0, 0.0)) {
            assert_proposed(&p, 0.0, 1.0, PI, -1.0);
        }
    }

    #[test]
    fn test_backward_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::new(-1.0, 0.0, 0.0)) {
            assert_proposed(&p, PI, 1.0, 0.0, -1.0);
        }
    }

    #[test]
    fn test_left_sideways_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::new(0.0, 1.0, 0.0)) {
            assert_proposed(&p, FRAC_PI_2, 1.0, 3.0 * FRAC_PI_2, -1.0);
        }
    }

    #[test]
    fn test_right_sideways_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::new(0.0, -1.0, 0.0)) {
            assert_proposed(&p, 3.0 * FRAC_PI_2, 1.0, FRAC_PI_2, -1.0);
        }
    }

    #[test]
    fn test_diagonal_motion() {
        // Diagonal speed is sqrt(2) which exceeds the unit limit, so scale to
        // the limit instead.
        let model = SteeringModel::new(create_drive_modules(1.0, 1.0, 2.0)).unwrap();

        for p in proposed_for(&model, |_| FRAC_PI_2, Motion::new(1.0, 1.0, 0.0)) {
            assert_proposed(&p, FRAC_PI_4, 2f64.sqrt(), 5.0 * FRAC_PI_4, -(2f64.sqrt()));
        }

        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_2, Motion::new(1.0, 1.0, 0.0)) {
            assert_proposed(&p, FRAC_PI_4, 1.0, 5.0 * FRAC_PI_4, -1.0);
        }
    }

    #[test]
    fn test_pure_rotation() {
        let model = create_model();
        let s = 0.5f64.sqrt();

        let proposed = proposed_for(&model, |_| 0.0, Motion::new(0.0, 0.0, 1.0));

        for (i, p) in proposed.iter().enumerate() {
            let angle = FRAC_PI_4 + i as f64 * FRAC_PI_2;
            assert_proposed(p, angle, s, wrap_2pi(angle + PI), -s);
        }
    }

    #[test]
    fn test_rotation_and_translation() {
        // Forward at 0.5 m/s while turning at 0.5 rad/s. Each module needs
        // (0.5 - 0.5 y, 0.5 x), so the left side (y > 0) runs slower.
        let model = create_model();

        let proposed = proposed_for(&model, |_| 0.0, Motion::new(0.5, 0.0, 0.5));

        let expected: [(f64, f64); 4] =
            [(0.75, 0.25), (0.25, 0.25), (0.25, -0.25), (0.75, -0.25)];
        for (p, (vx, vy)) in proposed.iter().zip(expected.iter()) {
            let angle = wrap_2pi(vy.atan2(*vx));
            let speed = vx.hypot(*vy);
            assert_proposed(p, angle, speed, wrap_2pi(angle + PI), -speed);
        }

        // Left modules slower than right modules
        assert!(proposed[1].forward_drive_velocity < proposed[0].forward_drive_velocity);
        assert!(proposed[2].forward_drive_velocity < proposed[3].forward_drive_velocity);
    }

    #[test]
    fn test_no_wheel_movement_when_zero_motion() {
        let model = create_model();

        for p in proposed_for(&model, |_| FRAC_PI_4, Motion::zero()) {
            assert_proposed(&p, FRAC_PI_4, 0.0, 5.0 * FRAC_PI_4, 0.0);
        }
    }

    #[test]
    fn test_no_wheel_movement_when_stopping() {
        let model = create_model();
        let states = create_states(
            &model,
            |i| FRAC_PI_4 + i as f64 * FRAC_PI_2,
            |_| 0.5f64.sqrt(),
        );

        let proposed = model
            .state_of_wheel_modules_from_body_motion(&states, &Motion::zero())
            .unwrap();

        for (i, p) in proposed.iter().enumerate() {
            let angle = FRAC_PI_4 + i as f64 * FRAC_PI_2;
            assert_proposed(p, angle, 0.0, wrap_2pi(angle + PI), 0.0);
        }
    }

    #[test]
    fn test_steering_hold_wraps_current_orientation() {
        let model = create_model();

        for p in proposed_for(&model, |_| -FRAC_PI_2, Motion::zero()) {
            assert_proposed(&p, 3.0 * FRAC_PI_2, 0.0, FRAC_PI_2, 0.0);
        }
    }

    #[test]
    fn test_steering_hold_only_on_stationary_module() {
        // Rotation about the right front module leaves it stationary.
        // Twist (vx, vy, wz) = (-0.5, -0.5, 1) gives zero velocity at
        // (0.5, -0.5).
        let model = SteeringModel::new(create_drive_modules(1.0, 1.0, 10.0)).unwrap();

        let proposed = proposed_for(&model, |_| 1.0, Motion::new(-0.5, -0.5, 1.0));

        assert_proposed(&proposed[0], 1.0, 0.0, 1.0 + PI, 0.0);
        for p in proposed.iter().skip(1) {
            assert!(p.forward_drive_velocity > 0.0);
        }
    }

    #[test]
    fn test_reverse_solution_duality() {
        let model = create_model();
        let motions = [
            Motion::new(0.3, -0.7, 0.2),
            Motion::new(-2.0, 1.0, -3.0),
            Motion::new(0.0, 0.0, -0.4),
            Motion::zero(),
        ];

        for motion in motions.iter() {
            for p in proposed_for(&model, |i| i as f64, *motion) {
                assert!(p.forward_steering_angle >= 0.0 && p.forward_steering_angle < TAU);
                assert!(p.reverse_steering_angle >= 0.0 && p.reverse_steering_angle < TAU);
                assert_abs_diff_eq!(
                    ang_diff(wrap_2pi(p.forward_steering_angle + PI), p.reverse_steering_angle),
                    0.0,
                    epsilon = EPS
                );
                assert_eq!(p.reverse_drive_velocity, -p.forward_drive_velocity);
            }
        }
    }

    #[test]
    fn test_saturation_preserves_direction() {
        let model = create_model();
        let base = Motion::new(0.2, 0.1, 0.3);

        let unsaturated = proposed_for(&model, |_| 0.0, base);
        let max_unsaturated = unsaturated
            .iter()
            .map(|p| p.forward_drive_velocity)
            .fold(0f64, f64::max);
        assert!(max_unsaturated < 1.0);

        // Scale the motion well past the limit
        let factor = 10.0;
        let saturated = proposed_for(
            &model,
            |_| 0.0,
            Motion::new(
                base.linear_velocity.x * factor,
                base.linear_velocity.y * factor,
                base.angular_velocity.z * factor,
            ),
        );

        for (u, s) in unsaturated.iter().zip(saturated.iter()) {
            assert_abs_diff_eq!(
                ang_diff(u.forward_steering_angle, s.forward_steering_angle),
                0.0,
                epsilon = EPS
            );
            assert_abs_diff_eq!(
                s.forward_drive_velocity,
                u.forward_drive_velocity / max_unsaturated,
                epsilon = EPS
            );
        }

        // The most saturated module sits exactly on its limit
        let max_saturated = saturated
            .iter()
            .map(|p| p.forward_drive_velocity)
            .fold(0f64, f64::max);
        assert_abs_diff_eq!(max_saturated, 1.0, epsilon = EPS);
    }

    #[test]
    fn test_saturation_respects_per_module_limits() {
        let mut modules = create_drive_modules(1.0, 1.0, 2.0);
        modules[2] = DriveModule::new(DriveModuleParams {
            name: String::from(modules[2].name()),
            steering_link: String::from(modules[2].steering_link()),
            drive_link: String::from(modules[2].drive_link()),
            str_axis_pos_m_rb: [-0.5, 0.5, 0.0],
            wheel_radius_m: 0.1,
            str_max_rate_rads: 1.0,
            str_min_accel_rads2: 0.1,
            str_max_accel_rads2: 1.0,
            drv_max_vel_ms: 0.5,
            drv_min_accel_ms2: 0.1,
            drv_max_accel_ms2: 1.0,
        })
        .unwrap();
        let model = SteeringModel::new(modules).unwrap();

        // 1 m/s everywhere, only module 3 is over its limit
        for p in proposed_for(&model, |_| 0.0, Motion::new(1.0, 0.0, 0.0)) {
            assert_proposed(&p, 0.0, 0.5, PI, -0.5);
        }
    }

    #[test]
    fn test_round_trip() {
        let model = create_model();
        let motions = [
            Motion::new(0.3, 0.0, 0.0),
            Motion::new(-0.2, 0.4, 0.0),
            Motion::new(0.0, 0.0, -0.6),
            Motion::new(0.25, -0.1, 0.35),
            Motion::zero(),
        ];

        for motion in motions.iter() {
            let states = create_states(&model, |_| 0.0, |_| 0.0);
            let proposed = model
                .state_of_wheel_modules_from_body_motion(&states, motion)
                .unwrap();

            // Forward solutions
            let forward_states: Vec<DriveModuleState> = model
                .modules()
                .iter()
                .zip(proposed.iter())
                .map(|(m, p)| {
                    DriveModuleState::from_module(
                        m,
                        p.forward_steering_angle,
                        0.0,
                        p.forward_drive_velocity,
                        0.0,
                    )
                })
                .collect();
            let result = model
                .body_motion_from_wheel_module_states(&forward_states)
                .unwrap();
            assert_abs_diff_eq!(result.linear_velocity.x, motion.linear_velocity.x, epsilon = EPS);
            assert_abs_diff_eq!(result.linear_velocity.y, motion.linear_velocity.y, epsilon = EPS);
            assert_abs_diff_eq!(result.angular_velocity.z, motion.angular_velocity.z, epsilon = EPS);

            // Minimal travel selection from an arbitrary orientation gives the
            // same body motion
            let selected_states: Vec<DriveModuleState> = model
                .modules()
                .iter()
                .zip(proposed.iter())
                .map(|(m, p)| {
                    let cmd = p.select_min_travel(2.5);
                    DriveModuleState::from_module(m, cmd.steering_angle, 0.0, cmd.drive_velocity, 0.0)
                })
                .collect();
            let result = model
                .body_motion_from_wheel_module_states(&selected_states)
                .unwrap();
            assert_abs_diff_eq!(result.linear_velocity.x, motion.linear_velocity.x, epsilon = EPS);
            assert_abs_diff_eq!(result.linear_velocity.y, motion.linear_velocity.y, epsilon = EPS);
            assert_abs_diff_eq!(result.angular_velocity.z, motion.angular_velocity.z, epsilon = EPS);
        }
    }

    #[test]
    fn test_rejects_mismatched_states() {
        let model = create_model();
        let mut states = create_states(&model, |_| 0.0, |_| 0.0);
        states[2].name = String::from("module_9");

        assert!(matches!(
            model.state_of_wheel_modules_from_body_motion(&states, &Motion::zero()),
            Err(KinModelError::ModuleNameMismatch { index: 2, .. })
        ));

        assert!(matches!(
            model.state_of_wheel_modules_from_body_motion(&[], &Motion::zero()),
            Err(KinModelError::ModuleCountMismatch {
                expected: 4,
                found: 0
            })
        ));
    }

    #[test]
    fn test_rejects_non_finite_motion() {
        let model = create_model();
        let states = create_states(&model, |_| 0.0, |_| 0.0);

        let motions = [
            Motion::new(f64::INFINITY, 0.0, 0.0),
            Motion::new(0.0, f64::NAN, 0.0),
            Motion::new(0.0, 0.0, f64::NEG_INFINITY),
        ];

        for motion in motions.iter() {
            assert_eq!(
                model
                    .state_of_wheel_modules_from_body_motion(&states, motion)
                    .unwrap_err(),
                KinModelError::NonFiniteInput(String::from("body motion"))
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_states() {
        let model = create_model();
        let states = create_states(&model, |_| f64::NAN, |_| 0.0);

        assert!(matches!(
            model.state_of_wheel_modules_from_body_motion(&states, &Motion::zero()),
            Err(KinModelError::NonFiniteInput(_))
        ));
    }
}
