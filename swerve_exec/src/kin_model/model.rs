//! Steering model construction and input validation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Matrix3;

// Internal
use super::{
    DriveModule, DriveModuleState, KinModelError, Params, POSITION_TOLERANCE_M,
    SINGULAR_DET_TOLERANCE,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic model of a chassis with independently steered and driven wheel
/// modules.
///
/// The model only holds immutable configuration, so a single instance can be
/// shared between threads computing odometry and setpoints at the same time.
#[derive(Clone, Debug)]
pub struct SteeringModel {
    /// Configured modules, in canonical order.
    pub(crate) modules: Vec<DriveModule>,

    /// Inverse of `J^T J` for the stacked contact point Jacobian.
    ///
    /// The Jacobian only depends on the module positions so this is computed
    /// once at construction.
    pub(crate) jtj_inv: Matrix3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteeringModel {
    /// Create a new model from an ordered list of drive modules.
    ///
    /// The modules must be non-empty, sit at distinct positions, and together
    /// allow both translation and rotation of the body to be resolved.
    pub fn new(modules: Vec<DriveModule>) -> Result<Self, KinModelError> {
        if modules.is_empty() {
            return Err(KinModelError::NoModules);
        }

        // Check no two modules share a steering axis
        for (i, a) in modules.iter().enumerate() {
            for b in modules.iter().skip(i + 1) {
                let pos = b.steering_axis_xy_position();
                if a.steering_axis_xy_position()
                    .xy_near(pos.x, pos.y, POSITION_TOLERANCE_M)
                {
                    return Err(KinModelError::DuplicateModulePosition(
                        String::from(a.name()),
                        String::from(b.name()),
                    ));
                }
            }
        }

        // Build the normal equations matrix J^T J. For a module at (x, y) the
        // Jacobian rows are [1, 0, -y] and [0, 1, x].
        let mut jtj = Matrix3::<f64>::zeros();
        for module in modules.iter() {
            let pos = module.steering_axis_xy_position();

            jtj += Matrix3::new(
                1.0,
                0.0,
                -pos.y,
                0.0,
                1.0,
                pos.x,
                -pos.y,
                pos.x,
                pos.x.powi(2) + pos.y.powi(2),
            );
        }

        let det = jtj.determinant();
        if det.abs() < SINGULAR_DET_TOLERANCE {
            return Err(KinModelError::DegenerateGeometry(det));
        }

        let jtj_inv = jtj
            .try_inverse()
            .ok_or(KinModelError::DegenerateGeometry(det))?;

        debug!(
            "Steering model built with {} modules (normal matrix determinant {:.6})",
            modules.len(),
            det
        );

        Ok(Self { modules, jtj_inv })
    }

    /// Create a new model from loaded parameters.
    pub fn from_params(params: &Params) -> Result<Self, KinModelError> {
        let modules = params
            .modules
            .iter()
            .cloned()
            .map(DriveModule::new)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(modules)
    }

    /// The configured modules in canonical order.
    pub fn modules(&self) -> &[DriveModule] {
        &self.modules
    }

    /// Check that the given states line up with the configured modules by
    /// count, name and position.
    pub(crate) fn check_states(&self, states: &[DriveModuleState]) -> Result<(), KinModelError> {
        let res = self.find_state_mismatch(states);

        if let Err(ref e) = res {
            warn!("Rejected module states: {}", e);
        }

        res
    }

    fn find_state_mismatch(&self, states: &[DriveModuleState]) -> Result<(), KinModelError> {
        if states.len() != self.modules.len() {
            return Err(KinModelError::ModuleCountMismatch {
                expected: self.modules.len(),
                found: states.len(),
            });
        }

        for (index, (module, state)) in self.modules.iter().zip(states.iter()).enumerate() {
            if module.name() != state.name {
                return Err(KinModelError::ModuleNameMismatch {
                    index,
                    expected: String::from(module.name()),
                    found: state.name.clone(),
                });
            }

            if !state.is_finite() {
                return Err(KinModelError::NonFiniteInput(format!(
                    "module state for '{}'",
                    state.name
                )));
            }

            let pos = module.steering_axis_xy_position();
            if !pos.xy_near(state.x, state.y, POSITION_TOLERANCE_M) {
                return Err(KinModelError::ModulePositionMismatch {
                    module: state.name.clone(),
                    expected_x: pos.x,
                    expected_y: pos.y,
                    found_x: state.x,
                    found_y: state.y,
                });
            }
        }

        Ok(())
    }
}
