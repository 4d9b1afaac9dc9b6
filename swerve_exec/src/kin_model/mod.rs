//! Kinematic model of a multi-wheel steering (swerve) chassis.
//!
//! The model converts between the body twist of the chassis and the steering
//! angle and drive velocity of each drive module. It is stateless between
//! calls: the only data it holds is the immutable list of drive modules given
//! at construction, the order of which defines the module index used by every
//! state list passed in or returned.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_forward;
mod calc_inverse;
mod drive_module;
mod geometry;
mod model;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use drive_module::*;
pub use geometry::*;
pub use model::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Required contact point speeds below this value are treated as zero, in
/// which case the module holds its current steering angle.
///
/// Units: meters/second
pub const ZERO_SPEED_TOLERANCE_MS: f64 = 1e-9;

/// Maximum difference in either coordinate between a module state's position
/// and the configured steering axis position of that module.
///
/// Units: meters
pub const POSITION_TOLERANCE_M: f64 = 1e-9;

/// Determinants of the normal equations matrix below this value mark the
/// module geometry as degenerate.
pub const SINGULAR_DET_TOLERANCE: f64 = 1e-12;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while building or using the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinModelError {
    // ---- CONFIGURATION ----
    #[error("At least one drive module must be configured")]
    NoModules,

    #[error("Drive module '{module}' has a non-positive {parameter}: {value}")]
    NonPositiveParameter {
        module: String,
        parameter: &'static str,
        value: f64,
    },

    #[error("Drive modules '{0}' and '{1}' share the same steering axis position")]
    DuplicateModulePosition(String, String),

    #[error(
        "The drive module geometry is degenerate (determinant {0:e}), body motion \
         cannot be resolved"
    )]
    DegenerateGeometry(f64),

    // ---- USAGE ----
    #[error("Expected {expected} module states but found {found}")]
    ModuleCountMismatch { expected: usize, found: usize },

    #[error("Module state {index} is for '{found}' but the configured module is '{expected}'")]
    ModuleNameMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error(
        "Module state for '{module}' is at ({found_x}, {found_y}) but the module is \
         mounted at ({expected_x}, {expected_y})"
    )]
    ModulePositionMismatch {
        module: String,
        expected_x: f64,
        expected_y: f64,
        found_x: f64,
        found_y: f64,
    },

    #[error("Non-finite value in {0}")]
    NonFiniteInput(String),
}
