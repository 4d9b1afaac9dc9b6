//! # Swerve library.
//!
//! This library allows other crates in the workspace to access items defined inside the swerve
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Kinematic model - converts between body motion and individual steer/drive module states
pub mod kin_model;
