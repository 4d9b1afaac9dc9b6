//! Swerve kinematics diagnostic executable.
//!
//! Runs a single pass of the kinematic model for a body twist given on the
//! command line:
//!
//!     - Load the drive module parameters and build the model
//!     - Solve the inverse kinematics from modules all at `--orientation`
//!     - Pick the minimal steering travel solution for each module
//!     - Reconstruct the body twist from those commands with the forward
//!       kinematics
//!
//! The results are logged and saved into the session directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use structopt::{clap::AppSettings, StructOpt};

// Internal
use swerve_lib::kin_model::{
    DriveModuleState, ModuleCommand, Motion, Params, ProposedModuleState, SteeringModel,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "swerve_exec",
    about = "Solve the swerve kinematics for a single body twist",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opts {
    /// Parameter file, either a path or a file name inside $SWERVE_SW_ROOT/params
    #[structopt(short, long, default_value = "swerve_model.toml")]
    params: PathBuf,

    /// Current steering angle of every module in radians
    #[structopt(short, long, default_value = "0.0")]
    orientation: f64,

    /// Trace the kinematic model on the console
    #[structopt(short, long)]
    verbose: bool,

    /// Body linear velocity along X in meters/second
    vx_ms: f64,

    /// Body linear velocity along Y in meters/second
    vy_ms: f64,

    /// Body yaw rate in radians/second
    wz_rads: f64,
}

/// Everything computed in this execution, saved into the session.
#[derive(Serialize)]
struct SolveReport {
    demand: Motion,
    current_orientation_rad: f64,
    proposed: Vec<ProposedModuleState>,
    selected: Vec<ModuleCommand>,
    reconstructed: Motion,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("swerve_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    // Verbose output traces the solvers only
    let module_levels: &[(&'static str, LevelFilter)] = if opts.verbose {
        &[("swerve_lib::kin_model", LevelFilter::Trace)]
    } else {
        &[]
    };
    logger_init(LevelFilter::Info, &session, module_levels)
        .wrap_err("Failed to initialise logging")?;

    info!("Swerve Kinematics Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: Params = if opts.params.is_file() {
        util::params::load_from_path(&opts.params)
    } else {
        util::params::load(&opts.params.to_string_lossy())
    }
    .wrap_err("Could not load the kinematic model params")?;

    let model = SteeringModel::from_params(&params).wrap_err("Invalid drive module configuration")?;

    info!("Kinematic model built with {} modules", model.modules().len());

    // ---- INVERSE KINEMATICS ----

    let demand = Motion::new(opts.vx_ms, opts.vy_ms, opts.wz_rads);

    let current: Vec<DriveModuleState> = model
        .modules()
        .iter()
        .map(|m| DriveModuleState::from_module(m, opts.orientation, 0.0, 0.0, 0.0))
        .collect();

    let proposed = model
        .state_of_wheel_modules_from_body_motion(&current, &demand)
        .wrap_err("Inverse kinematics failed")?;

    let selected: Vec<ModuleCommand> = proposed
        .iter()
        .map(|p| p.select_min_travel(opts.orientation))
        .collect();

    info!("Demanded motion: {:?}", demand);
    for cmd in selected.iter() {
        info!(
            "    {:>12}: str {:8.4} rad, drv {:8.4} m/s{}",
            cmd.name,
            cmd.steering_angle,
            cmd.drive_velocity,
            if cmd.reversed { " (reversed)" } else { "" }
        );
    }

    // ---- FORWARD KINEMATICS ----

    let commanded: Vec<DriveModuleState> = model
        .modules()
        .iter()
        .zip(selected.iter())
        .map(|(m, cmd)| {
            DriveModuleState::from_module(m, cmd.steering_angle, 0.0, cmd.drive_velocity, 0.0)
        })
        .collect();

    let reconstructed = model
        .body_motion_from_wheel_module_states(&commanded)
        .wrap_err("Forward kinematics failed")?;

    info!("Reconstructed motion: {:?}", reconstructed);

    // ---- SAVE ----

    session
        .save(
            "swerve_exec/solve_report.json",
            &SolveReport {
                demand,
                current_orientation_rad: opts.orientation,
                proposed,
                selected,
                reconstructed,
            },
        )
        .wrap_err("Failed to save the solve report")?;

    info!("End of execution");

    Ok(())
}
