//! Application entry point for the joint-rope viewer.
//!
//! This binary sets up logging and eframe/egui, and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger`; set `RUST_LOG=joint_core=debug` to
/// see attachments and rebuilds.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the default rig cannot be built, or eframe fails to create
///   the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Joint Rope",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()?))),
    )
}
