//! Pipeline supervision.
//!
//! Drives the three stages in order: build the firmware module, patch it
//! into the platform's code image, boot the result under QEMU. Each stage
//! must exit zero before the next starts; the first failure aborts the run
//! with the failing stage attached.

use std::fs;
use std::process::Command;
use std::time::Instant;

use crate::console::ConsoleModeGuard;
use crate::error::{PipelineError, Result, Stage};
use crate::settings::{CommandSpec, ResolvedSettings};

/// Run all three stages.
///
/// `started` is the moment the process began; the cumulative time printed
/// before QEMU launches is measured from it.
pub fn run_pipeline(settings: &ResolvedSettings, started: Instant) -> Result<()> {
    build_module(settings)?;
    patch_image(settings)?;
    println!(
        "Total time to get to QEMU launch: {:.2} seconds.\n",
        started.elapsed().as_secs_f64()
    );
    boot_emulator(settings)
}

/// Build stage: compile the firmware module.
fn build_module(settings: &ResolvedSettings) -> Result<()> {
    println!("[1/3] Building firmware module...\n");
    let started = Instant::now();

    let mut cmd = settings.build_cmd.command();
    // cargo's -C flag is nightly-gated; RUSTC_BOOTSTRAP unlocks it for
    // this one child only
    if settings.build_cmd.has_arg("-Zunstable-options") {
        cmd.env("RUSTC_BOOTSTRAP", "1");
    }
    if settings.profile.is_release() {
        cmd.args(["--profile", "release"]);
    }
    launch(Stage::Build, &settings.build_cmd, &mut cmd)?;

    println!(
        "Firmware module build time: {:.2} seconds.\n",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Patch stage: splice the module into a pristine copy of the code image.
///
/// The code image is copied aside as the reference image the patcher reads.
/// On success the copy is deleted; after a patcher failure it is left on
/// disk so the failed input can be inspected.
fn patch_image(settings: &ResolvedSettings) -> Result<()> {
    println!("[2/3] Patching module into firmware image...\n");

    fs::copy(&settings.code_image, &settings.reference_image).map_err(|source| {
        PipelineError::StageIo {
            stage: Stage::Patch,
            context: format!(
                "copying {} to {}",
                settings.code_image.display(),
                settings.reference_image.display()
            ),
            source,
        }
    })?;

    let mut cmd = settings.patch_cmd.command();
    launch(Stage::Patch, &settings.patch_cmd, &mut cmd)?;

    fs::remove_file(&settings.reference_image).map_err(|source| PipelineError::StageIo {
        stage: Stage::Patch,
        context: format!("removing {}", settings.reference_image.display()),
        source,
    })
}

/// Run stage: boot the patched image under QEMU.
fn boot_emulator(settings: &ResolvedSettings) -> Result<()> {
    println!("[3/3] Running QEMU...\n");

    // QEMU garbles the console input mode on Windows; the guard puts it
    // back no matter how the stage exits
    let _console = ConsoleModeGuard::capture();
    let mut cmd = settings.qemu_cmd.command();
    launch(Stage::Run, &settings.qemu_cmd, &mut cmd)
}

fn launch(stage: Stage, spec: &CommandSpec, cmd: &mut Command) -> Result<()> {
    let status = cmd.status().map_err(|source| PipelineError::StageIo {
        stage,
        context: format!("launching {}", spec.program.display()),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(PipelineError::StageFailed {
            stage,
            status: status.code(),
        })
    }
}
