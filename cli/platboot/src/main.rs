//! platboot — build a firmware module, patch it into a reference firmware
//! image, and boot the result under QEMU.

mod manifest;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use platboot_pipeline::{
    resolve, run_pipeline, today_mdy, PipelineError, ResolvedSettings, RunRequest,
};
use platboot_targets::{BuildProfile, Platform};

use manifest::PlatbootManifest;

/// Built-in repo roots, used when neither a flag nor a manifest entry
/// overrides them.
const DEFAULT_FIRMWARE_REPO: &str = "C:/src/uefi_rust";
const DEFAULT_MODULE_REPO: &str = "C:/src/qemu_rust_bins";
const DEFAULT_PATCHER_REPO: &str = "C:/src/fw_rust_patcher";

#[derive(Parser)]
#[command(
    name = "platboot",
    version,
    about = "Build a firmware module, patch it into a reference image, and boot it under QEMU"
)]
struct Cli {
    /// Path to the platform firmware repository
    #[arg(long)]
    firmware_repo: Option<PathBuf>,
    /// Path to the firmware module repository
    #[arg(long)]
    module_repo: Option<PathBuf>,
    /// Path to the firmware patch tool repository
    #[arg(long)]
    patcher_repo: Option<PathBuf>,
    /// Build target (DEBUG, RELEASE)
    #[arg(short = 'b', long)]
    build_target: Option<String>,
    /// Emulated platform (Q35, SBSA)
    #[arg(short = 'p', long)]
    platform: Option<String>,
    /// Toolchain the firmware build directory is named for
    #[arg(short = 't', long)]
    toolchain: Option<String>,
    /// OS boot media image to attach (.vhd, .qcow2, .iso)
    #[arg(long)]
    boot_media: Option<PathBuf>,
    /// Serial console TCP port
    #[arg(short = 's', long)]
    serial_port: Option<u16>,
    /// GDB server TCP port
    #[arg(short = 'g', long)]
    gdb_port: Option<u16>,
    /// Resolve and print the configuration without running any stage
    #[arg(long)]
    dry_run: bool,
    /// Configuration report format (human, json)
    #[arg(long)]
    report: Option<String>,
}

fn main() {
    let started = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = run(cli, started) {
        eprintln!("error: {e:#}");
        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli, started: Instant) -> Result<()> {
    if !matches!(cli.report.as_deref(), Some("json")) {
        println!("Platform firmware build and boot pipeline\n");
    }

    let cwd = std::env::current_dir()?;
    let found = PlatbootManifest::find_and_load(&cwd)?;
    let request = build_request(&cli, found.as_ref(), &cwd)?;
    let settings = resolve(&request, &today_mdy())?;

    print_report(&settings, cli.report.as_deref())?;
    if cli.dry_run {
        return Ok(());
    }
    run_pipeline(&settings, started)?;
    Ok(())
}

/// Merge flags, manifest entries, and built-in defaults into a run request.
fn build_request(
    cli: &Cli,
    found: Option<&(PlatbootManifest, PathBuf)>,
    cwd: &Path,
) -> Result<RunRequest> {
    let manifest = found.map(|(m, _)| m);
    let manifest_dir = found.map(|(_, dir)| dir.as_path());

    let platform_name = cli
        .platform
        .clone()
        .or_else(|| manifest.and_then(|m| m.default_platform().map(str::to_string)))
        .unwrap_or_else(|| "Q35".to_string());
    let platform = Platform::parse(&platform_name).map_err(PipelineError::from)?;

    let profile_name = cli
        .build_target
        .clone()
        .or_else(|| manifest.and_then(|m| m.default_build_target().map(str::to_string)))
        .unwrap_or_else(|| "DEBUG".to_string());
    let profile = BuildProfile::parse(&profile_name).map_err(PipelineError::from)?;

    let toolchain = cli
        .toolchain
        .clone()
        .or_else(|| manifest.and_then(|m| m.default_toolchain().map(str::to_string)))
        .unwrap_or_else(|| "VS2022".to_string());

    Ok(RunRequest {
        firmware_repo: repo_root(
            cli.firmware_repo.as_deref(),
            manifest.and_then(|m| m.firmware_repo()),
            manifest_dir,
            cwd,
            DEFAULT_FIRMWARE_REPO,
        ),
        module_repo: repo_root(
            cli.module_repo.as_deref(),
            manifest.and_then(|m| m.module_repo()),
            manifest_dir,
            cwd,
            DEFAULT_MODULE_REPO,
        ),
        patcher_repo: repo_root(
            cli.patcher_repo.as_deref(),
            manifest.and_then(|m| m.patcher_repo()),
            manifest_dir,
            cwd,
            DEFAULT_PATCHER_REPO,
        ),
        platform,
        profile,
        toolchain,
        boot_media: cli.boot_media.as_deref().map(|p| absolutize(cwd, p)),
        serial_port: cli.serial_port,
        gdb_port: cli.gdb_port,
    })
}

/// Pick one repo root: flag, then manifest entry, then built-in default.
///
/// Flag and default paths anchor at the current directory; manifest paths
/// anchor at the manifest's own directory.
fn repo_root(
    flag: Option<&Path>,
    manifest_entry: Option<&Path>,
    manifest_dir: Option<&Path>,
    cwd: &Path,
    default: &str,
) -> PathBuf {
    if let Some(path) = flag {
        return absolutize(cwd, path);
    }
    if let (Some(entry), Some(dir)) = (manifest_entry, manifest_dir) {
        return absolutize(dir, entry);
    }
    absolutize(cwd, Path::new(default))
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn print_report(settings: &ResolvedSettings, format: Option<&str>) -> Result<()> {
    match format.unwrap_or("human") {
        "human" => {
            println!("{settings}");
            println!();
        }
        "json" => {
            let json = serde_json::to_string_pretty(settings)
                .context("serializing configuration report")?;
            println!("{json}");
        }
        other => bail!("unknown report format: '{other}'. Choose: human, json"),
    }
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PipelineError>() {
        Some(e) => e.exit_code(),
        None => 1,
    }
}
