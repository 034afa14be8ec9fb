//! Run configuration resolution.
//!
//! Derives every path and command line for one pipeline run from the
//! caller's request. Resolution is pure: paths are joined, never touched,
//! and the SMBIOS date stamp is injected by the caller so resolving the
//! same request twice yields identical settings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use serde::Serialize;

use platboot_targets::platform::smbios_firmware;
use platboot_targets::{BuildProfile, MediaFormat, Platform, SerialDefault, StorageBus};

use crate::error::Result;

/// File name of the firmware module binary produced by the build stage.
pub const MODULE_BINARY: &str = "dxe_readiness_capture.efi";

/// Guest memory in MiB without boot media attached.
const MEM_MIB_DEFAULT: u32 = 2048;
/// Guest memory in MiB when boot media is attached.
const MEM_MIB_WITH_MEDIA: u32 = 8192;

/// Caller intent for one pipeline run.
///
/// Repo roots are taken as given; the CLI absolutizes them before handing
/// the request over.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Platform firmware workspace root.
    pub firmware_repo: PathBuf,
    /// Firmware module workspace root; build artifacts land under its
    /// `target/` directory.
    pub module_repo: PathBuf,
    /// Firmware patch tool root.
    pub patcher_repo: PathBuf,
    pub platform: Platform,
    pub profile: BuildProfile,
    /// Requested toolchain; the platform may substitute it.
    pub toolchain: String,
    /// OS boot media to attach, if any.
    pub boot_media: Option<PathBuf>,
    pub serial_port: Option<u16>,
    pub gdb_port: Option<u16>,
}

/// One external command, fully resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSpec {
    /// Program to invoke (bare name or full path).
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory the program expects to run from, if any.
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a spec with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    /// Append a sequence of preformatted arguments.
    pub fn extend<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }

    /// Whether any argument equals `flag`.
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Build a process command ready to spawn.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Fully resolved configuration for one pipeline run.
///
/// Constructed once by [`resolve`]; the supervisor only reads it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedSettings {
    pub platform: Platform,
    pub profile: BuildProfile,
    /// Toolchain after platform substitution.
    pub toolchain: String,
    /// Firmware module workspace root.
    pub module_repo: PathBuf,
    /// Patch tool root; the patch command runs from here.
    pub patcher_repo: PathBuf,
    /// Module binary the build stage produces.
    pub module_binary: PathBuf,
    /// Flashable code image the patcher writes into.
    pub code_image: PathBuf,
    /// Transient pre-patch copy of the code image.
    pub reference_image: PathBuf,
    /// Patcher configuration file.
    pub patch_config: PathBuf,
    pub build_cmd: CommandSpec,
    pub patch_cmd: CommandSpec,
    pub qemu_cmd: CommandSpec,
}

impl fmt::Display for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Current Configuration ==")?;
        writeln!(f, " - Platform: {}", self.platform)?;
        writeln!(f, " - Module Repo: {}", self.module_repo.display())?;
        writeln!(f, " - Module Binary: {}", self.module_binary.display())?;
        writeln!(f, " - Code Image: {}", self.code_image.display())?;
        writeln!(f, " - Patcher Repo: {}", self.patcher_repo.display())?;
        writeln!(f, " - Build Target: {}", self.profile)?;
        writeln!(f, " - Toolchain: {}", self.toolchain)?;
        write!(f, " - QEMU Command Line: {}", self.qemu_cmd)
    }
}

/// Derive the full run configuration from a request.
///
/// `today_mdy` is the MM/DD/YYYY date stamped into the firmware's SMBIOS
/// identification; outside of tests callers pass [`today_mdy`]'s output.
pub fn resolve(request: &RunRequest, today_mdy: &str) -> Result<ResolvedSettings> {
    let platform = request.platform;
    let toolchain = platform.effective_toolchain(&request.toolchain);

    let fv_dir = request
        .firmware_repo
        .join("Build")
        .join(platform.firmware_package())
        .join(format!(
            "{}_{}",
            request.profile.name(),
            toolchain.to_uppercase()
        ))
        .join("FV");
    let code_image = fv_dir.join(platform.code_image_name());
    let reference_image = code_image.with_extension("ref.fd");

    let module_binary = request
        .module_repo
        .join("target")
        .join(platform.target_triple())
        .join(request.profile.artifact_dir())
        .join(MODULE_BINARY);

    let patch_config = request
        .patcher_repo
        .join("Configs")
        .join(platform.patch_config_name());

    let build_cmd = build_command(request);
    let patch_cmd = patch_command(
        &request.patcher_repo,
        &patch_config,
        &module_binary,
        &reference_image,
        &code_image,
    );
    let qemu_cmd = emulator_command(request, &fv_dir, &code_image, today_mdy)?;

    Ok(ResolvedSettings {
        platform,
        profile: request.profile,
        toolchain,
        module_repo: request.module_repo.clone(),
        patcher_repo: request.patcher_repo.clone(),
        module_binary,
        code_image,
        reference_image,
        patch_config,
        build_cmd,
        patch_cmd,
        qemu_cmd,
    })
}

/// Cargo invocation that builds the firmware module inside its own repo.
///
/// Release runs get `--profile release` appended by the supervisor at
/// launch, not here.
fn build_command(request: &RunRequest) -> CommandSpec {
    let mut cmd = CommandSpec::new("cargo");
    cmd.push("-Zunstable-options");
    cmd.push("-C");
    cmd.push(request.module_repo.display().to_string());
    cmd.extend(request.platform.build_subcommand().iter().copied());
    cmd
}

/// Patcher invocation splicing the module into the code image.
fn patch_command(
    patcher_repo: &Path,
    patch_config: &Path,
    module_binary: &Path,
    reference_image: &Path,
    code_image: &Path,
) -> CommandSpec {
    let mut cmd = CommandSpec::new("python");
    cmd.push("patch.py");
    cmd.push("-c");
    cmd.push(patch_config.display().to_string());
    cmd.push("-i");
    cmd.push(module_binary.display().to_string());
    cmd.push("-r");
    cmd.push(reference_image.display().to_string());
    cmd.push("-o");
    cmd.push(code_image.display().to_string());
    cmd.cwd = Some(patcher_repo.to_path_buf());
    cmd
}

/// Emulator invocation booting the patched code image.
fn emulator_command(
    request: &RunRequest,
    fv_dir: &Path,
    code_image: &Path,
    today_mdy: &str,
) -> Result<CommandSpec> {
    let platform = request.platform;
    let emulator_dir = request
        .firmware_repo
        .join("QemuPkg")
        .join("Binaries")
        .join("qemu-win_extdep");
    let mut cmd = CommandSpec::new(emulator_dir.join(platform.emulator_binary()));

    match platform {
        Platform::Q35 => {
            cmd.extend(["-debugcon", "stdio"]);
            cmd.push("-L");
            cmd.push(emulator_dir.join("share").display().to_string());
            cmd.extend(["-global", "isa-debugcon.iobase=0x402"]);
            cmd.extend(["-global", "ICH9-LPC.disable_s3=1"]);
        }
        Platform::Sbsa => {
            cmd.extend(["-net", "none"]);
            cmd.push("-L");
            cmd.push(emulator_dir.join("share").display().to_string());
        }
    }

    cmd.extend(["-machine", platform.machine_type()]);
    cmd.extend(["-cpu", platform.cpu_spec()]);
    cmd.extend(["-smp", "4"]);

    cmd.extend(["-global", "driver=cfi.pflash01,property=secure,value=on"]);
    for (unit, slot) in platform.flash_units().iter().enumerate() {
        let file = match slot.companion {
            Some(name) => fv_dir.join(name),
            None => code_image.to_path_buf(),
        };
        let mut drive = format!("if=pflash,format=raw,unit={unit},file={}", file.display());
        if slot.readonly {
            drive.push_str(",readonly=on");
        }
        cmd.push("-drive");
        cmd.push(drive);
    }

    cmd.extend(platform.usb_device_args().iter().copied());
    if platform == Platform::Q35 {
        cmd.extend(["-net", "none"]);
    }

    cmd.push("-smbios");
    cmd.push(smbios_firmware(today_mdy));
    cmd.extend(["-smbios", platform.smbios_system()]);
    cmd.extend(["-smbios", platform.smbios_chassis()]);

    if platform == Platform::Q35 {
        cmd.extend(["-vga", "cirrus"]);
    }

    cmd.push("-serial");
    cmd.push(serial_arg(platform, request.serial_port));

    if let Some(port) = request.gdb_port {
        cmd.push("-gdb");
        cmd.push(format!("tcp::{port}"));
    }

    let mem = match &request.boot_media {
        Some(media) => {
            cmd.extend(boot_media_args(media, platform)?);
            MEM_MIB_WITH_MEDIA
        }
        None => MEM_MIB_DEFAULT,
    };
    cmd.push("-m");
    cmd.push(mem.to_string());

    Ok(cmd)
}

fn serial_arg(platform: Platform, requested: Option<u16>) -> String {
    match (requested, platform.serial_default()) {
        (Some(port), _) => tcp_serial(port),
        (None, SerialDefault::TcpPort(port)) => tcp_serial(port),
        (None, SerialDefault::Stdio) => "stdio".to_string(),
    }
}

fn tcp_serial(port: u16) -> String {
    format!("tcp:127.0.0.1:{port},server,nowait")
}

/// Translate a boot media path into emulator attachment arguments.
///
/// Optical images attach as a CD-ROM; disk images attach over the
/// platform's storage bus.
pub fn boot_media_args(media: &Path, platform: Platform) -> Result<Vec<String>> {
    let format = MediaFormat::from_path(media)?;
    if format.is_optical() {
        return Ok(vec!["-cdrom".to_string(), media.display().to_string()]);
    }

    let drive = format!(
        "file={},format={},if=none",
        media.display(),
        format.drive_format()
    );
    let args = match platform.storage_bus() {
        StorageBus::Nvme => vec![
            "-drive".to_string(),
            format!("{drive},id=os_nvme"),
            "-device".to_string(),
            "nvme,serial=nvme-1,drive=os_nvme".to_string(),
        ],
        StorageBus::Ahci => vec![
            "-drive".to_string(),
            format!("{drive},id=os_disk"),
            "-device".to_string(),
            "ahci,id=ahci".to_string(),
            "-device".to_string(),
            "ide-hd,drive=os_disk,bus=ahci.0".to_string(),
        ],
    };
    Ok(args)
}

/// Current date as MM/DD/YYYY for the SMBIOS firmware release stamp.
pub fn today_mdy() -> String {
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let days = (duration.as_secs() / 86400) as i64;
    // Split days since 1970-01-01 into calendar components (no leap
    // seconds, sufficient for a date stamp)
    let mut year = 1970i64;
    let mut remaining = days;
    loop {
        let year_days = if leap_year(year) { 366 } else { 365 };
        if remaining < year_days {
            break;
        }
        remaining -= year_days;
        year += 1;
    }
    let month_days: [i64; 12] = [
        31,
        if leap_year(year) { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 0usize;
    while month < 12 && remaining >= month_days[month] {
        remaining -= month_days[month];
        month += 1;
    }
    format!("{:02}/{:02}/{:04}", month + 1, remaining + 1, year)
}

fn leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platboot_targets::TargetError;
    use crate::error::PipelineError;

    fn base_request(platform: Platform, profile: BuildProfile) -> RunRequest {
        RunRequest {
            firmware_repo: PathBuf::from("/work/fw"),
            module_repo: PathBuf::from("/work/bins"),
            patcher_repo: PathBuf::from("/work/patcher"),
            platform,
            profile,
            toolchain: "VS2022".to_string(),
            boot_media: None,
            serial_port: None,
            gdb_port: None,
        }
    }

    fn has_pair(args: &[String], a: &str, b: &str) -> bool {
        args.windows(2).any(|w| w[0] == a && w[1] == b)
    }

    #[test]
    fn q35_debug_paths() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(
            s.code_image,
            PathBuf::from("/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_CODE.fd")
        );
        assert_eq!(
            s.reference_image,
            PathBuf::from("/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_CODE.ref.fd")
        );
        assert_eq!(
            s.module_binary,
            PathBuf::from("/work/bins/target/x86_64-unknown-uefi/debug/dxe_readiness_capture.efi")
        );
        assert_eq!(s.patch_config, PathBuf::from("/work/patcher/Configs/QemuQ35.json"));
        assert_eq!(s.toolchain, "VS2022");
        assert!(s.code_image.is_absolute());
        assert!(s.reference_image.is_absolute());
        assert!(s.module_binary.is_absolute());
    }

    #[test]
    fn sbsa_release_paths_substitute_toolchain() {
        let s = resolve(&base_request(Platform::Sbsa, BuildProfile::Release), "01/02/2026").unwrap();
        assert_eq!(s.toolchain, "CLANGPDB");
        assert_eq!(
            s.code_image,
            PathBuf::from("/work/fw/Build/QemuSbsaPkg/RELEASE_CLANGPDB/FV/QEMU_EFI.fd")
        );
        assert_eq!(
            s.reference_image,
            PathBuf::from("/work/fw/Build/QemuSbsaPkg/RELEASE_CLANGPDB/FV/QEMU_EFI.ref.fd")
        );
        assert_eq!(
            s.module_binary,
            PathBuf::from(
                "/work/bins/target/aarch64-unknown-uefi/release/dxe_readiness_capture.efi"
            )
        );
        assert_eq!(s.patch_config, PathBuf::from("/work/patcher/Configs/QemuSbsa.json"));
    }

    #[test]
    fn toolchain_is_uppercased_in_build_dir_only() {
        let mut request = base_request(Platform::Q35, BuildProfile::Debug);
        request.toolchain = "vs2019".to_string();
        let s = resolve(&request, "01/02/2026").unwrap();
        assert_eq!(
            s.code_image,
            PathBuf::from("/work/fw/Build/QemuQ35Pkg/DEBUG_VS2019/FV/QEMUQ35_CODE.fd")
        );
        assert_eq!(s.toolchain, "vs2019");
    }

    #[test]
    fn build_command_layout() {
        let q35 = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(q35.build_cmd.program, PathBuf::from("cargo"));
        assert_eq!(
            q35.build_cmd.args,
            ["-Zunstable-options", "-C", "/work/bins", "make", "build"]
        );

        let sbsa =
            resolve(&base_request(Platform::Sbsa, BuildProfile::Release), "01/02/2026").unwrap();
        assert_eq!(
            sbsa.build_cmd.args,
            ["-Zunstable-options", "-C", "/work/bins", "build_sbsa"]
        );
    }

    #[test]
    fn patch_command_layout() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(s.patch_cmd.program, PathBuf::from("python"));
        assert_eq!(
            s.patch_cmd.args,
            [
                "patch.py",
                "-c",
                "/work/patcher/Configs/QemuQ35.json",
                "-i",
                "/work/bins/target/x86_64-unknown-uefi/debug/dxe_readiness_capture.efi",
                "-r",
                "/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_CODE.ref.fd",
                "-o",
                "/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_CODE.fd",
            ]
        );
        assert_eq!(s.patch_cmd.cwd, Some(PathBuf::from("/work/patcher")));
    }

    #[test]
    fn q35_serial_defaults_to_fixed_port() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-serial",
            "tcp:127.0.0.1:50001,server,nowait"
        ));
    }

    #[test]
    fn sbsa_serial_defaults_to_stdio() {
        let s = resolve(&base_request(Platform::Sbsa, BuildProfile::Debug), "01/02/2026").unwrap();
        assert!(has_pair(&s.qemu_cmd.args, "-serial", "stdio"));
    }

    #[test]
    fn explicit_serial_port_wins_on_both_platforms() {
        for platform in [Platform::Q35, Platform::Sbsa] {
            let mut request = base_request(platform, BuildProfile::Debug);
            request.serial_port = Some(50505);
            let s = resolve(&request, "01/02/2026").unwrap();
            assert!(has_pair(
                &s.qemu_cmd.args,
                "-serial",
                "tcp:127.0.0.1:50505,server,nowait"
            ));
        }
    }

    #[test]
    fn gdb_port_is_optional() {
        let plain = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert!(!plain.qemu_cmd.has_arg("-gdb"));

        let mut request = base_request(Platform::Q35, BuildProfile::Debug);
        request.gdb_port = Some(1234);
        let s = resolve(&request, "01/02/2026").unwrap();
        assert!(has_pair(&s.qemu_cmd.args, "-gdb", "tcp::1234"));
    }

    #[test]
    fn memory_scales_with_media() {
        for platform in [Platform::Q35, Platform::Sbsa] {
            let plain = resolve(&base_request(platform, BuildProfile::Debug), "01/02/2026").unwrap();
            let args = &plain.qemu_cmd.args;
            assert_eq!(&args[args.len() - 2..], &["-m", "2048"]);

            let mut request = base_request(platform, BuildProfile::Debug);
            request.boot_media = Some(PathBuf::from("/imgs/os.vhd"));
            let media = resolve(&request, "01/02/2026").unwrap();
            let args = &media.qemu_cmd.args;
            assert_eq!(&args[args.len() - 2..], &["-m", "8192"]);
        }
    }

    #[test]
    fn vhd_on_q35_attaches_over_nvme() {
        let mut request = base_request(Platform::Q35, BuildProfile::Debug);
        request.boot_media = Some(PathBuf::from("/imgs/os.vhd"));
        let s = resolve(&request, "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "file=/imgs/os.vhd,format=raw,if=none,id=os_nvme"
        ));
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-device",
            "nvme,serial=nvme-1,drive=os_nvme"
        ));
        assert!(!s.qemu_cmd.args.iter().any(|a| a.contains("os_disk")));
    }

    #[test]
    fn vhd_on_sbsa_release_attaches_over_ahci() {
        let mut request = base_request(Platform::Sbsa, BuildProfile::Release);
        request.boot_media = Some(PathBuf::from("/imgs/os.vhd"));
        let s = resolve(&request, "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "file=/imgs/os.vhd,format=raw,if=none,id=os_disk"
        ));
        assert!(has_pair(&s.qemu_cmd.args, "-device", "ahci,id=ahci"));
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-device",
            "ide-hd,drive=os_disk,bus=ahci.0"
        ));
        assert!(!s.qemu_cmd.args.iter().any(|a| a.contains("nvme")));
        assert!(has_pair(&s.qemu_cmd.args, "-m", "8192"));
    }

    #[test]
    fn qcow2_keeps_its_drive_format() {
        let mut request = base_request(Platform::Q35, BuildProfile::Debug);
        request.boot_media = Some(PathBuf::from("/imgs/os.qcow2"));
        let s = resolve(&request, "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "file=/imgs/os.qcow2,format=qcow2,if=none,id=os_nvme"
        ));
    }

    #[test]
    fn iso_attaches_as_cdrom() {
        let mut request = base_request(Platform::Sbsa, BuildProfile::Debug);
        request.boot_media = Some(PathBuf::from("/imgs/installer.iso"));
        let s = resolve(&request, "01/02/2026").unwrap();
        assert!(has_pair(&s.qemu_cmd.args, "-cdrom", "/imgs/installer.iso"));
        assert!(!s.qemu_cmd.args.iter().any(|a| a.contains("os_disk")));
        assert!(!s.qemu_cmd.args.iter().any(|a| a.contains("os_nvme")));
    }

    #[test]
    fn unknown_media_fails_resolution() {
        let mut request = base_request(Platform::Q35, BuildProfile::Debug);
        request.boot_media = Some(PathBuf::from("/imgs/os.img"));
        let err = resolve(&request, "01/02/2026").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Config(TargetError::UnsupportedMedia { .. })
        ));
    }

    #[test]
    fn q35_flash_bank_arguments() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "if=pflash,format=raw,unit=0,file=/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_CODE.fd,readonly=on"
        ));
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "if=pflash,format=raw,unit=1,file=/work/fw/Build/QemuQ35Pkg/DEBUG_VS2022/FV/QEMUQ35_VARS.fd"
        ));
    }

    #[test]
    fn sbsa_flash_bank_arguments() {
        let s = resolve(&base_request(Platform::Sbsa, BuildProfile::Debug), "01/02/2026").unwrap();
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "if=pflash,format=raw,unit=0,file=/work/fw/Build/QemuSbsaPkg/DEBUG_CLANGPDB/FV/SECURE_FLASH0.fd"
        ));
        assert!(has_pair(
            &s.qemu_cmd.args,
            "-drive",
            "if=pflash,format=raw,unit=1,file=/work/fw/Build/QemuSbsaPkg/DEBUG_CLANGPDB/FV/QEMU_EFI.fd,readonly=on"
        ));
    }

    #[test]
    fn emulator_program_lives_in_firmware_repo() {
        let q35 = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(
            q35.qemu_cmd.program,
            PathBuf::from("/work/fw/QemuPkg/Binaries/qemu-win_extdep/qemu-system-x86_64")
        );
        let sbsa = resolve(&base_request(Platform::Sbsa, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(
            sbsa.qemu_cmd.program,
            PathBuf::from("/work/fw/QemuPkg/Binaries/qemu-win_extdep/qemu-system-aarch64")
        );
    }

    #[test]
    fn smbios_carries_injected_date() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "08/25/2026").unwrap();
        assert!(s.qemu_cmd.args.iter().any(|a| a.contains("date=08/25/2026")));
    }

    #[test]
    fn command_spec_display_joins_arguments() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        assert_eq!(
            s.build_cmd.to_string(),
            "cargo -Zunstable-options -C /work/bins make build"
        );
    }

    #[test]
    fn settings_report_block() {
        let s = resolve(&base_request(Platform::Q35, BuildProfile::Debug), "01/02/2026").unwrap();
        let report = s.to_string();
        assert!(report.starts_with("== Current Configuration =="));
        assert!(report.contains(" - Platform: Q35"));
        assert!(report.contains(" - Build Target: DEBUG"));
        assert!(report.contains(" - Toolchain: VS2022"));
        assert!(report.contains(" - QEMU Command Line: "));
    }

    #[test]
    fn today_mdy_shape() {
        let date = today_mdy();
        assert_eq!(date.len(), 10);
        let bytes = date.as_bytes();
        assert_eq!(bytes[2], b'/');
        assert_eq!(bytes[5], b'/');
        let month: u32 = date[0..2].parse().unwrap();
        let day: u32 = date[3..5].parse().unwrap();
        let year: u32 = date[6..10].parse().unwrap();
        assert!((1..=12).contains(&month));
        assert!((1..=31).contains(&day));
        assert!(year >= 2024);
    }
}
