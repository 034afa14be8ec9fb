//! Emulated platform tables.
//!
//! Each supported platform is a [`Platform`] variant whose accessors return
//! the data that differs between the two machines: firmware package layout,
//! emulator binary, machine and CPU flags, pflash bank layout, SMBIOS
//! identification, storage bus, and serial console default. Everything the
//! resolver branches on lives here so the command assembly stays
//! single-sourced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Storage bus used to attach fixed-disk boot media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBus {
    /// NVMe controller with the media as its namespace.
    Nvme,
    /// AHCI controller with the media as an IDE disk behind it.
    Ahci,
}

/// Serial console wiring used when no port is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialDefault {
    /// Listen on a fixed localhost TCP port.
    TcpPort(u16),
    /// Wire the serial console to the host's stdio.
    Stdio,
}

/// One slot in the emulator's pflash firmware bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashUnit {
    /// Companion image file name next to the code image, or `None` for the
    /// code image itself.
    pub companion: Option<&'static str>,
    /// Whether the emulator maps the unit read-only.
    pub readonly: bool,
}

/// A supported emulated platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    /// x86-64 Q35 machine with SMM enabled.
    Q35,
    /// AArch64 SBSA reference machine.
    Sbsa,
}

impl Platform {
    /// Parse a platform name (case-insensitive).
    pub fn parse(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("q35") {
            Ok(Platform::Q35)
        } else if name.eq_ignore_ascii_case("sbsa") {
            Ok(Platform::Sbsa)
        } else {
            Err(TargetError::UnknownPlatform {
                name: name.to_string(),
            })
        }
    }

    /// Canonical platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Q35 => "Q35",
            Platform::Sbsa => "SBSA",
        }
    }

    /// Firmware build package directory under the firmware repo's `Build/`.
    pub fn firmware_package(&self) -> &'static str {
        match self {
            Platform::Q35 => "QemuQ35Pkg",
            Platform::Sbsa => "QemuSbsaPkg",
        }
    }

    /// File name of the flashable code image produced by the firmware build.
    pub fn code_image_name(&self) -> &'static str {
        match self {
            Platform::Q35 => "QEMUQ35_CODE.fd",
            Platform::Sbsa => "QEMU_EFI.fd",
        }
    }

    /// Patcher configuration file under the patcher repo's `Configs/`.
    pub fn patch_config_name(&self) -> &'static str {
        match self {
            Platform::Q35 => "QemuQ35.json",
            Platform::Sbsa => "QemuSbsa.json",
        }
    }

    /// Rust target triple the firmware module is built for.
    pub fn target_triple(&self) -> &'static str {
        match self {
            Platform::Q35 => "x86_64-unknown-uefi",
            Platform::Sbsa => "aarch64-unknown-uefi",
        }
    }

    /// Toolchain assumed when the caller does not pick one.
    pub fn default_toolchain(&self) -> &'static str {
        match self {
            Platform::Q35 => "VS2022",
            Platform::Sbsa => "CLANGPDB",
        }
    }

    /// Apply the platform's toolchain substitution rule.
    ///
    /// SBSA firmware cannot be built with the x86 default toolchain, so a
    /// request for it is replaced with the SBSA default instead of rejected.
    /// Any other toolchain name passes through untouched.
    pub fn effective_toolchain(&self, requested: &str) -> String {
        match self {
            Platform::Sbsa if requested == Platform::Q35.default_toolchain() => {
                Platform::Sbsa.default_toolchain().to_string()
            }
            _ => requested.to_string(),
        }
    }

    /// Cargo subcommand (after `-C <repo>`) that builds the firmware module.
    pub fn build_subcommand(&self) -> &'static [&'static str] {
        match self {
            Platform::Q35 => &["make", "build"],
            Platform::Sbsa => &["build_sbsa"],
        }
    }

    /// Emulator system binary name.
    pub fn emulator_binary(&self) -> &'static str {
        match self {
            Platform::Q35 => "qemu-system-x86_64",
            Platform::Sbsa => "qemu-system-aarch64",
        }
    }

    /// `-machine` value.
    pub fn machine_type(&self) -> &'static str {
        match self {
            Platform::Q35 => "q35,smm=on",
            Platform::Sbsa => "sbsa-ref",
        }
    }

    /// `-cpu` value.
    pub fn cpu_spec(&self) -> &'static str {
        match self {
            Platform::Q35 => {
                "qemu64,rdrand=on,umip=on,smep=on,pdpe1gb=on,popcnt=on,\
                 +sse,+sse2,+sse3,+ssse3,+sse4.2,+sse4.1,invtsc"
            }
            Platform::Sbsa => "max,sve=off,sme=off",
        }
    }

    /// The two pflash units, in unit order.
    ///
    /// Q35 maps the code image read-only at unit 0 with a writable variable
    /// store behind it; SBSA needs its writable secure flash at unit 0 and
    /// the code image read-only at unit 1.
    pub fn flash_units(&self) -> [FlashUnit; 2] {
        match self {
            Platform::Q35 => [
                FlashUnit {
                    companion: None,
                    readonly: true,
                },
                FlashUnit {
                    companion: Some("QEMUQ35_VARS.fd"),
                    readonly: false,
                },
            ],
            Platform::Sbsa => [
                FlashUnit {
                    companion: Some("SECURE_FLASH0.fd"),
                    readonly: false,
                },
                FlashUnit {
                    companion: None,
                    readonly: true,
                },
            ],
        }
    }

    /// USB controller and input devices.
    pub fn usb_device_args(&self) -> &'static [&'static str] {
        match self {
            Platform::Q35 => &[
                "-device",
                "qemu-xhci,id=usb",
                "-device",
                "usb-tablet,id=input0,bus=usb.0,port=1",
            ],
            Platform::Sbsa => &[
                "-device",
                "qemu-xhci,id=usb",
                "-device",
                "usb-tablet,id=input0,bus=usb.0,port=1",
                "-device",
                "usb-kbd,id=input1,bus=usb.0,port=2",
            ],
        }
    }

    /// SMBIOS type 1 (system) identification.
    pub fn smbios_system(&self) -> &'static str {
        match self {
            Platform::Q35 => {
                "type=1,manufacturer=Palindrome,product='QEMU Q35',family=QEMU,\
                 version='9.0.0',serial=42-42-42-42,uuid=9de555c0-05d7-4aa1-84ab-bb511e3a8bef"
            }
            Platform::Sbsa => {
                "type=1,manufacturer=Palindrome,product='QEMU SBSA',family=QEMU,\
                 version='9.0.0',serial=42-42-42-42"
            }
        }
    }

    /// SMBIOS type 3 (chassis) identification.
    pub fn smbios_chassis(&self) -> &'static str {
        match self {
            Platform::Q35 => "type=3,manufacturer=Palindrome,serial=40-41-42-43",
            Platform::Sbsa => "type=3,manufacturer=Palindrome,serial=42-42-42-42,asset=SBSA,sku=SBSA",
        }
    }

    /// Storage bus for fixed-disk boot media.
    ///
    /// SBSA uses AHCI: NVMe emulation is broken for Windows guests on
    /// AArch64 hosts.
    pub fn storage_bus(&self) -> StorageBus {
        match self {
            Platform::Q35 => StorageBus::Nvme,
            Platform::Sbsa => StorageBus::Ahci,
        }
    }

    /// Serial console wiring when no port is requested.
    ///
    /// Q35 always listens on a fixed TCP port so a debugger can attach
    /// after the fact; SBSA falls back to the host's stdio.
    pub fn serial_default(&self) -> SerialDefault {
        match self {
            Platform::Q35 => SerialDefault::TcpPort(50001),
            Platform::Sbsa => SerialDefault::Stdio,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SMBIOS type 0 (firmware) identification, stamped with the given release
/// date in MM/DD/YYYY form. Identical on both platforms.
pub fn smbios_firmware(date_mdy: &str) -> String {
    format!(
        "type=0,vendor='Project Mu',version='mu_tiano_platforms-v9.0.0',date={date_mdy},uefi=on"
    )
}
