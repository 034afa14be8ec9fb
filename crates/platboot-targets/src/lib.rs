//! Emulated platform definitions for the platboot firmware pipeline.
//!
//! Describes the two supported QEMU platforms (Q35 and SBSA) as data:
//! firmware image layout, toolchain defaults, machine and CPU flags, system
//! identification strings, storage-bus choice, and serial console policy.
//! The pipeline crate consumes these tables to derive commands; nothing in
//! here touches the filesystem or spawns processes.

pub mod error;
pub mod media;
pub mod platform;
pub mod profile;

pub use error::{Result, TargetError};
pub use media::MediaFormat;
pub use platform::{FlashUnit, Platform, SerialDefault, StorageBus};
pub use profile::BuildProfile;
