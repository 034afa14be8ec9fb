//! Pipeline engine for platboot.
//!
//! Resolves a run request into the concrete paths and command lines for one
//! run ([`settings`]), then drives the three stages over external processes
//! ([`pipeline`]): build the firmware module, patch it into the platform's
//! code image, and boot the result under the emulator. The run stage wraps
//! the host console in a restore guard ([`console`]).

pub mod console;
pub mod error;
pub mod pipeline;
pub mod settings;

pub use console::ConsoleModeGuard;
pub use error::{PipelineError, Result, Stage};
pub use pipeline::run_pipeline;
pub use settings::{
    boot_media_args, resolve, today_mdy, CommandSpec, ResolvedSettings, RunRequest,
};
