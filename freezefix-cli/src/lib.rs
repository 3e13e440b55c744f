// freezefix-cli/src/lib.rs
//
// Library portion of the Freezefix CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{CheckArgs, Cli, Commands, DetectArgs, ModeArg};
pub use commands::check::run_check;
pub use commands::detect::run_detect;
pub use error::{CliErrorContext, CliResult};
