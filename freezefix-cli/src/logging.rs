// ============================================================================
// freezefix-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialization for the CLI
//
// The core library logs through the `log` facade; this module installs
// env_logger as the backend with a timestamped, level-colored line format.
//
// USAGE:
// - default: info
// - --verbose: debug (spawned ffmpeg command lines, parse summaries)
// - --quiet: warnings and errors only
// - RUST_LOG overrides all of the above (RUST_LOG=trace shows raw ffmpeg lines)

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;

/// Picks the default log level from the verbosity flags.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Initializes env_logger on stderr.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = level_for(verbose, quiet);
    let env = env_logger::Env::default().default_filter_or(level.to_string());

    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            let level = match record.level() {
                log::Level::Error => "ERROR".bright_red().bold().to_string(),
                log::Level::Warn => "WARN ".yellow().to_string(),
                log::Level::Info => "INFO ".green().to_string(),
                log::Level::Debug => "DEBUG".blue().to_string(),
                log::Level::Trace => "TRACE".magenta().to_string(),
            };
            writeln!(buf, "{} {} {}", timestamp.dimmed(), level, record.args())
        })
        .init();

    log::debug!("Logger initialized with default level: {}", level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Debug);
        assert_eq!(level_for(false, true), LevelFilter::Warn);
    }
}
