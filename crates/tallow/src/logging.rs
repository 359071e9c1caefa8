//! Logging initialization

use std::io;

/// Initialize logging based on verbosity level
pub fn init_logging(verbosity: u8) -> io::Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Would use tracing-subscriber crate
    eprintln!("Logging initialized: level={}", level);

    Ok(())
}
