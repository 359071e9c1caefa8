//! Config command implementation

use crate::cli::ConfigArgs;
use std::io;

/// Execute config command
pub async fn execute(_args: ConfigArgs) -> io::Result<()> {
    println!("Config command not yet implemented");
    todo!("Implement configuration management")
}
