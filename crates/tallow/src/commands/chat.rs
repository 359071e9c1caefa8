//! Chat command implementation

use crate::cli::ChatArgs;
use std::io;

/// Execute chat command
pub async fn execute(_args: ChatArgs) -> io::Result<()> {
    println!("Chat command not yet implemented");
    todo!("Implement chat session")
}
