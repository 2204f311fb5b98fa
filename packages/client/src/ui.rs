//! UI utilities for the client.

use std::io::Write;

/// Prompt shown before user input
pub const PROMPT: &str = "> ";

/// Print a line received from the server without clobbering the prompt
pub fn print_server_line(line: &str) {
    print!("\r{}\n", line);
    redisplay_prompt();
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
