//! Colored console message helpers.

use colored::Colorize;

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
