//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the agentlab demos.

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Width of the `=` rules around report sections
pub const RULE_WIDTH: usize = 80;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn from_flag(no_color: bool) -> Self {
        if no_color {
            Self::no_color()
        } else {
            Self::new()
        }
    }

    /// A titled block between two `=` rules
    pub fn section(&self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        if self.colored {
            println!("\n{}", rule.dimmed());
            println!("{}", title.bright_white().bold());
            println!("{}", rule.dimmed());
        } else {
            println!("\n{}\n{}\n{}", rule, title, rule);
        }
    }

    /// Opening banner of a demo run, followed by a blank line
    pub fn banner(&self, title: &str) {
        self.section(title);
        println!();
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{} {}", "ℹ️ ".blue(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("{} {}", "⚠️ ".yellow().bold(), message.yellow());
        } else {
            println!("[WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Progress line for a finished agent
    pub fn agent_completed(&self, name: &str) {
        let line = format!("--- Agent {} has completed their task ---", name);
        if self.colored {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }

    /// Ask for a line of input. `None` when stdin is closed or unreadable.
    pub fn prompt(&self, message: &str) -> Option<String> {
        if self.colored {
            print!("{}", message.bright_white());
        } else {
            print!("{}", message);
        }
        io::stdout().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input),
        }
    }

    /// Print plain text as-is
    pub fn text(&self, text: &str) {
        println!("{}", text);
    }
}
