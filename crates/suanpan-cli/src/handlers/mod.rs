//! Command handlers, one module per subcommand
//!
//! Handlers write to any `Write` so tests can capture what a learner would
//! see on the terminal.

pub mod check;
pub mod config;
pub mod practice;
pub mod question;
pub mod steps;

pub use check::execute_check;
pub use config::execute_config;
pub use practice::{execute_practice, run_shell, ShellCommand, ShellOptions};
pub use question::execute_question;
pub use steps::execute_steps;
