//! Suanpan CLI library
//!
//! Command-line front end for the `suanpan` abacus tutor: question
//! generation, step-by-step bead narration, answer checking and an
//! interactive practice shell.

#![deny(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod coach;
mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use coach::Coach;
pub use commands::{
    CheckArgs, Cli, ColorArg, Commands, ConfigArgs, OutputFormat, PracticeArgs, QuestionArgs,
    QuestionSpec, StepsArgs,
};
pub use config::{CliConfig, ColorChoice, HintSettings, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, init_logging_with_writer, LogConfig, LogFormat};
pub use output::{render_abacus, render_lesson, serialize};
