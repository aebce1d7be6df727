//! Suanpan CLI: abacus tutor in the terminal
//!
//! ## Usage
//!
//! ```bash
//! suanpan question -d tens          # Draw a practice question
//! suanpan steps 12 - 7 --abacus     # Bead moves, step by step
//! suanpan check 8 + 5 --answer 12   # Check an answer, show the fix
//! suanpan practice                  # Interactive practice shell
//! ```

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use suanpan_cli::{
    handlers, init_logging, Cli, CliConfig, CliResult, ColorArg, Commands, LogConfig, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    console::set_colors_enabled(config.use_color());
    init_logging(
        &LogConfig::from_verbosity(config.verbosity, cli.verbose)
            .with_format(cli.log_format)
            .with_ansi(config.use_color()),
    );
    tracing::debug!(?config, "configuration resolved");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Question(args) => handlers::execute_question(&config, &args, &mut out),
        Commands::Steps(args) => handlers::execute_steps(&config, &args, &mut out),
        Commands::Check(args) => handlers::execute_check(&config, &args, &mut out),
        Commands::Practice(args) => {
            drop(out);
            return handlers::execute_practice(&config, &args);
        }
        Commands::Config(args) => handlers::execute_config(&config, &args, &mut out),
    };
    out.flush()?;
    result
}

/// Defaults, then the config file, then flags
fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::new(),
    };

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    if verbosity != Verbosity::Normal {
        config = config.with_verbosity(verbosity);
    }
    if !matches!(cli.color, ColorArg::Auto) {
        config = config.with_color(cli.color.clone().into());
    }
    if let Some(locale) = cli.locale {
        config = config.with_locale(locale);
    }
    if let Some(width) = cli.width {
        config = config.with_width(width);
    }
    config.validate()
}
