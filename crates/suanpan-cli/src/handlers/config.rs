//! Config command handler

use std::io::Write;

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Execute the config command
pub fn execute_config<W: Write>(config: &CliConfig, args: &ConfigArgs, out: &mut W) -> CliResult<()> {
    if args.show || !args.defaults {
        print_current_config(config, out)?;
    }

    if args.defaults {
        print_default_config(out)?;
    }
    Ok(())
}

/// Print the effective configuration
pub fn print_current_config<W: Write>(config: &CliConfig, out: &mut W) -> CliResult<()> {
    writeln!(out, "Current configuration:")?;
    writeln!(out, "  Verbosity: {:?}", config.verbosity)?;
    writeln!(out, "  Color: {:?}", config.color)?;
    writeln!(out, "  Locale: {}", config.locale.tag())?;
    writeln!(out, "  Width: {}", config.width)?;
    writeln!(out, "  Difficulty: {}", config.difficulty)?;
    writeln!(out, "  Hints: {}", if config.hint.enabled { "on" } else { "off" })?;
    writeln!(out, "  Hint model: {}", config.hint.model)?;
    writeln!(out, "  Hint key variable: {}", config.hint.api_key_env)?;
    writeln!(out, "  Hint timeout: {}ms", config.hint.timeout_ms)?;
    Ok(())
}

/// Print the default configuration as YAML, ready to save as a config file
pub fn print_default_config<W: Write>(out: &mut W) -> CliResult<()> {
    let yaml = CliConfig::default().to_yaml()?;
    write!(out, "{yaml}")?;
    Ok(())
}
