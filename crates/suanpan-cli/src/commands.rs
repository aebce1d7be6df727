//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use suanpan::core::{Difficulty, Locale, Operator};

use crate::logging::LogFormat;

/// Suanpan: abacus tutor with step-by-step bead narration
#[derive(Parser, Debug)]
#[command(name = "suanpan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Narration language (zh-tw, en)
    #[arg(long, global = true, env = "SUANPAN_LOCALE")]
    pub locale: Option<Locale>,

    /// Number of rods on the abacus
    #[arg(long, global = true)]
    pub width: Option<usize>,

    /// YAML configuration file
    #[arg(long, global = true, env = "SUANPAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Diagnostic log format on stderr
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a practice question
    Question(QuestionArgs),

    /// Show the bead moves for a question, step by step
    Steps(StepsArgs),

    /// Check an answer and show the correct moves when it is wrong
    Check(CheckArgs),

    /// Interactive practice on a live abacus
    Practice(PracticeArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// A question given on the command line as `N1 OP N2`
#[derive(Parser, Debug, Clone)]
pub struct QuestionSpec {
    /// First operand
    pub n1: u64,

    /// Operator: + or -
    #[arg(allow_hyphen_values = true)]
    pub operator: Operator,

    /// Second operand
    pub n2: u64,
}

/// Arguments for the question command
#[derive(Parser, Debug)]
pub struct QuestionArgs {
    /// Difficulty band (units, tens, hundreds, thousands, mixed)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for a reproducible question
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of questions
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the steps command
#[derive(Parser, Debug)]
pub struct StepsArgs {
    /// The question
    #[command(flatten)]
    pub question: QuestionSpec,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Draw the abacus after every step
    #[arg(short, long)]
    pub abacus: bool,

    /// Include the spoken form of each step
    #[arg(long)]
    pub speech: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The question
    #[command(flatten)]
    pub question: QuestionSpec,

    /// Value shown on the abacus
    #[arg(short, long)]
    pub answer: u64,

    /// Ask for an AI tip when the answer is wrong
    #[arg(long)]
    pub hint: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the practice command
#[derive(Parser, Debug)]
pub struct PracticeArgs {
    /// Difficulty band for new questions
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for a reproducible question sequence
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Ask for an AI tip after a wrong answer
    #[arg(long)]
    pub hint: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show effective configuration
    #[arg(long)]
    pub show: bool,

    /// Print the default configuration as YAML
    #[arg(long)]
    pub defaults: bool,
}

/// Output format for command results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_steps_subtraction() {
            let cli = Cli::try_parse_from(["suanpan", "steps", "12", "-", "7"]).unwrap();
            match cli.command {
                Commands::Steps(args) => {
                    assert_eq!(args.question.n1, 12);
                    assert_eq!(args.question.operator, Operator::Subtract);
                    assert_eq!(args.question.n2, 7);
                    assert_eq!(args.format, OutputFormat::Text);
                    assert!(!args.abacus);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        #[test]
        fn test_parse_steps_addition_words() {
            let cli =
                Cli::try_parse_from(["suanpan", "steps", "8", "plus", "5", "--abacus"]).unwrap();
            match cli.command {
                Commands::Steps(args) => {
                    assert_eq!(args.question.operator, Operator::Add);
                    assert!(args.abacus);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        #[test]
        fn test_parse_bad_operator() {
            assert!(Cli::try_parse_from(["suanpan", "steps", "8", "*", "5"]).is_err());
        }

        #[test]
        fn test_parse_check() {
            let cli = Cli::try_parse_from([
                "suanpan", "check", "12", "-", "7", "--answer", "5", "--hint",
            ])
            .unwrap();
            match cli.command {
                Commands::Check(args) => {
                    assert_eq!(args.answer, 5);
                    assert!(args.hint);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        #[test]
        fn test_parse_question() {
            let cli = Cli::try_parse_from([
                "suanpan", "question", "-d", "tens", "--seed", "7", "-f", "json",
            ])
            .unwrap();
            match cli.command {
                Commands::Question(args) => {
                    assert_eq!(args.difficulty, Some(Difficulty::Tens));
                    assert_eq!(args.seed, Some(7));
                    assert_eq!(args.count, 1);
                    assert_eq!(args.format, OutputFormat::Json);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        #[test]
        fn test_parse_bad_difficulty() {
            assert!(Cli::try_parse_from(["suanpan", "question", "-d", "huge"]).is_err());
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::try_parse_from([
                "suanpan", "-vv", "--color", "never", "--locale", "en", "--width", "12",
                "config", "--show",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
            assert_eq!(cli.locale, Some(Locale::En));
            assert_eq!(cli.width, Some(12));
            assert!(matches!(cli.command, Commands::Config(ConfigArgs { show: true, .. })));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from(["suanpan", "practice", "--quiet", "--locale", "zh-TW"])
                .unwrap();
            assert!(cli.quiet);
            assert_eq!(cli.locale, Some(Locale::ZhTw));
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_output_format_default() {
            assert_eq!(OutputFormat::default(), OutputFormat::Text);
        }

        #[test]
        fn test_color_arg_conversion() {
            use crate::config::ColorChoice;

            let auto: ColorChoice = ColorArg::Auto.into();
            assert!(matches!(auto, ColorChoice::Auto));

            let always: ColorChoice = ColorArg::Always.into();
            assert!(matches!(always, ColorChoice::Always));

            let never: ColorChoice = ColorArg::Never.into();
            assert!(matches!(never, ColorChoice::Never));
        }
    }
}
