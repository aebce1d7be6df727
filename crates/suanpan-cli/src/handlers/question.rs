//! Question command handler

use std::io::Write;

use suanpan::core::{Difficulty, Question, QuestionGenerator};

use crate::commands::{OutputFormat, QuestionArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_question, serialize, QuestionRecord};

/// Execute the question command
pub fn execute_question<W: Write>(
    config: &CliConfig,
    args: &QuestionArgs,
    out: &mut W,
) -> CliResult<()> {
    if args.count == 0 {
        return Err(CliError::invalid_argument("--count must be at least 1"));
    }
    let difficulty = args.difficulty.unwrap_or(config.difficulty);
    let questions = draw_questions(difficulty, args.seed, args.count);

    match args.format {
        OutputFormat::Text => {
            for question in &questions {
                writeln!(out, "{}", render_question(question, config.use_color()))?;
            }
        }
        format => {
            let records: Vec<QuestionRecord> = questions
                .into_iter()
                .map(|question| QuestionRecord {
                    difficulty,
                    question,
                })
                .collect();
            let text = if records.len() == 1 {
                serialize(&records[0], format)?
            } else {
                serialize(&records, format)?
            };
            writeln!(out, "{}", text.trim_end())?;
        }
    }
    Ok(())
}

/// Draws `count` questions, reproducibly when a seed is given
#[must_use]
pub fn draw_questions(difficulty: Difficulty, seed: Option<u64>, count: usize) -> Vec<Question> {
    let mut generator = seed.map_or_else(QuestionGenerator::from_entropy, QuestionGenerator::seeded);
    (0..count).map(|_| generator.generate(difficulty)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(format: OutputFormat, count: usize) -> QuestionArgs {
        QuestionArgs {
            difficulty: Some(Difficulty::Tens),
            seed: Some(99),
            count,
            format,
        }
    }

    fn config() -> CliConfig {
        CliConfig::new().with_color(crate::config::ColorChoice::Never)
    }

    #[test]
    fn test_draw_is_reproducible() {
        assert_eq!(
            draw_questions(Difficulty::Mixed, Some(5), 10),
            draw_questions(Difficulty::Mixed, Some(5), 10)
        );
    }

    #[test]
    fn test_text_output() {
        let mut out = Vec::new();
        execute_question(&config(), &args(OutputFormat::Text, 3), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|line| line.ends_with(" = ?")));
    }

    #[test]
    fn test_json_single_object() {
        let mut out = Vec::new();
        execute_question(&config(), &args(OutputFormat::Json, 1), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["difficulty"], "tens");
        let n1 = value["n1"].as_u64().unwrap();
        assert!((10..=98).contains(&n1));
    }

    #[test]
    fn test_json_many_is_array() {
        let mut out = Vec::new();
        execute_question(&config(), &args(OutputFormat::Json, 4), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut out = Vec::new();
        let err = execute_question(&config(), &args(OutputFormat::Text, 0), &mut out).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_difficulty_used_by_default() {
        let mut out = Vec::new();
        let args = QuestionArgs {
            difficulty: None,
            seed: Some(1),
            count: 20,
            format: OutputFormat::Json,
        };
        let config = config().with_difficulty(Difficulty::Thousands);
        execute_question(&config, &args, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        for record in value.as_array().unwrap() {
            assert_eq!(record["difficulty"], "thousands");
            assert!(record["n1"].as_u64().unwrap() >= 1000);
        }
    }
}
