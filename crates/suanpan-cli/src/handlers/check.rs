//! Check command handler

use std::io::Write;

use suanpan::core::{check_answer, Abacus, Correction};
use suanpan::hint::HintRequest;

use crate::coach::Coach;
use crate::commands::{CheckArgs, OutputFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::handlers::steps::{build_question, step_generator};
use crate::output::{
    render_header, render_lesson, render_verdict, render_wrong_columns, serialize, CheckRecord,
};

/// Execute the check command.
///
/// A wrong answer prints the correction and then fails with
/// [`CliError::IncorrectAnswer`], so scripts can test the exit status.
pub fn execute_check<W: Write>(config: &CliConfig, args: &CheckArgs, out: &mut W) -> CliResult<()> {
    let question = build_question(&args.question)?;
    let live = Abacus::with_value(config.width, args.answer)?;
    let verdict = check_answer(&live, &question);
    let correction = Correction::build(&live, &question, &step_generator(config))?;

    let tip = match &correction {
        Some(_) if args.hint || config.hint.enabled => {
            let coach = Coach::new(&config.hint, config.locale)?;
            Some(coach.tip(&HintRequest::new(&question, args.answer)))
        }
        _ => None,
    };

    match args.format {
        OutputFormat::Text => {
            write_text(config, &verdict, correction.as_ref(), tip.as_deref(), out)?;
        }
        format => {
            let record = CheckRecord::new(verdict, correction.as_ref(), tip);
            writeln!(out, "{}", serialize(&record, format)?.trim_end())?;
        }
    }

    if verdict.is_correct() {
        Ok(())
    } else {
        Err(CliError::IncorrectAnswer {
            entered: verdict.entered,
            target: verdict.target,
        })
    }
}

fn write_text<W: Write>(
    config: &CliConfig,
    verdict: &suanpan::core::Verdict,
    correction: Option<&Correction>,
    tip: Option<&str>,
    out: &mut W,
) -> CliResult<()> {
    let use_color = config.use_color();
    let locale = config.locale;
    writeln!(out, "{}", render_verdict(verdict, locale, use_color))?;

    let Some(correction) = correction else {
        return Ok(());
    };
    if !correction.wrong_columns.is_empty() {
        writeln!(out, "{}", render_wrong_columns(&correction.wrong_columns, locale))?;
    }
    writeln!(
        out,
        "{}",
        render_header(&locale.correction_intro().display, use_color)
    )?;
    writeln!(
        out,
        "{}",
        render_lesson(&correction.lesson, false, false, use_color)
    )?;
    if let Some(tip) = tip {
        writeln!(out)?;
        writeln!(out, "{tip}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::QuestionSpec;
    use crate::config::ColorChoice;
    use suanpan::core::{Locale, Operator};

    fn args(answer: u64, hint: bool, format: OutputFormat) -> CheckArgs {
        CheckArgs {
            question: QuestionSpec {
                n1: 12,
                operator: Operator::Subtract,
                n2: 7,
            },
            answer,
            hint,
            format,
        }
    }

    fn config() -> CliConfig {
        let mut config = CliConfig::new().with_color(ColorChoice::Never);
        config.hint.api_key_env = "SUANPAN_TEST_UNSET_KEY".to_string();
        config
    }

    fn run(config: &CliConfig, args: &CheckArgs) -> (CliResult<()>, String) {
        let mut out = Vec::new();
        let result = execute_check(config, args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_correct_answer() {
        let (result, text) = run(&config(), &args(5, false, OutputFormat::Text));
        assert!(result.is_ok());
        assert_eq!(text.trim_end(), "PASS 太棒了！撥珠完全正確！");
    }

    #[test]
    fn test_wrong_answer_shows_correction() {
        let (result, text) = run(&config(), &args(15, false, OutputFormat::Text));
        assert!(matches!(
            result,
            Err(CliError::IncorrectAnswer {
                entered: 15,
                target: 5
            })
        ));
        assert!(text.starts_with("FAIL"));
        assert!(text.contains("  十: 1 -> 0"));
        assert!(text.contains("正確撥珠步驟回顧"));
        assert!(text.contains("個位：減 10 加 3"));
        assert!(!text.contains(Locale::ZhTw.fallback_tip()));
    }

    #[test]
    fn test_wrong_answer_with_offline_hint() {
        let (_, text) = run(&config(), &args(15, true, OutputFormat::Text));
        assert!(text.trim_end().ends_with(Locale::ZhTw.fallback_tip()));
    }

    #[test]
    fn test_hint_enabled_in_config() {
        let config = config().with_hints(true).with_locale(Locale::En);
        let (_, text) = run(&config, &args(4, false, OutputFormat::Text));
        assert!(text.contains(Locale::En.fallback_tip()));
    }

    #[test]
    fn test_json_wrong_answer() {
        let (result, text) = run(&config(), &args(15, false, OutputFormat::Json));
        assert!(result.is_err());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["correct"], false);
        assert_eq!(value["wrong_columns"][0]["power"], 1);
        assert_eq!(value["correction"]["steps"][0]["kind"], "intro");
    }

    #[test]
    fn test_answer_too_wide() {
        let config = config().with_width(2);
        let (result, _) = run(&config, &args(150, false, OutputFormat::Text));
        assert!(matches!(result, Err(CliError::Abacus(_))));
    }
}
