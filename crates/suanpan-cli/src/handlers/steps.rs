//! Steps command handler

use std::io::Write;

use suanpan::core::{Question, StepGenerator};

use crate::commands::{OutputFormat, QuestionSpec, StepsArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_header, render_lesson, serialize, LessonRecord};

/// Question from `N1 OP N2` arguments
pub fn build_question(spec: &QuestionSpec) -> CliResult<Question> {
    Ok(Question::new(spec.n1, spec.n2, spec.operator)?)
}

/// Step generator for the configured abacus
#[must_use]
pub fn step_generator(config: &CliConfig) -> StepGenerator {
    StepGenerator::new()
        .with_width(config.width)
        .with_locale(config.locale)
}

/// Execute the steps command
pub fn execute_steps<W: Write>(config: &CliConfig, args: &StepsArgs, out: &mut W) -> CliResult<()> {
    let question = build_question(&args.question)?;
    let lesson = step_generator(config).generate(&question)?;

    match args.format {
        OutputFormat::Text => {
            let use_color = config.use_color();
            if !config.verbosity.is_quiet() {
                writeln!(out, "{}", render_header(&question.to_string(), use_color))?;
            }
            writeln!(
                out,
                "{}",
                render_lesson(&lesson, args.abacus, args.speech, use_color)
            )?;
        }
        format => {
            let text = serialize(&LessonRecord::new(&lesson), format)?;
            writeln!(out, "{}", text.trim_end())?;
        }
    }
    Ok(())
}
