//! Output formatting: abacus drawings, step lists and serialized records

use console::style;
use serde::Serialize;

use suanpan::core::{
    Abacus, ColumnDiff, Correction, Difficulty, Lesson, Locale, Question, Step, StepKind, Verdict,
    LOWER_BEADS,
};

use crate::commands::OutputFormat;
use crate::error::CliResult;

const BEAD_ON: &str = "●";
const BEAD_OFF: &str = "○";
const ROD: &str = "│";

/// Renders a value as JSON or YAML
pub fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        OutputFormat::Text => Ok(String::new()),
    }
}

/// Draws the abacus, heaven beads on top.
///
/// A set bead is filled and sits against the beam; `highlight` marks the rod
/// a step acted on.
#[must_use]
pub fn render_abacus(abacus: &Abacus, highlight: Option<usize>, use_color: bool) -> String {
    let width = abacus.width();
    let paint = |index: usize, cell: &str, active: bool| -> String {
        let cell = format!("{cell} ");
        if !use_color {
            return cell;
        }
        let styled = if active {
            style(cell).yellow().bold()
        } else {
            style(cell).dim()
        };
        if highlight == Some(index) {
            styled.reverse().to_string()
        } else {
            styled.to_string()
        }
    };

    let mut lines = Vec::with_capacity(LOWER_BEADS + 5);

    // Heaven: an unset bead rests at the top, a set one drops to the beam
    let mut top = String::from("  ");
    let mut drop = String::from("  ");
    for (index, column) in abacus.columns().iter().enumerate() {
        let upper = column.state().upper;
        top.push_str(&paint(index, if upper { ROD } else { BEAD_OFF }, false));
        drop.push_str(&paint(index, if upper { BEAD_ON } else { ROD }, upper));
    }
    lines.push(top);
    lines.push(drop);
    lines.push(format!("  {}", "══".repeat(width)));

    for bead in 0..LOWER_BEADS {
        let mut row = String::from("  ");
        for (index, column) in abacus.columns().iter().enumerate() {
            let set = column.state().lower[bead];
            row.push_str(&paint(index, if set { BEAD_ON } else { BEAD_OFF }, set));
        }
        lines.push(row);
    }

    let digits: String = abacus
        .values()
        .iter()
        .map(|digit| format!("{digit} "))
        .collect();
    lines.push(format!("  {digits}"));
    lines.push(format!("  = {}", abacus.total()));
    lines.join("\n")
}

/// One numbered step line, plus its spoken form when asked
#[must_use]
pub fn render_step(index: usize, step: &Step, speech: bool, use_color: bool) -> String {
    let number = format!("{:>3}.", index + 1);
    let message = step.message();
    let mut line = if use_color {
        let styled = match step.kind() {
            StepKind::Intro | StepKind::Transition => style(message).bold(),
            StepKind::Carry | StepKind::Borrow => style(message).yellow(),
            StepKind::Apply if step.formula().is_some() => style(message).cyan(),
            StepKind::Enter | StepKind::Apply => style(message),
        };
        format!("{} {styled}", style(number).dim())
    } else {
        format!("{number} {message}")
    };
    if speech {
        line.push_str(&format!("\n     ({})", step.speech()));
    }
    line
}

/// A whole lesson as text
#[must_use]
pub fn render_lesson(lesson: &Lesson, abacus: bool, speech: bool, use_color: bool) -> String {
    let mut out = Vec::with_capacity(lesson.len() * if abacus { 2 } else { 1 });
    for (index, step) in lesson.iter().enumerate() {
        out.push(render_step(index, step, speech, use_color));
        if abacus {
            out.push(render_abacus(
                step.snapshot(),
                step.active_column(),
                use_color,
            ));
        }
    }
    out.join("\n")
}

/// Question line such as `12 - 7 = ?`
#[must_use]
pub fn render_question(question: &Question, use_color: bool) -> String {
    let text = format!("{question} = ?");
    if use_color {
        style(text).bold().to_string()
    } else {
        text
    }
}

/// Verdict line in the given locale
#[must_use]
pub fn render_verdict(verdict: &Verdict, locale: Locale, use_color: bool) -> String {
    if verdict.is_correct() {
        let text = locale.correct().display;
        if use_color {
            format!("{} {text}", style("✓").green().bold())
        } else {
            format!("PASS {text}")
        }
    } else {
        let text = locale.incorrect(verdict.entered, verdict.target).display;
        if use_color {
            format!("{} {text}", style("✗").red().bold())
        } else {
            format!("FAIL {text}")
        }
    }
}

/// Rods that are off, e.g. `tens: 1 -> 0`
#[must_use]
pub fn render_wrong_columns(diffs: &[ColumnDiff], locale: Locale) -> String {
    diffs
        .iter()
        .map(|diff| {
            format!(
                "  {}: {} -> {}",
                locale.place_name(diff.power),
                diff.entered,
                diff.expected
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Section header
#[must_use]
pub fn render_header(title: &str, use_color: bool) -> String {
    if use_color {
        style(title).bold().underlined().to_string()
    } else {
        format!("== {title} ==")
    }
}

/// Serializable view of a generated question
#[derive(Debug, Serialize)]
pub struct QuestionRecord {
    /// Band the question was drawn from
    pub difficulty: Difficulty,
    /// The question with its target
    #[serde(flatten)]
    pub question: Question,
}

/// Serializable view of one step
#[derive(Debug, Serialize)]
pub struct StepRecord<'a> {
    /// Position in the lesson, from 1
    pub index: usize,
    /// Step kind
    pub kind: StepKind,
    /// Display text
    pub message: &'a str,
    /// Spoken text
    pub speech: &'a str,
    /// Formula mnemonic, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<&'a str>,
    /// Rod acted on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_column: Option<usize>,
    /// Digits on the abacus after the step
    pub abacus: String,
    /// Abacus total after the step
    pub total: u64,
}

impl<'a> StepRecord<'a> {
    /// View of `step` at `index`
    #[must_use]
    pub fn new(index: usize, step: &'a Step) -> Self {
        Self {
            index: index + 1,
            kind: step.kind(),
            message: step.message(),
            speech: step.speech(),
            formula: step.formula(),
            active_column: step.active_column(),
            abacus: step.snapshot().to_string(),
            total: step.snapshot().total(),
        }
    }
}

/// Serializable view of a lesson
#[derive(Debug, Serialize)]
pub struct LessonRecord<'a> {
    /// The question
    pub question: &'a Question,
    /// Narration language
    pub locale: Locale,
    /// Every step
    pub steps: Vec<StepRecord<'a>>,
}

impl<'a> LessonRecord<'a> {
    /// View of `lesson`
    #[must_use]
    pub fn new(lesson: &'a Lesson) -> Self {
        Self {
            question: lesson.question(),
            locale: lesson.locale(),
            steps: lesson
                .iter()
                .enumerate()
                .map(|(index, step)| StepRecord::new(index, step))
                .collect(),
        }
    }
}

/// Serializable view of a check
#[derive(Debug, Serialize)]
pub struct CheckRecord<'a> {
    /// Whether the answer was right
    pub correct: bool,
    /// Value checked
    pub entered: u64,
    /// Correct answer
    pub target: u64,
    /// Rods that are off
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wrong_columns: Vec<ColumnDiff>,
    /// Correct moves, when the answer was wrong
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<LessonRecord<'a>>,
    /// AI or canned tip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl<'a> CheckRecord<'a> {
    /// View of a verdict and its optional correction
    #[must_use]
    pub fn new(verdict: Verdict, correction: Option<&'a Correction>, tip: Option<String>) -> Self {
        Self {
            correct: verdict.is_correct(),
            entered: verdict.entered,
            target: verdict.target,
            wrong_columns: correction
                .map(|c| c.wrong_columns.clone())
                .unwrap_or_default(),
            correction: correction.map(|c| LessonRecord::new(&c.lesson)),
            tip,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use suanpan::core::StepGenerator;

    fn lesson(question: Question) -> Lesson {
        StepGenerator::new()
            .with_width(3)
            .with_locale(Locale::En)
            .generate(&question)
            .unwrap()
    }

    mod abacus_tests {
        use super::*;

        #[test]
        fn test_render_plain() {
            let abacus = Abacus::with_value(3, 507).unwrap();
            let text = render_abacus(&abacus, None, false);
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 9);
            assert_eq!(lines[0], "  │ ○ │ ");
            assert_eq!(lines[1], "  ● │ ● ");
            assert_eq!(lines[3], "  ○ ○ ● ");
            assert_eq!(lines[7], "  5 0 7 ");
            assert_eq!(lines[8], "  = 507");
        }

        #[test]
        fn test_render_zero() {
            let text = render_abacus(&Abacus::new(2), Some(1), false);
            assert!(text.ends_with("  0 0 \n  = 0"));
            assert!(!text.contains(BEAD_ON));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn test_render_step_plain() {
            let lesson = lesson(Question::add(8, 5).unwrap());
            let line = render_step(3, lesson.get(3).unwrap(), false, false);
            assert_eq!(line, "  4. Ones: subtract 5, add 10");
        }

        #[test]
        fn test_render_step_with_speech() {
            let lesson = lesson(Question::add(3, 4).unwrap());
            let line = render_step(1, lesson.get(1).unwrap(), true, false);
            assert!(line.starts_with("  2. Ones: enter 3"));
            assert!(line.ends_with("(ones column, enter 3)"));
        }

        #[test]
        fn test_render_lesson_with_abacus() {
            let lesson = lesson(Question::add(3, 4).unwrap());
            let text = render_lesson(&lesson, true, false, false);
            assert!(text.contains("  = 7"));
            assert_eq!(text.matches("  = ").count(), lesson.len());
        }
    }

    mod verdict_tests {
        use super::*;

        #[test]
        fn test_render_verdict() {
            let right = Verdict {
                entered: 5,
                target: 5,
            };
            assert!(render_verdict(&right, Locale::ZhTw, false).starts_with("PASS 太棒了"));
            let wrong = Verdict {
                entered: 15,
                target: 5,
            };
            let text = render_verdict(&wrong, Locale::En, false);
            assert!(text.starts_with("FAIL"));
            assert!(text.contains("15"));
        }

        #[test]
        fn test_render_wrong_columns() {
            let diffs = [ColumnDiff {
                index: 7,
                power: 1,
                entered: 1,
                expected: 0,
            }];
            assert_eq!(render_wrong_columns(&diffs, Locale::En), "  tens: 1 -> 0");
            assert_eq!(render_wrong_columns(&diffs, Locale::ZhTw), "  十: 1 -> 0");
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn test_question_record_json() {
            let record = QuestionRecord {
                difficulty: Difficulty::Tens,
                question: Question::subtract(45, 12).unwrap(),
            };
            let json = serialize(&record, OutputFormat::Json).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["difficulty"], "tens");
            assert_eq!(value["operator"], "-");
            assert_eq!(value["target"], 33);
        }

        #[test]
        fn test_lesson_record() {
            let lesson = lesson(Question::subtract(12, 7).unwrap());
            let record = LessonRecord::new(&lesson);
            assert_eq!(record.steps.len(), lesson.len());
            let apply = &record.steps[4];
            assert_eq!(apply.formula, Some("subtract 10, add 3"));
            assert_eq!(apply.abacus, "015");
            let yaml = serialize(&record, OutputFormat::Yaml).unwrap();
            assert!(yaml.contains("kind: borrow"));
        }

        #[test]
        fn test_check_record_correct_omits_correction() {
            let verdict = Verdict {
                entered: 7,
                target: 7,
            };
            let json = serialize(&CheckRecord::new(verdict, None, None), OutputFormat::Json).unwrap();
            assert!(json.contains("\"correct\": true"));
            assert!(!json.contains("correction"));
            assert!(!json.contains("wrong_columns"));
        }

        #[test]
        fn test_text_format_serializes_nothing() {
            assert!(serialize(&1u8, OutputFormat::Text).unwrap().is_empty());
        }
    }
}
