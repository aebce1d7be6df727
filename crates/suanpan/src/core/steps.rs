//! Step generator: the bead moves a trained hand makes for one question
//!
//! The first operand is set digit by digit, then the second operand is
//! applied rod by rod from the most significant column down. Each rod uses
//! either a direct move or one of the traditional complement formulas:
//!
//! | Case                                  | Formula                  |
//! |---------------------------------------|--------------------------|
//! | add, `old < 5`, `5 <= old + d < 10`   | add 5, subtract `5 - d`  |
//! | add, `old + d >= 10`                  | subtract `10 - d`, add 10 (carry) |
//! | subtract, `old >= 5`, `0 <= old - d < 5` | subtract 5, add `5 - d` |
//! | subtract, `old < d`                   | subtract 10, add `10 - d` (borrow) |
//!
//! Carries and borrows ripple leftwards one rod at a time and every rod they
//! touch gets its own step. The thresholds above are the pedagogical
//! convention and are kept as they are even where plain arithmetic would
//! reach the same digits another way.

use serde::{Deserialize, Serialize};

use crate::core::abacus::Abacus;
use crate::core::narration::{Locale, Utterance};
use crate::core::question::{Operator, Question};
use crate::core::{AbacusError, AbacusResult};

/// What a step does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Announces the first operand, abacus still clear
    Intro,
    /// Sets one digit of the first operand
    Enter,
    /// Announces the operation and second operand
    Transition,
    /// Applies one digit of the second operand
    Apply,
    /// Carries one into a rod to the left
    Carry,
    /// Borrows one from a rod to the left
    Borrow,
}

/// A traditional complement formula, keyed by the digit being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Formula {
    /// Raise the five bead, drop `5 - d` unit beads
    AddFive {
        /// Digit being added
        digit: u8,
    },
    /// Drop `10 - d` here, carry ten to the left
    AddTen {
        /// Digit being added
        digit: u8,
    },
    /// Lower the five bead, raise `5 - d` unit beads
    SubtractFive {
        /// Digit being subtracted
        digit: u8,
    },
    /// Borrow ten from the left, raise `10 - d` here
    SubtractTen {
        /// Digit being subtracted
        digit: u8,
    },
}

impl Formula {
    /// Digit of the second operand this formula applies
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::AddFive { digit }
            | Self::AddTen { digit }
            | Self::SubtractFive { digit }
            | Self::SubtractTen { digit } => digit,
        }
    }

    /// Formula for adding `digit` to a rod holding `old`, `None` for a direct add
    #[must_use]
    pub fn for_addition(old: i32, digit: u8) -> Option<Self> {
        let sum = old + i32::from(digit);
        if old < 5 && (5..10).contains(&sum) {
            Some(Self::AddFive { digit })
        } else if sum >= 10 {
            Some(Self::AddTen { digit })
        } else {
            None
        }
    }

    /// Formula for subtracting `digit` from a rod holding `old`, `None` for a direct subtract
    #[must_use]
    pub fn for_subtraction(old: i32, digit: u8) -> Option<Self> {
        let difference = old - i32::from(digit);
        if old >= 5 && (0..5).contains(&difference) {
            Some(Self::SubtractFive { digit })
        } else if difference < 0 {
            Some(Self::SubtractTen { digit })
        } else {
            None
        }
    }

    /// Mnemonic in the given locale
    #[must_use]
    pub fn label(self, locale: Locale) -> String {
        locale.formula_label(self)
    }
}

/// One recorded moment of a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    kind: StepKind,
    message: String,
    speech: String,
    snapshot: Abacus,
    active_column: Option<usize>,
    formula: Option<String>,
    complement: Option<Formula>,
}

impl Step {
    /// What this step does
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Text for the screen
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text for a speech engine
    #[must_use]
    pub fn speech(&self) -> &str {
        &self.speech
    }

    /// The abacus right after this step
    #[must_use]
    pub fn snapshot(&self) -> &Abacus {
        &self.snapshot
    }

    /// Rod acted on, if any
    #[must_use]
    pub fn active_column(&self) -> Option<usize> {
        self.active_column
    }

    /// Formula mnemonic, if a complement formula was used
    #[must_use]
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    /// The complement formula used, if any
    #[must_use]
    pub fn complement(&self) -> Option<Formula> {
        self.complement
    }
}

/// The full step sequence for one question.
///
/// Never empty: it always opens with the intro step. Deserializing a lesson
/// without steps fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LessonFields")]
pub struct Lesson {
    question: Question,
    locale: Locale,
    steps: Vec<Step>,
}

impl Lesson {
    /// Question this lesson works
    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Locale of the messages
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// All steps in order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for the usual collection API
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Iterator over the steps
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// The intro step
    #[must_use]
    pub fn first(&self) -> &Step {
        &self.steps[0]
    }

    /// The last step
    #[must_use]
    pub fn last(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    /// The abacus once the question is worked; its total is the target
    #[must_use]
    pub fn final_snapshot(&self) -> &Abacus {
        self.last().snapshot()
    }

    /// The abacus after the first operand is set, before the operation
    #[must_use]
    pub fn entry_snapshot(&self) -> &Abacus {
        self.steps
            .iter()
            .take_while(|step| step.kind != StepKind::Transition)
            .last()
            .map_or_else(|| self.first().snapshot(), Step::snapshot)
    }

    /// Consumes the lesson, keeping the steps
    #[must_use]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a Lesson {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[derive(Deserialize)]
struct LessonFields {
    question: Question,
    locale: Locale,
    steps: Vec<Step>,
}

impl TryFrom<LessonFields> for Lesson {
    type Error = AbacusError;

    fn try_from(fields: LessonFields) -> Result<Self, Self::Error> {
        if fields.steps.is_empty() {
            return Err(AbacusError::EmptyLesson(fields.question.to_string()));
        }
        Ok(Self {
            question: fields.question,
            locale: fields.locale,
            steps: fields.steps,
        })
    }
}

/// Builds lessons for questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepGenerator {
    width: usize,
    locale: Locale,
}

impl Default for StepGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGenerator {
    /// Generator for the reference nine-rod abacus
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: Abacus::DEFAULT_WIDTH,
            locale: Locale::default(),
        }
    }

    /// Generator just wide enough for `question`, never narrower than the default
    #[must_use]
    pub fn fitting(question: &Question) -> Self {
        let digits = question.largest_value().checked_ilog10().map_or(1, |log| log as usize + 1);
        Self::new().with_width(digits.max(Abacus::DEFAULT_WIDTH))
    }

    /// Sets the abacus width
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the message locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Abacus width
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Message locale
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Works `question` on a fresh abacus.
    ///
    /// Fails when the width is invalid or an operand or the answer does not
    /// fit, since a carry past the leftmost rod has nowhere to go.
    pub fn generate(&self, question: &Question) -> AbacusResult<Lesson> {
        let abacus = Abacus::try_new(self.width)?;
        let first = abacus.digits_of(question.n1())?;
        let second = abacus.digits_of(question.n2())?;
        abacus.digits_of(question.target())?;

        let mut recorder = Recorder::new(self.locale, abacus);
        let locale = self.locale;

        recorder.record(StepKind::Intro, locale.intro(question.n1()), None, None);
        for (index, &digit) in first.iter().enumerate() {
            if digit == 0 {
                continue;
            }
            recorder.set(index, i32::from(digit));
            let line = locale.enter(recorder.power(index), digit);
            recorder.record(StepKind::Enter, line, Some(index), None);
        }

        recorder.record(
            StepKind::Transition,
            locale.transition(question.operator(), question.n2()),
            None,
            None,
        );

        let mut running: Vec<i32> = recorder
            .abacus
            .values()
            .into_iter()
            .map(i32::from)
            .collect();

        for (index, &digit) in second.iter().enumerate() {
            if digit == 0 {
                continue;
            }
            match question.operator() {
                Operator::Add => recorder.add_digit(&mut running, index, digit),
                Operator::Subtract => recorder.subtract_digit(&mut running, index, digit),
            }
        }

        let lesson = Lesson {
            question: *question,
            locale,
            steps: recorder.steps,
        };
        debug_assert_eq!(lesson.final_snapshot().total(), question.target());
        tracing::debug!(
            question = %question,
            steps = lesson.len(),
            width = self.width,
            "generated lesson"
        );
        Ok(lesson)
    }
}

/// Works `question` on the reference abacus with the default locale.
///
/// The abacus is widened past nine rods only when the question needs it.
///
/// # Panics
///
/// Never for a valid [`Question`]: the fitted width always holds it.
#[must_use]
pub fn generate_steps(question: &Question) -> Vec<Step> {
    StepGenerator::fitting(question)
        .generate(question)
        .map(Lesson::into_steps)
        .unwrap_or_else(|err| panic!("fitted abacus rejected {question}: {err}"))
}

/// Live working abacus plus the steps captured so far
struct Recorder {
    locale: Locale,
    abacus: Abacus,
    steps: Vec<Step>,
}

impl Recorder {
    fn new(locale: Locale, abacus: Abacus) -> Self {
        Self {
            locale,
            abacus,
            steps: Vec::new(),
        }
    }

    fn power(&self, index: usize) -> usize {
        self.abacus.place_power(index)
    }

    fn set(&mut self, index: usize, value: i32) {
        assert!(
            (0..=9).contains(&value),
            "column {index} normalized to {value}, outside 0..=9"
        );
        self.abacus.column_mut(index).set_value(value as u8);
    }

    fn record(
        &mut self,
        kind: StepKind,
        line: Utterance,
        active_column: Option<usize>,
        complement: Option<Formula>,
    ) {
        tracing::trace!(?kind, message = %line.display, "step");
        self.steps.push(Step {
            kind,
            message: line.display,
            speech: line.speech,
            snapshot: self.abacus.clone(),
            active_column,
            formula: complement.map(|formula| formula.label(self.locale)),
            complement,
        });
    }

    fn add_digit(&mut self, running: &mut [i32], index: usize, digit: u8) {
        let formula = Formula::for_addition(running[index], digit);
        running[index] += i32::from(digit);
        self.set(index, running[index] % 10);
        let line = self
            .locale
            .apply(self.power(index), Operator::Add, digit, formula);
        self.record(StepKind::Apply, line, Some(index), formula);

        if running[index] < 10 {
            return;
        }
        running[index] -= 10;
        let mut column = index;
        while column > 0 {
            column -= 1;
            running[column] += 1;
            self.set(column, running[column] % 10);
            let line = self.locale.carry(self.power(column));
            self.record(StepKind::Carry, line, Some(column), None);
            if running[column] < 10 {
                break;
            }
            running[column] -= 10;
        }
    }

    fn subtract_digit(&mut self, running: &mut [i32], index: usize, digit: u8) {
        let formula = Formula::for_subtraction(running[index], digit);
        running[index] -= i32::from(digit);
        let line = self
            .locale
            .apply(self.power(index), Operator::Subtract, digit, formula);

        if running[index] >= 0 {
            self.set(index, running[index]);
            self.record(StepKind::Apply, line, Some(index), formula);
            return;
        }

        running[index] += 10;
        self.set(index, running[index]);
        self.record(StepKind::Apply, line, Some(index), formula);

        let mut column = index;
        while column > 0 {
            column -= 1;
            running[column] -= 1;
            self.set(column, (running[column] + 10) % 10);
            let line = self.locale.borrow(self.power(column));
            self.record(StepKind::Borrow, line, Some(column), None);
            if running[column] >= 0 {
                break;
            }
            running[column] += 10;
        }
    }
}
