//! Practice session state
//!
//! Holds what a front end needs between learner actions: the live abacus,
//! the current question, an optional teaching walk-through and the lines
//! waiting to be shown or spoken. The state machine keeps manual bead moves
//! out of a running demonstration.

use rand::rngs::StdRng;
use rand::Rng;

use crate::core::abacus::Abacus;
use crate::core::check::{check_answer, Correction, Verdict};
use crate::core::column::Bead;
use crate::core::narration::{Locale, Utterance};
use crate::core::question::{Difficulty, Question, QuestionGenerator};
use crate::core::steps::{Lesson, Step, StepGenerator};
use crate::core::AbacusResult;

/// Cursor over a lesson, clamped to its ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walkthrough {
    lesson: Lesson,
    index: usize,
}

impl Walkthrough {
    /// Starts at the intro step
    #[must_use]
    pub fn new(lesson: Lesson) -> Self {
        Self { lesson, index: 0 }
    }

    /// The lesson being walked
    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    /// Position of the current step
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current step
    #[must_use]
    pub fn current(&self) -> &Step {
        &self.lesson.steps()[self.index]
    }

    /// Moves forward one step; false when already on the last one
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Moves back one step; false when already on the first one
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// On the intro step
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// On the final step
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.lesson.len()
    }
}

/// One learner's practice state
#[derive(Debug)]
pub struct PracticeSession<R = StdRng> {
    abacus: Abacus,
    question: Option<Question>,
    teaching: Option<Walkthrough>,
    verdict: Option<Verdict>,
    announcements: Vec<Utterance>,
    questions: QuestionGenerator<R>,
    steps: StepGenerator,
}

impl PracticeSession<StdRng> {
    /// Session with a deterministic question sequence
    pub fn seeded(width: usize, locale: Locale, seed: u64) -> AbacusResult<Self> {
        Self::new(width, locale, QuestionGenerator::seeded(seed))
    }

    /// Session seeded from the operating system
    pub fn from_entropy(width: usize, locale: Locale) -> AbacusResult<Self> {
        Self::new(width, locale, QuestionGenerator::from_entropy())
    }
}

impl<R: Rng> PracticeSession<R> {
    /// Empty session on a `width`-rod abacus
    pub fn new(width: usize, locale: Locale, questions: QuestionGenerator<R>) -> AbacusResult<Self> {
        Ok(Self {
            abacus: Abacus::try_new(width)?,
            question: None,
            teaching: None,
            verdict: None,
            announcements: Vec::new(),
            questions,
            steps: StepGenerator::new().with_width(width).with_locale(locale),
        })
    }

    /// Live abacus
    #[must_use]
    pub fn abacus(&self) -> &Abacus {
        &self.abacus
    }

    /// Current question
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Running walk-through, if teaching
    #[must_use]
    pub fn teaching(&self) -> Option<&Walkthrough> {
        self.teaching.as_ref()
    }

    /// True while a walk-through drives the abacus
    #[must_use]
    pub fn is_teaching(&self) -> bool {
        self.teaching.is_some()
    }

    /// Result of the last check since the question was posed
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Narration locale
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.steps.locale()
    }

    /// Draws a fresh question and clears the board
    pub fn new_question(&mut self, difficulty: Difficulty) -> AbacusResult<&Question> {
        let question = self.questions.generate(difficulty);
        self.set_question(question)
    }

    /// Poses `question` and clears the board.
    ///
    /// Fails without touching the session when the question does not fit
    /// the abacus.
    pub fn set_question(&mut self, question: Question) -> AbacusResult<&Question> {
        self.abacus.digits_of(question.largest_value())?;
        self.abacus.clear();
        self.teaching = None;
        self.verdict = None;
        self.announce(self.locale().question_posed(&question));
        tracing::info!(question = %question, "question posed");
        Ok(&*self.question.insert(question))
    }

    /// Moves a bead on the live abacus.
    ///
    /// Returns `Ok(false)` without moving anything while teaching.
    pub fn toggle(&mut self, column: usize, bead: Bead) -> AbacusResult<bool> {
        if self.is_teaching() {
            tracing::debug!(column, "bead move ignored while teaching");
            return Ok(false);
        }
        self.abacus.toggle(column, bead)?;
        Ok(true)
    }

    /// Sets the live abacus to `value`, as a learner typing the answer would
    pub fn enter_value(&mut self, value: u64) -> AbacusResult<bool> {
        if self.is_teaching() {
            return Ok(false);
        }
        self.abacus = Abacus::with_value(self.abacus.width(), value)?;
        Ok(true)
    }

    /// Checks the live abacus against the question.
    ///
    /// Returns `None` when there is no question or the answer is right,
    /// otherwise the correction to show.
    pub fn check(&mut self) -> AbacusResult<Option<Correction>> {
        let Some(question) = self.question else {
            return Ok(None);
        };
        let verdict = check_answer(&self.abacus, &question);
        self.verdict = Some(verdict);
        let locale = self.locale();
        if verdict.is_correct() {
            self.announce(locale.correct());
            return Ok(None);
        }
        self.announce(locale.incorrect(verdict.entered, verdict.target));
        let correction = Correction::build(&self.abacus, &question, &self.steps)?;
        if correction.is_some() {
            self.announce(locale.correction_intro());
        }
        Ok(correction)
    }

    /// Starts a walk-through of the current question.
    ///
    /// The live abacus follows the walk-through from the intro step.
    /// Returns `None` when there is no question.
    pub fn start_teaching(&mut self) -> AbacusResult<Option<&Step>> {
        let Some(question) = self.question else {
            return Ok(None);
        };
        let lesson = self.steps.generate(&question)?;
        self.verdict = None;
        self.teaching = Some(Walkthrough::new(lesson));
        tracing::info!(question = %question, "teaching started");
        Ok(self.show_current())
    }

    /// Next step, clamped at the last one
    pub fn next_step(&mut self) -> Option<&Step> {
        self.teaching.as_mut()?.advance();
        self.show_current()
    }

    /// Previous step, clamped at the intro
    pub fn prev_step(&mut self) -> Option<&Step> {
        self.teaching.as_mut()?.retreat();
        self.show_current()
    }

    /// Leaves teaching mode; the beads stay where the walk-through left them
    pub fn exit_teaching(&mut self) -> bool {
        if self.teaching.take().is_none() {
            return false;
        }
        self.announce(self.locale().teaching_exited());
        true
    }

    /// Clears the board, keeping the question
    pub fn reset(&mut self) {
        self.abacus.clear();
        self.teaching = None;
        self.verdict = None;
        self.announce(self.locale().reset());
    }

    /// Drains the lines waiting to be shown or spoken
    pub fn take_announcements(&mut self) -> Vec<Utterance> {
        std::mem::take(&mut self.announcements)
    }

    fn show_current(&mut self) -> Option<&Step> {
        let step = self.teaching.as_ref()?.current();
        self.abacus = step.snapshot().clone();
        self.announcements.push(Utterance {
            display: step.message().to_string(),
            speech: step.speech().to_string(),
        });
        self.teaching.as_ref().map(Walkthrough::current)
    }

    fn announce(&mut self, line: Utterance) {
        tracing::debug!(message = %line.display, "announce");
        self.announcements.push(line);
    }
}
