//! Answer checking and corrective walk-throughs

use serde::{Deserialize, Serialize};

use crate::core::abacus::Abacus;
use crate::core::question::Question;
use crate::core::steps::{Lesson, StepGenerator};
use crate::core::{AbacusError, AbacusResult};

/// Outcome of comparing the abacus against a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Value shown on the abacus
    pub entered: u64,
    /// Expected answer
    pub target: u64,
}

impl Verdict {
    /// True when the beads show the answer
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.entered == self.target
    }
}

/// Compares the live abacus total with the question's answer
#[must_use]
pub fn check_answer(abacus: &Abacus, question: &Question) -> Verdict {
    let verdict = Verdict {
        entered: abacus.total(),
        target: question.target(),
    };
    tracing::debug!(
        question = %question,
        entered = verdict.entered,
        correct = verdict.is_correct(),
        "checked answer"
    );
    verdict
}

/// A rod that shows the wrong digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDiff {
    /// Column index, 0 is leftmost
    pub index: usize,
    /// Power of ten of the column
    pub power: usize,
    /// Digit the learner left on the rod
    pub entered: u8,
    /// Digit the rod should show
    pub expected: u8,
}

/// Rods where `live` differs from `expected`, left to right
pub fn diff_columns(live: &Abacus, expected: &Abacus) -> AbacusResult<Vec<ColumnDiff>> {
    if live.width() != expected.width() {
        return Err(AbacusError::MismatchedWidth {
            expected: expected.width(),
            actual: live.width(),
        });
    }
    Ok(live
        .values()
        .into_iter()
        .zip(expected.values())
        .enumerate()
        .filter(|(_, (entered, wanted))| entered != wanted)
        .map(|(index, (entered, expected_digit))| ColumnDiff {
            index,
            power: live.place_power(index),
            entered,
            expected: expected_digit,
        })
        .collect())
}

/// Everything shown after a wrong answer: the verdict, the rods that are off
/// and the full lesson to compare with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Entered versus expected value
    pub verdict: Verdict,
    /// Rods that differ from the worked answer
    pub wrong_columns: Vec<ColumnDiff>,
    /// The correct bead moves
    pub lesson: Lesson,
}

impl Correction {
    /// Builds the correction for `live`, or `None` when the answer is right.
    ///
    /// `generator` should have the live abacus's width so the rods line up.
    pub fn build(
        live: &Abacus,
        question: &Question,
        generator: &StepGenerator,
    ) -> AbacusResult<Option<Self>> {
        let verdict = check_answer(live, question);
        if verdict.is_correct() {
            return Ok(None);
        }
        let lesson = generator.generate(question)?;
        let wrong_columns = diff_columns(live, lesson.final_snapshot())?;
        Ok(Some(Self {
            verdict,
            wrong_columns,
            lesson,
        }))
    }
}
