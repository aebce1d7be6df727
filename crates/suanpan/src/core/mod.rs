//! Core abacus model
//!
//! Everything in here is pure: no I/O, no shared state. A shell owns the live
//! [`Abacus`] and calls into these functions with it.

pub mod abacus;
pub mod check;
pub mod column;
pub mod narration;
pub mod question;
pub mod steps;

pub use abacus::Abacus;
pub use check::{check_answer, diff_columns, ColumnDiff, Correction, Verdict};
pub use column::{column_value, state_from_value, Bead, Column, ColumnState, LOWER_BEADS};
pub use narration::Locale;
pub use question::{generate_question, Difficulty, Operator, Question, QuestionGenerator};
pub use steps::{generate_steps, Formula, Lesson, Step, StepGenerator, StepKind};

use thiserror::Error;

/// Result type for abacus operations
pub type AbacusResult<T> = Result<T, AbacusError>;

/// Recoverable errors raised at the edges of the core.
///
/// Invariant violations inside the step generator (a column value outside
/// `0..=9`, a broken lower-bead block) are bugs and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacusError {
    /// Subtraction would go below zero
    #[error("Negative result: {n1} - {n2} is below zero")]
    NegativeResult {
        /// Minuend
        n1: u64,
        /// Subtrahend
        n2: u64,
    },

    /// Sum does not fit in a u64
    #[error("Overflow: {n1} + {n2} exceeds the representable range")]
    Overflow {
        /// First operand
        n1: u64,
        /// Second operand
        n2: u64,
    },

    /// A number has more digits than the abacus has columns
    #[error("Operand too wide: {value} does not fit on a {width}-column abacus")]
    OperandTooWide {
        /// Offending value
        value: u64,
        /// Abacus width
        width: usize,
    },

    /// Abacus width outside the supported range
    #[error("Invalid width: {0} (expected 1..={max})", max = Abacus::MAX_WIDTH)]
    InvalidWidth(usize),

    /// Column index past the last column
    #[error("Column out of range: {index} (abacus has {width} columns)")]
    ColumnOutOfRange {
        /// Requested column
        index: usize,
        /// Abacus width
        width: usize,
    },

    /// Lower bead index past the fourth bead
    #[error("Bead out of range: lower bead {0} (expected 0..=3)")]
    BeadOutOfRange(usize),

    /// Digit outside 0..=9
    #[error("Invalid digit: {0} (expected 0..=9)")]
    InvalidDigit(u8),

    /// Lower beads with a gap between an active bead and the bar
    #[error("Non-contiguous beads: lower beads {0:?} leave a gap next to the bar")]
    NonContiguousBeads([bool; 4]),

    /// A lesson with no steps
    #[error("Empty lesson: {0} has no steps")]
    EmptyLesson(String),

    /// Two snapshots with different widths were compared
    #[error("Mismatched width: expected {expected} columns, found {actual}")]
    MismatchedWidth {
        /// Width of the reference snapshot
        expected: usize,
        /// Width of the compared snapshot
        actual: usize,
    },

    /// Operator text was not `+` or `-`
    #[error("Invalid operator: {0:?}")]
    InvalidOperator(String),

    /// Unknown difficulty band
    #[error("Invalid difficulty: {0:?}")]
    InvalidDifficulty(String),

    /// Unknown narration locale
    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),
}
