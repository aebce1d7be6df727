//! Suanpan - abacus tutor core
//!
//! Models a 1/4 abacus (one heaven bead, four earth beads per rod), poses
//! addition and subtraction questions and narrates the bead moves a trained
//! hand would make, step by step, using the five and ten complement formulas.
//!
//! # Modules
//!
//! - [`core`]: bead model, questions, step generation, answer checking
//! - [`session`]: practice state a front end drives between learner actions
//! - `hint`: AI coaching tips with a canned fallback (feature `hints`)
//!
//! # Example
//!
//! ```rust
//! use suanpan::prelude::*;
//!
//! let question = Question::subtract(12, 7).unwrap();
//! let lesson = StepGenerator::new()
//!     .with_locale(Locale::En)
//!     .generate(&question)
//!     .unwrap();
//!
//! // Borrowing from the tens rod: "subtract 10, add 3"
//! let apply = lesson.iter().find(|s| s.kind() == StepKind::Apply).unwrap();
//! assert_eq!(apply.formula(), Some("subtract 10, add 3"));
//! assert_eq!(lesson.final_snapshot().total(), 5);
//! ```

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod session;

#[cfg(feature = "hints")]
pub mod hint;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::narration::Utterance;
    pub use crate::core::{
        check_answer, diff_columns, generate_question, generate_steps, Abacus, AbacusError,
        AbacusResult, Bead, Column, ColumnDiff, ColumnState, Correction, Difficulty, Formula,
        Lesson, Locale, Operator, Question, QuestionGenerator, Step, StepGenerator, StepKind,
        Verdict,
    };
    pub use crate::session::{PracticeSession, Walkthrough};

    #[cfg(feature = "hints")]
    pub use crate::hint::{
        HintConfig, HintError, HintProvider, HintRequest, HintService, StaticHints,
    };

    #[cfg(feature = "gemini")]
    pub use crate::hint::GeminiClient;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let question = Question::add(3, 4).unwrap();
        let steps = generate_steps(&question);
        assert_eq!(steps.last().unwrap().snapshot().total(), 7);
    }

    #[test]
    fn test_check_against_generated_steps() {
        let question = Question::add(8, 5).unwrap();
        let steps = generate_steps(&question);
        let verdict = check_answer(steps.last().unwrap().snapshot(), &question);
        assert!(verdict.is_correct());
    }

    #[test]
    fn test_generated_question_round_trip() {
        let mut generator = QuestionGenerator::seeded(2024);
        for difficulty in Difficulty::ALL {
            let question = generator.generate(difficulty);
            let lesson = StepGenerator::new().generate(&question).unwrap();
            assert_eq!(lesson.final_snapshot().total(), question.target());
        }
    }

    #[test]
    fn test_bead_level_answer() {
        let mut abacus = Abacus::new(9);
        abacus.toggle(8, Bead::Upper).unwrap();
        abacus.toggle(8, Bead::Lower(1)).unwrap();
        let question = Question::subtract(9, 2).unwrap();
        assert!(check_answer(&abacus, &question).is_correct());
    }

    #[test]
    fn test_session_from_prelude() {
        let mut session = PracticeSession::seeded(9, Locale::En, 5).unwrap();
        session.new_question(Difficulty::Units).unwrap();
        assert!(session.start_teaching().unwrap().is_some());
    }
}
