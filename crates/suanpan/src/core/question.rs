//! Practice questions and the random question generator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AbacusError, AbacusResult};

/// Probability that a generated question is an addition
const ADD_PROBABILITY: f64 = 0.6;

/// Arithmetic operator of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition (+)
    #[serde(rename = "+")]
    Add,
    /// Subtraction (-)
    #[serde(rename = "-")]
    Subtract,
}

impl Operator {
    /// Returns the operator symbol for display
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "add" | "plus" => Ok(Self::Add),
            "-" | "sub" | "subtract" | "minus" => Ok(Self::Subtract),
            other => Err(AbacusError::InvalidOperator(other.to_string())),
        }
    }
}

/// An addition or subtraction problem with its expected answer.
///
/// Subtraction questions never go below zero. Fields are fixed at
/// construction; deserialized questions have their target recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "QuestionFields")]
pub struct Question {
    n1: u64,
    n2: u64,
    operator: Operator,
    target: u64,
}

impl Question {
    /// Builds a question and computes its target
    pub fn new(n1: u64, n2: u64, operator: Operator) -> AbacusResult<Self> {
        let target = match operator {
            Operator::Add => n1.checked_add(n2).ok_or(AbacusError::Overflow { n1, n2 })?,
            Operator::Subtract => n1
                .checked_sub(n2)
                .ok_or(AbacusError::NegativeResult { n1, n2 })?,
        };
        Ok(Self {
            n1,
            n2,
            operator,
            target,
        })
    }

    /// Addition question
    pub fn add(n1: u64, n2: u64) -> AbacusResult<Self> {
        Self::new(n1, n2, Operator::Add)
    }

    /// Subtraction question
    pub fn subtract(n1: u64, n2: u64) -> AbacusResult<Self> {
        Self::new(n1, n2, Operator::Subtract)
    }

    /// First operand, set on the abacus before the operation
    #[must_use]
    pub const fn n1(&self) -> u64 {
        self.n1
    }

    /// Second operand, applied column by column
    #[must_use]
    pub const fn n2(&self) -> u64 {
        self.n2
    }

    /// Operator
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Expected answer
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Largest number the abacus has to show while working this question
    #[must_use]
    pub fn largest_value(&self) -> u64 {
        self.n1.max(self.n2).max(self.target)
    }
}

#[derive(Deserialize)]
struct QuestionFields {
    n1: u64,
    n2: u64,
    operator: Operator,
}

impl TryFrom<QuestionFields> for Question {
    type Error = AbacusError;

    fn try_from(fields: QuestionFields) -> Result<Self, Self::Error> {
        Self::new(fields.n1, fields.n2, fields.operator)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.n1, self.operator, self.n2)
    }
}

/// Magnitude band for generated operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Single digit, 1..=9
    #[default]
    Units,
    /// Two digits, 10..=98
    Tens,
    /// Three digits, 100..=998
    Hundreds,
    /// Four digits, 1000..=9998
    Thousands,
    /// Random width 1..=4 per question, operands may have leading zeros
    Mixed,
}

impl Difficulty {
    /// Every band, in menu order
    pub const ALL: [Self; 5] = [
        Self::Units,
        Self::Tens,
        Self::Hundreds,
        Self::Thousands,
        Self::Mixed,
    ];

    /// Inclusive operand range for a fixed-width band.
    ///
    /// `Mixed` has no fixed range and returns `None`.
    #[must_use]
    pub const fn range(self) -> Option<(u64, u64)> {
        match self {
            Self::Units => Some((1, 9)),
            Self::Tens => Some((10, 98)),
            Self::Hundreds => Some((100, 998)),
            Self::Thousands => Some((1000, 9998)),
            Self::Mixed => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Units => "units",
            Self::Tens => "tens",
            Self::Hundreds => "hundreds",
            Self::Thousands => "thousands",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "units" | "unit" | "1" => Ok(Self::Units),
            "tens" | "2" => Ok(Self::Tens),
            "hundreds" | "3" => Ok(Self::Hundreds),
            "thousands" | "4" => Ok(Self::Thousands),
            "mixed" | "random" => Ok(Self::Mixed),
            _ => Err(AbacusError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Random question source.
///
/// Takes any `Rng`, so tests can pin the sequence with [`Self::seeded`].
#[derive(Debug, Clone)]
pub struct QuestionGenerator<R = StdRng> {
    rng: R,
}

impl QuestionGenerator<StdRng> {
    /// Deterministic generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> QuestionGenerator<R> {
    /// Wraps an existing random source
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws a question from `difficulty`
    pub fn generate(&mut self, difficulty: Difficulty) -> Question {
        let add = self.rng.gen_bool(ADD_PROBABILITY);
        let (lo, hi) = match difficulty.range() {
            Some(range) => range,
            None => {
                let width = self.rng.gen_range(1..=4u32);
                (0, 10u64.pow(width) - 1)
            }
        };
        let mut n1 = self.rng.gen_range(lo..=hi);
        let mut n2 = self.rng.gen_range(lo..=hi);

        let operator = if add {
            Operator::Add
        } else {
            if n1 < n2 {
                std::mem::swap(&mut n1, &mut n2);
            }
            Operator::Subtract
        };

        let target = match operator {
            Operator::Add => n1 + n2,
            Operator::Subtract => n1 - n2,
        };
        tracing::debug!(%difficulty, n1, n2, %operator, target, "generated question");
        Question {
            n1,
            n2,
            operator,
            target,
        }
    }
}

/// Draws one question using the thread-local random source
#[must_use]
pub fn generate_question(difficulty: Difficulty) -> Question {
    QuestionGenerator::new(rand::thread_rng()).generate(difficulty)
}
