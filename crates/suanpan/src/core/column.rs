//! Column state model: one rod of the abacus
//!
//! A rod carries one upper bead worth five and four lower beads worth one.
//! Lower bead 0 sits next to the divider bar. Lower beads only ever move as a
//! contiguous block from the bar outward, so an active bead always has every
//! bead between it and the bar active too.

use serde::{Deserialize, Serialize};

use crate::core::{AbacusError, AbacusResult};

/// Number of lower (unit) beads on a rod
pub const LOWER_BEADS: usize = 4;

/// A bead a learner can push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bead {
    /// The five bead above the bar
    Upper,
    /// A unit bead below the bar, 0 nearest the bar
    Lower(usize),
}

/// Bead configuration of a single rod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColumnState {
    /// Upper bead pushed against the bar
    pub upper: bool,
    /// Lower beads pushed against the bar, index 0 nearest the bar
    pub lower: [bool; LOWER_BEADS],
}

impl ColumnState {
    /// Bead configuration for a digit.
    ///
    /// # Panics
    ///
    /// Panics if `value > 9`. Callers only ever pass normalized digits; a
    /// larger value means carry or borrow propagation went wrong.
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        assert!(value <= 9, "column value {value} outside 0..=9");
        let units = (value % 5) as usize;
        let mut lower = [false; LOWER_BEADS];
        for bead in lower.iter_mut().take(units) {
            *bead = true;
        }
        Self {
            upper: value >= 5,
            lower,
        }
    }

    /// Digit shown by this configuration
    #[must_use]
    pub fn value(&self) -> u8 {
        let units = self.lower.iter().filter(|b| **b).count() as u8;
        if self.upper {
            5 + units
        } else {
            units
        }
    }

    /// Number of active lower beads
    #[must_use]
    pub fn lower_count(&self) -> usize {
        self.lower.iter().filter(|b| **b).count()
    }

    /// True when the active lower beads form one block against the bar
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.lower.windows(2).all(|pair| pair[0] || !pair[1])
    }

    /// Flips the upper bead
    pub fn toggle_upper(&mut self) {
        self.upper = !self.upper;
    }

    /// Pushes lower bead `index`.
    ///
    /// An inactive bead drags every bead between it and the bar up with it;
    /// an active bead pushes itself and everything beyond it back down.
    pub fn toggle_lower(&mut self, index: usize) -> AbacusResult<()> {
        if index >= LOWER_BEADS {
            return Err(AbacusError::BeadOutOfRange(index));
        }
        if self.lower[index] {
            for bead in &mut self.lower[index..] {
                *bead = false;
            }
        } else {
            for bead in &mut self.lower[..=index] {
                *bead = true;
            }
        }
        Ok(())
    }

    /// Applies a learner toggle
    pub fn toggle(&mut self, bead: Bead) -> AbacusResult<()> {
        match bead {
            Bead::Upper => {
                self.toggle_upper();
                Ok(())
            }
            Bead::Lower(index) => self.toggle_lower(index),
        }
    }
}

/// Bead configuration for a digit (see [`ColumnState::from_value`])
#[must_use]
pub fn state_from_value(value: u8) -> ColumnState {
    ColumnState::from_value(value)
}

/// Digit shown by a bead configuration
#[must_use]
pub fn column_value(state: &ColumnState) -> u8 {
    state.value()
}

/// A rod with its cached digit.
///
/// The bead state is authoritative; `value` is refreshed on every mutation.
/// Deserialized columns reject a gapped lower block and recompute the digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ColumnFields")]
pub struct Column {
    state: ColumnState,
    value: u8,
}

impl Column {
    /// Column showing `value`
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        Self {
            state: ColumnState::from_value(value),
            value,
        }
    }

    /// Column from an arbitrary bead state
    #[must_use]
    pub fn from_state(state: ColumnState) -> Self {
        Self {
            value: state.value(),
            state,
        }
    }

    /// Current bead state
    #[must_use]
    pub fn state(&self) -> &ColumnState {
        &self.state
    }

    /// Current digit
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Moves the beads to show `value`
    pub fn set_value(&mut self, value: u8) {
        self.state = ColumnState::from_value(value);
        self.value = value;
    }

    /// Applies a learner toggle and refreshes the cached digit
    pub fn toggle(&mut self, bead: Bead) -> AbacusResult<()> {
        self.state.toggle(bead)?;
        self.value = self.state.value();
        Ok(())
    }
}

#[derive(Deserialize)]
struct ColumnFields {
    state: ColumnState,
}

impl TryFrom<ColumnFields> for Column {
    type Error = AbacusError;

    fn try_from(fields: ColumnFields) -> Result<Self, Self::Error> {
        if !fields.state.is_contiguous() {
            return Err(AbacusError::NonContiguousBeads(fields.state.lower));
        }
        Ok(Self::from_state(fields.state))
    }
}
