//! Abacus snapshot: a fixed row of rods, most significant first

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::column::{Bead, Column};
use crate::core::{AbacusError, AbacusResult};

/// The whole device.
///
/// Column 0 holds `10^(width-1)`, the last column holds the ones. The width is
/// fixed once built. `Clone` is a full structural copy, which is what step
/// recording relies on. Deserialized devices are held to the same width range
/// as [`Abacus::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AbacusFields")]
pub struct Abacus {
    columns: Vec<Column>,
}

impl Default for Abacus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

impl Abacus {
    /// Width of the reference device
    pub const DEFAULT_WIDTH: usize = 9;

    /// Enough rods for any u64
    pub const MAX_WIDTH: usize = 20;

    /// All-zero abacus.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or above [`Self::MAX_WIDTH`]; use
    /// [`Self::try_new`] for untrusted input.
    #[must_use]
    pub fn new(width: usize) -> Self {
        assert!(
            (1..=Self::MAX_WIDTH).contains(&width),
            "abacus width {width} outside 1..={}",
            Self::MAX_WIDTH
        );
        Self {
            columns: vec![Column::default(); width],
        }
    }

    /// All-zero abacus, validating the width
    pub fn try_new(width: usize) -> AbacusResult<Self> {
        if (1..=Self::MAX_WIDTH).contains(&width) {
            Ok(Self::new(width))
        } else {
            Err(AbacusError::InvalidWidth(width))
        }
    }

    /// Abacus showing `value`
    pub fn with_value(width: usize, value: u64) -> AbacusResult<Self> {
        let mut abacus = Self::try_new(width)?;
        let digits = abacus.digits_of(value)?;
        for (column, digit) in abacus.columns.iter_mut().zip(digits) {
            column.set_value(digit);
        }
        Ok(abacus)
    }

    /// Number of rods
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Largest value the device can show, saturating at `u64::MAX`
    #[must_use]
    pub fn capacity(&self) -> u64 {
        10u64
            .checked_pow(self.width() as u32)
            .map_or(u64::MAX, |power| power - 1)
    }

    /// Power of ten held by column `index`
    #[must_use]
    pub fn place_power(&self, index: usize) -> usize {
        self.width() - 1 - index
    }

    /// All rods, most significant first
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// One rod
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }

    /// Digit shown on column `index`
    #[must_use]
    pub fn digit(&self, index: usize) -> Option<u8> {
        self.columns.get(index).map(Column::value)
    }

    /// Every digit, most significant first
    #[must_use]
    pub fn values(&self) -> Vec<u8> {
        self.columns.iter().map(Column::value).collect()
    }

    /// Positional sum of every column, saturating at `u64::MAX`
    #[must_use]
    pub fn total(&self) -> u64 {
        self.columns.iter().fold(0u64, |acc, column| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(column.value()))
        })
    }

    /// Moves column `index` to show `digit`
    pub fn set_digit(&mut self, index: usize, digit: u8) -> AbacusResult<()> {
        if digit > 9 {
            return Err(AbacusError::InvalidDigit(digit));
        }
        self.check_index(index)?;
        self.columns[index].set_value(digit);
        Ok(())
    }

    /// Applies a learner toggle to column `index`
    pub fn toggle(&mut self, index: usize, bead: Bead) -> AbacusResult<()> {
        self.check_index(index)?;
        self.columns[index].toggle(bead)
    }

    /// Returns every rod to zero
    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.set_value(0);
        }
    }

    /// Zero-padded decimal digits of `value`, most significant first
    pub fn digits_of(&self, value: u64) -> AbacusResult<Vec<u8>> {
        if value > self.capacity() {
            return Err(AbacusError::OperandTooWide {
                value,
                width: self.width(),
            });
        }
        let mut digits = vec![0u8; self.width()];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Ok(digits)
    }

    fn check_index(&self, index: usize) -> AbacusResult<()> {
        if index < self.width() {
            Ok(())
        } else {
            Err(AbacusError::ColumnOutOfRange {
                index,
                width: self.width(),
            })
        }
    }
}

#[derive(Deserialize)]
struct AbacusFields {
    columns: Vec<Column>,
}

impl TryFrom<AbacusFields> for Abacus {
    type Error = AbacusError;

    fn try_from(fields: AbacusFields) -> Result<Self, Self::Error> {
        let width = fields.columns.len();
        if (1..=Self::MAX_WIDTH).contains(&width) {
            Ok(Self {
                columns: fields.columns,
            })
        } else {
            Err(AbacusError::InvalidWidth(width))
        }
    }
}

impl fmt::Display for Abacus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in &self.columns {
            write!(f, "{}", column.value())?;
        }
        Ok(())
    }
}
