//! This module defines the `Tape`: a right-growing sequence of symbols with a single head.

use std::collections::HashSet;

use crate::types::{AutomatonError, Direction, Symbol};

/// A single tape with one read/write head.
///
/// The tape grows only to the right. The head ranges over `0..=len`; the cell one past the
/// last populated one reads as [`Symbol::Blank`] and is materialized by [`Tape::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape holding `cells` with the head on cell 0.
    pub fn new(cells: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            head: 0,
        }
    }

    /// Creates a tape from untrusted input, checking every symbol against `input_alphabet`.
    ///
    /// # Returns
    ///
    /// * `Ok(Tape)` with the head on cell 0.
    /// * `Err(AutomatonError::InvalidInput)` naming the first offending position.
    pub fn from_input(
        input: impl IntoIterator<Item = Symbol>,
        input_alphabet: &HashSet<Symbol>,
    ) -> Result<Self, AutomatonError> {
        let cells = input
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| {
                if input_alphabet.contains(&symbol) {
                    Ok(symbol)
                } else {
                    Err(AutomatonError::InvalidInput { position, symbol })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { cells, head: 0 })
    }

    /// Splits `input` into one-character symbols.
    pub fn from_chars(input: &str) -> Self {
        Self::new(input.chars().map(Symbol::from))
    }

    /// Places the head on `head`, clamped to `len`.
    ///
    /// Callers restoring untrusted positions should check them first, see
    /// [`crate::analyzer::check_head`].
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = head.min(self.cells.len());
        self
    }

    /// Returns the symbol under the head, or blank past the populated cells.
    pub fn read(&self) -> Symbol {
        self.cells.get(self.head).cloned().unwrap_or(Symbol::Blank)
    }

    /// Overwrites the cell under the head. Writing one past the end extends the tape by
    /// exactly one cell.
    pub fn write(&mut self, symbol: Symbol) {
        match self.cells.get_mut(self.head) {
            Some(cell) => *cell = symbol,
            None => self.cells.push(symbol),
        }
    }

    /// Moves the head one cell.
    ///
    /// Moving left from cell 0 is a no-op, and so is moving right from the blank cell past
    /// the end: the head never leaves `0..=len`.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.head = self.head.saturating_sub(1),
            Direction::Right => self.head = (self.head + 1).min(self.cells.len()),
        }
    }

    /// Returns the populated cells.
    pub fn contents(&self) -> &[Symbol] {
        &self.cells
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl std::fmt::Display for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.cells {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
