//! This module defines the core data structures shared by the Turing machine and DFA
//! interpreters: symbols, states, transition actions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analyzer::AnalysisError;

/// A control state identifier. States carry no structure beyond equality.
pub type State = String;

/// A single tape cell value.
///
/// `Blank` is the value read from any cell that was never written. It is a distinct
/// variant rather than a reserved string so that no alphabet entry can collide with it.
/// In persisted documents a blank is encoded as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Symbol {
    /// The blank sentinel.
    Blank,
    /// A declared alphabet symbol.
    Value(String),
}

impl Symbol {
    /// Creates a non-blank symbol.
    pub fn new(value: impl Into<String>) -> Self {
        Symbol::Value(value.into())
    }

    /// Returns `true` for the blank sentinel.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }
}

impl From<Option<String>> for Symbol {
    fn from(value: Option<String>) -> Self {
        value.map_or(Symbol::Blank, Symbol::Value)
    }
}

impl From<Symbol> for Option<String> {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::Blank => None,
            Symbol::Value(value) => Some(value),
        }
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol::Value(value.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => f.write_str("_"),
            Symbol::Value(value) => f.write_str(value),
        }
    }
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left. Pinned at cell 0.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// The write half of a Turing machine action.
///
/// `Keep` skips the write entirely, which is observably different from writing the
/// symbol that is already under the head: it never extends the tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Write {
    /// Leave the cell untouched.
    Keep,
    /// Overwrite the cell with the given symbol.
    Put(Symbol),
}

/// What a Turing machine does for a matched `(state, symbol)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The symbol to write, if any.
    pub write: Write,
    /// The direction to move the head after writing.
    pub direction: Direction,
    /// The next control state.
    pub next_state: State,
}

impl Action {
    pub fn new(write: Write, direction: Direction, next_state: impl Into<State>) -> Self {
        Self {
            write,
            direction,
            next_state: next_state.into(),
        }
    }
}

/// Represents the outcome of a Turing machine execution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a transition and has not reached a terminal state.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

/// Why a machine halted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The current state is an accept state.
    Accepted,
    /// The current state is a declared reject state.
    Rejected,
    /// No transition exists for the current state and the symbol under the head.
    UndefinedTransition { state: State, symbol: Symbol },
    /// The symbol under the head is not in the tape alphabet.
    InvalidSymbol { state: State, symbol: Symbol },
}

impl Halt {
    /// Returns `true` only for [`Halt::Accepted`]. Every other halt is a rejection.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Halt::Accepted)
    }

    /// Returns `true` for halts caused by a missing transition or an unknown symbol,
    /// as opposed to landing in a declared reject state.
    pub fn is_implicit_reject(&self) -> bool {
        matches!(
            self,
            Halt::UndefinedTransition { .. } | Halt::InvalidSymbol { .. }
        )
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Accepted => f.write_str("accepted"),
            Halt::Rejected => f.write_str("rejected"),
            Halt::UndefinedTransition { state, symbol } => {
                write!(f, "rejected: no transition for state {state} on '{symbol}'")
            }
            Halt::InvalidSymbol { state, symbol } => {
                write!(f, "rejected: symbol '{symbol}' outside tape alphabet in state {state}")
            }
        }
    }
}

/// Represents the errors reported while building, loading, or seeding a machine.
///
/// Execution never produces these: undefined transitions and unknown symbols are
/// [`Halt`] outcomes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// The definition failed a well-formedness check.
    #[error("Definition validation error: {0}")]
    Invalid(#[from] AnalysisError),
    /// Externally supplied input contains a symbol outside the input alphabet.
    #[error("Input symbol '{symbol}' at position {position} is not in the input alphabet")]
    InvalidInput { position: usize, symbol: Symbol },
    /// A persisted document could not be parsed or has the wrong shape.
    #[error("Document error: {0}")]
    Document(String),
    /// Indicates an error related to reading or writing document files.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::Document(error.to_string())
    }
}
