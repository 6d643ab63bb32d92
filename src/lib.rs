//! This crate provides interpreters for two formal models: a single-tape Turing machine and a
//! partial deterministic finite automaton. Both are driven by an immutable transition table and
//! can be persisted to, and restored from, JSON documents.

pub mod analyzer;
pub mod codec;
pub mod dfa;
pub mod loader;
pub mod machine;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the well-formedness checks and their error type.
pub use analyzer::{analyze_dfa, analyze_turing, unreachable_states, AnalysisError};
/// Re-exports the persistence documents and codec functions.
pub use codec::{
    decode_dfa, decode_turing, encode_dfa, encode_turing, save_dfa, save_turing, DfaDocument,
    TuringDocument,
};
/// Re-exports the DFA and its evaluation result.
pub use dfa::{Dfa, DfaTable, Evaluation};
/// Re-exports the `DocumentLoader` struct from the loader module.
pub use loader::DocumentLoader;
/// Re-exports the Turing machine and its definition.
pub use machine::{TuringDefinition, TuringMachine, TuringTable};
pub use table::{Lookup, TransitionTable};
pub use tape::Tape;
/// Re-exports the shared value types and the crate error.
pub use types::{Action, AutomatonError, Direction, Halt, State, Step, Symbol, Write};
