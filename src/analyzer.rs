//! This module provides the well-formedness checks run whenever a Turing machine definition or
//! a DFA is built or decoded. Every check names the offending field so callers can point at the
//! exact place in a document.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use thiserror::Error;

use crate::dfa::Dfa;
use crate::machine::TuringDefinition;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Action, State, Symbol, Write};

/// Represents the problems that can be found in a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A field references a state that is not in the declared state set.
    #[error("{field} references undeclared state '{state}'")]
    UndeclaredState { field: String, state: State },
    /// A field references a symbol that is not in the relevant alphabet.
    #[error("{field} references undeclared symbol '{symbol}'")]
    UndeclaredSymbol { field: String, symbol: String },
    /// States declared as both accepting and rejecting.
    #[error("States are both accepting and rejecting: {0:?}")]
    OverlappingHaltStates(Vec<State>),
    /// The tape alphabet does not contain the blank symbol.
    #[error("Tape alphabet must contain the blank symbol")]
    MissingBlank,
    /// The input alphabet contains the blank symbol.
    #[error("Input alphabet must not contain the blank symbol")]
    BlankInInput,
    /// A persisted head position lies beyond the blank cell past the end of the tape.
    #[error("Head position {head} is outside the tape (length {len})")]
    InvalidHead { head: usize, len: usize },
    /// Two transitions share the same `(state, symbol)` pair.
    #[error("Duplicate transition for state '{state}' on '{symbol}'")]
    DuplicateTransition { state: State, symbol: String },
}

/// Analyzes a Turing machine definition.
///
/// The checks run in a fixed order and the first failure is returned.
pub fn analyze_turing(definition: &TuringDefinition) -> Result<(), AnalysisError> {
    [
        check_start_state,
        check_halt_states,
        check_alphabets,
        check_turing_transitions,
    ]
    .iter()
    .try_for_each(|check| check(definition))
}

/// Analyzes a DFA.
pub fn analyze_dfa(dfa: &Dfa) -> Result<(), AnalysisError> {
    declared_state(dfa.states(), "start", dfa.start())?;

    for state in sorted(dfa.accept()) {
        declared_state(dfa.states(), "accept", state)?;
    }

    for (state, symbol, next) in sorted_rules(dfa.transitions()) {
        let field = format!("transitions ({state}, {symbol})");

        declared_state(dfa.states(), &format!("{field}.state"), state)?;
        declared_state(dfa.states(), &format!("{field}.next"), next)?;
        if !dfa.alphabet().contains(symbol) {
            return Err(AnalysisError::UndeclaredSymbol {
                field: format!("{field}.symbol"),
                symbol: symbol.to_string(),
            });
        }
    }

    Ok(())
}

/// Checks a live configuration against a definition: the current state must be declared
/// and every tape cell must belong to the tape alphabet.
pub fn check_configuration(
    definition: &TuringDefinition,
    state: &str,
    tape: &Tape,
) -> Result<(), AnalysisError> {
    declared_state(definition.states(), "state", state)?;

    tape.contents()
        .iter()
        .enumerate()
        .find(|(_, symbol)| !definition.tape_alphabet().contains(*symbol))
        .map_or(Ok(()), |(i, symbol)| {
            Err(AnalysisError::UndeclaredSymbol {
                field: format!("tape[{i}]"),
                symbol: symbol.to_string(),
            })
        })
}

/// Checks a restored head position. The head may sit on any cell or on the blank cell
/// directly past the end, so `head` must be in `0..=len`.
///
/// # Arguments
///
/// * `head` - The head position read from a document.
/// * `len` - The number of populated tape cells.
pub fn check_head(head: usize, len: usize) -> Result<(), AnalysisError> {
    if head > len {
        return Err(AnalysisError::InvalidHead { head, len });
    }

    Ok(())
}

/// Returns the declared states that cannot be reached from `start` through any sequence of
/// transitions, sorted. Unreachable states are legal; this is a lint for tooling.
pub fn unreachable_states<K, A>(
    start: &str,
    states: &HashSet<State>,
    table: &TransitionTable<K, A>,
) -> Vec<State>
where
    K: Eq + Hash + Clone + Display,
    A: Successor,
{
    let mut visited = HashSet::new();
    let mut queue = vec![start.to_string()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state.clone()) {
            continue;
        }

        for (from, _, action) in table.iter() {
            if *from == state && !visited.contains(action.successor()) {
                queue.push(action.successor().clone());
            }
        }
    }

    let mut unreachable: Vec<State> = states.difference(&visited).cloned().collect();
    unreachable.sort();
    unreachable
}

/// Anything stored in a transition table that names a next state.
pub trait Successor {
    fn successor(&self) -> &State;
}

impl Successor for Action {
    fn successor(&self) -> &State {
        &self.next_state
    }
}

impl Successor for State {
    fn successor(&self) -> &State {
        self
    }
}

fn check_start_state(definition: &TuringDefinition) -> Result<(), AnalysisError> {
    declared_state(definition.states(), "start", definition.start())
}

/// Checks that accept and reject states are declared and disjoint.
fn check_halt_states(definition: &TuringDefinition) -> Result<(), AnalysisError> {
    for state in sorted(definition.accept()) {
        declared_state(definition.states(), "accept", state)?;
    }
    for state in sorted(definition.reject()) {
        declared_state(definition.states(), "reject", state)?;
    }

    let overlap: Vec<State> = sorted(definition.accept())
        .into_iter()
        .filter(|state| definition.reject().contains(*state))
        .cloned()
        .collect();

    if !overlap.is_empty() {
        return Err(AnalysisError::OverlappingHaltStates(overlap));
    }

    Ok(())
}

/// Checks the blank symbol's placement and that the input alphabet is a subset of the
/// tape alphabet.
fn check_alphabets(definition: &TuringDefinition) -> Result<(), AnalysisError> {
    if !definition.tape_alphabet().contains(&Symbol::Blank) {
        return Err(AnalysisError::MissingBlank);
    }
    if definition.input_alphabet().contains(&Symbol::Blank) {
        return Err(AnalysisError::BlankInInput);
    }

    sorted(definition.input_alphabet())
        .into_iter()
        .find(|symbol| !definition.tape_alphabet().contains(*symbol))
        .map_or(Ok(()), |symbol| {
            Err(AnalysisError::UndeclaredSymbol {
                field: "input_alphabet".to_string(),
                symbol: symbol.to_string(),
            })
        })
}

/// Checks that every transition reads and writes declared symbols and connects declared
/// states.
fn check_turing_transitions(definition: &TuringDefinition) -> Result<(), AnalysisError> {
    let alphabet = definition.tape_alphabet();

    for (state, read, action) in sorted_rules(definition.transitions()) {
        let field = format!("transitions ({state}, {read})");

        declared_state(definition.states(), &format!("{field}.state"), state)?;
        declared_state(
            definition.states(),
            &format!("{field}.next"),
            &action.next_state,
        )?;

        if !alphabet.contains(read) {
            return Err(AnalysisError::UndeclaredSymbol {
                field: format!("{field}.read"),
                symbol: read.to_string(),
            });
        }

        if let Write::Put(symbol) = &action.write {
            if !alphabet.contains(symbol) {
                return Err(AnalysisError::UndeclaredSymbol {
                    field: format!("{field}.write"),
                    symbol: symbol.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn declared_state(states: &HashSet<State>, field: &str, state: &str) -> Result<(), AnalysisError> {
    if states.contains(state) {
        Ok(())
    } else {
        Err(AnalysisError::UndeclaredState {
            field: field.to_string(),
            state: state.to_string(),
        })
    }
}

// Sorting keeps the reported error stable across runs despite hash ordering.
fn sorted<T: Ord>(set: &HashSet<T>) -> BTreeSet<&T> {
    set.iter().collect()
}

fn sorted_rules<K, A>(table: &TransitionTable<K, A>) -> Vec<(&State, &K, &A)>
where
    K: Eq + Hash + Clone + Display + Ord,
{
    let mut rules: Vec<_> = table.iter().collect();
    rules.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    rules
}
