//! This module defines the `Dfa` struct, a partial deterministic finite automaton. A missing
//! transition stops evaluation and rejects the word.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::analyzer::analyze_dfa;
use crate::table::{Lookup, TransitionTable};
use crate::types::{AutomatonError, State};

/// Transition table of a DFA: `(state, input character) -> next state`.
pub type DfaTable = TransitionTable<char, State>;

/// A partial DFA over `char` input.
#[derive(Debug, Clone, PartialEq)]
pub struct Dfa {
    states: HashSet<State>,
    alphabet: HashSet<char>,
    start: State,
    accept: HashSet<State>,
    transitions: Arc<DfaTable>,
}

/// The result of evaluating a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the whole word was consumed and the automaton ended in an accept state.
    pub accepted: bool,
    /// The last state reached. On an early halt, the state before the failing symbol.
    pub end_state: State,
    /// Every transition taken, as `(state entered, symbol consumed)`.
    pub trace: Vec<(State, char)>,
}

impl Dfa {
    /// Creates and validates a DFA.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::Invalid)` if the start state, an accept state, or a transition
    ///   references an undeclared state or symbol.
    pub fn new(
        states: impl IntoIterator<Item = State>,
        alphabet: impl IntoIterator<Item = char>,
        start: impl Into<State>,
        accept: impl IntoIterator<Item = State>,
        transitions: impl Into<Arc<DfaTable>>,
    ) -> Result<Self, AutomatonError> {
        let dfa = Self {
            states: states.into_iter().collect(),
            alphabet: alphabet.into_iter().collect(),
            start: start.into(),
            accept: accept.into_iter().collect(),
            transitions: transitions.into(),
        };

        analyze_dfa(&dfa)?;
        Ok(dfa)
    }

    /// Runs the automaton over `input` from the start state.
    ///
    /// Evaluation is a single left-to-right pass. If a symbol has no transition from the
    /// current state, evaluation stops there and the word is rejected, whatever that state is.
    pub fn evaluate(&self, input: &[char]) -> Evaluation {
        let mut state = &self.start;
        let mut trace = Vec::with_capacity(input.len());

        for &symbol in input {
            match self.transitions.lookup(state, &symbol) {
                Lookup::Found(next) => {
                    state = next;
                    trace.push((next.clone(), symbol));
                }
                Lookup::NotFound => {
                    debug!(state = %state, symbol = %symbol, "no transition, rejecting");
                    return Evaluation {
                        accepted: false,
                        end_state: state.clone(),
                        trace,
                    };
                }
            }
        }

        Evaluation {
            accepted: self.accept.contains(state),
            end_state: state.clone(),
            trace,
        }
    }

    /// Evaluates each character of `word` as one input symbol.
    pub fn evaluate_str(&self, word: &str) -> Evaluation {
        self.evaluate(&word.chars().collect::<Vec<_>>())
    }

    pub fn states(&self) -> &HashSet<State> {
        &self.states
    }

    pub fn alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn accept(&self) -> &HashSet<State> {
        &self.accept
    }

    pub fn transitions(&self) -> &Arc<DfaTable> {
        &self.transitions
    }
}

impl fmt::Display for Evaluation {
    /// Renders the human-readable report: verdict, end state, and the moves taken.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accepted {
            writeln!(f, "Accepted. End state: {}", self.end_state)?;
        } else {
            writeln!(f, "Not accepted. End state: {}", self.end_state)?;
        }

        let moves = self
            .trace
            .iter()
            .map(|(state, symbol)| format!("{symbol} -> {state}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Moves: {moves}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisError;

    fn table(rules: &[(&str, char, &str)]) -> DfaTable {
        TransitionTable::new(
            rules
                .iter()
                .map(|(from, symbol, to)| (from.to_string(), *symbol, to.to_string())),
        )
        .unwrap()
    }

    fn single_a() -> Dfa {
        Dfa::new(
            ["0", "1"].map(String::from),
            ['a'],
            "0",
            ["1".to_string()],
            table(&[("0", 'a', "1")]),
        )
        .unwrap()
    }

    /// Accepts words over {a, b, c} made of the blocks `aa`, `bb`, and `cc`.
    fn pairs() -> Dfa {
        Dfa::new(
            ["0", "1", "2", "3", "4", "5", "6"].map(String::from),
            ['a', 'b', 'c'],
            "0",
            ["0", "2", "4"].map(String::from),
            table(&[
                ("0", 'a', "1"),
                ("0", 'b', "3"),
                ("0", 'c', "5"),
                ("1", 'a', "0"),
                ("1", 'b', "6"),
                ("1", 'c', "6"),
                ("2", 'a', "1"),
                ("2", 'b', "3"),
                ("2", 'c', "5"),
                ("3", 'a', "6"),
                ("3", 'b', "2"),
                ("3", 'c', "6"),
                ("4", 'a', "1"),
                ("4", 'b', "3"),
                ("4", 'c', "5"),
                ("5", 'a', "6"),
                ("5", 'b', "6"),
                ("5", 'c', "4"),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_single_symbol_accepted() {
        let result = single_a().evaluate_str("a");

        assert!(result.accepted);
        assert_eq!(result.end_state, "1");
        assert_eq!(result.trace, vec![("1".to_string(), 'a')]);
    }

    #[test]
    fn test_undefined_transition_rejects_early() {
        let result = single_a().evaluate_str("aa");

        assert!(!result.accepted);
        assert_eq!(result.end_state, "1");
        assert_eq!(result.trace, vec![("1".to_string(), 'a')]);
    }

    #[test]
    fn test_early_halt_in_accept_state_still_rejects() {
        // Halting in accept state "1" on an unknown symbol is still a rejection.
        let result = single_a().evaluate(&['a', 'z']);

        assert!(!result.accepted);
        assert_eq!(result.end_state, "1");
    }

    #[test]
    fn test_empty_word() {
        let result = pairs().evaluate_str("");

        assert!(result.accepted);
        assert_eq!(result.end_state, "0");
        assert!(result.trace.is_empty());
    }

    #[test]
    fn test_pairs() {
        let dfa = pairs();

        assert!(dfa.evaluate_str("aabbcc").accepted);
        assert!(dfa.evaluate_str("ccaa").accepted);

        let result = dfa.evaluate_str("ab");
        assert!(!result.accepted);
        assert_eq!(result.end_state, "6");
        assert_eq!(result.trace.len(), 2);
    }

    #[test]
    fn test_undeclared_symbol_in_table() {
        let result = Dfa::new(
            ["0".to_string()],
            ['a'],
            "0",
            Vec::new(),
            table(&[("0", 'b', "0")]),
        );

        assert!(matches!(
            result,
            Err(AutomatonError::Invalid(AnalysisError::UndeclaredSymbol { .. }))
        ));
    }

    #[test]
    fn test_undeclared_start_state() {
        let result = Dfa::new(["0".to_string()], ['a'], "9", Vec::new(), table(&[]));

        assert_eq!(
            result,
            Err(AutomatonError::Invalid(AnalysisError::UndeclaredState {
                field: "start".to_string(),
                state: "9".to_string(),
            }))
        );
    }

    #[test]
    fn test_report_display() {
        let report = single_a().evaluate_str("a").to_string();

        assert!(report.contains("Accepted. End state: 1"));
        assert!(report.contains("a -> 1"));
    }
}
