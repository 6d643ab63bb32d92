//! This module provides the JSON persistence format for Turing machines and DFAs.
//!
//! A Turing machine document captures the live machine: besides the definition it stores the
//! current state, the tape contents, and the head position, so a decoded machine continues
//! exactly where the encoded one stopped. Set-valued fields are written sorted to keep
//! documents diffable; the tape is written in order with blanks as `null`.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::check_head;
use crate::dfa::{Dfa, DfaTable};
use crate::machine::{TuringDefinition, TuringMachine, TuringTable};
use crate::tape::Tape;
use crate::types::{Action, AutomatonError, Direction, State, Symbol, Write};

/// Serialized form of a [`TuringMachine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuringDocument {
    pub states: Vec<State>,
    pub tape_alphabet: Vec<Symbol>,
    pub input_alphabet: Vec<Symbol>,
    pub start: State,
    /// Current state. Absent in hand-written definitions, which start at `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    pub accept: Vec<State>,
    pub reject: Vec<State>,
    pub transitions: Vec<TuringRule>,
    pub tape: Vec<Symbol>,
    #[serde(default)]
    pub head: usize,
}

/// One Turing machine transition: `(state, read) -> (write, move, next)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuringRule {
    pub state: State,
    pub read: Symbol,
    pub write: Write,
    #[serde(rename = "move")]
    pub direction: Direction,
    pub next: State,
}

/// Serialized form of a [`Dfa`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DfaDocument {
    pub states: Vec<State>,
    pub alphabet: Vec<char>,
    pub start: State,
    pub accept: Vec<State>,
    pub transitions: Vec<DfaRule>,
}

/// One DFA transition: `(state, symbol) -> next`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DfaRule {
    pub state: State,
    pub symbol: char,
    pub next: State,
}

impl From<&TuringMachine> for TuringDocument {
    fn from(machine: &TuringMachine) -> Self {
        let definition = machine.definition();

        let mut transitions: Vec<TuringRule> = definition
            .transitions()
            .iter()
            .map(|(state, read, action)| TuringRule {
                state: state.clone(),
                read: read.clone(),
                write: action.write.clone(),
                direction: action.direction,
                next: action.next_state.clone(),
            })
            .collect();
        transitions.sort_by(|a, b| (&a.state, &a.read).cmp(&(&b.state, &b.read)));

        Self {
            states: sorted(definition.states()),
            tape_alphabet: sorted(definition.tape_alphabet()),
            input_alphabet: sorted(definition.input_alphabet()),
            start: definition.start().to_string(),
            state: Some(machine.state().to_string()),
            accept: sorted(definition.accept()),
            reject: sorted(definition.reject()),
            transitions,
            tape: machine.tape().contents().to_vec(),
            head: machine.tape().head(),
        }
    }
}

impl TryFrom<TuringDocument> for TuringMachine {
    type Error = AutomatonError;

    fn try_from(document: TuringDocument) -> Result<Self, Self::Error> {
        let table = TuringTable::new(document.transitions.into_iter().map(|rule| {
            (
                rule.state,
                rule.read,
                Action::new(rule.write, rule.direction, rule.next),
            )
        }))?;

        let definition = TuringDefinition::new(
            document.states,
            document.tape_alphabet,
            document.input_alphabet,
            document.start.clone(),
            document.accept,
            document.reject,
            table,
        )?;

        check_head(document.head, document.tape.len())?;

        let state = document.state.unwrap_or(document.start);
        let tape = Tape::new(document.tape).with_head(document.head);

        TuringMachine::resume(definition, state, tape)
    }
}

impl From<&Dfa> for DfaDocument {
    fn from(dfa: &Dfa) -> Self {
        let mut transitions: Vec<DfaRule> = dfa
            .transitions()
            .iter()
            .map(|(state, symbol, next)| DfaRule {
                state: state.clone(),
                symbol: *symbol,
                next: next.clone(),
            })
            .collect();
        transitions.sort_by(|a, b| (&a.state, a.symbol).cmp(&(&b.state, b.symbol)));

        Self {
            states: sorted(dfa.states()),
            alphabet: sorted(dfa.alphabet()),
            start: dfa.start().to_string(),
            accept: sorted(dfa.accept()),
            transitions,
        }
    }
}

impl TryFrom<DfaDocument> for Dfa {
    type Error = AutomatonError;

    fn try_from(document: DfaDocument) -> Result<Self, Self::Error> {
        let table = DfaTable::new(
            document
                .transitions
                .into_iter()
                .map(|rule| (rule.state, rule.symbol, rule.next)),
        )?;

        Dfa::new(
            document.states,
            document.alphabet,
            document.start,
            document.accept,
            table,
        )
    }
}

/// Encodes a Turing machine, including its live tape and state, as pretty-printed JSON.
pub fn encode_turing(machine: &TuringMachine) -> Result<String, AutomatonError> {
    Ok(serde_json::to_string_pretty(&TuringDocument::from(machine))?)
}

/// Decodes a Turing machine document.
///
/// # Returns
///
/// * `Err(AutomatonError::Document)` if the JSON is malformed or a field is missing.
/// * `Err(AutomatonError::Invalid)` if the document describes an ill-formed machine, e.g.
///   a transition into an undeclared state.
pub fn decode_turing(content: &str) -> Result<TuringMachine, AutomatonError> {
    let document: TuringDocument = serde_json::from_str(content)?;
    TuringMachine::try_from(document)
}

/// Encodes a DFA as pretty-printed JSON.
pub fn encode_dfa(dfa: &Dfa) -> Result<String, AutomatonError> {
    Ok(serde_json::to_string_pretty(&DfaDocument::from(dfa))?)
}

/// Decodes a DFA document.
pub fn decode_dfa(content: &str) -> Result<Dfa, AutomatonError> {
    let document: DfaDocument = serde_json::from_str(content)?;
    Dfa::try_from(document)
}

/// Writes a Turing machine document to `path`, replacing any existing file.
///
/// # Arguments
///
/// * `machine` - The machine to persist, with its current tape and state.
/// * `path` - The destination file.
///
/// # Returns
///
/// * `Err(AutomatonError::FileError)` if the file cannot be written.
pub fn save_turing(machine: &TuringMachine, path: &Path) -> Result<(), AutomatonError> {
    write(path, &encode_turing(machine)?)
}

/// Writes a DFA document to `path`.
pub fn save_dfa(dfa: &Dfa, path: &Path) -> Result<(), AutomatonError> {
    write(path, &encode_dfa(dfa)?)
}

fn write(path: &Path, content: &str) -> Result<(), AutomatonError> {
    fs::write(path, content).map_err(|e| {
        AutomatonError::FileError(format!("Failed to write file {}: {}", path.display(), e))
    })
}

fn sorted<T: Ord + Clone + Eq + Hash>(set: &HashSet<T>) -> Vec<T> {
    let mut values: Vec<T> = set.iter().cloned().collect();
    values.sort();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisError;
    use crate::types::Halt;

    const APPEND: &str = r#"{
        "states": ["q0", "q1", "qa"],
        "tape_alphabet": ["a", null],
        "input_alphabet": ["a"],
        "start": "q0",
        "accept": ["qa"],
        "reject": [],
        "transitions": [
            {"state": "q0", "read": "a", "write": "Keep", "move": "Right", "next": "q0"},
            {"state": "q0", "read": null, "write": {"Put": "a"}, "move": "Right", "next": "qa"}
        ],
        "tape": ["a", "a"]
    }"#;

    #[test]
    fn test_decode_hand_written_document() {
        let mut machine = decode_turing(APPEND).unwrap();

        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.tape().head(), 0);
        assert!(machine.run());
        assert_eq!(machine.tape().to_string(), "aaa");
        assert_eq!(machine.tape().head(), 3);
    }

    #[test]
    fn test_live_machine_round_trip() {
        let mut machine = decode_turing(APPEND).unwrap();
        machine.step();
        machine.step();

        let encoded = encode_turing(&machine).unwrap();
        let mut restored = decode_turing(&encoded).unwrap();

        assert_eq!(restored.state(), machine.state());
        assert_eq!(restored.tape(), machine.tape());
        assert_eq!(restored.definition(), machine.definition());

        assert_eq!(restored.run(), machine.run());
        assert_eq!(restored.tape(), machine.tape());
        assert_eq!(restored.last_halt(), Some(&Halt::Accepted));
    }

    #[test]
    fn test_round_trip_preserves_start_state() {
        let mut machine = decode_turing(APPEND).unwrap();
        machine.run();

        let mut restored = decode_turing(&encode_turing(&machine).unwrap()).unwrap();
        assert_eq!(restored.state(), "qa");

        restored.reset();
        assert_eq!(restored.state(), "q0");
    }

    #[test]
    fn test_sets_are_written_sorted() {
        let machine = decode_turing(APPEND).unwrap();
        let document = TuringDocument::from(&machine);

        assert_eq!(document.states, vec!["q0", "q1", "qa"]);
        assert_eq!(document.tape_alphabet, vec![Symbol::Blank, Symbol::new("a")]);
        assert_eq!(document.transitions[0].read, Symbol::Blank);
    }

    #[test]
    fn test_transition_to_undeclared_state() {
        let content = APPEND.replace(r#""next": "qa""#, r#""next": "q9""#);

        match decode_turing(&content) {
            Err(AutomatonError::Invalid(AnalysisError::UndeclaredState { field, state })) => {
                assert_eq!(state, "q9");
                assert!(field.ends_with(".next"));
            }
            other => panic!("Expected an undeclared state error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_field() {
        let content = APPEND.replace(r#""reject": [],"#, "");

        match decode_turing(&content) {
            Err(AutomatonError::Document(message)) => assert!(message.contains("reject")),
            other => panic!("Expected a document error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicate_transition() {
        let content = APPEND.replace(r#""next": "qa""#, r#""next": "qa"},
            {"state": "q0", "read": null, "write": "Keep", "move": "Left", "next": "q1""#);

        assert!(matches!(
            decode_turing(&content),
            Err(AutomatonError::Invalid(AnalysisError::DuplicateTransition { .. }))
        ));
    }

    #[test]
    fn test_tape_symbol_outside_alphabet() {
        let content = APPEND.replace(r#""tape": ["a", "a"]"#, r#""tape": ["a", "b"]"#);

        assert!(matches!(
            decode_turing(&content),
            Err(AutomatonError::Invalid(AnalysisError::UndeclaredSymbol { ref field, .. }))
                if field == "tape[1]"
        ));
    }

    #[test]
    fn test_head_past_tape_end() {
        let content = APPEND.replace(
            r#""tape": ["a", "a"]"#,
            r#""tape": ["a", "a"], "head": 18446744073709551615"#,
        );

        assert_eq!(
            decode_turing(&content).map(|_| ()),
            Err(AutomatonError::Invalid(AnalysisError::InvalidHead {
                head: usize::MAX,
                len: 2,
            }))
        );

        let content = APPEND.replace(r#""tape": ["a", "a"]"#, r#""tape": ["a", "a"], "head": 2"#);
        let machine = decode_turing(&content).unwrap();
        assert_eq!(machine.tape().head(), 2);
    }

    #[test]
    fn test_undeclared_current_state() {
        let content = APPEND.replace(r#""start": "q0","#, r#""start": "q0", "state": "q7","#);

        assert_eq!(
            decode_turing(&content).map(|_| ()),
            Err(AutomatonError::Invalid(AnalysisError::UndeclaredState {
                field: "state".to_string(),
                state: "q7".to_string(),
            }))
        );
    }

    #[test]
    fn test_unknown_field() {
        let content = APPEND.replace(r#""reject": [],"#, r#""reject": [], "blank": "_","#);

        match decode_turing(&content) {
            Err(AutomatonError::Document(message)) => assert!(message.contains("blank")),
            other => panic!("Expected a document error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dfa_round_trip() {
        let content = r#"{
            "states": ["0", "1"],
            "alphabet": ["a"],
            "start": "0",
            "accept": ["1"],
            "transitions": [{"state": "0", "symbol": "a", "next": "1"}]
        }"#;

        let dfa = decode_dfa(content).unwrap();
        let restored = decode_dfa(&encode_dfa(&dfa).unwrap()).unwrap();

        assert_eq!(restored, dfa);
        assert_eq!(restored.evaluate_str("a"), dfa.evaluate_str("a"));
        assert_eq!(restored.evaluate_str("aa"), dfa.evaluate_str("aa"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machine.json");
        let machine = decode_turing(APPEND).unwrap();

        save_turing(&machine, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert_eq!(decode_turing(&content).unwrap().definition(), machine.definition());
    }
}
