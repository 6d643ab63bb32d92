//! This module defines the `TuringMachine` struct, which simulates a single-tape, single-head
//! Turing machine with explicit accept and reject states. A missing transition, or a symbol
//! outside the tape alphabet under the head, halts the machine with an implicit rejection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::analyzer::{analyze_turing, check_configuration};
use crate::table::{Lookup, TransitionTable};
use crate::tape::Tape;
use crate::types::{Action, AutomatonError, Halt, State, Step, Symbol, Write};

/// Transition table of a Turing machine: `(state, read symbol) -> action`.
pub type TuringTable = TransitionTable<Symbol, Action>;

/// The static part of a Turing machine.
///
/// A definition is validated once, never mutated afterwards, and shared by every machine
/// built from it. The transition table sits behind its own `Arc` so that definitions which
/// differ only in their sets can still share one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringDefinition {
    states: HashSet<State>,
    tape_alphabet: HashSet<Symbol>,
    input_alphabet: HashSet<Symbol>,
    start: State,
    accept: HashSet<State>,
    reject: HashSet<State>,
    transitions: Arc<TuringTable>,
}

impl TuringDefinition {
    /// Creates and validates a definition.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::Invalid)` if any well-formedness check fails, e.g. a
    ///   transition writes a symbol outside the tape alphabet.
    pub fn new(
        states: impl IntoIterator<Item = State>,
        tape_alphabet: impl IntoIterator<Item = Symbol>,
        input_alphabet: impl IntoIterator<Item = Symbol>,
        start: impl Into<State>,
        accept: impl IntoIterator<Item = State>,
        reject: impl IntoIterator<Item = State>,
        transitions: impl Into<Arc<TuringTable>>,
    ) -> Result<Self, AutomatonError> {
        let definition = Self {
            states: states.into_iter().collect(),
            tape_alphabet: tape_alphabet.into_iter().collect(),
            input_alphabet: input_alphabet.into_iter().collect(),
            start: start.into(),
            accept: accept.into_iter().collect(),
            reject: reject.into_iter().collect(),
            transitions: transitions.into(),
        };

        analyze_turing(&definition)?;
        Ok(definition)
    }

    /// Builds a tape from untrusted input, validated against the input alphabet.
    pub fn input_tape(
        &self,
        input: impl IntoIterator<Item = Symbol>,
    ) -> Result<Tape, AutomatonError> {
        Tape::from_input(input, &self.input_alphabet)
    }

    /// All declared states, including the accept and reject states.
    pub fn states(&self) -> &HashSet<State> {
        &self.states
    }

    /// Symbols that may appear on the tape. Always contains [`Symbol::Blank`].
    pub fn tape_alphabet(&self) -> &HashSet<Symbol> {
        &self.tape_alphabet
    }

    /// Symbols accepted by [`TuringDefinition::input_tape`].
    pub fn input_alphabet(&self) -> &HashSet<Symbol> {
        &self.input_alphabet
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn accept(&self) -> &HashSet<State> {
        &self.accept
    }

    pub fn reject(&self) -> &HashSet<State> {
        &self.reject
    }

    /// Returns the shared transition table.
    ///
    /// # Returns
    ///
    /// * The table behind an `Arc`, so it can be handed to other definitions or
    ///   to [`crate::unreachable_states`] without copying the rules.
    pub fn transitions(&self) -> &Arc<TuringTable> {
        &self.transitions
    }
}

/// Represents a running single-tape Turing machine.
///
/// The machine owns its tape and current state; everything else comes from the shared
/// [`TuringDefinition`].
#[derive(Debug, Clone)]
pub struct TuringMachine {
    definition: Arc<TuringDefinition>,
    state: State,
    tape: Tape,
    step_count: usize,
    last_halt: Option<Halt>,
}

impl TuringMachine {
    /// Creates a machine in the definition's start state with the given tape.
    pub fn new(definition: impl Into<Arc<TuringDefinition>>, tape: Tape) -> Self {
        let definition = definition.into();

        Self {
            state: definition.start.clone(),
            definition,
            tape,
            step_count: 0,
            last_halt: None,
        }
    }

    /// Restores a machine mid-run, e.g. from a persisted document.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::Invalid)` if `state` is undeclared or the tape holds a symbol
    ///   outside the tape alphabet.
    pub fn resume(
        definition: impl Into<Arc<TuringDefinition>>,
        state: impl Into<State>,
        tape: Tape,
    ) -> Result<Self, AutomatonError> {
        let definition = definition.into();
        let state = state.into();

        check_configuration(&definition, &state, &tape)?;

        Ok(Self {
            definition,
            state,
            tape,
            step_count: 0,
            last_halt: None,
        })
    }

    /// Executes a single step.
    ///
    /// A machine already sitting in an accept or reject state halts without touching the
    /// tape. Otherwise the symbol under the head selects a transition, which may write,
    /// then moves the head and changes state.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the machine moved and is not in a terminal state.
    /// * `Step::Halt(_)` with the reason otherwise.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.terminal() {
            return self.halt(halt);
        }

        let symbol = self.tape.read();
        trace!(state = %self.state, symbol = %symbol, head = self.tape.head(), "step");

        if !self.definition.tape_alphabet.contains(&symbol) {
            return self.halt(Halt::InvalidSymbol {
                state: self.state.clone(),
                symbol,
            });
        }

        let definition = Arc::clone(&self.definition);
        let action = match definition.transitions.lookup(&self.state, &symbol) {
            Lookup::Found(action) => action,
            Lookup::NotFound => {
                return self.halt(Halt::UndefinedTransition {
                    state: self.state.clone(),
                    symbol,
                })
            }
        };

        if let Write::Put(value) = &action.write {
            self.tape.write(value.clone());
        }
        self.tape.move_head(action.direction);
        self.state = action.next_state.clone();
        self.step_count += 1;

        match self.terminal() {
            Some(halt) => self.halt(halt),
            None => Step::Continue,
        }
    }

    /// Steps until the machine halts and reports whether it accepted.
    ///
    /// There is no step bound: a machine that never reaches a terminal configuration
    /// never returns. Callers wanting a bound should drive [`TuringMachine::step`].
    pub fn run(&mut self) -> bool {
        loop {
            if let Step::Halt(halt) = self.step() {
                return halt.is_accepted();
            }
        }
    }

    /// Replaces the tape. The current state is left as it is; call
    /// [`TuringMachine::reset`] first for a fresh run from the start state.
    pub fn load_tape(&mut self, tape: Tape) {
        self.tape = tape;
        self.last_halt = None;
    }

    /// Returns the machine to the start state. The tape is untouched.
    pub fn reset(&mut self) {
        self.state = self.definition.start.clone();
        self.step_count = 0;
        self.last_halt = None;
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The tape as it is after the last step, head included.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// The definition this machine runs. Cloning the `Arc` is how callers share it.
    pub fn definition(&self) -> &Arc<TuringDefinition> {
        &self.definition
    }

    /// Returns the number of transitions taken since construction or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns why the machine last halted, if it has halted since the last tape load.
    pub fn last_halt(&self) -> Option<&Halt> {
        self.last_halt.as_ref()
    }

    /// Returns `true` if the current state is an accept state.
    pub fn is_accepting(&self) -> bool {
        self.definition.accept.contains(&self.state)
    }

    fn terminal(&self) -> Option<Halt> {
        if self.is_accepting() {
            Some(Halt::Accepted)
        } else if self.definition.reject.contains(&self.state) {
            Some(Halt::Rejected)
        } else {
            None
        }
    }

    fn halt(&mut self, halt: Halt) -> Step {
        debug!(state = %self.state, steps = self.step_count, "halted: {halt}");
        self.last_halt = Some(halt.clone());
        Step::Halt(halt)
    }
}
