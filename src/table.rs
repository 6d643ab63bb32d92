//! This module defines the `TransitionTable`, an immutable map from `(state, key)` pairs to
//! actions. The Turing machine keys it by tape symbol, the DFA by input character.

use std::collections::HashMap;
use std::hash::Hash;

use crate::analyzer::AnalysisError;
use crate::types::State;

/// The result of looking up a `(state, key)` pair.
///
/// A miss is a legitimate outcome: the machines treat it as a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, A> {
    Found(&'a A),
    NotFound,
}

impl<'a, A> Lookup<'a, A> {
    pub fn found(self) -> Option<&'a A> {
        match self {
            Lookup::Found(action) => Some(action),
            Lookup::NotFound => None,
        }
    }
}

/// A transition function stored as a hash map. Once built it is never mutated and can
/// be shared between machines behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TransitionTable<K, A> {
    rules: HashMap<State, HashMap<K, A>>,
    len: usize,
}

impl<K: Eq + Hash, A: PartialEq> PartialEq for TransitionTable<K, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.rules == other.rules
    }
}

impl<K: Eq + Hash, A: Eq> Eq for TransitionTable<K, A> {}

impl<K, A> TransitionTable<K, A>
where
    K: Eq + Hash + Clone + std::fmt::Display,
{
    /// Builds a table from `(state, key, action)` rules.
    ///
    /// # Returns
    ///
    /// * `Err(AnalysisError::DuplicateTransition)` if two rules share a `(state, key)`
    ///   pair, since the table must be a function.
    pub fn new(
        rules: impl IntoIterator<Item = (State, K, A)>,
    ) -> Result<Self, AnalysisError> {
        let mut map: HashMap<State, HashMap<K, A>> = HashMap::new();
        let mut len = 0;

        for (state, key, action) in rules {
            let row = map.entry(state.clone()).or_default();
            if row.contains_key(&key) {
                return Err(AnalysisError::DuplicateTransition {
                    state,
                    symbol: key.to_string(),
                });
            }
            row.insert(key, action);
            len += 1;
        }

        Ok(Self { rules: map, len })
    }

    pub fn lookup(&self, state: &str, key: &K) -> Lookup<'_, A> {
        match self.rules.get(state).and_then(|row| row.get(key)) {
            Some(action) => Lookup::Found(action),
            None => Lookup::NotFound,
        }
    }

    /// Iterates over `(state, key, action)` rules in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&State, &K, &A)> {
        self.rules.iter().flat_map(|(state, row)| {
            row.iter().map(move |(key, action)| (state, key, action))
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
