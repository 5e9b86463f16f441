//! Finite automata compiled from regular expressions.
//!
//! The pipeline is:
//!
//! ```text
//! RegexNode ──Thompson──> Nfa ──subset construction──> Dfa
//! ```
//!
//! An [`Automaton`] starts out non-deterministic and is determinized exactly
//! once. Only the deterministic form can be stepped through with
//! [`Automaton::input`]; see [`crate::search`] for how a line is scanned.

pub mod dfa;
pub mod nfa;
pub mod table;


use std::fmt;

use log::debug;

use crate::regex::{ParseError, RegexNode, parse};

pub use dfa::Dfa;
pub use nfa::Nfa;
pub use table::{ALPHABET_SIZE, Row, Slot, StateId, StateSet, TransitionTable};

/// Errors raised while stepping an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// `input()` or `reset()` on an automaton that was never determinized.
    NotDeterministic,
    /// The symbol is outside the single-byte alphabet.
    CharacterOutOfRange(char),
    /// The current state cannot consume the symbol. Recoverable: the caller
    /// resets and tries again elsewhere.
    NoTransition,
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDeterministic => write!(f, "The automaton needs to be deterministic"),
            Self::CharacterOutOfRange(c) => {
                write!(f, "Character {c:?} is outside the supported alphabet")
            }
            Self::NoTransition => write!(f, "Cannot match the input"),
        }
    }
}

impl std::error::Error for AutomatonError {}

/// Map `ch` onto the alphabet.
pub(crate) fn to_symbol(ch: char) -> Result<u8, AutomatonError> {
    u8::try_from(ch).map_err(|_| AutomatonError::CharacterOutOfRange(ch))
}

/// An automaton in one of its two phases.
#[derive(Debug, Clone)]
pub enum Automaton {
    Nondeterministic(Nfa),
    Deterministic(Dfa),
}

impl Automaton {
    pub fn from_tree(tree: &RegexNode) -> Self {
        Self::Nondeterministic(Nfa::build(tree))
    }

    /// Replace the NFA with its DFA. Does nothing if already deterministic.
    pub fn determinize(&mut self) {
        if let Self::Nondeterministic(nfa) = self {
            let dfa = Dfa::from_nfa(nfa);
            *self = Self::Deterministic(dfa);
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Deterministic(_))
    }

    pub fn dfa(&self) -> Result<&Dfa, AutomatonError> {
        match self {
            Self::Deterministic(dfa) => Ok(dfa),
            Self::Nondeterministic(_) => Err(AutomatonError::NotDeterministic),
        }
    }

    pub fn dfa_mut(&mut self) -> Result<&mut Dfa, AutomatonError> {
        match self {
            Self::Deterministic(dfa) => Ok(dfa),
            Self::Nondeterministic(_) => Err(AutomatonError::NotDeterministic),
        }
    }

    /// See [`Dfa::input`].
    pub fn input(&mut self, ch: char) -> Result<bool, AutomatonError> {
        self.dfa_mut()?.input(ch)
    }

    pub fn reset(&mut self) -> Result<(), AutomatonError> {
        self.dfa_mut()?.reset();
        Ok(())
    }

    /// Whether the cursor is on an accepting state.
    pub fn is_accepting(&self) -> Result<bool, AutomatonError> {
        Ok(self.dfa()?.is_accepting())
    }

    pub fn table(&self) -> &TransitionTable {
        match self {
            Self::Nondeterministic(nfa) => nfa.table(),
            Self::Deterministic(dfa) => dfa.table(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.table().len()
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// Parse `pattern`, build its NFA and determinize it.
pub fn compile(pattern: &str) -> Result<Automaton, ParseError> {
    let tree = parse(pattern)?;
    let mut automaton = Automaton::from_tree(&tree);
    debug!("NFA for {pattern:?}: {} states", automaton.state_count());
    automaton.determinize();
    debug!("DFA for {pattern:?}: {} states", automaton.state_count());
    Ok(automaton)
}
