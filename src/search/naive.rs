//! Unanchored search driven by a compiled DFA.

use super::SearchStrategy;
use crate::automaton::{self, Automaton, AutomatonError};
use crate::regex::ParseError;

/// Tries the automaton from every offset of the line in turn.
#[derive(Debug, Clone)]
pub struct AutomatonStrategy {
    automaton: Automaton,
}

impl AutomatonStrategy {
    /// Take ownership of `automaton`, determinizing it if needed.
    pub fn new(mut automaton: Automaton) -> Self {
        automaton.determinize();
        Self { automaton }
    }

    pub fn compile(pattern: &str) -> Result<Self, ParseError> {
        Ok(Self::new(automaton::compile(pattern)?))
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}

impl SearchStrategy for AutomatonStrategy {
    fn is_matching(&mut self, line: &str) -> Result<bool, AutomatonError> {
        is_matching(&mut self.automaton, line)
    }
}

/// Whether `automaton` accepts some substring of `line`.
///
/// The automaton must already be deterministic. Its cursor is left wherever
/// the scan stopped.
pub fn is_matching(automaton: &mut Automaton, line: &str) -> Result<bool, AutomatonError> {
    let chars: Vec<char> = line.chars().collect();
    for start in 0..=chars.len() {
        automaton.reset()?;
        if automaton.is_accepting()? {
            return Ok(true);
        }
        for &ch in &chars[start..] {
            match automaton.input(ch) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(AutomatonError::NoTransition) => break,
                Err(err) => return Err(err),
            }
        }
    }
    Ok(false)
}
