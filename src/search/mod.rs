//! Line matching.
//!
//! A [`Strategy`] decides whether a line contains a match anywhere inside it.
//! Patterns free of `*`, `|`, `(` and `)` are searched with
//! [Knuth-Morris-Pratt](kmp::KmpStrategy); everything else goes through a
//! compiled DFA retried from every offset of the line
//! ([`naive::AutomatonStrategy`]).

pub mod engine;
pub mod kmp;
pub mod naive;

use std::fmt;

use log::debug;

use crate::automaton::AutomatonError;
use crate::regex::ParseError;

pub use engine::{LineMatch, SearchEngine};
pub use kmp::{KmpStrategy, is_kmp_pattern};
pub use naive::AutomatonStrategy;

/// Decides whether a line contains a match.
pub trait SearchStrategy {
    /// `Err(CharacterOutOfRange)` means this line cannot be searched; other
    /// lines still can.
    fn is_matching(&mut self, line: &str) -> Result<bool, AutomatonError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    Parse(ParseError),
    /// A literal search was requested for a pattern carrying operators.
    NotLiteral(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::NotLiteral(pattern) => {
                write!(f, "Pattern {pattern:?} is not a literal and cannot use KMP")
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::NotLiteral(_) => None,
        }
    }
}

impl From<ParseError> for SearchError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// KMP for literal patterns, the automaton otherwise.
    #[default]
    Auto,
    Automaton,
    Kmp,
}

#[derive(Debug, Clone)]
pub enum Strategy {
    Kmp(KmpStrategy),
    Automaton(AutomatonStrategy),
}

impl Strategy {
    /// KMP if `pattern` has none of `* | ( )`, the automaton otherwise.
    pub fn select(pattern: &str) -> Result<Self, SearchError> {
        Self::with_kind(pattern, StrategyKind::Auto)
    }

    pub fn with_kind(pattern: &str, kind: StrategyKind) -> Result<Self, SearchError> {
        let kind = match kind {
            StrategyKind::Auto if is_kmp_pattern(pattern) => StrategyKind::Kmp,
            StrategyKind::Auto => StrategyKind::Automaton,
            forced => forced,
        };
        let strategy = match kind {
            StrategyKind::Kmp => Self::Kmp(KmpStrategy::new(pattern)?),
            _ => Self::Automaton(AutomatonStrategy::compile(pattern)?),
        };
        debug!("Searching for {pattern:?} with {:?}", strategy.kind());
        Ok(strategy)
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Kmp(_) => StrategyKind::Kmp,
            Self::Automaton(_) => StrategyKind::Automaton,
        }
    }
}

impl SearchStrategy for Strategy {
    fn is_matching(&mut self, line: &str) -> Result<bool, AutomatonError> {
        match self {
            Self::Kmp(kmp) => kmp.is_matching(line),
            Self::Automaton(automaton) => automaton.is_matching(line),
        }
    }
}
