//! A small egrep built on a from-scratch regular expression engine.
//!
//! Patterns support literal characters, `.`, implicit concatenation, `*`,
//! `|` and grouping parentheses. They are parsed into a [`RegexNode`],
//! compiled to a Thompson NFA, determinized, and matched against lines
//! either by the resulting DFA or, for literal patterns, by KMP.
//!
//! # Example
//!
//! ```rust
//! use egrep::{RegexNode, SearchStrategy, Strategy, StrategyKind, compile, parse};
//!
//! let tree = parse("a|bc*").unwrap();
//! assert_eq!(tree, RegexNode::aho_ullman());
//! assert_eq!(tree.to_string(), "alt('a', cat('b', star('c')))");
//!
//! // The compiled automaton recognizes whole strings from its initial state.
//! let mut automaton = compile("a|bc*").unwrap();
//! assert_eq!(automaton.input('b'), Ok(true));
//! assert_eq!(automaton.input('c'), Ok(true));
//!
//! // Strategies find a match anywhere in the line.
//! let mut strategy = Strategy::select("(ab)|(ac)").unwrap();
//! assert_eq!(strategy.kind(), StrategyKind::Automaton);
//! assert_eq!(strategy.is_matching("accurate"), Ok(true));
//! assert_eq!(strategy.is_matching("bcause"), Ok(false));
//!
//! let mut literal = Strategy::select("Babylon").unwrap();
//! assert_eq!(literal.kind(), StrategyKind::Kmp);
//! assert_eq!(literal.is_matching("This is a Babylonian story"), Ok(true));
//! ```

pub mod automaton;
pub mod regex;
pub mod search;

pub use automaton::{Automaton, AutomatonError, compile};
pub use regex::{ParseError, Parser, RegexNode, parse};
pub use search::{
    AutomatonStrategy, KmpStrategy, LineMatch, SearchEngine, SearchError, SearchStrategy,
    Strategy, StrategyKind,
};
