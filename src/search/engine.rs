//! Runs a [`Strategy`] over a stream of lines.

use std::io::BufRead;

use anyhow::Context;
use log::warn;

use super::{SearchError, SearchStrategy, Strategy, StrategyKind};
use crate::automaton::AutomatonError;

/// A line that contained a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based.
    pub number: usize,
    /// Without its line terminator.
    pub line: String,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    strategy: Strategy,
}

impl SearchEngine {
    pub fn new(pattern: &str) -> Result<Self, SearchError> {
        Self::with_strategy(pattern, StrategyKind::Auto)
    }

    pub fn with_strategy(pattern: &str, kind: StrategyKind) -> Result<Self, SearchError> {
        Ok(Self {
            strategy: Strategy::with_kind(pattern, kind)?,
        })
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Collect every line of `reader` that contains a match.
    ///
    /// Lines holding a character outside the alphabet are skipped with a
    /// warning. Invalid UTF-8 is replaced, not rejected.
    pub fn search_lines<R: BufRead>(&mut self, mut reader: R) -> anyhow::Result<Vec<LineMatch>> {
        let mut matches = Vec::new();
        let mut buf = Vec::new();
        let mut number = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Failed to read line {}", number + 1))?;
            if read == 0 {
                break;
            }
            number += 1;

            let line = String::from_utf8_lossy(strip_terminator(&buf));
            match self.strategy.is_matching(&line) {
                Ok(true) => matches.push(LineMatch {
                    number,
                    line: line.into_owned(),
                }),
                Ok(false) => {}
                Err(err @ AutomatonError::CharacterOutOfRange(_)) => {
                    warn!("Skipping line {number}: {err}");
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to search line {number}"));
                }
            }
        }
        Ok(matches)
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn search(pattern: &str, text: &str) -> Vec<LineMatch> {
        SearchEngine::new(pattern)
            .unwrap()
            .search_lines(Cursor::new(text))
            .unwrap()
    }

    fn numbers(matches: &[LineMatch]) -> Vec<usize> {
        matches.iter().map(|m| m.number).collect()
    }

    #[test]
    fn reports_matching_lines_with_numbers() {
        let text = "Babylon\nnothing here\nThis is a Babylonian story\nBabylol\n";
        let matches = search("Babylon", text);
        assert_eq!(numbers(&matches), vec![1, 3]);
        assert_eq!(matches[1].line, "This is a Babylonian story");
    }

    #[test]
    fn last_line_without_newline() {
        let matches = search("ab|cd", "xx\nabc\nzcd");
        assert_eq!(numbers(&matches), vec![2, 3]);
        assert_eq!(matches[1].line, "zcd");
    }

    #[test]
    fn crlf_is_stripped() {
        let matches = search("end.", "the end\r\nend!\r\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, "end!");
    }

    #[test]
    fn star_matches_empty_lines() {
        let matches = search("a*", "\nb\n\n");
        assert_eq!(numbers(&matches), vec![1, 2, 3]);
    }

    #[test]
    fn wide_lines_are_skipped() {
        for kind in [StrategyKind::Kmp, StrategyKind::Automaton] {
            let mut engine = SearchEngine::with_strategy("ab", kind).unwrap();
            let matches = engine
                .search_lines(Cursor::new("€ ab\nab\nxab€\n"))
                .unwrap();
            assert_eq!(numbers(&matches), vec![2, 3], "{kind:?}");
        }
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        // U+FFFD is outside the alphabet, so the line is skipped, not fatal.
        let mut engine = SearchEngine::new("ok").unwrap();
        let matches = engine
            .search_lines(Cursor::new(b"\xffok\nok\n".to_vec()))
            .unwrap();
        assert_eq!(numbers(&matches), vec![2]);
    }

    #[test]
    fn empty_input() {
        assert!(search("a", "").is_empty());
    }

    #[test]
    fn strategy_is_chosen_from_pattern() {
        assert_eq!(
            SearchEngine::new("abc").unwrap().strategy().kind(),
            StrategyKind::Kmp
        );
        assert_eq!(
            SearchEngine::new("a(b)").unwrap().strategy().kind(),
            StrategyKind::Automaton
        );
    }
}
