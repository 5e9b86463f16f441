//! Knuth-Morris-Pratt search for literal patterns.

use super::{SearchError, SearchStrategy};
use crate::automaton::{AutomatonError, to_symbol};
use crate::regex::ParseError;
use crate::regex::parser::is_structural;

/// Matches any single character inside a factor.
const WILDCARD: char = '.';

/// True if `pattern` can be searched as a plain factor: no `*`, `|`, `(`, `)`.
/// `.` is allowed and matches any character.
pub fn is_kmp_pattern(pattern: &str) -> bool {
    !pattern.chars().any(is_structural)
}

/// Unanchored search for one literal factor.
#[derive(Debug, Clone)]
pub struct KmpStrategy {
    factor: Vec<char>,
    carry_over: Vec<isize>,
}

impl KmpStrategy {
    pub fn new(pattern: &str) -> Result<Self, SearchError> {
        if pattern.is_empty() {
            return Err(ParseError::Empty.into());
        }
        if !is_kmp_pattern(pattern) {
            return Err(SearchError::NotLiteral(pattern.to_string()));
        }
        let factor: Vec<char> = pattern.chars().collect();
        if let Some(&ch) = factor.iter().find(|&&ch| u8::try_from(ch).is_err()) {
            return Err(ParseError::UnsupportedCharacter(ch).into());
        }
        let carry_over = build_carry_over(&factor);
        Ok(Self { factor, carry_over })
    }

    pub fn factor(&self) -> String {
        self.factor.iter().collect()
    }

    /// `carry_over[i]` is how far to fall back when `factor[i]` mismatches:
    /// the length of the longest proper border of `factor[..i]`, or -1 when
    /// the current input character can be skipped outright.
    pub fn carry_over(&self) -> &[isize] {
        &self.carry_over
    }

    fn matches_at(&self, factor_pos: usize, ch: char) -> bool {
        let expected = self.factor[factor_pos];
        expected == WILDCARD || expected == ch
    }
}

impl SearchStrategy for KmpStrategy {
    fn is_matching(&mut self, line: &str) -> Result<bool, AutomatonError> {
        let input: Vec<char> = line.chars().collect();
        let mut input_pos = 0usize;
        let mut factor_pos = 0usize;

        while input_pos < input.len() {
            let ch = input[input_pos];
            to_symbol(ch)?;
            if self.matches_at(factor_pos, ch) {
                input_pos += 1;
                factor_pos += 1;
                if factor_pos == self.factor.len() {
                    return Ok(true);
                }
            } else {
                input_pos = input_pos.saturating_add_signed(-self.carry_over[factor_pos]);
                factor_pos = 0;
            }
        }
        Ok(false)
    }
}

fn build_carry_over(factor: &[char]) -> Vec<isize> {
    let mut carry_over: Vec<isize> = (0..factor.len())
        .map(|i| longest_border(&factor[..i]) as isize)
        .collect();
    if let Some(first) = carry_over.first_mut() {
        *first = -1;
    }

    // Falling back to a position holding the same character would fail the
    // same way, so jump straight to that position's own fallback. Only valid
    // when every character matches exactly one input character.
    if !factor.contains(&WILDCARD) {
        for i in 1..factor.len() {
            if let Ok(border) = usize::try_from(carry_over[i])
                && factor[i] == factor[border]
            {
                carry_over[i] = carry_over[border];
            }
        }
    }
    carry_over
}

/// Length of the longest proper suffix of `prefix` that is also a prefix of
/// it. With wildcards, two positions agree when either one is a wildcard.
fn longest_border(prefix: &[char]) -> usize {
    (1..prefix.len())
        .rev()
        .find(|&len| {
            prefix[..len]
                .iter()
                .zip(&prefix[prefix.len() - len..])
                .all(|(a, b)| a == b || *a == WILDCARD || *b == WILDCARD)
        })
        .unwrap_or(0)
}
