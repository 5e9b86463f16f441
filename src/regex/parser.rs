//! Staged-rewriting parser for regular expressions.
//!
//! The pattern is first split into a working buffer with one entry per
//! character, each either a single-node tree (literal, `.`) or a bare operator
//! marker. Precedence is then resolved by rewriting that buffer in four
//! stages, tightest-binding first: parentheses, `*`, implicit concatenation,
//! `|`. A well-formed pattern reduces to exactly one tree.

use phf::{Map, phf_map};

use super::ast::RegexNode;

/// Errors that can occur while parsing a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnsupportedCharacter(char),
    MissingLeftParen,
    MissingRightParen,
    MalformedGroup,
    StarWithoutOperand,
    MissingLeftOperand,
    MissingRightOperand,
    MultipleRoots,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Regex cannot be empty"),
            Self::UnsupportedCharacter(c) => {
                write!(f, "Unsupported character in regex: {c:?} (alphabet is single bytes)")
            }
            Self::MissingLeftParen => write!(f, "Error during parsing: missing '('"),
            Self::MissingRightParen => write!(f, "Error during parsing: missing ')'"),
            Self::MalformedGroup => write!(f, "Error during parsing: malformed group"),
            Self::StarWithoutOperand => write!(f, "Error during parsing: '*' needs an operand"),
            Self::MissingLeftOperand => write!(f, "Error during parsing: missing left operand of '|'"),
            Self::MissingRightOperand => {
                write!(f, "Error during parsing: missing right operand of '|'")
            }
            Self::MultipleRoots => write!(f, "Error during parsing: multiple roots"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Operators that only exist in the working buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    LParen,
    RParen,
    Star,
    Altern,
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Dot,
    Marker(Marker),
}

const OPERATORS: Map<char, Token> = phf_map! {
    '.' => Token::Dot,
    '*' => Token::Marker(Marker::Star),
    '|' => Token::Marker(Marker::Altern),
    '(' => Token::Marker(Marker::LParen),
    ')' => Token::Marker(Marker::RParen),
};

/// True for every character with a meaning of its own (`.`, `*`, `|`, `(`, `)`).
pub(crate) fn is_operator(ch: char) -> bool {
    OPERATORS.contains_key(&ch)
}

/// True for the characters that give a pattern structure (`*`, `|`, `(`, `)`).
///
/// A pattern free of these is a plain literal factor, possibly with `.`.
pub(crate) fn is_structural(ch: char) -> bool {
    matches!(OPERATORS.get(&ch), Some(Token::Marker(_)))
}

/// A tree under construction. `Group` protects a parenthesized subtree and is
/// stripped before the tree is handed out.
#[derive(Debug)]
enum Partial {
    Literal(u8),
    Dot,
    Concat(Box<Partial>, Box<Partial>),
    Altern(Box<Partial>, Box<Partial>),
    Star(Box<Partial>),
    Group(Box<Partial>),
}

/// One entry of the working buffer.
#[derive(Debug)]
enum Item {
    Marker(Marker),
    Tree(Partial),
}

impl Item {
    fn is_tree(&self) -> bool {
        matches!(self, Item::Tree(_))
    }

    fn is_marker(&self, marker: Marker) -> bool {
        matches!(self, Item::Marker(m) if *m == marker)
    }
}

/// Parse a regular expression into a [`RegexNode`].
pub fn parse(pattern: &str) -> Result<RegexNode, ParseError> {
    if pattern.is_empty() {
        return Err(ParseError::Empty);
    }
    let items = pattern
        .chars()
        .map(tokenize)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(strip_groups(reduce(items)?))
}

/// A parser bound to one pattern. The first successful parse is cached and
/// handed back by every later call.
#[derive(Debug, Default)]
pub struct Parser {
    pattern: String,
    cached: Option<RegexNode>,
}

impl Parser {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            cached: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Replace the pattern, dropping any cached tree.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.cached = None;
    }

    pub fn is_parsed(&self) -> bool {
        self.cached.is_some()
    }

    pub fn parse(&mut self) -> Result<&RegexNode, ParseError> {
        let tree = match self.cached.take() {
            Some(tree) => tree,
            None => parse(&self.pattern)?,
        };
        Ok(&*self.cached.insert(tree))
    }
}

fn tokenize(ch: char) -> Result<Item, ParseError> {
    match OPERATORS.get(&ch) {
        Some(Token::Dot) => Ok(Item::Tree(Partial::Dot)),
        Some(Token::Marker(marker)) => Ok(Item::Marker(*marker)),
        None => u8::try_from(ch)
            .map(|byte| Item::Tree(Partial::Literal(byte)))
            .map_err(|_| ParseError::UnsupportedCharacter(ch)),
    }
}

/// Run every stage over `items` and return the single remaining tree.
fn reduce(mut items: Vec<Item>) -> Result<Partial, ParseError> {
    reduce_parentheses(&mut items)?;
    reduce_stars(&mut items)?;
    reduce_concats(&mut items);
    reduce_alterns(&mut items)?;

    match <[Item; 1]>::try_from(items) {
        Ok([Item::Tree(root)]) => Ok(root),
        _ => Err(ParseError::MultipleRoots),
    }
}

fn reduce_parentheses(items: &mut Vec<Item>) -> Result<(), ParseError> {
    while items
        .iter()
        .any(|item| item.is_marker(Marker::LParen) || item.is_marker(Marker::RParen))
    {
        let close = items
            .iter()
            .position(|item| item.is_marker(Marker::RParen))
            .ok_or(ParseError::MissingRightParen)?;
        let open = items[..close]
            .iter()
            .rposition(|item| item.is_marker(Marker::LParen))
            .ok_or(ParseError::MissingLeftParen)?;

        let inner: Vec<Item> = items.drain(open + 1..close).collect();
        if inner.is_empty() {
            return Err(ParseError::MalformedGroup);
        }
        let group = Partial::Group(Box::new(reduce(inner)?));

        // `(` is at `open`, `)` right after it.
        items.remove(open);
        items[open] = Item::Tree(group);
    }
    Ok(())
}

fn reduce_stars(items: &mut Vec<Item>) -> Result<(), ParseError> {
    while let Some(pos) = items.iter().position(|item| item.is_marker(Marker::Star)) {
        let operand = pos
            .checked_sub(1)
            .and_then(|prev| take_tree(items, prev))
            .ok_or(ParseError::StarWithoutOperand)?;
        items[pos - 1] = Item::Tree(Partial::Star(Box::new(operand)));
    }
    Ok(())
}

/// Fold the first pair of adjacent trees until none is left. Only `|`
/// markers remain at this point, and they keep their neighbours apart.
fn reduce_concats(items: &mut Vec<Item>) {
    while let Some(pos) = items
        .windows(2)
        .position(|pair| pair[0].is_tree() && pair[1].is_tree())
    {
        if let (Some(right), Some(left)) = (take_tree(items, pos + 1), take_tree(items, pos)) {
            items.insert(
                pos,
                Item::Tree(Partial::Concat(Box::new(left), Box::new(right))),
            );
        }
    }
}

fn reduce_alterns(items: &mut Vec<Item>) -> Result<(), ParseError> {
    while let Some(pos) = items.iter().position(|item| item.is_marker(Marker::Altern)) {
        if pos == 0 || !items[pos - 1].is_tree() {
            return Err(ParseError::MissingLeftOperand);
        }
        let right = take_tree(items, pos + 1).ok_or(ParseError::MissingRightOperand)?;
        let left = take_tree(items, pos - 1).ok_or(ParseError::MissingLeftOperand)?;
        items[pos - 1] = Item::Tree(Partial::Altern(Box::new(left), Box::new(right)));
    }
    Ok(())
}

/// Remove and return the tree at `idx`. Leaves `items` untouched when `idx`
/// is out of bounds or holds a marker.
fn take_tree(items: &mut Vec<Item>, idx: usize) -> Option<Partial> {
    if !items.get(idx).is_some_and(Item::is_tree) {
        return None;
    }
    match items.remove(idx) {
        Item::Tree(tree) => Some(tree),
        Item::Marker(_) => None,
    }
}

fn strip_groups(tree: Partial) -> RegexNode {
    match tree {
        Partial::Literal(byte) => RegexNode::Literal(byte),
        Partial::Dot => RegexNode::Dot,
        Partial::Group(inner) => strip_groups(*inner),
        Partial::Star(child) => RegexNode::star(strip_groups(*child)),
        Partial::Concat(left, right) => {
            RegexNode::concat(strip_groups(*left), strip_groups(*right))
        }
        Partial::Altern(left, right) => {
            RegexNode::altern(strip_groups(*left), strip_groups(*right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(s: &str) -> RegexNode {
        parse(s).expect("parse should succeed")
    }
    fn parse_err(s: &str) -> ParseError {
        parse(s).expect_err("parse should fail")
    }

    fn lit(c: char) -> RegexNode {
        RegexNode::literal(c)
    }

    // --- Leaves ---

    #[test]
    fn test_single_literal() {
        assert_eq!(parse_ok("a"), lit('a'));
    }

    #[test]
    fn test_dot() {
        assert_eq!(parse_ok("."), RegexNode::Dot);
    }

    #[test]
    fn test_latin1_literal() {
        assert_eq!(parse_ok("é"), RegexNode::Literal(0xe9));
    }

    // --- Precedence ---

    #[test]
    fn test_aho_ullman() {
        assert_eq!(parse_ok("a|bc*"), RegexNode::aho_ullman());
    }

    #[test]
    fn test_concat_is_left_associative() {
        assert_eq!(
            parse_ok("abc"),
            RegexNode::concat(RegexNode::concat(lit('a'), lit('b')), lit('c'))
        );
    }

    #[test]
    fn test_altern_is_left_associative() {
        assert_eq!(
            parse_ok("a|b|c"),
            RegexNode::altern(RegexNode::altern(lit('a'), lit('b')), lit('c'))
        );
    }

    #[test]
    fn test_concat_binds_tighter_than_altern() {
        assert_eq!(
            parse_ok("ab|cd"),
            RegexNode::altern(
                RegexNode::concat(lit('a'), lit('b')),
                RegexNode::concat(lit('c'), lit('d'))
            )
        );
    }

    #[test]
    fn test_star_binds_tighter_than_concat() {
        assert_eq!(
            parse_ok("ab*"),
            RegexNode::concat(lit('a'), RegexNode::star(lit('b')))
        );
    }

    #[test]
    fn test_double_star() {
        assert_eq!(
            parse_ok("a**"),
            RegexNode::star(RegexNode::star(lit('a')))
        );
    }

    // --- Groups ---

    #[test]
    fn test_group_is_stripped() {
        assert_eq!(parse_ok("(a)"), lit('a'));
        assert_eq!(parse_ok("((a))"), lit('a'));
    }

    #[test]
    fn test_group_overrides_precedence() {
        assert_eq!(
            parse_ok("(a|b)*"),
            RegexNode::star(RegexNode::altern(lit('a'), lit('b')))
        );
        assert_eq!(
            parse_ok("(ab)|(ac)"),
            RegexNode::altern(
                RegexNode::concat(lit('a'), lit('b')),
                RegexNode::concat(lit('a'), lit('c'))
            )
        );
    }

    #[test]
    fn test_group_then_concat() {
        assert_eq!(
            parse_ok("a(bc)"),
            RegexNode::concat(lit('a'), RegexNode::concat(lit('b'), lit('c')))
        );
    }

    #[test]
    fn test_nested_groups_with_everything() {
        let tree = parse_ok("(coucou!(!)*)|(ab.d)");
        match tree {
            RegexNode::Altern(left, right) => {
                assert!(matches!(*left, RegexNode::Concat(..)));
                assert_eq!(
                    *right,
                    RegexNode::concat(
                        RegexNode::concat(RegexNode::concat(lit('a'), lit('b')), RegexNode::Dot),
                        lit('d')
                    )
                );
            }
            other => panic!("expected Altern, got {other}"),
        }
    }

    // --- Caching ---

    #[test]
    fn test_parser_caches_first_result() {
        let mut parser = Parser::new("a|bc*");
        assert!(!parser.is_parsed());

        let first: *const RegexNode = match parser.parse().unwrap() {
            RegexNode::Altern(left, _) => &**left,
            other => panic!("expected Altern, got {other}"),
        };
        assert!(parser.is_parsed());

        let tree = parser.parse().unwrap();
        assert_eq!(tree, &RegexNode::aho_ullman());
        let second: *const RegexNode = match tree {
            RegexNode::Altern(left, _) => &**left,
            other => panic!("expected Altern, got {other}"),
        };
        assert_eq!(first, second, "cached tree should be reused, not rebuilt");
    }

    #[test]
    fn test_set_pattern_clears_cache() {
        let mut parser = Parser::new("a");
        assert_eq!(parser.parse().unwrap(), &lit('a'));
        parser.set_pattern("b");
        assert!(!parser.is_parsed());
        assert_eq!(parser.pattern(), "b");
        assert_eq!(parser.parse().unwrap(), &lit('b'));
    }

    #[test]
    fn test_failed_parse_is_not_cached() {
        let mut parser = Parser::new("a|");
        assert_eq!(parser.parse(), Err(ParseError::MissingRightOperand));
        assert!(!parser.is_parsed());
    }

    // --- Errors ---

    #[test]
    fn test_empty() {
        assert_eq!(parse_err(""), ParseError::Empty);
    }

    #[test]
    fn test_missing_right_paren() {
        assert_eq!(parse_err("(a|b"), ParseError::MissingRightParen);
        assert_eq!(parse_err("a("), ParseError::MissingRightParen);
    }

    #[test]
    fn test_missing_left_paren() {
        assert_eq!(parse_err("a)"), ParseError::MissingLeftParen);
        assert_eq!(parse_err(")("), ParseError::MissingLeftParen);
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(parse_err("()"), ParseError::MalformedGroup);
        assert_eq!(parse_err("a()b"), ParseError::MalformedGroup);
    }

    #[test]
    fn test_star_without_operand() {
        assert_eq!(parse_err("*a"), ParseError::StarWithoutOperand);
        assert_eq!(parse_err("a|*"), ParseError::StarWithoutOperand);
        assert_eq!(parse_err("(*a)"), ParseError::StarWithoutOperand);
    }

    #[test]
    fn test_altern_operands() {
        assert_eq!(parse_err("a|"), ParseError::MissingRightOperand);
        assert_eq!(parse_err("|a"), ParseError::MissingLeftOperand);
        assert_eq!(parse_err("|"), ParseError::MissingLeftOperand);
        assert_eq!(parse_err("a||b"), ParseError::MissingRightOperand);
        assert_eq!(parse_err("(a|)b"), ParseError::MissingRightOperand);
    }

    #[test]
    fn test_unsupported_character() {
        assert_eq!(parse_err("a€"), ParseError::UnsupportedCharacter('€'));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::MissingRightParen.to_string(),
            "Error during parsing: missing ')'"
        );
        assert_eq!(
            ParseError::StarWithoutOperand.to_string(),
            "Error during parsing: '*' needs an operand"
        );
        assert_eq!(
            ParseError::MissingRightOperand.to_string(),
            "Error during parsing: missing right operand of '|'"
        );
    }

    // --- Operator classification ---

    #[test]
    fn test_operator_classes() {
        for c in ['.', '*', '|', '(', ')'] {
            assert!(is_operator(c), "expected operator: {c}");
        }
        assert!(!is_structural('.'));
        assert!(is_structural('*'));
        assert!(!is_operator('a'));
    }
}
