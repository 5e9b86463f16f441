//! AST types for regular expressions.

use std::fmt;

use super::parser::is_operator;

/// A parsed regular expression.
///
/// Every node is immutable once built. Parse-time markers (parentheses,
/// group wrappers) never appear here; see [`super::parser`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegexNode {
    /// One concrete byte.
    Literal(u8),
    /// `.`, any single byte.
    Dot,
    /// Implicit concatenation: `left` then `right`.
    Concat(Box<RegexNode>, Box<RegexNode>),
    /// `left|right`
    Altern(Box<RegexNode>, Box<RegexNode>),
    /// `child*`
    Star(Box<RegexNode>),
}

impl RegexNode {
    pub fn literal(ch: char) -> Self {
        Self::Literal(ch as u8)
    }

    pub fn concat(left: RegexNode, right: RegexNode) -> Self {
        Self::Concat(Box::new(left), Box::new(right))
    }

    pub fn altern(left: RegexNode, right: RegexNode) -> Self {
        Self::Altern(Box::new(left), Box::new(right))
    }

    pub fn star(child: RegexNode) -> Self {
        Self::Star(Box::new(child))
    }

    /// The tree for `a|bc*`, Aho & Ullman's running example.
    pub fn aho_ullman() -> Self {
        Self::altern(
            Self::literal('a'),
            Self::concat(Self::literal('b'), Self::star(Self::literal('c'))),
        )
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Dot => 1,
            Self::Star(child) => 1 + child.size(),
            Self::Concat(left, right) | Self::Altern(left, right) => {
                1 + left.size() + right.size()
            }
        }
    }

    /// Render the tree back into pattern syntax, fully parenthesized so that
    /// parsing the result yields a tree equal to `self`.
    ///
    /// Returns `None` if a literal is itself an operator character: the
    /// syntax has no escapes, so such a tree has no pattern form.
    pub fn to_pattern(&self) -> Option<String> {
        let mut out = String::new();
        self.write_pattern(&mut out)?;
        Some(out)
    }

    fn write_pattern(&self, out: &mut String) -> Option<()> {
        match self {
            Self::Literal(byte) => {
                let ch = char::from(*byte);
                if is_operator(ch) {
                    return None;
                }
                out.push(ch);
            }
            Self::Dot => out.push('.'),
            Self::Star(child) => {
                write_group(child, out)?;
                out.push('*');
            }
            Self::Concat(left, right) => {
                write_group(left, out)?;
                write_group(right, out)?;
            }
            Self::Altern(left, right) => {
                write_group(left, out)?;
                out.push('|');
                write_group(right, out)?;
            }
        }
        Some(())
    }
}

fn write_group(node: &RegexNode, out: &mut String) -> Option<()> {
    out.push('(');
    node.write_pattern(out)?;
    out.push(')');
    Some(())
}

/// Canonical bracket notation, e.g. `alt('a', cat('b', star('c')))`.
impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(byte) => write!(f, "'{}'", escape_byte(*byte)),
            Self::Dot => write!(f, "dot"),
            Self::Concat(left, right) => write!(f, "cat({left}, {right})"),
            Self::Altern(left, right) => write!(f, "alt({left}, {right})"),
            Self::Star(child) => write!(f, "star({child})"),
        }
    }
}

/// Printable ASCII as-is (quote and backslash escaped), everything else as `\xNN`.
pub fn escape_byte(byte: u8) -> String {
    match byte {
        b'\'' => "\\'".to_string(),
        b'\\' => "\\\\".to_string(),
        0x20..=0x7e => char::from(byte).to_string(),
        _ => format!("\\x{byte:02x}"),
    }
}
