//! Regular expression syntax.
//!
//! # Pattern syntax
//!
//! | Token  | Meaning                                   |
//! |--------|-------------------------------------------|
//! | `c`    | The byte `c` (any char below U+0100)      |
//! | `.`    | Any single byte                           |
//! | `XY`   | `X` followed by `Y`                       |
//! | `X\|Y` | `X` or `Y`                                |
//! | `X*`   | Zero or more `X`                          |
//! | `(X)`  | Grouping                                  |
//!
//! Binding strength, tightest first: `(…)`, `*`, concatenation, `|`.
//! Concatenation and `|` associate to the left. There are no escapes, so
//! the five operator characters cannot be matched literally.

pub mod ast;
pub mod parser;

pub use ast::RegexNode;
pub use parser::{ParseError, Parser, parse};
