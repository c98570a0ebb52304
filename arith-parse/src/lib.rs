//! Лексер, LL(1) парсер и свёртка в синтаксическое дерево для операторов
//! вида `identifier = expression ;`.
//!
//! ```text
//! Source → Lexer → (tokens, invalids) → Parser → parse tree → reduce → syntax tree
//! ```

pub mod error;
pub mod ir;
pub mod parser;
pub mod report;
pub mod span;

pub use error::{ConstructionError, Expected, ParseError, ReduceError, StatementError, SyntaxError};
pub use ir::{NodeType, NodeValue, ParseTree, evaluate, reduce};
pub use parser::{
    LexOutput, ParsedStatement, Parser, StatementResult, Token, TokenKind, lex, parse_source,
    parse_statements, split_statements,
};
