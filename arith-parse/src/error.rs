use std::fmt;

use thiserror::Error;

use crate::ir::NodeType;
use crate::parser::token::{Token, TokenKind};

/// Ошибки конструирования токенов и узлов дерева.
///
/// Лексер и парсер сами такие ошибки не порождают: они нужны для данных,
/// пришедших снаружи в нетипизированном виде.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Invalid token type: {name}")]
    UnknownTokenKind { name: String },

    #[error("Invalid node type: {name}")]
    UnknownNodeType { name: String },

    #[error("Invalid position value: {position}")]
    NegativePosition { position: i64 },

    #[error("Invalid lexeme: must not be empty")]
    EmptyLexeme,
}

/// Что ожидал парсер в момент ошибки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// Конкретный вид токена, опционально с точной лексемой
    Token {
        kind: TokenKind,
        lexeme: Option<&'static str>,
    },
    /// Начало множителя: NUMBER, IDENTIFIER или '('
    Operand,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token { lexeme: Some(lexeme), .. } => write!(f, "'{}'", lexeme),
            Expected::Token { kind, lexeme: None } => write!(f, "{}", kind),
            Expected::Operand => write!(f, "NUMBER, IDENTIFIER, or '('"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("SyntaxError at end of input: expected {expected} before end of input")]
    EndOfInput { expected: Expected },

    #[error("SyntaxError at position {position}: expected {expected} before '{found}'")]
    Mismatch {
        position: usize,
        expected: Expected,
        found: String,
    },

    #[error("SyntaxError at position {position}: unexpected '{found}'")]
    Unexpected {
        position: usize,
        expected: Expected,
        found: String,
    },

    /// Ожидался множитель, но ввод закончился
    #[error("SyntaxError at end of input: expected {}.", Expected::Operand)]
    OperandAtEnd,

    /// Ожидался множитель, найден другой токен
    #[error("SyntaxError at position {position}: expected {}, found '{found}'", Expected::Operand)]
    OperandMismatch { position: usize, found: String },
}

impl SyntaxError {
    /// Строит ошибку по ожиданию и фактическому lookahead (`None` - конец ввода)
    pub fn at(expected: Expected, found: Option<&Token>) -> Self {
        let Some(token) = found else {
            return match expected {
                Expected::Operand => SyntaxError::OperandAtEnd,
                Expected::Token { .. } => SyntaxError::EndOfInput { expected },
            };
        };

        let unexpected = match expected {
            Expected::Token { kind, .. } => kind == TokenKind::StatementTerminator,
            Expected::Operand => token.is(TokenKind::Parenthesis, Some(")")),
        };

        let position = token.position();
        let found = token.lexeme().to_string();
        match (unexpected, expected) {
            (true, _) => SyntaxError::Unexpected { position, expected, found },
            (false, Expected::Operand) => SyntaxError::OperandMismatch { position, found },
            (false, Expected::Token { .. }) => SyntaxError::Mismatch { position, expected, found },
        }
    }

    /// Позиция ошибочного токена, `None` для конца ввода
    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::EndOfInput { .. } | SyntaxError::OperandAtEnd => None,
            SyntaxError::Mismatch { position, .. }
            | SyntaxError::Unexpected { position, .. }
            | SyntaxError::OperandMismatch { position, .. } => Some(*position),
        }
    }

    pub fn expected(&self) -> Expected {
        match self {
            SyntaxError::EndOfInput { expected }
            | SyntaxError::Mismatch { expected, .. }
            | SyntaxError::Unexpected { expected, .. } => *expected,
            SyntaxError::OperandAtEnd | SyntaxError::OperandMismatch { .. } => Expected::Operand,
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            SyntaxError::EndOfInput { .. } | SyntaxError::OperandAtEnd => None,
            SyntaxError::Mismatch { found, .. }
            | SyntaxError::Unexpected { found, .. }
            | SyntaxError::OperandMismatch { found, .. } => Some(found),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse lexically invalid input ({count} invalid characters)")]
    LexicallyInvalid { count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    #[error("Only <statement> parse trees are supported, got {node_type}")]
    NotAStatement { node_type: NodeType },

    #[error("Malformed {node_type} node: {reason}")]
    Malformed {
        node_type: NodeType,
        reason: &'static str,
    },
}

/// Ошибка одного оператора в многооператорном режиме
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Reduce(#[from] ReduceError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unbound identifier: {name}")]
    Unbound { name: String },

    #[error("Invalid number literal: {literal}")]
    BadNumber { literal: String },

    #[error("Cannot evaluate {node_type} node")]
    NotEvaluable { node_type: NodeType },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(position: usize) -> Token {
        Token::new(TokenKind::Number, "1", position).unwrap()
    }

    #[test]
    fn operand_errors_name_the_found_token() {
        let token = Token::new(TokenKind::Assignment, "=", 3).unwrap();
        let err = SyntaxError::at(Expected::Operand, Some(&token));
        assert_eq!(
            err.to_string(),
            "SyntaxError at position 3: expected NUMBER, IDENTIFIER, or '(', found '='"
        );
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.expected(), Expected::Operand);
        assert_eq!(err.found(), Some("="));
    }

    #[test]
    fn operand_at_end_of_input() {
        let err = SyntaxError::at(Expected::Operand, None);
        assert_eq!(err, SyntaxError::OperandAtEnd);
        assert_eq!(
            err.to_string(),
            "SyntaxError at end of input: expected NUMBER, IDENTIFIER, or '('."
        );
        assert_eq!(err.position(), None);
        assert_eq!(err.found(), None);
    }

    #[test]
    fn closing_paren_in_operand_position_is_unexpected() {
        let token = Token::new(TokenKind::Parenthesis, ")", 5).unwrap();
        let err = SyntaxError::at(Expected::Operand, Some(&token));
        assert_eq!(err.to_string(), "SyntaxError at position 5: unexpected ')'");
    }

    #[test]
    fn token_expectations_keep_before_wording() {
        let expected = Expected::Token {
            kind: TokenKind::Assignment,
            lexeme: Some("="),
        };
        assert_eq!(
            SyntaxError::at(expected, Some(&number(2))).to_string(),
            "SyntaxError at position 2: expected '=' before '1'"
        );
        assert_eq!(
            SyntaxError::at(expected, None).to_string(),
            "SyntaxError at end of input: expected '=' before end of input"
        );
    }

    #[test]
    fn cli_error_wraps_parse_error() {
        let err = CliError::from(ParseError::LexicallyInvalid { count: 2 });
        assert!(matches!(err, CliError::Parse(ParseError::LexicallyInvalid { count: 2 })));
        assert_eq!(
            err.to_string(),
            "cannot parse lexically invalid input (2 invalid characters)"
        );
    }
}
