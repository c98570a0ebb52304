use std::fmt;
use std::str::FromStr;

use crate::error::ConstructionError;
use crate::span::Span;

/// Виды токенов - закрытое множество
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,          // x, _tmp1
    Number,              // 42, 3.14
    Operator,            // + - * /
    Assignment,          // =
    Parenthesis,         // ( )
    StatementTerminator, // ;
}

impl TokenKind {
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Identifier,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Assignment,
        TokenKind::Parenthesis,
        TokenKind::StatementTerminator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Assignment => "ASSIGNMENT",
            TokenKind::Parenthesis => "PARENTHESIS",
            TokenKind::StatementTerminator => "STATEMENT_TERMINATOR",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenKind {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConstructionError::UnknownTokenKind { name: s.to_string() })
    }
}

/// Токен: вид, лексема и позиция первого символа лексемы в исходнике.
///
/// `position` считается в символах, `span` - байтовый диапазон для срезов
/// исходной строки. После создания не изменяется.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    position: usize,
    span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        position: usize,
    ) -> Result<Self, ConstructionError> {
        let lexeme = lexeme.into();
        if lexeme.is_empty() {
            return Err(ConstructionError::EmptyLexeme);
        }
        // без исходника считаем, что символы и байты до лексемы совпадают
        let span = Span::new(position, position + lexeme.len());
        Ok(Self {
            kind,
            lexeme,
            position,
            span,
        })
    }

    /// Конструктор для нетипизированных данных: имя вида и знаковая позиция
    pub fn from_raw(kind: &str, lexeme: &str, position: i64) -> Result<Self, ConstructionError> {
        let kind = kind.parse()?;
        let position = usize::try_from(position)
            .map_err(|_| ConstructionError::NegativePosition { position })?;
        Self::new(kind, lexeme, position)
    }

    /// Для лексера: срез `span` всегда непустой
    pub(crate) fn scanned(kind: TokenKind, lexeme: &str, position: usize, span: Span) -> Self {
        debug_assert!(!lexeme.is_empty());
        Self {
            kind,
            lexeme: lexeme.to_string(),
            position,
            span,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Совпадает ли токен по виду и, если задана, по лексеме
    pub fn is(&self, kind: TokenKind, lexeme: Option<&str>) -> bool {
        self.kind == kind && lexeme.is_none_or(|expected| self.lexeme == expected)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={}, lexeme='{}', pos={}",
            self.kind, self.lexeme, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_lexeme() {
        assert_eq!(
            Token::new(TokenKind::Identifier, "", 0),
            Err(ConstructionError::EmptyLexeme)
        );
    }

    #[test]
    fn from_raw_validates_kind_and_position() {
        assert_eq!(
            Token::from_raw("KEYWORD", "if", 0),
            Err(ConstructionError::UnknownTokenKind { name: "KEYWORD".into() })
        );
        assert_eq!(
            Token::from_raw("NUMBER", "1", -3),
            Err(ConstructionError::NegativePosition { position: -3 })
        );

        let token = Token::from_raw("STATEMENT_TERMINATOR", ";", 7).unwrap();
        assert_eq!(token.kind(), TokenKind::StatementTerminator);
        assert_eq!(token.position(), 7);
    }

    #[test]
    fn debug_format() {
        let token = Token::new(TokenKind::Identifier, "x", 0).unwrap();
        assert_eq!(format!("{:?}", token), "type=IDENTIFIER, lexeme='x', pos=0");
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(kind.name().parse::<TokenKind>(), Ok(kind));
        }
    }

    #[test]
    fn span_covers_lexeme() {
        let token = Token::new(TokenKind::Number, "12.5", 4).unwrap();
        assert_eq!(token.span(), Span::new(4, 8));
    }
}
