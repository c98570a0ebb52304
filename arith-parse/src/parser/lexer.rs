use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use tracing::{debug, trace};

use super::token::{Token, TokenKind};
use crate::span::Span;

/// Правила распознавания токенов.
///
/// Один экземпляр на процесс ([`PATTERNS`]), лексеры держат на него ссылку.
#[derive(Debug)]
pub struct Patterns {
    /// Односимвольные токены, проверяются строго в этом порядке
    single: &'static [(TokenKind, &'static [char])],
}

impl Patterns {
    /// `[A-Za-z_]`
    pub fn starts_identifier(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    /// `[A-Za-z0-9_]`
    pub fn continues_identifier(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    /// `\d`
    pub fn is_digit(&self, ch: char) -> bool {
        ch.is_ascii_digit()
    }

    pub fn classify_single(&self, ch: char) -> Option<TokenKind> {
        self.single
            .iter()
            .find(|(_, chars)| chars.contains(&ch))
            .map(|(kind, _)| *kind)
    }
}

pub static PATTERNS: Patterns = Patterns {
    single: &[
        (TokenKind::Operator, &['+', '-', '*', '/']),
        (TokenKind::Assignment, &['=']),
        (TokenKind::Parenthesis, &['(', ')']),
        (TokenKind::StatementTerminator, &[';']),
    ],
};

/// Символ, не подошедший ни под одно правило
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidChar {
    pub position: usize,
    pub character: char,
}

/// Результат лексического анализа одной строки
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub invalids: Vec<InvalidChar>,
}

impl LexOutput {
    pub fn is_clean(&self) -> bool {
        self.invalids.is_empty()
    }

    pub fn counts(&self) -> TokenCounts {
        TokenCounts::from_output(self)
    }
}

/// Ключ гистограммы: вид токена либо одна из двух сводных строк
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountKey {
    Kind(TokenKind),
    Total,
    Invalid,
}

impl fmt::Display for CountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountKey::Kind(kind) => write!(f, "{}", kind),
            CountKey::Total => f.write_str("TOTAL"),
            CountKey::Invalid => f.write_str("INVALID"),
        }
    }
}

/// Число токенов по видам, в порядке первого появления, плюс TOTAL и INVALID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCounts {
    by_kind: Vec<(TokenKind, usize)>,
    total: usize,
    invalid: usize,
}

impl TokenCounts {
    fn from_output(output: &LexOutput) -> Self {
        let mut by_kind: Vec<(TokenKind, usize)> = Vec::new();
        for token in &output.tokens {
            match by_kind.iter_mut().find(|(kind, _)| *kind == token.kind()) {
                Some((_, count)) => *count += 1,
                None => by_kind.push((token.kind(), 1)),
            }
        }
        Self {
            by_kind,
            total: output.tokens.len(),
            invalid: output.invalids.len(),
        }
    }

    /// `None` для вида, который ни разу не встретился
    pub fn get(&self, key: CountKey) -> Option<usize> {
        match key {
            CountKey::Kind(kind) => self
                .by_kind
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, count)| *count),
            CountKey::Total => Some(self.total),
            CountKey::Invalid => Some(self.invalid),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn invalid(&self) -> usize {
        self.invalid
    }

    pub fn iter(&self) -> impl Iterator<Item = (CountKey, usize)> + '_ {
        self.by_kind
            .iter()
            .map(|&(kind, count)| (CountKey::Kind(kind), count))
            .chain([
                (CountKey::Total, self.total),
                (CountKey::Invalid, self.invalid),
            ])
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Число уже прочитанных символов (не байтов)
    position: usize,
    patterns: &'static Patterns,
    output: LexOutput,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            patterns: &PATTERNS,
            output: LexOutput::default(),
        }
    }

    /// Сканирует строку целиком. Недопустимые символы записываются, а не
    /// прерывают разбор.
    pub fn lex(mut self) -> LexOutput {
        let patterns = self.patterns;

        while let Some(&(start, ch)) = self.chars.peek() {
            let position = self.position;
            if ch.is_whitespace() {
                self.bump();
            } else if patterns.starts_identifier(ch) {
                let end = self.eat_while(|c| patterns.continues_identifier(c));
                self.push(TokenKind::Identifier, position, Span::new(start, end));
            } else if patterns.is_digit(ch) {
                let end = self.scan_number();
                self.push(TokenKind::Number, position, Span::new(start, end));
            } else {
                self.bump();
                match patterns.classify_single(ch) {
                    Some(kind) => {
                        self.push(kind, position, Span::new(start, start + ch.len_utf8()))
                    }
                    None => {
                        trace!(position, character = %ch, "invalid character");
                        self.output.invalids.push(InvalidChar {
                            position,
                            character: ch,
                        });
                    }
                }
            }
        }

        debug!(
            tokens = self.output.tokens.len(),
            invalid = self.output.invalids.len(),
            "lexing finished"
        );
        self.output
    }

    /// `\d+(\.\d+)?` - точка берётся только если за ней есть цифра
    fn scan_number(&mut self) -> usize {
        let patterns = self.patterns;
        let end = self.eat_while(|c| patterns.is_digit(c));

        let mut rest = self.source[end..].chars();
        let fraction_follows =
            rest.next() == Some('.') && rest.next().is_some_and(|c| patterns.is_digit(c));
        if !fraction_follows {
            return end;
        }

        self.bump(); // точка
        self.eat_while(|c| patterns.is_digit(c))
    }

    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
        self.offset()
    }

    /// Байтовое смещение следующего символа
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |&(index, _)| index)
    }

    fn push(&mut self, kind: TokenKind, position: usize, span: Span) {
        let token = Token::scanned(kind, &self.source[span.start..span.end], position, span);
        trace!(?token, "token");
        self.output.tokens.push(token);
    }
}

/// Главная функция лексера - из текста в токены
pub fn lex(source: &str) -> LexOutput {
    Lexer::new(source).lex()
}
