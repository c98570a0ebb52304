use tracing::debug;

use crate::error::{Expected, ParseError, SyntaxError};
use crate::ir::{NodeType, ParseTree};
use super::lexer::LexOutput;
use super::token::{Token, TokenKind};

// <statement>  -> IDENTIFIER '=' <expression> ';'
// <expression> -> <term> (('+' | '-') <term>)*
// <term>       -> <factor> (('*' | '/') <factor>)*
// <factor>     -> NUMBER | IDENTIFIER | '(' <expression> ')'

const ADDITIVE: &[&str] = &["+", "-"];
const MULTIPLICATIVE: &[&str] = &["*", "/"];

/// LL(1) парсер одного оператора присваивания
pub struct Parser<'t> {
    tokens: &'t [Token],
    /// Индекс следующего токена для чтения
    current_index: usize,
    /// Lookahead, `None` - конец ввода
    current_token: Option<&'t Token>,
}

impl<'t> Parser<'t> {
    /// Парсер над всем выводом лексера. Вход с недопустимыми символами не
    /// разбирается.
    pub fn new(output: &'t LexOutput) -> Result<Self, ParseError> {
        if !output.is_clean() {
            return Err(ParseError::LexicallyInvalid {
                count: output.invalids.len(),
            });
        }
        Ok(Self::from_slice(&output.tokens, 0))
    }

    /// Парсер над `tokens[offset..]`, без повторного лексического анализа.
    /// Конец среза считается концом ввода.
    pub fn from_slice(tokens: &'t [Token], offset: usize) -> Self {
        let mut parser = Self {
            tokens,
            current_index: offset,
            current_token: None,
        };
        parser.advance();
        parser
    }

    pub fn parse(mut self) -> Result<ParseTree, SyntaxError> {
        self.parse_statement()
    }

    pub fn parse_statement(&mut self) -> Result<ParseTree, SyntaxError> {
        debug!("parsing <statement>");
        let identifier = self.expect(TokenKind::Identifier, None)?;
        let assignment = self.expect(TokenKind::Assignment, Some("="))?;
        let expression = self.parse_expression()?;
        let terminator = self.expect(TokenKind::StatementTerminator, Some(";"))?;

        Ok(ParseTree::nonterminal(
            NodeType::Statement,
            vec![
                ParseTree::from_token(identifier),
                ParseTree::from_token(assignment),
                expression,
                ParseTree::from_token(terminator),
            ],
        ))
    }

    pub fn parse_expression(&mut self) -> Result<ParseTree, SyntaxError> {
        debug!("parsing <expression>");
        self.parse_chain(NodeType::Expression, ADDITIVE, Self::parse_term)
    }

    pub fn parse_term(&mut self) -> Result<ParseTree, SyntaxError> {
        debug!("parsing <term>");
        self.parse_chain(NodeType::Term, MULTIPLICATIVE, Self::parse_factor)
    }

    pub fn parse_factor(&mut self) -> Result<ParseTree, SyntaxError> {
        debug!("parsing <factor>");
        let children = if let Some(token) = self.take(TokenKind::Number, None) {
            vec![ParseTree::from_token(token)]
        } else if let Some(token) = self.take(TokenKind::Identifier, None) {
            vec![ParseTree::from_token(token)]
        } else if let Some(open) = self.take(TokenKind::Parenthesis, Some("(")) {
            let expression = self.parse_expression()?;
            let close = self.expect(TokenKind::Parenthesis, Some(")"))?;
            vec![
                ParseTree::from_token(open),
                expression,
                ParseTree::from_token(close),
            ]
        } else {
            return Err(SyntaxError::at(Expected::Operand, self.current_token));
        };

        Ok(ParseTree::nonterminal(NodeType::Factor, children))
    }

    /// operand (op operand)* - дети чередуются: операнд, оператор, операнд...
    fn parse_chain(
        &mut self,
        node_type: NodeType,
        operators: &[&str],
        operand: fn(&mut Self) -> Result<ParseTree, SyntaxError>,
    ) -> Result<ParseTree, SyntaxError> {
        let mut children = vec![operand(self)?];

        while let Some(op) = self.take_operator(operators) {
            children.push(ParseTree::from_token(op));
            children.push(operand(self)?);
        }

        Ok(ParseTree::nonterminal(node_type, children))
    }

    /// Проверяет lookahead, не сдвигаясь
    pub fn matches(&self, kind: TokenKind, lexeme: Option<&str>) -> bool {
        self.current_token
            .is_some_and(|token| token.is(kind, lexeme))
    }

    /// Съедает ожидаемый токен либо возвращает ошибку, не сдвигаясь
    pub fn expect(
        &mut self,
        kind: TokenKind,
        lexeme: Option<&'static str>,
    ) -> Result<&'t Token, SyntaxError> {
        match self.take(kind, lexeme) {
            Some(token) => Ok(token),
            None => Err(SyntaxError::at(
                Expected::Token { kind, lexeme },
                self.current_token,
            )),
        }
    }

    pub fn current_token(&self) -> Option<&'t Token> {
        self.current_token
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token.is_none()
    }

    fn take(&mut self, kind: TokenKind, lexeme: Option<&str>) -> Option<&'t Token> {
        if !self.matches(kind, lexeme) {
            return None;
        }
        let token = self.current_token;
        self.advance();
        token
    }

    fn take_operator(&mut self, operators: &[&str]) -> Option<&'t Token> {
        let op = operators
            .iter()
            .copied()
            .find(|op| self.matches(TokenKind::Operator, Some(*op)))?;
        self.take(TokenKind::Operator, Some(op))
    }

    fn advance(&mut self) {
        self.current_token = self.tokens.get(self.current_index);
        if self.current_token.is_some() {
            self.current_index += 1;
        }
    }
}
