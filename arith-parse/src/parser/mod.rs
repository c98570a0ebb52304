pub mod lexer;
pub mod parser;
pub mod token;

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::{ParseError, StatementError};
use crate::ir::{ParseTree, reduce};
pub use lexer::{LexOutput, Lexer, lex};
pub use parser::Parser;
pub use token::{Token, TokenKind};

/// Успешно разобранный оператор: синтаксическое дерево и дерево разбора
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub syntax_tree: ParseTree,
    pub parse_tree: ParseTree,
}

/// Результат одного оператора в многооператорном режиме
#[derive(Debug, Clone, PartialEq)]
pub struct StatementResult {
    /// Диапазон индексов токенов этого оператора
    pub range: Range<usize>,
    pub outcome: Result<ParsedStatement, StatementError>,
}

impl StatementResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// `(syntax_tree, parse_tree)`, оба `None` для неудачного оператора
    pub fn trees(&self) -> (Option<&ParseTree>, Option<&ParseTree>) {
        match &self.outcome {
            Ok(parsed) => (Some(&parsed.syntax_tree), Some(&parsed.parse_tree)),
            Err(_) => (None, None),
        }
    }
}

/// Делит поток токенов на операторы по `;` (включительно). Хвост без `;`
/// тоже становится отдельным оператором.
pub fn split_statements(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.is(TokenKind::StatementTerminator, Some(";")) {
            runs.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        runs.push(start..tokens.len());
    }

    runs
}

/// Разбирает каждый оператор независимо. Ошибка в одном операторе не
/// останавливает разбор остальных.
pub fn parse_statements(output: &LexOutput) -> Result<Vec<StatementResult>, ParseError> {
    if !output.is_clean() {
        return Err(ParseError::LexicallyInvalid {
            count: output.invalids.len(),
        });
    }

    let runs = split_statements(&output.tokens);
    debug!(statements = runs.len(), "parsing statements");

    let results = runs
        .into_iter()
        .map(|range| {
            let parser = Parser::from_slice(&output.tokens[..range.end], range.start);
            let outcome = parse_one(parser);
            if let Err(err) = &outcome {
                warn!(tokens = ?range, "{}", err);
            }
            StatementResult { range, outcome }
        })
        .collect();

    Ok(results)
}

fn parse_one(parser: Parser<'_>) -> Result<ParsedStatement, StatementError> {
    let parse_tree = parser.parse()?;
    let syntax_tree = reduce(&parse_tree)?;
    Ok(ParsedStatement {
        syntax_tree,
        parse_tree,
    })
}

/// Главная функция парсера - из текста в деревья по каждому оператору
pub fn parse_source(source: &str) -> Result<Vec<StatementResult>, ParseError> {
    let output = lex(source);
    parse_statements(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;

    #[test]
    fn splits_on_terminators() {
        let output = lex("x = 1 ; y = 2 ;");
        assert_eq!(split_statements(&output.tokens), vec![0..4, 4..8]);
    }

    #[test]
    fn keeps_unterminated_tail() {
        let output = lex("x = 1 ; y = 2");
        assert_eq!(split_statements(&output.tokens), vec![0..4, 4..7]);
        assert!(split_statements(&[]).is_empty());
    }

    #[test]
    fn two_successful_statements_in_order() {
        let results = parse_source("x = 1 ; y = 2 ;").unwrap();
        assert_eq!(results.len(), 2);
        let names: Vec<String> = results
            .iter()
            .map(|r| {
                let (syntax, _) = r.trees();
                syntax.unwrap().children()[0].label()
            })
            .collect();
        assert_eq!(names, vec!["identifier: x", "identifier: y"]);
    }

    #[test]
    fn failure_is_scoped_to_its_statement() {
        let results = parse_source("x = 1 ; y = ; z = 3;").unwrap();
        let ok: Vec<bool> = results.iter().map(StatementResult::is_ok).collect();
        assert_eq!(ok, vec![true, false, true]);
        assert_eq!(results[1].trees(), (None, None));
        assert!(matches!(
            &results[1].outcome,
            Err(StatementError::Syntax(SyntaxError::OperandMismatch { position: 12, .. }))
        ));
    }

    #[test]
    fn missing_final_terminator_reported() {
        let results = parse_source("x = 1 ; y = 2").unwrap();
        assert!(results[0].is_ok());
        assert!(matches!(
            &results[1].outcome,
            Err(StatementError::Syntax(SyntaxError::EndOfInput { .. }))
        ));
    }

    #[test]
    fn lexical_errors_block_parsing() {
        assert_eq!(
            parse_source("x = 1 @ 2;"),
            Err(ParseError::LexicallyInvalid { count: 1 })
        );
    }
}
