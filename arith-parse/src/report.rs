//! Табличный вывод результатов лексера в консоль.
//!
//! Только читает данные ядра, ничего не вычисляет.

use std::io::{self, Write};

use crate::parser::lexer::{CountKey, InvalidChar, TokenCounts};
use crate::parser::token::Token;

pub fn write_lexical_errors(out: &mut impl Write, invalids: &[InvalidChar]) -> io::Result<()> {
    if invalids.is_empty() {
        return Ok(());
    }
    for invalid in invalids {
        writeln!(
            out,
            "  LexicalError at position {}: invalid character '{}'",
            invalid.position, invalid.character
        )?;
    }
    writeln!(out)
}

pub fn write_token_stream(out: &mut impl Write, tokens: &[Token]) -> io::Result<()> {
    writeln!(out, "Token Stream:")?;
    if tokens.is_empty() {
        return writeln!(out, "  (empty)\n");
    }
    writeln!(out, "  ┌────────────┬───────────────────────────┬─────────────────────┐")?;
    writeln!(out, "  │ Position   │ Token Type                │ Lexeme              │")?;
    writeln!(out, "  ├────────────┼───────────────────────────┼─────────────────────┤")?;
    for token in tokens {
        writeln!(
            out,
            "  │ {:<10} │ {:<25} │ {:<20}│",
            token.position(),
            token.kind().name(),
            format!("'{}'", token.lexeme())
        )?;
    }
    writeln!(out, "  └────────────┴───────────────────────────┴─────────────────────┘\n")
}

pub fn write_invalids(out: &mut impl Write, invalids: &[InvalidChar]) -> io::Result<()> {
    writeln!(out, "Invalid Characters:")?;
    if invalids.is_empty() {
        return writeln!(out, "  (none)\n");
    }
    writeln!(out, "  ┌────────────┬─────────────────────┐")?;
    writeln!(out, "  │ Position   │ Invalid Character   │")?;
    writeln!(out, "  ├────────────┼─────────────────────┤")?;
    for invalid in invalids {
        writeln!(
            out,
            "  │ {:<10} │ {:<20}│",
            invalid.position,
            format!("'{}'", invalid.character)
        )?;
    }
    writeln!(out, "  └────────────┴─────────────────────┘\n")
}

pub fn write_counts(out: &mut impl Write, counts: &TokenCounts) -> io::Result<()> {
    writeln!(out, "Token Counts:")?;
    writeln!(out, "  ┌───────────────────────────┬─────────┐")?;
    writeln!(out, "  │ Token Type                │ Count   │")?;
    writeln!(out, "  ├───────────────────────────┼─────────┤")?;
    for (key, count) in counts.iter() {
        if let CountKey::Kind(_) = key {
            writeln!(out, "  │ {:<25} │ {:<7} │", key.to_string(), count)?;
        }
    }
    writeln!(out, "  ├───────────────────────────┼─────────┤")?;
    writeln!(out, "  │ {:<25} │ {:<7} │", "TOTAL", counts.total())?;
    writeln!(out, "  │ {:<25} │ {:<7} │", "INVALID", counts.invalid())?;
    writeln!(out, "  └───────────────────────────┴─────────┘\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::lex;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn token_rows_are_aligned() {
        let output = lex("x = 12;");
        let text = render(|out| write_token_stream(out, &output.tokens));
        let rows: Vec<&str> = text.lines().filter(|l| l.contains('│')).collect();
        assert_eq!(
            rows[1],
            "  │ 0          │ IDENTIFIER                │ 'x'                 │"
        );
        let widths: Vec<usize> = rows.iter().map(|r| r.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn empty_sections() {
        let output = lex("");
        assert_eq!(
            render(|out| write_token_stream(out, &output.tokens)),
            "Token Stream:\n  (empty)\n\n"
        );
        assert_eq!(
            render(|out| write_invalids(out, &output.invalids)),
            "Invalid Characters:\n  (none)\n\n"
        );
        assert_eq!(render(|out| write_lexical_errors(out, &output.invalids)), "");
    }

    #[test]
    fn lexical_error_lines() {
        let output = lex("$x = 1;");
        assert_eq!(
            render(|out| write_lexical_errors(out, &output.invalids)),
            "  LexicalError at position 0: invalid character '$'\n\n"
        );
    }

    #[test]
    fn counts_table_ends_with_summary() {
        let output = lex("a = b;");
        let text = render(|out| write_counts(out, &output.counts()));
        assert!(text.contains("│ IDENTIFIER                │ 2       │"));
        assert!(text.contains("│ TOTAL                     │ 4       │"));
        assert!(text.contains("│ INVALID                   │ 0       │"));
    }
}
