//! Template scanner
//!
//! Splits raw template text into literal and `{{ ... }}` expression tokens.
//! Matching is textual and non-nested; an unterminated opener falls through
//! as literal text rather than failing.

/// Token kind produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal,
    Expression,
}

/// A scanned template fragment.
///
/// `source` is the exact substring consumed, delimiters included for
/// expressions; `lexeme` is the inner text for expressions and equals
/// `source` for literals. Concatenating every token's `source` in order
/// reconstructs the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub source: String,
}

impl Token {
    fn literal(text: &str) -> Self {
        Self {
            kind: TokenKind::Literal,
            lexeme: text.to_string(),
            source: text.to_string(),
        }
    }

    fn expression(lexeme: &str, source: &str) -> Self {
        Self {
            kind: TokenKind::Expression,
            lexeme: lexeme.to_string(),
            source: source.to_string(),
        }
    }
}

/// Scan a template into an ordered token sequence.
///
/// Empty literal spans are omitted, so `{{a}}{{b}}` yields exactly two
/// expression tokens.
pub fn scan(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            // Unterminated opener: everything left is literal text.
            break;
        };
        let close = open + 2 + close;

        if open > 0 {
            tokens.push(Token::literal(&rest[..open]));
        }
        tokens.push(Token::expression(&rest[open + 2..close], &rest[open..close + 2]));

        rest = &rest[close + 2..];
    }

    if !rest.is_empty() {
        tokens.push(Token::literal(rest));
    }

    tokens
}
