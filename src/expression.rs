//! Expression parsing on top of the scanner
//!
//! Turns expression tokens into keyword/argument pairs and caches compiled
//! templates for reuse. A token whose inner text is not a known keyword is
//! not an error: it falls back to literal treatment at render time.

use crate::scanner::{scan, Token, TokenKind};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// The six template keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Note,
    Current,
    Boat,
    Link,
    Words,
    Wiki,
}

impl Keyword {
    fn from_source(source: &str) -> Option<Self> {
        match source {
            "note" => Some(Keyword::Note),
            "current" => Some(Keyword::Current),
            "boat" => Some(Keyword::Boat),
            "link" => Some(Keyword::Link),
            "words" => Some(Keyword::Words),
            "wiki" => Some(Keyword::Wiki),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Note => "note",
            Keyword::Current => "current",
            Keyword::Boat => "boat",
            Keyword::Link => "link",
            Keyword::Words => "words",
            Keyword::Wiki => "wiki",
        }
    }
}

/// Parsed keyword argument.
///
/// `link` is set when the argument was a `[[...]]` reference; `text` always
/// holds the raw argument source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub source: String,
    pub text: String,
    pub link: Option<String>,
}

/// A fully parsed `{{keyword: argument}}` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub token: Token,
    pub keyword: Keyword,
    pub args: Option<Argument>,
}

impl Expression {
    /// The argument value evaluation consumes: the link target when the
    /// argument is a `[[...]]` reference, the raw text otherwise.
    pub fn effective_arg(&self) -> Option<&str> {
        let args = self.args.as_ref()?;
        if let Some(link) = &args.link {
            return Some(link);
        }
        if args.text.is_empty() {
            None
        } else {
            Some(&args.text)
        }
    }
}

/// One evaluable element of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Literal(Token),
    Expression(Expression),
}

/// Parse an argument string into an [`Argument`].
pub fn parse_arguments(argument_source: &str) -> Argument {
    let link = argument_source
        .strip_prefix("[[")
        .and_then(|inner| inner.strip_suffix("]]"))
        .map(|inner| inner.to_string());

    Argument {
        source: argument_source.to_string(),
        text: argument_source.to_string(),
        link,
    }
}

/// Parse an expression token's lexeme into keyword and argument.
///
/// Returns `None` for unknown keywords; the caller treats the token as a
/// literal in that case.
pub fn parse_expression(token: &Token) -> Option<Expression> {
    let (keyword_source, arguments_source) = match token.lexeme.split_once(':') {
        Some((keyword, args)) => (keyword.trim(), Some(args.trim())),
        None => (token.lexeme.trim(), None),
    };

    let keyword = Keyword::from_source(keyword_source)?;
    let args = arguments_source
        .filter(|s| !s.is_empty())
        .map(parse_arguments);

    Some(Expression {
        token: token.clone(),
        keyword,
        args,
    })
}

/// Template parser with a compiled-template cache.
///
/// Stateless apart from the cache; one shared instance serves the whole
/// process (see [`PARSER`]).
pub struct Parser {
    cache: DashMap<String, Arc<Vec<Element>>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Compile a template into evaluable elements (with caching).
    pub fn parse(&self, source: &str) -> Arc<Vec<Element>> {
        if let Some(cached) = self.cache.get(source) {
            return Arc::clone(&cached);
        }

        let elements = scan(source)
            .into_iter()
            .map(|token| match token.kind {
                TokenKind::Expression => match parse_expression(&token) {
                    Some(expression) => Element::Expression(expression),
                    // Unknown keyword: recover by keeping the raw text.
                    None => Element::Literal(token),
                },
                TokenKind::Literal => Element::Literal(token),
            })
            .collect();

        let elements = Arc::new(elements);
        self.cache.insert(source.to_string(), Arc::clone(&elements));
        elements
    }
}

/// Global parser instance
pub static PARSER: Lazy<Parser> = Lazy::new(Parser::new);
