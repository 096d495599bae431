//! Promptdeck - prompt-deck templating and session engine
//!
//! Compiles `{{keyword: argument}}` templates, evaluates them against a
//! seeded pseudo-random source and pluggable resolvers, and round-trips the
//! result through a self-describing ```` ```prompt ```` code block.

pub mod deck;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod random;
pub mod scanner;
pub mod session;
pub mod vault;
pub mod wiki;
pub mod words;

pub use deck::{parse_file, Deck, DeckLine, DeckMetadata};
pub use error::{FixSuggestion, PromptError};
pub use evaluator::{Evaluator, LinkKind, ResolverContext, Value};
pub use expression::{parse_arguments, parse_expression, Argument, Element, Expression, Keyword, Parser, PARSER};
pub use random::{seeded_random, update_index};
pub use scanner::{scan, Token, TokenKind};
pub use session::{parse_code_block, render_code_block, PromptState, Session, QUICK_DECK};
pub use vault::{DeckCatalog, DocumentStore, LinkGraph, Vault};
pub use wiki::{HttpWikiClient, MockWikiClient, WikiClient};
