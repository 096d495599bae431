//! Prompt session protocol
//!
//! Orchestrates deck parsing, template compilation, and evaluation, then
//! serializes the outcome as a fenced ```` ```prompt ```` code block that can
//! be parsed back and reshuffled later. Every failure is rendered as a
//! well-formed error block; nothing escapes the session boundary.

use crate::deck::{parse_file, Deck};
use crate::error::PromptError;
use crate::evaluator::{Evaluator, ResolverContext};
use crate::expression::PARSER;
use crate::random::{seeded_pick, update_index};
use crate::vault::{DeckCatalog, DocumentStore, LinkGraph, Vault};
use crate::wiki::WikiClient;
use regex::{NoExpand, Regex};

/// Sentinel deck name for deckless, user-authored prompts
pub const QUICK_DECK: &str = "~quick~";

/// The unit serialized into and parsed from a prompt code block.
///
/// `shuffle = None` marks a quick (deckless) prompt. Created by generation
/// (fresh index) or by parsing an existing block (recovered index); mutated
/// only by reshuffling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub deck: String,
    pub section: Option<String>,
    pub index: Option<u64>,
    pub shuffle: Option<bool>,
    pub source: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl PromptState {
    /// An ERROR leaf state: fresh index, message set, no result.
    fn error_state(deck: &str, shuffle: Option<bool>, message: String) -> Self {
        Self {
            deck: deck.to_string(),
            section: None,
            index: Some(update_index(None, 1)),
            shuffle,
            source: None,
            result: None,
            error: Some(message),
        }
    }

    pub fn is_quick(&self) -> bool {
        self.deck == QUICK_DECK
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Serialize a prompt state into a fenced code block.
///
/// Header lines come in fixed order (`deck`, `section`, `index`, `shuffle`);
/// a null field's line is omitted entirely, never emitted empty.
pub fn render_code_block(state: &PromptState) -> String {
    let mut headers = format!("deck: {}\n", state.deck);
    if let Some(section) = &state.section {
        headers.push_str(&format!("section: {section}\n"));
    }
    if let Some(index) = state.index {
        headers.push_str(&format!("index: {index}\n"));
    }
    if let Some(shuffle) = state.shuffle {
        headers.push_str(&format!("shuffle: {shuffle}\n"));
    }

    let body = match (&state.error, &state.result) {
        (Some(error), _) => format!("[Error]: {error}"),
        (None, Some(result)) => result.clone(),
        (None, None) => String::new(),
    };

    format!("```prompt\n{headers}\n{body}\n\n```")
}

/// Parse a code block's inner text back into a prompt state.
///
/// The inverse of [`render_code_block`]: an absent `index` header means
/// quick/unset, an absent `shuffle` header stays `None`, and the trailing
/// body (trimmed) becomes `source`.
pub fn parse_code_block(block_source: &str) -> Result<PromptState, PromptError> {
    let inner = block_source
        .trim_start_matches("```prompt\n")
        .trim_end_matches("```");

    let mut lines = inner.lines().peekable();

    let deck = lines
        .next()
        .and_then(|line| line.strip_prefix("deck: "))
        .ok_or_else(|| PromptError::BlockParse {
            details: "missing 'deck:' header".to_string(),
        })?
        .to_string();

    let mut take_header = |key: &str| -> Option<String> {
        let value = lines
            .peek()
            .and_then(|line| line.strip_prefix(key))
            .map(|v| v.to_string())?;
        lines.next();
        Some(value)
    };

    let section = take_header("section: ");
    let index = take_header("index: ").and_then(|v| v.trim().parse().ok());
    let shuffle = take_header("shuffle: ").map(|v| v.trim() == "true");

    let body: Vec<&str> = lines.collect();
    let source = body.join("\n").trim().to_string();

    Ok(PromptState {
        deck,
        section,
        index,
        shuffle,
        source: (!source.is_empty()).then_some(source),
        result: None,
        error: None,
    })
}

/// Build the regex matching one whole fenced prompt block by exact index.
fn block_regex(index: u64) -> Regex {
    let pattern = format!(
        r"(?m)^```prompt\n(deck: ?(.*?)\n)(section: ?(.*?)\n)?(index: ?{index}\n)(shuffle: ?(.*?)\n)?\n*((?:.+\n)*)\n*```$"
    );
    Regex::new(&pattern).expect("prompt block regex")
}

/// A prompt session over one set of external collaborators.
///
/// Holds no per-prompt state; seed and deck travel through each call, so a
/// single session can serve many documents.
pub struct Session<'a> {
    vault: &'a dyn Vault,
    links: &'a dyn LinkGraph,
    wiki: &'a dyn WikiClient,
    decks: &'a dyn DeckCatalog,
    evaluator: Evaluator,
}

impl<'a> Session<'a> {
    pub fn new(
        vault: &'a dyn Vault,
        links: &'a dyn LinkGraph,
        wiki: &'a dyn WikiClient,
        decks: &'a dyn DeckCatalog,
    ) -> Self {
        Self {
            vault,
            links,
            wiki,
            decks,
            evaluator: Evaluator::new(),
        }
    }

    /// Compile and evaluate one template, joining value texts into the
    /// rendered prompt.
    pub async fn run_template(&self, source: &str, seed: u64) -> Result<String, PromptError> {
        let elements = PARSER.parse(source);
        let ctx = ResolverContext {
            vault: self.vault,
            links: self.links,
            wiki: self.wiki,
        };
        let values = self
            .evaluator
            .evaluate(&elements, &seed.to_string(), &ctx)
            .await?;

        Ok(values.iter().map(|v| v.text.as_str()).collect())
    }

    /// Build a quick (deckless) prompt state. The body is user-authored and
    /// supplied later, directly in the document.
    pub fn quick_prompt(&self, current_index: Option<u64>) -> PromptState {
        PromptState {
            deck: QUICK_DECK.to_string(),
            section: None,
            index: Some(update_index(current_index, 1)),
            shuffle: None,
            source: None,
            result: None,
            error: None,
        }
    }

    /// Generate a prompt from an already-parsed deck.
    ///
    /// Never fails: an empty deck or an evaluation fault comes back as an
    /// ERROR state with a human-readable message.
    pub async fn generate(
        &self,
        deck_name: &str,
        deck: &Deck,
        current_index: Option<u64>,
    ) -> PromptState {
        let shuffle = deck.metadata.shuffle;
        let size = deck.size();

        if size == 0 {
            return PromptState::error_state(
                deck_name,
                Some(shuffle),
                format!("Deck is empty: no prompts found in '{deck_name}'."),
            );
        }

        let align = if shuffle { 1 } else { size as u64 };
        let index = update_index(current_index, align);

        let line = if shuffle {
            let pick = seeded_pick(&index.to_string(), size).expect("non-empty deck");
            &deck.lines[pick]
        } else {
            &deck.lines[(index % size as u64) as usize]
        };

        match self.run_template(&line.text, index).await {
            Ok(result) => PromptState {
                deck: deck_name.to_string(),
                section: Some(line.section.clone()),
                index: Some(index),
                shuffle: Some(shuffle),
                source: Some(line.text.clone()),
                result: Some(result),
                error: None,
            },
            Err(fault) => {
                tracing::warn!(deck = deck_name, %fault, "prompt evaluation failed");
                PromptState::error_state(
                    deck_name,
                    Some(shuffle),
                    format!("Prompt from deck '{deck_name}' failed to run."),
                )
            }
        }
    }

    /// Load a deck from the catalog by display name and generate from it.
    pub async fn generate_from_deck(
        &self,
        deck_name: &str,
        current_index: Option<u64>,
    ) -> PromptState {
        let (body, tags) = match self.decks.load(deck_name) {
            Ok(loaded) => loaded,
            Err(fault) => {
                tracing::warn!(deck = deck_name, %fault, "deck load failed");
                return PromptState::error_state(
                    deck_name,
                    None,
                    format!("Deck does not exist, file '{deck_name}' not found."),
                );
            }
        };

        let deck = parse_file(&body, &tags);
        self.generate(deck_name, &deck, current_index).await
    }

    /// Reshuffle the prompt block with the given index inside a document.
    ///
    /// Quick prompts get their `index:` header incremented in place, leaving
    /// the user-authored body untouched. Deck prompts are regenerated from
    /// their deck at the current index and the whole block is replaced. The
    /// modified document is written back through the store.
    pub async fn reshuffle(
        &self,
        docs: &dyn DocumentStore,
        document_id: &str,
        index: u64,
    ) -> Result<PromptState, PromptError> {
        let contents = docs.read_document(document_id)?;

        let re_block = block_regex(index);
        let block = re_block
            .find(&contents)
            .ok_or(PromptError::BlockNotFound { index })?;
        let state = parse_code_block(block.as_str())?;

        if state.is_quick() {
            let re_index =
                Regex::new(&format!(r"(?m)index: ?{index}\n")).expect("index header regex");
            let next = index + 1;
            let modified = re_index.replace(&contents, format!("index: {next}\n"));
            docs.write_document(document_id, &modified)?;

            return Ok(PromptState {
                index: Some(next),
                ..state
            });
        }

        let next_state = if self.decks.list_deck_documents().contains(&state.deck) {
            self.generate_from_deck(&state.deck, Some(index)).await
        } else {
            PromptState::error_state(
                &state.deck,
                state.shuffle,
                format!("Deck does not exist, file '{}' not found.", state.deck),
            )
        };

        let replacement = render_code_block(&next_state);
        let modified = re_block.replace(&contents, NoExpand(&replacement));
        docs.write_document(document_id, &modified)?;

        Ok(next_state)
    }
}
