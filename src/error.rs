//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Wiki request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deck is empty: no prompts found in '{deck}'.")]
    EmptyDeck { deck: String },

    #[error("Deck does not exist, file '{deck}' not found.")]
    DeckNotFound { deck: String },

    #[error("Vault has no notes to pick from")]
    EmptyVault,

    #[error("No active note is open")]
    NoActiveNote,

    #[error("Note '{name}' not found in vault")]
    NoteNotFound { name: String },

    #[error("No unresolved links anywhere in the vault")]
    EmptyLinkGraph,

    #[error("Note '{name}' has no outgoing links")]
    NoOutgoingLinks { name: String },

    #[error("Keyword '{keyword}' requires an argument")]
    MissingArgument { keyword: &'static str },

    #[error("Wiki search for '{query}' returned no results")]
    EmptySearch { query: String },

    #[error("Not a prompt code block: {details}")]
    BlockParse { details: String },

    #[error("No prompt block with index {index} found in document")]
    BlockNotFound { index: u64 },
}

impl FixSuggestion for PromptError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            PromptError::Io(_) => Some("Check file path and permissions"),
            PromptError::YamlParse(_) => Some("Check front matter syntax: indentation and quoting"),
            PromptError::Http(_) => Some("Check network connectivity (the wiki keyword needs it)"),
            PromptError::EmptyDeck { .. } => {
                Some("Add at least one '- ' or '* ' list item to the deck file")
            }
            PromptError::DeckNotFound { .. } => {
                Some("Verify the deck file exists in the decks folder")
            }
            PromptError::EmptyVault => Some("Point --notes at a directory containing .md files"),
            PromptError::NoActiveNote => Some("Pass --active to name the current note"),
            PromptError::NoteNotFound { .. } => Some("Check the note name given to the link keyword"),
            PromptError::EmptyLinkGraph => {
                Some("The boat keyword needs at least one [[dangling link]] in the vault")
            }
            PromptError::NoOutgoingLinks { .. } => {
                Some("The link keyword needs a note that links to something")
            }
            PromptError::MissingArgument { .. } => Some("Use the form {{keyword: argument}}"),
            PromptError::EmptySearch { .. } => Some("Try a broader search query"),
            PromptError::BlockParse { .. } => {
                Some("A prompt block starts with a 'deck: <name>' header line")
            }
            PromptError::BlockNotFound { .. } => {
                Some("Check the index header of the block you want to reshuffle")
            }
        }
    }
}
