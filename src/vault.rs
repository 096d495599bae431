//! External collaborator interfaces
//!
//! The engine never talks to storage directly: notes, the link graph, the
//! deck catalog, and the documents being edited are all reached through the
//! traits below. `Fs*` implementations back the CLI with a directory of
//! markdown files; `Mem*` implementations are the test doubles.

use crate::error::PromptError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

/// Outgoing link counts per note: note -> target -> count
pub type LinkMap = HashMap<String, HashMap<String, usize>>;

/// Read access to the note corpus
pub trait Vault: Send + Sync {
    /// All note display names, in stable (sorted) order.
    fn list_notes(&self) -> Vec<String>;

    /// The currently active note, if any.
    fn active_note(&self) -> Option<String>;

    /// Read a note's body by display name.
    fn read(&self, name: &str) -> Result<String, PromptError>;

    /// Resolve a raw link path to a display name, if it names a real note.
    fn display_name(&self, path: &str) -> Option<String>;
}

/// Read access to the vault's link graph
pub trait LinkGraph: Send + Sync {
    /// Links whose targets exist: note -> target -> count.
    fn resolved_links(&self) -> LinkMap;

    /// Dangling references: note -> raw target -> count.
    fn unresolved_links(&self) -> LinkMap;
}

/// The folder of deck documents
pub trait DeckCatalog: Send + Sync {
    /// Display names of all deck documents.
    fn list_deck_documents(&self) -> Vec<String>;

    /// Load a deck document's body and tags by display name.
    fn load(&self, name: &str) -> Result<(String, Vec<String>), PromptError>;
}

/// The document being edited during a reshuffle
pub trait DocumentStore: Send + Sync {
    fn read_document(&self, id: &str) -> Result<String, PromptError>;
    fn write_document(&self, id: &str, text: &str) -> Result<(), PromptError>;
}

static RE_WIKILINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]|#]+)(?:[|#][^\[\]]*)?\]\]").expect("wikilink regex"));

static RE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\w/-]+").expect("tag regex"));

/// Extract wikilink targets from a note body.
fn wikilink_targets(body: &str) -> Vec<String> {
    RE_WIKILINK
        .captures_iter(body)
        .map(|cap| cap[1].trim().to_string())
        .collect()
}

/// Extract `#tag` style tags from a document body.
pub fn extract_tags(body: &str) -> Vec<String> {
    RE_TAG
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Filesystem vault: every `.md` file under the root is a note.
///
/// The corpus and the link graph are scanned once at construction; the
/// snapshot never mutates afterwards.
pub struct FsVault {
    notes: HashMap<String, PathBuf>,
    order: Vec<String>,
    active: Option<String>,
    resolved: LinkMap,
    unresolved: LinkMap,
}

impl FsVault {
    pub fn open(root: &Path, active: Option<String>) -> Result<Self, PromptError> {
        let mut notes = HashMap::new();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    notes.insert(stem.to_string(), path.to_path_buf());
                }
            }
        }

        let mut order: Vec<String> = notes.keys().cloned().collect();
        order.sort();

        let mut resolved: LinkMap = HashMap::new();
        let mut unresolved: LinkMap = HashMap::new();

        for name in &order {
            let body = std::fs::read_to_string(&notes[name])?;
            for target in wikilink_targets(&body) {
                let bucket = if notes.contains_key(&target) {
                    resolved.entry(name.clone()).or_default()
                } else {
                    unresolved.entry(name.clone()).or_default()
                };
                *bucket.entry(target).or_insert(0) += 1;
            }
        }

        tracing::debug!(
            notes = order.len(),
            root = %root.display(),
            "scanned vault"
        );

        Ok(Self {
            notes,
            order,
            active,
            resolved,
            unresolved,
        })
    }
}

impl Vault for FsVault {
    fn list_notes(&self) -> Vec<String> {
        self.order.clone()
    }

    fn active_note(&self) -> Option<String> {
        self.active.clone()
    }

    fn read(&self, name: &str) -> Result<String, PromptError> {
        let path = self.notes.get(name).ok_or_else(|| PromptError::NoteNotFound {
            name: name.to_string(),
        })?;
        Ok(std::fs::read_to_string(path)?)
    }

    fn display_name(&self, path: &str) -> Option<String> {
        self.notes.contains_key(path).then(|| path.to_string())
    }
}

impl LinkGraph for FsVault {
    fn resolved_links(&self) -> LinkMap {
        self.resolved.clone()
    }

    fn unresolved_links(&self) -> LinkMap {
        self.unresolved.clone()
    }
}

/// Filesystem deck catalog: one deck per `.md` file in a flat folder
pub struct FsDeckCatalog {
    folder: PathBuf,
}

impl FsDeckCatalog {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    fn deck_path(&self, name: &str) -> PathBuf {
        self.folder.join(format!("{name}.md"))
    }
}

impl DeckCatalog for FsDeckCatalog {
    fn list_deck_documents(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.folder)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .collect();
        names.sort();
        names
    }

    fn load(&self, name: &str) -> Result<(String, Vec<String>), PromptError> {
        let path = self.deck_path(name);
        if !path.is_file() {
            return Err(PromptError::DeckNotFound {
                deck: name.to_string(),
            });
        }
        let body = std::fs::read_to_string(path)?;
        let tags = extract_tags(&body);
        Ok((body, tags))
    }
}

/// Filesystem document store: document ids are paths
pub struct FsDocumentStore;

impl DocumentStore for FsDocumentStore {
    fn read_document(&self, id: &str) -> Result<String, PromptError> {
        Ok(std::fs::read_to_string(id)?)
    }

    fn write_document(&self, id: &str, text: &str) -> Result<(), PromptError> {
        Ok(std::fs::write(id, text)?)
    }
}

/// In-memory vault for tests
#[derive(Default)]
pub struct MemVault {
    pub notes: HashMap<String, String>,
    pub active: Option<String>,
    pub resolved: LinkMap,
    pub unresolved: LinkMap,
}

impl MemVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(mut self, name: &str, body: &str) -> Self {
        self.notes.insert(name.to_string(), body.to_string());
        self
    }

    pub fn with_active(mut self, name: &str) -> Self {
        self.active = Some(name.to_string());
        self
    }

    pub fn with_unresolved(mut self, note: &str, target: &str) -> Self {
        *self
            .unresolved
            .entry(note.to_string())
            .or_default()
            .entry(target.to_string())
            .or_insert(0) += 1;
        self
    }

    pub fn with_resolved(mut self, note: &str, target: &str) -> Self {
        *self
            .resolved
            .entry(note.to_string())
            .or_default()
            .entry(target.to_string())
            .or_insert(0) += 1;
        self
    }
}

impl Vault for MemVault {
    fn list_notes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.notes.keys().cloned().collect();
        names.sort();
        names
    }

    fn active_note(&self) -> Option<String> {
        self.active.clone()
    }

    fn read(&self, name: &str) -> Result<String, PromptError> {
        self.notes
            .get(name)
            .cloned()
            .ok_or_else(|| PromptError::NoteNotFound {
                name: name.to_string(),
            })
    }

    fn display_name(&self, path: &str) -> Option<String> {
        self.notes.contains_key(path).then(|| path.to_string())
    }
}

impl LinkGraph for MemVault {
    fn resolved_links(&self) -> LinkMap {
        self.resolved.clone()
    }

    fn unresolved_links(&self) -> LinkMap {
        self.unresolved.clone()
    }
}

/// In-memory deck catalog for tests
#[derive(Default)]
pub struct MemDeckCatalog {
    decks: HashMap<String, String>,
}

impl MemDeckCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, name: &str, body: &str) -> Self {
        self.decks.insert(name.to_string(), body.to_string());
        self
    }
}

impl DeckCatalog for MemDeckCatalog {
    fn list_deck_documents(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decks.keys().cloned().collect();
        names.sort();
        names
    }

    fn load(&self, name: &str) -> Result<(String, Vec<String>), PromptError> {
        let body = self
            .decks
            .get(name)
            .cloned()
            .ok_or_else(|| PromptError::DeckNotFound {
                deck: name.to_string(),
            })?;
        let tags = extract_tags(&body);
        Ok((body, tags))
    }
}

/// In-memory document store for tests
#[derive(Default)]
pub struct MemDocumentStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, id: &str, text: &str) -> Self {
        self.docs
            .lock()
            .expect("document store lock")
            .insert(id.to_string(), text.to_string());
        self
    }
}

impl DocumentStore for MemDocumentStore {
    fn read_document(&self, id: &str) -> Result<String, PromptError> {
        self.docs
            .lock()
            .expect("document store lock")
            .get(id)
            .cloned()
            .ok_or_else(|| PromptError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no document '{id}'"),
            )))
    }

    fn write_document(&self, id: &str, text: &str) -> Result<(), PromptError> {
        self.docs
            .lock()
            .expect("document store lock")
            .insert(id.to_string(), text.to_string());
        Ok(())
    }
}
