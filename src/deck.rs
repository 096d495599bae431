//! Deck source parsing
//!
//! A deck is a markdown document whose list items are selectable prompt
//! lines. An optional `---` front matter block and a `#deck/ordered` tag
//! carry the shuffle setting.

use serde_yaml::Value;
use std::collections::HashMap;

/// Flat key/value view of a front matter block
type FrontMatter = HashMap<String, Value>;

/// One selectable prompt line with its nearest preceding section heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLine {
    pub section: String,
    pub text: String,
}

/// Deck-level metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckMetadata {
    pub shuffle: bool,
}

/// Immutable snapshot of a parsed deck document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub lines: Vec<DeckLine>,
    pub metadata: DeckMetadata,
}

impl Deck {
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split a leading `---` fenced front matter block off the body.
///
/// Returns the parsed mapping (empty when absent or unparseable) and the
/// remaining body. Unparseable YAML is tolerated, never an error.
fn split_front_matter(body: &str) -> (FrontMatter, &str) {
    let Some(after_open) = body.strip_prefix("---\n") else {
        return (FrontMatter::new(), body);
    };

    // Empty front matter: the closing fence follows immediately.
    if let Some(rest) = after_open.strip_prefix("---\n") {
        return (FrontMatter::new(), rest);
    }

    let Some(close) = after_open.find("\n---\n").map(|i| i + 1).or_else(|| {
        after_open
            .strip_suffix("\n---")
            .map(|inner| inner.len() + 1)
    }) else {
        return (FrontMatter::new(), body);
    };

    let yaml = &after_open[..close];
    let rest = after_open[close..]
        .strip_prefix("---\n")
        .or_else(|| after_open[close..].strip_prefix("---"))
        .unwrap_or("");

    let mapping = serde_yaml::from_str::<FrontMatter>(yaml).unwrap_or_default();

    (mapping, rest)
}

/// Resolve the shuffle flag.
///
/// A `shuffle` key in the front matter, if present at all, always wins over
/// the tag-derived default; otherwise `#deck/ordered` means ordered, and
/// decks shuffle by default.
fn resolve_shuffle(metadata: &FrontMatter, tags: &[String]) -> bool {
    if let Some(value) = metadata.get("shuffle") {
        return match value {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => false,
        };
    }

    !tags.iter().any(|tag| tag == "#deck/ordered")
}

/// Classify a heading line, returning its level and text.
fn match_heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    let text = rest.strip_prefix(char::is_whitespace)?;
    Some((hashes, text.trim_start()))
}

/// Classify a `- ` / `* ` list item line, returning its text.
fn match_list_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('*'))?;
    rest.strip_prefix(char::is_whitespace).map(|t| t.trim_start())
}

/// Parse a deck document body into prompt lines plus metadata.
///
/// Pure and deterministic given identical body and tags; no I/O. Level 2-6
/// headings set the current section (level 1 does not reset it); heading
/// lines and non-list lines never become prompt lines.
pub fn parse_file(body: &str, tags: &[String]) -> Deck {
    let (front_matter, body) = split_front_matter(body);
    let shuffle = resolve_shuffle(&front_matter, tags);

    let mut section_header = String::new();
    let mut lines = Vec::new();

    for line in body.lines() {
        if let Some((level, text)) = match_heading(line) {
            if level >= 2 {
                section_header = text.to_string();
            }
            continue;
        }

        if let Some(text) = match_list_item(line) {
            lines.push(DeckLine {
                section: section_header.clone(),
                text: text.to_string(),
            });
        }
    }

    Deck {
        lines,
        metadata: DeckMetadata { shuffle },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_tags() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn list_items_become_lines() {
        let deck = parse_file("- first\n* second\nprose\n- third\n", &no_tags());
        let texts: Vec<&str> = deck.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn sections_track_nearest_heading() {
        let body = "## Alpha\n- one\n### Beta\n- two\n# Title\n- three\n";
        let deck = parse_file(body, &no_tags());
        assert_eq!(deck.lines[0].section, "Alpha");
        assert_eq!(deck.lines[1].section, "Beta");
        // Level-1 headings do not reset the section.
        assert_eq!(deck.lines[2].section, "Beta");
    }

    #[test]
    fn lines_before_any_heading_have_empty_section() {
        let deck = parse_file("- early\n## Later\n- late\n", &no_tags());
        assert_eq!(deck.lines[0].section, "");
        assert_eq!(deck.lines[1].section, "Later");
    }

    #[test]
    fn shuffle_defaults_to_true() {
        let deck = parse_file("- a\n", &no_tags());
        assert!(deck.metadata.shuffle);
    }

    #[test]
    fn ordered_tag_disables_shuffle() {
        let tags = vec!["#deck/ordered".to_string()];
        let deck = parse_file("- a\n", &tags);
        assert!(!deck.metadata.shuffle);
    }

    #[test]
    fn front_matter_shuffle_overrides_tag() {
        let tags = vec!["#deck/ordered".to_string()];
        let deck = parse_file("---\nshuffle: true\n---\n- a\n", &tags);
        assert!(deck.metadata.shuffle);

        let deck = parse_file("---\nshuffle: false\n---\n- a\n", &no_tags());
        assert!(!deck.metadata.shuffle);
    }

    #[test]
    fn front_matter_shuffle_string_form() {
        let deck = parse_file("---\nshuffle: \"true\"\n---\n- a\n", &no_tags());
        assert!(deck.metadata.shuffle);

        let deck = parse_file("---\nshuffle: \"yes\"\n---\n- a\n", &no_tags());
        assert!(!deck.metadata.shuffle);
    }

    #[test]
    fn front_matter_is_stripped_from_body() {
        let deck = parse_file("---\ntitle: Decks\n---\n- only line\n", &no_tags());
        assert_eq!(deck.lines.len(), 1);
        assert_eq!(deck.lines[0].text, "only line");
    }

    #[test]
    fn unparseable_front_matter_is_tolerated() {
        let deck = parse_file("---\n: : :\n---\n- a\n", &no_tags());
        assert_eq!(deck.lines.len(), 1);
        assert!(deck.metadata.shuffle);
    }

    #[test]
    fn empty_body_yields_empty_deck() {
        let deck = parse_file("", &no_tags());
        assert!(deck.is_empty());
        assert!(deck.metadata.shuffle);
    }
}
