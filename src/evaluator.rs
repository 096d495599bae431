//! Expression evaluation
//!
//! Dispatches parsed expressions to their keyword resolvers. Evaluation is
//! strictly sequential: position `i` draws from the derived seed
//! `"{seed}-{i}"`, so two runs with the same top-level seed and the same
//! external state produce identical output, and no two positions ever share
//! a random draw.

use crate::error::PromptError;
use crate::expression::{Element, Expression, Keyword};
use crate::random::seeded_pick;
use crate::vault::{LinkGraph, Vault};
use crate::wiki::WikiClient;
use crate::words;
use std::collections::BTreeSet;

/// Navigable target classification of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
}

/// One evaluated output unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub text: String,
    pub link: Option<LinkKind>,
}

impl Value {
    fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    fn internal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(LinkKind::Internal),
        }
    }

    fn external(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(LinkKind::External),
        }
    }
}

/// External state the resolvers act against, passed per call
pub struct ResolverContext<'a> {
    pub vault: &'a dyn Vault,
    pub links: &'a dyn LinkGraph,
    pub wiki: &'a dyn WikiClient,
}

/// Stateless expression evaluator.
///
/// Seed and context travel as call parameters, never as fields, so one
/// instance can serve concurrent evaluations without interference.
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate compiled template elements in order.
    pub async fn evaluate(
        &self,
        elements: &[Element],
        seed: &str,
        ctx: &ResolverContext<'_>,
    ) -> Result<Vec<Value>, PromptError> {
        let mut values = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let position_seed = format!("{seed}-{index}");

            let value = match element {
                Element::Literal(token) => Value::literal(&token.source),
                Element::Expression(expression) => {
                    self.evaluate_expression(expression, &position_seed, ctx)
                        .await?
                }
            };

            values.push(value);
        }

        Ok(values)
    }

    async fn evaluate_expression(
        &self,
        expression: &Expression,
        seed: &str,
        ctx: &ResolverContext<'_>,
    ) -> Result<Value, PromptError> {
        let arg = expression.effective_arg();

        tracing::debug!(
            keyword = expression.keyword.as_str(),
            arg,
            seed,
            "resolving expression"
        );

        match expression.keyword {
            Keyword::Note => self.note(seed, ctx),
            Keyword::Current => self.current(ctx),
            Keyword::Boat => self.boat(seed, ctx),
            Keyword::Link => self.link(arg, seed, ctx),
            Keyword::Words => Ok(self.words(arg)),
            Keyword::Wiki => self.wiki(arg, seed, ctx).await,
        }
    }

    /// `note`: one note picked uniformly from the whole vault.
    fn note(&self, seed: &str, ctx: &ResolverContext<'_>) -> Result<Value, PromptError> {
        let notes = ctx.vault.list_notes();
        let index = seeded_pick(seed, notes.len()).ok_or(PromptError::EmptyVault)?;
        Ok(Value::internal(&notes[index]))
    }

    /// `current`: the active note's display name.
    fn current(&self, ctx: &ResolverContext<'_>) -> Result<Value, PromptError> {
        let name = ctx.vault.active_note().ok_or(PromptError::NoActiveNote)?;
        Ok(Value::internal(name))
    }

    /// `boat`: one target from the union of all unresolved links.
    ///
    /// A single uniform draw over the flattened union set; an empty link
    /// graph fails explicitly instead of retrying forever.
    fn boat(&self, seed: &str, ctx: &ResolverContext<'_>) -> Result<Value, PromptError> {
        let targets: BTreeSet<String> = ctx
            .links
            .unresolved_links()
            .into_values()
            .flat_map(|targets| targets.into_keys())
            .collect();

        let targets: Vec<String> = targets.into_iter().collect();
        let index = seeded_pick(seed, targets.len()).ok_or(PromptError::EmptyLinkGraph)?;
        Ok(Value::internal(&targets[index]))
    }

    /// `link <note>`: one outgoing link of the named note, resolved or not.
    fn link(
        &self,
        arg: Option<&str>,
        seed: &str,
        ctx: &ResolverContext<'_>,
    ) -> Result<Value, PromptError> {
        let name = arg.ok_or(PromptError::MissingArgument { keyword: "link" })?;

        if ctx.vault.display_name(name).is_none() {
            return Err(PromptError::NoteNotFound {
                name: name.to_string(),
            });
        }

        let mut paths: BTreeSet<String> = BTreeSet::new();
        if let Some(resolved) = ctx.links.resolved_links().remove(name) {
            paths.extend(resolved.into_keys());
        }
        if let Some(unresolved) = ctx.links.unresolved_links().remove(name) {
            paths.extend(unresolved.into_keys());
        }

        let paths: Vec<String> = paths.into_iter().collect();
        let index = seeded_pick(seed, paths.len()).ok_or_else(|| PromptError::NoOutgoingLinks {
            name: name.to_string(),
        })?;
        let path = &paths[index];

        // A resolvable target renders as its display name, a dangling one
        // as the raw path.
        let text = ctx.vault.display_name(path).unwrap_or_else(|| path.clone());
        Ok(Value::internal(text))
    }

    /// `words <n>`: n random dictionary words, deliberately unseeded.
    fn words(&self, arg: Option<&str>) -> Value {
        Value::literal(words::random_words(words::parse_count(arg)))
    }

    /// `wiki [query]`: a seeded pick over search results, or a random page.
    async fn wiki(
        &self,
        arg: Option<&str>,
        seed: &str,
        ctx: &ResolverContext<'_>,
    ) -> Result<Value, PromptError> {
        let title = match arg {
            Some(query) => {
                let titles = ctx.wiki.search(query).await?;
                let index =
                    seeded_pick(seed, titles.len()).ok_or_else(|| PromptError::EmptySearch {
                        query: query.to_string(),
                    })?;
                titles[index].clone()
            }
            None => ctx.wiki.random_title().await?,
        };

        Ok(Value::external(title))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
