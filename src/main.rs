//! Promptdeck CLI - generate, inspect, and reshuffle prompt blocks

use clap::{Parser, Subcommand};
use colored::Colorize;
use promptdeck::error::{FixSuggestion, PromptError};
use promptdeck::session::{render_code_block, Session};
use promptdeck::vault::{FsDeckCatalog, FsDocumentStore, FsVault};
use promptdeck::wiki::{HttpWikiClient, MockWikiClient, WikiClient};
use promptdeck::{parse_file, vault::extract_tags};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(about = "Prompt-deck templating and session engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a prompt block from a deck file
    Generate {
        /// Path to the deck .md file
        deck: PathBuf,

        /// Vault directory for note/link resolvers (default: deck's folder)
        #[arg(long)]
        notes: Option<PathBuf>,

        /// Name of the currently active note
        #[arg(long)]
        active: Option<String>,

        /// Reuse an existing index instead of drawing a fresh one
        #[arg(long)]
        index: Option<u64>,

        /// Answer wiki lookups with canned titles (offline mode)
        #[arg(long)]
        mock_wiki: bool,
    },

    /// Emit an empty quick-prompt block
    Quick {
        /// Reuse an existing index instead of drawing a fresh one
        #[arg(long)]
        index: Option<u64>,
    },

    /// Reshuffle the prompt block with the given index inside a document
    Reshuffle {
        /// Path to the document containing the block
        document: PathBuf,

        /// Index header of the block to reshuffle
        #[arg(long)]
        index: u64,

        /// Folder of deck documents (default: the document's folder)
        #[arg(long)]
        decks: Option<PathBuf>,

        /// Vault directory for note/link resolvers (default: decks folder)
        #[arg(long)]
        notes: Option<PathBuf>,

        /// Name of the currently active note
        #[arg(long)]
        active: Option<String>,

        /// Answer wiki lookups with canned titles (offline mode)
        #[arg(long)]
        mock_wiki: bool,
    },

    /// Parse a deck file and report its lines and metadata
    Inspect {
        /// Path to the deck .md file
        deck: PathBuf,
    },
}

fn wiki_client(mock: bool) -> Box<dyn WikiClient> {
    if mock {
        Box::new(MockWikiClient::new())
    } else {
        Box::new(HttpWikiClient::new())
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn deck_name(path: &Path) -> Result<String, PromptError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| PromptError::DeckNotFound {
            deck: path.display().to_string(),
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            deck,
            notes,
            active,
            index,
            mock_wiki,
        } => generate(&deck, notes, active, index, mock_wiki).await,
        Commands::Quick { index } => quick(index),
        Commands::Reshuffle {
            document,
            index,
            decks,
            notes,
            active,
            mock_wiki,
        } => reshuffle(&document, index, decks, notes, active, mock_wiki).await,
        Commands::Inspect { deck } => inspect(&deck),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn generate(
    deck_path: &Path,
    notes: Option<PathBuf>,
    active: Option<String>,
    index: Option<u64>,
    mock_wiki: bool,
) -> Result<(), PromptError> {
    let folder = parent_dir(deck_path);
    let vault = FsVault::open(&notes.unwrap_or_else(|| folder.clone()), active)?;
    let wiki = wiki_client(mock_wiki);
    let decks = FsDeckCatalog::new(folder);

    let session = Session::new(&vault, &vault, wiki.as_ref(), &decks);
    let state = session
        .generate_from_deck(&deck_name(deck_path)?, index)
        .await;

    println!("{}", render_code_block(&state));
    Ok(())
}

fn quick(index: Option<u64>) -> Result<(), PromptError> {
    let vault = promptdeck::vault::MemVault::new();
    let wiki = MockWikiClient::new();
    let decks = promptdeck::vault::MemDeckCatalog::new();

    let session = Session::new(&vault, &vault, &wiki, &decks);
    println!("{}", render_code_block(&session.quick_prompt(index)));
    Ok(())
}

async fn reshuffle(
    document: &Path,
    index: u64,
    decks: Option<PathBuf>,
    notes: Option<PathBuf>,
    active: Option<String>,
    mock_wiki: bool,
) -> Result<(), PromptError> {
    let decks_folder = decks.unwrap_or_else(|| parent_dir(document));
    let vault = FsVault::open(&notes.unwrap_or_else(|| decks_folder.clone()), active)?;
    let wiki = wiki_client(mock_wiki);
    let catalog = FsDeckCatalog::new(decks_folder);

    let session = Session::new(&vault, &vault, wiki.as_ref(), &catalog);
    let state = session
        .reshuffle(&FsDocumentStore, &document.display().to_string(), index)
        .await?;

    if let Some(error) = &state.error {
        println!("{} {}", "!".yellow(), error);
    } else {
        println!(
            "{} Reshuffled '{}' to index {}",
            "✓".green(),
            state.deck,
            state.index.unwrap_or(index)
        );
    }
    Ok(())
}

fn inspect(deck_path: &Path) -> Result<(), PromptError> {
    let body = std::fs::read_to_string(deck_path)?;
    let tags = extract_tags(&body);
    let deck = parse_file(&body, &tags);

    println!(
        "{} Deck '{}' parsed",
        "✓".green(),
        deck_name(deck_path)?.cyan().bold()
    );
    println!("  Shuffle: {}", deck.metadata.shuffle);
    println!("  Lines: {}", deck.size());
    for line in &deck.lines {
        if line.section.is_empty() {
            println!("  - {}", line.text);
        } else {
            println!("  - [{}] {}", line.section.cyan(), line.text);
        }
    }

    Ok(())
}
