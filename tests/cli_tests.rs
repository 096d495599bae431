//! Integration tests for the promptdeck CLI
//!
//! These run the actual binary against temp-dir vaults, always with
//! --mock-wiki so nothing touches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn promptdeck_cmd() -> Command {
    Command::cargo_bin("promptdeck").unwrap()
}

fn write_deck(dir: &TempDir) -> std::path::PathBuf {
    let deck = dir.path().join("Voyages.md");
    fs::write(&deck, "## Openings\n- Set sail from {{current}}.\n").unwrap();
    fs::write(dir.path().join("Harbor.md"), "the active note").unwrap();
    deck
}

#[test]
fn help_flag() {
    promptdeck_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Prompt-deck templating and session engine",
        ));
}

#[test]
fn generate_prints_a_prompt_block() {
    let dir = TempDir::new().unwrap();
    let deck = write_deck(&dir);

    promptdeck_cmd()
        .arg("generate")
        .arg(&deck)
        .args(["--active", "Harbor", "--mock-wiki"])
        .assert()
        .success()
        .stdout(predicate::str::contains("```prompt"))
        .stdout(predicate::str::contains("deck: Voyages"))
        .stdout(predicate::str::contains("section: Openings"))
        .stdout(predicate::str::contains("shuffle: true"))
        .stdout(predicate::str::contains("Set sail from Harbor."));
}

#[test]
fn generate_empty_deck_prints_error_block() {
    let dir = TempDir::new().unwrap();
    let deck = dir.path().join("Hollow.md");
    fs::write(&deck, "no list items here\n").unwrap();

    promptdeck_cmd()
        .arg("generate")
        .arg(&deck)
        .arg("--mock-wiki")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Error]: Deck is empty: no prompts found in 'Hollow'.",
        ));
}

#[test]
fn quick_emits_block_with_index_and_no_shuffle() {
    promptdeck_cmd()
        .arg("quick")
        .args(["--index", "41"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deck: ~quick~"))
        .stdout(predicate::str::contains("index: 42"))
        .stdout(predicate::str::contains("shuffle:").not());
}

#[test]
fn inspect_reports_lines_and_metadata() {
    let dir = TempDir::new().unwrap();
    let deck = write_deck(&dir);

    promptdeck_cmd()
        .arg("inspect")
        .arg(&deck)
        .assert()
        .success()
        .stdout(predicate::str::contains("Shuffle: true"))
        .stdout(predicate::str::contains("Lines: 1"))
        .stdout(predicate::str::contains("Set sail from {{current}}."));
}

#[test]
fn reshuffle_rewrites_the_document() {
    let dir = TempDir::new().unwrap();
    write_deck(&dir);

    let block = "```prompt\ndeck: Voyages\nsection: Openings\nindex: 500000000\nshuffle: true\n\nSet sail from Harbor.\n\n```";
    let journal = dir.path().join("journal.md");
    fs::write(&journal, format!("today\n{block}\n")).unwrap();

    promptdeck_cmd()
        .arg("reshuffle")
        .arg(&journal)
        .args(["--index", "500000000", "--active", "Harbor", "--mock-wiki"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reshuffled 'Voyages'"));

    let contents = fs::read_to_string(&journal).unwrap();
    assert!(contents.contains("index: 500000001"));
    assert!(!contents.contains("index: 500000000"));
}

#[test]
fn reshuffle_missing_block_fails_with_suggestion() {
    let dir = TempDir::new().unwrap();
    let journal = dir.path().join("journal.md");
    fs::write(&journal, "nothing here\n").unwrap();

    promptdeck_cmd()
        .arg("reshuffle")
        .arg(&journal)
        .args(["--index", "7", "--mock-wiki"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No prompt block with index 7"));
}
