use clap::{Args, Parser, Subcommand};
use deckmap::model::{DeckNoteType, NoteType};

/// Returns the version string, with git hash and commit date when the build had them.
/// Format: "0.3.2" or "0.3.2@abc1234 2026-01-15"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "deckmap", bin_name = "deckmap", version = get_version())]
#[command(
    about = "Deck configurations and validated card creation for Anki",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List deck configurations
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Show every field of each configuration
        #[arg(long)]
        full: bool,

        /// Print configurations as JSON
        #[arg(long, conflicts_with = "full")]
        json: bool,
    },

    /// Add or replace a deck configuration
    #[command(display_order = 2)]
    Add(AddArgs),

    /// Remove a deck configuration
    #[command(alias = "rm", display_order = 3)]
    Remove {
        /// Deck ID of the configuration
        deck_id: i64,
    },

    /// Import deck configurations from a JSON file ("-" reads stdin)
    #[command(display_order = 4)]
    Import {
        /// Path to the JSON document
        file: String,

        /// Replace every existing configuration instead of merging by deck ID
        #[arg(long)]
        replace: bool,
    },

    /// Print all deck configurations as an importable JSON document
    #[command(display_order = 5)]
    Export,

    /// List the decks in Anki and whether each is configured
    #[command(display_order = 6)]
    Decks,

    /// Create a card in a configured deck
    #[command(display_order = 7)]
    Card(CardArgs),

    /// Get or set configuration
    #[command(display_order = 8)]
    Config {
        /// Configuration key (e.g., anki-connect-url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Anki deck ID (looked up by name when omitted)
    #[arg(long = "id")]
    pub deck_id: Option<i64>,

    /// Anki deck name (looked up by ID when omitted)
    #[arg(long = "name")]
    pub deck_name: Option<String>,

    /// What cards in this deck are for
    #[arg(long)]
    pub purpose: String,

    /// Basic or basic-reversed
    #[arg(long = "note-type", default_value = "Basic")]
    pub note_type: DeckNoteType,

    /// What goes on the front of a card
    #[arg(long)]
    pub front_template: String,

    /// What goes on the back of a card
    #[arg(long)]
    pub back_template: String,

    /// An example front
    #[arg(long)]
    pub front_example: String,

    /// An example back
    #[arg(long)]
    pub back_example: String,
}

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Deck ID of a configured deck
    #[arg(long = "deck")]
    pub deck_id: i64,

    /// Note type: basic, basic-reversed or cloze (defaults to the deck's)
    #[arg(long = "type")]
    pub note_type: Option<NoteType>,

    #[arg(long)]
    pub front: Option<String>,

    #[arg(long)]
    pub back: Option<String>,

    /// Cloze text, e.g. "{{c1::Paris}} is the capital of France"
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub extra: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_card_arguments() {
        let cli = Cli::try_parse_from([
            "deckmap", "card", "--deck", "1", "--front", "猫", "--back", "cat", "--tags", "a,b",
            "-y",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Card(args)) => {
                assert_eq!(args.deck_id, 1);
                assert_eq!(args.note_type, None);
                assert_eq!(args.front.as_deref(), Some("猫"));
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_note_type_aliases() {
        let cli = Cli::try_parse_from([
            "deckmap", "card", "--deck", "1", "--type", "cloze", "--text", "x",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Card(CardArgs { note_type: Some(NoteType::Cloze), .. }))
        ));

        let cli = Cli::try_parse_from([
            "deckmap",
            "add",
            "--id",
            "3",
            "--purpose",
            "p",
            "--note-type",
            "basic-reversed",
            "--front-template",
            "f",
            "--back-template",
            "b",
            "--front-example",
            "fe",
            "--back-example",
            "be",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.note_type, DeckNoteType::BasicReversed),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_cloze_as_deck_note_type() {
        let parsed = Cli::try_parse_from([
            "deckmap",
            "add",
            "--id",
            "3",
            "--purpose",
            "p",
            "--note-type",
            "cloze",
            "--front-template",
            "f",
            "--back-template",
            "b",
            "--front-example",
            "fe",
            "--back-example",
            "be",
        ]);
        assert!(parsed.is_err());
    }
}
