use colored::Colorize;
use deckmap::api::{CardOutcome, CardPreview, CmdMessage, MessageLevel, RemoteDeckRow};
use deckmap::config::{AppConfig, KEYS};
use deckmap::model::DeckConfiguration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 15;
const NAME_WIDTH: usize = 28;
const TYPE_WIDTH: usize = 27;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        print_leveled(&message.level, &message.content);
    }
}

fn print_leveled(level: &MessageLevel, content: &str) {
    match level {
        MessageLevel::Info => println!("{}", content.dimmed()),
        MessageLevel::Success => println!("{}", content.green()),
        MessageLevel::Warning => println!("{}", content.yellow()),
        MessageLevel::Error => println!("{}", content.red()),
    }
}

/// One line per configuration: id, name, note type, purpose.
pub(super) fn print_decks(configs: &[DeckConfiguration]) {
    for config in configs {
        let id = format!("{:>width$}  ", config.deck_id, width = ID_WIDTH - 2);
        let name = pad_to_width(&truncate_to_width(&config.deck_name, NAME_WIDTH), NAME_WIDTH);
        let note_type = pad_to_width(config.note_type.model_name(), TYPE_WIDTH);
        let available = LINE_WIDTH.saturating_sub(ID_WIDTH + NAME_WIDTH + TYPE_WIDTH + 2);
        let purpose = truncate_to_width(&config.purpose, available);

        println!(
            "{}{} {} {}",
            id.yellow(),
            name.bold(),
            note_type.dimmed(),
            purpose
        );
    }
}

pub(super) fn print_full_decks(configs: &[DeckConfiguration]) {
    for (i, config) in configs.iter().enumerate() {
        if i > 0 {
            println!("\n--------------------------------\n");
        }
        println!(
            "{} {}",
            config.deck_id.to_string().yellow(),
            config.deck_name.bold()
        );
        println!("  {:<15} {}", "Purpose:", config.purpose);
        println!("  {:<15} {}", "Note type:", config.note_type);
        println!("  {:<15} {}", "Front:", config.front_template);
        println!("  {:<15} {}", "Back:", config.back_template);
        println!(
            "  {:<15} {} {} {}",
            "Example:",
            config.front_example,
            "→".dimmed(),
            config.back_example
        );
    }
}

pub(super) fn print_remote_decks(decks: &[RemoteDeckRow]) {
    if decks.is_empty() {
        println!("{}", "Anki has no decks.".dimmed());
        return;
    }
    for deck in decks {
        let id = format!("{:>width$}  ", deck.deck_id, width = ID_WIDTH - 2);
        let marker = if deck.configured { "✓" } else { " " };
        println!("{}{} {}", id.yellow(), marker.green(), deck.deck_name);
    }
}

pub(super) fn print_config(config: &AppConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

pub(super) fn print_preview(preview: &CardPreview) {
    println!("{:<10} {}", "Deck:".bold(), preview.deck);
    println!("{:<10} {}", "Note Type:".bold(), preview.note_type);
    for (name, value) in preview.fields.iter() {
        println!("{:<10} {}", format!("{}:", name).bold(), value);
    }
    if !preview.tags.is_empty() {
        println!("{:<10} {}", "Tags:".bold(), preview.tags.join(", "));
    }
}

pub(super) fn print_outcome(outcome: &CardOutcome) {
    print_leveled(&outcome.level(), &outcome.to_string());
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("日本語の単語", 7), "日本語…");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn padding_accounts_for_wide_chars() {
        assert_eq!(pad_to_width("猫", 4), "猫  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }
}
