//! Reading and writing the profile document: check-ins and the journal.

use chrono::Utc;

use aura_core::schema::{self, JournalEntry, Mood, MoodEntry};

use crate::app::AppContext;
use crate::cli::{CheckinArgs, ListArgs};
use crate::ui::format::{energy_bar, format_day, single_line, truncate};
use crate::ui::theme::{mood_symbol, styled};
use crate::ui::{self, UiContext};

/// Print the whole profile document as JSON.
pub async fn handle_show(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let open = ctx.open_profile().await?;
    println!("{}", serde_json::to_string_pretty(&open.document)?);
    Ok(())
}

pub async fn handle_checkin(ctx: &AppContext<'_>, args: &CheckinArgs) -> anyhow::Result<()> {
    let mood: Mood = args.mood.parse()?;
    let mut open = ctx.open_profile().await?;

    let mut entry = MoodEntry::new(Utc::now(), mood, args.energy);
    entry.note = args.note.clone().unwrap_or_default();
    entry.gratitude = args.gratitude.clone().unwrap_or_default();
    entry.tags = args.tag.clone();
    let date = entry.date;

    schema::record_mood(&mut open.document, entry)?;
    open.vault.save(&open.document).await?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let day = date.to_string();
        let energy = args.energy.clamp(0, 100).to_string();
        ui::print(
            &ui_ctx,
            &ui::receipt(
                &ui_ctx,
                "Check-in saved",
                &[
                    ("Date", day.as_str()),
                    ("Mood", mood.as_str()),
                    ("Energy", energy.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub async fn handle_journal_add(ctx: &AppContext<'_>, text: &str) -> anyhow::Result<()> {
    let mut open = ctx.open_profile().await?;
    let entry = JournalEntry::new(Utc::now(), text);
    let date = entry.date;

    schema::record_journal(&mut open.document, entry)?;
    open.vault.save(&open.document).await?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let day = date.to_string();
        ui::print(
            &ui_ctx,
            &ui::receipt(&ui_ctx, "Journal entry saved", &[("Date", day.as_str())]),
        );
    }
    Ok(())
}

pub async fn handle_journal_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    let open = ctx.open_profile().await?;
    let entries = most_recent(schema::journal(&open.document), args.limit);

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        empty_hint(&ui_ctx, "No journal entries yet.", "aura journal add \"...\"");
        return Ok(());
    }

    let pretty = ui_ctx.mode.is_pretty();
    let text_width = ui_ctx.width.saturating_sub(20).max(20);
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                format_day(&entry.date, pretty),
                if pretty {
                    truncate(&single_line(&entry.text), text_width)
                } else {
                    single_line(&entry.text)
                },
            ]
        })
        .collect();

    ui::print(&ui_ctx, &ui::header(&ui_ctx, "journal", Some(&entries.len().to_string())));
    ui::blank_line(&ui_ctx);
    ui::print(&ui_ctx, &ui::table(&ui_ctx, &["Date", "Entry"], &rows));
    Ok(())
}

pub async fn handle_moods(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, args.format.as_deref());
    let open = ctx.open_profile().await?;
    let entries = most_recent(schema::moods(&open.document), args.limit);

    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        empty_hint(&ui_ctx, "No check-ins yet.", "aura checkin --mood calm");
        return Ok(());
    }

    let pretty = ui_ctx.mode.is_pretty();
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let mood = if pretty {
                let (symbol, color) = mood_symbol(entry.mood);
                format!(
                    "{} {}",
                    styled(symbol.get(ui_ctx.unicode), color, ui_ctx.color),
                    entry.mood
                )
            } else {
                entry.mood.to_string()
            };
            let energy = if pretty {
                energy_bar(entry.energy, ui_ctx.unicode)
            } else {
                entry.energy.to_string()
            };
            vec![
                format_day(&entry.date, pretty),
                mood,
                energy,
                truncate(&single_line(&entry.note), 40),
                entry.tags.join(","),
            ]
        })
        .collect();

    ui::print(&ui_ctx, &ui::header(&ui_ctx, "moods", Some(&entries.len().to_string())));
    ui::blank_line(&ui_ctx);
    ui::print(
        &ui_ctx,
        &ui::table(&ui_ctx, &["Date", "Mood", "Energy", "Note", "Tags"], &rows),
    );
    Ok(())
}

/// Keep the last `limit` entries (entries are stored oldest first).
fn most_recent<T>(mut entries: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        let excess = entries.len().saturating_sub(limit);
        entries.drain(..excess);
    }
    entries
}

fn empty_hint(ui_ctx: &UiContext, message: &str, command: &str) {
    if ui_ctx.mode.is_pretty() {
        ui::print(ui_ctx, &ui::badge(ui_ctx, ui::Badge::Info, message));
        ui::print(ui_ctx, &ui::hint(ui_ctx, command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_keeps_tail() {
        assert_eq!(most_recent(vec![1, 2, 3, 4], Some(2)), vec![3, 4]);
        assert_eq!(most_recent(vec![1, 2], Some(5)), vec![1, 2]);
        assert_eq!(most_recent(vec![1, 2], None), vec![1, 2]);
    }
}
