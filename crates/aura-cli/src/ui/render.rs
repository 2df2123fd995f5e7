//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{colors, styled, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Aura · command (context)"
/// Plain mode: "aura command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Aura", colors::BOLD, ctx.color);
            let dot = if ctx.unicode { "\u{00B7}" } else { "-" };
            match context {
                Some(c) => format!("{} {} {} ({})", title, dot, command, c),
                None => format!("{} {} {}", title, dot, command),
            }
        }
        OutputMode::Plain => format!("aura {}", command),
        OutputMode::Json => String::new(),
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored
    } else {
        format!("{} {}", colored, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), colors::DIM, ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("{} {}", styled("Hint:", colors::DIM, ctx.color), text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: badge plus indented key-value pairs
/// Plain mode: status=ok plus key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }
    lines.join("\n")
}

/// Render rows as a bordered table (pretty) or tab-separated lines (plain).
pub fn table(ctx: &UiContext, headers: &[&str], rows: &[Vec<String>]) -> String {
    if ctx.mode.is_pretty() {
        let mut table = ComfyTable::new();
        if ctx.unicode {
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS);
        } else {
            table.load_preset(ASCII_MARKDOWN);
        }
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(ctx.width.min(u16::MAX as usize) as u16)
            .set_header(headers.to_vec());
        for row in rows {
            table.add_row(row);
        }
        table.to_string()
    } else {
        rows.iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print a message unless in JSON mode.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() && !message.is_empty() {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

/// Format an error message with optional hint.
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h.replace('\n', " ")));
        }
    }
    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}
