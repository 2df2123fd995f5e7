//! The Aura profile document: versioned defaults, migration and typed
//! updates for check-ins and journal entries.
//!
//! The vault stores documents as opaque JSON. This module is the only place
//! that knows their shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AuraError, Result};

/// Schema version written into every migrated document.
pub const CURRENT_VERSION: u64 = 360;

/// Most recent mood check-ins kept.
pub const MAX_MOODS: usize = 400;
/// Most recent journal entries kept.
pub const MAX_JOURNAL: usize = 180;
/// Character limit for a check-in note.
pub const MAX_NOTE_CHARS: usize = 500;
/// Character limit for a gratitude line.
pub const MAX_GRATITUDE_CHARS: usize = 120;
/// Character limit for a journal entry.
pub const MAX_JOURNAL_CHARS: usize = 5000;

/// The default document for a fresh profile.
pub fn default_document(now: DateTime<Utc>) -> Value {
    json!({
        "v": CURRENT_VERSION,
        "createdAt": now.to_rfc3339(),
        "name": "",
        "theme": "forest",
        "soundEnabled": true,
        "haptics": true,
        "remindersEnabled": false,
        "routines": {
            "morning": {
                "enabled": true,
                "time": "08:30",
                "steps": ["Breathe", "Mood", "Intention"],
                "lastDone": ""
            },
            "evening": {
                "enabled": true,
                "time": "21:30",
                "steps": ["Journal", "Gratitude", "Close the day"],
                "lastDone": ""
            },
            "lastReminder": { "morning": "", "evening": "" }
        },
        "audio": { "env": "forest", "vol": 0.4, "on": false },
        "moods": [],
        "journal": []
    })
}

/// Result of [`migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    /// Complete document at [`CURRENT_VERSION`]
    pub document: Value,
    /// Dotted paths whose stored value had the wrong type and was reset
    pub replaced: Vec<String>,
}

/// Bring an arbitrary stored document up to the current schema.
///
/// Every field of the defaults is present in the output. A stored value is
/// kept when its JSON type matches the default's; objects are merged
/// recursively; anything else falls back to the default and its path is
/// reported in [`Migrated::replaced`]. Fields the defaults don't know about
/// are carried through untouched. A non-object input is replaced wholesale
/// (`"$"`).
pub fn migrate(input: &Value, now: DateTime<Utc>) -> Migrated {
    let defaults = default_document(now);
    let mut replaced = Vec::new();

    let mut document = match input {
        Value::Object(_) => merge(&defaults, input, "", &mut replaced),
        _ => {
            replaced.push("$".to_string());
            defaults
        }
    };

    if let Value::Object(map) = &mut document {
        map.insert("v".to_string(), json!(CURRENT_VERSION));
    }

    Migrated { document, replaced }
}

fn merge(default: &Value, input: &Value, path: &str, replaced: &mut Vec<String>) -> Value {
    match (default, input) {
        (Value::Object(defaults), Value::Object(stored)) => {
            let mut out = Map::new();
            for (key, default_value) in defaults {
                let child = join_path(path, key);
                let value = match stored.get(key) {
                    Some(stored_value) => merge(default_value, stored_value, &child, replaced),
                    None => default_value.clone(),
                };
                out.insert(key.clone(), value);
            }
            for (key, stored_value) in stored {
                if !defaults.contains_key(key) {
                    out.insert(key.clone(), stored_value.clone());
                }
            }
            Value::Object(out)
        }
        _ if same_kind(default, input) => input.clone(),
        _ => {
            replaced.push(path.to_string());
            default.clone()
        }
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// How the user felt at a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Tense,
    Tired,
    Down,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Calm, Mood::Tense, Mood::Tired, Mood::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Tense => "tense",
            Mood::Tired => "tired",
            Mood::Down => "down",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AuraError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                AuraError::InvalidInput(format!(
                    "Unknown mood '{}' (expected one of: calm, tense, tired, down)",
                    s
                ))
            })
    }
}

/// One daily check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
    pub energy: i64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub gratitude: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Milliseconds since the Unix epoch
    pub t: i64,
}

impl MoodEntry {
    pub fn new(at: DateTime<Utc>, mood: Mood, energy: i64) -> Self {
        Self {
            date: at.date_naive(),
            mood,
            energy,
            note: String::new(),
            gratitude: String::new(),
            tags: Vec::new(),
            t: at.timestamp_millis(),
        }
    }

    fn normalized(mut self) -> Self {
        self.energy = self.energy.clamp(0, 100);
        self.note = truncate_chars(self.note.trim(), MAX_NOTE_CHARS);
        self.gratitude = truncate_chars(self.gratitude.trim(), MAX_GRATITUDE_CHARS);
        self.tags.retain(|t| !t.trim().is_empty());
        self
    }
}

/// One daily journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    /// Milliseconds since the Unix epoch
    pub t: i64,
    pub text: String,
}

impl JournalEntry {
    pub fn new(at: DateTime<Utc>, text: &str) -> Self {
        Self {
            date: at.date_naive(),
            t: at.timestamp_millis(),
            text: text.to_string(),
        }
    }
}

/// Record a check-in, replacing any earlier one from the same day.
pub fn record_mood(doc: &mut Value, entry: MoodEntry) -> Result<()> {
    let entry = entry.normalized();
    let value = serde_json::to_value(&entry)?;
    upsert_daily(doc, "moods", &entry.date, value, MAX_MOODS)
}

/// Record a journal entry, replacing any earlier one from the same day.
///
/// Blank text is rejected.
pub fn record_journal(doc: &mut Value, mut entry: JournalEntry) -> Result<()> {
    let text = entry.text.trim();
    if text.is_empty() {
        return Err(AuraError::InvalidInput(
            "Journal entry cannot be empty".to_string(),
        ));
    }
    entry.text = truncate_chars(text, MAX_JOURNAL_CHARS);
    let value = serde_json::to_value(&entry)?;
    upsert_daily(doc, "journal", &entry.date, value, MAX_JOURNAL)
}

/// Typed view of the stored check-ins. Entries that don't parse are skipped.
pub fn moods(doc: &Value) -> Vec<MoodEntry> {
    typed_entries(doc, "moods")
}

/// Typed view of the stored journal. Entries that don't parse are skipped.
pub fn journal(doc: &Value) -> Vec<JournalEntry> {
    typed_entries(doc, "journal")
}

fn typed_entries<T: for<'de> Deserialize<'de>>(doc: &Value, field: &str) -> Vec<T> {
    doc.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn upsert_daily(
    doc: &mut Value,
    field: &str,
    date: &NaiveDate,
    value: Value,
    cap: usize,
) -> Result<()> {
    let map = doc.as_object_mut().ok_or_else(|| {
        AuraError::InvalidInput("Document must be a JSON object".to_string())
    })?;
    let slot = map
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    let items = slot
        .as_array_mut()
        .ok_or_else(|| AuraError::InvalidState(format!("'{}' is not a list", field)))?;

    let day = date.to_string();
    match items
        .iter()
        .position(|item| item.get("date").and_then(Value::as_str) == Some(day.as_str()))
    {
        Some(idx) => items[idx] = value,
        None => items.push(value),
    }

    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
    Ok(())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
