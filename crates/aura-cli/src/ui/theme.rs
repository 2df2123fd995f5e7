//! Badges, colors and mood symbols.

use aura_core::schema::Mood;

/// Symbol pair for ASCII and Unicode variants.
#[derive(Debug, Clone)]
pub struct SymbolPair {
    pub ascii: &'static str,
    pub unicode: &'static str,
}

impl SymbolPair {
    pub const fn new(ascii: &'static str, unicode: &'static str) -> Self {
        Self { ascii, unicode }
    }

    pub fn get(&self, unicode: bool) -> &'static str {
        if unicode {
            self.unicode
        } else {
            self.ascii
        }
    }
}

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
    /// Vault locked / PIN protected
    Lock,
}

impl Badge {
    fn symbols(&self) -> SymbolPair {
        match self {
            Self::Ok => SymbolPair::new("[OK]", "[\u{2713}]"),
            Self::Warn => SymbolPair::new("[WARN]", "[\u{26A0}]"),
            Self::Err => SymbolPair::new("[ERR]", "[\u{2717}]"),
            Self::Info => SymbolPair::new("[INFO]", "[\u{2139}]"),
            Self::Lock => SymbolPair::new("[LOCK]", "[\u{1F512}]"),
        }
    }

    /// Get badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        self.symbols().get(unicode)
    }

    pub fn style(&self) -> &'static str {
        match self {
            Self::Ok => colors::GREEN,
            Self::Warn | Self::Lock => colors::YELLOW,
            Self::Err => colors::RED,
            Self::Info => colors::CYAN,
        }
    }
}

/// Color definitions using ANSI escape codes.
pub mod colors {
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Wrap `text` in `style` when color is enabled.
pub fn styled(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", style, text, colors::RESET)
    } else {
        text.to_string()
    }
}

/// Glyph and color for a mood.
pub fn mood_symbol(mood: Mood) -> (SymbolPair, &'static str) {
    match mood {
        Mood::Calm => (SymbolPair::new("~", "\u{1F33F}"), colors::GREEN),
        Mood::Tense => (SymbolPair::new("!", "\u{26A1}"), colors::YELLOW),
        Mood::Tired => (SymbolPair::new("z", "\u{1F319}"), colors::BLUE),
        Mood::Down => (SymbolPair::new("v", "\u{1F327}"), colors::CYAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_display() {
        assert_eq!(Badge::Ok.display(false), "[OK]");
        assert_eq!(Badge::Ok.display(true), "[\u{2713}]");
        assert_eq!(Badge::Lock.display(false), "[LOCK]");
    }

    #[test]
    fn test_styled_respects_color() {
        assert_eq!(styled("x", colors::RED, false), "x");
        assert_eq!(styled("x", colors::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_every_mood_has_ascii_symbol() {
        for mood in Mood::ALL {
            let (pair, _) = mood_symbol(mood);
            assert!(pair.get(false).is_ascii());
        }
    }
}
