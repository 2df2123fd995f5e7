//! Output mode routing.

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON only
    Json,
    /// Stable `key=value` / tab-separated text for scripts
    #[default]
    Plain,
    /// Tables, badges and colors for a terminal
    Pretty,
}

impl OutputMode {
    /// Resolve the mode: `--json` wins, then `--format plain`, then
    /// `TERM=dumb`; otherwise pretty on a TTY and plain elsewhere.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if format_flag == Some("plain") || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
