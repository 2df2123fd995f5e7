//! Terminal detection for UI decisions.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Terminal and environment context for rendering.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    /// Terminal width in columns
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Detect the terminal and apply `--json`, `--format`, `--no-color`
    /// and ASCII preferences.
    pub fn from_env(
        json_flag: bool,
        format_flag: Option<&str>,
        no_color_flag: bool,
        ascii: bool,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self {
            color: is_tty && !no_color_flag && !no_color_env && !term_is_dumb,
            unicode: !ascii,
            width: terminal_width().unwrap_or(80),
            mode: OutputMode::resolve(json_flag, format_flag, is_tty, term_is_dumb),
        }
    }
}

/// COLUMNS, else the TTY's window size.
fn terminal_width() -> Option<usize> {
    if let Some(width) = std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse::<usize>().ok())
        .filter(|w| *w > 0)
    {
        return Some(width);
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ only writes into the provided winsize.
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            // SAFETY: ioctl succeeded, so winsize is initialized.
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_from_flag() {
        let ctx = UiContext::from_env(true, None, false, false);
        assert_eq!(ctx.mode, OutputMode::Json);
    }

    #[test]
    fn test_ascii_disables_unicode() {
        assert!(!UiContext::from_env(false, None, false, true).unicode);
    }

    #[test]
    fn test_no_color_flag() {
        assert!(!UiContext::from_env(false, None, true, false).color);
    }

    #[test]
    fn test_width_has_default() {
        assert!(UiContext::from_env(false, None, false, false).width > 0);
    }
}
