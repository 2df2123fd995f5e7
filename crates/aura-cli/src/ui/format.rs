//! String formatting helpers for check-ins and journal rows.

use chrono::NaiveDate;

/// Truncate to `max_len` characters, ending in "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// Collapse newlines so a value fits on one table row.
pub fn single_line(s: &str) -> String {
    s.replace('\r', "").replace('\n', " ")
}

/// `2026-03-14` in plain mode, `Sat 14 Mar 2026` in pretty mode.
pub fn format_day(date: &NaiveDate, pretty: bool) -> String {
    if pretty {
        date.format("%a %d %b %Y").to_string()
    } else {
        date.to_string()
    }
}

/// A ten-cell bar for an energy level in 0..=100.
pub fn energy_bar(energy: i64, unicode: bool) -> String {
    let energy = energy.clamp(0, 100);
    let filled = (energy as usize + 5) / 10;
    let (on, off) = if unicode {
        ("\u{2588}", "\u{2591}")
    } else {
        ("#", ".")
    };
    format!("{}{} {:>3}", on.repeat(filled), off.repeat(10 - filled), energy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\r\nb\nc"), "a b c");
    }

    #[test]
    fn test_format_day() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(format_day(&day, false), "2026-03-14");
        assert_eq!(format_day(&day, true), "Sat 14 Mar 2026");
    }

    #[test]
    fn test_energy_bar() {
        assert_eq!(energy_bar(0, false), "..........   0");
        assert_eq!(energy_bar(55, false), "######....  55");
        assert_eq!(energy_bar(100, false), "########## 100");
        assert_eq!(energy_bar(250, false), "########## 100");
    }
}
