use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Default character budget for description previews.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;

/// Display width of a string in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to fit within `max_width` terminal columns.
///
/// Appends "..." when text is cut. Widths of 3 or less leave no room for the
/// ellipsis, so as many characters as fit are returned instead. Returns
/// `Cow::Borrowed` when the string already fits.
///
/// ```
/// use wealthsage::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut width = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..cut], suffix))
}

/// Shorten free text to at most `max_chars` characters for previews.
///
/// Cut text is right-trimmed before "..." is appended.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}{}", text[..cut].trim_end(), ELLIPSIS)),
    }
}

/// Human-readable deadline, e.g. "Dec 01, 2026".
///
/// Absent deadlines render as "No deadline". Values that are neither a
/// calendar date nor an RFC 3339 timestamp are shown verbatim.
pub fn format_deadline(deadline: Option<&str>) -> Cow<'_, str> {
    let Some(raw) = deadline.map(str::trim).filter(|d| !d.is_empty()) else {
        return Cow::Borrowed("No deadline");
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Cow::Owned(date.format("%b %d, %Y").to_string());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Cow::Owned(ts.format("%b %d, %Y").to_string());
    }
    Cow::Borrowed(raw)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Listing text comes from scraped third-party pages and is rendered straight
/// into the terminal. Tabs and newlines are kept; CSI (`ESC [ ... final`) and
/// OSC (`ESC ] ... BEL|ESC \`) sequences are dropped whole.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c == '\x7f' || (c.is_ascii_control() && c != '\t' && c != '\n');
    if !s.chars().any(is_unsafe) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters until a final byte in 0x40..=0x7e
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_unsafe(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
        assert!(matches!(truncate_to_width("fits", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Testing", 3), "Tes");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK ideograph is two columns
        let s = "\u{4f60}\u{597d}\u{4e16}\u{754c}";
        assert_eq!(display_width(s), 8);
        assert_eq!(truncate_to_width(s, 7), "\u{4f60}\u{597d}...");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 150), "short");
        assert_eq!(truncate_text("abcde fghij", 6), "abcde...");
        let long = "x".repeat(200);
        let out = truncate_text(&long, DESCRIPTION_PREVIEW_CHARS);
        assert_eq!(out.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_format_deadline() {
        assert_eq!(format_deadline(None), "No deadline");
        assert_eq!(format_deadline(Some("  ")), "No deadline");
        assert_eq!(format_deadline(Some("2026-12-01")), "Dec 01, 2026");
        assert_eq!(format_deadline(Some("2026-03-05T10:00:00Z")), "Mar 05, 2026");
        assert_eq!(format_deadline(Some("Rolling")), "Rolling");
    }

    #[test]
    fn test_strip_clean_is_borrowed() {
        let input = "Plain text\twith tab\nand newline";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x00b\x07c\x7fd\re"), "abcde");
    }
}
