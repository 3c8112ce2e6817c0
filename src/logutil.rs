//! Logging helpers: keep backend bodies and user answers on one line and short
//! so a chatty backend error page does not flood the log.

use std::fmt::Write;

/// Default preview length for logged strings.
pub const DEFAULT_PREVIEW: usize = 200;

/// Escape a string for single-line logging, truncating after [`DEFAULT_PREVIEW`] chars.
pub fn escape_log(s: &str) -> String {
    escape_log_with(s, DEFAULT_PREVIEW)
}

/// Escape `\n`, `\r`, `\t`, backslash and other control chars; cut after `max_chars`
/// characters with an ellipsis.
pub fn escape_log_with(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_newlines_and_tabs() {
        assert_eq!(escape_log("Plaza\nMayor\r\tfin"), "Plaza\\nMayor\\r\\tfin");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let esc = escape_log_with("áéíóú", 3);
        assert_eq!(esc, "áéí…");
    }
}
