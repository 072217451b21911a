//! Shell quoting helpers for the two shell families the builders target.
//!
//! Every command-string builder must route user-controlled text (patterns,
//! directories) through one of these before concatenating it into a shell
//! string. Matches the escaping the Python original used in
//! `grep_service.py`'s `_build_*_command` methods.

/// Single-quote a string for a POSIX shell, escaping embedded single quotes
/// with the standard `'\''` trick (close quote, escaped quote, reopen quote).
#[must_use]
pub fn unix_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Double-quote a string for `cmd.exe`, doubling embedded double quotes.
#[must_use]
pub fn windows_cmd_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Single-quote a string for a PowerShell string literal, doubling embedded
/// single quotes (PowerShell's escape convention inside `'...'` literals).
#[must_use]
pub fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_quote_escapes_embedded_quote() {
        assert_eq!(unix_quote("file's.py"), "'file'\\''s.py'");
    }

    #[test]
    fn unix_quote_passes_through_plain_text() {
        assert_eq!(unix_quote("*.py"), "'*.py'");
    }

    #[test]
    fn windows_cmd_quote_doubles_quotes() {
        assert_eq!(windows_cmd_quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn powershell_quote_doubles_single_quotes() {
        assert_eq!(powershell_quote("it's"), "'it''s'");
    }
}
