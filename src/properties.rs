//! Minimal reader/writer for Java-style `.properties` files.
//!
//! Supports `#`/`!` comments, `=`/`:`/whitespace separators, backslash
//! escapes (`\t \n \r \f \\ \uXXXX` and escaped separators) and line
//! continuations. Rewriting keeps comments and untouched lines as they were.

use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::SqlPropsError;

/// A `.properties` file kept line by line.
///
/// Comments, blank lines and entries that are never [`set`](Self::set) are
/// written back exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesDocument {
    lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Verbatim(String),
    /// One logical entry; `raw` holds every physical line it spans.
    Entry {
        key: String,
        value: String,
        raw: String,
    },
}

impl PropertiesDocument {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut lines = Vec::new();
        let mut logical = String::new();
        let mut raw = String::new();

        for physical in input.lines() {
            let line = physical.trim_start();
            if raw.is_empty()
                && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
            {
                lines.push(Line::Verbatim(physical.to_string()));
                continue;
            }
            if !raw.is_empty() {
                raw.push('\n');
            }
            raw.push_str(physical);
            if ends_with_continuation(line) {
                logical.push_str(&line[..line.len() - 1]);
                continue;
            }
            logical.push_str(line);
            lines.push(entry(&logical, std::mem::take(&mut raw)));
            logical.clear();
        }
        if !raw.is_empty() {
            lines.push(entry(&logical, raw));
        }
        Self { lines }
    }

    /// Value of the last entry named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replace the first entry named `key` in place, dropping any later
    /// duplicates, or append a new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        let replacement = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: render([(key, value)]).trim_end_matches('\n').to_string(),
        };
        let is_key = |line: &Line| matches!(line, Line::Entry { key: k, .. } if k == key);

        match self.lines.iter().position(is_key) {
            Some(first) => {
                self.lines[first] = replacement;
                let mut idx = 0;
                self.lines.retain(|line| {
                    let keep = idx <= first || !is_key(line);
                    idx += 1;
                    keep
                });
            }
            None => self.lines.push(replacement),
        }
    }

    /// Entries in file order; a later duplicate overrides the earlier value.
    pub fn entries(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        for line in &self.lines {
            if let Line::Entry { key, value, .. } = line {
                out.insert(key.clone(), value.clone());
            }
        }
        out
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Verbatim(raw) | Line::Entry { raw, .. } => out.push_str(raw),
            }
            out.push('\n');
        }
        out
    }
}

fn entry(logical: &str, raw: String) -> Line {
    let (key, value) = split_entry(logical);
    Line::Entry { key, value, raw }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&line[..key_end]);
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, unescape(rest))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key || idx == 0 => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// Render pairs as `.properties` text, one `key=value` line each.
pub fn render<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

/// Read a `.properties` file; a missing file reads as empty.
///
/// # Errors
/// Returns `SqlPropsError::Io` for any read failure other than not-found.
pub fn read_file(path: &Path) -> Result<PropertiesDocument, SqlPropsError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(PropertiesDocument::parse(&raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PropertiesDocument::default()),
        Err(err) => Err(err.into()),
    }
}

/// Write `document` to `path`, replacing its contents.
///
/// # Errors
/// Returns `SqlPropsError::Io` if the file cannot be written.
pub fn write_file(path: &Path, document: &PropertiesDocument) -> Result<(), SqlPropsError> {
    std::fs::write(path, document.to_text())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_layouts() {
        let parsed = PropertiesDocument::parse(
            "# comment\n! other\n\na=1\nb : 2\nc 3\nempty=\nlong = one \\\n    two\nkey\\=x=y\n",
        )
        .entries();
        let items: Vec<_> = parsed.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            items,
            vec![
                ("a", "1"),
                ("b", "2"),
                ("c", "3"),
                ("empty", ""),
                ("long", "one two"),
                ("key=x", "y"),
            ]
        );
    }

    #[test]
    fn render_escapes_what_parse_unescapes() {
        let text = render([("a key", "line1\nline2"), ("path", "C:\\tmp"), ("lead", " x")]);
        assert_eq!(
            text,
            "a\\ key=line1\\nline2\npath=C:\\\\tmp\nlead=\\ x\n"
        );
        let back = PropertiesDocument::parse(&text);
        assert_eq!(back.get("a key"), Some("line1\nline2"));
        assert_eq!(back.get("path"), Some("C:\\tmp"));
        assert_eq!(back.get("lead"), Some(" x"));
    }

    #[test]
    fn unicode_escapes() {
        let parsed = PropertiesDocument::parse("greeting=gr\\u00fc\\u00DF\n");
        assert_eq!(parsed.get("greeting"), Some("grüß"));
    }

    #[test]
    fn set_keeps_comments_and_untouched_lines() {
        let mut doc = PropertiesDocument::parse(
            "# header\nold=1\n\nlong = a \\\n   b\n! note\nold=2\n",
        );
        assert_eq!(doc.get("old"), Some("2"));

        doc.set("old", "3");
        doc.set("new", "x y");

        assert_eq!(
            doc.to_text(),
            "# header\nold=3\n\nlong = a \\\n   b\n! note\nnew=x y\n"
        );
        assert_eq!(doc.get("long"), Some("a b"));
        assert_eq!(doc.entries().len(), 3);
    }

    #[test]
    fn trailing_continuation_still_forms_an_entry() {
        let doc = PropertiesDocument::parse("k = v \\");
        assert_eq!(doc.get("k"), Some("v "));
        assert_eq!(doc.to_text(), "k = v \\\n");
    }
}
