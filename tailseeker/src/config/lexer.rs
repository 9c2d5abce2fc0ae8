//! INI lexer.
//!
//! Turns configuration text into `(section, key, value)` entries, one at a
//! time. The dialect is the one tailseeker configuration files are written
//! in:
//!
//! - `[section]` headers
//! - `key = value` entries, both sides trimmed; `key: value` is accepted
//!   when the line has no `=`, so keys such as `umi-start:1` keep their colon
//! - full-line comments starting with `;` or `#`
//! - inline comments starting with `;` after whitespace
//!
//! The lexer knows nothing about which sections or keys exist.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One `key = value` line together with the section it appeared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Section name as written, without brackets.
    pub section: String,
    /// Key as written.
    pub key: String,
    /// Value with surrounding whitespace and inline comment removed.
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

/// Streaming iterator over the entries of an INI document.
///
/// # Examples
///
/// ```
/// use tailseeker::config::lexer::Lexer;
///
/// let text = "[options]\nthreads = 4 ; workers\n";
/// let entries: Vec<_> = Lexer::new(text.as_bytes(), "inline")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].section, "options");
/// assert_eq!(entries[0].value, "4");
/// ```
pub struct Lexer<R> {
    reader: R,
    path: PathBuf,
    section: String,
    line: usize,
    buffer: String,
    failed: bool,
}

impl<R: BufRead> Lexer<R> {
    /// Creates a lexer over `reader`; `path` is only used in error messages.
    pub fn new(reader: R, path: impl AsRef<Path>) -> Self {
        Self {
            reader,
            path: path.as_ref().to_path_buf(),
            section: String::new(),
            line: 0,
            buffer: String::new(),
            failed: false,
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line: self.line,
            message: message.to_string(),
        }
    }

    /// Reads lines until one produces an entry.
    fn next_entry(&mut self) -> Result<Option<Entry>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let mut text = self.buffer.as_str();
            if self.line == 1 {
                text = text.strip_prefix('\u{feff}').unwrap_or(text);
            }
            let text = text.trim();

            if text.is_empty() || text.starts_with(';') || text.starts_with('#') {
                continue;
            }

            if let Some(header) = text.strip_prefix('[') {
                let Some(close) = header.find(']') else {
                    return Err(self.error("expected ']' to close the section header"));
                };
                self.section = header[..close].trim().to_string();
                continue;
            }

            let Some(split) = text.find('=').or_else(|| text.find(':')) else {
                return Err(self.error("expected '=' or ':' after the key"));
            };
            let key = text[..split].trim();
            let value = strip_inline_comment(&text[split + 1..]).trim();

            return Ok(Some(Entry {
                section: self.section.clone(),
                key: key.to_string(),
                value: value.to_string(),
                line: self.line,
            }));
        }
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.next_entry().transpose();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

/// Drops a `;` comment that follows whitespace.
fn strip_inline_comment(value: &str) -> &str {
    let mut previous_is_space = false;
    for (i, c) in value.char_indices() {
        if c == ';' && previous_is_space {
            return &value[..i];
        }
        previous_is_space = c.is_whitespace();
    }
    value
}
