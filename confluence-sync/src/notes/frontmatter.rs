//! Parse and re-render the YAML front matter block of a note.
//!
//! The block is kept as raw lines so keys this tool does not know about
//! (lists, nested maps, comments) survive a round trip untouched. Only
//! top-level `key: value` lines are interpreted.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Front matter key holding the note's stable identifier
pub const UNIQUE_ID_KEY: &str = "uniqueId";

const DELIMITER: &str = "---";

static KEY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.-]*)[ \t]*:(.*)$").unwrap());

/// The lines between the opening and closing `---`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    lines: Vec<String>,
    /// "\n" or "\r\n", used when the block is rendered again
    line_ending: &'static str,
}

/// A note split into its front matter (if any) and everything after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDocument {
    pub front_matter: Option<FrontMatter>,
    /// Text after the closing delimiter, starting with its line break
    pub body: String,
    line_ending: &'static str,
}

/// Line ending of the first line break in `content`, LF when there is none
fn detect_line_ending(content: &str) -> &'static str {
    match content.find('\n') {
        Some(idx) if content[..idx].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Split content into front matter and body.
///
/// A block must open on the very first line and close on a later line that is
/// exactly `---`. Without a closing line the whole content is body.
pub fn split(content: &str) -> NoteDocument {
    let line_ending = detect_line_ending(content);
    let no_front_matter = || NoteDocument {
        front_matter: None,
        body: content.to_string(),
        line_ending,
    };

    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return no_front_matter();
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');
        if bare == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + DELIMITER.len()..];
            return NoteDocument {
                front_matter: Some(FrontMatter {
                    lines: yaml.lines().map(str::to_string).collect(),
                    line_ending,
                }),
                body: body.to_string(),
                line_ending,
            };
        }
        offset += line.len();
    }

    no_front_matter()
}

/// Remove every `uniqueId` field so the identifier is not published.
///
/// When nothing else is left in the block, the block itself is dropped.
/// Content without the field is returned unchanged.
pub fn strip_identifier(content: &str) -> String {
    let mut doc = split(content);
    let Some(front_matter) = doc.front_matter.as_mut() else {
        return content.to_string();
    };
    let mut removed = false;
    while front_matter.remove(UNIQUE_ID_KEY).is_some() {
        removed = true;
    }
    if !removed {
        return content.to_string();
    }
    if front_matter.is_empty() {
        doc.front_matter = None;
    }
    doc.render()
}

impl NoteDocument {
    pub fn render(&self) -> String {
        match &self.front_matter {
            Some(front_matter) => format!("{}{}", front_matter.render(), self.body),
            None => self.body.clone(),
        }
    }

    /// Front matter of the note, created empty when the note has none.
    /// A new block is separated from the existing text by a line break.
    pub fn front_matter_mut(&mut self) -> &mut FrontMatter {
        if self.front_matter.is_none() {
            self.body.insert_str(0, self.line_ending);
        }
        let line_ending = self.line_ending;
        self.front_matter
            .get_or_insert_with(|| FrontMatter::new(line_ending))
    }
}

impl FrontMatter {
    pub fn new(line_ending: &'static str) -> Self {
        Self {
            lines: Vec::new(),
            line_ending,
        }
    }

    /// Unquoted value of a top-level key
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines
            .iter()
            .find_map(|line| parse_key_line(line).filter(|(k, _)| *k == key))
            .map(|(_, value)| unquote(value))
    }

    /// Set a top-level key, replacing the existing entry in place or
    /// appending a new one
    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{}: {}", key, value);
        match self.field_range(key) {
            Some(range) => {
                self.lines.splice(range, std::iter::once(line));
            }
            None => self.lines.push(line),
        }
    }

    /// Remove a top-level key and any lines nested under it.
    /// Returns the removed value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let range = self.field_range(key)?;
        let value = parse_key_line(&self.lines[range.start]).map(|(_, v)| unquote(v));
        self.lines.drain(range);
        value
    }

    /// True when only blank lines remain
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn render(&self) -> String {
        let nl = self.line_ending;
        if self.lines.is_empty() {
            format!("{}{}{}", DELIMITER, nl, DELIMITER)
        } else {
            format!("{}{}{}{}{}", DELIMITER, nl, self.lines.join(nl), nl, DELIMITER)
        }
    }

    fn field_range(&self, key: &str) -> Option<Range<usize>> {
        let start = self
            .lines
            .iter()
            .position(|line| parse_key_line(line).is_some_and(|(k, _)| k == key))?;
        let nested = self.lines[start + 1..]
            .iter()
            .take_while(|line| is_nested_line(line))
            .count();
        Some(start..start + 1 + nested)
    }
}

fn parse_key_line(line: &str) -> Option<(&str, &str)> {
    let caps = KEY_LINE_RE.captures(line)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim();
    Some((key, value))
}

/// Indented lines and block list items belong to the key above them
fn is_nested_line(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t') || line.starts_with("- ") || line == "-"
}

/// Remove surrounding quotes from a string
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
