//! Title validation for submitted list and todo titles.
//!
//! Titles are trimmed before they are checked; every violated rule
//! contributes its own message.

use std::fmt;

use serde::Serialize;

/// Longest accepted title, counted in characters.
pub const MAX_TITLE_LEN: usize = 100;

pub const LIST_TITLE_NOT_UNIQUE: &str = "List title must be unique.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    List,
    Todo,
}

impl TitleKind {
    fn required_message(self) -> &'static str {
        match self {
            TitleKind::List => "The list title is required.",
            TitleKind::Todo => "The todo title is required.",
        }
    }

    fn length_message(self) -> &'static str {
        match self {
            TitleKind::List => "List title must be between 1 and 100 characters.",
            TitleKind::Todo => "Todo title must be between 1 and 100 characters.",
        }
    }
}

/// The messages of every rule a submitted title broke, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Trim `raw` and check it against the length rules for `kind`.
///
/// Returns the trimmed title on success.
pub fn validate_title(raw: &str, kind: TitleKind) -> Result<String, ValidationErrors> {
    let mut messages = Vec::new();
    let title = check_length(raw, kind, &mut messages);
    finish(title, messages)
}

/// Like [`validate_title`], and additionally reject a title that exactly
/// matches (case-sensitive) one of `taken`.
pub fn validate_unique_title<'a, I>(
    raw: &str,
    kind: TitleKind,
    taken: I,
) -> Result<String, ValidationErrors>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut messages = Vec::new();
    let title = check_length(raw, kind, &mut messages);
    if taken.into_iter().any(|existing| existing == title) {
        messages.push(LIST_TITLE_NOT_UNIQUE.to_string());
    }
    finish(title, messages)
}

fn check_length<'r>(raw: &'r str, kind: TitleKind, messages: &mut Vec<String>) -> &'r str {
    let title = raw.trim();
    let len = title.chars().count();
    if len == 0 {
        messages.push(kind.required_message().to_string());
    } else if len > MAX_TITLE_LEN {
        messages.push(kind.length_message().to_string());
    }
    title
}

fn finish(title: &str, messages: Vec<String>) -> Result<String, ValidationErrors> {
    if messages.is_empty() {
        Ok(title.to_string())
    } else {
        Err(ValidationErrors(messages))
    }
}

/// True when `title` would pass the length rules unchanged. Used when
/// checking titles loaded from storage.
pub(crate) fn is_well_formed(title: &str) -> bool {
    let len = title.chars().count();
    title.trim() == title && (1..=MAX_TITLE_LEN).contains(&len)
}
