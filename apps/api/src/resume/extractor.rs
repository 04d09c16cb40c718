//! Field extractor — infers name, email and phone from unstructured resume text.
//!
//! Each field is an ordered list of named matchers. A matcher either finds a
//! candidate or misses; candidates go through the field's shared validation
//! and the first one that passes wins. A field nobody can infer is left empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resume::phone;

/// Best-effort contact fields. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ExtractedFields {
    pub fn found(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

/// Outcome of a single matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    Found(String),
    Missing,
}

impl Match {
    fn from_option(value: Option<String>) -> Self {
        value.map(Match::Found).unwrap_or(Match::Missing)
    }
}

/// A named matcher. `find` never fails; it only finds or misses.
pub struct Matcher {
    pub name: &'static str,
    pub find: fn(&str) -> Match,
}

pub fn extract(text: &str) -> ExtractedFields {
    let fields = ExtractedFields {
        name: extract_name(text),
        email: extract_email(text),
        phone: phone::extract_phone(text),
    };
    debug!(found = ?fields.found(), "resume fields extracted");
    fields
}

// ────────────────────────────────────────────────────────────────────────────
// Name
// ────────────────────────────────────────────────────────────────────────────

static NAME_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)\s*name\s*[:\-]\s*([^\n\r]+)").unwrap());
static FULL_NAME_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)\s*full[\s-]*name\s*[:\-]\s*([^\n\r]+)").unwrap());
static CONTACT_NAME_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)\s*contact[\s-]*name\s*[:\-]\s*([^\n\r]+)").unwrap());
static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)[ \t\r]*$").unwrap());
static EMAIL_LOCAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z]+)(?:[._-]([a-z]+))?@").unwrap());

pub static NAME_MATCHERS: &[Matcher] = &[
    Matcher {
        name: "name_label",
        find: name_label,
    },
    Matcher {
        name: "full_name_label",
        find: full_name_label,
    },
    Matcher {
        name: "contact_name_label",
        find: contact_name_label,
    },
    Matcher {
        name: "header_line",
        find: header_line,
    },
    Matcher {
        name: "email_local_part",
        find: name_from_email,
    },
];

fn name_label(text: &str) -> Match {
    capture(&NAME_LABEL, text)
}

fn full_name_label(text: &str) -> Match {
    capture(&FULL_NAME_LABEL, text)
}

fn contact_name_label(text: &str) -> Match {
    capture(&CONTACT_NAME_LABEL, text)
}

fn header_line(text: &str) -> Match {
    capture(&HEADER_LINE, text)
}

fn capture(pattern: &Regex, text: &str) -> Match {
    Match::from_option(
        pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    )
}

/// `jane.doe@host` → `Jane Doe`. Title-cased up front so the capitalization
/// rule does not reject every lowercase mailbox.
fn name_from_email(text: &str) -> Match {
    let Some(caps) = EMAIL_LOCAL_PART.captures(text) else {
        return Match::Missing;
    };
    let parts: Vec<&str> = [caps.get(1), caps.get(2)]
        .into_iter()
        .flatten()
        .map(|m| m.as_str())
        .collect();
    Match::Found(title_case(&parts.join(" ")))
}

pub fn extract_name(text: &str) -> String {
    for matcher in NAME_MATCHERS {
        let Match::Found(raw) = (matcher.find)(text) else {
            continue;
        };
        let candidate = clean_name(&raw);
        if is_valid_name(&candidate) {
            debug!(matcher = matcher.name, "name accepted");
            return title_case(&candidate);
        }
    }
    String::new()
}

fn clean_name(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or_default();
    first_line
        .trim()
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 2–50 chars, at least two words, no digits, every word capitalized.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(2..=50).contains(&len) || !name.contains(' ') {
        return false;
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    name.split(' ')
        .all(|word| word.chars().next().is_some_and(|c| c.is_uppercase()))
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Email
// ────────────────────────────────────────────────────────────────────────────

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

const GENERIC_MAILBOX_MARKERS: &[&str] = &["noreply", "no-reply", "example.com"];

/// First personal-looking address, falling back to the first address at all.
pub fn extract_email(text: &str) -> String {
    let emails: Vec<&str> = EMAIL.find_iter(text).map(|m| m.as_str()).collect();

    emails
        .iter()
        .find(|email| {
            let lower = email.to_lowercase();
            !GENERIC_MAILBOX_MARKERS.iter().any(|m| lower.contains(m))
        })
        .or_else(|| emails.first())
        .map(|e| e.to_string())
        .unwrap_or_default()
}
