//! Phone number inference and normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::resume::extractor::{Match, Matcher};

/// Fewer cleaned characters than this is not a phone number.
const MIN_PHONE_LEN: usize = 10;

static INTERNATIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d{1,3}[\s-]?\(?\d{3}\)?[\s-]?\d{3}[\s-]?\d{4}").unwrap());
static US_PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\d{3}\)?[\s-]?\d{3}[\s-]?\d{4}").unwrap());
static WITH_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d{3}[\s-]?\d{3}[\s-]?\d{4}[\s\w]*x?[\s\w]*\d+").unwrap());
static BARE_TEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{10}\b").unwrap());
static PHONE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:phone|mobile|tel|telephone)[\s:]*[^\n\r]+").unwrap());

pub static PHONE_MATCHERS: &[Matcher] = &[
    Matcher {
        name: "international",
        find: international,
    },
    Matcher {
        name: "us_parenthesized",
        find: us_parenthesized,
    },
    Matcher {
        name: "with_extension",
        find: with_extension,
    },
    Matcher {
        name: "bare_ten_digits",
        find: bare_ten_digits,
    },
    Matcher {
        name: "phone_label",
        find: phone_label,
    },
];

fn international(text: &str) -> Match {
    first_match(&INTERNATIONAL, text)
}

fn us_parenthesized(text: &str) -> Match {
    first_match(&US_PARENTHESIZED, text)
}

fn with_extension(text: &str) -> Match {
    first_match(&WITH_EXTENSION, text)
}

fn bare_ten_digits(text: &str) -> Match {
    first_match(&BARE_TEN_DIGITS, text)
}

fn phone_label(text: &str) -> Match {
    first_match(&PHONE_LABEL, text)
}

fn first_match(pattern: &Regex, text: &str) -> Match {
    match pattern.find(text) {
        Some(m) => Match::Found(m.as_str().to_string()),
        None => Match::Missing,
    }
}

/// Walks the matchers in priority order; a match that cleans down to fewer
/// than ten characters is discarded and the next matcher gets its turn.
pub fn extract_phone(text: &str) -> String {
    for matcher in PHONE_MATCHERS {
        let Match::Found(raw) = (matcher.find)(text) else {
            continue;
        };
        let cleaned = clean(&raw);
        if cleaned.len() >= MIN_PHONE_LEN {
            debug!(matcher = matcher.name, "phone accepted");
            return format_phone_number(&cleaned);
        }
    }
    String::new()
}

/// Keeps ASCII digits and `+`.
fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// `5551234567` → `(555) 123-4567`, `15551234567` → `+1 (555) 123-4567`.
/// `+`-prefixed international numbers and anything else stay as cleaned.
pub fn format_phone_number(phone: &str) -> String {
    let cleaned = clean(phone);
    let all_digits = cleaned.bytes().all(|b| b.is_ascii_digit());

    if all_digits && cleaned.len() == 10 {
        return format!("({}) {}-{}", &cleaned[..3], &cleaned[3..6], &cleaned[6..]);
    }
    if all_digits && cleaned.len() == 11 && cleaned.starts_with('1') {
        return format!("+1 ({}) {}-{}", &cleaned[1..4], &cleaned[4..7], &cleaned[7..]);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ten_digits() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
    }

    #[test]
    fn test_format_eleven_digits_with_us_country_code() {
        assert_eq!(format_phone_number("15551234567"), "+1 (555) 123-4567");
    }

    #[test]
    fn test_format_leaves_plus_prefixed_international() {
        assert_eq!(format_phone_number("+442012345678"), "+442012345678");
    }

    #[test]
    fn test_format_leaves_other_lengths_cleaned() {
        assert_eq!(format_phone_number("555-123-45678"), "55512345678");
        assert_eq!(format_phone_number("123-456-7890-12"), "123456789012");
    }

    #[test]
    fn test_parenthesized_us_number() {
        assert_eq!(extract_phone("Phone: (555) 123-4567"), "(555) 123-4567");
    }

    #[test]
    fn test_international_number_wins_first() {
        assert_eq!(
            extract_phone("call +44 201 234 5678 or (555) 123-4567"),
            "+442012345678"
        );
    }

    #[test]
    fn test_international_us_number_kept_with_plus() {
        assert_eq!(extract_phone("Mobile: +1 (555) 123-4567"), "+15551234567");
    }

    #[test]
    fn test_dashed_number() {
        assert_eq!(extract_phone("tel 555-987-6543 (cell)"), "(555) 987-6543");
    }

    #[test]
    fn test_short_digit_runs_are_discarded() {
        assert_eq!(extract_phone("Phone: 555-1234"), "");
        assert_eq!(extract_phone("Class of 2019, GPA 3.9"), "");
    }

    #[test]
    fn test_no_phone() {
        assert_eq!(extract_phone("Jane Doe\njane@site.org"), "");
    }
}
