//! Locale-tolerant parsing of free-text compensation strings.
//!
//! Each source configures its own separator glyphs and "negotiable" phrases;
//! the matching and the number assignment rules are shared:
//!
//! - `от 50000` gives an open-ended minimum.
//! - `до 70000` and a bare `70000` give a maximum.
//! - `50000-70000` and `от 50000 до 70000` give both bounds.
//! - `50000-` gives an open-ended minimum.
//!
//! A leading label without digits (`з/п от 50 000`) is skipped. Word
//! separators only match whole words, so `до` never matches inside `долл.`.

use regex::Regex;
use scrape_logging::scrape_debug;

use crate::record::Salary;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("salary text not understood: {text:?}")]
pub struct SalaryParseMiss {
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SalaryPattern {
    regex: Regex,
    negotiable: Vec<String>,
}

impl SalaryPattern {
    /// Builds a pattern from the words meaning "from", the separators meaning
    /// "to" (words or dash glyphs), and the phrases meaning "not disclosed".
    pub fn new(
        from_words: &[&str],
        separators: &[&str],
        negotiable: &[&str],
    ) -> Result<Self, regex::Error> {
        let from = optional_group("from", from_words, "");
        let range = optional_group("sep", separators, r"\s*(?P<hi>\d*)");
        let source = format!(r"(?i)^\D*?{from}(?P<lo>\d*)\s*{range}\s*(?P<cur>\D*)$");
        let regex = Regex::new(&source)?;
        let negotiable = negotiable.iter().map(|s| s.to_lowercase()).collect();
        Ok(Self { regex, negotiable })
    }

    /// Parses a raw fragment. Empty text and negotiable phrases are a valid
    /// "undisclosed" salary; anything else that does not yield a number is a
    /// miss.
    pub fn parse(&self, raw: &str) -> Result<Salary, SalaryParseMiss> {
        let text = normalize_fragment(raw);
        if text.is_empty() || self.is_negotiable(&text) {
            return Ok(Salary::undisclosed());
        }

        let miss = || SalaryParseMiss { text: text.clone() };
        let caps = self.regex.captures(&text).ok_or_else(miss)?;

        let group = |name: &str| caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty());
        let lo = group("lo").and_then(parse_amount);
        let hi = group("hi").and_then(parse_amount);
        let has_from = group("from").is_some();
        let has_sep = group("sep").is_some();
        let currency = group("cur").map(str::to_string);

        let (min, max) = match (lo, hi) {
            (Some(lo), Some(hi)) => (Some(lo), Some(hi)),
            (Some(lo), None) if has_from || has_sep => (Some(lo), None),
            (Some(lo), None) => (None, Some(lo)),
            (None, Some(hi)) => (None, Some(hi)),
            (None, None) => return Err(miss()),
        };

        Ok(Salary::new(min, max, currency))
    }

    /// Like [`SalaryPattern::parse`] but treats a miss as undisclosed.
    pub fn extract(&self, raw: &str) -> Salary {
        self.parse(raw).unwrap_or_else(|miss| {
            scrape_debug!("{miss}");
            Salary::undisclosed()
        })
    }

    fn is_negotiable(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.negotiable.iter().any(|phrase| *phrase == lowered)
    }
}

/// Collapses every run of whitespace (including the no-break and thin spaces
/// sites group thousands with) to one space and trims. Spaces inside a number
/// are dropped, and a space is put between a word and a number glued to it.
pub fn normalize_fragment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        let inside_number = out.ends_with(|c: char| c.is_ascii_digit())
            && word.starts_with(|c: char| c.is_ascii_digit());
        if !out.is_empty() && !inside_number {
            out.push(' ');
        }
        for c in word.chars() {
            if c.is_ascii_digit() && out.ends_with(char::is_alphabetic) {
                out.push(' ');
            }
            out.push(c);
        }
    }
    out
}

/// `(?:(?P<name>a|b)\s*<tail>)?`, or nothing when there are no alternatives.
fn optional_group(name: &str, items: &[&str], tail: &str) -> String {
    if items.is_empty() {
        return String::new();
    }
    let alternatives = items
        .iter()
        .map(|item| whole_word(item))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?:(?P<{name}>{alternatives})\s*{tail})?")
}

/// Escapes `item`, adding word boundaries on its alphanumeric ends.
fn whole_word(item: &str) -> String {
    let mut pattern = regex::escape(item);
    if item.starts_with(char::is_alphanumeric) {
        pattern.insert_str(0, r"\b");
    }
    if item.ends_with(char::is_alphanumeric) {
        pattern.push_str(r"\b");
    }
    pattern
}

fn parse_amount(digits: &str) -> Option<u64> {
    digits.parse().ok()
}
