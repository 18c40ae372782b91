//! Smart substitution of bracketed shorthand tokens
//!
//! `[token]` placeholders expand through a fixed, case-insensitive mapping.
//! Expansion is all-or-nothing: one unresolvable token aborts the whole
//! message so a partially substituted text is never forwarded.

use regex::Regex;

/// Fixed shorthand table. Keys are stored lowercase.
const SHORTHANDS: &[(&str, &str)] = &[
    ("gm", "Good morning, hope you slept well"),
    ("gn", "Good night, sweet dreams"),
    ("ty", "Thank you so much, you're the best"),
    ("brb", "Stepping away for a bit, back soon"),
    ("omw", "On my way, see you shortly"),
    ("busy", "Caught up with work right now, will text you later"),
    ("miss", "Been thinking about you all day"),
];

pub struct SubstitutionTable {
    placeholder: Regex,
}

/// Result of an expansion pass
#[derive(Debug, PartialEq, Eq)]
pub enum Expansion {
    /// No placeholders present, text untouched
    Unchanged,
    /// Every placeholder resolved
    Expanded(String),
    /// At least one token had no mapping; nothing may be forwarded
    UnknownToken(String),
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self {
            // Bracketed token: letters/digits, no nesting
            placeholder: Regex::new(r"\[([A-Za-z0-9]+)\]").expect("static placeholder pattern"),
        }
    }

    fn lookup(token: &str) -> Option<&'static str> {
        let token = token.to_lowercase();
        SHORTHANDS
            .iter()
            .find(|(key, _)| *key == token)
            .map(|(_, expansion)| *expansion)
    }

    /// Expand all placeholders in `text`, or report the first unknown token.
    pub fn expand(&self, text: &str) -> Expansion {
        if !self.placeholder.is_match(text) {
            return Expansion::Unchanged;
        }

        for capture in self.placeholder.captures_iter(text) {
            let token = &capture[1];
            if Self::lookup(token).is_none() {
                return Expansion::UnknownToken(token.to_string());
            }
        }

        let expanded = self
            .placeholder
            .replace_all(text, |caps: &regex::Captures<'_>| {
                Self::lookup(&caps[1]).unwrap_or_default().to_string()
            })
            .into_owned();
        Expansion::Expanded(expanded)
    }

    /// Render the known shorthands as a listing for the operator.
    pub fn render_listing(&self) -> String {
        let mut output = String::from("Known shortcuts:\n");
        for (key, expansion) in SHORTHANDS {
            output.push_str(&format!("[{}] -> {}\n", key, expansion));
        }
        output
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::new()
    }
}
