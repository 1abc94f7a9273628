//! Query matching for the file list.
//!
//! A query compiles into a [`SearchMatcher`], a pure predicate over display
//! names. Precedence, first match wins:
//!
//! 1. blank query: everything matches
//! 2. `/pattern/flags`: a regular expression (flags default to `i`)
//! 3. a query containing `*` or `?`: a glob over the whole name
//! 4. anything else: case-insensitive substring
//!
//! Only the blank check ignores surrounding whitespace; every other rule sees
//! the query exactly as typed, so `" kick"` does not match `kick.wav`. A
//! pattern that fails to compile in (2) or (3) degrades to a substring match
//! on the full query text. Compilation never fails.

use regex::{Regex, RegexBuilder};
use tracing::debug;

#[derive(Debug, Clone)]
enum MatchKind {
    All,
    Pattern(Regex),
    Substring(String),
}

/// A compiled name predicate.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    query: String,
    kind: MatchKind,
}

impl Default for SearchMatcher {
    fn default() -> Self {
        Self {
            query: String::new(),
            kind: MatchKind::All,
        }
    }
}

impl SearchMatcher {
    /// Compile `query` into a predicate.
    pub fn compile(query: &str) -> Self {
        let kind = if query.trim().is_empty() {
            MatchKind::All
        } else if let Some((pattern, flags)) = split_regex_literal(query) {
            match build_regex(pattern, flags) {
                Ok(re) => MatchKind::Pattern(re),
                Err(e) => {
                    debug!(query, error = %e, "regex query invalid, using substring");
                    substring(query)
                }
            }
        } else if query.contains(['*', '?']) {
            match glob_regex(query) {
                Ok(re) => MatchKind::Pattern(re),
                Err(e) => {
                    debug!(query, error = %e, "glob query invalid, using substring");
                    substring(query)
                }
            }
        } else {
            substring(query)
        };

        Self {
            query: query.to_string(),
            kind,
        }
    }

    /// The query text this matcher was compiled from.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Return true if `candidate` passes the predicate.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.kind {
            MatchKind::All => true,
            MatchKind::Pattern(re) => re.is_match(candidate),
            MatchKind::Substring(needle) => candidate.to_lowercase().contains(needle.as_str()),
        }
    }
}

fn substring(query: &str) -> MatchKind {
    MatchKind::Substring(query.to_lowercase())
}

/// Split `/pattern/flags` into its parts. Flags must be ASCII letters.
fn split_regex_literal(query: &str) -> Option<(&str, &str)> {
    let rest = query.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (pattern, flags) = (&rest[..close], &rest[close + 1..]);
    if pattern.is_empty() || !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((pattern, flags))
}

fn build_regex(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    let flags = if flags.is_empty() { "i" } else { flags };

    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Global/sticky/unicode have no meaning for a single test.
            'g' | 'y' | 'u' => {}
            other => {
                return Err(regex::Error::Syntax(format!("unknown regex flag `{other}`")));
            }
        }
    }
    builder.build()
}

fn glob_regex(query: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(query.len() + 8);
    pattern.push('^');
    for c in query.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => {
                let mut buf = [0u8; 4];
                pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
    pattern.push('$');

    RegexBuilder::new(&pattern).case_insensitive(true).build()
}
