//! Search pattern compilation
//!
//! A pattern is either a literal string or a regular expression. Both
//! are compiled through the same path: literals are escaped for every
//! regex metacharacter first, so literal matching, counting and
//! replacement all share one match definition.

use crate::error::{Error, Result};
use log::debug;
use regex::{Regex, RegexBuilder};

// ─────────────────────────────────────────────────────────────────────────────
// Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// What the user typed into the search field, tagged with how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Match the text exactly as written
    Literal(String),
    /// Interpret the text as a regular expression
    Regex(String),
}

impl Pattern {
    /// Create a pattern from raw input and the regex toggle.
    pub fn new(text: impl Into<String>, use_regex: bool) -> Self {
        let text = text.into();
        if use_regex {
            Pattern::Regex(text)
        } else {
            Pattern::Literal(text)
        }
    }

    /// The raw pattern text.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal(text) | Pattern::Regex(text) => text,
        }
    }

    /// Whether this is a regular expression pattern.
    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex(_))
    }

    /// Whether the pattern is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Options that refine how a pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Whether matching distinguishes upper and lower case
    pub case_sensitive: bool,
    /// Whether matches must start and end on word boundaries
    pub whole_word: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compilation
// ─────────────────────────────────────────────────────────────────────────────

/// A pattern ready to scan text.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: Pattern,
    regex: Regex,
}

impl CompiledPattern {
    /// The pattern this was compiled from.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The underlying regular expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Compile a pattern into a matcher.
///
/// # Errors
///
/// - `Error::EmptySearchTerm` if the pattern is blank
/// - `Error::InvalidPattern` if a regex pattern does not parse
pub fn compile(pattern: &Pattern, options: SearchOptions) -> Result<CompiledPattern> {
    if pattern.is_blank() {
        return Err(Error::EmptySearchTerm);
    }

    let source = match pattern {
        Pattern::Literal(text) => regex::escape(text),
        Pattern::Regex(text) => text.clone(),
    };

    let source = if options.whole_word {
        format!(r"\b(?:{})\b", source)
    } else {
        source
    };

    let regex = RegexBuilder::new(&source)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
        .map_err(|e| {
            debug!("Invalid regex pattern '{}': {}", pattern.as_str(), e);
            Error::InvalidPattern {
                pattern: pattern.as_str().to_string(),
                message: e.to_string(),
            }
        })?;

    Ok(CompiledPattern {
        pattern: pattern.clone(),
        regex,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
