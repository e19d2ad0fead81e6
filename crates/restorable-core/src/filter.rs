//! Wildcard patterns for selecting archive entries.
//!
//! Only two wildcards exist: `*` matches any run of characters, including
//! `/`, and `?` matches exactly one character. Everything else is literal and
//! a pattern must match the whole entry name.

use regex::Regex;

use crate::ExtractionError;
use crate::Result;

/// A compiled, fully-anchored wildcard pattern.
///
/// # Examples
///
/// ```
/// use restorable_core::Pattern;
///
/// let pattern = Pattern::new("*.jar")?;
/// assert!(pattern.matches("plugin.jar"));
/// assert!(pattern.matches("a/b/plugin.jar"));
/// assert!(!pattern.matches("plugin.jar.bak"));
/// # Ok::<(), restorable_core::ExtractionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&translate(pattern)).map_err(|e| ExtractionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` if the whole of `name` matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("^(?s:");

    let mut literal = String::new();
    for c in pattern.chars() {
        let wildcard = match c {
            '*' => ".*",
            '?' => ".",
            _ => {
                literal.push(c);
                continue;
            }
        };
        out.push_str(&regex::escape(&literal));
        literal.clear();
        out.push_str(wildcard);
    }
    out.push_str(&regex::escape(&literal));

    out.push_str(")$");
    out
}

/// An ordered set of patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compiles every pattern, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns `true` if any pattern matches `name`.
    #[must_use]
    pub fn matches_any(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// Returns `true` if the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Iterates the patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

/// Include/exclude pair applied to effective entry names.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Entries must match one of these (an empty set includes everything).
    pub include: PatternSet,
    /// Entries matching one of these are rejected.
    pub exclude: PatternSet,
}

impl Filter {
    /// Creates a filter from compiled sets.
    #[must_use]
    pub fn new(include: PatternSet, exclude: PatternSet) -> Self {
        Self { include, exclude }
    }

    /// Returns `true` if `name` is included and not excluded.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.matches_any(name);
        included && !self.exclude.matches_any(name)
    }
}
