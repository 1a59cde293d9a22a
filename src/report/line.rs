//! Per-line noise filtering for RUGAR reports

use crate::config::DEFAULT_DISCARD_PHRASES;

/// Marks an audit-id line; its fields are joined with hyphens so they stay one token.
pub const AUDIT_MARKER: &str = "(IAUD)";

/// The groups header is only recognisable by the "Phone" label printed on the same line.
pub const PHONE_LABEL: &str = "Phone";

/// Replacement text for the line carrying [`PHONE_LABEL`].
pub const GROUPS_MARKER: &str = "Groups:";

/// Outcome of looking at a single report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Keep the line, possibly rewritten. Leading/trailing whitespace is already gone.
    Keep(String),
    /// Boilerplate; drop it.
    Discard,
}

/// Decides what happens to each raw report line.
#[derive(Debug, Clone)]
pub struct LineFilter {
    discard_phrases: Vec<String>,
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DISCARD_PHRASES.iter().copied())
    }
}

impl LineFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            discard_phrases: phrases
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn discard_phrases(&self) -> &[String] {
        &self.discard_phrases
    }

    /// Classify one raw line.
    ///
    /// Discard phrases are matched as substrings of the trimmed line and win
    /// over both rewrites. The audit rewrite wins over the phone rewrite.
    ///
    /// # Examples
    ///
    /// ```
    /// use recon::report::{LineClass, LineFilter};
    ///
    /// let filter = LineFilter::default();
    /// assert_eq!(filter.classify("  System date: 2024-10-30  "), LineClass::Discard);
    /// assert_eq!(
    ///     filter.classify("JOHN   SMITH   (IAUD)   ACTIVE"),
    ///     LineClass::Keep("JOHN-SMITH-(IAUD)-ACTIVE".to_string())
    /// );
    /// assert_eq!(filter.classify("Phone: 555-1234"), LineClass::Keep("Groups:".to_string()));
    /// ```
    pub fn classify(&self, raw: &str) -> LineClass {
        let line = raw.trim();

        if self.is_noise(line) {
            return LineClass::Discard;
        }

        if line.contains(AUDIT_MARKER) {
            LineClass::Keep(line.split_whitespace().collect::<Vec<_>>().join("-"))
        } else if line.contains(PHONE_LABEL) {
            LineClass::Keep(GROUPS_MARKER.to_string())
        } else {
            LineClass::Keep(line.to_string())
        }
    }

    fn is_noise(&self, line: &str) -> bool {
        self.discard_phrases.iter().any(|p| line.contains(p.as_str()))
    }
}
