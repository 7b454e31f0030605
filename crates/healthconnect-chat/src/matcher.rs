//! Selection matching against presented option sets.
//!
//! Free-text selection input is resolved by exact, case-insensitive
//! equality on the trimmed label. No substring heuristics: overlapping
//! option names (e.g. "Neurology" inside "Gastroenterology") must never
//! match each other.

/// Result of looking up input against an option set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Match<T> {
    /// Input matched; carries the canonical option value.
    Found(T),
    /// Input matched none of the options.
    NotFound,
}

/// An enumerated option set indexed by normalized label.
pub struct OptionSet<T> {
    entries: Vec<(String, T)>,
}

impl<T: Clone> OptionSet<T> {
    /// Build an option set from `(label, value)` pairs.
    pub fn new(options: impl IntoIterator<Item = (String, T)>) -> Self {
        let entries = options
            .into_iter()
            .map(|(label, value)| (normalize(&label), value))
            .collect();
        Self { entries }
    }

    /// Look up input by normalized equality against the labels.
    ///
    /// The first matching option wins; the canonical (original-cased) value
    /// is returned, never the user's text.
    pub fn find(&self, input: &str) -> Match<T> {
        let key = normalize(input);
        for (label, value) in &self.entries {
            if *label == key {
                return Match::Found(value.clone());
            }
        }
        Match::NotFound
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OptionSet<String> {
    /// Option set over plain labels, each its own value.
    pub fn from_labels(labels: &[String]) -> Self {
        Self::new(labels.iter().map(|l| (l.clone(), l.clone())))
    }
}

/// Normalized lookup key: trimmed and lower-cased.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
