//! Naming helper for part decoration.
//!
//! Collections are decorated element-wise, and each element part is named
//! with the singular of the exposure name: an exposure `users` yields parts
//! named `user`. The [`Inflector`] carries the rules for that conversion
//! and is configurable per view definition.

/// Irregular singular/plural pairs handled before the suffix rules.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLES: &[&str] = &["equipment", "information", "news", "series", "species"];

/// English pluralization helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflector {
    irregulars: Vec<(String, String)>,
    uncountables: Vec<String>,
}

impl Default for Inflector {
    fn default() -> Self {
        Self {
            irregulars: IRREGULARS
                .iter()
                .map(|(s, p)| (s.to_string(), p.to_string()))
                .collect(),
            uncountables: UNCOUNTABLES.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Inflector {
    /// An inflector with the built-in rule tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an irregular singular/plural pair.
    pub fn with_irregular(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.irregulars.push((singular.into(), plural.into()));
        self
    }

    /// Registers a word whose plural equals its singular.
    pub fn with_uncountable(mut self, word: impl Into<String>) -> Self {
        self.uncountables.push(word.into());
        self
    }

    /// Converts a plural word to its singular form.
    pub fn singularize(&self, word: &str) -> String {
        if self.uncountables.iter().any(|w| w == word) {
            return word.to_string();
        }
        if let Some((singular, _)) = self.irregulars.iter().find(|(_, p)| p == word) {
            return singular.clone();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{stem}y");
            }
        }
        for suffix in ["ses", "xes", "zes", "ches", "shes"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{stem}{}", &suffix[..suffix.len() - 2]);
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") {
            return word[..word.len() - 1].to_string();
        }
        word.to_string()
    }

    /// Converts a singular word to its plural form.
    pub fn pluralize(&self, word: &str) -> String {
        if self.uncountables.iter().any(|w| w == word) {
            return word.to_string();
        }
        if let Some((_, plural)) = self.irregulars.iter().find(|(s, _)| s == word) {
            return plural.clone();
        }

        if let Some(stem) = word.strip_suffix('y') {
            let vowel_before = stem
                .chars()
                .last()
                .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
            if !stem.is_empty() && !vowel_before {
                return format!("{stem}ies");
            }
        }
        for suffix in ["s", "x", "z", "ch", "sh"] {
            if word.ends_with(suffix) {
                return format!("{word}es");
            }
        }
        format!("{word}s")
    }
}
