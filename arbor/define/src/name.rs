//! Structural names for model concepts.
//!
//! A [`Name`] is a sequence of lowercase words. Two names are equal when their
//! words are equal, regardless of how they were spelled in the source model:
//! `AddNic`, `add_nic`, `add-nic` and `ADD NIC` all parse to the same name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// A structural, spelling-independent name.
///
/// ## Examples
///
/// ```
/// use arbor_define::Name;
///
/// let a = Name::parse("HostNics");
/// let b = Name::parse("host_nics");
/// assert_eq!(a, b);
/// assert_eq!(a.words(), &["host".to_string(), "nics".to_string()]);
/// assert_eq!(a.to_string(), "HostNics");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    words: Vec<String>,
}

impl Name {
    /// Parses a name from any common spelling.
    ///
    /// Word boundaries are `_`, `-`, whitespace, a lowercase letter or digit
    /// followed by an uppercase letter, and the last capital of an acronym
    /// when it starts a new capitalised word (`HTTPServer` -> `http server`).
    ///
    /// ## Examples
    ///
    /// ```
    /// use arbor_define::Name;
    ///
    /// assert_eq!(Name::parse("HTTPServer").words(), &["http", "server"]);
    /// assert_eq!(Name::parse("ADD"), Name::parse("add"));
    /// assert!(Name::parse("  ").is_empty());
    /// ```
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut words = Vec::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c == '_' || c == '-' || c.is_whitespace() {
                flush(&mut current, &mut words);
                continue;
            }

            if c.is_uppercase() && !current.is_empty() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let starts_word = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if starts_word {
                    flush(&mut current, &mut words);
                }
            }

            current.extend(c.to_lowercase());
        }
        flush(&mut current, &mut words);

        Self { words }
    }

    /// Builds a name directly from its words.
    ///
    /// Words are lowercased; empty words are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Returns the lowercase words of this name.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns `true` if the name has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Joins the words with the given separator, keeping them lowercase.
    ///
    /// ## Examples
    ///
    /// ```
    /// use arbor_define::Name;
    ///
    /// let name = Name::parse("DiskAttachments");
    /// assert_eq!(name.join("_"), "disk_attachments");
    /// assert_eq!(name.join(""), "diskattachments");
    /// ```
    pub fn join(&self, separator: &str) -> String {
        self.words.join(separator)
    }

    /// Renders the name in CamelCase.
    pub fn to_camel_case(&self) -> String {
        self.words.iter().map(|w| capitalize(w)).collect()
    }
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_camel_case())
    }
}

impl FromStr for Name {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = Name::parse(s);
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(name)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::parse(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::parse(&value)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_camel_case())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
