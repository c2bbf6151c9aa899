//! Symbol kinds, the lookup capability, and an in-memory corpus.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// The kind of a documented symbol.
///
/// Every lookup is keyed by the symbol's display name *and* its kind, so a
/// function and a class sharing a name never collide.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
  Function,
  Method,
  Class,
  Hook,
}

impl SymbolKind {
  /// Stable lowercase identifier, also used as the `rel` attribute on
  /// generated anchors.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Function => "function",
      Self::Method => "method",
      Self::Class => "class",
      Self::Hook => "hook",
    }
  }
}

/// Read-only lookup against the corpus of documented symbols.
///
/// `name` is the display name as it appears in documentation text, e.g.
/// `esc_attr` for a function or `WP_Query::query` for a method. Returning
/// `None` means the symbol is not documented; callers must leave the
/// original text untouched in that case.
pub trait SymbolSource {
  /// Resolve a symbol to its canonical page URL, or `None` if the corpus
  /// does not contain it.
  fn permalink(&self, name: &str, kind: SymbolKind) -> Option<String>;
}

/// `HashMap`-backed corpus, populated directly or from a JSON file.
///
/// The JSON format is a map from kind to name/URL pairs:
///
/// ```json
/// {
///   "function": { "esc_attr": "/reference/functions/esc-attr" },
///   "class":    { "WP_Query": "/reference/classes/wp-query" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCorpus {
  entries: HashMap<SymbolKind, HashMap<String, String>>,
}

impl InMemoryCorpus {
  /// Create an empty corpus.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a symbol under the given kind.
  pub fn insert(
    &mut self,
    kind: SymbolKind,
    name: impl Into<String>,
    url: impl Into<String>,
  ) {
    self
      .entries
      .entry(kind)
      .or_default()
      .insert(name.into(), url.into());
  }

  /// Number of registered symbols across all kinds.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.values().map(HashMap::len).sum()
  }

  /// Whether the corpus holds no symbols at all.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Parse a corpus from its JSON representation.
  ///
  /// # Errors
  ///
  /// Returns an error if the JSON is malformed or does not match the
  /// expected kind/name/URL shape.
  pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
    Ok(serde_json::from_str(json)?)
  }

  /// Load a corpus from a JSON file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let corpus = Self::from_json_str(&content)?;
    log::debug!(
      "loaded {} symbols from {}",
      corpus.len(),
      path.as_ref().display()
    );
    Ok(corpus)
  }
}

impl SymbolSource for InMemoryCorpus {
  fn permalink(&self, name: &str, kind: SymbolKind) -> Option<String> {
    self.entries.get(&kind).and_then(|m| m.get(name)).cloned()
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Fine in tests"
  )]
  use std::io::Write as _;

  use super::*;

  #[test]
  fn insert_and_lookup() {
    let mut corpus = InMemoryCorpus::new();
    corpus.insert(
      SymbolKind::Function,
      "esc_attr",
      "/reference/functions/esc-attr",
    );

    assert_eq!(
      corpus.permalink("esc_attr", SymbolKind::Function).as_deref(),
      Some("/reference/functions/esc-attr")
    );
    // Same name, different kind: no hit.
    assert!(corpus.permalink("esc_attr", SymbolKind::Class).is_none());
    assert!(corpus.permalink("esc_url", SymbolKind::Function).is_none());
  }

  #[test]
  fn json_roundtrip_matches_insert() {
    let json = r#"{
      "function": { "esc_attr": "/reference/functions/esc-attr" },
      "class":    { "WP_Query": "/reference/classes/wp-query" },
      "method":   { "WP_Query::query": "/reference/classes/wp-query/query" },
      "hook":     { "pre_get_posts": "/reference/hooks/pre-get-posts/" }
    }"#;
    let parsed = InMemoryCorpus::from_json_str(json).expect("valid json");

    let mut built = InMemoryCorpus::new();
    built.insert(
      SymbolKind::Function,
      "esc_attr",
      "/reference/functions/esc-attr",
    );
    built.insert(SymbolKind::Class, "WP_Query", "/reference/classes/wp-query");
    built.insert(
      SymbolKind::Method,
      "WP_Query::query",
      "/reference/classes/wp-query/query",
    );
    built.insert(
      SymbolKind::Hook,
      "pre_get_posts",
      "/reference/hooks/pre-get-posts/",
    );

    for (name, kind) in [
      ("esc_attr", SymbolKind::Function),
      ("WP_Query", SymbolKind::Class),
      ("WP_Query::query", SymbolKind::Method),
      ("pre_get_posts", SymbolKind::Hook),
    ] {
      assert_eq!(parsed.permalink(name, kind), built.permalink(name, kind));
    }
    assert_eq!(parsed.len(), 4);
  }

  #[test]
  fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
      file,
      r#"{{ "function": {{ "get_the_id": "/reference/functions/get-the-id" }} }}"#
    )
    .expect("write corpus json");

    let corpus =
      InMemoryCorpus::from_json_file(file.path()).expect("load corpus");
    assert_eq!(corpus.len(), 1);
    assert!(
      corpus
        .permalink("get_the_id", SymbolKind::Function)
        .is_some()
    );
  }

  #[test]
  fn invalid_json_is_an_error() {
    assert!(InMemoryCorpus::from_json_str("not json").is_err());
    // Unknown kinds are rejected rather than silently dropped.
    assert!(
      InMemoryCorpus::from_json_str(r#"{ "widget": { "a": "b" } }"#).is_err()
    );
  }
}
