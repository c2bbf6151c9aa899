//! Per-kind archive base paths.

use serde::{Deserialize, Serialize};

use crate::corpus::SymbolKind;

/// Stable base path per symbol kind, used when a link target is
/// constructed from a reference's lexical shape rather than looked up.
///
/// Methods live under the class archive (`classes/<class>/<method>`), so
/// [`ArchiveUrls::base`] maps [`SymbolKind::Method`] to the class base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveUrls {
  pub functions: String,
  pub classes:   String,
  pub hooks:     String,
}

impl ArchiveUrls {
  /// Create archive bases, normalizing each to end with a single `/` so
  /// that slugs can be appended directly.
  #[must_use]
  pub fn new(
    functions: impl Into<String>,
    classes: impl Into<String>,
    hooks: impl Into<String>,
  ) -> Self {
    Self {
      functions: with_trailing_slash(functions.into()),
      classes:   with_trailing_slash(classes.into()),
      hooks:     with_trailing_slash(hooks.into()),
    }
  }

  /// The base path for the given kind.
  #[must_use]
  pub fn base(&self, kind: SymbolKind) -> &str {
    match kind {
      SymbolKind::Function => &self.functions,
      SymbolKind::Method | SymbolKind::Class => &self.classes,
      SymbolKind::Hook => &self.hooks,
    }
  }
}

impl Default for ArchiveUrls {
  fn default() -> Self {
    Self::new(
      "/reference/functions",
      "/reference/classes",
      "/reference/hooks",
    )
  }
}

fn with_trailing_slash(mut base: String) -> String {
  if !base.ends_with('/') {
    base.push('/');
  }
  base
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bases_end_with_slash() {
    let urls = ArchiveUrls::new(
      "https://example.org/reference/functions",
      "https://example.org/reference/classes/",
      "/hooks",
    );
    assert_eq!(
      urls.base(SymbolKind::Function),
      "https://example.org/reference/functions/"
    );
    assert_eq!(
      urls.base(SymbolKind::Class),
      "https://example.org/reference/classes/"
    );
    assert_eq!(urls.base(SymbolKind::Hook), "/hooks/");
  }

  #[test]
  fn methods_share_the_class_archive() {
    let urls = ArchiveUrls::default();
    assert_eq!(urls.base(SymbolKind::Method), urls.base(SymbolKind::Class));
  }
}
