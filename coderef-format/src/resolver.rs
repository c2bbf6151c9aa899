//! Symbol reference classification and resolution.
//!
//! Classification is purely lexical: the same input string always yields
//! the same [`RefKind`], whether or not it later resolves. Resolution
//! against the corpus only decides whether a link is emitted at all.

use std::{collections::HashMap, sync::LazyLock};

use coderef_corpus::{ArchiveUrls, SymbolKind, SymbolSource};
use regex::Regex;

use crate::{
  types::ResolvedLink,
  utils::{decode_entities, never_matching_regex, slugify},
};

/// References that should point at external resources instead of the
/// archives, keyed by their literal spelling in doc comments.
static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> =
  LazyLock::new(|| {
    HashMap::from([(
      "error_log()",
      "https://www.php.net/manual/en/function.error-log.php",
    )])
  });

/// Legacy class names that predate the uppercase-with-underscore
/// convention. `Requests` and `Translations` are too word-like for the
/// implicit pass and are only honored in explicit notation.
const CLASS_EXCEPTIONS: &[&str] = &[
  "wpdb",
  "wp_atom_server",
  "wp_xmlrpc_server",
  "AtomFeed",
  "AtomEntry",
  "AtomParser",
  "MagpieRSS",
  "Requests",
  "RSSCache",
  "Translations",
  "Walker",
];

const IMPLICIT_CLASS_EXCEPTIONS: &[&str] = &[
  "wpdb",
  "wp_atom_server",
  "wp_xmlrpc_server",
  "AtomFeed",
  "AtomEntry",
  "AtomParser",
  "MagpieRSS",
  "RSSCache",
  "Walker",
];

static HOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:'|&#8216;)([$\w&;-]+)(?:'|&#8217;)$").unwrap_or_else(|e| {
    log::error!("Failed to compile HOOK_RE regex: {e}");
    never_matching_regex()
  })
});

static CLASS_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^_?[A-Z][a-zA-Z]+_\w+").unwrap_or_else(|e| {
    log::error!("Failed to compile CLASS_SHAPE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Lexical classification of a reference target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefKind {
  /// Mapped to an external resource by the exception list.
  External { url: &'static str },
  /// `Class::$property` — documented nowhere, never linked.
  MemberVariable,
  /// `Class::method` (with or without trailing `()`).
  Method { class: String, method: String },
  /// `'hook_name'`, straight or curly-entity quoted.
  Hook { name: String },
  /// A class-shaped name.
  Class,
  /// Anything else; `name` is the corpus lookup key (entities decoded,
  /// trailing `()` trimmed).
  Function { name: String },
}

/// Classify a bare reference string by shape alone.
#[must_use]
pub fn classify(target: &str) -> RefKind {
  if let Some(url) = EXCEPTIONS.get(target).copied() {
    return RefKind::External { url };
  }

  if target.contains("::$") {
    return RefKind::MemberVariable;
  }

  if target.contains("::") {
    let stripped = target.replace("()", "");
    let (class, method) =
      stripped.split_once("::").unwrap_or((stripped.as_str(), ""));
    return RefKind::Method {
      class:  class.to_string(),
      method: method.to_string(),
    };
  }

  if let Some(caps) = HOOK_RE.captures(target) {
    let name = caps.get(1).map_or("", |m| m.as_str());
    return RefKind::Hook {
      name: decode_entities(name).into_owned(),
    };
  }

  if is_class_shaped(target) {
    return RefKind::Class;
  }

  RefKind::Function {
    name: decode_entities(target.trim_end_matches("()")).into_owned(),
  }
}

/// Shape test used for explicit references.
///
/// All-uppercase tokens are acronyms, not class names, no matter how well
/// they match otherwise.
#[must_use]
pub fn is_class_shaped(name: &str) -> bool {
  CLASS_EXCEPTIONS.contains(&name)
    || (CLASS_SHAPE_RE.is_match(name) && !is_all_uppercase(name))
}

/// Shape test used by the implicit (autolink) pass.
#[must_use]
pub fn is_implicit_class_shaped(name: &str) -> bool {
  IMPLICIT_CLASS_EXCEPTIONS.contains(&name)
    || (CLASS_SHAPE_RE.is_match(name) && !is_all_uppercase(name))
}

fn is_all_uppercase(name: &str) -> bool {
  !name.chars().any(char::is_lowercase)
}

/// Resolves classified references to concrete link targets.
pub struct Resolver<'a> {
  corpus:   &'a dyn SymbolSource,
  archives: &'a ArchiveUrls,
}

impl<'a> Resolver<'a> {
  /// Create a resolver over a corpus and a set of archive bases.
  #[must_use]
  pub const fn new(
    corpus: &'a dyn SymbolSource,
    archives: &'a ArchiveUrls,
  ) -> Self {
    Self { corpus, archives }
  }

  /// Resolve an explicit `{@link}`/`{@see}` target.
  ///
  /// Method, class and hook targets build their archive path
  /// deterministically from the pattern; function targets additionally
  /// require a corpus hit. `None` means "leave the bare target text in
  /// place".
  #[must_use]
  pub fn resolve_explicit(&self, target: &str) -> Option<ResolvedLink> {
    match classify(target) {
      RefKind::External { url } => Some(ResolvedLink {
        href: url.to_string(),
        text: target.to_string(),
        rel:  None,
      }),
      RefKind::MemberVariable => None,
      RefKind::Method { class, method } => Some(ResolvedLink {
        href: format!(
          "{}{}/{}",
          self.archives.base(SymbolKind::Method),
          slugify(&class),
          slugify(&method)
        ),
        text: target.to_string(),
        rel:  Some(SymbolKind::Method.as_str()),
      }),
      RefKind::Hook { name } => Some(ResolvedLink {
        href: format!(
          "{}{}/",
          self.archives.base(SymbolKind::Hook),
          slugify(&name)
        ),
        text: target.to_string(),
        rel:  Some(SymbolKind::Hook.as_str()),
      }),
      RefKind::Class => Some(ResolvedLink {
        href: format!(
          "{}{}",
          self.archives.base(SymbolKind::Class),
          slugify(target)
        ),
        text: target.to_string(),
        rel:  Some(SymbolKind::Class.as_str()),
      }),
      RefKind::Function { name } => {
        self.confirm(&name, SymbolKind::Function).map(|href| {
          ResolvedLink {
            href,
            text: target.to_string(),
            rel: Some(SymbolKind::Function.as_str()),
          }
        })
      },
    }
  }

  /// Corpus-confirmed resolution for implicit candidates. Absence means
  /// the candidate is not documented and must be restored verbatim.
  #[must_use]
  pub fn confirm(&self, name: &str, kind: SymbolKind) -> Option<String> {
    self.corpus.permalink(name, kind)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use coderef_corpus::InMemoryCorpus;

  use super::*;

  fn fixtures() -> (InMemoryCorpus, ArchiveUrls) {
    let mut corpus = InMemoryCorpus::new();
    corpus.insert(
      SymbolKind::Function,
      "esc_attr",
      "/reference/functions/esc-attr",
    );
    (corpus, ArchiveUrls::default())
  }

  #[test]
  fn classify_is_lexical_and_ordered() {
    assert!(matches!(
      classify("error_log()"),
      RefKind::External { .. }
    ));
    assert_eq!(classify("WP_Rewrite::$index"), RefKind::MemberVariable);
    assert_eq!(classify("WP_Query::query()"), RefKind::Method {
      class:  "WP_Query".to_string(),
      method: "query".to_string(),
    });
    assert_eq!(classify("'pre_get_search_form'"), RefKind::Hook {
      name: "pre_get_search_form".to_string(),
    });
    assert_eq!(
      classify("&#8216;save_post&#8217;"),
      RefKind::Hook {
        name: "save_post".to_string(),
      }
    );
    assert_eq!(classify("WP_Query"), RefKind::Class);
    assert_eq!(classify("esc_attr()"), RefKind::Function {
      name: "esc_attr".to_string(),
    });
  }

  #[test]
  fn class_shape_rules() {
    assert!(is_class_shaped("WP_Query"));
    assert!(is_class_shaped("_WP_Dependency"));
    assert!(is_class_shaped("wpdb"));
    assert!(is_class_shaped("Walker"));
    assert!(is_class_shaped("Requests"));
    // Acronyms are never classes, even when the shape matches.
    assert!(!is_class_shaped("WP"));
    assert!(!is_class_shaped("WP_DEBUG"));
    assert!(!is_class_shaped("lowercase_name"));

    // The implicit pass refuses the word-like legacy names.
    assert!(!is_implicit_class_shaped("Requests"));
    assert!(!is_implicit_class_shaped("Translations"));
    assert!(is_implicit_class_shaped("wpdb"));
  }

  #[test]
  fn explicit_function_requires_corpus_hit() {
    let (corpus, archives) = fixtures();
    let resolver = Resolver::new(&corpus, &archives);

    let link = resolver.resolve_explicit("esc_attr()").unwrap();
    assert_eq!(link.href, "/reference/functions/esc-attr");
    assert_eq!(link.text, "esc_attr()");
    assert_eq!(link.rel, Some("function"));

    assert!(resolver.resolve_explicit("not_a_function()").is_none());
  }

  #[test]
  fn explicit_method_and_class_build_blind_paths() {
    let (corpus, archives) = fixtures();
    let resolver = Resolver::new(&corpus, &archives);

    let method = resolver.resolve_explicit("WP_Query::query()").unwrap();
    assert_eq!(method.href, "/reference/classes/wp-query/query");
    assert_eq!(method.rel, Some("method"));

    let class = resolver.resolve_explicit("WP_Query").unwrap();
    assert_eq!(class.href, "/reference/classes/wp-query");
    assert_eq!(class.rel, Some("class"));

    let hook = resolver.resolve_explicit("'pre_get_search_form'").unwrap();
    assert_eq!(hook.href, "/reference/hooks/pre-get-search-form/");
    assert_eq!(hook.rel, Some("hook"));
  }

  #[test]
  fn member_variables_are_not_linked() {
    let (corpus, archives) = fixtures();
    let resolver = Resolver::new(&corpus, &archives);
    assert!(resolver.resolve_explicit("WP_Rewrite::$index").is_none());
  }
}
