//! Doc-comment reference notation.
//!
//! Makes `{@see ...}` and `{@link ...}` references clickable. The two
//! notations are semantically different in the docs but not in practice,
//! so they are handled identically. Handles these six target forms:
//!
//! - `{@link https://en.wikipedia.org/wiki/ISO_8601}`
//! - `{@link https://example.org/loop Use the new loop}`
//! - `{@see WP_Rewrite::$index}`
//! - `{@see WP_Query::query()}`
//! - `{@see esc_attr()}`
//! - `{@see 'pre_get_search_form'}`
//!
//! Also strips inline `{@internal ...}}` notes, which are never meant to
//! be displayed.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::{
  resolver::Resolver,
  utils::{decode_entities, never_matching_regex},
};

static DOCLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\{@(?:link|see) ([^}]+)\}").unwrap_or_else(|e| {
    log::error!("Failed to compile DOCLINK_RE regex: {e}");
    never_matching_regex()
  })
});

static ANCHOR_RECOVERY_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"^<a .*href=['"]([^'"]+)['"]>(.*)</a>(.*)$"#).unwrap_or_else(
    |e| {
      log::error!("Failed to compile ANCHOR_RECOVERY_RE regex: {e}");
      never_matching_regex()
    },
  )
});

static INTERNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\{@internal (.+)\}\}").unwrap_or_else(|e| {
    log::error!("Failed to compile INTERNAL_RE regex: {e}");
    never_matching_regex()
  })
});

/// Replace every `{@link}`/`{@see}` span with an anchor, or with the bare
/// target text when the target does not resolve. Malformed spans are left
/// untouched; this function never fails.
#[must_use]
pub fn link_doc_references(resolver: &Resolver<'_>, text: &str) -> String {
  // Nothing to change unless a reference is in the text.
  if !text.contains("{@link ") && !text.contains("{@see ") {
    return text.to_string();
  }

  DOCLINK_RE
    .replace_all(text, |caps: &regex::Captures<'_>| {
      replace_reference(resolver, &caps[1])
    })
    .into_owned()
}

fn replace_reference(resolver: &Resolver<'_>, target: &str) -> String {
  let mut link: Cow<'_, str> = Cow::Borrowed(target);

  // The target may have been entity-encoded somewhere upstream.
  if link.starts_with("&lt;a ") {
    link = Cow::Owned(decode_entities(&link).into_owned());
  }

  // Undo links made clickable during initial parsing: recover the href
  // and keep any trailing text as a display override.
  if link.starts_with("<a ") {
    let recovered = ANCHOR_RECOVERY_RE.captures(&link).map(|caps| {
      let mut target = caps[1].to_string();
      if !caps[3].is_empty() {
        target.push(' ');
        target.push_str(&caps[3]);
      }
      target
    });
    if let Some(target) = recovered {
      link = Cow::Owned(target);
    }
  }

  // External reference: the rest after the first space, if any, is the
  // display text.
  if link.starts_with("http") {
    let (url, text) = link
      .split_once(' ')
      .map_or((link.as_ref(), link.as_ref()), |(url, text)| (url, text));
    return generate_link(url, text, None);
  }

  // Internal reference.
  match resolver.resolve_explicit(&link) {
    Some(resolved) => {
      generate_link(&resolved.href, &resolved.text, resolved.rel)
    },
    None => link.into_owned(),
  }
}

/// Strip inline `{@internal ...}}` spans.
#[must_use]
pub fn remove_inline_internal(text: &str) -> String {
  // Only attempt a change when an @internal reference is in the text.
  if !text.contains("{@internal ") {
    return text.to_string();
  }

  INTERNAL_RE.replace_all(text, "").into_owned()
}

/// Render an anchor with an escaped href and display text.
#[must_use]
pub fn generate_link(url: &str, text: &str, rel: Option<&str>) -> String {
  let href = html_escape::encode_double_quoted_attribute(url);
  let text = html_escape::encode_text(text);
  match rel {
    Some(rel) => format!("<a href=\"{href}\" rel=\"{rel}\">{text}</a>"),
    None => format!("<a href=\"{href}\">{text}</a>"),
  }
}
