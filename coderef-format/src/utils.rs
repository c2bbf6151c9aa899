//! Shared string helpers for the formatting pipeline.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
/// It will never match any input, which is safer than using a trivial
/// regex like `^$` which would match empty strings.
#[must_use]
pub fn never_matching_regex() -> Regex {
  // The pattern asserts something impossible, so it can never match.
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"^\b$").expect("fallback regex should always compile")
  })
}

/// Decode HTML entities (`&lt;`, `&#8216;`, ...) into their characters.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
  html_escape::decode_html_entities(text)
}

/// Slugify a symbol name for use in an archive URL.
///
/// Entity-decodes, lowercases, collapses every run of non-alphanumeric
/// characters to a single dash, and trims leading/trailing dashes, so
/// `esc_attr()` becomes `esc-attr` and `&#8216;save_post&#8217;` becomes
/// `save-post`.
#[must_use]
pub fn slugify(text: &str) -> String {
  let decoded = decode_entities(text);
  let mut slug = String::with_capacity(decoded.len());
  let mut pending_dash = false;
  for ch in decoded.chars().flat_map(char::to_lowercase) {
    if ch.is_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      slug.push(ch);
      pending_dash = false;
    } else {
      pending_dash = true;
    }
  }
  slug
}

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});")
    .unwrap_or_else(|e| {
      log::error!("Failed to compile ENTITY_RE regex: {e}");
      never_matching_regex()
    })
});

/// Entity-encode `<`, `>`, `"` and bare `&` without double-encoding
/// entities that are already present.
#[must_use]
pub fn encode_entities_once(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for (i, ch) in text.char_indices() {
    match ch {
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '&' if !ENTITY_RE.is_match(&text[i..]) => out.push_str("&amp;"),
      _ => out.push(ch),
    }
  }
  out
}

const fn is_split_whitespace(byte: u8) -> bool {
  matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Split a string into chunks of at most `goal` bytes, breaking after the
/// last whitespace inside each window (or the first one beyond it).
///
/// A remainder with no whitespace at all is emitted as a single oversized
/// chunk; callers decide whether to process or bypass it. Splits always
/// happen after an ASCII whitespace byte, so chunk boundaries are valid
/// UTF-8 boundaries and concatenating the chunks reproduces the input.
#[must_use]
pub fn split_by_whitespace(text: &str, goal: usize) -> Vec<&str> {
  let mut chunks = Vec::new();
  let mut rest = text;

  while rest.len() > goal {
    let window = &rest.as_bytes()[..=goal];
    let split_at = window
      .iter()
      .rposition(|&b| is_split_whitespace(b))
      .or_else(|| {
        rest.as_bytes()[goal + 1..]
          .iter()
          .position(|&b| is_split_whitespace(b))
          .map(|p| goal + 1 + p)
      });

    let Some(pos) = split_at else {
      // No whitespace anywhere: one oversized chunk.
      break;
    };
    chunks.push(&rest[..=pos]);
    rest = &rest[pos + 1..];
  }

  if !rest.is_empty() {
    chunks.push(rest);
  }
  chunks
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_symbols() {
    assert_eq!(slugify("esc_attr()"), "esc-attr");
    assert_eq!(slugify("WP_Query"), "wp-query");
    assert_eq!(slugify("&#8216;save_post&#8217;"), "save-post");
    assert_eq!(slugify("$new_status"), "new-status");
    assert_eq!(slugify("---"), "");
  }

  #[test]
  fn encode_once_preserves_entities() {
    assert_eq!(encode_entities_once("a < b"), "a &lt; b");
    assert_eq!(encode_entities_once("a &lt; b"), "a &lt; b");
    assert_eq!(encode_entities_once("Tom & Jerry"), "Tom &amp; Jerry");
    assert_eq!(encode_entities_once("&#8216;hi&#8217;"), "&#8216;hi&#8217;");
    assert_eq!(encode_entities_once(r#"say "hi""#), "say &quot;hi&quot;");
  }

  #[test]
  fn split_breaks_on_whitespace() {
    let chunks = split_by_whitespace("aaa bbb ccc", 4);
    assert_eq!(chunks, vec!["aaa ", "bbb ", "ccc"]);
    assert_eq!(chunks.concat(), "aaa bbb ccc");
  }

  #[test]
  fn split_whitespace_free_is_one_chunk() {
    let long = "x".repeat(50);
    assert_eq!(split_by_whitespace(&long, 10), vec![long.as_str()]);
  }

  #[test]
  fn split_finds_late_whitespace() {
    // No whitespace in the window, first break comes after it.
    let chunks = split_by_whitespace("aaaaaaaaaa bb", 4);
    assert_eq!(chunks, vec!["aaaaaaaaaa ", "bb"]);
  }
}
