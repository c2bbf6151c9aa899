//! Tag-aware tokenization.
//!
//! Formatting passes must never rewrite markup or text that sits inside a
//! verbatim region (`<code>`, `<pre>`, `<script>`, `<style>`). The
//! tokenizer splits input on complete `<...>` spans and tracks verbatim
//! nesting so callers can tell which text tokens are safe to touch.

use std::sync::LazyLock;

use regex::Regex;

use crate::{types::Token, utils::never_matching_regex};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<[^<>]+>").unwrap_or_else(|e| {
    log::error!("Failed to compile TAG_RE regex: {e}");
    never_matching_regex()
  })
});

static OPEN_VERBATIM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^<(?:code|pre|script|style)[\s>]").unwrap_or_else(|e| {
    log::error!("Failed to compile OPEN_VERBATIM_RE regex: {e}");
    never_matching_regex()
  })
});

static LINKABLE_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^<\s*\w{1,20}://").unwrap_or_else(|e| {
    log::error!("Failed to compile LINKABLE_SCHEME_RE regex: {e}");
    never_matching_regex()
  })
});

/// Split `input` into tag and text tokens.
///
/// Every complete `<...>` span becomes a [`Token::Tag`]; everything else
/// (including stray, unpaired angle brackets) stays in [`Token::Text`]
/// tokens. Concatenating the tokens in order reproduces the input
/// exactly.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
  let mut tokens = Vec::new();
  let mut last = 0;

  for m in TAG_RE.find_iter(input) {
    if m.start() > last {
      tokens.push(Token::Text(&input[last..m.start()]));
    }
    tokens.push(Token::Tag(m.as_str()));
    last = m.end();
  }
  if last < input.len() {
    tokens.push(Token::Text(&input[last..]));
  }

  tokens
}

/// Nesting counter over verbatim regions.
///
/// Feed every tag token to [`observe`](Self::observe) in order; while
/// [`in_verbatim`](Self::in_verbatim) reports `true`, text tokens are
/// protected and must pass through untouched. Unmatched closing tags are
/// ignored, the depth never goes below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerbatimTracker {
  depth: usize,
}

impl VerbatimTracker {
  /// Create a tracker with zero nesting depth.
  #[must_use]
  pub const fn new() -> Self {
    Self { depth: 0 }
  }

  /// Whether the position after the last observed tag is inside a
  /// verbatim region.
  #[must_use]
  pub const fn in_verbatim(&self) -> bool {
    self.depth > 0
  }

  /// Update the nesting depth for one tag token.
  pub fn observe(&mut self, tag: &str) {
    if OPEN_VERBATIM_RE.is_match(tag) {
      self.depth += 1;
    } else if self.depth > 0 && is_verbatim_close(tag) {
      self.depth -= 1;
    }
  }
}

fn is_verbatim_close(tag: &str) -> bool {
  tag.eq_ignore_ascii_case("</code>")
    || tag.eq_ignore_ascii_case("</pre>")
    || tag.eq_ignore_ascii_case("</script>")
    || tag.eq_ignore_ascii_case("</style>")
}

/// Whether a tag-shaped token is actually a bracketed URI
/// (`<https://...>`) rather than markup, and therefore still eligible
/// for rewriting.
#[must_use]
pub fn is_linkable_scheme(tag: &str) -> bool {
  LINKABLE_SCHEME_RE.is_match(tag)
}
