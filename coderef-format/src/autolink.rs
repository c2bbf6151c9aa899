//! Implicit reference autolinking.
//!
//! Detects inline references to documented resources in plain prose and
//! links them:
//!
//! - Functions: `get_the_ID()`
//! - Classes:   `WP_Query`
//! - Methods:   `WP_Query::is_single()`
//!
//! Hooks are deliberately not detected here; there is no reliable way to
//! infer a hook reference from prose, so hooks are notation-only (see the
//! notation module). Candidates that the corpus cannot confirm are
//! restored verbatim.

use std::sync::LazyLock;

use coderef_corpus::SymbolKind;
use regex::Regex;

use crate::{
  resolver::{Resolver, is_implicit_class_shaped},
  tokenizer::{VerbatimTracker, is_linkable_scheme, tokenize},
  types::{AutolinkLimits, Token},
  utils::{never_matching_regex, split_by_whitespace},
};

static CALLABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Class methods terminate with `()` or whitespace; bare functions must
  // always end in `()`. The `-&gt;` alternative covers arrows that were
  // entity-encoded upstream.
  Regex::new(
    r"(?x)
    (?P<cls>\w+)(?P<op>::|->|-&gt;)(?P<method>\w+)(?P<after>\(\)|\x20)
    |
    (?P<function>\w+\(\))
    ",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile CALLABLE_RE regex: {e}");
    never_matching_regex()
  })
});

static CLASS_CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Most class names start with an uppercase letter and have an
  // underscore; the exceptions are listed explicitly. `Requests` and
  // `Translations` are likelier to be ordinary words than class
  // references, so they require explicit notation and are absent here.
  Regex::new(
    r"\b(?:wpdb|wp_atom_server|wp_xmlrpc_server|AtomFeed|AtomEntry|AtomParser|MagpieRSS|RSSCache|Walker|_?[A-Z][a-zA-Z]+_\w+)\b",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile CLASS_CANDIDATE_RE regex: {e}");
    never_matching_regex()
  })
});

static NESTED_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)(<a([ \r\n\t]+[^>]+?>|>))<a [^>]+?>([^>]+?)</a></a>")
    .unwrap_or_else(|e| {
      log::error!("Failed to compile NESTED_ANCHOR_RE regex: {e}");
      never_matching_regex()
    })
});

/// Autolink implicit references in `text`.
///
/// Text inside verbatim regions and markup itself are never rewritten.
/// Hash-notation strings (leading `{`) are passed through untouched; the
/// hash formatter owns those.
#[must_use]
pub fn autolink_references(
  resolver: &Resolver<'_>,
  limits: AutolinkLimits,
  text: &str,
) -> String {
  if text.starts_with('{') {
    return text.to_string();
  }

  let mut out = String::with_capacity(text.len());
  let mut tracker = VerbatimTracker::new();

  for token in tokenize(text) {
    match token {
      Token::Tag(tag) => {
        tracker.observe(tag);
        // A tag-shaped token is only eligible when it is really a
        // bracketed URI; actual markup passes through untouched.
        if !tracker.in_verbatim() && is_linkable_scheme(tag) {
          out.push_str(&link_text_block(resolver, limits, tag));
        } else {
          out.push_str(tag);
        }
      },
      Token::Text(piece) => {
        if tracker.in_verbatim() || piece.is_empty() {
          out.push_str(piece);
        } else {
          out.push_str(&link_text_block(resolver, limits, piece));
        }
      },
    }
  }

  // Cleanup of accidental links within links.
  NESTED_ANCHOR_RE
    .replace_all(&out, "${1}${3}</a>")
    .into_owned()
}

/// Long blocks might contain expensive edge cases, so break them up on
/// whitespace first and bail on any chunk that cannot be broken.
fn link_text_block(
  resolver: &Resolver<'_>,
  limits: AutolinkLimits,
  block: &str,
) -> String {
  if block.len() <= limits.split_threshold {
    return link_chunk(resolver, block);
  }

  let mut out = String::with_capacity(block.len());
  for chunk in split_by_whitespace(block, limits.chunk_ceiling) {
    // The ceiling allows one extra byte for the whitespace a split
    // leaves attached to its chunk.
    if chunk.len() > limits.chunk_ceiling + 1 {
      out.push_str(chunk); // too big, no whitespace: bail
    } else {
      out.push_str(&link_chunk(resolver, chunk));
    }
  }
  out
}

fn link_chunk(resolver: &Resolver<'_>, chunk: &str) -> String {
  // Pad with whitespace to simplify the boundary handling.
  let mut content = format!(" {chunk} ");

  // Only if the text contains something that might be a callable.
  if content.contains("()")
    || content.contains("::")
    || content.contains("->")
  {
    content = link_callables(resolver, &content);
  }

  content = link_class_names(resolver, &content);

  content[1..content.len() - 1].to_string()
}

/// Detect references to class methods, e.g. `WP_Query::query()`, or
/// functions, e.g. `register_post_type()`.
fn link_callables(resolver: &Resolver<'_>, content: &str) -> String {
  CALLABLE_RE
    .replace_all(content, |caps: &regex::Captures<'_>| {
      let Some(whole) = caps.get(0) else {
        return String::new();
      };
      if inside_tag_remnant(content, whole.start(), whole.end()) {
        return whole.as_str().to_string();
      }

      if caps.name("cls").is_some() {
        // Reference to a class method; arrows normalize to `::`.
        let name = format!("{}::{}", &caps["cls"], &caps["method"]);
        let after = if &caps["after"] == "()" { "" } else { " " };

        // Only link actually documented methods.
        match resolver.confirm(&name, SymbolKind::Method) {
          Some(url) => format!(
            "<a href=\"{}\" rel=\"method\">{name}()</a>{after}",
            html_escape::encode_double_quoted_attribute(&url)
          ),
          None => whole.as_str().to_string(),
        }
      } else {
        let name = caps["function"].trim_end_matches("()").to_string();

        // Only link actually documented functions.
        match resolver.confirm(&name, SymbolKind::Function) {
          Some(url) => format!(
            "<a href=\"{}\" rel=\"function\">{name}()</a>",
            html_escape::encode_double_quoted_attribute(&url)
          ),
          None => whole.as_str().to_string(),
        }
      }
    })
    .into_owned()
}

/// Detect references to classes, e.g. `WP_Query`.
fn link_class_names(resolver: &Resolver<'_>, content: &str) -> String {
  CLASS_CANDIDATE_RE
    .replace_all(content, |caps: &regex::Captures<'_>| {
      let Some(whole) = caps.get(0) else {
        return String::new();
      };
      let name = whole.as_str();

      if !class_match_allowed(content, whole.start(), whole.end())
        || inside_tag_remnant(content, whole.start(), whole.end())
        || !is_implicit_class_shaped(name)
      {
        return name.to_string();
      }

      // Only link actually documented classes.
      match resolver.confirm(name, SymbolKind::Class) {
        Some(url) => format!(
          "<a href=\"{}\" rel=\"class\">{name}</a>",
          html_escape::encode_double_quoted_attribute(&url)
        ),
        None => name.to_string(),
      }
    })
    .into_owned()
}

/// Positional guards around a class candidate: not preceded by `/` (part
/// of a path), not followed by `<`, `:`, `"` or `'>` (part of markup or a
/// longer reference).
fn class_match_allowed(content: &str, start: usize, end: usize) -> bool {
  if content[..start].ends_with('/') {
    return false;
  }
  let rest = &content[end..];
  !(rest.starts_with('<')
    || rest.starts_with(':')
    || rest.starts_with('"')
    || rest.starts_with("'>"))
}

/// Whether the byte range sits inside what looks like the interior of an
/// HTML tag (an unclosed `<` before it, or a bare `>` ahead of it).
fn inside_tag_remnant(content: &str, start: usize, end: usize) -> bool {
  let before = &content.as_bytes()[..start];
  if let Some(open) = before.iter().rposition(|&b| b == b'<') {
    if !before[open..].contains(&b'>') {
      return true;
    }
  }

  for &byte in &content.as_bytes()[end..] {
    if byte == b'<' {
      return false;
    }
    if byte == b'>' {
      return true;
    }
  }
  false
}
