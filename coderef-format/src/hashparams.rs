//! Hash-notation parameter formatting.
//!
//! Associative-array parameters are documented with repeated `@type`
//! entries inside braces, nested arbitrarily deep:
//!
//! ```text
//! {
//!     @type array $foo {
//!         @type string $bar First.
//!     }
//! }
//! ```
//!
//! The block is parsed into a tree of [`HashParamNode`]s by tracking
//! brace balance per `@type` segment, then rendered as nested
//! `<ul class="param-hash">` lists. Parsing is best-effort on malformed
//! input: missing fields are padded empty, extra closing braces are
//! ignored, and nodes still open at input end are auto-closed.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::never_matching_regex;

/// One `@type` entry of a hash-notation block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashParamNode {
  /// Argument name with the leading `$` stripped; empty when the entry
  /// documents an unnamed array-of-arrays element.
  pub name: String,
  /// Declared type string.
  pub ty: String,
  /// Description text, braces stripped.
  pub description: String,
  /// Nested entries, in document order.
  pub children: Vec<HashParamNode>,
}

/// A top-level piece of a parsed hash block: loose prose between lists,
/// or a run of `@type` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashSegment {
  Text(String),
  List(Vec<HashParamNode>),
}

static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s+").unwrap_or_else(|e| {
    log::error!("Failed to compile WS_RUN_RE regex: {e}");
    never_matching_regex()
  })
});

/// Parse a hash-notation string into segments.
///
/// Returns `None` when `text` is not hash notation (does not start with
/// `{`); callers leave such text to the other formatting stages.
#[must_use]
pub fn parse_hash_notation(text: &str) -> Option<Vec<HashSegment>> {
  if !text.starts_with('{') {
    return None;
  }

  // Strip the outer braces and put every @type entry on its own line.
  let inner = text
    .strip_prefix('{')
    .map(|rest| rest.strip_suffix('}').unwrap_or(rest))?
    .trim()
    .replace("@type", "\n@type");

  let mut segments: Vec<HashSegment> = Vec::new();
  // Ancestors whose braces are still open; children attach to the top.
  let mut open: Vec<HashParamNode> = Vec::new();

  for line in inner.lines() {
    let collapsed = WS_RUN_RE.replace_all(line, " ");
    let part = collapsed.trim();
    if part.is_empty() {
      continue;
    }

    let mut fields = part.splitn(4, ' ');
    let wordtype = fields.next().unwrap_or_default();

    if wordtype != "@type" {
      // Loose prose ends any list in progress.
      close_all(&mut segments, &mut open);
      segments.push(HashSegment::Text(part.to_string()));
      continue;
    }

    let ty = fields.next().unwrap_or_default().to_string();
    let raw_name = fields.next().unwrap_or_default();
    let mut description = fields.next().unwrap_or_default().trim().to_string();

    // An opening brace in the name slot means an unnamed nested hash;
    // one at the start of the description opens a named one.
    let opens = raw_name == "{" || description.starts_with('{');
    let mut closes = 0;
    if opens {
      description = description.trim_start_matches('{').trim_start().to_string();
    } else {
      while description.ends_with('}') {
        description = description[..description.len() - 1].trim_end().to_string();
        closes += 1;
      }
    }

    let name = if raw_name == "{" {
      // No name specified, generally indicating an array of arrays.
      String::new()
    } else {
      raw_name.trim_start_matches('$').to_string()
    };

    let node = HashParamNode {
      name,
      ty,
      description,
      children: Vec::new(),
    };

    if opens {
      open.push(node);
    } else {
      attach(&mut segments, &mut open, node);
      for _ in 0..closes {
        if let Some(done) = open.pop() {
          attach(&mut segments, &mut open, done);
        }
      }
    }
  }

  // Auto-close anything left open at input end.
  close_all(&mut segments, &mut open);

  Some(segments)
}

fn attach(
  segments: &mut Vec<HashSegment>,
  open: &mut Vec<HashParamNode>,
  node: HashParamNode,
) {
  if let Some(parent) = open.last_mut() {
    parent.children.push(node);
    return;
  }
  if let Some(HashSegment::List(items)) = segments.last_mut() {
    items.push(node);
  } else {
    segments.push(HashSegment::List(vec![node]));
  }
}

fn close_all(segments: &mut Vec<HashSegment>, open: &mut Vec<HashParamNode>) {
  while let Some(done) = open.pop() {
    attach(segments, open, done);
  }
}

/// Render parsed segments as nested list markup.
///
/// `format_description` is applied to every node description (the
/// hash-param-description stage chain in the pipeline). Empty fields are
/// omitted from the rendering.
#[must_use]
pub fn render_hash_segments(
  segments: &[HashSegment],
  format_description: &dyn Fn(&str) -> String,
) -> String {
  let mut out = String::new();
  for segment in segments {
    match segment {
      HashSegment::Text(text) => out.push_str(text),
      HashSegment::List(nodes) => {
        out.push_str(&render_nodes(nodes, format_description));
      },
    }
  }
  out
}

fn render_nodes(
  nodes: &[HashParamNode],
  format_description: &dyn Fn(&str) -> String,
) -> String {
  let mut out = String::from("<ul class=\"param-hash\">");
  for node in nodes {
    out.push_str("<li>");
    if !node.name.is_empty() {
      out.push_str("<code>");
      out.push_str(&node.name);
      out.push_str("</code>");
    }
    if !node.ty.is_empty() {
      out.push_str("<span class=\"type\">");
      out.push_str(&node.ty);
      out.push_str("</span>");
    }

    let description = if node.description.is_empty() {
      String::new()
    } else {
      format_description(&node.description)
    };
    if !description.is_empty() || !node.children.is_empty() {
      out.push_str("<div class=\"desc\">");
      out.push_str(&description);
      if !node.children.is_empty() {
        out.push_str(&render_nodes(&node.children, format_description));
      }
      out.push_str("</div>");
    }
    out.push_str("</li>");
  }
  out.push_str("</ul>");
  out
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::panic,
    reason = "Fine in tests"
  )]
  use super::*;

  fn identity(text: &str) -> String {
    text.to_string()
  }

  #[test]
  fn non_hash_text_is_rejected() {
    assert!(parse_hash_notation("plain description").is_none());
    assert!(parse_hash_notation("").is_none());
  }

  #[test]
  fn flat_block_parses_fields() {
    let segments =
      parse_hash_notation("{ @type string $status Default 'publish'. }")
        .unwrap();
    assert_eq!(segments.len(), 1);
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "status");
    assert_eq!(items[0].ty, "string");
    assert_eq!(items[0].description, "Default 'publish'.");
    assert!(items[0].children.is_empty());
  }

  #[test]
  fn nested_block_builds_a_tree() {
    let segments = parse_hash_notation(
      "{ @type array $foo { @type string $bar First. } }",
    )
    .unwrap();
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "foo");
    assert_eq!(items[0].ty, "array");
    assert_eq!(items[0].children.len(), 1);
    assert_eq!(items[0].children[0].name, "bar");
    assert_eq!(items[0].children[0].ty, "string");
    assert_eq!(items[0].children[0].description, "First.");
  }

  #[test]
  fn deep_nesting_closes_multiple_levels() {
    let segments = parse_hash_notation(
      "{ @type array $a { @type array $b { @type int $c Deep. } } \
       @type bool $after Trailer. }",
    )
    .unwrap();
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "a");
    assert_eq!(items[0].children[0].name, "b");
    assert_eq!(items[0].children[0].children[0].name, "c");
    assert_eq!(items[1].name, "after");
  }

  #[test]
  fn missing_fields_are_padded_empty() {
    let segments = parse_hash_notation("{ @type int }").unwrap();
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items[0].ty, "int");
    assert_eq!(items[0].name, "");
    assert_eq!(items[0].description, "");
  }

  #[test]
  fn unbalanced_braces_auto_close() {
    // Opening brace never closed: the nested node still attaches.
    let segments = parse_hash_notation(
      "{ @type array $foo { @type string $bar Dangling.",
    )
    .unwrap();
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items[0].name, "foo");
    assert_eq!(items[0].children[0].name, "bar");
  }

  #[test]
  fn unnamed_nested_hash() {
    let segments =
      parse_hash_notation("{ @type array { @type int $n Count. } }").unwrap();
    let HashSegment::List(items) = &segments[0] else {
      panic!("expected a list segment");
    };
    assert_eq!(items[0].name, "");
    assert_eq!(items[0].ty, "array");
    assert_eq!(items[0].children[0].name, "n");
  }

  #[test]
  fn loose_prose_interrupts_lists() {
    let segments = parse_hash_notation(
      "{ Accepts the following keys. @type int $n Count. }",
    )
    .unwrap();
    assert_eq!(segments.len(), 2);
    assert!(matches!(&segments[0], HashSegment::Text(t) if t == "Accepts the following keys."));
    assert!(matches!(&segments[1], HashSegment::List(_)));
  }

  #[test]
  fn renders_two_level_list() {
    let segments = parse_hash_notation(
      "{ @type array $foo { @type string $bar First. } }",
    )
    .unwrap();
    let html = render_hash_segments(&segments, &identity);
    assert_eq!(
      html,
      "<ul class=\"param-hash\"><li><code>foo</code>\
       <span class=\"type\">array</span><div class=\"desc\">\
       <ul class=\"param-hash\"><li><code>bar</code>\
       <span class=\"type\">string</span>\
       <div class=\"desc\">First.</div></li></ul>\
       </div></li></ul>"
    );
  }

  #[test]
  fn empty_fields_are_omitted_from_markup() {
    let segments = parse_hash_notation("{ @type int }").unwrap();
    let html = render_hash_segments(&segments, &identity);
    assert_eq!(
      html,
      "<ul class=\"param-hash\"><li><span class=\"type\">int</span></li></ul>"
    );
  }
}
