//! Repairs for artifacts of the upstream Markdown conversion.
//!
//! The parser that feeds this engine converts doc-comment text through a
//! Markdown processor that is over-eager in places: underscores become
//! emphasis, backtick/code-tag pairs get inverted, quoted HTML stays
//! quoted. Each fixer here is a pure string transform, idempotent on
//! already-fixed input, and a no-op when its trigger substring is absent.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
  tokenizer::tokenize,
  types::Token,
  utils::{encode_entities_once, never_matching_regex},
};

static UNINTENDED_EM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"([^\s])<em>(.+?)</em>").unwrap_or_else(|e| {
    log::error!("Failed to compile UNINTENDED_EM_RE regex: {e}");
    never_matching_regex()
  })
});

/// Undo emphasis that Markdown manufactured out of mid-word underscores.
///
/// A run of `<em>` immediately following a non-whitespace character was a
/// literal underscore pair in the source, never emphasis.
#[must_use]
pub fn fix_unintended_markdown(text: &str) -> String {
  // Only apply to content that has the em tag.
  if !text.contains("<em>") {
    return text.to_string();
  }

  UNINTENDED_EM_RE
    .replace_all(text, "${1}_${2}_")
    .into_owned()
}

/// Undo the Markdown conversion of `*` and `__` in parameter
/// descriptions; the docs pretty much always mean the literal characters.
#[must_use]
pub fn undo_markdown_emphasis(text: &str) -> String {
  text
    .replace("<em>", "*")
    .replace("</em>", "*")
    .replace("<strong>", "__")
    .replace("</strong>", "__")
}

/// Entity-encode a parameter description without double-encoding, then
/// restore the small set of tags allowed to stay literal.
///
/// Note: this precludes `<code>`/`<br>` from being used in an encoded
/// fashion within a description.
#[must_use]
pub fn encode_description_html(text: &str) -> String {
  let mut encoded = encode_entities_once(text);
  for tag in ["code", "br"] {
    encoded = encoded
      .replace(&format!("&lt;{tag}&gt;"), &format!("<{tag}>"))
      .replace(&format!("&lt;/{tag}&gt;"), &format!("</{tag}>"));
  }
  encoded
}

static BACKTICK_BEFORE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"`(.+)<code>").unwrap_or_else(|e| {
    log::error!("Failed to compile BACKTICK_BEFORE_CODE_RE regex: {e}");
    never_matching_regex()
  })
});

static CLOSE_BEFORE_BACKTICK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"</code>(.+)`").unwrap_or_else(|e| {
    log::error!("Failed to compile CLOSE_BEFORE_BACKTICK_RE regex: {e}");
    never_matching_regex()
  })
});

static INVERTED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"</code>(.+?)<code>").unwrap_or_else(|e| {
    log::error!("Failed to compile INVERTED_CODE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Rebalance code tags that the upstream backtick conversion mishandled.
///
/// A stray backtick next to a code tag means a conversion was skipped and
/// every subsequent tag came out inverted. When the first close tag
/// precedes the first open tag, an additional global rebalancing pass
/// runs over the whole string.
#[must_use]
pub fn fix_inverted_code_tags(text: &str) -> String {
  let inverted = looks_inverted(text);
  if !text.contains('`') && !inverted {
    return text.to_string();
  }

  let mut out = BACKTICK_BEFORE_CODE_RE
    .replace_all(text, "<code>${1}</code>")
    .into_owned();
  out = CLOSE_BEFORE_BACKTICK_RE
    .replace_all(&out, " <code>${1}</code>")
    .into_owned();
  if inverted {
    out = INVERTED_CODE_RE
      .replace_all(&out, " <code>${1}</code>")
      .into_owned();
  }
  out
}

fn looks_inverted(text: &str) -> bool {
  match (text.find("<code>"), text.find("</code>")) {
    (Some(first_open), Some(first_close)) => first_close < first_open,
    _ => false,
  }
}

static QUOTED_HTML_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"'(&lt;[^']+&gt;)'").unwrap_or_else(|e| {
    log::error!("Failed to compile QUOTED_HTML_RE regex: {e}");
    never_matching_regex()
  })
});

/// Wrap single-quoted, entity-encoded HTML within code tags.
///
/// The HTML should have been denoted with backticks in the original
/// source, but committers aren't always sticklers for documentation
/// formatting.
#[must_use]
pub fn fix_html_as_code(text: &str) -> String {
  if !text.contains("'&lt;") {
    return text.to_string();
  }

  QUOTED_HTML_RE
    .replace_all(text, "<code>${1}</code>")
    .into_owned()
}

static PIPED_TYPES_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"((?:[\w'\[\]]+\|)+[\w'\[\]]+)").unwrap_or_else(|e| {
    log::error!("Failed to compile PIPED_TYPES_RE regex: {e}");
    never_matching_regex()
  })
});

static QUOTED_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"('[^' ]*')").unwrap_or_else(|e| {
    log::error!("Failed to compile QUOTED_STRING_RE regex: {e}");
    never_matching_regex()
  })
});

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(#{2,})(\w+)(#{2,})").unwrap_or_else(|e| {
    log::error!("Failed to compile PLACEHOLDER_RE regex: {e}");
    never_matching_regex()
  })
});

/// Wrap code-like references within code tags: pipe-delimited type
/// unions, single-quoted tokens, and `##NAME##`-style placeholders.
///
/// Tags and anything already inside `<code>` are untouched. Hash-notation
/// strings and rendered hash lists are skipped wholesale.
#[must_use]
pub fn fix_quotes_to_code(text: &str) -> String {
  if text.is_empty()
    || text.starts_with('{')
    || text.contains("<ul class=\"param-hash\">")
  {
    return text.to_string();
  }

  let mut out = String::with_capacity(text.len());
  let mut within_code = false;

  for token in tokenize(text) {
    match token {
      Token::Tag(tag) => {
        out.push_str(tag);
        if tag.starts_with("</code") {
          within_code = false;
        } else if !within_code {
          within_code = tag.starts_with("<code");
        }
      },
      Token::Text(piece) => {
        if within_code {
          out.push_str(piece);
          continue;
        }
        let piece = PIPED_TYPES_RE.replace_all(piece, "<code>${1}</code>");
        let piece = QUOTED_STRING_RE.replace_all(&piece, "<code>${1}</code>");
        let piece =
          PLACEHOLDER_RE.replace_all(&piece, |caps: &regex::Captures<'_>| {
            // Equal hash runs on both sides, or it is not a placeholder.
            if caps[1].len() == caps[3].len() {
              format!("<code>{}</code>", &caps[0])
            } else {
              caps[0].to_string()
            }
          });
        out.push_str(&piece);
      },
    }
  }

  out
}

static BR_EXPAND_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<br>\s*").unwrap_or_else(|e| {
    log::error!("Failed to compile BR_EXPAND_RE regex: {e}");
    never_matching_regex()
  })
});

static BR_TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<br>\s*$").unwrap_or_else(|e| {
    log::error!("Failed to compile BR_TRAILING_RE regex: {e}");
    never_matching_regex()
  })
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?m)^\s*[*-] (.+?)(?:<br>)*$").unwrap_or_else(|e| {
    log::error!("Failed to compile LIST_ITEM_RE regex: {e}");
    never_matching_regex()
  })
});

/// Convert simple Markdown-like lists into list markup.
///
/// Necessary for descriptions that never see Markdown list processing
/// during parsing. Recognizes items denoted with an asterisk or dash;
/// does not handle nesting. Returns the input unchanged when no bullet
/// line is found.
#[must_use]
pub fn convert_lists_to_markup(text: &str) -> String {
  // Expand new lines for ease of matching, trim any trailing <br>s.
  let expanded = BR_EXPAND_RE.replace_all(text, "<br>\n");
  let expanded = BR_TRAILING_RE.replace_all(&expanded, "");

  let mut made_items = false;
  let mut listed = LIST_ITEM_RE
    .replace_all(&expanded, |caps: &regex::Captures<'_>| {
      made_items = true;
      format!("<li>{}</li>", &caps[1])
    })
    .into_owned();

  if !made_items {
    return text.to_string();
  }

  // Wrap the run: first item opens the `ul`, last item closes it.
  if let Some(first) = listed.find("<li>") {
    listed.replace_range(first..first + 4, "<ul><li>");
  }
  if let Some(last) = listed.rfind("</li>") {
    listed.replace_range(last..last + 5, "</li></ul>");
  }

  listed
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unintended_em_becomes_underscores() {
    assert_eq!(
      fix_unintended_markdown("some<em>text</em> here"),
      "some_text_ here"
    );
    // Emphasis after whitespace is intentional and stays.
    let intended = "some <em>text</em> here";
    assert_eq!(fix_unintended_markdown(intended), intended);
    let no_em = "plain text";
    assert_eq!(fix_unintended_markdown(no_em), no_em);
  }

  #[test]
  fn emphasis_undo_restores_literals() {
    assert_eq!(
      undo_markdown_emphasis("the <em>wildcard</em> and <strong>dunder</strong>"),
      "the *wildcard* and __dunder__"
    );
  }

  #[test]
  fn description_encoding_keeps_allowed_tags() {
    assert_eq!(
      encode_description_html("Use <code>$wpdb</code> & <div>markup</div>."),
      "Use <code>$wpdb</code> &amp; &lt;div&gt;markup&lt;/div&gt;."
    );
    // Idempotent: entities do not get double-encoded.
    let once = encode_description_html("a < b");
    assert_eq!(encode_description_html(&once), once);
  }

  #[test]
  fn inverted_code_tags_are_rebalanced() {
    assert_eq!(
      fix_inverted_code_tags("use `value<code> here"),
      "use <code>value</code> here"
    );
    let fine = "a <code>b</code> c";
    assert_eq!(fix_inverted_code_tags(fine), fine);
  }

  #[test]
  fn globally_inverted_tags_are_rebalanced() {
    let out = fix_inverted_code_tags("a</code>b<code>c</code>d<code>e");
    assert!(!looks_inverted(&out));
    assert!(out.contains("<code>b</code>"));
    assert!(out.contains("<code>d</code>"));
  }

  #[test]
  fn quoted_html_becomes_code() {
    assert_eq!(
      fix_html_as_code("wrap '&lt;div&gt;' manually"),
      "wrap <code>&lt;div&gt;</code> manually"
    );
    let untouched = "no encoded html here";
    assert_eq!(fix_html_as_code(untouched), untouched);
  }

  #[test]
  fn quotes_and_pipes_become_code() {
    assert_eq!(
      fix_quotes_to_code("Accepts string|int|null values."),
      "Accepts <code>string|int|null</code> values."
    );
    assert_eq!(
      fix_quotes_to_code("Default 'publish' status."),
      "Default <code>'publish'</code> status."
    );
    assert_eq!(
      fix_quotes_to_code("Replaced by ###PARAM### at runtime."),
      "Replaced by <code>###PARAM###</code> at runtime."
    );
  }

  #[test]
  fn unbalanced_placeholder_is_left_alone() {
    let input = "Almost ###PARAM## a placeholder.";
    assert_eq!(fix_quotes_to_code(input), input);
  }

  #[test]
  fn code_regions_and_hash_strings_are_skipped() {
    let in_code = "see <code>'publish'</code> above";
    assert_eq!(fix_quotes_to_code(in_code), in_code);

    let hash = "{ @type string $status Default 'publish'. }";
    assert_eq!(fix_quotes_to_code(hash), hash);
  }

  #[test]
  fn bullets_become_list_markup() {
    let out = convert_lists_to_markup("* first<br>* second<br>");
    assert_eq!(out, "<ul><li>first</li>\n<li>second</li></ul>");
  }

  #[test]
  fn no_bullets_means_no_change() {
    let input = "just a sentence<br>with a break";
    assert_eq!(convert_lists_to_markup(input), input);
  }

  #[test]
  fn list_conversion_is_idempotent() {
    let once = convert_lists_to_markup("- a\n- b");
    assert_eq!(convert_lists_to_markup(&once), once);
  }
}
