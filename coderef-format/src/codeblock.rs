//! Code shortcode rendering.
//!
//! User-submitted documentation wraps code samples in `[php]`, `[js]`,
//! `[css]` and `[code lang=...]` shortcodes. This module normalizes the
//! wrapped content (the CMS injects `<br />` and paragraph seams into it)
//! and produces a structured code block with a validated language tag and
//! a line-numbering decision.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::never_matching_regex;

/// Languages the handbooks actually use; anything else falls back to PHP.
const LANGUAGES: &[&str] = &[
  "js", "json", "sh", "bash", "html", "css", "scss", "php", "markdown",
  "yaml",
];

const DEFAULT_LANGUAGE: &str = "php";

/// A normalized code block ready for rendering or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
  /// Validated, canonical language tag.
  pub language: String,
  /// Trimmed code content.
  pub content: String,
  /// Whether the rendered block should show line numbers.
  #[serde(rename = "showLineNumbers")]
  pub show_line_numbers: bool,
}

impl CodeBlock {
  /// Render as an HTML fragment. The content is escaped here; the
  /// structured fields keep the raw text.
  #[must_use]
  pub fn to_html(&self) -> String {
    let numbers_class = if self.show_line_numbers {
      " line-numbers"
    } else {
      ""
    };
    format!(
      "<pre class=\"code-block\"><code lang=\"{lang}\" \
       class=\"language-{lang}{numbers_class}\">{content}</code></pre>",
      lang = self.language,
      content = html_escape::encode_text(&self.content),
    )
  }
}

/// Render the generic `code` shortcode.
#[must_use]
pub fn shortcode_code(lang: Option<&str>, content: &str) -> CodeBlock {
  // Use an allowlist of languages, falling back to PHP.
  let mut language = match lang {
    Some(lang) if LANGUAGES.contains(&lang) => lang,
    _ => DEFAULT_LANGUAGE,
  };

  let content = trim_code(content);
  // Hides numbers if <= 4 lines of code (last line has no linebreak).
  let show_line_numbers = content.matches('\n').count() > 3;

  // Shell is flagged with `sh` or `bash` in the docs, but the highlighter
  // wants `shell`.
  if language == "sh" || language == "bash" {
    language = "shell";
  }

  CodeBlock {
    language: language.to_string(),
    content,
    show_line_numbers,
  }
}

/// Render the `php` shortcode.
#[must_use]
pub fn shortcode_php(content: &str) -> CodeBlock {
  shortcode_code(Some("php"), content)
}

/// Render the `js` shortcode.
#[must_use]
pub fn shortcode_js(content: &str) -> CodeBlock {
  shortcode_code(Some("js"), content)
}

/// Render the `css` shortcode.
#[must_use]
pub fn shortcode_css(content: &str) -> CodeBlock {
  shortcode_code(Some("css"), content)
}

static INJECTED_BR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<br />").unwrap_or_else(|e| {
    log::error!("Failed to compile INJECTED_BR_RE regex: {e}");
    never_matching_regex()
  })
});

static PARAGRAPH_SEAM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"</p>\s*<p>").unwrap_or_else(|e| {
    log::error!("Failed to compile PARAGRAPH_SEAM_RE regex: {e}");
    never_matching_regex()
  })
});

/// Trim off extra space, including initial new lines, and strip the
/// `<br />` and `<p>` markup the CMS injects. Leading spaces on the first
/// code line survive.
fn trim_code(content: &str) -> String {
  let content = INJECTED_BR_RE.replace_all(content, "");
  let content = PARAGRAPH_SEAM_RE.replace_all(&content, "\n\n");
  content
    .trim_matches(['\n', '\r', '\t', '\u{B}', '\0'])
    .to_string()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn language_allowlist_and_default() {
    assert_eq!(shortcode_code(Some("json"), "{}").language, "json");
    assert_eq!(shortcode_code(Some("cobol"), "x").language, "php");
    assert_eq!(shortcode_code(None, "x").language, "php");
  }

  #[test]
  fn shell_aliases_normalize() {
    assert_eq!(shortcode_code(Some("sh"), "ls").language, "shell");
    assert_eq!(shortcode_code(Some("bash"), "ls").language, "shell");
  }

  #[test]
  fn line_numbers_threshold() {
    let short = "a\nb\nc\nd"; // 3 newlines
    assert!(!shortcode_code(Some("php"), short).show_line_numbers);

    let long = "a\nb\nc\nd\ne"; // 4 newlines
    assert!(shortcode_code(Some("php"), long).show_line_numbers);
  }

  #[test]
  fn shell_block_with_line_numbers() {
    let content = "one\ntwo\nthree\nfour\nfive\nsix";
    let block = shortcode_code(Some("sh"), content);
    assert_eq!(block.language, "shell");
    assert!(block.show_line_numbers);
  }

  #[test]
  fn injected_markup_is_stripped() {
    let block = shortcode_code(
      Some("php"),
      "\n<p>$x = 1;<br /></p>\n<p>$y = 2;</p>\n",
    );
    assert_eq!(block.content, "<p>$x = 1;\n\n$y = 2;</p>");
  }

  #[test]
  fn leading_spaces_survive_trimming() {
    let block = shortcode_code(Some("php"), "\n\n    indented();\n");
    assert_eq!(block.content, "    indented();");
  }

  #[test]
  fn html_rendering_escapes_content() {
    let block = shortcode_code(Some("html"), "<div>&amp;</div>");
    let html = block.to_html();
    assert!(html.contains("class=\"language-html\""));
    assert!(html.contains("&lt;div&gt;"));
    assert!(!html.contains("<div>"));
  }

  #[test]
  fn serializes_with_camel_case_flag() {
    let block = shortcode_code(Some("js"), "a\nb\nc\nd\ne");
    let json = serde_json::to_string(&block).unwrap();
    assert!(json.contains("\"showLineNumbers\":true"));
    assert!(json.contains("\"language\":\"js\""));
  }
}
