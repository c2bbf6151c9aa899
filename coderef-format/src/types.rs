//! Types for the coderef-format public API and internal use.
use serde::{Deserialize, Serialize};

/// One token of a tag-aware tokenization pass.
///
/// Tokens borrow from the input and concatenating them in order
/// reproduces the input byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
  /// A complete `<...>` span, including the angle brackets.
  Tag(&'a str),
  /// Everything between tags, possibly containing stray `<` or `>`.
  Text(&'a str),
}

impl<'a> Token<'a> {
  /// The raw byte content of the token.
  #[must_use]
  pub const fn raw(self) -> &'a str {
    match self {
      Self::Tag(raw) | Self::Text(raw) => raw,
    }
  }
}

/// A successfully resolved reference, ready to render as an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
  /// Target URL for the anchor's `href`.
  pub href: String,
  /// Display text (escaped at render time, not here).
  pub text: String,
  /// `rel` attribute value; `None` for external links.
  pub rel:  Option<&'static str>,
}

/// Size guards for the autolinker, in bytes.
///
/// Text tokens longer than `split_threshold` are chunked on whitespace
/// before any pattern matching; chunks that still exceed `chunk_ceiling`
/// (plus the trailing whitespace byte a split leaves attached) are passed
/// through untouched. This bounds worst-case regex cost on adversarial
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutolinkLimits {
  pub split_threshold: usize,
  pub chunk_ceiling:   usize,
}

impl Default for AutolinkLimits {
  fn default() -> Self {
    Self {
      split_threshold: 10_000,
      chunk_ceiling:   2_100,
    }
  }
}

/// Options for the formatting pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
  /// Autolinker size guards.
  pub autolink: AutolinkLimits,
}

/// The documentation field a text belongs to.
///
/// Each field runs its own ordered chain of formatting stages; see the
/// pipeline module for the exact orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
  /// Main post content (long-form description).
  Content,
  /// Post excerpt (summary line).
  Excerpt,
  /// A parameter's description text.
  ParamDescription,
  /// A description inside a hash-notation parameter block.
  HashParamDescription,
  /// A parameter's type string.
  ParamType,
  /// A return-type string.
  ReturnType,
}
