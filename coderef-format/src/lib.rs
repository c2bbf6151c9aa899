//! # coderef-format - reference documentation formatting engine
//!
//! Rewrites documentation text extracted from source-code doc comments
//! into safe, cross-linked HTML: `{@see}`/`{@link}` notation becomes
//! anchors, implicit references (`esc_attr()`, `WP_Query`,
//! `WP_Query::query()`) are linked when the symbol corpus confirms them,
//! artifacts of the upstream Markdown conversion are repaired, and code
//! shortcodes are normalized into structured blocks.
//!
//! ## Quick Start
//!
//! ```rust
//! use coderef_format::{ArchiveUrls, Formatter, InMemoryCorpus, SymbolKind};
//!
//! let mut corpus = InMemoryCorpus::new();
//! corpus.insert(
//!   SymbolKind::Function,
//!   "esc_attr",
//!   "/reference/functions/esc-attr",
//! );
//!
//! let formatter = Formatter::new(&corpus, ArchiveUrls::default());
//! let html = formatter.format_content("Escape it with esc_attr() first.");
//!
//! assert!(html.contains(
//!   "<a href=\"/reference/functions/esc-attr\" rel=\"function\">esc_attr()</a>"
//! ));
//! ```
//!
//! ## Design
//!
//! - **Injected corpus**: the engine never owns symbol data; lookups go
//!   through the [`SymbolSource`] capability from `coderef-corpus`.
//! - **Tag-aware**: transformations tokenize around markup and never
//!   rewrite text inside `<code>`/`<pre>`/`<script>`/`<style>` regions.
//! - **Fail safe**: unresolvable references fall back to their original
//!   text, malformed notation passes through unchanged, and oversized
//!   inputs are chunked or bypassed instead of rewritten. No pipeline
//!   call ever returns an error.
//! - **Explicit ordering**: each documentation field runs a fixed stage
//!   chain declared in the [`pipeline`] module.

pub mod autolink;
pub mod codeblock;
pub mod hashparams;
pub mod notation;
pub mod pipeline;
pub mod repair;
pub mod resolver;
pub mod tokenizer;
pub mod types;
pub mod utils;

// The corpus capability is part of this crate's API surface.
pub use coderef_corpus::{
  ArchiveUrls,
  CorpusError,
  InMemoryCorpus,
  SymbolKind,
  SymbolSource,
};

pub use crate::{
  codeblock::{
    CodeBlock,
    shortcode_code,
    shortcode_css,
    shortcode_js,
    shortcode_php,
  },
  pipeline::Formatter,
  types::{AutolinkLimits, Field, FormatOptions, ResolvedLink, Token},
};
