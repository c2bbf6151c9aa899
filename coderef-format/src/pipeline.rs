//! The per-field formatting pipelines.
//!
//! Every documentation field runs a fixed, ordered chain of stages. The
//! orders are declared here as plain tables; there is no registration
//! mechanism and no priorities, what you read is what runs.

use coderef_corpus::{ArchiveUrls, SymbolSource};

use crate::{
  autolink, hashparams, notation, repair,
  resolver::Resolver,
  types::{Field, FormatOptions},
};

/// One named pipeline stage.
type Stage = (&'static str, for<'f> fn(&Formatter<'f>, &str) -> String);

const CONTENT_STAGES: &[Stage] = &[
  ("fix_unintended_markdown", stage_fix_unintended_markdown),
  ("link_doc_references", stage_link_doc_references),
  ("remove_inline_internal", stage_remove_inline_internal),
  ("autolink_references", stage_autolink_references),
];

const EXCERPT_STAGES: &[Stage] = &[
  ("remove_inline_internal", stage_remove_inline_internal),
  ("autolink_references", stage_autolink_references),
];

// The hash formatter runs before autolinking so that rendered
// descriptions, not raw brace soup, get linked.
const PARAM_DESCRIPTION_STAGES: &[Stage] = &[
  ("undo_markdown_emphasis", stage_undo_markdown_emphasis),
  ("encode_description_html", stage_encode_description_html),
  ("link_doc_references", stage_link_doc_references),
  ("format_hash_params", stage_format_hash_params),
  ("autolink_references", stage_autolink_references),
  ("fix_html_as_code", stage_fix_html_as_code),
  ("fix_quotes_to_code", stage_fix_quotes_to_code),
  ("convert_lists_to_markup", stage_convert_lists_to_markup),
];

const HASH_PARAM_DESCRIPTION_STAGES: &[Stage] = &[
  ("autolink_references", stage_autolink_references),
  ("fix_inverted_code_tags", stage_fix_inverted_code_tags),
  ("fix_quotes_to_code", stage_fix_quotes_to_code),
  ("convert_lists_to_markup", stage_convert_lists_to_markup),
];

const TYPE_STAGES: &[Stage] =
  &[("autolink_references", stage_autolink_references)];

/// The formatting engine.
///
/// Holds the injected symbol corpus, the archive base paths and the
/// options; each call is a pure transformation, so one `Formatter` can be
/// shared freely across threads when its corpus is shareable.
#[derive(Clone)]
pub struct Formatter<'a> {
  corpus:   &'a dyn SymbolSource,
  archives: ArchiveUrls,
  options:  FormatOptions,
}

impl<'a> Formatter<'a> {
  /// Create a formatter with default options.
  #[must_use]
  pub fn new(corpus: &'a dyn SymbolSource, archives: ArchiveUrls) -> Self {
    Self::with_options(corpus, archives, FormatOptions::default())
  }

  /// Create a formatter with explicit options.
  #[must_use]
  pub const fn with_options(
    corpus: &'a dyn SymbolSource,
    archives: ArchiveUrls,
    options: FormatOptions,
  ) -> Self {
    Self {
      corpus,
      archives,
      options,
    }
  }

  /// The options this formatter runs with.
  #[must_use]
  pub const fn options(&self) -> &FormatOptions {
    &self.options
  }

  /// Run the stage chain for `field` over `text`.
  #[must_use]
  pub fn apply(&self, field: Field, text: &str) -> String {
    let mut current = text.to_string();
    for (name, stage) in Self::stages(field) {
      log::trace!("stage {name} ({field:?})");
      current = stage(self, &current);
    }
    current
  }

  /// Format main post content.
  #[must_use]
  pub fn format_content(&self, text: &str) -> String {
    self.apply(Field::Content, text)
  }

  /// Format a post excerpt.
  #[must_use]
  pub fn format_excerpt(&self, text: &str) -> String {
    self.apply(Field::Excerpt, text)
  }

  /// Format a parameter description.
  #[must_use]
  pub fn format_param_description(&self, text: &str) -> String {
    self.apply(Field::ParamDescription, text)
  }

  /// Format a parameter type string.
  #[must_use]
  pub fn format_param_type(&self, text: &str) -> String {
    self.apply(Field::ParamType, text)
  }

  /// Format a return-type string.
  #[must_use]
  pub fn format_return_type(&self, text: &str) -> String {
    self.apply(Field::ReturnType, text)
  }

  /// The ordered stage chain for a field.
  const fn stages(field: Field) -> &'static [Stage] {
    match field {
      Field::Content => CONTENT_STAGES,
      Field::Excerpt => EXCERPT_STAGES,
      Field::ParamDescription => PARAM_DESCRIPTION_STAGES,
      Field::HashParamDescription => HASH_PARAM_DESCRIPTION_STAGES,
      Field::ParamType | Field::ReturnType => TYPE_STAGES,
    }
  }

  fn resolver(&self) -> Resolver<'_> {
    Resolver::new(self.corpus, &self.archives)
  }
}

fn stage_fix_unintended_markdown(_: &Formatter<'_>, text: &str) -> String {
  repair::fix_unintended_markdown(text)
}

fn stage_link_doc_references(fmt: &Formatter<'_>, text: &str) -> String {
  notation::link_doc_references(&fmt.resolver(), text)
}

fn stage_remove_inline_internal(_: &Formatter<'_>, text: &str) -> String {
  notation::remove_inline_internal(text)
}

fn stage_autolink_references(fmt: &Formatter<'_>, text: &str) -> String {
  autolink::autolink_references(&fmt.resolver(), fmt.options.autolink, text)
}

fn stage_undo_markdown_emphasis(_: &Formatter<'_>, text: &str) -> String {
  repair::undo_markdown_emphasis(text)
}

fn stage_encode_description_html(_: &Formatter<'_>, text: &str) -> String {
  repair::encode_description_html(text)
}

fn stage_format_hash_params(fmt: &Formatter<'_>, text: &str) -> String {
  match hashparams::parse_hash_notation(text) {
    Some(segments) => hashparams::render_hash_segments(&segments, &|desc| {
      fmt.apply(Field::HashParamDescription, desc)
    }),
    None => text.to_string(),
  }
}

fn stage_fix_html_as_code(_: &Formatter<'_>, text: &str) -> String {
  repair::fix_html_as_code(text)
}

fn stage_fix_quotes_to_code(_: &Formatter<'_>, text: &str) -> String {
  repair::fix_quotes_to_code(text)
}

fn stage_fix_inverted_code_tags(_: &Formatter<'_>, text: &str) -> String {
  repair::fix_inverted_code_tags(text)
}

fn stage_convert_lists_to_markup(_: &Formatter<'_>, text: &str) -> String {
  repair::convert_lists_to_markup(text)
}
