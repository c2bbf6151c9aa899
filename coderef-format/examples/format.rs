#![allow(clippy::print_stdout, reason = "Fine in examples")]
//! Formats a few representative documentation snippets and prints the
//! resulting HTML.
//!
//! Run with: `cargo run --example format -p coderef-format`

use coderef_format::{
  ArchiveUrls,
  Formatter,
  InMemoryCorpus,
  SymbolKind,
  shortcode_code,
};

fn main() {
  let mut corpus = InMemoryCorpus::new();
  corpus.insert(
    SymbolKind::Function,
    "esc_attr",
    "/reference/functions/esc-attr",
  );
  corpus.insert(SymbolKind::Class, "WP_Query", "/reference/classes/wp-query");
  corpus.insert(
    SymbolKind::Method,
    "WP_Query::query",
    "/reference/classes/wp-query/query",
  );

  let formatter = Formatter::new(&corpus, ArchiveUrls::default());

  let content = "Escape values with esc_attr() before output. See \
                 {@link https://example.org/security Security notes} and \
                 {@see WP_Query::query()}. Code such as \
                 <code>esc_attr( $value )</code> is left alone.";
  println!("content:\n{}\n", formatter.format_content(content));

  let description =
    "{ @type string $status Default 'publish'. @type WP_Query $query { \
     @type bool $cached Whether the query was cached. } }";
  println!(
    "parameter description:\n{}\n",
    formatter.format_param_description(description)
  );

  println!(
    "return type:\n{}\n",
    formatter.format_return_type("WP_Query|false")
  );

  let block = shortcode_code(
    Some("sh"),
    "ls\ncd docs\ngrep -rn query .\nmake\nmake install",
  );
  println!("code block ({}):\n{}", block.language, block.to_html());
}
