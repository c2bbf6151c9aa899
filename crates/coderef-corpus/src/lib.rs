//! Symbol corpus abstraction for the coderef formatting engine.
//!
//! The formatting pipeline never owns the set of documented symbols; it is
//! handed a read-only lookup capability instead. This crate defines that
//! capability ([`SymbolSource`]), the symbol kinds it is keyed by
//! ([`SymbolKind`]), the per-kind archive base paths used when links are
//! constructed without a lookup ([`ArchiveUrls`]), and a simple in-memory
//! implementation ([`InMemoryCorpus`]) that can be populated directly or
//! loaded from a JSON file.

pub mod archive;
pub mod corpus;
pub mod error;

pub use archive::ArchiveUrls;
pub use corpus::{InMemoryCorpus, SymbolKind, SymbolSource};
pub use error::CorpusError;
