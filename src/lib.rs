//! # bib-resolver
//!
//! An in-memory bibliographic database: keyed entries with typed fields and
//! person names, cross-reference resolution between entries, and citation-list
//! expansion.
//!
//! BibTeX-family tooling shares a common core once the concrete syntax is out
//! of the way: entry keys and field names compare case-insensitively while
//! keeping their source casing and order, person names decompose into
//! first/von/last/lineage parts under TeX brace rules, and the final citation
//! list comes from expanding `*` wildcards and pulling in entries that enough
//! citations cross-reference. That core is this crate; format parsers and
//! formatters are collaborators that construct and consume these types.
//!
//! ## Example
//!
//! ```rust
//! use bib_resolver::{BibliographyData, Entry, ErrorReporter, Person};
//!
//! let mut reporter = ErrorReporter::strict();
//! let mut data = BibliographyData::new();
//!
//! data.add_entry(
//!     "knuth1984",
//!     Entry::new("book")
//!         .with_field("title", "The TeXbook")
//!         .with_person("author", Person::new("Donald E. Knuth")),
//!     &mut reporter,
//! ).unwrap();
//!
//! // Lookups are case-insensitive.
//! let entry = data.entries.get("KNUTH1984").unwrap();
//! assert_eq!(
//!     entry.find_field("author", Some(&data)).unwrap(),
//!     "Knuth, Donald E.",
//! );
//! ```
//!
//! ## Modules
//!
//! - [`utils`]: ordered case-insensitive maps and sets
//! - [`parsing`]: TeX-aware tokenization and name decomposition
//! - [`core`]: persons and bibliography entries
//! - [`database`]: entry storage and citation resolution
//! - [`errors`]: error kinds and the strict/permissive/capturing reporter

pub mod core;
pub mod database;
pub mod errors;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::entry::{Entry, FieldError, CROSSREF_FIELD};
pub use crate::core::person::{NamePart, Person};
pub use crate::database::store::{BibliographyData, DEFAULT_MIN_CROSSREFS};
pub use crate::database::WILDCARD_CITATION;
pub use crate::errors::{BibliographyError, ErrorReporter, ReportMode};
pub use crate::parsing::names::{parse_name, NameParts};
