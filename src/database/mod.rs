//! Bibliography database storage and citation resolution.
//!
//! [`store::BibliographyData`] owns all entries and the preamble. Citation
//! resolution lives in [`citations`]: wildcard expansion and crossref-count
//! pull-ins, combined by `add_extra_citations`.
//!
//! ## Example
//!
//! ```
//! use bib_resolver::{BibliographyData, Entry, ErrorReporter};
//!
//! let mut reporter = ErrorReporter::strict();
//! let mut data = BibliographyData::new();
//! data.add_entry(
//!     "main_article",
//!     Entry::new("article").with_field("crossref", "xrefd_article"),
//!     &mut reporter,
//! ).unwrap();
//! data.add_entry("xrefd_article", Entry::new("article"), &mut reporter).unwrap();
//!
//! let citations = data
//!     .add_extra_citations(&["main_article"], 1, &mut reporter)
//!     .unwrap();
//! assert_eq!(citations, ["main_article", "xrefd_article"]);
//! ```

pub mod citations;
pub mod store;

pub use citations::WILDCARD_CITATION;
