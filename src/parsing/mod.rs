//! Tokenization of TeX-flavored strings and person-name decomposition.
//!
//! Concrete-syntax parsers for whole BibTeX/YAML/BibTeXML documents live in
//! collaborator crates; what belongs here is the part every format shares once
//! field values are in hand:
//!
//! - splitting strings on separators that `{...}` groups protect
//!   ([`tex::split_tex_list`], [`tex::split_tex_words`]);
//! - decomposing a person name into first/middle/von/last/lineage parts
//!   ([`names::parse_name`]).
//!
//! ## Example
//!
//! ```
//! use bib_resolver::errors::ErrorReporter;
//! use bib_resolver::parsing::names::parse_name;
//!
//! let mut reporter = ErrorReporter::strict();
//! let parts = parse_name("Dixit, Jr, Avinash K.", &mut reporter).unwrap();
//! assert_eq!(parts.last, ["Dixit"]);
//! assert_eq!(parts.lineage, ["Jr"]);
//! assert_eq!(parts.first, ["Avinash"]);
//! assert_eq!(parts.middle, ["K."]);
//! ```

pub mod names;
pub mod tex;
