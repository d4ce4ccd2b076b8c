//! Core data types for persons and bibliography entries.
//!
//! [`person::Person`] carries a decomposed name; [`entry::Entry`] holds the
//! typed fields and persons-by-role of one bibliography item, including field
//! resolution through `crossref` chains.

pub mod entry;
pub mod person;
