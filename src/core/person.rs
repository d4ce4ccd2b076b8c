//! A person (author, editor, ...) with a decomposed name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BibliographyError, ErrorReporter};
use crate::parsing::names::{parse_name, NameParts};

/// The five fixed name-part categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePart {
    First,
    Middle,
    Prelast,
    Last,
    Lineage,
}

/// A person or person-like entity (a corporate author counts).
///
/// Equality is structural over the five part sequences, not over the rendered
/// string: two different decompositions that happen to print the same are still
/// different persons.
///
/// ```
/// use bib_resolver::Person;
///
/// let knuth = Person::new("Donald E. Knuth");
/// assert_eq!(knuth.first_names(), ["Donald"]);
/// assert_eq!(knuth.middle_names(), ["E."]);
/// assert_eq!(knuth.last_names(), ["Knuth"]);
/// assert_eq!(knuth.to_string(), "Knuth, Donald E.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person {
    parts: NameParts,
}

impl Person {
    /// Parse a name string, reporting malformed input through `reporter`.
    ///
    /// # Errors
    ///
    /// Only a strict reporter propagates [`BibliographyError::InvalidNameString`];
    /// see [`parse_name`].
    pub fn parse(name: &str, reporter: &mut ErrorReporter) -> Result<Self, BibliographyError> {
        Ok(Self {
            parts: parse_name(name, reporter)?,
        })
    }

    /// Parse a name string, silently accepting malformed input best-effort.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut reporter = ErrorReporter::capturing();
        // A capturing reporter never returns the error.
        Self::parse(name, &mut reporter).unwrap_or_default()
    }

    /// Build a person from already-decomposed parts, as collaborator parsers
    /// for part-structured formats (BibTeXML) produce them.
    #[must_use]
    pub fn from_parts(parts: NameParts) -> Self {
        Self { parts }
    }

    #[must_use]
    pub fn parts(&self) -> &NameParts {
        &self.parts
    }

    #[must_use]
    pub fn first_names(&self) -> &[String] {
        &self.parts.first
    }

    #[must_use]
    pub fn middle_names(&self) -> &[String] {
        &self.parts.middle
    }

    #[must_use]
    pub fn prelast_names(&self) -> &[String] {
        &self.parts.prelast
    }

    #[must_use]
    pub fn last_names(&self) -> &[String] {
        &self.parts.last
    }

    #[must_use]
    pub fn lineage_names(&self) -> &[String] {
        &self.parts.lineage
    }

    /// First and middle names together. BibTeX treats middle names as first
    /// names; styles that abbreviate want this combined view.
    #[must_use]
    pub fn bibtex_first_names(&self) -> Vec<&str> {
        self.parts
            .first
            .iter()
            .chain(&self.parts.middle)
            .map(String::as_str)
            .collect()
    }

    /// Name parts by category.
    #[must_use]
    pub fn part(&self, part: NamePart) -> &[String] {
        match part {
            NamePart::First => &self.parts.first,
            NamePart::Middle => &self.parts.middle,
            NamePart::Prelast => &self.parts.prelast,
            NamePart::Last => &self.parts.last,
            NamePart::Lineage => &self.parts.lineage,
        }
    }

    /// One category space-joined, e.g. `Prelast` -> `"van der"`.
    #[must_use]
    pub fn part_as_text(&self, part: NamePart) -> String {
        self.part(part).join(" ")
    }
}

/// Canonical rendering: `von Last, Jr, First Middle`, empty groups omitted.
/// Re-parsing the rendered string yields an equal `Person`.
impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let von_last = join_words(&[&self.parts.prelast, &self.parts.last]);
        let lineage = self.parts.lineage.join(" ");
        let first = join_words(&[&self.parts.first, &self.parts.middle]);

        let groups: Vec<&str> = [von_last.as_str(), lineage.as_str(), first.as_str()]
            .into_iter()
            .filter(|group| !group.is_empty())
            .collect();
        write!(f, "{}", groups.join(", "))
    }
}

fn join_words(groups: &[&[String]]) -> String {
    groups
        .iter()
        .flat_map(|group| group.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let dixit = Person::new("Avinash K. Dixit");
        assert_eq!(dixit.first_names(), ["Avinash"]);
        assert_eq!(dixit.middle_names(), ["K."]);
        assert!(dixit.prelast_names().is_empty());
        assert_eq!(dixit.last_names(), ["Dixit"]);
        assert!(dixit.lineage_names().is_empty());
        assert_eq!(dixit.bibtex_first_names(), ["Avinash", "K."]);
    }

    #[test]
    fn test_part_lookup() {
        let person = Person::new("Ludwig van Beethoven");
        assert_eq!(person.part(NamePart::Prelast), ["van"]);
        assert_eq!(person.part(NamePart::Last), ["Beethoven"]);
        assert_eq!(person.part_as_text(NamePart::First), "Ludwig");
        assert_eq!(person.part_as_text(NamePart::Lineage), "");
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(Person::new("Donald E. Knuth").to_string(), "Knuth, Donald E.");
        assert_eq!(
            Person::new("Dixit, Jr, Avinash K.").to_string(),
            "Dixit, Jr, Avinash K."
        );
        assert_eq!(
            Person::new("Jean de la Fontaine").to_string(),
            "de la Fontaine, Jean"
        );
        assert_eq!(Person::new("abc").to_string(), "abc");
        assert_eq!(Person::new("").to_string(), "");
    }

    #[test]
    fn test_round_trip_through_canonical_string() {
        for name in [
            "Donald E. Knuth",
            "Dixit, Jr, Avinash K.",
            "Viktorov, Michail~Markovitch",
            "Charles Louis Xavier Joseph de la Vall{\\'e}e Poussin",
            "de la Fontaine, Jean",
            "abc",
        ] {
            let person = Person::new(name);
            let reparsed = Person::new(&person.to_string());
            assert_eq!(person, reparsed, "round trip failed for {name:?}");
        }
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Person::new("Knuth, Donald E."), Person::new("Donald E. Knuth"));
        assert_ne!(Person::new("Donald Knuth"), Person::new("Donald E. Knuth"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let person = Person::new("Donald E. Knuth");
        let json = serde_json::to_string(&person).unwrap();
        assert!(json.contains("\"last\":[\"Knuth\"]"));
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back, person);
    }
}
