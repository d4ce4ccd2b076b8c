//! The bibliography database: all entries, the preamble, and load-time
//! bookkeeping for restricted ("wanted entries only") loads.

use serde::{Deserialize, Serialize};

use crate::core::entry::{Entry, CROSSREF_FIELD};
use crate::errors::{BibliographyError, ErrorReporter};
use crate::utils::caseless::{fold_key, CaseFoldMap, CaseFoldSet};

/// BibTeX pulls a cross-referenced entry into the citation list only once this
/// many citations reference it.
pub const DEFAULT_MIN_CROSSREFS: usize = 2;

/// A collection of bibliography entries referenced by their keys, plus the
/// LaTeX preamble accumulated from `@PREAMBLE` commands.
///
/// Entry lookup is case-insensitive and iteration follows insertion order:
///
/// ```
/// use bib_resolver::{BibliographyData, Entry, ErrorReporter};
///
/// let mut reporter = ErrorReporter::strict();
/// let mut data = BibliographyData::new();
/// data.add_entry("Gnats", Entry::new("article"), &mut reporter).unwrap();
///
/// assert_eq!(data.entries.get("gnats"), data.entries.get("GNATS"));
/// assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["Gnats"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BibliographyData {
    /// All entries, keyed by their canonical keys.
    pub entries: CaseFoldMap<Entry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    preamble: Vec<String>,

    /// When set, only these keys (or crossref targets they pull in, or
    /// everything if the set holds the wildcard) are accepted by `add_entry`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wanted_entries: Option<CaseFoldSet>,

    /// Explicitly requested keys; remembers the casing a citation used so the
    /// entry can be stored under it.
    #[serde(default, skip_serializing_if = "CaseFoldSet::is_empty")]
    citations: CaseFoldSet,

    min_crossrefs: usize,
}

impl BibliographyData {
    /// An empty, unrestricted database.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: CaseFoldMap::new(),
            preamble: Vec::new(),
            wanted_entries: None,
            citations: CaseFoldSet::new(),
            min_crossrefs: DEFAULT_MIN_CROSSREFS,
        }
    }

    /// An empty database that only accepts the given keys (a wildcard entry
    /// accepts everything). The keys double as the explicit citation set.
    #[must_use]
    pub fn with_wanted_entries<I, S>(wanted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wanted: CaseFoldSet = wanted.into_iter().map(Into::into).collect();
        Self {
            citations: wanted.clone(),
            wanted_entries: Some(wanted),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_min_crossrefs(mut self, min_crossrefs: usize) -> Self {
        self.min_crossrefs = min_crossrefs;
        self
    }

    #[must_use]
    pub fn min_crossrefs(&self) -> usize {
        self.min_crossrefs
    }

    pub fn add_to_preamble(&mut self, value: impl Into<String>) {
        self.preamble.push(value.into());
    }

    /// Preamble blocks in the order they were added.
    #[must_use]
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    /// The whole preamble as one string.
    #[must_use]
    pub fn preamble_text(&self) -> String {
        self.preamble.concat()
    }

    /// Whether an entry under `key` would be accepted by [`Self::add_entry`].
    #[must_use]
    pub fn want_entry(&self, key: &str) -> bool {
        match &self.wanted_entries {
            None => true,
            Some(wanted) => {
                wanted.contains(key) || wanted.contains(crate::database::WILDCARD_CITATION)
            }
        }
    }

    /// The casing under which `key` was explicitly cited, or `key` as given.
    #[must_use]
    pub fn canonical_key(&self, key: &str) -> String {
        self.citations
            .canonical_key(key)
            .map_or_else(|| key.to_string(), ToString::to_string)
    }

    /// Store an entry under `key`.
    ///
    /// Entries outside an active wanted-entries filter are silently skipped.
    /// A case-insensitively repeated key is reported as
    /// [`BibliographyError::DuplicateKey`]; the first entry wins. The stored
    /// entry gets its canonical key assigned, and its crossref target (if any)
    /// joins an active filter so a later-parsed target is still accepted.
    ///
    /// # Errors
    ///
    /// Only a strict `reporter` propagates the duplicate-key error.
    pub fn add_entry(
        &mut self,
        key: impl Into<String>,
        mut entry: Entry,
        reporter: &mut ErrorReporter,
    ) -> Result<(), BibliographyError> {
        let key = key.into();
        if !self.want_entry(&key) {
            return Ok(());
        }
        if self.entries.contains_key(&key) {
            return reporter.report(BibliographyError::DuplicateKey(key));
        }

        let canonical = self.canonical_key(&key);
        entry.assign_key(canonical.clone());
        let crossref = entry.fields.get(CROSSREF_FIELD).cloned();
        self.entries.insert(canonical, entry);

        if let (Some(wanted), Some(crossref)) = (self.wanted_entries.as_mut(), crossref) {
            wanted.add(crossref);
        }
        Ok(())
    }

    /// Store a sequence of `(key, entry)` pairs, as collaborator parsers
    /// produce them.
    ///
    /// # Errors
    ///
    /// Stops at the first error a strict `reporter` propagates.
    pub fn add_entries<I, S>(
        &mut self,
        entries: I,
        reporter: &mut ErrorReporter,
    ) -> Result<(), BibliographyError>
    where
        I: IntoIterator<Item = (S, Entry)>,
        S: Into<String>,
    {
        for (key, entry) in entries {
            self.add_entry(key, entry, reporter)?;
        }
        Ok(())
    }

    /// A copy with every entry key, field key, and role key lowercased.
    /// Idempotent; preamble, filter set, and `min_crossrefs` carry over.
    #[must_use]
    pub fn lower(&self) -> Self {
        let mut entries = CaseFoldMap::new();
        for (key, entry) in self.entries.iter() {
            let folded = fold_key(key);
            let mut lowered = entry.lower();
            lowered.assign_key(folded.clone());
            entries.insert(folded, lowered);
        }
        Self {
            entries,
            preamble: self.preamble.clone(),
            wanted_entries: self.wanted_entries.clone(),
            citations: self.citations.clone(),
            min_crossrefs: self.min_crossrefs,
        }
    }
}

/// Databases compare by entries and preamble; load-time bookkeeping
/// (filter, citations, `min_crossrefs`) is not data.
impl PartialEq for BibliographyData {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.preamble == other.preamble
    }
}

impl Eq for BibliographyData {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::person::Person;

    fn article(fields: &[(&str, &str)]) -> Entry {
        let mut entry = Entry::new("article");
        for (name, value) in fields {
            entry = entry.with_field(*name, *value);
        }
        entry
    }

    #[test]
    fn test_add_entry_assigns_key() {
        let mut data = BibliographyData::new();
        data.add_entry("Knuth1984", article(&[]), &mut ErrorReporter::strict())
            .unwrap();

        let entry = data.entries.get("knuth1984").unwrap();
        assert_eq!(entry.key(), Some("Knuth1984"));
    }

    #[test]
    fn test_duplicate_key_keeps_first_entry() {
        let mut reporter = ErrorReporter::capturing();
        let mut data = BibliographyData::new();
        data.add_entry("gnats", article(&[("year", "1984")]), &mut reporter)
            .unwrap();
        data.add_entry("GNATS", article(&[("year", "2001")]), &mut reporter)
            .unwrap();

        assert_eq!(
            reporter.captured(),
            [BibliographyError::DuplicateKey("GNATS".to_string())]
        );
        assert_eq!(data.entries.len(), 1);
        assert_eq!(
            data.entries.get("gnats").unwrap().fields.get("year").map(String::as_str),
            Some("1984")
        );
    }

    #[test]
    fn test_duplicate_key_strict() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::new();
        data.add_entry("gnats", article(&[]), &mut reporter).unwrap();
        assert_eq!(
            data.add_entry("gnats", article(&[]), &mut reporter),
            Err(BibliographyError::DuplicateKey("gnats".to_string()))
        );
    }

    #[test]
    fn test_wanted_entries_filter() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::with_wanted_entries(["Wanted"]);
        data.add_entry("wanted", article(&[]), &mut reporter).unwrap();
        data.add_entry("unwanted", article(&[]), &mut reporter).unwrap();

        assert_eq!(data.entries.len(), 1);
        // The citation's casing is canonical, not the source file's.
        assert_eq!(data.entries.keys().collect::<Vec<_>>(), ["Wanted"]);
        assert!(!data.want_entry("unwanted"));
    }

    #[test]
    fn test_wildcard_in_filter_accepts_everything() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::with_wanted_entries(["*"]);
        data.add_entry("anything", article(&[]), &mut reporter).unwrap();
        assert_eq!(data.entries.len(), 1);
    }

    #[test]
    fn test_filtered_load_pulls_in_crossref_target() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::with_wanted_entries(["main"]);
        // The crossref target is parsed after the entry that references it.
        data.add_entry("main", article(&[("crossref", "proc")]), &mut reporter)
            .unwrap();
        data.add_entry("proc", article(&[]), &mut reporter).unwrap();

        assert_eq!(data.entries.len(), 2);
        assert!(data.want_entry("PROC"));
    }

    #[test]
    fn test_find_field_through_crossref_chain() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::new();
        data.add_entry(
            "article",
            article(&[("crossref", "proceedings")]),
            &mut reporter,
        )
        .unwrap();
        data.add_entry(
            "proceedings",
            article(&[("booktitle", "Proc. of Things")]),
            &mut reporter,
        )
        .unwrap();

        let entry = data.entries.get("article").unwrap();
        assert_eq!(
            entry.find_field("booktitle", Some(&data)),
            Ok("Proc. of Things".to_string())
        );
        assert_eq!(
            entry.find_field("missing", Some(&data)),
            Err(crate::core::entry::FieldError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_find_field_cyclic_crossref() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::new();
        data.add_entry("a", article(&[("crossref", "b")]), &mut reporter)
            .unwrap();
        data.add_entry("b", article(&[("crossref", "A")]), &mut reporter)
            .unwrap();

        let entry = data.entries.get("a").unwrap();
        assert_eq!(
            entry.find_field("title", Some(&data)),
            Err(crate::core::entry::FieldError::CyclicCrossref("b".to_string()))
        );
    }

    #[test]
    fn test_equality_over_entries_and_preamble() {
        let mut reporter = ErrorReporter::strict();
        let mut a = BibliographyData::new();
        a.add_entry("key", article(&[("title", "T")]), &mut reporter).unwrap();
        let mut b = BibliographyData::new().with_min_crossrefs(5);
        b.add_entry("KEY", article(&[("TITLE", "T")]), &mut reporter).unwrap();

        assert_eq!(a, b);
        b.add_to_preamble("\\newcommand{\\noopsort}[1]{}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_preamble() {
        let mut data = BibliographyData::new();
        data.add_to_preamble("\\newcommand{\\noopsort}[1]{}");
        data.add_to_preamble("\\newcommand{\\nooptilde}[1]{}");
        assert_eq!(data.preamble().len(), 2);
        assert_eq!(
            data.preamble_text(),
            "\\newcommand{\\noopsort}[1]{}\\newcommand{\\nooptilde}[1]{}"
        );
    }

    #[test]
    fn test_lower_is_idempotent() {
        let mut reporter = ErrorReporter::strict();
        let mut data = BibliographyData::new();
        data.add_entry(
            "Obrazy",
            Entry::new("BOOK")
                .with_field("Title", "Obrazy z Rus")
                .with_person("Author", Person::new("Karel Havl{\\'\\i}{\\v c}ek Borovsk{\\'y}")),
            &mut reporter,
        )
        .unwrap();
        data.add_entry(
            "Elegie",
            Entry::new("BOOK").with_field("Title", "Tirolsk{\\'e} elegie"),
            &mut reporter,
        )
        .unwrap();

        let lowered = data.lower();
        assert_eq!(
            lowered.entries.keys().collect::<Vec<_>>(),
            ["obrazy", "elegie"]
        );
        for (key, entry) in lowered.entries.iter() {
            assert_eq!(entry.key(), Some(key));
        }
        assert_eq!(
            lowered.entries.get("obrazy").unwrap().fields.keys().collect::<Vec<_>>(),
            ["title"]
        );
        assert_eq!(lowered.lower(), lowered);
        assert_eq!(lowered, data);
    }
}
