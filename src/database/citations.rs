//! Citation-list resolution: wildcard expansion and crossref pull-ins.
//!
//! A style pipeline hands in the raw `\citation{...}` keys from an aux file,
//! possibly containing the `*` wildcard, and gets back the final ordered,
//! deduplicated citation list including entries pulled in by being
//! cross-referenced often enough.

use crate::core::entry::CROSSREF_FIELD;
use crate::database::store::BibliographyData;
use crate::errors::{BibliographyError, ErrorReporter};
use crate::utils::caseless::{CaseFoldDefaultMap, CaseFoldSet};

/// The citation key meaning "every entry in the database".
pub const WILDCARD_CITATION: &str = "*";

impl BibliographyData {
    /// Expand wildcard citations lazily, preserving order and deduplicating
    /// case-insensitively.
    ///
    /// Each literal key is yielded at its first occurrence; the wildcard
    /// expands in place to all entry keys in database order, skipping keys
    /// already yielded. An earlier literal mention is never displaced by the
    /// wildcard, only removed from its expansion.
    pub fn expand_wildcard_citations<'a, S: AsRef<str>>(
        &'a self,
        citations: &'a [S],
    ) -> impl Iterator<Item = String> + 'a {
        let mut seen = CaseFoldSet::new();
        citations.iter().flat_map(move |citation| {
            let citation = citation.as_ref();
            if citation == WILDCARD_CITATION {
                self.entries
                    .keys()
                    .filter(|key| seen.add((*key).to_string()))
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            } else if seen.add(citation.to_string()) {
                vec![citation.to_string()]
            } else {
                Vec::new()
            }
        })
    }

    /// Citations not cited explicitly but cross-referenced by the given ones.
    ///
    /// Every citation whose entry has a `crossref` field increments a
    /// case-insensitive counter for the target; the first time a target's
    /// count reaches `min_crossrefs` and the target is not already cited, its
    /// canonical key is yielded, exactly once.
    ///
    /// # Errors
    ///
    /// A dangling crossref target is reported as
    /// [`BibliographyError::BadCrossref`] and skipped; only a strict
    /// `reporter` propagates it. Citations without entries are ignored (they
    /// are a missing-entry problem, diagnosed elsewhere).
    pub fn crossreferenced_citations<S: AsRef<str>>(
        &self,
        citations: &[S],
        min_crossrefs: usize,
        reporter: &mut ErrorReporter,
    ) -> Result<Vec<String>, BibliographyError> {
        let mut crossref_count: CaseFoldDefaultMap<usize> = CaseFoldDefaultMap::new();
        let mut cited: CaseFoldSet = citations.iter().map(|c| c.as_ref().to_string()).collect();
        let mut extra = Vec::new();

        for citation in citations {
            let citation = citation.as_ref();
            let Some(entry) = self.entries.get(citation) else {
                continue;
            };
            let Some(crossref) = entry.fields.get(CROSSREF_FIELD) else {
                continue;
            };
            let Some(target) = self.entries.get(crossref) else {
                reporter.report(BibliographyError::BadCrossref {
                    key: citation.to_string(),
                    crossref: crossref.clone(),
                })?;
                continue;
            };

            // Stored entries always carry their canonical key.
            let canonical = target.key().unwrap_or(crossref.as_str());
            let count = crossref_count.get_mut(canonical);
            *count += 1;
            if *count >= min_crossrefs && !cited.contains(canonical) {
                cited.add(canonical.to_string());
                extra.push(canonical.to_string());
            }
        }
        Ok(extra)
    }

    /// The full resolution a style pipeline calls: wildcard expansion followed
    /// by crossref pull-ins appended at the end.
    ///
    /// # Errors
    ///
    /// See [`Self::crossreferenced_citations`].
    pub fn add_extra_citations<S: AsRef<str>>(
        &self,
        citations: &[S],
        min_crossrefs: usize,
        reporter: &mut ErrorReporter,
    ) -> Result<Vec<String>, BibliographyError> {
        let mut expanded: Vec<String> = self.expand_wildcard_citations(citations).collect();
        let extra = self.crossreferenced_citations(&expanded, min_crossrefs, reporter)?;
        expanded.extend(extra);
        Ok(expanded)
    }
}
