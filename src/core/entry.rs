//! A single bibliography entry: typed fields plus persons grouped by role.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::person::Person;
use crate::database::store::BibliographyData;
use crate::utils::caseless::{fold_key, CaseFoldMap, CaseFoldSet};

/// The field name an entry uses to borrow values from another entry.
pub const CROSSREF_FIELD: &str = "crossref";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Neither the entry, its person roles, nor its crossref chain has a value.
    #[error("no value found for field {0:?}")]
    NotFound(String),

    /// The crossref chain revisited an entry.
    #[error("cross-reference cycle at entry {0:?}")]
    CyclicCrossref(String),
}

/// A bibliography entry.
///
/// ```
/// use bib_resolver::{Entry, Person};
///
/// let entry = Entry::new("ARTICLE")
///     .with_field("Title", "The Gnats and Gnus Document Preparation System")
///     .with_person("author", Person::new("L[eslie] A. Aamport"));
///
/// assert_eq!(entry.entry_type(), "article");
/// assert_eq!(entry.fields.get("title").map(String::as_str),
///            Some("The Gnats and Gnus Document Preparation System"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Case-folded entry type ("article", "book", ...).
    #[serde(rename = "type")]
    entry_type: String,

    /// The type tag exactly as the source supplied it.
    original_type: String,

    /// Canonical key, assigned once when the entry joins a database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    /// Entry fields, ordered and case-insensitive.
    #[serde(default, skip_serializing_if = "CaseFoldMap::is_empty")]
    pub fields: CaseFoldMap<String>,

    /// Persons by role ("author", "editor", ...), ordered and case-insensitive.
    #[serde(default, skip_serializing_if = "CaseFoldMap::is_empty")]
    pub persons: CaseFoldMap<Vec<Person>>,
}

impl Entry {
    #[must_use]
    pub fn new(entry_type: impl Into<String>) -> Self {
        let original_type = entry_type.into();
        Self {
            entry_type: fold_key(&original_type),
            original_type,
            key: None,
            fields: CaseFoldMap::new(),
            persons: CaseFoldMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn with_person(mut self, role: &str, person: Person) -> Self {
        self.add_person(person, role);
        self
    }

    /// Case-folded entry type.
    #[must_use]
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// The type tag as supplied by the source.
    #[must_use]
    pub fn original_type(&self) -> &str {
        &self.original_type
    }

    /// The canonical key, present once the entry is stored in a database.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Assigned exactly once, by [`BibliographyData::add_entry`].
    pub(crate) fn assign_key(&mut self, key: String) {
        self.key = Some(key);
    }

    /// Append a person under `role`, creating the role on first use.
    pub fn add_person(&mut self, person: Person, role: &str) {
        match self.persons.get_mut(role) {
            Some(persons) => persons.push(person),
            None => {
                self.persons.insert(role, vec![person]);
            }
        }
    }

    /// Resolve a field value, in order:
    ///
    /// 1. a literal field of this entry;
    /// 2. a person role, rendered as canonical names joined with `" and "`
    ///    (the plural form of a role is accepted: `"authors"` finds `"author"`);
    /// 3. when `database` is given and this entry has a `crossref` field, the
    ///    cross-referenced entry, followed transitively.
    ///
    /// # Errors
    ///
    /// [`FieldError::NotFound`] when the chain runs out without a value or a
    /// crossref target is missing; [`FieldError::CyclicCrossref`] when the
    /// chain revisits an entry.
    pub fn find_field(
        &self,
        name: &str,
        database: Option<&BibliographyData>,
    ) -> Result<String, FieldError> {
        let mut entry = self;
        let mut visited = CaseFoldSet::new();

        loop {
            if let Some(value) = entry.fields.get(name) {
                return Ok(value.clone());
            }
            if let Some(rendered) = entry.person_field(name) {
                return Ok(rendered);
            }
            let crossref = match (database, entry.fields.get(CROSSREF_FIELD)) {
                (Some(_), Some(crossref)) => crossref,
                _ => return Err(FieldError::NotFound(name.to_string())),
            };
            if !visited.add(crossref.clone()) {
                return Err(FieldError::CyclicCrossref(crossref.clone()));
            }
            entry = database
                .and_then(|database| database.entries.get(crossref))
                .ok_or_else(|| FieldError::NotFound(name.to_string()))?;
        }
    }

    /// Render a person role as `" and "`-joined canonical names.
    fn person_field(&self, role: &str) -> Option<String> {
        let persons = self.persons.get(role).or_else(|| {
            role.strip_suffix(['s', 'S'])
                .and_then(|singular| self.persons.get(singular))
        })?;
        Some(
            persons
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" and "),
        )
    }

    /// A copy with field and role keys case-folded. Field values and person
    /// names are untouched; the key is cleared for re-insertion.
    #[must_use]
    pub fn lower(&self) -> Self {
        Self {
            entry_type: self.entry_type.clone(),
            original_type: self.entry_type.clone(),
            key: None,
            fields: self.fields.lower(),
            persons: self.persons.lower(),
        }
    }
}

/// Entries compare by type, fields, and persons. The key is assigned by the
/// containing database and the original type casing is presentation only;
/// neither takes part in equality.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.fields == other.fields
            && self.persons == other.persons
    }
}

impl Eq for Entry {}
